//! HTTP access to the GIOS REST API.
//!
//! [`Fetch`] is the seam between the aggregator and the network: the
//! production [`GiosClient`] issues real GET requests, tests substitute
//! canned responses.

use std::future::Future;
use std::time::Duration;

use crate::error::{AggregationResult, FailureReason, UpstreamFetchFailure};

// ---

/// Issues a GET for `path` (relative to the upstream base URL) and decodes
/// the body as JSON.
pub trait Fetch: Send + Sync {
    fn get_json(&self, path: &str) -> impl Future<Output = AggregationResult> + Send;
}

/// Upstream client backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct GiosClient {
    // ---
    http: reqwest::Client,
    base_url: String,
}

impl GiosClient {
    /// Build a client with a per-call timeout.
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        // ---
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Fetch for GiosClient {
    async fn get_json(&self, path: &str) -> AggregationResult {
        // ---
        let url = self.url_for(path);
        tracing::debug!("Fetching {}", url);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| UpstreamFetchFailure::new(&url, classify(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamFetchFailure::new(
                &url,
                FailureReason::Status(status.as_u16()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamFetchFailure::new(&url, classify(&e)))?;

        serde_json::from_slice(&body).map_err(|e| {
            UpstreamFetchFailure::new(&url, FailureReason::MalformedBody(e.to_string()))
        })
    }
}

fn classify(err: &reqwest::Error) -> FailureReason {
    // ---
    if err.is_timeout() {
        FailureReason::Timeout
    } else {
        FailureReason::Transport(err.to_string())
    }
}

/// Path of one station-list page.
pub fn stations_page(page: u32, size: u32) -> String {
    format!("/station/findAll?page={page}&size={size}")
}

pub fn station_sensors(station_id: u64) -> String {
    format!("/station/sensors/{station_id}")
}

pub fn sensor_data(sensor_id: u64) -> String {
    format!("/data/getData/{sensor_id}")
}

/// Path of one page of archival measurements covering the last `days` days.
pub fn archival_page(sensor_id: u64, days: u32, page: u32, size: u32) -> String {
    format!("/archivalData/getDataBySensor/{sensor_id}?dayNumber={days}&page={page}&size={size}")
}

pub fn aq_index(station_id: u64) -> String {
    format!("/aqindex/getIndex/{station_id}")
}

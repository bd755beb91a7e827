//! Endpoint orchestration over the GIOS API.
//!
//! Each operation issues its upstream calls through [`Fetch`], drives
//! pagination where the resource is paged, and normalizes the result. All
//! operations are idempotent and hold no state between calls, so a caller
//! may retry any of them freely.

use serde_json::{Map, Value};

use crate::error::AggregationResult;
use crate::pagination::{fetch_all_pages, TOTAL_PAGES_KEY};
use crate::upstream::{self, Fetch};
use crate::{mapper, schema, Config};

// ---

/// Page size and ceilings applied to paged upstream resources.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub page_size: u32,
    pub stations_ceiling: u32,
    pub historical_ceiling: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            page_size: 500,
            stations_ceiling: 50,
            historical_ceiling: 10,
        }
    }
}

impl From<&Config> for PageLimits {
    fn from(cfg: &Config) -> Self {
        Self {
            page_size: cfg.page_size,
            stations_ceiling: cfg.stations_max_pages,
            historical_ceiling: cfg.historical_max_pages,
        }
    }
}

/// Fetches, merges and normalizes upstream resources.
#[derive(Debug)]
pub struct UpstreamAggregator<C> {
    client: C,
    limits: PageLimits,
}

impl<C: Fetch> UpstreamAggregator<C> {
    pub fn new(client: C, limits: PageLimits) -> Self {
        Self { client, limits }
    }

    /// Every station, across all pages, as normalized stations.
    pub async fn list_stations(&self) -> AggregationResult {
        // ---
        let size = self.limits.page_size;
        let mut merged = fetch_all_pages(
            |page| {
                let path = upstream::stations_page(page, size);
                async move { self.client.get_json(&path).await }
            },
            schema::STATIONS_KEY,
            self.limits.stations_ceiling,
        )
        .await?;

        if let Some(raw) = merged.passthrough() {
            tracing::warn!(
                "Station list lacks '{}', passing it through",
                schema::STATIONS_KEY
            );
            return Ok(raw);
        }

        Ok(Value::Array(mapper::map_records(
            &merged.items,
            schema::STATION,
        )))
    }

    /// Measuring positions of one station.
    pub async fn list_station_sensors(&self, station_id: u64) -> AggregationResult {
        // ---
        let body = self
            .client
            .get_json(&upstream::station_sensors(station_id))
            .await?;
        Ok(mapper::map_wrapped_list(
            body,
            schema::SENSORS_KEY,
            schema::SENSOR,
        ))
    }

    /// Current measurement series of one sensor.
    pub async fn get_sensor_measurements(&self, sensor_id: u64) -> AggregationResult {
        // ---
        let body = self
            .client
            .get_json(&upstream::sensor_data(sensor_id))
            .await?;
        Ok(mapper::map_measurement_series(body))
    }

    /// Archival measurements of one sensor over the last `days` days.
    ///
    /// Items are returned raw, merged under the upstream wrapper key, with
    /// the page count metadata alongside.
    pub async fn get_historical_measurements(
        &self,
        sensor_id: u64,
        days: u32,
    ) -> AggregationResult {
        // ---
        let size = self.limits.page_size;
        let mut merged = fetch_all_pages(
            |page| {
                let path = upstream::archival_page(sensor_id, days, page, size);
                async move { self.client.get_json(&path).await }
            },
            schema::HISTORICAL_KEY,
            self.limits.historical_ceiling,
        )
        .await?;

        if let Some(raw) = merged.passthrough() {
            tracing::warn!(
                "Archival data for sensor {} lacks '{}', passing it through",
                sensor_id,
                schema::HISTORICAL_KEY
            );
            return Ok(raw);
        }

        let mut out = Map::new();
        out.insert(
            schema::HISTORICAL_KEY.to_string(),
            Value::Array(merged.items),
        );
        out.insert(TOTAL_PAGES_KEY.to_string(), merged.total_pages.into());
        out.insert("pagesFetched".to_string(), merged.pages_fetched.into());
        out.insert("truncated".to_string(), merged.truncated.into());
        Ok(Value::Object(out))
    }

    /// Current air-quality index of one station.
    pub async fn get_air_quality_index(&self, station_id: u64) -> AggregationResult {
        // ---
        let body = self
            .client
            .get_json(&upstream::aq_index(station_id))
            .await?;
        Ok(mapper::map_aq_index(body))
    }
}

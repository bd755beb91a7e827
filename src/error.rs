//! Failure type shared by every upstream call.

use thiserror::Error;

/// Raised when any upstream HTTP call fails.
///
/// This is the only failure an aggregation can produce. Hitting a pagination
/// ceiling is not a failure and never produces one of these.
#[derive(Error, Debug)]
#[error("upstream fetch failed for {url}: {reason}")]
pub struct UpstreamFetchFailure {
    pub url: String,
    pub reason: FailureReason,
}

/// Why an upstream call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("malformed JSON body: {0}")]
    MalformedBody(String),
}

impl UpstreamFetchFailure {
    pub fn new(url: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            url: url.into(),
            reason,
        }
    }
}

/// Result of one aggregation: a normalized payload or a fetch failure.
pub type AggregationResult<T = serde_json::Value> = std::result::Result<T, UpstreamFetchFailure>;

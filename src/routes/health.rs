// src/routes/health.rs
//! Liveness endpoints for the proxy.
//!
//! `/health` is used by container orchestrators and CI pipelines to verify
//! that the service is running; `/` answers with a short banner naming the
//! normalized schema version served under `/api`. Neither route touches the
//! upstream API.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::schema::SCHEMA_VERSION;

/// JSON response body for the `/health` endpoint.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// JSON response body for the `/` endpoint.
#[derive(Serialize)]
struct BannerResponse {
    message: &'static str,
    version: &'static str,
}

/// Handle `GET /health`.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Handle `GET /`.
async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "SmogWatch API is running!",
        version: SCHEMA_VERSION,
    })
}

/// Create a subrouter containing the `/` and `/health` routes.
///
/// This router is generic over the application state so it can merge cleanly
/// with the gateway router, regardless of the state type.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[tokio::test]
    async fn test_banner_reports_schema_version() {
        // ---
        let Json(body) = banner().await;
        assert_eq!(body.version, SCHEMA_VERSION);

        let Json(body) = health().await;
        assert_eq!(body.status, "ok");
    }
}

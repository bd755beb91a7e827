use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json, Router};
use serde_json::json;

use crate::{Aggregator, Config, UpstreamFetchFailure};

mod health;
mod sensors;
mod stations;

// ---

/// State shared by every route.
pub type AppState = (Arc<Aggregator>, Config);

pub fn router(aggregator: Arc<Aggregator>, config: Config) -> Router {
    // ---
    Router::new()
        .merge(stations::router())
        .merge(sensors::router())
        .merge(health::router())
        .with_state((aggregator, config))
}

/// Failure answered to the client: HTTP 500 with a generic message.
///
/// Upstream detail stays in the logs and never reaches the response body.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
}

impl ApiError {
    /// Log one upstream failure with its request context and hide its detail.
    fn upstream(
        endpoint: &str,
        id: Option<u64>,
        err: UpstreamFetchFailure,
        message: &'static str,
    ) -> Self {
        // ---
        match id {
            Some(id) => tracing::error!(
                endpoint,
                id,
                url = %err.url,
                reason = %err.reason,
                "UpstreamFetchFailure"
            ),
            None => tracing::error!(
                endpoint,
                url = %err.url,
                reason = %err.reason,
                "UpstreamFetchFailure"
            ),
        }
        Self { message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::aggregator::{PageLimits, UpstreamAggregator};
    use crate::schema;
    use crate::testutils::CapturedEvents;
    use crate::upstream::GiosClient;
    use axum::{extract::Path, extract::Query, routing::get};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tracing::Level;

    /// Serve `app` on an ephemeral loopback port and return its base URL.
    async fn spawn(app: Router) -> String {
        // ---
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Stand-in for the GIOS API.
    fn mock_upstream() -> Router {
        // ---
        Router::new()
            .route(
                "/station/findAll",
                get(|Query(q): Query<HashMap<String, u32>>| async move {
                    let page = q.get("page").copied().unwrap_or(0);
                    let ids = if page == 0 { 1..4 } else { 4..6 };
                    let items: Vec<Value> = ids
                        .map(|id| json!({ "Identyfikator stacji": id, "Nazwa miasta": "Kraków" }))
                        .collect();
                    Json(json!({ (schema::STATIONS_KEY): items, "totalPages": 2 }))
                }),
            )
            .route(
                "/station/sensors/{id}",
                get(|Path(id): Path<u64>| async move {
                    if id == 999 {
                        return (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response();
                    }
                    Json(json!({
                        (schema::SENSORS_KEY): [ { "Identyfikator stanowiska": 1, "Identyfikator stacji": id } ]
                    }))
                    .into_response()
                }),
            )
            .route(
                "/data/getData/{id}",
                get(|| async { "<html>not json</html>" }),
            )
            .route(
                "/archivalData/getDataBySensor/{id}",
                get(|Query(q): Query<HashMap<String, u32>>| async move {
                    Json(json!({
                        (schema::HISTORICAL_KEY): [ { "dayNumber": q.get("dayNumber") } ],
                        "totalPages": 1
                    }))
                }),
            )
            .route(
                "/aqindex/getIndex/{id}",
                get(|| async {
                    Json(json!({ "AqIndex": { "Wartość indeksu": 0, "Nazwa kategorii indeksu": "Bardzo dobry" } }))
                }),
            )
    }

    async fn spawn_proxy() -> String {
        // ---
        let upstream_url = spawn(mock_upstream()).await;
        let config = Config::for_upstream(&upstream_url);
        let client = GiosClient::new(&config.api_url, Duration::from_secs(5)).unwrap();
        let aggregator = Arc::new(UpstreamAggregator::new(client, PageLimits::from(&config)));
        spawn(router(aggregator, config)).await
    }

    async fn get_json(url: String) -> (StatusCode, Value) {
        // ---
        let resp = reqwest::get(url).await.unwrap();
        let status = StatusCode::from_u16(resp.status().as_u16()).unwrap();
        (status, resp.json().await.unwrap())
    }

    #[tokio::test]
    async fn test_stations_endpoint_merges_pages() {
        // ---
        let base = spawn_proxy().await;
        let (status, body) = get_json(format!("{base}/api/stations")).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<u64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["id"].as_u64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(body[0]["city"]["name"], "Kraków");
    }

    #[tokio::test]
    async fn test_upstream_503_becomes_generic_500() {
        // ---
        let base = spawn_proxy().await;
        let (status, body) = get_json(format!("{base}/api/station/999/sensors")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = body["error"].as_str().unwrap();
        assert!(!message.contains("503"));
        assert!(!message.contains("maintenance"));
        assert_eq!(body.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upstream_503_logs_one_failure_event() {
        // ---
        let (events, _guard) = CapturedEvents::install();

        let base = spawn_proxy().await;
        let (status, _) = get_json(format!("{base}/api/station/999/sensors")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let errors = events.at_level(Level::ERROR);
        assert_eq!(errors.len(), 1, "{errors:?}");

        let failure = &errors[0];
        assert_eq!(failure.message(), Some("UpstreamFetchFailure"));
        assert_eq!(
            failure.fields.get("endpoint").map(String::as_str),
            Some("/api/station/{id}/sensors")
        );
        assert_eq!(failure.fields.get("id").map(String::as_str), Some("999"));
        assert!(failure.fields["reason"].contains("503"));
    }

    #[tokio::test]
    async fn test_sensors_endpoint() {
        // ---
        let base = spawn_proxy().await;
        let (status, body) = get_json(format!("{base}/api/station/114/sensors")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["stationId"], 114);
        assert!(body[0]["param"]["paramName"].is_null());
    }

    #[tokio::test]
    async fn test_malformed_upstream_json_becomes_500() {
        // ---
        let base = spawn_proxy().await;
        let (status, body) = get_json(format!("{base}/api/sensor/642/data")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_historical_days_defaults_to_seven() {
        // ---
        let base = spawn_proxy().await;

        let (status, body) = get_json(format!("{base}/api/sensor/642/historical")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[schema::HISTORICAL_KEY][0]["dayNumber"], 7);
        assert_eq!(body["totalPages"], 1);

        let (_, body) = get_json(format!("{base}/api/sensor/642/historical?days=3")).await;
        assert_eq!(body[schema::HISTORICAL_KEY][0]["dayNumber"], 3);
    }

    #[tokio::test]
    async fn test_air_quality_endpoint() {
        // ---
        let base = spawn_proxy().await;
        let (status, body) = get_json(format!("{base}/api/station/52/air-quality")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stIndex"]["indexLevel"]["indexLevelName"], "Bardzo dobry");
        assert!(body["o3Index"]["indexLevel"]["id"].is_null());
    }
}

use axum::{extract::Path, extract::Query, extract::State, routing::get, Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/sensor/{id}/data", get(sensor_data))
        .route("/api/sensor/{id}/historical", get(historical))
}

async fn sensor_data(
    Path(sensor_id): Path<u64>,
    State((aggregator, _)): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    // ---
    info!("GET /api/sensor/{}/data", sensor_id);

    let series = aggregator
        .get_sensor_measurements(sensor_id)
        .await
        .map_err(|e| {
            ApiError::upstream(
                "/api/sensor/{id}/data",
                Some(sensor_id),
                e,
                "Failed to fetch sensor data",
            )
        })?;
    Ok(Json(series))
}

/// Query parameters for the historical endpoint
#[derive(Debug, Deserialize)]
struct HistoricalQuery {
    /// Number of days back from today; defaults to `HISTORICAL_DEFAULT_DAYS`.
    days: Option<u32>,
}

async fn historical(
    Path(sensor_id): Path<u64>,
    Query(params): Query<HistoricalQuery>,
    State((aggregator, config)): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    // ---
    let days = params.days.unwrap_or(config.historical_default_days);
    info!("GET /api/sensor/{}/historical (days={})", sensor_id, days);

    let history = aggregator
        .get_historical_measurements(sensor_id, days)
        .await
        .map_err(|e| {
            ApiError::upstream(
                "/api/sensor/{id}/historical",
                Some(sensor_id),
                e,
                "Failed to fetch historical sensor data",
            )
        })?;
    Ok(Json(history))
}

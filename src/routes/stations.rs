//! Station-scoped endpoints: the station list, a station's sensors and its
//! air-quality index.

use axum::{extract::Path, extract::State, routing::get, Json, Router};
use serde_json::Value;
use tracing::info;

use super::{ApiError, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/stations", get(list_stations))
        .route("/api/station/{id}/sensors", get(station_sensors))
        .route("/api/station/{id}/air-quality", get(air_quality))
}

async fn list_stations(
    State((aggregator, _)): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    // ---
    info!("GET /api/stations");

    let stations = aggregator.list_stations().await.map_err(|e| {
        ApiError::upstream("/api/stations", None, e, "Failed to fetch stations")
    })?;
    Ok(Json(stations))
}

async fn station_sensors(
    Path(station_id): Path<u64>,
    State((aggregator, _)): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    // ---
    info!("GET /api/station/{}/sensors", station_id);

    let sensors = aggregator
        .list_station_sensors(station_id)
        .await
        .map_err(|e| {
            ApiError::upstream(
                "/api/station/{id}/sensors",
                Some(station_id),
                e,
                "Failed to fetch station sensors",
            )
        })?;
    Ok(Json(sensors))
}

async fn air_quality(
    Path(station_id): Path<u64>,
    State((aggregator, _)): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    // ---
    info!("GET /api/station/{}/air-quality", station_id);

    let index = aggregator
        .get_air_quality_index(station_id)
        .await
        .map_err(|e| {
            ApiError::upstream(
                "/api/station/{id}/air-quality",
                Some(station_id),
                e,
                "Failed to fetch air quality index",
            )
        })?;
    Ok(Json(index))
}

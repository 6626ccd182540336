//! API route handlers

use crate::error::ApiError;
use crate::service::EntityForecast;
use crate::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct PredictQuery {
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

/// `GET /countries`
pub async fn list_countries(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.service.entities())
}

/// `GET /predict/{country}`
pub async fn predict(
    State(state): State<AppState>,
    Path(country): Path<String>,
    query: Result<Query<PredictQuery>, QueryRejection>,
) -> Result<Json<EntityForecast>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let forecast = state
        .service
        .forecast(&country, query.start_year, query.end_year)?;
    Ok(Json(forecast))
}

/// Liveness probe - is the server running?
pub async fn liveness() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe - the registry is loaded before the listener binds, so a
/// responding server is always ready
pub async fn readiness(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ready",
        "models": state.service.registry().len(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

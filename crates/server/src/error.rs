//! HTTP error mapping and server startup errors

use crate::config::ConfigError;
use crate::service::ForecastError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use emissions_registry::RegistryError;
use serde::Serialize;
use std::net::SocketAddr;
use thiserror::Error;

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error returned by route handlers
#[derive(Debug)]
pub enum ApiError {
    Forecast(ForecastError),
    BadRequest(String),
}

impl From<ForecastError> for ApiError {
    fn from(error: ForecastError) -> Self {
        ApiError::Forecast(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Forecast(ForecastError::NotFound(entity)) => (
                StatusCode::NOT_FOUND,
                format!("No model found for {}", entity),
            ),
            ApiError::Forecast(ForecastError::InvalidRange { .. }) => (
                StatusCode::BAD_REQUEST,
                "end_year must not be before start_year".to_string(),
            ),
            ApiError::Forecast(err @ ForecastError::HorizonTooLong { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Forecast(ForecastError::Internal { entity, source }) => {
                tracing::error!(entity = %entity, error = %source, "Error generating predictions");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Error generating predictions".to_string(),
                )
            }
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Errors that stop the server from starting or serving
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load model registry: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

//! # emissions-server
//!
//! REST API serving per-country emission forecasts from a trained model
//! registry. The registry is loaded once at startup and shared read-only
//! across requests.

use axum::{routing::get, Router};
use emissions_registry::ModelRegistry;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod error;
pub mod routes;
pub mod service;

pub use config::{default_range_from_env, ConfigError, ServerConfig};
pub use error::{ApiError, ServerError};
pub use service::{EntityForecast, ForecastError, ForecastService, YearRange, YearlyPrediction};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: ForecastService,
}

/// Build the router over an already loaded service
pub fn router(service: ForecastService) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints (Kubernetes-compatible)
        .route("/health/live", get(routes::liveness))
        .route("/health/ready", get(routes::readiness))
        .route("/health", get(routes::liveness))
        // API endpoints
        .route("/countries", get(routes::list_countries))
        .route("/predict/{country}", get(routes::predict))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { service })
}

/// Install the global tracing subscriber, honouring `RUST_LOG`
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

/// Load the registry, bind and serve until Ctrl-C.
///
/// A registry that cannot be loaded aborts startup before the listener binds.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let registry = ModelRegistry::load(&config.models_path)?;
    let service = ForecastService::new(Arc::new(registry), config.default_range);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(
        "emissions-server v{} listening on {} ({} models)",
        env!("CARGO_PKG_VERSION"),
        addr,
        service.registry().len()
    );

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

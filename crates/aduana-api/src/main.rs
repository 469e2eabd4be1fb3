//! # aduana-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Aduana Stack API.
//! Binds to a configurable address (default `0.0.0.0:8080`).

use metrics_exporter_prometheus::PrometheusBuilder;

use aduana_api::state::{ApiConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ApiConfig::from_env();

    // Install the Prometheus recorder before any counter is touched.
    let metrics = if config.metrics_enabled {
        Some(PrometheusBuilder::new().install_recorder().map_err(|e| {
            tracing::error!("Prometheus recorder installation failed: {e}");
            e
        })?)
    } else {
        None
    };

    // Initialize database pool (optional — absent means in-memory only).
    let db = aduana_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    let state = AppState::new(config.clone(), db, metrics);

    // Hydrate in-memory stores from database (if connected).
    state.hydrate_from_db().await.map_err(|e| {
        tracing::error!("Database hydration failed: {e}");
        e
    })?;

    let app = aduana_api::app(state);

    tracing::info!("Aduana API listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

//! # aduana-api — Axum API Services for the Aduana Stack
//!
//! The HTTP surface over the customs operation lifecycle: operation
//! intake and status transitions, document and permit registries,
//! declarations with preliquidation, declaration crossing, and the
//! compliance rule configuration endpoints.
//!
//! ## API Surface
//!
//! | Prefix                                  | Module                    | Domain                  |
//! |-----------------------------------------|---------------------------|-------------------------|
//! | `/v1/operations`                        | [`routes::operations`]    | Lifecycle, transitions  |
//! | `/v1/operations/{id}/documents/*`       | [`routes::documents`]     | Document registry       |
//! | `/v1/operations/{id}/declarations/*`    | [`routes::declarations`]  | Declarations, preliq    |
//! | `/v1/operations/{id}/permits/*`         | [`routes::permits`]       | Permits                 |
//! | `/v1/operations/{id}/crossing/*`        | [`routes::crossing`]      | Declaration crossing    |
//! | `/v1/compliance/rules`                  | [`routes::compliance`]    | Rule configuration      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → HTTP metrics → Bearer auth → Handler
//! ```
//!
//! Health probes (`/health/*`), `/metrics`, and `/openapi.json` are
//! mounted outside the auth middleware so they remain accessible
//! without credentials.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    // Body size limit: 2 MiB. Declarations with many tariff lines stay
    // far below this.
    let mut api = Router::new()
        .merge(routes::operations::router())
        .merge(routes::documents::router())
        .merge(routes::declarations::router())
        .merge(routes::permits::router())
        .merge(routes::crossing::router())
        .merge(routes::compliance::router())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(from_fn_with_state(state.clone(), auth::require_bearer));

    if state.config.metrics_enabled {
        api = api.layer(from_fn(middleware::track_http));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    // Unauthenticated probes and the machine-readable surface.
    let mut unauthenticated = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .merge(openapi::router());

    if state.config.metrics_enabled {
        unauthenticated = unauthenticated.route("/metrics", get(prometheus_metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// Liveness probe — the process is up and serving.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks the in-memory ledger is accessible and, when a pool is
/// configured, that the database answers a trivial query.
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.ops.operations().len();

    if let Some(pool) = &state.db {
        if let Err(error) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!(%error, "database health check failed");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}

/// GET /metrics — Prometheus metrics scrape endpoint.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => handle.render().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

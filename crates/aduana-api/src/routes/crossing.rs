//! # Crossing API
//!
//! Execute and resolve the preliminary/final declaration crossing, and
//! fetch the latest result.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use aduana_crossing::CrossingResult;

use crate::error::AppError;
use crate::extractors::{Validate, ValidatedBody};
use crate::state::AppState;

/// Request carrying only the acting user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActorRequest {
    /// Who runs the crossing.
    pub actor: String,
}

impl Validate for ActorRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to resolve a DISCREPANCY crossing.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveRequest {
    /// Who resolves the discrepancies.
    pub actor: String,
    /// Resolution comment.
    pub comment: String,
}

impl Validate for ResolveRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        if self.comment.trim().is_empty() {
            return Err("comment must not be empty".to_string());
        }
        Ok(())
    }
}

/// Build the crossing router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/operations/{id}/crossing/execute", post(execute))
        .route("/v1/operations/{id}/crossing/resolve", post(resolve))
        .route("/v1/operations/{id}/crossing", get(get_result))
}

/// POST /v1/operations/{id}/crossing/execute — Run the crossing.
///
/// Requires both the preliminary and the final declaration; each run
/// supersedes the previous result wholesale.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/crossing/execute",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Crossing executed"),
        (status = 409, description = "A declaration is missing", body = crate::error::ErrorBody),
    ),
    tag = "crossing"
)]
async fn execute(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<CrossingResult>, AppError> {
    let req = body.validated()?;
    let result = state.ops.execute_crossing(id.into(), &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(result))
}

/// POST /v1/operations/{id}/crossing/resolve — Resolve a discrepancy.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/crossing/resolve",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Crossing resolved"),
        (status = 409, description = "Not in DISCREPANCY state", body = crate::error::ErrorBody),
    ),
    tag = "crossing"
)]
async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<CrossingResult>, AppError> {
    let req = body.validated()?;
    let result = state
        .ops
        .resolve_crossing(id.into(), &req.actor, &req.comment)?;
    state.persist(id.into()).await;
    Ok(Json(result))
}

/// GET /v1/operations/{id}/crossing — The latest result.
#[utoipa::path(
    get,
    path = "/v1/operations/{id}/crossing",
    params(("id" = Uuid, Path, description = "Operation ID")),
    responses(
        (status = 200, description = "Latest crossing result"),
        (status = 404, description = "Crossing never executed", body = crate::error::ErrorBody),
    ),
    tag = "crossing"
)]
async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CrossingResult>, AppError> {
    let id = aduana_core::OperationId::from(id);
    state
        .ops
        .crossing_result(id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no crossing has been executed for {id}")))
}

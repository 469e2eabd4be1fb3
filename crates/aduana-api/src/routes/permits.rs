//! # Permit API
//!
//! External agency permits. Every mutation re-evaluates the permit gate
//! in the service layer: a blocking permit parks the operation in
//! `PENDING_EXTERNAL_APPROVAL`, the last blocker clearing resumes
//! `VALUATION_REVIEW`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use aduana_core::{Permit, PermitStatus};

use crate::error::AppError;
use crate::extractors::{Validate, ValidatedBody};
use crate::routes::ActorQuery;
use crate::state::AppState;

/// Request to create a permit.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePermitRequest {
    /// Issuing agency or permit kind (e.g. "SENASA").
    pub permit_type: String,
    /// Who records the permit.
    pub actor: String,
}

impl Validate for CreatePermitRequest {
    fn validate(&self) -> Result<(), String> {
        if self.permit_type.trim().is_empty() {
            return Err("permit_type must not be empty".to_string());
        }
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to update a permit's status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PermitStatusRequest {
    /// IN_PROCESS, APPROVED, or REJECTED.
    #[schema(value_type = String)]
    pub status: PermitStatus,
    /// Agency reference number, when known.
    #[serde(default)]
    pub reference: Option<String>,
    /// Who records the update.
    pub actor: String,
}

impl Validate for PermitStatusRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Build the permits router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/operations/{id}/permits",
            post(create_permit).get(list_permits),
        )
        .route(
            "/v1/operations/{id}/permits/{permit_id}/status",
            post(set_status),
        )
        .route(
            "/v1/operations/{id}/permits/{permit_id}",
            axum::routing::delete(delete_permit),
        )
}

/// POST /v1/operations/{id}/permits — Record a permit (IN_PROCESS).
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/permits",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = CreatePermitRequest,
    responses((status = 201, description = "Permit recorded")),
    tag = "permits"
)]
async fn create_permit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<CreatePermitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Permit>), AppError> {
    let req = body.validated()?;
    let permit = state
        .ops
        .create_permit(id.into(), &req.permit_type, &req.actor)?;
    state.persist(id.into()).await;
    Ok((StatusCode::CREATED, Json(permit)))
}

/// GET /v1/operations/{id}/permits — All permits.
#[utoipa::path(
    get,
    path = "/v1/operations/{id}/permits",
    params(("id" = Uuid, Path, description = "Operation ID")),
    responses((status = 200, description = "Permits")),
    tag = "permits"
)]
async fn list_permits(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Permit>>, AppError> {
    Ok(Json(state.ops.permits(id.into())?))
}

/// POST /v1/operations/{id}/permits/{permit_id}/status — Update status.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/permits/{permit_id}/status",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("permit_id" = Uuid, Path, description = "Permit ID"),
    ),
    request_body = PermitStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "permits"
)]
async fn set_status(
    State(state): State<AppState>,
    Path((id, permit_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<PermitStatusRequest>, JsonRejection>,
) -> Result<Json<Permit>, AppError> {
    let req = body.validated()?;
    let permit = state.ops.set_permit_status(
        id.into(),
        permit_id.into(),
        req.status,
        req.reference,
        &req.actor,
    )?;
    state.persist(id.into()).await;
    Ok(Json(permit))
}

/// DELETE /v1/operations/{id}/permits/{permit_id} — Remove a permit.
#[utoipa::path(
    delete,
    path = "/v1/operations/{id}/permits/{permit_id}",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("permit_id" = Uuid, Path, description = "Permit ID"),
        ActorQuery,
    ),
    responses((status = 204, description = "Permit removed")),
    tag = "permits"
)]
async fn delete_permit(
    State(state): State<AppState>,
    Path((id, permit_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ActorQuery>,
) -> Result<StatusCode, AppError> {
    state
        .ops
        .delete_permit(id.into(), permit_id.into(), &query.actor)?;
    state.persist(id.into()).await;
    Ok(StatusCode::NO_CONTENT)
}

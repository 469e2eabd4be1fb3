//! # Operation API
//!
//! Operation intake, queries, status transitions (with the compliance
//! pre-check), the compliance dry-run, inspection channel assignment,
//! and valuation finalization.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use aduana_compliance::{RuleContext, ValidationResult};
use aduana_core::{
    InspectionType, Operation, OperationCategory, OperationStatus, TransportMode,
};
use aduana_state::StatusHistoryRecord;

use crate::error::AppError;
use crate::extractors::{Validate, ValidatedBody};
use crate::routes::ActorQuery;
use crate::state::AppState;

/// Request to create an operation.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOperationRequest {
    /// Unique human-facing reference (e.g. "IMP-2026-00042").
    pub reference: String,
    /// MARITIME, AIR, or LAND.
    #[schema(value_type = String)]
    pub transport_mode: TransportMode,
    /// CATEGORY_1, CATEGORY_2, or CATEGORY_3.
    #[schema(value_type = String)]
    pub category: OperationCategory,
    /// ISO 3166-1 alpha-2 origin country.
    pub origin_country: String,
    /// Who creates the operation.
    pub actor: String,
}

impl Validate for CreateOperationRequest {
    fn validate(&self) -> Result<(), String> {
        if self.reference.trim().is_empty() {
            return Err("reference must not be empty".to_string());
        }
        if self.reference.len() > 64 {
            return Err("reference must not exceed 64 characters".to_string());
        }
        if self.origin_country.len() != 2 || !self.origin_country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err("origin_country must be an ISO 3166-1 alpha-2 code".to_string());
        }
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to change an operation's status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransitionRequest {
    /// The target status.
    #[schema(value_type = String)]
    pub new_status: OperationStatus,
    /// Who requests the transition.
    pub actor: String,
    /// Optional free-form comment for the history row.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Validate for TransitionRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request for a compliance dry run.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ComplianceCheckRequest {
    /// The hypothetical target status.
    #[schema(value_type = String)]
    pub target_status: OperationStatus,
}

impl Validate for ComplianceCheckRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Request to assign the DGA inspection channel.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InspectionRequest {
    /// EXPRESO, VISUAL, or FISICA.
    #[schema(value_type = String)]
    pub inspection_type: InspectionType,
    /// Who records the assignment.
    pub actor: String,
}

impl Validate for InspectionRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request carrying only the acting user.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ActorRequest {
    /// Who performs the action.
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

/// Build the operations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/operations", post(create_operation).get(list_operations))
        .route(
            "/v1/operations/{id}",
            get(get_operation).delete(delete_operation),
        )
        .route("/v1/operations/{id}/history", get(get_history))
        .route(
            "/v1/operations/{id}/transitions",
            get(get_allowed_transitions).post(request_transition),
        )
        .route(
            "/v1/operations/{id}/compliance-check",
            post(compliance_check),
        )
        .route("/v1/operations/{id}/inspection-type", post(set_inspection))
        .route(
            "/v1/operations/{id}/finalize-valuation",
            post(finalize_valuation),
        )
}

/// Run the compliance engine against the operation's current aggregate
/// for a proposed target status.
fn run_compliance(
    state: &AppState,
    id: aduana_core::OperationId,
    target: OperationStatus,
) -> Result<ValidationResult, AppError> {
    let entry = state.ops.snapshot(id)?;
    let declarations: Vec<aduana_core::Declaration> = entry
        .declarations
        .iter()
        .map(|record| record.declaration.clone())
        .collect();
    let ctx = RuleContext {
        operation: &entry.operation,
        documents: &entry.documents,
        declarations: &declarations,
        permits: &entry.permits,
        crossing: entry.crossing.as_ref(),
    };
    Ok(state.engine.validate(state.rules.as_ref(), &ctx, target))
}

/// POST /v1/operations — Create an operation in DRAFT.
#[utoipa::path(
    post,
    path = "/v1/operations",
    request_body = CreateOperationRequest,
    responses(
        (status = 201, description = "Operation created"),
        (status = 409, description = "Duplicate reference", body = crate::error::ErrorBody),
    ),
    tag = "operations"
)]
async fn create_operation(
    State(state): State<AppState>,
    body: Result<Json<CreateOperationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Operation>), AppError> {
    let req = body.validated()?;
    let operation = state.ops.create_operation(
        &req.reference,
        req.transport_mode,
        req.category,
        &req.origin_country,
        &req.actor,
    )?;
    state.persist(operation.id).await;
    Ok((StatusCode::CREATED, Json(operation)))
}

/// GET /v1/operations — List operations, oldest first.
#[utoipa::path(
    get,
    path = "/v1/operations",
    responses((status = 200, description = "All operations")),
    tag = "operations"
)]
async fn list_operations(State(state): State<AppState>) -> Json<Vec<Operation>> {
    Json(state.ops.operations())
}

/// GET /v1/operations/{id} — Fetch one operation.
#[utoipa::path(
    get,
    path = "/v1/operations/{id}",
    params(("id" = Uuid, Path, description = "Operation ID")),
    responses(
        (status = 200, description = "Operation found"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "operations"
)]
async fn get_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Operation>, AppError> {
    Ok(Json(state.ops.operation(id.into())?))
}

/// DELETE /v1/operations/{id} — Delete a DRAFT operation.
#[utoipa::path(
    delete,
    path = "/v1/operations/{id}",
    params(("id" = Uuid, Path, description = "Operation ID"), ActorQuery),
    responses(
        (status = 204, description = "Operation deleted"),
        (status = 409, description = "Not in DRAFT", body = crate::error::ErrorBody),
    ),
    tag = "operations"
)]
async fn delete_operation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ActorQuery>,
) -> Result<StatusCode, AppError> {
    state.ops.delete_operation(id.into(), &query.actor)?;
    state.persist_delete(id.into()).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/operations/{id}/history — Status history, creation first.
#[utoipa::path(
    get,
    path = "/v1/operations/{id}/history",
    params(("id" = Uuid, Path, description = "Operation ID")),
    responses((status = 200, description = "Status history")),
    tag = "operations"
)]
async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusHistoryRecord>>, AppError> {
    Ok(Json(state.ops.history(id.into())?))
}

/// GET /v1/operations/{id}/transitions — Legal next statuses.
#[utoipa::path(
    get,
    path = "/v1/operations/{id}/transitions",
    params(("id" = Uuid, Path, description = "Operation ID")),
    responses((status = 200, description = "Allowed next statuses")),
    tag = "operations"
)]
async fn get_allowed_transitions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<OperationStatus>>, AppError> {
    Ok(Json(state.ops.allowed_transitions_for(id.into())?.to_vec()))
}

/// POST /v1/operations/{id}/transitions — Request a status change.
///
/// Runs the compliance pre-check first; a failing check returns 422
/// with the structured rule-error list and commits nothing.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/transitions",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Transition committed"),
        (status = 409, description = "Illegal transition", body = crate::error::ErrorBody),
        (status = 422, description = "Compliance failure", body = crate::error::ErrorBody),
    ),
    tag = "operations"
)]
async fn request_transition(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<TransitionRequest>, JsonRejection>,
) -> Result<Json<Operation>, AppError> {
    let req = body.validated()?;
    let id = aduana_core::OperationId::from(id);

    let result = run_compliance(&state, id, req.new_status)?;
    if !result.passed {
        metrics::counter!("aduana_compliance_failures_total").increment(1);
        return Err(AppError::ComplianceFailed(result.errors));
    }

    let operation = state
        .ops
        .change_status(id, req.new_status, &req.actor, req.comment)?;
    state.persist(id).await;
    Ok(Json(operation))
}

/// POST /v1/operations/{id}/compliance-check — Dry-run the engine.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/compliance-check",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = ComplianceCheckRequest,
    responses((status = 200, description = "Validation result")),
    tag = "operations"
)]
async fn compliance_check(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<ComplianceCheckRequest>, JsonRejection>,
) -> Result<Json<ValidationResult>, AppError> {
    let req = body.validated()?;
    let result = run_compliance(&state, id.into(), req.target_status)?;
    Ok(Json(result))
}

/// POST /v1/operations/{id}/inspection-type — Assign the DGA channel.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/inspection-type",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = InspectionRequest,
    responses((status = 200, description = "Channel assigned")),
    tag = "operations"
)]
async fn set_inspection(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<InspectionRequest>, JsonRejection>,
) -> Result<Json<Operation>, AppError> {
    let req = body.validated()?;
    let operation = state
        .ops
        .set_inspection_type(id.into(), req.inspection_type, &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(operation))
}

/// POST /v1/operations/{id}/finalize-valuation — Close valuation review.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/finalize-valuation",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Valuation finalized"),
        (status = 409, description = "Not in VALUATION_REVIEW", body = crate::error::ErrorBody),
    ),
    tag = "operations"
)]
async fn finalize_valuation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<Operation>, AppError> {
    let req = body.validated()?;
    let operation = state.ops.finalize_valuation(id.into(), &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(operation))
}

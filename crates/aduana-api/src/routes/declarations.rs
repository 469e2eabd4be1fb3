//! # Declaration API
//!
//! Declaration registration with tariff lines, the approval trail
//! (technical, final, rejection), DGA submission, and the
//! preliquidation recompute.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use aduana_core::{Declaration, DeclarationType};
use aduana_crossing::PreliquidationTotals;
use aduana_ops::{DeclarationDraft, DeclarationRecord, TariffLineDraft};

use crate::error::AppError;
use crate::extractors::{Validate, ValidatedBody};
use crate::state::AppState;

/// One tariff line of a declaration registration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TariffLineInput {
    /// Line number, unique within the declaration.
    pub line_number: u32,
    /// Harmonized tariff code.
    pub tariff_code: String,
    /// Goods description.
    pub description: String,
    pub quantity: Option<Decimal>,
    pub unit_value: Option<Decimal>,
    pub total_value: Option<Decimal>,
    pub tax_rate: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
}

/// Request to register a declaration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterDeclarationRequest {
    /// PRELIMINARY or FINAL.
    #[schema(value_type = String)]
    pub declaration_type: DeclarationType,
    pub fob_value: Option<Decimal>,
    pub freight_value: Option<Decimal>,
    pub insurance_value: Option<Decimal>,
    pub cif_value: Option<Decimal>,
    pub taxable_base: Option<Decimal>,
    pub total_taxes: Option<Decimal>,
    /// Tariff lines.
    #[serde(default)]
    pub lines: Vec<TariffLineInput>,
    /// Who registers the declaration.
    pub actor: String,
}

impl Validate for RegisterDeclarationRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        for line in &self.lines {
            if line.tariff_code.trim().is_empty() {
                return Err(format!(
                    "tariff_code must not be empty (line {})",
                    line.line_number
                ));
            }
        }
        Ok(())
    }
}

impl RegisterDeclarationRequest {
    fn into_draft(self) -> (DeclarationDraft, String) {
        let draft = DeclarationDraft {
            declaration_type: self.declaration_type,
            fob_value: self.fob_value,
            freight_value: self.freight_value,
            insurance_value: self.insurance_value,
            cif_value: self.cif_value,
            taxable_base: self.taxable_base,
            total_taxes: self.total_taxes,
            lines: self
                .lines
                .into_iter()
                .map(|line| TariffLineDraft {
                    line_number: line.line_number,
                    tariff_code: line.tariff_code,
                    description: line.description,
                    quantity: line.quantity,
                    unit_value: line.unit_value,
                    total_value: line.total_value,
                    tax_rate: line.tax_rate,
                    tax_amount: line.tax_amount,
                })
                .collect(),
        };
        (draft, self.actor)
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

/// Request to reject a declaration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RejectRequest {
    /// Who rejects.
    pub actor: String,
    /// Why the declaration is rejected.
    pub reason: String,
}

impl Validate for RejectRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        if self.reason.trim().is_empty() {
            return Err("reason must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to submit a declaration to the DGA.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmitDgaRequest {
    /// Reference number assigned by the DGA.
    pub dga_reference: String,
    /// Who submits.
    pub actor: String,
}

impl Validate for SubmitDgaRequest {
    fn validate(&self) -> Result<(), String> {
        if self.dga_reference.trim().is_empty() {
            return Err("dga_reference must not be empty".to_string());
        }
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Build the declarations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/operations/{id}/declarations",
            post(register_declaration).get(list_declarations),
        )
        .route(
            "/v1/operations/{id}/declarations/{decl_id}/approve-technical",
            post(approve_technical),
        )
        .route(
            "/v1/operations/{id}/declarations/{decl_id}/approve-final",
            post(approve_final),
        )
        .route(
            "/v1/operations/{id}/declarations/{decl_id}/reject",
            post(reject),
        )
        .route(
            "/v1/operations/{id}/declarations/{decl_id}/submit-dga",
            post(submit_dga),
        )
        .route(
            "/v1/operations/{id}/declarations/{decl_id}/preliquidation",
            post(recompute_preliquidation),
        )
}

/// POST /v1/operations/{id}/declarations — Register a declaration.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/declarations",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = RegisterDeclarationRequest,
    responses(
        (status = 201, description = "Declaration registered"),
        (status = 409, description = "Duplicate declaration type or line number", body = crate::error::ErrorBody),
    ),
    tag = "declarations"
)]
async fn register_declaration(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<RegisterDeclarationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Declaration>), AppError> {
    let req = body.validated()?;
    let (draft, actor) = req.into_draft();
    let declaration = state.ops.register_declaration(id.into(), draft, &actor)?;
    state.persist(id.into()).await;
    Ok((StatusCode::CREATED, Json(declaration)))
}

/// GET /v1/operations/{id}/declarations — Declarations with lines.
#[utoipa::path(
    get,
    path = "/v1/operations/{id}/declarations",
    params(("id" = Uuid, Path, description = "Operation ID")),
    responses((status = 200, description = "Declarations with tariff lines")),
    tag = "declarations"
)]
async fn list_declarations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DeclarationRecord>>, AppError> {
    Ok(Json(state.ops.declarations(id.into())?))
}

/// POST …/approve-technical — Grant the technical approval.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/declarations/{decl_id}/approve-technical",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("decl_id" = Uuid, Path, description = "Declaration ID"),
    ),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Technical approval granted"),
        (status = 409, description = "Already approved", body = crate::error::ErrorBody),
    ),
    tag = "declarations"
)]
async fn approve_technical(
    State(state): State<AppState>,
    Path((id, decl_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<Declaration>, AppError> {
    let req = body.validated()?;
    let declaration = state
        .ops
        .approve_technical(id.into(), decl_id.into(), &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(declaration))
}

/// POST …/approve-final — Grant the final approval.
///
/// While the operation sits in `DECLARATION_IN_PROGRESS`, the approval
/// also advances it to `SUBMITTED_TO_CUSTOMS`.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/declarations/{decl_id}/approve-final",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("decl_id" = Uuid, Path, description = "Declaration ID"),
    ),
    request_body = ActorRequest,
    responses(
        (status = 200, description = "Final approval granted"),
        (status = 409, description = "Already approved", body = crate::error::ErrorBody),
    ),
    tag = "declarations"
)]
async fn approve_final(
    State(state): State<AppState>,
    Path((id, decl_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<Declaration>, AppError> {
    let req = body.validated()?;
    let declaration = state
        .ops
        .approve_final(id.into(), decl_id.into(), &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(declaration))
}

/// POST …/reject — Reject the declaration.
///
/// While the operation sits in `PRELIQUIDATION_REVIEW`, the rejection
/// reverts it to `PENDING_CORRECTION` and clears both approvals.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/declarations/{decl_id}/reject",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("decl_id" = Uuid, Path, description = "Declaration ID"),
    ),
    request_body = RejectRequest,
    responses((status = 200, description = "Declaration rejected")),
    tag = "declarations"
)]
async fn reject(
    State(state): State<AppState>,
    Path((id, decl_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<RejectRequest>, JsonRejection>,
) -> Result<Json<Declaration>, AppError> {
    let req = body.validated()?;
    let declaration =
        state
            .ops
            .reject_declaration(id.into(), decl_id.into(), &req.actor, &req.reason)?;
    state.persist(id.into()).await;
    Ok(Json(declaration))
}

/// POST …/submit-dga — Record the DGA submission.
///
/// While the operation sits in `DECLARATION_IN_PROGRESS`, the
/// submission advances it to `SUBMITTED_TO_CUSTOMS`.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/declarations/{decl_id}/submit-dga",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("decl_id" = Uuid, Path, description = "Declaration ID"),
    ),
    request_body = SubmitDgaRequest,
    responses(
        (status = 200, description = "Submission recorded"),
        (status = 409, description = "Already submitted", body = crate::error::ErrorBody),
    ),
    tag = "declarations"
)]
async fn submit_dga(
    State(state): State<AppState>,
    Path((id, decl_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<SubmitDgaRequest>, JsonRejection>,
) -> Result<Json<Declaration>, AppError> {
    let req = body.validated()?;
    let declaration =
        state
            .ops
            .submit_to_dga(id.into(), decl_id.into(), &req.dga_reference, &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(declaration))
}

/// POST …/preliquidation — Recompute totals from the tariff lines and
/// write them back to the declaration header.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/declarations/{decl_id}/preliquidation",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("decl_id" = Uuid, Path, description = "Declaration ID"),
    ),
    request_body = ActorRequest,
    responses((status = 200, description = "Totals recomputed")),
    tag = "declarations"
)]
async fn recompute_preliquidation(
    State(state): State<AppState>,
    Path((id, decl_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<ActorRequest>, JsonRejection>,
) -> Result<Json<PreliquidationTotals>, AppError> {
    let req = body.validated()?;
    let totals = state
        .ops
        .recompute_preliquidation(id.into(), decl_id.into(), &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(totals))
}

//! # Document API
//!
//! Document registration, review status updates, and deactivation
//! (the logical delete).

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use aduana_core::{Document, DocumentStatus, DocumentType};

use crate::error::AppError;
use crate::extractors::{Validate, ValidatedBody};
use crate::routes::ActorQuery;
use crate::state::AppState;

/// Request to register a document.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterDocumentRequest {
    /// BL, COMMERCIAL_INVOICE, PACKING_LIST, CERTIFICATE,
    /// LOCAL_CHARGES_RECEIPT, or OTHER.
    #[schema(value_type = String)]
    pub document_type: DocumentType,
    /// Original file name.
    pub file_name: String,
    /// Who uploads the document.
    pub actor: String,
}

impl Validate for RegisterDocumentRequest {
    fn validate(&self) -> Result<(), String> {
        if self.file_name.trim().is_empty() {
            return Err("file_name must not be empty".to_string());
        }
        if self.file_name.len() > 255 {
            return Err("file_name must not exceed 255 characters".to_string());
        }
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Request to set a document's review status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DocumentStatusRequest {
    /// PENDING, VALIDATED, or REJECTED.
    #[schema(value_type = String)]
    pub status: DocumentStatus,
    /// Who reviews the document.
    pub actor: String,
}

impl Validate for DocumentStatusRequest {
    fn validate(&self) -> Result<(), String> {
        if self.actor.trim().is_empty() {
            return Err("actor must not be empty".to_string());
        }
        Ok(())
    }
}

/// Build the documents router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/operations/{id}/documents",
            post(register_document).get(list_documents),
        )
        .route(
            "/v1/operations/{id}/documents/{doc_id}/status",
            post(set_status),
        )
        .route(
            "/v1/operations/{id}/documents/{doc_id}",
            axum::routing::delete(deactivate),
        )
}

/// POST /v1/operations/{id}/documents — Register a document.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/documents",
    params(("id" = Uuid, Path, description = "Operation ID")),
    request_body = RegisterDocumentRequest,
    responses(
        (status = 201, description = "Document registered"),
        (status = 409, description = "Uploads closed for current status", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn register_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<RegisterDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let req = body.validated()?;
    let document =
        state
            .ops
            .register_document(id.into(), req.document_type, &req.file_name, &req.actor)?;
    state.persist(id.into()).await;
    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /v1/operations/{id}/documents — All documents, active or not.
#[utoipa::path(
    get,
    path = "/v1/operations/{id}/documents",
    params(("id" = Uuid, Path, description = "Operation ID")),
    responses((status = 200, description = "Documents")),
    tag = "documents"
)]
async fn list_documents(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Document>>, AppError> {
    Ok(Json(state.ops.documents(id.into())?))
}

/// POST /v1/operations/{id}/documents/{doc_id}/status — Review verdict.
#[utoipa::path(
    post,
    path = "/v1/operations/{id}/documents/{doc_id}/status",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("doc_id" = Uuid, Path, description = "Document ID"),
    ),
    request_body = DocumentStatusRequest,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "documents"
)]
async fn set_status(
    State(state): State<AppState>,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<DocumentStatusRequest>, JsonRejection>,
) -> Result<Json<Document>, AppError> {
    let req = body.validated()?;
    let document =
        state
            .ops
            .set_document_status(id.into(), doc_id.into(), req.status, &req.actor)?;
    state.persist(id.into()).await;
    Ok(Json(document))
}

/// DELETE /v1/operations/{id}/documents/{doc_id} — Deactivate.
///
/// Documents are never physically deleted; deactivation hides them
/// from compliance rules.
#[utoipa::path(
    delete,
    path = "/v1/operations/{id}/documents/{doc_id}",
    params(
        ("id" = Uuid, Path, description = "Operation ID"),
        ("doc_id" = Uuid, Path, description = "Document ID"),
        ActorQuery,
    ),
    responses((status = 200, description = "Document deactivated")),
    tag = "documents"
)]
async fn deactivate(
    State(state): State<AppState>,
    Path((id, doc_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<ActorQuery>,
) -> Result<Json<Document>, AppError> {
    let document = state
        .ops
        .deactivate_document(id.into(), doc_id.into(), &query.actor)?;
    state.persist(id.into()).await;
    Ok(Json(document))
}

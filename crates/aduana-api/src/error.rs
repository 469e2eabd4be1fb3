//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps the domain error taxonomy to HTTP status codes: illegal
//! transitions and already-in-state guards are 409 CONFLICT, compliance
//! failures are 422 with the structured rule-error list, missing
//! resources are 404. Internal error details are never exposed.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use aduana_compliance::RuleError;
use aduana_ops::OpsError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "COMPLIANCE_FAILED").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional context, present only for client errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type mapped to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed request (unparseable JSON, bad path parameter) (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Request body failed business validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// The compliance pre-check rejected the transition (422, with the
    /// full rule-error list in `details`).
    #[error("compliance check failed with {} error(s)", .0.len())]
    ComplianceFailed(Vec<RuleError>),

    /// Missing or invalid bearer token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict with current resource state (409): illegal transition,
    /// duplicate registration, already-in-state guard.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Logged, not returned to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::ComplianceFailed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "COMPLIANCE_FAILED"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        let details = match &self {
            Self::ComplianceFailed(errors) => serde_json::to_value(errors).ok(),
            _ => None,
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<OpsError> for AppError {
    fn from(err: OpsError) -> Self {
        match err {
            OpsError::OperationNotFound(_)
            | OpsError::DocumentNotFound(_)
            | OpsError::DeclarationNotFound(_)
            | OpsError::PermitNotFound(_)
            | OpsError::CrossingNotFound(_) => Self::NotFound(err.to_string()),
            OpsError::DuplicateReference(_)
            | OpsError::DuplicateDeclaration { .. }
            | OpsError::DuplicateLineNumber { .. }
            | OpsError::NotDeletable { .. }
            | OpsError::UploadsClosed { .. }
            | OpsError::AlreadySubmitted
            | OpsError::AlreadyApproved
            | OpsError::ValuationNotInReview { .. }
            | OpsError::DeclarationMissingForCrossing { .. }
            | OpsError::Transition(_)
            | OpsError::Crossing(_) => Self::Conflict(err.to_string()),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use aduana_core::{OperationId, OperationStatus};
    use aduana_state::TransitionError;

    #[test]
    fn test_domain_errors_map_to_expected_statuses() {
        let not_found: AppError = OpsError::OperationNotFound(OperationId::new()).into();
        assert_eq!(not_found.status_and_code().0, StatusCode::NOT_FOUND);

        let conflict: AppError = OpsError::Transition(TransitionError::InvalidTransition {
            from: OperationStatus::Draft,
            to: OperationStatus::Closed,
        })
        .into();
        assert_eq!(conflict.status_and_code().0, StatusCode::CONFLICT);

        let guard: AppError = OpsError::AlreadySubmitted.into();
        assert_eq!(guard.status_and_code().0, StatusCode::CONFLICT);
    }

    #[test]
    fn test_compliance_failure_carries_the_rule_errors() {
        let err = AppError::ComplianceFailed(vec![RuleError::new(
            "DOC_COMPLETENESS",
            "MISSING_DOC_BL",
            "no active BL document",
        )]);
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "COMPLIANCE_FAILED");
    }
}

//! # Request Body Validation
//!
//! Handlers take their JSON body as `Result<Json<T>, JsonRejection>`
//! and call [`ValidatedBody::validated`] on it, which maps rejections
//! to [`AppError::BadRequest`] and runs the DTO's [`Validate`] impl.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Business-rule validation for request payloads, beyond what serde
/// deserialization checks.
pub trait Validate {
    /// Validate business rules. Returns an error message on failure.
    fn validate(&self) -> Result<(), String>;
}

/// Unwraps a handler's JSON body argument into the validated payload.
pub trait ValidatedBody<T> {
    /// The payload, or the request error it maps to.
    fn validated(self) -> Result<T, AppError>;
}

impl<T: Validate> ValidatedBody<T> for Result<Json<T>, JsonRejection> {
    fn validated(self) -> Result<T, AppError> {
        let Json(payload) = self?;
        payload.validate().map_err(AppError::Validation)?;
        Ok(payload)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

//! # Authentication Middleware
//!
//! Bearer token middleware. When `ADUANA_AUTH_TOKEN` is configured,
//! every request under the middleware must carry
//! `Authorization: Bearer <token>`; tokens are compared in constant
//! time. When no token is configured the API is open (development
//! mode) and the middleware is a no-op.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// Axum middleware enforcing the configured bearer token.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = &state.config.auth_token else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token.as_bytes().ct_eq(expected.as_bytes()).into() => {
            next.run(request).await
        }
        Some(_) => AppError::Unauthorized("invalid bearer token".to_string()).into_response(),
        None => {
            AppError::Unauthorized("missing Authorization bearer header".to_string())
                .into_response()
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

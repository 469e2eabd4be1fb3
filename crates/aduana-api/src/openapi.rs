//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the Bearer token security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Bearer token authentication. Set via ADUANA_AUTH_TOKEN env var.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Aduana API — Customs Operation Lifecycle",
        version = "0.1.0",
        description = "Axum API services for the Aduana Stack: customs brokerage operation lifecycle and compliance.\n\nProvides:\n- **Operation lifecycle** across the fourteen-status customs state machine, with full status history\n- **Compliance engine** pre-checks on every requested transition, plus a dry-run endpoint and per-rule runtime configuration\n- **Document registry** with type-scoped versioning and review workflow\n- **Declarations** (preliminary ANTICIPADO and final DEFINITIVO) with tariff lines, approval workflow, DGA submission, and preliquidation totals\n- **Permits** tied to operations, gating release while pending\n- **Declaration crossing** comparing preliminary against final values line by line, with discrepancy resolution\n\nAuthentication: Bearer token via `Authorization: Bearer <token>` header.\nAll `/v1/*` endpoints require authentication when a token is configured. Health probes (`/health/*`) are unauthenticated.",
        license(name = "BUSL-1.1"),
        contact(name = "Momentum", url = "https://momentum.inc")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        // ── Operations ──────────────────────────────────────────────────
        crate::routes::operations::create_operation,
        crate::routes::operations::list_operations,
        crate::routes::operations::get_operation,
        crate::routes::operations::delete_operation,
        crate::routes::operations::get_history,
        crate::routes::operations::get_allowed_transitions,
        crate::routes::operations::request_transition,
        crate::routes::operations::compliance_check,
        crate::routes::operations::set_inspection,
        crate::routes::operations::finalize_valuation,
        // ── Documents ───────────────────────────────────────────────────
        crate::routes::documents::register_document,
        crate::routes::documents::list_documents,
        crate::routes::documents::set_status,
        crate::routes::documents::deactivate,
        // ── Declarations ────────────────────────────────────────────────
        crate::routes::declarations::register_declaration,
        crate::routes::declarations::list_declarations,
        crate::routes::declarations::approve_technical,
        crate::routes::declarations::approve_final,
        crate::routes::declarations::reject,
        crate::routes::declarations::submit_dga,
        crate::routes::declarations::recompute_preliquidation,
        // ── Permits ─────────────────────────────────────────────────────
        crate::routes::permits::create_permit,
        crate::routes::permits::list_permits,
        crate::routes::permits::set_status,
        crate::routes::permits::delete_permit,
        // ── Crossing ────────────────────────────────────────────────────
        crate::routes::crossing::execute,
        crate::routes::crossing::resolve,
        crate::routes::crossing::get_result,
        // ── Compliance rule configuration ───────────────────────────────
        crate::routes::compliance::list_rules,
        crate::routes::compliance::update_rule,
    ),
    components(
        schemas(
            // ── Error types ─────────────────────────────────────────────
            crate::error::ErrorBody,
            crate::error::ErrorDetail,
            // ── Operation DTOs ──────────────────────────────────────────
            crate::routes::operations::CreateOperationRequest,
            crate::routes::operations::TransitionRequest,
            crate::routes::operations::ComplianceCheckRequest,
            crate::routes::operations::InspectionRequest,
            crate::routes::operations::ActorRequest,
            // ── Document DTOs ───────────────────────────────────────────
            crate::routes::documents::RegisterDocumentRequest,
            crate::routes::documents::DocumentStatusRequest,
            // ── Declaration DTOs ────────────────────────────────────────
            crate::routes::declarations::RegisterDeclarationRequest,
            crate::routes::declarations::TariffLineInput,
            crate::routes::declarations::RejectRequest,
            crate::routes::declarations::SubmitDgaRequest,
            // ── Permit DTOs ─────────────────────────────────────────────
            crate::routes::permits::CreatePermitRequest,
            crate::routes::permits::PermitStatusRequest,
            // ── Crossing DTOs ───────────────────────────────────────────
            crate::routes::crossing::ResolveRequest,
            // ── Compliance DTOs ─────────────────────────────────────────
            crate::routes::compliance::RuleConfigView,
            crate::routes::compliance::UpdateRuleRequest,
        ),
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "operations", description = "Operation lifecycle — intake, status transitions, history, inspection channel, valuation"),
        (name = "documents", description = "Document registry — type-scoped versioning and review workflow"),
        (name = "declarations", description = "Customs declarations — tariff lines, approvals, DGA submission, preliquidation"),
        (name = "permits", description = "Permits tied to operations, gating release while pending"),
        (name = "crossing", description = "Declaration crossing — preliminary vs. final comparison and discrepancy resolution"),
        (name = "compliance", description = "Compliance rule configuration — per-rule enable flags and parameters"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

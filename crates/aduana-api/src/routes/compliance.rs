//! # Rule Configuration API
//!
//! Lists the rule catalogue with its effective enable flags and
//! parameters, and updates one rule's configuration. Updates replace
//! the rule's parameter set wholesale.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{Validate, ValidatedBody};
use crate::state::AppState;

/// One rule's effective configuration.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RuleConfigView {
    /// Stable rule code.
    pub code: String,
    /// Whether the rule currently runs.
    pub enabled: bool,
    /// Configured parameters (empty for built-in defaults).
    pub params: HashMap<String, String>,
}

/// Request to reconfigure one rule.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRuleRequest {
    /// Enable or disable the rule.
    pub enabled: bool,
    /// Replacement parameter set. Omitted keys are cleared.
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl Validate for UpdateRuleRequest {
    fn validate(&self) -> Result<(), String> {
        for (key, value) in &self.params {
            if key.trim().is_empty() {
                return Err("parameter keys must not be empty".to_string());
            }
            if value.len() > 1024 {
                return Err(format!("parameter '{key}' exceeds 1024 characters"));
            }
        }
        Ok(())
    }
}

/// Build the compliance configuration router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/compliance/rules", get(list_rules))
        .route("/v1/compliance/rules/{code}", put(update_rule))
}

/// GET /v1/compliance/rules — The catalogue with effective config.
#[utoipa::path(
    get,
    path = "/v1/compliance/rules",
    responses((status = 200, description = "Rule catalogue", body = [RuleConfigView])),
    tag = "compliance"
)]
async fn list_rules(State(state): State<AppState>) -> Json<Vec<RuleConfigView>> {
    let flags = state.rules.enabled_flags();
    let views = state
        .engine
        .rule_codes()
        .into_iter()
        .map(|code| RuleConfigView {
            code: code.to_string(),
            enabled: flags.get(code).copied().unwrap_or(true),
            params: state.rules.params_for(code),
        })
        .collect();
    Json(views)
}

/// PUT /v1/compliance/rules/{code} — Replace one rule's configuration.
#[utoipa::path(
    put,
    path = "/v1/compliance/rules/{code}",
    params(("code" = String, Path, description = "Rule code")),
    request_body = UpdateRuleRequest,
    responses(
        (status = 200, description = "Rule reconfigured", body = RuleConfigView),
        (status = 404, description = "Unknown rule code", body = crate::error::ErrorBody),
    ),
    tag = "compliance"
)]
async fn update_rule(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Result<Json<UpdateRuleRequest>, JsonRejection>,
) -> Result<Json<RuleConfigView>, AppError> {
    let req = body.validated()?;
    if !state.engine.rule_codes().contains(&code.as_str()) {
        return Err(AppError::NotFound(format!("unknown rule code '{code}'")));
    }

    state.rules.set_enabled(&code, req.enabled);
    for key in state.rules.params_for(&code).keys() {
        if !req.params.contains_key(key) {
            state.rules.clear_value(&code, key);
        }
    }
    for (key, value) in &req.params {
        state.rules.set_value(&code, key, value);
    }
    state.persist_rules().await;

    tracing::info!(rule = %code, enabled = req.enabled, "compliance rule reconfigured");
    Ok(Json(RuleConfigView {
        enabled: req.enabled,
        params: state.rules.params_for(&code),
        code,
    }))
}

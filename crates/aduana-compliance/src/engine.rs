//! # Compliance Engine
//!
//! Runs the full rule catalogue against a proposed transition and
//! aggregates the errors. Each rule runs at most once per validation
//! and is deterministic over the snapshot; no ordering is guaranteed
//! among independent rules' errors.

use serde::{Deserialize, Serialize};

use aduana_core::{OperationCategory, OperationStatus, TransportMode};

use crate::config::RuleConfigStore;
use crate::context::RuleContext;
use crate::rules::builtin_rules;

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleError {
    /// The rule that raised the error.
    pub rule_code: String,
    /// Machine-readable error code (e.g. `MISSING_DOC_BL`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl RuleError {
    /// Build a rule error.
    pub fn new(rule_code: &str, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule_code: rule_code.to_string(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Aggregate outcome of a compliance run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` iff no applicable enabled rule raised an error.
    pub passed: bool,
    /// All errors, concatenated across rules.
    pub errors: Vec<RuleError>,
}

/// One business constraint: an applicability predicate plus a read-only
/// validator.
///
/// Rules never mutate; they only read the [`RuleContext`] snapshot and
/// their configuration. A rule that does not apply to a transition is
/// inert for it.
pub trait ComplianceRule: Send + Sync {
    /// Stable rule code, used for configuration and error attribution.
    fn code(&self) -> &'static str;

    /// Whether this rule gates the proposed transition.
    fn applies_to(
        &self,
        from: OperationStatus,
        to: OperationStatus,
        transport: TransportMode,
        category: OperationCategory,
    ) -> bool;

    /// Validate the snapshot; return all violations.
    fn validate(&self, ctx: &RuleContext<'_>, config: &dyn RuleConfigStore) -> Vec<RuleError>;
}

/// The compliance validation engine over a fixed rule catalogue.
pub struct ComplianceEngine {
    rules: Vec<Box<dyn ComplianceRule>>,
}

impl ComplianceEngine {
    /// Build the engine with the full built-in rule catalogue.
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Build the engine with an explicit rule list (tests).
    pub fn with_rules(rules: Vec<Box<dyn ComplianceRule>>) -> Self {
        Self { rules }
    }

    /// The codes of all registered rules, in registration order.
    pub fn rule_codes(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.code()).collect()
    }

    /// All registered rules, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &dyn ComplianceRule> {
        self.rules.iter().map(|rule| rule.as_ref())
    }

    /// Validate a proposed transition of `ctx.operation` to `target`.
    ///
    /// Iterates every registered rule once: skips rules explicitly
    /// disabled in `config`, filters by `applies_to`, and concatenates
    /// the errors of the rules that apply. `passed == errors.is_empty()`.
    pub fn validate(
        &self,
        config: &dyn RuleConfigStore,
        ctx: &RuleContext<'_>,
        target: OperationStatus,
    ) -> ValidationResult {
        let from = ctx.operation.status;
        let mut errors = Vec::new();

        for rule in &self.rules {
            if !config.is_enabled(rule.code()) {
                tracing::debug!(rule = rule.code(), "rule disabled by configuration; skipping");
                continue;
            }
            if !rule.applies_to(from, target, ctx.operation.transport_mode, ctx.operation.category)
            {
                continue;
            }
            let mut rule_errors = rule.validate(ctx, config);
            if !rule_errors.is_empty() {
                tracing::debug!(
                    rule = rule.code(),
                    errors = rule_errors.len(),
                    operation = %ctx.operation.id,
                    %target,
                    "compliance rule failed"
                );
            }
            errors.append(&mut rule_errors);
        }

        ValidationResult {
            passed: errors.is_empty(),
            errors,
        }
    }
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

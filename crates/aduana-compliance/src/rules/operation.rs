//! # Operation-Level Rules
//!
//! Rules over facts carried on the operation itself or its satellites:
//! origin country, inspection channel assignment, the declaration
//! crossing result, and external permits.

use aduana_core::{OperationCategory, OperationStatus, TransportMode};
use aduana_crossing::CrossingStatus;

use std::collections::BTreeSet;

use crate::config::{set_param, RuleConfigStore};
use crate::context::RuleContext;
use crate::engine::{ComplianceRule, RuleError};

// ─── RESTRICTED_COUNTRY ──────────────────────────────────────────────

/// Default embargo list, overridable per deployment via the
/// `restricted_countries` rule parameter (comma-separated ISO 3166-1
/// alpha-2 codes).
const DEFAULT_RESTRICTED: [&str; 5] = ["CU", "KP", "IR", "SY", "VE"];

/// Operations originating in a restricted country cannot advance past
/// the documentation or declaration milestones.
pub struct RestrictedCountry;

impl RestrictedCountry {
    fn restricted_set(config: &dyn RuleConfigStore, code: &str) -> BTreeSet<String> {
        set_param(config, code, "restricted_countries")
            .unwrap_or_else(|| DEFAULT_RESTRICTED.iter().map(|c| c.to_string()).collect())
    }
}

impl ComplianceRule for RestrictedCountry {
    fn code(&self) -> &'static str {
        "RESTRICTED_COUNTRY"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        matches!(
            to,
            OperationStatus::DocumentationComplete | OperationStatus::DeclarationInProgress
        )
    }

    fn validate(&self, ctx: &RuleContext<'_>, config: &dyn RuleConfigStore) -> Vec<RuleError> {
        let restricted = Self::restricted_set(config, self.code());
        let origin = ctx.operation.origin_country.to_uppercase();
        if restricted.contains(&origin) {
            vec![RuleError::new(
                self.code(),
                "RESTRICTED_ORIGIN_COUNTRY",
                format!("origin country {origin} is on the restricted list"),
            )]
        } else {
            vec![]
        }
    }
}

// ─── INSPECTION_TYPE_REQUIRED ────────────────────────────────────────

/// Customs must have assigned an inspection channel before the
/// operation enters valuation review.
pub struct InspectionTypeRequired;

impl ComplianceRule for InspectionTypeRequired {
    fn code(&self) -> &'static str {
        "INSPECTION_TYPE_REQUIRED"
    }

    fn applies_to(
        &self,
        from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        from == OperationStatus::SubmittedToCustoms && to == OperationStatus::ValuationReview
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        if ctx.operation.inspection_type.is_some() {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "INSPECTION_TYPE_MISSING",
                "customs has not assigned an inspection channel",
            )]
        }
    }
}

// ─── CROSSING_RESOLVED ───────────────────────────────────────────────

/// An unresolved declaration crossing discrepancy blocks valuation
/// review. A missing crossing result does not block here; the crossing
/// gate for execution lives on the submission path.
pub struct CrossingResolved;

impl ComplianceRule for CrossingResolved {
    fn code(&self) -> &'static str {
        "CROSSING_RESOLVED"
    }

    fn applies_to(
        &self,
        from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        from == OperationStatus::SubmittedToCustoms && to == OperationStatus::ValuationReview
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        match ctx.crossing {
            Some(crossing) if crossing.status == CrossingStatus::Discrepancy => {
                vec![RuleError::new(
                    self.code(),
                    "CROSSING_UNRESOLVED",
                    format!(
                        "declaration crossing has {} unresolved discrepancies",
                        crossing.discrepancies.len()
                    ),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── PERMITS_CLEARED ─────────────────────────────────────────────────

/// Payment preparation cannot begin while any external permit is still
/// in process.
pub struct PermitsCleared;

impl ComplianceRule for PermitsCleared {
    fn code(&self) -> &'static str {
        "PERMITS_CLEARED"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        to == OperationStatus::PaymentPreparation
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        let blocking: Vec<&str> = ctx
            .permits
            .iter()
            .filter(|permit| permit.status.is_blocking())
            .map(|permit| permit.permit_type.as_str())
            .collect();
        if blocking.is_empty() {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "PERMITS_IN_PROCESS",
                format!("permits still in process: {}", blocking.join(", ")),
            )]
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InMemoryRuleConfigStore;
    use aduana_core::{Operation, Permit, PermitStatus};
    use aduana_crossing::CrossingResult;

    fn operation(origin: &str) -> Operation {
        Operation::new(
            "IMP-2026-00030",
            TransportMode::Land,
            OperationCategory::Category2,
            origin,
        )
    }

    fn ctx<'a>(
        op: &'a Operation,
        permits: &'a [Permit],
        crossing: Option<&'a CrossingResult>,
    ) -> RuleContext<'a> {
        RuleContext {
            operation: op,
            documents: &[],
            declarations: &[],
            permits,
            crossing,
        }
    }

    // ── restricted country ──

    #[test]
    fn test_default_embargo_list_blocks_and_is_case_insensitive() {
        let config = InMemoryRuleConfigStore::new();
        let op = operation("kp");
        let errors = RestrictedCountry.validate(&ctx(&op, &[], None), &config);
        assert_eq!(errors[0].code, "RESTRICTED_ORIGIN_COUNTRY");

        let op = operation("BR");
        assert!(RestrictedCountry
            .validate(&ctx(&op, &[], None), &config)
            .is_empty());
    }

    #[test]
    fn test_restricted_list_is_replaced_not_merged_by_the_param() {
        let config = InMemoryRuleConfigStore::new();
        config.set_value("RESTRICTED_COUNTRY", "restricted_countries", "xx, yy");

        // Default entries no longer apply once the param is set.
        let op = operation("CU");
        assert!(RestrictedCountry
            .validate(&ctx(&op, &[], None), &config)
            .is_empty());

        let op = operation("XX");
        assert_eq!(
            RestrictedCountry.validate(&ctx(&op, &[], None), &config)[0].code,
            "RESTRICTED_ORIGIN_COUNTRY"
        );
    }

    #[test]
    fn test_restricted_country_gates_both_milestones() {
        for target in [
            OperationStatus::DocumentationComplete,
            OperationStatus::DeclarationInProgress,
        ] {
            assert!(RestrictedCountry.applies_to(
                OperationStatus::Draft,
                target,
                TransportMode::Air,
                OperationCategory::Category1,
            ));
        }
        assert!(!RestrictedCountry.applies_to(
            OperationStatus::Draft,
            OperationStatus::Cancelled,
            TransportMode::Air,
            OperationCategory::Category1,
        ));
    }

    // ── inspection channel ──

    #[test]
    fn test_inspection_channel_must_be_assigned_before_valuation() {
        let config = InMemoryRuleConfigStore::new();
        let mut op = operation("BR");
        assert_eq!(
            InspectionTypeRequired.validate(&ctx(&op, &[], None), &config)[0].code,
            "INSPECTION_TYPE_MISSING"
        );

        op.inspection_type = Some(aduana_core::InspectionType::Expreso);
        assert!(InspectionTypeRequired
            .validate(&ctx(&op, &[], None), &config)
            .is_empty());
    }

    // ── crossing ──

    #[test]
    fn test_unresolved_discrepancy_blocks_valuation_review() {
        let config = InMemoryRuleConfigStore::new();
        let op = operation("BR");

        let crossing = CrossingResult::executed(op.id, vec![], "analyst");
        assert_eq!(crossing.status, CrossingStatus::Match);
        assert!(CrossingResolved
            .validate(&ctx(&op, &[], Some(&crossing)), &config)
            .is_empty());
    }

    #[test]
    fn test_missing_crossing_result_does_not_block_here() {
        let config = InMemoryRuleConfigStore::new();
        let op = operation("BR");
        assert!(CrossingResolved
            .validate(&ctx(&op, &[], None), &config)
            .is_empty());
    }

    // ── permits ──

    #[test]
    fn test_any_in_process_permit_blocks_payment_preparation() {
        let config = InMemoryRuleConfigStore::new();
        let op = operation("BR");

        let mut senasa = Permit::new(op.id, "SENASA");
        let errors = PermitsCleared.validate(&ctx(&op, std::slice::from_ref(&senasa), None), &config);
        assert_eq!(errors[0].code, "PERMITS_IN_PROCESS");
        assert!(errors[0].message.contains("SENASA"));

        senasa.status = PermitStatus::Approved;
        assert!(PermitsCleared
            .validate(&ctx(&op, std::slice::from_ref(&senasa), None), &config)
            .is_empty());
    }

    #[test]
    fn test_rejected_permits_do_not_block() {
        let config = InMemoryRuleConfigStore::new();
        let op = operation("BR");
        let mut permit = Permit::new(op.id, "ANMAT");
        permit.status = PermitStatus::Rejected;
        assert!(PermitsCleared
            .validate(&ctx(&op, std::slice::from_ref(&permit), None), &config)
            .is_empty());
    }
}

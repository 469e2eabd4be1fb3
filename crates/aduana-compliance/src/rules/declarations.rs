//! # Declaration-State Rules
//!
//! Rules that gate transitions on the approval trail and GATT form
//! state of the operation's declarations.

use aduana_core::{OperationCategory, OperationStatus, TransportMode};

use crate::config::RuleConfigStore;
use crate::context::RuleContext;
use crate::engine::{ComplianceRule, RuleError};

// ─── PRELIQ_APPROVED ─────────────────────────────────────────────────

/// Leaving preliquidation review for analyst assignment requires a
/// declaration with both a technical and a final approval.
pub struct PreliqApproved;

impl ComplianceRule for PreliqApproved {
    fn code(&self) -> &'static str {
        "PRELIQ_APPROVED"
    }

    fn applies_to(
        &self,
        from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        from == OperationStatus::PreliquidationReview && to == OperationStatus::AnalystAssigned
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        let approved = ctx
            .declarations
            .iter()
            .any(|decl| decl.has_technical_approval() && decl.has_final_approval());
        if approved {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "PRELIQUIDATION_NOT_APPROVED",
                "no declaration carries both technical and final approval",
            )]
        }
    }
}

// ─── FINAL_APPROVAL_REQUIRED ─────────────────────────────────────────

/// Submission to customs requires at least one finally approved
/// declaration.
pub struct FinalApprovalRequired;

impl ComplianceRule for FinalApprovalRequired {
    fn code(&self) -> &'static str {
        "FINAL_APPROVAL_REQUIRED"
    }

    fn applies_to(
        &self,
        from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        from == OperationStatus::DeclarationInProgress && to == OperationStatus::SubmittedToCustoms
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        if ctx.declarations.iter().any(|decl| decl.has_final_approval()) {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "FINAL_APPROVAL_MISSING",
                "no declaration carries a final approval",
            )]
        }
    }
}

// ─── GATT_FORM_REQUIRED ──────────────────────────────────────────────

/// Visual and physical inspection channels require a completed GATT
/// Article 1 valuation form before payment preparation.
pub struct GattFormRequired;

impl ComplianceRule for GattFormRequired {
    fn code(&self) -> &'static str {
        "GATT_FORM_REQUIRED"
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
        let gated_channel = ctx
            .operation
            .inspection_type
            .is_some_and(|inspection| inspection.requires_gatt_form());
        if !gated_channel {
            return vec![];
        }
        if ctx.declarations.iter().any(|decl| decl.gatt_form_completed) {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "GATT_FORM_INCOMPLETE",
                "inspection channel requires a completed GATT Article 1 form",
            )]
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InMemoryRuleConfigStore;
    use aduana_core::{Declaration, DeclarationType, InspectionType, Operation};
    use chrono::Utc;

    fn operation() -> Operation {
        Operation::new(
            "IMP-2026-00020",
            TransportMode::Air,
            OperationCategory::Category1,
            "BR",
        )
    }

    fn ctx<'a>(op: &'a Operation, declarations: &'a [Declaration]) -> RuleContext<'a> {
        RuleContext {
            operation: op,
            documents: &[],
            declarations,
            permits: &[],
            crossing: None,
        }
    }

    #[test]
    fn test_preliq_requires_both_approvals_on_one_declaration() {
        let op = operation();
        let config = InMemoryRuleConfigStore::new();
        let mut decl = Declaration::new(op.id, DeclarationType::Preliminary);
        decl.technical_approved_by = Some("tech".to_string());
        decl.technical_approved_at = Some(Utc::now());

        // Technical only: not enough.
        let decls = [decl.clone()];
        assert_eq!(
            PreliqApproved.validate(&ctx(&op, &decls), &config)[0].code,
            "PRELIQUIDATION_NOT_APPROVED"
        );

        decl.final_approved_by = Some("chief".to_string());
        decl.final_approved_at = Some(Utc::now());
        let decls = [decl];
        assert!(PreliqApproved.validate(&ctx(&op, &decls), &config).is_empty());
    }

    #[test]
    fn test_final_approval_required_for_submission() {
        let op = operation();
        let config = InMemoryRuleConfigStore::new();
        assert_eq!(
            FinalApprovalRequired.validate(&ctx(&op, &[]), &config)[0].code,
            "FINAL_APPROVAL_MISSING"
        );
    }

    #[test]
    fn test_gatt_form_not_required_for_expreso() {
        let mut op = operation();
        op.inspection_type = Some(InspectionType::Expreso);
        let config = InMemoryRuleConfigStore::new();
        assert!(GattFormRequired.validate(&ctx(&op, &[]), &config).is_empty());
    }

    #[test]
    fn test_gatt_form_required_for_visual_and_fisica() {
        let config = InMemoryRuleConfigStore::new();
        for channel in [InspectionType::Visual, InspectionType::Fisica] {
            let mut op = operation();
            op.inspection_type = Some(channel);
            assert_eq!(
                GattFormRequired.validate(&ctx(&op, &[]), &config)[0].code,
                "GATT_FORM_INCOMPLETE"
            );

            let mut decl = Declaration::new(op.id, DeclarationType::Final);
            decl.gatt_form_completed = true;
            let decls = [decl];
            assert!(GattFormRequired.validate(&ctx(&op, &decls), &config).is_empty());
        }
    }

    #[test]
    fn test_gatt_form_inert_when_inspection_unset() {
        let op = operation();
        let config = InMemoryRuleConfigStore::new();
        assert!(GattFormRequired.validate(&ctx(&op, &[]), &config).is_empty());
    }
}

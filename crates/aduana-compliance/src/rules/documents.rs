//! # Document-State Rules
//!
//! Rules that gate transitions on the presence, validation status, or
//! availability of the operation's documents.

use aduana_core::{
    DocumentStatus, DocumentType, OperationCategory, OperationStatus, TransportMode,
    MANDATORY_DOCUMENT_TYPES,
};

use crate::config::RuleConfigStore;
use crate::context::RuleContext;
use crate::engine::{ComplianceRule, RuleError};

/// Target statuses for which the original bill of lading must be on
/// hand: the whole downstream pipeline from preliquidation review to
/// closure.
const BL_ORIGINAL_TARGETS: [OperationStatus; 9] = [
    OperationStatus::PreliquidationReview,
    OperationStatus::AnalystAssigned,
    OperationStatus::DeclarationInProgress,
    OperationStatus::SubmittedToCustoms,
    OperationStatus::ValuationReview,
    OperationStatus::PendingExternalApproval,
    OperationStatus::PaymentPreparation,
    OperationStatus::InTransit,
    OperationStatus::Closed,
];

// ─── DOC_COMPLETENESS ────────────────────────────────────────────────

/// Every mandatory document type needs at least one active document
/// before the file can reach `DOCUMENTATION_COMPLETE`.
pub struct DocCompleteness;

impl ComplianceRule for DocCompleteness {
    fn code(&self) -> &'static str {
        "DOC_COMPLETENESS"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        to == OperationStatus::DocumentationComplete
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        MANDATORY_DOCUMENT_TYPES
            .iter()
            .filter(|required| !ctx.has_active(**required))
            .map(|missing| {
                RuleError::new(
                    self.code(),
                    format!("MISSING_DOC_{missing}"),
                    format!("no active {missing} document registered"),
                )
            })
            .collect()
    }
}

// ─── BL_VALIDATED_FOR_VALUATION ──────────────────────────────────────

/// At least one active BL must be VALIDATED before valuation review.
pub struct BlValidatedForValuation;

impl ComplianceRule for BlValidatedForValuation {
    fn code(&self) -> &'static str {
        "BL_VALIDATED_FOR_VALUATION"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        to == OperationStatus::ValuationReview
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        if ctx.has_active_validated(DocumentType::Bl) {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "BL_NOT_VALIDATED",
                "no active validated bill of lading",
            )]
        }
    }
}

// ─── BL_ORIGINAL_AVAILABLE ───────────────────────────────────────────

/// The original (paper) bill of lading must be on hand for every
/// downstream target from preliquidation review through closure.
pub struct BlOriginalAvailable;

impl ComplianceRule for BlOriginalAvailable {
    fn code(&self) -> &'static str {
        "BL_ORIGINAL_AVAILABLE"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        BL_ORIGINAL_TARGETS.contains(&to)
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        if ctx.operation.original_bl_available {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "BL_ORIGINAL_REQUIRED",
                "original bill of lading is not available",
            )]
        }
    }
}

// ─── INVOICE_VALIDATED ───────────────────────────────────────────────

/// CATEGORY_1 operations need a validated commercial invoice before
/// declaration preparation starts.
pub struct InvoiceValidated;

impl ComplianceRule for InvoiceValidated {
    fn code(&self) -> &'static str {
        "INVOICE_VALIDATED"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        category: OperationCategory,
    ) -> bool {
        to == OperationStatus::DeclarationInProgress && category == OperationCategory::Category1
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        if ctx.has_active_validated(DocumentType::CommercialInvoice) {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "INVOICE_NOT_VALIDATED",
                "no active validated commercial invoice",
            )]
        }
    }
}

// ─── HIGH_VALUE_CERT ─────────────────────────────────────────────────

/// Maritime cargo needs a certificate document at documentation
/// completion.
pub struct HighValueCert;

impl ComplianceRule for HighValueCert {
    fn code(&self) -> &'static str {
        "HIGH_VALUE_CERT"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        to == OperationStatus::DocumentationComplete && transport == TransportMode::Maritime
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        if ctx.has_active(DocumentType::Certificate) {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "HIGH_VALUE_CERT_REQUIRED",
                "maritime operations require a certificate document",
            )]
        }
    }
}

// ─── PHYSICAL_INSPECTION_DOCS ────────────────────────────────────────

/// CATEGORY_3 operations must have every active document validated
/// before valuation review.
pub struct PhysicalInspectionDocs;

impl ComplianceRule for PhysicalInspectionDocs {
    fn code(&self) -> &'static str {
        "PHYSICAL_INSPECTION_DOCS"
    }

    fn applies_to(
        &self,
        _from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        category: OperationCategory,
    ) -> bool {
        to == OperationStatus::ValuationReview && category == OperationCategory::Category3
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        let all_validated = ctx
            .active_documents()
            .all(|doc| doc.status == DocumentStatus::Validated);
        if all_validated {
            vec![]
        } else {
            vec![RuleError::new(
                self.code(),
                "DOCS_NOT_ALL_VALIDATED",
                "every active document must be validated for CATEGORY_3",
            )]
        }
    }
}

// ─── INTERNAL_REVIEW_COMPLETE ────────────────────────────────────────

/// Leaving internal review for preliquidation review requires full
/// document completeness and the original BL on hand.
pub struct InternalReviewComplete;

impl ComplianceRule for InternalReviewComplete {
    fn code(&self) -> &'static str {
        "INTERNAL_REVIEW_COMPLETE"
    }

    fn applies_to(
        &self,
        from: OperationStatus,
        to: OperationStatus,
        _transport: TransportMode,
        _category: OperationCategory,
    ) -> bool {
        from == OperationStatus::InReview && to == OperationStatus::PreliquidationReview
    }

    fn validate(&self, ctx: &RuleContext<'_>, _config: &dyn RuleConfigStore) -> Vec<RuleError> {
        let mut errors = Vec::new();
        if !ctx.mandatory_documents_complete() {
            errors.push(RuleError::new(
                self.code(),
                "REVIEW_DOCS_INCOMPLETE",
                "document completeness must be 100% before preliquidation review",
            ));
        }
        if !ctx.operation.original_bl_available {
            errors.push(RuleError::new(
                self.code(),
                "REVIEW_BL_ORIGINAL_MISSING",
                "original bill of lading must be available before preliquidation review",
            ));
        }
        errors
    }
}

// ─── LOCAL_CHARGES_VALIDATED ─────────────────────────────────────────

/// If a local-charges receipt was uploaded, the charges must have been
/// validated before payment preparation.
pub struct LocalChargesValidated;

impl ComplianceRule for LocalChargesValidated {
    fn code(&self) -> &'static str {
        "LOCAL_CHARGES_VALIDATED"
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
        let has_receipt = ctx.has_active(DocumentType::LocalChargesReceipt);
        if has_receipt && !ctx.operation.local_charges_validated {
            vec![RuleError::new(
                self.code(),
                "LOCAL_CHARGES_NOT_VALIDATED",
                "local charges receipt uploaded but charges not validated",
            )]
        } else {
            vec![]
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

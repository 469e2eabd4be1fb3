//! # Rule Catalogue
//!
//! The closed set of compliance rules, grouped by what they read:
//! document state, declaration state, or operation-level facts
//! (origin country, inspection channel, permits, crossing).
//!
//! `builtin_rules()` is the single registration point — the engine is
//! built from this list at startup and nothing is discovered at
//! runtime.

pub mod declarations;
pub mod documents;
pub mod operation;

use crate::engine::ComplianceRule;

/// Construct the full built-in rule catalogue.
pub fn builtin_rules() -> Vec<Box<dyn ComplianceRule>> {
    vec![
        // Document-state rules.
        Box::new(documents::DocCompleteness),
        Box::new(documents::BlValidatedForValuation),
        Box::new(documents::BlOriginalAvailable),
        Box::new(documents::InvoiceValidated),
        Box::new(documents::HighValueCert),
        Box::new(documents::PhysicalInspectionDocs),
        Box::new(documents::InternalReviewComplete),
        Box::new(documents::LocalChargesValidated),
        // Declaration-state rules.
        Box::new(declarations::PreliqApproved),
        Box::new(declarations::FinalApprovalRequired),
        Box::new(declarations::GattFormRequired),
        // Operation-level rules.
        Box::new(operation::RestrictedCountry),
        Box::new(operation::InspectionTypeRequired),
        Box::new(operation::CrossingResolved),
        Box::new(operation::PermitsCleared),
    ]
}

//! # Rule Evaluation Context
//!
//! The snapshot a compliance run evaluates against: the operation, its
//! documents, declarations, permits, and latest crossing result, all
//! borrowed from the caller's unit of work so that rules see writes
//! made earlier in the same transaction.

use aduana_core::{Declaration, Document, DocumentStatus, DocumentType, Operation, Permit};
use aduana_crossing::CrossingResult;

/// Read-only snapshot of one operation's state for rule evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The operation under validation.
    pub operation: &'a Operation,
    /// All documents of the operation (rules see only the active ones).
    pub documents: &'a [Document],
    /// The operation's declarations.
    pub declarations: &'a [Declaration],
    /// The operation's external permits.
    pub permits: &'a [Permit],
    /// The operation's latest crossing result, if any.
    pub crossing: Option<&'a CrossingResult>,
}

impl<'a> RuleContext<'a> {
    /// Iterate the active documents.
    pub fn active_documents(&self) -> impl Iterator<Item = &'a Document> {
        self.documents.iter().filter(|doc| doc.active)
    }

    /// Whether at least one active document of `document_type` exists.
    pub fn has_active(&self, document_type: DocumentType) -> bool {
        self.active_documents()
            .any(|doc| doc.document_type == document_type)
    }

    /// Whether at least one active, VALIDATED document of
    /// `document_type` exists.
    pub fn has_active_validated(&self, document_type: DocumentType) -> bool {
        self.active_documents()
            .any(|doc| doc.document_type == document_type && doc.status == DocumentStatus::Validated)
    }

    /// Whether every mandatory document type is covered by an active
    /// document (document completeness at 100%).
    pub fn mandatory_documents_complete(&self) -> bool {
        aduana_core::MANDATORY_DOCUMENT_TYPES
            .iter()
            .all(|required| self.has_active(*required))
    }
}

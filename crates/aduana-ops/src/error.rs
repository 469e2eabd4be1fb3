//! # Operation Service Errors
//!
//! The business-error taxonomy of the lifecycle and satellite services.
//! State-machine and crossing errors pass through transparently so the
//! HTTP layer can map them without unwrapping.

use thiserror::Error;

use aduana_core::{
    DeclarationId, DeclarationType, DocumentId, OperationId, OperationStatus, PermitId,
};
use aduana_crossing::CrossingError;
use aduana_state::TransitionError;

/// Errors raised by the operation services.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    /// No operation with the given id.
    #[error("{0} not found")]
    OperationNotFound(OperationId),

    /// No document with the given id on the operation.
    #[error("{0} not found")]
    DocumentNotFound(DocumentId),

    /// No declaration with the given id on the operation.
    #[error("{0} not found")]
    DeclarationNotFound(DeclarationId),

    /// No permit with the given id on the operation.
    #[error("{0} not found")]
    PermitNotFound(PermitId),

    /// The operation has no crossing result yet.
    #[error("{0} has no crossing result")]
    CrossingNotFound(OperationId),

    /// The human-facing operation reference is already taken.
    #[error("operation reference {0:?} is already in use")]
    DuplicateReference(String),

    /// The operation already carries a declaration of this type.
    #[error("operation already has a {declaration_type} declaration")]
    DuplicateDeclaration {
        /// The declaration type that would be duplicated.
        declaration_type: DeclarationType,
    },

    /// Two tariff lines in one declaration share a line number.
    #[error("duplicate tariff line number {line_number}")]
    DuplicateLineNumber {
        /// The colliding line number.
        line_number: u32,
    },

    /// Deletion was requested outside `DRAFT`.
    #[error("operation is {status}; only DRAFT operations can be deleted")]
    NotDeletable {
        /// The status the operation actually has.
        status: OperationStatus,
    },

    /// Document upload was requested on a terminal operation.
    #[error("operation is {status}; documents can no longer be uploaded")]
    UploadsClosed {
        /// The terminal status.
        status: OperationStatus,
    },

    /// The declaration was already submitted to the DGA.
    #[error("declaration was already submitted to the DGA")]
    AlreadySubmitted,

    /// The declaration already carries the requested approval.
    #[error("declaration already carries that approval")]
    AlreadyApproved,

    /// Valuation finalize was requested outside `VALUATION_REVIEW`.
    #[error("operation is {status}; valuation can only be finalized in VALUATION_REVIEW")]
    ValuationNotInReview {
        /// The status the operation actually has.
        status: OperationStatus,
    },

    /// The crossing needs both declarations and one is missing.
    #[error("crossing requires a {missing} declaration")]
    DeclarationMissingForCrossing {
        /// Which declaration type is absent.
        missing: DeclarationType,
    },

    /// An illegal status transition was requested.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// A crossing-result state change was rejected.
    #[error(transparent)]
    Crossing(#[from] CrossingError),
}

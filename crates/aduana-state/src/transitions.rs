//! # Transition Graph
//!
//! The static allow-list of legal status-to-status edges.
//!
//! ```text
//! DRAFT ──▶ DOCUMENTATION_COMPLETE ──▶ IN_REVIEW ──▶ PRELIQUIDATION_REVIEW
//!                                          ▲  │             │
//!                                          │  ▼             ▼
//!                                    PENDING_CORRECTION   ANALYST_ASSIGNED
//!                                                            │
//!                                                            ▼
//!                                              DECLARATION_IN_PROGRESS
//!                                                            │
//!                                                            ▼
//!                                                SUBMITTED_TO_CUSTOMS
//!                                                            │
//!                                                            ▼
//!                          PENDING_EXTERNAL_APPROVAL ⇄ VALUATION_REVIEW
//!                                                            │
//!                                                            ▼
//!                                                 PAYMENT_PREPARATION
//!                                                            │
//!                                                            ▼
//!                                                       IN_TRANSIT ──▶ CLOSED
//! ```
//!
//! Every non-terminal status also carries a direct edge to `CANCELLED`.
//! `CLOSED` and `CANCELLED` are terminal: no outgoing edges.

use thiserror::Error;

use aduana_core::OperationStatus;

/// Error raised when a requested transition is not an edge of the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The edge `from -> to` is not in the allow-list.
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: OperationStatus,
        /// Requested target status.
        to: OperationStatus,
    },
}

/// The legal next statuses from `from`.
///
/// The returned slice is the complete allow-list; an empty slice means
/// `from` is terminal.
pub fn allowed_transitions(from: OperationStatus) -> &'static [OperationStatus] {
    use OperationStatus::*;
    match from {
        Draft => &[DocumentationComplete, Cancelled],
        DocumentationComplete => &[InReview, Cancelled],
        InReview => &[PreliquidationReview, PendingCorrection, Cancelled],
        PreliquidationReview => &[AnalystAssigned, PendingCorrection, Cancelled],
        PendingCorrection => &[InReview, Cancelled],
        AnalystAssigned => &[DeclarationInProgress, Cancelled],
        DeclarationInProgress => &[SubmittedToCustoms, Cancelled],
        SubmittedToCustoms => &[ValuationReview, Cancelled],
        ValuationReview => &[PendingExternalApproval, PaymentPreparation, Cancelled],
        PendingExternalApproval => &[ValuationReview, Cancelled],
        PaymentPreparation => &[InTransit, Cancelled],
        InTransit => &[Closed, Cancelled],
        Closed => &[],
        Cancelled => &[],
    }
}

/// Validate that `from -> to` is a legal edge.
///
/// Fails with [`TransitionError::InvalidTransition`] otherwise. Performs
/// no compliance checks and no I/O.
pub fn validate_transition(
    from: OperationStatus,
    to: OperationStatus,
) -> Result<(), TransitionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::InvalidTransition { from, to })
    }
}

/// Whether `status` is terminal (no outgoing edges).
pub fn is_terminal(status: OperationStatus) -> bool {
    allowed_transitions(status).is_empty()
}

/// Whether `status` is one of the internal brokerage review stages.
pub fn is_internal_review(status: OperationStatus) -> bool {
    matches!(
        status,
        OperationStatus::InReview | OperationStatus::PreliquidationReview
    )
}

/// Whether documents may still be uploaded in `status`.
///
/// Uploads are allowed in every non-terminal status: corrections can
/// arrive right up until the file closes.
pub fn allows_document_upload(status: OperationStatus) -> bool {
    !is_terminal(status)
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use OperationStatus::*;

    #[test]
    fn test_happy_path_edges_are_legal() {
        let path = [
            Draft,
            DocumentationComplete,
            InReview,
            PreliquidationReview,
            AnalystAssigned,
            DeclarationInProgress,
            SubmittedToCustoms,
            ValuationReview,
            PaymentPreparation,
            InTransit,
            Closed,
        ];
        for pair in path.windows(2) {
            assert!(
                validate_transition(pair[0], pair[1]).is_ok(),
                "{} -> {} should be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_external_approval_round_trip() {
        assert!(validate_transition(ValuationReview, PendingExternalApproval).is_ok());
        assert!(validate_transition(PendingExternalApproval, ValuationReview).is_ok());
    }

    #[test]
    fn test_correction_branch() {
        assert!(validate_transition(InReview, PendingCorrection).is_ok());
        assert!(validate_transition(PreliquidationReview, PendingCorrection).is_ok());
        assert!(validate_transition(PendingCorrection, InReview).is_ok());
        // Correction cannot jump straight back to preliquidation review.
        assert!(validate_transition(PendingCorrection, PreliquidationReview).is_err());
    }

    #[test]
    fn test_every_non_terminal_status_can_cancel() {
        for status in OperationStatus::ALL {
            if is_terminal(status) {
                continue;
            }
            assert!(
                validate_transition(status, Cancelled).is_ok(),
                "{status} should allow cancellation"
            );
        }
    }

    #[test]
    fn test_terminal_statuses_have_no_outgoing_edges() {
        for terminal in [Closed, Cancelled] {
            assert!(allowed_transitions(terminal).is_empty());
            for target in OperationStatus::ALL {
                assert_eq!(
                    validate_transition(terminal, target),
                    Err(TransitionError::InvalidTransition {
                        from: terminal,
                        to: target
                    })
                );
            }
        }
    }

    #[test]
    fn test_all_pairs_outside_allow_list_are_rejected() {
        for from in OperationStatus::ALL {
            let allowed = allowed_transitions(from);
            for to in OperationStatus::ALL {
                let result = validate_transition(from, to);
                if allowed.contains(&to) {
                    assert!(result.is_ok(), "{from} -> {to} should succeed");
                } else {
                    assert!(result.is_err(), "{from} -> {to} should be rejected");
                }
            }
        }
    }

    #[test]
    fn test_skipping_a_stage_is_rejected() {
        assert!(validate_transition(Draft, InReview).is_err());
        assert!(validate_transition(DocumentationComplete, AnalystAssigned).is_err());
        assert!(validate_transition(SubmittedToCustoms, PaymentPreparation).is_err());
    }

    #[test]
    fn test_backwards_edges_outside_the_correction_loop_are_rejected() {
        assert!(validate_transition(InTransit, PaymentPreparation).is_err());
        assert!(validate_transition(ValuationReview, SubmittedToCustoms).is_err());
        assert!(validate_transition(DocumentationComplete, Draft).is_err());
    }

    #[test]
    fn test_internal_review_classification() {
        assert!(is_internal_review(InReview));
        assert!(is_internal_review(PreliquidationReview));
        assert!(!is_internal_review(Draft));
        assert!(!is_internal_review(ValuationReview));
    }

    #[test]
    fn test_document_upload_allowed_until_terminal() {
        assert!(allows_document_upload(Draft));
        assert!(allows_document_upload(InTransit));
        assert!(!allows_document_upload(Closed));
        assert!(!allows_document_upload(Cancelled));
    }
}

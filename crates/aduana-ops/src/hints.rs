//! # Transition Hints
//!
//! Auto-transitions are explicit, typed values rather than side effects
//! buried inside business actions. A triggering action commits its
//! business fact, computes an `Option<TransitionHint>`, and hands it to
//! the orchestrator, which re-checks that the operation still sits at
//! the expected source status before committing the transition. A hint
//! whose expectation no longer holds is stale and is dropped with a
//! debug log — not an error.

use aduana_core::{OperationId, OperationStatus};

/// A proposed automatic status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionHint {
    /// The operation to advance.
    pub operation_id: OperationId,
    /// The status the triggering action observed. The orchestrator
    /// drops the hint if the operation has since moved.
    pub expected_from: OperationStatus,
    /// The status to advance to.
    pub target: OperationStatus,
    /// The actor the transition is attributed to.
    pub actor: String,
    /// History comment explaining the automatic advance.
    pub comment: String,
}

impl TransitionHint {
    /// Build a hint.
    pub fn new(
        operation_id: OperationId,
        expected_from: OperationStatus,
        target: OperationStatus,
        actor: &str,
        comment: &str,
    ) -> Self {
        Self {
            operation_id,
            expected_from,
            target,
            actor: actor.to_string(),
            comment: comment.to_string(),
        }
    }
}

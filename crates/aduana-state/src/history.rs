//! # Status History Log
//!
//! Append-only log of committed status transitions. One record per
//! transition, including the creation transition (previous = `None`).
//! Records are immutable once written.
//!
//! The current status of an operation is always derivable as a fold
//! over its history — `fold_status` is that fold. The lifecycle service
//! keeps `Operation.status` and the history log in step inside one unit
//! of work; the fold is the ground truth the two are checked against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aduana_core::{OperationId, OperationStatus};

/// One committed status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusHistoryRecord {
    /// The operation this record belongs to.
    pub operation_id: OperationId,
    /// Status before the transition. `None` for the creation record.
    pub previous_status: Option<OperationStatus>,
    /// Status after the transition.
    pub new_status: OperationStatus,
    /// Who caused the transition (user or system actor).
    pub actor: String,
    /// Free-form comment.
    pub comment: Option<String>,
    /// When the transition was committed.
    pub timestamp: DateTime<Utc>,
}

impl StatusHistoryRecord {
    /// Build the creation record (previous = `None`).
    pub fn creation(operation_id: OperationId, status: OperationStatus, actor: &str) -> Self {
        Self {
            operation_id,
            previous_status: None,
            new_status: status,
            actor: actor.to_string(),
            comment: None,
            timestamp: Utc::now(),
        }
    }

    /// Build a transition record.
    pub fn transition(
        operation_id: OperationId,
        previous: OperationStatus,
        new: OperationStatus,
        actor: &str,
        comment: Option<String>,
    ) -> Self {
        Self {
            operation_id,
            previous_status: Some(previous),
            new_status: new,
            actor: actor.to_string(),
            comment,
            timestamp: Utc::now(),
        }
    }
}

/// Replay a history log and return the resulting status.
///
/// Returns `None` for an empty log. The records are assumed to be in
/// append order; the fold is simply the last record's `new_status`,
/// but walking the whole slice keeps the contract honest — a log whose
/// links do not chain is a corruption bug worth surfacing loudly in
/// tests, so this returns `None` for an inconsistent chain as well.
pub fn fold_status(records: &[StatusHistoryRecord]) -> Option<OperationStatus> {
    let mut current: Option<OperationStatus> = None;
    for record in records {
        if record.previous_status != current {
            return None;
        }
        current = Some(record.new_status);
    }
    current
}

// ─── Tests ───────────────────────────────────────────────────────────

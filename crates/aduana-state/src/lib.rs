//! # aduana-state — Operation Status State Machine
//!
//! The authoritative directed graph of legal status transitions for
//! customs brokerage operations, plus the append-only status history
//! log.
//!
//! ## Design
//!
//! The graph is total: every status has an explicit (possibly empty)
//! allow-list, encoded as a `match` over the status enum so that adding
//! a status forces this crate to define its edges. Terminal statuses
//! (`CLOSED`, `CANCELLED`) have empty allow-lists.
//!
//! This crate enforces graph legality only. Compliance rules — which
//! gate transitions on document and declaration state — live in
//! `aduana-compliance` and are run by callers as a pre-check; they are
//! deliberately not consulted here.
//!
//! An operation's current status is always derivable as a fold over its
//! history log (`fold_status`), which makes transition sequences
//! testable without a live store.

pub mod history;
pub mod transitions;

pub use history::{fold_status, StatusHistoryRecord};
pub use transitions::{
    allowed_transitions, allows_document_upload, is_internal_review, is_terminal,
    validate_transition, TransitionError,
};

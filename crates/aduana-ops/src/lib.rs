//! # aduana-ops — Operation Lifecycle Orchestration
//!
//! The write side of the stack: an in-memory ledger of full operation
//! aggregates and the services that mutate them.
//!
//! ## Design
//!
//! - **One entry, one lock.** Each operation's aggregate (operation,
//!   documents, declarations with lines, permits, crossing result,
//!   history) lives in a single `DashMap` entry. Every business action
//!   mutates under that entry's lock, so the business fact, the status
//!   transition, and the history row commit together.
//! - **Single mutation path for status.** All transitions — operator
//!   requested or automatic — go through `commit_transition`, which
//!   validates against the state machine and appends the history row.
//! - **Typed hints, one orchestrator.** Automatic transitions are
//!   `TransitionHint` values computed by the triggering action and
//!   applied by one orchestrator that drops stale hints.
//! - **Best-effort side channels.** Notification failures are logged
//!   and swallowed; audit events are fire-and-forget appends. Neither
//!   can abort a committed business action.
//! - **No compliance here.** The compliance engine is an HTTP-layer
//!   pre-check on operator-requested transitions; hint-driven advances
//!   ride on facts this crate itself just committed.

pub mod crossing;
pub mod declarations;
pub mod documents;
pub mod error;
pub mod hints;
pub mod ledger;
pub mod lifecycle;
pub mod permits;
pub mod sinks;

#[cfg(test)]
pub(crate) mod testutil;

pub use declarations::{DeclarationDraft, TariffLineDraft};
pub use error::OpsError;
pub use hints::TransitionHint;
pub use ledger::{DeclarationRecord, OperationEntry, OperationLedger};
pub use lifecycle::OpsService;
pub use sinks::{
    AuditEvent, AuditSink, InMemoryAuditSink, InMemoryNotificationSink, NotificationError,
    NotificationSink, StatusNotification,
};

//! # Notification and Audit Sinks
//!
//! Outbound side channels of the lifecycle service. Notifications are
//! best-effort: a delivery failure is logged and swallowed, never
//! rolled into the business result. Audit events are fire-and-forget
//! appends.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use aduana_core::{OperationId, OperationStatus};

// ─── Notifications ───────────────────────────────────────────────────

/// A status-change notification to interested parties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusNotification {
    /// The operation that changed.
    pub operation_id: OperationId,
    /// Its human-facing reference.
    pub reference: String,
    /// Status before the change. `None` for creation.
    pub previous_status: Option<OperationStatus>,
    /// Status after the change.
    pub new_status: OperationStatus,
    /// Who caused the change.
    pub actor: String,
}

/// A notification delivery failure. Never aborts the transaction that
/// produced the notification.
#[derive(Error, Debug, Clone)]
#[error("notification delivery failed: {reason}")]
pub struct NotificationError {
    /// What went wrong, for the log line.
    pub reason: String,
}

/// Delivery channel for status notifications.
pub trait NotificationSink: Send + Sync {
    /// Deliver one notification.
    fn notify(&self, notification: &StatusNotification) -> Result<(), NotificationError>;
}

/// In-memory recording sink: keeps every notification it was handed.
#[derive(Debug, Default)]
pub struct InMemoryNotificationSink {
    delivered: Mutex<Vec<StatusNotification>>,
}

impl InMemoryNotificationSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything delivered so far.
    pub fn delivered(&self) -> Vec<StatusNotification> {
        self.delivered.lock().clone()
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn notify(&self, notification: &StatusNotification) -> Result<(), NotificationError> {
        self.delivered.lock().push(notification.clone());
        Ok(())
    }
}

// ─── Audit ───────────────────────────────────────────────────────────

/// One audit trail entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// The operation the action touched.
    pub operation_id: OperationId,
    /// Dotted action name, e.g. `declaration.final_approved`.
    pub action: String,
    /// Who performed the action.
    pub actor: String,
    /// Free-form detail.
    pub detail: Option<String>,
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Build an audit event stamped now.
    pub fn new(
        operation_id: OperationId,
        action: &str,
        actor: &str,
        detail: Option<String>,
    ) -> Self {
        Self {
            operation_id,
            action: action.to_string(),
            actor: actor.to_string(),
            detail,
            timestamp: Utc::now(),
        }
    }
}

/// Append-only audit trail.
pub trait AuditSink: Send + Sync {
    /// Record one event. Fire-and-forget: no failure surface.
    fn record(&self, event: AuditEvent);
}

/// In-memory recording audit sink.
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl InMemoryAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every recorded event.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().clone()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        self.events.lock().push(event);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

//! # Permit Service
//!
//! External agency permits and the permit gate. Every permit mutation
//! re-evaluates the gate in both directions: a blocking permit while
//! the operation sits in `VALUATION_REVIEW` parks it in
//! `PENDING_EXTERNAL_APPROVAL`; once no permit blocks, an operation
//! parked there resumes `VALUATION_REVIEW`.

use chrono::Utc;

use aduana_core::{OperationId, OperationStatus, Permit, PermitId, PermitStatus};

use crate::error::OpsError;
use crate::hints::TransitionHint;
use crate::ledger::OperationEntry;
use crate::lifecycle::OpsService;
use crate::sinks::AuditEvent;

impl OpsService {
    /// Register a new permit, starting `IN_PROCESS`.
    pub fn create_permit(
        &self,
        operation_id: OperationId,
        permit_type: &str,
        actor: &str,
    ) -> Result<Permit, OpsError> {
        let (permit, committed) = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let permit = Permit::new(operation_id, permit_type);
            entry.permits.push(permit.clone());
            let hint = permit_gate_hint(&entry, actor);
            let committed = Self::apply_hint(&mut entry, hint)?;
            (permit, committed)
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "permit.created",
            actor,
            Some(permit_type.to_string()),
        ));
        self.emit_optional(committed);
        Ok(permit)
    }

    /// Update a permit's status (and agency reference, when provided).
    pub fn set_permit_status(
        &self,
        operation_id: OperationId,
        permit_id: PermitId,
        status: PermitStatus,
        reference: Option<String>,
        actor: &str,
    ) -> Result<Permit, OpsError> {
        let (permit, committed) = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let permit = entry
                .permit_mut(permit_id)
                .ok_or(OpsError::PermitNotFound(permit_id))?;
            permit.status = status;
            if let Some(reference) = reference {
                permit.reference = Some(reference);
            }
            permit.updated_at = Utc::now();
            let permit = permit.clone();
            let hint = permit_gate_hint(&entry, actor);
            let committed = Self::apply_hint(&mut entry, hint)?;
            (permit, committed)
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "permit.status_set",
            actor,
            Some(format!("{} -> {status}", permit.permit_type)),
        ));
        self.emit_optional(committed);
        Ok(permit)
    }

    /// Remove a permit. Its disappearance can clear the gate.
    pub fn delete_permit(
        &self,
        operation_id: OperationId,
        permit_id: PermitId,
        actor: &str,
    ) -> Result<(), OpsError> {
        let committed = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let before = entry.permits.len();
            entry.permits.retain(|permit| permit.id != permit_id);
            if entry.permits.len() == before {
                return Err(OpsError::PermitNotFound(permit_id));
            }
            let hint = permit_gate_hint(&entry, actor);
            Self::apply_hint(&mut entry, hint)?
        };

        self.audit
            .record(AuditEvent::new(operation_id, "permit.deleted", actor, None));
        self.emit_optional(committed);
        Ok(())
    }

    /// The operation's permits.
    pub fn permits(&self, operation_id: OperationId) -> Result<Vec<Permit>, OpsError> {
        Ok(self.ledger.entry(operation_id)?.permits.clone())
    }
}

/// The permit gate, evaluated after every permit mutation.
fn permit_gate_hint(entry: &OperationEntry, actor: &str) -> Option<TransitionHint> {
    let blocking = entry.has_blocking_permit();
    match (entry.operation.status, blocking) {
        (OperationStatus::ValuationReview, true) => Some(TransitionHint::new(
            entry.operation.id,
            OperationStatus::ValuationReview,
            OperationStatus::PendingExternalApproval,
            actor,
            "permit in process; parked for external approval",
        )),
        (OperationStatus::PendingExternalApproval, false) => Some(TransitionHint::new(
            entry.operation.id,
            OperationStatus::PendingExternalApproval,
            OperationStatus::ValuationReview,
            actor,
            "all permits cleared; resuming valuation review",
        )),
        _ => None,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

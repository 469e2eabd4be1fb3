//! # Lifecycle Service
//!
//! The single mutation path for `Operation.status`. Every committed
//! transition — explicit or hint-driven — goes through
//! `commit_transition`, which validates the edge against the state
//! machine, applies the status, stamps `closed_at` on entering
//! `CLOSED`, and appends the history row, all under the caller's entry
//! lock. Notifications and audit events are emitted after the lock is
//! released; a notification failure is logged, never propagated.
//!
//! Compliance is deliberately not consulted here: the HTTP layer runs
//! the compliance engine as a pre-check on operator-requested
//! transitions, while hint-driven advances ride on facts the service
//! itself just committed.

use std::sync::Arc;

use chrono::Utc;

use aduana_core::{
    InspectionType, Operation, OperationCategory, OperationId, OperationStatus, TransportMode,
};
use aduana_state::{
    allowed_transitions, validate_transition, StatusHistoryRecord, TransitionError,
};

use crate::error::OpsError;
use crate::hints::TransitionHint;
use crate::ledger::{OperationEntry, OperationLedger};
use crate::sinks::{AuditEvent, AuditSink, NotificationSink, StatusNotification};

/// A transition that has been applied and logged, pending emission.
#[derive(Debug, Clone)]
pub(crate) struct CommittedTransition {
    pub operation_id: OperationId,
    pub reference: String,
    pub previous_status: OperationStatus,
    pub new_status: OperationStatus,
    pub actor: String,
}

/// The operation lifecycle and satellite services, sharing one ledger.
pub struct OpsService {
    pub(crate) ledger: OperationLedger,
    pub(crate) notifications: Arc<dyn NotificationSink>,
    pub(crate) audit: Arc<dyn AuditSink>,
}

impl OpsService {
    /// Build the service around an empty ledger.
    pub fn new(notifications: Arc<dyn NotificationSink>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            ledger: OperationLedger::new(),
            notifications,
            audit,
        }
    }

    /// The underlying ledger (snapshots, persistence mirroring).
    pub fn ledger(&self) -> &OperationLedger {
        &self.ledger
    }

    // ─── Intake and deletion ─────────────────────────────────────────

    /// Create a new operation in `DRAFT`, appending the creation
    /// history row (previous = none).
    pub fn create_operation(
        &self,
        reference: &str,
        transport_mode: TransportMode,
        category: OperationCategory,
        origin_country: &str,
        actor: &str,
    ) -> Result<Operation, OpsError> {
        let operation = Operation::new(reference, transport_mode, category, origin_country);
        let mut entry = OperationEntry::new(operation.clone());
        entry.history.push(StatusHistoryRecord::creation(
            operation.id,
            operation.status,
            actor,
        ));
        self.ledger.insert(entry)?;

        tracing::info!(operation = %operation.id, reference, "operation created");
        self.audit.record(AuditEvent::new(
            operation.id,
            "operation.created",
            actor,
            Some(reference.to_string()),
        ));
        Ok(operation)
    }

    /// Delete an operation. Legal only while it is still in `DRAFT`.
    pub fn delete_operation(&self, id: OperationId, actor: &str) -> Result<(), OpsError> {
        let entry = self.ledger.remove_draft(id)?;
        tracing::info!(operation = %id, reference = entry.operation.reference, "draft operation deleted");
        self.audit.record(AuditEvent::new(
            id,
            "operation.deleted",
            actor,
            Some(entry.operation.reference),
        ));
        Ok(())
    }

    // ─── Queries ─────────────────────────────────────────────────────

    /// The operation row.
    pub fn operation(&self, id: OperationId) -> Result<Operation, OpsError> {
        Ok(self.ledger.entry(id)?.operation.clone())
    }

    /// All operations, ordered by creation time.
    pub fn operations(&self) -> Vec<Operation> {
        self.ledger
            .snapshot_all()
            .into_iter()
            .map(|entry| entry.operation)
            .collect()
    }

    /// A clone of the full aggregate (compliance snapshots, detail
    /// views).
    pub fn snapshot(&self, id: OperationId) -> Result<OperationEntry, OpsError> {
        Ok(self.ledger.entry(id)?.clone())
    }

    /// The operation's status history, creation record first.
    pub fn history(&self, id: OperationId) -> Result<Vec<StatusHistoryRecord>, OpsError> {
        Ok(self.ledger.entry(id)?.history.clone())
    }

    /// The legal next statuses from the operation's current status.
    pub fn allowed_transitions_for(
        &self,
        id: OperationId,
    ) -> Result<&'static [OperationStatus], OpsError> {
        let status = self.ledger.entry(id)?.operation.status;
        Ok(allowed_transitions(status))
    }

    // ─── Status changes ──────────────────────────────────────────────

    /// Change the operation's status. The only public mutation path
    /// for `Operation.status`; callers run their compliance pre-checks
    /// before calling.
    pub fn change_status(
        &self,
        id: OperationId,
        new_status: OperationStatus,
        actor: &str,
        comment: Option<String>,
    ) -> Result<Operation, OpsError> {
        let (operation, committed) = {
            let mut entry = self.ledger.entry_mut(id)?;
            let committed = Self::commit_transition(&mut entry, new_status, actor, comment)?;
            (entry.operation.clone(), committed)
        };
        self.emit(&committed);
        Ok(operation)
    }

    /// Validate and apply one transition under the caller's entry lock.
    pub(crate) fn commit_transition(
        entry: &mut OperationEntry,
        new_status: OperationStatus,
        actor: &str,
        comment: Option<String>,
    ) -> Result<CommittedTransition, TransitionError> {
        let previous = entry.operation.status;
        validate_transition(previous, new_status)?;

        let now = Utc::now();
        entry.operation.status = new_status;
        entry.operation.updated_at = now;
        if new_status == OperationStatus::Closed {
            entry.operation.closed_at = Some(now);
        }
        entry.history.push(StatusHistoryRecord::transition(
            entry.operation.id,
            previous,
            new_status,
            actor,
            comment,
        ));

        metrics::counter!("aduana_transitions_committed_total").increment(1);
        tracing::info!(
            operation = %entry.operation.id,
            from = %previous,
            to = %new_status,
            actor,
            "status transition committed"
        );
        Ok(CommittedTransition {
            operation_id: entry.operation.id,
            reference: entry.operation.reference.clone(),
            previous_status: previous,
            new_status,
            actor: actor.to_string(),
        })
    }

    /// The auto-transition orchestrator. Re-checks the hint's expected
    /// source status and drops stale hints; a state-machine rejection
    /// of a fresh hint surfaces as the outer business error.
    pub(crate) fn apply_hint(
        entry: &mut OperationEntry,
        hint: Option<TransitionHint>,
    ) -> Result<Option<CommittedTransition>, TransitionError> {
        let Some(hint) = hint else {
            return Ok(None);
        };
        if entry.operation.status != hint.expected_from {
            tracing::debug!(
                operation = %hint.operation_id,
                expected = %hint.expected_from,
                actual = %entry.operation.status,
                target = %hint.target,
                "stale transition hint dropped"
            );
            return Ok(None);
        }
        Self::commit_transition(entry, hint.target, &hint.actor, Some(hint.comment)).map(Some)
    }

    /// Emit notification and audit for a committed transition, outside
    /// the entry lock.
    pub(crate) fn emit(&self, committed: &CommittedTransition) {
        let notification = StatusNotification {
            operation_id: committed.operation_id,
            reference: committed.reference.clone(),
            previous_status: Some(committed.previous_status),
            new_status: committed.new_status,
            actor: committed.actor.clone(),
        };
        if let Err(error) = self.notifications.notify(&notification) {
            tracing::warn!(
                %error,
                operation = %committed.operation_id,
                "notification delivery failed; transition already committed"
            );
        }
        self.audit.record(AuditEvent::new(
            committed.operation_id,
            "status.changed",
            &committed.actor,
            Some(format!(
                "{} -> {}",
                committed.previous_status, committed.new_status
            )),
        ));
    }

    /// Emit for an optional hint outcome.
    pub(crate) fn emit_optional(&self, committed: Option<CommittedTransition>) {
        if let Some(committed) = committed {
            self.emit(&committed);
        }
    }

    // ─── Inspection and valuation ────────────────────────────────────

    /// Assign the DGA inspection channel. `EXPRESO` assigned while the
    /// operation sits in `SUBMITTED_TO_CUSTOMS` advances it straight to
    /// `VALUATION_REVIEW`; the other channels never auto-advance.
    pub fn set_inspection_type(
        &self,
        id: OperationId,
        inspection_type: InspectionType,
        actor: &str,
    ) -> Result<Operation, OpsError> {
        let (operation, committed) = {
            let mut entry = self.ledger.entry_mut(id)?;
            entry.operation.inspection_type = Some(inspection_type);
            entry.operation.updated_at = Utc::now();

            let hint = (inspection_type == InspectionType::Expreso
                && entry.operation.status == OperationStatus::SubmittedToCustoms)
                .then(|| {
                    TransitionHint::new(
                        id,
                        OperationStatus::SubmittedToCustoms,
                        OperationStatus::ValuationReview,
                        actor,
                        "EXPRESO channel assigned; advancing to valuation review",
                    )
                });
            let committed = Self::apply_hint(&mut entry, hint)?;
            (entry.operation.clone(), committed)
        };
        self.audit.record(AuditEvent::new(
            id,
            "inspection.assigned",
            actor,
            Some(inspection_type.to_string()),
        ));
        self.emit_optional(committed);
        Ok(operation)
    }

    /// Finalize valuation. Legal only in `VALUATION_REVIEW`; stamps
    /// `valuation_finalized_at` and advances to `PAYMENT_PREPARATION`
    /// in the same unit of work.
    pub fn finalize_valuation(&self, id: OperationId, actor: &str) -> Result<Operation, OpsError> {
        let (operation, committed) = {
            let mut entry = self.ledger.entry_mut(id)?;
            if entry.operation.status != OperationStatus::ValuationReview {
                return Err(OpsError::ValuationNotInReview {
                    status: entry.operation.status,
                });
            }
            entry.operation.valuation_finalized_at = Some(Utc::now());
            let committed = Self::commit_transition(
                &mut entry,
                OperationStatus::PaymentPreparation,
                actor,
                Some("valuation finalized".to_string()),
            )?;
            (entry.operation.clone(), committed)
        };
        self.audit
            .record(AuditEvent::new(id, "valuation.finalized", actor, None));
        self.emit(&committed);
        Ok(operation)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{InMemoryAuditSink, NotificationError};
    use crate::testutil::{service, walk};
    use aduana_state::fold_status;
    use OperationStatus::*;

    fn create(service: &OpsService, reference: &str) -> Operation {
        service
            .create_operation(
                reference,
                TransportMode::Air,
                OperationCategory::Category1,
                "BR",
                "intake",
            )
            .unwrap()
    }

    // ── creation and deletion ──

    #[test]
    fn test_creation_appends_the_previous_null_history_row() {
        let (service, _, audit) = service();
        let op = create(&service, "IMP-2026-00001");

        let history = service.history(op.id).unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].previous_status.is_none());
        assert_eq!(history[0].new_status, Draft);
        assert!(audit.events().iter().any(|e| e.action == "operation.created"));
    }

    #[test]
    fn test_duplicate_reference_is_rejected() {
        let (service, _, _) = service();
        create(&service, "IMP-2026-00001");
        let err = service
            .create_operation(
                "IMP-2026-00001",
                TransportMode::Land,
                OperationCategory::Category2,
                "US",
                "intake",
            )
            .unwrap_err();
        assert!(matches!(err, OpsError::DuplicateReference(_)));
    }

    #[test]
    fn test_delete_only_in_draft() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00002");
        service
            .change_status(op.id, DocumentationComplete, "ops", None)
            .unwrap();

        let err = service.delete_operation(op.id, "ops").unwrap_err();
        assert_eq!(
            err,
            OpsError::NotDeletable {
                status: DocumentationComplete
            }
        );

        let draft = create(&service, "IMP-2026-00003");
        service.delete_operation(draft.id, "ops").unwrap();
        assert!(matches!(
            service.operation(draft.id),
            Err(OpsError::OperationNotFound(_))
        ));
    }

    // ── change_status ──

    #[test]
    fn test_change_status_appends_history_and_notifies() {
        let (service, notifications, _) = service();
        let op = create(&service, "IMP-2026-00004");

        let updated = service
            .change_status(op.id, DocumentationComplete, "ops", Some("docs in".to_string()))
            .unwrap();
        assert_eq!(updated.status, DocumentationComplete);

        let history = service.history(op.id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].previous_status, Some(Draft));
        assert_eq!(history[1].comment.as_deref(), Some("docs in"));

        let delivered = notifications.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].new_status, DocumentationComplete);
    }

    #[test]
    fn test_illegal_transition_leaves_no_trace() {
        let (service, notifications, _) = service();
        let op = create(&service, "IMP-2026-00005");

        let err = service
            .change_status(op.id, ValuationReview, "ops", None)
            .unwrap_err();
        assert!(matches!(err, OpsError::Transition(_)));
        assert_eq!(service.operation(op.id).unwrap().status, Draft);
        assert_eq!(service.history(op.id).unwrap().len(), 1);
        assert!(notifications.delivered().is_empty());
    }

    #[test]
    fn test_entering_closed_stamps_closed_at() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00006");
        walk(
            &service,
            op.id,
            &[
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
            ],
        );
        let operation = service.operation(op.id).unwrap();
        assert_eq!(operation.status, Closed);
        assert!(operation.closed_at.is_some());
    }

    #[test]
    fn test_history_fold_always_matches_current_status() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00007");
        walk(&service, op.id, &[DocumentationComplete, InReview, PendingCorrection, InReview]);

        let history = service.history(op.id).unwrap();
        assert_eq!(
            fold_status(&history),
            Some(service.operation(op.id).unwrap().status)
        );
    }

    #[test]
    fn test_notification_failure_does_not_abort_the_transition() {
        struct FailingSink;
        impl NotificationSink for FailingSink {
            fn notify(&self, _: &StatusNotification) -> Result<(), NotificationError> {
                Err(NotificationError {
                    reason: "smtp down".to_string(),
                })
            }
        }

        let audit = Arc::new(InMemoryAuditSink::new());
        let service = OpsService::new(Arc::new(FailingSink), audit.clone());
        let op = create(&service, "IMP-2026-00008");

        let updated = service
            .change_status(op.id, DocumentationComplete, "ops", None)
            .unwrap();
        assert_eq!(updated.status, DocumentationComplete);
        assert_eq!(service.history(op.id).unwrap().len(), 2);
        assert!(audit.events().iter().any(|e| e.action == "status.changed"));
    }

    // ── hints ──

    #[test]
    fn test_stale_hint_is_dropped_without_error() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00009");

        let mut entry = service.ledger().entry_mut(op.id).unwrap();
        let hint = TransitionHint::new(
            op.id,
            DocumentationComplete, // operation is actually DRAFT
            InReview,
            "system",
            "stale",
        );
        let outcome = OpsService::apply_hint(&mut entry, Some(hint)).unwrap();
        assert!(outcome.is_none());
        assert_eq!(entry.operation.status, Draft);
        assert_eq!(entry.history.len(), 1);
    }

    #[test]
    fn test_fresh_hint_commits_through_the_state_machine() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00010");

        let mut entry = service.ledger().entry_mut(op.id).unwrap();
        let hint = TransitionHint::new(op.id, Draft, DocumentationComplete, "system", "auto");
        let outcome = OpsService::apply_hint(&mut entry, Some(hint)).unwrap();
        assert!(outcome.is_some());
        assert_eq!(entry.operation.status, DocumentationComplete);
        assert_eq!(entry.history.len(), 2);
    }

    #[test]
    fn test_fresh_hint_with_illegal_edge_is_an_error() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00011");

        let mut entry = service.ledger().entry_mut(op.id).unwrap();
        let hint = TransitionHint::new(op.id, Draft, ValuationReview, "system", "bad");
        let err = OpsService::apply_hint(&mut entry, Some(hint)).unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidTransition {
                from: Draft,
                to: ValuationReview
            }
        );
    }

    // ── inspection ──

    #[test]
    fn test_expreso_auto_advances_from_submitted_to_customs() {
        let (service, notifications, _) = service();
        let op = create(&service, "IMP-2026-00012");
        walk(
            &service,
            op.id,
            &[
                DocumentationComplete,
                InReview,
                PreliquidationReview,
                AnalystAssigned,
                DeclarationInProgress,
                SubmittedToCustoms,
            ],
        );

        let updated = service
            .set_inspection_type(op.id, InspectionType::Expreso, "dga")
            .unwrap();
        assert_eq!(updated.status, ValuationReview);
        assert_eq!(updated.inspection_type, Some(InspectionType::Expreso));

        // The inspection write and the transition are one unit of work:
        // the history row lands in the same aggregate state.
        let history = service.history(op.id).unwrap();
        assert_eq!(history.last().unwrap().new_status, ValuationReview);
        assert!(notifications
            .delivered()
            .iter()
            .any(|n| n.new_status == ValuationReview));
    }

    #[test]
    fn test_other_channels_never_auto_advance() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00013");
        walk(
            &service,
            op.id,
            &[
                DocumentationComplete,
                InReview,
                PreliquidationReview,
                AnalystAssigned,
                DeclarationInProgress,
                SubmittedToCustoms,
            ],
        );

        for channel in [InspectionType::Visual, InspectionType::Fisica] {
            let updated = service.set_inspection_type(op.id, channel, "dga").unwrap();
            assert_eq!(updated.status, SubmittedToCustoms);
        }
    }

    #[test]
    fn test_expreso_outside_submitted_to_customs_only_sets_the_field() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00014");

        let updated = service
            .set_inspection_type(op.id, InspectionType::Expreso, "dga")
            .unwrap();
        assert_eq!(updated.status, Draft);
        assert_eq!(updated.inspection_type, Some(InspectionType::Expreso));
    }

    // ── valuation ──

    #[test]
    fn test_finalize_valuation_stamps_and_advances() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00015");
        walk(
            &service,
            op.id,
            &[
                DocumentationComplete,
                InReview,
                PreliquidationReview,
                AnalystAssigned,
                DeclarationInProgress,
                SubmittedToCustoms,
                ValuationReview,
            ],
        );

        let updated = service.finalize_valuation(op.id, "analyst").unwrap();
        assert_eq!(updated.status, PaymentPreparation);
        assert!(updated.valuation_finalized_at.is_some());
    }

    #[test]
    fn test_finalize_valuation_outside_review_is_rejected() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00016");

        let err = service.finalize_valuation(op.id, "analyst").unwrap_err();
        assert_eq!(err, OpsError::ValuationNotInReview { status: Draft });
        assert!(service
            .operation(op.id)
            .unwrap()
            .valuation_finalized_at
            .is_none());
    }

    #[test]
    fn test_allowed_transitions_reflect_current_status() {
        let (service, _, _) = service();
        let op = create(&service, "IMP-2026-00017");
        assert_eq!(
            service.allowed_transitions_for(op.id).unwrap(),
            &[DocumentationComplete, Cancelled]
        );
    }
}

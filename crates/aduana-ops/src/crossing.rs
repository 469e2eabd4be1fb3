//! # Crossing Service
//!
//! Executes and resolves declaration crossings. Execution runs under
//! the operation's entry lock, so at most one crossing is ever
//! in-flight per operation, and each run supersedes the previous
//! result wholesale — the old result and its discrepancies are
//! physically discarded.

use aduana_core::{DeclarationType, OperationId};
use aduana_crossing::{compare, CrossingResult};

use crate::error::OpsError;
use crate::lifecycle::OpsService;
use crate::sinks::AuditEvent;

impl OpsService {
    /// Run the crossing between the operation's preliminary and final
    /// declarations, replacing any previous result.
    pub fn execute_crossing(
        &self,
        operation_id: OperationId,
        actor: &str,
    ) -> Result<CrossingResult, OpsError> {
        let result = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let preliminary = entry
                .declaration_of_type(DeclarationType::Preliminary)
                .ok_or(OpsError::DeclarationMissingForCrossing {
                    missing: DeclarationType::Preliminary,
                })?;
            let fin = entry.declaration_of_type(DeclarationType::Final).ok_or(
                OpsError::DeclarationMissingForCrossing {
                    missing: DeclarationType::Final,
                },
            )?;

            let discrepancies = compare(
                &preliminary.declaration,
                &preliminary.lines,
                &fin.declaration,
                &fin.lines,
            );
            let result = CrossingResult::executed(operation_id, discrepancies, actor);
            entry.crossing = Some(result.clone());
            result
        };

        metrics::counter!("aduana_crossing_runs_total").increment(1);
        tracing::info!(
            operation = %operation_id,
            status = %result.status,
            discrepancies = result.discrepancies.len(),
            "crossing executed"
        );
        self.audit.record(AuditEvent::new(
            operation_id,
            "crossing.executed",
            actor,
            Some(result.status.to_string()),
        ));
        Ok(result)
    }

    /// Resolve a `DISCREPANCY` crossing result.
    pub fn resolve_crossing(
        &self,
        operation_id: OperationId,
        actor: &str,
        comment: &str,
    ) -> Result<CrossingResult, OpsError> {
        let result = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let result = entry
                .crossing
                .as_mut()
                .ok_or(OpsError::CrossingNotFound(operation_id))?;
            result.resolve(actor, comment)?;
            result.clone()
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "crossing.resolved",
            actor,
            Some(comment.to_string()),
        ));
        Ok(result)
    }

    /// The latest crossing result, if the crossing has been run.
    pub fn crossing_result(
        &self,
        operation_id: OperationId,
    ) -> Result<Option<CrossingResult>, OpsError> {
        Ok(self.ledger.entry(operation_id)?.crossing.clone())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

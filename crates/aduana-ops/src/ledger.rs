//! # Operation Ledger
//!
//! In-memory store of full operation aggregates. One `DashMap` entry
//! holds everything that belongs to an operation — the operation row,
//! its documents, declarations with their tariff lines, permits, the
//! latest crossing result, and the status history. Every business
//! action mutates under that single entry lock, so the business fact,
//! the status transition, and the history row commit together, and
//! rule evaluation within the same action sees earlier writes.
//!
//! A side index under a `parking_lot` mutex enforces reference
//! uniqueness across entries.

use std::collections::HashMap;

use dashmap::mapref::one::{Ref, RefMut};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use aduana_core::{
    Declaration, DeclarationId, DeclarationType, Document, DocumentId, Operation, OperationId,
    OperationStatus, Permit, PermitId, TariffLine,
};
use aduana_crossing::CrossingResult;
use aduana_state::StatusHistoryRecord;

use crate::error::OpsError;

// ─── Aggregate Types ─────────────────────────────────────────────────

/// A declaration with its tariff lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeclarationRecord {
    /// The declaration header.
    pub declaration: Declaration,
    /// Its tariff lines, line numbers unique within the declaration.
    pub lines: Vec<TariffLine>,
}

/// The full aggregate of one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationEntry {
    /// The operation row.
    pub operation: Operation,
    /// All registered documents, active and deactivated.
    pub documents: Vec<Document>,
    /// The declarations, at most one per type.
    pub declarations: Vec<DeclarationRecord>,
    /// External permits.
    pub permits: Vec<Permit>,
    /// The latest crossing result; superseded wholesale on re-execution.
    pub crossing: Option<CrossingResult>,
    /// Append-only status history, creation record first.
    pub history: Vec<StatusHistoryRecord>,
}

impl OperationEntry {
    /// Build an empty aggregate around a fresh operation.
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            documents: Vec::new(),
            declarations: Vec::new(),
            permits: Vec::new(),
            crossing: None,
            history: Vec::new(),
        }
    }

    /// Find a document by id.
    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| doc.id == id)
    }

    /// Find a declaration record by declaration id.
    pub fn declaration_mut(&mut self, id: DeclarationId) -> Option<&mut DeclarationRecord> {
        self.declarations
            .iter_mut()
            .find(|record| record.declaration.id == id)
    }

    /// Find the declaration of a given type, if registered.
    pub fn declaration_of_type(&self, declaration_type: DeclarationType) -> Option<&DeclarationRecord> {
        self.declarations
            .iter()
            .find(|record| record.declaration.declaration_type == declaration_type)
    }

    /// Find a permit by id.
    pub fn permit_mut(&mut self, id: PermitId) -> Option<&mut Permit> {
        self.permits.iter_mut().find(|permit| permit.id == id)
    }

    /// Whether any permit is currently blocking.
    pub fn has_blocking_permit(&self) -> bool {
        self.permits.iter().any(|permit| permit.status.is_blocking())
    }
}

// ─── Ledger ──────────────────────────────────────────────────────────

/// The concurrent operation store.
#[derive(Debug, Default)]
pub struct OperationLedger {
    entries: DashMap<OperationId, OperationEntry>,
    references: Mutex<HashMap<String, OperationId>>,
}

impl OperationLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new aggregate, reserving its reference.
    pub fn insert(&self, entry: OperationEntry) -> Result<(), OpsError> {
        let reference = entry.operation.reference.clone();
        let id = entry.operation.id;
        {
            let mut references = self.references.lock();
            if references.contains_key(&reference) {
                return Err(OpsError::DuplicateReference(reference));
            }
            references.insert(reference, id);
        }
        self.entries.insert(id, entry);
        Ok(())
    }

    /// Shared access to one aggregate.
    pub fn entry(&self, id: OperationId) -> Result<Ref<'_, OperationId, OperationEntry>, OpsError> {
        self.entries.get(&id).ok_or(OpsError::OperationNotFound(id))
    }

    /// Exclusive access to one aggregate. Holding the guard is the
    /// atomicity unit for all business actions on the operation.
    pub fn entry_mut(
        &self,
        id: OperationId,
    ) -> Result<RefMut<'_, OperationId, OperationEntry>, OpsError> {
        self.entries
            .get_mut(&id)
            .ok_or(OpsError::OperationNotFound(id))
    }

    /// Remove an aggregate, legal only while it is still in `DRAFT`.
    pub fn remove_draft(&self, id: OperationId) -> Result<OperationEntry, OpsError> {
        let status = self.entry(id)?.operation.status;
        if status != OperationStatus::Draft {
            return Err(OpsError::NotDeletable { status });
        }
        match self
            .entries
            .remove_if(&id, |_, entry| entry.operation.status == OperationStatus::Draft)
        {
            Some((_, entry)) => {
                self.references.lock().remove(&entry.operation.reference);
                Ok(entry)
            }
            // Raced with a transition or a concurrent delete.
            None => match self.entries.get(&id) {
                Some(entry) => Err(OpsError::NotDeletable {
                    status: entry.operation.status,
                }),
                None => Err(OpsError::OperationNotFound(id)),
            },
        }
    }

    /// Clone every aggregate, ordered by creation time.
    pub fn snapshot_all(&self) -> Vec<OperationEntry> {
        let mut entries: Vec<OperationEntry> =
            self.entries.iter().map(|entry| entry.value().clone()).collect();
        entries.sort_by_key(|entry| entry.operation.created_at);
        entries
    }

    /// Number of stored operations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use aduana_core::{OperationCategory, TransportMode};

    fn entry(reference: &str) -> OperationEntry {
        OperationEntry::new(Operation::new(
            reference,
            TransportMode::Air,
            OperationCategory::Category1,
            "BR",
        ))
    }

    #[test]
    fn test_insert_enforces_reference_uniqueness() {
        let ledger = OperationLedger::new();
        ledger.insert(entry("IMP-2026-00001")).unwrap();
        let err = ledger.insert(entry("IMP-2026-00001")).unwrap_err();
        assert_eq!(
            err,
            OpsError::DuplicateReference("IMP-2026-00001".to_string())
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_remove_draft_frees_the_reference() {
        let ledger = OperationLedger::new();
        let e = entry("IMP-2026-00002");
        let id = e.operation.id;
        ledger.insert(e).unwrap();

        ledger.remove_draft(id).unwrap();
        assert!(ledger.is_empty());
        // The reference can be reused after deletion.
        ledger.insert(entry("IMP-2026-00002")).unwrap();
    }

    #[test]
    fn test_remove_rejects_non_draft() {
        let ledger = OperationLedger::new();
        let mut e = entry("IMP-2026-00003");
        let id = e.operation.id;
        e.operation.status = OperationStatus::InReview;
        ledger.insert(e).unwrap();

        let err = ledger.remove_draft(id).unwrap_err();
        assert_eq!(
            err,
            OpsError::NotDeletable {
                status: OperationStatus::InReview
            }
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        let ledger = OperationLedger::new();
        let id = OperationId::new();
        assert_eq!(
            ledger.entry(id).err(),
            Some(OpsError::OperationNotFound(id))
        );
    }
}

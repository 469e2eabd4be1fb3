//! # Document Service
//!
//! Register, review, and deactivate documents. Documents are never
//! physically deleted; deactivation clears the `active` flag, which
//! hides the document from compliance rules while keeping the upload
//! trail intact.

use aduana_core::{Document, DocumentId, DocumentStatus, DocumentType, OperationId};
use aduana_state::allows_document_upload;

use crate::error::OpsError;
use crate::lifecycle::OpsService;
use crate::sinks::AuditEvent;

impl OpsService {
    /// Register a new document in `PENDING` status. Rejected once the
    /// operation is terminal.
    pub fn register_document(
        &self,
        operation_id: OperationId,
        document_type: DocumentType,
        file_name: &str,
        uploaded_by: &str,
    ) -> Result<Document, OpsError> {
        let document = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            if !allows_document_upload(entry.operation.status) {
                return Err(OpsError::UploadsClosed {
                    status: entry.operation.status,
                });
            }
            let document = Document::new(operation_id, document_type, file_name, uploaded_by);
            entry.documents.push(document.clone());
            document
        };

        tracing::debug!(
            operation = %operation_id,
            document = %document.id,
            kind = %document_type,
            "document registered"
        );
        self.audit.record(AuditEvent::new(
            operation_id,
            "document.registered",
            uploaded_by,
            Some(format!("{document_type} {file_name}")),
        ));
        Ok(document)
    }

    /// Set a document's review status.
    pub fn set_document_status(
        &self,
        operation_id: OperationId,
        document_id: DocumentId,
        status: DocumentStatus,
        actor: &str,
    ) -> Result<Document, OpsError> {
        let document = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let document = entry
                .document_mut(document_id)
                .ok_or(OpsError::DocumentNotFound(document_id))?;
            document.status = status;
            document.clone()
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "document.status_set",
            actor,
            Some(format!("{} -> {status}", document.document_type)),
        ));
        Ok(document)
    }

    /// Deactivate a document (logical delete). Idempotent.
    pub fn deactivate_document(
        &self,
        operation_id: OperationId,
        document_id: DocumentId,
        actor: &str,
    ) -> Result<Document, OpsError> {
        let document = {
            let mut entry = self.ledger.entry_mut(operation_id)?;
            let document = entry
                .document_mut(document_id)
                .ok_or(OpsError::DocumentNotFound(document_id))?;
            document.active = false;
            document.clone()
        };

        self.audit.record(AuditEvent::new(
            operation_id,
            "document.deactivated",
            actor,
            Some(document.file_name.clone()),
        ));
        Ok(document)
    }

    /// All documents of the operation, active and deactivated.
    pub fn documents(&self, operation_id: OperationId) -> Result<Vec<Document>, OpsError> {
        Ok(self.ledger.entry(operation_id)?.documents.clone())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{service, walk};
    use aduana_core::{OperationCategory, OperationStatus, TransportMode};

    fn create(svc: &OpsService) -> OperationId {
        svc.create_operation(
            "IMP-2026-00100",
            TransportMode::Maritime,
            OperationCategory::Category1,
            "CN",
            "intake",
        )
        .unwrap()
        .id
    }

    #[test]
    fn test_register_set_status_and_deactivate() {
        let (svc, _, audit) = service();
        let op = create(&svc);

        let doc = svc
            .register_document(op, DocumentType::Bl, "bl-001.pdf", "ops")
            .unwrap();
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert!(doc.active);

        let doc = svc
            .set_document_status(op, doc.id, DocumentStatus::Validated, "reviewer")
            .unwrap();
        assert!(doc.is_active_validated());

        let doc = svc.deactivate_document(op, doc.id, "ops").unwrap();
        assert!(!doc.active);
        assert_eq!(doc.status, DocumentStatus::Validated);

        let actions: Vec<String> = audit.events().into_iter().map(|e| e.action).collect();
        assert!(actions.contains(&"document.registered".to_string()));
        assert!(actions.contains(&"document.deactivated".to_string()));
    }

    #[test]
    fn test_uploads_rejected_on_terminal_operations() {
        let (svc, _, _) = service();
        let op = create(&svc);
        walk(&svc, op, &[OperationStatus::Cancelled]);

        let err = svc
            .register_document(op, DocumentType::Other, "late.pdf", "ops")
            .unwrap_err();
        assert_eq!(
            err,
            OpsError::UploadsClosed {
                status: OperationStatus::Cancelled
            }
        );
    }

    #[test]
    fn test_unknown_document_is_not_found() {
        let (svc, _, _) = service();
        let op = create(&svc);
        let ghost = DocumentId::new();
        assert_eq!(
            svc.set_document_status(op, ghost, DocumentStatus::Validated, "reviewer")
                .unwrap_err(),
            OpsError::DocumentNotFound(ghost)
        );
    }
}

//! # Document Model
//!
//! Documents attached to an operation: bills of lading, commercial
//! invoices, packing lists, certificates, and local-charges receipts.
//! Documents are never physically deleted; deactivation (clearing the
//! `active` flag) is the logical delete, and only active documents are
//! visible to compliance rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EnumParseError;
use crate::ids::{DocumentId, OperationId};

// ─── Document Type ───────────────────────────────────────────────────

/// The kind of document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// Bill of lading (or air waybill / carta de porte).
    Bl,
    /// Commercial invoice.
    CommercialInvoice,
    /// Packing list.
    PackingList,
    /// Certificate (origin, sanitary, high-value cargo, etc.).
    Certificate,
    /// Receipt for locally incurred charges.
    LocalChargesReceipt,
    /// Anything else.
    Other,
}

/// The document types every operation must carry before it can reach
/// `DOCUMENTATION_COMPLETE`.
pub const MANDATORY_DOCUMENT_TYPES: [DocumentType; 3] = [
    DocumentType::Bl,
    DocumentType::CommercialInvoice,
    DocumentType::PackingList,
];

impl DocumentType {
    /// The wire name of this document type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bl => "BL",
            Self::CommercialInvoice => "COMMERCIAL_INVOICE",
            Self::PackingList => "PACKING_LIST",
            Self::Certificate => "CERTIFICATE",
            Self::LocalChargesReceipt => "LOCAL_CHARGES_RECEIPT",
            Self::Other => "OTHER",
        }
    }

    /// Whether this type belongs to the mandatory completeness set.
    pub fn is_mandatory(&self) -> bool {
        MANDATORY_DOCUMENT_TYPES.contains(self)
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BL" => Ok(Self::Bl),
            "COMMERCIAL_INVOICE" => Ok(Self::CommercialInvoice),
            "PACKING_LIST" => Ok(Self::PackingList),
            "CERTIFICATE" => Ok(Self::Certificate),
            "LOCAL_CHARGES_RECEIPT" => Ok(Self::LocalChargesReceipt),
            "OTHER" => Ok(Self::Other),
            other => Err(EnumParseError::new("DocumentType", other)),
        }
    }
}

// ─── Document Status ─────────────────────────────────────────────────

/// Review status of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentStatus {
    /// Uploaded, awaiting review.
    Pending,
    /// Reviewed and accepted.
    Validated,
    /// Reviewed and rejected.
    Rejected,
}

impl DocumentStatus {
    /// The wire name of this document status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Validated => "VALIDATED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "VALIDATED" => Ok(Self::Validated),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(EnumParseError::new("DocumentStatus", other)),
        }
    }
}

// ─── Document ────────────────────────────────────────────────────────

/// A document registered against an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// The operation this document belongs to.
    pub operation_id: OperationId,
    /// The kind of document.
    pub document_type: DocumentType,
    /// Review status.
    pub status: DocumentStatus,
    /// Whether the document is active. Inactive documents are invisible
    /// to compliance rules.
    pub active: bool,
    /// Original file name as uploaded.
    pub file_name: String,
    /// Who uploaded the document.
    pub uploaded_by: String,
    /// When the document was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    /// Register a new document in `PENDING` status.
    pub fn new(
        operation_id: OperationId,
        document_type: DocumentType,
        file_name: impl Into<String>,
        uploaded_by: impl Into<String>,
    ) -> Self {
        Self {
            id: DocumentId::new(),
            operation_id,
            document_type,
            status: DocumentStatus::Pending,
            active: true,
            file_name: file_name.into(),
            uploaded_by: uploaded_by.into(),
            uploaded_at: Utc::now(),
        }
    }

    /// Whether the document is active and validated.
    pub fn is_active_validated(&self) -> bool {
        self.active && self.status == DocumentStatus::Validated
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mandatory_set_is_bl_invoice_packing_list() {
        assert!(DocumentType::Bl.is_mandatory());
        assert!(DocumentType::CommercialInvoice.is_mandatory());
        assert!(DocumentType::PackingList.is_mandatory());
        assert!(!DocumentType::Certificate.is_mandatory());
        assert!(!DocumentType::LocalChargesReceipt.is_mandatory());
        assert!(!DocumentType::Other.is_mandatory());
    }

    #[test]
    fn test_new_document_is_pending_and_active() {
        let doc = Document::new(
            OperationId::new(),
            DocumentType::Bl,
            "bl-001.pdf",
            "ops@broker.example",
        );
        assert_eq!(doc.status, DocumentStatus::Pending);
        assert!(doc.active);
        assert!(!doc.is_active_validated());
    }

    #[test]
    fn test_deactivated_validated_document_is_not_visible() {
        let mut doc = Document::new(OperationId::new(), DocumentType::Bl, "bl.pdf", "ops");
        doc.status = DocumentStatus::Validated;
        assert!(doc.is_active_validated());
        doc.active = false;
        assert!(!doc.is_active_validated());
    }
}

//! # Operation Model
//!
//! The operation is the customs brokerage shipment file, tracked from
//! intake to closure. Its `status` field is the single source of truth
//! for workflow position and only ever changes through the transition
//! state machine in `aduana-state`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::OperationId;
use crate::status::{InspectionType, OperationCategory, OperationStatus, TransportMode};

/// A customs brokerage operation (import/export shipment file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operation {
    /// Unique operation identifier.
    pub id: OperationId,
    /// Human-facing unique reference number (e.g. "IMP-2026-00042").
    pub reference: String,
    /// Current lifecycle status.
    pub status: OperationStatus,
    /// How the goods move.
    pub transport_mode: TransportMode,
    /// Brokerage category.
    pub category: OperationCategory,
    /// Inspection channel assigned by the DGA; unset until customs
    /// assigns one.
    pub inspection_type: Option<InspectionType>,
    /// Origin country, ISO 3166-1 alpha-2. Compared case-insensitively
    /// by the restricted-country rule.
    pub origin_country: String,
    /// Whether the original (paper) bill of lading is on hand.
    pub original_bl_available: bool,
    /// Whether locally incurred charges have been validated.
    pub local_charges_validated: bool,
    /// When valuation was finalized, if it has been.
    pub valuation_finalized_at: Option<DateTime<Utc>>,
    /// When the file was closed. Stamped on entering `CLOSED`.
    pub closed_at: Option<DateTime<Utc>>,
    /// When the operation was created.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Operation {
    /// Create a new operation in `DRAFT` status.
    pub fn new(
        reference: impl Into<String>,
        transport_mode: TransportMode,
        category: OperationCategory,
        origin_country: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: OperationId::new(),
            reference: reference.into(),
            status: OperationStatus::Draft,
            transport_mode,
            category,
            inspection_type: None,
            origin_country: origin_country.into(),
            original_bl_available: false,
            local_charges_validated: false,
            valuation_finalized_at: None,
            closed_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

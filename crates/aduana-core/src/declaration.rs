//! # Declaration and Tariff Line Models
//!
//! A declaration is a customs valuation/tax filing. Every operation
//! carries at most two: a PRELIMINARY declaration (early estimate) and a
//! FINAL declaration (post-clearance figures). The crossing engine diffs
//! the two; the preliquidation calculator derives the header totals from
//! the tariff lines.
//!
//! Monetary header fields are all `Option<Decimal>` — a field that has
//! not been captured yet is `None`, which the crossing engine treats
//! distinctly from zero.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EnumParseError;
use crate::ids::{DeclarationId, OperationId};

// ─── Declaration Type ────────────────────────────────────────────────

/// The two logical roles a declaration can play for an operation.
/// At most one declaration per (operation, type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeclarationType {
    /// Early estimate, registered during internal review.
    Preliminary,
    /// Definitive figures, prepared for submission to the DGA.
    Final,
}

impl DeclarationType {
    /// The wire name of this declaration type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preliminary => "PRELIMINARY",
            Self::Final => "FINAL",
        }
    }
}

impl std::fmt::Display for DeclarationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeclarationType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PRELIMINARY" => Ok(Self::Preliminary),
            "FINAL" => Ok(Self::Final),
            other => Err(EnumParseError::new("DeclarationType", other)),
        }
    }
}

// ─── Declaration ─────────────────────────────────────────────────────

/// A customs declaration: monetary header, approval trail, DGA
/// submission fields, and GATT valuation-adjustment fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Declaration {
    /// Unique declaration identifier.
    pub id: DeclarationId,
    /// The operation this declaration belongs to.
    pub operation_id: OperationId,
    /// PRELIMINARY or FINAL.
    pub declaration_type: DeclarationType,

    // Monetary header.
    /// Free-on-board value of the goods.
    pub fob_value: Option<Decimal>,
    /// Freight cost.
    pub freight_value: Option<Decimal>,
    /// Insurance cost.
    pub insurance_value: Option<Decimal>,
    /// Cost-insurance-freight value (FOB + freight + insurance).
    pub cif_value: Option<Decimal>,
    /// Taxable base for duty computation.
    pub taxable_base: Option<Decimal>,
    /// Total taxes across all tariff lines.
    pub total_taxes: Option<Decimal>,

    // Approval trail.
    /// Technical approver, when technically approved.
    pub technical_approved_by: Option<String>,
    /// When the technical approval was granted.
    pub technical_approved_at: Option<DateTime<Utc>>,
    /// Final approver, when finally approved.
    pub final_approved_by: Option<String>,
    /// When the final approval was granted.
    pub final_approved_at: Option<DateTime<Utc>>,
    /// Who rejected the declaration, if rejected.
    pub rejected_by: Option<String>,
    /// When the declaration was rejected.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Why the declaration was rejected.
    pub rejection_reason: Option<String>,

    // DGA submission.
    /// Reference number assigned by the DGA on submission.
    pub dga_reference: Option<String>,
    /// When the declaration was submitted to the DGA.
    pub submitted_to_dga_at: Option<DateTime<Utc>>,

    // GATT valuation.
    /// Whether the GATT Article 1 valuation form is complete.
    pub gatt_form_completed: bool,
    /// Net GATT valuation adjustments.
    pub gatt_adjustments: Option<Decimal>,

    /// When the declaration was registered.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Declaration {
    /// Register a new, empty declaration of the given type.
    pub fn new(operation_id: OperationId, declaration_type: DeclarationType) -> Self {
        let now = Utc::now();
        Self {
            id: DeclarationId::new(),
            operation_id,
            declaration_type,
            fob_value: None,
            freight_value: None,
            insurance_value: None,
            cif_value: None,
            taxable_base: None,
            total_taxes: None,
            technical_approved_by: None,
            technical_approved_at: None,
            final_approved_by: None,
            final_approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            dga_reference: None,
            submitted_to_dga_at: None,
            gatt_form_completed: false,
            gatt_adjustments: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a technical approval has been granted.
    pub fn has_technical_approval(&self) -> bool {
        self.technical_approved_by.is_some()
    }

    /// Whether a final approval has been granted.
    pub fn has_final_approval(&self) -> bool {
        self.final_approved_by.is_some()
    }

    /// Whether the declaration has been submitted to the DGA.
    pub fn is_submitted_to_dga(&self) -> bool {
        self.submitted_to_dga_at.is_some()
    }

    /// Clear both approvals (used when a rejection reverts the file to
    /// correction).
    pub fn clear_approvals(&mut self) {
        self.technical_approved_by = None;
        self.technical_approved_at = None;
        self.final_approved_by = None;
        self.final_approved_at = None;
    }
}

// ─── Tariff Line ─────────────────────────────────────────────────────

/// One tariff line item of a declaration, keyed by a line number unique
/// within that declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TariffLine {
    /// The declaration this line belongs to.
    pub declaration_id: DeclarationId,
    /// Line number, unique within the declaration.
    pub line_number: u32,
    /// Harmonized tariff code.
    pub tariff_code: String,
    /// Goods description.
    pub description: String,
    /// Declared quantity.
    pub quantity: Option<Decimal>,
    /// Unit value.
    pub unit_value: Option<Decimal>,
    /// Total line value.
    pub total_value: Option<Decimal>,
    /// Applicable tax rate (fraction, e.g. 0.15).
    pub tax_rate: Option<Decimal>,
    /// Computed tax amount for the line.
    pub tax_amount: Option<Decimal>,
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_declaration_is_unapproved() {
        let decl = Declaration::new(OperationId::new(), DeclarationType::Preliminary);
        assert!(!decl.has_technical_approval());
        assert!(!decl.has_final_approval());
        assert!(!decl.is_submitted_to_dga());
        assert!(!decl.gatt_form_completed);
    }

    #[test]
    fn test_clear_approvals_resets_both() {
        let mut decl = Declaration::new(OperationId::new(), DeclarationType::Preliminary);
        decl.technical_approved_by = Some("tech@broker.example".to_string());
        decl.technical_approved_at = Some(Utc::now());
        decl.final_approved_by = Some("chief@broker.example".to_string());
        decl.final_approved_at = Some(Utc::now());

        decl.clear_approvals();
        assert!(!decl.has_technical_approval());
        assert!(!decl.has_final_approval());
        assert!(decl.technical_approved_at.is_none());
        assert!(decl.final_approved_at.is_none());
    }

    #[test]
    fn test_declaration_type_round_trip() {
        use std::str::FromStr;
        assert_eq!(
            DeclarationType::from_str("PRELIMINARY").unwrap(),
            DeclarationType::Preliminary
        );
        assert_eq!(DeclarationType::Final.as_str(), "FINAL");
    }

    #[test]
    fn test_monetary_fields_serialize_as_exact_decimals() {
        let mut decl = Declaration::new(OperationId::new(), DeclarationType::Final);
        decl.fob_value = Some(Decimal::new(1050055, 2)); // 10500.55
        let json = serde_json::to_string(&decl).unwrap();
        assert!(json.contains("10500.55"), "got: {json}");
    }
}

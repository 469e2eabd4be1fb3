//! # Crossing Result and Discrepancy Types
//!
//! One `CrossingResult` records one reconciliation attempt between an
//! operation's preliminary and final declarations. Re-running the
//! crossing supersedes the previous result wholesale — only the latest
//! attempt survives, enforced by the crossing service.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use aduana_core::{CrossingId, EnumParseError, OperationId};

// ─── Crossing Status ─────────────────────────────────────────────────

/// Status of a crossing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossingStatus {
    /// Created but not yet executed.
    Pending,
    /// Executed; no discrepancies found.
    Match,
    /// Executed; at least one discrepancy found.
    Discrepancy,
    /// A discrepancy result explicitly resolved by an actor. Terminal
    /// for this result instance.
    Resolved,
}

impl CrossingStatus {
    /// The wire name of this crossing status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Match => "MATCH",
            Self::Discrepancy => "DISCREPANCY",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl std::fmt::Display for CrossingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CrossingStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "MATCH" => Ok(Self::Match),
            "DISCREPANCY" => Ok(Self::Discrepancy),
            "RESOLVED" => Ok(Self::Resolved),
            other => Err(EnumParseError::new("CrossingStatus", other)),
        }
    }
}

// ─── Discrepancy Field ───────────────────────────────────────────────

/// Which compared field a discrepancy was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancyField {
    // Header fields.
    FobValue,
    CifValue,
    TaxableBase,
    TotalTaxes,
    FreightValue,
    InsuranceValue,
    // Tariff line fields.
    /// A line number present on one side only.
    TariffLineMissing,
    LineQuantity,
    LineTotalValue,
    LineTaxAmount,
}

impl DiscrepancyField {
    /// The wire name of this field kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FobValue => "FOB_VALUE",
            Self::CifValue => "CIF_VALUE",
            Self::TaxableBase => "TAXABLE_BASE",
            Self::TotalTaxes => "TOTAL_TAXES",
            Self::FreightValue => "FREIGHT_VALUE",
            Self::InsuranceValue => "INSURANCE_VALUE",
            Self::TariffLineMissing => "TARIFF_LINE_MISSING",
            Self::LineQuantity => "LINE_QUANTITY",
            Self::LineTotalValue => "LINE_TOTAL_VALUE",
            Self::LineTaxAmount => "LINE_TAX_AMOUNT",
        }
    }
}

impl std::fmt::Display for DiscrepancyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DiscrepancyField {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FOB_VALUE" => Ok(Self::FobValue),
            "CIF_VALUE" => Ok(Self::CifValue),
            "TAXABLE_BASE" => Ok(Self::TaxableBase),
            "TOTAL_TAXES" => Ok(Self::TotalTaxes),
            "FREIGHT_VALUE" => Ok(Self::FreightValue),
            "INSURANCE_VALUE" => Ok(Self::InsuranceValue),
            "TARIFF_LINE_MISSING" => Ok(Self::TariffLineMissing),
            "LINE_QUANTITY" => Ok(Self::LineQuantity),
            "LINE_TOTAL_VALUE" => Ok(Self::LineTotalValue),
            "LINE_TAX_AMOUNT" => Ok(Self::LineTaxAmount),
            other => Err(EnumParseError::new("DiscrepancyField", other)),
        }
    }
}

// ─── Discrepancy ─────────────────────────────────────────────────────

/// One detected mismatch between the preliminary and final declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingDiscrepancy {
    /// Which field mismatched.
    pub field: DiscrepancyField,
    /// Tariff line number, for line-level discrepancies.
    pub line_number: Option<u32>,
    /// Tariff code of the line, where one is available.
    pub tariff_code: Option<String>,
    /// String-rendered preliminary value ("—" when absent).
    pub preliminary_value: String,
    /// String-rendered final value ("—" when absent).
    pub final_value: String,
    /// Signed numeric difference (final − preliminary), where both
    /// sides are numeric. Nulls count as zero for the difference only.
    pub difference: Option<Decimal>,
}

// ─── Crossing Result ─────────────────────────────────────────────────

/// One reconciliation attempt between an operation's preliminary and
/// final declarations, with its owned discrepancy list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossingResult {
    /// Unique identifier of this attempt.
    pub id: CrossingId,
    /// The operation this crossing belongs to.
    pub operation_id: OperationId,
    /// Outcome classification.
    pub status: CrossingStatus,
    /// The discrepancies detected by this attempt.
    pub discrepancies: Vec<CrossingDiscrepancy>,
    /// Who ran the crossing.
    pub executed_by: String,
    /// When it ran.
    pub executed_at: DateTime<Utc>,
    /// Who resolved a DISCREPANCY result, once resolved.
    pub resolved_by: Option<String>,
    /// When it was resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Resolution comment.
    pub resolution_comment: Option<String>,
}

/// Errors raised by crossing result state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrossingError {
    /// Resolve was requested on a result that is not in DISCREPANCY
    /// status (already MATCH, already RESOLVED, or still PENDING).
    #[error("crossing result is {status}, not DISCREPANCY; nothing to resolve")]
    NotInDiscrepancyState {
        /// The status the result actually has.
        status: CrossingStatus,
    },
}

impl CrossingResult {
    /// Build an executed result from a discrepancy list, classifying it
    /// as MATCH or DISCREPANCY.
    pub fn executed(
        operation_id: OperationId,
        discrepancies: Vec<CrossingDiscrepancy>,
        executed_by: &str,
    ) -> Self {
        let status = super::compare::classify(&discrepancies);
        Self {
            id: CrossingId::new(),
            operation_id,
            status,
            discrepancies,
            executed_by: executed_by.to_string(),
            executed_at: Utc::now(),
            resolved_by: None,
            resolved_at: None,
            resolution_comment: None,
        }
    }

    /// Advance a DISCREPANCY result to RESOLVED, recording actor and
    /// comment. RESOLVED is terminal for this result instance; only
    /// re-running the crossing produces a fresh result.
    pub fn resolve(&mut self, actor: &str, comment: &str) -> Result<(), CrossingError> {
        if self.status != CrossingStatus::Discrepancy {
            return Err(CrossingError::NotInDiscrepancyState {
                status: self.status,
            });
        }
        self.status = CrossingStatus::Resolved;
        self.resolved_by = Some(actor.to_string());
        self.resolved_at = Some(Utc::now());
        self.resolution_comment = Some(comment.to_string());
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

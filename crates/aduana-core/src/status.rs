//! # Operation Status and Classification Enums
//!
//! The closed vocabulary of the operation lifecycle: the 14-state status
//! enum plus the transport / category / inspection classifiers that the
//! compliance rules key on.
//!
//! Which transitions between statuses are legal is NOT defined here —
//! that is the transition graph in `aduana-state`. This module only
//! defines the state set and its wire names.

use serde::{Deserialize, Serialize};

use crate::error::EnumParseError;

// ─── Operation Status ────────────────────────────────────────────────

/// The lifecycle status of an operation.
///
/// An operation's status is the single source of truth for where the
/// shipment file sits in the brokerage workflow. It only ever changes
/// through the transition state machine in `aduana-state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// Initial intake state. The only state in which an operation may be
    /// physically deleted.
    Draft,
    /// All mandatory documents have been registered.
    DocumentationComplete,
    /// Internal review of the file by brokerage staff.
    InReview,
    /// Review of the preliminary liquidation figures.
    PreliquidationReview,
    /// Recoverable side branch: the file was kicked back for correction.
    PendingCorrection,
    /// A customs analyst has taken ownership of the file.
    AnalystAssigned,
    /// The final declaration is being prepared.
    DeclarationInProgress,
    /// The declaration has been submitted to the customs authority (DGA).
    SubmittedToCustoms,
    /// Customs valuation is under review.
    ValuationReview,
    /// Blocked on an external agency permit.
    PendingExternalApproval,
    /// Cleared for duty payment preparation.
    PaymentPreparation,
    /// Goods released and in transit to the consignee.
    InTransit,
    /// File closed. Terminal.
    Closed,
    /// File cancelled. Terminal.
    Cancelled,
}

impl OperationStatus {
    /// All statuses, in workflow order.
    pub const ALL: [OperationStatus; 14] = [
        Self::Draft,
        Self::DocumentationComplete,
        Self::InReview,
        Self::PreliquidationReview,
        Self::PendingCorrection,
        Self::AnalystAssigned,
        Self::DeclarationInProgress,
        Self::SubmittedToCustoms,
        Self::ValuationReview,
        Self::PendingExternalApproval,
        Self::PaymentPreparation,
        Self::InTransit,
        Self::Closed,
        Self::Cancelled,
    ];

    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::DocumentationComplete => "DOCUMENTATION_COMPLETE",
            Self::InReview => "IN_REVIEW",
            Self::PreliquidationReview => "PRELIQUIDATION_REVIEW",
            Self::PendingCorrection => "PENDING_CORRECTION",
            Self::AnalystAssigned => "ANALYST_ASSIGNED",
            Self::DeclarationInProgress => "DECLARATION_IN_PROGRESS",
            Self::SubmittedToCustoms => "SUBMITTED_TO_CUSTOMS",
            Self::ValuationReview => "VALUATION_REVIEW",
            Self::PendingExternalApproval => "PENDING_EXTERNAL_APPROVAL",
            Self::PaymentPreparation => "PAYMENT_PREPARATION",
            Self::InTransit => "IN_TRANSIT",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| EnumParseError::new("OperationStatus", s))
    }
}

// ─── Transport Mode ──────────────────────────────────────────────────

/// How the goods move: by sea, air, or land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportMode {
    Maritime,
    Air,
    Land,
}

impl TransportMode {
    /// The wire name of this transport mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Maritime => "MARITIME",
            Self::Air => "AIR",
            Self::Land => "LAND",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TransportMode {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MARITIME" => Ok(Self::Maritime),
            "AIR" => Ok(Self::Air),
            "LAND" => Ok(Self::Land),
            other => Err(EnumParseError::new("TransportMode", other)),
        }
    }
}

// ─── Operation Category ──────────────────────────────────────────────

/// Brokerage operation category. Drives which compliance rules apply
/// (e.g. invoice validation for CATEGORY_1, full document validation
/// for CATEGORY_3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationCategory {
    #[serde(rename = "CATEGORY_1")]
    Category1,
    #[serde(rename = "CATEGORY_2")]
    Category2,
    #[serde(rename = "CATEGORY_3")]
    Category3,
}

impl OperationCategory {
    /// The wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Category1 => "CATEGORY_1",
            Self::Category2 => "CATEGORY_2",
            Self::Category3 => "CATEGORY_3",
        }
    }
}

impl std::fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationCategory {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CATEGORY_1" => Ok(Self::Category1),
            "CATEGORY_2" => Ok(Self::Category2),
            "CATEGORY_3" => Ok(Self::Category3),
            other => Err(EnumParseError::new("OperationCategory", other)),
        }
    }
}

// ─── Inspection Type ─────────────────────────────────────────────────

/// The customs inspection channel assigned by the DGA.
///
/// `Expreso` is the fast channel (no physical review); `Visual` and
/// `Fisica` involve document or physical inspection and require the
/// GATT Article 1 valuation form before payment preparation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionType {
    Expreso,
    Visual,
    Fisica,
}

impl InspectionType {
    /// The wire name of this inspection type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expreso => "EXPRESO",
            Self::Visual => "VISUAL",
            Self::Fisica => "FISICA",
        }
    }

    /// Whether this inspection channel requires a completed GATT
    /// Article 1 valuation form before payment preparation.
    pub fn requires_gatt_form(&self) -> bool {
        matches!(self, Self::Visual | Self::Fisica)
    }
}

impl std::fmt::Display for InspectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InspectionType {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EXPRESO" => Ok(Self::Expreso),
            "VISUAL" => Ok(Self::Visual),
            "FISICA" => Ok(Self::Fisica),
            other => Err(EnumParseError::new("InspectionType", other)),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in OperationStatus::ALL {
            let parsed = OperationStatus::from_str(status.as_str()).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_serde_uses_wire_names() {
        let json = serde_json::to_string(&OperationStatus::SubmittedToCustoms).unwrap();
        assert_eq!(json, "\"SUBMITTED_TO_CUSTOMS\"");
        let back: OperationStatus = serde_json::from_str("\"PENDING_EXTERNAL_APPROVAL\"").unwrap();
        assert_eq!(back, OperationStatus::PendingExternalApproval);
    }

    #[test]
    fn test_status_rejects_unknown_name() {
        let err = OperationStatus::from_str("ARCHIVED").unwrap_err();
        assert_eq!(err.enum_name, "OperationStatus");
        assert_eq!(err.value, "ARCHIVED");
    }

    #[test]
    fn test_category_wire_names_carry_underscore() {
        let json = serde_json::to_string(&OperationCategory::Category1).unwrap();
        assert_eq!(json, "\"CATEGORY_1\"");
        assert_eq!(
            OperationCategory::from_str("CATEGORY_3").unwrap(),
            OperationCategory::Category3
        );
    }

    #[test]
    fn test_transport_round_trip() {
        for mode in [TransportMode::Maritime, TransportMode::Air, TransportMode::Land] {
            assert_eq!(TransportMode::from_str(mode.as_str()).unwrap(), mode);
        }
    }

    #[test]
    fn test_gatt_form_channels() {
        assert!(!InspectionType::Expreso.requires_gatt_form());
        assert!(InspectionType::Visual.requires_gatt_form());
        assert!(InspectionType::Fisica.requires_gatt_form());
    }
}

//! # External Permit Model
//!
//! Permits issued by external agencies (health, agriculture, defense,
//! etc.) that can gate an operation's progress. A permit whose status is
//! `IN_PROCESS` is the "blocking" state: while any permit of an
//! operation is blocking, the operation cannot enter payment
//! preparation and is parked in `PENDING_EXTERNAL_APPROVAL`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EnumParseError;
use crate::ids::{OperationId, PermitId};

// ─── Permit Status ───────────────────────────────────────────────────

/// Status of an external agency permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermitStatus {
    /// Still being processed by the agency. The blocking status.
    InProcess,
    /// Granted.
    Approved,
    /// Denied.
    Rejected,
}

impl PermitStatus {
    /// The wire name of this permit status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProcess => "IN_PROCESS",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
        }
    }

    /// Whether this status blocks payment preparation.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::InProcess)
    }
}

impl std::fmt::Display for PermitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermitStatus {
    type Err = EnumParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_PROCESS" => Ok(Self::InProcess),
            "APPROVED" => Ok(Self::Approved),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(EnumParseError::new("PermitStatus", other)),
        }
    }
}

// ─── Permit ──────────────────────────────────────────────────────────

/// An external agency permit attached to an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permit {
    /// Unique permit identifier.
    pub id: PermitId,
    /// The operation this permit belongs to.
    pub operation_id: OperationId,
    /// Issuing agency or permit kind (free-form, e.g. "SENASA").
    pub permit_type: String,
    /// Current status.
    pub status: PermitStatus,
    /// Agency reference number, once assigned.
    pub reference: Option<String>,
    /// When the permit was created.
    pub created_at: DateTime<Utc>,
    /// Last status change timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Permit {
    /// Create a new permit in `IN_PROCESS` status.
    pub fn new(operation_id: OperationId, permit_type: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PermitId::new(),
            operation_id,
            permit_type: permit_type.into(),
            status: PermitStatus::InProcess,
            reference: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_process_is_the_only_blocking_status() {
        assert!(PermitStatus::InProcess.is_blocking());
        assert!(!PermitStatus::Approved.is_blocking());
        assert!(!PermitStatus::Rejected.is_blocking());
    }

    #[test]
    fn test_new_permit_starts_blocking() {
        let permit = Permit::new(OperationId::new(), "SENASA");
        assert!(permit.status.is_blocking());
        assert!(permit.reference.is_none());
    }
}

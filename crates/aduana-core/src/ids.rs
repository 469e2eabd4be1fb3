//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the Aduana Stack.
//! These prevent accidental identifier confusion — you cannot pass a
//! `DeclarationId` where an `OperationId` is expected, even though both
//! are UUIDs underneath.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for an operation (an import/export shipment file).
    OperationId,
    "operation"
);

uuid_id!(
    /// Unique identifier for a customs declaration.
    DeclarationId,
    "declaration"
);

uuid_id!(
    /// Unique identifier for an uploaded document.
    DocumentId,
    "document"
);

uuid_id!(
    /// Unique identifier for an external agency permit.
    PermitId,
    "permit"
);

uuid_id!(
    /// Unique identifier for a crossing (declaration reconciliation) result.
    CrossingId,
    "crossing"
);

// ─── Tests ───────────────────────────────────────────────────────────

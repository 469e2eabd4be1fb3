//! # aduana-core — Foundational Types for the Aduana Stack
//!
//! This crate is the bedrock of the Aduana Stack, a customs brokerage
//! operation management system. It defines the domain models and enums
//! shared by every other crate in the workspace; it depends on nothing
//! internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `OperationId`,
//!    `DeclarationId`, `DocumentId`, `PermitId`, `CrossingId` — all
//!    UUID newtypes. No bare strings or bare UUIDs for identifiers.
//!
//! 2. **Closed status enums with wire-stable names.** Every status-like
//!    enum serializes as `SCREAMING_SNAKE_CASE` and round-trips through
//!    `as_str()` / `FromStr`. Adding a variant forces every consumer to
//!    handle it.
//!
//! 3. **`rust_decimal::Decimal` for money.** No floats anywhere in
//!    monetary fields — FOB, CIF, freight, insurance, taxable base, tax
//!    amounts are all exact decimals.
//!
//! 4. **UTC-only timestamps.** `chrono::DateTime<Utc>` throughout.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `aduana-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod declaration;
pub mod document;
pub mod error;
pub mod ids;
pub mod operation;
pub mod permit;
pub mod status;

// Re-export primary types for ergonomic imports.
pub use declaration::{Declaration, DeclarationType, TariffLine};
pub use document::{Document, DocumentStatus, DocumentType, MANDATORY_DOCUMENT_TYPES};
pub use error::EnumParseError;
pub use ids::{CrossingId, DeclarationId, DocumentId, OperationId, PermitId};
pub use operation::Operation;
pub use permit::{Permit, PermitStatus};
pub use status::{InspectionType, OperationCategory, OperationStatus, TransportMode};

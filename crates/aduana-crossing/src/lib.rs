//! # aduana-crossing — Declaration Reconciliation
//!
//! The "crossing" compares an operation's PRELIMINARY and FINAL
//! declarations line-by-line and field-by-field and produces a list of
//! discrepancies. It is the financial tripwire of the workflow: an
//! unresolved DISCREPANCY result blocks the file from leaving
//! `SUBMITTED_TO_CUSTOMS`.
//!
//! ## Design
//!
//! - The diff (`compare`) is a pure function over the two declarations
//!   and their tariff lines: no I/O, deterministic, order-independent.
//! - Amounts are `rust_decimal::Decimal`; two amounts match iff their
//!   absolute difference is within a fixed 0.01 tolerance.
//! - Persistence semantics (supersede-on-rerun, at most one live result
//!   per operation) are enforced by the crossing service in
//!   `aduana-ops`; this crate only defines the computation and the
//!   result/discrepancy types.
//!
//! The preliquidation calculator lives here too: it derives the CIF /
//! taxable-base / total-taxes header figures from a declaration's
//! tariff lines, feeding the same headers the crossing later diffs.

pub mod compare;
pub mod preliquidation;
pub mod result;

pub use compare::{amounts_match, classify, compare, TOLERANCE};
pub use preliquidation::{calculate, PreliquidationTotals};
pub use result::{
    CrossingDiscrepancy, CrossingError, CrossingResult, CrossingStatus, DiscrepancyField,
};

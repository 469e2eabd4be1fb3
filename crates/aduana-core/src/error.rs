//! # Core Error Types
//!
//! Errors raised by the foundational types themselves. The richer
//! business-error taxonomy (invalid transitions, compliance failures,
//! idempotency guards) lives in the crates that own those behaviors.

use thiserror::Error;

/// A string did not name a variant of a closed domain enum.
///
/// Raised by the `FromStr` implementations of the status-like enums,
/// which accept exactly the `SCREAMING_SNAKE_CASE` wire names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {enum_name}")]
pub struct EnumParseError {
    /// The enum that rejected the value.
    pub enum_name: &'static str,
    /// The rejected input.
    pub value: String,
}

impl EnumParseError {
    /// Build a parse error for the named enum.
    pub fn new(enum_name: &'static str, value: &str) -> Self {
        Self {
            enum_name,
            value: value.to_string(),
        }
    }
}

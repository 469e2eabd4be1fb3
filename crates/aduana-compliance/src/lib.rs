//! # aduana-compliance — Compliance Validation Engine
//!
//! Gates operation status transitions on document, declaration, permit,
//! and crossing state. The engine iterates a closed, explicitly
//! enumerated rule catalogue; each rule is an independent read-only
//! predicate + validator pair.
//!
//! ## Design
//!
//! - **Closed rule set.** `builtin_rules()` constructs the full
//!   catalogue at startup. No runtime discovery, no reflection — adding
//!   a rule means adding it to that list, which keeps evaluation
//!   deterministic and the catalogue testable as a unit.
//! - **Applicability first.** A rule whose `applies_to` predicate
//!   rejects the proposed transition is inert: it contributes zero
//!   errors and is neither "passed" nor "failed".
//! - **External enable/disable.** A rule whose code is explicitly
//!   disabled in the [`RuleConfigStore`] is skipped entirely; absence
//!   of configuration means enabled.
//! - **Fail-closed parameters.** Rules declare the shape they expect of
//!   their string parameters and fall back to their built-in default on
//!   malformed values, logging the fallback.
//! - **No mutation, no I/O.** Rules only read the snapshot in
//!   [`RuleContext`]; the engine is a synchronous in-memory
//!   computation.

pub mod config;
pub mod context;
pub mod engine;
pub mod rules;

pub use config::{bool_param, set_param, InMemoryRuleConfigStore, RuleConfigStore};
pub use context::RuleContext;
pub use engine::{ComplianceEngine, ComplianceRule, RuleError, ValidationResult};
pub use rules::builtin_rules;

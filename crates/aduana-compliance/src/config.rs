//! # Rule Configuration Store
//!
//! Externally editable per-rule configuration: an enable/disable flag
//! and string parameters keyed by (rule code, parameter key). The
//! external representation stays stringly-typed for operability; rules
//! parse through the typed accessors here, which fail closed — a
//! malformed value behaves as if unconfigured, and the rule falls back
//! to its built-in default.

use std::collections::{BTreeSet, HashMap};

use parking_lot::RwLock;

/// Read interface rules and the engine consult at evaluation time.
pub trait RuleConfigStore: Send + Sync {
    /// Whether the rule is enabled. Unconfigured rules are enabled.
    fn is_enabled(&self, rule_code: &str) -> bool;

    /// The raw string value of a rule parameter, if configured.
    fn param(&self, rule_code: &str, key: &str) -> Option<String>;
}

/// Parse a comma-separated parameter into an uppercased, trimmed set.
///
/// Returns `None` (caller falls back to its default) when the parameter
/// is unconfigured or parses to an empty set.
pub fn set_param(
    store: &dyn RuleConfigStore,
    rule_code: &str,
    key: &str,
) -> Option<BTreeSet<String>> {
    let raw = store.param(rule_code, key)?;
    let set: BTreeSet<String> = raw
        .split(',')
        .map(|entry| entry.trim().to_uppercase())
        .filter(|entry| !entry.is_empty())
        .collect();
    if set.is_empty() {
        tracing::warn!(
            rule_code,
            key,
            raw,
            "rule parameter parsed to an empty set; using the rule's built-in default"
        );
        return None;
    }
    Some(set)
}

/// Parse a boolean parameter ("true"/"false", case-insensitive).
///
/// Returns `None` (caller falls back to its default) when unconfigured
/// or malformed.
pub fn bool_param(store: &dyn RuleConfigStore, rule_code: &str, key: &str) -> Option<bool> {
    let raw = store.param(rule_code, key)?;
    match raw.trim().to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            tracing::warn!(
                rule_code,
                key,
                raw,
                "rule parameter is not a boolean; using the rule's built-in default"
            );
            None
        }
    }
}

/// In-memory, thread-safe implementation of [`RuleConfigStore`].
///
/// The API layer mutates this through `set_enabled` / `set_value`; the
/// engine only ever reads.
#[derive(Debug, Default)]
pub struct InMemoryRuleConfigStore {
    enabled: RwLock<HashMap<String, bool>>,
    params: RwLock<HashMap<(String, String), String>>,
}

impl InMemoryRuleConfigStore {
    /// Create an empty store (every rule enabled, no parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly enable or disable a rule by code.
    pub fn set_enabled(&self, rule_code: &str, enabled: bool) {
        self.enabled.write().insert(rule_code.to_string(), enabled);
    }

    /// Remove the explicit enabled flag (back to the default: enabled).
    pub fn clear_enabled(&self, rule_code: &str) {
        self.enabled.write().remove(rule_code);
    }

    /// Set a parameter value.
    pub fn set_value(&self, rule_code: &str, key: &str, value: &str) {
        self.params
            .write()
            .insert((rule_code.to_string(), key.to_string()), value.to_string());
    }

    /// Remove a parameter.
    pub fn clear_value(&self, rule_code: &str, key: &str) {
        self.params
            .write()
            .remove(&(rule_code.to_string(), key.to_string()));
    }

    /// Snapshot of all explicit enabled flags (for the config API).
    pub fn enabled_flags(&self) -> HashMap<String, bool> {
        self.enabled.read().clone()
    }

    /// The rule codes that currently carry at least one parameter.
    pub fn configured_rule_codes(&self) -> BTreeSet<String> {
        self.params
            .read()
            .keys()
            .map(|(code, _)| code.clone())
            .collect()
    }

    /// Snapshot of all parameters for one rule (for the config API).
    pub fn params_for(&self, rule_code: &str) -> HashMap<String, String> {
        self.params
            .read()
            .iter()
            .filter(|((code, _), _)| code == rule_code)
            .map(|((_, key), value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl RuleConfigStore for InMemoryRuleConfigStore {
    fn is_enabled(&self, rule_code: &str) -> bool {
        self.enabled.read().get(rule_code).copied().unwrap_or(true)
    }

    fn param(&self, rule_code: &str, key: &str) -> Option<String> {
        self.params
            .read()
            .get(&(rule_code.to_string(), key.to_string()))
            .cloned()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

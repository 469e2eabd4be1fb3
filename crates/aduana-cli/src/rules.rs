//! # Rules Subcommand
//!
//! Prints the compliance rule catalogue: rule code, the target statuses
//! the rule gates, its enabled flag, and its parameters. An optional
//! YAML file supplies enable flags and parameter overrides in the same
//! shape the API's rule configuration endpoints use.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Deserialize;

use aduana_compliance::{ComplianceEngine, InMemoryRuleConfigStore, RuleConfigStore};
use aduana_core::{OperationCategory, OperationStatus, TransportMode};

/// Arguments for the `aduana rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// YAML rule configuration file (rule code -> {enabled, params}).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// One rule's configuration in the YAML file.
#[derive(Debug, Deserialize)]
struct RuleFileEntry {
    /// Explicit enable flag; absent means enabled.
    enabled: Option<bool>,
    /// String parameters keyed by parameter name.
    #[serde(default)]
    params: BTreeMap<String, String>,
}

/// Load a YAML rule configuration file into a fresh store.
fn load_config(path: &Path) -> Result<InMemoryRuleConfigStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading rule config {}", path.display()))?;
    let entries: BTreeMap<String, RuleFileEntry> =
        serde_yaml::from_str(&raw).with_context(|| format!("parsing rule config {}", path.display()))?;

    let store = InMemoryRuleConfigStore::new();
    for (rule_code, entry) in entries {
        if let Some(enabled) = entry.enabled {
            store.set_enabled(&rule_code, enabled);
        }
        for (key, value) in entry.params {
            store.set_value(&rule_code, &key, &value);
        }
    }
    Ok(store)
}

/// The target statuses a rule gates, probed over every transition the
/// graph could ever propose.
fn gated_targets(rule: &dyn aduana_compliance::ComplianceRule) -> BTreeSet<&'static str> {
    const TRANSPORTS: [TransportMode; 3] =
        [TransportMode::Maritime, TransportMode::Air, TransportMode::Land];
    const CATEGORIES: [OperationCategory; 3] = [
        OperationCategory::Category1,
        OperationCategory::Category2,
        OperationCategory::Category3,
    ];

    let mut targets = BTreeSet::new();
    for from in OperationStatus::ALL {
        for to in OperationStatus::ALL {
            for transport in TRANSPORTS {
                for category in CATEGORIES {
                    if rule.applies_to(from, to, transport, category) {
                        targets.insert(to.as_str());
                    }
                }
            }
        }
    }
    targets
}

/// Run the `rules` subcommand.
pub fn run_rules(args: &RulesArgs) -> Result<u8> {
    let engine = ComplianceEngine::new();
    let store = match &args.config {
        Some(path) => load_config(path)?,
        None => InMemoryRuleConfigStore::new(),
    };

    for rule in engine.rules() {
        let code = rule.code();
        let enabled = if store.is_enabled(code) { "enabled" } else { "DISABLED" };
        let targets: Vec<&str> = gated_targets(rule).into_iter().collect();
        println!("{code} [{enabled}] gates -> {}", targets.join(", "));

        let params = store.params_for(code);
        let mut params: Vec<_> = params.into_iter().collect();
        params.sort();
        for (key, value) in params {
            println!("    {key} = {value}");
        }
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_gated_targets_for_doc_completeness() {
        let engine = ComplianceEngine::new();
        let rule = engine
            .rules()
            .find(|rule| rule.code() == "DOC_COMPLETENESS")
            .unwrap();
        let targets = gated_targets(rule);
        assert_eq!(
            targets.into_iter().collect::<Vec<_>>(),
            vec!["DOCUMENTATION_COMPLETE"]
        );
    }

    #[test]
    fn test_load_config_applies_flags_and_params() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "DOC_COMPLETENESS:\n  enabled: false\nRESTRICTED_COUNTRY:\n  params:\n    restricted_countries: \"CU, KP\"\n"
        )
        .unwrap();

        let store = load_config(file.path()).unwrap();
        assert!(!store.is_enabled("DOC_COMPLETENESS"));
        assert!(store.is_enabled("RESTRICTED_COUNTRY"));
        assert_eq!(
            store.param("RESTRICTED_COUNTRY", "restricted_countries").as_deref(),
            Some("CU, KP")
        );
    }

    #[test]
    fn test_load_config_rejects_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{]").unwrap();
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_run_rules_with_defaults() {
        let args = RulesArgs { config: None };
        assert_eq!(run_rules(&args).unwrap(), 0);
    }
}

//! # Graph Subcommand
//!
//! Prints the transition allow-list, either the whole graph or the
//! outgoing edges of one status.

use anyhow::{Context, Result};
use clap::Args;

use aduana_core::OperationStatus;
use aduana_state::allowed_transitions;

/// Arguments for the `aduana graph` subcommand.
#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Only print the outgoing edges of this status (e.g. DRAFT).
    #[arg(long)]
    pub from: Option<String>,
}

/// Run the `graph` subcommand.
pub fn run_graph(args: &GraphArgs) -> Result<u8> {
    let statuses: Vec<OperationStatus> = match &args.from {
        Some(raw) => {
            let status = raw
                .parse()
                .with_context(|| format!("unknown status {raw:?}"))?;
            vec![status]
        }
        None => OperationStatus::ALL.to_vec(),
    };

    for status in statuses {
        println!("{}", format_row(status));
    }
    Ok(0)
}

fn format_row(from: OperationStatus) -> String {
    let targets = allowed_transitions(from);
    if targets.is_empty() {
        format!("{from} -> (terminal)")
    } else {
        let list: Vec<&str> = targets.iter().map(|status| status.as_str()).collect();
        format!("{from} -> {}", list.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_lists_targets() {
        assert_eq!(
            format_row(OperationStatus::Draft),
            "DRAFT -> DOCUMENTATION_COMPLETE, CANCELLED"
        );
    }

    #[test]
    fn test_format_row_marks_terminals() {
        assert_eq!(format_row(OperationStatus::Closed), "CLOSED -> (terminal)");
    }

    #[test]
    fn test_run_graph_rejects_unknown_status() {
        let args = GraphArgs {
            from: Some("LIMBO".to_string()),
        };
        assert!(run_graph(&args).is_err());
    }
}

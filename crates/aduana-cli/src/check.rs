//! # Check Subcommand
//!
//! Dry-runs one edge of the transition graph. Pure graph membership; no
//! compliance rules run (those need an operation aggregate).

use anyhow::{Context, Result};
use clap::Args;

use aduana_core::OperationStatus;
use aduana_state::validate_transition;

/// Arguments for the `aduana check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// The current status (e.g. IN_REVIEW).
    #[arg(long)]
    pub from: String,

    /// The target status (e.g. PRELIQUIDATION_REVIEW).
    #[arg(long)]
    pub to: String,
}

/// Run the `check` subcommand. Exit code 1 on a rejected edge.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let from: OperationStatus = args
        .from
        .parse()
        .with_context(|| format!("unknown status {:?}", args.from))?;
    let to: OperationStatus = args
        .to
        .parse()
        .with_context(|| format!("unknown status {:?}", args.to))?;

    match validate_transition(from, to) {
        Ok(()) => {
            println!("OK: {from} -> {to}");
            Ok(0)
        }
        Err(error) => {
            println!("REJECTED: {error}");
            Ok(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(from: &str, to: &str) -> CheckArgs {
        CheckArgs {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn test_legal_edge_exits_zero() {
        assert_eq!(run_check(&args("DRAFT", "DOCUMENTATION_COMPLETE")).unwrap(), 0);
    }

    #[test]
    fn test_illegal_edge_exits_one() {
        assert_eq!(run_check(&args("DRAFT", "IN_REVIEW")).unwrap(), 1);
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        assert!(run_check(&args("DRAFT", "LIMBO")).is_err());
    }
}

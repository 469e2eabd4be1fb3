//! # Crossing Subcommand
//!
//! Offline declaration crossing: compares a preliminary and a final
//! declaration file line by line and prints the discrepancies, without
//! touching an operation or a server.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use serde::Serialize;

use aduana_core::DeclarationType;
use aduana_crossing::{compare, CrossingDiscrepancy};

use crate::load_declaration;

/// Arguments for the `aduana crossing` subcommand.
#[derive(Args, Debug)]
pub struct CrossingArgs {
    /// Path to the preliminary declaration JSON file.
    #[arg(long)]
    pub preliminary: PathBuf,

    /// Path to the final declaration JSON file.
    #[arg(long = "final")]
    pub final_path: PathBuf,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable crossing report.
#[derive(Debug, Serialize)]
struct CrossingReport {
    status: &'static str,
    discrepancies: Vec<CrossingDiscrepancy>,
}

/// Run the `crossing` subcommand. Exit code 1 when discrepancies exist.
pub fn run_crossing(args: &CrossingArgs) -> Result<u8> {
    let (preliminary, preliminary_lines) = load_declaration(&args.preliminary)?;
    let (fin, final_lines) = load_declaration(&args.final_path)?;

    if preliminary.declaration_type != DeclarationType::Preliminary {
        bail!(
            "{} is not a PRELIMINARY declaration",
            args.preliminary.display()
        );
    }
    if fin.declaration_type != DeclarationType::Final {
        bail!("{} is not a FINAL declaration", args.final_path.display());
    }

    let discrepancies = compare(&preliminary, &preliminary_lines, &fin, &final_lines);
    let status = if discrepancies.is_empty() { "MATCH" } else { "DISCREPANCY" };

    if args.json {
        let report = CrossingReport {
            status,
            discrepancies,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(if report.discrepancies.is_empty() { 0 } else { 1 });
    }

    println!("{status}");
    for discrepancy in &discrepancies {
        println!("{}", format_discrepancy(discrepancy));
    }
    Ok(if discrepancies.is_empty() { 0 } else { 1 })
}

fn format_discrepancy(discrepancy: &CrossingDiscrepancy) -> String {
    let location = match (discrepancy.line_number, &discrepancy.tariff_code) {
        (Some(line), Some(code)) => format!("line {line} ({code})"),
        (Some(line), None) => format!("line {line}"),
        _ => "header".to_string(),
    };
    let difference = discrepancy
        .difference
        .map(|d| format!(" (diff {d})"))
        .unwrap_or_default();
    format!(
        "  {}: {} {} -> {}{}",
        location,
        discrepancy.field.as_str(),
        discrepancy.preliminary_value,
        discrepancy.final_value,
        difference
    )
}

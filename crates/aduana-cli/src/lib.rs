//! # aduana-cli — CLI Tool for the Aduana Stack
//!
//! Provides the `aduana` command-line interface: offline inspection of
//! the customs lifecycle and the calculators, without a running server.
//!
//! ## Subcommands
//!
//! - `aduana graph` — Print the transition allow-list.
//! - `aduana check` — Dry-run one transition edge.
//! - `aduana rules` — Print the compliance rule catalogue.
//! - `aduana crossing` — Cross two declaration files offline.
//! - `aduana preliq` — Compute preliquidation totals for a declaration file.
//!
//! Declaration files are JSON documents in the shape of
//! [`aduana_ops::DeclarationDraft`]: the header money fields plus the
//! tariff lines, exactly what the API's registration endpoint accepts.

pub mod check;
pub mod crossing;
pub mod graph;
pub mod preliq;
pub mod rules;

use std::path::Path;

use anyhow::{Context, Result};

use aduana_core::{Declaration, OperationId, TariffLine};
use aduana_ops::DeclarationDraft;

/// Load a declaration draft from a JSON file and materialize it.
///
/// The draft carries no identifiers; a throwaway operation id is minted
/// so the core types can be built. The calculators only read the money
/// fields and the lines.
pub fn load_declaration(path: &Path) -> Result<(Declaration, Vec<TariffLine>)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading declaration file {}", path.display()))?;
    let draft: DeclarationDraft = serde_json::from_str(&raw)
        .with_context(|| format!("parsing declaration file {}", path.display()))?;

    let operation_id = OperationId::new();
    let mut declaration = Declaration::new(operation_id, draft.declaration_type);
    declaration.fob_value = draft.fob_value;
    declaration.freight_value = draft.freight_value;
    declaration.insurance_value = draft.insurance_value;
    declaration.cif_value = draft.cif_value;
    declaration.taxable_base = draft.taxable_base;
    declaration.total_taxes = draft.total_taxes;

    let lines = draft
        .lines
        .into_iter()
        .map(|line| TariffLine {
            declaration_id: declaration.id,
            line_number: line.line_number,
            tariff_code: line.tariff_code,
            description: line.description,
            quantity: line.quantity,
            unit_value: line.unit_value,
            total_value: line.total_value,
            tax_rate: line.tax_rate,
            tax_amount: line.tax_amount,
        })
        .collect();

    Ok((declaration, lines))
}

//! # Preliquidation Calculator
//!
//! Derives the monetary header of a declaration from its tariff lines:
//! `cif = fob + freight + insurance`, `taxable_base = cif`, and
//! `total_taxes = Σ line.total_value × line.tax_rate`. Pure function;
//! the declaration service writes the totals back onto the declaration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use aduana_core::{Declaration, TariffLine};

/// The computed preliquidation header totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreliquidationTotals {
    /// Free-on-board value (passed through from the declaration,
    /// absent treated as zero).
    pub fob: Decimal,
    /// FOB + freight + insurance.
    pub cif: Decimal,
    /// Equal to CIF.
    pub taxable_base: Decimal,
    /// Sum of per-line `total_value × tax_rate`; a line missing either
    /// factor contributes zero.
    pub total_taxes: Decimal,
}

/// Compute the preliquidation totals for a declaration.
pub fn calculate(declaration: &Declaration, lines: &[TariffLine]) -> PreliquidationTotals {
    let fob = declaration.fob_value.unwrap_or_default();
    let freight = declaration.freight_value.unwrap_or_default();
    let insurance = declaration.insurance_value.unwrap_or_default();
    let cif = fob + freight + insurance;

    let total_taxes: Decimal = lines
        .iter()
        .map(|line| match (line.total_value, line.tax_rate) {
            (Some(total_value), Some(tax_rate)) => total_value * tax_rate,
            _ => Decimal::ZERO,
        })
        .sum();

    PreliquidationTotals {
        fob,
        cif,
        taxable_base: cif,
        total_taxes,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

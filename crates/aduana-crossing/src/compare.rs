//! # Declaration Diff
//!
//! Pure comparison of a preliminary and a final declaration: six header
//! money fields, then the tariff lines keyed by line number. The result
//! is a discrepancy set independent of line iteration order.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use aduana_core::{Declaration, TariffLine};

use crate::result::{CrossingDiscrepancy, CrossingStatus, DiscrepancyField};

/// Absolute tolerance for monetary comparison: amounts within 0.01 of
/// each other are considered equal.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Rendering for an absent value in a discrepancy record.
const ABSENT: &str = "—";

/// Whether two optional amounts match under the tolerance rule.
///
/// Both absent is an exact match. Absent on exactly one side is a
/// mismatch. Present on both sides matches iff `|a − b| ≤ 0.01`.
pub fn amounts_match(a: Option<Decimal>, b: Option<Decimal>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => (a - b).abs() <= TOLERANCE,
        _ => false,
    }
}

/// Signed difference `final − preliminary`, treating absent values as
/// zero. Used for the discrepancy record only, never for the equality
/// test.
fn difference(preliminary: Option<Decimal>, fin: Option<Decimal>) -> Decimal {
    fin.unwrap_or_default() - preliminary.unwrap_or_default()
}

fn render(value: Option<Decimal>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => ABSENT.to_string(),
    }
}

fn header_discrepancy(
    field: DiscrepancyField,
    preliminary: Option<Decimal>,
    fin: Option<Decimal>,
) -> CrossingDiscrepancy {
    CrossingDiscrepancy {
        field,
        line_number: None,
        tariff_code: None,
        preliminary_value: render(preliminary),
        final_value: render(fin),
        difference: Some(difference(preliminary, fin)),
    }
}

fn line_discrepancy(
    field: DiscrepancyField,
    line_number: u32,
    tariff_code: &str,
    preliminary: Option<Decimal>,
    fin: Option<Decimal>,
) -> CrossingDiscrepancy {
    CrossingDiscrepancy {
        field,
        line_number: Some(line_number),
        tariff_code: Some(tariff_code.to_string()),
        preliminary_value: render(preliminary),
        final_value: render(fin),
        difference: Some(difference(preliminary, fin)),
    }
}

/// Compare a preliminary and a final declaration and produce the
/// discrepancy list.
///
/// Header comparison runs independently over FOB, CIF, taxable base,
/// total taxes, freight, and insurance. Line comparison keys lines by
/// line number: a number present on one side only yields a
/// `TARIFF_LINE_MISSING` discrepancy; numbers present on both sides
/// compare quantity, total value, and tax amount independently, so a
/// matched line contributes at most three discrepancies.
///
/// Pure and order-independent: the same inputs produce the same
/// discrepancy set regardless of the order the lines arrive in.
pub fn compare(
    preliminary: &Declaration,
    preliminary_lines: &[TariffLine],
    fin: &Declaration,
    final_lines: &[TariffLine],
) -> Vec<CrossingDiscrepancy> {
    let mut discrepancies = Vec::new();

    // ── Header pass ──────────────────────────────────────────────────
    let header_fields = [
        (DiscrepancyField::FobValue, preliminary.fob_value, fin.fob_value),
        (DiscrepancyField::CifValue, preliminary.cif_value, fin.cif_value),
        (
            DiscrepancyField::TaxableBase,
            preliminary.taxable_base,
            fin.taxable_base,
        ),
        (
            DiscrepancyField::TotalTaxes,
            preliminary.total_taxes,
            fin.total_taxes,
        ),
        (
            DiscrepancyField::FreightValue,
            preliminary.freight_value,
            fin.freight_value,
        ),
        (
            DiscrepancyField::InsuranceValue,
            preliminary.insurance_value,
            fin.insurance_value,
        ),
    ];
    for (field, prelim_value, final_value) in header_fields {
        if !amounts_match(prelim_value, final_value) {
            discrepancies.push(header_discrepancy(field, prelim_value, final_value));
        }
    }

    // ── Line pass ────────────────────────────────────────────────────
    // BTreeMap keys the lines by number and fixes the walk order, so
    // the output does not depend on input slice order.
    let prelim_by_number: BTreeMap<u32, &TariffLine> = preliminary_lines
        .iter()
        .map(|line| (line.line_number, line))
        .collect();
    let final_by_number: BTreeMap<u32, &TariffLine> =
        final_lines.iter().map(|line| (line.line_number, line)).collect();

    let mut line_numbers: Vec<u32> = prelim_by_number.keys().copied().collect();
    line_numbers.extend(
        final_by_number
            .keys()
            .copied()
            .filter(|n| !prelim_by_number.contains_key(n)),
    );
    line_numbers.sort_unstable();

    for number in line_numbers {
        match (prelim_by_number.get(&number), final_by_number.get(&number)) {
            (Some(prelim_line), None) => {
                discrepancies.push(CrossingDiscrepancy {
                    field: DiscrepancyField::TariffLineMissing,
                    line_number: Some(number),
                    tariff_code: Some(prelim_line.tariff_code.clone()),
                    preliminary_value: render(prelim_line.total_value),
                    final_value: ABSENT.to_string(),
                    difference: None,
                });
            }
            (None, Some(final_line)) => {
                discrepancies.push(CrossingDiscrepancy {
                    field: DiscrepancyField::TariffLineMissing,
                    line_number: Some(number),
                    tariff_code: Some(final_line.tariff_code.clone()),
                    preliminary_value: ABSENT.to_string(),
                    final_value: render(final_line.total_value),
                    difference: None,
                });
            }
            (Some(prelim_line), Some(final_line)) => {
                let line_fields = [
                    (
                        DiscrepancyField::LineQuantity,
                        prelim_line.quantity,
                        final_line.quantity,
                    ),
                    (
                        DiscrepancyField::LineTotalValue,
                        prelim_line.total_value,
                        final_line.total_value,
                    ),
                    (
                        DiscrepancyField::LineTaxAmount,
                        prelim_line.tax_amount,
                        final_line.tax_amount,
                    ),
                ];
                for (field, prelim_value, final_value) in line_fields {
                    if !amounts_match(prelim_value, final_value) {
                        discrepancies.push(line_discrepancy(
                            field,
                            number,
                            &final_line.tariff_code,
                            prelim_value,
                            final_value,
                        ));
                    }
                }
            }
            (None, None) => unreachable!("line number came from one of the two maps"),
        }
    }

    discrepancies
}

/// Classify a discrepancy list: empty is MATCH, anything else is
/// DISCREPANCY.
pub fn classify(discrepancies: &[CrossingDiscrepancy]) -> CrossingStatus {
    if discrepancies.is_empty() {
        CrossingStatus::Match
    } else {
        CrossingStatus::Discrepancy
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

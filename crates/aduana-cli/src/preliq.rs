//! # Preliq Subcommand
//!
//! Computes preliquidation totals for one declaration file: CIF from
//! the header money fields and total taxes from the tariff lines.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use aduana_crossing::calculate;

use crate::load_declaration;

/// Arguments for the `aduana preliq` subcommand.
#[derive(Args, Debug)]
pub struct PreliqArgs {
    /// Path to the declaration JSON file.
    #[arg(long)]
    pub declaration: PathBuf,

    /// Print the totals as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Run the `preliq` subcommand.
pub fn run_preliq(args: &PreliqArgs) -> Result<u8> {
    let (declaration, lines) = load_declaration(&args.declaration)?;
    let totals = calculate(&declaration, &lines);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        println!("fob          = {}", totals.fob);
        println!("cif          = {}", totals.cif);
        println!("taxable_base = {}", totals.taxable_base);
        println!("total_taxes  = {}", totals.total_taxes);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_run_preliq_computes_totals() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "declaration_type": "PRELIMINARY", "fob_value": "1000.00",
                 "freight_value": "100.00", "insurance_value": "10.00",
                 "cif_value": null, "taxable_base": null, "total_taxes": null,
                 "lines": [] }}"#
        )
        .unwrap();

        let args = PreliqArgs {
            declaration: file.path().to_path_buf(),
            json: false,
        };
        assert_eq!(run_preliq(&args).unwrap(), 0);
    }

    #[test]
    fn test_run_preliq_missing_file_is_an_error() {
        let args = PreliqArgs {
            declaration: PathBuf::from("/nonexistent/declaration.json"),
            json: false,
        };
        assert!(run_preliq(&args).is_err());
    }
}

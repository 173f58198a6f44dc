//! Validate command - check an extracted record without calling any service.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use nifex_core::evaluation::load_file;
use nifex_core::{normalize_mobile_field, validate, Record};

use super::report::{format_violations, OutputFormat};

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    /// Record JSON file
    #[arg(required = true)]
    input: PathBuf,

    /// Normalize the mobile phone before validating
    #[arg(long)]
    normalize: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Exit with an error when violations are found
    #[arg(long)]
    strict: bool,
}

pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let value = load_file(&args.input)?;
    let mut record = Record::from_value(value)?;

    if args.normalize {
        normalize_mobile_field(&mut record);
    }

    let violations = validate(&record);

    match args.format {
        OutputFormat::Json => {
            let output = json!({
                "record": record,
                "violations": violations,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print!("{}", format_violations(&violations)),
    }

    if args.strict && !violations.is_empty() {
        anyhow::bail!("Found {} validation errors", violations.len());
    }

    Ok(())
}

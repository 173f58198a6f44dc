//! Compare command - score a record against a ground-truth file offline.

use std::path::PathBuf;

use clap::Args;

use nifex_core::compare;
use nifex_core::evaluation::load_file;

use super::report::{format_comparison, OutputFormat};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Predicted record JSON file
    #[arg(required = true)]
    predicted: PathBuf,

    /// Ground-truth record JSON file
    #[arg(required = true)]
    expected: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub fn run(args: CompareArgs) -> anyhow::Result<()> {
    let predicted = load_file(&args.predicted)?;
    let expected = load_file(&args.expected)?;

    let comparison = compare(&predicted, Some(&expected));

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&comparison)?),
        OutputFormat::Text => print!("{}", format_comparison(&comparison)),
    }

    Ok(())
}

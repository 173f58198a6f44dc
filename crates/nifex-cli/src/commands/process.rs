//! Process command - extract fields from a single scanned form.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use nifex_core::evaluation::{Evaluation, GroundTruthStore};
use nifex_core::models::config::NifexConfig;
use nifex_core::pipeline::{ExtractionOutcome, FormExtractor, PostProcessor};
use nifex_core::{AzureOpenAiClient, DocumentIntelligenceClient};

use super::report::{format_outcome, OutputFormat};
use super::{extension_of, is_supported, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, JPG or PNG)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Directory with exN_ground_truth.json fixtures
    #[arg(long)]
    ground_truth_dir: Option<PathBuf>,

    /// Skip ground-truth scoring
    #[arg(long)]
    no_ground_truth: bool,

    /// Keep the mobile phone as extracted
    #[arg(long)]
    no_normalize: bool,

    /// Include the OCR markdown in the output
    #[arg(long)]
    show_markdown: bool,
}

/// Azure-backed extractor used by the CLI.
pub type AzureExtractor = FormExtractor<DocumentIntelligenceClient, AzureOpenAiClient>;

/// Build the extractor from configuration.
pub fn build_extractor(config: &NifexConfig) -> anyhow::Result<AzureExtractor> {
    let ocr = DocumentIntelligenceClient::new(config.ocr.clone())?;
    let llm = AzureOpenAiClient::new(config.llm.clone())?;
    Ok(FormExtractor::new(ocr, llm, config))
}

/// Apply command-line overrides to the post-processing settings.
pub fn post_processor(
    config: &NifexConfig,
    ground_truth_dir: Option<&PathBuf>,
    no_ground_truth: bool,
    no_normalize: bool,
) -> PostProcessor {
    let mut post = PostProcessor::from_config(config);

    if let Some(dir) = ground_truth_dir {
        post = post.with_ground_truth(Some(GroundTruthStore::new(dir)));
    }
    if no_ground_truth {
        post = post.with_ground_truth(None);
    }
    if no_normalize {
        post = post.with_mobile_normalization(false);
    }
    post
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported(&args.input) {
        anyhow::bail!("Unsupported file format: {}", extension_of(&args.input));
    }

    info!("Processing file: {}", args.input.display());

    let extractor = build_extractor(&config)?.with_post_processor(post_processor(
        &config,
        args.ground_truth_dir.as_ref(),
        args.no_ground_truth,
        args.no_normalize,
    ));

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(120));

    let outcome = run_pipeline(&extractor, &args.input, &pb).await;
    pb.finish_and_clear();
    let outcome = outcome?;

    // Format output
    let output = format_outcome(&outcome, args.format, args.show_markdown)?;

    // Write output
    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    print_status(&outcome);
    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

async fn run_pipeline(
    extractor: &AzureExtractor,
    input: &Path,
    pb: &ProgressBar,
) -> anyhow::Result<ExtractionOutcome> {
    let file_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let document = fs::read(input)?;

    let outcome = extractor
        .extract_with_progress(&document, file_name, |step| pb.set_message(step.to_string()))
        .await?;
    Ok(outcome)
}

fn print_status(outcome: &ExtractionOutcome) {
    if outcome.is_valid() {
        eprintln!("{} Data is complete and valid", style("✓").green());
    } else {
        eprintln!(
            "{} {} validation errors found",
            style("⚠").yellow(),
            outcome.violations.len()
        );
    }

    match &outcome.evaluation {
        Evaluation::Scored(comparison) => eprintln!("{} {}", style("ℹ").blue(), comparison),
        Evaluation::Unavailable { reason } => eprintln!("{} {}", style("ℹ").blue(), reason),
    }
}

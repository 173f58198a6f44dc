//! Rendering of extraction results for the terminal and output files.

use nifex_core::evaluation::{Comparison, Evaluation};
use nifex_core::models::DateParts;
use nifex_core::pipeline::ExtractionOutcome;
use nifex_core::{Record, Violation};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text report
    Text,
}

impl OutputFormat {
    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

/// Render a full extraction outcome.
pub fn format_outcome(
    outcome: &ExtractionOutcome,
    format: OutputFormat,
    show_markdown: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            if show_markdown {
                Ok(serde_json::to_string_pretty(outcome)?)
            } else {
                let mut value = serde_json::to_value(outcome)?;
                if let Some(obj) = value.as_object_mut() {
                    obj.remove("markdown");
                }
                Ok(serde_json::to_string_pretty(&value)?)
            }
        }
        OutputFormat::Text => format_text(outcome, show_markdown),
    }
}

fn format_text(outcome: &ExtractionOutcome, show_markdown: bool) -> anyhow::Result<String> {
    let mut output = String::new();

    if show_markdown {
        output.push_str("Detected form (OCR markdown):\n");
        output.push_str(&outcome.markdown);
        output.push_str("\n\n");
    }

    output.push_str("Extracted JSON:\n");
    output.push_str(&serde_json::to_string_pretty(&outcome.record)?);
    output.push_str("\n\n");

    output.push_str(&format_summary(&outcome.record));

    output.push_str("Evaluation:\n");
    output.push_str(&format_violations(&outcome.violations));
    output.push_str(&format_evaluation(&outcome.evaluation));

    Ok(output)
}

/// Render the key fields of a record in reading order.
///
/// Records whose dates or address are not mappings have no typed view and
/// render nothing.
pub fn format_summary(record: &Record) -> String {
    let Ok(form) = record.to_form() else {
        return String::new();
    };

    let name = format!("{} {}", form.first_name.trim(), form.last_name.trim());

    let mut output = String::from("Applicant:\n");
    output.push_str(&format!("  Name: {}\n", name.trim()));
    output.push_str(&format!("  ID: {}\n", form.id_number));
    output.push_str(&format!("  Born: {}\n", format_date(&form.date_of_birth)));
    output.push_str(&format!("  Address: {}\n", form.address.format()));
    output.push_str(&format!("  Mobile: {}\n", form.mobile_phone));
    output.push('\n');

    output.push_str("Injury:\n");
    output.push_str(&format!("  Date: {}\n", format_date(&form.date_of_injury)));
    output.push_str(&format!("  Body part: {}\n", form.injured_body_part));
    output.push_str(&format!(
        "  Health fund: {}\n",
        form.medical_institution_fields.health_fund_member
    ));
    output.push('\n');

    output
}

fn format_date(date: &DateParts) -> String {
    if !date.is_empty() && date.to_naive_date().is_none() {
        return format!("{} (not a calendar date)", date.format());
    }
    date.format()
}

/// Render a validation report.
pub fn format_violations(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return "Data is complete and valid!\n".to_string();
    }

    let mut output = String::from("Validation errors found:\n");
    for violation in violations {
        output.push_str(&format!("- {}\n", violation));
    }
    output
}

/// Render a ground-truth evaluation.
pub fn format_evaluation(evaluation: &Evaluation) -> String {
    match evaluation {
        Evaluation::Scored(comparison) => format_comparison(comparison),
        Evaluation::Unavailable { reason } => format!("{}\n", reason),
    }
}

/// Render an accuracy report.
pub fn format_comparison(comparison: &Comparison) -> String {
    let mut output = format!("{}\n", comparison);

    if comparison.is_perfect() {
        output.push_str("All fields matched the ground truth!\n");
    } else if comparison.mismatches.is_empty() {
        output.push_str("The ground truth has no fields to compare.\n");
    } else {
        output.push_str(&format!(
            "{} mismatches found:\n",
            comparison.mismatches.len()
        ));
        for mismatch in &comparison.mismatches {
            output.push_str(&format!("{}\n", mismatch));
        }
    }
    output
}

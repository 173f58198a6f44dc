//! Extraction pipeline: OCR, structured extraction, normalization, validation
//! and ground-truth scoring, run in sequence for one document.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::evaluation::{compare, Evaluation, GroundTruth, GroundTruthStore};
use crate::models::config::NifexConfig;
use crate::models::record::Record;
use crate::prompt::{build_prompt, SYSTEM_PROMPT};
use crate::rules::{normalize_mobile_field, validate, Violation};
use crate::service::{CompletionService, OcrService};

/// Result of extracting one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    /// OCR output the model was given.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub markdown: String,
    /// Extracted (and normalized) record.
    pub record: Record,
    /// Rule violations; empty when the record is valid.
    pub violations: Vec<Violation>,
    /// Ground-truth evaluation.
    pub evaluation: Evaluation,
    /// Wall-clock time spent on the document.
    pub processing_time_ms: u64,
}

impl ExtractionOutcome {
    /// Check if the record passed validation.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Stage of an extraction, reported to progress hooks as it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStep {
    Recognizing,
    Extracting,
    Validating,
}

impl fmt::Display for ExtractionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recognizing => write!(f, "Running OCR..."),
            Self::Extracting => write!(f, "Sending to LLM..."),
            Self::Validating => write!(f, "Validating..."),
        }
    }
}

/// Post-processing shared by the online pipeline and offline commands.
#[derive(Debug, Clone)]
pub struct PostProcessor {
    normalize_mobile: bool,
    ground_truth: Option<GroundTruthStore>,
}

impl PostProcessor {
    /// Create a post-processor from configuration.
    pub fn from_config(config: &NifexConfig) -> Self {
        let ground_truth = config
            .evaluation
            .enabled
            .then(|| GroundTruthStore::new(&config.evaluation.ground_truth_dir));

        Self {
            normalize_mobile: config.extraction.normalize_mobile,
            ground_truth,
        }
    }

    /// Set mobile phone normalization.
    pub fn with_mobile_normalization(mut self, normalize: bool) -> Self {
        self.normalize_mobile = normalize;
        self
    }

    /// Set the ground-truth store, or disable scoring with `None`.
    pub fn with_ground_truth(mut self, store: Option<GroundTruthStore>) -> Self {
        self.ground_truth = store;
        self
    }

    /// Normalize the record in place and return its violations.
    pub fn normalize_and_validate(&self, record: &mut Record) -> Vec<Violation> {
        if self.normalize_mobile {
            normalize_mobile_field(record);
        }

        let violations = validate(record);
        if violations.is_empty() {
            info!("Record is complete and valid");
        } else {
            info!("Record has {} validation issues", violations.len());
            for violation in &violations {
                debug!("Validation: {}", violation);
            }
        }
        violations
    }

    /// Score the record against the ground truth for `file_name`.
    pub fn evaluate(&self, record: &Record, file_name: &str) -> Result<Evaluation> {
        let Some(store) = &self.ground_truth else {
            return Ok(Evaluation::Unavailable {
                reason: "Ground-truth evaluation is disabled.".to_string(),
            });
        };

        match store.lookup(file_name)? {
            GroundTruth::Found(expected) => {
                let predicted = record.clone().into_value();
                let comparison = compare(&predicted, Some(&expected));
                info!(
                    "Ground truth {}/{} fields matched ({:.2}%)",
                    comparison.correct,
                    comparison.total,
                    comparison.accuracy * 100.0
                );
                Ok(Evaluation::Scored(comparison))
            }
            GroundTruth::Missing(reason) => {
                warn!("{}", reason);
                Ok(Evaluation::Unavailable { reason })
            }
        }
    }
}

/// Runs the full extraction for a document.
pub struct FormExtractor<O, C> {
    ocr: O,
    llm: C,
    post: PostProcessor,
}

impl<O, C> FormExtractor<O, C>
where
    O: OcrService,
    C: CompletionService,
{
    /// Create an extractor from its collaborators and configuration.
    pub fn new(ocr: O, llm: C, config: &NifexConfig) -> Self {
        Self {
            ocr,
            llm,
            post: PostProcessor::from_config(config),
        }
    }

    /// Replace the post-processing settings.
    pub fn with_post_processor(mut self, post: PostProcessor) -> Self {
        self.post = post;
        self
    }

    async fn recognize(&self, document: &[u8]) -> Result<String> {
        let markdown = self.ocr.extract_markdown(document).await?;
        debug!("OCR produced {} characters of markdown", markdown.len());
        Ok(markdown)
    }

    async fn extract_record(&self, markdown: &str) -> Result<Record> {
        let prompt = build_prompt(markdown);
        let answer = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
        debug!("Model answered with {} characters", answer.len());

        Ok(Record::from_model_output(&answer)?)
    }

    /// Extract, normalize, validate and score one document.
    ///
    /// `file_name` is only used to find the ground-truth fixture.
    pub async fn extract(&self, document: &[u8], file_name: &str) -> Result<ExtractionOutcome> {
        self.extract_with_progress(document, file_name, |_| {}).await
    }

    /// Same as [`extract`](Self::extract), calling `on_step` as each stage starts.
    pub async fn extract_with_progress(
        &self,
        document: &[u8],
        file_name: &str,
        on_step: impl Fn(ExtractionStep),
    ) -> Result<ExtractionOutcome> {
        let start = Instant::now();
        info!("Extracting {} ({} bytes)", file_name, document.len());

        on_step(ExtractionStep::Recognizing);
        let markdown = self.recognize(document).await?;

        on_step(ExtractionStep::Extracting);
        let mut record = self.extract_record(&markdown).await?;

        on_step(ExtractionStep::Validating);
        let violations = self.post.normalize_and_validate(&mut record);
        let evaluation = self.post.evaluate(&record, file_name)?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!("Extraction of {} took {}ms", file_name, processing_time_ms);

        Ok(ExtractionOutcome {
            markdown,
            record,
            violations,
            evaluation,
            processing_time_ms,
        })
    }
}

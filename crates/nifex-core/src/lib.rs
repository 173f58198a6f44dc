//! Core library for National Insurance claim form extraction.
//!
//! This crate provides:
//! - Claim form data models and a dynamic record view
//! - Mobile phone canonicalization and structural field validation
//! - Ground-truth comparison and accuracy scoring
//! - An extraction pipeline over pluggable OCR and language model services
//! - Azure Document Intelligence and Azure OpenAI clients (`azure` feature)

pub mod error;
pub mod evaluation;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod rules;
pub mod service;

pub use error::{NifexError, Result};
pub use evaluation::{compare, Comparison, Evaluation, GroundTruth, GroundTruthStore, Mismatch};
pub use models::{ClaimForm, NifexConfig, Record};
pub use pipeline::{ExtractionOutcome, ExtractionStep, FormExtractor, PostProcessor};
pub use rules::{normalize_mobile, normalize_mobile_field, validate, Violation};
pub use service::{CompletionService, OcrService};

#[cfg(feature = "azure")]
pub use service::{AzureOpenAiClient, DocumentIntelligenceClient};

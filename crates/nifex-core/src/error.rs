//! Error types for the nifex-core library.

use thiserror::Error;

/// Main error type for the nifex library.
#[derive(Error, Debug)]
pub enum NifexError {
    /// OCR service error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Language model service error.
    #[error("language model error: {0}")]
    Llm(#[from] LlmError),

    /// Model output could not be turned into a record.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Ground-truth fixture could not be loaded.
    #[error("ground truth error: {0}")]
    GroundTruth(#[from] GroundTruthError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by the OCR collaborator.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The HTTP request could not be sent or read.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The analyze operation finished with a failure status.
    #[error("analysis failed: {0}")]
    AnalysisFailed(String),

    /// The analyze operation did not finish within the polling budget.
    #[error("analysis did not complete after {0} polls")]
    Timeout(u32),

    /// The service response did not have the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),

    /// No text was recognized in the document.
    #[error("no text detected in document")]
    EmptyResult,
}

/// Errors raised by the language model collaborator.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The HTTP request could not be sent or read.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The completion carried no message content.
    #[error("completion returned no content")]
    EmptyCompletion,

    /// The service response did not have the expected shape.
    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while turning model output into a record.
#[derive(Error, Debug)]
pub enum RecordError {
    /// The text is not valid JSON.
    #[error("model output is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not a mapping.
    #[error("expected a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),

    /// A leaf value is not a string.
    #[error("field {path} must be a string, found {found}")]
    NonStringLeaf { path: String, found: &'static str },
}

/// Errors raised while loading ground-truth fixtures.
#[derive(Error, Debug)]
pub enum GroundTruthError {
    /// The fixture exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The fixture is not valid JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for the nifex library.
pub type Result<T> = std::result::Result<T, NifexError>;

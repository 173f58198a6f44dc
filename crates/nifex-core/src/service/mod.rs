//! External collaborators: OCR and language model services.
//!
//! The pipeline only depends on the two traits below. The Azure clients are
//! available with the `azure` feature.

#[cfg(feature = "azure")]
mod document_intelligence;
#[cfg(test)]
pub(crate) mod mock;
#[cfg(feature = "azure")]
mod openai;

#[cfg(feature = "azure")]
pub use document_intelligence::DocumentIntelligenceClient;
#[cfg(feature = "azure")]
pub use openai::AzureOpenAiClient;

use std::future::Future;

use crate::error::{LlmError, OcrError};

/// Turns a scanned document into markdown text.
pub trait OcrService {
    /// Recognize the document and return its content as markdown.
    fn extract_markdown(&self, document: &[u8])
        -> impl Future<Output = Result<String, OcrError>> + Send;
}

/// Answers a single-turn chat prompt.
pub trait CompletionService {
    /// Send a system and user message and return the assistant's reply.
    fn complete(
        &self,
        system: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String, LlmError>> + Send;
}

//! Canned OCR and completion services for pipeline tests.

use std::sync::Mutex;

use crate::error::{LlmError, OcrError};

use super::{CompletionService, OcrService};

/// OCR service returning fixed markdown.
pub struct MockOcr {
    markdown: Option<String>,
}

impl MockOcr {
    pub fn returning(markdown: &str) -> Self {
        Self {
            markdown: Some(markdown.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { markdown: None }
    }
}

impl OcrService for MockOcr {
    async fn extract_markdown(&self, _document: &[u8]) -> Result<String, OcrError> {
        self.markdown
            .clone()
            .ok_or_else(|| OcrError::Request("connection refused".to_string()))
    }
}

/// Completion service returning a fixed answer and recording prompts.
pub struct MockLlm {
    answer: String,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockLlm {
    pub fn returning(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl CompletionService for MockLlm {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system.to_string(), prompt.to_string()));
        Ok(self.answer.clone())
    }
}

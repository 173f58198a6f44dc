//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Document Intelligence endpoint.
pub const ENV_OCR_ENDPOINT: &str = "DOC_INTELLIGENCE_ENDPOINT";
/// Environment variable holding the Document Intelligence key.
pub const ENV_OCR_KEY: &str = "DOC_INTELLIGENCE_KEY";
/// Environment variable holding the Azure OpenAI endpoint.
pub const ENV_LLM_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
/// Environment variable holding the Azure OpenAI key.
pub const ENV_LLM_KEY: &str = "AZURE_OPENAI_KEY1";

/// Main configuration for the nifex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NifexConfig {
    /// OCR service configuration.
    pub ocr: OcrConfig,

    /// Language model service configuration.
    pub llm: LlmConfig,

    /// Post-processing configuration.
    pub extraction: ExtractionConfig,

    /// Ground-truth evaluation configuration.
    pub evaluation: EvaluationConfig,
}

/// Azure Document Intelligence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Service endpoint, e.g. `https://<resource>.cognitiveservices.azure.com`.
    pub endpoint: String,

    /// Subscription key. Usually supplied through the environment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Analysis model.
    pub model_id: String,

    /// REST API version.
    pub api_version: String,

    /// Delay between polls of the analyze operation.
    pub poll_interval_ms: u64,

    /// Maximum number of polls before giving up.
    pub max_polls: u32,

    /// HTTP timeout per request in seconds.
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            model_id: "prebuilt-layout".to_string(),
            api_version: "2024-11-30".to_string(),
            poll_interval_ms: 1000,
            max_polls: 120,
            timeout_secs: 60,
        }
    }
}

/// Azure OpenAI chat completion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Service endpoint, e.g. `https://<resource>.openai.azure.com`.
    pub endpoint: String,

    /// API key. Usually supplied through the environment.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub api_key: String,

    /// Deployment name.
    pub deployment: String,

    /// REST API version.
    pub api_version: String,

    /// Maximum tokens in the completion.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// HTTP timeout per request in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            deployment: "gpt-4o".to_string(),
            api_version: "2024-02-15-preview".to_string(),
            max_tokens: 1024,
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

/// Post-processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Repair the mobile phone field before validation.
    pub normalize_mobile: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            normalize_mobile: true,
        }
    }
}

/// Ground-truth evaluation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Compare against ground truth when a fixture is found.
    pub enabled: bool,

    /// Directory containing `exN_ground_truth.json` fixtures.
    pub ground_truth_dir: PathBuf,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ground_truth_dir: PathBuf::from("phase1_data/ground_truth"),
        }
    }
}

impl NifexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Fill endpoints and keys from the process environment.
    ///
    /// Non-empty environment values take precedence over the file.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Fill endpoints and keys from an arbitrary variable source.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_OCR_ENDPOINT) {
            self.ocr.endpoint = v;
        }
        if let Some(v) = get(ENV_OCR_KEY) {
            self.ocr.api_key = v;
        }
        if let Some(v) = get(ENV_LLM_ENDPOINT) {
            self.llm.endpoint = v;
        }
        if let Some(v) = get(ENV_LLM_KEY) {
            self.llm.api_key = v;
        }
        self
    }
}

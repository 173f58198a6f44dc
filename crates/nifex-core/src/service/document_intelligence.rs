//! Azure AI Document Intelligence client.
//!
//! Uses the asynchronous analyze API: the document is posted once, then the
//! returned operation URL is polled until the analysis finishes.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{NifexError, OcrError};
use crate::models::config::OcrConfig;

use super::OcrService;

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION: &str = "operation-location";

/// HTTP client for the Document Intelligence layout model.
#[derive(Debug, Clone)]
pub struct DocumentIntelligenceClient {
    http_client: Client,
    config: OcrConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResult {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl DocumentIntelligenceClient {
    /// Create a client. Endpoint and key must be set.
    pub fn new(config: OcrConfig) -> Result<Self, NifexError> {
        if config.endpoint.trim().is_empty() {
            return Err(NifexError::Config(
                "Document Intelligence endpoint is not set".to_string(),
            ));
        }
        if config.api_key.trim().is_empty() {
            return Err(NifexError::Config(
                "Document Intelligence key is not set".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| NifexError::Config(format!("Invalid Document Intelligence key: {}", e)))?;
        headers.insert(KEY_HEADER, key);

        let http_client = Client::builder()
            .user_agent(concat!("nifex/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| NifexError::Config(format!("Failed to build HTTP client: {}", e)))?;

        debug!(
            endpoint = %config.endpoint,
            model_id = %config.model_id,
            "Document Intelligence client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}&outputContentFormat=markdown",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model_id,
            self.config.api_version
        )
    }

    async fn submit(&self, document: &[u8]) -> Result<String, OcrError> {
        let response = self
            .http_client
            .post(self.analyze_url())
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(document.to_vec())
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::ACCEPTED && !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .headers()
            .get(OPERATION_LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| OcrError::InvalidResponse("missing Operation-Location header".to_string()))
    }

    async fn poll(&self, operation_url: &str) -> Result<AnalyzeOperation, OcrError> {
        let response = self
            .http_client
            .get(operation_url)
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<AnalyzeOperation>()
            .await
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))
    }
}

impl OcrService for DocumentIntelligenceClient {
    async fn extract_markdown(&self, document: &[u8]) -> Result<String, OcrError> {
        info!(size = document.len(), "Submitting document for layout analysis");
        let operation_url = self.submit(document).await?;

        let interval = Duration::from_millis(self.config.poll_interval_ms);
        for attempt in 1..=self.config.max_polls {
            tokio::time::sleep(interval).await;

            let operation = self.poll(&operation_url).await?;
            debug!(attempt, status = %operation.status, "Polled layout analysis");

            match operation.status.as_str() {
                "succeeded" => {
                    let content = operation
                        .analyze_result
                        .map(|r| r.content)
                        .unwrap_or_default();
                    if content.trim().is_empty() {
                        return Err(OcrError::EmptyResult);
                    }
                    info!(chars = content.chars().count(), "Layout analysis complete");
                    return Ok(content);
                }
                "failed" | "canceled" => {
                    let reason = operation
                        .error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| operation.status.clone());
                    warn!("Layout analysis failed: {}", reason);
                    return Err(OcrError::AnalysisFailed(reason));
                }
                _ => continue,
            }
        }

        Err(OcrError::Timeout(self.config.max_polls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OcrConfig {
        OcrConfig {
            endpoint: "https://forms.cognitiveservices.azure.com/".to_string(),
            api_key: "secret".to_string(),
            ..OcrConfig::default()
        }
    }

    #[test]
    fn test_analyze_url() {
        let client = DocumentIntelligenceClient::new(config()).unwrap();
        assert_eq!(
            client.analyze_url(),
            "https://forms.cognitiveservices.azure.com/documentintelligence/documentModels/prebuilt-layout:analyze?api-version=2024-11-30&outputContentFormat=markdown"
        );
    }

    #[test]
    fn test_requires_credentials() {
        let mut missing_key = config();
        missing_key.api_key.clear();
        assert!(matches!(
            DocumentIntelligenceClient::new(missing_key),
            Err(NifexError::Config(_))
        ));

        let mut missing_endpoint = config();
        missing_endpoint.endpoint = "  ".to_string();
        assert!(matches!(
            DocumentIntelligenceClient::new(missing_endpoint),
            Err(NifexError::Config(_))
        ));
    }

    #[test]
    fn test_parse_operation() {
        let operation: AnalyzeOperation = serde_json::from_str(
            r##"{"status": "succeeded", "analyzeResult": {"content": "# טופס"}}"##,
        )
        .unwrap();
        assert_eq!(operation.status, "succeeded");
        assert_eq!(operation.analyze_result.unwrap().content, "# טופס");

        let running: AnalyzeOperation = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        assert!(running.analyze_result.is_none());
    }
}

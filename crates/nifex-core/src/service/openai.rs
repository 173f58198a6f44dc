//! Azure OpenAI chat completions client.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LlmError, NifexError};
use crate::models::config::LlmConfig;

use super::CompletionService;

/// HTTP client for an Azure OpenAI chat deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAiClient {
    http_client: Client,
    config: LlmConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

impl AzureOpenAiClient {
    /// Create a client. Endpoint and key must be set.
    pub fn new(config: LlmConfig) -> Result<Self, NifexError> {
        if config.endpoint.trim().is_empty() {
            return Err(NifexError::Config("Azure OpenAI endpoint is not set".to_string()));
        }
        if config.api_key.trim().is_empty() {
            return Err(NifexError::Config("Azure OpenAI key is not set".to_string()));
        }

        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| NifexError::Config(format!("Invalid Azure OpenAI key: {}", e)))?;
        headers.insert("api-key", key);

        let http_client = Client::builder()
            .user_agent(concat!("nifex/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| NifexError::Config(format!("Failed to build HTTP client: {}", e)))?;

        debug!(
            endpoint = %config.endpoint,
            deployment = %config.deployment,
            "Azure OpenAI client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    fn request<'a>(&self, system: &'a str, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

impl CompletionService for AzureOpenAiClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        info!(
            deployment = %self.config.deployment,
            prompt_chars = prompt.chars().count(),
            "Requesting chat completion"
        );

        let response = self
            .http_client
            .post(self.completions_url())
            .json(&self.request(system, prompt))
            .send()
            .await
            .map_err(|e| LlmError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        first_content(body)
    }
}

fn first_content(response: ChatResponse) -> Result<String, LlmError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if content.is_empty() {
        return Err(LlmError::EmptyCompletion);
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client() -> AzureOpenAiClient {
        AzureOpenAiClient::new(LlmConfig {
            endpoint: "https://claims.openai.azure.com".to_string(),
            api_key: "secret".to_string(),
            ..LlmConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            client().completions_url(),
            "https://claims.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_request_body() {
        let client = client();
        let body = serde_json::to_value(client.request("sys", "user prompt")).unwrap();

        assert_eq!(
            body,
            json!({
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "user prompt"}
                ],
                "max_tokens": 1024,
                "temperature": 0.1f32
            })
        );
    }

    #[test]
    fn test_first_content() {
        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "  {\"a\": \"1\"}\n"}}]
        }))
        .unwrap();
        assert_eq!(first_content(response).unwrap(), "{\"a\": \"1\"}");
    }

    #[test]
    fn test_empty_completion() {
        let response: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(first_content(response), Err(LlmError::EmptyCompletion)));

        let response: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": null}}]
        }))
        .unwrap();
        assert!(matches!(first_content(response), Err(LlmError::EmptyCompletion)));
    }

    #[test]
    fn test_requires_credentials() {
        let result = AzureOpenAiClient::new(LlmConfig::default());
        assert!(matches!(result, Err(NifexError::Config(_))));
    }
}

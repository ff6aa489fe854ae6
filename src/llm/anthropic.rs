use crate::config::ClassifierConfig;
use crate::llm::types::{LlmError, Message};
use crate::llm::CompletionClient;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Anthropic Messages API client (non-streaming)
#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    config: ClassifierConfig,
}

impl AnthropicClient {
    pub fn new(client: Client, config: ClassifierConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, LlmError> {
        let api_base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(self.config.provider.default_base_url())
            .trim_end_matches('/');

        let url = format!("{}/v1/messages", api_base);

        tracing::debug!(
            api_base = %api_base,
            model = %self.config.model,
            message_count = messages.len(),
            "anthropic completion request"
        );

        let request_body = CreateMessageRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens.unwrap_or(16),
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "anthropic api returned error"
            );

            return Err(super::status_error(status.as_u16(), error_text));
        }

        let body: CreateMessageResponse = response.json().await?;
        let text: String = body
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Request body for creating a message
#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CreateMessageResponse {
    #[serde(default)]
    content: Vec<ContentBlockData>,
}

#[derive(Debug, Deserialize)]
struct ContentBlockData {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

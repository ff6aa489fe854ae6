use crate::config::ClassifierConfig;
use crate::llm::types::{LlmError, Message};
use crate::llm::CompletionClient;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI Chat Completions client (non-streaming)
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: ClassifierConfig,
}

impl OpenAiClient {
    pub fn new(client: Client, config: ClassifierConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, LlmError> {
        let api_base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(self.config.provider.default_base_url())
            .trim_end_matches('/');

        let url = format!("{}/v1/chat/completions", api_base);

        tracing::debug!(
            api_base = %api_base,
            model = %self.config.model,
            message_count = messages.len(),
            "openai completion request"
        );

        let request_body = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            n: 1,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
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
                "openai api returned error"
            );

            return Err(super::status_error(status.as_u16(), error_text));
        }

        let body: ChatCompletionResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Provider;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(
            Client::new(),
            ClassifierConfig {
                provider: Provider::OpenAI,
                api_key: "sk-test".to_string(),
                api_base: Some(format!("{}/", server.uri())),
                model: "gpt-4o-mini".to_string(),
                max_tokens: Some(16),
                temperature: Some(0.5),
            },
        )
    }

    #[tokio::test]
    async fn test_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [
                    { "message": { "role": "assistant", "content": " Information " } },
                    { "message": { "role": "assistant", "content": "Shopping" } }
                ]
            })))
            .mount(&server)
            .await;

        let text = client(&server)
            .complete(vec![Message::user("classify")])
            .await
            .unwrap();
        assert_eq!(text, " Information ");
    }

    #[tokio::test]
    async fn test_no_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(vec![Message::user("classify")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = client(&server)
            .complete(vec![Message::user("classify")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Api { status: 503, .. }));
    }
}

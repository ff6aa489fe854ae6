pub mod anthropic;
pub mod openai;
pub mod types;

use crate::config::{ClassifierConfig, Provider};
use std::sync::Arc;
use std::time::Duration;
use types::{LlmError, Message};

/// A model that answers a conversation with a single text reply
#[async_trait::async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, LlmError>;
}

/// Build the completion client for the configured provider
pub fn client_from_config(config: &ClassifierConfig) -> Result<Arc<dyn CompletionClient>, LlmError> {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let client: Arc<dyn CompletionClient> = match config.provider {
        Provider::Anthropic => Arc::new(anthropic::AnthropicClient::new(http, config.clone())),
        Provider::OpenAI => Arc::new(openai::OpenAiClient::new(http, config.clone())),
    };
    Ok(client)
}

fn status_error(status: u16, message: String) -> LlmError {
    match status {
        401 => LlmError::Unauthorized,
        429 => LlmError::RateLimited,
        _ => LlmError::Api { status, message },
    }
}

use super::{parse_verdict, Category, CategoryClassifier, ClassifyError};
use crate::llm::types::Message;
use crate::llm::CompletionClient;
use std::sync::Arc;

/// Classifies URLs by asking a language model for a one-word category
pub struct LlmClassifier {
    client: Arc<dyn CompletionClient>,
}

impl LlmClassifier {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    fn prompt(url: &str) -> String {
        format!(
            "Please classify the category of the URL as 'shopping' or 'information' in just one word {url}."
        )
    }
}

#[async_trait::async_trait]
impl CategoryClassifier for LlmClassifier {
    async fn classify(&self, url: &str) -> Result<Category, ClassifyError> {
        let reply = self
            .client
            .complete(vec![Message::user(Self::prompt(url))])
            .await
            .map_err(|e| ClassifyError::Unavailable(e.to_string()))?;

        let category = parse_verdict(&reply)?;
        tracing::debug!(url = %url, reply = %reply.trim(), category = %category, "classified url");
        Ok(category)
    }
}

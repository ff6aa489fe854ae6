pub mod providers;

use crate::config::{SearchConfig, SearchProviderKind};
use std::sync::Arc;
use std::time::Duration;

/// Search provider abstraction - the URL source of the pipeline
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Result URLs for `query`, in engine rank order, at most `options.max_results`
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<String>, SearchError>;
}

/// Options passed to a search provider
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Maximum number of URLs to return (default: 10)
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_results: 10 }
    }
}

impl SearchOptions {
    pub fn with_max_results(max_results: usize) -> Self {
        Self { max_results }
    }
}

/// Search-related errors
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Failed to parse search results: {0}")]
    Parse(String),
}

/// Build the configured search provider
pub fn provider_from_config(config: &SearchConfig) -> Result<Arc<dyn SearchProvider>, SearchError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("shopsafe/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let provider: Arc<dyn SearchProvider> = match config.provider {
        SearchProviderKind::Brave => Arc::new(providers::BraveSearchProvider::new(
            client,
            config.api_key.clone().unwrap_or_default(),
        )),
        SearchProviderKind::DuckDuckGo => Arc::new(providers::DuckDuckGoProvider::new(client)),
    };

    tracing::info!(provider = provider.name(), "search provider initialized");
    Ok(provider)
}

use crate::search::{SearchError, SearchOptions, SearchProvider};

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com";

/// Brave Search API provider
///
/// Requires `search.api_key` in the config file.
/// Free tier: 2000 requests/month
/// Documentation: https://brave.com/search/api/
pub struct BraveSearchProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl BraveSearchProvider {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at a different host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait::async_trait]
impl SearchProvider for BraveSearchProvider {
    fn name(&self) -> &'static str {
        "brave"
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<String>, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::InvalidApiKey);
        }

        let url = format!("{}/res/v1/web/search", self.base_url);

        tracing::debug!(
            query = %query,
            max_results = options.max_results,
            "performing brave search"
        );

        let response = self
            .client
            .get(&url)
            .header("X-Subscription-Token", &self.api_key)
            .header("Accept", "application/json")
            .query(&[
                ("q", query),
                ("count", &options.max_results.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = %status,
                error = %error_text,
                "brave search api error"
            );

            return match status.as_u16() {
                401 | 403 => Err(SearchError::InvalidApiKey),
                429 => Err(SearchError::RateLimitExceeded),
                _ => Err(SearchError::ApiError(format!(
                    "HTTP {}: {}",
                    status, error_text
                ))),
            };
        }

        let json: serde_json::Value = response.json().await?;

        let urls: Vec<String> = json["web"]["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|result| result["url"].as_str().filter(|u| !u.is_empty()))
                    .take(options.max_results)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        tracing::debug!(
            query = %query,
            result_count = urls.len(),
            "brave search completed"
        );

        Ok(urls)
    }
}

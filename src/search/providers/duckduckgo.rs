//! DuckDuckGo search via the HTML-only interface (html.duckduckgo.com).
//!
//! Needs no API key, which makes it the default URL source.

use crate::search::{SearchError, SearchOptions, SearchProvider};
use scraper::{Html, Selector};

const DEFAULT_BASE_URL: &str = "https://html.duckduckgo.com";

pub struct DuckDuckGoProvider {
    client: reqwest::Client,
    base_url: String,
}

impl DuckDuckGoProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
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
impl SearchProvider for DuckDuckGoProvider {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<String>, SearchError> {
        let url = format!(
            "{}/html/?q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        tracing::debug!(query = %query, max_results = options.max_results, "performing duckduckgo search");

        let response = self
            .client
            .get(&url)
            .header("Accept", "text/html")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(status = %status, "duckduckgo returned error status");
            return match status.as_u16() {
                429 => Err(SearchError::RateLimitExceeded),
                _ => Err(SearchError::ApiError(format!("HTTP {}", status))),
            };
        }

        let html = response.text().await?;
        let urls = parse_results(&html, options)?;

        if urls.is_empty() {
            tracing::warn!(query = %query, "duckduckgo page contained no results");
        }

        tracing::debug!(query = %query, result_count = urls.len(), "duckduckgo search completed");

        Ok(urls)
    }
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css}: {e:?}")))
}

/// Extract result URLs from a DuckDuckGo HTML page, in page order.
///
/// Result links are either direct or wrapped as `//duckduckgo.com/l/?uddg=<encoded>&rut=...`.
fn parse_results(html: &str, options: &SearchOptions) -> Result<Vec<String>, SearchError> {
    let document = Html::parse_document(html);
    let result_sel = selector(".result")?;
    let link_sel = selector(".result__a")?;

    let mut urls = Vec::new();

    for result in document.select(&result_sel) {
        if urls.len() >= options.max_results {
            break;
        }

        // Sponsored entries
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }

        let Some(link) = result.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(href) else {
            continue;
        };

        urls.push(url);
    }

    Ok(urls)
}

fn resolve_href(href: &str) -> Option<String> {
    if href.starts_with("//duckduckgo.com/l/?") || href.starts_with("/l/?") {
        let start = href.find("uddg=")? + "uddg=".len();
        let rest = &href[start..];
        let end = rest.find('&').unwrap_or(rest.len());
        let decoded = urlencoding::decode(&rest[..end]).ok()?.into_owned();
        (!decoded.is_empty()).then_some(decoded)
    } else if href.starts_with("http://") || href.starts_with("https://") {
        Some(href.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE: &str = r#"
        <div class="result result--ad">
            <a class="result__a" href="https://ads.test/buy">Ad</a>
        </div>
        <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fshop&rut=123">Example Title</a>
            <a class="result__snippet">Example description</a>
        </div>
        <div class="result">
            <a class="result__a" href="/l/?uddg=https%3A%2F%2Ftest.com">Test Page</a>
        </div>
        <div class="result">
            <a class="result__a" href="javascript:void(0)">Broken</a>
        </div>
        <div class="result">
            <a class="result__a" href="https://direct.test/">Direct</a>
        </div>
    "#;

    #[test]
    fn test_parse_sample_html() {
        let urls = parse_results(SAMPLE, &SearchOptions::default()).unwrap();
        assert_eq!(
            urls,
            vec!["https://example.com/shop", "https://test.com", "https://direct.test/"]
        );
    }

    #[test]
    fn test_parse_respects_max_results() {
        let results = parse_results(SAMPLE, &SearchOptions::with_max_results(1)).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_parse_empty_page() {
        let results = parse_results("<html><body></body></html>", &SearchOptions::default()).unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/html/"))
            .and(query_param("q", "red shoes"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE))
            .mount(&server)
            .await;

        let provider = DuckDuckGoProvider::new(reqwest::Client::new()).with_base_url(server.uri());
        let urls = provider
            .search("red shoes", &SearchOptions::with_max_results(10))
            .await
            .unwrap();
        assert_eq!(urls.len(), 3);
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = DuckDuckGoProvider::new(reqwest::Client::new()).with_base_url(server.uri());
        let err = provider.search("q", &SearchOptions::default()).await.unwrap_err();
        assert!(matches!(err, SearchError::ApiError(_)));
    }
}

use super::{TrustChecker, TrustError, TrustVerdict};
use crate::config::TrustConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://safebrowsing.googleapis.com";

const THREAT_TYPES: [&str; 4] = [
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

/// Google Safe Browsing v4 Lookup API client
///
/// A URL is `NotTrusted` when the API reports any threat match for it.
/// Documentation: https://developers.google.com/safe-browsing/v4/lookup-api
pub struct SafeBrowsingChecker {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    client_id: String,
}

impl SafeBrowsingChecker {
    pub fn new(config: &TrustConfig) -> Result<Self, TrustError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config
                .api_base
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            client_id: config.client_id.clone(),
        })
    }
}

#[async_trait::async_trait]
impl TrustChecker for SafeBrowsingChecker {
    async fn check_trust(&self, url: &str) -> Result<TrustVerdict, TrustError> {
        let endpoint = format!("{}/v4/threatMatches:find", self.base_url);

        let body = FindRequest {
            client: ClientInfo {
                client_id: &self.client_id,
                client_version: env!("CARGO_PKG_VERSION"),
            },
            threat_info: ThreatInfo {
                threat_types: &THREAT_TYPES,
                platform_types: &["ANY_PLATFORM"],
                threat_entry_types: &["URL"],
                threat_entries: vec![ThreatEntry { url }],
            },
        };

        tracing::debug!(url = %url, "safe browsing lookup");

        let response = self
            .client
            .post(&endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "safe browsing api error"
            );

            return match status.as_u16() {
                400 if error_text.contains("API key") => Err(TrustError::InvalidApiKey),
                401 | 403 => Err(TrustError::InvalidApiKey),
                429 => Err(TrustError::RateLimited),
                _ => Err(TrustError::Api(format!("HTTP {}", status))),
            };
        }

        let text = response.text().await?;
        let parsed: FindResponse = if text.trim().is_empty() {
            FindResponse::default()
        } else {
            serde_json::from_str(&text).map_err(|e| TrustError::MalformedResponse(e.to_string()))?
        };

        // Only one URL is sent per request, so any match belongs to it.
        if !parsed.matches.is_empty() {
            let threats: Vec<_> = parsed.matches.iter().map(|m| m.threat_type.as_str()).collect();
            tracing::info!(url = %url, threats = ?threats, "url flagged by safe browsing");
            Ok(TrustVerdict::NotTrusted)
        } else {
            Ok(TrustVerdict::Trusted)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FindRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'a [&'a str],
    platform_types: &'a [&'a str],
    threat_entry_types: &'a [&'a str],
    threat_entries: Vec<ThreatEntry<'a>>,
}

#[derive(Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    #[serde(default)]
    threat_type: String,
}

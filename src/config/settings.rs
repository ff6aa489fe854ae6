use serde::{Deserialize, Serialize};

/// Placeholder written into freshly created config files
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY_HERE";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of search results to classify per query
    #[serde(default = "default_result_count")]
    pub result_count: usize,

    /// Where the query log is written (default: ./search_results.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_store_path: Option<String>,

    /// Enable file logging
    #[serde(default)]
    pub debug: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_path: Option<String>,

    /// How often the debug log rolls over to a new file (default: daily)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_rotation: Option<DebugLogRotation>,

    /// How many rolled log files to keep (default 7, 0 = keep everything)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_log_keep: Option<usize>,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub trust: TrustConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            result_count: default_result_count(),
            log_store_path: None,
            search: SearchConfig::default(),
            classifier: ClassifierConfig::default(),
            trust: TrustConfig::default(),
            debug: false,
            debug_log_path: None,
            debug_log_rotation: None,
            debug_log_keep: None,
        }
    }
}

/// Search engine used as the URL source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub provider: SearchProviderKind,

    /// Required for Brave; ignored by DuckDuckGo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProviderKind::default(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchProviderKind {
    Brave,
    #[default]
    DuckDuckGo,
}

/// Language model used to classify URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub provider: Provider,

    pub api_key: String,

    /// Optional custom API base URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Model identifier
    pub model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature (0.0 - 1.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: Provider::OpenAI,
            api_key: API_KEY_PLACEHOLDER.to_string(),
            api_base: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: Some(16),
            temperature: Some(0.5),
        }
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Anthropic,
    OpenAI,
}

impl Provider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Provider::Anthropic => "https://api.anthropic.com",
            Provider::OpenAI => "https://api.openai.com",
        }
    }
}

/// Malicious-URL reputation service (Google Safe Browsing v4)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustConfig {
    pub api_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    #[serde(default = "default_client_id")]
    pub client_id: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            api_base: None,
            client_id: default_client_id(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Debug log rollover period
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DebugLogRotation {
    /// One file that grows forever
    Never,
    Hourly,
    #[default]
    Daily,
}

fn default_result_count() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_client_id() -> String {
    "shopsafe".to_string()
}

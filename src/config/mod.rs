pub mod settings;

pub use settings::{
    ClassifierConfig, Config, DebugLogRotation, Provider, SearchConfig, SearchProviderKind,
    TrustConfig,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "SHOPSAFE_CONFIG";

/// Configuration problems that prevent startup
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing credential `{field}` in config file")]
    MissingCredential { field: &'static str },

    #[error("Invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl Config {
    /// Check that every credential the configured services need is present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_count == 0 {
            return Err(ConfigError::Invalid {
                field: "result_count",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.search.provider == SearchProviderKind::Brave
            && !is_real_key(self.search.api_key.as_deref())
        {
            return Err(ConfigError::MissingCredential {
                field: "search.api_key",
            });
        }

        if !is_real_key(Some(&self.classifier.api_key)) {
            return Err(ConfigError::MissingCredential {
                field: "classifier.api_key",
            });
        }

        if self.classifier.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "classifier.model",
                reason: "must not be empty".to_string(),
            });
        }

        if !is_real_key(Some(&self.trust.api_key)) {
            return Err(ConfigError::MissingCredential {
                field: "trust.api_key",
            });
        }

        Ok(())
    }

    /// Resolved location of the query log
    pub fn log_store_path(&self) -> PathBuf {
        match self.log_store_path.as_deref() {
            Some(raw) if !raw.trim().is_empty() => PathBuf::from(expand_tilde(raw.trim())),
            _ => PathBuf::from(crate::store::DEFAULT_STORE_FILE),
        }
    }
}

fn is_real_key(key: Option<&str>) -> bool {
    match key.map(str::trim) {
        Some(k) => !k.is_empty() && k != settings::API_KEY_PLACEHOLDER,
        None => false,
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_tilde(raw: &str) -> String {
    if raw == "~" || raw.starts_with("~/") {
        if let Some(home) = dirs::home_dir() {
            let suffix = raw.strip_prefix('~').unwrap_or("");
            return format!("{}{}", home.display(), suffix);
        }
    }
    raw.to_string()
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    if let Ok(custom) = std::env::var(CONFIG_ENV) {
        if !custom.trim().is_empty() {
            return Ok(PathBuf::from(expand_tilde(custom.trim())));
        }
    }

    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("shopsafe");

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file, or create default if not exists.
///
/// Returns the config and whether it was freshly created.
pub fn load_or_create_config() -> Result<(Config, bool)> {
    let path = config_path()?;
    load_or_create_config_at(&path)
}

pub fn load_or_create_config_at(path: &Path) -> Result<(Config, bool)> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok((config, false))
    } else {
        let config = Config::default();
        save_config_at(&config, path)?;
        Ok((config, true))
    }
}

/// Save configuration to file
pub fn save_config_at(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

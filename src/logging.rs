use crate::config::{Config, DebugLogRotation};
use anyhow::{Context, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

const LOG_FILE_NAME: &str = "shopsafe-debug.log";

/// Rolled files kept when `debug_log_keep` is unset
const DEFAULT_KEEP: usize = 7;

/// Keeps the background log writer alive; flushes on drop.
pub struct LogGuard(#[allow(dead_code)] WorkerGuard);

/// Initialize debug logging.
///
/// When `debug` is enabled, logs go to `shopsafe-debug.log` next to the
/// config file unless `debug_log_path` names another file or directory.
/// The terminal belongs to the UI, so nothing is ever logged to stdout or
/// stderr. When `debug` is disabled, this is a no-op.
pub fn init(config: &Config) -> Result<Option<LogGuard>> {
    if !config.debug {
        return Ok(None);
    }

    let target = LogTarget::from_config(config)?;
    let (writer, guard) = tracing_appender::non_blocking(target.open()?);

    // RUST_LOG wins; otherwise debug for this crate, warn for dependencies.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("shopsafe=debug,warn"))
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .try_init()
        .ok(); // already initialized in tests

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %target.dir.display(),
        log_file = %target.file_name,
        rotation = ?target.rotation,
        keep = target.keep,
        "debug logging enabled"
    );

    Ok(Some(LogGuard(guard)))
}

/// Resolved location and rollover policy of the debug log
#[derive(Debug, PartialEq, Eq)]
struct LogTarget {
    dir: PathBuf,
    file_name: String,
    rotation: DebugLogRotation,
    keep: usize,
}

impl LogTarget {
    fn from_config(config: &Config) -> Result<Self> {
        let path = match config.debug_log_path.as_deref() {
            None => crate::config::config_path()?.with_file_name(LOG_FILE_NAME),
            Some(raw) => {
                let path = PathBuf::from(crate::config::expand_tilde(raw));
                if raw.ends_with(std::path::MAIN_SEPARATOR) || path.is_dir() {
                    path.join(LOG_FILE_NAME)
                } else {
                    path
                }
            }
        };

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .context("Invalid debug_log_path: file name is not valid UTF-8")?
            .to_string();

        Ok(Self {
            dir,
            file_name,
            rotation: config.debug_log_rotation.unwrap_or_default(),
            keep: config.debug_log_keep.unwrap_or(DEFAULT_KEEP),
        })
    }

    /// Create the log directory and the appender writing into it.
    ///
    /// Old rolled files beyond `keep` are pruned by the appender when it rolls over.
    fn open(&self) -> Result<RollingFileAppender> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory: {}", self.dir.display()))?;

        let rotation = match self.rotation {
            DebugLogRotation::Never => Rotation::NEVER,
            DebugLogRotation::Hourly => Rotation::HOURLY,
            DebugLogRotation::Daily => Rotation::DAILY,
        };

        let mut builder = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(self.file_name.as_str());
        if self.rotation != DebugLogRotation::Never && self.keep > 0 {
            builder = builder.max_log_files(self.keep);
        }

        builder
            .build(&self.dir)
            .with_context(|| format!("Failed to open log file in {}", self.dir.display()))
    }
}

/// Best-effort redaction for API keys that may be echoed back in error bodies.
///
/// Masks OpenAI/Anthropic style `sk-...` keys and Google `AIza...` keys.
pub fn redact_secrets(input: &str) -> String {
    static PATTERNS: OnceLock<[(Regex, &'static str); 2]> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            (
                Regex::new(r"sk-[A-Za-z0-9_\-]{8,}").expect("valid regex"),
                "sk-***REDACTED***",
            ),
            (
                Regex::new(r"AIza[A-Za-z0-9_\-]{8,}").expect("valid regex"),
                "AIza***REDACTED***",
            ),
        ]
    });

    let mut out = input.to_string();
    for (re, replacement) in patterns.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn target(dir: &Path, rotation: DebugLogRotation) -> LogTarget {
        LogTarget {
            dir: dir.to_path_buf(),
            file_name: "app.log".to_string(),
            rotation,
            keep: 3,
        }
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_redacts_openai_key() {
        let out = redact_secrets("bad key sk-abcdefgh12345 given");
        assert_eq!(out, "bad key sk-***REDACTED*** given");
    }

    #[test]
    fn test_redacts_google_key() {
        let out = redact_secrets("https://x.test/v4?key=AIzaSyA1234567890abc");
        assert_eq!(out, "https://x.test/v4?key=AIza***REDACTED***");
    }

    #[test]
    fn test_short_prefix_left_alone() {
        assert_eq!(redact_secrets("task-sk-1"), "task-sk-1");
    }

    #[test]
    fn test_directory_log_path() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            debug: true,
            debug_log_path: Some(format!("{}{}", dir.path().display(), std::path::MAIN_SEPARATOR)),
            ..Config::default()
        };

        let target = LogTarget::from_config(&config).unwrap();
        assert_eq!(target.dir, dir.path());
        assert_eq!(target.file_name, LOG_FILE_NAME);
    }

    #[test]
    fn test_defaults_roll_daily_and_keep_a_week() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            debug: true,
            debug_log_path: Some(dir.path().join("custom.log").display().to_string()),
            ..Config::default()
        };

        let target = LogTarget::from_config(&config).unwrap();
        assert_eq!(target.file_name, "custom.log");
        assert_eq!(target.rotation, DebugLogRotation::Daily);
        assert_eq!(target.keep, DEFAULT_KEEP);
    }

    #[test]
    fn test_never_rotation_writes_plain_file() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");

        let mut appender = target(&logs, DebugLogRotation::Never).open().unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();
        drop(appender);

        assert_eq!(file_names(&logs), vec!["app.log".to_string()]);
        assert_eq!(std::fs::read_to_string(logs.join("app.log")).unwrap(), "hello\n");
    }

    #[test]
    fn test_daily_rotation_writes_dated_file() {
        let dir = TempDir::new().unwrap();

        let mut appender = target(dir.path(), DebugLogRotation::Daily).open().unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();
        drop(appender);

        let names = file_names(dir.path());
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("app.log."), "unexpected file {}", names[0]);
    }
}

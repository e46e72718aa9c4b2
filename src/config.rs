//! Configuration management for hostlog

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::logging::{LogLevel, RetryPolicy, DEFAULT_CONSOLE_CAPACITY};

/// Sender name used for the host's own messages
pub const DEFAULT_APP_NAME: &str = "Plugin Host";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum severity written to the sinks: "trace", "info" (default), "warning", "error", "nothing"
    #[serde(default)]
    pub min_level: LogLevel,

    /// Whether lines are appended to the daily log file (default: true)
    #[serde(default = "default_file_logging")]
    pub file_logging: bool,

    /// Directory for the daily log files. Must already exist for file logging to happen.
    #[serde(default = "logs_dir")]
    pub logs_dir: PathBuf,

    /// Developer mode: bypass the level filter and mirror every line to the
    /// process diagnostics (default: false)
    #[serde(default)]
    pub dev_mode: bool,

    /// Sender name for host messages (default: "Plugin Host")
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Maximum lines kept by the debug console (default: 5000)
    #[serde(default = "default_console_capacity")]
    pub console_capacity: usize,

    /// Attempts per file append (default: 3)
    #[serde(default = "default_file_retry_attempts")]
    pub file_retry_attempts: u32,

    /// Delay between file append attempts in milliseconds (default: 10)
    #[serde(default = "default_file_retry_delay_ms")]
    pub file_retry_delay_ms: u64,
}

fn default_file_logging() -> bool {
    true
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

fn default_console_capacity() -> usize {
    DEFAULT_CONSOLE_CAPACITY
}

fn default_file_retry_attempts() -> u32 {
    3
}

fn default_file_retry_delay_ms() -> u64 {
    10
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::default(),
            file_logging: default_file_logging(),
            logs_dir: logs_dir(),
            dev_mode: false,
            app_name: default_app_name(),
            console_capacity: default_console_capacity(),
            file_retry_attempts: default_file_retry_attempts(),
            file_retry_delay_ms: default_file_retry_delay_ms(),
        }
    }
}

impl LoggingConfig {
    /// Load configuration from the default file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from `path`, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            tracing::info!(path = %path.display(), "No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Retry policy for file appends
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.file_retry_attempts,
            Duration::from_millis(self.file_retry_delay_ms),
        )
    }
}

/// Get the base configuration directory (~/.hostlog)
/// Falls back to ./.hostlog if home directory cannot be determined
pub fn config_dir() -> PathBuf {
    try_config_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine home directory, using current directory for config");
        PathBuf::from(".hostlog")
    })
}

/// Try to get the base configuration directory, returning None if home dir is unavailable
pub fn try_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".hostlog"))
}

/// Get the path to the config file
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Get the path to the default logs directory
pub fn logs_dir() -> PathBuf {
    config_dir().join("logs")
}

/// Ensure the config directory and the configured logs directory exist
pub fn ensure_directories(config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(config_dir()).context("Failed to create config directory")?;
    std::fs::create_dir_all(&config.logs_dir).context("Failed to create logs directory")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.file_logging);
        assert!(!config.dev_mode);
        assert_eq!(config.app_name, "Plugin Host");
        assert_eq!(config.retry_policy(), RetryPolicy::default());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = LoggingConfig::default();
        config.min_level = LogLevel::Warning;
        config.file_retry_attempts = 5;

        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("min_level = \"warning\""));

        let parsed: LoggingConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: LoggingConfig = toml::from_str("min_level = \"error\"").unwrap();
        assert_eq!(parsed.min_level, LogLevel::Error);
        assert!(parsed.file_logging);
        assert_eq!(parsed.file_retry_delay_ms, 10);
        assert!(parsed.logs_dir.ends_with("logs"));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let parsed: Result<LoggingConfig, _> = toml::from_str("min_level = \"loud\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggingConfig::load_from(&temp_dir.path().join("config.toml")).unwrap();
        assert_eq!(config, LoggingConfig::default());
    }

    #[derive(Clone, Default)]
    struct CaptureWriter(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_load_reports_defaults_to_installed_subscriber() {
        let temp_dir = TempDir::new().unwrap();
        let capture = CaptureWriter::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(crate::logging::DEFAULT_TRACING_FILTER)
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            LoggingConfig::load_from(&temp_dir.path().join("config.toml")).unwrap()
        });

        assert_eq!(config, LoggingConfig::default());
        let output = String::from_utf8_lossy(&capture.0.lock().unwrap()).into_owned();
        assert!(output.contains("No config file found, using defaults"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = LoggingConfig::default();
        config.dev_mode = true;
        config.logs_dir = temp_dir.path().join("logs");

        config.save_to(&path).unwrap();
        let loaded = LoggingConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_dir_does_not_panic() {
        let dir = config_dir();
        assert!(dir.ends_with(".hostlog"));
    }
}

//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::poller::DEFAULT_INTERVAL;
use crate::status::StatusClientConfig;
use crate::view::DEFAULT_LOG_ROWS;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub poller: PollerConfig,

    #[serde(default)]
    pub view: ViewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Status polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_status_path")]
    pub status_path: String,

    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    /// Unset means no timeout beyond the HTTP client's own behavior
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_status_path() -> String {
    "/api/status".to_string()
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            status_path: default_status_path(),
            interval_ms: default_interval(),
            request_timeout_ms: None,
        }
    }
}

impl PollerConfig {
    /// Polling period, rejecting zero
    pub fn interval(&self) -> Result<Duration, ConfigError> {
        if self.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poller.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_millis(self.interval_ms))
    }

    pub fn client_config(&self) -> StatusClientConfig {
        StatusClientConfig {
            base_url: self.base_url.clone(),
            status_path: self.status_path.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Terminal view configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_log_rows")]
    pub log_rows: usize,
}

fn default_log_rows() -> usize {
    DEFAULT_LOG_ROWS
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            log_rows: default_log_rows(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ConfigError::Parse { error, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("whisper-dashboard").join("config.toml")),
            Some(PathBuf::from("/etc/whisper-dashboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Poller overrides
        if let Ok(url) = std::env::var("WHISPER_DASHBOARD_URL") {
            self.poller.base_url = url;
        }
        if let Ok(interval) = std::env::var("WHISPER_DASHBOARD_INTERVAL_MS") {
            if let Ok(ms) = interval.parse() {
                self.poller.interval_ms = ms;
            }
        }

        // Logging overrides
        if let Ok(level) = std::env::var("WHISPER_DASHBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WHISPER_DASHBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Whisper Dashboard Configuration
#
# Environment variables override these settings:
# - WHISPER_DASHBOARD_URL
# - WHISPER_DASHBOARD_INTERVAL_MS
# - WHISPER_DASHBOARD_LOG_LEVEL
# - WHISPER_DASHBOARD_LOG_FORMAT

[poller]
# Chat server web interface
base_url = "http://localhost:8080"

# Status resource path
status_path = "/api/status"

# Polling period (ms)
interval_ms = 2000

# Optional request timeout (ms)
# request_timeout_ms = 5000

[view]
# Log rows kept on screen in the terminal view
log_rows = 20

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

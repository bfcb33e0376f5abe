//! Configuration management for the price cache
//!
//! Loads configuration from config.toml at startup.
//! All values are configurable to avoid hardcoded constants.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Service configuration
///
/// Loaded from config.toml at startup. Every section falls back to
/// defaults matching the public HitBTC API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Market-data provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Background refresh settings
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// API server settings
    #[serde(default)]
    pub api: ApiConfig,
}

/// Market-data provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Base URL of the public REST API, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Refresher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshConfig {
    /// Pause between two refresh ticks in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Symbols loaded at startup, in refresh order
    #[serde(default = "default_seed_symbols")]
    pub seed_symbols: Vec<String>,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Port for HTTP API server
    #[serde(default = "default_api_port")]
    pub port: u16,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            seed_symbols: default_seed_symbols(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: default_api_port(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.hitbtc.com/api/3".to_string()
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_user_agent() -> String {
    "ticker-cache/0.1".to_string()
}

fn default_interval_ms() -> u64 {
    100
}

fn default_seed_symbols() -> Vec<String> {
    vec!["ETHBTC".to_string(), "BTCUSDC".to_string()]
}

fn default_api_port() -> u16 {
    8000
}

impl ProviderConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl RefreshConfig {
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Load configuration from config.toml file
    ///
    /// If the file doesn't exist, returns default configuration.
    /// # Errors
    /// Returns error if file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // File not found - use defaults
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::IoError(e)),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Reject values the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_ms == 0 {
            return Err(ConfigError::Invalid("refresh.interval_ms must be > 0".into()));
        }
        if self.provider.timeout_ms == 0 {
            return Err(ConfigError::Invalid("provider.timeout_ms must be > 0".into()));
        }
        if self.refresh.seed_symbols.is_empty() {
            return Err(ConfigError::Invalid("refresh.seed_symbols must not be empty".into()));
        }
        let url = Url::parse(&self.provider.base_url)
            .map_err(|e| ConfigError::Invalid(format!("provider.base_url: {}", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "provider.base_url: unsupported scheme {}",
                url.scheme()
            )));
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading file
    IoError(std::io::Error),
    /// Parse error (invalid TOML)
    ParseError(String),
    /// Parsed fine but a value is out of range
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::ParseError(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError(e) => Some(e),
            ConfigError::ParseError(_) | ConfigError::Invalid(_) => None,
        }
    }
}

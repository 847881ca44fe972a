//! Configuration management for Launchpad.
//!
//! Configuration is read from an optional TOML file and then overridden
//! by environment variables, so a container can run with no file at all.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "LAUNCHPAD_CONFIG";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidOverride { key: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub planets: PlanetsConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub base_url: String,
}

/// Planets that launches may be scheduled against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanetsConfig {
    #[serde(default = "default_kepler_names")]
    pub kepler_names: Vec<String>,
}

fn default_port() -> u16 {
    8000
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_database_path() -> PathBuf {
    PathBuf::from("data/launchpad.db")
}

fn default_feed_url() -> String {
    "https://api.spacexdata.com".to_string()
}

fn default_kepler_names() -> Vec<String> {
    [
        "Kepler-1652 b",
        "Kepler-1410 b",
        "Kepler-296 A f",
        "Kepler-442 b",
        "Kepler-296 A e",
        "Kepler-62 f",
        "Kepler-1649 b",
        "Kepler-62 e",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_format: default_log_format(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_url(),
        }
    }
}

impl Default for PlanetsConfig {
    fn default() -> Self {
        Self {
            kepler_names: default_kepler_names(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file named by `LAUNCHPAD_CONFIG` (if any), apply environment
    /// overrides and validate the result.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `PORT`, `DATABASE_PATH`, `LAUNCH_FEED_URL` and `LOG_FORMAT`
    /// overrides taken from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidOverride {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.storage.database_path = PathBuf::from(path);
        }
        if let Some(url) = lookup("LAUNCH_FEED_URL") {
            self.feed.base_url = url;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.server.log_format = match format.as_str() {
                "json" => LogFormat::Json,
                "pretty" => LogFormat::Pretty,
                _ => {
                    return Err(ConfigError::InvalidOverride {
                        key: "LOG_FORMAT",
                        value: format.clone(),
                    })
                }
            };
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.storage.database_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.database_path cannot be empty".to_string(),
            ));
        }
        if self.feed.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "feed.base_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

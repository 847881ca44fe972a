//! Core functionality shared by the Launchpad crates.
//!
//! Configuration loading and logging initialization used by the service binary.

pub mod config;
pub mod logging;

pub use config::{
    Config, ConfigError, FeedConfig, LogFormat, PlanetsConfig, ServerConfig, StorageConfig,
};

//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use super::defaults::default_motd_lines;
use super::limits::LimitsConfig;
use super::listen::ListenConfig;
use super::validation::{self, ValidationError};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    pub server: ServerConfig,
    /// Network listen configuration.
    pub listen: ListenConfig,
    /// Message of the Day configuration.
    #[serde(default)]
    pub motd: MotdConfig,
    /// Queue and line size limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Channel defaults.
    #[serde(default)]
    pub channels: ChannelsConfig,
    /// Log output configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Run startup checks, collecting every problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate(self).map_err(ConfigError::Invalid)
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name (e.g., "irc.skerry.test"), used as the prefix of every reply.
    pub name: String,
    /// Network name (e.g., "Skerry").
    pub network: String,
    /// Server description.
    #[serde(default)]
    pub description: String,
}

/// Message of the Day configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MotdConfig {
    /// MOTD body, one RPL_MOTD per line.
    #[serde(default = "default_motd_lines")]
    pub lines: Vec<String>,
}

impl Default for MotdConfig {
    fn default() -> Self {
        Self {
            lines: default_motd_lines(),
        }
    }
}

/// Channel defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChannelsConfig {
    /// Topic given to newly created channels.
    #[serde(default)]
    pub default_topic: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Log output configuration. Filtering is left to `RUST_LOG`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

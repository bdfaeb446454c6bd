//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, MotdConfig, ...)
//! - [`listen`]: Network listener configuration (ListenConfig)
//! - [`limits`]: Line, mailbox and queue sizes (LimitsConfig)
//! - [`validation`]: Startup checks run after parsing

mod defaults;
mod limits;
mod listen;
mod types;
mod validation;

pub use limits::LimitsConfig;
pub use listen::ListenConfig;
pub use types::{
    ChannelsConfig, Config, ConfigError, LogFormat, LoggingConfig, MotdConfig, ServerConfig,
};
pub use validation::ValidationError;

//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Shortest line limit that still fits a useful command.
const MIN_LINE_LEN: usize = 16;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("server.name must not contain spaces, got '{0}'")]
    ServerNameHasSpace(String),
    #[error("limits.{0} must be greater than zero")]
    ZeroCapacity(&'static str),
    #[error("limits.max_line_len must be at least {min}, got {0}", min = MIN_LINE_LEN)]
    LineLimitTooSmall(usize),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let name = &config.server.name;
    if name.is_empty() {
        errors.push(ValidationError::MissingServerName);
    } else if name.contains(' ') {
        errors.push(ValidationError::ServerNameHasSpace(name.clone()));
    }

    let limits = &config.limits;
    if limits.mailbox_capacity == 0 {
        errors.push(ValidationError::ZeroCapacity("mailbox_capacity"));
    }
    if limits.authority_queue == 0 {
        errors.push(ValidationError::ZeroCapacity("authority_queue"));
    }
    if limits.max_line_len < MIN_LINE_LEN {
        errors.push(ValidationError::LineLimitTooSmall(limits.max_line_len));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

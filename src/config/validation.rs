//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("identity.nick is required")]
    MissingNick,
    #[error("identity.token is required (or set {})", super::TOKEN_ENV_VAR)]
    MissingToken,
    #[error("bot.channels must list at least one channel")]
    NoChannels,
    #[error("channel must start with '#', got '{0}'")]
    InvalidChannel(String),
    #[error("limits.{0} must be greater than zero")]
    ZeroLimit(&'static str),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.identity.nick.is_empty() {
        errors.push(ValidationError::MissingNick);
    }
    if config.identity.token.is_empty() {
        errors.push(ValidationError::MissingToken);
    }

    if config.bot.channels.is_empty() {
        errors.push(ValidationError::NoChannels);
    }
    for channel in &config.bot.channels {
        if !channel.starts_with('#') || channel.len() < 2 || channel.contains(' ') {
            errors.push(ValidationError::InvalidChannel(channel.clone()));
        }
    }

    if config.limits.max_line_len == 0 {
        errors.push(ValidationError::ZeroLimit("max_line_len"));
    }
    if config.limits.outgoing_queue == 0 {
        errors.push(ValidationError::ZeroLimit("outgoing_queue"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

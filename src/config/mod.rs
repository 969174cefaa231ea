//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and loading
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup checks

mod defaults;
mod types;
mod validation;

pub use types::{Config, LogFormat, TOKEN_ENV_VAR};
pub use validation::validate;

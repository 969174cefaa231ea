//! Core configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use super::defaults::*;
use super::validation::ValidationError;

/// Environment variable that overrides `identity.token`.
pub const TOKEN_ENV_VAR: &str = "GLHF_OAUTH_TOKEN";

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

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat server to connect to.
    #[serde(default)]
    pub server: ServerConfig,
    /// Login identity.
    pub identity: IdentityConfig,
    /// Channels and command behaviour.
    pub bot: BotConfig,
    /// Framing and queue limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Logging output.
    #[serde(default)]
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// The token from [`TOKEN_ENV_VAR`] wins over the file, and the result
    /// is validated before it is returned.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR) {
            config.identity.token = token;
        }
        super::validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Parse configuration text without touching the environment.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Chat server address.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Hostname of the chat server.
    #[serde(default = "default_host")]
    pub host: String,
    /// Plaintext IRC port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` for `TcpStream::connect`.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Login identity.
#[derive(Clone, Deserialize)]
pub struct IdentityConfig {
    /// Bot account login name.
    pub nick: String,
    /// `oauth:...` token. May be left empty when the env var is set.
    #[serde(default)]
    pub token: String,
}

// Keep the token out of `{:?}` output.
impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("nick", &self.nick)
            .field("token", &"********")
            .finish()
    }
}

/// Channels and command behaviour.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Channels to join, each starting with `#`.
    pub channels: Vec<String>,
    /// Where custom commands are persisted.
    #[serde(default = "default_commands_file")]
    pub commands_file: String,
    /// Capabilities requested after login.
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
    /// Answer commands as threaded replies when the message has an id.
    #[serde(default)]
    pub threaded_replies: bool,
}

/// Framing and queue limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Longest accepted line in bytes, terminator included.
    #[serde(default = "default_max_line_len")]
    pub max_line_len: usize,
    /// Capacity of the outgoing line queue.
    #[serde(default = "default_outgoing_queue")]
    pub outgoing_queue: usize,
    /// Pause between reconnect attempts.
    #[serde(default = "default_reconnect_delay_secs")]
    pub reconnect_delay_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: default_max_line_len(),
            outgoing_queue: default_outgoing_queue(),
            reconnect_delay_secs: default_reconnect_delay_secs(),
        }
    }
}

impl LimitsConfig {
    /// Reconnect pause as a `Duration`.
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// Output format. `RUST_LOG` still controls the filter.
    #[serde(default)]
    pub format: LogFormat,
}

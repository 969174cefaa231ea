//! Tracing setup and span constructors.

use crate::config::LogFormat;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` picks the filter, falling back
/// to `info`.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Standardized span constructors for chat observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Span covering one session with the chat server.
    pub fn session(addr: &str, nick: &str) -> Span {
        info_span!("session", addr = %addr, nick = %nick)
    }
}

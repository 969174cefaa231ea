//! Network module.
//!
//! Contains the chat `Connection` and the supervisor loop that reconnects it.

mod connection;

pub use connection::{Connection, SessionEnd, SessionError};

use crate::config::Config;
use crate::handlers::{Registry, Shared};
use tracing::{error, info, warn};

/// Keep a session alive until Ctrl-C or a fatal error.
///
/// RECONNECT, EOF and I/O errors all lead to a new session after
/// `limits.reconnect_delay_secs`.
pub async fn run(config: &Config, shared: &Shared, registry: &Registry) -> Result<(), SessionError> {
    let delay = config.limits.reconnect_delay();

    loop {
        let conn = Connection::new(config, shared, registry);
        let outcome = tokio::select! {
            outcome = conn.connect() => outcome,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                return Ok(());
            }
        };

        match outcome {
            Ok(SessionEnd::Reconnect) => info!("Reconnecting at server request"),
            Ok(SessionEnd::Disconnected) => warn!("Disconnected"),
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Giving up");
                return Err(e);
            }
            Err(e) => warn!(error = %e, "Session failed"),
        }

        info!(delay_secs = delay.as_secs(), "Waiting before reconnect");
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                return Ok(());
            }
        }
    }
}

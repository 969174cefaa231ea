//! glhf - a Twitch chat bot built on a zero-copy IRC line parser.
//!
//! Connects to the chat server, answers `!commands` typed in the configured
//! channels, and lets moderators define new ones at runtime.

mod config;
mod error;
mod handlers;
mod network;
mod store;
mod telemetry;

use crate::config::Config;
use crate::handlers::{Registry, Shared};
use crate::store::CommandStore;
use tracing::{Instrument, error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            // The subscriber isn't installed yet, so fall back to the
            // default format to report this.
            telemetry::init_tracing(Default::default());
            error!(path = %config_path, error = %e, "Failed to load config");
            return Err(e.into());
        }
    };

    telemetry::init_tracing(config.log.format);

    info!(
        nick = %config.identity.nick,
        channels = ?config.bot.channels,
        server = %config.server.address(),
        "Starting glhf"
    );

    let store = CommandStore::load(&config.bot.commands_file).map_err(|e| {
        error!(path = %config.bot.commands_file, error = %e, "Failed to load commands");
        e
    })?;
    info!(path = %store.path().display(), count = store.len(), "Custom commands ready");

    let shared = Shared::new(store, config.bot.threaded_replies);
    let registry = Registry::new();

    let session_span = telemetry::spans::session(&config.server.address(), &config.identity.nick);
    network::run(&config, &shared, &registry)
        .instrument(session_span)
        .await?;

    let stats = registry.get_command_stats();
    info!(?stats, "Shutting down");
    Ok(())
}

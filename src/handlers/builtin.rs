//! Built-in commands anyone can run, plus `!echo`.

use super::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glhf_proto::{BotCommand, Permission};

/// `!ping` answers `pong`.
pub struct PingHandler;

#[async_trait]
impl Handler for PingHandler {
    async fn handle(&self, ctx: &Context<'_>, _cmd: &BotCommand<'_>) -> HandlerResult {
        ctx.reply("pong").await
    }
}

/// `!uptime` reports how long the bot has been running.
pub struct UptimeHandler;

#[async_trait]
impl Handler for UptimeHandler {
    async fn handle(&self, ctx: &Context<'_>, _cmd: &BotCommand<'_>) -> HandlerResult {
        let text = format!(
            "up for {}",
            format_uptime(ctx.shared.started_at, Utc::now())
        );
        ctx.reply(text).await
    }
}

/// `!commands` lists built-in and custom commands.
pub struct CommandsHandler;

#[async_trait]
impl Handler for CommandsHandler {
    async fn handle(&self, ctx: &Context<'_>, _cmd: &BotCommand<'_>) -> HandlerResult {
        let mut names: Vec<String> = ctx
            .registry
            .builtin_names()
            .into_iter()
            .map(|name| format!("!{name}"))
            .collect();
        names.extend(ctx.shared.store.read().names().map(|name| format!("!{name}")));

        ctx.reply(format!("commands: {}", names.join(" "))).await
    }
}

/// `!echo <args...>` repeats its arguments joined by single spaces.
pub struct EchoHandler;

#[async_trait]
impl Handler for EchoHandler {
    async fn handle(&self, ctx: &Context<'_>, cmd: &BotCommand<'_>) -> HandlerResult {
        if cmd.args.is_empty() {
            return Err(HandlerError::NeedMoreParams { usage: "<text...>" });
        }
        ctx.reply(cmd.args.join(" ")).await
    }

    fn permission(&self) -> Permission {
        Permission::Moderator
    }
}

/// Render the time between `since` and `now` as `1d 2h 3m 4s`, dropping
/// leading zero units.
pub fn format_uptime(since: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let total = (now - since).num_seconds().max(0);
    let (days, hours, minutes, seconds) = (
        total / 86_400,
        total % 86_400 / 3_600,
        total % 3_600 / 60,
        total % 60,
    );

    if days > 0 {
        format!("{days}d {hours}h {minutes}m {seconds}s")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

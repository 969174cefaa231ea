//! Command handler registry and dispatch.
//!
//! The `Registry` maps built-in command names to handlers, enforces their
//! permission levels, and falls back to the custom command store.

use super::context::{Context, Handler};
use crate::error::{HandlerError, HandlerResult};
use crate::handlers::{
    builtin::{CommandsHandler, EchoHandler, PingHandler, UptimeHandler},
    custom::{AddCmdHandler, DelCmdHandler, EditCmdHandler},
};
use crate::store::render_response;
use glhf_proto::BotCommand;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Instrument, Level, debug, span};

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    /// Usage counters, one per built-in.
    command_counts: HashMap<&'static str, Arc<AtomicU64>>,
}

impl Registry {
    /// Create a registry with every built-in command registered.
    pub fn new() -> Self {
        let mut handlers: HashMap<&'static str, Box<dyn Handler>> = HashMap::new();

        // Anyone
        handlers.insert("ping", Box::new(PingHandler));
        handlers.insert("uptime", Box::new(UptimeHandler));
        handlers.insert("commands", Box::new(CommandsHandler));

        // Moderators
        handlers.insert("echo", Box::new(EchoHandler));
        handlers.insert("addcmd", Box::new(AddCmdHandler));
        handlers.insert("editcmd", Box::new(EditCmdHandler));
        handlers.insert("delcmd", Box::new(DelCmdHandler));

        let command_counts = handlers
            .keys()
            .map(|&cmd| (cmd, Arc::new(AtomicU64::new(0))))
            .collect();

        Self {
            handlers,
            command_counts,
        }
    }

    /// True if `name` is a built-in command. Built-in names cannot be
    /// shadowed by custom commands.
    pub fn is_builtin(&self, name: &str) -> bool {
        self.handlers.contains_key(name.to_ascii_lowercase().as_str())
    }

    /// Sorted built-in names.
    pub fn builtin_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Usage counts of built-ins that have been run, most used first.
    pub fn get_command_stats(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .command_counts
            .iter()
            .map(|(cmd, count)| (*cmd, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }

    /// Run a chat command.
    ///
    /// Handler failures are logged and, where it makes sense, answered in
    /// chat. Only a closed outgoing queue is returned to the caller.
    pub async fn dispatch(&self, ctx: &Context<'_>, cmd: &BotCommand<'_>) -> HandlerResult {
        let name = cmd.name.to_ascii_lowercase();

        let Some(handler) = self.handlers.get(name.as_str()) else {
            return self.dispatch_custom(ctx, cmd, &name).await;
        };

        if let Some(counter) = self.command_counts.get(name.as_str()) {
            counter.fetch_add(1, Ordering::Relaxed);
        }

        let cmd_span = span!(
            Level::DEBUG,
            "bot.command",
            command = %name,
            channel = ctx.channel,
            user = ctx.user,
            permission = ctx.permission.as_str(),
            msgid = ctx.msg_id,
        );

        let required = handler.permission();
        let result = if ctx.permission < required {
            Err(HandlerError::PermissionDenied {
                required,
                granted: ctx.permission,
            })
        } else {
            handler.handle(ctx, cmd).instrument(cmd_span).await
        };

        match result {
            Ok(()) => Ok(()),
            Err(e @ HandlerError::Send(_)) => Err(e),
            Err(e) => {
                debug!(command = %name, user = ctx.user, error = %e, code = e.error_code(), "Command error");
                match e.to_chat_reply(ctx.user, &name) {
                    Some(text) => ctx.reply(text).await,
                    None => Ok(()),
                }
            }
        }
    }

    async fn dispatch_custom(
        &self,
        ctx: &Context<'_>,
        cmd: &BotCommand<'_>,
        name: &str,
    ) -> HandlerResult {
        // Guard dropped before the send below.
        let response = ctx
            .shared
            .store
            .read()
            .get(name)
            .map(|template| render_response(template, ctx.user, cmd.arg_text));

        match response {
            Some(text) => {
                debug!(command = %name, channel = ctx.channel, "Custom command");
                ctx.reply(text).await
            }
            None => {
                debug!(command = %name, channel = ctx.channel, "Unknown command");
                Ok(())
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::core::context::test_support::{context, shared_in};
    use glhf_proto::{Outgoing, Permission};
    use tokio::sync::mpsc;

    fn command(text: &str) -> BotCommand<'_> {
        BotCommand::parse(text).unwrap().unwrap()
    }

    #[test]
    fn test_builtin_names() {
        let registry = Registry::new();
        assert_eq!(
            registry.builtin_names(),
            vec!["addcmd", "commands", "delcmd", "echo", "editcmd", "ping", "uptime"]
        );
        assert!(registry.is_builtin("PING"));
        assert!(!registry.is_builtin("discord"));
    }

    #[tokio::test]
    async fn test_dispatch_counts_and_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let shared = shared_in(dir.path());
        let registry = Registry::new();
        let (tx, mut rx) = mpsc::channel(8);
        let ctx = context(Permission::None, &tx, &shared, &registry);

        registry.dispatch(&ctx, &command("!PING")).await.unwrap();
        registry.dispatch(&ctx, &command("!ping")).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), Outgoing::privmsg("#chan", "pong"));
        assert_eq!(rx.recv().await.unwrap(), Outgoing::privmsg("#chan", "pong"));
        assert_eq!(registry.get_command_stats(), vec![("ping", 2)]);
    }

    #[tokio::test]
    async fn test_permission_denied_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let shared = shared_in(dir.path());
        let registry = Registry::new();
        let (tx, mut rx) = mpsc::channel(8);
        let ctx = context(Permission::None, &tx, &shared, &registry);

        registry.dispatch(&ctx, &command("!echo hi")).await.unwrap();
        registry.dispatch(&ctx, &command("!addcmd x y")).await.unwrap();
        assert!(rx.try_recv().is_err());
        assert!(shared.store.read().is_empty());
    }

    #[tokio::test]
    async fn test_custom_fallback_and_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let shared = shared_in(dir.path());
        shared.store.write().insert("hug", "{user} hugs {args}");
        let registry = Registry::new();
        let (tx, mut rx) = mpsc::channel(8);
        let ctx = context(Permission::None, &tx, &shared, &registry);

        registry
            .dispatch(&ctx, &command("!hug \"the chat\""))
            .await
            .unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            Outgoing::privmsg("#chan", "Viewer hugs \"the chat\"")
        );

        registry.dispatch(&ctx, &command("!nope")).await.unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_error_reply_in_chat() {
        let dir = tempfile::tempdir().unwrap();
        let shared = shared_in(dir.path());
        let registry = Registry::new();
        let (tx, mut rx) = mpsc::channel(8);
        let ctx = context(Permission::Moderator, &tx, &shared, &registry);

        registry.dispatch(&ctx, &command("!delcmd")).await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            Outgoing::privmsg("#chan", "@Viewer usage: !delcmd <name>")
        );
    }

    #[tokio::test]
    async fn test_closed_queue_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let shared = shared_in(dir.path());
        let registry = Registry::new();
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let ctx = context(Permission::None, &tx, &shared, &registry);

        let err = registry.dispatch(&ctx, &command("!ping")).await.unwrap_err();
        assert_eq!(err.error_code(), "send_error");
    }
}

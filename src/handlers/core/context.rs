//! Handler context and the `Handler` trait.
//!
//! A `Context` is built per chat message and borrows everything a handler
//! may touch: who sent the command, where to reply, and the shared bot state.

use crate::error::HandlerResult;
use crate::store::CommandStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glhf_proto::{BotCommand, Outgoing, ParsedMessage, Permission};
use parking_lot::RwLock;
use tokio::sync::mpsc;

use super::registry::Registry;

/// State shared by every session for the life of the process.
#[derive(Debug)]
pub struct Shared {
    /// User-defined commands.
    pub store: RwLock<CommandStore>,
    /// Process start, for `!uptime`.
    pub started_at: DateTime<Utc>,
    /// Thread replies under the triggering message when it has an id.
    pub threaded_replies: bool,
}

impl Shared {
    pub fn new(store: CommandStore, threaded_replies: bool) -> Self {
        Self {
            store: RwLock::new(store),
            started_at: Utc::now(),
            threaded_replies,
        }
    }
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Channel the command was typed in.
    pub channel: &'a str,
    /// Display name if tagged, otherwise the login nick.
    pub user: &'a str,
    /// Sender's permission level from their badges.
    pub permission: Permission,
    /// Twitch message id of the triggering line.
    pub msg_id: Option<&'a str>,
    /// Outgoing queue of the current session.
    pub sender: &'a mpsc::Sender<Outgoing>,
    pub shared: &'a Shared,
    /// Registry, for commands that list other commands.
    pub registry: &'a Registry,
}

impl<'a> Context<'a> {
    /// Build a context for a PRIVMSG. Returns `None` when the line has no
    /// channel or no identifiable sender.
    pub fn from_message(
        msg: &ParsedMessage<'a>,
        sender: &'a mpsc::Sender<Outgoing>,
        shared: &'a Shared,
        registry: &'a Registry,
    ) -> Option<Self> {
        Some(Self {
            channel: msg.channel()?,
            user: msg.sender_name()?,
            permission: msg.permissions,
            msg_id: msg.tags.as_ref().and_then(|tags| tags.msg_id()),
            sender,
            shared,
            registry,
        })
    }

    /// Post `text` to the channel the command came from.
    pub async fn reply(&self, text: impl Into<String>) -> HandlerResult {
        let msg = match self.msg_id {
            Some(id) if self.shared.threaded_replies => Outgoing::reply(self.channel, text, id),
            _ => Outgoing::privmsg(self.channel, text),
        };
        self.sender.send(msg).await?;
        Ok(())
    }
}

/// A chat command handler.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, ctx: &Context<'_>, cmd: &BotCommand<'_>) -> HandlerResult;

    /// Minimum permission required to run this command.
    fn permission(&self) -> Permission {
        Permission::None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_message() {
        let dir = tempfile::tempdir().unwrap();
        let shared = test_support::shared_in(dir.path());
        let registry = Registry::new();
        let (tx, _rx) = mpsc::channel(4);

        let msg = ParsedMessage::parse(
            "@badges=moderator/1;display-name=Mod;id=abc :mod!mod@mod.tmi.example.tv PRIVMSG #chan :!ping",
        )
        .unwrap();
        let ctx = Context::from_message(&msg, &tx, &shared, &registry).unwrap();
        assert_eq!(ctx.channel, "#chan");
        assert_eq!(ctx.user, "Mod");
        assert_eq!(ctx.permission, Permission::Moderator);
        assert_eq!(ctx.msg_id, Some("abc"));

        let msg = ParsedMessage::parse("PRIVMSG #chan :!ping").unwrap();
        assert!(Context::from_message(&msg, &tx, &shared, &registry).is_none());
    }

    #[tokio::test]
    async fn test_reply_threads_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut shared = test_support::shared_in(dir.path());
        let registry = Registry::new();
        let (tx, mut rx) = mpsc::channel(4);

        {
            let ctx = test_support::context(Permission::None, &tx, &shared, &registry);
            ctx.reply("plain").await.unwrap();
        }
        assert_eq!(rx.recv().await.unwrap(), Outgoing::privmsg("#chan", "plain"));

        shared.threaded_replies = true;
        let ctx = test_support::context(Permission::None, &tx, &shared, &registry);
        ctx.reply("threaded").await.unwrap();
        assert_eq!(
            rx.recv().await.unwrap(),
            Outgoing::reply("#chan", "threaded", "msg-1")
        );
    }
}

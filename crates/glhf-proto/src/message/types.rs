//! Borrowed message types.

use super::tags::{Permission, Tags};
use crate::command::BotCommand;

/// Sender of a line: `nick!user@host` or a bare server host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Source<'a> {
    /// Nickname before the first `!`. `None` for server-originated lines.
    pub nick: Option<&'a str>,
    /// Everything after the first `!`, or the whole prefix when there is none.
    pub host: &'a str,
}

impl<'a> Source<'a> {
    /// Split a raw prefix on its first `!`.
    pub fn parse(raw: &'a str) -> Self {
        match raw.split_once('!') {
            Some((nick, host)) => Source {
                nick: Some(nick),
                host,
            },
            None => Source {
                nick: None,
                host: raw,
            },
        }
    }
}

/// The command token and the optional channel/target that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandPart<'a> {
    /// Command name or three-digit numeric, e.g. `PRIVMSG` or `001`.
    pub command: &'a str,
    /// First parameter after the command, when it is not the trailing one.
    pub channel: Option<&'a str>,
}

/// One parsed protocol line.
///
/// Every string field borrows from the line passed to
/// [`ParsedMessage::parse`], so the message cannot outlive that buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedMessage<'a> {
    /// Tags, present only when the line started with `@`.
    pub tags: Option<Tags<'a>>,
    /// Derived from the `badges` tag.
    pub permissions: Permission,
    /// Sender prefix, present only when the line had a `:source`.
    pub source: Option<Source<'a>>,
    /// Command and optional channel.
    pub command: CommandPart<'a>,
    /// Trailing free text after ` :`.
    pub parameters: Option<&'a str>,
    /// `!name args...` invocation found in `parameters`.
    pub bot_command: Option<BotCommand<'a>>,
    /// The line that was parsed.
    pub raw: &'a str,
}

impl<'a> ParsedMessage<'a> {
    /// Get the command name.
    #[inline]
    pub fn command_name(&self) -> &'a str {
        self.command.command
    }

    /// Get the channel/target, if any.
    #[inline]
    pub fn channel(&self) -> Option<&'a str> {
        self.command.channel
    }

    /// Get the value of a tag by key.
    pub fn tag_value(&self, key: &str) -> Option<&'a str> {
        self.tags.as_ref().and_then(|tags| tags.get(key))
    }

    /// Sender nickname, if the source carried one.
    pub fn source_nickname(&self) -> Option<&'a str> {
        self.source.and_then(|s| s.nick)
    }

    /// Name to address the sender by: `display-name` tag, falling back to
    /// the source nickname.
    pub fn sender_name(&self) -> Option<&'a str> {
        self.tags
            .as_ref()
            .and_then(|tags| tags.display_name())
            .or_else(|| self.source_nickname())
    }

    /// Check the command name, ignoring ASCII case.
    #[inline]
    pub fn is(&self, command: &str) -> bool {
        self.command.command.eq_ignore_ascii_case(command)
    }

    /// Check if this is a PRIVMSG.
    #[inline]
    pub fn is_privmsg(&self) -> bool {
        self.is("PRIVMSG")
    }

    /// Check if this is a numeric response (3-digit command).
    #[inline]
    pub fn is_numeric(&self) -> bool {
        let cmd = self.command.command;
        cmd.len() == 3 && cmd.bytes().all(|b| b.is_ascii_digit())
    }

    /// Get the numeric response code if this is a numeric response.
    pub fn numeric_code(&self) -> Option<u16> {
        if self.is_numeric() {
            self.command.command.parse().ok()
        } else {
            None
        }
    }
}

//! # glhf-proto
//!
//! Zero-copy parsing for Twitch-flavoured IRC lines and the `!command`
//! syntax viewers type into chat.
//!
//! ## Features
//!
//! - Positional line parser: tags, source, command, channel, trailing text
//! - Every parsed field borrows from the input line
//! - Permission level derived from the `badges` tag
//! - `!name arg "quoted arg"` tokenizer
//! - Optional Tokio line codec and outgoing line rendering
//!
//! ## Quick Start
//!
//! ```rust
//! use glhf_proto::{ParsedMessage, Permission};
//!
//! let raw = "@badges=moderator/1;display-name=Mod :mod!mod@mod.tmi.example.tv PRIVMSG #chan :!addcmd hi Hello there";
//! let msg = ParsedMessage::parse(raw).expect("valid line");
//!
//! assert_eq!(msg.permissions, Permission::Moderator);
//! assert_eq!(msg.channel(), Some("#chan"));
//!
//! let cmd = msg.bot_command.expect("bot command");
//! assert_eq!(cmd.name, "addcmd");
//! assert_eq!(cmd.args.as_slice(), &["hi", "Hello", "there"]);
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod command;
pub mod cursor;
pub mod error;
pub mod format;
#[cfg(feature = "tokio")]
pub mod line;
pub mod message;
pub mod outgoing;

pub use self::command::{BotCommand, COMMAND_MARKER};
pub use self::cursor::Cursor;
pub use self::error::{MessageParseError, ProtocolError};
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, DEFAULT_MAX_LINE_LEN};
pub use self::message::tags::unescape_tag_value;
pub use self::message::{CommandPart, ParsedMessage, Permission, Source, Tags};
pub use self::outgoing::Outgoing;

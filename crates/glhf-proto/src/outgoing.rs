//! Lines the bot sends to the server.

use std::fmt::{self, Display, Formatter};

use crate::format::first_line;

/// An owned outgoing line, rendered without CRLF by [`Display`].
///
/// Every interpolated string is cut at its first line break when rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outgoing {
    /// `PASS oauth:...`
    Pass(String),
    /// `NICK name`
    Nick(String),
    /// `CAP REQ :cap1 cap2`
    CapReq(Vec<String>),
    /// `JOIN #channel`
    Join(String),
    /// `PART #channel`
    Part(String),
    /// `PONG :server`
    Pong(String),
    /// `PRIVMSG #channel :text`, optionally threaded as a reply.
    Privmsg {
        /// Target channel.
        channel: String,
        /// Message text.
        text: String,
        /// `id` tag of the message being answered.
        reply_to: Option<String>,
    },
}

impl Outgoing {
    /// Plain channel message.
    pub fn privmsg(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Outgoing::Privmsg {
            channel: channel.into(),
            text: text.into(),
            reply_to: None,
        }
    }

    /// Channel message threaded under the message with id `parent`.
    pub fn reply(
        channel: impl Into<String>,
        text: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Outgoing::Privmsg {
            channel: channel.into(),
            text: text.into(),
            reply_to: Some(parent.into()),
        }
    }

    /// Command word, for logging.
    pub fn command(&self) -> &'static str {
        match self {
            Outgoing::Pass(_) => "PASS",
            Outgoing::Nick(_) => "NICK",
            Outgoing::CapReq(_) => "CAP",
            Outgoing::Join(_) => "JOIN",
            Outgoing::Part(_) => "PART",
            Outgoing::Pong(_) => "PONG",
            Outgoing::Privmsg { .. } => "PRIVMSG",
        }
    }

    /// Render for logs, with credentials masked.
    pub fn redacted(&self) -> String {
        match self {
            Outgoing::Pass(_) => "PASS ********".to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for Outgoing {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outgoing::Pass(token) => write!(f, "PASS {}", first_line(token)),
            Outgoing::Nick(nick) => write!(f, "NICK {}", first_line(nick)),
            Outgoing::CapReq(caps) => {
                f.write_str("CAP REQ :")?;
                for (i, cap) in caps.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    f.write_str(first_line(cap))?;
                }
                Ok(())
            }
            Outgoing::Join(channel) => write!(f, "JOIN {}", first_line(channel)),
            Outgoing::Part(channel) => write!(f, "PART {}", first_line(channel)),
            Outgoing::Pong(server) => write!(f, "PONG :{}", first_line(server)),
            Outgoing::Privmsg {
                channel,
                text,
                reply_to,
            } => {
                if let Some(parent) = reply_to {
                    // Tag values must not contain spaces or separators.
                    if !parent.contains([' ', ';', '\r', '\n']) {
                        write!(f, "@reply-parent-msg-id={} ", parent)?;
                    }
                }
                write!(
                    f,
                    "PRIVMSG {} :{}",
                    first_line(channel),
                    first_line(text)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handshake_lines() {
        assert_eq!(Outgoing::Pass("oauth:abc".into()).to_string(), "PASS oauth:abc");
        assert_eq!(Outgoing::Nick("mybot".into()).to_string(), "NICK mybot");
        assert_eq!(
            Outgoing::CapReq(vec!["twitch.tv/tags".into(), "twitch.tv/commands".into()])
                .to_string(),
            "CAP REQ :twitch.tv/tags twitch.tv/commands"
        );
        assert_eq!(Outgoing::Join("#chan".into()).to_string(), "JOIN #chan");
        assert_eq!(Outgoing::Pong("tmi.example.tv".into()).to_string(), "PONG :tmi.example.tv");
    }

    #[test]
    fn test_privmsg_strips_injected_lines() {
        let msg = Outgoing::privmsg("#chan", "hi\r\nPART #chan");
        assert_eq!(msg.to_string(), "PRIVMSG #chan :hi");
    }

    #[test]
    fn test_reply_tag() {
        let msg = Outgoing::reply("#chan", "pong", "abc-123");
        assert_eq!(
            msg.to_string(),
            "@reply-parent-msg-id=abc-123 PRIVMSG #chan :pong"
        );

        let msg = Outgoing::reply("#chan", "pong", "bad id");
        assert_eq!(msg.to_string(), "PRIVMSG #chan :pong");
    }

    #[test]
    fn test_redacted_masks_token() {
        assert_eq!(Outgoing::Pass("oauth:secret".into()).redacted(), "PASS ********");
        assert_eq!(Outgoing::Part("#c".into()).redacted(), "PART #c");
        assert_eq!(Outgoing::Part("#c".into()).command(), "PART");
    }
}

//! Canonical serialization of parsed messages.

use std::fmt::{self, Display, Formatter};

use super::types::{ParsedMessage, Source};

impl Display for Source<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.nick {
            Some(nick) => write!(f, "{}!{}", nick, self.host),
            None => f.write_str(self.host),
        }
    }
}

impl Display for ParsedMessage<'_> {
    /// Write the message back in canonical wire form, without CRLF.
    ///
    /// Tags are written sorted by key, so the output is stable even though
    /// tag order is not preserved by parsing. Re-parsing the output yields
    /// an equal message (apart from `raw`).
    ///
    /// ```
    /// use glhf_proto::ParsedMessage;
    ///
    /// let msg = ParsedMessage::parse(":nick!nick@host PRIVMSG #chan :hello there").unwrap();
    /// assert_eq!(msg.to_string(), ":nick!nick@host PRIVMSG #chan :hello there");
    /// ```
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(tags) = &self.tags {
            let mut pairs: Vec<_> = tags.iter().collect();
            pairs.sort_unstable();
            f.write_str("@")?;
            for (i, (key, value)) in pairs.iter().enumerate() {
                if i > 0 {
                    f.write_str(";")?;
                }
                write!(f, "{}={}", key, value)?;
            }
            f.write_str(" ")?;
        }
        if let Some(source) = &self.source {
            write!(f, ":{} ", source)?;
        }
        f.write_str(self.command.command)?;
        if let Some(channel) = self.command.channel {
            write!(f, " {}", channel)?;
        }
        if let Some(parameters) = self.parameters {
            write!(f, " :{}", parameters)?;
        }
        Ok(())
    }
}

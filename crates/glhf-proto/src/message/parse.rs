//! Positional line parser.
//!
//! The grammar is walked in a fixed order, each step consuming its segment
//! from a shared [`Cursor`]:
//!
//! ```text
//! [@tags SP] [:source SP] command [SP channel] [SP :parameters]
//! ```

use super::tags::Tags;
use super::types::{CommandPart, ParsedMessage, Source};
use crate::command::BotCommand;
use crate::cursor::Cursor;
use crate::error::MessageParseError;

impl<'a> ParsedMessage<'a> {
    /// Parse one line into a borrowed message.
    ///
    /// A trailing `\r\n` is tolerated and stripped.
    ///
    /// # Example
    ///
    /// ```
    /// use glhf_proto::ParsedMessage;
    ///
    /// let msg = ParsedMessage::parse(":tmi.example.tv 001 mybotname :Welcome, GLHF!").unwrap();
    /// assert_eq!(msg.command_name(), "001");
    /// assert_eq!(msg.channel(), Some("mybotname"));
    /// assert_eq!(msg.parameters, Some("Welcome, GLHF!"));
    /// ```
    #[must_use = "parsing result should be handled"]
    pub fn parse(line: &'a str) -> Result<Self, MessageParseError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let mut cur = Cursor::new(line);

        let tags = parse_tags(&mut cur)?;
        let permissions = tags
            .as_ref()
            .map(Tags::permission)
            .unwrap_or_default();
        let source = parse_source(&mut cur)?;
        let command = parse_command(&mut cur)?;
        let parameters = parse_params(&mut cur);

        let bot_command = match parameters {
            Some(text) => BotCommand::parse(text)?,
            None => None,
        };

        Ok(ParsedMessage {
            tags,
            permissions,
            source,
            command,
            parameters,
            bot_command,
            raw: line,
        })
    }
}

fn tag_entry(entry: &str) -> Result<(&str, &str), MessageParseError> {
    entry
        .split_once('=')
        .ok_or_else(|| MessageParseError::MalformedTags {
            entry: entry.to_owned(),
        })
}

fn parse_tags<'a>(cur: &mut Cursor<'a>) -> Result<Option<Tags<'a>>, MessageParseError> {
    if !cur.match_byte(b'@') {
        return Ok(None);
    }

    let Some(entries) = cur.split_by(b';', b' ') else {
        // Nothing can follow an unterminated tag block, but a bad entry is
        // still the more useful report.
        for entry in cur.remaining().split(';') {
            tag_entry(entry)?;
        }
        return Err(MessageParseError::MissingCommand {
            position: cur.remaining().len() + cur.pos(),
        });
    };

    let mut tags = Tags::with_capacity(entries.len());
    for entry in entries {
        let (key, value) = tag_entry(entry)?;
        tags.insert(key, value);
    }
    Ok(Some(tags))
}

fn parse_source<'a>(cur: &mut Cursor<'a>) -> Result<Option<Source<'a>>, MessageParseError> {
    let position = cur.pos();
    if !cur.match_byte(b':') {
        return Ok(None);
    }
    cur.take_until(b' ')
        .map(|raw| Some(Source::parse(raw)))
        .ok_or(MessageParseError::MalformedSource { position })
}

fn parse_command<'a>(cur: &mut Cursor<'a>) -> Result<CommandPart<'a>, MessageParseError> {
    let position = cur.pos();
    let command = cur
        .take_until(b' ')
        .or_else(|| cur.rest())
        .filter(|command| !command.is_empty())
        .ok_or(MessageParseError::MissingCommand { position })?;

    // A leading ':' means the trailing parameter starts right away.
    let channel = loop {
        if cur.peek_byte(b':') {
            break None;
        }
        match cur.take_until(b' ').or_else(|| cur.rest()) {
            Some("") => continue,
            other => break other,
        }
    };

    Ok(CommandPart { command, channel })
}

/// Trailing text exists only when `:` directly follows the command/channel
/// segment. Anything else after the channel is ignored.
fn parse_params<'a>(cur: &mut Cursor<'a>) -> Option<&'a str> {
    if cur.match_byte(b':') {
        cur.rest()
    } else {
        None
    }
}

//! Tokenizer for `!name arg "quoted arg" arg` chat commands.

use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::error::MessageParseError;

/// Byte that marks chat text as a bot command.
pub const COMMAND_MARKER: u8 = b'!';

/// A `!name args...` invocation borrowed from chat text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotCommand<'a> {
    /// Command name without the marker.
    pub name: &'a str,
    /// Arguments in the order they appeared. Quotes are stripped.
    pub args: SmallVec<[&'a str; 8]>,
    /// Everything after the name and its separating space, untouched.
    pub arg_text: &'a str,
}

enum Token<'a> {
    Quoted(&'a str),
    Bare(&'a str),
}

/// Next argument, trying quoted, then space-delimited, then rest of line.
fn next_token<'a>(cur: &mut Cursor<'a>) -> Option<Token<'a>> {
    if let Some(quoted) = cur.take_delimited(b'"') {
        cur.match_byte(b' ');
        return Some(Token::Quoted(quoted));
    }
    cur.take_until(b' ').or_else(|| cur.rest()).map(Token::Bare)
}

impl<'a> BotCommand<'a> {
    /// Tokenize `text` as a bot command.
    ///
    /// Returns `Ok(None)` when the text does not start with `!` or names no
    /// command. Runs of spaces between arguments do not produce empty
    /// arguments; an explicit `""` does.
    ///
    /// ```
    /// use glhf_proto::BotCommand;
    ///
    /// let cmd = BotCommand::parse("!mycommand arg1 \"arg2 with spaces\" arg3").unwrap().unwrap();
    /// assert_eq!(cmd.name, "mycommand");
    /// assert_eq!(cmd.args.as_slice(), &["arg1", "arg2 with spaces", "arg3"]);
    ///
    /// assert!(BotCommand::parse("just chatting").unwrap().is_none());
    /// ```
    pub fn parse(text: &'a str) -> Result<Option<Self>, MessageParseError> {
        let mut cur = Cursor::new(text);
        if !cur.match_byte(COMMAND_MARKER) {
            return Ok(None);
        }

        let name = match cur.take_until(b' ').or_else(|| cur.rest()) {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(None),
        };
        let arg_text = cur.remaining();

        let mut args = SmallVec::new();
        loop {
            let position = cur.pos();
            let Some(token) = next_token(&mut cur) else {
                break;
            };
            if cur.pos() == position {
                return Err(MessageParseError::TokenizationInconsistency { position });
            }
            match token {
                Token::Quoted(arg) => args.push(arg),
                Token::Bare("") => {}
                Token::Bare(arg) => args.push(arg),
            }
        }

        Ok(Some(BotCommand {
            name,
            args,
            arg_text,
        }))
    }

    /// Get a specific argument by index.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.get(index).copied()
    }

    /// Check the name, ignoring ASCII case.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

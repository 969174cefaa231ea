//! Error types for the chat protocol library.
//!
//! [`MessageParseError`] covers a single line that could not be parsed.
//! [`ProtocolError`] covers the transport side: framing, UTF-8 and control
//! characters seen by the line codec.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Extract the command name from raw line bytes (for error reporting).
///
/// Skips an optional `@tags` block and `:source` prefix, then returns the
/// run of ASCII alphanumerics that follows. Works on bytes so it can be
/// used when the line is not valid UTF-8.
#[cfg_attr(not(feature = "tokio"), allow(dead_code))]
pub(crate) fn extract_command_hint(raw_line: &[u8]) -> Option<String> {
    let mut pos = 0;

    for marker in [b'@', b':'] {
        if raw_line.get(pos) == Some(&marker) {
            while pos < raw_line.len() && raw_line[pos] != b' ' {
                pos += 1;
            }
            if raw_line.get(pos) == Some(&b' ') {
                pos += 1;
            }
        }
    }

    let start = pos;
    while pos < raw_line.len() && raw_line[pos].is_ascii_alphanumeric() {
        pos += 1;
    }

    if pos > start {
        String::from_utf8(raw_line[start..pos].to_vec()).ok()
    } else {
        None
    }
}

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a received line.
    #[error("invalid UTF-8 in message at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// The raw line as bytes.
        raw_line: Vec<u8>,
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the UTF-8 decoder.
        details: String,
        /// Command name recovered from the raw bytes, if any.
        command_hint: Option<String>,
    },

    /// Line exceeded the configured maximum length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// A line was framed correctly but could not be parsed.
    #[error("invalid message: {string}")]
    InvalidMessage {
        /// The offending line.
        string: String,
        /// The underlying parse error.
        #[source]
        cause: MessageParseError,
    },
}

/// Reasons a single line was rejected by the parser.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MessageParseError {
    /// A tag entry inside the `@...` block has no `=`.
    #[error("malformed tag entry: {entry:?}")]
    MalformedTags {
        /// The entry as it appeared on the wire.
        entry: String,
    },

    /// A `:source` prefix is not followed by a space and command.
    #[error("malformed source prefix at position {position}")]
    MalformedSource {
        /// Byte offset of the `:` that opened the prefix.
        position: usize,
    },

    /// No command token could be extracted.
    #[error("missing command at position {position}")]
    MissingCommand {
        /// Byte offset where the command was expected.
        position: usize,
    },

    /// The command tokenizer failed to make progress.
    #[error("command tokenizer stalled at position {position}")]
    TokenizationInconsistency {
        /// Byte offset into the tokenized text.
        position: usize,
    },
}

impl MessageParseError {
    /// Short static label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedTags { .. } => "malformed_tags",
            Self::MalformedSource { .. } => "malformed_source",
            Self::MissingCommand { .. } => "missing_command",
            Self::TokenizationInconsistency { .. } => "tokenization_inconsistency",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::MessageTooLong {
            actual: 9000,
            limit: 8192,
        };
        assert_eq!(
            format!("{}", err),
            "message too long: 9000 bytes (limit: 8192)"
        );

        let err = MessageParseError::MalformedTags {
            entry: "badgesonly".to_string(),
        };
        assert_eq!(format!("{}", err), "malformed tag entry: \"badgesonly\"");
    }

    #[test]
    fn test_protocol_error_chaining() {
        let parse_err = MessageParseError::MissingCommand { position: 0 };
        let protocol_err = ProtocolError::InvalidMessage {
            string: "".to_string(),
            cause: parse_err.clone(),
        };

        let source = std::error::Error::source(&protocol_err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), parse_err.to_string());
    }

    #[test]
    fn test_error_conversion() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let protocol_err: ProtocolError = io_err.into();
        assert!(matches!(protocol_err, ProtocolError::Io(_)));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(
            MessageParseError::MalformedSource { position: 3 }.kind(),
            "malformed_source"
        );
        assert_eq!(
            MessageParseError::TokenizationInconsistency { position: 1 }.kind(),
            "tokenization_inconsistency"
        );
    }

    #[test]
    fn test_extract_command_hint() {
        assert_eq!(
            extract_command_hint(b"PRIVMSG #test hi"),
            Some("PRIVMSG".to_string())
        );
        assert_eq!(
            extract_command_hint(b"@badges=x :nick!nick@host PRIVMSG #test :\xff"),
            Some("PRIVMSG".to_string())
        );
        assert_eq!(extract_command_hint(b":server.only"), None);
    }
}

//! Line-based codec for tokio.
//!
//! Frames a byte stream into lines on `\n`, strips the terminator, and
//! validates each line before it reaches the parser.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error;
use crate::outgoing::Outgoing;

/// Default line limit. Twitch lines carry long tag blocks, so this is well
/// above the classic 512 bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 8192;

/// Line-based codec that handles `\r\n`-terminated messages.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length, terminator included
    max_len: usize,
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl LineCodec {
    /// Create a codec with [`DEFAULT_MAX_LINE_LEN`].
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Create a codec with a custom maximum line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    fn validate_line(s: &str) -> error::Result<()> {
        for ch in s.chars() {
            if crate::format::is_illegal_control_char(ch) {
                return Err(error::ProtocolError::IllegalControlChar(ch));
            }
        }
        Ok(())
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let mut data = String::from_utf8(line.to_vec()).map_err(|e| {
                error::ProtocolError::InvalidUtf8 {
                    byte_pos: e.utf8_error().valid_up_to(),
                    details: e.utf8_error().to_string(),
                    command_hint: error::extract_command_hint(&line),
                    raw_line: e.into_bytes(),
                }
            })?;

            let trimmed = data.trim_end_matches(['\r', '\n']).len();
            data.truncate(trimmed);

            Self::validate_line(&data)?;

            Ok(Some(data))
        } else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();

            if src.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(msg.len() + 2);
        dst.extend_from_slice(msg.as_bytes());
        if !msg.ends_with("\r\n") {
            dst.extend_from_slice(b"\r\n");
        }
        Ok(())
    }
}

impl Encoder<Outgoing> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: Outgoing, dst: &mut BytesMut) -> error::Result<()> {
        Encoder::<String>::encode(self, msg.to_string(), dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_complete_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :tmi.example.tv\r\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some("PING :tmi.example.tv".to_string()));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_partial_line() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PING :");

        assert_eq!(codec.decode(&mut buf).unwrap(), None);

        buf.extend_from_slice(b"tmi\r\nPRIVMSG #c :x\r\n");
        assert_eq!(codec.decode(&mut buf).unwrap(), Some("PING :tmi".to_string()));
        assert_eq!(
            codec.decode(&mut buf).unwrap(),
            Some("PRIVMSG #c :x".to_string())
        );
        assert_eq!(codec.decode(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_decode_too_long() {
        let mut codec = LineCodec::with_max_len(10);
        let mut buf = BytesMut::from("this is way too long\n");

        let result = codec.decode(&mut buf);
        assert!(matches!(
            result,
            Err(error::ProtocolError::MessageTooLong { .. })
        ));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from(&b"PRIVMSG #c :\xff\xfe\r\n"[..]);

        match codec.decode(&mut buf) {
            Err(error::ProtocolError::InvalidUtf8 {
                byte_pos,
                command_hint,
                ..
            }) => {
                assert_eq!(byte_pos, 12);
                assert_eq!(command_hint.as_deref(), Some("PRIVMSG"));
            }
            other => panic!("expected InvalidUtf8, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_bell() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::from("PRIVMSG #c :ding\x07\r\n");
        assert!(matches!(
            codec.decode(&mut buf),
            Err(error::ProtocolError::IllegalControlChar('\x07'))
        ));
    }

    #[test]
    fn test_encode() {
        let mut codec = LineCodec::new();
        let mut buf = BytesMut::new();

        codec.encode("PONG :tmi".to_string(), &mut buf).unwrap();
        codec
            .encode(Outgoing::privmsg("#c", "hello"), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"PONG :tmi\r\nPRIVMSG #c :hello\r\n");
    }
}

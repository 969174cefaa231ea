//! Character classes that matter on the wire.

/// Formatting codes that may appear inside chat text: CTCP delimiter (0x01,
/// used by `/me`), bold, colour, reset, monospace, reverse, italic,
/// strikethrough, underline.
#[inline]
pub fn is_format_code(ch: char) -> bool {
    matches!(
        ch,
        '\x01' | '\x02' | '\x03' | '\x0F' | '\x11' | '\x16' | '\x1D' | '\x1E' | '\x1F'
    )
}

/// Check whether a character must never appear in a received line.
///
/// CR and LF are allowed as line delimiters, NUL and formatting codes are
/// allowed inside text. BEL and every other control character are illegal.
///
/// ```
/// use glhf_proto::format::is_illegal_control_char;
///
/// assert!(is_illegal_control_char('\x07'));
/// assert!(!is_illegal_control_char('\x01'));
/// assert!(!is_illegal_control_char('\r'));
/// assert!(!is_illegal_control_char('a'));
/// ```
#[inline]
pub fn is_illegal_control_char(ch: char) -> bool {
    if ch == '\x07' {
        return true;
    }
    ch.is_control() && ch != '\r' && ch != '\n' && ch != '\0' && !is_format_code(ch)
}

/// Cut `text` at its first line break.
///
/// Used for anything interpolated into an outgoing line, so user-supplied
/// text cannot smuggle in a second command.
pub fn first_line(text: &str) -> &str {
    match text.find(['\r', '\n']) {
        Some(pos) => &text[..pos],
        None => text,
    }
}

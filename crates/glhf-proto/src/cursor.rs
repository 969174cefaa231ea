//! Forward-only byte cursor used by the message and command parsers.
//!
//! All delimiters handed to the cursor are ASCII, so every slice it returns
//! starts and ends on a UTF-8 character boundary of the input.
//!
//! A failed match never moves the cursor, with two documented exceptions:
//! [`Cursor::take_delimited`] on an unterminated run and [`Cursor::rest`]
//! both leave the cursor at end of input. Parsers lean on this to try
//! alternative productions in order.

use smallvec::SmallVec;

/// Segments produced by [`Cursor::split_by`].
pub type Segments<'a> = SmallVec<[&'a str; 16]>;

/// A scanning position into a borrowed line of text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor at the start of `input`.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// True once every byte has been consumed.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The unconsumed tail, without advancing.
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    #[inline]
    fn current(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Consume `b` if it is the current byte.
    #[inline]
    pub fn match_byte(&mut self, b: u8) -> bool {
        debug_assert!(b.is_ascii());
        if self.peek_byte(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Test the current byte against `b` without consuming it.
    #[inline]
    pub fn peek_byte(&self, b: u8) -> bool {
        self.current() == Some(b)
    }

    /// Take everything before the next `b` and consume `b` itself.
    ///
    /// Returns `None` without moving when `b` does not occur in the rest of
    /// the input, or when the cursor is already at the end.
    pub fn take_until(&mut self, b: u8) -> Option<&'a str> {
        debug_assert!(b.is_ascii());
        if self.is_at_end() {
            return None;
        }
        let start = self.pos;
        let offset = self.input.as_bytes()[start..].iter().position(|&c| c == b)?;
        let end = start + offset;
        self.pos = end + 1;
        Some(&self.input[start..end])
    }

    /// Take a run enclosed by `b` on both sides, e.g. `"quoted text"`.
    ///
    /// The opener must be the current byte, otherwise nothing is consumed.
    /// An unterminated run yields everything up to end of input.
    pub fn take_delimited(&mut self, b: u8) -> Option<&'a str> {
        if !self.match_byte(b) {
            return None;
        }
        match self.take_until(b) {
            Some(inner) => Some(inner),
            None => {
                let inner = self.remaining();
                self.pos = self.input.len();
                Some(inner)
            }
        }
    }

    /// Split the text before the next `terminator` on `separator`.
    ///
    /// The terminator is consumed. The separator is never searched for past
    /// the terminator, so a trailing segment cannot swallow later text.
    /// Returns `None` without moving when no terminator is found, rather
    /// than an empty list. The final segment is always kept, so `a=1;`
    /// yields `["a=1", ""]`.
    pub fn split_by(&mut self, separator: u8, terminator: u8) -> Option<Segments<'a>> {
        let region = self.take_until(terminator)?;
        let mut inner = Cursor::new(region);
        let mut segments = Segments::new();

        while let Some(segment) = inner.take_until(separator) {
            segments.push(segment);
        }
        // The final segment is whatever follows the last separator, even if
        // that is empty (`a=1;`) or the whole region has no separator at all.
        segments.push(inner.remaining());

        Some(segments)
    }

    /// Take everything that is left.
    ///
    /// Returns `None` when nothing is left.
    pub fn rest(&mut self) -> Option<&'a str> {
        if self.is_at_end() {
            return None;
        }
        let tail = self.remaining();
        self.pos = self.input.len();
        Some(tail)
    }
}

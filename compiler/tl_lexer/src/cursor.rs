//! Byte cursor over the source.
//!
//! Reading past the end yields `0`, which acts as a sentinel: every scanning
//! loop stops on it without an explicit bounds check. A `0` byte inside the
//! source is told apart from the end by comparing the position with the
//! source length.

/// Cursor over source bytes.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Cursor {
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> u32 {
        u32::try_from(self.pos).unwrap_or(u32::MAX)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Byte at the cursor, `0` at end of input.
    #[inline]
    pub fn current(&self) -> u8 {
        self.peek(0)
    }

    /// Byte `n` positions ahead, `0` past the end.
    #[inline]
    pub fn peek(&self, n: usize) -> u8 {
        self.bytes.get(self.pos + n).copied().unwrap_or(0)
    }

    #[inline]
    pub fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    #[inline]
    pub fn advance_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    /// Advance while `pred` holds for the current byte.
    #[inline]
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while !self.is_eof() && pred(self.current()) {
            self.pos += 1;
        }
    }

    /// Advance to the next `\n` (not consumed) or end of input.
    #[inline]
    pub fn eat_until_newline_or_eof(&mut self) {
        self.eat_while(|b| b != b'\n');
    }

    /// Advance past a UTF-8 encoded character starting at the cursor.
    pub fn advance_char(&mut self) {
        let width = match self.current() {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        self.advance_n(width);
    }
}

//! Hand-written scanner producing one [`Token`] at a time.
//!
//! Main dispatch is a single `match` on the current byte; each arm calls a
//! focused method that advances the cursor. Error conditions are encoded as
//! token kinds, never as `Result::Err`.

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Scanner over a Teal source string.
pub struct Scanner<'a> {
    source: &'a str,
    cursor: Cursor<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            source,
            cursor: Cursor::new(source),
        }
    }

    /// Produce the next token, trivia included.
    ///
    /// Returns `Eof` (zero length) once the source is exhausted, and keeps
    /// returning it on subsequent calls.
    pub fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();
        if self.cursor.is_eof() {
            return Token::new(TokenKind::Eof, start, start);
        }
        let kind = match self.cursor.current() {
            b' ' | b'\t' | b'\r' | 0x0B | 0x0C => self.whitespace(),
            b'\n' => self.single(TokenKind::Newline),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.name(start),
            b'0'..=b'9' => self.number(),
            b'"' | b'\'' => self.short_string(),
            b'-' => self.minus_or_comment(),
            b'[' => self.bracket_or_long_string(),
            b'.' => self.dot(),
            b'+' => self.single(TokenKind::Plus),
            b'*' => self.single(TokenKind::Star),
            b'/' => self.pair(b'/', TokenKind::DoubleSlash, TokenKind::Slash),
            b'%' => self.single(TokenKind::Percent),
            b'^' => self.single(TokenKind::Caret),
            b'#' => self.single(TokenKind::Hash),
            b'&' => self.single(TokenKind::Ampersand),
            b'~' => self.pair(b'=', TokenKind::NotEq, TokenKind::Tilde),
            b'|' => self.single(TokenKind::Pipe),
            b'<' => self.less(),
            b'>' => self.greater(),
            b'=' => self.pair(b'=', TokenKind::EqEq, TokenKind::Assign),
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b'{' => self.single(TokenKind::LBrace),
            b'}' => self.single(TokenKind::RBrace),
            b']' => self.single(TokenKind::RBracket),
            b':' => self.pair(b':', TokenKind::DoubleColon, TokenKind::Colon),
            b';' => self.single(TokenKind::Semicolon),
            b',' => self.single(TokenKind::Comma),
            b'?' => self.single(TokenKind::Question),
            _ => {
                self.cursor.advance_char();
                TokenKind::Unknown
            }
        };
        Token::new(kind, start, self.cursor.pos())
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }

    /// One byte, or two when the next byte is `second`.
    fn pair(&mut self, second: u8, double: TokenKind, single: TokenKind) -> TokenKind {
        self.cursor.advance();
        if self.cursor.current() == second {
            self.cursor.advance();
            double
        } else {
            single
        }
    }

    fn whitespace(&mut self) -> TokenKind {
        self.cursor
            .eat_while(|b| matches!(b, b' ' | b'\t' | b'\r' | 0x0B | 0x0C));
        TokenKind::Whitespace
    }

    fn name(&mut self, start: u32) -> TokenKind {
        self.cursor
            .eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let text = &self.source[start as usize..self.cursor.pos() as usize];
        TokenKind::keyword(text).unwrap_or(TokenKind::Name)
    }

    fn number(&mut self) -> TokenKind {
        let hex = self.cursor.current() == b'0' && matches!(self.cursor.peek(1), b'x' | b'X');
        if hex {
            self.cursor.advance_n(2);
        }
        let exponent: &[u8] = if hex { b"pP" } else { b"eE" };
        loop {
            let b = self.cursor.current();
            if exponent.contains(&b) && matches!(self.cursor.peek(1), b'+' | b'-') {
                self.cursor.advance_n(2);
            } else if b.is_ascii_alphanumeric() || b == b'_' {
                self.cursor.advance();
            } else if b == b'.' && self.cursor.peek(1) != b'.' {
                self.cursor.advance();
            } else {
                return TokenKind::Number;
            }
        }
    }

    fn short_string(&mut self) -> TokenKind {
        let quote = self.cursor.current();
        self.cursor.advance();
        loop {
            if self.cursor.is_eof() {
                return TokenKind::UnterminatedString;
            }
            match self.cursor.current() {
                b'\\' => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                b'\n' => return TokenKind::UnterminatedString,
                b if b == quote => {
                    self.cursor.advance();
                    return TokenKind::String;
                }
                _ => self.cursor.advance(),
            }
        }
    }

    fn minus_or_comment(&mut self) -> TokenKind {
        if self.cursor.peek(1) != b'-' {
            return self.single(TokenKind::Minus);
        }
        self.cursor.advance_n(2);
        if let Some(level) = self.long_bracket_level() {
            self.long_bracket_body(level);
        } else {
            self.cursor.eat_until_newline_or_eof();
        }
        TokenKind::Comment
    }

    fn bracket_or_long_string(&mut self) -> TokenKind {
        match self.long_bracket_level() {
            Some(level) => {
                if self.long_bracket_body(level) {
                    TokenKind::String
                } else {
                    TokenKind::UnterminatedString
                }
            }
            None => self.single(TokenKind::LBracket),
        }
    }

    /// If the cursor is at a long bracket opener (`[`, `=`*, `[`), consume it
    /// and return its level.
    fn long_bracket_level(&mut self) -> Option<usize> {
        if self.cursor.current() != b'[' {
            return None;
        }
        let mut level = 0;
        while self.cursor.peek(1 + level) == b'=' {
            level += 1;
        }
        if self.cursor.peek(1 + level) != b'[' {
            return None;
        }
        self.cursor.advance_n(level + 2);
        Some(level)
    }

    /// Consume up to and including the closing bracket of the given level.
    /// Returns `false` when the input ends first.
    fn long_bracket_body(&mut self, level: usize) -> bool {
        loop {
            if self.cursor.is_eof() {
                return false;
            }
            if self.cursor.current() == b']' {
                let closes = (1..=level).all(|i| self.cursor.peek(i) == b'=')
                    && self.cursor.peek(level + 1) == b']';
                if closes {
                    self.cursor.advance_n(level + 2);
                    return true;
                }
            }
            self.cursor.advance();
        }
    }

    fn dot(&mut self) -> TokenKind {
        if self.cursor.peek(1).is_ascii_digit() {
            return self.number();
        }
        self.cursor.advance();
        if self.cursor.current() != b'.' {
            return TokenKind::Dot;
        }
        self.cursor.advance();
        if self.cursor.current() == b'.' {
            self.cursor.advance();
            return TokenKind::Ellipsis;
        }
        TokenKind::DotDot
    }

    fn less(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.current() {
            b'=' => self.single(TokenKind::LessEq),
            b'<' => self.single(TokenKind::ShiftLeft),
            _ => TokenKind::Less,
        }
    }

    fn greater(&mut self) -> TokenKind {
        self.cursor.advance();
        match self.cursor.current() {
            b'=' => self.single(TokenKind::GreaterEq),
            b'>' => self.single(TokenKind::ShiftRight),
            _ => TokenKind::Greater,
        }
    }
}

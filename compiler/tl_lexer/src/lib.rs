//! Hand-written tokenizer for Teal.
//!
//! The scanner never fails: malformed input is reported through
//! [`TokenKind::Unknown`] and [`TokenKind::UnterminatedString`] tokens so the
//! parser can turn it into `ERROR` nodes.
//!
//! Teal's contextual keywords (`record`, `enum`, `interface`, `type`,
//! `global`, `as`, `is`, `where`) are lexed as [`TokenKind::Name`]; the
//! parser recognizes them by text.

mod cursor;
mod scanner;
mod token;

pub use cursor::Cursor;
pub use scanner::Scanner;
pub use token::{Token, TokenKind};

/// Tokenize `source`, dropping trivia (whitespace, newlines, comments).
///
/// The returned list always ends with a single [`TokenKind::Eof`] token
/// positioned at the end of the source.
pub fn lex(source: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::with_capacity(source.len() / 4 + 1);
    loop {
        let token = scanner.next_token();
        if token.kind.is_trivia() {
            continue;
        }
        let eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if eof {
            return tokens;
        }
    }
}

//! Error recovery for the parser.
//!
//! Provides token sets and synchronization for continuing parsing after errors.
//! Uses bitset-based O(1) membership testing.

use tl_lexer::TokenKind;

/// A set of token kinds using bitset representation for O(1) membership testing.
///
/// Each bit in the u128 corresponds to a `TokenKind` discriminant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSet(u128);

impl TokenSet {
    /// Create an empty token set.
    #[inline]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a token kind to this set (builder pattern for const contexts).
    #[inline]
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> Self {
        Self(self.0 | (1u128 << kind as u8))
    }

    /// Union of two token sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn contains(&self, kind: TokenKind) -> bool {
        (self.0 & (1u128 << kind as u8)) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokens that begin a statement. Contextual keywords (`global`, `record`, ...)
/// are plain names and covered by `Name`.
pub const STMT_START: TokenSet = TokenSet::new()
    .with(TokenKind::Local)
    .with(TokenKind::Function)
    .with(TokenKind::If)
    .with(TokenKind::While)
    .with(TokenKind::Repeat)
    .with(TokenKind::For)
    .with(TokenKind::Do)
    .with(TokenKind::Return)
    .with(TokenKind::Break)
    .with(TokenKind::Goto)
    .with(TokenKind::DoubleColon)
    .with(TokenKind::Semicolon)
    .with(TokenKind::Name)
    .with(TokenKind::LParen);

/// Tokens that close a block.
pub const BLOCK_END: TokenSet = TokenSet::new()
    .with(TokenKind::End)
    .with(TokenKind::Else)
    .with(TokenKind::Elseif)
    .with(TokenKind::Until)
    .with(TokenKind::Eof);

/// Where to resume after a malformed statement.
pub const STMT_RECOVERY: TokenSet = STMT_START.union(BLOCK_END);

/// Tokens that can begin an expression.
pub const EXPR_START: TokenSet = TokenSet::new()
    .with(TokenKind::Nil)
    .with(TokenKind::True)
    .with(TokenKind::False)
    .with(TokenKind::Number)
    .with(TokenKind::String)
    .with(TokenKind::UnterminatedString)
    .with(TokenKind::Ellipsis)
    .with(TokenKind::Function)
    .with(TokenKind::LBrace)
    .with(TokenKind::Name)
    .with(TokenKind::LParen)
    .with(TokenKind::Not)
    .with(TokenKind::Hash)
    .with(TokenKind::Minus)
    .with(TokenKind::Tilde);

//! Parser state and token navigation.
//!
//! The grammar lives in `grammar/`; this module owns the token stream, the
//! tree builder, and the top-level loop that reuses statements from a
//! previous tree when one is available.

use tl_ir::Span;
use tl_lexer::{Token, TokenKind};
use tracing::trace;

use crate::builder::{Checkpoint, TreeBuilder};
use crate::incremental::{IncrementalState, IncrementalStats, TreeCopier};
use crate::kind::{Field, SyntaxKind};
use crate::recovery::{BLOCK_END, STMT_RECOVERY};
use crate::tree::Tree;

pub(crate) struct Parser<'src, 'old> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    eof: Token,
    pub(crate) builder: TreeBuilder,
    reuse: Option<IncrementalState<'old>>,
}

impl<'src, 'old> Parser<'src, 'old> {
    pub(crate) fn new(source: &'src str, reuse: Option<IncrementalState<'old>>) -> Self {
        let tokens = tl_lexer::lex(source);
        let len = u32::try_from(source.len()).unwrap_or(u32::MAX);
        Parser {
            source,
            tokens,
            pos: 0,
            eof: Token::new(TokenKind::Eof, len, len),
            builder: TreeBuilder::new(SyntaxKind::Program),
            reuse,
        }
    }

    pub(crate) fn parse_program(mut self) -> (Tree, IncrementalStats) {
        while !self.at(TokenKind::Eof) {
            if self.try_reuse() {
                continue;
            }
            if let Some(state) = self.reuse.as_mut() {
                state.stats.reparsed_count += 1;
            }
            if BLOCK_END.contains(self.kind()) {
                self.error_statement();
            } else {
                self.statement();
            }
        }
        let stats = self.reuse.map(|state| state.stats).unwrap_or_default();
        (self.builder.finish(self.source), stats)
    }

    /// Copy the old statement starting at the current token, if its tokens
    /// and the token following it are unchanged.
    fn try_reuse(&mut self) -> bool {
        let pos = self.current().start;
        let Some(state) = self.reuse.as_mut() else {
            return false;
        };
        let Some(old) = state.cursor.find_at(pos) else {
            return false;
        };
        let delta = i64::from(pos) - i64::from(old.start());
        let mut index = self.pos;
        for leaf in old.descendants().filter(|node| node.is_leaf()) {
            let Some(&token) = self.tokens.get(index) else {
                return false;
            };
            let shifted = Span::new(shift(leaf.start(), delta), shift(leaf.end(), delta));
            if Some(token.kind) != leaf.token()
                || Span::new(token.start, token.end) != shifted
                || token.text(self.source) != leaf.text()
            {
                return false;
            }
            index += 1;
        }
        let next = self.tokens.get(index).copied().unwrap_or(self.eof);
        let lookahead_matches = match state.cursor.next_leaf_after(old) {
            Some(leaf) => Some(next.kind) == leaf.token() && next.text(self.source) == leaf.text(),
            None => next.kind == TokenKind::Eof,
        };
        if !lookahead_matches {
            return false;
        }

        trace!(span = %old.span(), delta, "reusing statement");
        TreeCopier::new(delta).copy(old, &mut self.builder);
        state.cursor.advance();
        state.stats.reused_count += 1;
        self.pos = index;
        true
    }

    // Token access

    #[inline]
    pub(crate) fn current(&self) -> Token {
        self.nth(0)
    }

    #[inline]
    pub(crate) fn nth(&self, n: usize) -> Token {
        self.tokens.get(self.pos + n).copied().unwrap_or(self.eof)
    }

    #[inline]
    pub(crate) fn kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub(crate) fn nth_kind(&self, n: usize) -> TokenKind {
        self.nth(n).kind
    }

    #[inline]
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    /// Whether the token `n` ahead is the contextual keyword `word`.
    pub(crate) fn nth_is_word(&self, n: usize, word: &str) -> bool {
        let token = self.nth(n);
        token.kind == TokenKind::Name && token.text(self.source) == word
    }

    #[inline]
    pub(crate) fn at_word(&self, word: &str) -> bool {
        self.nth_is_word(0, word)
    }

    // Consumption

    pub(crate) fn bump(&mut self) {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            return;
        }
        self.builder.token(token);
        self.pos += 1;
    }

    /// Consume a keyword, or a name used as a contextual keyword, as an
    /// anonymous leaf.
    pub(crate) fn bump_word(&mut self) {
        let token = self.current();
        match token.kind {
            TokenKind::Eof => {}
            TokenKind::Name => {
                self.builder.leaf(token, SyntaxKind::Token(TokenKind::Name));
                self.pos += 1;
            }
            _ => self.bump(),
        }
    }

    pub(crate) fn bump_field(&mut self, field: Field) {
        if self.at(TokenKind::Eof) {
            return;
        }
        self.bump();
        self.builder.tag_last(field);
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.error_here(&format!("expected {}", kind.describe()));
        false
    }

    /// Consume a name, giving it `field`.
    pub(crate) fn expect_name(&mut self, field: Field) -> bool {
        if self.at(TokenKind::Name) {
            self.bump_field(field);
            return true;
        }
        self.error_here("expected name");
        false
    }

    /// Consume a `>`, splitting a `>>` token when generic argument lists nest.
    pub(crate) fn expect_closing_angle(&mut self) -> bool {
        let token = self.current();
        match token.kind {
            TokenKind::Greater => {
                self.bump();
                true
            }
            TokenKind::ShiftRight | TokenKind::GreaterEq => {
                let rest = if token.kind == TokenKind::ShiftRight {
                    TokenKind::Greater
                } else {
                    TokenKind::Assign
                };
                self.builder
                    .token(Token::new(TokenKind::Greater, token.start, token.start + 1));
                self.tokens[self.pos] = Token::new(rest, token.start + 1, token.end);
                true
            }
            _ => {
                self.error_here("expected '>'");
                false
            }
        }
    }

    pub(crate) fn error_here(&mut self, message: &str) {
        let token = self.current();
        self.builder.error(
            Span::new(token.start, token.end),
            format!("{message}, found {}", token.kind.describe()),
        );
    }

    /// Wrap the current token and everything up to the next statement
    /// boundary in an `ERROR` node. Always consumes at least one token.
    pub(crate) fn error_statement(&mut self) {
        self.error_here("unexpected token");
        self.start(SyntaxKind::Error);
        self.bump();
        while !STMT_RECOVERY.contains(self.kind()) {
            self.bump();
        }
        self.finish();
    }

    // Node construction

    #[inline]
    pub(crate) fn start(&mut self, kind: SyntaxKind) {
        let at = self.current().start;
        self.builder.start_node(kind, at);
    }

    #[inline]
    pub(crate) fn finish(&mut self) {
        self.builder.finish_node();
    }

    #[inline]
    pub(crate) fn checkpoint(&self) -> Checkpoint {
        self.builder.checkpoint()
    }

    /// Start a node around everything added since `checkpoint`.
    #[inline]
    pub(crate) fn wrap(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        let at = self.current().start;
        self.builder.start_node_at(checkpoint, kind, at);
    }

    #[inline]
    pub(crate) fn tag_since(&mut self, checkpoint: Checkpoint, field: Field) {
        self.builder.tag_since(checkpoint, field);
    }
}

fn shift(pos: u32, delta: i64) -> u32 {
    u32::try_from(i64::from(pos) + delta).unwrap_or(0)
}

//! Expressions.
//!
//! Binary operators use precedence climbing with Teal's priorities: `or` 1,
//! `and` 2, comparisons and `is` 3, `|` 4, `~` 5, `&` 6, shifts 7, `..` 8
//! (right), `+ -` 9, `* / // %` 10, unary 11, `^` 12 (right), `as` 50.

use tl_lexer::TokenKind;

use crate::builder::Checkpoint;
use crate::kind::{Field, SyntaxKind};
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;

const UNARY_PRIORITY: u8 = 11;

#[derive(Copy, Clone)]
enum Infix {
    Binary,
    Cast,
    Is,
}

impl Parser<'_, '_> {
    /// Parse an expression. Returns `false` (consuming nothing) when the
    /// current token cannot start one.
    pub(crate) fn expression(&mut self) -> bool {
        self.expression_bp(0)
    }

    fn expression_bp(&mut self, limit: u8) -> bool {
        ensure_sufficient_stack(|| self.expression_bp_inner(limit))
    }

    fn expression_bp_inner(&mut self, limit: u8) -> bool {
        let cp = self.checkpoint();
        if matches!(
            self.kind(),
            TokenKind::Not | TokenKind::Hash | TokenKind::Minus | TokenKind::Tilde
        ) {
            self.start(SyntaxKind::UnaryOp);
            self.bump_field(Field::Operator);
            let operand = self.checkpoint();
            if !self.expression_bp(UNARY_PRIORITY) {
                self.error_here("expected expression");
            }
            self.tag_since(operand, Field::Operand);
            self.finish();
        } else if !self.simple_expression() {
            self.error_here("expected expression");
            return false;
        }

        while let Some((priority, right_assoc, infix)) = self.infix_operator() {
            if priority <= limit {
                break;
            }
            let kind = match infix {
                Infix::Binary => SyntaxKind::BinaryOp,
                Infix::Cast => SyntaxKind::CastExpression,
                Infix::Is => SyntaxKind::IsExpression,
            };
            self.wrap(cp, kind);
            self.builder.tag_last(Field::Left);
            self.bump_word();
            self.builder.tag_last(Field::Operator);
            let rhs = self.checkpoint();
            match infix {
                Infix::Binary => {
                    let next = if right_assoc { priority - 1 } else { priority };
                    self.expression_bp(next);
                    self.tag_since(rhs, Field::Right);
                }
                Infix::Cast | Infix::Is => {
                    self.type_expr();
                    self.tag_since(rhs, Field::Type);
                }
            }
            self.finish();
        }
        true
    }

    /// Priority, right associativity and shape of the operator at the cursor.
    fn infix_operator(&self) -> Option<(u8, bool, Infix)> {
        let priority = match self.kind() {
            TokenKind::Or => 1,
            TokenKind::And => 2,
            TokenKind::Less
            | TokenKind::Greater
            | TokenKind::LessEq
            | TokenKind::GreaterEq
            | TokenKind::NotEq
            | TokenKind::EqEq => 3,
            TokenKind::Pipe => 4,
            TokenKind::Tilde => 5,
            TokenKind::Ampersand => 6,
            TokenKind::ShiftLeft | TokenKind::ShiftRight => 7,
            TokenKind::DotDot => return Some((8, true, Infix::Binary)),
            TokenKind::Plus | TokenKind::Minus => 9,
            TokenKind::Star | TokenKind::Slash | TokenKind::DoubleSlash | TokenKind::Percent => 10,
            TokenKind::Caret => return Some((12, true, Infix::Binary)),
            TokenKind::Name if self.at_word("as") => return Some((50, false, Infix::Cast)),
            TokenKind::Name if self.at_word("is") => return Some((3, false, Infix::Is)),
            _ => return None,
        };
        Some((priority, false, Infix::Binary))
    }

    fn simple_expression(&mut self) -> bool {
        match self.kind() {
            TokenKind::Nil
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Number
            | TokenKind::String
            | TokenKind::Ellipsis => self.bump(),
            TokenKind::UnterminatedString => {
                self.error_here("unfinished string");
                self.bump();
            }
            TokenKind::LBrace => self.table_constructor(),
            TokenKind::Function => {
                self.start(SyntaxKind::AnonFunction);
                self.bump();
                self.function_body();
                self.finish();
            }
            TokenKind::Name | TokenKind::LParen => self.suffixed_expression(),
            _ => return false,
        }
        true
    }

    /// A name or parenthesized expression followed by any number of field
    /// accesses, index operations and calls.
    pub(crate) fn suffixed_expression(&mut self) {
        let cp = self.checkpoint();
        match self.kind() {
            TokenKind::Name => self.bump(),
            TokenKind::LParen => {
                self.start(SyntaxKind::ParenthesizedExpression);
                self.bump();
                if !self.expression() {
                    self.builder.mark_error();
                }
                self.expect(TokenKind::RParen);
                self.finish();
            }
            _ => {
                self.error_here("expected expression");
                return;
            }
        }

        loop {
            match self.kind() {
                TokenKind::Dot => {
                    self.wrap(cp, SyntaxKind::Index);
                    self.builder.tag_last(Field::Object);
                    self.bump();
                    self.expect_name(Field::Key);
                    self.finish();
                }
                TokenKind::Colon => {
                    self.wrap(cp, SyntaxKind::MethodIndex);
                    self.builder.tag_last(Field::Object);
                    self.bump();
                    self.expect_name(Field::Key);
                    let has_args = matches!(
                        self.kind(),
                        TokenKind::LParen | TokenKind::String | TokenKind::LBrace
                    );
                    if !has_args {
                        self.error_here("expected arguments");
                    }
                    self.finish();
                    if has_args {
                        self.call(cp);
                    }
                }
                TokenKind::LBracket => {
                    self.wrap(cp, SyntaxKind::BracketIndex);
                    self.builder.tag_last(Field::Object);
                    self.bump();
                    let key = self.checkpoint();
                    self.expression();
                    self.tag_since(key, Field::Key);
                    self.expect(TokenKind::RBracket);
                    self.finish();
                }
                TokenKind::LParen | TokenKind::String | TokenKind::LBrace => self.call(cp),
                _ => break,
            }
        }
    }

    fn call(&mut self, cp: Checkpoint) {
        self.wrap(cp, SyntaxKind::FunctionCall);
        self.builder.tag_last(Field::CalledObject);
        self.start(SyntaxKind::Arguments);
        match self.kind() {
            TokenKind::String => self.bump(),
            TokenKind::LBrace => self.table_constructor(),
            _ => {
                self.bump();
                if !self.at(TokenKind::RParen) {
                    while self.expression() && self.eat(TokenKind::Comma) {}
                }
                self.expect(TokenKind::RParen);
            }
        }
        self.finish();
        self.builder.tag_last(Field::Arguments);
        self.finish();
    }

    /// `{ [k] = v, name = v, v; ... }`
    pub(crate) fn table_constructor(&mut self) {
        self.start(SyntaxKind::TableConstructor);
        self.bump();
        while !matches!(self.kind(), TokenKind::RBrace | TokenKind::Eof) {
            if !self.table_field() {
                break;
            }
            if !self.eat(TokenKind::Comma) && !self.eat(TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(TokenKind::RBrace);
        self.finish();
    }

    fn table_field(&mut self) -> bool {
        self.start(SyntaxKind::Field);
        match self.kind() {
            TokenKind::LBracket => {
                self.bump();
                let key = self.checkpoint();
                self.expression();
                self.tag_since(key, Field::Key);
                self.expect(TokenKind::RBracket);
                self.expect(TokenKind::Assign);
                self.field_value();
            }
            TokenKind::Name if self.nth_kind(1) == TokenKind::Assign => {
                self.bump_field(Field::Key);
                self.bump();
                self.field_value();
            }
            _ => {
                let value = self.checkpoint();
                let parsed = self.expression();
                self.tag_since(value, Field::Value);
                self.finish();
                return parsed;
            }
        }
        self.finish();
        true
    }

    fn field_value(&mut self) {
        let value = self.checkpoint();
        self.expression();
        self.tag_since(value, Field::Value);
    }
}

//! Type expressions.

use tl_lexer::TokenKind;

use crate::kind::{Field, SyntaxKind};
use crate::parser::Parser;
use crate::stack::ensure_sufficient_stack;

impl Parser<'_, '_> {
    /// `: T, U` after a variable list.
    pub(crate) fn type_annotation(&mut self) {
        self.start(SyntaxKind::TypeAnnotation);
        self.expect(TokenKind::Colon);
        while self.type_expr() && self.eat(TokenKind::Comma) {}
        self.finish();
    }

    /// `A | B | ...`. Returns `false` when no type could be parsed.
    pub(crate) fn type_expr(&mut self) -> bool {
        ensure_sufficient_stack(|| self.type_expr_inner())
    }

    fn type_expr_inner(&mut self) -> bool {
        let cp = self.checkpoint();
        if !self.base_type() {
            self.error_here("expected a type");
            return false;
        }
        if self.at(TokenKind::Pipe) {
            self.wrap(cp, SyntaxKind::TypeUnion);
            while self.eat(TokenKind::Pipe) {
                if !self.base_type() {
                    self.error_here("expected a type");
                    break;
                }
            }
            self.finish();
        }
        true
    }

    fn base_type(&mut self) -> bool {
        match self.kind() {
            TokenKind::Nil => {
                self.start(SyntaxKind::SimpleType);
                self.bump();
                self.finish();
            }
            TokenKind::Name => self.simple_type(),
            TokenKind::LBrace => self.table_type(),
            TokenKind::Function => self.function_type(),
            TokenKind::LParen => {
                self.start(SyntaxKind::TypeList);
                self.bump();
                self.type_expr();
                self.expect(TokenKind::RParen);
                self.finish();
            }
            _ => return false,
        }
        true
    }

    /// `name`, `a.b.c`, optionally applied to `<T, U>`.
    fn simple_type(&mut self) {
        self.start(SyntaxKind::SimpleType);
        let cp = self.checkpoint();
        self.bump_field(Field::Name);
        while self.at(TokenKind::Dot) {
            self.wrap(cp, SyntaxKind::TypeIndex);
            self.builder.tag_last(Field::Object);
            self.bump();
            self.expect_name(Field::Key);
            self.finish();
            self.tag_since(cp, Field::Name);
        }
        if self.at(TokenKind::Less) {
            self.start(SyntaxKind::TypeList);
            self.bump();
            while self.type_expr() && self.eat(TokenKind::Comma) {}
            self.expect_closing_angle();
            self.finish();
            self.builder.tag_last(Field::Typeargs);
        }
        self.finish();
    }

    /// `{T}`, `{K : V}` or `{T1, T2}`.
    fn table_type(&mut self) {
        self.start(SyntaxKind::TableType);
        self.bump();
        let key = self.checkpoint();
        if self.type_expr() {
            if self.at(TokenKind::Colon) {
                self.tag_since(key, Field::Key);
                self.bump();
                let value = self.checkpoint();
                self.type_expr();
                self.tag_since(value, Field::Value);
            } else {
                while self.eat(TokenKind::Comma) {
                    if !self.type_expr() {
                        break;
                    }
                }
            }
        }
        self.expect(TokenKind::RBrace);
        self.finish();
    }

    /// `function<T>(a: A, ...: B): R`
    fn function_type(&mut self) {
        self.start(SyntaxKind::FunctionType);
        self.bump();
        if self.at(TokenKind::Less) {
            self.typeargs();
        }
        let cp = self.checkpoint();
        self.start(SyntaxKind::Parameters);
        if self.expect(TokenKind::LParen) {
            if !self.at(TokenKind::RParen) {
                while self.type_parameter() && self.eat(TokenKind::Comma) {}
            }
            self.expect(TokenKind::RParen);
        }
        self.finish();
        self.tag_since(cp, Field::Parameters);
        if self.at(TokenKind::Colon) {
            self.return_type();
        }
        self.finish();
    }

    /// `name: T`, `name?: T`, `T`, or `...: T`.
    fn type_parameter(&mut self) -> bool {
        self.start(SyntaxKind::Parameter);
        let named = self.at(TokenKind::Name)
            && matches!(self.nth_kind(1), TokenKind::Colon | TokenKind::Question);
        let parsed = if named {
            self.bump_field(Field::Name);
            self.eat(TokenKind::Question);
            self.expect(TokenKind::Colon);
            self.typed(Field::Type)
        } else if self.eat(TokenKind::Ellipsis) {
            if self.eat(TokenKind::Colon) {
                self.typed(Field::Type);
            }
            true
        } else {
            let parsed = self.typed(Field::Type);
            self.eat(TokenKind::Ellipsis);
            parsed
        };
        self.finish();
        parsed
    }

    fn typed(&mut self, field: Field) -> bool {
        let cp = self.checkpoint();
        let parsed = self.type_expr();
        self.tag_since(cp, field);
        parsed
    }

    /// Generic parameters of a declaration: `<T, K is Key>`.
    pub(crate) fn typeargs(&mut self) {
        let cp = self.checkpoint();
        self.start(SyntaxKind::Typeargs);
        self.bump();
        loop {
            self.start(SyntaxKind::Typearg);
            let named = self.expect_name(Field::Name);
            if named && self.at_word("is") {
                self.bump_word();
                self.typed(Field::Type);
            }
            self.finish();
            if !named || !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect_closing_angle();
        self.finish();
        self.tag_since(cp, Field::Typeargs);
    }

    /// `: T, U`, `: (T, U)` or `: T...` after a parameter list.
    pub(crate) fn return_type(&mut self) {
        let cp = self.checkpoint();
        self.start(SyntaxKind::ReturnType);
        self.bump();
        if self.eat(TokenKind::LParen) {
            if !self.at(TokenKind::RParen) {
                self.return_list();
            }
            self.expect(TokenKind::RParen);
        } else {
            self.return_list();
        }
        self.finish();
        self.tag_since(cp, Field::ReturnType);
    }

    fn return_list(&mut self) {
        while self.type_expr() {
            self.eat(TokenKind::Ellipsis);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
    }
}

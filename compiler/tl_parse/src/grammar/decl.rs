//! Record, interface, enum and type alias declarations.

use tl_lexer::TokenKind;

use crate::kind::{Field, SyntaxKind};
use crate::parser::Parser;
use crate::recovery::TokenSet;
use crate::stack::ensure_sufficient_stack;

/// Keywords that cannot appear inside a record body; seeing one means the
/// body's `end` is missing.
const RECORD_BODY_EXIT: TokenSet = TokenSet::new()
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
    .with(TokenKind::End)
    .with(TokenKind::Eof);

impl Parser<'_, '_> {
    /// `[local|global] record Name<T> is I where cond ... end`, and the
    /// same for interfaces.
    pub(crate) fn record_declaration(&mut self, kind: SyntaxKind, scoped: bool) {
        self.start(kind);
        if scoped {
            self.bump_word();
        }
        self.bump_word();
        self.expect_name(Field::Name);
        self.record_rest();
        self.finish();
    }

    /// Everything after the record name: generics, inheritance, body, `end`.
    fn record_rest(&mut self) {
        if self.at(TokenKind::Less) {
            self.typeargs();
        }
        if self.at_word("is") {
            self.start(SyntaxKind::InterfaceList);
            self.bump_word();
            while self.type_expr() && self.eat(TokenKind::Comma) {}
            self.finish();
        }
        if self.at_word("where") {
            self.start(SyntaxKind::WhereClause);
            self.bump_word();
            let cp = self.checkpoint();
            self.expression();
            self.tag_since(cp, Field::Condition);
            self.finish();
        }
        self.record_body();
        self.expect(TokenKind::End);
    }

    fn record_body(&mut self) {
        ensure_sufficient_stack(|| {
            let cp = self.checkpoint();
            self.start(SyntaxKind::RecordBody);
            while !RECORD_BODY_EXIT.contains(self.kind()) {
                self.record_entry();
            }
            self.finish();
            self.tag_since(cp, Field::Body);
        });
    }

    fn record_entry(&mut self) {
        let named_next = self.nth_kind(1) == TokenKind::Name;
        match self.kind() {
            TokenKind::Name if named_next && self.at_word("record") => {
                self.record_declaration(SyntaxKind::RecordDeclaration, false);
            }
            TokenKind::Name if named_next && self.at_word("interface") => {
                self.record_declaration(SyntaxKind::InterfaceDeclaration, false);
            }
            TokenKind::Name if named_next && self.at_word("enum") => {
                self.enum_declaration(false);
            }
            TokenKind::Name if named_next && self.at_word("type") => {
                self.type_declaration(false);
            }
            TokenKind::Name if named_next && self.at_word("metamethod") => {
                self.start(SyntaxKind::RecordField);
                self.bump_word();
                self.field_signature();
                self.finish();
            }
            TokenKind::Name if self.at_word("userdata") && self.nth_kind(1) != TokenKind::Colon => {
                self.bump_word();
            }
            TokenKind::Name => {
                self.start(SyntaxKind::RecordField);
                self.field_signature();
                self.finish();
            }
            TokenKind::LBracket => {
                self.start(SyntaxKind::RecordField);
                self.bump();
                if self.at(TokenKind::String) {
                    self.bump_field(Field::Key);
                } else {
                    self.error_here("expected a string");
                }
                self.expect(TokenKind::RBracket);
                self.expect(TokenKind::Colon);
                let cp = self.checkpoint();
                self.type_expr();
                self.tag_since(cp, Field::Type);
                self.finish();
            }
            TokenKind::LBrace => {
                self.start(SyntaxKind::RecordArrayType);
                self.bump();
                let cp = self.checkpoint();
                self.type_expr();
                self.tag_since(cp, Field::Type);
                self.expect(TokenKind::RBrace);
                self.finish();
            }
            _ => {
                self.error_here("syntax error in record body");
                self.start(SyntaxKind::Error);
                self.bump();
                self.finish();
            }
        }
    }

    /// `name: T`
    fn field_signature(&mut self) {
        self.expect_name(Field::Name);
        self.expect(TokenKind::Colon);
        let cp = self.checkpoint();
        self.type_expr();
        self.tag_since(cp, Field::Type);
    }

    /// `[local|global] enum Name "a" "b" end`
    pub(crate) fn enum_declaration(&mut self, scoped: bool) {
        self.start(SyntaxKind::EnumDeclaration);
        if scoped {
            self.bump_word();
        }
        self.bump_word();
        self.expect_name(Field::Name);
        self.enum_rest();
        self.finish();
    }

    fn enum_rest(&mut self) {
        let cp = self.checkpoint();
        self.start(SyntaxKind::EnumBody);
        while !RECORD_BODY_EXIT.contains(self.kind()) {
            if self.at(TokenKind::String) {
                self.bump();
            } else {
                self.error_here("expected an enum value");
                self.start(SyntaxKind::Error);
                self.bump();
                self.finish();
            }
        }
        self.finish();
        self.tag_since(cp, Field::Body);
        self.expect(TokenKind::End);
    }

    /// `[local|global] type Name<T> = <type | record ... end | require(...)>`
    pub(crate) fn type_declaration(&mut self, scoped: bool) {
        self.start(SyntaxKind::TypeDeclaration);
        if scoped {
            self.bump_word();
        }
        self.bump_word();
        self.expect_name(Field::Name);
        if self.at(TokenKind::Less) {
            self.typeargs();
        }
        if self.expect(TokenKind::Assign) {
            let cp = self.checkpoint();
            if self.at_word("record") {
                self.anonymous_record(SyntaxKind::RecordDeclaration);
            } else if self.at_word("interface") {
                self.anonymous_record(SyntaxKind::InterfaceDeclaration);
            } else if self.at_word("enum") {
                self.start(SyntaxKind::EnumDeclaration);
                self.bump_word();
                self.enum_rest();
                self.finish();
            } else if self.at_word("require")
                && matches!(self.nth_kind(1), TokenKind::LParen | TokenKind::String)
            {
                self.suffixed_expression();
            } else {
                self.type_expr();
            }
            self.tag_since(cp, Field::Value);
        }
        self.finish();
    }

    fn anonymous_record(&mut self, kind: SyntaxKind) {
        self.start(kind);
        self.bump_word();
        self.record_rest();
        self.finish();
    }
}

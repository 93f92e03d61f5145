//! Statements and blocks.

use tl_lexer::TokenKind;

use crate::kind::{Field, SyntaxKind};
use crate::parser::Parser;
use crate::recovery::{BLOCK_END, EXPR_START};
use crate::stack::ensure_sufficient_stack;

impl Parser<'_, '_> {
    /// Statements up to the next block terminator, tagged `body`.
    pub(crate) fn block(&mut self) {
        ensure_sufficient_stack(|| {
            let cp = self.checkpoint();
            self.start(SyntaxKind::Block);
            while !BLOCK_END.contains(self.kind()) {
                self.statement();
            }
            self.finish();
            self.tag_since(cp, Field::Body);
        });
    }

    /// One statement. Consumes at least one token unless at a block terminator.
    pub(crate) fn statement(&mut self) {
        match self.kind() {
            TokenKind::Semicolon => self.bump(),
            TokenKind::Local => self.scoped_statement(),
            TokenKind::Function => self.function_statement(false),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Repeat => self.repeat_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Do => self.do_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::Break => {
                self.start(SyntaxKind::BreakStatement);
                self.bump();
                self.finish();
            }
            TokenKind::Goto => {
                self.start(SyntaxKind::GotoStatement);
                self.bump();
                self.expect_name(Field::Name);
                self.finish();
            }
            TokenKind::DoubleColon => {
                self.start(SyntaxKind::LabelStatement);
                self.bump();
                self.expect_name(Field::Name);
                self.expect(TokenKind::DoubleColon);
                self.finish();
            }
            TokenKind::Name
                if self.at_word("global")
                    && matches!(self.nth_kind(1), TokenKind::Name | TokenKind::Function) =>
            {
                self.scoped_statement();
            }
            TokenKind::Name | TokenKind::LParen => self.expression_statement(),
            _ => self.error_statement(),
        }
    }

    /// A statement introduced by `local` or `global`.
    fn scoped_statement(&mut self) {
        let declares_named = self.nth_kind(2) == TokenKind::Name;
        if self.nth_kind(1) == TokenKind::Function {
            self.function_statement(true);
        } else if declares_named && self.nth_is_word(1, "record") {
            self.record_declaration(SyntaxKind::RecordDeclaration, true);
        } else if declares_named && self.nth_is_word(1, "interface") {
            self.record_declaration(SyntaxKind::InterfaceDeclaration, true);
        } else if declares_named && self.nth_is_word(1, "enum") {
            self.enum_declaration(true);
        } else if declares_named && self.nth_is_word(1, "type") {
            self.type_declaration(true);
        } else {
            self.var_declaration();
        }
    }

    /// `local a <const>, b: T, U = e1, e2`
    fn var_declaration(&mut self) {
        self.start(SyntaxKind::VarDeclaration);
        self.bump_word();

        self.start(SyntaxKind::VarDeclarators);
        loop {
            self.start(SyntaxKind::Var);
            self.expect_name(Field::Name);
            if self.at(TokenKind::Less) {
                self.start(SyntaxKind::Attribute);
                self.bump();
                self.expect_name(Field::Name);
                self.expect_closing_angle();
                self.finish();
            }
            self.finish();
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.finish();

        if self.at(TokenKind::Colon) {
            let cp = self.checkpoint();
            self.type_annotation();
            self.tag_since(cp, Field::Type);
        }
        if self.eat(TokenKind::Assign) {
            let cp = self.checkpoint();
            self.expression_list();
            self.tag_since(cp, Field::Value);
        }
        self.finish();
    }

    /// `function a.b:c(...)`, `local function f(...)` or `global function f(...)`.
    fn function_statement(&mut self, scoped: bool) {
        self.start(SyntaxKind::FunctionStatement);
        if scoped {
            self.bump_word();
        }
        self.expect(TokenKind::Function);

        let cp = self.checkpoint();
        if self.expect_name(Field::Name) && !scoped {
            while matches!(self.kind(), TokenKind::Dot | TokenKind::Colon) {
                let method = self.at(TokenKind::Colon);
                let kind = if method {
                    SyntaxKind::MethodIndex
                } else {
                    SyntaxKind::Index
                };
                self.wrap(cp, kind);
                self.builder.tag_last(Field::Object);
                self.bump();
                self.expect_name(Field::Key);
                self.finish();
                self.tag_since(cp, Field::Name);
                if method {
                    break;
                }
            }
        }
        self.function_body();
        self.finish();
    }

    /// `[<typeargs>] (params) [: returns] block end`
    pub(crate) fn function_body(&mut self) {
        if self.at(TokenKind::Less) {
            self.typeargs();
        }
        self.parameters();
        if self.at(TokenKind::Colon) {
            self.return_type();
        }
        self.block();
        self.expect(TokenKind::End);
    }

    fn parameters(&mut self) {
        let cp = self.checkpoint();
        self.start(SyntaxKind::Parameters);
        if self.expect(TokenKind::LParen) {
            if !self.at(TokenKind::RParen) {
                while self.parameter() && self.eat(TokenKind::Comma) {}
            }
            self.expect(TokenKind::RParen);
        }
        self.finish();
        self.tag_since(cp, Field::Parameters);
    }

    /// `name [?] [: T]` or `... [: T]`.
    fn parameter(&mut self) -> bool {
        self.start(SyntaxKind::Parameter);
        match self.kind() {
            TokenKind::Name => self.bump_field(Field::Name),
            TokenKind::Ellipsis => self.bump(),
            _ => {
                self.error_here("expected parameter");
                self.finish();
                return false;
            }
        }
        self.eat(TokenKind::Question);
        if self.eat(TokenKind::Colon) {
            let cp = self.checkpoint();
            self.type_expr();
            self.tag_since(cp, Field::Type);
        }
        self.finish();
        true
    }

    fn if_statement(&mut self) {
        self.start(SyntaxKind::IfStatement);
        self.bump();
        self.condition();
        self.expect(TokenKind::Then);
        self.block();
        while self.at(TokenKind::Elseif) {
            self.start(SyntaxKind::ElseifBlock);
            self.bump();
            self.condition();
            self.expect(TokenKind::Then);
            self.block();
            self.finish();
        }
        if self.at(TokenKind::Else) {
            self.start(SyntaxKind::ElseBlock);
            self.bump();
            self.block();
            self.finish();
        }
        self.expect(TokenKind::End);
        self.finish();
    }

    fn while_statement(&mut self) {
        self.start(SyntaxKind::WhileStatement);
        self.bump();
        self.condition();
        self.expect(TokenKind::Do);
        self.block();
        self.expect(TokenKind::End);
        self.finish();
    }

    fn repeat_statement(&mut self) {
        self.start(SyntaxKind::RepeatStatement);
        self.bump();
        self.block();
        if self.expect(TokenKind::Until) {
            self.condition();
        }
        self.finish();
    }

    fn for_statement(&mut self) {
        let numeric = self.nth_kind(2) == TokenKind::Assign;
        if numeric {
            self.start(SyntaxKind::NumericForStatement);
            self.bump();
            self.expect_name(Field::Name);
            self.expect(TokenKind::Assign);
            self.expression();
            self.expect(TokenKind::Comma);
            self.expression();
            if self.eat(TokenKind::Comma) {
                self.expression();
            }
        } else {
            self.start(SyntaxKind::GenericForStatement);
            self.bump();
            while self.expect_name(Field::Name) && self.eat(TokenKind::Comma) {}
            self.expect(TokenKind::In);
            self.expression_list();
        }
        self.expect(TokenKind::Do);
        self.block();
        self.expect(TokenKind::End);
        self.finish();
    }

    fn do_statement(&mut self) {
        self.start(SyntaxKind::DoStatement);
        self.bump();
        self.block();
        self.expect(TokenKind::End);
        self.finish();
    }

    fn return_statement(&mut self) {
        self.start(SyntaxKind::ReturnStatement);
        self.bump();
        if EXPR_START.contains(self.kind()) {
            self.expression_list();
        }
        self.eat(TokenKind::Semicolon);
        self.finish();
    }

    fn condition(&mut self) {
        let cp = self.checkpoint();
        self.expression();
        self.tag_since(cp, Field::Condition);
    }

    /// A call, an assignment, or an `ERROR` wrapping an expression that is neither.
    fn expression_statement(&mut self) {
        let cp = self.checkpoint();
        self.suffixed_expression();

        if matches!(self.kind(), TokenKind::Assign | TokenKind::Comma) {
            self.wrap(cp, SyntaxKind::AssignmentVariables);
            while self.eat(TokenKind::Comma) {
                self.suffixed_expression();
            }
            self.finish();
            self.wrap(cp, SyntaxKind::VarAssignment);
            self.expect(TokenKind::Assign);
            let value = self.checkpoint();
            self.expression_list();
            self.tag_since(value, Field::Value);
            self.finish();
        } else if self.builder.last_kind() != Some(SyntaxKind::FunctionCall) {
            self.error_here("syntax error, expected assignment or call");
            self.wrap(cp, SyntaxKind::Error);
            self.finish();
        }
    }

    /// Comma-separated expressions in an `expressions` node.
    pub(crate) fn expression_list(&mut self) {
        self.start(SyntaxKind::Expressions);
        while self.expression() && self.eat(TokenKind::Comma) {}
        self.finish();
    }
}

use super::GrammarParser;
use super::expressions::EXPRESSION_FIRST;
use crate::kind::{Field, SyntaxKind, TokenSet};

const STATEMENT_RECOVERY: TokenSet = TokenSet::new(&[
    SyntaxKind::Semicolon,
    SyntaxKind::LBrace,
    SyntaxKind::RBrace,
    SyntaxKind::ValKw,
    SyntaxKind::VarKw,
    SyntaxKind::IfKw,
    SyntaxKind::ForKw,
    SyntaxKind::WhileKw,
    SyntaxKind::DoKw,
    SyntaxKind::SwitchKw,
    SyntaxKind::TryKw,
    SyntaxKind::ReturnKw,
    SyntaxKind::BreakKw,
    SyntaxKind::ContinueKw,
    SyntaxKind::AssertKw,
    SyntaxKind::CaseKw,
    SyntaxKind::DefaultKw,
]);

impl GrammarParser<'_> {
    pub(super) fn block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at_eof() {
            self.statement();
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    pub(super) fn statement(&mut self) {
        if !self.enter() {
            return;
        }
        match self.current() {
            SyntaxKind::LBrace => self.block(),
            SyntaxKind::Semicolon => self.bump(),
            SyntaxKind::ValKw | SyntaxKind::VarKw => self.variable_declaration(),
            SyntaxKind::IfKw => self.if_statement(),
            SyntaxKind::ForKw => self.for_statement(),
            SyntaxKind::WhileKw => self.while_statement(),
            SyntaxKind::DoKw => self.do_statement(),
            SyntaxKind::SwitchKw => self.switch_statement(),
            SyntaxKind::TryKw => self.try_statement(),
            SyntaxKind::ReturnKw => self.return_statement(),
            SyntaxKind::BreakKw => self.jump_statement(SyntaxKind::BreakStatement),
            SyntaxKind::ContinueKw => self.jump_statement(SyntaxKind::ContinueStatement),
            SyntaxKind::AssertKw => self.assert_statement(),
            _ if self.typed_name_at(self.pos).is_some() => self.variable_declaration(),
            kind if EXPRESSION_FIRST.contains(kind) => self.expression_statement(),
            _ => self.error_until(STATEMENT_RECOVERY),
        }
        self.leave();
    }

    /// `val x = 1;`, `var Int x;`, `String s = "";`
    fn variable_declaration(&mut self) {
        self.start_node(SyntaxKind::VariableDeclaration);
        self.local_binding_head();
        if self.eat(SyntaxKind::Eq) || self.eat(SyntaxKind::ColonEq) {
            self.field(Field::Value).expression();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    /// `[val|var] [Type] name` shared by declarations and for-each loops.
    fn local_binding_head(&mut self) {
        if !self.eat(SyntaxKind::ValKw) {
            self.eat(SyntaxKind::VarKw);
        }
        if self.typed_name_at(self.pos).is_some() {
            self.field(Field::Type).type_expression();
        }
        self.field(Field::Name).expect_name(SyntaxKind::Identifier);
    }

    fn parenthesized_condition(&mut self) {
        self.expect(SyntaxKind::LParen);
        self.field(Field::Condition).expression();
        self.expect(SyntaxKind::RParen);
    }

    fn if_statement(&mut self) {
        self.start_node(SyntaxKind::IfStatement);
        self.bump();
        self.parenthesized_condition();
        self.field(Field::Consequence).statement();
        if self.eat(SyntaxKind::ElseKw) {
            self.field(Field::Alternative).statement();
        }
        self.finish_node();
    }

    fn for_statement(&mut self) {
        self.start_node(SyntaxKind::ForStatement);
        self.bump();
        self.expect(SyntaxKind::LParen);
        if self.at_for_each_head() {
            self.local_binding_head();
            self.expect(SyntaxKind::Colon);
            self.field(Field::Value).expression();
        } else {
            if self.at(SyntaxKind::ValKw)
                || self.at(SyntaxKind::VarKw)
                || self.typed_name_at(self.pos).is_some()
            {
                self.variable_declaration();
            } else {
                if !self.at(SyntaxKind::Semicolon) {
                    self.expression_list();
                }
                self.expect(SyntaxKind::Semicolon);
            }
            if !self.at(SyntaxKind::Semicolon) {
                self.field(Field::Condition).expression();
            }
            self.expect(SyntaxKind::Semicolon);
            if !self.at(SyntaxKind::RParen) {
                self.expression_list();
            }
        }
        self.expect(SyntaxKind::RParen);
        self.field(Field::Body).statement();
        self.finish_node();
    }

    fn at_for_each_head(&self) -> bool {
        let mut index = self.pos;
        if matches!(self.kind_at(index), SyntaxKind::ValKw | SyntaxKind::VarKw) {
            index += 1;
        }
        let name = match self.typed_name_at(index) {
            Some(name) => name,
            None if self.kind_at(index) == SyntaxKind::Identifier => index,
            None => return false,
        };
        self.kind_at(name + 1) == SyntaxKind::Colon
    }

    fn expression_list(&mut self) {
        self.expression();
        while self.eat(SyntaxKind::Comma) {
            self.expression();
        }
    }

    fn while_statement(&mut self) {
        self.start_node(SyntaxKind::WhileStatement);
        self.bump();
        self.parenthesized_condition();
        self.field(Field::Body).statement();
        self.finish_node();
    }

    fn do_statement(&mut self) {
        self.start_node(SyntaxKind::DoStatement);
        self.bump();
        self.field(Field::Body).statement();
        self.expect(SyntaxKind::WhileKw);
        self.parenthesized_condition();
        self.expect_semicolon();
        self.finish_node();
    }

    fn switch_statement(&mut self) {
        self.start_node(SyntaxKind::SwitchStatement);
        self.bump();
        self.expect(SyntaxKind::LParen);
        if !self.at(SyntaxKind::RParen) {
            self.field(Field::Condition).expression();
        }
        self.expect(SyntaxKind::RParen);
        self.expect(SyntaxKind::LBrace);
        while !self.at(SyntaxKind::RBrace) && !self.at_eof() {
            if self.at(SyntaxKind::CaseKw) || self.at(SyntaxKind::DefaultKw) {
                self.case_clause();
            } else {
                self.error_until(TokenSet::new(&[SyntaxKind::CaseKw, SyntaxKind::DefaultKw, SyntaxKind::RBrace]));
            }
        }
        self.expect(SyntaxKind::RBrace);
        self.finish_node();
    }

    fn case_clause(&mut self) {
        self.start_node(SyntaxKind::CaseClause);
        if self.eat(SyntaxKind::CaseKw) {
            self.field(Field::Value).expression();
            while self.eat(SyntaxKind::Comma) {
                self.field(Field::Value).expression();
            }
        } else {
            self.bump();
        }
        self.expect(SyntaxKind::Colon);
        while !matches!(
            self.current(),
            SyntaxKind::CaseKw | SyntaxKind::DefaultKw | SyntaxKind::RBrace | SyntaxKind::Eof
        ) {
            self.statement();
        }
        self.finish_node();
    }

    fn try_statement(&mut self) {
        self.start_node(SyntaxKind::TryStatement);
        self.bump();
        if self.eat(SyntaxKind::LParen) {
            while !self.at(SyntaxKind::RParen) && !self.at_eof() {
                if self.typed_name_at(self.pos).is_some() || self.at(SyntaxKind::ValKw) || self.at(SyntaxKind::VarKw) {
                    self.start_node(SyntaxKind::VariableDeclaration);
                    self.local_binding_head();
                    if self.eat(SyntaxKind::Eq) {
                        self.field(Field::Value).expression();
                    }
                    self.finish_node();
                } else {
                    self.expression();
                }
                if !self.eat(SyntaxKind::Comma) && !self.eat(SyntaxKind::Semicolon) {
                    break;
                }
            }
            self.expect(SyntaxKind::RParen);
        }
        self.field(Field::Body).block();
        while self.at(SyntaxKind::CatchKw) {
            self.start_node(SyntaxKind::CatchClause);
            self.bump();
            self.expect(SyntaxKind::LParen);
            self.field(Field::Type).type_expression();
            self.field(Field::Name).expect_name(SyntaxKind::Identifier);
            self.expect(SyntaxKind::RParen);
            self.field(Field::Body).block();
            self.finish_node();
        }
        if self.at(SyntaxKind::FinallyKw) {
            self.start_node(SyntaxKind::FinallyClause);
            self.bump();
            self.field(Field::Body).block();
            self.finish_node();
        }
        self.finish_node();
    }

    fn return_statement(&mut self) {
        self.start_node(SyntaxKind::ReturnStatement);
        self.bump();
        if self.at_set(EXPRESSION_FIRST) {
            self.field(Field::Value).expression();
            while self.eat(SyntaxKind::Comma) {
                self.field(Field::Value).expression();
            }
        }
        self.expect_semicolon();
        self.finish_node();
    }

    fn jump_statement(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if self.at(SyntaxKind::Identifier) {
            self.bump();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    fn assert_statement(&mut self) {
        self.start_node(SyntaxKind::AssertStatement);
        self.bump();
        if self.at_set(EXPRESSION_FIRST) {
            self.field(Field::Condition).expression();
        }
        self.expect_semicolon();
        self.finish_node();
    }

    fn expression_statement(&mut self) {
        self.start_node(SyntaxKind::ExpressionStatement);
        self.expression();
        self.expect_semicolon();
        self.finish_node();
    }
}

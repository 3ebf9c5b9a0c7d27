use super::GrammarParser;
use super::types::TYPE_FIRST;
use crate::kind::{Field, SyntaxKind, TokenSet};

pub(super) const EXPRESSION_FIRST: TokenSet = TokenSet::new(&[
    SyntaxKind::Identifier,
    SyntaxKind::IntegerLiteral,
    SyntaxKind::FloatLiteral,
    SyntaxKind::StringLiteral,
    SyntaxKind::TemplateStringLiteral,
    SyntaxKind::CharLiteral,
    SyntaxKind::TrueKw,
    SyntaxKind::FalseKw,
    SyntaxKind::NullKw,
    SyntaxKind::ThisKw,
    SyntaxKind::NewKw,
    SyntaxKind::LParen,
    SyntaxKind::LBracket,
    SyntaxKind::Bang,
    SyntaxKind::Minus,
    SyntaxKind::Plus,
    SyntaxKind::Tilde,
    SyntaxKind::PlusPlus,
    SyntaxKind::MinusMinus,
]);

/// Tokens that end an expression; an operand missing before one of them is reported
/// as a missing identifier instead of swallowing the token.
const EXPRESSION_RECOVERY: TokenSet = TokenSet::new(&[
    SyntaxKind::Semicolon,
    SyntaxKind::RParen,
    SyntaxKind::RBracket,
    SyntaxKind::RBrace,
    SyntaxKind::LBrace,
    SyntaxKind::Comma,
    SyntaxKind::Colon,
    SyntaxKind::Eof,
]);

const ASSIGNMENT_OPERATORS: TokenSet = TokenSet::new(&[
    SyntaxKind::Eq,
    SyntaxKind::PlusEq,
    SyntaxKind::MinusEq,
    SyntaxKind::StarEq,
    SyntaxKind::SlashEq,
    SyntaxKind::PercentEq,
    SyntaxKind::AmpEq,
    SyntaxKind::PipeEq,
    SyntaxKind::CaretEq,
    SyntaxKind::ShlEq,
    SyntaxKind::ShrEq,
    SyntaxKind::UshrEq,
    SyntaxKind::ColonEq,
]);

const ASSIGNMENT_PRECEDENCE: u8 = 1;
const TERNARY_PRECEDENCE: u8 = 2;
const UNARY_PRECEDENCE: u8 = 15;

fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    let precedence = match kind {
        SyntaxKind::Elvis => 3,
        SyntaxKind::OrOr => 4,
        SyntaxKind::AndAnd => 5,
        SyntaxKind::Pipe => 6,
        SyntaxKind::Caret => 7,
        SyntaxKind::Amp => 8,
        SyntaxKind::EqEq | SyntaxKind::NotEq => 9,
        SyntaxKind::Lt | SyntaxKind::Gt | SyntaxKind::LtEq | SyntaxKind::GtEq | SyntaxKind::Spaceship => 10,
        SyntaxKind::DotDot => 11,
        SyntaxKind::Shl | SyntaxKind::Shr | SyntaxKind::Ushr => 12,
        SyntaxKind::Plus | SyntaxKind::Minus => 13,
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => 14,
        _ => return None,
    };
    Some(precedence)
}

impl GrammarParser<'_> {
    pub(super) fn expression(&mut self) {
        self.expression_bp(0);
    }

    /// Precedence climbing over binary, ternary and assignment operators.
    fn expression_bp(&mut self, min_precedence: u8) {
        if !self.enter() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.unary();
        loop {
            let kind = self.current();
            if ASSIGNMENT_OPERATORS.contains(kind) {
                if min_precedence > ASSIGNMENT_PRECEDENCE {
                    break;
                }
                self.start_node_at(checkpoint, SyntaxKind::AssignmentExpression);
                self.builder.set_first_child_field(Field::Left);
                self.field(Field::Operator).bump();
                self.field(Field::Right).expression_bp(ASSIGNMENT_PRECEDENCE);
                self.finish_node();
            } else if kind == SyntaxKind::Question {
                if min_precedence > TERNARY_PRECEDENCE {
                    break;
                }
                self.start_node_at(checkpoint, SyntaxKind::TernaryExpression);
                self.builder.set_first_child_field(Field::Condition);
                self.bump();
                self.field(Field::Consequence).expression_bp(TERNARY_PRECEDENCE + 1);
                self.expect(SyntaxKind::Colon);
                self.field(Field::Alternative).expression_bp(TERNARY_PRECEDENCE);
                self.finish_node();
            } else if let Some(precedence) = binary_precedence(kind) {
                if precedence < min_precedence {
                    break;
                }
                self.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
                self.builder.set_first_child_field(Field::Left);
                self.field(Field::Operator).bump();
                self.field(Field::Right).expression_bp(precedence + 1);
                self.finish_node();
            } else {
                break;
            }
        }
        self.leave();
    }

    fn unary(&mut self) {
        match self.current() {
            SyntaxKind::Bang
            | SyntaxKind::Minus
            | SyntaxKind::Plus
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                self.start_node(SyntaxKind::UnaryExpression);
                self.field(Field::Operator).bump();
                self.field(Field::Operand).expression_bp(UNARY_PRECEDENCE);
                self.finish_node();
            }
            _ => self.postfix(),
        }
    }

    fn postfix(&mut self) {
        let checkpoint = self.checkpoint();
        if !self.primary() {
            return;
        }
        loop {
            match self.current() {
                SyntaxKind::LParen => {
                    self.start_node_at(checkpoint, SyntaxKind::CallExpression);
                    self.builder.set_first_child_field(Field::Function);
                    self.field(Field::Arguments).arguments();
                }
                SyntaxKind::Dot | SyntaxKind::QuestionDot => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberExpression);
                    self.builder.set_first_child_field(Field::Object);
                    self.bump();
                    self.field(Field::Member);
                    // Keywords such as `as` and `is` are ordinary member names.
                    if self.current().is_keyword() && self.current() != SyntaxKind::NewKw {
                        self.bump_as(SyntaxKind::Identifier);
                    } else {
                        self.expect_name(SyntaxKind::Identifier);
                    }
                }
                SyntaxKind::LBracket => {
                    self.start_node_at(checkpoint, SyntaxKind::IndexExpression);
                    self.builder.set_first_child_field(Field::Object);
                    self.bump();
                    self.field(Field::Index).expression();
                    self.expect(SyntaxKind::RBracket);
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.start_node_at(checkpoint, SyntaxKind::PostfixExpression);
                    self.builder.set_first_child_field(Field::Operand);
                    self.field(Field::Operator).bump();
                }
                _ => break,
            }
            self.finish_node();
        }
    }

    /// Returns false when no operand could be read.
    fn primary(&mut self) -> bool {
        match self.current() {
            SyntaxKind::Identifier if self.nth(1) == SyntaxKind::Arrow => self.lambda(),
            SyntaxKind::Identifier
            | SyntaxKind::IntegerLiteral
            | SyntaxKind::FloatLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::TemplateStringLiteral
            | SyntaxKind::CharLiteral => self.bump(),
            SyntaxKind::TrueKw | SyntaxKind::FalseKw => self.bump_as(SyntaxKind::BooleanLiteral),
            SyntaxKind::NullKw => self.bump_as(SyntaxKind::NullLiteral),
            SyntaxKind::ThisKw => self.bump_as(SyntaxKind::ThisExpression),
            SyntaxKind::NewKw => self.new_expression(),
            SyntaxKind::LParen if self.at_parenthesized_lambda() => self.lambda(),
            SyntaxKind::LParen => self.parenthesized_expression(),
            SyntaxKind::LBracket => self.collection_literal(),
            _ if self.at_set(EXPRESSION_RECOVERY) => {
                self.builder.missing(SyntaxKind::Identifier);
                return false;
            }
            _ => {
                self.start_node(SyntaxKind::Error);
                self.skip_balanced();
                self.finish_node();
                return false;
            }
        }
        true
    }

    fn at_parenthesized_lambda(&self) -> bool {
        self.skip_parens(self.pos)
            .is_some_and(|after| self.kind_at(after) == SyntaxKind::Arrow)
    }

    /// `x -> expr`, `(a, Int b) -> { ... }`
    fn lambda(&mut self) {
        self.start_node(SyntaxKind::LambdaExpression);
        self.field(Field::Parameters);
        self.start_node(SyntaxKind::Parameters);
        if self.at(SyntaxKind::Identifier) {
            self.start_node(SyntaxKind::Parameter);
            self.field(Field::Name).bump();
            self.finish_node();
        } else {
            self.bump();
            self.delimited(SyntaxKind::RParen, TYPE_FIRST, |p| p.lambda_parameter());
        }
        self.finish_node();
        self.expect(SyntaxKind::Arrow);
        if self.at(SyntaxKind::LBrace) {
            self.field(Field::Body).block();
        } else {
            self.field(Field::Body).expression();
        }
        self.finish_node();
    }

    fn lambda_parameter(&mut self) {
        self.start_node(SyntaxKind::Parameter);
        if self.typed_name_at(self.pos).is_some() {
            self.field(Field::Type).type_expression();
        }
        self.field(Field::Name).expect_name(SyntaxKind::Identifier);
        self.finish_node();
    }

    fn parenthesized_expression(&mut self) {
        self.start_node(SyntaxKind::ParenthesizedExpression);
        self.bump();
        self.expression();
        while self.eat(SyntaxKind::Comma) {
            self.expression();
        }
        self.expect(SyntaxKind::RParen);
        self.finish_node();
    }

    fn new_expression(&mut self) {
        self.start_node(SyntaxKind::NewExpression);
        self.bump();
        self.field(Field::Type).type_expression();
        if self.at(SyntaxKind::LParen) {
            self.field(Field::Arguments).arguments();
        }
        if self.at(SyntaxKind::LBrace) {
            self.field(Field::Body).body(SyntaxKind::ClassBody);
        }
        self.finish_node();
    }

    /// `[a, b]` or `[k = v, ...]`; which one is known only after the first element.
    fn collection_literal(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        let mut is_map = false;
        while self.at_set(EXPRESSION_FIRST) {
            let entry = self.checkpoint();
            self.expression_bp(TERNARY_PRECEDENCE + 1);
            if self.at(SyntaxKind::Eq) {
                is_map = true;
                self.start_node_at(entry, SyntaxKind::MapEntry);
                self.builder.set_first_child_field(Field::Key);
                self.bump();
                self.field(Field::Value).expression_bp(TERNARY_PRECEDENCE + 1);
                self.finish_node();
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(SyntaxKind::RBracket);
        let kind = if is_map { SyntaxKind::MapLiteral } else { SyntaxKind::ListLiteral };
        self.start_node_at(checkpoint, kind);
        self.finish_node();
    }

    pub(super) fn arguments(&mut self) {
        self.start_node(SyntaxKind::Arguments);
        self.bump();
        self.delimited(SyntaxKind::RParen, EXPRESSION_FIRST, |p| p.expression());
        self.finish_node();
    }
}

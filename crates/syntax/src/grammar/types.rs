use super::GrammarParser;
use crate::kind::{Field, SyntaxKind, TokenSet};

pub(super) const TYPE_FIRST: TokenSet = TokenSet::new(&[
    SyntaxKind::Identifier,
    SyntaxKind::FunctionKw,
    SyntaxKind::LParen,
]);

impl GrammarParser<'_> {
    /// `type_expression`, including `?` and `[]` suffixes.
    pub(super) fn type_expression(&mut self) {
        if !self.enter() {
            return;
        }
        let checkpoint = self.checkpoint();
        self.start_node(SyntaxKind::TypeExpression);
        match self.current() {
            SyntaxKind::Identifier => self.named_type(),
            SyntaxKind::FunctionKw => self.function_type(),
            SyntaxKind::LParen => self.tuple_type(),
            _ => {
                self.builder.missing(SyntaxKind::TypeName);
            }
        }
        self.finish_node();

        loop {
            let wrapper = match self.current() {
                SyntaxKind::Question => SyntaxKind::NullableType,
                SyntaxKind::LBracket if self.nth(1) == SyntaxKind::RBracket => SyntaxKind::ArrayType,
                _ => break,
            };
            self.start_node_at(checkpoint, wrapper);
            self.builder.set_first_child_field(Field::Element);
            if wrapper == SyntaxKind::ArrayType {
                self.bump();
            }
            self.bump();
            self.finish_node();
            self.start_node_at(checkpoint, SyntaxKind::TypeExpression);
            self.finish_node();
        }
        self.leave();
    }

    fn named_type(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump_as(SyntaxKind::TypeName);
        if self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Identifier {
            self.start_node_at(checkpoint, SyntaxKind::QualifiedName);
            while self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Identifier {
                self.bump();
                self.bump_as(SyntaxKind::TypeName);
            }
            self.finish_node();
        }
        if self.at(SyntaxKind::Lt) {
            self.start_node_at(checkpoint, SyntaxKind::GenericType);
            self.field(Field::TypeArguments).type_arguments();
            self.finish_node();
        }
    }

    fn function_type(&mut self) {
        self.start_node(SyntaxKind::FunctionType);
        self.bump();
        self.field(Field::ReturnType).type_expression();
        if self.eat(SyntaxKind::LParen) {
            self.delimited(SyntaxKind::RParen, TYPE_FIRST, |p| p.type_expression());
        } else {
            self.builder.missing(SyntaxKind::LParen);
        }
        self.finish_node();
    }

    fn tuple_type(&mut self) {
        self.start_node(SyntaxKind::TupleType);
        self.bump();
        self.delimited(SyntaxKind::RParen, TYPE_FIRST, |p| p.type_expression());
        self.finish_node();
    }

    pub(super) fn type_arguments(&mut self) {
        self.start_node(SyntaxKind::TypeArguments);
        self.bump();
        while !self.at_closing_angle() && !self.at_eof() {
            if self.at_set(TYPE_FIRST) {
                self.type_expression();
            } else {
                self.error_until(TokenSet::new(&[
                    SyntaxKind::Comma,
                    SyntaxKind::Gt,
                    SyntaxKind::Semicolon,
                    SyntaxKind::LBrace,
                    SyntaxKind::RBrace,
                    SyntaxKind::LParen,
                ]));
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.close_angle();
        self.finish_node();
    }

    /// `<T, U extends Bound>`
    pub(super) fn type_parameters(&mut self) {
        self.start_node(SyntaxKind::TypeParameters);
        self.bump();
        while !self.at_closing_angle() && !self.at_eof() {
            if !self.at(SyntaxKind::Identifier) {
                break;
            }
            self.start_node(SyntaxKind::TypeParameter);
            self.field(Field::Name).expect_name(SyntaxKind::Identifier);
            if self.eat(SyntaxKind::ExtendsKw) {
                self.field(Field::Bound).type_expression();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.close_angle();
        self.finish_node();
    }

    fn at_closing_angle(&self) -> bool {
        matches!(
            self.current(),
            SyntaxKind::Gt | SyntaxKind::Shr | SyntaxKind::Ushr | SyntaxKind::GtEq | SyntaxKind::ShrEq | SyntaxKind::UshrEq
        )
    }

    /// Consumes one `>`, splitting `>>`, `>>>` and `>=` style tokens when nested
    /// argument lists close together.
    fn close_angle(&mut self) {
        let rest = match self.current() {
            SyntaxKind::Shr => Some(SyntaxKind::Gt),
            SyntaxKind::Ushr => Some(SyntaxKind::Shr),
            SyntaxKind::GtEq => Some(SyntaxKind::Eq),
            SyntaxKind::ShrEq => Some(SyntaxKind::GtEq),
            SyntaxKind::UshrEq => Some(SyntaxKind::ShrEq),
            _ => None,
        };
        if let Some(rest) = rest {
            let token = self.tokens[self.pos];
            let mut head = token;
            head.kind = SyntaxKind::Gt;
            head.end = token.start + 1;
            let mut tail = token;
            tail.kind = rest;
            tail.start = head.end;
            self.tokens[self.pos] = head;
            self.tokens.insert(self.pos + 1, tail);
        }
        self.expect(SyntaxKind::Gt);
    }

    /// Index just past a type starting at token `index`, if one can be read there.
    /// Pure lookahead; nothing is consumed.
    pub(super) fn skip_type(&self, index: usize) -> Option<usize> {
        let mut i = index;
        match self.kind_at(i) {
            SyntaxKind::Identifier => {
                i += 1;
                while self.kind_at(i) == SyntaxKind::Dot && self.kind_at(i + 1) == SyntaxKind::Identifier {
                    i += 2;
                }
                if self.kind_at(i) == SyntaxKind::Lt {
                    i = self.skip_angles(i)?;
                }
            }
            SyntaxKind::FunctionKw => {
                i = self.skip_type(i + 1)?;
                if self.kind_at(i) != SyntaxKind::LParen {
                    return None;
                }
                i = self.skip_parens(i)?;
            }
            SyntaxKind::LParen => {
                i += 1;
                loop {
                    i = self.skip_type(i)?;
                    match self.kind_at(i) {
                        SyntaxKind::Comma => i += 1,
                        SyntaxKind::RParen => {
                            i += 1;
                            break;
                        }
                        _ => return None,
                    }
                }
            }
            _ => return None,
        }
        loop {
            match self.kind_at(i) {
                SyntaxKind::Question => i += 1,
                SyntaxKind::LBracket if self.kind_at(i + 1) == SyntaxKind::RBracket => i += 2,
                _ => return Some(i),
            }
        }
    }

    fn skip_angles(&self, index: usize) -> Option<usize> {
        let mut depth: i32 = 0;
        let mut i = index;
        loop {
            depth += match self.kind_at(i) {
                SyntaxKind::Lt => 1,
                SyntaxKind::Gt => -1,
                SyntaxKind::Shr => -2,
                SyntaxKind::Ushr => -3,
                SyntaxKind::Identifier
                | SyntaxKind::Comma
                | SyntaxKind::Dot
                | SyntaxKind::Question
                | SyntaxKind::ExtendsKw
                | SyntaxKind::FunctionKw
                | SyntaxKind::LParen
                | SyntaxKind::RParen
                | SyntaxKind::LBracket
                | SyntaxKind::RBracket => 0,
                _ => return None,
            };
            i += 1;
            if depth <= 0 {
                return (depth == 0).then_some(i);
            }
        }
    }

    pub(super) fn skip_parens(&self, index: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = index;
        loop {
            match self.kind_at(i) {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                SyntaxKind::Eof | SyntaxKind::LBrace | SyntaxKind::RBrace | SyntaxKind::Semicolon => return None,
                _ => {}
            }
            i += 1;
        }
    }

    /// A type followed by a name at token `index`; returns the index of the name.
    pub(super) fn typed_name_at(&self, index: usize) -> Option<usize> {
        let after = self.skip_type(index)?;
        (self.kind_at(after) == SyntaxKind::Identifier).then_some(after)
    }
}

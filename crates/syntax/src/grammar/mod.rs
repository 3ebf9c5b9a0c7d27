//! Recursive-descent XTC grammar.
//!
//! The grammar never fails. A required token that is absent becomes a zero-width
//! `MISSING` node, and tokens that fit nowhere are wrapped in `ERROR` nodes up to the
//! next token in the current recovery set.

mod expressions;
mod items;
mod statements;
mod types;

use crate::builder::{Checkpoint, TreeBuilder};
use crate::kind::{Field, SyntaxKind, TokenSet};
use crate::lexer::{Lexed, Token};
use crate::tree::FieldKey;
use rowan::GreenNode;
use std::collections::HashMap;

/// Deeper nesting than this is swallowed into an error node instead of recursing.
const MAX_DEPTH: u32 = 160;

pub(crate) fn parse(text: &str) -> (GreenNode, HashMap<FieldKey, Field>) {
    let lexed = crate::lexer::lex(text);
    let mut parser = GrammarParser::new(text, lexed);
    parser.source_file();
    parser.flush_all_trivia();
    parser.builder.finish()
}

pub(crate) struct GrammarParser<'s> {
    tokens: Vec<Token>,
    trivia: Vec<Token>,
    next_trivia: usize,
    pos: usize,
    depth: u32,
    builder: TreeBuilder<'s>,
}

impl<'s> GrammarParser<'s> {
    fn new(text: &'s str, lexed: Lexed) -> Self {
        Self {
            tokens: lexed.tokens,
            trivia: lexed.trivia,
            next_trivia: 0,
            pos: 0,
            depth: 0,
            builder: TreeBuilder::new(text),
        }
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map_or(SyntaxKind::Eof, |t| t.kind)
    }

    fn kind_at(&self, index: usize) -> SyntaxKind {
        self.tokens.get(index).map_or(SyntaxKind::Eof, |t| t.kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_set(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    fn at_eof(&self) -> bool {
        self.at(SyntaxKind::Eof)
    }

    /// Emits whitespace and comments that precede the current token into the open node.
    fn flush_trivia(&mut self) {
        let limit = self.tokens.get(self.pos).map_or(usize::MAX, |t| t.start);
        while let Some(trivia) = self.trivia.get(self.next_trivia) {
            if trivia.start >= limit {
                break;
            }
            self.builder.trivia(trivia);
            self.next_trivia += 1;
        }
    }

    fn flush_all_trivia(&mut self) {
        while let Some(trivia) = self.trivia.get(self.next_trivia) {
            self.builder.trivia(trivia);
            self.next_trivia += 1;
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.flush_trivia();
        self.builder.start_node(kind);
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.flush_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind);
    }

    fn field(&mut self, field: Field) -> &mut Self {
        self.builder.set_field(field);
        self
    }

    fn bump(&mut self) {
        let kind = self.current();
        self.bump_as(kind);
    }

    /// Consumes the current token as a leaf of type `kind`.
    fn bump_as(&mut self, kind: SyntaxKind) {
        if self.at_eof() {
            return;
        }
        self.flush_trivia();
        let token = self.tokens[self.pos];
        self.builder.token(kind, &token);
        self.pos += 1;
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        self.builder.missing(kind);
        false
    }

    /// A name token remapped to `kind` (`identifier` or `type_name`), or a missing one.
    fn expect_name(&mut self, kind: SyntaxKind) -> bool {
        if self.at(SyntaxKind::Identifier) {
            self.bump_as(kind);
            true
        } else {
            self.builder.missing(kind);
            false
        }
    }

    /// `;` terminator. Junk before it is wrapped into an error node.
    fn expect_semicolon(&mut self) {
        if self.eat(SyntaxKind::Semicolon) {
            return;
        }
        if self.at_set(SEMICOLON_FOLLOW) || self.at_eof() {
            self.builder.missing(SyntaxKind::Semicolon);
            return;
        }
        self.error_until(SEMICOLON_FOLLOW.union(TokenSet::new(&[SyntaxKind::Semicolon])));
        if !self.eat(SyntaxKind::Semicolon) {
            self.builder.missing(SyntaxKind::Semicolon);
        }
    }

    /// Wraps tokens into an `ERROR` node until one in `recovery` (or the end) is reached.
    /// Always consumes at least one token unless already at the end.
    fn error_until(&mut self, recovery: TokenSet) {
        if self.at_eof() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.skip_balanced();
        while !self.at_eof() && !self.at_set(recovery) {
            self.skip_balanced();
        }
        self.finish_node();
    }

    /// Consumes one token, or a whole bracketed group when it opens one.
    fn skip_balanced(&mut self) {
        let close = match self.current() {
            SyntaxKind::LBrace => SyntaxKind::RBrace,
            SyntaxKind::LParen => SyntaxKind::RParen,
            SyntaxKind::LBracket => SyntaxKind::RBracket,
            _ => {
                self.bump();
                return;
            }
        };
        self.bump();
        while !self.at_eof() && !self.at(close) {
            self.skip_balanced();
        }
        self.eat(close);
    }

    /// Enters one nesting level; `false` means the limit is hit and the caller must bail.
    fn enter(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            if !self.at_eof() {
                self.start_node(SyntaxKind::Error);
                self.skip_balanced();
                self.finish_node();
            }
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Comma-separated items up to `close`, which is expected afterwards.
    fn delimited(&mut self, close: SyntaxKind, item_first: TokenSet, mut item: impl FnMut(&mut Self)) {
        let recovery = TokenSet::new(&[SyntaxKind::Comma, SyntaxKind::Semicolon, SyntaxKind::LBrace, SyntaxKind::RBrace])
            .union(TokenSet::new(&[close]));
        while !self.at(close) && !self.at_eof() {
            if self.at_set(item_first) {
                item(self);
            } else if self.at_set(recovery) {
                if !self.at(SyntaxKind::Comma) {
                    break;
                }
            } else {
                self.error_until(recovery);
                continue;
            }
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.expect(close);
    }
}

/// Tokens that end a statement-level error or begin the next statement.
pub(crate) const SEMICOLON_FOLLOW: TokenSet = TokenSet::new(&[
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
    SyntaxKind::ClassKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::MixinKw,
    SyntaxKind::ServiceKw,
    SyntaxKind::EnumKw,
    SyntaxKind::ImportKw,
    SyntaxKind::ModuleKw,
    SyntaxKind::PackageKw,
    SyntaxKind::PublicKw,
    SyntaxKind::PrivateKw,
    SyntaxKind::ProtectedKw,
    SyntaxKind::ConstructKw,
]);

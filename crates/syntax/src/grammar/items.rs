use super::GrammarParser;
use crate::builder::Checkpoint;
use super::types::TYPE_FIRST;
use crate::kind::{Field, SyntaxKind, TokenSet};

const TYPE_DECLARATION_KEYWORDS: TokenSet = TokenSet::new(&[
    SyntaxKind::ClassKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::MixinKw,
    SyntaxKind::ServiceKw,
    SyntaxKind::ConstKw,
    SyntaxKind::EnumKw,
]);

const MODIFIERS: TokenSet = TokenSet::new(&[
    SyntaxKind::PublicKw,
    SyntaxKind::PrivateKw,
    SyntaxKind::ProtectedKw,
    SyntaxKind::StaticKw,
    SyntaxKind::AbstractKw,
]);

/// Where an unparseable member ends.
const MEMBER_RECOVERY: TokenSet = TokenSet::new(&[
    SyntaxKind::RBrace,
    SyntaxKind::At,
    SyntaxKind::ModuleKw,
    SyntaxKind::PackageKw,
    SyntaxKind::ImportKw,
    SyntaxKind::ClassKw,
    SyntaxKind::InterfaceKw,
    SyntaxKind::MixinKw,
    SyntaxKind::ServiceKw,
    SyntaxKind::ConstKw,
    SyntaxKind::EnumKw,
    SyntaxKind::PublicKw,
    SyntaxKind::PrivateKw,
    SyntaxKind::ProtectedKw,
    SyntaxKind::StaticKw,
    SyntaxKind::AbstractKw,
    SyntaxKind::ConstructKw,
]);

const PARAMETER_FIRST: TokenSet = TYPE_FIRST.union(TokenSet::new(&[SyntaxKind::At]));

impl GrammarParser<'_> {
    pub(super) fn source_file(&mut self) {
        self.builder.start_node(SyntaxKind::SourceFile);
        while !self.at_eof() {
            if self.at(SyntaxKind::RBrace) {
                self.error_until(MEMBER_RECOVERY.union(TokenSet::new(&[SyntaxKind::Identifier])));
                continue;
            }
            self.member();
        }
    }

    /// Members of `module`, `package` and class-like bodies, up to the closing brace.
    fn member_list(&mut self) {
        while !self.at(SyntaxKind::RBrace) && !self.at_eof() {
            self.member();
        }
        self.expect(SyntaxKind::RBrace);
    }

    /// One declaration. Annotations and modifiers are parsed before the declaration kind
    /// is known, then adopted by the declaration node.
    fn member(&mut self) {
        if !self.enter() {
            return;
        }
        let checkpoint = self.checkpoint();
        let mut prefixed = false;
        while self.at(SyntaxKind::At) {
            self.annotation();
            prefixed = true;
        }
        while self.at_set(MODIFIERS) {
            self.modifier();
            prefixed = true;
        }

        match self.current() {
            SyntaxKind::ModuleKw => self.module_declaration(checkpoint),
            SyntaxKind::PackageKw => self.package_declaration(checkpoint),
            SyntaxKind::ImportKw if !prefixed => self.import_statement(),
            kind if TYPE_DECLARATION_KEYWORDS.contains(kind) => self.type_declaration(checkpoint),
            SyntaxKind::ConstructKw => self.constructor_declaration(checkpoint),
            SyntaxKind::FinallyKw if self.nth(1) == SyntaxKind::LParen => {
                self.constructor_declaration(checkpoint)
            }
            SyntaxKind::Lt => self.method_or_property(checkpoint),
            kind if TYPE_FIRST.contains(kind) => self.method_or_property(checkpoint),
            _ if prefixed => {
                self.start_node_at(checkpoint, SyntaxKind::Error);
                self.finish_node();
            }
            _ => self.error_until(MEMBER_RECOVERY),
        }
        self.leave();
    }

    pub(super) fn annotation(&mut self) {
        self.start_node(SyntaxKind::Annotation);
        self.bump();
        self.field(Field::Name).expect_name(SyntaxKind::Identifier);
        while self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Identifier {
            self.bump();
            self.bump();
        }
        if self.at(SyntaxKind::LParen) {
            self.field(Field::Arguments).arguments();
        }
        self.finish_node();
    }

    fn modifier(&mut self) {
        match self.current() {
            SyntaxKind::PublicKw | SyntaxKind::PrivateKw | SyntaxKind::ProtectedKw => {
                self.start_node(SyntaxKind::VisibilityModifier);
                self.bump();
                self.finish_node();
            }
            _ => self.bump(),
        }
    }

    fn module_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::ModuleDeclaration);
        self.bump();
        self.field(Field::Name).qualified_name();
        if self.at(SyntaxKind::LBrace) {
            self.field(Field::Body).body(SyntaxKind::ModuleBody);
        } else {
            self.eat(SyntaxKind::Semicolon);
        }
        self.finish_node();
    }

    fn package_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::PackageDeclaration);
        self.bump();
        self.field(Field::Name).expect_name(SyntaxKind::Identifier);
        if self.at(SyntaxKind::LBrace) {
            self.field(Field::Body).body(SyntaxKind::PackageBody);
        } else if self.at(SyntaxKind::ImportKw) {
            self.bump();
            self.field(Field::Path).qualified_name();
            self.expect_semicolon();
        } else {
            self.expect_semicolon();
        }
        self.finish_node();
    }

    pub(super) fn body(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.member_list();
        self.finish_node();
    }

    /// `import a.b.C [as D];`
    fn import_statement(&mut self) {
        self.start_node(SyntaxKind::ImportStatement);
        self.bump();
        self.field(Field::Path).qualified_name();
        if self.eat(SyntaxKind::AsKw) {
            self.field(Field::Alias).expect_name(SyntaxKind::Identifier);
        }
        self.expect_semicolon();
        self.finish_node();
    }

    pub(super) fn qualified_name(&mut self) {
        self.start_node(SyntaxKind::QualifiedName);
        self.expect_name(SyntaxKind::Identifier);
        while self.at(SyntaxKind::Dot) {
            self.bump();
            self.expect_name(SyntaxKind::Identifier);
        }
        self.finish_node();
    }

    fn type_declaration(&mut self, checkpoint: Checkpoint) {
        let (kind, body_kind) = match self.current() {
            SyntaxKind::InterfaceKw => (SyntaxKind::InterfaceDeclaration, SyntaxKind::ClassBody),
            SyntaxKind::MixinKw => (SyntaxKind::MixinDeclaration, SyntaxKind::ClassBody),
            SyntaxKind::ServiceKw => (SyntaxKind::ServiceDeclaration, SyntaxKind::ClassBody),
            SyntaxKind::ConstKw => (SyntaxKind::ConstDeclaration, SyntaxKind::ClassBody),
            SyntaxKind::EnumKw => (SyntaxKind::EnumDeclaration, SyntaxKind::EnumBody),
            _ => (SyntaxKind::ClassDeclaration, SyntaxKind::ClassBody),
        };
        self.start_node_at(checkpoint, kind);
        self.bump();
        self.field(Field::Name).expect_name(SyntaxKind::TypeName);
        if self.at(SyntaxKind::Lt) {
            self.field(Field::TypeParameters).type_parameters();
        }
        if self.at(SyntaxKind::LParen) {
            self.field(Field::Parameters).parameters();
        }
        self.type_clauses();

        if self.at(SyntaxKind::LBrace) {
            if body_kind == SyntaxKind::EnumBody {
                self.field(Field::Body).enum_body();
            } else {
                self.field(Field::Body).body(SyntaxKind::ClassBody);
            }
        } else if !self.eat(SyntaxKind::Semicolon) {
            self.builder.missing(SyntaxKind::LBrace);
        }
        self.finish_node();
    }

    fn type_clauses(&mut self) {
        loop {
            let (clause, field) = match self.current() {
                SyntaxKind::ExtendsKw => (SyntaxKind::ExtendsClause, Field::Superclass),
                SyntaxKind::ImplementsKw => (SyntaxKind::ImplementsClause, Field::Interfaces),
                SyntaxKind::IncorporatesKw => (SyntaxKind::IncorporatesClause, Field::Interfaces),
                SyntaxKind::IntoKw => (SyntaxKind::IntoClause, Field::Type),
                _ => return,
            };
            self.start_node(clause);
            self.bump();
            loop {
                self.field(field).type_expression();
                if self.at(SyntaxKind::LParen) {
                    self.field(Field::Arguments).arguments();
                }
                if !self.eat(SyntaxKind::Comma) {
                    break;
                }
            }
            self.finish_node();
        }
    }

    /// `{ A, B(1) { ... }; members }`
    fn enum_body(&mut self) {
        self.start_node(SyntaxKind::EnumBody);
        self.bump();
        while self.at(SyntaxKind::Identifier) || self.at(SyntaxKind::At) {
            // A member (`String name;`) starts with a type followed by a name.
            if self.at(SyntaxKind::Identifier) && self.typed_name_at(self.pos).is_some() {
                break;
            }
            self.enum_value();
            if !self.eat(SyntaxKind::Comma) {
                break;
            }
        }
        self.eat(SyntaxKind::Semicolon);
        self.member_list();
        self.finish_node();
    }

    fn enum_value(&mut self) {
        self.start_node(SyntaxKind::EnumValue);
        while self.at(SyntaxKind::At) {
            self.annotation();
        }
        self.field(Field::Name).expect_name(SyntaxKind::Identifier);
        if self.at(SyntaxKind::LParen) {
            self.field(Field::Arguments).arguments();
        }
        if self.at(SyntaxKind::LBrace) {
            self.field(Field::Body).body(SyntaxKind::ClassBody);
        }
        self.finish_node();
    }

    fn constructor_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration);
        self.bump();
        self.field(Field::Parameters).parameters();
        self.method_body();
        self.finish_node();
    }

    /// `[<T>] Type name(...) body` or `Type name [= value];`. Which one is decided after
    /// the type and name have been read.
    fn method_or_property(&mut self, checkpoint: Checkpoint) {
        let generic_prefix = self.at(SyntaxKind::Lt);
        if generic_prefix {
            self.type_parameters();
        }
        self.type_expression();
        let is_method = generic_prefix
            || matches!(self.nth(1), SyntaxKind::LParen | SyntaxKind::Lt)
            || (!self.at(SyntaxKind::Identifier) && self.at(SyntaxKind::LParen));

        if is_method {
            self.start_node_at(checkpoint, SyntaxKind::MethodDeclaration);
            self.builder.set_last_child_field(Field::ReturnType);
            if generic_prefix {
                self.builder
                    .set_child_field(SyntaxKind::TypeParameters, Field::TypeParameters);
            }
            self.field(Field::Name).expect_name(SyntaxKind::Identifier);
            if self.at(SyntaxKind::Lt) {
                self.field(Field::TypeParameters).type_parameters();
            }
            self.field(Field::Parameters).parameters();
            self.method_body();
        } else {
            self.start_node_at(checkpoint, SyntaxKind::PropertyDeclaration);
            self.builder.set_last_child_field(Field::Type);
            self.field(Field::Name).expect_name(SyntaxKind::Identifier);
            if self.eat(SyntaxKind::Eq) {
                self.field(Field::Value).expression();
                self.expect_semicolon();
            } else if self.at(SyntaxKind::LBrace) {
                self.field(Field::Body).block();
            } else {
                self.expect_semicolon();
            }
        }
        self.finish_node();
    }

    fn method_body(&mut self) {
        if self.at(SyntaxKind::LBrace) {
            self.field(Field::Body).block();
        } else {
            self.expect_semicolon();
        }
    }

    /// `(Type name [= default], ...)`
    pub(super) fn parameters(&mut self) {
        self.start_node(SyntaxKind::Parameters);
        if !self.expect(SyntaxKind::LParen) {
            self.finish_node();
            return;
        }
        self.delimited(SyntaxKind::RParen, PARAMETER_FIRST, |p| p.parameter());
        self.finish_node();
    }

    fn parameter(&mut self) {
        self.start_node(SyntaxKind::Parameter);
        while self.at(SyntaxKind::At) {
            self.annotation();
        }
        self.field(Field::Type).type_expression();
        self.field(Field::Name).expect_name(SyntaxKind::Identifier);
        if self.eat(SyntaxKind::Eq) {
            self.field(Field::Value).expression();
        }
        self.finish_node();
    }
}

//! Node and token kinds of the XTC grammar.
//!
//! Tokens come first so that every token kind fits in a [`TokenSet`] bitset. The
//! lexer is derived on the same enum; node kinds carry no token patterns.

use logos::Logos;

macro_rules! syntax_kinds {
    ($($(#[$($attr:tt)*])* $variant:ident => $name:literal,)*) => {
        /// Every token and node type the grammar can produce.
        #[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum SyntaxKind {
            $($(#[$($attr)*])* $variant,)*
        }

        impl SyntaxKind {
            pub const ALL: &'static [SyntaxKind] = &[$(SyntaxKind::$variant,)*];

            /// Grammar name of this kind, e.g. `class_declaration` or `{`.
            pub fn name(self) -> &'static str {
                match self {
                    $(SyntaxKind::$variant => $name,)*
                }
            }
        }
    };
}

syntax_kinds! {
    Eof => "end",
    // unterminated quoted literals
    #[regex(r#""([^"\\\n]|\\[^\n])*"#)]
    #[regex(r#"\$"([^"\\\n]|\\[^\n])*"#)]
    #[regex(r"'([^'\\\n]|\\[^\n])*")]
    ErrorToken => "error_token",
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace => "whitespace",
    // named tokens
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier => "identifier",
    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xXbB][0-9A-Fa-f_]*")]
    IntegerLiteral => "integer_literal",
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    FloatLiteral => "float_literal",
    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    StringLiteral => "string_literal",
    #[regex(r#"\$"([^"\\\n]|\\[^\n])*""#)]
    TemplateStringLiteral => "template_string_literal",
    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    CharLiteral => "char_literal",
    #[regex(r"//[^\n]*")]
    #[token("/*", crate::lexer::block_comment)]
    Comment => "comment",
    DocComment => "doc_comment",
    // keywords
    #[token("module")]
    ModuleKw => "module",
    #[token("package")]
    PackageKw => "package",
    #[token("import")]
    ImportKw => "import",
    #[token("as")]
    AsKw => "as",
    #[token("class")]
    ClassKw => "class",
    #[token("interface")]
    InterfaceKw => "interface",
    #[token("mixin")]
    MixinKw => "mixin",
    #[token("service")]
    ServiceKw => "service",
    #[token("const")]
    ConstKw => "const",
    #[token("enum")]
    EnumKw => "enum",
    #[token("public")]
    PublicKw => "public",
    #[token("private")]
    PrivateKw => "private",
    #[token("protected")]
    ProtectedKw => "protected",
    #[token("static")]
    StaticKw => "static",
    #[token("abstract")]
    AbstractKw => "abstract",
    #[token("extends")]
    ExtendsKw => "extends",
    #[token("implements")]
    ImplementsKw => "implements",
    #[token("incorporates")]
    IncorporatesKw => "incorporates",
    #[token("into")]
    IntoKw => "into",
    #[token("construct")]
    ConstructKw => "construct",
    #[token("finally")]
    FinallyKw => "finally",
    #[token("val")]
    ValKw => "val",
    #[token("var")]
    VarKw => "var",
    #[token("if")]
    IfKw => "if",
    #[token("else")]
    ElseKw => "else",
    #[token("for")]
    ForKw => "for",
    #[token("while")]
    WhileKw => "while",
    #[token("do")]
    DoKw => "do",
    #[token("switch")]
    SwitchKw => "switch",
    #[token("case")]
    CaseKw => "case",
    #[token("default")]
    DefaultKw => "default",
    #[token("try")]
    TryKw => "try",
    #[token("catch")]
    CatchKw => "catch",
    #[token("return")]
    ReturnKw => "return",
    #[token("break")]
    BreakKw => "break",
    #[token("continue")]
    ContinueKw => "continue",
    #[token("assert")]
    AssertKw => "assert",
    #[token("new")]
    NewKw => "new",
    #[token("function")]
    FunctionKw => "function",
    #[token("True")]
    TrueKw => "True",
    #[token("False")]
    FalseKw => "False",
    #[token("Null")]
    NullKw => "Null",
    #[token("this")]
    ThisKw => "this",
    // punctuation
    #[token("{")]
    LBrace => "{",
    #[token("}")]
    RBrace => "}",
    #[token("(")]
    LParen => "(",
    #[token(")")]
    RParen => ")",
    #[token("[")]
    LBracket => "[",
    #[token("]")]
    RBracket => "]",
    #[token("<")]
    Lt => "<",
    #[token(">")]
    Gt => ">",
    #[token(";")]
    Semicolon => ";",
    #[token(",")]
    Comma => ",",
    #[token(".")]
    Dot => ".",
    #[token("?.")]
    QuestionDot => "?.",
    #[token(":")]
    Colon => ":",
    #[token("?")]
    Question => "?",
    #[token("@")]
    At => "@",
    #[token("=")]
    Eq => "=",
    #[token("+=")]
    PlusEq => "+=",
    #[token("-=")]
    MinusEq => "-=",
    #[token("*=")]
    StarEq => "*=",
    #[token("/=")]
    SlashEq => "/=",
    #[token("%=")]
    PercentEq => "%=",
    #[token("&=")]
    AmpEq => "&=",
    #[token("|=")]
    PipeEq => "|=",
    #[token("^=")]
    CaretEq => "^=",
    #[token("<<=")]
    ShlEq => "<<=",
    #[token(">>=")]
    ShrEq => ">>=",
    #[token(">>>=")]
    UshrEq => ">>>=",
    #[token(":=")]
    ColonEq => ":=",
    #[token("?:")]
    Elvis => "?:",
    #[token("||")]
    OrOr => "||",
    #[token("&&")]
    AndAnd => "&&",
    #[token("|")]
    Pipe => "|",
    #[token("^")]
    Caret => "^",
    #[token("&")]
    Amp => "&",
    #[token("==")]
    EqEq => "==",
    #[token("!=")]
    NotEq => "!=",
    #[token("<=")]
    LtEq => "<=",
    #[token(">=")]
    GtEq => ">=",
    #[token("<=>")]
    Spaceship => "<=>",
    #[token("..")]
    DotDot => "..",
    #[token("<<")]
    Shl => "<<",
    #[token(">>")]
    Shr => ">>",
    #[token(">>>")]
    Ushr => ">>>",
    #[token("+")]
    Plus => "+",
    #[token("-")]
    Minus => "-",
    #[token("*")]
    Star => "*",
    #[token("/")]
    Slash => "/",
    #[token("%")]
    Percent => "%",
    #[token("->")]
    Arrow => "->",
    #[token("!")]
    Bang => "!",
    #[token("~")]
    Tilde => "~",
    #[token("++")]
    PlusPlus => "++",
    #[token("--")]
    MinusMinus => "--",
    // nodes
    SourceFile => "source_file",
    ModuleDeclaration => "module_declaration",
    ModuleBody => "module_body",
    PackageDeclaration => "package_declaration",
    PackageBody => "package_body",
    ImportStatement => "import_statement",
    QualifiedName => "qualified_name",
    ClassDeclaration => "class_declaration",
    InterfaceDeclaration => "interface_declaration",
    MixinDeclaration => "mixin_declaration",
    ServiceDeclaration => "service_declaration",
    ConstDeclaration => "const_declaration",
    EnumDeclaration => "enum_declaration",
    ClassBody => "class_body",
    EnumBody => "enum_body",
    EnumValue => "enum_value",
    ExtendsClause => "extends_clause",
    ImplementsClause => "implements_clause",
    IncorporatesClause => "incorporates_clause",
    IntoClause => "into_clause",
    PropertyDeclaration => "property_declaration",
    MethodDeclaration => "method_declaration",
    ConstructorDeclaration => "constructor_declaration",
    TypeParameters => "type_parameters",
    TypeParameter => "type_parameter",
    Parameters => "parameters",
    Parameter => "parameter",
    TypeExpression => "type_expression",
    GenericType => "generic_type",
    NullableType => "nullable_type",
    FunctionType => "function_type",
    TupleType => "tuple_type",
    ArrayType => "array_type",
    TypeArguments => "type_arguments",
    Annotation => "annotation",
    Arguments => "arguments",
    VisibilityModifier => "visibility_modifier",
    Block => "block",
    VariableDeclaration => "variable_declaration",
    IfStatement => "if_statement",
    ForStatement => "for_statement",
    WhileStatement => "while_statement",
    DoStatement => "do_statement",
    SwitchStatement => "switch_statement",
    CaseClause => "case_clause",
    TryStatement => "try_statement",
    CatchClause => "catch_clause",
    FinallyClause => "finally_clause",
    ReturnStatement => "return_statement",
    BreakStatement => "break_statement",
    ContinueStatement => "continue_statement",
    AssertStatement => "assert_statement",
    ExpressionStatement => "expression_statement",
    AssignmentExpression => "assignment_expression",
    TernaryExpression => "ternary_expression",
    BinaryExpression => "binary_expression",
    UnaryExpression => "unary_expression",
    PostfixExpression => "postfix_expression",
    CallExpression => "call_expression",
    MemberExpression => "member_expression",
    IndexExpression => "index_expression",
    NewExpression => "new_expression",
    LambdaExpression => "lambda_expression",
    ParenthesizedExpression => "parenthesized_expression",
    ListLiteral => "list_literal",
    MapLiteral => "map_literal",
    MapEntry => "map_entry",
    TypeName => "type_name",
    BooleanLiteral => "boolean_literal",
    NullLiteral => "null_literal",
    ThisExpression => "this_expression",
    Error => "ERROR",
}

impl SyntaxKind {
    pub fn id(self) -> u16 {
        self as u16
    }

    pub fn from_id(id: u16) -> Option<SyntaxKind> {
        Self::ALL.get(id as usize).copied()
    }

    /// Named kinds are the ones a query can match with `(kind)`; the rest are
    /// keywords and punctuation matched with `"text"`.
    pub fn is_named(self) -> bool {
        (self >= SyntaxKind::Identifier && self <= SyntaxKind::DocComment)
            || self >= SyntaxKind::SourceFile
    }

    pub fn is_token(self) -> bool {
        self < SyntaxKind::SourceFile
    }

    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::ModuleKw && self <= SyntaxKind::ThisKw
    }

    pub fn is_comment(self) -> bool {
        matches!(self, SyntaxKind::Comment | SyntaxKind::DocComment)
    }

    /// Whitespace and comments, which the grammar skips over.
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::Whitespace | SyntaxKind::Comment | SyntaxKind::DocComment)
    }
}

/// Raw kinds stored in the green tree carry the kind id in the low bits and the
/// error flags above it.
pub(crate) const KIND_MASK: u16 = 0x3fff;
pub(crate) const MISSING_BIT: u16 = 1 << 14;
pub(crate) const HAS_ERROR_BIT: u16 = 1 << 15;

/// Language tag parameterizing the rowan tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum XtcLanguage {}

impl rowan::Language for XtcLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_id(raw.0 & KIND_MASK).unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.id())
    }
}

/// Names of child slots, e.g. the `name` of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Field {
    Name,
    Type,
    ReturnType,
    Parameters,
    TypeParameters,
    Body,
    Value,
    Key,
    Path,
    Alias,
    Function,
    Arguments,
    TypeArguments,
    Object,
    Member,
    Index,
    Bound,
    Condition,
    Left,
    Right,
    Operator,
    Operand,
    Consequence,
    Alternative,
    Superclass,
    Interfaces,
    Element,
}

impl Field {
    pub const ALL: &'static [Field] = &[
        Field::Name,
        Field::Type,
        Field::ReturnType,
        Field::Parameters,
        Field::TypeParameters,
        Field::Body,
        Field::Value,
        Field::Key,
        Field::Path,
        Field::Alias,
        Field::Function,
        Field::Arguments,
        Field::TypeArguments,
        Field::Object,
        Field::Member,
        Field::Index,
        Field::Bound,
        Field::Condition,
        Field::Left,
        Field::Right,
        Field::Operator,
        Field::Operand,
        Field::Consequence,
        Field::Alternative,
        Field::Superclass,
        Field::Interfaces,
        Field::Element,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Type => "type",
            Field::ReturnType => "return_type",
            Field::Parameters => "parameters",
            Field::TypeParameters => "type_parameters",
            Field::Body => "body",
            Field::Value => "value",
            Field::Key => "key",
            Field::Path => "path",
            Field::Alias => "alias",
            Field::Function => "function",
            Field::Arguments => "arguments",
            Field::TypeArguments => "type_arguments",
            Field::Object => "object",
            Field::Member => "member",
            Field::Index => "index",
            Field::Bound => "bound",
            Field::Condition => "condition",
            Field::Left => "left",
            Field::Right => "right",
            Field::Operator => "operator",
            Field::Operand => "operand",
            Field::Consequence => "consequence",
            Field::Alternative => "alternative",
            Field::Superclass => "superclass",
            Field::Interfaces => "interfaces",
            Field::Element => "element",
        }
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

/// Bitset over token kinds, used for FIRST and recovery sets.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenSet(u128);

impl TokenSet {
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u128;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 128, "token kind exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        kind < 128 && self.0 & (1 << kind) != 0
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_set();
        for kind in SyntaxKind::ALL.iter().filter(|k| self.contains(**k)) {
            list.entry(&kind.name());
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tokens_fit_in_token_set() {
        assert!((SyntaxKind::MinusMinus as u16) < 128);
        assert!(SyntaxKind::SourceFile.is_named());
        assert!(!SyntaxKind::SourceFile.is_token());
    }

    #[test]
    fn test_named_and_anonymous() {
        assert!(SyntaxKind::Identifier.is_named());
        assert!(SyntaxKind::DocComment.is_named());
        assert!(!SyntaxKind::ClassKw.is_named());
        assert!(!SyntaxKind::LBrace.is_named());
        assert!(SyntaxKind::Error.is_named());
    }

    #[test]
    fn test_ids_round_trip() {
        for kind in SyntaxKind::ALL {
            assert_eq!(SyntaxKind::from_id(kind.id()), Some(*kind));
        }
    }

    #[test]
    fn test_keywords_and_trivia() {
        assert!(SyntaxKind::ClassKw.is_keyword());
        assert!(SyntaxKind::ThisKw.is_keyword());
        assert!(!SyntaxKind::LBrace.is_keyword());
        assert!(SyntaxKind::Whitespace.is_trivia());
        assert!(SyntaxKind::DocComment.is_trivia());
        assert!(!SyntaxKind::Whitespace.is_named());
    }

    #[test]
    fn test_raw_kinds_strip_flags() {
        use rowan::Language as _;
        let raw = rowan::SyntaxKind(SyntaxKind::Identifier.id() | MISSING_BIT | HAS_ERROR_BIT);
        assert_eq!(XtcLanguage::kind_from_raw(raw), SyntaxKind::Identifier);
        assert!((SyntaxKind::Error.id()) < KIND_MASK);
    }

    #[test]
    fn test_token_set() {
        let set = TokenSet::new(&[SyntaxKind::Semicolon, SyntaxKind::RBrace]);
        assert!(set.contains(SyntaxKind::Semicolon));
        assert!(!set.contains(SyntaxKind::LBrace));
        assert!(!set.contains(SyntaxKind::SourceFile));
        let both = set.union(TokenSet::new(&[SyntaxKind::LBrace]));
        assert!(both.contains(SyntaxKind::LBrace));
    }

    #[test]
    fn test_field_names() {
        for field in Field::ALL {
            assert_eq!(Field::from_name(field.name()), Some(*field));
        }
        assert_eq!(Field::from_name("nope"), None);
    }
}

//! Classifies syntax nodes into semantic tokens and packs them into the
//! five-integers-per-token delta format editors consume.

use super::legend::{TokenModifier, TokenType};
use std::collections::HashSet;
use xtc_syntax::SyntaxNode;

/// One token before delta encoding. Positions are 0-based, columns in UTF-16 units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawToken {
    pub line: u32,
    pub column: u32,
    pub length: u32,
    pub token_type: u32,
    pub modifiers: u32,
}

impl RawToken {
    pub fn new(line: u32, column: u32, length: u32, token_type: TokenType, modifiers: u32) -> Self {
        Self {
            line,
            column,
            length,
            token_type: token_type.index(),
            modifiers,
        }
    }

    pub fn kind(&self) -> Option<TokenType> {
        TokenType::from_index(self.token_type)
    }

    pub fn has_modifier(&self, modifier: TokenModifier) -> bool {
        self.modifiers & modifier.bit() != 0
    }
}

/// Nodes are identified by start position and node type, so a parent and its first
/// child never shadow each other.
type NodeKey = (usize, usize, &'static str);

fn key(node: &SyntaxNode<'_>) -> NodeKey {
    (node.start_line(), node.start_column(), node.kind())
}

/// Walks a tree once and emits tokens for declarations, type references, calls,
/// member accesses, comments and literals.
#[derive(Debug, Default)]
pub struct SemanticTokenEncoder {
    tokens: Vec<RawToken>,
    classified: HashSet<NodeKey>,
    type_scopes: Vec<Vec<String>>,
}

impl SemanticTokenEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded token data for the tree under `root`.
    pub fn encode(&mut self, root: SyntaxNode<'_>) -> Vec<u32> {
        delta_encode(&self.collect(root))
    }

    /// Tokens under `root`, sorted by position.
    pub fn collect(&mut self, root: SyntaxNode<'_>) -> Vec<RawToken> {
        self.tokens.clear();
        self.classified.clear();
        self.type_scopes.clear();

        self.walk(root);

        let mut tokens = std::mem::take(&mut self.tokens);
        tokens.sort_by_key(|t| (t.line, t.column));
        tokens
    }

    /// Pre-order walk on an explicit stack; `Exit` closes the type scope its node opened.
    fn walk(&mut self, root: SyntaxNode<'_>) {
        enum Step<'t> {
            Enter(SyntaxNode<'t>),
            Exit,
        }

        let mut stack = vec![Step::Enter(root)];
        while let Some(step) = stack.pop() {
            let node = match step {
                Step::Exit => {
                    self.type_scopes.pop();
                    continue;
                }
                Step::Enter(node) => node,
            };
            // an ancestor may already have emitted this node as part of a larger construct
            if self.classified.contains(&key(&node)) {
                continue;
            }
            if self.enter_type_scope(&node) {
                stack.push(Step::Exit);
            }
            self.classify(&node);
            let start = stack.len();
            stack.extend(node.children().map(Step::Enter));
            stack[start..].reverse();
        }
    }

    fn classify(&mut self, node: &SyntaxNode<'_>) {
        let declaration = TokenModifier::Declaration.bit();
        match node.kind() {
            "class_declaration" | "service_declaration" => {
                self.type_declaration(node, TokenType::Class, 0)
            }
            "interface_declaration" | "mixin_declaration" => {
                self.type_declaration(node, TokenType::Interface, 0)
            }
            "const_declaration" => {
                self.type_declaration(node, TokenType::Struct, TokenModifier::Readonly.bit())
            }
            "enum_declaration" => self.type_declaration(node, TokenType::Enum, 0),
            "method_declaration" => self.method(node),
            "constructor_declaration" => {
                if let Some(keyword) = node
                    .children()
                    .find(|c| matches!(c.kind(), "construct" | "finally"))
                {
                    self.emit(&keyword, TokenType::Method, declaration_modifiers(node));
                }
            }
            "property_declaration" => {
                self.typed_binding(node, TokenType::Property, declaration_modifiers(node))
            }
            "variable_declaration" | "catch_clause" => {
                self.typed_binding(node, TokenType::Variable, declaration)
            }
            // for-each loops bind a name directly on the statement
            "for_statement" => self.typed_binding(node, TokenType::Variable, declaration),
            "parameter" => self.typed_binding(node, TokenType::Parameter, declaration),
            "type_parameter" => self.named(node, TokenType::TypeParameter, declaration),
            "enum_value" => self.named(
                node,
                TokenType::EnumMember,
                declaration | TokenModifier::Readonly.bit(),
            ),
            "module_declaration" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.emit(&name, TokenType::Namespace, declaration);
                    self.mark(&name);
                }
            }
            "package_declaration" => self.named(node, TokenType::Namespace, declaration),
            "annotation" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.emit(&name, TokenType::Decorator, 0);
                }
            }
            "type_expression" => self.type_expression(node),
            "call_expression" => self.call(node),
            "member_expression" => self.member_access(node),
            "comment" => self.emit(node, TokenType::Comment, 0),
            "doc_comment" => self.emit(node, TokenType::Comment, TokenModifier::Documentation.bit()),
            "string_literal" | "template_string_literal" | "char_literal" => {
                self.emit(node, TokenType::String, 0)
            }
            "integer_literal" | "float_literal" => self.emit(node, TokenType::Number, 0),
            _ => {}
        }
    }

    fn type_declaration(&mut self, node: &SyntaxNode<'_>, token_type: TokenType, extra: u32) {
        let name = node
            .child_by_field_name("name")
            .or_else(|| node.child_by_type("type_name"));
        if let Some(name) = name {
            self.emit(&name, token_type, declaration_modifiers(node) | extra);
        }
    }

    fn method(&mut self, node: &SyntaxNode<'_>) {
        if let Some(return_type) = node.child_by_field_name("return_type") {
            self.type_expression(&return_type);
        }
        if let Some(name) = node.child_by_field_name("name") {
            self.emit(&name, TokenType::Method, declaration_modifiers(node));
        }
    }

    fn typed_binding(&mut self, node: &SyntaxNode<'_>, token_type: TokenType, modifiers: u32) {
        if let Some(ty) = node.child_by_field_name("type") {
            self.type_expression(&ty);
        }
        self.named(node, token_type, modifiers);
    }

    fn named(&mut self, node: &SyntaxNode<'_>, token_type: TokenType, modifiers: u32) {
        if let Some(name) = node.child_by_field_name("name") {
            self.emit(&name, token_type, modifiers);
        }
    }

    /// Every type name inside a type expression, including generic arguments, nullable
    /// and array elements and function signatures.
    fn type_expression(&mut self, node: &SyntaxNode<'_>) {
        if node.kind() != "type_expression" {
            return;
        }
        self.mark(node);
        for name in node.descendants().filter(|d| d.kind() == "type_name") {
            let token_type = if self.is_type_parameter(name.text()) {
                TokenType::TypeParameter
            } else {
                TokenType::Type
            };
            self.emit(&name, token_type, 0);
        }
    }

    /// Callee names only; the receiver of a member call is classified by the walk.
    fn call(&mut self, node: &SyntaxNode<'_>) {
        let Some(function) = node.child_by_field_name("function") else {
            return;
        };
        match function.kind() {
            "identifier" => self.emit(&function, TokenType::Method, 0),
            "member_expression" => {
                if let Some(member) = function.child_by_field_name("member") {
                    self.emit(&member, TokenType::Method, 0);
                }
            }
            _ => {}
        }
    }

    fn member_access(&mut self, node: &SyntaxNode<'_>) {
        let is_callee = node.field_name() == Some("function")
            && node.parent().is_some_and(|p| p.kind() == "call_expression");
        if is_callee {
            return;
        }
        if let Some(member) = node.child_by_field_name("member") {
            self.emit(&member, TokenType::Property, 0);
        }
    }

    fn enter_type_scope(&mut self, node: &SyntaxNode<'_>) -> bool {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return false;
        };
        let names = params
            .named_children()
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| p.child_by_field_name("name"))
            .filter(|n| !n.is_missing())
            .map(|n| n.text().to_string())
            .collect();
        self.type_scopes.push(names);
        true
    }

    fn is_type_parameter(&self, name: &str) -> bool {
        self.type_scopes
            .iter()
            .any(|scope| scope.iter().any(|n| n == name))
    }

    fn mark(&mut self, node: &SyntaxNode<'_>) {
        self.classified.insert(key(node));
    }

    /// Records a token unless it spans lines, is empty, or was already emitted.
    fn emit(&mut self, node: &SyntaxNode<'_>, token_type: TokenType, modifiers: u32) {
        if node.is_missing() || node.start_line() != node.end_line() {
            return;
        }
        let length = node.end_column().saturating_sub(node.start_column());
        if length == 0 || !self.classified.insert(key(node)) {
            return;
        }
        self.tokens.push(RawToken::new(
            node.start_line() as u32,
            node.start_column() as u32,
            length as u32,
            token_type,
            modifiers,
        ));
    }
}

fn declaration_modifiers(node: &SyntaxNode<'_>) -> u32 {
    let mut modifiers = TokenModifier::Declaration.bit();
    for child in node.children() {
        match child.kind() {
            "static" => modifiers |= TokenModifier::Static.bit(),
            "abstract" => modifiers |= TokenModifier::Abstract.bit(),
            _ => {}
        }
    }
    modifiers
}

/// Token data for the tree under `root`.
pub fn encode(root: SyntaxNode<'_>) -> Vec<u32> {
    SemanticTokenEncoder::new().encode(root)
}

/// Packs position-sorted tokens as `[deltaLine, deltaStart, length, type, modifiers]`
/// groups. `deltaStart` is relative to the previous token only on the same line.
pub fn delta_encode(tokens: &[RawToken]) -> Vec<u32> {
    let mut data = Vec::with_capacity(tokens.len() * 5);
    let (mut prev_line, mut prev_column) = (0, 0);
    for token in tokens {
        let delta_line = token.line - prev_line;
        let delta_start = if delta_line == 0 {
            token.column - prev_column
        } else {
            token.column
        };
        data.extend_from_slice(&[
            delta_line,
            delta_start,
            token.length,
            token.token_type,
            token.modifiers,
        ]);
        prev_line = token.line;
        prev_column = token.column;
    }
    data
}

/// Inverse of [`delta_encode`]. A trailing partial group is ignored.
pub fn decode(data: &[u32]) -> Vec<RawToken> {
    let (mut line, mut column) = (0, 0);
    data.chunks_exact(5)
        .map(|group| {
            if group[0] > 0 {
                line += group[0];
                column = group[1];
            } else {
                column += group[1];
            }
            RawToken {
                line,
                column,
                length: group[2],
                token_type: group[3],
                modifiers: group[4],
            }
        })
        .collect()
}

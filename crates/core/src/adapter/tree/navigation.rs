use crate::query::QueryEngine;
use crate::query::symbols::{declaration_kind, documentation, name_node, parameter_labels};
use crate::util::{node_location, node_range};
use xtc_api::{
    DocumentHighlight, HighlightKind, Location, ParameterInfo, Position, Range, SelectionRange,
    SignatureHelp, SignatureInfo,
};
use xtc_syntax::{Point, SyntaxNode, SyntaxTree};

/// Nodes that bind a local name without being a declaration symbol.
const LOCAL_BINDINGS: &[&str] = &["variable_declaration", "parameter", "catch_clause", "for_statement"];

fn is_name_token(node: &SyntaxNode<'_>) -> bool {
    matches!(node.kind(), "identifier" | "type_name") && !node.is_missing()
}

/// The identifier or type name under the cursor.
pub(super) fn identifier_at(tree: &SyntaxTree, line: usize, column: usize) -> Option<SyntaxNode<'_>> {
    let node = tree.node_at(line, column)?;
    if is_name_token(&node) {
        return Some(node);
    }
    node.parent().filter(is_name_token)
}

/// True when `name` is the name being declared rather than a use of it.
pub(super) fn is_declaration_name(name: &SyntaxNode<'_>) -> bool {
    let Some(parent) = name.parent() else {
        return false;
    };
    if declaration_kind(parent.kind()).is_some() || parent.kind() == "enum_value" {
        return name_node(&parent).is_some_and(|n| n == *name);
    }
    LOCAL_BINDINGS.contains(&parent.kind()) && name.field_name() == Some("name")
}

/// Declaration of the name under the cursor: a declared symbol with that name, else
/// the closest local binding visible from the cursor.
pub fn definition(
    engine: &QueryEngine,
    tree: &SyntaxTree,
    uri: &str,
    line: usize,
    column: usize,
) -> Option<Location> {
    let identifier = identifier_at(tree, line, column)?;
    let name = identifier.text();
    engine
        .find_all_declarations(tree, uri)
        .into_iter()
        .find(|s| s.name == name)
        .map(|s| s.location)
        .or_else(|| local_binding(&identifier).map(|b| node_location(uri, &b)))
}

/// Walks outward from `usage` looking for a parameter or variable declared before it
/// in an enclosing scope.
fn local_binding<'t>(usage: &SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    let name = usage.text();
    let binds = |node: &SyntaxNode<'t>| {
        LOCAL_BINDINGS.contains(&node.kind())
            && node
                .child_by_field_name("name")
                .is_some_and(|n| n.text() == name && n != *usage)
    };
    for scope in usage.ancestors() {
        if binds(&scope) {
            return Some(scope);
        }
        let parameters = scope
            .child_by_field_name("parameters")
            .into_iter()
            .flat_map(|p| p.named_children());
        let earlier = scope
            .children()
            .filter(|c| c.start_byte() < usage.start_byte());
        if let Some(found) = parameters.chain(earlier).filter(|c| binds(c)).last() {
            return Some(found);
        }
    }
    None
}

pub fn references(
    engine: &QueryEngine,
    tree: &SyntaxTree,
    uri: &str,
    line: usize,
    column: usize,
    include_declaration: bool,
) -> Vec<Location> {
    let Some(identifier) = identifier_at(tree, line, column) else {
        return Vec::new();
    };
    engine
        .identifier_nodes(tree, identifier.text())
        .iter()
        .filter(|n| include_declaration || !is_declaration_name(n))
        .map(|n| node_location(uri, n))
        .collect()
}

/// Every occurrence of the name under the cursor; declaring occurrences are writes.
pub fn highlights(engine: &QueryEngine, tree: &SyntaxTree, line: usize, column: usize) -> Vec<DocumentHighlight> {
    let Some(identifier) = identifier_at(tree, line, column) else {
        return Vec::new();
    };
    engine
        .identifier_nodes(tree, identifier.text())
        .iter()
        .map(|n| DocumentHighlight {
            range: node_range(n),
            kind: if is_declaration_name(n) {
                HighlightKind::Write
            } else {
                HighlightKind::Read
            },
        })
        .collect()
}

/// Ranges of the node at `position` and each distinct ancestor, innermost first.
pub fn selection_range(tree: &SyntaxTree, position: Position) -> SelectionRange {
    let point = Range::new(position.line, position.column, position.line, position.column);
    let Some(node) = tree.node_at(position.line, position.column) else {
        return SelectionRange {
            range: point,
            parent: None,
        };
    };

    let mut ranges: Vec<Range> = Vec::new();
    for n in node.ancestors_and_self() {
        let range = node_range(&n);
        if ranges.last() != Some(&range) {
            ranges.push(range);
        }
    }

    let mut selection: Option<SelectionRange> = None;
    for range in ranges.into_iter().rev() {
        selection = Some(SelectionRange {
            range,
            parent: selection.map(Box::new),
        });
    }
    selection.unwrap_or(SelectionRange {
        range: point,
        parent: None,
    })
}

/// Signatures of the method called by the innermost call whose argument list holds
/// the cursor. The active parameter is the number of commas before the cursor.
pub fn signature_help(tree: &SyntaxTree, line: usize, column: usize) -> Option<SignatureHelp> {
    let cursor = Point::new(line, column);
    let node = tree.node_at(line, column)?;
    let call = node.ancestor_or_self(|n| {
        n.kind() == "call_expression"
            && n.child_by_field_name("arguments")
                .is_some_and(|a| a.contains_point(cursor))
    })?;
    let arguments = call.child_by_field_name("arguments")?;

    let callee = call.child_by_field_name("function").and_then(|f| match f.kind() {
        "identifier" => Some(f),
        "member_expression" => f.child_by_field_name("member"),
        _ => None,
    })?;
    let name = callee.text();

    let signatures: Vec<SignatureInfo> = tree
        .root_node()
        .descendants()
        .filter(|n| n.kind() == "method_declaration")
        .filter(|m| m.child_by_field_name("name").is_some_and(|n| n.text() == name))
        .map(|method| {
            let labels = parameter_labels(&method);
            SignatureInfo {
                label: format!("{}({})", name, labels.join(", ")),
                documentation: documentation(&method),
                parameters: labels
                    .into_iter()
                    .map(|label| ParameterInfo {
                        label,
                        documentation: None,
                    })
                    .collect(),
            }
        })
        .collect();
    if signatures.is_empty() {
        return None;
    }

    let active_parameter = arguments
        .children()
        .filter(|c| c.kind() == "," && c.start_position() < cursor)
        .count();
    let active_signature = signatures
        .iter()
        .position(|s| s.parameters.len() > active_parameter)
        .unwrap_or(0);

    Some(SignatureHelp {
        signatures,
        active_signature,
        active_parameter,
    })
}

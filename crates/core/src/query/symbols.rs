//! Turning declaration nodes into [`SymbolInfo`]s: names, kinds, qualified names,
//! signatures and documentation.

use crate::util::{node_location, node_range};
use xtc_api::{SymbolInfo, SymbolKind};
use xtc_syntax::SyntaxNode;

/// Node type to symbol kind, for every node that declares a name.
pub fn declaration_kind(node_kind: &str) -> Option<SymbolKind> {
    let kind = match node_kind {
        "module_declaration" => SymbolKind::Module,
        "package_declaration" => SymbolKind::Package,
        "class_declaration" => SymbolKind::Class,
        "interface_declaration" => SymbolKind::Interface,
        "mixin_declaration" => SymbolKind::Mixin,
        "service_declaration" => SymbolKind::Service,
        "const_declaration" => SymbolKind::Const,
        "enum_declaration" => SymbolKind::Enum,
        "method_declaration" => SymbolKind::Method,
        "constructor_declaration" => SymbolKind::Constructor,
        "property_declaration" => SymbolKind::Property,
        "parameter" => SymbolKind::Parameter,
        "type_parameter" => SymbolKind::TypeParameter,
        _ => return None,
    };
    Some(kind)
}

/// The node naming a declaration: its `name` field, the first identifier or type
/// name child, or for constructors the `construct`/`finally` keyword. Missing
/// nodes never count as names.
pub fn name_node<'t>(decl: &SyntaxNode<'t>) -> Option<SyntaxNode<'t>> {
    if decl.kind() == "constructor_declaration" {
        return decl
            .children()
            .find(|c| matches!(c.kind(), "construct" | "finally"));
    }
    decl.child_by_field_name("name")
        .filter(|n| !n.is_missing())
        .or_else(|| {
            decl.children()
                .find(|c| matches!(c.kind(), "identifier" | "type_name") && !c.is_missing())
        })
}

/// Text of a name node; dotted names are rebuilt from their parts.
pub fn name_text(name: &SyntaxNode<'_>) -> String {
    if name.kind() == "qualified_name" {
        return name
            .named_children()
            .filter(|c| !c.is_missing() && !c.is_comment())
            .map(|c| c.text())
            .collect::<Vec<_>>()
            .join(".");
    }
    name.text().to_string()
}

/// Name of `decl` if it is a declaration with a resolvable name.
pub fn declaration_name(decl: &SyntaxNode<'_>) -> Option<String> {
    declaration_kind(decl.kind())?;
    let name = name_text(&name_node(decl)?);
    (!name.is_empty()).then_some(name)
}

/// Builds the symbol for `decl`, whose name lives in `name`.
pub fn build_symbol(uri: &str, kind: SymbolKind, decl: &SyntaxNode<'_>, name: &SyntaxNode<'_>) -> SymbolInfo {
    let simple = name_text(name);
    let mut symbol = SymbolInfo::new(simple.clone(), kind, node_location(uri, decl));
    symbol.selection_range = node_range(name);
    symbol.qualified_name = qualified_name(decl, &simple);
    symbol.type_signature = signature(kind, decl, &simple);
    symbol.documentation = documentation(decl);
    symbol
}

/// Symbol for any declaration node, or `None` when it has no usable name.
pub fn symbol_for_node(uri: &str, decl: &SyntaxNode<'_>) -> Option<SymbolInfo> {
    let kind = declaration_kind(decl.kind())?;
    let name = name_node(decl)?;
    if name_text(&name).is_empty() {
        return None;
    }
    Some(build_symbol(uri, kind, decl, &name))
}

/// `outer.Inner.member`: names of enclosing declarations joined with dots.
pub fn qualified_name(decl: &SyntaxNode<'_>, simple: &str) -> String {
    let mut parts: Vec<String> = decl
        .ancestors()
        .filter_map(|a| declaration_name(&a))
        .collect();
    parts.reverse();
    parts.push(simple.to_string());
    parts.join(".")
}

/// Source text with runs of whitespace collapsed to one space.
pub fn compact(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn field_text(node: &SyntaxNode<'_>, field: &str) -> Option<String> {
    node.child_by_field_name(field)
        .filter(|n| !n.is_missing())
        .map(|n| compact(n.text()))
}

/// `Type name` labels of a declaration's parameters, in order.
pub fn parameter_labels(decl: &SyntaxNode<'_>) -> Vec<String> {
    let Some(parameters) = decl.child_by_field_name("parameters") else {
        return Vec::new();
    };
    parameters
        .named_children()
        .filter(|p| p.kind() == "parameter")
        .filter_map(|p| {
            let name = field_text(&p, "name")?;
            Some(match field_text(&p, "type") {
                Some(ty) => format!("{} {}", ty, name),
                None => name,
            })
        })
        .collect()
}

fn signature(kind: SymbolKind, decl: &SyntaxNode<'_>, name: &str) -> Option<String> {
    let type_params = field_text(decl, "type_parameters").unwrap_or_default();
    let params = || parameter_labels(decl).join(", ");
    let signature = match kind {
        SymbolKind::Method => {
            let ret = field_text(decl, "return_type").unwrap_or_default();
            let generic_prefix = decl.child_by_field_name("type_parameters").filter(|tp| {
                decl.child_by_field_name("return_type")
                    .is_some_and(|r| tp.start_byte() < r.start_byte())
            });
            match generic_prefix {
                Some(_) => format!("{} {} {}({})", type_params, ret, name, params()),
                None => format!("{} {}{}({})", ret, name, type_params, params()),
            }
        }
        SymbolKind::Constructor => format!("{}({})", name, params()),
        SymbolKind::Property | SymbolKind::Parameter => match field_text(decl, "type") {
            Some(ty) => format!("{} {}", ty, name),
            None => name.to_string(),
        },
        SymbolKind::TypeParameter => compact(decl.text()),
        SymbolKind::Module | SymbolKind::Package => format!("{} {}", kind.as_str(), name),
        _ => {
            let ctor_params = if decl.child_by_field_name("parameters").is_some() {
                format!("({})", params())
            } else {
                String::new()
            };
            format!("{} {}{}{}", kind.as_str(), name, type_params, ctor_params)
        }
    };
    Some(signature)
}

/// Text of the doc comment directly before `decl`, without comment markers.
pub fn documentation(decl: &SyntaxNode<'_>) -> Option<String> {
    let doc = decl.prev_named_sibling().filter(|s| s.kind() == "doc_comment")?;
    let text = strip_doc_comment(doc.text());
    (!text.is_empty()).then_some(text)
}

pub fn strip_doc_comment(text: &str) -> String {
    let body = text.strip_prefix("/**").unwrap_or(text);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim_start).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use xtc_syntax::{Parser, SyntaxTree};

    fn parse(source: &str) -> SyntaxTree {
        let language = xtc_syntax::language().unwrap();
        Parser::new(&language).parse(source)
    }

    fn symbol_of(tree: &SyntaxTree, kind: &str, nth: usize) -> SymbolInfo {
        let node = tree
            .root_node()
            .descendants()
            .filter(|n| n.kind() == kind)
            .nth(nth)
            .unwrap();
        symbol_for_node("file:///t.x", &node).unwrap()
    }

    #[test]
    fn test_signatures() {
        let tree = parse(
            "module app.core {\n\
             class Box<T> {\n\
             construct(T value) {}\n\
             T value;\n\
             <R> R map(function R(T) f, Int times) { return f(value); }\n\
             }\n\
             }",
        );
        assert_eq!(symbol_of(&tree, "module_declaration", 0).type_signature.unwrap(), "module app.core");
        assert_eq!(symbol_of(&tree, "class_declaration", 0).type_signature.unwrap(), "class Box<T>");
        assert_eq!(symbol_of(&tree, "constructor_declaration", 0).type_signature.unwrap(), "construct(T value)");
        assert_eq!(symbol_of(&tree, "property_declaration", 0).type_signature.unwrap(), "T value");
        assert_eq!(
            symbol_of(&tree, "method_declaration", 0).type_signature.unwrap(),
            "<R> R map(function R(T) f, Int times)"
        );
        assert_eq!(symbol_of(&tree, "parameter", 1).type_signature.unwrap(), "function R(T) f");
    }

    #[test]
    fn test_qualified_names() {
        let tree = parse("module app { class Outer { class Inner { void run() {} } } }");
        let method = symbol_of(&tree, "method_declaration", 0);
        assert_eq!(method.name, "run");
        assert_eq!(method.qualified_name, "app.Outer.Inner.run");
        assert_eq!(symbol_of(&tree, "module_declaration", 0).qualified_name, "app");
    }

    #[test]
    fn test_documentation_from_preceding_doc_comment() {
        let tree = parse(
            "class Person {\n\
             /**\n\
              * The full name.\n\
              *\n\
              * Never empty.\n\
              */\n\
             String name;\n\
             // plain comment\n\
             Int age;\n\
             }",
        );
        let name = symbol_of(&tree, "property_declaration", 0);
        assert_eq!(name.documentation.as_deref(), Some("The full name.\n\nNever empty."));
        let age = symbol_of(&tree, "property_declaration", 1);
        assert!(age.documentation.is_none());
    }

    #[test]
    fn test_selection_range_covers_only_the_name() {
        let tree = parse("class Person {\n    String name;\n}");
        let property = symbol_of(&tree, "property_declaration", 0);
        assert_eq!(property.selection_range, xtc_api::Range::new(1, 11, 1, 15));
        assert_eq!(property.location.range, xtc_api::Range::new(1, 4, 1, 16));
    }

    #[test]
    fn test_missing_name_yields_no_symbol() {
        let tree = parse("class {\n}");
        let class = tree
            .root_node()
            .descendants()
            .find(|n| n.kind() == "class_declaration")
            .unwrap();
        assert!(symbol_for_node("u", &class).is_none());
        assert!(declaration_name(&class).is_none());
    }

    #[test]
    fn test_strip_doc_comment_single_line() {
        assert_eq!(strip_doc_comment("/** Adds two numbers. */"), "Adds two numbers.");
        assert_eq!(strip_doc_comment("/***/"), "");
    }
}

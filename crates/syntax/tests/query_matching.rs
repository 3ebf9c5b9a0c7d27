mod common;

use common::parse;
use xtc_syntax::{Query, QueryCursor, QueryErrorKind, SyntaxTree};

const SOURCE: &str = r#"module shop {
    interface Priced { Int price(); }
    class Item implements Priced {
        String name;
        Int price() { return total(name) + 1; }
    }
    class Cart {}
}
"#;

fn query(source: &str) -> Query {
    let language = xtc_syntax::language().unwrap();
    Query::new(&language, source).unwrap_or_else(|e| panic!("{}", e))
}

fn captured_texts(tree: &SyntaxTree, query: &Query, capture: &str) -> Vec<String> {
    let index = query.capture_index_for_name(capture).unwrap();
    let mut cursor = QueryCursor::new();
    cursor
        .matches(query, tree.root_node())
        .flat_map(|m| {
            m.nodes_for_capture_index(index)
                .map(|n| n.text().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn test_field_pattern_captures_names() {
    let tree = parse(SOURCE);
    let q = query("(class_declaration name: (type_name) @name)");
    assert_eq!(captured_texts(&tree, &q, "name"), ["Item", "Cart"]);
}

#[test]
fn test_alternation_shares_capture() {
    let tree = parse(SOURCE);
    let q = query(
        "[(class_declaration name: (type_name) @name) (interface_declaration name: (type_name) @name)]",
    );
    assert_eq!(q.capture_names(), ["name"]);
    assert_eq!(captured_texts(&tree, &q, "name"), ["Priced", "Item", "Cart"]);
}

#[test]
fn test_multiple_patterns_report_their_index() {
    let tree = parse(SOURCE);
    let q = query(
        "; declarations\n(method_declaration name: (identifier) @method)\n(property_declaration name: (identifier) @property)",
    );
    assert_eq!(q.pattern_count(), 2);
    assert_eq!(q.start_byte_for_pattern(1), Some(q.start_byte_for_pattern(0).unwrap() + 48));
    let mut cursor = QueryCursor::new();
    let indices: Vec<_> = cursor
        .matches(&q, tree.root_node())
        .map(|m| m.pattern_index)
        .collect();
    assert_eq!(indices, [0, 1, 0]);
}

#[test]
fn test_predicates_filter_matches() {
    let tree = parse(SOURCE);
    let eq = query(r#"((identifier) @id (#eq? @id "name"))"#);
    assert_eq!(captured_texts(&tree, &eq, "id"), ["name", "name"]);

    let not_eq = query(r#"((type_name) @t (#not-eq? @t "Int"))"#);
    assert!(!captured_texts(&tree, &not_eq, "t").contains(&"Int".to_string()));

    let matching = query(r#"((type_name) @t (#match? @t "^Pri"))"#);
    assert_eq!(captured_texts(&tree, &matching, "t"), ["Priced", "Priced"]);

    let any_of = query(r#"((type_name) @t (#any-of? @t "Cart" "Item"))"#);
    assert_eq!(captured_texts(&tree, &any_of, "t"), ["Item", "Cart"]);
}

#[test]
fn test_anonymous_and_wildcard_patterns() {
    let tree = parse(SOURCE);
    let plus = query(r#"(binary_expression operator: "+" @op right: (_) @right)"#);
    assert_eq!(captured_texts(&tree, &plus, "op"), ["+"]);
    assert_eq!(captured_texts(&tree, &plus, "right"), ["1"]);

    let calls = query("(call_expression function: _ @callee)");
    assert_eq!(captured_texts(&tree, &calls, "callee"), ["total"]);
}

#[test]
fn test_cursor_rescans_on_every_call() {
    let tree = parse(SOURCE);
    let q = query("(class_declaration) @class");
    let mut cursor = QueryCursor::new();
    let first = cursor.matches(&q, tree.root_node()).count();
    let second = cursor.matches(&q, tree.root_node()).count();
    assert_eq!(first, 2);
    assert_eq!(first, second);

    cursor.set_match_limit(1);
    assert_eq!(cursor.matches(&q, tree.root_node()).count(), 1);
}

#[test]
fn test_matching_from_a_subtree() {
    let tree = parse(SOURCE);
    let q = query("(type_name) @t");
    let cart = tree
        .root_node()
        .descendants()
        .find(|n| n.kind() == "class_declaration" && n.text().contains("Cart"))
        .unwrap();
    let mut cursor = QueryCursor::new();
    let names: Vec<_> = cursor
        .matches(&q, cart)
        .filter_map(|m| m.node_for_capture_index(0))
        .map(|n| n.text())
        .collect();
    assert_eq!(names, ["Cart"]);
}

#[test]
fn test_missing_nodes_never_match() {
    let tree = parse("class {");
    let q = query("(type_name) @t");
    let mut cursor = QueryCursor::new();
    assert_eq!(cursor.matches(&q, tree.root_node()).count(), 0);
}

#[test]
fn test_query_errors_carry_kind_and_position() {
    let language = xtc_syntax::language().unwrap();
    let cases = [
        ("\n(bogus)", QueryErrorKind::NodeType),
        ("(class_declaration nme: (type_name))", QueryErrorKind::Field),
        (r#"((identifier) @x (#eq? @y "a"))"#, QueryErrorKind::Capture),
        (r#"((identifier) @x (#frobnicate? @x))"#, QueryErrorKind::Predicate),
        ("(identifier)*", QueryErrorKind::Syntax),
        ("(class_declaration", QueryErrorKind::Syntax),
        ("\"no-such-token\"", QueryErrorKind::NodeType),
    ];
    for (source, kind) in cases {
        let err = Query::new(&language, source).err().unwrap_or_else(|| panic!("{:?} compiled", source));
        assert_eq!(err.kind, kind, "{:?}: {}", source, err);
    }

    let err = Query::new(&language, "\n(bogus)").err().unwrap();
    assert_eq!((err.row, err.column), (1, 6));
    assert!(err.to_string().starts_with("Query error at 1:6"));
}

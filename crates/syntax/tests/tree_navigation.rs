mod common;

use common::{first_of_kind, parse, point_of};
use xtc_syntax::{Field, Point};

const SOURCE: &str = "module myapp {\n    class Person {\n        String name;\n        construct(String name) {}\n    }\n}\n";

#[test]
fn test_node_at_finds_smallest_named_node() {
    let tree = parse(SOURCE);
    let at = point_of(SOURCE, "Person", 0);
    let node = tree.node_at(at.row, at.column).unwrap();
    assert_eq!(node.kind(), "type_name");
    assert_eq!(node.text(), "Person");
    assert_eq!(node.parent().unwrap().kind(), "class_declaration");
}

#[test]
fn test_node_at_end_of_token_is_inclusive() {
    let tree = parse(SOURCE);
    let at = point_of(SOURCE, "Person", 0);
    let node = tree.node_at(at.row, at.column + "Person".len()).unwrap();
    assert_eq!(node.text(), "Person");
}

#[test]
fn test_node_at_past_the_end_is_none() {
    let tree = parse(SOURCE);
    assert!(tree.node_at(9999, 0).is_none());
    assert!(tree.node_at(0, 9999).is_some());
}

#[test]
fn test_property_and_parameter_names_have_different_parents() {
    let tree = parse(SOURCE);
    let property_at = point_of(SOURCE, "name", 0);
    let parameter_at = point_of(SOURCE, "name", 1);
    let property = tree.node_at(property_at.row, property_at.column).unwrap();
    let parameter = tree.node_at(parameter_at.row, parameter_at.column).unwrap();
    assert_eq!(property.parent().unwrap().kind(), "property_declaration");
    assert_eq!(parameter.parent().unwrap().kind(), "parameter");
    assert_eq!(property.field_name(), Some("name"));
    assert_eq!(parameter.field(), Some(Field::Name));
}

#[test]
fn test_positions_and_ranges() {
    let tree = parse(SOURCE);
    let class = first_of_kind(&tree, "class_declaration");
    assert_eq!(class.start_position(), Point::new(1, 4));
    assert_eq!(class.end_position(), Point::new(4, 5));
    assert_eq!(class.start_line(), 1);
    assert_eq!(class.end_column(), 5);
    assert_eq!(&SOURCE[class.byte_range()], class.text());
    assert!(class.contains_point(Point::new(4, 5)));
    assert!(!class.contains_point(Point::new(1, 3)));
}

#[test]
fn test_siblings_and_ancestors() {
    let tree = parse(SOURCE);
    let property = first_of_kind(&tree, "property_declaration");
    let constructor = property.next_named_sibling().unwrap();
    assert_eq!(constructor.kind(), "constructor_declaration");
    assert_eq!(constructor.prev_named_sibling(), Some(property.clone()));
    assert_eq!(property.prev_sibling().unwrap().kind(), "{");

    let kinds: Vec<_> = property.ancestors().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        ["class_body", "class_declaration", "module_body", "module_declaration", "source_file"]
    );
    let module = property
        .ancestor_or_self(|n| matches!(n.kind(), "module_declaration" | "package_declaration"))
        .unwrap();
    assert_eq!(module.child_by_field(Field::Name).unwrap().text(), "myapp");
    assert!(property.ancestor_or_self(|n| n.kind() == "parameter").is_none());
}

#[test]
fn test_ancestor_or_self_checks_the_start_node_first() {
    let tree = parse(SOURCE);
    let property = first_of_kind(&tree, "property_declaration");
    let found = property.ancestor_or_self(|n| n.is_named()).unwrap();
    assert_eq!(found, property);

    let name = property.child_by_field(Field::Name).unwrap();
    let chain: Vec<_> = name.ancestors_and_self().map(|n| n.kind()).take(3).collect();
    assert_eq!(chain, ["identifier", "property_declaration", "class_body"]);
    let declaration = name
        .ancestor_or_self(|n| n.kind().ends_with("_declaration"))
        .unwrap();
    assert_eq!(declaration.kind(), "property_declaration");
}

#[test]
fn test_children_by_field_and_type() {
    let tree = parse("class A { void f() { return 1, 2; } }");
    let ret = first_of_kind(&tree, "return_statement");
    let values: Vec<_> = ret.children_by_field_name("value").map(|n| n.text()).collect();
    assert_eq!(values, ["1", "2"]);
    assert_eq!(ret.child_by_type("return").unwrap().text(), "return");
    assert!(!ret.child(0).unwrap().is_named());
    assert_eq!(ret.named_children().count(), 2);
}

#[test]
fn test_utf16_columns() {
    let source = "module m {\n    // é😀\n    class Name {}\n}\n";
    let tree = parse(source);
    let comment = first_of_kind(&tree, "comment");
    assert_eq!(comment.end_position(), Point::new(1, 4 + 3 + 1 + 2));
    let name = first_of_kind(&tree, "type_name");
    assert_eq!(name.start_position(), Point::new(2, 10));
}

#[test]
fn test_released_tree() {
    let tree = parse(SOURCE);
    let count = tree.node_count();
    assert!(count > 10);
    tree.release();
}

#[test]
fn test_language_metadata_matches_nodes() {
    let tree = parse(SOURCE);
    let language = tree.language();
    let class = first_of_kind(&tree, "class_declaration");
    assert_eq!(language.node_kind_for_id(class.kind_id()), Some("class_declaration"));
    assert!(language.node_kind_is_named(class.kind_id()));
    assert_eq!(language.id_for_node_kind("{", false), Some(tree.root_node().descendants().find(|n| n.kind() == "{").unwrap().kind_id()));
    let field = language.field_id_for_name("name").unwrap();
    assert_eq!(language.field_name_for_id(field), Some("name"));
}

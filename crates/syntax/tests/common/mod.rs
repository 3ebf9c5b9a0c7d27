use xtc_syntax::{Parser, Point, SyntaxNode, SyntaxTree};

#[allow(dead_code)]
pub fn parse(source: &str) -> SyntaxTree {
    let language = xtc_syntax::language().expect("xtc language should load on the test host");
    Parser::new(&language).parse(source)
}

/// First node of `kind` in pre-order.
#[allow(dead_code)]
pub fn first_of_kind<'t>(tree: &'t SyntaxTree, kind: &str) -> SyntaxNode<'t> {
    tree.root_node()
        .descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no `{}` node in:\n{}", kind, tree.root_node().to_sexp()))
}

#[allow(dead_code)]
pub fn all_of_kind<'t>(tree: &'t SyntaxTree, kind: &str) -> Vec<SyntaxNode<'t>> {
    tree.root_node()
        .descendants()
        .filter(|n| n.kind() == kind)
        .collect()
}

/// Row and UTF-16 column of a byte offset.
#[allow(dead_code)]
pub fn offset_to_point(content: &str, offset: usize) -> Point {
    let before = &content[..offset];
    let row = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].encode_utf16().count();
    Point::new(row, column)
}

/// Position of the `nth` occurrence (0-based) of `needle`.
#[allow(dead_code)]
pub fn point_of(content: &str, needle: &str, nth: usize) -> Point {
    let offset = content
        .match_indices(needle)
        .nth(nth)
        .map(|(i, _)| i)
        .unwrap_or_else(|| panic!("`{}` occurs fewer than {} times", needle, nth + 1));
    offset_to_point(content, offset)
}

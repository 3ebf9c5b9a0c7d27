use crate::util::node_location;
use xtc_api::Diagnostic;
use xtc_syntax::{SyntaxNode, SyntaxTree};

pub const DIAGNOSTIC_SOURCE: &str = "xtc";

const SNIPPET_CHARS: usize = 20;

/// One error diagnostic per `ERROR` and `MISSING` node, in document order.
/// Only subtrees flagged with errors are visited.
pub fn collect_syntax_errors(tree: &SyntaxTree, uri: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if tree.has_errors() {
        collect(&tree.root_node(), uri, &mut diagnostics);
    }
    diagnostics
}

fn collect(root: &SyntaxNode<'_>, uri: &str, out: &mut Vec<Diagnostic>) {
    let mut stack = vec![root.clone()];
    while let Some(node) = stack.pop() {
        let message = if node.is_error() {
            Some(format!("Syntax error: unexpected '{}'", snippet(node.text())))
        } else if node.is_missing() {
            Some(format!("Syntax error: missing {}", node.kind()))
        } else {
            None
        };
        if let Some(message) = message {
            out.push(Diagnostic::error(node_location(uri, &node), message).with_source(DIAGNOSTIC_SOURCE));
        }
        let start = stack.len();
        stack.extend(node.children().filter(|c| c.has_error()));
        stack[start..].reverse();
    }
}

fn snippet(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(SNIPPET_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xtc_api::{Range, Severity};
    use xtc_syntax::Parser;

    fn diagnostics(source: &str) -> Vec<Diagnostic> {
        let language = xtc_syntax::language().unwrap();
        let tree = Parser::new(&language).parse(source);
        collect_syntax_errors(&tree, "file:///t.x")
    }

    #[test]
    fn test_clean_source_has_no_diagnostics() {
        assert!(diagnostics("module app { class A {} }").is_empty());
        assert!(diagnostics("").is_empty());
    }

    #[test]
    fn test_missing_brace_is_reported() {
        let diags = diagnostics("module myapp {\n    class Person {\n");
        assert!(!diags.is_empty());
        assert!(diags.iter().all(|d| d.severity == Severity::Error));
        assert!(diags.iter().all(|d| d.source.as_deref() == Some("xtc")));
        assert!(diags.iter().any(|d| d.message == "Syntax error: missing }"));
    }

    #[test]
    fn test_missing_semicolon_points_after_previous_token() {
        let diags = diagnostics("class A {\n    Int x\n}");
        let missing = diags
            .iter()
            .find(|d| d.message == "Syntax error: missing ;")
            .unwrap();
        assert_eq!(missing.location.range, Range::new(1, 9, 1, 9));
    }

    #[test]
    fn test_unexpected_text_is_truncated() {
        let diags = diagnostics("module app { } ) abcdefghijklmnopqrstuvwxyz");
        let unexpected = diags
            .iter()
            .find(|d| d.message.starts_with("Syntax error: unexpected"))
            .unwrap();
        assert!(unexpected.message.ends_with("...'"), "{}", unexpected.message);
    }

    #[test]
    fn test_unterminated_block_comment_is_reported() {
        let diags = diagnostics("module m {\n}\n/* note");
        let unexpected = diags
            .iter()
            .find(|d| d.message.starts_with("Syntax error: unexpected '/*"))
            .unwrap();
        assert_eq!(
            (unexpected.location.range.start_line, unexpected.location.range.start_col),
            (2, 0)
        );
    }

    #[test]
    fn test_snippet() {
        assert_eq!(snippet("short"), "short");
        assert_eq!(snippet("abcdefghijklmnopqrst"), "abcdefghijklmnopqrst");
        assert_eq!(snippet("abcdefghijklmnopqrstu"), "abcdefghijklmnopqrst...");
    }
}

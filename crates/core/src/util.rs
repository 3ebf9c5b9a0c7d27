use xtc_api::{Location, Range};
use xtc_syntax::SyntaxNode;

/// Converts a node's span to the protocol range model.
pub fn node_range(node: &SyntaxNode<'_>) -> Range {
    Range::new(
        node.start_line(),
        node.start_column(),
        node.end_line(),
        node.end_column(),
    )
}

pub fn node_location(uri: &str, node: &SyntaxNode<'_>) -> Location {
    Location::new(uri, node_range(node))
}

pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Byte offset of the `line`/UTF-16 `column` position, clamped to the line end.
pub fn offset_at(content: &str, line: usize, column: usize) -> Option<usize> {
    let mut start = 0;
    for _ in 0..line {
        start += content[start..].find('\n')? + 1;
    }
    let text = content[start..].split('\n').next().unwrap_or("");
    let mut units = 0;
    for (offset, c) in text.char_indices() {
        if units >= column {
            return Some(start + offset);
        }
        units += c.len_utf16();
    }
    Some(start + text.len())
}

/// True for a plain identifier: a letter or `_` followed by letters, digits or `_`.
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_at_counts_utf16_units() {
        let content = "ab\n\u{1F600}x\ny";
        assert_eq!(offset_at(content, 0, 1), Some(1));
        assert_eq!(offset_at(content, 1, 0), Some(3));
        assert_eq!(offset_at(content, 1, 2), Some(7));
        assert_eq!(offset_at(content, 1, 99), Some(8));
        assert_eq!(offset_at(content, 2, 0), Some(9));
        assert_eq!(offset_at(content, 5, 0), None);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("name"));
        assert!(is_identifier("_x1"));
        assert!(is_identifier("Größe"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a b"));
    }
}

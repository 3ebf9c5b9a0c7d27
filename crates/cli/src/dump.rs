use crate::view::TokenRow;
use xtc_core::semantic::{SemanticTokenEncoder, TokenType, decode, modifiers_in};
use xtc_syntax::Parser;

/// Encodes the file's semantic tokens and decodes them back to absolute rows.
pub fn token_rows(content: &str) -> anyhow::Result<Vec<TokenRow>> {
    let language = xtc_syntax::language()?;
    let tree = Parser::new(&language).parse(content);
    let data = SemanticTokenEncoder::new().encode(tree.root_node());

    let rows = decode(&data)
        .into_iter()
        .map(|token| TokenRow {
            line: token.line,
            column: token.column,
            length: token.length,
            token_type: TokenType::from_index(token.token_type)
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| token.token_type.to_string()),
            modifiers: modifiers_in(token.modifiers)
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(","),
        })
        .collect();
    tree.release();
    Ok(rows)
}

pub fn syntax_tree(content: &str) -> anyhow::Result<String> {
    let language = xtc_syntax::language()?;
    let tree = Parser::new(&language).parse(content);
    let sexp = tree.root_node().to_sexp();
    tree.release();
    Ok(sexp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_rows_are_absolute() {
        let rows = token_rows("class Person {\n    String name;\n}\n").unwrap();
        let first = &rows[0];
        assert_eq!((first.line, first.column, first.length), (0, 6, 6));
        assert_eq!(first.token_type, "class");
        assert_eq!(first.modifiers, "declaration");

        let property = rows.iter().find(|r| r.line == 1 && r.column == 11).unwrap();
        assert_eq!(property.token_type, "property");
    }

    #[test]
    fn test_syntax_tree_dump() {
        let sexp = syntax_tree("module app {}").unwrap();
        assert!(sexp.starts_with("(source_file (module_declaration"));
    }
}

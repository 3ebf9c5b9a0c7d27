use crate::models::{
    CompilationResult, CompletionItem, DocumentHighlight, DocumentLink, FoldingRange,
    FormattingOptions, Location, Position, PrepareRenameResult, Range, SelectionRange,
    SemanticTokens, SignatureHelp, SymbolInfo, TextEdit, WorkspaceEdit,
};

fn not_implemented(backend: &str, feature: &str) {
    tracing::warn!("[{}] {} is not implemented by this backend", backend, feature);
}

/// Language intelligence facade consumed by the editor-protocol layer.
///
/// All operations are synchronous and take 0-based positions. Implementations must be
/// safe to call concurrently for different uris; calls for the same uri are serialized
/// by the caller. Only [`compile`](CompilerAdapter::compile) and the lookup operations
/// below it are required, the remaining editor features default to logging and
/// returning nothing.
pub trait CompilerAdapter: Send + Sync {
    /// Short name used in logs and the server info.
    fn display_name(&self) -> &str;

    /// Parse `content` as the new state of `uri`, replacing any earlier result.
    fn compile(&self, uri: &str, content: &str) -> CompilationResult;

    fn find_symbol_at(&self, uri: &str, line: usize, column: usize) -> Option<SymbolInfo>;

    fn get_hover_info(&self, uri: &str, line: usize, column: usize) -> Option<String> {
        self.find_symbol_at(uri, line, column)
            .map(|symbol| symbol.to_hover_markdown())
    }

    fn get_completions(&self, uri: &str, line: usize, column: usize) -> Vec<CompletionItem>;

    fn find_definition(&self, uri: &str, line: usize, column: usize) -> Option<Location>;

    fn find_references(
        &self,
        uri: &str,
        line: usize,
        column: usize,
        include_declaration: bool,
    ) -> Vec<Location>;

    /// Drop every cached artifact for `uri`.
    fn close_document(&self, _uri: &str) {}

    fn health_check(&self) -> bool {
        true
    }

    fn document_highlights(&self, _uri: &str, _line: usize, _column: usize) -> Vec<DocumentHighlight> {
        not_implemented(self.display_name(), "documentHighlight");
        Vec::new()
    }

    fn selection_ranges(&self, _uri: &str, _positions: &[Position]) -> Vec<SelectionRange> {
        not_implemented(self.display_name(), "selectionRange");
        Vec::new()
    }

    fn folding_ranges(&self, _uri: &str) -> Vec<FoldingRange> {
        not_implemented(self.display_name(), "foldingRange");
        Vec::new()
    }

    fn document_links(&self, _uri: &str) -> Vec<DocumentLink> {
        not_implemented(self.display_name(), "documentLink");
        Vec::new()
    }

    fn signature_help(&self, _uri: &str, _line: usize, _column: usize) -> Option<SignatureHelp> {
        not_implemented(self.display_name(), "signatureHelp");
        None
    }

    fn prepare_rename(&self, _uri: &str, _line: usize, _column: usize) -> Option<PrepareRenameResult> {
        not_implemented(self.display_name(), "prepareRename");
        None
    }

    fn rename(&self, _uri: &str, _line: usize, _column: usize, _new_name: &str) -> Option<WorkspaceEdit> {
        not_implemented(self.display_name(), "rename");
        None
    }

    fn semantic_tokens(&self, _uri: &str) -> Option<SemanticTokens> {
        not_implemented(self.display_name(), "semanticTokens");
        None
    }

    fn workspace_symbols(&self, _query: &str) -> Vec<SymbolInfo> {
        not_implemented(self.display_name(), "workspaceSymbol");
        Vec::new()
    }

    fn format_document(&self, _uri: &str, content: &str, options: &FormattingOptions) -> Vec<TextEdit> {
        let mut edits = trailing_whitespace_edits(content, 0, usize::MAX);
        if options.insert_final_newline && !content.is_empty() && !content.ends_with('\n') {
            let end = end_position(content);
            edits.push(TextEdit {
                range: Range::new(end.line, end.column, end.line, end.column),
                new_text: "\n".to_string(),
            });
        }
        edits
    }

    fn format_range(
        &self,
        _uri: &str,
        content: &str,
        range: Range,
        options: &FormattingOptions,
    ) -> Vec<TextEdit> {
        if !options.trim_trailing_whitespace {
            return Vec::new();
        }
        trailing_whitespace_edits(content, range.start_line, range.end_line)
    }
}

/// Edits deleting trailing spaces and tabs on lines `first..=last`.
pub fn trailing_whitespace_edits(content: &str, first: usize, last: usize) -> Vec<TextEdit> {
    content
        .split('\n')
        .enumerate()
        .skip(first)
        .take_while(|(line, _)| *line <= last)
        .filter_map(|(line, text)| {
            let text = text.strip_suffix('\r').unwrap_or(text);
            let trimmed = text.trim_end_matches([' ', '\t']);
            if trimmed.len() == text.len() {
                return None;
            }
            let start = utf16_len(trimmed);
            let end = utf16_len(text);
            Some(TextEdit {
                range: Range::new(line, start, line, end),
                new_text: String::new(),
            })
        })
        .collect()
}

fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

fn end_position(content: &str) -> Position {
    let line = content.matches('\n').count();
    let last = content.rsplit('\n').next().unwrap_or("");
    Position::new(line, utf16_len(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompletionKind, SymbolKind};

    struct Fixed;

    impl CompilerAdapter for Fixed {
        fn display_name(&self) -> &str {
            "fixed"
        }

        fn compile(&self, uri: &str, _content: &str) -> CompilationResult {
            CompilationResult::new(uri, Vec::new(), Vec::new())
        }

        fn find_symbol_at(&self, uri: &str, line: usize, _column: usize) -> Option<SymbolInfo> {
            (line == 0).then(|| {
                SymbolInfo::new("Person", SymbolKind::Class, Location::new(uri, Range::new(0, 0, 0, 6)))
            })
        }

        fn get_completions(&self, _uri: &str, _line: usize, _column: usize) -> Vec<CompletionItem> {
            vec![CompletionItem::new("class", CompletionKind::Keyword, "keyword")]
        }

        fn find_definition(&self, _uri: &str, _line: usize, _column: usize) -> Option<Location> {
            None
        }

        fn find_references(&self, _: &str, _: usize, _: usize, _: bool) -> Vec<Location> {
            Vec::new()
        }
    }

    #[test]
    fn test_default_hover_uses_symbol() {
        let hover = Fixed.get_hover_info("file:///a.x", 0, 1).unwrap();
        assert!(hover.contains("class Person"));
        assert!(Fixed.get_hover_info("file:///a.x", 3, 1).is_none());
    }

    #[test]
    fn test_unimplemented_features_return_empty() {
        assert!(Fixed.folding_ranges("file:///a.x").is_empty());
        assert!(Fixed.signature_help("file:///a.x", 0, 0).is_none());
        assert!(Fixed.semantic_tokens("file:///a.x").is_none());
        assert!(Fixed.rename("file:///a.x", 0, 0, "x").is_none());
    }

    #[test]
    fn test_format_document_trims_and_adds_newline() {
        let options = FormattingOptions {
            insert_final_newline: true,
            ..Default::default()
        };
        let edits = Fixed.format_document("file:///a.x", "a  \r\nb\t\nc", &options);
        assert_eq!(edits.len(), 3);
        assert_eq!(edits[0].range, Range::new(0, 1, 0, 3));
        assert_eq!(edits[1].range, Range::new(1, 1, 1, 2));
        assert_eq!(edits[2].range, Range::new(2, 1, 2, 1));
        assert_eq!(edits[2].new_text, "\n");
    }

    #[test]
    fn test_format_range_requires_trim_option() {
        let content = "a \nb \nc ";
        let range = Range::new(1, 0, 2, 0);
        assert!(Fixed.format_range("u", content, range, &FormattingOptions::default()).is_empty());

        let options = FormattingOptions {
            trim_trailing_whitespace: true,
            ..Default::default()
        };
        let edits = Fixed.format_range("u", content, range, &options);
        let lines: Vec<_> = edits.iter().map(|e| e.range.start_line).collect();
        assert_eq!(lines, vec![1, 2]);
    }
}

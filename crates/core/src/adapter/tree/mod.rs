//! Syntax-aware adapter. Every feature is answered from the parsed tree of the one
//! document it concerns, with no semantic analysis behind it.

mod completion;
mod editing;
mod navigation;

use crate::error::Result;
use crate::query::{QueryEngine, collect_syntax_errors};
use crate::semantic::SemanticTokenEncoder;
use dashmap::DashMap;
use std::time::Instant;
use tracing::{debug, info};
use xtc_api::{
    CompilationResult, CompilerAdapter, CompletionItem, DocumentHighlight, DocumentLink,
    FoldingRange, Location, Position, PrepareRenameResult, SelectionRange, SemanticTokens,
    SignatureHelp, SymbolInfo, WorkspaceEdit,
};
use xtc_syntax::{Language, Parser, SyntaxTree};

/// Parses each document in full on every compile and keeps the newest tree and
/// result per uri. A superseded or closed tree is released immediately.
pub struct TreeAdapter {
    parser: Parser,
    engine: QueryEngine,
    trees: DashMap<String, SyntaxTree>,
    results: DashMap<String, CompilationResult>,
}

impl TreeAdapter {
    pub const DISPLAY_NAME: &'static str = "Tree (syntax-aware)";

    /// Loads the grammar for this platform. Fails if it is unavailable.
    pub fn new() -> Result<Self> {
        let language = xtc_syntax::language()?;
        Self::with_language(&language)
    }

    pub fn with_language(language: &Language) -> Result<Self> {
        Ok(Self {
            parser: Parser::new(language),
            engine: QueryEngine::new(language)?,
            trees: DashMap::new(),
            results: DashMap::new(),
        })
    }

    /// Number of documents with a cached tree.
    pub fn document_count(&self) -> usize {
        self.trees.len()
    }

    /// The result of the most recent compile of `uri`.
    pub fn last_result(&self, uri: &str) -> Option<CompilationResult> {
        self.results.get(uri).map(|r| r.value().clone())
    }

    fn with_tree<T>(&self, uri: &str, f: impl FnOnce(&SyntaxTree) -> T) -> Option<T> {
        let tree = self.trees.get(uri)?;
        Some(f(tree.value()))
    }
}

impl CompilerAdapter for TreeAdapter {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    fn compile(&self, uri: &str, content: &str) -> CompilationResult {
        let started = Instant::now();
        let tree = self.parser.parse(content);
        let parsed = started.elapsed();

        let diagnostics = if tree.has_errors() {
            collect_syntax_errors(&tree, uri)
        } else {
            Vec::new()
        };
        let symbols = self.engine.symbol_hierarchy(&tree, uri);
        let result = CompilationResult::new(uri, diagnostics, symbols);

        if let Some(old) = self.trees.insert(uri.to_string(), tree) {
            old.release();
        }
        self.results.insert(uri.to_string(), result.clone());

        info!(
            "[{}] compiled {} ({} bytes) in {:.2}ms (parse {:.2}ms): {} diagnostics, {} symbols",
            Self::DISPLAY_NAME,
            uri,
            content.len(),
            started.elapsed().as_secs_f64() * 1000.0,
            parsed.as_secs_f64() * 1000.0,
            result.diagnostics.len(),
            result.all_symbols().count()
        );
        result
    }

    fn find_symbol_at(&self, uri: &str, line: usize, column: usize) -> Option<SymbolInfo> {
        self.with_tree(uri, |tree| {
            self.engine.find_declaration_at(tree, line, column, uri)
        })
        .flatten()
    }

    fn get_completions(&self, uri: &str, _line: usize, _column: usize) -> Vec<CompletionItem> {
        let result = self.results.get(uri);
        let items = self
            .with_tree(uri, |tree| {
                completion::completions(&self.engine, Some(tree), result.as_deref(), uri)
            })
            .unwrap_or_else(|| completion::completions(&self.engine, None, None, uri));
        debug!("[{}] {} completions for {}", Self::DISPLAY_NAME, items.len(), uri);
        items
    }

    fn find_definition(&self, uri: &str, line: usize, column: usize) -> Option<Location> {
        self.with_tree(uri, |tree| {
            navigation::definition(&self.engine, tree, uri, line, column)
        })
        .flatten()
    }

    fn find_references(
        &self,
        uri: &str,
        line: usize,
        column: usize,
        include_declaration: bool,
    ) -> Vec<Location> {
        self.with_tree(uri, |tree| {
            navigation::references(&self.engine, tree, uri, line, column, include_declaration)
        })
        .unwrap_or_default()
    }

    fn close_document(&self, uri: &str) {
        if let Some((_, tree)) = self.trees.remove(uri) {
            tree.release();
        }
        self.results.remove(uri);
        debug!("[{}] closed {}", Self::DISPLAY_NAME, uri);
    }

    fn health_check(&self) -> bool {
        self.parser.language().self_test().is_ok()
    }

    fn document_highlights(&self, uri: &str, line: usize, column: usize) -> Vec<DocumentHighlight> {
        self.with_tree(uri, |tree| navigation::highlights(&self.engine, tree, line, column))
            .unwrap_or_default()
    }

    fn selection_ranges(&self, uri: &str, positions: &[Position]) -> Vec<SelectionRange> {
        self.with_tree(uri, |tree| {
            positions
                .iter()
                .map(|p| navigation::selection_range(tree, *p))
                .collect()
        })
        .unwrap_or_default()
    }

    fn folding_ranges(&self, uri: &str) -> Vec<FoldingRange> {
        self.with_tree(uri, |tree| editing::folding_ranges(&self.engine, tree))
            .unwrap_or_default()
    }

    fn document_links(&self, uri: &str) -> Vec<DocumentLink> {
        self.with_tree(uri, |tree| editing::document_links(&self.engine, tree))
            .unwrap_or_default()
    }

    fn signature_help(&self, uri: &str, line: usize, column: usize) -> Option<SignatureHelp> {
        self.with_tree(uri, |tree| navigation::signature_help(tree, line, column))
            .flatten()
    }

    fn prepare_rename(&self, uri: &str, line: usize, column: usize) -> Option<PrepareRenameResult> {
        self.with_tree(uri, |tree| editing::prepare_rename(tree, line, column))
            .flatten()
    }

    fn rename(&self, uri: &str, line: usize, column: usize, new_name: &str) -> Option<WorkspaceEdit> {
        self.with_tree(uri, |tree| {
            editing::rename(&self.engine, tree, uri, line, column, new_name)
        })
        .flatten()
    }

    fn semantic_tokens(&self, uri: &str) -> Option<SemanticTokens> {
        let data = self.with_tree(uri, |tree| {
            SemanticTokenEncoder::new().encode(tree.root_node())
        })?;
        debug!("[{}] {} semantic tokens for {}", Self::DISPLAY_NAME, data.len() / 5, uri);
        (!data.is_empty()).then_some(SemanticTokens { data })
    }

    fn workspace_symbols(&self, query: &str) -> Vec<SymbolInfo> {
        let needle = query.to_lowercase();
        let mut matches: Vec<SymbolInfo> = self
            .results
            .iter()
            .flat_map(|entry| {
                entry
                    .value()
                    .all_symbols()
                    .filter(|s| s.name.to_lowercase().contains(&needle))
                    .map(|s| SymbolInfo {
                        children: Vec::new(),
                        ..s.clone()
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        matches.sort_by(|a, b| {
            (&a.location.uri, a.location.range.start())
                .cmp(&(&b.location.uri, b.location.range.start()))
        });
        matches
    }
}

//! Regex-driven stand-in for a real backend, for tests and bootstrapping. It only
//! recognizes declarations that start a line and never looks past the current file.

use super::constants::{BUILT_IN_TYPES, KEYWORDS, completion_kind};
use crate::query::diagnostics::DIAGNOSTIC_SOURCE;
use crate::util::utf16_len;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;
use xtc_api::{
    CompilationResult, CompilerAdapter, CompletionItem, CompletionKind, Diagnostic, Location,
    Range, SymbolInfo, SymbolKind,
};

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("mock adapter patterns are valid")
}

const VISIBILITY: &str = r"(?:(?:public|private|protected)[ \t]+)?";

static MODULE: Lazy<Regex> = Lazy::new(|| pattern(r"(?m)^[ \t]*module[ \t]+([\w.]+)[ \t]*\{?"));
static CLASS: Lazy<Regex> = Lazy::new(|| pattern(&format!(r"(?m)^[ \t]*{VISIBILITY}class[ \t]+(\w+)")));
static INTERFACE: Lazy<Regex> =
    Lazy::new(|| pattern(&format!(r"(?m)^[ \t]*{VISIBILITY}interface[ \t]+(\w+)")));
static SERVICE: Lazy<Regex> =
    Lazy::new(|| pattern(&format!(r"(?m)^[ \t]*{VISIBILITY}service[ \t]+(\w+)")));
static METHOD: Lazy<Regex> = Lazy::new(|| {
    pattern(&format!(
        r"(?m)^[ \t]*{VISIBILITY}(?:static[ \t]+)?(\w+(?:<[^>\n]+>)?(?:[ \t]*\|[ \t]*\w+)?)[ \t]+(\w+)[ \t]*\("
    ))
});
static PROPERTY: Lazy<Regex> =
    Lazy::new(|| pattern(&format!(r"(?m)^[ \t]*{VISIBILITY}(\w+(?:<[^>\n]+>)?)[ \t]+(\w+)[ \t]*[;=]")));
static ERROR_MARKER: Lazy<Regex> = Lazy::new(|| pattern(r"ERROR:[ \t]*(.+)"));

/// Words that can sit in the type position of the method and property patterns
/// without starting a declaration.
const NOT_A_TYPE: &[&str] = &["class", "interface", "service", "module", "return", "new", "else"];

#[derive(Default)]
pub struct MockAdapter {
    documents: DashMap<String, CompilationResult>,
}

impl MockAdapter {
    pub const DISPLAY_NAME: &'static str = "Mock";

    pub fn new() -> Self {
        Self::default()
    }
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count()
}

fn line_location(uri: &str, content: &str, start: usize, matched: &str) -> Location {
    let line = line_of(content, start);
    Location::new(uri, Range::new(line, 0, line, utf16_len(matched)))
}

fn type_declarations(
    pattern: &Regex,
    kind: SymbolKind,
    uri: &str,
    content: &str,
    symbols: &mut Vec<SymbolInfo>,
) {
    for captures in pattern.captures_iter(content) {
        let (Some(all), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let mut symbol = SymbolInfo::new(
            name.as_str(),
            kind,
            line_location(uri, content, all.start(), all.as_str()),
        );
        symbol.type_signature = Some(format!("{} {}", kind.as_str(), name.as_str()));
        symbol.documentation = Some(format!("{} {}", capitalize(kind.as_str()), name.as_str()));
        symbols.push(symbol);
    }
}

fn typed_members(
    pattern: &Regex,
    kind: SymbolKind,
    uri: &str,
    content: &str,
    symbols: &mut Vec<SymbolInfo>,
) {
    for captures in pattern.captures_iter(content) {
        let (Some(all), Some(ty), Some(name)) = (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        if NOT_A_TYPE.contains(&ty.as_str()) {
            continue;
        }
        let mut symbol = SymbolInfo::new(
            name.as_str(),
            kind,
            line_location(uri, content, all.start(), all.as_str()),
        );
        symbol.type_signature = Some(match kind {
            SymbolKind::Method => format!("{} {}(...)", ty.as_str(), name.as_str()),
            _ => format!("{} {}", ty.as_str(), name.as_str()),
        });
        symbols.push(symbol);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

impl CompilerAdapter for MockAdapter {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    fn compile(&self, uri: &str, content: &str) -> CompilationResult {
        let mut diagnostics = Vec::new();
        let mut symbols = Vec::new();

        for captures in ERROR_MARKER.captures_iter(content) {
            let (Some(all), Some(message)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            let line = line_of(content, all.start());
            diagnostics.push(
                Diagnostic::error(Location::new(uri, Range::new(line, 0, line, 0)), message.as_str().trim_end())
                    .with_source(DIAGNOSTIC_SOURCE),
            );
        }

        if let Some(captures) = MODULE.captures(content)
            && let (Some(all), Some(name)) = (captures.get(0), captures.get(1))
        {
            let mut module = SymbolInfo::new(
                name.as_str(),
                SymbolKind::Module,
                line_location(uri, content, all.start(), all.as_str()),
            );
            module.documentation = Some(format!("Module {}", name.as_str()));
            symbols.push(module);
        }

        type_declarations(&CLASS, SymbolKind::Class, uri, content, &mut symbols);
        type_declarations(&INTERFACE, SymbolKind::Interface, uri, content, &mut symbols);
        type_declarations(&SERVICE, SymbolKind::Service, uri, content, &mut symbols);
        typed_members(&METHOD, SymbolKind::Method, uri, content, &mut symbols);
        typed_members(&PROPERTY, SymbolKind::Property, uri, content, &mut symbols);

        if content.contains('{') && !content.contains('}') {
            let last = content.split('\n').count() - 1;
            diagnostics.push(
                Diagnostic::error(
                    Location::new(uri, Range::new(last, 0, last, 0)),
                    "Unmatched opening brace",
                )
                .with_source(DIAGNOSTIC_SOURCE),
            );
        }

        let result = CompilationResult::new(uri, diagnostics, symbols);
        info!(
            "[{}] compiled {}: {} symbols, {} diagnostics",
            Self::DISPLAY_NAME,
            uri,
            result.symbols.len(),
            result.diagnostics.len()
        );
        self.documents.insert(uri.to_string(), result.clone());
        result
    }

    fn find_symbol_at(&self, uri: &str, line: usize, column: usize) -> Option<SymbolInfo> {
        let result = self.documents.get(uri)?;
        result
            .symbols
            .iter()
            .find(|s| s.location.range.contains(line, column))
            .cloned()
    }

    fn get_completions(&self, uri: &str, _line: usize, _column: usize) -> Vec<CompletionItem> {
        let mut items: Vec<CompletionItem> = KEYWORDS
            .iter()
            .map(|k| CompletionItem::new(*k, CompletionKind::Keyword, "keyword"))
            .chain(
                BUILT_IN_TYPES
                    .iter()
                    .map(|t| CompletionItem::new(*t, CompletionKind::Class, "built-in type")),
            )
            .collect();
        if let Some(result) = self.documents.get(uri) {
            items.extend(result.symbols.iter().map(|s| {
                let detail = s.type_signature.clone().unwrap_or_else(|| s.kind.as_str().to_string());
                CompletionItem::new(&s.name, completion_kind(s.kind), detail)
            }));
        }
        items
    }

    /// The symbol's own declaration; nothing is resolved.
    fn find_definition(&self, uri: &str, line: usize, column: usize) -> Option<Location> {
        self.find_symbol_at(uri, line, column).map(|s| s.location)
    }

    /// Only the declaration itself is known, so without it there is nothing to return.
    fn find_references(
        &self,
        uri: &str,
        line: usize,
        column: usize,
        include_declaration: bool,
    ) -> Vec<Location> {
        if !include_declaration {
            return Vec::new();
        }
        self.find_symbol_at(uri, line, column)
            .map(|s| vec![s.location])
            .unwrap_or_default()
    }

    fn close_document(&self, uri: &str) {
        self.documents.remove(uri);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "file:///test.x";

    fn names(result: &CompilationResult, kind: SymbolKind) -> Vec<&str> {
        result
            .symbols
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| s.name.as_str())
            .collect()
    }

    #[test]
    fn test_declarations_by_pattern() {
        let source = "module myapp {
    class Person {
        String name;
        String getName() {
            return name;
        }
    }
    interface Runnable {
    }
    service UserService {
    }
}";
        let result = MockAdapter::new().compile(URI, source);

        assert!(result.success);
        assert_eq!(names(&result, SymbolKind::Module), ["myapp"]);
        assert_eq!(names(&result, SymbolKind::Class), ["Person"]);
        assert_eq!(names(&result, SymbolKind::Interface), ["Runnable"]);
        assert_eq!(names(&result, SymbolKind::Service), ["UserService"]);
        assert_eq!(names(&result, SymbolKind::Method), ["getName"]);
        assert_eq!(names(&result, SymbolKind::Property), ["name"]);

        let person = result.symbols.iter().find(|s| s.name == "Person").unwrap();
        assert_eq!(person.location.range, Range::new(1, 0, 1, 16));
        assert_eq!(person.type_signature.as_deref(), Some("class Person"));
    }

    #[test]
    fn test_error_markers_and_unmatched_brace() {
        let adapter = MockAdapter::new();

        let result = adapter.compile(URI, "module myapp {\n    // ERROR: broken here\n}");
        assert!(!result.success);
        assert_eq!(result.diagnostics[0].message, "broken here");
        assert_eq!(result.diagnostics[0].location.range.start_line, 1);

        let result = adapter.compile(URI, "module myapp {\n    class Person {\n");
        let message = &result.diagnostics[0];
        assert_eq!(message.message, "Unmatched opening brace");
        assert_eq!(message.location.range.start_line, 2);
    }

    #[test]
    fn test_lookups() {
        let adapter = MockAdapter::new();
        adapter.compile(URI, "module myapp {\n    class Person {\n    }\n}");

        let hover = adapter.get_hover_info(URI, 1, 10).unwrap();
        assert!(hover.contains("class Person"));
        assert!(adapter.get_hover_info(URI, 3, 5).is_none());

        assert_eq!(adapter.find_definition(URI, 1, 10).unwrap().range.start_line, 1);
        assert_eq!(adapter.find_references(URI, 1, 10, true).len(), 1);
        assert!(adapter.find_references(URI, 1, 10, false).is_empty());

        let completions = adapter.get_completions(URI, 0, 0);
        assert!(completions.iter().any(|c| c.label == "Person"));
        assert!(completions.iter().any(|c| c.label == "class" && c.kind == CompletionKind::Keyword));
        assert!(completions.iter().any(|c| c.label == "String" && c.detail == "built-in type"));

        adapter.close_document(URI);
        assert!(adapter.find_symbol_at(URI, 1, 10).is_none());
    }
}

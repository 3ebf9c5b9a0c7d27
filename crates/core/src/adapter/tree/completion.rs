use crate::adapter::constants::{BUILT_IN_TYPES, KEYWORDS, completion_kind};
use crate::query::QueryEngine;
use std::collections::HashSet;
use xtc_api::{CompilationResult, CompletionItem, CompletionKind};
use xtc_syntax::SyntaxTree;

/// Context-free completions: keywords, built-in types, the document's own symbols,
/// imported names and methods called in the file but declared elsewhere.
pub fn completions(
    engine: &QueryEngine,
    tree: Option<&SyntaxTree>,
    result: Option<&CompilationResult>,
    uri: &str,
) -> Vec<CompletionItem> {
    let mut items: Vec<CompletionItem> = KEYWORDS
        .iter()
        .map(|k| CompletionItem::new(*k, CompletionKind::Keyword, "keyword"))
        .chain(
            BUILT_IN_TYPES
                .iter()
                .map(|t| CompletionItem::new(*t, CompletionKind::Class, "built-in type")),
        )
        .collect();

    let mut declared = HashSet::new();
    if let Some(result) = result {
        for symbol in result.all_symbols() {
            declared.insert(symbol.name.clone());
            let detail = symbol
                .type_signature
                .clone()
                .unwrap_or_else(|| symbol.kind.as_str().to_string());
            items.push(CompletionItem::new(&symbol.name, completion_kind(symbol.kind), detail));
        }
    }

    let Some(tree) = tree else {
        return items;
    };
    for site in engine.import_sites(tree) {
        let name = site.simple_name().to_string();
        declared.insert(name.clone());
        items.push(CompletionItem::new(
            name,
            CompletionKind::Class,
            format!("import: {}", site.path),
        ));
    }

    let mut called = HashSet::new();
    for (callee, _) in engine.find_callees(tree, uri) {
        if !declared.contains(&callee) && called.insert(callee.clone()) {
            items.push(CompletionItem::new(callee, CompletionKind::Method, "called in file"));
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use xtc_syntax::{Parser, language};

    const URI: &str = "file:///complete.x";

    #[test]
    fn test_completion_sources() {
        let source = "module myapp {
    import ecstasy.io.Console;
    import ecstasy.collections.HashMap as Map;
    class Calculator {
        Int add(Int a, Int b) {
            return a + b;
        }
        void test() {
            add(1, 2);
            console.print(log(3));
        }
    }
}";
        let language = language().unwrap();
        let engine = QueryEngine::new(&language).unwrap();
        let tree = Parser::new(&language).parse(source);
        let result = CompilationResult::new(URI, Vec::new(), engine.symbol_hierarchy(&tree, URI));

        let items = completions(&engine, Some(&tree), Some(&result), URI);
        let find = |label: &str| items.iter().find(|i| i.label == label);

        assert_eq!(find("construct").unwrap().kind, CompletionKind::Keyword);
        assert_eq!(find("String").unwrap().detail, "built-in type");
        assert_eq!(find("Calculator").unwrap().kind, CompletionKind::Class);
        assert_eq!(find("add").unwrap().detail, "Int add(Int a, Int b)");
        assert_eq!(find("Console").unwrap().detail, "import: ecstasy.io.Console");
        assert_eq!(find("Map").unwrap().detail, "import: ecstasy.collections.HashMap");
        assert_eq!(find("print").unwrap().detail, "called in file");
        assert_eq!(find("log").unwrap().kind, CompletionKind::Method);
        assert_eq!(items.iter().filter(|i| i.label == "add").count(), 1);
    }

    #[test]
    fn test_completions_without_document() {
        let language = language().unwrap();
        let engine = QueryEngine::new(&language).unwrap();

        let items = completions(&engine, None, None, URI);
        assert_eq!(items.len(), KEYWORDS.len() + BUILT_IN_TYPES.len());
    }
}

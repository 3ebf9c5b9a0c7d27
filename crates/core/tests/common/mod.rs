use std::sync::Arc;
use xtc_api::{CompilationResult, CompilerAdapter, SymbolInfo, SymbolKind};
use xtc_core::{MockAdapter, TreeAdapter};

/// Both backends that can start in tests, labelled for assertion messages.
#[allow(dead_code)]
pub fn all_backends() -> Vec<(&'static str, Arc<dyn CompilerAdapter>)> {
    vec![
        ("tree", Arc::new(TreeAdapter::new().expect("grammar loads"))),
        ("mock", Arc::new(MockAdapter::new())),
    ]
}

#[allow(dead_code)]
pub fn uri(name: &str) -> String {
    format!("file:///workspace/{name}.x")
}

#[allow(dead_code)]
pub fn find_symbol<'a>(result: &'a CompilationResult, name: &str) -> Option<&'a SymbolInfo> {
    result.all_symbols().find(|s| s.name == name)
}

#[allow(dead_code)]
pub fn kinds(result: &CompilationResult) -> Vec<(String, SymbolKind)> {
    result
        .all_symbols()
        .map(|s| (s.name.clone(), s.kind))
        .collect()
}

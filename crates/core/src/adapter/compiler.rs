//! Backend for the full semantic compiler. There is no compiler to attach to yet,
//! so construction reports the backend as unavailable and selection falls back.

use xtc_api::{
    AdapterError, AdapterResult, CompilationResult, CompilerAdapter, CompletionItem, Location,
    SymbolInfo,
};

const BACKEND: &str = "compiler";

pub struct CompilerBackedAdapter {
    _private: (),
}

impl CompilerBackedAdapter {
    pub const DISPLAY_NAME: &'static str = "Compiler";

    pub fn new() -> AdapterResult<Self> {
        Err(AdapterError::Unavailable {
            backend: BACKEND,
            reason: "no semantic compiler is linked into this build".to_string(),
        })
    }
}

impl CompilerAdapter for CompilerBackedAdapter {
    fn display_name(&self) -> &str {
        Self::DISPLAY_NAME
    }

    fn compile(&self, uri: &str, _content: &str) -> CompilationResult {
        CompilationResult::new(uri, Vec::new(), Vec::new())
    }

    fn find_symbol_at(&self, _uri: &str, _line: usize, _column: usize) -> Option<SymbolInfo> {
        None
    }

    fn get_completions(&self, _uri: &str, _line: usize, _column: usize) -> Vec<CompletionItem> {
        Vec::new()
    }

    fn find_definition(&self, _uri: &str, _line: usize, _column: usize) -> Option<Location> {
        None
    }

    fn find_references(&self, _uri: &str, _line: usize, _column: usize, _include: bool) -> Vec<Location> {
        Vec::new()
    }

    fn health_check(&self) -> bool {
        false
    }
}

use super::position::Location;
use super::symbol::SymbolInfo;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub location: Location,
    pub severity: Severity,
    pub message: String,
    pub code: Option<String>,
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn new(location: Location, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            location,
            severity,
            message: message.into(),
            code: None,
            source: None,
        }
    }

    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self::new(location, Severity::Error, message)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Outcome of compiling one document. Replaces any previous result for the same uri.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CompilationResult {
    pub uri: String,
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
    /// Top-level symbols; nested declarations hang off `children`.
    pub symbols: Vec<SymbolInfo>,
}

impl CompilationResult {
    pub fn new(uri: impl Into<String>, diagnostics: Vec<Diagnostic>, symbols: Vec<SymbolInfo>) -> Self {
        let success = !diagnostics.iter().any(|d| d.severity == Severity::Error);
        Self {
            uri: uri.into(),
            success,
            diagnostics,
            symbols,
        }
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &SymbolInfo> {
        self.symbols.iter().flat_map(|s| s.walk())
    }
}

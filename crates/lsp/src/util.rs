use tower_lsp::lsp_types::*;
use xtc_api as api;

/// Latest text of an open document and the outline from its last compile.
pub struct Document {
    pub content: String,
    pub version: i32,
    pub symbols: Vec<api::SymbolInfo>,
}

impl Document {
    pub fn new(content: String, version: i32) -> Self {
        Self {
            content,
            version,
            symbols: Vec::new(),
        }
    }
}

pub fn to_lsp_position(position: api::Position) -> Position {
    Position::new(position.line as u32, position.column as u32)
}

pub fn to_lsp_range(range: api::Range) -> Range {
    Range {
        start: to_lsp_position(range.start()),
        end: to_lsp_position(range.end()),
    }
}

pub fn from_lsp_position(position: Position) -> api::Position {
    api::Position::new(position.line as usize, position.character as usize)
}

pub fn from_lsp_range(range: Range) -> api::Range {
    api::Range::new(
        range.start.line as usize,
        range.start.character as usize,
        range.end.line as usize,
        range.end.character as usize,
    )
}

/// `None` when the adapter produced a uri the protocol cannot carry.
pub fn to_lsp_location(location: &api::Location) -> Option<Location> {
    match Url::parse(&location.uri) {
        Ok(uri) => Some(Location::new(uri, to_lsp_range(location.range))),
        Err(e) => {
            tracing::warn!("Dropping location with bad uri {}: {}", location.uri, e);
            None
        }
    }
}

pub fn to_lsp_diagnostic(diagnostic: &api::Diagnostic) -> Diagnostic {
    let severity = match diagnostic.severity {
        api::Severity::Error => DiagnosticSeverity::ERROR,
        api::Severity::Warning => DiagnosticSeverity::WARNING,
        api::Severity::Information => DiagnosticSeverity::INFORMATION,
        api::Severity::Hint => DiagnosticSeverity::HINT,
    };
    Diagnostic {
        range: to_lsp_range(diagnostic.location.range),
        severity: Some(severity),
        code: diagnostic.code.clone().map(NumberOrString::String),
        source: diagnostic.source.clone(),
        message: diagnostic.message.clone(),
        ..Default::default()
    }
}

pub fn to_lsp_symbol_kind(kind: api::SymbolKind) -> SymbolKind {
    match kind {
        api::SymbolKind::Module => SymbolKind::MODULE,
        api::SymbolKind::Package => SymbolKind::PACKAGE,
        api::SymbolKind::Class | api::SymbolKind::Service | api::SymbolKind::Mixin => SymbolKind::CLASS,
        api::SymbolKind::Interface => SymbolKind::INTERFACE,
        api::SymbolKind::Const => SymbolKind::STRUCT,
        api::SymbolKind::Enum => SymbolKind::ENUM,
        api::SymbolKind::Method => SymbolKind::METHOD,
        api::SymbolKind::Constructor => SymbolKind::CONSTRUCTOR,
        api::SymbolKind::Property => SymbolKind::PROPERTY,
        api::SymbolKind::Parameter => SymbolKind::VARIABLE,
        api::SymbolKind::TypeParameter => SymbolKind::TYPE_PARAMETER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_conversion_keeps_columns() {
        let range = api::Range::new(3, 4, 5, 6);
        let lsp = to_lsp_range(range);
        assert_eq!(lsp.start, Position::new(3, 4));
        assert_eq!(lsp.end, Position::new(5, 6));
        assert_eq!(from_lsp_range(lsp), range);
    }

    #[test]
    fn test_location_with_bad_uri_is_dropped() {
        let good = api::Location::new("file:///a.x", api::Range::new(0, 0, 0, 1));
        let bad = api::Location::new("not a uri", api::Range::new(0, 0, 0, 1));
        assert_eq!(to_lsp_location(&good).unwrap().uri.as_str(), "file:///a.x");
        assert!(to_lsp_location(&bad).is_none());
    }

    #[test]
    fn test_diagnostic_conversion() {
        let diagnostic = api::Diagnostic::error(
            api::Location::new("file:///a.x", api::Range::new(1, 2, 1, 3)),
            "Syntax error: missing }",
        )
        .with_source("xtc");
        let lsp = to_lsp_diagnostic(&diagnostic);
        assert_eq!(lsp.severity, Some(DiagnosticSeverity::ERROR));
        assert_eq!(lsp.source.as_deref(), Some("xtc"));
        assert_eq!(lsp.range.start, Position::new(1, 2));
        assert_eq!(lsp.message, "Syntax error: missing }");
    }
}

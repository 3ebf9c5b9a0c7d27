use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No XTC grammar is available for platform {0}")]
    UnsupportedPlatform(String),
    #[error("Grammar self-test failed: {0}")]
    SelfTest(String),
    #[error("Grammar loader lock was poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    Syntax,
    NodeType,
    Field,
    Capture,
    Predicate,
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            QueryErrorKind::Syntax => "invalid syntax",
            QueryErrorKind::NodeType => "unknown node type",
            QueryErrorKind::Field => "unknown field",
            QueryErrorKind::Capture => "unknown capture",
            QueryErrorKind::Predicate => "invalid predicate",
        };
        f.write_str(text)
    }
}

/// A query that failed to compile, with the position of the offending text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Query error at {row}:{column}: {kind} {message}")]
pub struct QueryError {
    pub row: usize,
    pub column: usize,
    pub offset: usize,
    pub kind: QueryErrorKind,
    pub message: String,
}

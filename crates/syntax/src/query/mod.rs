//! S-expression structural queries over a [`SyntaxTree`](crate::SyntaxTree).
//!
//! ```text
//! (class_declaration name: (type_name) @name) @definition.class
//! [(identifier) (type_name)] @identifier
//! ((identifier) @callee (#eq? @callee "print"))
//! ```

mod compile;
mod cursor;

pub use cursor::{QueryCapture, QueryCursor, QueryMatch, QueryMatches};

use crate::error::QueryError;
use crate::kind::{Field, SyntaxKind};
use crate::language::Language;
use regex::Regex;

#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    /// `(kind ...)`
    Named(SyntaxKind),
    /// `(_ ...)`
    AnyNamed,
    /// `_`
    Any,
    /// `"text"`
    Anonymous(SyntaxKind),
    /// `[a b c]`
    Alternation(Vec<Pattern>),
}

#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    pub matcher: Matcher,
    pub field: Option<Field>,
    pub children: Vec<Pattern>,
    pub captures: Vec<u32>,
}

#[derive(Debug, Clone)]
pub(crate) enum Operand {
    Capture(u32),
    Literal(String),
}

#[derive(Debug, Clone)]
pub(crate) enum Predicate {
    Eq {
        capture: u32,
        operand: Operand,
        negated: bool,
    },
    Match {
        capture: u32,
        regex: Regex,
        negated: bool,
    },
    AnyOf {
        capture: u32,
        values: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct PatternEntry {
    pub root: Pattern,
    pub predicates: Vec<Predicate>,
    pub start_byte: usize,
}

/// A compiled set of patterns. Compile once, run many times.
#[derive(Debug, Clone)]
pub struct Query {
    patterns: Vec<PatternEntry>,
    capture_names: Vec<String>,
}

impl Query {
    pub fn new(language: &Language, source: &str) -> Result<Query, QueryError> {
        let (patterns, capture_names) = compile::compile(language, source)?;
        tracing::trace!(
            "Compiled query with {} patterns and {} captures",
            patterns.len(),
            capture_names.len()
        );
        Ok(Query {
            patterns,
            capture_names,
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Byte offset in the query source where pattern `index` starts.
    pub fn start_byte_for_pattern(&self, index: usize) -> Option<usize> {
        self.patterns.get(index).map(|p| p.start_byte)
    }

    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    pub fn capture_index_for_name(&self, name: &str) -> Option<u32> {
        self.capture_names
            .iter()
            .position(|n| n == name)
            .map(|i| i as u32)
    }

    pub(crate) fn entries(&self) -> &[PatternEntry] {
        &self.patterns
    }
}

//! Error-tolerant XTC parsing: concrete syntax trees, node navigation and structural
//! queries.
//!
//! ```
//! let language = xtc_syntax::language().unwrap();
//! let tree = xtc_syntax::Parser::new(&language).parse("module app {}");
//! assert_eq!(tree.root_node().kind(), "source_file");
//! assert!(!tree.has_errors());
//! ```

mod builder;
pub mod error;
mod grammar;
pub mod kind;
pub mod language;
mod lexer;
pub mod parser;
pub mod query;
pub mod tree;

pub use error::{LoadError, QueryError, QueryErrorKind};
pub use kind::{Field, SyntaxKind};
pub use language::{Language, PlatformId, language};
pub use parser::Parser;
pub use query::{Query, QueryCapture, QueryCursor, QueryMatch, QueryMatches};
pub use tree::{Point, SyntaxNode, SyntaxTree};

//! Language intelligence for XTC source: structural queries over the syntax tree,
//! semantic highlighting, and the backends that answer editor requests.

pub mod adapter;
pub mod config;
pub mod error;
pub mod logging;
pub mod queries;
pub mod query;
pub mod semantic;
pub mod util;

pub use xtc_syntax as syntax;

pub use adapter::{
    CompilerBackedAdapter, MockAdapter, TreeAdapter, build_adapter, select_adapter,
};
pub use config::{AdapterKind, ServerConfig};
pub use error::{CoreError, Result};
pub use query::{QueryEngine, QueryKind};
pub use semantic::{SemanticTokenEncoder, TOKEN_MODIFIERS, TOKEN_TYPES};

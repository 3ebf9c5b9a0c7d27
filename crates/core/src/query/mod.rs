pub mod diagnostics;
pub mod engine;
pub mod symbols;
pub mod utils;

pub use diagnostics::collect_syntax_errors;
pub use engine::{Captures, ImportSite, QueryEngine, QueryKind};

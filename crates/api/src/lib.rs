pub mod adapter;
pub mod error;
pub mod models;

pub use adapter::{CompilerAdapter, trailing_whitespace_edits};
pub use error::{AdapterError, AdapterResult};
pub use models::*;

use thiserror::Error;
use xtc_api::AdapterError;
use xtc_syntax::{LoadError, QueryError};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Grammar unavailable: {0}")]
    Load(#[from] LoadError),
    #[error("Invalid query: {0}")]
    Query(#[from] QueryError),
    #[error("Capture name '{0}' not found in query")]
    MissingCapture(String),
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

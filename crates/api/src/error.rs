#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("Backend '{backend}' is unavailable: {reason}")]
    Unavailable {
        backend: &'static str,
        reason: String,
    },
    #[error("Backend initialization failed: {0}")]
    Init(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

use thiserror::Error;

/// Aegis 统一错误类型
#[derive(Error, Debug)]
pub enum AegisError {
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Locked out: {0}")]
    LockedOut(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, AegisError>;

impl From<anyhow::Error> for AegisError {
    fn from(err: anyhow::Error) -> Self {
        AegisError::Internal(err.to_string())
    }
}

//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Audit error: {0}")]
    Audit(String),

    #[error("PageSpeed API is experiencing timeouts, try again later")]
    AuditTimeout,

    #[error("Insight error: {0}")]
    Insight(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Transient upstream failures are worth another attempt; everything
    /// else (bad input, missing credentials, quota) is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Audit(_) | AppError::AuditTimeout)
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}

use thiserror::Error;

/// Core error types for Courier domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a new Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new InvalidTimestamp error
    pub fn invalid_timestamp(detail: impl Into<String>) -> Self {
        Self::InvalidTimestamp(detail.into())
    }

    /// Check if this error is a validation failure (maps to 400 at the boundary)
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

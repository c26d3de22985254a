use thiserror::Error;

use courier_core::CoreError;
use courier_storage::StorageError;

/// Errors raised by the notification pipeline.
///
/// All variants propagate to the boundary layer unmodified; nothing is
/// recovered or retried inside the pipeline.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// A referenced record does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// The request is structurally valid but violates a pipeline rule.
    #[error("Bad request: {reason}")]
    BadRequest { reason: String },

    /// The pipeline is wired with unusable configuration. Unrecoverable.
    #[error("Configuration error: {detail}")]
    Configuration { detail: String },

    /// The underlying relay or gateway call failed.
    #[error("Transport failure: {detail}")]
    Transport { detail: String },

    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl NotificationError {
    /// Create a new NotFound error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a new BadRequest error
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    /// Create a new Configuration error
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration {
            detail: detail.into(),
        }
    }

    /// Create a new Transport error
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    /// Create a new Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this error is a not found error (maps to 404 at the boundary)
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a bad request (maps to 400 at the boundary)
    pub fn is_bad_request(&self) -> bool {
        matches!(self, Self::BadRequest { .. })
    }

    /// Check if this error is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Check if this error is a transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if this error is a client error (4xx category)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::BadRequest { .. })
    }
}

impl From<StorageError> for NotificationError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { resource, id } => Self::NotFound { resource, id },
            StorageError::Internal { message } => Self::Internal { message },
        }
    }
}

impl From<CoreError> for NotificationError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => Self::BadRequest { reason: message },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

/// Convenience result type for pipeline operations
pub type Result<T> = std::result::Result<T, NotificationError>;

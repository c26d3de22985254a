//! Error types for the store abstraction layer.

use std::fmt;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested record was not found.
    #[error("{resource} not found: {id}")]
    NotFound {
        /// The kind of record that was not found (e.g. "template").
        resource: String,
        /// The id that was looked up.
        id: String,
    },

    /// An internal store error occurred.
    #[error("Internal storage error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StorageError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::not_found("template", "t-123");
        assert_eq!(err.to_string(), "template not found: t-123");

        let err = StorageError::internal("lock poisoned");
        assert_eq!(err.to_string(), "Internal storage error: lock poisoned");
    }

    #[test]
    fn test_error_predicates() {
        assert!(StorageError::not_found("sender", "s-1").is_not_found());
        assert!(!StorageError::internal("oops").is_not_found());
    }
}

//! Store traits for the keyed-repository abstraction.
//!
//! These traits define the contract every backing store must honor. The
//! reference implementations in [`crate::memory`] are volatile; a durable
//! backend can be swapped in without touching the pipeline, as long as each
//! operation stays a single atomic action keyed by id.
//!
//! Concurrent updates to the *same* id are last-writer-wins. A
//! production-grade backend should extend `put` with an expected-version
//! check to close that lost-update window.

use std::sync::Arc;

use async_trait::async_trait;

use courier_core::{Sender, Template};

use crate::error::StorageError;

/// Keyed repository owning all template records.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Reads a template by id. Returns `None` for unknown ids.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for misses.
    async fn get(&self, id: &str) -> Result<Option<Template>, StorageError>;

    /// Writes a template record, replacing any record with the same id.
    async fn put(&self, template: Template) -> Result<(), StorageError>;

    /// Returns whether a record with this id exists.
    async fn contains(&self, id: &str) -> Result<bool, StorageError>;

    /// Removes a record by id. Returns `false` when the id was absent.
    async fn remove(&self, id: &str) -> Result<bool, StorageError>;

    /// Returns all stored templates.
    async fn list(&self) -> Result<Vec<Template>, StorageError>;
}

/// Keyed repository owning all sender records.
///
/// Implementations must be thread-safe (`Send + Sync`).
#[async_trait]
pub trait SenderStore: Send + Sync {
    /// Reads a sender by id. Returns `None` for unknown ids.
    async fn get(&self, id: &str) -> Result<Option<Sender>, StorageError>;

    /// Writes a sender record, replacing any record with the same id.
    async fn put(&self, sender: Sender) -> Result<(), StorageError>;

    /// Returns whether a record with this id exists.
    async fn contains(&self, id: &str) -> Result<bool, StorageError>;

    /// Removes a record by id. Returns `false` when the id was absent.
    async fn remove(&self, id: &str) -> Result<bool, StorageError>;

    /// Returns all stored senders.
    async fn list(&self) -> Result<Vec<Sender>, StorageError>;
}

/// Type alias for a shareable template store instance
pub type DynTemplateStore = Arc<dyn TemplateStore>;

/// Type alias for a shareable sender store instance
pub type DynSenderStore = Arc<dyn SenderStore>;

// Ensure traits are object-safe by using them as trait objects
#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time test that TemplateStore is object-safe
    fn _assert_template_store_object_safe(_: &dyn TemplateStore) {}

    // Compile-time test that SenderStore is object-safe
    fn _assert_sender_store_object_safe(_: &dyn SenderStore) {}
}

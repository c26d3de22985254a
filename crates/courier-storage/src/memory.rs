//! Volatile in-memory store implementations.
//!
//! Records live in process memory and are lost on restart. Each operation
//! takes the lock once, so every store call is a single atomic map action.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use courier_core::{Sender, Template};

use crate::error::StorageError;
use crate::traits::{SenderStore, TemplateStore};

/// In-memory template store backed by a `HashMap` keyed by template id.
#[derive(Default)]
pub struct InMemoryTemplateStore {
    records: RwLock<HashMap<String, Template>>,
}

impl InMemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn get(&self, id: &str) -> Result<Option<Template>, StorageError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, template: Template) -> Result<(), StorageError> {
        self.records
            .write()
            .await
            .insert(template.id.clone(), template);
        Ok(())
    }

    async fn contains(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.records.read().await.contains_key(id))
    }

    async fn remove(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.records.write().await.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<Template>, StorageError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

/// In-memory sender store backed by a `HashMap` keyed by sender id.
#[derive(Default)]
pub struct InMemorySenderStore {
    records: RwLock<HashMap<String, Sender>>,
}

impl InMemorySenderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SenderStore for InMemorySenderStore {
    async fn get(&self, id: &str) -> Result<Option<Sender>, StorageError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, sender: Sender) -> Result<(), StorageError> {
        self.records.write().await.insert(sender.id.clone(), sender);
        Ok(())
    }

    async fn contains(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.records.read().await.contains_key(id))
    }

    async fn remove(&self, id: &str) -> Result<bool, StorageError> {
        Ok(self.records.write().await.remove(id).is_some())
    }

    async fn list(&self) -> Result<Vec<Sender>, StorageError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

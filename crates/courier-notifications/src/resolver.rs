use std::sync::Arc;

use async_trait::async_trait;

use courier_core::Template;
use courier_storage::DynTemplateStore;

use crate::error::NotificationError;

/// Capability to look up a template by identifier.
///
/// A resolver is a pure read: it does not validate id shape, so a
/// malformed id resolves the same way an unknown one does (`None`).
#[async_trait]
pub trait TemplateResolver: Send + Sync {
    async fn resolve(&self, template_id: &str) -> Result<Option<Template>, NotificationError>;
}

/// Type alias for a shareable resolver instance
pub type DynTemplateResolver = Arc<dyn TemplateResolver>;

/// Read-through resolver backed by a template store, with no caching
/// beyond whatever the store itself provides.
pub struct StoreTemplateResolver {
    store: DynTemplateStore,
}

impl StoreTemplateResolver {
    pub fn new(store: DynTemplateStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TemplateResolver for StoreTemplateResolver {
    async fn resolve(&self, template_id: &str) -> Result<Option<Template>, NotificationError> {
        Ok(self.store.get(template_id).await?)
    }
}

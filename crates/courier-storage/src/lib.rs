//! Store abstraction layer for the Courier notification service.
//!
//! This crate defines the keyed-repository traits the pipeline reads
//! templates and senders through, and the volatile in-memory
//! implementations the reference deployment runs with.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::StorageError;
pub use memory::{InMemorySenderStore, InMemoryTemplateStore};
pub use traits::{DynSenderStore, DynTemplateStore, SenderStore, TemplateStore};

//! Content storage interface and implementations.
//!
//! The lifecycle manager never touches shared state directly; every
//! transition is a single atomic update applied through a [`ContentStore`].
//! Two implementations ship with the crate:
//! - [`MemoryStore`]: in-process map, used by tests and embedders
//! - [`JournalStore`]: append-only JSONL log with state derived by replay

pub mod journal;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{ContentItem, ContentUpdate, NewContent};

pub use journal::JournalStore;
pub use memory::MemoryStore;

/// Errors that can occur in a content store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Content not found: {0}")]
    NotFound(Uuid),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Trait for content record storage.
///
/// Reads have no side effects: calling [`ContentStore::get`] repeatedly
/// without an intervening update returns identical values. Updates are
/// atomic per record; concurrent readers never observe a partially-applied
/// merge.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Persist a new item: assigns its id and timestamps, status `Uploaded`.
    async fn create(&self, new: NewContent) -> Result<ContentItem, StoreError>;

    /// Fetch an item by id, `None` if it does not exist.
    async fn get(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError>;

    /// Merge partial fields into an item and refresh its `updated_at`.
    ///
    /// Fails with [`StoreError::NotFound`] if the id does not exist.
    async fn update(&self, id: Uuid, update: ContentUpdate) -> Result<ContentItem, StoreError>;

    /// All items belonging to an owner, most recently created first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ContentItem>, StoreError>;

    /// Delete an item, returning it if it existed.
    ///
    /// Deletion is a store-layer concern; the lifecycle manager never
    /// removes items.
    async fn remove(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError>;
}

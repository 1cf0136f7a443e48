//! In-memory content store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ContentItem, ContentUpdate, NewContent};

use super::{ContentStore, StoreError};

/// Map-backed store for tests and in-process embedding.
///
/// Each operation takes the lock once, so individual updates are atomic
/// with respect to concurrent readers.
#[derive(Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<Uuid, ContentItem>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of items currently stored
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no items
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn create(&self, new: NewContent) -> Result<ContentItem, StoreError> {
        let item = ContentItem::new(new);
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, update: ContentUpdate) -> Result<ContentItem, StoreError> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        item.apply(update, Utc::now());
        Ok(item.clone())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ContentItem>, StoreError> {
        let items = self.items.read().await;
        let mut owned: Vec<ContentItem> = items
            .values()
            .filter(|item| item.owner_id == owner_id)
            .cloned()
            .collect();

        // Most recently created first
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }

    async fn remove(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError> {
        Ok(self.items.write().await.remove(&id))
    }
}

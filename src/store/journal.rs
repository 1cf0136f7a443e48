//! JSONL-backed content store.
//!
//! Follows the append-only journal pattern: every mutation is written as a
//! JSON line, and current state is derived by replaying the journal. The
//! format doubles as an audit trail of every lifecycle transition.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use uuid::Uuid;

use crate::domain::{ContentItem, ContentUpdate, NewContent};

use super::{ContentStore, StoreError};

/// One line in the journal file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "entry")]
enum JournalEntry {
    Created {
        at: DateTime<Utc>,
        item: ContentItem,
    },
    Updated {
        at: DateTime<Utc>,
        id: Uuid,
        update: ContentUpdate,
    },
    Removed {
        at: DateTime<Utc>,
        id: Uuid,
    },
}

/// File-backed content store using JSONL format
pub struct JournalStore {
    /// Path to the journal file
    journal_path: PathBuf,
}

impl JournalStore {
    /// Create a store over a journal file (created lazily on first write)
    pub fn new(journal_path: PathBuf) -> Self {
        Self { journal_path }
    }

    /// Open a store, ensuring the parent directory exists
    pub async fn open(journal_path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = journal_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(Self::new(journal_path))
    }

    /// Path of the underlying journal file
    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Append one entry to the journal
    async fn append(&self, entry: &JournalEntry) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal_path)
            .await?;

        let json = serde_json::to_string(entry)?;
        file.write_all(format!("{}\n", json).as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    /// Replay the journal into the current item map
    async fn replay(&self) -> Result<HashMap<Uuid, ContentItem>, StoreError> {
        let mut items: HashMap<Uuid, ContentItem> = HashMap::new();

        if !self.journal_path.exists() {
            return Ok(items);
        }

        let file = File::open(&self.journal_path).await?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let entry: JournalEntry = serde_json::from_str(&line)?;
            Self::apply_entry(&mut items, entry);
        }

        Ok(items)
    }

    /// Apply a single journal entry to the state
    fn apply_entry(items: &mut HashMap<Uuid, ContentItem>, entry: JournalEntry) {
        match entry {
            JournalEntry::Created { item, .. } => {
                items.insert(item.id, item);
            }
            JournalEntry::Updated { at, id, update } => {
                if let Some(item) = items.get_mut(&id) {
                    item.apply(update, at);
                }
            }
            JournalEntry::Removed { id, .. } => {
                items.remove(&id);
            }
        }
    }
}

#[async_trait]
impl ContentStore for JournalStore {
    async fn create(&self, new: NewContent) -> Result<ContentItem, StoreError> {
        let item = ContentItem::new(new);
        self.append(&JournalEntry::Created {
            at: item.created_at,
            item: item.clone(),
        })
        .await?;

        Ok(item)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError> {
        Ok(self.replay().await?.get(&id).cloned())
    }

    async fn update(&self, id: Uuid, update: ContentUpdate) -> Result<ContentItem, StoreError> {
        let mut items = self.replay().await?;
        let item = items.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        let at = Utc::now();
        item.apply(update.clone(), at);
        self.append(&JournalEntry::Updated { at, id, update }).await?;

        Ok(item.clone())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ContentItem>, StoreError> {
        let items = self.replay().await?;
        let mut owned: Vec<ContentItem> = items
            .into_values()
            .filter(|item| item.owner_id == owner_id)
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(owned)
    }

    async fn remove(&self, id: Uuid) -> Result<Option<ContentItem>, StoreError> {
        let items = self.replay().await?;
        let Some(item) = items.get(&id).cloned() else {
            return Ok(None);
        };

        self.append(&JournalEntry::Removed { at: Utc::now(), id })
            .await?;

        Ok(Some(item))
    }
}

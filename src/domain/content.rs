//! Content items and their processing lifecycle.
//!
//! A ContentItem is one uploaded media asset. Its `status` advances along
//! `Uploaded < Processing < Enhanced < Posted` and never moves backward;
//! the enum ordering encodes that sequence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of media behind a content item, fixed at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Still image (jpeg, png, gif)
    Image,

    /// Video clip (mp4, mov)
    Video,
}

impl ContentKind {
    /// Derive the kind from a declared media type (e.g. "image/png").
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        if media_type.starts_with("image/") {
            Some(Self::Image)
        } else if media_type.starts_with("video/") {
            Some(Self::Video)
        } else {
            None
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Image => write!(f, "image"),
            ContentKind::Video => write!(f, "video"),
        }
    }
}

/// Processing status of a content item.
///
/// Variant order is the lifecycle order; the derived `Ord` gives
/// `Uploaded < Processing < Enhanced < Posted`. Under normal operation the
/// status only moves forward, one step at a time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Freshly created from an upload, not yet picked up
    Uploaded,

    /// Enrichment is in flight
    Processing,

    /// Enrichment finished; caption, hashtags and enhanced location are set
    Enhanced,

    /// Published to a platform (applied by an external publisher)
    Posted,
}

impl ContentStatus {
    /// The next status in the lifecycle, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Uploaded => Some(Self::Processing),
            Self::Processing => Some(Self::Enhanced),
            Self::Enhanced => Some(Self::Posted),
            Self::Posted => None,
        }
    }

    /// Whether this status is terminal within the processing core.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Posted)
    }
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentStatus::Uploaded => write!(f, "uploaded"),
            ContentStatus::Processing => write!(f, "processing"),
            ContentStatus::Enhanced => write!(f, "enhanced"),
            ContentStatus::Posted => write!(f, "posted"),
        }
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "uploaded" => Ok(ContentStatus::Uploaded),
            "processing" => Ok(ContentStatus::Processing),
            "enhanced" => Ok(ContentStatus::Enhanced),
            "posted" => Ok(ContentStatus::Posted),
            _ => anyhow::bail!("Unknown content status: {}", s),
        }
    }
}

/// Result of the enrichment step.
///
/// The three fields travel together: a content item either has all of them
/// or none, which is why they live in one struct behind a single `Option`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrichment {
    /// Location of the enhanced artifact
    pub enhanced_location: String,

    /// Generated caption
    pub caption: String,

    /// Generated hashtag string
    pub hashtags: String,
}

/// One uploaded media asset and its processing metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Identifier of the owning user
    pub owner_id: String,

    /// Original filename as uploaded
    pub filename: String,

    /// Where the original upload was stored
    pub original_location: String,

    /// Media kind, derived from the upload's media type
    pub kind: ContentKind,

    /// Current lifecycle status
    pub status: ContentStatus,

    /// Set exactly once, when the item reaches `Enhanced`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,

    /// When the item was created
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

impl ContentItem {
    /// Create a fresh item in `Uploaded` with a new id and current timestamps.
    pub fn new(new: NewContent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: new.owner_id,
            filename: new.filename,
            original_location: new.original_location,
            kind: new.kind,
            status: ContentStatus::Uploaded,
            enrichment: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a partial update into this item, stamping `updated_at`.
    pub fn apply(&mut self, update: ContentUpdate, at: DateTime<Utc>) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(enrichment) = update.enrichment {
            self.enrichment = Some(enrichment);
        }
        self.updated_at = at;
    }

    /// Whether enrichment has completed for this item.
    pub fn is_enriched(&self) -> bool {
        self.enrichment.is_some()
    }
}

/// Fields the caller supplies when creating a content item.
///
/// Everything else (id, status, timestamps) is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContent {
    pub owner_id: String,
    pub filename: String,
    pub original_location: String,
    pub kind: ContentKind,
}

/// A partial update to a content item, applied atomically by the store.
///
/// The lifecycle manager only ever produces the two shapes below: a bare
/// status move, or `Enhanced` together with the enrichment fields. Keeping
/// the enrichment fields inside one struct means a half-enriched write
/// cannot be expressed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContentStatus>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Enrichment>,
}

impl ContentUpdate {
    /// Update the status only.
    pub fn to_status(status: ContentStatus) -> Self {
        Self {
            status: Some(status),
            enrichment: None,
        }
    }

    /// Mark the item `Enhanced` and attach the enrichment in one write.
    pub fn enhanced(enrichment: Enrichment) -> Self {
        Self {
            status: Some(ContentStatus::Enhanced),
            enrichment: Some(enrichment),
        }
    }
}

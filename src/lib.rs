//! postflow - Content lifecycle pipeline for social media uploads
//!
//! Drives uploaded media assets through the states
//! `uploaded → processing → enhanced → posted` without blocking the
//! uploader.
//!
//! # Architecture
//!
//! The system is built around observable state:
//! - Every item's progress lives in a content store record
//! - The lifecycle manager advances that record from a background task
//! - Readers poll the store at any time; nothing waits on enrichment
//!
//! # Modules
//!
//! - `domain`: Data structures (ContentItem, ContentStatus, Enrichment)
//! - `store`: Content record storage (memory map, JSONL journal)
//! - `enrich`: Enrichment backends (stock canned captions)
//! - `core`: Lifecycle logic (Processor)
//! - `ingest`: Upload intake policy
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Upload a file and watch it get enhanced
//! postflow upload photo.jpg --owner alex
//!
//! # Check content status
//! postflow status <content-id>
//!
//! # Summarize the pipeline
//! postflow overview --owner alex
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod enrich;
pub mod ingest;
pub mod store;

// Re-export main types at crate root for convenience
pub use crate::core::{PipelineOverview, Processor, ProcessorConfig};
pub use crate::domain::{
    ContentItem, ContentKind, ContentStatus, ContentUpdate, Enrichment, NewContent,
};
pub use crate::enrich::{EnrichError, Enricher, StockEnricher};
pub use crate::ingest::{Upload, UploadError, UploadPolicy};
pub use crate::store::{ContentStore, JournalStore, MemoryStore, StoreError};

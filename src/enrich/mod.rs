//! Enrichment interfaces for content enhancement backends.
//!
//! Enrichers produce the enhanced artifact location, caption and hashtags
//! for a content item. The stock implementation selects from canned lists;
//! a real backend (vision model, CDN pipeline) slots in behind the same
//! trait without touching the lifecycle manager.

pub mod stock;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ContentItem, Enrichment};

// Re-export the stock enricher
pub use stock::StockEnricher;

/// Errors an enrichment backend can report
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error("Enrichment backend error: {0}")]
    Backend(String),
}

/// Trait for enrichment backends
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Human-readable backend name
    fn name(&self) -> &str;

    /// Produce the enrichment for one content item
    async fn enrich(&self, item: &ContentItem) -> Result<Enrichment, EnrichError>;
}

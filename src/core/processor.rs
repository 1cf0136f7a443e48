//! Content lifecycle manager.
//!
//! Drives an uploaded item through `Processing` into `Enhanced` in a
//! background task, without blocking the caller. Progress is observable
//! only by re-reading the item through the content store.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{ContentItem, ContentStatus, ContentUpdate};
use crate::enrich::Enricher;
use crate::store::{ContentStore, StoreError};

/// Tuning knobs for the lifecycle manager
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Pause before the `Processing` transition is applied.
    ///
    /// Zero by default so the transition is visible as soon as the spawned
    /// task runs; a non-zero value stands in for intake latency.
    pub start_delay: Duration,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            start_delay: Duration::ZERO,
        }
    }
}

/// Lifecycle manager for uploaded content items
pub struct Processor {
    store: Arc<dyn ContentStore>,
    enricher: Arc<dyn Enricher>,
    config: ProcessorConfig,
}

impl Processor {
    /// Create a processor over a store and an enrichment backend
    pub fn new(store: Arc<dyn ContentStore>, enricher: Arc<dyn Enricher>) -> Self {
        Self::with_config(store, enricher, ProcessorConfig::default())
    }

    /// Create a processor with explicit configuration
    pub fn with_config(
        store: Arc<dyn ContentStore>,
        enricher: Arc<dyn Enricher>,
        config: ProcessorConfig,
    ) -> Self {
        Self {
            store,
            enricher,
            config,
        }
    }

    /// Kick off asynchronous enrichment for a freshly uploaded item.
    ///
    /// Returns immediately; the spawned work marks the item `Processing`,
    /// runs the enricher, and applies `Enhanced` together with the
    /// enrichment fields in one store update. Callers observe progress by
    /// re-reading the item.
    ///
    /// Preconditions (not checked at runtime): the item is in `Uploaded`,
    /// and no other enrichment is in flight for the same id. Submitting an
    /// id twice before completion is a caller error.
    ///
    /// Failures never reach the caller: a vanished item or a failed
    /// enrichment is logged and the task exits, leaving the stored status
    /// wherever the last successful write put it.
    #[instrument(skip(self, item), fields(id = %item.id, enricher = self.enricher.name()))]
    pub fn begin_processing(&self, item: &ContentItem) {
        debug!("Scheduling enrichment");

        let store = Arc::clone(&self.store);
        let enricher = Arc::clone(&self.enricher);
        let start_delay = self.config.start_delay;
        let item = item.clone();

        tokio::spawn(async move {
            drive(store, enricher, start_delay, item).await;
        });
    }

    /// Summarize one owner's pipeline: counts per status plus recent items
    pub async fn overview(&self, owner_id: &str) -> Result<PipelineOverview, StoreError> {
        let items = self.store.list_by_owner(owner_id).await?;

        let mut overview = PipelineOverview::default();
        for item in &items {
            match item.status {
                ContentStatus::Uploaded => overview.uploaded += 1,
                ContentStatus::Processing => overview.processing += 1,
                ContentStatus::Enhanced => overview.enhanced += 1,
                ContentStatus::Posted => overview.posted += 1,
            }
        }

        // list_by_owner is already most recent first
        overview.recent = items.into_iter().take(5).collect();

        Ok(overview)
    }
}

/// The background work for one item: two ordered transitions.
async fn drive(
    store: Arc<dyn ContentStore>,
    enricher: Arc<dyn Enricher>,
    start_delay: Duration,
    item: ContentItem,
) {
    let id = item.id;

    if !start_delay.is_zero() {
        tokio::time::sleep(start_delay).await;
    }

    let item = match store
        .update(id, ContentUpdate::to_status(ContentStatus::Processing))
        .await
    {
        Ok(item) => item,
        Err(StoreError::NotFound(_)) => {
            warn!(%id, "Content removed before processing began; skipping");
            return;
        }
        Err(err) => {
            error!(%id, %err, "Failed to mark content as processing");
            return;
        }
    };

    let enrichment = match enricher.enrich(&item).await {
        Ok(enrichment) => enrichment,
        Err(err) => {
            // No retry: the item stays in `Processing` until an operator
            // or a future attempt intervenes.
            error!(%id, %err, "Enrichment failed; content stays in processing");
            return;
        }
    };

    match store.update(id, ContentUpdate::enhanced(enrichment)).await {
        Ok(_) => info!(%id, "Content enhanced"),
        Err(StoreError::NotFound(_)) => {
            warn!(%id, "Content removed during enrichment; discarding result");
        }
        Err(err) => {
            error!(%id, %err, "Failed to record enrichment");
        }
    }
}

/// Status counts for one owner's content pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineOverview {
    pub uploaded: usize,
    pub processing: usize,
    pub enhanced: usize,
    pub posted: usize,

    /// Most recently created items (up to 5)
    pub recent: Vec<ContentItem>,
}

impl PipelineOverview {
    /// Total items across all statuses
    pub fn total(&self) -> usize {
        self.uploaded + self.processing + self.enhanced + self.posted
    }
}

/// Poll a store until an item reaches `target` status or the deadline passes.
///
/// Returns the item at its final observed state. Intended for callers that
/// surface progress (CLI, tests); the lifecycle manager itself never polls.
pub async fn wait_for_status(
    store: &dyn ContentStore,
    id: Uuid,
    target: ContentStatus,
    deadline: Duration,
) -> Result<Option<ContentItem>, StoreError> {
    let poll_interval = Duration::from_millis(20);
    let started = tokio::time::Instant::now();

    loop {
        let Some(item) = store.get(id).await? else {
            return Ok(None);
        };

        if item.status >= target {
            return Ok(Some(item));
        }

        if started.elapsed() >= deadline {
            return Ok(Some(item));
        }

        tokio::time::sleep(poll_interval).await;
    }
}

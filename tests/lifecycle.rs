//! Lifecycle Integration Tests
//!
//! End-to-end coverage of the content lifecycle: submission, observable
//! transitions, concurrent items, vanished items, and enrichment failure.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use postflow::core::{wait_for_status, Processor, ProcessorConfig};
use postflow::domain::{ContentItem, ContentKind, ContentStatus, Enrichment, NewContent};
use postflow::enrich::{EnrichError, Enricher, StockEnricher};
use postflow::store::{ContentStore, MemoryStore};

/// Enricher that always reports a backend failure
struct FailingEnricher;

#[async_trait]
impl Enricher for FailingEnricher {
    fn name(&self) -> &str {
        "failing"
    }

    async fn enrich(&self, _item: &ContentItem) -> Result<Enrichment, EnrichError> {
        Err(EnrichError::Backend("model endpoint unavailable".to_string()))
    }
}

fn new_content(owner: &str, filename: &str) -> NewContent {
    NewContent {
        owner_id: owner.to_string(),
        filename: filename.to_string(),
        original_location: format!("https://example.com/uploads/1-{}", filename),
        kind: ContentKind::Image,
    }
}

fn processor_with_latency(store: Arc<MemoryStore>, latency: Duration) -> Processor {
    let enricher = Arc::new(StockEnricher::new().with_latency(latency));
    Processor::new(store, enricher)
}

#[tokio::test]
async fn test_submitted_item_reaches_enhanced() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_with_latency(store.clone(), Duration::ZERO);

    let item = store.create(new_content("user-1", "sunset.jpg")).await.unwrap();
    assert_eq!(item.status, ContentStatus::Uploaded);

    processor.begin_processing(&item);

    let done = wait_for_status(
        store.as_ref(),
        item.id,
        ContentStatus::Enhanced,
        Duration::from_secs(2),
    )
    .await
    .unwrap()
    .expect("item should still exist");

    assert_eq!(done.status, ContentStatus::Enhanced);

    // All three enrichment fields arrive together and non-empty
    let enrichment = done.enrichment.expect("enrichment should be set");
    assert!(!enrichment.enhanced_location.is_empty());
    assert!(!enrichment.caption.is_empty());
    assert!(!enrichment.hashtags.is_empty());
}

#[tokio::test]
async fn test_transitions_observed_in_order() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_with_latency(store.clone(), Duration::from_millis(100));

    let item = store.create(new_content("user-1", "sunset.jpg")).await.unwrap();
    processor.begin_processing(&item);

    // Poll until enhanced, recording every distinct status we see
    let mut seen = vec![item.status];
    let started = tokio::time::Instant::now();

    loop {
        let current = store.get(item.id).await.unwrap().unwrap();
        if seen.last() != Some(&current.status) {
            seen.push(current.status);
        }

        if current.status >= ContentStatus::Enhanced {
            break;
        }
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "item never reached enhanced; saw {:?}",
            seen
        );

        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Statuses only ever move forward
    assert!(seen.windows(2).all(|w| w[0] < w[1]), "saw {:?}", seen);
    assert_eq!(seen.first(), Some(&ContentStatus::Uploaded));
    assert_eq!(seen.last(), Some(&ContentStatus::Enhanced));
}

#[tokio::test]
async fn test_processing_visible_before_enhanced() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_with_latency(store.clone(), Duration::from_millis(500));

    let item = store.create(new_content("user-1", "sunset.jpg")).await.unwrap();
    processor.begin_processing(&item);

    // The first transition lands well before the enrichment latency elapses
    let observed = wait_for_status(
        store.as_ref(),
        item.id,
        ContentStatus::Processing,
        Duration::from_millis(250),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(observed.status, ContentStatus::Processing);
    assert!(observed.enrichment.is_none());

    // After the latency, the same record shows the enhanced state
    let done = wait_for_status(
        store.as_ref(),
        item.id,
        ContentStatus::Enhanced,
        Duration::from_secs(2),
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(done.status, ContentStatus::Enhanced);
    assert!(done.is_enriched());
}

#[tokio::test]
async fn test_concurrent_items_complete_independently() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_with_latency(store.clone(), Duration::from_millis(50));

    let mut submitted = Vec::new();
    for i in 0..8 {
        let item = store
            .create(new_content("user-1", &format!("photo-{}.jpg", i)))
            .await
            .unwrap();
        processor.begin_processing(&item);
        submitted.push(item);
    }

    for item in &submitted {
        let done = wait_for_status(
            store.as_ref(),
            item.id,
            ContentStatus::Enhanced,
            Duration::from_secs(2),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(done.status, ContentStatus::Enhanced);

        // Each item's enrichment references its own file, not a neighbor's
        let enrichment = done.enrichment.unwrap();
        assert!(
            enrichment.enhanced_location.ends_with(&format!("-{}", item.filename)),
            "location {} does not match {}",
            enrichment.enhanced_location,
            item.filename
        );
    }

    assert_eq!(store.len().await, 8);
}

#[tokio::test]
async fn test_removed_item_is_skipped_before_processing() {
    let store = Arc::new(MemoryStore::new());
    let enricher = Arc::new(StockEnricher::new().with_latency(Duration::ZERO));
    let processor = Processor::with_config(
        store.clone(),
        enricher,
        ProcessorConfig {
            start_delay: Duration::from_millis(100),
        },
    );

    let item = store.create(new_content("user-1", "sunset.jpg")).await.unwrap();
    processor.begin_processing(&item);

    // Remove the item while the task is still in its start delay
    store.remove(item.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    // The task exits cleanly and nothing reappears
    assert!(store.get(item.id).await.unwrap().is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_removed_item_is_skipped_during_enrichment() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_with_latency(store.clone(), Duration::from_millis(200));

    let item = store.create(new_content("user-1", "sunset.jpg")).await.unwrap();
    processor.begin_processing(&item);

    wait_for_status(
        store.as_ref(),
        item.id,
        ContentStatus::Processing,
        Duration::from_millis(150),
    )
    .await
    .unwrap();

    // Delete mid-enrichment; the pending result is discarded
    store.remove(item.id).await.unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    assert!(store.get(item.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_enrichment_freezes_item_in_processing() {
    let store = Arc::new(MemoryStore::new());
    let processor = Processor::new(store.clone(), Arc::new(FailingEnricher));

    let item = store.create(new_content("user-1", "sunset.jpg")).await.unwrap();
    processor.begin_processing(&item);

    // Poll well past the window a successful run would need
    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(30)).await;

        let current = store.get(item.id).await.unwrap().unwrap();
        assert!(current.status <= ContentStatus::Processing);
        assert!(current.enrichment.is_none());
    }

    let frozen = store.get(item.id).await.unwrap().unwrap();
    assert_eq!(frozen.status, ContentStatus::Processing);
}

#[tokio::test]
async fn test_reads_are_idempotent_between_transitions() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_with_latency(store.clone(), Duration::ZERO);

    let item = store.create(new_content("user-1", "sunset.jpg")).await.unwrap();
    processor.begin_processing(&item);

    let done = wait_for_status(
        store.as_ref(),
        item.id,
        ContentStatus::Enhanced,
        Duration::from_secs(2),
    )
    .await
    .unwrap()
    .unwrap();

    // No further transitions are pending; repeated reads agree exactly
    let first = store.get(item.id).await.unwrap().unwrap();
    let second = store.get(item.id).await.unwrap().unwrap();

    assert_eq!(first.status, second.status);
    assert_eq!(first.updated_at, second.updated_at);
    assert_eq!(first.enrichment, second.enrichment);
    assert_eq!(first.updated_at, done.updated_at);
}

#[tokio::test]
async fn test_overview_counts_by_status() {
    let store = Arc::new(MemoryStore::new());
    let processor = processor_with_latency(store.clone(), Duration::ZERO);

    for i in 0..3 {
        let item = store
            .create(new_content("user-1", &format!("photo-{}.jpg", i)))
            .await
            .unwrap();
        processor.begin_processing(&item);
        wait_for_status(
            store.as_ref(),
            item.id,
            ContentStatus::Enhanced,
            Duration::from_secs(2),
        )
        .await
        .unwrap();
    }

    // One item left untouched in uploaded
    store.create(new_content("user-1", "draft.jpg")).await.unwrap();
    // Another owner's item does not leak into the overview
    store.create(new_content("user-2", "other.jpg")).await.unwrap();

    let overview = processor.overview("user-1").await.unwrap();
    assert_eq!(overview.enhanced, 3);
    assert_eq!(overview.uploaded, 1);
    assert_eq!(overview.processing, 0);
    assert_eq!(overview.posted, 0);
    assert_eq!(overview.total(), 4);
    assert_eq!(overview.recent.len(), 4);
}

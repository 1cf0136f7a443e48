//! Stock enricher backed by canned captions and hashtag sets.
//!
//! Stands in for a real enhancement backend: sleeps a configured latency,
//! then picks a caption at random and the hashtag set matching the item's
//! media kind.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;

use crate::domain::{ContentItem, ContentKind, Enrichment};

use super::{EnrichError, Enricher};

/// Caption pool the stock enricher draws from
const CAPTIONS: [&str; 4] = [
    "Chasing sunsets and mountain peaks 🌄✨ Sometimes the best therapy is a good view and fresh mountain air. Nature never fails to remind us how beautiful life can be! 🏔️",
    "Coffee and creativity fuel my best days ☕️✨ Starting the morning right with intention and inspiration. What's fueling your creative energy today? 💫",
    "Fresh flavors and vibrant colors on the plate today 🥗🌈 Nourishing the body and soul with wholesome goodness. Eating the rainbow never felt so good! 🌟",
    "Modern workspace vibes hitting different today 💻✨ Clean lines, natural light, and endless possibilities. Ready to create something amazing! 🚀",
];

/// Hashtag set for still images
const IMAGE_HASHTAGS: &str =
    "#photography #lifestyle #inspiration #daily #mood #aesthetic #creative #vibes #minimal #art";

/// Hashtag set for video clips
const VIDEO_HASHTAGS: &str =
    "#video #content #storytelling #creative #motion #cinematic #reel #viral #trending #engagement";

/// Default stand-in for real enhancement latency
const DEFAULT_LATENCY: Duration = Duration::from_secs(5);

/// Enricher that selects from built-in caption and hashtag lists
pub struct StockEnricher {
    /// Simulated processing time before results are produced
    latency: Duration,

    /// Base URL under which enhanced artifacts are addressed
    media_base_url: String,
}

impl Default for StockEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl StockEnricher {
    /// Create a stock enricher with the default latency and base URL
    pub fn new() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
            media_base_url: "https://example.com".to_string(),
        }
    }

    /// Override the simulated latency (zero makes enrichment immediate)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Override the base URL for enhanced artifact locations
    pub fn with_media_base_url(mut self, media_base_url: impl Into<String>) -> Self {
        self.media_base_url = media_base_url.into();
        self
    }

    fn pick_caption() -> String {
        let mut rng = rand::thread_rng();
        CAPTIONS
            .choose(&mut rng)
            .copied()
            .unwrap_or(CAPTIONS[0])
            .to_string()
    }

    fn hashtags_for(kind: ContentKind) -> String {
        match kind {
            ContentKind::Image => IMAGE_HASHTAGS.to_string(),
            ContentKind::Video => VIDEO_HASHTAGS.to_string(),
        }
    }
}

#[async_trait]
impl Enricher for StockEnricher {
    fn name(&self) -> &str {
        "stock"
    }

    async fn enrich(&self, item: &ContentItem) -> Result<Enrichment, EnrichError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let enhanced_location = format!(
            "{}/enhanced/{}-{}",
            self.media_base_url,
            Utc::now().timestamp_millis(),
            item.filename
        );

        Ok(Enrichment {
            enhanced_location,
            caption: Self::pick_caption(),
            hashtags: Self::hashtags_for(item.kind),
        })
    }
}

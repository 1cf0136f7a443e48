//! Command-line interface for postflow.
//!
//! Provides commands for uploading media, checking content status,
//! listing an owner's items, and summarizing the pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::config;
use crate::core::Processor;
use crate::domain::{ContentItem, ContentStatus};
use crate::enrich::StockEnricher;
use crate::ingest::{media_type_for_extension, Upload};
use crate::store::{ContentStore, JournalStore};

/// postflow - Content lifecycle pipeline for social media uploads
#[derive(Parser, Debug)]
#[command(name = "postflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a media file and watch it move through the pipeline
    Upload {
        /// Path to the media file
        file: PathBuf,

        /// Owner to record the upload under
        #[arg(short, long, env = "POSTFLOW_OWNER")]
        owner: String,
    },

    /// Check the status of a content item
    Status {
        /// Content ID (UUID)
        content_id: String,
    },

    /// List an owner's content items
    List {
        /// Owner whose items to list
        #[arg(short, long, env = "POSTFLOW_OWNER")]
        owner: String,

        /// Maximum number of items to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Summarize an owner's pipeline by status
    Overview {
        /// Owner whose pipeline to summarize
        #[arg(short, long, env = "POSTFLOW_OWNER")]
        owner: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Upload { file, owner } => {
                upload_file(&file, &owner).await
            }
            Commands::Status { content_id } => {
                show_status(&content_id).await
            }
            Commands::List { owner, limit } => {
                list_content(&owner, limit).await
            }
            Commands::Overview { owner } => {
                show_overview(&owner).await
            }
            Commands::Config => {
                show_config().await
            }
        }
    }
}

/// Open the journal store at the configured path
async fn open_store() -> Result<Arc<JournalStore>> {
    let path = config::journal_path()?;
    let store = JournalStore::open(path.clone())
        .await
        .with_context(|| format!("Failed to open content journal: {}", path.display()))?;
    Ok(Arc::new(store))
}

/// Build the lifecycle manager over a store, from the resolved configuration
fn build_processor(store: Arc<dyn ContentStore>) -> Result<Processor> {
    let cfg = config::config()?;

    let enricher = StockEnricher::new()
        .with_latency(cfg.enrich_latency())
        .with_media_base_url(cfg.uploads.media_base_url.clone());

    Ok(Processor::with_config(
        store,
        Arc::new(enricher),
        cfg.processor_config(),
    ))
}

/// Upload a file and poll the store until enhancement completes
async fn upload_file(file: &Path, owner: &str) -> Result<()> {
    let metadata = std::fs::metadata(file)
        .with_context(|| format!("Failed to stat file: {}", file.display()))?;

    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("File has no usable name: {}", file.display()))?;

    let media_type = file
        .extension()
        .and_then(|e| e.to_str())
        .and_then(media_type_for_extension)
        .with_context(|| {
            format!(
                "Unsupported file extension: {}. Only images and videos are allowed",
                file.display()
            )
        })?;

    let cfg = config::config()?;
    let new = cfg.upload_policy().accept(Upload {
        owner_id: owner.to_string(),
        filename: filename.to_string(),
        media_type: media_type.to_string(),
        size_bytes: metadata.len(),
    })?;

    let store = open_store().await?;
    let processor = build_processor(store.clone())?;

    let item = store.create(new).await?;
    eprintln!("📤 Uploaded {} as {}", item.filename, item.id);

    processor.begin_processing(&item);

    // Observe progress the only way the pipeline allows: re-read the record
    // until it reaches `enhanced` or looks stuck.
    let deadline =
        cfg.processor_config().start_delay + cfg.enrich_latency() + Duration::from_secs(10);
    let started = tokio::time::Instant::now();
    let mut last = item.status;
    println!("{:<12} {}", item.status.to_string(), item.updated_at);

    loop {
        tokio::time::sleep(Duration::from_millis(50)).await;

        let current = store
            .get(item.id)
            .await?
            .with_context(|| format!("Content vanished from the journal: {}", item.id))?;

        if current.status != last {
            println!("{:<12} {}", current.status.to_string(), current.updated_at);
            last = current.status;
        }

        if current.status >= ContentStatus::Enhanced {
            print_enrichment(&current);
            eprintln!("\n✅ Content {} enhanced", current.id);
            return Ok(());
        }

        if started.elapsed() > deadline {
            eprintln!(
                "\n⚠️ Content {} is still {} after {}s; giving up on waiting",
                current.id,
                current.status,
                started.elapsed().as_secs()
            );
            std::process::exit(1);
        }
    }
}

/// Show the status of a content item
async fn show_status(content_id: &str) -> Result<()> {
    let id = Uuid::parse_str(content_id)
        .with_context(|| format!("Invalid content ID: {}", content_id))?;

    let store = open_store().await?;
    let item = store
        .get(id)
        .await?
        .with_context(|| format!("Content not found: {}", content_id))?;

    println!("Content ID: {}", item.id);
    println!("Owner: {}", item.owner_id);
    println!("File: {}", item.filename);
    println!("Kind: {}", item.kind);
    println!("Status: {}", item.status);
    println!("Original: {}", item.original_location);
    println!("Created: {}", item.created_at);
    println!("Updated: {}", item.updated_at);

    if item.enrichment.is_some() {
        println!();
        print_enrichment(&item);
    }

    Ok(())
}

/// Print an item's enrichment fields
fn print_enrichment(item: &ContentItem) {
    if let Some(enrichment) = &item.enrichment {
        println!("Enhanced: {}", enrichment.enhanced_location);
        println!("Caption: {}", enrichment.caption);
        println!("Hashtags: {}", enrichment.hashtags);
    }
}

/// List an owner's content items
async fn list_content(owner: &str, limit: usize) -> Result<()> {
    let store = open_store().await?;
    let items = store.list_by_owner(owner).await?;

    if items.is_empty() {
        println!(
            "No content found for {}. Use 'postflow upload <file>' to add some.",
            owner
        );
        return Ok(());
    }

    println!("{:<38} {:<7} {:<12} {:<30}", "CONTENT ID", "KIND", "STATUS", "FILE");
    println!("{}", "-".repeat(88));

    for item in items.iter().take(limit) {
        let file_truncated = if item.filename.len() > 27 {
            format!("{}...", &item.filename[..27])
        } else {
            item.filename.clone()
        };
        println!(
            "{:<38} {:<7} {:<12} {:<30}",
            item.id,
            item.kind.to_string(),
            item.status.to_string(),
            file_truncated
        );
    }

    println!("\nTotal: {} items", items.len());

    Ok(())
}

/// Summarize an owner's pipeline
async fn show_overview(owner: &str) -> Result<()> {
    let store = open_store().await?;
    let processor = build_processor(store)?;

    let overview = processor.overview(owner).await?;

    if overview.total() == 0 {
        println!("No content found for {}.", owner);
        return Ok(());
    }

    println!("Pipeline for {}:", owner);
    println!("  uploaded:   {}", overview.uploaded);
    println!("  processing: {}", overview.processing);
    println!("  enhanced:   {}", overview.enhanced);
    println!("  posted:     {}", overview.posted);
    println!("  total:      {}", overview.total());

    if !overview.recent.is_empty() {
        println!("\nRecent:");
        for item in &overview.recent {
            println!(
                "  {}  {:<12} {}",
                item.id,
                item.status.to_string(),
                item.filename
            );
        }
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
async fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("  Postflow Configuration");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Config file: {}", cfg.config_file.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "(none - using defaults)".to_string()));
    println!();
    println!("Paths:");
    println!("  Home (pipeline state): {}", cfg.home.display());
    println!("  Journal:               {}", cfg.journal_path().display());
    println!();
    println!("Processing:");
    println!("  Start delay:    {} ms", cfg.processing.start_delay_ms);
    println!("  Enrich latency: {} ms", cfg.processing.enrich_latency_ms);
    println!();
    println!("Uploads:");
    println!("  Max size:       {} bytes", cfg.uploads.max_size_bytes);
    println!("  Media base URL: {}", cfg.uploads.media_base_url);

    Ok(())
}

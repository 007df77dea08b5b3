//! `richlink` CLI - Exercise the preview pipeline from the command line

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use uuid::Uuid;

use richlink::{
    detect, LinkCategory, LinkRecord, LinkStore, MemoryLinkStore, PreviewConfig, PreviewMetadata,
    PreviewService, PreviewStatus, MAX_BATCH_SIZE,
};

#[derive(Parser)]
#[command(name = "richlink")]
#[command(about = "Rich link preview pipeline with platform-aware fallback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a preview for a single URL and display it
    Preview {
        /// URL to preview
        url: String,

        /// Emit raw JSON instead of the card summary
        #[arg(short, long)]
        json: bool,
    },

    /// Classify a URL without fetching anything
    Detect {
        /// URL to classify
        url: String,
    },

    /// Refresh previews for a file of URLs (one per line)
    Batch {
        /// File containing URLs
        file: PathBuf,

        /// Emit raw JSON instead of the summary table
        #[arg(short, long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview { url, json } => cmd_preview(&url, json).await?,
        Commands::Detect { url } => cmd_detect(&url),
        Commands::Batch { file, json } => cmd_batch(&file, json).await?,
    }

    Ok(())
}

async fn cmd_preview(url: &str, json: bool) -> Result<()> {
    let store = Arc::new(MemoryLinkStore::new());
    let link = seed_link(url);
    let link_id = link.id.clone();
    let title = link.title.clone();
    store.insert(link).await;

    let service = PreviewService::new(store, PreviewConfig::from_env())?;
    let outcome = service.force_refresh(&link_id).await?;

    // A failed one-off fetch still renders: fall back to the basic link
    let metadata = outcome
        .metadata
        .unwrap_or_else(|| PreviewMetadata::basic_link(&title, url));

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
        return Ok(());
    }

    let status = match outcome.status {
        PreviewStatus::Success => "✅",
        PreviewStatus::Failed => "⚠️ (basic link fallback)",
        PreviewStatus::Pending => "⏳",
    };
    println!("🔗 {url}");
    println!("   status:   {status}");
    println!("   platform: {}", metadata.platform);
    println!("   type:     {:?}", metadata.kind);
    println!("   title:    {}", metadata.title);
    if let Some(description) = &metadata.description {
        println!("   about:    {description}");
    }
    if let Some(author) = &metadata.author {
        println!("   author:   {}", author.name);
    }
    if let (Some(stars), Some(forks)) = (metadata.stars, metadata.forks) {
        println!("   repo:     ⭐ {stars} · 🍴 {forks}");
    }
    if let Some(reactions) = metadata.reactions_count {
        println!("   reactions: {reactions}");
    }
    println!("   expires:  {}", metadata.expires_at.to_rfc3339());

    Ok(())
}

fn cmd_detect(url: &str) {
    println!("{}", detect(url).as_str());
}

async fn cmd_batch(file: &PathBuf, json: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)?;
    let urls: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();

    let store = Arc::new(MemoryLinkStore::new());
    let mut ids = Vec::with_capacity(urls.len());
    for url in &urls {
        let link = seed_link(url);
        ids.push((link.id.clone(), (*url).to_string()));
        store.insert(link).await;
    }

    let store_dyn: Arc<dyn LinkStore> = store.clone();
    let service = PreviewService::new(store_dyn, PreviewConfig::from_env())?;

    // The service caps each call at MAX_BATCH_SIZE; larger files are
    // chunked across calls here, as any caller is expected to do.
    let mut processed = 0;
    for chunk in ids.chunks(MAX_BATCH_SIZE) {
        let chunk_ids: Vec<String> = chunk.iter().map(|(id, _)| id.clone()).collect();
        let report = service.batch_refresh(&chunk_ids).await?;
        processed += report.processed;
    }

    if json {
        let links = store.all().await;
        println!("{}", serde_json::to_string_pretty(&links)?);
        return Ok(());
    }

    for (id, url) in &ids {
        let glyph = match store.get(id).await?.map(|l| l.preview_status) {
            Some(PreviewStatus::Success) => "✅",
            Some(PreviewStatus::Failed) => "❌",
            _ => "⏳",
        };
        println!("{glyph} {url}");
    }
    println!("📦 processed {processed}/{} links", ids.len());

    Ok(())
}

fn seed_link(url: &str) -> LinkRecord {
    let title = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string());
    LinkRecord::new(Uuid::new_v4().to_string(), url, title, LinkCategory::Other)
}

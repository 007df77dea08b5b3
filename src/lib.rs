//! `richlink` - Rich link preview pipeline
//!
//! Turns a stored link into a preview card: classify the URL, fetch
//! metadata from the platform's best channel (REST, GraphQL, or HTML
//! scrape), fall back gracefully, and cache the result with per-platform
//! TTLs.
//!
//! # Features
//!
//! - **Platform detection**: GitHub repos, Dev.to/Hashnode/Medium/Substack
//!   posts, generic webpages
//! - **Layered fallback**: specialized adapter → Open-Graph scrape →
//!   previous metadata kept on total failure
//! - **Cache policy**: per-platform TTLs, explicit refresh and invalidate
//! - **Batch refresh**: chunked fan-out, per-link isolation, capped at 20
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use richlink::{LinkCategory, LinkRecord, MemoryLinkStore, PreviewConfig, PreviewService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(MemoryLinkStore::new());
//!     store
//!         .insert(LinkRecord::new(
//!             "my-repo",
//!             "https://github.com/rust-lang/rust",
//!             "My favorite repo",
//!             LinkCategory::Project,
//!         ))
//!         .await;
//!
//!     let service = PreviewService::new(store, PreviewConfig::from_env())?;
//!     let outcome = service.get_or_refresh("my-repo").await?;
//!     println!("{:?}: {:?}", outcome.status, outcome.metadata.map(|m| m.title));
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod cache;
pub mod config;
pub mod detect;
pub mod error;
pub mod http_client;
pub mod metadata;
pub mod platform;
pub mod resolve;
pub mod service;
pub mod store;

pub use batch::{BatchReport, MAX_BATCH_SIZE};
pub use cache::{cache_window, clear_preview, needs_refresh, needs_refresh_at, ttl_for};
pub use config::PreviewConfig;
pub use detect::{detect, BlogPlatform, Platform};
pub use error::{AdapterError, FailureKind, PreviewError};
pub use http_client::PreviewClient;
pub use metadata::{
    AuthorInfo, LinkCategory, LinkRecord, PreviewMetadata, PreviewStatus, PreviewType,
};
pub use platform::{PlatformProvider, PlatformRegistry};
pub use resolve::{PreviewResolver, ResolvedPreview};
pub use service::{PreviewService, RefreshOutcome};
pub use store::{LinkStore, MemoryLinkStore};

/// Version of richlink
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

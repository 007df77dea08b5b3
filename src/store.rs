//! Link store seam.
//!
//! The links collaborator owns the link rows; the pipeline reads them and
//! writes back only the preview fields. [`LinkStore`] is that boundary.
//! [`MemoryLinkStore`] is the in-process implementation used by the CLI
//! and tests; a database-backed implementation plugs in the same way.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::metadata::{LinkRecord, PreviewMetadata, PreviewStatus};

/// Read/write access to link rows, scoped to what the pipeline may touch.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Fetch a link by id.
    async fn get(&self, id: &str) -> Result<Option<LinkRecord>>;

    /// Persist the preview fields of a link. Implementations must leave
    /// `url`, `title`, and `category` untouched.
    async fn put_preview(
        &self,
        id: &str,
        metadata: Option<&PreviewMetadata>,
        status: PreviewStatus,
    ) -> Result<()>;
}

/// In-memory link store.
#[derive(Default)]
pub struct MemoryLinkStore {
    links: RwLock<HashMap<String, LinkRecord>>,
}

impl MemoryLinkStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, link: LinkRecord) {
        self.links.write().await.insert(link.id.clone(), link);
    }

    pub async fn all(&self) -> Vec<LinkRecord> {
        self.links.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn get(&self, id: &str) -> Result<Option<LinkRecord>> {
        Ok(self.links.read().await.get(id).cloned())
    }

    async fn put_preview(
        &self,
        id: &str,
        metadata: Option<&PreviewMetadata>,
        status: PreviewStatus,
    ) -> Result<()> {
        let mut links = self.links.write().await;
        let link = links
            .get_mut(id)
            .ok_or_else(|| anyhow!("unknown link id {id}"))?;
        link.preview = metadata.cloned();
        link.preview_status = status;
        Ok(())
    }
}

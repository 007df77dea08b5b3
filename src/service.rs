//! Service operations exposed to the links collaborator.
//!
//! Cache-aware single-link refresh, forced refresh, preview clearing, and
//! a fire-and-forget variant for write paths that must not wait on (or
//! fail with) a preview fetch. Batch refresh lives in [`crate::batch`].

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache;
use crate::config::PreviewConfig;
use crate::error::PreviewError;
use crate::metadata::{LinkRecord, PreviewMetadata, PreviewStatus};
use crate::resolve::PreviewResolver;
use crate::store::LinkStore;

/// Result of a single-link operation.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub metadata: Option<PreviewMetadata>,
    pub status: PreviewStatus,
    /// Whether an upstream fetch actually happened, as opposed to serving
    /// the stored preview.
    pub refreshed: bool,
}

/// Preview pipeline entry point for the links collaborator.
pub struct PreviewService {
    store: Arc<dyn LinkStore>,
    resolver: PreviewResolver,
}

impl PreviewService {
    pub fn new(store: Arc<dyn LinkStore>, config: PreviewConfig) -> Result<Self> {
        Ok(Self {
            store,
            resolver: PreviewResolver::new(config)?,
        })
    }

    /// Custom resolver, used to inject fake adapters in tests.
    #[must_use]
    pub fn with_resolver(store: Arc<dyn LinkStore>, resolver: PreviewResolver) -> Self {
        Self { store, resolver }
    }

    /// Serve the stored preview when it is still valid, refresh otherwise.
    pub async fn get_or_refresh(&self, link_id: &str) -> Result<RefreshOutcome, PreviewError> {
        let link = self.load(link_id).await?;
        if !cache::needs_refresh(&link) {
            debug!(link_id, "serving cached preview");
            return Ok(RefreshOutcome {
                metadata: link.preview,
                status: link.preview_status,
                refreshed: false,
            });
        }
        self.refresh(link).await
    }

    /// Re-resolve regardless of expiry. Social links stay excluded: they
    /// never fetch previews, forced or not.
    pub async fn force_refresh(&self, link_id: &str) -> Result<RefreshOutcome, PreviewError> {
        let link = self.load(link_id).await?;
        if link.category == crate::metadata::LinkCategory::Social {
            return Ok(RefreshOutcome {
                metadata: link.preview,
                status: link.preview_status,
                refreshed: false,
            });
        }
        self.refresh(link).await
    }

    /// Null the stored preview. Called when the link's URL is edited or
    /// the link removed — never by the pipeline itself on fetch failure.
    pub async fn clear_preview(&self, link_id: &str) -> Result<(), PreviewError> {
        // existence check so a bad id surfaces as UnknownLink, not a
        // store-level write failure
        self.load(link_id).await?;
        self.store
            .put_preview(link_id, None, PreviewStatus::Pending)
            .await
            .map_err(PreviewError::Store)
    }

    /// Detached background refresh for link create/update paths. Failures
    /// are logged, never propagated — the originating write must not
    /// depend on preview-fetch success.
    pub fn spawn_refresh(self: &Arc<Self>, link_id: impl Into<String>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        let link_id = link_id.into();
        tokio::spawn(async move {
            if let Err(err) = service.get_or_refresh(&link_id).await {
                warn!(link_id, "background preview refresh failed: {err}");
            }
        })
    }

    pub(crate) async fn refresh(&self, link: LinkRecord) -> Result<RefreshOutcome, PreviewError> {
        let resolved = self.resolver.resolve(&link).await;
        self.store
            .put_preview(&link.id, resolved.metadata.as_ref(), resolved.status)
            .await
            .map_err(PreviewError::Store)?;
        Ok(RefreshOutcome {
            metadata: resolved.metadata,
            status: resolved.status,
            refreshed: true,
        })
    }

    async fn load(&self, link_id: &str) -> Result<LinkRecord, PreviewError> {
        self.store
            .get(link_id)
            .await
            .map_err(PreviewError::Store)?
            .ok_or_else(|| PreviewError::UnknownLink(link_id.to_string()))
    }
}

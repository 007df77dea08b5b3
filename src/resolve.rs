//! Fallback orchestration for a single link.
//!
//! Resolution order is fixed: detect the platform, try its specialized
//! adapter, recover any failure through the generic webpage adapter, and
//! only when both fail report `failed` — keeping whatever metadata the
//! link already had. A link that once had a rich preview never regresses
//! to a blank card because a later refresh failed.
//!
//! The resolver is a pure compute step over the link record; persisting
//! the result is the caller's job.

use anyhow::Result;
use tracing::{debug, warn};

use crate::config::PreviewConfig;
use crate::detect::detect;
use crate::error::AdapterError;
use crate::http_client::PreviewClient;
use crate::metadata::{LinkRecord, PreviewMetadata, PreviewStatus, PreviewType};
use crate::platform::PlatformRegistry;

/// Outcome of one resolution attempt.
#[derive(Debug, Clone)]
pub struct ResolvedPreview {
    /// Fresh metadata on success; the link's previous metadata (possibly
    /// `None`) on failure.
    pub metadata: Option<PreviewMetadata>,
    pub status: PreviewStatus,
}

/// Resolves previews through the adapter registry with generic fallback.
pub struct PreviewResolver {
    registry: PlatformRegistry,
    client: PreviewClient,
}

impl PreviewResolver {
    pub fn new(config: PreviewConfig) -> Result<Self> {
        Ok(Self {
            registry: PlatformRegistry::new(),
            client: PreviewClient::new(config)?,
        })
    }

    /// Custom registry, used to inject fake providers in tests.
    #[must_use]
    pub fn with_registry(client: PreviewClient, registry: PlatformRegistry) -> Self {
        Self { registry, client }
    }

    /// Resolve a fresh preview for the link. Never fails: the worst
    /// outcome is `failed` status with the previous metadata untouched.
    pub async fn resolve(&self, link: &LinkRecord) -> ResolvedPreview {
        let platform = detect(&link.url);
        debug!(url = %link.url, platform = platform.as_str(), "resolving preview");

        if let Some(provider) = self.registry.provider_for(platform) {
            match provider.fetch_metadata(&link.url, &self.client).await {
                Ok(metadata) => {
                    return ResolvedPreview {
                        metadata: Some(metadata),
                        status: PreviewStatus::Success,
                    };
                }
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        url = %link.url,
                        kind = ?err.kind(),
                        "specialized adapter failed, falling back to webpage scrape: {err}"
                    );
                }
            }
        }

        match self.registry.fallback().fetch_metadata(&link.url, &self.client).await {
            Ok(mut metadata) => {
                // Downgrade: the fallback yields plain webpage metadata
                // even for URLs detected as richer platforms.
                metadata.kind = PreviewType::Webpage;
                ResolvedPreview {
                    metadata: Some(metadata),
                    status: PreviewStatus::Success,
                }
            }
            Err(err) => {
                self.log_total_failure(link, &err);
                ResolvedPreview {
                    metadata: link.preview.clone(),
                    status: PreviewStatus::Failed,
                }
            }
        }
    }

    fn log_total_failure(&self, link: &LinkRecord, err: &AdapterError) {
        warn!(
            url = %link.url,
            kind = ?err.kind(),
            had_previous = link.preview.is_some(),
            "all adapters failed, keeping previous preview state: {err}"
        );
    }
}

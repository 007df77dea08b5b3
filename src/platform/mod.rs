//! Platform-specific metadata adapters.
//!
//! Each platform with a richer channel than HTML meta tags gets its own
//! adapter; everything else goes through the generic webpage adapter, which
//! also serves as the unconditional fallback for failed specialized fetches.
//!
//! # Architecture
//!
//! - [`PlatformProvider`]: Async trait for platform-specific fetching
//! - [`PlatformRegistry`]: Maps a detected [`Platform`] to its adapter
//! - New platforms are added by registering a provider, not by editing a
//!   central conditional
//!
//! # Example
//!
//! ```rust,no_run
//! use richlink::http_client::PreviewClient;
//! use richlink::platform::PlatformRegistry;
//! use richlink::{detect, PreviewConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PreviewClient::new(PreviewConfig::default())?;
//! let registry = PlatformRegistry::new();
//!
//! let platform = detect("https://dev.to/alice/my-post");
//! if let Some(provider) = registry.provider_for(platform) {
//!     let meta = provider.fetch_metadata("https://dev.to/alice/my-post", &client).await;
//!     println!("{meta:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod devto;
pub mod github;
pub mod hashnode;
pub mod medium;
pub(crate) mod meta;
pub mod webpage;

use async_trait::async_trait;

use crate::detect::Platform;
use crate::error::AdapterResult;
use crate::http_client::PreviewClient;
use crate::metadata::PreviewMetadata;

/// Fetches and normalizes metadata for one platform.
///
/// Implementations fail with an `AdapterError` instead of returning
/// partial data; what to do with the failure is the orchestrator's call.
#[async_trait]
pub trait PlatformProvider: Send + Sync {
    /// Provider name (e.g., "github", "dev.to").
    fn name(&self) -> &'static str;

    /// The detection result this provider serves.
    fn platform(&self) -> Platform;

    /// Fetch metadata from the platform's preferred channel.
    async fn fetch_metadata(
        &self,
        url: &str,
        client: &PreviewClient,
    ) -> AdapterResult<PreviewMetadata>;
}

/// Maps detected platforms to their adapters.
///
/// The fallback provider is held separately: it is not a dispatch target
/// but the recovery path for every failed specialized fetch.
pub struct PlatformRegistry {
    providers: Vec<Box<dyn PlatformProvider>>,
    fallback: Box<dyn PlatformProvider>,
}

impl PlatformRegistry {
    /// Registry with all built-in providers.
    #[must_use]
    pub fn new() -> Self {
        let providers: Vec<Box<dyn PlatformProvider>> = vec![
            Box::new(github::GithubProvider),
            Box::new(devto::DevtoProvider),
            Box::new(hashnode::HashnodeProvider),
            Box::new(medium::MediumProvider),
        ];
        Self {
            providers,
            fallback: Box::new(webpage::WebpageProvider),
        }
    }

    /// Custom provider set, used to inject fakes in tests.
    #[must_use]
    pub fn with_providers(
        providers: Vec<Box<dyn PlatformProvider>>,
        fallback: Box<dyn PlatformProvider>,
    ) -> Self {
        Self { providers, fallback }
    }

    /// The specialized provider for a detected platform, if one exists.
    /// Substack and generic pages have none and resolve through the
    /// fallback directly.
    pub fn provider_for(&self, platform: Platform) -> Option<&dyn PlatformProvider> {
        self.providers
            .iter()
            .find(|p| p.platform() == platform)
            .map(|p| p.as_ref())
    }

    /// The generic webpage provider.
    pub fn fallback(&self) -> &dyn PlatformProvider {
        self.fallback.as_ref()
    }
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::BlogPlatform;

    #[test]
    fn registry_registers_all_providers() {
        let registry = PlatformRegistry::new();
        assert_eq!(registry.providers.len(), 4);
        assert_eq!(registry.providers[0].name(), "github");
        assert_eq!(registry.providers[1].name(), "dev.to");
        assert_eq!(registry.providers[2].name(), "hashnode");
        assert_eq!(registry.providers[3].name(), "medium");
        assert_eq!(registry.fallback().name(), "webpage");
    }

    #[test]
    fn dispatch_by_platform() {
        let registry = PlatformRegistry::new();
        assert_eq!(
            registry.provider_for(Platform::GithubRepo).map(PlatformProvider::name),
            Some("github")
        );
        assert_eq!(
            registry
                .provider_for(Platform::Blog(BlogPlatform::DevTo))
                .map(PlatformProvider::name),
            Some("dev.to")
        );
        assert_eq!(
            registry
                .provider_for(Platform::Blog(BlogPlatform::Hashnode))
                .map(PlatformProvider::name),
            Some("hashnode")
        );
        assert_eq!(
            registry
                .provider_for(Platform::Blog(BlogPlatform::Medium))
                .map(PlatformProvider::name),
            Some("medium")
        );
    }

    #[test]
    fn substack_and_generic_have_no_specialized_provider() {
        let registry = PlatformRegistry::new();
        assert!(registry.provider_for(Platform::Blog(BlogPlatform::Substack)).is_none());
        assert!(registry.provider_for(Platform::Webpage).is_none());
    }
}

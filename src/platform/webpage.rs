//! Generic webpage metadata via `<title>` and meta tags.
//!
//! The unconditional fallback: any URL can be served here, with whatever
//! Open-Graph or plain meta tags the page offers. When not even a title
//! exists, the hostname stands in — a preview with just a name is still a
//! renderable card.

use async_trait::async_trait;
use tracing::debug;

use super::meta::extract_page_meta;
use super::PlatformProvider;
use crate::detect::Platform;
use crate::error::AdapterResult;
use crate::http_client::PreviewClient;
use crate::metadata::{PreviewMetadata, PreviewType};

/// Generic Open-Graph/HTML-meta provider.
pub struct WebpageProvider;

#[async_trait]
impl PlatformProvider for WebpageProvider {
    fn name(&self) -> &'static str {
        "webpage"
    }

    fn platform(&self) -> Platform {
        Platform::Webpage
    }

    async fn fetch_metadata(
        &self,
        url: &str,
        client: &PreviewClient,
    ) -> AdapterResult<PreviewMetadata> {
        debug!(url, "scraping generic webpage");
        let (final_url, html) = client.fetch_html(url).await?;
        let page = extract_page_meta(&html);

        let host = host_of(&final_url).unwrap_or_default();
        let title = page
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| host.clone());
        let canonical = page.canonical_url.as_deref().unwrap_or(&final_url);

        let mut meta = PreviewMetadata::new(PreviewType::Webpage, title, host, canonical);
        meta.description = page.description;
        meta.featured_image = page.image;
        Ok(meta)
    }
}

fn host_of(url: &str) -> Option<String> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

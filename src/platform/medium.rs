//! Medium post metadata via HTML scraping.
//!
//! Medium exposes no public metadata API, so this adapter reads the page's
//! Open-Graph/Twitter tags. Medium titles arrive as
//! `Post Title | by Author | Medium`; the segments after the first `|` are
//! presentation noise, but the `by <name>` one carries the author when no
//! `author` meta tag exists.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::meta::extract_page_meta;
use super::PlatformProvider;
use crate::detect::{BlogPlatform, Platform};
use crate::error::{AdapterError, AdapterResult};
use crate::http_client::PreviewClient;
use crate::metadata::{AuthorInfo, PreviewMetadata, PreviewType};

/// Medium post provider using Open-Graph extraction.
pub struct MediumProvider;

#[async_trait]
impl PlatformProvider for MediumProvider {
    fn name(&self) -> &'static str {
        "medium"
    }

    fn platform(&self) -> Platform {
        Platform::Blog(BlogPlatform::Medium)
    }

    async fn fetch_metadata(
        &self,
        url: &str,
        client: &PreviewClient,
    ) -> AdapterResult<PreviewMetadata> {
        debug!(url, "scraping Medium post");
        let (final_url, html) = client.fetch_html(url).await?;
        let page = extract_page_meta(&html);

        let raw_title = page.title.ok_or_else(|| {
            AdapterError::ParseError(format!("no title found at {final_url}"))
        })?;
        let (title, author_from_title) = split_medium_title(&raw_title);

        let canonical = page.canonical_url.as_deref().unwrap_or(&final_url);
        let mut meta = PreviewMetadata::new(PreviewType::BlogPost, title, "medium", canonical);
        meta.description = page.description;
        meta.featured_image = page.image;
        meta.published_at = page.published_time.as_deref().and_then(parse_timestamp);
        meta.author = author_from_title
            .or(page.author)
            .map(|name| AuthorInfo { name, ..AuthorInfo::default() });

        Ok(meta)
    }
}

/// Split a raw Medium title into the post title and, when present, the
/// author from a `by <name>` segment. The trailing `| Medium` suffix and
/// publication-name segments are dropped.
fn split_medium_title(raw: &str) -> (String, Option<String>) {
    let mut segments = raw.split('|').map(str::trim);
    let title = segments.next().unwrap_or(raw).to_string();

    let author = segments
        .filter_map(|s| s.strip_prefix("by "))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string);

    (title, author)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

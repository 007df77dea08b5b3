//! Preview metadata model shared by every adapter.
//!
//! [`PreviewMetadata`] is the normalized shape all sources map into; which
//! enrichment fields are populated depends on [`PreviewType`]. The pipeline
//! owns the preview fields of a [`LinkRecord`] exclusively — `id`, `url`,
//! `title`, and `category` belong to the links collaborator and are never
//! mutated here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache;

/// Maximum characters kept from an upstream title.
const MAX_TITLE_LEN: usize = 300;

/// Which shape the metadata payload takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewType {
    GithubRepo,
    BlogPost,
    Webpage,
    BasicLink,
}

/// Post author or repository owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

/// Normalized preview metadata produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewMetadata {
    #[serde(rename = "type")]
    pub kind: PreviewType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,

    // Blog post enrichments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reading_time_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactions_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    // Repository enrichments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Source identifier: `github`, `dev.to`, `hashnode`, `medium`, or the
    /// hostname for generic pages.
    pub platform: String,
    /// Resolved source URL; may differ from the input after redirects.
    pub canonical_url: String,
    pub fetched_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PreviewMetadata {
    /// Minimal record with a fresh cache window; enrichment fields start
    /// empty and are filled in by the adapter.
    pub fn new(
        kind: PreviewType,
        title: impl Into<String>,
        platform: impl Into<String>,
        canonical_url: impl Into<String>,
    ) -> Self {
        let (fetched_at, expires_at) = cache::cache_window(kind);
        Self {
            kind,
            title: sanitize_title(&title.into()),
            description: None,
            featured_image: None,
            author: None,
            published_at: None,
            reading_time_minutes: None,
            reactions_count: None,
            comments_count: None,
            tags: None,
            stars: None,
            forks: None,
            language: None,
            platform: platform.into(),
            canonical_url: canonical_url.into(),
            fetched_at,
            expires_at,
        }
    }

    /// Fallback record for links without any fetched metadata: title and
    /// URL, nothing else. The stored preview stays `None` in that case —
    /// this is the shape consumers render in its place.
    pub fn basic_link(title: &str, url: &str) -> Self {
        let host = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();
        Self::new(PreviewType::BasicLink, title, host, url)
    }
}

/// Last fetch outcome, tracked independently of the metadata payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStatus {
    #[default]
    Pending,
    Success,
    Failed,
}

/// Link category assigned by the links collaborator. `Social` links are
/// rendered as icons and never fetch previews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkCategory {
    Project,
    Blog,
    Social,
    Achievement,
    Other,
}

/// A link row as seen by the pipeline. Only `preview` and `preview_status`
/// are writable from here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: String,
    pub url: String,
    pub title: String,
    pub category: LinkCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<PreviewMetadata>,
    #[serde(default)]
    pub preview_status: PreviewStatus,
}

impl LinkRecord {
    pub fn new(
        id: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        category: LinkCategory,
    ) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            title: title.into(),
            category,
            preview: None,
            preview_status: PreviewStatus::Pending,
        }
    }
}

/// Collapse whitespace runs and truncate on a char boundary.
pub(crate) fn sanitize_title(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_TITLE_LEN {
        return collapsed;
    }
    collapsed.chars().take(MAX_TITLE_LEN).collect()
}

//! Dev.to article metadata via the public articles-by-path endpoint.
//!
//! `GET https://dev.to/api/articles/{username}/{slug}` returns the full
//! article record. Field normalization: `cover_image` (or `social_image`)
//! becomes the featured image, `positive_reactions_count` becomes the
//! reactions count. The API is inconsistent about whether `tags` is an
//! array or a comma-joined string, so both shapes are accepted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::PlatformProvider;
use crate::detect::{BlogPlatform, Platform};
use crate::error::{AdapterError, AdapterResult};
use crate::http_client::PreviewClient;
use crate::metadata::{AuthorInfo, PreviewMetadata, PreviewType};

/// Dev.to article provider using the REST API.
pub struct DevtoProvider;

#[async_trait]
impl PlatformProvider for DevtoProvider {
    fn name(&self) -> &'static str {
        "dev.to"
    }

    fn platform(&self) -> Platform {
        Platform::Blog(BlogPlatform::DevTo)
    }

    async fn fetch_metadata(
        &self,
        url: &str,
        client: &PreviewClient,
    ) -> AdapterResult<PreviewMetadata> {
        let (username, slug) = parse_article_path(url)?;

        let api_url = format!("https://dev.to/api/articles/{username}/{slug}");
        debug!(%api_url, "fetching article from dev.to API");

        let response = client.get(&api_url).await?;
        if let Some(err) = AdapterError::from_status(response.status(), &api_url) {
            return Err(err);
        }

        let article: Article = response
            .json()
            .await
            .map_err(|e| AdapterError::ParseError(format!("dev.to response: {e}")))?;

        Ok(article_to_metadata(&article, url))
    }
}

/// Extract `username/slug` from an article URL.
fn parse_article_path(url: &str) -> AdapterResult<(String, String)> {
    let parsed = url::Url::parse(url)
        .map_err(|e| AdapterError::ParseError(format!("invalid URL {url}: {e}")))?;
    let segments: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    match segments.as_slice() {
        [username, slug] => Ok(((*username).to_string(), (*slug).to_string())),
        _ => Err(AdapterError::ParseError(format!(
            "not an article URL: {url}"
        ))),
    }
}

fn article_to_metadata(article: &Article, input_url: &str) -> PreviewMetadata {
    let canonical = article
        .canonical_url
        .as_deref()
        .or(article.url.as_deref())
        .unwrap_or(input_url);

    let mut meta = PreviewMetadata::new(PreviewType::BlogPost, &article.title, "dev.to", canonical);
    meta.description = article.description.clone();
    meta.featured_image = article
        .cover_image
        .clone()
        .or_else(|| article.social_image.clone());
    meta.published_at = article
        .published_timestamp
        .as_deref()
        .and_then(parse_timestamp);
    meta.reading_time_minutes = article.reading_time_minutes;
    meta.reactions_count = article.positive_reactions_count;
    meta.comments_count = article.comments_count;
    meta.tags = normalize_tags(&article.tags).or_else(|| normalize_tags(&article.tag_list));

    if let Some(user) = &article.user {
        let username = user.username.clone();
        meta.author = Some(AuthorInfo {
            name: user
                .name
                .clone()
                .or_else(|| username.clone())
                .unwrap_or_default(),
            profile_url: username.as_deref().map(|u| format!("https://dev.to/{u}")),
            username,
            avatar: user.profile_image.clone(),
        });
    }

    meta
}

/// Accept either an array of tag strings or a single comma-joined string.
fn normalize_tags(value: &Value) -> Option<Vec<String>> {
    let tags: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        _ => return None,
    };
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// Dev.to API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct Article {
    title: String,
    description: Option<String>,
    cover_image: Option<String>,
    social_image: Option<String>,
    url: Option<String>,
    canonical_url: Option<String>,
    published_timestamp: Option<String>,
    reading_time_minutes: Option<u32>,
    positive_reactions_count: Option<u64>,
    comments_count: Option<u64>,
    #[serde(default)]
    tags: Value,
    #[serde(default)]
    tag_list: Value,
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct User {
    name: Option<String>,
    username: Option<String>,
    profile_image: Option<String>,
}

//! Hashnode post metadata via GraphQL, with a layered HTML fallback.
//!
//! The preferred channel is the public GraphQL API
//! (`publication(host) { post(slug) }`). When the API returns errors or an
//! empty post, the adapter falls back to scraping the rendered page: first
//! the embedded Next.js `__NEXT_DATA__` JSON blob, then raw Open-Graph
//! meta-tag extraction. Each scrape stage is optional and non-fatal.
//!
//! A 429 from the API is surfaced as `RateLimited` immediately — scraping
//! the same rate-limited host again would be pointless.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::meta::scan_meta_tags;
use super::PlatformProvider;
use crate::detect::{BlogPlatform, Platform};
use crate::error::{AdapterError, AdapterResult};
use crate::http_client::PreviewClient;
use crate::metadata::{AuthorInfo, PreviewMetadata, PreviewType};

const GRAPHQL_ENDPOINT: &str = "https://gql.hashnode.com/";

const POST_QUERY: &str = "\
query PostBySlug($host: String!, $slug: String!) {
  publication(host: $host) {
    post(slug: $slug) {
      title
      brief
      url
      publishedAt
      readTimeInMinutes
      reactionCount
      responseCount
      coverImage { url }
      author { name username profilePicture }
      tags { name }
    }
  }
}";

static NEXT_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<script[^>]*id="__NEXT_DATA__"[^>]*>(.*?)</script>"#).expect("valid regex")
});

/// Hashnode post provider: GraphQL first, HTML scrape as fallback.
pub struct HashnodeProvider;

#[async_trait]
impl PlatformProvider for HashnodeProvider {
    fn name(&self) -> &'static str {
        "hashnode"
    }

    fn platform(&self) -> Platform {
        Platform::Blog(BlogPlatform::Hashnode)
    }

    async fn fetch_metadata(
        &self,
        url: &str,
        client: &PreviewClient,
    ) -> AdapterResult<PreviewMetadata> {
        let reference = parse_hashnode_url(url)?;

        // The hashnode.com/post/<slug> shape carries no publication host,
        // which the GraphQL query requires — go straight to the page.
        let Some(host) = &reference.host else {
            debug!(url, "no publication host in URL, scraping page");
            return scrape_page(url, client).await;
        };

        match query_graphql(host, &reference.slug, client).await {
            Ok(Some(post)) => Ok(post_to_metadata(&post, url)),
            Ok(None) => {
                // Empty post without an explicit error: could be a deleted
                // post or an API inconsistency. We scrape and let the page
                // decide; the distinct log line keeps the two cases
                // observable.
                debug!(url, "GraphQL returned empty post, falling back to page scrape");
                scrape_page(url, client).await
            }
            Err(err @ AdapterError::RateLimited(_)) => Err(err),
            Err(err) => {
                warn!(url, kind = ?err.kind(), "GraphQL query failed, falling back to page scrape: {err}");
                scrape_page(url, client).await
            }
        }
    }
}

struct PostReference {
    /// Publication host (`alice.hashnode.dev`); absent for
    /// `hashnode.com/post/<slug>` URLs.
    host: Option<String>,
    slug: String,
}

fn parse_hashnode_url(url: &str) -> AdapterResult<PostReference> {
    let parsed = url::Url::parse(url)
        .map_err(|e| AdapterError::ParseError(format!("invalid URL {url}: {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| AdapterError::ParseError(format!("no host in {url}")))?
        .to_lowercase();
    let segments: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if host == "hashnode.com" || host.ends_with(".hashnode.com") {
        return match segments.as_slice() {
            ["post", slug] => Ok(PostReference {
                host: None,
                slug: (*slug).to_string(),
            }),
            _ => Err(AdapterError::ParseError(format!(
                "not a post URL: {url}"
            ))),
        };
    }

    // <publication>.hashnode.dev/<slug>
    match segments.first() {
        Some(slug) => Ok(PostReference {
            host: Some(host),
            slug: (*slug).to_string(),
        }),
        None => Err(AdapterError::ParseError(format!("no slug in {url}"))),
    }
}

async fn query_graphql(
    host: &str,
    slug: &str,
    client: &PreviewClient,
) -> AdapterResult<Option<Post>> {
    debug!(host, slug, "querying Hashnode GraphQL API");

    let body = json!({
        "query": POST_QUERY,
        "variables": { "host": host, "slug": slug },
    });

    let response = client
        .inner()
        .post(GRAPHQL_ENDPOINT)
        .json(&body)
        .send()
        .await
        .map_err(|e| AdapterError::from_transport(&e))?;

    if response.status() == StatusCode::TOO_MANY_REQUESTS {
        return Err(AdapterError::RateLimited(
            "Hashnode GraphQL API returned 429".into(),
        ));
    }
    if !response.status().is_success() {
        return Err(AdapterError::NetworkError(format!(
            "Hashnode GraphQL API returned status {}",
            response.status()
        )));
    }

    let reply: GraphqlResponse = response
        .json()
        .await
        .map_err(|e| AdapterError::ParseError(format!("GraphQL response: {e}")))?;

    if !reply.errors.is_empty() {
        let messages: Vec<&str> = reply.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(AdapterError::ParseError(format!(
            "GraphQL errors: {}",
            messages.join("; ")
        )));
    }

    Ok(reply.data.and_then(|d| d.publication).and_then(|p| p.post))
}

/// Scrape the rendered post page: embedded page data first, then raw
/// Open-Graph tags.
async fn scrape_page(url: &str, client: &PreviewClient) -> AdapterResult<PreviewMetadata> {
    let (final_url, html) = client.fetch_html(url).await?;

    if let Some(post) = post_from_next_data(&html) {
        debug!(url, "extracted post from embedded page data");
        return Ok(post_to_metadata(&post, &final_url));
    }

    og_metadata(&html, &final_url).ok_or_else(|| {
        AdapterError::ParseError(format!("no usable metadata in page at {final_url}"))
    })
}

/// Best-effort extraction from the serialized Next.js page props.
fn post_from_next_data(html: &str) -> Option<Post> {
    let blob = NEXT_DATA_RE.captures(html)?.get(1)?.as_str();
    let value: serde_json::Value = serde_json::from_str(blob).ok()?;
    let post = value.pointer("/props/pageProps/post")?;
    serde_json::from_value(post.clone()).ok()
}

/// Last-resort Open-Graph extraction. Returns `None` when not even a title
/// is present.
fn og_metadata(html: &str, final_url: &str) -> Option<PreviewMetadata> {
    let tags = scan_meta_tags(super::meta::head_fragment(html));
    let title = tags.get("og:title").filter(|t| !t.is_empty())?;

    let canonical = tags
        .get("og:url")
        .filter(|u| !u.is_empty())
        .map_or(final_url, String::as_str);
    let mut meta = PreviewMetadata::new(PreviewType::BlogPost, title, "hashnode", canonical);
    meta.description = tags.get("og:description").filter(|d| !d.is_empty()).cloned();
    meta.featured_image = tags.get("og:image").filter(|i| !i.is_empty()).cloned();
    Some(meta)
}

fn post_to_metadata(post: &Post, fallback_url: &str) -> PreviewMetadata {
    let canonical = post.url.as_deref().unwrap_or(fallback_url);
    let mut meta = PreviewMetadata::new(PreviewType::BlogPost, &post.title, "hashnode", canonical);
    meta.description = post.brief.clone();
    meta.featured_image = post.cover_image.as_ref().and_then(|c| c.url.clone());
    meta.published_at = post.published_at.as_deref().and_then(parse_timestamp);
    meta.reading_time_minutes = post.read_time_in_minutes;
    meta.reactions_count = post.reaction_count;
    meta.comments_count = post.response_count;
    let tags: Vec<String> = post.tags.iter().map(|t| t.name.clone()).collect();
    if !tags.is_empty() {
        meta.tags = Some(tags);
    }
    if let Some(author) = &post.author {
        let username = author.username.clone();
        meta.author = Some(AuthorInfo {
            name: author
                .name
                .clone()
                .or_else(|| username.clone())
                .unwrap_or_default(),
            profile_url: username
                .as_deref()
                .map(|u| format!("https://hashnode.com/@{u}")),
            username,
            avatar: author.profile_picture.clone(),
        });
    }
    meta
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// GraphQL Response Types (shared with the embedded page-data blob)
// ============================================================================

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    data: Option<GraphqlData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlData {
    publication: Option<Publication>,
}

#[derive(Debug, Deserialize)]
struct Publication {
    post: Option<Post>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Post {
    title: String,
    brief: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
    read_time_in_minutes: Option<u32>,
    reaction_count: Option<u64>,
    response_count: Option<u64>,
    cover_image: Option<CoverImage>,
    author: Option<Author>,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct CoverImage {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Author {
    name: Option<String>,
    username: Option<String>,
    profile_picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_publication_urls() {
        let r = parse_hashnode_url("https://alice.hashnode.dev/my-post").unwrap();
        assert_eq!(r.host.as_deref(), Some("alice.hashnode.dev"));
        assert_eq!(r.slug, "my-post");
    }

    #[test]
    fn parses_hashnode_com_post_urls() {
        let r = parse_hashnode_url("https://hashnode.com/post/some-slug").unwrap();
        assert!(r.host.is_none());
        assert_eq!(r.slug, "some-slug");
    }

    #[test]
    fn rejects_unrecognized_shapes() {
        assert!(parse_hashnode_url("https://hashnode.com/explore").is_err());
        assert!(parse_hashnode_url("https://alice.hashnode.dev/").is_err());
        assert!(parse_hashnode_url("not a url").is_err());
    }

    #[test]
    fn graphql_response_with_post() {
        let reply: GraphqlResponse = serde_json::from_str(
            r#"{
                "data": {
                    "publication": {
                        "post": {
                            "title": "Async Rust Patterns",
                            "brief": "Short summary",
                            "url": "https://alice.hashnode.dev/async-rust-patterns",
                            "publishedAt": "2024-05-10T08:00:00Z",
                            "readTimeInMinutes": 6,
                            "reactionCount": 12,
                            "responseCount": 3,
                            "coverImage": {"url": "https://cdn.example/cover.png"},
                            "author": {"name": "Alice", "username": "alice", "profilePicture": null},
                            "tags": [{"name": "rust"}, {"name": "async"}]
                        }
                    }
                }
            }"#,
        )
        .unwrap();

        let post = reply.data.unwrap().publication.unwrap().post.unwrap();
        let meta = post_to_metadata(&post, "https://fallback.example");
        assert_eq!(meta.title, "Async Rust Patterns");
        assert_eq!(meta.canonical_url, "https://alice.hashnode.dev/async-rust-patterns");
        assert_eq!(meta.reading_time_minutes, Some(6));
        assert_eq!(meta.comments_count, Some(3));
        assert_eq!(meta.tags.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(
            meta.author.unwrap().profile_url.as_deref(),
            Some("https://hashnode.com/@alice")
        );
    }

    #[test]
    fn graphql_empty_post_parses_as_none() {
        let reply: GraphqlResponse =
            serde_json::from_str(r#"{"data": {"publication": {"post": null}}}"#).unwrap();
        assert!(reply.data.unwrap().publication.unwrap().post.is_none());
    }

    #[test]
    fn next_data_blob_extraction() {
        let html = r#"<html><head></head><body>
            <script id="__NEXT_DATA__" type="application/json">
            {"props":{"pageProps":{"post":{
                "title":"From The Blob",
                "brief":"via page data",
                "url":"https://alice.hashnode.dev/from-the-blob",
                "tags":[]
            }}}}
            </script></body></html>"#;

        let post = post_from_next_data(html).unwrap();
        assert_eq!(post.title, "From The Blob");
        assert_eq!(post.brief.as_deref(), Some("via page data"));
    }

    #[test]
    fn next_data_absent_or_broken_is_none() {
        assert!(post_from_next_data("<html><body>no blob</body></html>").is_none());

        let broken = r#"<script id="__NEXT_DATA__" type="application/json">{not json</script>"#;
        assert!(post_from_next_data(broken).is_none());

        let wrong_shape = r#"<script id="__NEXT_DATA__" type="application/json">{"props":{}}</script>"#;
        assert!(post_from_next_data(wrong_shape).is_none());
    }

    #[test]
    fn og_fallback_requires_title() {
        let html = r#"<head>
            <meta property="og:title" content="OG Post">
            <meta property="og:description" content="desc">
            <meta property="og:image" content="https://img.example/c.png">
        </head>"#;
        let meta = og_metadata(html, "https://alice.hashnode.dev/x").unwrap();
        assert_eq!(meta.title, "OG Post");
        assert_eq!(meta.kind, PreviewType::BlogPost);
        assert_eq!(meta.platform, "hashnode");

        assert!(og_metadata("<head></head>", "https://a.example").is_none());
    }
}

//! GitHub repository metadata via the GitHub REST API.
//!
//! Works unauthenticated at GitHub's lower rate limit; a token in the
//! config raises it. 403 and 429 both mean rate limiting here — GitHub
//! serves 403 with a rate-limit body for unauthenticated overuse.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::PlatformProvider;
use crate::detect::{parse_repo_path, Platform};
use crate::error::{AdapterError, AdapterResult};
use crate::http_client::PreviewClient;
use crate::metadata::{AuthorInfo, PreviewMetadata, PreviewType};

/// GitHub repository provider using the REST API.
pub struct GithubProvider;

#[async_trait]
impl PlatformProvider for GithubProvider {
    fn name(&self) -> &'static str {
        "github"
    }

    fn platform(&self) -> Platform {
        Platform::GithubRepo
    }

    async fn fetch_metadata(
        &self,
        url: &str,
        client: &PreviewClient,
    ) -> AdapterResult<PreviewMetadata> {
        let (owner, repo) = parse_github_url(url)?;

        let api_url = format!("https://api.github.com/repos/{owner}/{repo}");
        debug!(%api_url, "fetching repository from GitHub API");

        let mut request = client
            .inner()
            .get(&api_url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &client.config().github_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AdapterError::from_transport(&e))?;

        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
                return Err(AdapterError::RateLimited(format!(
                    "GitHub API rate limit hit for {owner}/{repo}"
                )));
            }
            StatusCode::NOT_FOUND => {
                return Err(AdapterError::NotFound(format!(
                    "repository {owner}/{repo} not found"
                )));
            }
            s if !s.is_success() => {
                return Err(AdapterError::NetworkError(format!(
                    "GitHub API returned unexpected status {s}"
                )));
            }
            _ => {}
        }

        let repository: Repository = response
            .json()
            .await
            .map_err(|e| AdapterError::ParseError(format!("GitHub response: {e}")))?;

        Ok(repository_to_metadata(&repository))
    }
}

/// Extract `owner/repo` from a repository URL.
fn parse_github_url(url: &str) -> AdapterResult<(String, String)> {
    url::Url::parse(url)
        .ok()
        .and_then(|u| parse_repo_path(u.path()))
        .ok_or_else(|| AdapterError::ParseError(format!("not a repository URL: {url}")))
}

fn repository_to_metadata(repository: &Repository) -> PreviewMetadata {
    let mut meta = PreviewMetadata::new(
        PreviewType::GithubRepo,
        &repository.full_name,
        "github",
        &repository.html_url,
    );
    meta.description = repository.description.clone();
    meta.stars = Some(repository.stargazers_count);
    meta.forks = Some(repository.forks_count);
    meta.language = repository.language.clone();
    meta.published_at = repository
        .created_at
        .as_deref()
        .and_then(parse_timestamp);
    meta.author = Some(AuthorInfo {
        name: repository.owner.login.clone(),
        username: Some(repository.owner.login.clone()),
        avatar: repository.owner.avatar_url.clone(),
        profile_url: repository.owner.html_url.clone(),
    });
    meta
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ============================================================================
// GitHub API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
    html_url: String,
    description: Option<String>,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
    created_at: Option<String>,
    owner: Owner,
}

#[derive(Debug, Deserialize)]
struct Owner {
    login: String,
    avatar_url: Option<String>,
    html_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_repository_urls() {
        let (owner, repo) = parse_github_url("https://github.com/rust-lang/rust").unwrap();
        assert_eq!(owner, "rust-lang");
        assert_eq!(repo, "rust");
    }

    #[test]
    fn parses_url_with_query() {
        let (owner, repo) =
            parse_github_url("https://github.com/owner/repo?tab=readme-ov-file").unwrap();
        assert_eq!(owner, "owner");
        assert_eq!(repo, "repo");
    }

    #[test]
    fn rejects_non_repository_urls() {
        assert!(parse_github_url("https://github.com/rust-lang").is_err());
        assert!(parse_github_url("https://github.com/a/b/issues/1").is_err());
        assert!(parse_github_url("not a url").is_err());
    }

    #[test]
    fn maps_repository_fields() {
        let repository: Repository = serde_json::from_str(
            r#"{
                "full_name": "rust-lang/rust",
                "html_url": "https://github.com/rust-lang/rust",
                "description": "The Rust programming language",
                "stargazers_count": 90000,
                "forks_count": 12000,
                "language": "Rust",
                "created_at": "2010-06-16T20:39:03Z",
                "owner": {
                    "login": "rust-lang",
                    "avatar_url": "https://avatars.example/1",
                    "html_url": "https://github.com/rust-lang"
                }
            }"#,
        )
        .unwrap();

        let meta = repository_to_metadata(&repository);
        assert_eq!(meta.kind, PreviewType::GithubRepo);
        assert_eq!(meta.title, "rust-lang/rust");
        assert_eq!(meta.platform, "github");
        assert_eq!(meta.stars, Some(90000));
        assert_eq!(meta.forks, Some(12000));
        assert_eq!(meta.language.as_deref(), Some("Rust"));
        assert!(meta.published_at.is_some());

        let author = meta.author.unwrap();
        assert_eq!(author.name, "rust-lang");
        assert_eq!(author.avatar.as_deref(), Some("https://avatars.example/1"));
    }

    #[test]
    fn tolerates_minimal_response() {
        let repository: Repository = serde_json::from_str(
            r#"{
                "full_name": "a/b",
                "html_url": "https://github.com/a/b",
                "description": null,
                "language": null,
                "created_at": null,
                "owner": {"login": "a", "avatar_url": null, "html_url": null}
            }"#,
        )
        .unwrap();

        let meta = repository_to_metadata(&repository);
        assert_eq!(meta.stars, Some(0));
        assert!(meta.description.is_none());
        assert!(meta.published_at.is_none());
    }
}

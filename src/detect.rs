//! URL platform classification.
//!
//! Maps a raw URL onto the platform that should serve its preview metadata.
//! Matching is hostname/path based, deterministic, and total: anything
//! unrecognized — including unparseable input — classifies as a generic
//! webpage rather than failing.

use url::Url;

/// Blog platforms with dedicated metadata sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlogPlatform {
    DevTo,
    Hashnode,
    Medium,
    Substack,
}

impl BlogPlatform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DevTo => "dev.to",
            Self::Hashnode => "hashnode",
            Self::Medium => "medium",
            Self::Substack => "substack",
        }
    }
}

/// Result of classifying a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// `github.com/<owner>/<repo>` repository page.
    GithubRepo,
    /// Post on a recognized blog platform.
    Blog(BlogPlatform),
    /// Everything else.
    Webpage,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GithubRepo => "github",
            Self::Blog(p) => p.as_str(),
            Self::Webpage => "webpage",
        }
    }

    pub fn is_blog(self) -> bool {
        matches!(self, Self::Blog(_))
    }
}

/// Classify a URL. Pure; the same input always yields the same platform.
pub fn detect(url: &str) -> Platform {
    let Ok(parsed) = Url::parse(url) else {
        return Platform::Webpage;
    };
    let Some(host) = parsed.host_str() else {
        return Platform::Webpage;
    };

    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    if host == "github.com" {
        if parse_repo_path(parsed.path()).is_some() {
            return Platform::GithubRepo;
        }
        return Platform::Webpage;
    }
    if host == "dev.to" {
        return Platform::Blog(BlogPlatform::DevTo);
    }
    if host == "hashnode.dev"
        || host.ends_with(".hashnode.dev")
        || host == "hashnode.com"
        || host.ends_with(".hashnode.com")
    {
        return Platform::Blog(BlogPlatform::Hashnode);
    }
    if host == "medium.com" || host.ends_with(".medium.com") {
        return Platform::Blog(BlogPlatform::Medium);
    }
    if host.ends_with(".substack.com") {
        return Platform::Blog(BlogPlatform::Substack);
    }

    Platform::Webpage
}

/// Extract `(owner, repo)` from a GitHub-style path.
///
/// Only the exact `/owner/repo` shape qualifies — deeper paths (issues,
/// pulls, blobs) are not repository pages.
pub(crate) fn parse_repo_path(path: &str) -> Option<(String, String)> {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if repo.is_empty() {
        return None;
    }
    Some((owner.to_string(), repo.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_github_repo() {
        assert_eq!(detect("https://github.com/rust-lang/rust"), Platform::GithubRepo);
        assert_eq!(detect("https://github.com/rust-lang/rust/"), Platform::GithubRepo);
        assert_eq!(detect("https://GitHub.com/Owner/Repo"), Platform::GithubRepo);
        assert_eq!(detect("https://www.github.com/owner/repo"), Platform::GithubRepo);
    }

    #[test]
    fn github_non_repo_paths_are_generic() {
        assert_eq!(detect("https://github.com/rust-lang"), Platform::Webpage);
        assert_eq!(
            detect("https://github.com/rust-lang/rust/issues/1"),
            Platform::Webpage
        );
        assert_eq!(detect("https://github.com/"), Platform::Webpage);
    }

    #[test]
    fn detects_devto() {
        assert_eq!(
            detect("https://dev.to/alice/my-post-123"),
            Platform::Blog(BlogPlatform::DevTo)
        );
    }

    #[test]
    fn detects_hashnode_hosts() {
        assert_eq!(
            detect("https://alice.hashnode.dev/my-post"),
            Platform::Blog(BlogPlatform::Hashnode)
        );
        assert_eq!(
            detect("https://hashnode.com/post/some-slug"),
            Platform::Blog(BlogPlatform::Hashnode)
        );
    }

    #[test]
    fn detects_medium_hosts() {
        assert_eq!(
            detect("https://medium.com/@alice/post-abc"),
            Platform::Blog(BlogPlatform::Medium)
        );
        assert_eq!(
            detect("https://alice.medium.com/post-abc"),
            Platform::Blog(BlogPlatform::Medium)
        );
    }

    #[test]
    fn detects_substack() {
        assert_eq!(
            detect("https://alice.substack.com/p/issue-42"),
            Platform::Blog(BlogPlatform::Substack)
        );
    }

    #[test]
    fn unknown_hosts_are_generic() {
        assert_eq!(detect("https://example.org/anything"), Platform::Webpage);
        // `medium.com.evil.example` must not match the medium rule
        assert_eq!(detect("https://medium.com.evil.example/x"), Platform::Webpage);
    }

    #[test]
    fn malformed_input_does_not_panic() {
        assert_eq!(detect("not a url"), Platform::Webpage);
        assert_eq!(detect(""), Platform::Webpage);
        assert_eq!(detect("mailto:alice@example.org"), Platform::Webpage);
    }

    #[test]
    fn detection_is_deterministic() {
        let url = "https://dev.to/alice/my-post-123";
        assert_eq!(detect(url), detect(url));
    }

    #[test]
    fn repo_path_parsing() {
        assert_eq!(
            parse_repo_path("/rust-lang/rust"),
            Some(("rust-lang".into(), "rust".into()))
        );
        assert_eq!(
            parse_repo_path("/owner/repo.git"),
            Some(("owner".into(), "repo".into()))
        );
        assert_eq!(parse_repo_path("/owner"), None);
        assert_eq!(parse_repo_path("/owner/repo/issues"), None);
        assert_eq!(parse_repo_path("/"), None);
    }
}

//! Pipeline configuration.
//!
//! Every knob an adapter needs lives here and is injected at construction
//! time. Adapters never read the process environment themselves — only
//! [`PreviewConfig::from_env`] touches it, at the composition root.

use std::time::Duration;

/// Configuration injected into the HTTP client and adapters.
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Optional GitHub API token. Raises the unauthenticated rate limit;
    /// the adapter works without it.
    pub github_token: Option<String>,
    /// User-Agent sent on every outbound request.
    pub user_agent: String,
    /// Whole-request timeout for each outbound fetch.
    pub request_timeout: Duration,
    /// Connect-phase timeout.
    pub connect_timeout: Duration,
}

impl PreviewConfig {
    /// Read the recognized environment options (`GITHUB_TOKEN`), defaults
    /// for everything else.
    pub fn from_env() -> Self {
        Self {
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            ..Self::default()
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            user_agent: concat!("richlink/", env!("CARGO_PKG_VERSION")).to_string(),
            request_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

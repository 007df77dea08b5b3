//! HTTP client shared by all adapters.
//!
//! Wraps `reqwest` with the settings every preview fetch needs: HTTP/2
//! where the server supports it, compressed transfer, bounded timeouts so
//! one unresponsive upstream cannot stall a batch, and a capped redirect
//! chain so the final response URL can serve as the canonical URL.

use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use tracing::debug;

use crate::config::PreviewConfig;
use crate::error::{AdapterError, AdapterResult};

/// HTTP client configured for preview fetching.
pub struct PreviewClient {
    client: Client,
    config: PreviewConfig,
}

impl PreviewClient {
    pub fn new(config: PreviewConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Ok(ua) = HeaderValue::from_str(&config.user_agent) {
            headers.insert(USER_AGENT, ua);
        }

        let client = Client::builder()
            // Let the server negotiate HTTP/2; many blog hosts are 1.1-only
            .http2_adaptive_window(true)
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        Ok(Self { client, config })
    }

    /// GET a URL, mapping transport failures (including timeouts) to
    /// [`AdapterError::NetworkError`]. Status handling is the caller's job.
    pub async fn get(&self, url: &str) -> AdapterResult<Response> {
        debug!(url, "fetching");
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| AdapterError::from_transport(&e))
    }

    /// Fetch a page body. Returns the final URL after redirects together
    /// with the decoded text. 404/429 and other non-success statuses map
    /// to their adapter error kinds.
    pub async fn fetch_html(&self, url: &str) -> AdapterResult<(String, String)> {
        let response = self.get(url).await?;
        if let Some(err) = AdapterError::from_status(response.status(), url) {
            return Err(err);
        }
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::from_transport(&e))?;
        Ok((final_url, body))
    }

    /// The underlying `reqwest` client, for adapters that need custom
    /// headers or request bodies.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_default_config() {
        let client = PreviewClient::new(PreviewConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn config_is_accessible_to_adapters() {
        let config = PreviewConfig {
            github_token: Some("token123".into()),
            ..PreviewConfig::default()
        };
        let client = PreviewClient::new(config).unwrap();
        assert_eq!(client.config().github_token.as_deref(), Some("token123"));
    }
}

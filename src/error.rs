//! Error taxonomy for the preview pipeline.
//!
//! [`AdapterError`] is internal: it drives the fallback chain and is logged,
//! never surfaced to callers. [`PreviewError`] covers structural misuse of
//! the service operations (unknown ids, oversized batches) — a preview fetch
//! that merely fails upstream is reported through `PreviewStatus`, not here.

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse classification of an adapter failure, used for logging and
/// fallback decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RateLimited,
    NotFound,
    ParseError,
    NetworkError,
}

/// Failure signaled by a platform adapter instead of partial data.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    ParseError(String),

    #[error("network error: {0}")]
    NetworkError(String),
}

impl AdapterError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RateLimited(_) => FailureKind::RateLimited,
            Self::NotFound(_) => FailureKind::NotFound,
            Self::ParseError(_) => FailureKind::ParseError,
            Self::NetworkError(_) => FailureKind::NetworkError,
        }
    }

    /// Map a transport-level failure. Timeouts are network errors like any
    /// other: they trigger the same fallback chain.
    pub(crate) fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::NetworkError(format!("request timed out: {err}"))
        } else {
            Self::NetworkError(err.to_string())
        }
    }

    /// Map an HTTP status to an error, or `None` for success statuses.
    ///
    /// 403 is deliberately not mapped here — only GitHub treats it as a
    /// rate-limit signal, and that adapter handles it itself.
    pub(crate) fn from_status(status: StatusCode, url: &str) -> Option<Self> {
        match status {
            StatusCode::NOT_FOUND => Some(Self::NotFound(format!("{url} returned 404"))),
            StatusCode::TOO_MANY_REQUESTS => {
                Some(Self::RateLimited(format!("{url} returned 429")))
            }
            s if !s.is_success() => {
                Some(Self::NetworkError(format!("{url} returned unexpected status {s}")))
            }
            _ => None,
        }
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Structural errors from the service operations.
#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("unknown link id: {0}")]
    UnknownLink(String),

    #[error("batch is empty")]
    EmptyBatch,

    #[error("batch of {requested} links exceeds the maximum of {max}")]
    BatchTooLarge { requested: usize, max: usize },

    #[error("malformed link id: {0:?}")]
    MalformedId(String),

    #[error("store error: {0}")]
    Store(anyhow::Error),
}

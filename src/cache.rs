//! Cache window and expiry policy.
//!
//! A stored preview is valid until its `expires_at` stamp; the TTL depends
//! on the source. Repository data moves fast (stars, forks) and expires in
//! 24 hours; blog and webpage metadata holds for 7 days.

use chrono::{DateTime, Duration, Utc};

use crate::metadata::{LinkCategory, LinkRecord, PreviewStatus, PreviewType};

/// TTL for a freshly fetched preview of the given kind.
pub fn ttl_for(kind: PreviewType) -> Duration {
    match kind {
        PreviewType::GithubRepo => Duration::hours(24),
        PreviewType::BlogPost | PreviewType::Webpage | PreviewType::BasicLink => Duration::days(7),
    }
}

/// Fresh `(fetched_at, expires_at)` pair. `expires_at > fetched_at` holds
/// for every kind.
pub fn cache_window(kind: PreviewType) -> (DateTime<Utc>, DateTime<Utc>) {
    let now = Utc::now();
    (now, now + ttl_for(kind))
}

/// Whether a link's preview should be (re)fetched.
///
/// Social links never fetch previews, regardless of state. Otherwise a
/// refresh is due when no metadata exists, the last fetch did not succeed,
/// or the cache window has closed.
pub fn needs_refresh(link: &LinkRecord) -> bool {
    needs_refresh_at(link, Utc::now())
}

/// [`needs_refresh`] against an explicit clock, for deterministic tests.
pub fn needs_refresh_at(link: &LinkRecord, now: DateTime<Utc>) -> bool {
    if link.category == LinkCategory::Social {
        return false;
    }
    let Some(meta) = &link.preview else {
        return true;
    };
    if link.preview_status != PreviewStatus::Success {
        return true;
    }
    // expires_at itself is already stale
    now >= meta.expires_at
}

/// Null out the preview fields. Used when the underlying URL is edited or
/// the link removed; fetch failures never call this.
pub fn clear_preview(link: &mut LinkRecord) {
    link.preview = None;
    link.preview_status = PreviewStatus::Pending;
}

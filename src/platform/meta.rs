//! HTML meta tag extraction helpers.
//!
//! All extraction is regex-based over a head-bounded fragment of the page,
//! keeping the synchronous work between network suspensions cheap. Every
//! stage is optional: a missing or mangled tag yields `None`, never an
//! error — adapters decide which fields are mandatory.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Upper bound on how far into the document we scan when no `</head>`
/// marker is found.
const MAX_HEAD_SCAN: usize = 256 * 1024;

static HEAD_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</head\s*>").expect("valid regex"));

static META_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<meta\s[^>]*>").expect("valid regex"));

static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([a-zA-Z:_-]+)\s*=\s*["']([^"']*)["']"#).expect("valid regex")
});

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid regex"));

static CANONICAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<link\s[^>]*rel\s*=\s*["']canonical["'][^>]*>"#).expect("valid regex")
});

/// Fields commonly present in a page head. Adapters pick what they need.
#[derive(Debug, Default, Clone)]
pub(crate) struct PageMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    pub canonical_url: Option<String>,
    pub published_time: Option<String>,
}

/// Extract the standard Open-Graph/Twitter/plain-meta fields.
pub(crate) fn extract_page_meta(html: &str) -> PageMeta {
    let head = head_fragment(html);
    let tags = scan_meta_tags(head);
    let pick = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| tags.get(*k).filter(|v| !v.is_empty()).cloned())
    };

    PageMeta {
        title: pick(&["og:title", "twitter:title"]).or_else(|| title_text(head)),
        description: pick(&["og:description", "twitter:description", "description"]),
        image: pick(&["og:image", "og:image:url", "twitter:image"]),
        author: pick(&["author", "article:author"]),
        canonical_url: pick(&["og:url"]).or_else(|| canonical_href(head)),
        published_time: pick(&["article:published_time"]),
    }
}

/// Scan `<meta>` tags into a `property|name -> content` map. First
/// occurrence of a key wins, matching browser behavior for duplicates.
pub(crate) fn scan_meta_tags(html: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for tag in META_TAG_RE.find_iter(html) {
        let mut key = None;
        let mut content = None;
        for cap in ATTR_RE.captures_iter(tag.as_str()) {
            match cap[1].to_ascii_lowercase().as_str() {
                "property" | "name" => key = Some(cap[2].to_ascii_lowercase()),
                "content" => content = Some(decode_entities(cap[2].trim())),
                _ => {}
            }
        }
        if let (Some(k), Some(v)) = (key, content) {
            out.entry(k).or_insert(v);
        }
    }
    out
}

/// The document up to `</head>`, capped at [`MAX_HEAD_SCAN`] bytes.
pub(crate) fn head_fragment(html: &str) -> &str {
    let mut cap = html.len().min(MAX_HEAD_SCAN);
    while cap < html.len() && !html.is_char_boundary(cap) {
        cap -= 1;
    }
    let scan = &html[..cap];
    match HEAD_END_RE.find(scan) {
        Some(m) => &scan[..m.start()],
        None => scan,
    }
}

fn title_text(head: &str) -> Option<String> {
    let raw = TITLE_RE.captures(head)?.get(1)?.as_str();
    let decoded = decode_entities(raw.trim());
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

fn canonical_href(head: &str) -> Option<String> {
    let tag = CANONICAL_RE.find(head)?.as_str();
    ATTR_RE
        .captures_iter(tag)
        .find(|cap| cap[1].eq_ignore_ascii_case("href"))
        .map(|cap| cap[2].to_string())
        .filter(|href| !href.is_empty())
}

/// Decode the handful of entities that actually show up in titles and
/// descriptions. Not a general HTML decoder.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <title>Fallback Title &amp; More</title>
        <meta property="og:title" content="OG Title" />
        <meta property="og:description" content="A description">
        <meta property="og:image" content="https://img.example/x.png">
        <meta name="author" content="Alice">
        <meta property="og:url" content="https://canonical.example/post">
        </head><body><p>Body text</p></body></html>"#;

    #[test]
    fn extracts_og_fields() {
        let meta = extract_page_meta(PAGE);
        assert_eq!(meta.title.as_deref(), Some("OG Title"));
        assert_eq!(meta.description.as_deref(), Some("A description"));
        assert_eq!(meta.image.as_deref(), Some("https://img.example/x.png"));
        assert_eq!(meta.author.as_deref(), Some("Alice"));
        assert_eq!(meta.canonical_url.as_deref(), Some("https://canonical.example/post"));
    }

    #[test]
    fn title_tag_is_fallback() {
        let html = "<html><head><title>Only Title &amp; More</title></head><body></body></html>";
        let meta = extract_page_meta(html);
        assert_eq!(meta.title.as_deref(), Some("Only Title & More"));
    }

    #[test]
    fn content_before_property_still_matches() {
        let html = r#"<head><meta content="Reversed" property="og:title"></head>"#;
        let meta = extract_page_meta(html);
        assert_eq!(meta.title.as_deref(), Some("Reversed"));
    }

    #[test]
    fn missing_tags_yield_none() {
        let meta = extract_page_meta("<html><head></head><body></body></html>");
        assert!(meta.title.is_none());
        assert!(meta.description.is_none());
        assert!(meta.image.is_none());
    }

    #[test]
    fn malformed_html_does_not_panic() {
        let meta = extract_page_meta("<<<>>>< meta content=>< not html at all");
        assert!(meta.title.is_none());

        let meta = extract_page_meta("");
        assert!(meta.title.is_none());
    }

    #[test]
    fn meta_tags_outside_head_are_ignored() {
        let html = r#"<head></head><body><meta property="og:title" content="Late"></body>"#;
        let meta = extract_page_meta(html);
        assert!(meta.title.is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let html = r#"<head>
            <meta property="og:title" content="First">
            <meta property="og:title" content="Second">
        </head>"#;
        let tags = scan_meta_tags(html);
        assert_eq!(tags.get("og:title").map(String::as_str), Some("First"));
    }

    #[test]
    fn canonical_link_fallback() {
        let html = r#"<head><link rel="canonical" href="https://c.example/p"></head>"#;
        let meta = extract_page_meta(html);
        assert_eq!(meta.canonical_url.as_deref(), Some("https://c.example/p"));
    }

    #[test]
    fn head_fragment_stops_at_close_tag() {
        let html = "<head>abc</head><body>def</body>";
        assert_eq!(head_fragment(html), "<head>abc");
    }

    #[test]
    fn decode_common_entities() {
        assert_eq!(decode_entities("A &amp; B &#39;C&#39;"), "A & B 'C'");
    }
}

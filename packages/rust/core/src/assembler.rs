//! Final document types and assembly.
//!
//! Purely structural: feed-level fields carry over from the raw feed, the
//! ordered processed posts slot in where the raw items were. No failure
//! modes of its own.

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

use backfeed_attachments::Attachments;
use backfeed_richtext::RichText;
use backfeed_shared::RawFeed;

/// The normalized document collection produced from one feed export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Feed title.
    pub title: String,
    /// Feed icon URL.
    pub icon: Url,
    /// Canonical URL of the feed itself.
    pub feed_url: Url,
    /// URL of the site the feed belongs to.
    pub web_page_url: Url,
    /// Feed format version URL.
    pub version: Url,
    /// Processed posts, order matching the raw feed's items.
    pub posts: Vec<Post>,
}

/// One processed post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// Canonical web URL of the post.
    pub web_url: Url,
    /// Publish timestamp, normalized to UTC.
    pub date_published: DateTime<Utc>,
    /// Classified attachments found in the content.
    pub attachments: Attachments,
    /// Flattened plain text of the rich content.
    pub content_plain: String,
    /// Structured rich content.
    pub content_rich: RichText,
    /// Original HTML, UTF-16LE with BOM, retained verbatim for callers
    /// that need the raw source. Omitted from JSON exports.
    #[serde(skip_serializing)]
    pub content_html: Vec<u8>,
}

impl Document {
    /// Combine the raw feed's metadata with the processed posts.
    pub fn assemble(raw: &RawFeed, posts: Vec<Post>) -> Self {
        Self {
            title: raw.title.clone(),
            icon: raw.icon.clone(),
            feed_url: raw.feed_url.clone(),
            web_page_url: raw.home_page_url.clone(),
            version: raw.version.clone(),
            posts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_feed() -> RawFeed {
        RawFeed {
            items: vec![],
            title: "My Blog".into(),
            icon: Url::parse("https://example.com/icon.png").unwrap(),
            feed_url: Url::parse("https://example.com/feed.json").unwrap(),
            home_page_url: Url::parse("https://example.com/").unwrap(),
            version: Url::parse("https://jsonfeed.org/version/1.1").unwrap(),
        }
    }

    fn post(url: &str) -> Post {
        Post {
            web_url: Url::parse(url).unwrap(),
            date_published: "2023-03-10T00:00:00Z".parse().unwrap(),
            attachments: Attachments::default(),
            content_plain: String::new(),
            content_rich: RichText::default(),
            content_html: Vec::new(),
        }
    }

    #[test]
    fn feed_level_fields_carry_over() {
        let doc = Document::assemble(&raw_feed(), vec![]);
        assert_eq!(doc.title, "My Blog");
        assert_eq!(doc.web_page_url.as_str(), "https://example.com/");
        assert_eq!(doc.version.as_str(), "https://jsonfeed.org/version/1.1");
        assert!(doc.posts.is_empty());
    }

    #[test]
    fn post_order_is_preserved() {
        let doc = Document::assemble(
            &raw_feed(),
            vec![
                post("https://example.com/a"),
                post("https://example.com/b"),
            ],
        );
        assert_eq!(doc.posts[0].web_url.path(), "/a");
        assert_eq!(doc.posts[1].web_url.path(), "/b");
    }

    #[test]
    fn json_export_omits_raw_html_bytes() {
        let mut p = post("https://example.com/a");
        p.content_html = vec![0xFF, 0xFE];
        let doc = Document::assemble(&raw_feed(), vec![p]);
        let json = serde_json::to_string(&doc).expect("serialize");
        assert!(json.contains("web_url"));
        assert!(!json.contains("content_html"));
    }
}

//! Wire types for the JSON feed export format.
//!
//! Field names match the on-disk JSON exactly (`feed_url`, `date_published`,
//! ...); this is the bit-compatible input surface, decoded once and never
//! mutated afterwards.

use serde::{Deserialize, Serialize};
use url::Url;

/// A decoded feed export, before any per-post processing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFeed {
    /// Posts in export order. Order defines the output order downstream.
    pub items: Vec<RawPost>,
    /// Feed title.
    pub title: String,
    /// Feed icon URL.
    pub icon: Url,
    /// Canonical URL of the feed itself.
    pub feed_url: Url,
    /// URL of the site the feed belongs to.
    pub home_page_url: Url,
    /// Feed format version URL.
    pub version: Url,
}

/// One raw post from the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    /// ISO-8601 publish timestamp, parsed later (not at decode time).
    pub date_published: String,
    /// Canonical web URL of the post.
    pub url: Url,
    /// Plain-text content as exported. Passed through untouched.
    pub content_text: String,
    /// HTML content, the input to rich-content rendering.
    pub content_html: String,
}

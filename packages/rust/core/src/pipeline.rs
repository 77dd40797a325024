//! End-to-end feed pipeline: bytes → raw feed → ordered parallel per-post
//! processing (render → date parse → classify) → assembled document.
//!
//! Decoding the raw feed is synchronous and happens before any concurrent
//! work; per-post work runs through [`ordered_try_map`]. A single outcome
//! surfaces: the complete [`Document`], or the first per-post error.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};
use url::Url;

use backfeed_attachments::{ClassifierRules, classify};
use backfeed_shared::{AppConfig, BackfeedError, RawPost, Result};

use crate::assembler::{Document, Post};
use crate::executor::ordered_try_map;

/// Decode the feed export at `path` into a [`Document`].
///
/// The directory containing the file becomes the base location for
/// resolving relative references and local attachment paths.
#[instrument(skip(config), fields(path = %path.display()))]
pub async fn decode_feed(path: &Path, config: &AppConfig) -> Result<Document> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| BackfeedError::io(path, e))?;
    let base_url = base_url_for(path)?;
    decode_feed_bytes(&bytes, &base_url, config).await
}

/// Decode already-loaded feed bytes, with an explicit base location.
#[instrument(skip(bytes, config), fields(base = %base_url, bytes = bytes.len()))]
pub async fn decode_feed_bytes(
    bytes: &[u8],
    base_url: &Url,
    config: &AppConfig,
) -> Result<Document> {
    let raw = backfeed_feed::decode_raw(bytes)?;

    info!(
        title = %raw.title,
        posts = raw.items.len(),
        concurrency = config.executor.concurrency,
        "processing feed posts"
    );

    let rules = Arc::new(ClassifierRules::from_config(&config.classifier));
    let base = base_url.clone();
    let items = raw.items.clone();

    let posts = ordered_try_map(items, config.executor.concurrency, move |item| {
        process_post(item, &base, &rules)
    })
    .await?;

    let document = Document::assemble(&raw, posts);
    info!(posts = document.posts.len(), "feed decode complete");
    Ok(document)
}

/// The per-post unit of work: render the HTML, parse the publish date,
/// classify attachments. Any failure here fails the whole batch.
fn process_post(raw: RawPost, base_url: &Url, rules: &ClassifierRules) -> Result<Post> {
    let rendered = backfeed_richtext::render(&raw.content_html, base_url)?;

    let date_published = DateTime::parse_from_rfc3339(&raw.date_published)
        .map_err(|source| BackfeedError::DateParse {
            value: raw.date_published.clone(),
            source,
        })?
        .with_timezone(&Utc);

    let attachments = classify(&rendered.rich, &raw.url, date_published, base_url, rules)?;

    Ok(Post {
        web_url: raw.url,
        date_published,
        attachments,
        content_plain: rendered.plain,
        content_rich: rendered.rich,
        content_html: rendered.html_utf16,
    })
}

/// Base location for a feed file: its parent directory as a `file:` URL.
fn base_url_for(path: &Path) -> Result<Url> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let absolute = std::path::absolute(parent).map_err(|e| BackfeedError::io(parent, e))?;
    Url::from_directory_path(&absolute).map_err(|_| {
        BackfeedError::malformed_feed(format!(
            "feed location {} has no usable base directory",
            path.display()
        ))
    })
}

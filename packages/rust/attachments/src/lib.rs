//! Attachment classification.
//!
//! Scans rendered rich content for link runs and embedded-file markers and
//! sorts every discovered reference into exactly one of two sets: local
//! images (same-host links with an allow-listed image extension, plus all
//! inline embedded files) or opaque web links (everything else).
//!
//! Local image URLs are rooted at the feed's base location so a backup
//! directory resolves its own images; inline embedded files get a
//! deterministic `uploads/<year>/<name>` path derived from the post's
//! publish date in UTC.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use backfeed_richtext::{RichText, RunAttr};
use backfeed_shared::{BackfeedError, ClassifierConfig, Result};

/// Classified attachments of one post. Set semantics: no duplicate URLs,
/// and a discovered link lands in exactly one of the two sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attachments {
    /// Remote or otherwise opaque references, kept as-is.
    pub web_links: HashSet<Url>,
    /// Local image URLs, resolved or synthesized under the feed base.
    pub image_links: HashSet<Url>,
}

/// Classification rules, built from `[classifier]` config.
#[derive(Debug, Clone)]
pub struct ClassifierRules {
    /// Allow-listed image extensions. Exact string match, case-sensitive:
    /// `"PNG"` does not match the default `"png"` entry.
    image_extensions: HashSet<String>,
}

impl ClassifierRules {
    pub fn new(extensions: impl IntoIterator<Item = String>) -> Self {
        Self {
            image_extensions: extensions.into_iter().collect(),
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.image_extensions.iter().cloned())
    }
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

/// Scan rich content and classify every discovered reference.
///
/// `post_url` is the post's canonical web URL (its host decides local vs.
/// remote), `base_url` the feed's base location. Fails with
/// [`BackfeedError::Attachment`] if synthesizing an embedded-file URL is
/// impossible; scanning stops at that point and no partial set is returned.
pub fn classify(
    rich: &RichText,
    post_url: &Url,
    date_published: DateTime<Utc>,
    base_url: &Url,
    rules: &ClassifierRules,
) -> Result<Attachments> {
    let mut attachments = Attachments::default();

    for run in &rich.runs {
        match &run.attr {
            RunAttr::Plain => {}
            RunAttr::Link(link) => {
                match local_image_url(link, post_url, base_url, rules) {
                    Some(local) => {
                        probe_local(&local);
                        attachments.image_links.insert(local);
                    }
                    // Don't know what this is, so keep it as-is
                    None => {
                        attachments.web_links.insert(link.clone());
                    }
                }
            }
            RunAttr::EmbeddedFile { name } => {
                if name.is_empty() {
                    // Marker without a usable file name: dropped, not an error
                    debug!("dropping embedded-file marker with empty name");
                    continue;
                }
                let local = synthesize_upload_url(name, date_published, base_url)?;
                probe_local(&local);
                attachments.image_links.insert(local);
            }
        }
    }

    debug!(
        web = attachments.web_links.len(),
        images = attachments.image_links.len(),
        post = %post_url,
        "classified attachments"
    );

    Ok(attachments)
}

/// Resolve a link to a local image URL, or `None` when it is not one.
///
/// A link is a local image only when its host equals the post's host (both
/// present and non-empty) and its path extension is allow-listed. The local
/// URL is the feed base with the link's path appended.
fn local_image_url(
    link: &Url,
    post_url: &Url,
    base_url: &Url,
    rules: &ClassifierRules,
) -> Option<Url> {
    let link_host = link.host_str().filter(|h| !h.is_empty())?;
    let post_host = post_url.host_str().filter(|h| !h.is_empty())?;
    if link_host != post_host {
        return None;
    }

    let ext = path_extension(link.path())?;
    if !rules.image_extensions.contains(ext) {
        return None;
    }

    // A base that cannot carry the path falls through to the web set.
    append_path(base_url, link.path()).ok()
}

/// Deterministic local URL for an inline embedded file:
/// `base/uploads/<4-digit UTC year>/<name>`.
fn synthesize_upload_url(
    name: &str,
    date_published: DateTime<Utc>,
    base_url: &Url,
) -> Result<Url> {
    let year = format!("{:04}", date_published.year());
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| {
            BackfeedError::Attachment(format!(
                "base URL {base_url} cannot carry an uploads path for {name:?}"
            ))
        })?
        .pop_if_empty()
        .extend(["uploads", &year, name]);
    Ok(url)
}

/// Append a URL path (slash-separated) onto a base URL.
fn append_path(base_url: &Url, path: &str) -> Result<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| {
            BackfeedError::Attachment(format!("base URL {base_url} cannot carry path {path:?}"))
        })?
        .pop_if_empty()
        .extend(path.split('/').filter(|s| !s.is_empty()));
    Ok(url)
}

/// Extension of the last path segment, as written (no case folding).
fn path_extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next()?;
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext) }
}

/// Best-effort existence check for diagnostics only; never affects the
/// classification outcome.
fn probe_local(url: &Url) {
    if url.scheme() != "file" {
        return;
    }
    if let Ok(path) = url.to_file_path() {
        if !Path::new(&path).exists() {
            warn!(url = %url, "local image not found on disk");
        }
    }
}

//! HTML-to-rich-content rendering.
//!
//! Walks the parsed HTML tree and emits runs: text nodes become plain or
//! link runs (the innermost enclosing `<a href>` wins), `<img>` elements
//! become embedded-file markers. The original HTML bytes are retained
//! verbatim as UTF-16 alongside the structured result.

use ego_tree::NodeRef;
use scraper::{Html, node::Node};
use tracing::debug;
use url::Url;

use backfeed_shared::{BackfeedError, Result};

use crate::{OBJECT_REPLACEMENT, RichText, Run, RunAttr};

/// Output of rendering one post's HTML.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    /// Structured rich content.
    pub rich: RichText,
    /// Flattened plain text, equal to `rich.flatten()`.
    pub plain: String,
    /// The original HTML, UTF-16LE encoded with a BOM. Untouched by
    /// rendering; callers that need the raw source read this.
    pub html_utf16: Vec<u8>,
}

/// Render a post's HTML into rich content, plain text, and retained bytes.
///
/// `base_url` is the feed's base location (the directory containing the
/// feed file); relative hrefs are resolved against it.
///
/// Fails with [`BackfeedError::ContentRender`] when the input holds visible
/// text that rendering could not turn into rich content (all of it sits in
/// unrenderable subtrees). That is a hard failure by contract: a
/// silently-empty rendering would feed wrong data into attachment
/// classification downstream. Genuinely content-free markup — empty
/// elements, comments, whitespace — renders as empty content and succeeds.
pub fn render(html: &str, base_url: &Url) -> Result<Rendered> {
    let fragment = Html::parse_fragment(html);

    let mut walker = Walker {
        base: base_url,
        runs: Vec::new(),
    };
    walker.walk(fragment.tree.root(), None);

    if walker.runs.is_empty() && has_suppressed_text(&fragment) {
        return Err(BackfeedError::ContentRender(format!(
            "HTML produced no rich content ({} bytes of input)",
            html.len()
        )));
    }

    let rich = RichText { runs: walker.runs };
    let plain = rich.flatten();

    debug!(
        runs = rich.runs.len(),
        plain_len = plain.len(),
        "rendered rich content"
    );

    Ok(Rendered {
        plain,
        html_utf16: encode_utf16le(html),
        rich,
    })
}

// ---------------------------------------------------------------------------
// Tree walker
// ---------------------------------------------------------------------------

/// Elements whose subtree never contributes content.
const SKIPPED: &[&str] = &["script", "style", "head", "noscript", "template", "iframe", "svg"];

/// Elements whose end inserts a paragraph break in the flattened text.
const BLOCK: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "blockquote", "pre", "figure",
    "figcaption", "ul", "ol", "li", "table", "tr", "h1", "h2", "h3", "h4", "h5", "h6",
];

struct Walker<'a> {
    base: &'a Url,
    runs: Vec<Run>,
}

impl Walker<'_> {
    fn walk(&mut self, node: NodeRef<'_, Node>, link: Option<&Url>) {
        match node.value() {
            Node::Text(text) => self.push_text(&text, link),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    return;
                }
                match name {
                    "br" => self.push_newline(),
                    "img" => {
                        if let Some(file) = el.attr("src").and_then(file_name_from_src) {
                            self.runs.push(Run {
                                text: OBJECT_REPLACEMENT.to_string(),
                                attr: RunAttr::EmbeddedFile { name: file },
                            });
                        }
                        // src-less or name-less images contribute nothing
                    }
                    "a" => {
                        let resolved = el.attr("href").and_then(|h| resolve_href(self.base, h));
                        let inner = resolved.as_ref().or(link);
                        for child in node.children() {
                            self.walk(child, inner);
                        }
                    }
                    _ => {
                        for child in node.children() {
                            self.walk(child, link);
                        }
                        if BLOCK.contains(&name) {
                            self.push_newline();
                        }
                    }
                }
            }
            // Fragment/document wrappers: descend
            _ => {
                for child in node.children() {
                    self.walk(child, link);
                }
            }
        }
    }

    /// Append a text node, collapsing whitespace and merging into the
    /// previous run when the attribute is identical.
    fn push_text(&mut self, raw: &str, link: Option<&Url>) {
        let collapsed = collapse_whitespace(raw);
        if collapsed.is_empty() {
            return;
        }
        // A whitespace-only node only matters between two words.
        if collapsed == " " {
            match self.runs.last() {
                Some(last) if !last.text.ends_with(char::is_whitespace) => {}
                _ => return,
            }
        }

        let attr = match link {
            Some(url) => RunAttr::Link(url.clone()),
            None => RunAttr::Plain,
        };

        if let Some(last) = self.runs.last_mut() {
            if last.attr == attr {
                last.text.push_str(&collapsed);
                return;
            }
        }
        self.runs.push(Run {
            text: collapsed,
            attr,
        });
    }

    /// Append a single line break to the flattened text.
    fn push_newline(&mut self) {
        // No leading newlines; at most one per block boundary.
        let Some(last) = self.runs.last_mut() else {
            return;
        };
        if last.text.ends_with('\n') {
            return;
        }
        if last.attr == RunAttr::Plain {
            last.text.push('\n');
        } else {
            self.runs.push(Run {
                text: "\n".into(),
                attr: RunAttr::Plain,
            });
        }
    }
}

/// Collapse every whitespace sequence to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_ws = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_ws {
                out.push(' ');
            }
            in_ws = true;
        } else {
            out.push(ch);
            in_ws = false;
        }
    }
    out
}

/// True when the tree holds non-whitespace text nodes. With an empty run
/// sequence this means every piece of visible text sat in a skipped
/// subtree, so the content was unrenderable rather than empty.
fn has_suppressed_text(fragment: &Html) -> bool {
    fragment.tree.root().descendants().any(|node| {
        matches!(node.value(), Node::Text(text) if !text.trim().is_empty())
    })
}

/// Resolve an href to an absolute URL, relative ones against the base.
fn resolve_href(base: &Url, href: &str) -> Option<Url> {
    Url::parse(href).or_else(|_| base.join(href)).ok()
}

/// Extract the file name from an `<img src>`: the last path segment,
/// without query or fragment.
fn file_name_from_src(src: &str) -> Option<String> {
    let path = match Url::parse(src) {
        Ok(url) => url.path().to_string(),
        // Relative src: strip query/fragment by hand
        Err(_) => src
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    };
    let name = path.rsplit('/').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Encode a string as UTF-16 little-endian with a leading BOM.
fn encode_utf16le(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + s.len() * 2);
    out.extend_from_slice(&[0xFF, 0xFE]);
    for unit in s.encode_utf16() {
        out.extend_from_slice(&unit.to_le_bytes());
    }
    out
}

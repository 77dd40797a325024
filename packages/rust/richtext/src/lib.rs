//! Rich-content model and HTML rendering.
//!
//! A post's HTML is rendered into a [`RichText`]: an ordered sequence of
//! styled runs. A run is plain text, text carrying a link target, or a
//! marker for an inline embedded file (an `<img>` in the source HTML).
//! Plain text is always derivable from the runs via [`RichText::flatten`].

mod render;

use serde::Serialize;
use url::Url;

pub use render::{Rendered, render};

/// Placeholder character an embedded-file run contributes to flattened text.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';

/// Structured rich content: styled runs in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RichText {
    /// Runs in document order.
    pub runs: Vec<Run>,
}

/// One run of rich content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// The run's text. For embedded-file runs this is U+FFFC.
    pub text: String,
    /// Attribute carried by the run.
    pub attr: RunAttr,
}

/// Attribute of a single run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RunAttr {
    /// Unadorned text.
    Plain,
    /// Text that is a hyperlink to the given target.
    Link(Url),
    /// Marker for an inline embedded file (image), identified by file name.
    EmbeddedFile { name: String },
}

impl RichText {
    /// Flatten the runs to plain text: the concatenation of every run's
    /// text in document order.
    pub fn flatten(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// True when the content holds no runs at all.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

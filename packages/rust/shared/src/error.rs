//! Error types for backfeed.
//!
//! Library crates use [`BackfeedError`] via `thiserror`.
//! The CLI binary wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all backfeed operations.
#[derive(Debug, thiserror::Error)]
pub enum BackfeedError {
    /// Input bytes are not a valid feed export (bad JSON, missing or
    /// mistyped required fields, invalid URL syntax).
    #[error("malformed feed: {message}")]
    MalformedFeed { message: String },

    /// A post's HTML content could not be rendered into rich content.
    #[error("content render error: {0}")]
    ContentRender(String),

    /// A post's `date_published` does not conform to the expected format.
    #[error("date parse error: {value:?}: {source}")]
    DateParse {
        value: String,
        source: chrono::ParseError,
    },

    /// URL construction failed while synthesizing an attachment path.
    #[error("attachment error: {0}")]
    Attachment(String),

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A worker task panicked or could not be joined.
    #[error("task error: {0}")]
    Task(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BackfeedError>;

impl BackfeedError {
    /// Create a malformed-feed error from any displayable message.
    pub fn malformed_feed(msg: impl Into<String>) -> Self {
        Self::MalformedFeed {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BackfeedError::malformed_feed("missing field `items`");
        assert_eq!(err.to_string(), "malformed feed: missing field `items`");

        let err = BackfeedError::ContentRender("empty rich content".into());
        assert!(err.to_string().contains("empty rich content"));

        let err = BackfeedError::config("bad image_extensions entry");
        assert!(err.to_string().starts_with("config error"));
    }
}

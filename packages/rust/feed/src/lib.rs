//! Raw feed decoder.
//!
//! Parses the bytes of a JSON feed export into a typed [`RawFeed`].
//! Pure and synchronous: no I/O, no side effects, a single pass over the
//! input. Anything that does not conform to the export format is a
//! [`BackfeedError::MalformedFeed`].

use tracing::debug;

use backfeed_shared::{BackfeedError, RawFeed, Result};

/// Decode feed export bytes into a [`RawFeed`].
///
/// Fails on invalid JSON, missing required fields, wrong value types, and
/// URL fields that do not parse as URLs. Item order is preserved exactly
/// as it appears in the input.
pub fn decode_raw(bytes: &[u8]) -> Result<RawFeed> {
    let feed: RawFeed = serde_json::from_slice(bytes)
        .map_err(|e| BackfeedError::malformed_feed(e.to_string()))?;

    debug!(
        title = %feed.title,
        items = feed.items.len(),
        "decoded raw feed"
    );

    Ok(feed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> Vec<u8> {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/feeds")
            .join(name);
        std::fs::read(&path).unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    #[test]
    fn decode_fixture_feed() {
        let feed = decode_raw(&fixture("microblog.fixture.json")).expect("decode");
        assert_eq!(feed.title, "Example Micro Blog");
        assert_eq!(feed.items.len(), 3);
        assert_eq!(feed.home_page_url.host_str(), Some("example.com"));
    }

    #[test]
    fn item_order_preserved() {
        let feed = decode_raw(&fixture("microblog.fixture.json")).expect("decode");
        let paths: Vec<&str> = feed.items.iter().map(|p| p.url.path()).collect();
        assert_eq!(
            paths,
            vec![
                "/2023/03/10/first.html",
                "/2023/03/12/second.html",
                "/2023/04/01/third.html",
            ]
        );
    }

    #[test]
    fn decode_rejects_invalid_json() {
        let err = decode_raw(b"{not json").unwrap_err();
        assert!(matches!(err, BackfeedError::MalformedFeed { .. }));
    }

    #[test]
    fn decode_rejects_missing_field() {
        // No `items` array.
        let json = br#"{
            "title": "t",
            "icon": "https://example.com/i.png",
            "feed_url": "https://example.com/feed.json",
            "home_page_url": "https://example.com/",
            "version": "https://jsonfeed.org/version/1.1"
        }"#;
        let err = decode_raw(json).unwrap_err();
        assert!(err.to_string().contains("items"));
    }

    #[test]
    fn decode_rejects_mistyped_field() {
        let json = br#"{
            "items": "not-an-array",
            "title": "t",
            "icon": "https://example.com/i.png",
            "feed_url": "https://example.com/feed.json",
            "home_page_url": "https://example.com/",
            "version": "https://jsonfeed.org/version/1.1"
        }"#;
        assert!(matches!(
            decode_raw(json).unwrap_err(),
            BackfeedError::MalformedFeed { .. }
        ));
    }

    #[test]
    fn decode_rejects_invalid_url_syntax() {
        let json = br#"{
            "items": [],
            "title": "t",
            "icon": "::not a url::",
            "feed_url": "https://example.com/feed.json",
            "home_page_url": "https://example.com/",
            "version": "https://jsonfeed.org/version/1.1"
        }"#;
        assert!(matches!(
            decode_raw(json).unwrap_err(),
            BackfeedError::MalformedFeed { .. }
        ));
    }
}

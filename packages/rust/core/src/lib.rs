//! Core pipeline for backfeed.
//!
//! Ties together raw feed decoding, rich-content rendering, attachment
//! classification, and ordered parallel execution into the end-to-end
//! feed-to-document transformation.

pub mod assembler;
pub mod executor;
pub mod pipeline;

pub use assembler::{Document, Post};
pub use executor::ordered_try_map;
pub use pipeline::{decode_feed, decode_feed_bytes};

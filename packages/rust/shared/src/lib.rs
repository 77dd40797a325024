//! Shared types, error model, and configuration for backfeed.
//!
//! This crate is the foundation depended on by all other backfeed crates.
//! It provides:
//! - [`BackfeedError`] — the unified error type
//! - Wire types for the feed export format ([`RawFeed`], [`RawPost`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ClassifierConfig, ExecutorConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_config,
};
pub use error::{BackfeedError, Result};
pub use types::{RawFeed, RawPost};

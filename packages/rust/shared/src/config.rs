//! Application configuration for backfeed.
//!
//! User config lives at `~/.backfeed/backfeed.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BackfeedError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "backfeed.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".backfeed";

// ---------------------------------------------------------------------------
// Config structs (matching backfeed.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Attachment classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Parallel executor settings.
    #[serde(default)]
    pub executor: ExecutorConfig,
}

/// `[classifier]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Path extensions treated as local images when the link host matches
    /// the post's host. Exact string comparison, no case folding.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            image_extensions: default_image_extensions(),
        }
    }
}

fn default_image_extensions() -> Vec<String> {
    vec!["png".into(), "jpg".into(), "jpeg".into()]
}

/// `[executor]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Maximum posts processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.backfeed/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BackfeedError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.backfeed/backfeed.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BackfeedError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content)
        .map_err(|e| BackfeedError::config(format!("failed to parse {}: {e}", path.display())))?;

    validate_config(&config)?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| BackfeedError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| BackfeedError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BackfeedError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Reject config values that cannot work at runtime.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if config.executor.concurrency == 0 {
        return Err(BackfeedError::config(
            "executor.concurrency must be at least 1",
        ));
    }
    if let Some(ext) = config
        .classifier
        .image_extensions
        .iter()
        .find(|e| e.is_empty() || e.contains('.') || e.contains('/'))
    {
        return Err(BackfeedError::config(format!(
            "invalid image extension {ext:?}: use bare extensions like \"png\""
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("image_extensions"));
        assert!(toml_str.contains("concurrency"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.executor.concurrency, 4);
        assert_eq!(
            parsed.classifier.image_extensions,
            vec!["png", "jpg", "jpeg"]
        );
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[classifier]
image_extensions = ["png", "webp"]
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.classifier.image_extensions, vec!["png", "webp"]);
        assert_eq!(config.executor.concurrency, 4);
    }

    #[test]
    fn zero_concurrency_rejected() {
        let config: AppConfig = toml::from_str("[executor]\nconcurrency = 0\n").expect("parse");
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("concurrency"));
    }

    #[test]
    fn dotted_extension_rejected() {
        let config: AppConfig =
            toml::from_str("[classifier]\nimage_extensions = [\".png\"]\n").expect("parse");
        assert!(validate_config(&config).is_err());
    }
}

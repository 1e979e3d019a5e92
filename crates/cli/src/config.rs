//! CLI configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML
//! file, then `STAYNEST_` environment variables (`STAYNEST_API__BASE_URL`
//! sets `api.base_url`).

use anyhow::{Context, Result};
use serde::Deserialize;
use staynest_http::ClientConfig;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "staynest.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub api: ClientConfig,
    /// Overrides the directory holding storage and logs
    pub state_dir: Option<PathBuf>,
}

impl CliConfig {
    /// Load configuration; an explicit `path` must exist, the default file
    /// in the state directory may be absent.
    pub fn load(path: Option<&Path>, state_dir: &Path) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::from(state_dir.join(CONFIG_FILE_NAME)).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("STAYNEST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }
}

/// State directory: `STAYNEST_STATE_DIR`, else `<data dir>/staynest`
pub fn default_state_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STAYNEST_STATE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("staynest")
    }
}

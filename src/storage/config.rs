//! Configuration handling for bucketview
//!
//! Configuration is read from `config.toml` in the platform config directory
//! (e.g. `~/.config/bucketview/config.toml`), or from an explicit file given
//! with `--config`. Command-line flags and environment variables take
//! precedence over anything set here.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::OutputFormat;

/// Store file used when nothing else names one
pub const DEFAULT_DB_PATH: &str = "bucketview.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Store file to open when `--db` is not given
    pub db: Option<PathBuf>,

    /// Output format when `--format` is not given
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "bucketview", "bucketview")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Loads the global configuration, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        let config_path = match Self::global_config_dir() {
            Some(dir) => dir.join("config.toml"),
            None => return Ok(Self::default()),
        };

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit file, which must exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(e.to_string()))
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Resolves the store path: explicit value first, then config, then default
    pub fn db_path(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.db.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    /// Resolves the output format the same way as [`Config::db_path`]
    pub fn output_format(&self, explicit: Option<OutputFormat>) -> OutputFormat {
        explicit.or(self.format).unwrap_or_default()
    }
}

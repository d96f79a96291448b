//! Configuration management for supout CLI

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Directory to extract sections into when `--output-dir` is not given
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("supout");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration from `path`, or the default location.
    ///
    /// A missing file at the default location yields the default config; an
    /// explicitly requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::config_path() {
                Ok(p) if p.exists() => p,
                _ => return Ok(Config::default()),
            },
        };

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))
    }
}

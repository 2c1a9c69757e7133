//! Tunables loader.

use std::path::Path;

use anyhow::Context;

use crate::config::ContentConfig;
use crate::loaders::{LoadResult, read_file};

/// Loader for `config.toml`.
pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load(path: &Path) -> LoadResult<ContentConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("failed to parse config TOML at {}", path.display()))
    }

    /// Parses TOML text. Missing keys fall back to their defaults.
    pub fn parse(content: &str) -> LoadResult<ContentConfig> {
        Ok(toml::from_str(content)?)
    }
}

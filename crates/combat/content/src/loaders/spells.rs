//! Spell catalog loader.

use std::path::Path;

use combat_core::SpellDefinition;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::SpellCatalog;
use crate::loaders::{LoadResult, read_ron};

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellFile {
    pub spells: Vec<SpellDefinition>,
}

/// Loader for the spell catalog.
pub struct SpellLoader;

impl SpellLoader {
    /// Loads `(spells: [...])` and validates ids and ranges.
    pub fn load(path: &Path) -> LoadResult<SpellCatalog> {
        let file: SpellFile = read_ron(path)?;
        let catalog = SpellCatalog::from_definitions(file.spells)
            .map_err(|e| anyhow::anyhow!("invalid spell catalog {}: {e}", path.display()))?;
        debug!(target: "content::loader", path = %path.display(), spells = catalog.len(), "spells loaded");
        Ok(catalog)
    }
}

//! Monster template loader.

use std::path::Path;

use combat_core::MonsterTemplate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::MonsterCatalog;
use crate::loaders::{LoadResult, read_ron};

/// Monster catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterFile {
    pub monsters: Vec<MonsterTemplate>,
}

/// Loader for monster templates.
pub struct MonsterLoader;

impl MonsterLoader {
    /// Loads `(monsters: [...])`.
    ///
    /// Spell references are checked later, against the loaded spell catalog,
    /// by [`Content::validate`](crate::Content::validate).
    pub fn load(path: &Path) -> LoadResult<MonsterCatalog> {
        let file: MonsterFile = read_ron(path)?;
        let catalog = MonsterCatalog::from_templates(file.monsters)
            .map_err(|e| anyhow::anyhow!("invalid monster catalog {}: {e}", path.display()))?;
        debug!(target: "content::loader", path = %path.display(), templates = catalog.len(), "monsters loaded");
        Ok(catalog)
    }
}

//! Placement pattern loader.

use std::path::Path;

use combat_core::PlacementPattern;
use tracing::debug;

use crate::catalog::PlacementCatalog;
use crate::loaders::{LoadResult, read_ron};

/// Loader for placement patterns and map anchors.
///
/// File format:
/// ```ron
/// (
///     patterns: [
///         (name: "lines", player_offsets: [(-2, 0)], hostile_offsets: [(1, 0)]),
///     ],
///     anchors: { "arena": [(x: 6, y: 5)] },
/// )
/// ```
pub struct PlacementLoader;

impl PlacementLoader {
    /// Loads the catalog. An empty pattern list gets the built-in fallback.
    pub fn load(path: &Path) -> LoadResult<PlacementCatalog> {
        let mut catalog: PlacementCatalog = read_ron(path)?;
        if catalog.patterns.is_empty() {
            catalog.patterns.push(PlacementPattern::fallback());
        }
        debug!(
            target: "content::loader",
            path = %path.display(),
            patterns = catalog.patterns.len(),
            maps = catalog.anchors.len(),
            "placement loaded"
        );
        Ok(catalog)
    }
}

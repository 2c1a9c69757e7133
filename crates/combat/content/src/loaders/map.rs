//! Map terrain loader.

use std::path::Path;

use combat_core::{Position, StaticGrid, TerrainKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::loaders::{LoadResult, read_ron};

/// Map data structure for RON files (terrain only).
///
/// Either `layout` rows (`#` wall, space void, anything else floor) or an
/// open floor of `dimensions` with explicit `tiles` overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct MapDataRon {
    dimensions: (u32, u32),
    tiles: Vec<(i32, i32, TerrainKind)>,
    layout: Vec<String>,
    tile_size: Option<f32>,
}

/// Loader for map terrain.
pub struct MapLoader;

impl MapLoader {
    pub fn load(path: &Path) -> LoadResult<StaticGrid> {
        let data: MapDataRon = read_ron(path)?;

        let mut grid = if data.layout.is_empty() {
            let (width, height) = data.dimensions;
            if width == 0 || height == 0 {
                anyhow::bail!("map {} has neither a layout nor dimensions", path.display());
            }
            StaticGrid::open(width, height)
        } else {
            let rows: Vec<&str> = data.layout.iter().map(String::as_str).collect();
            StaticGrid::from_ascii(&rows)
        };
        for (x, y, terrain) in data.tiles {
            grid.set(Position::new(x, y), terrain);
        }
        if let Some(tile_size) = data.tile_size {
            grid = grid.with_tile_size(tile_size);
        }

        debug!(target: "content::loader", path = %path.display(), "map loaded");
        Ok(grid)
    }
}

use crate::state::Position;

/// Spatial oracle provided by the world collaborator.
///
/// Exposes immutable layout information only. Combat occupancy is derived from
/// living combatants and never written back into the grid.
pub trait GridOracle: Send + Sync {
    fn dimensions(&self) -> MapDimensions;

    /// Returns true for walls, void and any tile that blocks movement and sight.
    /// Out-of-bounds tiles are blocking.
    fn is_blocking(&self, position: Position) -> bool;

    fn contains(&self, position: Position) -> bool {
        self.dimensions().contains(position)
    }

    /// Best-effort conversion from world coordinates to a tile.
    fn world_to_tile(&self, x: f32, y: f32) -> Option<Position> {
        let tile = Position::new(x.floor() as i32, y.floor() as i32);
        self.contains(tile).then_some(tile)
    }

    /// World coordinates of a tile's center.
    fn tile_to_world(&self, position: Position) -> (f32, f32) {
        (position.x as f32 + 0.5, position.y as f32 + 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && position.x < self.width as i32
            && position.y < self.height as i32
    }
}

/// Canonical terrain classes for static map tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerrainKind {
    #[default]
    Floor,
    Wall,
    Void,
}

impl TerrainKind {
    pub fn is_blocking(self) -> bool {
        !matches!(self, TerrainKind::Floor)
    }
}

/// In-memory grid backed by a row-major terrain vector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StaticGrid {
    dimensions: MapDimensions,
    tiles: Vec<TerrainKind>,
    /// World units per tile edge.
    #[cfg_attr(feature = "serde", serde(default = "StaticGrid::default_tile_size"))]
    tile_size: f32,
}

impl StaticGrid {
    fn default_tile_size() -> f32 {
        1.0
    }

    /// Open floor of the given size.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            dimensions: MapDimensions::new(width, height),
            tiles: vec![TerrainKind::Floor; (width * height) as usize],
            tile_size: 1.0,
        }
    }

    /// Parses an ASCII layout: `#` is a wall, ` ` (space) is void and anything
    /// else is floor. Rows may have different lengths; short rows are padded
    /// with void.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self {
            dimensions: MapDimensions::new(width, height),
            tiles: vec![TerrainKind::Void; (width * height) as usize],
            tile_size: 1.0,
        };
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                let terrain = match ch {
                    '#' => TerrainKind::Wall,
                    ' ' => TerrainKind::Void,
                    _ => TerrainKind::Floor,
                };
                grid.set(Position::new(x as i32, y as i32), terrain);
            }
        }
        grid
    }

    pub fn with_tile_size(mut self, tile_size: f32) -> Self {
        self.tile_size = tile_size;
        self
    }

    fn index(&self, position: Position) -> Option<usize> {
        self.dimensions
            .contains(position)
            .then(|| (position.y as u32 * self.dimensions.width + position.x as u32) as usize)
    }

    pub fn terrain(&self, position: Position) -> Option<TerrainKind> {
        self.index(position).and_then(|i| self.tiles.get(i).copied())
    }

    pub fn set(&mut self, position: Position, terrain: TerrainKind) {
        if let Some(i) = self.index(position)
            && let Some(slot) = self.tiles.get_mut(i)
        {
            *slot = terrain;
        }
    }
}

impl GridOracle for StaticGrid {
    fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    fn is_blocking(&self, position: Position) -> bool {
        self.terrain(position).is_none_or(TerrainKind::is_blocking)
    }

    fn world_to_tile(&self, x: f32, y: f32) -> Option<Position> {
        if self.tile_size <= 0.0 {
            return None;
        }
        let tile = Position::new(
            (x / self.tile_size).floor() as i32,
            (y / self.tile_size).floor() as i32,
        );
        self.contains(tile).then_some(tile)
    }

    fn tile_to_world(&self, position: Position) -> (f32, f32) {
        (
            (position.x as f32 + 0.5) * self.tile_size,
            (position.y as f32 + 0.5) * self.tile_size,
        )
    }
}

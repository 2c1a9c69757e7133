//! Preparation-phase placement.
//!
//! A [`PlacementPattern`] is two lists of offsets (player side and hostile
//! side) applied to an anchor tile. The anchor is one of the map's authored
//! anchors when it has any, otherwise the encountered hostile's tile.
//! Patterns that produce no usable tile degrade to a single tile at the
//! anchor instead of failing.

use tracing::{debug, warn};

use crate::env::{GridOracle, SeededRng, context};
use crate::error::{CombatError, ErrorSeverity};
use crate::state::Position;

/// Named offset pattern from content.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementPattern {
    pub name: String,
    pub player_offsets: Vec<(i32, i32)>,
    pub hostile_offsets: Vec<(i32, i32)>,
}

impl PlacementPattern {
    /// Two facing lines three tiles apart, used when content has no pattern.
    pub fn fallback() -> Self {
        Self {
            name: "fallback".to_owned(),
            player_offsets: vec![(-2, 0), (-2, -1), (-2, 1), (-3, 0)],
            hostile_offsets: vec![(1, 0), (1, -1), (1, 1), (2, 0), (2, -1), (2, 1)],
        }
    }

    fn project(offsets: &[(i32, i32)], anchor: Position, grid: &dyn GridOracle) -> Vec<Position> {
        let mut tiles = Vec::with_capacity(offsets.len());
        for &(dx, dy) in offsets {
            let tile = anchor.offset(dx, dy);
            if grid.contains(tile) && !grid.is_blocking(tile) && !tiles.contains(&tile) {
                tiles.push(tile);
            }
        }
        tiles
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("tile {0} is not a player placement tile")]
    TileNotAllowed(Position),

    #[error("tile {0} is taken by a hostile")]
    TileTaken(Position),
}

impl CombatError for PlacementError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            PlacementError::TileNotAllowed(_) => "PLACEMENT_TILE_NOT_ALLOWED",
            PlacementError::TileTaken(_) => "PLACEMENT_TILE_TAKEN",
        }
    }
}

/// Inputs of [`prepare`].
#[derive(Clone, Copy, Debug)]
pub struct PlacementRequest<'a> {
    pub patterns: &'a [PlacementPattern],
    /// Authored anchors of the current map. May be empty.
    pub map_anchors: &'a [Position],
    pub encountered_tile: Position,
    /// Where the player stands in the world before combat.
    pub player_tile: Option<Position>,
    pub hostile_count: usize,
}

/// Preparation-phase placement. Discarded once combat starts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacementState {
    pub anchor: Position,
    pub pattern: String,
    /// Player spawn candidates.
    pub allowed_tiles: Vec<Position>,
    /// Hostile spawn candidates.
    pub enemy_tiles: Vec<Position>,
    pub player_tile: Position,
    /// One tile per hostile, in pack order.
    pub hostile_tiles: Vec<Position>,
}

impl PlacementState {
    /// Moves the player to another allowed tile before confirming.
    pub fn choose_player_tile(&mut self, tile: Position) -> Result<(), PlacementError> {
        if !self.allowed_tiles.contains(&tile) {
            return Err(PlacementError::TileNotAllowed(tile));
        }
        if self.hostile_tiles.contains(&tile) {
            return Err(PlacementError::TileTaken(tile));
        }
        self.player_tile = tile;
        Ok(())
    }
}

/// Computes the candidate tiles and a random initial placement.
pub fn prepare(
    grid: &dyn GridOracle,
    rng: &mut SeededRng,
    request: PlacementRequest<'_>,
) -> PlacementState {
    let fallback;
    let pattern = match rng.pick(context::PLACEMENT, request.patterns.len()) {
        Some(i) => &request.patterns[i],
        None => {
            fallback = PlacementPattern::fallback();
            &fallback
        }
    };
    let anchor = rng
        .pick(context::PLACEMENT, request.map_anchors.len())
        .map_or(request.encountered_tile, |i| request.map_anchors[i]);

    let mut allowed_tiles = PlacementPattern::project(&pattern.player_offsets, anchor, grid);
    if allowed_tiles.is_empty() {
        warn!(
            target: "combat::placement",
            pattern = %pattern.name,
            %anchor,
            "no player tile, falling back to the anchor"
        );
        allowed_tiles.push(anchor);
    }
    let enemy_tiles: Vec<Position> = PlacementPattern::project(&pattern.hostile_offsets, anchor, grid)
        .into_iter()
        .filter(|t| !allowed_tiles.contains(t))
        .collect();

    // Avoid the player's current tile when there is a choice.
    let fresh: Vec<Position> = allowed_tiles
        .iter()
        .copied()
        .filter(|t| Some(*t) != request.player_tile)
        .collect();
    let pool = if fresh.is_empty() { &allowed_tiles } else { &fresh };
    let player_tile = rng
        .pick(context::PLACEMENT, pool.len())
        .map_or(anchor, |i| pool[i]);

    let mut taken = vec![player_tile];
    let mut free: Vec<Position> = enemy_tiles
        .iter()
        .copied()
        .filter(|t| *t != player_tile)
        .collect();
    let mut hostile_tiles = Vec::with_capacity(request.hostile_count);
    for _ in 0..request.hostile_count {
        let tile = match rng.pick(context::PLACEMENT, free.len()) {
            Some(i) => free.remove(i),
            None => match nearest_free(grid, anchor, &taken) {
                Some(tile) => tile,
                None => break,
            },
        };
        taken.push(tile);
        hostile_tiles.push(tile);
    }

    debug!(
        target: "combat::placement",
        pattern = %pattern.name,
        %anchor,
        %player_tile,
        hostiles = hostile_tiles.len(),
        "placement computed"
    );
    PlacementState {
        anchor,
        pattern: pattern.name.clone(),
        allowed_tiles,
        enemy_tiles,
        player_tile,
        hostile_tiles,
    }
}

/// Closest walkable tile to `origin` by Manhattan distance that is not in
/// `taken`. Ties resolve in row-major order.
pub fn nearest_free(grid: &dyn GridOracle, origin: Position, taken: &[Position]) -> Option<Position> {
    let dims = grid.dimensions();
    let max_radius = (dims.width + dims.height) as i32;
    for radius in 0..=max_radius {
        for dy in -radius..=radius {
            let rest = radius - dy.abs();
            let xs = if rest == 0 { vec![0] } else { vec![-rest, rest] };
            for dx in xs {
                let tile = origin.offset(dx, dy);
                if grid.contains(tile) && !grid.is_blocking(tile) && !taken.contains(&tile) {
                    return Some(tile);
                }
            }
        }
    }
    None
}

//! Grid movement paid from the active actor's move-point pool.

use tracing::debug;

use crate::env::{CombatEnv, GridOracle};
use crate::error::{CombatError, ErrorSeverity};
use crate::events::{CombatEvent, EventLog};
use crate::state::{CombatState, EntityId, Position};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("combat is not in progress")]
    NotInCombat,

    #[error("it is not {0}'s turn")]
    NotYourTurn(EntityId),

    #[error("actor {0} is not part of this combat")]
    UnknownActor(EntityId),

    #[error("actor tile is unknown")]
    PositionUnknown,

    #[error("path is empty")]
    EmptyPath,

    #[error("step {from} -> {to} is not orthogonally adjacent")]
    NotAdjacent { from: Position, to: Position },

    #[error("tile {0} is blocked")]
    Blocked(Position),

    #[error("tile {0} is occupied")]
    Occupied(Position),

    #[error("needs {needed} move points, has {available}")]
    InsufficientMovePoints { needed: u32, available: u32 },
}

impl CombatError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            MoveError::UnknownActor(_) | MoveError::PositionUnknown => ErrorSeverity::Internal,
            MoveError::EmptyPath | MoveError::NotAdjacent { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            MoveError::NotInCombat => "MOVE_NOT_IN_COMBAT",
            MoveError::NotYourTurn(_) => "MOVE_NOT_YOUR_TURN",
            MoveError::UnknownActor(_) => "MOVE_UNKNOWN_ACTOR",
            MoveError::PositionUnknown => "MOVE_POSITION_UNKNOWN",
            MoveError::EmptyPath => "MOVE_EMPTY_PATH",
            MoveError::NotAdjacent { .. } => "MOVE_NOT_ADJACENT",
            MoveError::Blocked(_) => "MOVE_BLOCKED",
            MoveError::Occupied(_) => "MOVE_OCCUPIED",
            MoveError::InsufficientMovePoints { .. } => "MOVE_INSUFFICIENT_MP",
        }
    }
}

/// Tile of `id`, recovered from its world coordinates when the tile is unknown.
pub fn resolve_position(state: &CombatState, grid: &dyn GridOracle, id: EntityId) -> Option<Position> {
    let combatant = state.combatant(id)?;
    combatant.position.or_else(|| {
        combatant
            .world_position
            .and_then(|(x, y)| grid.world_to_tile(x, y))
    })
}

/// Like [`resolve_position`], caching a recovered tile on the combatant.
pub fn locate(state: &mut CombatState, grid: &dyn GridOracle, id: EntityId) -> Option<Position> {
    let tile = resolve_position(state, grid, id)?;
    if let Some(combatant) = state.combatant_mut(id) {
        combatant.position = Some(tile);
    }
    Some(tile)
}

/// Returns true if a combatant could stand on `tile`.
pub fn is_walkable(state: &CombatState, grid: &dyn GridOracle, tile: Position) -> bool {
    grid.contains(tile) && !grid.is_blocking(tile) && !state.is_occupied(tile)
}

/// Checks a whole path without touching state. `path` excludes the start tile.
pub fn validate_path(
    state: &CombatState,
    env: &CombatEnv<'_>,
    actor: EntityId,
    path: &[Position],
) -> Result<Position, MoveError> {
    if !state.in_progress {
        return Err(MoveError::NotInCombat);
    }
    if state.active_actor() != Some(actor) {
        return Err(MoveError::NotYourTurn(actor));
    }
    if state.combatant(actor).is_none() {
        return Err(MoveError::UnknownActor(actor));
    }
    if path.is_empty() {
        return Err(MoveError::EmptyPath);
    }
    let available = state.pools.move_points.current;
    if path.len() as u32 > available {
        return Err(MoveError::InsufficientMovePoints {
            needed: path.len() as u32,
            available,
        });
    }

    let start = resolve_position(state, env.grid, actor).ok_or(MoveError::PositionUnknown)?;
    let mut previous = start;
    for &tile in path {
        if previous.manhattan(tile) != 1 {
            return Err(MoveError::NotAdjacent {
                from: previous,
                to: tile,
            });
        }
        if !env.grid.contains(tile) || env.grid.is_blocking(tile) {
            return Err(MoveError::Blocked(tile));
        }
        if state.occupant_at(tile).is_some_and(|c| c.id != actor) {
            return Err(MoveError::Occupied(tile));
        }
        previous = tile;
    }
    Ok(start)
}

/// Walks `path`, spending one move point per step. All or nothing.
pub fn move_along(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    actor: EntityId,
    path: &[Position],
) -> Result<u32, MoveError> {
    let start = validate_path(state, env, actor, path)?;

    let mut from = start;
    for &to in path {
        state.pools.move_points.try_spend(1);
        events.push(CombatEvent::ActorMoved { actor, from, to });
        from = to;
    }
    if let Some(combatant) = state.combatant_mut(actor) {
        combatant.position = Some(from);
    }

    debug!(
        target: "combat::move",
        actor = %actor,
        from = %start,
        to = %from,
        steps = path.len(),
        mp_left = state.pools.move_points.current,
        "moved"
    );
    Ok(path.len() as u32)
}

/// Boolean form of [`move_along`].
pub fn move_actor(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    actor: EntityId,
    path: &[Position],
) -> bool {
    match move_along(state, env, events, actor, path) {
        Ok(_) => true,
        Err(error) => {
            debug!(
                target: "combat::move",
                actor = %actor,
                code = error.error_code(),
                %error,
                "move rejected"
            );
            false
        }
    }
}

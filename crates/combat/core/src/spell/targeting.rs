//! Range, alignment, line of sight and effect areas.

use crate::env::GridOracle;
use crate::spell::{CastPattern, EffectPattern, SpellDefinition};
use crate::state::{CombatState, Position};

/// Manhattan range check. Direction independent.
pub fn is_in_range(spell: &SpellDefinition, from: Position, to: Position) -> bool {
    let distance = from.manhattan(to);
    distance >= spell.range_min && distance <= spell.range_max
}

/// Cast pattern check: `Line4` spells need a shared row or column.
pub fn satisfies_cast_pattern(spell: &SpellDefinition, from: Position, to: Position) -> bool {
    match spell.cast_pattern {
        CastPattern::None => true,
        CastPattern::Line4 => from.is_aligned_with(to),
    }
}

/// Tiles strictly between `from` and `to` on the rasterized line.
pub fn line_between(from: Position, to: Position) -> Vec<Position> {
    let mut tiles = Vec::new();
    let (mut x, mut y) = (from.x, from.y);
    let dx = (to.x - x).abs();
    let dy = -(to.y - y).abs();
    let sx = if x < to.x { 1 } else { -1 };
    let sy = if y < to.y { 1 } else { -1 };
    let mut err = dx + dy;

    while (x, y) != (to.x, to.y) {
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        if (x, y) != (to.x, to.y) {
            tiles.push(Position::new(x, y));
        }
    }
    tiles
}

/// Returns true if no tile strictly between the endpoints is blocked.
///
/// The endpoints themselves never block, so a tile always sees itself.
pub fn has_line_of_sight(
    from: Position,
    to: Position,
    mut is_blocked: impl FnMut(Position) -> bool,
) -> bool {
    line_between(from, to).into_iter().all(|tile| !is_blocked(tile))
}

/// Sight blockers during combat: blocking terrain or a living combatant.
pub fn blocks_sight(state: &CombatState, grid: &dyn GridOracle, tile: Position) -> bool {
    grid.is_blocking(tile) || state.is_occupied(tile)
}

/// Axis-aligned unit step from `from` toward `to`, following the dominant
/// axis when the tiles are not aligned.
pub fn axis_direction(from: Position, to: Position) -> Option<(i32, i32)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if dx == 0 && dy == 0 {
        return None;
    }
    if dx.abs() >= dy.abs() {
        Some((dx.signum(), 0))
    } else {
        Some((0, dy.signum()))
    }
}

/// Tiles affected by casting `spell` from `caster` at `target`.
///
/// Tiles outside the map are dropped; the target tile is always part of the
/// `Single`, `Cross1` and `FrontCross` areas.
pub fn effect_area(
    spell: &SpellDefinition,
    caster: Position,
    target: Position,
    grid: &dyn GridOracle,
) -> Vec<Position> {
    let tiles = match spell.effect_pattern {
        EffectPattern::Single => vec![target],
        EffectPattern::Cross1 => {
            let mut tiles = vec![target];
            tiles.extend(target.neighbors4());
            tiles
        }
        EffectPattern::LineForward => match axis_direction(caster, target) {
            Some((dx, dy)) => (1..=spell.effect_length.max(1) as i32)
                .map(|k| caster.offset(dx * k, dy * k))
                .collect(),
            None => vec![target],
        },
        EffectPattern::FrontCross => match axis_direction(caster, target) {
            Some((dx, dy)) => vec![
                target,
                target.offset(dx, dy),
                target.offset(dy, dx),
                target.offset(-dy, -dx),
            ],
            None => vec![target],
        },
    };

    tiles.into_iter().filter(|t| grid.contains(*t)).collect()
}

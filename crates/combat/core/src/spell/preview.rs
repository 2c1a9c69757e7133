//! Read-only targeting preview for presentation layers.

use crate::env::CombatEnv;
use crate::movement::resolve_position;
use crate::spell::SpellId;
use crate::spell::resolver::check_cast_at_tile;
use crate::spell::targeting::{
    blocks_sight, effect_area, has_line_of_sight, is_in_range, satisfies_cast_pattern,
};
use crate::state::{CombatState, EntityId, Position};

/// How a tile in range can be reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TileReach {
    Castable,
    /// Within range and pattern, but line of sight is blocked.
    SightBlocked,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellPreview {
    pub in_range: Vec<(Position, TileReach)>,
    /// Affected tiles when the hovered tile is a valid target.
    pub effect_area: Option<Vec<Position>>,
}

impl SpellPreview {
    pub fn reach_of(&self, tile: Position) -> Option<TileReach> {
        self.in_range
            .iter()
            .find(|(t, _)| *t == tile)
            .map(|(_, reach)| *reach)
    }
}

/// Tiles `actor` could aim `spell` at from its current tile, and the effect
/// area under `hover`. Never mutates state.
pub fn preview(
    state: &CombatState,
    env: &CombatEnv<'_>,
    actor: EntityId,
    spell: SpellId,
    hover: Option<Position>,
) -> Option<SpellPreview> {
    let def = env.spell(spell)?;
    let origin = resolve_position(state, env.grid, actor)?;
    let reach = def.range_max as i32;

    let mut in_range = Vec::new();
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let tile = origin.offset(dx, dy);
            if !env.grid.contains(tile)
                || !is_in_range(def, origin, tile)
                || !satisfies_cast_pattern(def, origin, tile)
            {
                continue;
            }
            let sight = !def.line_of_sight
                || has_line_of_sight(origin, tile, |t| blocks_sight(state, env.grid, t));
            let kind = if sight {
                TileReach::Castable
            } else {
                TileReach::SightBlocked
            };
            in_range.push((tile, kind));
        }
    }

    let effect_area = hover
        .filter(|tile| check_cast_at_tile(state, env, actor, spell, *tile).is_ok())
        .map(|tile| effect_area(def, origin, tile, env.grid));

    Some(SpellPreview {
        in_range,
        effect_area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::EffectPattern;
    use crate::test_support::Fixture;

    #[test]
    fn preview_marks_blocked_tiles_and_does_not_mutate() {
        let mut fx = Fixture::duel();
        let strike = fx.spell_mut(Fixture::STRIKE);
        strike.range_max = 4;
        strike.line_of_sight = true;
        strike.effect_pattern = EffectPattern::Cross1;
        let before = fx.state.clone();

        let result = fx.preview(EntityId::PLAYER, Fixture::STRIKE, Some(Fixture::hostile_tile()));
        let result = result.expect("preview available");

        // The hostile at (3, 2) hides (4, 2) and (5, 2).
        assert_eq!(result.reach_of(Position::new(3, 2)), Some(TileReach::Castable));
        assert_eq!(
            result.reach_of(Position::new(5, 2)),
            Some(TileReach::SightBlocked)
        );
        assert_eq!(result.effect_area.as_ref().map(Vec::len), Some(5));
        assert_eq!(fx.state, before);
    }

    #[test]
    fn invalid_hover_has_no_area() {
        let fx = Fixture::duel();
        let result = fx
            .preview(EntityId::PLAYER, Fixture::STRIKE, Some(Position::new(8, 8)))
            .expect("preview available");
        assert!(result.effect_area.is_none());
    }
}

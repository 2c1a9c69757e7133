//! Ranged kiter: shoot from a valid firing tile, then back off.

use crate::ai::pathfinding::{self, Heading};
use crate::ai::{AiAction, AiContext, AiPhase, TurnMemory};
use crate::spell::{
    SpellDefinition, blocks_sight, has_line_of_sight, is_in_range,
    targeting::satisfies_cast_pattern,
};
use crate::state::Position;

pub(super) fn decide(ctx: &AiContext<'_>, memory: &mut TurnMemory) -> AiAction {
    let Some((_, target_tile)) = ctx.target() else {
        return AiAction::EndTurn;
    };
    let spell = ctx.profile.primary_spell;

    if memory.phase != AiPhase::Withdraw {
        if memory.casts_of(spell) < ctx.profile.max_casts && ctx.can_cast_at(spell, target_tile) {
            memory.phase = AiPhase::Engage;
            return AiAction::Cast {
                spell,
                target: target_tile,
            };
        }
        if memory.casts_of(spell) > 0 {
            memory.phase = AiPhase::Withdraw;
        } else if memory.moves == 0 && ctx.can_cast(spell) {
            memory.phase = AiPhase::Engage;
            if let Some(path) = ctx.spell(spell).and_then(|def| firing_path(ctx, def, target_tile)) {
                return AiAction::Move(path);
            }
            let path = ctx.approach(target_tile);
            if !path.is_empty() {
                return AiAction::Move(path);
            }
        }
    }

    if memory.phase == AiPhase::Withdraw && !memory.retreated && ctx.move_points() > 0 {
        memory.retreated = true;
        let path = pathfinding::greedy_path(
            ctx.state,
            ctx.env.grid,
            ctx.tile,
            target_tile,
            ctx.move_points(),
            Heading::Away,
        );
        if !path.is_empty() {
            return AiAction::Move(path);
        }
    }
    AiAction::EndTurn
}

/// Path to the best reachable tile from which `def` can hit `target`.
///
/// Prefers the shortest path, then the distance closest to the middle of the
/// spell's range band. `None` when no tile qualifies or the current one is best.
fn firing_path(
    ctx: &AiContext<'_>,
    def: &SpellDefinition,
    target: Position,
) -> Option<Vec<Position>> {
    let reach = pathfinding::explore(ctx.state, ctx.env.grid, ctx.tile, Some(ctx.move_points()));
    let mid = (def.range_min + def.range_max) / 2;
    let origin = ctx.tile;

    let (tile, _) = reach
        .tiles()
        .into_iter()
        .filter(|(tile, _)| {
            is_in_range(def, *tile, target)
                && satisfies_cast_pattern(def, *tile, target)
                && (!def.line_of_sight
                    || has_line_of_sight(*tile, target, |t| {
                        t != origin && blocks_sight(ctx.state, ctx.env.grid, t)
                    }))
        })
        .min_by_key(|(tile, steps)| (*steps, tile.manhattan(target).abs_diff(mid), *tile))?;

    if tile == origin {
        return None;
    }
    reach.path_to(tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Archetype, BehaviorProfile};
    use crate::spell::{CastPattern, SpellDefinition, SpellId};
    use crate::state::EntityId;
    use crate::test_support::Fixture;

    const BOLT: SpellId = SpellId(30);

    fn kiter(fx: &mut Fixture) {
        let mut bolt = SpellDefinition::new(BOLT, "bolt", 3).with_range(3, 5);
        bolt.cast_pattern = CastPattern::Line4;
        bolt.damage_min = 1;
        bolt.damage_max = 1;
        fx.add_spell(bolt);
        let hostile = fx.state.combatant_mut(Fixture::HOSTILE).expect("hostile");
        hostile.spells = vec![BOLT];
        hostile.behavior =
            Some(BehaviorProfile::new(Archetype::RangedKiter, BOLT).with_max_casts(1));
    }

    #[test]
    fn kiter_repositions_into_an_aligned_firing_tile() {
        let mut fx = Fixture::duel();
        kiter(&mut fx);
        fx.place(Fixture::HOSTILE, Position::new(4, 4));
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();
        let (state, env, _) = fx.parts();

        let AiAction::Move(path) = crate::ai::decide(state, env, Fixture::HOSTILE, &mut memory)
        else {
            panic!("expected a move");
        };
        let end = *path.last().expect("non-empty path");
        assert!(end.is_aligned_with(Fixture::player_tile()));
        let distance = end.manhattan(Fixture::player_tile());
        assert!((3..=5).contains(&distance));
    }

    #[test]
    fn kiter_shoots_then_retreats() {
        let mut fx = Fixture::duel();
        kiter(&mut fx);
        fx.set_hp(EntityId::PLAYER, 500, 500);
        fx.place(Fixture::HOSTILE, Position::new(6, 2));
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();

        let actions = fx.run_ai(Fixture::HOSTILE, &mut memory);
        assert!(matches!(actions[0], AiAction::Cast { spell: BOLT, .. }));
        assert!(matches!(actions[1], AiAction::Move(_)));
        assert_eq!(actions.last(), Some(&AiAction::EndTurn));
        let tile = fx.state.position_of(Fixture::HOSTILE).expect("tile");
        assert!(tile.manhattan(Fixture::player_tile()) > 4);
    }
}

//! Support: reposition to cover the most allies, buff, then engage.

use crate::ai::{AiAction, AiContext, AiPhase, TurnMemory, melee, pathfinding};
use crate::spell::SpellId;
use crate::state::Position;

pub(super) fn decide(ctx: &AiContext<'_>, memory: &mut TurnMemory) -> AiAction {
    let target = ctx.target().map(|(_, tile)| tile);

    if !memory.buffed
        && let Some(buff) = ctx.profile.secondary_spell
    {
        if ctx.can_cast(buff) {
            if memory.moves == 0
                && let Some(path) = buff_path(ctx, buff, target)
            {
                return AiAction::Move(path);
            }
            if ctx.can_cast_at(buff, ctx.tile) {
                memory.buffed = true;
                memory.phase = AiPhase::Engage;
                return AiAction::Cast {
                    spell: buff,
                    target: ctx.tile,
                };
            }
        }
        memory.buffed = true;
    }

    match target {
        Some(tile) => melee::engage(ctx, memory, tile),
        None => AiAction::EndTurn,
    }
}

/// Path to the reachable tile covering the most living allies with the buff.
///
/// Ties go to fewer steps, then to the tile closest to the target. `None`
/// when staying put is best.
fn buff_path(ctx: &AiContext<'_>, buff: SpellId, target: Option<Position>) -> Option<Vec<Position>> {
    let radius = ctx.spell(buff)?.area_buff?.radius;
    let allies: Vec<Position> = ctx
        .state
        .living_on(ctx.me.side())
        .filter(|c| c.id != ctx.actor)
        .filter_map(|c| c.position)
        .collect();
    let covered = |tile: Position| allies.iter().filter(|a| a.manhattan(tile) <= radius).count();

    let reach =
        pathfinding::explore(ctx.state, ctx.env.grid, ctx.tile, Some(ctx.move_points()));
    let (best, _) = reach.tiles().into_iter().min_by_key(|(tile, steps)| {
        (
            std::cmp::Reverse(covered(*tile)),
            *steps,
            target.map_or(0, |t| t.manhattan(*tile)),
            *tile,
        )
    })?;

    if best == ctx.tile || covered(best) <= covered(ctx.tile) {
        return None;
    }
    reach.path_to(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Archetype, BehaviorProfile};
    use crate::spell::{AreaBuffSpec, SpellDefinition};
    use crate::state::{EntityId, StatusEffect};
    use crate::test_support::Fixture;

    const WAR_CRY: SpellId = SpellId(32);

    fn support(fx: &mut Fixture) {
        let mut cry = SpellDefinition::new(WAR_CRY, "war cry", 2).with_range(0, 0);
        cry.area_buff = Some(AreaBuffSpec {
            radius: 1,
            turns: 2,
            elemental_bonus: 10,
            move_points: 1,
        });
        fx.add_spell(cry);
        let hostile = fx.state.combatant_mut(Fixture::HOSTILE).expect("hostile");
        hostile.spells.push(WAR_CRY);
        hostile.behavior = Some(
            BehaviorProfile::new(Archetype::Support, Fixture::BITE).with_secondary(WAR_CRY),
        );
    }

    #[test]
    fn support_moves_next_to_an_ally_then_buffs() {
        let mut fx = Fixture::duel();
        support(&mut fx);
        fx.set_hp(EntityId::PLAYER, 500, 500);
        let ally = EntityId(2);
        fx.add_hostile(ally, Position::new(7, 7));
        fx.place(Fixture::HOSTILE, Position::new(7, 5));
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();

        let actions = fx.run_ai(Fixture::HOSTILE, &mut memory);
        assert!(matches!(actions[0], AiAction::Move(_)));
        assert!(matches!(actions[1], AiAction::Cast { spell: WAR_CRY, .. }));

        let buffed = fx
            .state
            .combatant(ally)
            .expect("ally")
            .status
            .iter()
            .any(|e| matches!(e, StatusEffect::AreaBuff { .. }));
        assert!(buffed);
    }
}

//! Melee approach: close in, then hit.

use crate::ai::{AiAction, AiContext, AiPhase, TurnMemory};

pub(super) fn decide(ctx: &AiContext<'_>, memory: &mut TurnMemory) -> AiAction {
    let Some((_, target_tile)) = ctx.target() else {
        return AiAction::EndTurn;
    };
    engage(ctx, memory, target_tile)
}

/// Hit `target_tile` with the primary spell if possible, otherwise walk
/// toward it. Shared by the archetypes that finish in melee.
pub(super) fn engage(
    ctx: &AiContext<'_>,
    memory: &mut TurnMemory,
    target_tile: crate::state::Position,
) -> AiAction {
    memory.phase = AiPhase::Engage;
    let spell = ctx.profile.primary_spell;

    if memory.casts_of(spell) < ctx.profile.max_casts && ctx.can_cast_at(spell, target_tile) {
        return AiAction::Cast {
            spell,
            target: target_tile,
        };
    }

    if !ctx.is_adjacent(target_tile) {
        let path = ctx.approach(target_tile);
        if !path.is_empty() {
            return AiAction::Move(path);
        }
    }
    AiAction::EndTurn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::decide as run;
    use crate::state::{EntityId, Position};
    use crate::test_support::Fixture;

    #[test]
    fn adjacent_hostile_attacks_up_to_max_casts() {
        let mut fx = Fixture::duel();
        fx.set_hp(EntityId::PLAYER, 500, 500);
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();

        let actions = fx.run_ai(Fixture::HOSTILE, &mut memory);
        let casts = actions
            .iter()
            .filter(|a| matches!(a, AiAction::Cast { .. }))
            .count();
        // 6 AP and a 3 AP bite: two casts.
        assert_eq!(casts, 2);
        assert_eq!(actions.last(), Some(&AiAction::EndTurn));
    }

    #[test]
    fn distant_hostile_walks_then_ends() {
        let mut fx = Fixture::duel();
        fx.place(Fixture::HOSTILE, Position::new(8, 2));
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();
        let (state, env, _) = fx.parts();

        let action = run(state, env, Fixture::HOSTILE, &mut memory);
        assert_eq!(
            action,
            AiAction::Move(vec![
                Position::new(7, 2),
                Position::new(6, 2),
                Position::new(5, 2)
            ])
        );
    }
}

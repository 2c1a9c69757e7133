//! Hybrid: ranged spell while the target sits in its band, melee otherwise.

use crate::ai::{AiAction, AiContext, AiPhase, TurnMemory, melee};

pub(super) fn decide(ctx: &AiContext<'_>, memory: &mut TurnMemory) -> AiAction {
    let Some((_, target_tile)) = ctx.target() else {
        return AiAction::EndTurn;
    };

    if let Some(ranged) = ctx.profile.secondary_spell
        && memory.casts_of(ranged) < ctx.profile.max_casts
        && ctx.can_cast_at(ranged, target_tile)
    {
        memory.phase = AiPhase::Engage;
        return AiAction::Cast {
            spell: ranged,
            target: target_tile,
        };
    }
    melee::engage(ctx, memory, target_tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Archetype, BehaviorProfile};
    use crate::spell::{SpellDefinition, SpellId};
    use crate::state::Position;
    use crate::test_support::Fixture;

    const SPIT: SpellId = SpellId(31);

    fn hybrid(fx: &mut Fixture) {
        let mut spit = SpellDefinition::new(SPIT, "spit", 2).with_range(2, 4);
        spit.damage_min = 1;
        spit.damage_max = 2;
        fx.add_spell(spit);
        let hostile = fx.state.combatant_mut(Fixture::HOSTILE).expect("hostile");
        hostile.spells.push(SPIT);
        hostile.behavior = Some(
            BehaviorProfile::new(Archetype::Hybrid, Fixture::BITE).with_secondary(SPIT),
        );
    }

    #[test]
    fn hybrid_prefers_ranged_in_band() {
        let mut fx = Fixture::duel();
        hybrid(&mut fx);
        fx.place(Fixture::HOSTILE, Position::new(5, 2));
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();
        let (state, env, _) = fx.parts();

        assert_eq!(
            crate::ai::decide(state, env, Fixture::HOSTILE, &mut memory),
            AiAction::Cast {
                spell: SPIT,
                target: Fixture::player_tile()
            }
        );
    }

    #[test]
    fn hybrid_bites_when_adjacent() {
        let mut fx = Fixture::duel();
        hybrid(&mut fx);
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();
        let (state, env, _) = fx.parts();

        assert_eq!(
            crate::ai::decide(state, env, Fixture::HOSTILE, &mut memory),
            AiAction::Cast {
                spell: Fixture::BITE,
                target: Fixture::player_tile()
            }
        );
    }
}

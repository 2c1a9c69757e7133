//! Poisoner: one damage-over-time cast per turn around a melee hit.
//!
//! The poison goes out first when the target is already reachable by it,
//! otherwise after closing in.

use crate::ai::{AiAction, AiContext, TurnMemory, melee};

pub(super) fn decide(ctx: &AiContext<'_>, memory: &mut TurnMemory) -> AiAction {
    let Some((_, target_tile)) = ctx.target() else {
        return AiAction::EndTurn;
    };

    if !memory.poisoned
        && let Some(poison) = ctx.profile.secondary_spell
        && ctx.can_cast_at(poison, target_tile)
    {
        memory.poisoned = true;
        return AiAction::Cast {
            spell: poison,
            target: target_tile,
        };
    }
    melee::engage(ctx, memory, target_tile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Archetype, BehaviorProfile};
    use crate::spell::{SpellDefinition, SpellId, StatusEffectSpec};
    use crate::state::{EntityId, Position};
    use crate::test_support::Fixture;

    const STING: SpellId = SpellId(33);

    fn poisoner(fx: &mut Fixture) {
        let mut sting = SpellDefinition::new(STING, "sting", 2).with_range(1, 1);
        sting.status_effect = Some(StatusEffectSpec {
            turns: 3,
            damage_min: 1,
            damage_max: 2,
        });
        fx.add_spell(sting);
        let hostile = fx.state.combatant_mut(Fixture::HOSTILE).expect("hostile");
        hostile.spells.push(STING);
        hostile.behavior = Some(
            BehaviorProfile::new(Archetype::Poisoner, Fixture::BITE)
                .with_secondary(STING)
                .with_max_casts(1),
        );
    }

    #[test]
    fn poison_is_cast_once_then_bite() {
        let mut fx = Fixture::duel();
        poisoner(&mut fx);
        fx.set_hp(EntityId::PLAYER, 500, 500);
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();

        let actions = fx.run_ai(Fixture::HOSTILE, &mut memory);
        assert_eq!(
            actions,
            vec![
                AiAction::Cast {
                    spell: STING,
                    target: Fixture::player_tile()
                },
                AiAction::Cast {
                    spell: Fixture::BITE,
                    target: Fixture::player_tile()
                },
                AiAction::EndTurn,
            ]
        );
        assert!(fx.player().status.has_poison());
    }

    #[test]
    fn poison_follows_the_approach_when_out_of_reach() {
        let mut fx = Fixture::duel();
        poisoner(&mut fx);
        fx.set_hp(EntityId::PLAYER, 500, 500);
        fx.place(Fixture::HOSTILE, Position::new(5, 2));
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();

        let actions = fx.run_ai(Fixture::HOSTILE, &mut memory);
        assert!(matches!(actions[0], AiAction::Move(_)));
        assert!(matches!(actions[1], AiAction::Cast { spell: STING, .. }));
    }
}

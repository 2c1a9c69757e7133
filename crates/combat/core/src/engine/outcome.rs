//! Victory and defeat detection.

use tracing::{debug, info};

use crate::env::CombatEnv;
use crate::events::{CombatEvent, EventLog};
use crate::state::{CombatState, EntityId, Outcome, Role};
use crate::summon;

/// Decides the encounter after a kill or hp change.
///
/// Defeat when the player is down, victory when every hostile is down and the
/// player stands. A decided outcome is final and stops the turn machine.
pub fn evaluate_outcome(state: &mut CombatState) -> Outcome {
    if state.outcome.is_decided() {
        return state.outcome;
    }

    let Some(player) = state.player() else {
        return Outcome::None;
    };
    let outcome = if !player.is_alive() {
        Outcome::Defeat
    } else if !state.any_hostile_alive() {
        Outcome::Victory
    } else {
        Outcome::None
    };

    if outcome.is_decided() {
        state.outcome = outcome;
        state.in_progress = false;
        info!(
            target: "combat::turn",
            encounter = %state.encounter,
            %outcome,
            round = state.round,
            "combat decided"
        );
    }
    outcome
}

/// Three-way classification for encounters that stopped without a decision
/// (flee, disconnect).
pub fn classify_fallback(state: &CombatState) -> Outcome {
    let player_down = state.player().is_none_or(|p| p.stats.hp == 0);
    let hostiles_down = !state.any_hostile_alive();
    match (player_down, hostiles_down) {
        (true, false) => Outcome::Defeat,
        (false, true) => Outcome::Victory,
        _ => Outcome::Unknown,
    }
}

/// Bookkeeping for a combatant that just reached zero hp.
///
/// The initiative queue is pruned lazily at the next turn advance.
pub fn record_death(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    id: EntityId,
) {
    events.push(CombatEvent::ActorDied { actor: id });
    let role = state.combatant(id).map(|c| c.role);
    debug!(target: "combat::turn", actor = %id, ?role, "actor died");

    if role == Some(Role::Summon) {
        summon::on_summon_death(state, env, id);
    }
    evaluate_outcome(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn defeat_when_the_player_falls() {
        let mut fx = Fixture::duel();
        fx.set_hp(EntityId::PLAYER, 0, 50);
        assert_eq!(evaluate_outcome(&mut fx.state), Outcome::Defeat);
        assert!(!fx.state.in_progress);
    }

    #[test]
    fn decided_outcome_is_final() {
        let mut fx = Fixture::duel();
        fx.set_hp(Fixture::HOSTILE, 0, 40);
        assert_eq!(evaluate_outcome(&mut fx.state), Outcome::Victory);
        fx.set_hp(EntityId::PLAYER, 0, 50);
        assert_eq!(evaluate_outcome(&mut fx.state), Outcome::Victory);
    }

    #[test]
    fn fallback_is_three_way() {
        let mut fx = Fixture::duel();
        assert_eq!(classify_fallback(&fx.state), Outcome::Unknown);

        fx.set_hp(EntityId::PLAYER, 0, 50);
        assert_eq!(classify_fallback(&fx.state), Outcome::Defeat);

        fx.set_hp(Fixture::HOSTILE, 0, 40);
        assert_eq!(classify_fallback(&fx.state), Outcome::Unknown);

        fx.set_hp(EntityId::PLAYER, 10, 50);
        assert_eq!(classify_fallback(&fx.state), Outcome::Victory);
    }
}

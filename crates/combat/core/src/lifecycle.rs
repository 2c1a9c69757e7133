//! Encounter start and end.
//!
//! [`start_combat`] turns a prepared encounter into a running
//! [`CombatState`]. [`finalize_combat`] settles a finished one: challenge
//! verdict, rewards, what to do with the encountered world hostile, and
//! cleanup of everything that only lives for one combat.

use tracing::info;

use crate::challenge::{self, Challenge, ChallengeDefinition, ChallengeStatus, FailReason};
use crate::engine::{build_turn_order, classify_fallback};
use crate::env::CombatEnv;
use crate::events::{CombatEvent, EventLog};
use crate::rewards::{LootDrop, compute_rewards};
use crate::state::{
    CombatState, Combatant, EncounterId, EntityId, Outcome, Position, Role,
    WorldMonsterSnapshot,
};
use crate::summon::CapturedMonster;

/// Everything needed to open an encounter.
#[derive(Clone, Debug)]
pub struct StartRequest {
    pub encounter: EncounterId,
    pub seed: u64,
    /// Player already placed on its combat tile.
    pub player: Combatant,
    /// Pack members already placed, the encountered one first.
    pub hostiles: Vec<Combatant>,
    pub companion: Option<CapturedMonster>,
    /// Challenge drawn during preparation. Never re-rolled.
    pub challenge: Option<Challenge>,
    pub world_snapshot: Option<WorldMonsterSnapshot>,
}

/// Opens an encounter and builds the initiative queue.
///
/// Draws a challenge from `challenges` only when preparation did not.
pub fn start_combat(
    request: StartRequest,
    env: &CombatEnv<'_>,
    challenges: &[ChallengeDefinition],
    events: &mut EventLog,
) -> CombatState {
    let mut state = CombatState::new(request.encounter, request.seed);
    let hp_max = request.player.stats.hp_max;
    let player_tile = request.player.position;

    state.combatants.push(request.player);
    state.combatants.extend(
        request
            .hostiles
            .into_iter()
            .take(env.config.max_pack_size),
    );
    state.companion = request.companion;
    state.world_snapshot = request.world_snapshot;

    let mut drawn = request.challenge.or_else(|| {
        let occupied: Vec<Position> = state
            .combatants
            .iter()
            .filter_map(|c| c.position)
            .collect();
        challenge::draw(
            challenges,
            &mut state.rng,
            env.grid,
            &[],
            &occupied,
            player_tile,
            hp_max,
        )
    });
    if let Some(c) = drawn.as_mut()
        && c.data.hp_max_at_start == 0
    {
        c.data.hp_max_at_start = hp_max;
    }
    state.challenge = drawn;

    state.in_progress = true;
    let order = build_turn_order(&mut state);
    events.push(CombatEvent::CombatStarted {
        encounter: state.encounter,
        order: order.clone(),
    });
    if let Some(first) = order.first() {
        events.push(CombatEvent::TurnChanged {
            actor: *first,
            round: state.round,
        });
    }
    if let Some(c) = &state.challenge {
        events.push(CombatEvent::ChallengeUpdated {
            id: c.id.clone(),
            status: c.status,
            fail_reason: c.data.fail_reason,
        });
    }

    info!(
        target: "combat::lifecycle",
        encounter = %state.encounter,
        actors = order.len(),
        first = ?order.first(),
        challenge = ?state.challenge.as_ref().map(|c| c.id.as_str()),
        "combat started"
    );
    state
}

/// What the world should do with the encountered hostile.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldRestoration {
    /// Victory: re-materialize the hostile later at its original tile.
    ScheduleRespawn {
        snapshot: WorldMonsterSnapshot,
        delay_ms: u64,
    },
    /// Non-victory: put the hostile back as it was before combat.
    RestoreInPlace { snapshot: WorldMonsterSnapshot },
    Nothing,
}

impl WorldRestoration {
    pub fn decide(outcome: Outcome, snapshot: Option<WorldMonsterSnapshot>, delay_ms: u64) -> Self {
        match snapshot {
            Some(snapshot) if snapshot.is_combat_clone => WorldRestoration::Nothing,
            Some(snapshot) if outcome == Outcome::Victory => {
                WorldRestoration::ScheduleRespawn { snapshot, delay_ms }
            }
            Some(snapshot) => WorldRestoration::RestoreInPlace { snapshot },
            None => WorldRestoration::Nothing,
        }
    }
}

/// Challenge verdict carried in the result record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeSummary {
    pub id: String,
    pub status: ChallengeStatus,
    pub fail_reason: Option<FailReason>,
}

/// Terminal record handed to progression listeners.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatResult {
    pub encounter: EncounterId,
    pub outcome: Outcome,
    pub xp_gained: u32,
    pub gold_gained: u32,
    pub loot: Vec<LootDrop>,
    pub challenge: Option<ChallengeSummary>,
    /// The encountered world hostile.
    pub monster_id: Option<EntityId>,
    pub captured: Vec<CapturedMonster>,
    pub rounds: u32,
    /// Player hp at the end, for syncing back to the world.
    pub player_hp: u32,
}

/// Result of [`finalize_combat`].
#[derive(Clone, Debug, PartialEq)]
pub struct CombatEnd {
    pub result: CombatResult,
    pub restoration: WorldRestoration,
    /// Final player record (hp, tile) before transient state was cleared.
    pub player: Option<Combatant>,
}

/// Settles a finished or abandoned encounter.
///
/// An undecided encounter (flee, disconnect) is classified with
/// [`classify_fallback`]. The state is left stopped and cleaned, ready to be
/// discarded.
pub fn finalize_combat(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
) -> CombatEnd {
    let outcome = if state.outcome.is_decided() {
        state.outcome
    } else {
        classify_fallback(state)
    };
    state.outcome = outcome;
    state.in_progress = false;

    let player = state.player().cloned();
    let challenge = state.challenge.as_mut().map(|c| {
        c.finalize(outcome, player.as_ref());
        ChallengeSummary {
            id: c.id.clone(),
            status: c.status,
            fail_reason: c.data.fail_reason,
        }
    });
    if let Some(summary) = &challenge {
        events.push(CombatEvent::ChallengeUpdated {
            id: summary.id.clone(),
            status: summary.status,
            fail_reason: summary.fail_reason,
        });
    }

    let rewards = compute_rewards(state, env);
    let snapshot = state.world_snapshot.clone();
    let monster_id = snapshot.as_ref().map(|s| s.entity);
    let restoration = WorldRestoration::decide(outcome, snapshot, env.config.respawn_delay_ms);

    let result = CombatResult {
        encounter: state.encounter,
        outcome,
        xp_gained: rewards.xp,
        gold_gained: rewards.gold,
        loot: rewards.loot,
        challenge,
        monster_id,
        captured: state.captured.clone(),
        rounds: state.round,
        player_hp: player.as_ref().map_or(0, |p| p.stats.hp),
    };

    state.combatants.retain(|c| c.role != Role::Summon);
    state.actors.retain(|id| state.combatants.iter().any(|c| c.id == *id));
    state.clear_transient();
    events.push(CombatEvent::CombatEnded {
        encounter: state.encounter,
        outcome,
    });

    info!(
        target: "combat::lifecycle",
        encounter = %result.encounter,
        %outcome,
        rounds = result.rounds,
        xp = result.xp_gained,
        gold = result.gold_gained,
        loot = result.loot.len(),
        challenge = ?result.challenge.as_ref().map(|c| c.status),
        "combat finalized"
    );

    CombatEnd {
        result,
        restoration,
        player,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::{ChallengeKind, ChallengeRewards};
    use crate::env::TerrainKind;
    use crate::state::TemplateId;
    use crate::test_support::Fixture;

    fn snapshot(clone: bool) -> WorldMonsterSnapshot {
        WorldMonsterSnapshot {
            entity: Fixture::HOSTILE,
            template: Fixture::HOSTILE_TEMPLATE,
            name: "wolf".into(),
            tile: Position::new(9, 9),
            hp: 40,
            hp_max: 40,
            pack: vec![TemplateId(1)],
            is_combat_clone: clone,
        }
    }

    #[test]
    fn restoration_follows_the_outcome() {
        assert!(matches!(
            WorldRestoration::decide(Outcome::Victory, Some(snapshot(false)), 500),
            WorldRestoration::ScheduleRespawn { delay_ms: 500, .. }
        ));
        assert!(matches!(
            WorldRestoration::decide(Outcome::Defeat, Some(snapshot(false)), 500),
            WorldRestoration::RestoreInPlace { .. }
        ));
        assert_eq!(
            WorldRestoration::decide(Outcome::Defeat, Some(snapshot(true)), 500),
            WorldRestoration::Nothing
        );
        assert_eq!(
            WorldRestoration::decide(Outcome::Unknown, None, 500),
            WorldRestoration::Nothing
        );
    }

    #[test]
    fn start_keeps_a_prepared_challenge() {
        let fx = Fixture::duel();
        let prepared = Challenge::from_definition(&ChallengeDefinition {
            id: "prepared".into(),
            kind: ChallengeKind::FinishOnTile,
            rewards: ChallengeRewards::default(),
        });
        let pool = [ChallengeDefinition {
            id: "other".into(),
            kind: ChallengeKind::NoCastWhenEnemyMelee,
            rewards: ChallengeRewards::default(),
        }];
        let request = StartRequest {
            encounter: EncounterId(3),
            seed: 9,
            player: fx.player().clone(),
            hostiles: vec![fx.hostile().clone()],
            companion: None,
            challenge: Some(prepared),
            world_snapshot: Some(snapshot(false)),
        };
        let mut events = EventLog::new();
        let state = start_combat(request, &fx.env(), &pool, &mut events);

        assert!(state.in_progress);
        assert_eq!(state.actors, vec![EntityId::PLAYER, Fixture::HOSTILE]);
        let challenge = state.challenge.as_ref().expect("challenge");
        assert_eq!(challenge.id, "prepared");
        assert_eq!(challenge.data.hp_max_at_start, 50);
        assert!(matches!(
            events.iter().next(),
            Some(CombatEvent::CombatStarted { .. })
        ));
    }

    #[test]
    fn drawn_tile_target_is_walkable_and_free() {
        let mut fx = Fixture::duel();
        fx.grid.set(Position::new(2, 1), TerrainKind::Wall);
        let pool = [ChallengeDefinition {
            id: "finish_on_tile".into(),
            kind: ChallengeKind::FinishOnTile,
            rewards: ChallengeRewards::default(),
        }];
        let request = StartRequest {
            encounter: EncounterId(4),
            seed: 9,
            player: fx.player().clone(),
            hostiles: vec![fx.hostile().clone()],
            companion: None,
            challenge: None,
            world_snapshot: None,
        };
        let mut events = EventLog::new();
        let state = start_combat(request, &fx.env(), &pool, &mut events);

        // North is a wall and east holds the hostile.
        let challenge = state.challenge.as_ref().expect("challenge");
        assert_eq!(challenge.data.target_tile, Some(Position::new(2, 3)));
    }

    #[test]
    fn defeat_restores_the_hostile_and_grants_nothing() {
        let mut fx = Fixture::duel();
        fx.state.world_snapshot = Some(snapshot(false));
        fx.set_hp(EntityId::PLAYER, 0, 50);
        crate::engine::evaluate_outcome(&mut fx.state);

        let (state, env, events) = fx.parts();
        let end = finalize_combat(state, &env, events);
        assert_eq!(end.result.outcome, Outcome::Defeat);
        assert_eq!(end.result.xp_gained, 0);
        assert!(end.result.loot.is_empty());
        match end.restoration {
            WorldRestoration::RestoreInPlace { snapshot } => {
                assert_eq!(snapshot.tile, Position::new(9, 9));
                assert_eq!(snapshot.hp, 40);
            }
            other => panic!("unexpected restoration {other:?}"),
        }
    }

    #[test]
    fn fled_encounter_uses_the_fallback_and_clears_transients() {
        let mut fx = Fixture::duel();
        fx.state.arm_cooldown(EntityId::PLAYER, Fixture::STRIKE, 2);
        fx.add_summon(EntityId(EntityId::COMBAT_ONLY_BASE), Position::new(2, 3));

        let (state, env, events) = fx.parts();
        let end = finalize_combat(state, &env, events);
        assert_eq!(end.result.outcome, Outcome::Unknown);
        assert!(!state.in_progress);
        assert!(state.cooldowns.is_empty());
        assert!(state.summon().is_none());
        assert!(matches!(
            events.iter().last(),
            Some(CombatEvent::CombatEnded { .. })
        ));
    }
}

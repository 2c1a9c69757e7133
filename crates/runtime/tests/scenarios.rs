mod common;

use combat_core::{
    ChallengeKind, ChallengeStatus, CombatConfig, EntityId, FailReason, Outcome, Position,
};
use common::*;
use runtime::{InMemoryInventory, Phase, RuntimeError};

fn smash_wolf(session: &mut TestSession) {
    assert!(session.is_player_turn());
    assert!(session.cast_spell(SMASH, WOLF_TILE));
    session.run_until_idle();
}

#[test]
fn hp_threshold_met_on_victory_succeeds() {
    let mut session = session(
        vec![challenge(
            "hp_70",
            ChallengeKind::HpThresholdEnd { min_hp_ratio: 0.7 },
        )],
        player(75, 100, 60),
    );
    engage(&mut session);
    smash_wolf(&mut session);

    let result = session.last_result().unwrap();
    assert_eq!(result.outcome, Outcome::Victory);
    let challenge = result.challenge.as_ref().unwrap();
    assert_eq!(challenge.id, "hp_70");
    assert_eq!(challenge.status, ChallengeStatus::Success);
    // 25 xp with the 20% challenge bonus.
    assert_eq!(result.xp_gained, 30);
}

#[test]
fn hp_threshold_missed_fails_with_reason() {
    let mut session = session(
        vec![challenge(
            "hp_70",
            ChallengeKind::HpThresholdEnd { min_hp_ratio: 0.7 },
        )],
        player(65, 100, 60),
    );
    engage(&mut session);
    smash_wolf(&mut session);

    let result = session.last_result().unwrap();
    assert_eq!(result.outcome, Outcome::Victory);
    let challenge = result.challenge.as_ref().unwrap();
    assert_eq!(challenge.status, ChallengeStatus::Failed);
    assert_eq!(challenge.fail_reason, Some(FailReason::HpTooLow));
    assert_eq!(result.xp_gained, WOLF_XP);
}

#[test]
fn finishing_on_the_target_tile_succeeds() {
    let mut session = session(
        vec![challenge("finish_on_tile", ChallengeKind::FinishOnTile)],
        player(100, 100, 60),
    );
    engage(&mut session);
    let target = session
        .combat_state()
        .and_then(|s| s.challenge.as_ref())
        .and_then(|c| c.data.target_tile);
    assert_eq!(target, Some(PLAYER_COMBAT_TILE));

    smash_wolf(&mut session);
    let challenge = session.last_result().unwrap().challenge.clone().unwrap();
    assert_eq!(challenge.status, ChallengeStatus::Success);
}

#[test]
fn finishing_off_the_target_tile_fails() {
    let mut session = session(
        vec![challenge("finish_on_tile", ChallengeKind::FinishOnTile)],
        player(100, 100, 60),
    );
    engage(&mut session);

    assert!(session.move_player(&[Position::new(10, 6)]));
    smash_wolf(&mut session);

    let challenge = session.last_result().unwrap().challenge.clone().unwrap();
    assert_eq!(challenge.status, ChallengeStatus::Failed);
    assert_eq!(challenge.fail_reason, Some(FailReason::WrongTile));
}

#[test]
fn casting_in_melee_fails_the_challenge_immediately() {
    let mut session = session(
        vec![challenge(
            "no_cast_when_enemy_melee",
            ChallengeKind::NoCastWhenEnemyMelee,
        )],
        player(100, 100, 60),
    );
    engage(&mut session);

    assert!(session.cast_spell(BOLT, WOLF_TILE));

    // The cast resolved and the combat goes on.
    assert_eq!(session.actor_hp(WOLF_ID), Some((39, 40)));
    assert_eq!(session.phase(), Phase::Active);
    let challenge = session
        .combat_state()
        .and_then(|s| s.challenge.as_ref())
        .unwrap();
    assert_eq!(challenge.status, ChallengeStatus::Failed);
    assert_eq!(challenge.data.fail_reason, Some(FailReason::CastInMelee));
    assert!(
        session
            .challenge_status_text()
            .unwrap()
            .contains("failed")
    );
}

#[test]
fn third_cast_of_a_limited_spell_is_refused_for_free() {
    let mut session = session(Vec::new(), player(100, 100, 60));
    engage(&mut session);

    assert!(session.cast_spell(BOLT, WOLF_TILE));
    assert!(session.cast_spell(BOLT, WOLF_TILE));
    let ap_before = session.combat_state().unwrap().pools.action_points.current;
    let hp_before = session.actor_hp(WOLF_ID);

    assert!(!session.can_cast(BOLT));
    assert!(!session.cast_spell(BOLT, WOLF_TILE));

    assert_eq!(
        session.combat_state().unwrap().pools.action_points.current,
        ap_before
    );
    assert_eq!(ap_before, 6);
    assert_eq!(session.actor_hp(WOLF_ID), hp_before);
    // Another spell is still available.
    assert!(session.can_cast(SMASH));
}

#[test]
fn defeat_restores_the_world_hostile_without_rewards() {
    let mut session = build(
        content(Vec::new()),
        player(100, 100, 10),
        common::world().with_monster(wolf_in_world(30)),
        config(),
    );
    // The wolf opens and bites once for 500.
    engage(&mut session);

    let result = session.last_result().unwrap().clone();
    assert_eq!(result.outcome, Outcome::Defeat);
    assert_eq!(result.xp_gained, 0);
    assert_eq!(result.gold_gained, 0);
    assert!(result.loot.is_empty());
    assert_eq!(result.player_hp, 0);

    let wolf = session.world().get(WOLF_ID).unwrap();
    assert_eq!(wolf.tile, WOLF_TILE);
    assert_eq!(wolf.hp, 30);
    assert!(session.respawns().pending.is_empty());
    assert_eq!(session.inventory().xp, 0);
    assert!(session.inventory().items.is_empty());
    assert_eq!(session.world().player_hp(), Some(0));

    assert_eq!(session.phase(), Phase::Idle);
    assert_eq!(
        session.begin_preparation(WOLF_ID, &[]),
        Err(RuntimeError::PlayerDown)
    );
}

#[test]
fn victory_grants_rewards_and_queues_the_respawn() {
    let mut session = session(Vec::new(), player(100, 100, 60));
    engage(&mut session);
    smash_wolf(&mut session);

    let result = session.last_result().unwrap().clone();
    assert_eq!(result.outcome, Outcome::Victory);
    assert_eq!(result.monster_id, Some(WOLF_ID));
    assert!((3..=9).contains(&result.gold_gained));

    let inventory = session.inventory();
    assert_eq!(inventory.count("wolf_fang"), 2);
    assert_eq!(inventory.xp, u64::from(WOLF_XP));
    assert_eq!(inventory.gold, u64::from(result.gold_gained));

    let respawns = &session.respawns().pending;
    assert_eq!(respawns.len(), 1);
    assert_eq!(respawns[0].snapshot.entity, WOLF_ID);
    assert_eq!(respawns[0].snapshot.tile, WOLF_TILE);
    assert_eq!(
        respawns[0].delay_ms,
        CombatConfig::DEFAULT_RESPAWN_DELAY_MS
    );
    assert!(session.world().get(WOLF_ID).is_none());

    // The other world wolf came back, roaming resumed.
    assert!(!session.world().is_hidden(EntityId(8)));
    assert!(!session.world().is_frozen());
    assert_eq!(session.phase(), Phase::Idle);
}

#[test]
fn refused_items_are_dropped_from_the_result() {
    let mut session = build_with_inventory(
        content(Vec::new()),
        player(100, 100, 60),
        common::world(),
        config(),
        InMemoryInventory::with_capacity(1),
    );
    engage(&mut session);
    smash_wolf(&mut session);

    let result = session.last_result().unwrap();
    assert_eq!(result.loot.len(), 1);
    assert_eq!(result.loot[0].qty, 1);
    assert_eq!(session.inventory().count("wolf_fang"), 1);
}

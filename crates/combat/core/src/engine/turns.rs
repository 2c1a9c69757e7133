//! Initiative queue and turn advance.

use tracing::{debug, trace};

use crate::engine::errors::TurnError;
use crate::engine::outcome::{evaluate_outcome, record_death};
use crate::env::{CombatEnv, context};
use crate::events::{CombatEvent, EventLog};
use crate::state::{CombatState, EntityId, Role, Side};

/// Result of a successful turn advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnAdvance {
    /// New active actor, `None` when the encounter got decided on the way.
    pub actor: Option<EntityId>,
    pub round: u32,
    /// True when the scan passed the end of the queue.
    pub wrapped: bool,
}

fn ranked(state: &CombatState, side: Side) -> Vec<EntityId> {
    let mut members: Vec<(u32, EntityId)> = state
        .living_on(side)
        .filter(|c| c.role != Role::Summon)
        .map(|c| (c.stats.initiative, c.id))
        .collect();
    members.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    members.into_iter().map(|(_, id)| id).collect()
}

/// Side that acts first when both top initiatives are equal.
///
/// Drawn once per combat; later builds reuse the stored result.
pub fn initiative_coin(state: &mut CombatState) -> Side {
    if let Some(side) = state.initiative_coin {
        return side;
    }
    let side = if state.rng.coin_flip(context::COIN) {
        Side::Allies
    } else {
        Side::Hostiles
    };
    state.initiative_coin = Some(side);
    debug!(target: "combat::turn", first = %side, "initiative tie coin drawn");
    side
}

/// Builds the initiative queue from the living participants.
///
/// Sides are interleaved starting with the higher top initiative; a side that
/// runs out lets the other fill the rest. Summons act right after their owner.
pub fn build_turn_order(state: &mut CombatState) -> Vec<EntityId> {
    let allies = ranked(state, Side::Allies);
    let hostiles = ranked(state, Side::Hostiles);

    let top = |ids: &[EntityId], state: &CombatState| {
        ids.first()
            .and_then(|id| state.combatant(*id))
            .map(|c| c.stats.initiative)
    };
    let first = match (top(&allies, state), top(&hostiles, state)) {
        (Some(a), Some(h)) if a > h => Side::Allies,
        (Some(a), Some(h)) if a < h => Side::Hostiles,
        (Some(_), Some(_)) => initiative_coin(state),
        (Some(_), None) => Side::Allies,
        _ => Side::Hostiles,
    };

    let (lead, follow) = match first {
        Side::Allies => (allies, hostiles),
        Side::Hostiles => (hostiles, allies),
    };
    let mut order = Vec::with_capacity(lead.len() + follow.len() + 1);
    let mut lead = lead.into_iter();
    let mut follow = follow.into_iter();
    loop {
        match (lead.next(), follow.next()) {
            (None, None) => break,
            (a, b) => order.extend(a.into_iter().chain(b)),
        }
    }

    let summons: Vec<(EntityId, Option<EntityId>)> = state
        .living()
        .filter(|c| c.role == Role::Summon)
        .map(|c| (c.id, c.owner))
        .collect();
    for (summon, owner) in summons {
        let anchor = owner
            .and_then(|o| order.iter().position(|id| *id == o))
            .map_or(order.len(), |i| i + 1);
        order.insert(anchor, summon);
    }

    state.actors = order.clone();
    state.active_index = 0;
    state.casts_this_turn.clear();
    state.reset_pools_for_active();
    debug!(target: "combat::turn", ?order, "initiative built");
    order
}

/// Inserts `id` right after `anchor` in the queue.
///
/// If `anchor` is the active actor, `id` acts next.
pub fn insert_after(state: &mut CombatState, anchor: EntityId, id: EntityId) {
    let at = state
        .actors
        .iter()
        .position(|a| *a == anchor)
        .map_or(state.actors.len(), |i| i + 1);
    state.actors.insert(at, id);
    if at <= state.active_index && state.actors.len() > 1 {
        state.active_index += 1;
    }
}

/// Advances to the next living actor.
///
/// Scans forward for a living actor, bumps the round when the scan wraps,
/// prunes dead actors and starts the new turn (cast counters, cooldowns,
/// statuses, pools). An actor killed by poison at the start of its turn is
/// skipped.
pub fn try_end_turn(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
) -> Result<TurnAdvance, TurnError> {
    if !state.in_progress {
        return Err(TurnError::NotInProgress);
    }
    if state.actors.is_empty() {
        return Err(TurnError::EmptyQueue);
    }

    let mut wrapped_any = false;
    // Each pass either starts a turn or kills an actor, so this terminates.
    loop {
        let len = state.actors.len();
        let mut next = None;
        for step in 1..=len {
            let raw = state.active_index + step;
            let id = state.actors[raw % len];
            if state.is_alive(id) {
                next = Some((id, raw >= len));
                break;
            }
        }
        let Some((actor, wrapped)) = next else {
            evaluate_outcome(state);
            return Err(TurnError::NoLivingActor);
        };

        if wrapped {
            state.round += 1;
            wrapped_any = true;
        }
        prune_dead(state);
        state.active_index = state.actors.iter().position(|id| *id == actor).unwrap_or(0);

        if begin_turn(state, env, events, actor) {
            return Ok(TurnAdvance {
                actor: Some(actor),
                round: state.round,
                wrapped: wrapped_any,
            });
        }
        if state.outcome.is_decided() {
            return Ok(TurnAdvance {
                actor: None,
                round: state.round,
                wrapped: wrapped_any,
            });
        }
    }
}

/// Boolean form of [`try_end_turn`]. A no-op when combat is not active.
pub fn end_turn(state: &mut CombatState, env: &CombatEnv<'_>, events: &mut EventLog) -> bool {
    match try_end_turn(state, env, events) {
        Ok(_) => true,
        Err(error) => {
            trace!(target: "combat::turn", %error, "end turn ignored");
            false
        }
    }
}

fn prune_dead(state: &mut CombatState) {
    let living: Vec<EntityId> = state
        .actors
        .iter()
        .copied()
        .filter(|id| state.is_alive(*id))
        .collect();
    if living.len() != state.actors.len() {
        trace!(
            target: "combat::turn",
            removed = state.actors.len() - living.len(),
            "pruned dead actors"
        );
        state.actors = living;
    }
}

/// Starts `actor`'s turn. Poison ticks and status durations count down
/// before the pools refill. Returns false when poison killed the actor.
fn begin_turn(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    actor: EntityId,
) -> bool {
    state.casts_this_turn.clear();
    state.tick_cooldowns(actor);
    events.push(CombatEvent::TurnChanged {
        actor,
        round: state.round,
    });

    let ticks = state
        .combatant(actor)
        .map(|c| c.status.poison_ticks())
        .unwrap_or_default();
    let mut total = 0;
    for &(min, max, _source) in &ticks {
        let roll = state.rng.range(context::POISON, min, max);
        if let Some(victim) = state.combatant_mut(actor) {
            total += victim.take_damage(roll);
        }
    }
    let (hp_left, expired) = match state.combatant_mut(actor) {
        Some(combatant) => (
            combatant.stats.hp,
            combatant
                .status
                .decrement()
                .into_iter()
                .map(str::to_owned)
                .collect::<Vec<_>>(),
        ),
        None => (0, Vec::new()),
    };

    if !ticks.is_empty() || !expired.is_empty() {
        events.push(CombatEvent::StatusTicked {
            actor,
            damage: total,
            expired,
        });
    }
    if !ticks.is_empty() {
        events.push(CombatEvent::DamageApplied {
            source: None,
            target: actor,
            amount: total,
            hp_left,
        });
        if hp_left == 0 {
            record_death(state, env, events, actor);
            return false;
        }
    }

    state.reset_pools_for_active();
    debug!(
        target: "combat::turn",
        actor = %actor,
        round = state.round,
        ap = state.pools.action_points.base,
        mp = state.pools.move_points.base,
        "turn started"
    );
    true
}

//! Cast validation and resolution.
//!
//! The boolean entry points (`can_cast`, `can_cast_at_tile`, `cast`) keep the
//! "nothing happens" contract for invalid attempts. Their `check_*`/`try_cast`
//! counterparts return the typed reason. A rejected cast never mutates state.

use tracing::{debug, trace};

use crate::engine::outcome::{evaluate_outcome, record_death};
use crate::env::CombatEnv;
use crate::error::{CombatError, ErrorSeverity};
use crate::events::{CombatEvent, EventLog};
use crate::movement::resolve_position;
use crate::spell::damage::{elemental_bonus, roll_damage, scale_damage};
use crate::spell::targeting::{
    axis_direction, blocks_sight, effect_area, has_line_of_sight, is_in_range,
    satisfies_cast_pattern,
};
use crate::spell::{AreaBuffSpec, ChargeConversion, SpellDefinition, SpellId};
use crate::state::{CombatState, EntityId, Position, Role, StatusEffect};
use crate::summon;

/// Reasons a cast is rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CastError {
    #[error("combat is not in progress")]
    NotInCombat,

    #[error("it is not {actor}'s turn")]
    NotYourTurn { actor: EntityId },

    #[error("caster {0} is not part of this combat")]
    UnknownCaster(EntityId),

    #[error("caster {0} is dead")]
    CasterDead(EntityId),

    #[error("{0} is not in the catalog")]
    UnknownSpell(SpellId),

    #[error("{actor} does not know {spell}")]
    SpellNotKnown { actor: EntityId, spell: SpellId },

    #[error("{spell} is on cooldown for {turns} more turns")]
    OnCooldown { spell: SpellId, turns: u32 },

    #[error("needs {needed} action points, has {available}")]
    InsufficientActionPoints { needed: u32, available: u32 },

    #[error("{spell} already cast {limit} times this turn")]
    CastLimitReached { spell: SpellId, limit: u32 },

    #[error("no summon available")]
    SummonUnavailable,

    #[error("target {0} is outside the map")]
    OutOfBounds(Position),

    #[error("caster tile is unknown")]
    CasterPositionUnknown,

    #[error("target at distance {distance} is outside range {min}..={max}")]
    OutOfRange { distance: u32, min: u32, max: u32 },

    #[error("target is not aligned with the caster")]
    NotAligned,

    #[error("line of sight to {0} is blocked")]
    LineOfSightBlocked(Position),

    #[error("no free tile to place the summon")]
    NoFreeTile,
}

impl CombatError for CastError {
    fn severity(&self) -> ErrorSeverity {
        use CastError::*;
        match self {
            NotInCombat | NotYourTurn { .. } | OnCooldown { .. } | InsufficientActionPoints { .. }
            | CastLimitReached { .. } | SummonUnavailable | OutOfRange { .. } | NotAligned
            | LineOfSightBlocked(_) | NoFreeTile => ErrorSeverity::Recoverable,
            UnknownSpell(_) | SpellNotKnown { .. } | OutOfBounds(_) | CasterDead(_) => {
                ErrorSeverity::Validation
            }
            UnknownCaster(_) | CasterPositionUnknown => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use CastError::*;
        match self {
            NotInCombat => "CAST_NOT_IN_COMBAT",
            NotYourTurn { .. } => "CAST_NOT_YOUR_TURN",
            UnknownCaster(_) => "CAST_UNKNOWN_CASTER",
            CasterDead(_) => "CAST_CASTER_DEAD",
            UnknownSpell(_) => "CAST_UNKNOWN_SPELL",
            SpellNotKnown { .. } => "CAST_SPELL_NOT_KNOWN",
            OnCooldown { .. } => "CAST_ON_COOLDOWN",
            InsufficientActionPoints { .. } => "CAST_INSUFFICIENT_AP",
            CastLimitReached { .. } => "CAST_LIMIT_REACHED",
            SummonUnavailable => "CAST_SUMMON_UNAVAILABLE",
            OutOfBounds(_) => "CAST_OUT_OF_BOUNDS",
            CasterPositionUnknown => "CAST_CASTER_POSITION_UNKNOWN",
            OutOfRange { .. } => "CAST_OUT_OF_RANGE",
            NotAligned => "CAST_NOT_ALIGNED",
            LineOfSightBlocked(_) => "CAST_LOS_BLOCKED",
            NoFreeTile => "CAST_NO_FREE_TILE",
        }
    }
}

/// A validated cast, ready to resolve.
#[derive(Clone, Copy, Debug)]
pub struct CastPlan<'a> {
    pub spell: &'a SpellDefinition,
    pub caster_tile: Position,
    /// Tile where a summon spell will materialize its creature.
    pub spawn_tile: Option<Position>,
}

/// Damage dealt to one victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub victim: EntityId,
    pub damage: u32,
    pub killed: bool,
}

/// What a resolved cast did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CastReport {
    pub affected: Vec<Position>,
    pub hits: Vec<Hit>,
    pub captured: Vec<EntityId>,
    pub summoned: Option<EntityId>,
    pub self_cast: bool,
}

impl CastReport {
    pub fn total_damage(&self) -> u32 {
        self.hits.iter().map(|h| h.damage).sum()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Turn, resource, cooldown and cast-limit checks.
pub fn check_cast<'a>(
    state: &CombatState,
    env: &CombatEnv<'a>,
    actor: EntityId,
    spell: SpellId,
) -> Result<&'a SpellDefinition, CastError> {
    if !state.in_progress {
        return Err(CastError::NotInCombat);
    }
    if state.active_actor() != Some(actor) {
        return Err(CastError::NotYourTurn { actor });
    }
    let caster = state
        .combatant(actor)
        .ok_or(CastError::UnknownCaster(actor))?;
    if !caster.is_alive() {
        return Err(CastError::CasterDead(actor));
    }
    let def = env.spell(spell).ok_or(CastError::UnknownSpell(spell))?;
    if !caster.spells.contains(&spell) {
        return Err(CastError::SpellNotKnown { actor, spell });
    }

    let turns = state.cooldown_remaining(actor, spell);
    if turns > 0 {
        return Err(CastError::OnCooldown { spell, turns });
    }

    let available = state.pools.action_points.current;
    if available < def.action_point_cost {
        return Err(CastError::InsufficientActionPoints {
            needed: def.action_point_cost,
            available,
        });
    }

    if caster.role == Role::Player
        && def.has_cast_limit()
        && state.casts_of(spell) >= def.max_casts_per_turn
    {
        return Err(CastError::CastLimitReached {
            spell,
            limit: def.max_casts_per_turn,
        });
    }

    if let Some(spec) = def.summon {
        let available = match caster.role {
            Role::Player => {
                state.companion.is_some() && !state.summon_used && state.summon().is_none()
            }
            _ => spec.template.is_some(),
        };
        if !available {
            return Err(CastError::SummonUnavailable);
        }
    }

    Ok(def)
}

pub fn can_cast(state: &CombatState, env: &CombatEnv<'_>, actor: EntityId, spell: SpellId) -> bool {
    check_cast(state, env, actor, spell).is_ok()
}

/// [`check_cast`] plus bounds, range, alignment and line of sight.
pub fn check_cast_at_tile<'a>(
    state: &CombatState,
    env: &CombatEnv<'a>,
    actor: EntityId,
    spell: SpellId,
    tile: Position,
) -> Result<CastPlan<'a>, CastError> {
    let def = check_cast(state, env, actor, spell)?;

    if !env.grid.contains(tile) {
        return Err(CastError::OutOfBounds(tile));
    }
    let caster_tile =
        resolve_position(state, env.grid, actor).ok_or(CastError::CasterPositionUnknown)?;

    if !is_in_range(def, caster_tile, tile) {
        return Err(CastError::OutOfRange {
            distance: caster_tile.manhattan(tile),
            min: def.range_min,
            max: def.range_max,
        });
    }
    if !satisfies_cast_pattern(def, caster_tile, tile) {
        return Err(CastError::NotAligned);
    }
    if def.line_of_sight
        && !has_line_of_sight(caster_tile, tile, |t| blocks_sight(state, env.grid, t))
    {
        return Err(CastError::LineOfSightBlocked(tile));
    }

    let spawn_tile = match def.summon {
        Some(_) => Some(
            summon::spawn_tile(state, env.grid, caster_tile, Some(tile))
                .ok_or(CastError::NoFreeTile)?,
        ),
        None => None,
    };

    Ok(CastPlan {
        spell: def,
        caster_tile,
        spawn_tile,
    })
}

pub fn can_cast_at_tile(
    state: &CombatState,
    env: &CombatEnv<'_>,
    actor: EntityId,
    spell: SpellId,
    tile: Position,
) -> bool {
    check_cast_at_tile(state, env, actor, spell, tile).is_ok()
}

// ============================================================================
// Resolution
// ============================================================================

/// Validates then resolves a cast.
pub fn try_cast(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    actor: EntityId,
    spell: SpellId,
    tile: Position,
) -> Result<CastReport, CastError> {
    let plan = check_cast_at_tile(state, env, actor, spell, tile)?;
    let def = plan.spell;
    let caster_tile = plan.caster_tile;

    let is_player = match state.combatant_mut(actor) {
        Some(caster) => {
            caster.position = Some(caster_tile);
            caster.role == Role::Player
        }
        None => return Err(CastError::UnknownCaster(actor)),
    };

    // Melee-cast challenge looks at the board before the spell lands.
    if is_player {
        let enemy_adjacent = state.enemy_adjacent_to(actor);
        if let Some(challenge) = state.challenge.as_mut()
            && challenge.observe_cast(enemy_adjacent)
        {
            events.push(CombatEvent::ChallengeUpdated {
                id: challenge.id.clone(),
                status: challenge.status,
                fail_reason: challenge.data.fail_reason,
            });
        }
    }

    state.pools.action_points.try_spend(def.action_point_cost);
    if def.cooldown_turns > 0 {
        state.arm_cooldown(actor, spell, def.cooldown_turns);
    }
    *state.casts_this_turn.entry(spell).or_insert(0) += 1;

    events.push(CombatEvent::SpellCast {
        caster: actor,
        spell,
        target: tile,
    });
    debug!(
        target: "combat::spell",
        caster = %actor,
        spell = %spell,
        name = %def.name,
        target_tile = %tile,
        ap_left = state.pools.action_points.current,
        "spell cast"
    );

    let mut report = CastReport::default();

    if let Some(buff) = def.area_buff {
        apply_area_buff(state, events, actor, caster_tile, buff);
    }

    if tile == caster_tile {
        report.self_cast = true;
        if let Some(conversion) = def.eryon_charges.and_then(|c| c.conversion) {
            convert_charges(state, events, actor, conversion);
        }
        return Ok(report);
    }

    if def.summon.is_some() {
        report.summoned = match (is_player, plan.spawn_tile) {
            (true, Some(spawn)) => summon::materialize_companion(state, env, events, actor, spawn),
            (false, Some(spawn)) => def
                .summon
                .and_then(|s| s.template)
                .and_then(|t| summon::spawn_add(state, env, events, actor, t, spawn)),
            _ => None,
        };
        return Ok(report);
    }

    report.affected = effect_area(def, caster_tile, tile, env.grid);
    resolve_hits(state, env, events, actor, def, &mut report);
    evaluate_outcome(state);

    Ok(report)
}

/// Boolean form of [`try_cast`]. Logs the rejection reason at debug level.
pub fn cast(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    actor: EntityId,
    spell: SpellId,
    tile: Position,
) -> bool {
    match try_cast(state, env, events, actor, spell, tile) {
        Ok(_) => true,
        Err(error) => {
            debug!(
                target: "combat::spell",
                caster = %actor,
                spell = %spell,
                code = error.error_code(),
                %error,
                "cast rejected"
            );
            false
        }
    }
}

fn resolve_hits(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    actor: EntityId,
    def: &SpellDefinition,
    report: &mut CastReport,
) {
    let Some(caster) = state.combatant(actor) else {
        return;
    };
    let caster_side = caster.side();
    let caster_is_player = caster.role == Role::Player;
    let bonus = elemental_bonus(caster, def.element, env.config);
    let mut pulled = false;

    for tile in report.affected.clone() {
        // A victim killed earlier in this pass simply leaves its tile empty.
        let Some(victim) = state
            .occupant_at(tile)
            .filter(|v| v.id != actor && v.side() != caster_side)
            .map(|v| v.id)
        else {
            continue;
        };

        let mut dealt = 0;
        if def.deals_damage() {
            let roll = roll_damage(&mut state.rng, def.damage_min, def.damage_max);
            let amount = scale_damage(roll, bonus);
            let Some(target) = state.combatant_mut(victim) else {
                continue;
            };
            dealt = target.take_damage(amount);
            let hp_left = target.stats.hp;
            events.push(CombatEvent::DamageApplied {
                source: Some(actor),
                target: victim,
                amount: dealt,
                hp_left,
            });
            trace!(
                target: "combat::spell",
                caster = %actor,
                victim = %victim,
                roll,
                damage = dealt,
                hp_left,
                "hit"
            );

            if let Some(caster) = state.combatant_mut(actor) {
                if def.lifesteal_pct > 0 {
                    let healed = caster.heal(dealt * def.lifesteal_pct / 100);
                    if healed > 0 {
                        events.push(CombatEvent::Healed {
                            actor,
                            amount: healed,
                        });
                    }
                }
                if let Some(charges) = def.eryon_charges
                    && charges.gain > 0
                    && dealt > 0
                {
                    caster
                        .charges
                        .add(def.element, charges.gain, env.config.charge_cap);
                }
            }
        }

        if def.pull_caster && !pulled {
            pulled = true;
            pull_toward(state, env, events, actor, tile);
        }

        let victim_alive = state.is_alive(victim);

        if victim_alive
            && let Some(spec) = def.status_effect
            && let Some(target) = state.combatant_mut(victim)
            && target.role == Role::Player
        {
            let effect = StatusEffect::Poison {
                turns: spec.turns,
                damage_min: spec.damage_min,
                damage_max: spec.damage_max,
                source: actor,
            };
            target.status.apply(effect);
            events.push(CombatEvent::StatusApplied {
                target: victim,
                effect,
            });
        }

        if victim_alive
            && caster_is_player
            && let Some(capture) = def.capture
            && state.combatant(victim).is_some_and(|v| {
                v.role == Role::Hostile && v.stats.hp_ratio() <= capture.max_hp_ratio
            })
        {
            summon::capture(state, env, events, victim);
            report.captured.push(victim);
        }

        let killed = !victim_alive;
        if killed {
            record_death(state, env, events, victim);
        }
        report.hits.push(Hit {
            victim,
            damage: dealt,
            killed,
        });
    }
}

/// Moves the caster one tile toward `toward` if that tile is free.
fn pull_toward(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    actor: EntityId,
    toward: Position,
) {
    let Some(from) = state.position_of(actor) else {
        return;
    };
    let Some((dx, dy)) = axis_direction(from, toward) else {
        return;
    };
    let to = from.offset(dx, dy);
    if to == toward || env.grid.is_blocking(to) || state.is_occupied(to) {
        return;
    }
    if let Some(caster) = state.combatant_mut(actor) {
        caster.position = Some(to);
        events.push(CombatEvent::ActorMoved { actor, from, to });
    }
}

fn apply_area_buff(
    state: &mut CombatState,
    events: &mut EventLog,
    caster: EntityId,
    center: Position,
    spec: AreaBuffSpec,
) {
    let Some(side) = state.combatant(caster).map(|c| c.side()) else {
        return;
    };
    let allies: Vec<EntityId> = state
        .living_on(side)
        .filter(|c| c.position.is_some_and(|p| p.manhattan(center) <= spec.radius))
        .map(|c| c.id)
        .collect();

    for ally in allies {
        if let Some(target) = state.combatant_mut(ally) {
            target.status.apply(StatusEffect::AreaBuff {
                turns: spec.turns,
                elemental_bonus: spec.elemental_bonus,
                move_points: spec.move_points,
                source: caster,
            });
            events.push(CombatEvent::BuffApplied {
                source: caster,
                target: ally,
                turns: spec.turns,
            });
        }
    }
}

fn convert_charges(
    state: &mut CombatState,
    events: &mut EventLog,
    actor: EntityId,
    conversion: ChargeConversion,
) {
    let Some(caster) = state.combatant_mut(actor) else {
        return;
    };
    let charges = caster.charges.drain();
    if charges == 0 {
        return;
    }
    let effect = StatusEffect::ChargeBoost {
        turns: conversion.turns,
        elemental_bonus: charges as i32 * conversion.points_per_charge,
    };
    caster.status.apply(effect);
    events.push(CombatEvent::StatusApplied {
        target: actor,
        effect,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::{CaptureSpec, ChargeConversion, ChargeSpec, Element, StatusEffectSpec};
    use crate::test_support::Fixture;

    #[test]
    fn cast_spends_ap_and_damages_the_target() {
        let mut fx = Fixture::duel();
        let report = fx.try_cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::hostile_tile());
        let report = report.expect("cast resolves");

        assert_eq!(fx.state.pools.action_points.current, 6 - 3);
        assert_eq!(report.hits.len(), 1);
        assert!(report.total_damage() >= 5);
        assert!(fx.hostile().stats.hp < 40);
    }

    #[test]
    fn rejected_cast_changes_nothing() {
        let mut fx = Fixture::duel();
        let before = fx.state.clone();
        let far = Position::new(9, 9);
        let err = fx
            .try_cast(EntityId::PLAYER, Fixture::STRIKE, far)
            .expect_err("out of range");
        assert!(matches!(err, CastError::OutOfRange { .. }));
        assert_eq!(fx.state, before);
        assert!(fx.events.is_empty());
    }

    #[test]
    fn wrong_turn_is_rejected() {
        let fx = Fixture::duel();
        assert!(!fx.can_cast(Fixture::HOSTILE, Fixture::BITE));
    }

    #[test]
    fn cast_limit_applies_to_the_player() {
        let mut fx = Fixture::duel();
        fx.spell_mut(Fixture::STRIKE).max_casts_per_turn = 2;
        fx.spell_mut(Fixture::STRIKE).action_point_cost = 1;
        fx.set_hp(Fixture::HOSTILE, 500, 500);

        let tile = Fixture::hostile_tile();
        assert!(fx.cast(EntityId::PLAYER, Fixture::STRIKE, tile));
        assert!(fx.cast(EntityId::PLAYER, Fixture::STRIKE, tile));
        let ap = fx.state.pools.action_points.current;
        let err = fx
            .try_cast(EntityId::PLAYER, Fixture::STRIKE, tile)
            .expect_err("third cast refused");
        assert!(matches!(err, CastError::CastLimitReached { limit: 2, .. }));
        assert_eq!(fx.state.pools.action_points.current, ap);
    }

    #[test]
    fn cooldown_blocks_recast() {
        let mut fx = Fixture::duel();
        fx.spell_mut(Fixture::STRIKE).cooldown_turns = 1;
        fx.spell_mut(Fixture::STRIKE).action_point_cost = 1;
        fx.set_hp(Fixture::HOSTILE, 500, 500);
        assert!(fx.cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::hostile_tile()));
        assert!(matches!(
            fx.check(EntityId::PLAYER, Fixture::STRIKE),
            Err(CastError::OnCooldown { .. })
        ));
    }

    #[test]
    fn line_of_sight_is_blocked_by_a_combatant() {
        let mut fx = Fixture::duel();
        fx.spell_mut(Fixture::STRIKE).range_max = 6;
        fx.spell_mut(Fixture::STRIKE).line_of_sight = true;
        fx.place(Fixture::HOSTILE, Position::new(5, 2));
        fx.add_hostile(EntityId(7), Position::new(3, 2));

        let err = fx
            .try_cast(EntityId::PLAYER, Fixture::STRIKE, Position::new(5, 2))
            .expect_err("blocked");
        assert_eq!(err, CastError::LineOfSightBlocked(Position::new(5, 2)));
    }

    #[test]
    fn self_cast_converts_charges() {
        let mut fx = Fixture::duel();
        let def = fx.spell_mut(Fixture::STRIKE);
        def.range_min = 0;
        def.damage_max = 0;
        def.eryon_charges = Some(ChargeSpec {
            gain: 0,
            conversion: Some(ChargeConversion {
                points_per_charge: 10,
                turns: 2,
            }),
        });
        if let Some(player) = fx.state.combatant_mut(EntityId::PLAYER) {
            player.charges.add(Element::Intelligence, 3, 5);
        }

        let report = fx
            .try_cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::player_tile())
            .expect("self cast");
        assert!(report.self_cast);
        let player = fx.player();
        assert_eq!(player.charges.total(), 0);
        assert_eq!(player.status.elemental_bonus(), 30);
    }

    #[test]
    fn hits_gain_charges_of_the_spell_element() {
        let mut fx = Fixture::duel();
        let def = fx.spell_mut(Fixture::STRIKE);
        def.element = Element::Agility;
        def.eryon_charges = Some(ChargeSpec {
            gain: 2,
            conversion: None,
        });
        assert!(fx.cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::hostile_tile()));
        assert_eq!(fx.player().charges.agility, 2);
    }

    #[test]
    fn poison_attaches_only_to_the_player() {
        let mut fx = Fixture::duel();
        fx.spell_mut(Fixture::BITE).status_effect = Some(StatusEffectSpec {
            turns: 3,
            damage_min: 1,
            damage_max: 2,
        });
        fx.spell_mut(Fixture::STRIKE).status_effect = Some(StatusEffectSpec {
            turns: 3,
            damage_min: 1,
            damage_max: 2,
        });

        assert!(fx.cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::hostile_tile()));
        assert!(!fx.hostile().status.has_poison());

        fx.make_active(Fixture::HOSTILE);
        assert!(fx.cast(Fixture::HOSTILE, Fixture::BITE, Fixture::player_tile()));
        assert!(fx.player().status.has_poison());
    }

    #[test]
    fn lifesteal_heals_the_caster() {
        let mut fx = Fixture::duel();
        fx.spell_mut(Fixture::STRIKE).lifesteal_pct = 100;
        if let Some(player) = fx.state.combatant_mut(EntityId::PLAYER) {
            player.stats.hp = 10;
        }
        let report = fx
            .try_cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::hostile_tile())
            .expect("cast");
        assert_eq!(fx.player().stats.hp, 10 + report.total_damage());
    }

    #[test]
    fn capture_removes_a_weakened_hostile() {
        let mut fx = Fixture::duel();
        let def = fx.spell_mut(Fixture::STRIKE);
        def.damage_min = 1;
        def.damage_max = 1;
        def.capture = Some(CaptureSpec { max_hp_ratio: 0.25 });
        fx.add_hostile(EntityId(7), Position::new(6, 6));
        if let Some(hostile) = fx.state.combatant_mut(Fixture::HOSTILE) {
            hostile.stats.hp = 5;
        }

        let report = fx
            .try_cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::hostile_tile())
            .expect("cast");
        assert_eq!(report.captured, vec![Fixture::HOSTILE]);
        assert!(!fx.state.is_alive(Fixture::HOSTILE));
        assert_eq!(fx.state.captured.len(), 1);
        assert_eq!(fx.state.captured_ids, vec![Fixture::HOSTILE]);
    }

    #[test]
    fn killing_the_last_hostile_decides_victory() {
        let mut fx = Fixture::duel();
        if let Some(hostile) = fx.state.combatant_mut(Fixture::HOSTILE) {
            hostile.stats.hp = 1;
        }
        assert!(fx.cast(EntityId::PLAYER, Fixture::STRIKE, Fixture::hostile_tile()));
        assert_eq!(fx.state.outcome, crate::state::Outcome::Victory);
        assert!(
            fx.events
                .iter()
                .any(|e| matches!(e, CombatEvent::ActorDied { actor } if *actor == Fixture::HOSTILE))
        );
    }
}

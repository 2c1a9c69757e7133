//! Allied summons, monster adds and captures.
//!
//! The player materializes a previously captured monster once per combat.
//! Monster summoners call in hostile adds from a template. Both act right
//! after their summoner in the initiative queue.

use tracing::{debug, info};

use crate::ai::BehaviorProfile;
use crate::config::CombatConfig;
use crate::engine::insert_after;
use crate::env::{CombatEnv, GridOracle};
use crate::events::{CombatEvent, EventLog};
use crate::movement::is_walkable;
use crate::state::{ActorStats, CombatState, Combatant, EntityId, Position, Role, TemplateId};

/// A hostile taken by a capture spell, summonable in later combats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapturedMonster {
    pub template: TemplateId,
    pub level: u32,
    pub base_stats: ActorStats,
    pub name: String,
}

fn scaled(value: u32, factor: f32) -> u32 {
    (value as f32 * factor).round().max(0.0) as u32
}

/// Stats of a materialized summon.
///
/// Base stats grow with the level gap to the owner, then a share of the
/// owner's hp_max and elemental stats is added on top. Summons start at full hp.
pub fn derive_summon_stats(
    captured: &CapturedMonster,
    owner: &ActorStats,
    config: &CombatConfig,
) -> ActorStats {
    let gap = owner.level.saturating_sub(captured.level);
    let scale = config.summon_scale_base + config.summon_scale_per_level * gap as f32;
    let share = config.summon_owner_share;
    let base = &captured.base_stats;

    let hp_max = scaled(base.hp_max, scale) + scaled(owner.hp_max, share);
    let elements = base
        .elements
        .map(|v| (v as f32 * scale).round() as i32)
        .add(owner.elements.map(|v| (v as f32 * share).round() as i32));

    ActorStats {
        hp: hp_max,
        hp_max,
        action_points: base.action_points,
        move_points: base.move_points,
        initiative: scaled(base.initiative, scale),
        level: captured.level,
        elements,
    }
}

/// Free tile for a new summon: the target tile itself, then its neighbors,
/// then the caster's neighbors.
pub fn spawn_tile(
    state: &CombatState,
    grid: &dyn GridOracle,
    caster_tile: Position,
    target: Option<Position>,
) -> Option<Position> {
    let around_target = target
        .into_iter()
        .flat_map(|t| std::iter::once(t).chain(t.neighbors4()));
    around_target
        .chain(caster_tile.neighbors4())
        .find(|tile| *tile != caster_tile && is_walkable(state, grid, *tile))
}

/// Materializes the player's companion on `tile`.
///
/// Returns `None` if there is no companion, it was already used this combat,
/// or the owner is gone.
pub fn materialize_companion(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    owner: EntityId,
    tile: Position,
) -> Option<EntityId> {
    if state.summon_used {
        return None;
    }
    let companion = state.companion.clone()?;
    let owner_stats = state.combatant(owner)?.stats;
    let stats = derive_summon_stats(&companion, &owner_stats, env.config);

    let template = env.template(companion.template);
    let spells: Vec<_> = template.map(|t| t.spells.clone()).unwrap_or_default();
    let behavior = template
        .and_then(|t| t.behavior.clone())
        .or_else(|| spells.first().copied().map(BehaviorProfile::melee));

    let id = state.allocate_combat_id();
    let mut combatant = Combatant::new(id, Role::Summon, companion.name.clone(), stats)
        .at(tile)
        .with_template(companion.template)
        .with_spells(spells);
    combatant.behavior = behavior;
    combatant.owner = Some(owner);

    state.combatants.push(combatant);
    state.summon_used = true;
    insert_after(state, owner, id);
    events.push(CombatEvent::SummonSpawned {
        summon: id,
        owner,
        tile,
    });
    info!(
        target: "combat::summon",
        summon = %id,
        owner = %owner,
        %tile,
        hp = stats.hp_max,
        "companion materialized"
    );
    Some(id)
}

/// Spawns a hostile add from `template` next to a monster summoner.
///
/// Refused once the living hostiles reach the pack size limit.
pub fn spawn_add(
    state: &mut CombatState,
    env: &CombatEnv<'_>,
    events: &mut EventLog,
    summoner: EntityId,
    template: TemplateId,
    tile: Position,
) -> Option<EntityId> {
    if state.living_hostiles().count() >= env.config.max_pack_size {
        debug!(target: "combat::summon", summoner = %summoner, "pack is full");
        return None;
    }
    let template = env.template(template)?;

    let id = state.allocate_combat_id();
    let mut add = template.spawn(id).at(tile);
    add.owner = Some(summoner);
    state.combatants.push(add);
    insert_after(state, summoner, id);

    events.push(CombatEvent::SummonSpawned {
        summon: id,
        owner: summoner,
        tile,
    });
    debug!(
        target: "combat::summon",
        add = %id,
        summoner = %summoner,
        template = %template.id,
        %tile,
        "add spawned"
    );
    Some(id)
}

/// Removes a weakened hostile from the fight and records it for summoning.
pub fn capture(state: &mut CombatState, env: &CombatEnv<'_>, events: &mut EventLog, victim: EntityId) {
    let Some(target) = state.combatant_mut(victim) else {
        return;
    };
    target.stats.hp = 0;
    let template = target.template;
    let level = target.stats.level;
    let name = target.name.clone();
    let mut live_stats = target.stats;
    live_stats.hp = live_stats.hp_max;

    if let Some(template) = template {
        let base_stats = env.template(template).map_or(live_stats, |t| {
            let mut stats = t.stats;
            stats.hp = stats.hp_max;
            stats
        });
        state.captured.push(CapturedMonster {
            template,
            level,
            base_stats,
            name,
        });
    }
    state.captured_ids.push(victim);
    events.push(CombatEvent::ActorCaptured {
        actor: victim,
        template,
    });
    info!(target: "combat::summon", actor = %victim, ?template, "hostile captured");
}

/// Arms the owner's summon spell cooldown after its summon died.
pub fn on_summon_death(state: &mut CombatState, env: &CombatEnv<'_>, summon: EntityId) {
    let Some(owner) = state.combatant(summon).and_then(|c| c.owner) else {
        return;
    };
    let Some(spells) = state.combatant(owner).map(|c| c.spells.clone()) else {
        return;
    };
    for spell in spells {
        if let Some(spec) = env.spell(spell).and_then(|d| d.summon) {
            state.arm_cooldown(owner, spell, spec.death_cooldown_turns);
            debug!(
                target: "combat::summon",
                owner = %owner,
                spell = %spell,
                turns = spec.death_cooldown_turns,
                "summon died, spell on cooldown"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spell::{SpellDefinition, SummonSpec};
    use crate::state::ElementalStats;
    use crate::test_support::Fixture;

    const SUMMON: crate::spell::SpellId = crate::spell::SpellId(40);

    fn wolf() -> CapturedMonster {
        CapturedMonster {
            template: Fixture::HOSTILE_TEMPLATE,
            level: 3,
            base_stats: ActorStats {
                hp: 40,
                hp_max: 40,
                action_points: 6,
                move_points: 3,
                initiative: 10,
                level: 3,
                elements: ElementalStats::new(10, 0, 20, 0),
            },
            name: "wolf".into(),
        }
    }

    #[test]
    fn summon_stats_scale_with_level_gap_and_owner() {
        let owner = ActorStats {
            hp_max: 100,
            level: 8,
            elements: ElementalStats::new(20, 0, 0, 10),
            ..Default::default()
        };
        let stats = derive_summon_stats(&wolf(), &owner, &CombatConfig::default());

        // scale = 1.05 + 0.01 * 5 = 1.10
        assert_eq!(stats.hp_max, 44 + 50);
        assert_eq!(stats.hp, stats.hp_max);
        assert_eq!(stats.elements, ElementalStats::new(11 + 10, 0, 22, 5));
        assert_eq!(stats.initiative, 11);
    }

    #[test]
    fn lower_level_owner_gets_base_scaling_only() {
        let owner = ActorStats {
            hp_max: 10,
            level: 1,
            ..Default::default()
        };
        let stats = derive_summon_stats(&wolf(), &owner, &CombatConfig::default());
        assert_eq!(stats.hp_max, 42 + 5);
    }

    #[test]
    fn spawn_tile_prefers_the_target_then_neighbors() {
        let fx = Fixture::duel();
        let free = Position::new(5, 5);
        assert_eq!(
            spawn_tile(&fx.state, &fx.grid, Fixture::player_tile(), Some(free)),
            Some(free)
        );
        // The hostile's tile is taken, its north neighbor is next.
        assert_eq!(
            spawn_tile(
                &fx.state,
                &fx.grid,
                Fixture::player_tile(),
                Some(Fixture::hostile_tile())
            ),
            Some(Position::new(3, 1))
        );
    }

    #[test]
    fn companion_materializes_once_and_acts_next() {
        let mut fx = Fixture::duel();
        fx.state.companion = Some(wolf());
        let tile = Position::new(2, 3);

        let (state, env, events) = fx.parts();
        let id = materialize_companion(state, &env, events, EntityId::PLAYER, tile)
            .expect("companion spawned");
        assert_eq!(state.actors, vec![EntityId::PLAYER, id, Fixture::HOSTILE]);
        assert_eq!(state.position_of(id), Some(tile));
        assert!(state.summon_used);
        assert!(
            materialize_companion(state, &env, events, EntityId::PLAYER, Position::new(1, 2))
                .is_none()
        );
        assert!(matches!(
            events.iter().last(),
            Some(CombatEvent::SummonSpawned { .. })
        ));
    }

    #[test]
    fn summon_death_arms_the_owner_cooldown() {
        let mut fx = Fixture::duel();
        let mut def = SpellDefinition::new(SUMMON, "call", 2).with_range(1, 2);
        def.summon = Some(SummonSpec {
            template: None,
            death_cooldown_turns: 3,
        });
        fx.add_spell(def);
        fx.state
            .combatant_mut(EntityId::PLAYER)
            .expect("player")
            .spells
            .push(SUMMON);
        let summon = EntityId(EntityId::COMBAT_ONLY_BASE);
        fx.add_summon(summon, Position::new(2, 3));

        let (state, env, _) = fx.parts();
        on_summon_death(state, &env, summon);
        assert_eq!(state.cooldown_remaining(EntityId::PLAYER, SUMMON), 4);
        assert_eq!(state.cooldown_remaining(EntityId::PLAYER, Fixture::STRIKE), 0);
    }

    #[test]
    fn adds_respect_the_pack_limit() {
        let mut fx = Fixture::duel();
        fx.config.max_pack_size = 1;
        let (state, env, events) = fx.parts();
        let add = spawn_add(
            state,
            &env,
            events,
            Fixture::HOSTILE,
            Fixture::HOSTILE_TEMPLATE,
            Position::new(4, 2),
        );
        assert!(add.is_none());
    }

    #[test]
    fn capture_records_the_template() {
        let mut fx = Fixture::duel();
        let (state, env, events) = fx.parts();
        capture(state, &env, events, Fixture::HOSTILE);
        assert!(!state.is_alive(Fixture::HOSTILE));
        assert_eq!(state.captured.len(), 1);
        assert_eq!(state.captured[0].template, Fixture::HOSTILE_TEMPLATE);
        assert_eq!(state.captured[0].base_stats.hp, state.captured[0].base_stats.hp_max);
    }
}

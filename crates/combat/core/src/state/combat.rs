//! The authoritative per-encounter combat record.

use std::collections::BTreeMap;

use crate::challenge::Challenge;
use crate::env::SeededRng;
use crate::spell::SpellId;
use crate::state::{
    Combatant, EncounterId, EntityId, Position, ResourcePool, Role, Side, WorldMonsterSnapshot,
};
use crate::summon::CapturedMonster;

/// Result of an encounter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    #[default]
    None,
    Victory,
    Defeat,
    Unknown,
}

impl Outcome {
    pub fn is_decided(self) -> bool {
        !matches!(self, Outcome::None)
    }
}

/// Resource pools of the active actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnPools {
    pub action_points: ResourcePool,
    pub move_points: ResourcePool,
}

/// Remaining cooldown of one spell for one caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cooldown {
    pub actor: EntityId,
    pub spell: SpellId,
    pub turns: u32,
}

/// One live combat encounter.
///
/// # Invariants
///
/// - Exactly one actor is active: `actors[active_index]`.
/// - `round` increments only when the queue wraps back to index 0.
/// - Pools never go negative (`ResourcePool` only spends what it holds).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    pub encounter: EncounterId,
    pub in_progress: bool,
    pub round: u32,
    pub outcome: Outcome,

    /// Every participant of this encounter, dead or alive.
    pub combatants: Vec<Combatant>,
    /// Initiative-ordered queue of combatant ids.
    pub actors: Vec<EntityId>,
    pub active_index: usize,
    pub pools: TurnPools,

    pub casts_this_turn: BTreeMap<SpellId, u32>,
    pub cooldowns: Vec<Cooldown>,

    pub challenge: Option<Challenge>,
    pub world_snapshot: Option<WorldMonsterSnapshot>,

    /// Side that wins initiative ties. Drawn once per combat.
    pub initiative_coin: Option<Side>,

    /// Deterministic dice for every roll of this encounter.
    pub rng: SeededRng,

    /// Captured monster the player may materialize as a summon.
    pub companion: Option<CapturedMonster>,
    /// The player's summon can be materialized once per combat.
    pub summon_used: bool,
    /// Monsters captured during this encounter.
    pub captured: Vec<CapturedMonster>,
    /// Hostiles removed by a capture rather than killed.
    pub captured_ids: Vec<EntityId>,
    next_combat_id: u32,
}

impl CombatState {
    pub fn new(encounter: EncounterId, seed: u64) -> Self {
        Self {
            encounter,
            in_progress: false,
            round: 1,
            outcome: Outcome::None,
            combatants: Vec::new(),
            actors: Vec::new(),
            active_index: 0,
            pools: TurnPools::default(),
            casts_this_turn: BTreeMap::new(),
            cooldowns: Vec::new(),
            challenge: None,
            world_snapshot: None,
            initiative_coin: None,
            rng: SeededRng::new(seed),
            companion: None,
            summon_used: false,
            captured: Vec::new(),
            captured_ids: Vec::new(),
            next_combat_id: EntityId::COMBAT_ONLY_BASE,
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn player(&self) -> Option<&Combatant> {
        self.combatants.iter().find(|c| c.role == Role::Player)
    }

    pub fn player_id(&self) -> Option<EntityId> {
        self.player().map(|c| c.id)
    }

    pub fn summon(&self) -> Option<&Combatant> {
        self.combatants
            .iter()
            .find(|c| c.role == Role::Summon && c.is_alive())
    }

    /// Id of the actor whose turn it is.
    pub fn active_actor(&self) -> Option<EntityId> {
        self.actors.get(self.active_index).copied()
    }

    pub fn active_combatant(&self) -> Option<&Combatant> {
        self.active_actor().and_then(|id| self.combatant(id))
    }

    pub fn is_active_actor(&self, id: EntityId) -> bool {
        self.in_progress && self.active_actor() == Some(id)
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.combatant(id).is_some_and(Combatant::is_alive)
    }

    pub fn living(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter().filter(|c| c.is_alive())
    }

    pub fn living_on(&self, side: Side) -> impl Iterator<Item = &Combatant> {
        self.living().filter(move |c| c.side() == side)
    }

    pub fn living_hostiles(&self) -> impl Iterator<Item = &Combatant> {
        self.living().filter(|c| c.role == Role::Hostile)
    }

    pub fn any_hostile_alive(&self) -> bool {
        self.living_hostiles().next().is_some()
    }

    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.combatant(id).and_then(|c| c.position)
    }

    /// Living combatant standing on `tile`, if any.
    pub fn occupant_at(&self, tile: Position) -> Option<&Combatant> {
        self.living().find(|c| c.position == Some(tile))
    }

    pub fn is_occupied(&self, tile: Position) -> bool {
        self.occupant_at(tile).is_some()
    }

    /// Returns true if a living hostile to `id` stands at Manhattan distance 1.
    pub fn enemy_adjacent_to(&self, id: EntityId) -> bool {
        let Some(me) = self.combatant(id) else {
            return false;
        };
        let Some(pos) = me.position else {
            return false;
        };
        self.living()
            .filter(|c| c.is_hostile_to(me))
            .filter_map(|c| c.position)
            .any(|p| p.manhattan(pos) == 1)
    }

    // ========================================================================
    // Mutation helpers
    // ========================================================================

    /// Hands out an id for an entity that only exists inside this combat.
    ///
    /// Skips ids already taken by combatants the host placed in that range.
    pub fn allocate_combat_id(&mut self) -> EntityId {
        loop {
            let id = EntityId(self.next_combat_id);
            if self.next_combat_id == u32::MAX {
                return id;
            }
            self.next_combat_id += 1;
            if self.combatant(id).is_none() {
                return id;
            }
        }
    }

    pub fn cooldown_remaining(&self, actor: EntityId, spell: SpellId) -> u32 {
        self.cooldowns
            .iter()
            .find(|c| c.actor == actor && c.spell == spell)
            .map_or(0, |c| c.turns)
    }

    /// Blocks `spell` for the next `blocked_turns` turns of `actor`.
    ///
    /// Stored as the number of turn starts left: the counter is decremented at
    /// the start of each of the owner's turns and the spell is available once
    /// it reaches zero.
    pub fn arm_cooldown(&mut self, actor: EntityId, spell: SpellId, blocked_turns: u32) {
        if blocked_turns == 0 {
            self.cooldowns
                .retain(|c| !(c.actor == actor && c.spell == spell));
            return;
        }
        let turns = blocked_turns + 1;
        match self
            .cooldowns
            .iter_mut()
            .find(|c| c.actor == actor && c.spell == spell)
        {
            Some(existing) => existing.turns = existing.turns.max(turns),
            None => self.cooldowns.push(Cooldown {
                actor,
                spell,
                turns,
            }),
        }
    }

    /// Decrements the cooldowns of `actor` at the start of its turn.
    pub fn tick_cooldowns(&mut self, actor: EntityId) {
        for cooldown in self.cooldowns.iter_mut().filter(|c| c.actor == actor) {
            cooldown.turns = cooldown.turns.saturating_sub(1);
        }
        self.cooldowns.retain(|c| c.turns > 0);
    }

    pub fn casts_of(&self, spell: SpellId) -> u32 {
        self.casts_this_turn.get(&spell).copied().unwrap_or(0)
    }

    /// Resets the pools to the active actor's base values.
    pub fn reset_pools_for_active(&mut self) {
        let (ap, mp) = self
            .active_combatant()
            .map_or((0, 0), |c| (c.stats.action_points, c.turn_move_points()));
        self.pools.action_points.reset(ap);
        self.pools.move_points.reset(mp);
    }

    /// Clears per-combat transient state carried by combatants.
    pub fn clear_transient(&mut self) {
        for combatant in &mut self.combatants {
            combatant.status.clear();
            combatant.charges = Default::default();
        }
        self.cooldowns.clear();
        self.casts_this_turn.clear();
        self.pools = TurnPools::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ActorStats;

    fn combatant(id: u32, role: Role, hp: u32, tile: Position) -> Combatant {
        let stats = ActorStats {
            hp,
            hp_max: 50,
            action_points: 6,
            move_points: 3,
            initiative: 10,
            ..Default::default()
        };
        Combatant::new(EntityId(id), role, "c", stats).at(tile)
    }

    #[test]
    fn cooldown_blocks_the_next_owner_turns() {
        let mut state = CombatState::new(EncounterId(1), 7);
        state.arm_cooldown(EntityId(1), SpellId(3), 2);
        state.arm_cooldown(EntityId(2), SpellId(3), 1);

        // Turn starts of actor 1: blocked, blocked, available.
        state.tick_cooldowns(EntityId(1));
        assert!(state.cooldown_remaining(EntityId(1), SpellId(3)) > 0);
        state.tick_cooldowns(EntityId(1));
        assert!(state.cooldown_remaining(EntityId(1), SpellId(3)) > 0);
        state.tick_cooldowns(EntityId(1));
        assert_eq!(state.cooldown_remaining(EntityId(1), SpellId(3)), 0);

        // Actor 2 was never ticked.
        assert_eq!(state.cooldown_remaining(EntityId(2), SpellId(3)), 2);
    }

    #[test]
    fn dead_combatants_do_not_occupy_tiles() {
        let mut state = CombatState::new(EncounterId(1), 7);
        state
            .combatants
            .push(combatant(0, Role::Player, 10, Position::new(1, 1)));
        state
            .combatants
            .push(combatant(1, Role::Hostile, 0, Position::new(2, 1)));

        assert!(state.is_occupied(Position::new(1, 1)));
        assert!(!state.is_occupied(Position::new(2, 1)));
        assert!(!state.enemy_adjacent_to(EntityId::PLAYER));
    }

    #[test]
    fn combat_only_ids_are_unique() {
        let mut state = CombatState::new(EncounterId(1), 7);
        let a = state.allocate_combat_id();
        let b = state.allocate_combat_id();
        assert_ne!(a, b);
        assert!(a.is_combat_only());
    }
}

//! Per-archetype decision procedures for computer-controlled combatants.
//!
//! # Architecture
//!
//! Every procedure is a pure function of the combat state: it reads an
//! [`AiContext`] and returns the next [`AiAction`]. It never mutates the state
//! itself. The runtime driver executes the action through the engine, waits
//! for the presentation delay, and asks again until the procedure answers
//! [`AiAction::EndTurn`].
//!
//! ```text
//! turn starts ─▶ decide ─▶ Move / Cast / Summon ─▶ execute ─▶ decide ─▶ … ─▶ EndTurn
//! ```
//!
//! [`TurnMemory`] carries what happened earlier in the same turn (casts,
//! moves, phase) so every procedure makes progress and ends. A hard step cap
//! from [`CombatConfig::ai_step_cap`](crate::config::CombatConfig) ends the
//! turn regardless of the archetype.
//!
//! # Archetypes
//!
//! - [`Archetype::MeleeApproach`]: path to adjacency, hit up to `max_casts` times
//! - [`Archetype::RangedKiter`]: cast from a firing tile, then back off
//! - [`Archetype::Hybrid`]: ranged spell when in band, melee otherwise
//! - [`Archetype::Support`]: move to the tile covering most allies, buff, engage
//! - [`Archetype::Poisoner`]: one damage-over-time cast per turn around a melee hit
//!
//! Any profile may carry a `summon_spell`, tried once before the main action.
//! Allied summons always use the melee procedure.

mod hybrid;
mod melee;
pub mod pathfinding;
mod poison;
mod ranged;
mod summoner;
mod support;

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::env::CombatEnv;
use crate::movement::resolve_position;
use crate::spell::{self, SpellDefinition, SpellId};
use crate::state::{CombatState, Combatant, EntityId, Position, Role};

/// Decision procedure family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::EnumIter, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Archetype {
    #[default]
    MeleeApproach,
    RangedKiter,
    Hybrid,
    Support,
    Poisoner,
}

/// Behavior of one monster species.
///
/// `secondary_spell` is the ranged spell of a hybrid, the buff of a support
/// and the damage-over-time spell of a poisoner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BehaviorProfile {
    pub archetype: Archetype,
    pub primary_spell: SpellId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub secondary_spell: Option<SpellId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summon_spell: Option<SpellId>,
    /// Casts of the primary spell per turn.
    #[cfg_attr(feature = "serde", serde(default = "BehaviorProfile::default_max_casts"))]
    pub max_casts: u32,
}

impl BehaviorProfile {
    pub const DEFAULT_MAX_CASTS: u32 = 2;

    fn default_max_casts() -> u32 {
        Self::DEFAULT_MAX_CASTS
    }

    pub fn new(archetype: Archetype, primary_spell: SpellId) -> Self {
        Self {
            archetype,
            primary_spell,
            secondary_spell: None,
            summon_spell: None,
            max_casts: Self::DEFAULT_MAX_CASTS,
        }
    }

    /// Plain melee profile, used for summons and combatants without one.
    pub fn melee(primary_spell: SpellId) -> Self {
        Self::new(Archetype::MeleeApproach, primary_spell)
    }

    pub fn with_secondary(mut self, spell: SpellId) -> Self {
        self.secondary_spell = Some(spell);
        self
    }

    pub fn with_summon(mut self, spell: SpellId) -> Self {
        self.summon_spell = Some(spell);
        self
    }

    pub fn with_max_casts(mut self, max_casts: u32) -> Self {
        self.max_casts = max_casts;
        self
    }
}

/// Next step chosen by a decision procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiAction {
    /// Walk `path` (start tile excluded).
    Move(Vec<Position>),
    Cast { spell: SpellId, target: Position },
    /// Cast a summon spell on a free tile.
    Summon { spell: SpellId, tile: Position },
    EndTurn,
}

/// Progress of a multi-step routine within one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AiPhase {
    #[default]
    Opening,
    /// Main action underway.
    Engage,
    /// Attacks done, spending what is left of the move points to back off.
    Withdraw,
}

/// What the acting combatant already did this turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnMemory {
    pub actor: Option<EntityId>,
    pub round: u32,
    pub steps: u32,
    pub moves: u32,
    pub casts: BTreeMap<SpellId, u32>,
    pub phase: AiPhase,
    pub summon_tried: bool,
    pub buffed: bool,
    pub poisoned: bool,
    pub retreated: bool,
}

impl TurnMemory {
    pub fn new(actor: EntityId, round: u32) -> Self {
        Self {
            actor: Some(actor),
            round,
            ..Self::default()
        }
    }

    pub fn casts_of(&self, spell: SpellId) -> u32 {
        self.casts.get(&spell).copied().unwrap_or(0)
    }

    pub fn total_casts(&self) -> u32 {
        self.casts.values().sum()
    }

    fn record(&mut self, action: &AiAction) {
        match action {
            AiAction::Move(_) => self.moves += 1,
            AiAction::Cast { spell, .. } | AiAction::Summon { spell, .. } => {
                *self.casts.entry(*spell).or_default() += 1;
            }
            AiAction::EndTurn => {}
        }
        self.steps += 1;
    }
}

/// Read-only view handed to every decision procedure.
pub struct AiContext<'a> {
    pub actor: EntityId,
    pub state: &'a CombatState,
    pub env: CombatEnv<'a>,
    pub me: &'a Combatant,
    pub tile: Position,
    pub profile: BehaviorProfile,
}

impl<'a> AiContext<'a> {
    /// Builds the view for `actor`. `None` when the actor is gone, has no tile
    /// or knows no spell at all.
    pub fn new(state: &'a CombatState, env: CombatEnv<'a>, actor: EntityId) -> Option<Self> {
        let me = state.combatant(actor).filter(|c| c.is_alive())?;
        let tile = resolve_position(state, env.grid, actor)?;
        let profile = match (&me.behavior, me.role) {
            (Some(profile), Role::Hostile) => profile.clone(),
            (Some(profile), _) => BehaviorProfile::melee(profile.primary_spell),
            (None, _) => BehaviorProfile::melee(*me.spells.first()?),
        };
        Some(Self {
            actor,
            state,
            env,
            me,
            tile,
            profile,
        })
    }

    pub fn move_points(&self) -> u32 {
        self.state.pools.move_points.current
    }

    pub fn spell(&self, id: SpellId) -> Option<&'a SpellDefinition> {
        self.env.spell(id)
    }

    pub fn can_cast(&self, spell: SpellId) -> bool {
        spell::can_cast(self.state, &self.env, self.actor, spell)
    }

    pub fn can_cast_at(&self, spell: SpellId, tile: Position) -> bool {
        spell::can_cast_at_tile(self.state, &self.env, self.actor, spell, tile)
    }

    /// Nearest living enemy.
    pub fn target(&self) -> Option<(&'a Combatant, Position)> {
        nearest_enemy(self.state, self.me, self.tile)
    }

    pub fn is_adjacent(&self, tile: Position) -> bool {
        self.tile.manhattan(tile) == 1
    }

    /// Path toward adjacency with `target`, capped by the move points left.
    pub fn approach(&self, target: Position) -> Vec<Position> {
        pathfinding::path_to_adjacent(
            self.state,
            self.env.grid,
            self.tile,
            target,
            self.move_points(),
        )
    }
}

/// Nearest living enemy of `me` seen from `from`. Ties go to the lower hp,
/// then the lower id.
pub fn nearest_enemy<'a>(
    state: &'a CombatState,
    me: &Combatant,
    from: Position,
) -> Option<(&'a Combatant, Position)> {
    state
        .living()
        .filter(|c| c.is_hostile_to(me))
        .filter_map(|c| c.position.map(|p| (c, p)))
        .min_by_key(|(c, p)| (p.manhattan(from), c.stats.hp, c.id))
}

/// Chooses the next action of `actor` and records it in `memory`.
///
/// `memory` is reset automatically when a new turn starts for a different
/// actor or round.
pub fn decide(
    state: &CombatState,
    env: CombatEnv<'_>,
    actor: EntityId,
    memory: &mut TurnMemory,
) -> AiAction {
    if memory.actor != Some(actor) || memory.round != state.round {
        *memory = TurnMemory::new(actor, state.round);
    }

    let action = choose(state, env, actor, memory);
    memory.record(&action);
    trace!(
        target: "combat::ai",
        actor = %actor,
        step = memory.steps,
        phase = %memory.phase,
        ?action,
        "decided"
    );
    action
}

fn choose(
    state: &CombatState,
    env: CombatEnv<'_>,
    actor: EntityId,
    memory: &mut TurnMemory,
) -> AiAction {
    if memory.steps >= env.config.ai_step_cap {
        debug!(target: "combat::ai", actor = %actor, "step cap reached");
        return AiAction::EndTurn;
    }
    if !state.is_active_actor(actor) {
        return AiAction::EndTurn;
    }
    let Some(ctx) = AiContext::new(state, env, actor) else {
        debug!(target: "combat::ai", actor = %actor, "no usable context, passing");
        return AiAction::EndTurn;
    };

    if let Some(action) = summoner::pre_action(&ctx, memory) {
        return action;
    }

    if ctx.me.role == Role::Summon {
        return melee::decide(&ctx, memory);
    }
    match ctx.profile.archetype {
        Archetype::MeleeApproach => melee::decide(&ctx, memory),
        Archetype::RangedKiter => ranged::decide(&ctx, memory),
        Archetype::Hybrid => hybrid::decide(&ctx, memory),
        Archetype::Support => support::decide(&ctx, memory),
        Archetype::Poisoner => poison::decide(&ctx, memory),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Fixture;

    #[test]
    fn passive_actor_ends_immediately() {
        let mut fx = Fixture::duel();
        let mut memory = TurnMemory::default();
        let (state, env, _) = fx.parts();
        assert_eq!(
            decide(state, env, Fixture::HOSTILE, &mut memory),
            AiAction::EndTurn
        );
    }

    #[test]
    fn step_cap_ends_the_turn() {
        let mut fx = Fixture::duel();
        fx.config.ai_step_cap = 0;
        fx.make_active(Fixture::HOSTILE);
        let mut memory = TurnMemory::default();
        let (state, env, _) = fx.parts();
        assert_eq!(
            decide(state, env, Fixture::HOSTILE, &mut memory),
            AiAction::EndTurn
        );
    }

    #[test]
    fn memory_resets_for_a_new_actor() {
        let mut memory = TurnMemory::new(EntityId(9), 3);
        memory.steps = 5;
        let mut fx = Fixture::duel();
        let (state, env, _) = fx.parts();
        decide(state, env, EntityId::PLAYER, &mut memory);
        assert_eq!(memory.actor, Some(EntityId::PLAYER));
        assert_eq!(memory.steps, 1);
    }

    #[test]
    fn nearest_enemy_breaks_ties_on_hp() {
        let mut fx = Fixture::duel();
        let other = EntityId(2);
        fx.add_hostile(other, Position::new(1, 2));
        fx.set_hp(other, 5, 40);
        let player = fx.player().clone();
        let (enemy, tile) =
            nearest_enemy(&fx.state, &player, Fixture::player_tile()).expect("enemy");
        assert_eq!(enemy.id, other);
        assert_eq!(tile, Position::new(1, 2));
    }
}

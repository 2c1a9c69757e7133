//! Encounter orchestration.
//!
//! [`CombatSession`] owns at most one encounter at a time and walks it
//! through `Idle -> Preparation -> Active -> Ended -> Idle`. Rules live in
//! `combat-core`; the session sequences them, paces them with deferred steps
//! and talks to the world, inventory and respawn collaborators.

mod driver;
mod finalize;

use std::sync::Arc;

use combat_content::PlayerProfile;
use combat_core::challenge;
use combat_core::placement::{self, PlacementRequest};
use combat_core::spell;
use combat_core::{
    CapturedMonster, Challenge, CombatAction, CombatResult, CombatState, Combatant, EncounterId,
    EntityId, EventLog, PlacementState, Position, Role, SeededRng, SpellId, SpellPreview,
    StartRequest, TemplateId, TurnMemory, WorldMonsterSnapshot, compute_seed, start_combat,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::events::{Controller, EndReason, Event, EventBus, LifecycleEvent, Topic};
use crate::hooks::{CombatEndHook, HookRegistry};
use crate::oracle::OracleManager;
use crate::scheduler::{Scheduler, Step};
use crate::world::{EntityWorld, Inventory, RespawnScheduler};

/// Seed contexts of the two dice an encounter uses.
const PREPARATION_SEED: u32 = 0;
const COMBAT_SEED: u32 = 1;

/// Lifecycle phase of the session.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Preparation,
    Active,
    /// Settled, waiting for the release step.
    Ended,
}

/// Placement phase of an encounter that has not started yet.
#[derive(Debug, Clone)]
pub struct Preparation {
    pub encounter: EncounterId,
    pub hostile: EntityId,
    pub snapshot: WorldMonsterSnapshot,
    /// Templates of every participant, the encountered hostile first.
    pub pack: Vec<TemplateId>,
    pub placement: PlacementState,
    /// Drawn once here and carried into combat.
    pub challenge: Option<Challenge>,
}

/// Runs encounters against the host's collaborators.
pub struct CombatSession<W, I, R> {
    config: RuntimeConfig,
    oracles: OracleManager,
    player: PlayerProfile,
    companion: Option<CapturedMonster>,
    world: W,
    inventory: I,
    respawns: R,
    hooks: HookRegistry,
    bus: EventBus,
    scheduler: Scheduler,
    phase: Phase,
    base_seed: u64,
    encounters_started: u64,
    encounter: Option<EncounterId>,
    preparation: Option<Preparation>,
    combat: Option<CombatState>,
    events: EventLog,
    memory: TurnMemory,
    hidden: Vec<EntityId>,
    finalizing: bool,
    last_result: Option<CombatResult>,
}

impl<W, I, R> CombatSession<W, I, R>
where
    W: EntityWorld,
    I: Inventory,
    R: RespawnScheduler,
{
    /// Create a new session builder around the host's collaborators.
    pub fn builder(world: W, inventory: I, respawns: R) -> SessionBuilder<W, I, R> {
        SessionBuilder {
            config: RuntimeConfig::default(),
            oracles: None,
            player: None,
            hooks: Vec::new(),
            world,
            inventory,
            respawns,
        }
    }

    // ========================================================================
    // Preparation
    // ========================================================================

    /// Engages a world hostile and computes the placement.
    ///
    /// `pack` lists the templates fighting alongside it; when empty, the
    /// hostile's own pack is used. The pack is capped at `max_pack_size`,
    /// the encountered hostile included.
    pub fn begin_preparation(
        &mut self,
        hostile: EntityId,
        pack: &[TemplateId],
    ) -> Result<EncounterId> {
        self.expect_phase(Phase::Idle)?;
        if self.player.stats.hp == 0 {
            return Err(RuntimeError::PlayerDown);
        }
        let monster = self
            .world
            .monster(hostile)
            .ok_or(RuntimeError::UnknownHostile(hostile))?;

        let extra = if pack.is_empty() {
            monster.pack.as_slice()
        } else {
            pack
        };
        let mut members = Vec::with_capacity(extra.len() + 1);
        members.push(monster.template);
        members.extend_from_slice(extra);
        members.truncate(self.config.combat.max_pack_size.max(1));
        if let Some(missing) = members
            .iter()
            .find(|t| self.oracles.template(**t).is_none())
        {
            return Err(RuntimeError::UnknownTemplate(*missing));
        }

        self.encounters_started += 1;
        let encounter = EncounterId(self.encounters_started);
        let mut rng = SeededRng::new(compute_seed(
            self.base_seed,
            encounter.0,
            PREPARATION_SEED,
        ));

        self.world.set_roaming_frozen(true);
        self.hidden = self.world.hide_monsters_except(&[hostile]);

        let placement = placement::prepare(
            self.oracles.grid(),
            &mut rng,
            PlacementRequest {
                patterns: &self.oracles.placement().patterns,
                map_anchors: self.oracles.anchors(),
                encountered_tile: monster.tile,
                player_tile: self.world.player_tile(),
                hostile_count: members.len(),
            },
        );
        let challenge = challenge::draw(
            self.oracles.challenges(),
            &mut rng,
            self.oracles.grid(),
            &placement.allowed_tiles,
            &placement.hostile_tiles,
            Some(placement.player_tile),
            self.player.stats.hp_max,
        );

        info!(
            target: "runtime::session",
            %encounter,
            hostile = %hostile,
            pack = members.len(),
            pattern = %placement.pattern,
            player_tile = %placement.player_tile,
            challenge = ?challenge.as_ref().map(|c| c.id.as_str()),
            "preparation started"
        );
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::PreparationStarted {
                encounter,
                hostile,
                pack: members.clone(),
                player_tile: placement.player_tile,
                challenge: challenge.as_ref().map(|c| c.id.clone()),
            }));

        self.preparation = Some(Preparation {
            encounter,
            hostile,
            snapshot: monster.snapshot(),
            pack: members,
            placement,
            challenge,
        });
        self.encounter = Some(encounter);
        self.phase = Phase::Preparation;
        Ok(encounter)
    }

    /// Moves the player to another allowed tile before confirming.
    pub fn choose_player_tile(&mut self, tile: Position) -> Result<()> {
        self.expect_phase(Phase::Preparation)?;
        let preparation = self
            .preparation
            .as_mut()
            .ok_or(RuntimeError::InvalidPhase {
                expected: Phase::Preparation,
                actual: self.phase,
            })?;
        preparation.placement.choose_player_tile(tile)?;
        debug!(target: "runtime::session", %tile, "player tile chosen");
        Ok(())
    }

    /// Ends preparation and starts the combat.
    pub fn confirm_ready(&mut self) -> Result<EncounterId> {
        self.expect_phase(Phase::Preparation)?;
        let preparation = self
            .preparation
            .take()
            .ok_or(RuntimeError::InvalidPhase {
                expected: Phase::Preparation,
                actual: self.phase,
            })?;
        let encounter = preparation.encounter;
        let player_tile = preparation.placement.player_tile;

        let player = Combatant::new(
            EntityId::PLAYER,
            Role::Player,
            self.player.name.clone(),
            self.player.stats,
        )
        .with_spells(self.player.spells.iter().copied())
        .at(player_tile);

        let mut hostiles = Vec::with_capacity(preparation.pack.len());
        let tiles = &preparation.placement.hostile_tiles;
        for (index, (template, tile)) in preparation.pack.iter().zip(tiles).enumerate() {
            let Some(template) = self.oracles.template(*template) else {
                continue;
            };
            let id = if index == 0 {
                preparation.hostile
            } else {
                EntityId(EntityId::COMBAT_ONLY_BASE + index as u32)
            };
            let mut combatant = template.spawn(id).at(*tile);
            if index == 0 {
                combatant.stats.hp = preparation.snapshot.hp.min(combatant.stats.hp_max).max(1);
            }
            hostiles.push(combatant);
        }
        if hostiles.len() < preparation.pack.len() {
            debug!(
                target: "runtime::session",
                %encounter,
                placed = hostiles.len(),
                pack = preparation.pack.len(),
                "not every pack member found a tile"
            );
        }

        let request = StartRequest {
            encounter,
            seed: compute_seed(self.base_seed, encounter.0, COMBAT_SEED),
            player,
            hostiles,
            companion: self.companion.clone(),
            challenge: preparation.challenge,
            world_snapshot: Some(preparation.snapshot),
        };
        let env = self.oracles.as_combat_env();
        let state = start_combat(request, &env, self.oracles.challenges(), &mut self.events);
        let order = state.actors.clone();

        self.world.sync_position(EntityId::PLAYER, player_tile);
        if let Some(tile) = state.combatant(preparation.hostile).and_then(|c| c.position) {
            self.world.sync_position(preparation.hostile, tile);
        }

        self.combat = Some(state);
        self.memory = TurnMemory::default();
        self.phase = Phase::Active;
        self.flush_events();
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::CombatStarted {
                encounter,
                order,
            }));
        self.scheduler.schedule(encounter, 0, Step::BeginTurn);
        Ok(encounter)
    }

    // ========================================================================
    // Player input
    // ========================================================================

    /// Casts for the player. False when rejected; nothing is spent then.
    pub fn cast_spell(&mut self, spell: SpellId, tile: Position) -> bool {
        let Some(encounter) = self.player_turn() else {
            return false;
        };
        let action = CombatAction::Cast {
            actor: EntityId::PLAYER,
            spell,
            target: tile,
        };
        self.execute(encounter, &action).is_ok()
    }

    /// Walks the player along `path` (start tile excluded).
    pub fn move_player(&mut self, path: &[Position]) -> bool {
        let Some(encounter) = self.player_turn() else {
            return false;
        };
        let action = CombatAction::Move {
            actor: EntityId::PLAYER,
            path: path.to_vec(),
        };
        self.execute(encounter, &action).is_ok()
    }

    pub fn end_player_turn(&mut self) -> bool {
        let Some(encounter) = self.player_turn() else {
            return false;
        };
        let action = CombatAction::EndTurn {
            actor: EntityId::PLAYER,
        };
        self.execute(encounter, &action).is_ok()
    }

    /// Leaves the encounter.
    ///
    /// During preparation nothing was fought and the world is put back. An
    /// active combat is settled right away with the fallback outcome.
    pub fn flee(&mut self) -> Result<Option<CombatResult>> {
        self.abandon(EndReason::Fled)
    }

    /// Same settlement as [`flee`](Self::flee), recorded as a disconnect.
    pub fn disconnect(&mut self) -> Result<Option<CombatResult>> {
        self.abandon(EndReason::Disconnected)
    }

    fn abandon(&mut self, reason: EndReason) -> Result<Option<CombatResult>> {
        match self.phase {
            Phase::Preparation => {
                self.cancel_preparation(reason);
                Ok(None)
            }
            Phase::Active => self.finalize(reason).map(Some),
            actual => Err(RuntimeError::InvalidPhase {
                expected: Phase::Active,
                actual,
            }),
        }
    }

    fn cancel_preparation(&mut self, reason: EndReason) {
        let Some(preparation) = self.preparation.take() else {
            return;
        };
        self.world.unhide_monsters(&self.hidden);
        self.hidden.clear();
        self.world.set_roaming_frozen(false);
        self.phase = Phase::Idle;
        self.encounter = None;

        info!(
            target: "runtime::session",
            encounter = %preparation.encounter,
            %reason,
            "preparation cancelled"
        );
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::PreparationCancelled {
                encounter: preparation.encounter,
            }));
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Advances the clock and runs every step that came due.
    pub fn tick(&mut self, elapsed_ms: u64) -> usize {
        self.scheduler.advance(elapsed_ms);
        let mut ran = 0;
        while let Some(step) = self.scheduler.pop_due() {
            self.run_step(step);
            ran += 1;
        }
        ran
    }

    /// Runs pending steps without waiting for their delays.
    ///
    /// Returns once nothing is scheduled: the session is idle or waits for
    /// player input.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ran = 0;
        while let Some(step) = self.scheduler.pop_next() {
            self.run_step(step);
            ran += 1;
            if ran >= driver::MAX_STEPS_PER_RUN {
                tracing::warn!(
                    target: "runtime::session",
                    ran,
                    pending = self.scheduler.len(),
                    "step budget exhausted"
                );
                break;
            }
        }
        ran
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn encounter(&self) -> Option<EncounterId> {
        self.encounter
    }

    pub fn current_actor(&self) -> Option<EntityId> {
        self.combat.as_ref().and_then(CombatState::active_actor)
    }

    /// True when the session waits for player input.
    pub fn is_player_turn(&self) -> bool {
        self.player_turn().is_some()
    }

    pub fn initiative_order(&self) -> &[EntityId] {
        self.combat
            .as_ref()
            .map_or(&[][..], |state| state.actors.as_slice())
    }

    /// `(hp, hp_max)` of a combatant.
    pub fn actor_hp(&self, id: EntityId) -> Option<(u32, u32)> {
        let combatant = self.combat.as_ref()?.combatant(id)?;
        Some((combatant.stats.hp, combatant.stats.hp_max))
    }

    /// Objective and progress of the drawn challenge.
    pub fn challenge_status_text(&self) -> Option<String> {
        match (&self.combat, &self.preparation) {
            (Some(state), _) => {
                let challenge = state.challenge.as_ref()?;
                Some(challenge.progress_text(state.player()?))
            }
            (None, Some(preparation)) => {
                let player = Combatant::new(
                    EntityId::PLAYER,
                    Role::Player,
                    self.player.name.clone(),
                    self.player.stats,
                )
                .at(preparation.placement.player_tile);
                Some(preparation.challenge.as_ref()?.progress_text(&player))
            }
            (None, None) => None,
        }
    }

    /// Targetable tiles of a player spell and the effect area under `hover`.
    pub fn preview(&self, spell: SpellId, hover: Option<Position>) -> Option<SpellPreview> {
        let state = self.combat.as_ref()?;
        let env = self.oracles.as_combat_env();
        spell::preview(state, &env, EntityId::PLAYER, spell, hover)
    }

    pub fn can_cast(&self, spell: SpellId) -> bool {
        self.combat.as_ref().is_some_and(|state| {
            spell::can_cast(state, &self.oracles.as_combat_env(), EntityId::PLAYER, spell)
        })
    }

    pub fn can_cast_at_tile(&self, spell: SpellId, tile: Position) -> bool {
        self.combat.as_ref().is_some_and(|state| {
            let env = self.oracles.as_combat_env();
            spell::can_cast_at_tile(state, &env, EntityId::PLAYER, spell, tile)
        })
    }

    pub fn preparation(&self) -> Option<&Preparation> {
        self.preparation.as_ref()
    }

    pub fn combat_state(&self) -> Option<&CombatState> {
        self.combat.as_ref()
    }

    pub fn last_result(&self) -> Option<&CombatResult> {
        self.last_result.as_ref()
    }

    pub fn player(&self) -> &PlayerProfile {
        &self.player
    }

    pub fn companion(&self) -> Option<&CapturedMonster> {
        self.companion.as_ref()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn pending_steps(&self) -> usize {
        self.scheduler.len()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn respawns(&self) -> &R {
        &self.respawns
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Event bus for subscriptions.
    pub fn events(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> Option<tokio::sync::broadcast::Receiver<Event>> {
        self.bus.subscribe(topic)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn expect_phase(&self, expected: Phase) -> Result<()> {
        if self.finalizing {
            return Err(RuntimeError::Reentrant);
        }
        if self.phase != expected {
            return Err(RuntimeError::InvalidPhase {
                expected,
                actual: self.phase,
            });
        }
        Ok(())
    }

    /// Encounter id when the player may act right now.
    fn player_turn(&self) -> Option<EncounterId> {
        if self.phase != Phase::Active || self.finalizing || self.config.autopilot {
            return None;
        }
        let state = self.combat.as_ref()?;
        if !state.in_progress || state.active_actor() != Some(EntityId::PLAYER) {
            return None;
        }
        self.encounter
    }

    fn controller_of(&self, actor: EntityId) -> Controller {
        if actor.is_player() && !self.config.autopilot {
            Controller::Player
        } else {
            Controller::Ai
        }
    }
}

/// Builder for [`CombatSession`].
pub struct SessionBuilder<W, I, R> {
    config: RuntimeConfig,
    oracles: Option<OracleManager>,
    player: Option<PlayerProfile>,
    hooks: Vec<Arc<dyn CombatEndHook>>,
    world: W,
    inventory: I,
    respawns: R,
}

impl<W, I, R> SessionBuilder<W, I, R>
where
    W: EntityWorld,
    I: Inventory,
    R: RespawnScheduler,
{
    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required content and map
    pub fn oracles(mut self, oracles: OracleManager) -> Self {
        self.oracles = Some(oracles);
        self
    }

    /// Set required player profile
    pub fn player(mut self, player: PlayerProfile) -> Self {
        self.player = Some(player);
        self
    }

    /// Register an end-of-combat hook.
    pub fn hook(mut self, hook: Arc<dyn CombatEndHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn build(self) -> Result<CombatSession<W, I, R>> {
        let oracles = self.oracles.ok_or(RuntimeError::MissingPart("oracles"))?;
        let player = self.player.ok_or(RuntimeError::MissingPart("player"))?;
        let companion = player.companion.and_then(|t| oracles.captured(t));
        let base_seed = self.config.resolve_seed();

        debug!(
            target: "runtime::session",
            base_seed,
            hooks = self.hooks.len(),
            companion = ?companion.as_ref().map(|c| c.name.as_str()),
            "session built"
        );
        Ok(CombatSession {
            bus: EventBus::with_capacity(self.config.event_buffer_size),
            config: self.config,
            oracles,
            player,
            companion,
            world: self.world,
            inventory: self.inventory,
            respawns: self.respawns,
            hooks: HookRegistry::new(self.hooks),
            scheduler: Scheduler::new(),
            phase: Phase::Idle,
            base_seed,
            encounters_started: 0,
            encounter: None,
            preparation: None,
            combat: None,
            events: EventLog::new(),
            memory: TurnMemory::default(),
            hidden: Vec::new(),
            finalizing: false,
            last_result: None,
        })
    }
}

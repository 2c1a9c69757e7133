//! Step driver: turn flow, AI actions and event publishing.

use combat_core::ai;
use combat_core::{
    ActionResult, AiAction, CombatAction, CombatEngine, CombatError, CombatEvent, EncounterId,
    EntityId, ExecuteError, TurnError, TurnMemory,
};
use tracing::{debug, info, trace, warn};

use super::{CombatSession, Phase};
use crate::events::{Controller, EndReason, Event, LifecycleEvent, TurnEvent};
use crate::scheduler::{DeferredStep, Step};
use crate::world::{EntityWorld, Inventory, RespawnScheduler};

/// Upper bound on steps run by one `run_until_idle` call.
pub(super) const MAX_STEPS_PER_RUN: usize = 100_000;

impl<W, I, R> CombatSession<W, I, R>
where
    W: EntityWorld,
    I: Inventory,
    R: RespawnScheduler,
{
    pub(super) fn run_step(&mut self, deferred: DeferredStep) {
        if self.encounter != Some(deferred.encounter) {
            trace!(
                target: "runtime::session",
                encounter = %deferred.encounter,
                step = ?deferred.step,
                "stale step dropped"
            );
            return;
        }

        match (deferred.step, self.phase) {
            (Step::BeginTurn, Phase::Active) => self.begin_turn(deferred.encounter),
            (Step::AiThink { actor }, Phase::Active) => self.ai_think(deferred.encounter, actor),
            (Step::Finalize, Phase::Active) => {
                if let Err(error) = self.finalize(EndReason::Decided) {
                    debug!(target: "runtime::session", %error, "finalize step skipped");
                }
            }
            (Step::Release, Phase::Ended) => self.release(deferred.encounter),
            (step, phase) => trace!(
                target: "runtime::session",
                ?step,
                %phase,
                "step no longer applies"
            ),
        }
    }

    /// Hands the active actor to the AI, or waits for player input.
    fn begin_turn(&mut self, encounter: EncounterId) {
        let Some(state) = self.combat.as_ref() else {
            return;
        };
        if !state.in_progress {
            return;
        }
        let Some(actor) = state.active_actor() else {
            return;
        };

        match self.controller_of(actor) {
            Controller::Player => {
                debug!(target: "runtime::session", %encounter, "awaiting player input");
            }
            Controller::Ai => {
                self.scheduler.schedule(
                    encounter,
                    self.config.timing.ai_think_ms,
                    Step::AiThink { actor },
                );
            }
        }
    }

    /// One AI decision, executed right away.
    fn ai_think(&mut self, encounter: EncounterId, actor: EntityId) {
        let env = self.oracles.as_combat_env();
        let Some(state) = self.combat.as_ref() else {
            return;
        };
        if !state.in_progress || state.active_actor() != Some(actor) {
            trace!(target: "runtime::session", actor = %actor, "actor no longer active");
            return;
        }

        let decision = ai::decide(state, env, actor, &mut self.memory);
        let action = match decision {
            AiAction::Move(path) => CombatAction::Move { actor, path },
            AiAction::Cast { spell, target } | AiAction::Summon { spell, tile: target } => {
                CombatAction::Cast {
                    actor,
                    spell,
                    target,
                }
            }
            AiAction::EndTurn => CombatAction::EndTurn { actor },
        };

        if let Err(error) = self.execute(encounter, &action)
            && !matches!(action, CombatAction::EndTurn { .. })
        {
            debug!(
                target: "runtime::session",
                actor = %actor,
                %error,
                "ai action rejected, ending turn"
            );
            self.end_rejected_turn(encounter, actor);
        }
    }

    /// Ends `actor`'s turn after a rejected decision. Returns false when the
    /// engine refuses that too, which leaves nothing scheduled.
    fn end_rejected_turn(&mut self, encounter: EncounterId, actor: EntityId) -> bool {
        match self.execute(encounter, &CombatAction::EndTurn { actor }) {
            Ok(_) => true,
            Err(error) => {
                warn!(
                    target: "runtime::session",
                    %encounter,
                    actor = %actor,
                    code = error.error_code(),
                    %error,
                    "fallback end turn rejected, combat stalls"
                );
                false
            }
        }
    }

    /// Runs one action through the engine, publishes what happened and
    /// schedules the continuation.
    pub(super) fn execute(
        &mut self,
        encounter: EncounterId,
        action: &CombatAction,
    ) -> Result<ActionResult, ExecuteError> {
        let env = self.oracles.as_combat_env();
        let Some(state) = self.combat.as_mut() else {
            return Err(TurnError::NotInProgress.into());
        };
        let result = CombatEngine::new(state, env, &mut self.events).execute(action);
        let decided = state.outcome.is_decided();
        self.flush_events();

        let timing = self.config.timing;
        let actor = action.actor();
        match &result {
            Ok(ActionResult::Cast(_)) => self.after_action(encounter, actor, decided, timing.cast_ms),
            Ok(ActionResult::Moved { steps }) => self.after_action(
                encounter,
                actor,
                decided,
                u64::from(*steps) * timing.move_step_ms,
            ),
            Ok(ActionResult::TurnEnded(_)) => {
                self.memory = TurnMemory::default();
                let step = if decided {
                    Step::Finalize
                } else {
                    Step::BeginTurn
                };
                self.scheduler
                    .schedule(encounter, timing.turn_transition_ms, step);
            }
            Err(error) => {
                debug!(
                    target: "runtime::session",
                    actor = %actor,
                    %error,
                    "action rejected"
                );
                if decided {
                    self.scheduler
                        .schedule(encounter, timing.turn_transition_ms, Step::Finalize);
                }
            }
        }
        result
    }

    /// Waits out the animation, then settles the encounter or lets the AI
    /// continue its turn.
    fn after_action(&mut self, encounter: EncounterId, actor: EntityId, decided: bool, delay_ms: u64) {
        if decided {
            self.scheduler.schedule(encounter, delay_ms, Step::Finalize);
        } else if self.controller_of(actor) == Controller::Ai {
            self.scheduler
                .schedule(encounter, delay_ms, Step::AiThink { actor });
        }
    }

    /// Drains the rule events, mirrors moves into the world and publishes.
    pub(super) fn flush_events(&mut self) {
        let drained = self.events.drain();
        let Some(encounter) = self.encounter else {
            return;
        };
        for event in drained {
            match &event {
                CombatEvent::ActorMoved { actor, to, .. } => {
                    self.world.sync_position(*actor, *to);
                }
                CombatEvent::TurnChanged { actor, round } => {
                    self.bus.publish(Event::Turn(TurnEvent {
                        encounter,
                        actor: *actor,
                        round: *round,
                        controller: self.controller_of(*actor),
                    }));
                }
                _ => {}
            }
            trace!(target: "runtime::events", %encounter, kind = event.kind(), "combat event");
            self.bus.publish(Event::Combat { encounter, event });
        }
    }

    /// Discards the ended encounter.
    fn release(&mut self, encounter: EncounterId) {
        self.phase = Phase::Idle;
        self.encounter = None;
        self.memory = TurnMemory::default();
        info!(target: "runtime::session", %encounter, "session idle");
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::SessionIdle { encounter }));
    }
}

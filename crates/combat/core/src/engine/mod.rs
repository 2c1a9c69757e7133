//! Turn machine and action execution pipeline.
//!
//! The [`CombatEngine`] is the single entry point the runtime uses to mutate a
//! [`CombatState`]. Player input and AI decisions both arrive as
//! [`CombatAction`]s and flow through the same validation, so a host replaying
//! the same actions with the same seed reaches the same state.

mod errors;
pub mod outcome;
pub mod turns;

pub use errors::{ExecuteError, TurnError};
pub use outcome::{classify_fallback, evaluate_outcome};
pub use turns::{TurnAdvance, build_turn_order, end_turn, insert_after, try_end_turn};

use crate::challenge::ChallengeStatus;
use crate::env::CombatEnv;
use crate::events::EventLog;
use crate::movement;
use crate::spell::{self, CastReport, SpellId, SpellPreview};
use crate::state::{CombatState, EntityId, Position};

/// An action submitted by the player or chosen by the AI.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatAction {
    Cast {
        actor: EntityId,
        spell: SpellId,
        target: Position,
    },
    Move {
        actor: EntityId,
        path: Vec<Position>,
    },
    EndTurn {
        actor: EntityId,
    },
}

impl CombatAction {
    pub fn actor(&self) -> EntityId {
        match self {
            CombatAction::Cast { actor, .. }
            | CombatAction::Move { actor, .. }
            | CombatAction::EndTurn { actor } => *actor,
        }
    }
}

/// What an executed action did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionResult {
    Cast(CastReport),
    Moved { steps: u32 },
    TurnEnded(TurnAdvance),
}

/// Combat engine bound to one encounter's state for the duration of a call.
pub struct CombatEngine<'a> {
    state: &'a mut CombatState,
    env: CombatEnv<'a>,
    events: &'a mut EventLog,
}

impl<'a> CombatEngine<'a> {
    pub fn new(state: &'a mut CombatState, env: CombatEnv<'a>, events: &'a mut EventLog) -> Self {
        Self { state, env, events }
    }

    pub fn state(&self) -> &CombatState {
        self.state
    }

    /// Executes one action. Rejected actions leave the state untouched.
    pub fn execute(&mut self, action: &CombatAction) -> Result<ActionResult, ExecuteError> {
        match action {
            CombatAction::Cast {
                actor,
                spell,
                target,
            } => {
                let report =
                    spell::try_cast(self.state, &self.env, self.events, *actor, *spell, *target)?;
                Ok(ActionResult::Cast(report))
            }
            CombatAction::Move { actor, path } => {
                let steps = movement::move_along(self.state, &self.env, self.events, *actor, path)?;
                Ok(ActionResult::Moved { steps })
            }
            CombatAction::EndTurn { actor } => {
                let active = self.state.active_actor().ok_or(TurnError::EmptyQueue)?;
                if active != *actor {
                    return Err(TurnError::NotActive {
                        actor: *actor,
                        active,
                    }
                    .into());
                }
                let advance = try_end_turn(self.state, &self.env, self.events)?;
                Ok(ActionResult::TurnEnded(advance))
            }
        }
    }

    pub fn can_cast(&self, actor: EntityId, spell: SpellId) -> bool {
        spell::can_cast(self.state, &self.env, actor, spell)
    }

    pub fn can_cast_at_tile(&self, actor: EntityId, spell: SpellId, tile: Position) -> bool {
        spell::can_cast_at_tile(self.state, &self.env, actor, spell, tile)
    }

    pub fn preview(
        &self,
        actor: EntityId,
        spell: SpellId,
        hover: Option<Position>,
    ) -> Option<SpellPreview> {
        spell::preview(self.state, &self.env, actor, spell, hover)
    }

    // ========================================================================
    // Presentation queries
    // ========================================================================

    pub fn current_actor(&self) -> Option<EntityId> {
        self.state.active_actor()
    }

    pub fn initiative_order(&self) -> &[EntityId] {
        &self.state.actors
    }

    /// `(hp, hp_max)` of a combatant.
    pub fn actor_hp(&self, id: EntityId) -> Option<(u32, u32)> {
        self.state
            .combatant(id)
            .map(|c| (c.stats.hp, c.stats.hp_max))
    }

    pub fn challenge_status(&self) -> Option<ChallengeStatus> {
        self.state.challenge.as_ref().map(|c| c.status)
    }

    pub fn challenge_status_text(&self) -> Option<String> {
        let challenge = self.state.challenge.as_ref()?;
        let player = self.state.player()?;
        Some(challenge.progress_text(player))
    }
}

//! Event types for the turn and lifecycle topics.

use combat_core::{CombatResult, EncounterId, EntityId, Position, TemplateId};
use serde::{Deserialize, Serialize};

/// Who drives the actor whose turn just started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Controller {
    /// Waits for player input.
    Player,
    Ai,
}

/// Lightweight turn announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEvent {
    pub encounter: EncounterId,
    /// Entity that acts in this turn
    pub actor: EntityId,
    pub round: u32,
    pub controller: Controller,
}

/// Why an encounter stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EndReason {
    /// Victory or defeat reached by the rules.
    Decided,
    Fled,
    Disconnected,
}

/// Session phase transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LifecycleEvent {
    PreparationStarted {
        encounter: EncounterId,
        hostile: EntityId,
        pack: Vec<TemplateId>,
        player_tile: Position,
        challenge: Option<String>,
    },
    /// Preparation abandoned before combat started.
    PreparationCancelled { encounter: EncounterId },
    CombatStarted {
        encounter: EncounterId,
        order: Vec<EntityId>,
    },
    CombatEnded {
        result: CombatResult,
        reason: EndReason,
    },
    /// The ended encounter was discarded and the session accepts a new one.
    SessionIdle { encounter: EncounterId },
}

impl LifecycleEvent {
    pub fn encounter(&self) -> EncounterId {
        match self {
            LifecycleEvent::PreparationStarted { encounter, .. }
            | LifecycleEvent::PreparationCancelled { encounter }
            | LifecycleEvent::CombatStarted { encounter, .. }
            | LifecycleEvent::SessionIdle { encounter } => *encounter,
            LifecycleEvent::CombatEnded { result, .. } => result.encounter,
        }
    }
}

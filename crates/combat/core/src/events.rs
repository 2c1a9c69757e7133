//! Structured events emitted by the rules.
//!
//! Core functions never render anything. They push [`CombatEvent`]s into an
//! [`EventLog`] and the runtime drains it, mirrors hp/position changes to the
//! world and republishes the events to presentation listeners.

use crate::challenge::{ChallengeStatus, FailReason};
use crate::spell::SpellId;
use crate::state::{EncounterId, EntityId, Outcome, Position, StatusEffect, TemplateId};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum CombatEvent {
    CombatStarted {
        encounter: EncounterId,
        order: Vec<EntityId>,
    },
    TurnChanged {
        actor: EntityId,
        round: u32,
    },
    ActorMoved {
        actor: EntityId,
        from: Position,
        to: Position,
    },
    SpellCast {
        caster: EntityId,
        spell: SpellId,
        target: Position,
    },
    DamageApplied {
        source: Option<EntityId>,
        target: EntityId,
        amount: u32,
        hp_left: u32,
    },
    Healed {
        actor: EntityId,
        amount: u32,
    },
    StatusApplied {
        target: EntityId,
        effect: StatusEffect,
    },
    StatusTicked {
        actor: EntityId,
        damage: u32,
        expired: Vec<String>,
    },
    BuffApplied {
        source: EntityId,
        target: EntityId,
        turns: u32,
    },
    ActorDied {
        actor: EntityId,
    },
    ActorCaptured {
        actor: EntityId,
        template: Option<TemplateId>,
    },
    SummonSpawned {
        summon: EntityId,
        owner: EntityId,
        tile: Position,
    },
    ChallengeUpdated {
        id: String,
        status: ChallengeStatus,
        fail_reason: Option<FailReason>,
    },
    CombatEnded {
        encounter: EncounterId,
        outcome: Outcome,
    },
}

impl CombatEvent {
    /// Short label for logs and topic routing.
    pub fn kind(&self) -> &'static str {
        match self {
            CombatEvent::CombatStarted { .. } => "combat_started",
            CombatEvent::TurnChanged { .. } => "turn_changed",
            CombatEvent::ActorMoved { .. } => "actor_moved",
            CombatEvent::SpellCast { .. } => "spell_cast",
            CombatEvent::DamageApplied { .. } => "damage_applied",
            CombatEvent::Healed { .. } => "healed",
            CombatEvent::StatusApplied { .. } => "status_applied",
            CombatEvent::StatusTicked { .. } => "status_ticked",
            CombatEvent::BuffApplied { .. } => "buff_applied",
            CombatEvent::ActorDied { .. } => "actor_died",
            CombatEvent::ActorCaptured { .. } => "actor_captured",
            CombatEvent::SummonSpawned { .. } => "summon_spawned",
            CombatEvent::ChallengeUpdated { .. } => "challenge_updated",
            CombatEvent::CombatEnded { .. } => "combat_ended",
        }
    }
}

/// Append-only buffer of events produced by one or more core calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes every buffered event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}

//! Error types for the turn machine and the action pipeline.

use crate::error::{CombatError, ErrorSeverity};
use crate::movement::MoveError;
use crate::spell::CastError;
use crate::state::EntityId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("combat is not in progress")]
    NotInProgress,

    #[error("initiative queue is empty")]
    EmptyQueue,

    #[error("no living actor left in the queue")]
    NoLivingActor,

    #[error("{actor} tried to end {active}'s turn")]
    NotActive { actor: EntityId, active: EntityId },
}

impl CombatError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TurnError::NotInProgress | TurnError::NotActive { .. } => ErrorSeverity::Recoverable,
            TurnError::EmptyQueue | TurnError::NoLivingActor => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TurnError::NotInProgress => "TURN_NOT_IN_PROGRESS",
            TurnError::EmptyQueue => "TURN_EMPTY_QUEUE",
            TurnError::NoLivingActor => "TURN_NO_LIVING_ACTOR",
            TurnError::NotActive { .. } => "TURN_NOT_ACTIVE",
        }
    }
}

/// Errors surfaced while executing an action through the combat engine.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    #[error("cast failed: {0}")]
    Cast(#[from] CastError),

    #[error("move failed: {0}")]
    Move(#[from] MoveError),

    #[error("end turn failed: {0}")]
    Turn(#[from] TurnError),
}

impl CombatError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::Cast(e) => e.severity(),
            ExecuteError::Move(e) => e.severity(),
            ExecuteError::Turn(e) => e.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Cast(e) => e.error_code(),
            ExecuteError::Move(e) => e.error_code(),
            ExecuteError::Turn(e) => e.error_code(),
        }
    }
}

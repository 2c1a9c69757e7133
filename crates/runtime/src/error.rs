//! Errors surfaced by the session API.

use combat_core::{
    CombatError, EntityId, ErrorSeverity, PlacementError, TemplateId,
};
use thiserror::Error;

use crate::session::Phase;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("operation needs the {expected} phase, session is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("world hostile {0} not found")]
    UnknownHostile(EntityId),

    #[error("monster template {0} is not in the catalog")]
    UnknownTemplate(TemplateId),

    #[error("player has no hp left")]
    PlayerDown,

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("session is already finalizing an encounter")]
    Reentrant,

    #[error("session requires {0} to be configured before building")]
    MissingPart(&'static str),
}

impl CombatError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::InvalidPhase { .. } | RuntimeError::Reentrant => {
                ErrorSeverity::Recoverable
            }
            RuntimeError::UnknownHostile(_) | RuntimeError::PlayerDown => {
                ErrorSeverity::Validation
            }
            RuntimeError::Placement(e) => e.severity(),
            RuntimeError::UnknownTemplate(_) => ErrorSeverity::Internal,
            RuntimeError::MissingPart(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::InvalidPhase { .. } => "RUNTIME_INVALID_PHASE",
            RuntimeError::UnknownHostile(_) => "RUNTIME_UNKNOWN_HOSTILE",
            RuntimeError::UnknownTemplate(_) => "RUNTIME_UNKNOWN_TEMPLATE",
            RuntimeError::PlayerDown => "RUNTIME_PLAYER_DOWN",
            RuntimeError::Placement(e) => e.error_code(),
            RuntimeError::Reentrant => "RUNTIME_REENTRANT",
            RuntimeError::MissingPart(_) => "RUNTIME_MISSING_PART",
        }
    }
}

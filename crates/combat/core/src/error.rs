//! Common error infrastructure for combat-core.
//!
//! Domain errors (`CastError`, `TurnError`, `MoveError`, `PlacementError`) live
//! next to the operations they validate. Each implements [`CombatError`] so the
//! runtime can classify rejections uniformly.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the action may succeed later or with other inputs
/// - **Validation**: invalid input, rejected without retry
/// - **Internal**: unexpected state inconsistency
/// - **Fatal**: combat state cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Examples: not enough action points, target out of range.
    Recoverable,
    /// Examples: unknown spell, path not contiguous.
    Validation,
    /// Examples: active actor missing from the roster.
    Internal,
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier of the error variant, for logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_and_fatal_are_bugs() {
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(ErrorSeverity::Fatal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
    }
}

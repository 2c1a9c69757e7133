//! End-of-combat hooks.
//!
//! Progression systems (dungeon clear tracking, quest advancement) listen for
//! the terminal [`CombatResult`] of each encounter. Hooks run after the world
//! has been restored and rewards were granted, in priority order, exactly
//! once per encounter.

mod registry;

pub use registry::HookRegistry;

use combat_core::CombatResult;
use thiserror::Error;

/// Defines how hook failures should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HookCriticality {
    /// Hook failure should be logged as error but allow continuation.
    ///
    /// This is the default level.
    #[default]
    Important,

    /// Hook failure is expected and can be silently ignored.
    ///
    /// Use for cosmetic listeners (achievements, statistics).
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{hook} failed: {message}")]
pub struct HookError {
    pub hook: &'static str,
    pub message: String,
}

impl HookError {
    pub fn new(hook: &'static str, message: impl Into<String>) -> Self {
        Self {
            hook,
            message: message.into(),
        }
    }
}

/// Listener notified with the result record of a finished encounter.
pub trait CombatEndHook: Send + Sync {
    /// Unique name used in logs.
    fn name(&self) -> &'static str;

    /// Lower values run first.
    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    fn on_combat_end(&self, result: &CombatResult) -> Result<(), HookError>;
}

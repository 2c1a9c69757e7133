//! Tunables read from `config.toml`.

use combat_core::CombatConfig;
use serde::{Deserialize, Serialize};

/// Presentation delays the runtime waits between combat steps.
///
/// They pace the encounter for a viewer and never change its result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Per tile of a move path.
    pub move_step_ms: u64,
    /// After a spell resolves.
    pub cast_ms: u64,
    /// Before each AI decision.
    pub ai_think_ms: u64,
    /// Between the end of one turn and the start of the next.
    pub turn_transition_ms: u64,
}

impl TimingConfig {
    pub const DEFAULT_MOVE_STEP_MS: u64 = 180;
    pub const DEFAULT_CAST_MS: u64 = 600;
    pub const DEFAULT_AI_THINK_MS: u64 = 350;
    pub const DEFAULT_TURN_TRANSITION_MS: u64 = 500;

    /// No delays at all. Used by tests and headless replays.
    pub const fn immediate() -> Self {
        Self {
            move_step_ms: 0,
            cast_ms: 0,
            ai_think_ms: 0,
            turn_transition_ms: 0,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            move_step_ms: Self::DEFAULT_MOVE_STEP_MS,
            cast_ms: Self::DEFAULT_CAST_MS,
            ai_think_ms: Self::DEFAULT_AI_THINK_MS,
            turn_transition_ms: Self::DEFAULT_TURN_TRANSITION_MS,
        }
    }
}

/// Everything `config.toml` may hold. Missing sections use their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub combat: CombatConfig,
    pub timing: TimingConfig,
    /// Base seed of the encounter dice. Drawn by the host when absent.
    pub seed: Option<u64>,
    /// Capacity of each event bus topic.
    pub event_buffer_size: Option<usize>,
}

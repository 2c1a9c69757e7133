//! Runtime configuration shared by the session and its scheduler.

use std::time::{SystemTime, UNIX_EPOCH};

use combat_content::{ContentConfig, TimingConfig};
use combat_core::CombatConfig;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Presentation delays between deferred steps.
    pub timing: TimingConfig,
    /// Capacity of each event bus topic.
    pub event_buffer_size: usize,
    /// Base seed of every encounter. Drawn from the clock when absent.
    pub seed: Option<u64>,
    /// Let the AI play the player's turns with the melee procedure.
    pub autopilot: bool,
}

impl RuntimeConfig {
    pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

    pub fn from_content(content: &ContentConfig) -> Self {
        Self {
            combat: content.combat.clone(),
            timing: content.timing,
            event_buffer_size: content
                .event_buffer_size
                .unwrap_or(Self::DEFAULT_EVENT_BUFFER_SIZE),
            seed: content.seed,
            autopilot: false,
        }
    }

    /// Same configuration with every presentation delay set to zero.
    pub fn immediate(mut self) -> Self {
        self.timing = TimingConfig::immediate();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_autopilot(mut self, autopilot: bool) -> Self {
        self.autopilot = autopilot;
        self
    }

    pub(crate) fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_nanos() as u64)
        })
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_content(&ContentConfig::default())
    }
}

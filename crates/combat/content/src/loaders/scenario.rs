//! Player profile and scenario loaders.

use std::path::Path;

use crate::catalog::{PlayerProfile, Scenario};
use crate::loaders::{LoadResult, read_ron};

/// Loader for `player.ron`.
pub struct PlayerLoader;

impl PlayerLoader {
    pub fn load(path: &Path) -> LoadResult<PlayerProfile> {
        let player: PlayerProfile = read_ron(path)?;
        if player.stats.hp_max == 0 {
            anyhow::bail!("player '{}' in {} has no hp", player.name, path.display());
        }
        Ok(player)
    }
}

/// Loader for scenario files under `scenarios/`.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<Scenario> {
        let scenario: Scenario = read_ron(path)?;
        if scenario.hostiles.is_empty() {
            anyhow::bail!("scenario {} has no hostile", path.display());
        }
        Ok(scenario)
    }
}

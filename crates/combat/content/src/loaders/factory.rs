//! Content factory for building catalogs from a data directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use combat_core::{ChallengeDefinition, StaticGrid};
use tracing::info;

use crate::catalog::{
    Content, MonsterCatalog, PlacementCatalog, PlayerProfile, Scenario, SpellCatalog,
};
use crate::config::ContentConfig;
use crate::loaders::{
    ChallengeLoader, ConfigLoader, LoadResult, MapLoader, MonsterLoader, PlacementLoader,
    PlayerLoader, ScenarioLoader, SpellLoader,
};

/// Loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── spells.ron
/// ├── monsters.ron
/// ├── challenges.ron
/// ├── placement.ron
/// ├── player.ron
/// ├── maps/
/// │   └── arena.ron
/// └── scenarios/
///     └── wolf_den.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Self::bundled_data_dir())
    }

    pub fn bundled_data_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
    }

    /// Load tunables from `config.toml`. A missing file yields the defaults.
    pub fn load_config(&self) -> LoadResult<ContentConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(ContentConfig::default());
        }
        ConfigLoader::load(&path)
    }

    pub fn load_spells(&self) -> LoadResult<SpellCatalog> {
        SpellLoader::load(&self.data_dir.join("spells.ron"))
    }

    pub fn load_monsters(&self) -> LoadResult<MonsterCatalog> {
        MonsterLoader::load(&self.data_dir.join("monsters.ron"))
    }

    /// Load the challenge pool. A missing file means no challenges.
    pub fn load_challenges(&self) -> LoadResult<Vec<ChallengeDefinition>> {
        let path = self.data_dir.join("challenges.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        ChallengeLoader::load(&path)
    }

    /// Load placement patterns. A missing file yields the fallback pattern.
    pub fn load_placement(&self) -> LoadResult<PlacementCatalog> {
        let path = self.data_dir.join("placement.ron");
        if !path.exists() {
            return Ok(PlacementCatalog {
                patterns: vec![combat_core::PlacementPattern::fallback()],
                ..PlacementCatalog::default()
            });
        }
        PlacementLoader::load(&path)
    }

    pub fn load_player(&self) -> LoadResult<PlayerProfile> {
        PlayerLoader::load(&self.data_dir.join("player.ron"))
    }

    /// Load a map from `maps/{map_name}.ron`.
    pub fn load_map(&self, map_name: &str) -> LoadResult<StaticGrid> {
        let path = self.data_dir.join("maps").join(format!("{map_name}.ron"));
        MapLoader::load(&path)
    }

    /// Load a scenario from `scenarios/{name}.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{name}.ron"));
        ScenarioLoader::load(&path)
    }

    /// Loads and cross-validates every catalog.
    pub fn load_all(&self) -> LoadResult<Content> {
        let content = Content {
            config: self.load_config()?,
            spells: self.load_spells()?,
            monsters: self.load_monsters()?,
            challenges: self.load_challenges()?,
            placement: self.load_placement()?,
        };
        content
            .validate()
            .with_context(|| format!("inconsistent content in {}", self.data_dir.display()))?;

        info!(
            target: "content::loader",
            dir = %self.data_dir.display(),
            spells = content.spells.len(),
            monsters = content.monsters.len(),
            challenges = content.challenges.len(),
            patterns = content.placement.patterns.len(),
            "content loaded"
        );
        Ok(content)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

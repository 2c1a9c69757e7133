//! Static content bundled for the session.
//!
//! Catalogs and the map are immutable while the session runs. The
//! [`OracleManager`] hands out [`CombatEnv`] views over them on demand.

use std::sync::Arc;

use combat_content::{Content, MonsterCatalog, PlacementCatalog, SpellCatalog};
use combat_core::{
    CapturedMonster, ChallengeDefinition, CombatConfig, CombatEnv, GridOracle, MonsterTemplate,
    Position, TemplateId,
};

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    map_name: String,
    grid: Arc<dyn GridOracle>,
    spells: Arc<SpellCatalog>,
    monsters: Arc<MonsterCatalog>,
    challenges: Arc<[ChallengeDefinition]>,
    placement: Arc<PlacementCatalog>,
    config: CombatConfig,
}

impl OracleManager {
    pub fn new(
        content: Content,
        map_name: impl Into<String>,
        grid: Arc<dyn GridOracle>,
        config: CombatConfig,
    ) -> Self {
        Self {
            map_name: map_name.into(),
            grid,
            spells: Arc::new(content.spells),
            monsters: Arc::new(content.monsters),
            challenges: content.challenges.into(),
            placement: Arc::new(content.placement),
            config,
        }
    }

    /// Converts the bundle into the environment the combat rules read.
    pub fn as_combat_env(&self) -> CombatEnv<'_> {
        CombatEnv::new(
            self.grid.as_ref(),
            self.spells.as_ref(),
            self.monsters.as_ref(),
            &self.config,
        )
    }

    pub fn grid(&self) -> &dyn GridOracle {
        self.grid.as_ref()
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn template(&self, id: TemplateId) -> Option<&MonsterTemplate> {
        self.monsters.get(id)
    }

    pub fn captured(&self, id: TemplateId) -> Option<CapturedMonster> {
        self.monsters.captured(id)
    }

    pub fn challenges(&self) -> &[ChallengeDefinition] {
        &self.challenges
    }

    pub fn placement(&self) -> &PlacementCatalog {
        &self.placement
    }

    /// Pre-authored placement anchors of the current map.
    pub fn anchors(&self) -> &[Position] {
        self.placement.anchors_for(&self.map_name)
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }
}

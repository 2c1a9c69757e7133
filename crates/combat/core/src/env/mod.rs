//! Traits describing read-only world data.
//!
//! Oracles expose static map geometry, spell definitions and monster
//! templates. The [`CombatEnv`] aggregate bundles them so the rules can reach
//! everything they need without coupling to concrete implementations.
mod catalog;
mod grid;
mod rng;

pub use catalog::{LootEntry, MonsterOracle, MonsterTemplate, SpellOracle};
pub use grid::{GridOracle, MapDimensions, StaticGrid, TerrainKind};
pub use rng::{PcgRng, RngOracle, SeededRng, compute_seed, context};

use crate::config::CombatConfig;
use crate::spell::{SpellDefinition, SpellId};
use crate::state::TemplateId;

/// Read-only oracles required by the spell resolver, turn machine and AI.
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    pub grid: &'a dyn GridOracle,
    pub spells: &'a dyn SpellOracle,
    pub monsters: &'a dyn MonsterOracle,
    pub config: &'a CombatConfig,
}

impl<'a> CombatEnv<'a> {
    pub fn new(
        grid: &'a dyn GridOracle,
        spells: &'a dyn SpellOracle,
        monsters: &'a dyn MonsterOracle,
        config: &'a CombatConfig,
    ) -> Self {
        Self {
            grid,
            spells,
            monsters,
            config,
        }
    }

    #[inline]
    pub fn spell(&self, id: SpellId) -> Option<&'a SpellDefinition> {
        self.spells.spell(id)
    }

    #[inline]
    pub fn template(&self, id: TemplateId) -> Option<&'a MonsterTemplate> {
        self.monsters.template(id)
    }
}

impl std::fmt::Debug for CombatEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatEnv")
            .field("dimensions", &self.grid.dimensions())
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}

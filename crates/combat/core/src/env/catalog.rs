//! Content catalogs consumed by the rules.

use std::collections::BTreeMap;

use crate::ai::BehaviorProfile;
use crate::spell::{SpellDefinition, SpellId};
use crate::state::{ActorStats, Combatant, EntityId, Role, TemplateId};

/// Spell definitions by id.
pub trait SpellOracle: Send + Sync {
    fn spell(&self, id: SpellId) -> Option<&SpellDefinition>;
}

/// Monster templates by id.
pub trait MonsterOracle: Send + Sync {
    fn template(&self, id: TemplateId) -> Option<&MonsterTemplate>;
}

/// One row of a monster's loot table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item_id: String,
    /// Base probability in `[0, 1]`.
    pub drop_rate: f32,
    #[cfg_attr(feature = "serde", serde(default = "LootEntry::one"))]
    pub qty_min: u32,
    #[cfg_attr(feature = "serde", serde(default = "LootEntry::one"))]
    pub qty_max: u32,
}

impl LootEntry {
    fn one() -> u32 {
        1
    }
}

/// Species record used to spawn hostiles and to derive summons.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonsterTemplate {
    pub id: TemplateId,
    pub name: String,
    pub level: u32,
    pub stats: ActorStats,
    pub spells: Vec<SpellId>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub behavior: Option<BehaviorProfile>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold_min: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold_max: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub loot: Vec<LootEntry>,
}

impl MonsterTemplate {
    /// Builds a hostile combatant from this template. Hp starts full.
    pub fn spawn(&self, id: EntityId) -> Combatant {
        let mut stats = self.stats;
        stats.level = self.level;
        stats.hp = stats.hp_max;
        let mut combatant = Combatant::new(id, Role::Hostile, self.name.clone(), stats)
            .with_template(self.id)
            .with_spells(self.spells.iter().copied());
        combatant.behavior = self.behavior.clone();
        combatant
    }
}

impl SpellOracle for BTreeMap<SpellId, SpellDefinition> {
    fn spell(&self, id: SpellId) -> Option<&SpellDefinition> {
        self.get(&id)
    }
}

impl MonsterOracle for BTreeMap<TemplateId, MonsterTemplate> {
    fn template(&self, id: TemplateId) -> Option<&MonsterTemplate> {
        self.get(&id)
    }
}

//! In-memory content catalogs served to the rules through the core oracles.
//!
//! Catalogs are immutable once built. Validation happens when a catalog is
//! assembled ([`SpellCatalog::from_definitions`]) and when the whole bundle is
//! cross-checked ([`Content::validate`]), never during combat.

use std::collections::BTreeMap;

use combat_core::{
    ActorStats, CapturedMonster, ChallengeDefinition, MonsterOracle, MonsterTemplate,
    PlacementPattern, Position, SpellDefinition, SpellId, SpellOracle, TemplateId,
    env::LootEntry,
};
use serde::{Deserialize, Serialize};

use crate::config::ContentConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContentError {
    #[error("spell {0} is defined twice")]
    DuplicateSpell(SpellId),

    #[error("monster template {0} is defined twice")]
    DuplicateTemplate(TemplateId),

    #[error("spell {spell}: range {min}..{max} is empty")]
    InvalidRange { spell: SpellId, min: u32, max: u32 },

    #[error("spell {spell}: damage {min}..{max} is empty")]
    InvalidDamage { spell: SpellId, min: u32, max: u32 },

    #[error("{owner} references unknown spell {spell}")]
    UnknownSpell { owner: String, spell: SpellId },

    #[error("{owner} references unknown template {template}")]
    UnknownTemplate { owner: String, template: TemplateId },

    #[error("template {template}: loot '{item}' has drop rate {rate} outside [0, 1]")]
    InvalidDropRate {
        template: TemplateId,
        item: String,
        rate: f32,
    },

    #[error("challenge '{0}' is defined twice")]
    DuplicateChallenge(String),
}

// ============================================================================
// Spells
// ============================================================================

/// Spell definitions by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpellCatalog {
    spells: BTreeMap<SpellId, SpellDefinition>,
}

impl SpellCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting duplicate ids and empty ranges.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = SpellDefinition>,
    ) -> Result<Self, ContentError> {
        let mut catalog = Self::new();
        for def in definitions {
            catalog.insert(def)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, def: SpellDefinition) -> Result<(), ContentError> {
        if def.range_min > def.range_max {
            return Err(ContentError::InvalidRange {
                spell: def.id,
                min: def.range_min,
                max: def.range_max,
            });
        }
        if def.damage_min > def.damage_max {
            return Err(ContentError::InvalidDamage {
                spell: def.id,
                min: def.damage_min,
                max: def.damage_max,
            });
        }
        if self.spells.contains_key(&def.id) {
            return Err(ContentError::DuplicateSpell(def.id));
        }
        self.spells.insert(def.id, def);
        Ok(())
    }

    pub fn get(&self, id: SpellId) -> Option<&SpellDefinition> {
        self.spells.get(&id)
    }

    pub fn contains(&self, id: SpellId) -> bool {
        self.spells.contains_key(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SpellDefinition> {
        self.spells.values().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellDefinition> {
        self.spells.values()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

impl SpellOracle for SpellCatalog {
    fn spell(&self, id: SpellId) -> Option<&SpellDefinition> {
        self.get(id)
    }
}

// ============================================================================
// Monsters
// ============================================================================

/// Monster templates by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MonsterCatalog {
    templates: BTreeMap<TemplateId, MonsterTemplate>,
}

impl MonsterCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_templates(
        templates: impl IntoIterator<Item = MonsterTemplate>,
    ) -> Result<Self, ContentError> {
        let mut catalog = Self::new();
        for template in templates {
            catalog.insert(template)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, template: MonsterTemplate) -> Result<(), ContentError> {
        if let Some(entry) = template
            .loot
            .iter()
            .find(|l| !(0.0..=1.0).contains(&l.drop_rate))
        {
            return Err(ContentError::InvalidDropRate {
                template: template.id,
                item: entry.item_id.clone(),
                rate: entry.drop_rate,
            });
        }
        if self.templates.contains_key(&template.id) {
            return Err(ContentError::DuplicateTemplate(template.id));
        }
        self.templates.insert(template.id, template);
        Ok(())
    }

    pub fn get(&self, id: TemplateId) -> Option<&MonsterTemplate> {
        self.templates.get(&id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&MonsterTemplate> {
        self.templates.values().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonsterTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Record of a capture of `template`, as if it had been taken at its
    /// template level.
    pub fn captured(&self, template: TemplateId) -> Option<CapturedMonster> {
        self.get(template).map(|t| CapturedMonster {
            template: t.id,
            level: t.level,
            base_stats: t.stats,
            name: t.name.clone(),
        })
    }
}

impl MonsterOracle for MonsterCatalog {
    fn template(&self, id: TemplateId) -> Option<&MonsterTemplate> {
        self.get(id)
    }
}

// ============================================================================
// Placement
// ============================================================================

/// Placement patterns and the authored anchors of each map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementCatalog {
    pub patterns: Vec<PlacementPattern>,
    #[serde(default)]
    pub anchors: BTreeMap<String, Vec<Position>>,
}

impl PlacementCatalog {
    /// Anchors of `map`, empty when the map has none.
    pub fn anchors_for(&self, map: &str) -> &[Position] {
        self.anchors.get(map).map_or(&[], Vec::as_slice)
    }
}

// ============================================================================
// Player & scenario
// ============================================================================

/// The controllable character brought into combat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub stats: ActorStats,
    pub spells: Vec<SpellId>,
    /// Template of a previously captured monster the player may summon.
    #[serde(default)]
    pub companion: Option<TemplateId>,
}

/// One world hostile standing on the map before combat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldHostileSpec {
    pub template: TemplateId,
    pub tile: Position,
    /// Extra pack members fought together with this hostile.
    #[serde(default)]
    pub pack: Vec<TemplateId>,
}

/// A ready-to-play encounter: a map, the player and the world hostiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub map: String,
    pub player_tile: Position,
    pub hostiles: Vec<WorldHostileSpec>,
}

// ============================================================================
// Bundle
// ============================================================================

/// All content needed to run encounters.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub config: ContentConfig,
    pub spells: SpellCatalog,
    pub monsters: MonsterCatalog,
    pub challenges: Vec<ChallengeDefinition>,
    pub placement: PlacementCatalog,
}

impl Content {
    /// Cross-checks references between catalogs.
    pub fn validate(&self) -> Result<(), ContentError> {
        for template in self.monsters.iter() {
            let owner = || format!("template {}", template.id);
            let behavior_spells = template.behavior.iter().flat_map(|b| {
                [Some(b.primary_spell), b.secondary_spell, b.summon_spell]
                    .into_iter()
                    .flatten()
            });
            for spell in template.spells.iter().copied().chain(behavior_spells) {
                if !self.spells.contains(spell) {
                    return Err(ContentError::UnknownSpell {
                        owner: owner(),
                        spell,
                    });
                }
            }
        }

        for spell in self.spells.iter() {
            if let Some(template) = spell.summon.and_then(|s| s.template)
                && self.monsters.get(template).is_none()
            {
                return Err(ContentError::UnknownTemplate {
                    owner: format!("spell {}", spell.id),
                    template,
                });
            }
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.challenges.len());
        for challenge in &self.challenges {
            if seen.contains(&challenge.id.as_str()) {
                return Err(ContentError::DuplicateChallenge(challenge.id.clone()));
            }
            seen.push(&challenge.id);
        }
        Ok(())
    }

    /// Checks that a player profile only uses known spells and templates.
    pub fn validate_player(&self, player: &PlayerProfile) -> Result<(), ContentError> {
        let owner = || format!("player '{}'", player.name);
        if let Some(spell) = player.spells.iter().copied().find(|s| !self.spells.contains(*s)) {
            return Err(ContentError::UnknownSpell {
                owner: owner(),
                spell,
            });
        }
        if let Some(template) = player.companion
            && self.monsters.get(template).is_none()
        {
            return Err(ContentError::UnknownTemplate {
                owner: owner(),
                template,
            });
        }
        Ok(())
    }
}

/// Loot row helper for content builders and tests.
pub fn loot(item_id: impl Into<String>, drop_rate: f32, qty_min: u32, qty_max: u32) -> LootEntry {
    LootEntry {
        item_id: item_id.into(),
        drop_rate,
        qty_min,
        qty_max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Archetype, BehaviorProfile, Element, SummonSpec};

    fn stats() -> ActorStats {
        ActorStats {
            hp: 30,
            hp_max: 30,
            action_points: 6,
            move_points: 3,
            initiative: 8,
            level: 1,
            elements: Default::default(),
        }
    }

    fn template(id: u16, spells: Vec<SpellId>) -> MonsterTemplate {
        MonsterTemplate {
            id: TemplateId(id),
            name: format!("monster-{id}"),
            level: 1,
            stats: stats(),
            spells,
            behavior: None,
            xp: 10,
            gold_min: 1,
            gold_max: 2,
            loot: vec![loot("bone", 0.5, 1, 1)],
        }
    }

    #[test]
    fn duplicate_spells_are_rejected() {
        let bite = SpellDefinition::new(SpellId(1), "bite", 3);
        let err = SpellCatalog::from_definitions([bite.clone(), bite]).unwrap_err();
        assert_eq!(err, ContentError::DuplicateSpell(SpellId(1)));
    }

    #[test]
    fn empty_ranges_are_rejected() {
        let broken = SpellDefinition::new(SpellId(2), "broken", 3).with_range(4, 2);
        assert!(matches!(
            SpellCatalog::from_definitions([broken]),
            Err(ContentError::InvalidRange { min: 4, max: 2, .. })
        ));

        let broken = SpellDefinition::new(SpellId(3), "broken", 3).with_damage(Element::Force, 9, 1);
        assert!(matches!(
            SpellCatalog::from_definitions([broken]),
            Err(ContentError::InvalidDamage { .. })
        ));
    }

    #[test]
    fn drop_rates_must_be_probabilities() {
        let mut t = template(1, vec![]);
        t.loot = vec![loot("gem", 1.5, 1, 1)];
        assert!(matches!(
            MonsterCatalog::from_templates([t]),
            Err(ContentError::InvalidDropRate { .. })
        ));
    }

    #[test]
    fn validate_catches_dangling_references() {
        let mut content = Content {
            spells: SpellCatalog::from_definitions([SpellDefinition::new(SpellId(1), "bite", 3)])
                .unwrap(),
            ..Content::default()
        };

        let mut t = template(1, vec![SpellId(1)]);
        t.behavior = Some(BehaviorProfile::new(Archetype::Hybrid, SpellId(1)).with_secondary(SpellId(9)));
        content.monsters = MonsterCatalog::from_templates([t]).unwrap();
        assert_eq!(
            content.validate(),
            Err(ContentError::UnknownSpell {
                owner: "template template:1".into(),
                spell: SpellId(9)
            })
        );

        content.monsters = MonsterCatalog::from_templates([template(1, vec![SpellId(1)])]).unwrap();
        let mut call = SpellDefinition::new(SpellId(5), "call", 2);
        call.summon = Some(SummonSpec {
            template: Some(TemplateId(7)),
            death_cooldown_turns: 0,
        });
        content.spells.insert(call).unwrap();
        assert!(matches!(
            content.validate(),
            Err(ContentError::UnknownTemplate { template: TemplateId(7), .. })
        ));
    }

    #[test]
    fn captured_record_uses_template_stats() {
        let catalog = MonsterCatalog::from_templates([template(4, vec![])]).unwrap();
        let captured = catalog.captured(TemplateId(4)).expect("captured");
        assert_eq!(captured.level, 1);
        assert_eq!(captured.base_stats.hp_max, 30);
        assert!(catalog.captured(TemplateId(5)).is_none());
    }

    #[test]
    fn anchors_default_to_empty() {
        let mut placement = PlacementCatalog::default();
        placement
            .anchors
            .insert("arena".into(), vec![Position::new(4, 4)]);
        assert_eq!(placement.anchors_for("arena"), &[Position::new(4, 4)]);
        assert!(placement.anchors_for("cave").is_empty());
    }
}

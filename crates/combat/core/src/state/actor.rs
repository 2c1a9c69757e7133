//! Combatant records.
//!
//! The engine does not own world entities. A [`Combatant`] is the combat-side
//! view of one: it carries the fields combat mutates (hp, position, status) and
//! the runtime mirrors those changes back to the world through events.

use std::fmt;

use crate::ai::BehaviorProfile;
use crate::spell::{Element, ElementalStat, SpellId};
use crate::state::{EntityId, Position, Side, StatusEffects};

/// Identifier of a monster template in the content catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateId(pub u16);

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template:{}", self.0)
    }
}

/// The four elemental attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementalStats {
    pub force: i32,
    pub intelligence: i32,
    pub agility: i32,
    pub luck: i32,
}

impl ElementalStats {
    pub const fn new(force: i32, intelligence: i32, agility: i32, luck: i32) -> Self {
        Self {
            force,
            intelligence,
            agility,
            luck,
        }
    }

    pub fn get(&self, stat: ElementalStat) -> i32 {
        match stat {
            ElementalStat::Force => self.force,
            ElementalStat::Intelligence => self.intelligence,
            ElementalStat::Agility => self.agility,
            ElementalStat::Luck => self.luck,
        }
    }

    /// Applies `f` to every stat.
    pub fn map(self, f: impl Fn(i32) -> i32) -> Self {
        Self {
            force: f(self.force),
            intelligence: f(self.intelligence),
            agility: f(self.agility),
            luck: f(self.luck),
        }
    }

    pub fn add(self, other: ElementalStats) -> Self {
        Self {
            force: self.force + other.force,
            intelligence: self.intelligence + other.intelligence,
            agility: self.agility + other.agility,
            luck: self.luck + other.luck,
        }
    }
}

/// Base statistics of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorStats {
    pub hp: u32,
    pub hp_max: u32,
    pub action_points: u32,
    pub move_points: u32,
    pub initiative: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elements: ElementalStats,
}

impl ActorStats {
    pub fn hp_ratio(&self) -> f32 {
        if self.hp_max == 0 {
            return 0.0;
        }
        self.hp as f32 / self.hp_max as f32
    }
}

/// Role of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Player,
    Hostile,
    Summon,
}

impl Role {
    pub const fn side(self) -> Side {
        match self {
            Role::Player | Role::Summon => Side::Allies,
            Role::Hostile => Side::Hostiles,
        }
    }
}

/// Element charges stored by a caster for later conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementCharges {
    pub force: u32,
    pub intelligence: u32,
    pub agility: u32,
    pub luck: u32,
}

impl ElementCharges {
    pub fn add(&mut self, element: Element, amount: u32, cap: u32) {
        let slot = match element.stat() {
            ElementalStat::Force => &mut self.force,
            ElementalStat::Intelligence => &mut self.intelligence,
            ElementalStat::Agility => &mut self.agility,
            ElementalStat::Luck => &mut self.luck,
        };
        *slot = (*slot + amount).min(cap);
    }

    pub fn total(&self) -> u32 {
        self.force + self.intelligence + self.agility + self.luck
    }

    /// Empties the store and returns how many charges it held.
    pub fn drain(&mut self) -> u32 {
        let total = self.total();
        *self = Self::default();
        total
    }
}

/// Combat-side record of one participant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub role: Role,
    pub name: String,
    /// Content template for hostiles and summons.
    pub template: Option<TemplateId>,
    pub stats: ActorStats,
    /// Tile coordinates. `None` when the spatial context was lost; resolved
    /// lazily from `world_position`.
    pub position: Option<Position>,
    /// Last known world coordinates, used to recover a missing tile.
    pub world_position: Option<(f32, f32)>,
    pub status: StatusEffects,
    pub spells: Vec<SpellId>,
    pub behavior: Option<BehaviorProfile>,
    pub charges: ElementCharges,
    /// Owner of a summon.
    pub owner: Option<EntityId>,
}

impl Combatant {
    pub fn new(id: EntityId, role: Role, name: impl Into<String>, stats: ActorStats) -> Self {
        Self {
            id,
            role,
            name: name.into(),
            template: None,
            stats,
            position: None,
            world_position: None,
            status: StatusEffects::empty(),
            spells: Vec::new(),
            behavior: None,
            charges: ElementCharges::default(),
            owner: None,
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_spells(mut self, spells: impl IntoIterator<Item = SpellId>) -> Self {
        self.spells = spells.into_iter().collect();
        self
    }

    pub fn with_behavior(mut self, behavior: BehaviorProfile) -> Self {
        self.behavior = Some(behavior);
        self
    }

    pub fn with_template(mut self, template: TemplateId) -> Self {
        self.template = Some(template);
        self
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.role.side()
    }

    pub fn is_hostile_to(&self, other: &Combatant) -> bool {
        self.side() != other.side()
    }

    /// Elemental stat including active buffs and boosts.
    pub fn effective_stat(&self, stat: ElementalStat) -> i32 {
        self.stats.elements.get(stat) + self.status.elemental_bonus()
    }

    /// Move points at the start of a turn including buffs.
    pub fn turn_move_points(&self) -> u32 {
        self.stats.move_points + self.status.bonus_move_points()
    }

    /// Reduces hp, clamped at zero. Returns the damage actually dealt.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.stats.hp);
        self.stats.hp -= dealt;
        dealt
    }

    /// Restores hp up to `hp_max`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let healed = amount.min(self.stats.hp_max.saturating_sub(self.stats.hp));
        self.stats.hp += healed;
        healed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(hp: u32) -> ActorStats {
        ActorStats {
            hp,
            hp_max: 100,
            action_points: 6,
            move_points: 3,
            initiative: 10,
            level: 1,
            elements: ElementalStats::default(),
        }
    }

    #[test]
    fn damage_and_heal_are_clamped() {
        let mut c = Combatant::new(EntityId(1), Role::Hostile, "slime", stats(10));
        assert_eq!(c.take_damage(25), 10);
        assert!(!c.is_alive());
        assert_eq!(c.heal(500), 100);
        assert_eq!(c.stats.hp, 100);
    }

    #[test]
    fn charges_are_capped_per_element() {
        let mut charges = ElementCharges::default();
        charges.add(Element::Intelligence, 3, 5);
        charges.add(Element::Intelligence, 3, 5);
        charges.add(Element::Luck, 1, 5);
        assert_eq!(charges.intelligence, 5);
        assert_eq!(charges.drain(), 6);
        assert_eq!(charges.total(), 0);
    }
}

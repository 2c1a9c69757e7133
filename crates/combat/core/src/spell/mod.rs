//! Spell content records and the cast resolver.
//!
//! A [`SpellDefinition`] is immutable content. Everything that changes while a
//! spell is used (cooldowns, per-turn counters, charges) lives in
//! [`CombatState`](crate::state::CombatState).
//!
//! - [`targeting`]: range, alignment, line of sight and effect areas
//! - [`damage`]: damage roll and elemental scaling
//! - [`resolver`]: `can_cast`, `can_cast_at_tile`, `cast`
//! - [`preview`]: read-only tile sets for UI feedback

pub mod damage;
pub mod preview;
pub mod resolver;
pub mod targeting;

use std::fmt;

pub use damage::{elemental_bonus, roll_damage, scale_damage};
pub use preview::{SpellPreview, TileReach, preview};
pub use resolver::{
    CastError, CastPlan, CastReport, Hit, can_cast, can_cast_at_tile, cast, check_cast,
    check_cast_at_tile, try_cast,
};
pub use targeting::{blocks_sight, effect_area, has_line_of_sight, is_in_range, line_between};

use crate::state::TemplateId;

/// Identifier of a spell definition in the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellId(pub u16);

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "spell:{}", self.0)
    }
}

/// Elemental stat an actor carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(strum::Display, strum::EnumIter, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ElementalStat {
    Force,
    Intelligence,
    Agility,
    Luck,
}

/// Damage element of a spell.
///
/// Content uses two naming schemes for the same four stats: the stat names
/// themselves and the classic element names (earth, fire, air, water). Both
/// parse to the same variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[derive(strum::Display, strum::EnumString, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Element {
    #[default]
    Neutral,
    #[strum(to_string = "force", serialize = "earth", serialize = "strength")]
    #[cfg_attr(feature = "serde", serde(alias = "earth", alias = "strength"))]
    Force,
    #[strum(to_string = "intelligence", serialize = "fire")]
    #[cfg_attr(feature = "serde", serde(alias = "fire"))]
    Intelligence,
    #[strum(to_string = "agility", serialize = "air")]
    #[cfg_attr(feature = "serde", serde(alias = "air"))]
    Agility,
    #[strum(to_string = "luck", serialize = "water", serialize = "chance")]
    #[cfg_attr(feature = "serde", serde(alias = "water", alias = "chance"))]
    Luck,
}

impl Element {
    /// Fixed element to stat mapping. Neutral spells scale with force.
    pub const fn stat(self) -> ElementalStat {
        match self {
            Element::Neutral | Element::Force => ElementalStat::Force,
            Element::Intelligence => ElementalStat::Intelligence,
            Element::Agility => ElementalStat::Agility,
            Element::Luck => ElementalStat::Luck,
        }
    }
}

/// Constraint on where a spell may be aimed relative to the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CastPattern {
    /// Any tile within range.
    #[default]
    None,
    /// Same row or column as the caster.
    Line4,
}

/// Shape of the tiles affected by a cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EffectPattern {
    /// The target tile only.
    #[default]
    Single,
    /// `effect_length` tiles straight ahead of the caster toward the target.
    LineForward,
    /// Target, one tile further, and the target's two perpendicular neighbors.
    FrontCross,
    /// Target plus its four orthogonal neighbors.
    Cross1,
}

/// Capture sub-record: removes a weakened hostile and records it for summoning.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureSpec {
    /// The victim's `hp / hp_max` must be at or below this after the hit.
    pub max_hp_ratio: f32,
}

/// Summon sub-record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummonSpec {
    /// Template spawned by monster summoners. Player summons ignore it and
    /// materialize a captured monster instead.
    pub template: Option<TemplateId>,
    /// Cooldown armed on the owner's summon spell when the summon dies.
    pub death_cooldown_turns: u32,
}

/// Buff centered on the caster affecting allies within a radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaBuffSpec {
    pub radius: u32,
    pub turns: u32,
    /// Added to every elemental stat while active.
    pub elemental_bonus: i32,
    /// Extra move points granted at each pool reset while active.
    pub move_points: u32,
}

/// Damage-over-time attached to a player victim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffectSpec {
    pub turns: u32,
    pub damage_min: u32,
    pub damage_max: u32,
}

/// Conversion of stored element charges into a temporary stat boost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargeConversion {
    pub points_per_charge: i32,
    pub turns: u32,
}

/// Element charge bookkeeping for a spell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChargeSpec {
    /// Charges of the spell's element gained per damaging hit.
    pub gain: u32,
    /// Present on self-cast spells that consume the stored charges.
    #[cfg_attr(feature = "serde", serde(default))]
    pub conversion: Option<ChargeConversion>,
}

/// Immutable spell content record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDefinition {
    pub id: SpellId,
    pub name: String,
    pub action_point_cost: u32,
    pub range_min: u32,
    pub range_max: u32,
    pub line_of_sight: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub element: Element,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_min: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_max: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cast_pattern: CastPattern,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect_pattern: EffectPattern,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect_length: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown_turns: u32,
    /// Zero means unlimited.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_casts_per_turn: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pull_caster: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifesteal_pct: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub capture: Option<CaptureSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub summon: Option<SummonSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub area_buff: Option<AreaBuffSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status_effect: Option<StatusEffectSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub eryon_charges: Option<ChargeSpec>,
}

impl SpellDefinition {
    /// Creates a plain single-target damage spell. Tests and content builders
    /// refine it with struct update syntax.
    pub fn new(id: SpellId, name: impl Into<String>, action_point_cost: u32) -> Self {
        Self {
            id,
            name: name.into(),
            action_point_cost,
            range_min: 1,
            range_max: 1,
            line_of_sight: false,
            element: Element::Neutral,
            damage_min: 0,
            damage_max: 0,
            cast_pattern: CastPattern::None,
            effect_pattern: EffectPattern::Single,
            effect_length: 0,
            cooldown_turns: 0,
            max_casts_per_turn: 0,
            pull_caster: false,
            lifesteal_pct: 0,
            capture: None,
            summon: None,
            area_buff: None,
            status_effect: None,
            eryon_charges: None,
        }
    }

    pub fn with_range(mut self, range_min: u32, range_max: u32) -> Self {
        self.range_min = range_min;
        self.range_max = range_max;
        self
    }

    pub fn with_damage(mut self, element: Element, damage_min: u32, damage_max: u32) -> Self {
        self.element = element;
        self.damage_min = damage_min;
        self.damage_max = damage_max;
        self
    }

    pub fn deals_damage(&self) -> bool {
        self.damage_max > 0
    }

    /// Melee spells reach exactly the adjacent ring.
    pub fn is_melee(&self) -> bool {
        self.range_max <= 1
    }

    pub fn allows_self_target(&self) -> bool {
        self.range_min == 0
    }

    pub fn has_cast_limit(&self) -> bool {
        self.max_casts_per_turn > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn both_naming_schemes_map_to_the_same_stat() {
        let pairs = [
            ("force", "earth", ElementalStat::Force),
            ("intelligence", "fire", ElementalStat::Intelligence),
            ("agility", "air", ElementalStat::Agility),
            ("luck", "water", ElementalStat::Luck),
        ];
        for (stat_name, element_name, stat) in pairs {
            let a = Element::from_str(stat_name).expect("stat name parses");
            let b = Element::from_str(element_name).expect("element name parses");
            assert_eq!(a, b);
            assert_eq!(a.stat(), stat);
        }
    }

    #[test]
    fn neutral_scales_with_force() {
        assert_eq!(Element::Neutral.stat(), ElementalStat::Force);
    }
}

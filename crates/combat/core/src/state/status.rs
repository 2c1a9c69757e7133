//! Status effects carried by combatants.
//!
//! Durations count the owner's turns: an effect with `turns = 3` is ticked at
//! the start of the owner's next three turns and removed after the last one.
//! All effects are per-combat and cleared when combat ends.

use crate::state::EntityId;

/// A single status effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffect {
    /// Damage-over-time rolled in `[damage_min, damage_max]` every tick.
    Poison {
        turns: u32,
        damage_min: u32,
        damage_max: u32,
        source: EntityId,
    },
    /// Buff from an allied area spell.
    AreaBuff {
        turns: u32,
        elemental_bonus: i32,
        move_points: u32,
        source: EntityId,
    },
    /// Temporary elemental bonus from converted element charges.
    ChargeBoost { turns: u32, elemental_bonus: i32 },
}

impl StatusEffect {
    pub fn turns(&self) -> u32 {
        match *self {
            StatusEffect::Poison { turns, .. }
            | StatusEffect::AreaBuff { turns, .. }
            | StatusEffect::ChargeBoost { turns, .. } => turns,
        }
    }

    fn turns_mut(&mut self) -> &mut u32 {
        match self {
            StatusEffect::Poison { turns, .. }
            | StatusEffect::AreaBuff { turns, .. }
            | StatusEffect::ChargeBoost { turns, .. } => turns,
        }
    }

    pub fn is_poison(&self) -> bool {
        matches!(self, StatusEffect::Poison { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusEffect::Poison { .. } => "poison",
            StatusEffect::AreaBuff { .. } => "area_buff",
            StatusEffect::ChargeBoost { .. } => "charge_boost",
        }
    }
}

/// Active status effects on one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: Vec<StatusEffect>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Adds an effect. A poison from the same source refreshes the existing
    /// one instead of stacking; buffs from the same source do the same.
    pub fn apply(&mut self, effect: StatusEffect) {
        let existing = self.effects.iter_mut().find(|e| match (**e, effect) {
            (StatusEffect::Poison { source: a, .. }, StatusEffect::Poison { source: b, .. }) => {
                a == b
            }
            (
                StatusEffect::AreaBuff { source: a, .. },
                StatusEffect::AreaBuff { source: b, .. },
            ) => a == b,
            (StatusEffect::ChargeBoost { .. }, StatusEffect::ChargeBoost { .. }) => true,
            _ => false,
        });

        match existing {
            Some(slot) => *slot = effect,
            None => self.effects.push(effect),
        }
    }

    pub fn has_poison(&self) -> bool {
        self.effects.iter().any(StatusEffect::is_poison)
    }

    /// Sum of elemental bonuses granted by buffs and boosts.
    pub fn elemental_bonus(&self) -> i32 {
        self.effects
            .iter()
            .map(|e| match *e {
                StatusEffect::AreaBuff {
                    elemental_bonus, ..
                }
                | StatusEffect::ChargeBoost {
                    elemental_bonus, ..
                } => elemental_bonus,
                StatusEffect::Poison { .. } => 0,
            })
            .sum()
    }

    /// Extra move points granted by active buffs.
    pub fn bonus_move_points(&self) -> u32 {
        self.effects
            .iter()
            .map(|e| match *e {
                StatusEffect::AreaBuff { move_points, .. } => move_points,
                _ => 0,
            })
            .sum()
    }

    /// Poison ticks due this turn as `(damage_min, damage_max, source)`.
    pub fn poison_ticks(&self) -> Vec<(u32, u32, EntityId)> {
        self.effects
            .iter()
            .filter_map(|e| match *e {
                StatusEffect::Poison {
                    damage_min,
                    damage_max,
                    source,
                    ..
                } => Some((damage_min, damage_max, source)),
                _ => None,
            })
            .collect()
    }

    /// Decrements every duration by one and drops expired effects.
    ///
    /// Returns the labels of the effects that expired.
    pub fn decrement(&mut self) -> Vec<&'static str> {
        let mut expired = Vec::new();
        for effect in &mut self.effects {
            let turns = effect.turns_mut();
            *turns = turns.saturating_sub(1);
            if *turns == 0 {
                expired.push(effect.label());
            }
        }
        self.effects.retain(|e| e.turns() > 0);
        expired
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poison(turns: u32, source: u32) -> StatusEffect {
        StatusEffect::Poison {
            turns,
            damage_min: 2,
            damage_max: 4,
            source: EntityId(source),
        }
    }

    #[test]
    fn same_source_poison_refreshes() {
        let mut effects = StatusEffects::empty();
        effects.apply(poison(2, 1));
        effects.apply(poison(3, 1));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.iter().next().map(StatusEffect::turns), Some(3));

        effects.apply(poison(1, 2));
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn decrement_drops_expired_effects() {
        let mut effects = StatusEffects::empty();
        effects.apply(poison(1, 1));
        effects.apply(StatusEffect::ChargeBoost {
            turns: 2,
            elemental_bonus: 10,
        });

        let expired = effects.decrement();
        assert_eq!(expired, vec!["poison"]);
        assert_eq!(effects.elemental_bonus(), 10);

        effects.decrement();
        assert!(effects.is_empty());
    }
}

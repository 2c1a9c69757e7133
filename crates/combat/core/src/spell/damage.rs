//! Damage roll and elemental scaling.
//!
//! `final = round(roll * (1 + per_point * stat))`, floored at zero. The stat is
//! the caster's effective value (base plus buffs and charge boosts) for the
//! spell's element.

use crate::config::CombatConfig;
use crate::env::{SeededRng, context};
use crate::spell::Element;
use crate::state::Combatant;

/// Damage multiplier bonus granted by the caster's stat for `element`.
pub fn elemental_bonus(caster: &Combatant, element: Element, config: &CombatConfig) -> f32 {
    config.elemental_bonus_per_point * caster.effective_stat(element.stat()) as f32
}

/// Uniform roll in `[min, max]`.
pub fn roll_damage(rng: &mut SeededRng, min: u32, max: u32) -> u32 {
    rng.range(context::DAMAGE, min, max.max(min))
}

/// Applies the elemental bonus to a raw roll.
pub fn scale_damage(roll: u32, bonus: f32) -> u32 {
    let scaled = (roll as f32 * (1.0 + bonus)).round();
    if scaled <= 0.0 { 0 } else { scaled as u32 }
}

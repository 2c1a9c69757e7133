//! Loot, experience and gold granted at the end of a won encounter.

use tracing::debug;

use crate::challenge::Challenge;
use crate::env::{CombatEnv, LootEntry, MonsterTemplate, SeededRng, context};
use crate::state::{CombatState, Outcome, Role};

/// One item stack handed to the inventory collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootDrop {
    pub item_id: String,
    pub qty: u32,
}

/// Everything earned by one encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rewards {
    pub xp: u32,
    pub gold: u32,
    pub loot: Vec<LootDrop>,
}

/// Drop rate after the challenge bonus: `min(1, r * (1 + bonus))` for a won
/// encounter with a successful challenge, `r` otherwise.
pub fn effective_drop_rate(base: f32, outcome: Outcome, challenge: Option<&Challenge>) -> f32 {
    match challenge {
        Some(c) if outcome == Outcome::Victory && c.succeeded() => {
            (base * c.drop_multiplier()).min(1.0)
        }
        _ => base,
    }
}

/// XP of the defeated templates, scaled by the challenge bonus and rounded.
pub fn scaled_xp(base_xp: u32, outcome: Outcome, challenge: Option<&Challenge>) -> u32 {
    let multiplier = match challenge {
        Some(c) if outcome == Outcome::Victory => c.xp_multiplier(),
        _ => 1.0,
    };
    (base_xp as f32 * multiplier).round() as u32
}

/// Rolls one loot table. Quantities are uniform in `[qty_min, qty_max]`.
pub fn roll_loot(
    rng: &mut SeededRng,
    table: &[LootEntry],
    outcome: Outcome,
    challenge: Option<&Challenge>,
) -> Vec<LootDrop> {
    table
        .iter()
        .filter_map(|entry| {
            let rate = effective_drop_rate(entry.drop_rate, outcome, challenge);
            if !rng.chance(context::LOOT, rate) {
                return None;
            }
            let qty = rng.range(context::LOOT, entry.qty_min, entry.qty_max.max(entry.qty_min));
            (qty > 0).then(|| LootDrop {
                item_id: entry.item_id.clone(),
                qty,
            })
        })
        .collect()
}

pub fn roll_gold(rng: &mut SeededRng, template: &MonsterTemplate) -> u32 {
    rng.range(context::GOLD, template.gold_min, template.gold_max.max(template.gold_min))
}

/// Adds `drop` to `loot`, merging stacks of the same item.
fn merge(loot: &mut Vec<LootDrop>, drop: LootDrop) {
    match loot.iter_mut().find(|d| d.item_id == drop.item_id) {
        Some(existing) => existing.qty += drop.qty,
        None => loot.push(drop),
    }
}

/// Computes the rewards of a finished encounter. Nothing unless it was won.
///
/// Every hostile that ended at zero hp counts, captured ones included.
/// Draws use the encounter's dice, so replaying the same fight yields the
/// same loot.
pub fn compute_rewards(state: &mut CombatState, env: &CombatEnv<'_>) -> Rewards {
    let outcome = state.outcome;
    if outcome != Outcome::Victory {
        return Rewards::default();
    }

    let templates: Vec<&MonsterTemplate> = state
        .combatants
        .iter()
        .filter(|c| c.role == Role::Hostile && !c.is_alive())
        .filter_map(|c| c.template)
        .filter_map(|t| env.template(t))
        .collect();

    let challenge = state.challenge.clone();
    let base_xp: u32 = templates.iter().map(|t| t.xp).sum();
    let mut rewards = Rewards {
        xp: scaled_xp(base_xp, outcome, challenge.as_ref()),
        ..Rewards::default()
    };
    for template in templates {
        rewards.gold += roll_gold(&mut state.rng, template);
        for drop in roll_loot(&mut state.rng, &template.loot, outcome, challenge.as_ref()) {
            merge(&mut rewards.loot, drop);
        }
    }

    debug!(
        target: "combat::rewards",
        encounter = %state.encounter,
        xp = rewards.xp,
        gold = rewards.gold,
        stacks = rewards.loot.len(),
        "rewards computed"
    );
    rewards
}

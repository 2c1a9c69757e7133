//! Combat state types.
//!
//! - [`CombatState`]: the per-encounter record owned by the session
//! - [`Combatant`]: combat-side view of one participant
//! - [`StatusEffects`]: poison, area buffs and charge boosts
//! - [`WorldMonsterSnapshot`]: pre-combat copy of the encountered hostile

mod actor;
mod combat;
mod common;
mod snapshot;
mod status;

pub use actor::{ActorStats, Combatant, ElementCharges, ElementalStats, Role, TemplateId};
pub use combat::{CombatState, Cooldown, Outcome, TurnPools};
pub use common::{EncounterId, EntityId, Position, ResourcePool, Side};
pub use snapshot::WorldMonsterSnapshot;
pub use status::{StatusEffect, StatusEffects};

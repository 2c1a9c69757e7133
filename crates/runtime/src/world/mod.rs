//! Collaborators the session talks to outside the combat rules.
//!
//! The exploration world, the player's inventory and the respawn queue are
//! owned by the host. The session only calls these traits and never keeps
//! references into their data.

mod memory;

pub use memory::{InMemoryInventory, InMemoryWorld, RespawnQueue, ScheduledRespawn};

use combat_core::{
    CapturedMonster, EntityId, Position, TemplateId, WorldMonsterSnapshot,
};
use serde::{Deserialize, Serialize};

/// A roaming world hostile as seen by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMonster {
    pub id: EntityId,
    pub template: TemplateId,
    pub name: String,
    pub tile: Position,
    pub hp: u32,
    pub hp_max: u32,
    /// Templates spawned alongside this hostile when it is engaged.
    pub pack: Vec<TemplateId>,
    /// Only exists for one combat and must never be written back.
    pub is_combat_clone: bool,
}

impl WorldMonster {
    pub fn snapshot(&self) -> WorldMonsterSnapshot {
        WorldMonsterSnapshot {
            entity: self.id,
            template: self.template,
            name: self.name.clone(),
            tile: self.tile,
            hp: self.hp,
            hp_max: self.hp_max,
            pack: self.pack.clone(),
            is_combat_clone: self.is_combat_clone,
        }
    }
}

/// Exploration world around an encounter.
pub trait EntityWorld {
    fn monster(&self, id: EntityId) -> Option<WorldMonster>;

    fn player_tile(&self) -> Option<Position>;

    /// Stops or resumes roaming AI.
    fn set_roaming_frozen(&mut self, frozen: bool);

    /// Hides every roaming hostile not in `keep`. Returns the ids it hid.
    fn hide_monsters_except(&mut self, keep: &[EntityId]) -> Vec<EntityId>;

    fn unhide_monsters(&mut self, ids: &[EntityId]);

    /// Removes a hostile defeated in combat.
    fn despawn_monster(&mut self, id: EntityId);

    /// Puts a hostile back as snapshotted, recreating it if it is gone.
    fn restore_monster(&mut self, snapshot: &WorldMonsterSnapshot);

    /// Mirrors a combat move on the world entity, if there is one.
    fn sync_position(&mut self, id: EntityId, tile: Position);

    /// Writes the player's hp back after combat.
    fn sync_player_hp(&mut self, hp: u32);
}

/// Player inventory and economy.
pub trait Inventory {
    /// Adds up to `qty` items. Returns how many were accepted; the rest is
    /// dropped.
    fn add_item(&mut self, item_id: &str, qty: u32) -> u32;

    fn add_xp(&mut self, xp: u32);

    fn add_gold(&mut self, gold: u32);

    fn add_captured(&mut self, monster: CapturedMonster);
}

/// Deferred re-materialization of defeated world hostiles.
pub trait RespawnScheduler {
    /// Enqueues only. The host spawns the hostile once `delay_ms` elapsed.
    fn schedule(&mut self, snapshot: WorldMonsterSnapshot, delay_ms: u64);
}

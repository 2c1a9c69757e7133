//! In-memory collaborators for headless runs and tests.

use std::collections::{BTreeMap, BTreeSet};

use combat_core::{CapturedMonster, EntityId, Position, WorldMonsterSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{EntityWorld, Inventory, RespawnScheduler, WorldMonster};

/// World state kept in plain maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorld {
    player_tile: Option<Position>,
    player_hp: Option<u32>,
    monsters: BTreeMap<EntityId, WorldMonster>,
    hidden: BTreeSet<EntityId>,
    frozen: bool,
}

impl InMemoryWorld {
    pub fn new(player_tile: Position) -> Self {
        Self {
            player_tile: Some(player_tile),
            ..Self::default()
        }
    }

    pub fn with_monster(mut self, monster: WorldMonster) -> Self {
        self.insert_monster(monster);
        self
    }

    pub fn insert_monster(&mut self, monster: WorldMonster) {
        self.monsters.insert(monster.id, monster);
    }

    pub fn get(&self, id: EntityId) -> Option<&WorldMonster> {
        self.monsters.get(&id)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &WorldMonster> {
        self.monsters.values()
    }

    pub fn is_hidden(&self, id: EntityId) -> bool {
        self.hidden.contains(&id)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn player_hp(&self) -> Option<u32> {
        self.player_hp
    }
}

impl EntityWorld for InMemoryWorld {
    fn monster(&self, id: EntityId) -> Option<WorldMonster> {
        self.monsters.get(&id).cloned()
    }

    fn player_tile(&self) -> Option<Position> {
        self.player_tile
    }

    fn set_roaming_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    fn hide_monsters_except(&mut self, keep: &[EntityId]) -> Vec<EntityId> {
        let hidden: Vec<EntityId> = self
            .monsters
            .keys()
            .copied()
            .filter(|id| !keep.contains(id) && !self.hidden.contains(id))
            .collect();
        self.hidden.extend(hidden.iter().copied());
        hidden
    }

    fn unhide_monsters(&mut self, ids: &[EntityId]) {
        for id in ids {
            self.hidden.remove(id);
        }
    }

    fn despawn_monster(&mut self, id: EntityId) {
        if self.monsters.remove(&id).is_some() {
            debug!(target: "runtime::world", monster = %id, "despawned");
        }
    }

    fn restore_monster(&mut self, snapshot: &WorldMonsterSnapshot) {
        let monster = WorldMonster {
            id: snapshot.entity,
            template: snapshot.template,
            name: snapshot.name.clone(),
            tile: snapshot.tile,
            hp: snapshot.hp,
            hp_max: snapshot.hp_max,
            pack: snapshot.pack.clone(),
            is_combat_clone: snapshot.is_combat_clone,
        };
        debug!(target: "runtime::world", monster = %monster.id, tile = %monster.tile, "restored");
        self.monsters.insert(monster.id, monster);
    }

    fn sync_position(&mut self, id: EntityId, tile: Position) {
        if id.is_player() {
            self.player_tile = Some(tile);
        } else if let Some(monster) = self.monsters.get_mut(&id) {
            monster.tile = tile;
        }
    }

    fn sync_player_hp(&mut self, hp: u32) {
        self.player_hp = Some(hp);
    }
}

/// Inventory with an optional cap on the total item count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryInventory {
    pub items: BTreeMap<String, u32>,
    pub capacity: Option<u32>,
    pub xp: u64,
    pub gold: u64,
    pub captured: Vec<CapturedMonster>,
}

impl InMemoryInventory {
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    fn total(&self) -> u32 {
        self.items.values().sum()
    }
}

impl Inventory for InMemoryInventory {
    fn add_item(&mut self, item_id: &str, qty: u32) -> u32 {
        let accepted = match self.capacity {
            Some(capacity) => qty.min(capacity.saturating_sub(self.total())),
            None => qty,
        };
        if accepted > 0 {
            *self.items.entry(item_id.to_owned()).or_default() += accepted;
        }
        accepted
    }

    fn add_xp(&mut self, xp: u32) {
        self.xp += u64::from(xp);
    }

    fn add_gold(&mut self, gold: u32) {
        self.gold += u64::from(gold);
    }

    fn add_captured(&mut self, monster: CapturedMonster) {
        self.captured.push(monster);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledRespawn {
    pub snapshot: WorldMonsterSnapshot,
    pub delay_ms: u64,
}

/// Records respawn requests for the host to replay.
#[derive(Debug, Clone, Default)]
pub struct RespawnQueue {
    pub pending: Vec<ScheduledRespawn>,
}

impl RespawnScheduler for RespawnQueue {
    fn schedule(&mut self, snapshot: WorldMonsterSnapshot, delay_ms: u64) {
        self.pending.push(ScheduledRespawn { snapshot, delay_ms });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::TemplateId;

    fn wolf(id: u32) -> WorldMonster {
        WorldMonster {
            id: EntityId(id),
            template: TemplateId(1),
            name: "wolf".into(),
            tile: Position::new(4, 4),
            hp: 30,
            hp_max: 40,
            pack: Vec::new(),
            is_combat_clone: false,
        }
    }

    #[test]
    fn hiding_skips_kept_monsters() {
        let mut world = InMemoryWorld::new(Position::new(0, 0))
            .with_monster(wolf(1))
            .with_monster(wolf(2))
            .with_monster(wolf(3));

        let hidden = world.hide_monsters_except(&[EntityId(2)]);
        assert_eq!(hidden, vec![EntityId(1), EntityId(3)]);
        assert!(!world.is_hidden(EntityId(2)));

        world.unhide_monsters(&hidden);
        assert!(!world.is_hidden(EntityId(1)));
    }

    #[test]
    fn restore_recreates_a_despawned_monster() {
        let mut world = InMemoryWorld::new(Position::new(0, 0)).with_monster(wolf(1));
        let snapshot = world.get(EntityId(1)).unwrap().snapshot();

        world.despawn_monster(EntityId(1));
        assert!(world.monster(EntityId(1)).is_none());

        world.restore_monster(&snapshot);
        assert_eq!(world.get(EntityId(1)).unwrap().hp, 30);
    }

    #[test]
    fn full_inventory_accepts_what_fits() {
        let mut inventory = InMemoryInventory::with_capacity(3);
        assert_eq!(inventory.add_item("fang", 2), 2);
        assert_eq!(inventory.add_item("pelt", 5), 1);
        assert_eq!(inventory.add_item("pelt", 1), 0);
        assert_eq!(inventory.count("pelt"), 1);
    }
}

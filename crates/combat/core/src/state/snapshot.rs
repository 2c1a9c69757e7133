use crate::state::{EntityId, Position, TemplateId};

/// Pre-combat copy of the encountered world hostile.
///
/// Used to restore the world when the player loses and as the respawn
/// template after a victory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldMonsterSnapshot {
    pub entity: EntityId,
    pub template: TemplateId,
    pub name: String,
    pub tile: Position,
    pub hp: u32,
    pub hp_max: u32,
    /// Templates of the whole pack, used to respawn it as a group.
    pub pack: Vec<TemplateId>,
    /// True when the encountered hostile only exists for this combat and must
    /// not be written back to the world.
    pub is_combat_clone: bool,
}

//! Summon pre-action, tried once per turn before the archetype runs.

use tracing::debug;

use crate::ai::{AiAction, AiContext, TurnMemory};
use crate::summon::spawn_tile;

pub(super) fn pre_action(ctx: &AiContext<'_>, memory: &mut TurnMemory) -> Option<AiAction> {
    if memory.summon_tried {
        return None;
    }
    memory.summon_tried = true;

    let spell = ctx.profile.summon_spell?;
    if !ctx.can_cast(spell) {
        return None;
    }
    let tile = spawn_tile(ctx.state, ctx.env.grid, ctx.tile, None)?;
    if !ctx.can_cast_at(spell, tile) {
        debug!(target: "combat::ai", actor = %ctx.actor, %tile, "summon tile not castable");
        return None;
    }
    Some(AiAction::Summon { spell, tile })
}

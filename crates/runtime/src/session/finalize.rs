//! Settlement of a finished or abandoned encounter.

use combat_core::{CombatResult, LootDrop, WorldRestoration, finalize_combat};
use tracing::{info, warn};

use super::{CombatSession, Phase};
use crate::error::{Result, RuntimeError};
use crate::events::{EndReason, Event, LifecycleEvent};
use crate::scheduler::Step;
use crate::world::{EntityWorld, Inventory, RespawnScheduler};

impl<W, I, R> CombatSession<W, I, R>
where
    W: EntityWorld,
    I: Inventory,
    R: RespawnScheduler,
{
    /// Settles the active encounter exactly once.
    ///
    /// Pending steps of the encounter are dropped, rewards reach the
    /// inventory, the world hostile is restored or queued for respawn, hidden
    /// hostiles come back and the hooks see the result record.
    pub(super) fn finalize(&mut self, reason: EndReason) -> Result<CombatResult> {
        if self.finalizing {
            warn!(target: "runtime::session", %reason, "finalize re-entered, ignoring");
            return Err(RuntimeError::Reentrant);
        }
        let not_active = RuntimeError::InvalidPhase {
            expected: Phase::Active,
            actual: self.phase,
        };
        if self.phase != Phase::Active {
            return Err(not_active);
        }
        let (Some(encounter), Some(mut state)) = (self.encounter, self.combat.take()) else {
            return Err(not_active);
        };
        self.finalizing = true;

        let dropped = self.scheduler.cancel(encounter);
        let clone = state
            .world_snapshot
            .as_ref()
            .filter(|s| s.is_combat_clone)
            .map(|s| s.entity);

        let env = self.oracles.as_combat_env();
        let end = finalize_combat(&mut state, &env, &mut self.events);
        self.flush_events();

        let mut result = end.result;
        self.grant_rewards(&mut result);
        self.restore_world(end.restoration);
        if let Some(id) = clone {
            self.world.despawn_monster(id);
        }
        if let Some(player) = &end.player {
            self.player.stats.hp = player.stats.hp;
            self.world.sync_player_hp(player.stats.hp);
        }
        for captured in &result.captured {
            self.inventory.add_captured(captured.clone());
            if self.companion.is_none() {
                self.companion = Some(captured.clone());
            }
        }
        self.world.unhide_monsters(&self.hidden);
        self.hidden.clear();
        self.world.set_roaming_frozen(false);
        self.phase = Phase::Ended;

        info!(
            target: "runtime::session",
            %encounter,
            outcome = %result.outcome,
            %reason,
            rounds = result.rounds,
            xp = result.xp_gained,
            gold = result.gold_gained,
            loot = result.loot.len(),
            dropped_steps = dropped,
            "combat ended"
        );

        self.hooks.notify(&result);
        self.bus
            .publish(Event::Lifecycle(LifecycleEvent::CombatEnded {
                result: result.clone(),
                reason,
            }));
        self.scheduler.schedule(
            encounter,
            self.config.timing.turn_transition_ms,
            Step::Release,
        );
        self.last_result = Some(result.clone());
        self.finalizing = false;
        Ok(result)
    }

    /// Hands loot, XP and gold to the inventory. Items it refuses are dropped
    /// from the result.
    fn grant_rewards(&mut self, result: &mut CombatResult) {
        let mut kept = Vec::with_capacity(result.loot.len());
        for drop in result.loot.drain(..) {
            let accepted = self.inventory.add_item(&drop.item_id, drop.qty);
            if accepted < drop.qty {
                warn!(
                    target: "runtime::session",
                    item = %drop.item_id,
                    wanted = drop.qty,
                    accepted,
                    "inventory refused items"
                );
            }
            if accepted > 0 {
                kept.push(LootDrop {
                    item_id: drop.item_id,
                    qty: accepted,
                });
            }
        }
        result.loot = kept;

        if result.xp_gained > 0 {
            self.inventory.add_xp(result.xp_gained);
        }
        if result.gold_gained > 0 {
            self.inventory.add_gold(result.gold_gained);
        }
    }

    fn restore_world(&mut self, restoration: WorldRestoration) {
        match restoration {
            WorldRestoration::ScheduleRespawn { snapshot, delay_ms } => {
                self.world.despawn_monster(snapshot.entity);
                self.respawns.schedule(snapshot, delay_ms);
            }
            WorldRestoration::RestoreInPlace { snapshot } => {
                self.world.restore_monster(&snapshot);
            }
            WorldRestoration::Nothing => {}
        }
    }
}

//! Hook registry for managing and executing end-of-combat hooks.

use std::collections::BTreeSet;
use std::sync::Arc;

use combat_core::{CombatResult, EncounterId};
use tracing::{debug, error};

use super::{CombatEndHook, HookCriticality, HookError};

/// Registry that notifies end-of-combat hooks.
///
/// Hooks are sorted by priority (lower values first). Each encounter is
/// notified at most once; later calls for the same encounter are ignored.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Arc<dyn CombatEndHook>>,
    notified: BTreeSet<EncounterId>,
}

impl HookRegistry {
    pub fn new(mut hooks: Vec<Arc<dyn CombatEndHook>>) -> Self {
        hooks.sort_by_key(|h| h.priority());
        Self {
            hooks,
            notified: BTreeSet::new(),
        }
    }

    pub fn register(&mut self, hook: Arc<dyn CombatEndHook>) {
        self.hooks.push(hook);
        self.hooks.sort_by_key(|h| h.priority());
    }

    /// Runs every hook for `result`.
    ///
    /// Returns false when this encounter was already notified. Hook failures
    /// are logged according to their criticality and never stop the others.
    pub fn notify(&mut self, result: &CombatResult) -> bool {
        if !self.notified.insert(result.encounter) {
            debug!(
                target: "runtime::hooks",
                encounter = %result.encounter,
                "encounter already notified"
            );
            return false;
        }

        for hook in &self.hooks {
            if let Err(e) = hook.on_combat_end(result) {
                Self::handle_hook_error(hook.as_ref(), e);
            }
        }
        true
    }

    pub fn was_notified(&self, encounter: EncounterId) -> bool {
        self.notified.contains(&encounter)
    }

    /// Returns the number of registered hooks.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Returns an iterator over hook names and priorities (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|h| (h.name(), h.priority()))
    }

    fn handle_hook_error(hook: &dyn CombatEndHook, error: HookError) {
        match hook.criticality() {
            HookCriticality::Important => error!(
                target: "runtime::hooks",
                hook = hook.name(),
                criticality = "important",
                %error,
                "hook failed, continuing"
            ),
            HookCriticality::Optional => debug!(
                target: "runtime::hooks",
                hook = hook.name(),
                criticality = "optional",
                %error,
                "optional hook failed"
            ),
        }
    }
}

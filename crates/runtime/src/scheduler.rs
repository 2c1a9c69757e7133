//! Deferred steps on a virtual clock.
//!
//! Presentation delays (walk animations, cast effects, AI think time) are
//! modeled as steps due at a later time. The host advances the clock with
//! [`Scheduler::advance`] or jumps straight to the next step with
//! [`Scheduler::pop_next`]; nothing here sleeps.

use std::collections::BTreeMap;

use combat_core::{EncounterId, EntityId};

/// Continuation kinds the session driver understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Announce the active actor and hand control to the AI when needed.
    BeginTurn,
    /// Ask the AI for the next action of `actor`.
    AiThink { actor: EntityId },
    /// Settle the decided encounter.
    Finalize,
    /// Discard the ended encounter and return to idle.
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredStep {
    pub encounter: EncounterId,
    pub due_ms: u64,
    pub step: Step,
}

/// Steps ordered by due time, then by scheduling order.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BTreeMap<(u64, u64), (EncounterId, Step)>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn schedule(&mut self, encounter: EncounterId, delay_ms: u64, step: Step) -> u64 {
        let due_ms = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due_ms, self.next_seq), (encounter, step));
        self.next_seq += 1;
        due_ms
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(elapsed_ms);
    }

    /// Next step whose due time has passed.
    pub fn pop_due(&mut self) -> Option<DeferredStep> {
        let (&(due_ms, _), _) = self.queue.first_key_value()?;
        if due_ms > self.now_ms {
            return None;
        }
        self.pop_first()
    }

    /// Next step regardless of its due time. The clock jumps forward to it.
    pub fn pop_next(&mut self) -> Option<DeferredStep> {
        let step = self.pop_first()?;
        self.now_ms = self.now_ms.max(step.due_ms);
        Some(step)
    }

    /// Drops every pending step of `encounter`. Returns how many were dropped.
    pub fn cancel(&mut self, encounter: EncounterId) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, (owner, _)| *owner != encounter);
        before - self.queue.len()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.queue.first_key_value().map(|(&(due, _), _)| due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn pop_first(&mut self) -> Option<DeferredStep> {
        let ((due_ms, _), (encounter, step)) = self.queue.pop_first()?;
        Some(DeferredStep {
            encounter,
            due_ms,
            step,
        })
    }
}

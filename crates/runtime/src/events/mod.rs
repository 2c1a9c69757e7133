//! Topic-based event bus for session events.
//!
//! Core rule events are drained from the combat [`EventLog`](combat_core::EventLog)
//! after every step and republished here, next to turn announcements and
//! lifecycle transitions.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{Controller, EndReason, LifecycleEvent, TurnEvent};

//! Session orchestration for the combat engine.
//!
//! This crate wires the deterministic rules of `combat-core` to the host
//! game: a [`CombatSession`] drives one encounter at a time through its
//! lifecycle, paces it with deferred steps, publishes events and settles the
//! result with the world, inventory and respawn collaborators.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the session, its builder and the step driver
//! - [`scheduler`] keeps deferred steps on a virtual clock
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`hooks`] notifies progression systems when an encounter ends
//! - [`world`] defines the collaborator traits and in-memory versions
//! - [`oracle`] bundles the static content the rules read
pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod oracle;
pub mod scheduler;
pub mod session;
pub mod world;

pub use config::RuntimeConfig;
pub use error::{Result, RuntimeError};
pub use events::{
    Controller, EndReason, Event, EventBus, LifecycleEvent, Topic, TurnEvent,
};
pub use hooks::{CombatEndHook, HookCriticality, HookError, HookRegistry};
pub use oracle::OracleManager;
pub use scheduler::{DeferredStep, Scheduler, Step};
pub use session::{CombatSession, Phase, Preparation, SessionBuilder};
pub use world::{
    EntityWorld, InMemoryInventory, InMemoryWorld, Inventory, RespawnQueue, RespawnScheduler,
    ScheduledRespawn, WorldMonster,
};

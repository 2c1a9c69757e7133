//! Data-driven combat content and loaders.
//!
//! This crate houses the content records consumed by `combat-core` and the
//! loaders for their data files:
//! - Spell catalog (RON)
//! - Monster templates with behavior profiles and loot tables (RON)
//! - Challenge pool (RON)
//! - Placement patterns and per-map anchors (RON)
//! - Map terrain, player profile and scenarios (RON)
//! - Tunables (TOML)
//!
//! Content is consumed through the core oracle traits and never appears in
//! combat state.

pub mod catalog;
pub mod config;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{
    Content, ContentError, MonsterCatalog, PlacementCatalog, PlayerProfile, Scenario,
    SpellCatalog, WorldHostileSpec, loot,
};
pub use config::{ContentConfig, TimingConfig};

#[cfg(feature = "loaders")]
pub use loaders::{
    ChallengeLoader, ConfigLoader, ContentFactory, LoadResult, MapLoader, MonsterLoader,
    PlacementLoader, PlayerLoader, ScenarioLoader, SpellLoader,
};

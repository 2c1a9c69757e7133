//! Content loaders for reading combat data from files.
//!
//! Catalogs are RON, tunables are TOML. Every loader returns
//! [`LoadResult`] with the offending path in the error context.

pub mod challenges;
pub mod config;
pub mod factory;
pub mod map;
pub mod monsters;
pub mod placement;
pub mod scenario;
pub mod spells;

pub use challenges::ChallengeLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use map::MapLoader;
pub use monsters::MonsterLoader;
pub use placement::PlacementLoader;
pub use scenario::{PlayerLoader, ScenarioLoader};
pub use spells::SpellLoader;

use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a whole file into a string.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Reads and parses a RON file.
pub(crate) fn read_ron<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let content = read_file(path)?;
    ron::from_str(&content).with_context(|| format!("failed to parse RON at {}", path.display()))
}

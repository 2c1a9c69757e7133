//! Deterministic tactical combat rules.
//!
//! `combat-core` defines the canonical rules of a grid encounter: turn order
//! and action/move point economy, spell resolution with range, line of sight
//! and effect areas, per-archetype AI, challenges, summons, placement and
//! rewards. It performs no I/O and never waits; the runtime owns timing,
//! content loading and world integration.
//!
//! All state mutation flows through [`engine::CombatEngine`] or the free
//! functions it wraps, and supporting crates depend on the types re-exported
//! here.
pub mod ai;
pub mod challenge;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod movement;
pub mod placement;
pub mod rewards;
pub mod spell;
pub mod state;
pub mod summon;

#[cfg(test)]
pub(crate) mod test_support;

pub use ai::{AiAction, Archetype, BehaviorProfile, TurnMemory};
pub use challenge::{
    Challenge, ChallengeDefinition, ChallengeKind, ChallengeRewards, ChallengeStatus, FailReason,
};
pub use config::CombatConfig;
pub use engine::{
    ActionResult, CombatAction, CombatEngine, ExecuteError, TurnAdvance, TurnError,
};
pub use env::{
    CombatEnv, GridOracle, LootEntry, MapDimensions, MonsterOracle, MonsterTemplate, SeededRng,
    SpellOracle, StaticGrid, TerrainKind, compute_seed,
};
pub use error::{CombatError, ErrorSeverity};
pub use events::{CombatEvent, EventLog};
pub use lifecycle::{
    ChallengeSummary, CombatEnd, CombatResult, StartRequest, WorldRestoration, finalize_combat,
    start_combat,
};
pub use movement::MoveError;
pub use placement::{PlacementError, PlacementPattern, PlacementRequest, PlacementState};
pub use rewards::{LootDrop, Rewards};
pub use spell::{
    AreaBuffSpec, CaptureSpec, CastError, CastPattern, CastReport, EffectPattern, Element,
    ElementalStat, SpellDefinition, SpellId, SpellPreview, StatusEffectSpec, SummonSpec,
    TileReach,
};
pub use state::{
    ActorStats, CombatState, Combatant, ElementalStats, EncounterId, EntityId, Outcome, Position,
    Role, Side, StatusEffect, TemplateId, WorldMonsterSnapshot,
};
pub use summon::CapturedMonster;

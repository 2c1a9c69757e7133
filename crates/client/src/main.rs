//! Headless combat simulator.
//!
//! Loads a scenario from the content directory, places its hostiles in an
//! in-memory world and lets the AI play every encounter on the player's
//! behalf. Lifecycle events and the final tally are written to stdout as
//! JSON lines; logs go to stderr and to a per-session file.
//!
//! ```bash
//! COMBAT_SEED=7 RUST_LOG=runtime=debug cargo run -p combat-sim
//! ```
mod config;

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use combat_content::{ContentFactory, MonsterCatalog, Scenario};
use combat_core::{CombatResult, EntityId};
use runtime::{
    CombatEndHook, CombatSession, Event, HookCriticality, HookError, InMemoryInventory,
    InMemoryWorld, OracleManager, Phase, RespawnQueue, RuntimeConfig, Topic, WorldMonster,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::SimConfig;

type SimSession = CombatSession<InMemoryWorld, InMemoryInventory, RespawnQueue>;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    let _guard = setup_logging(&config)?;

    let mut session = build_session(&config)?;
    let summary = run(&mut session, config.max_encounters)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Logs to stderr and to `{log_dir}/{session}/combat-sim.log`.
fn setup_logging(config: &SimConfig) -> Result<WorkerGuard> {
    let session_id = config
        .session_id
        .clone()
        .unwrap_or_else(|| format!("session_{}", std::process::id()));
    let session_log_dir = config.log_dir().join(&session_id);
    std::fs::create_dir_all(&session_log_dir)
        .with_context(|| format!("cannot create {}", session_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "combat-sim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(session = %session_id, "logging initialized");
    tracing::info!("log file: {}/combat-sim.log", session_log_dir.display());
    Ok(guard)
}

fn build_session(config: &SimConfig) -> Result<SimSession> {
    let factory = ContentFactory::new(config.content_dir.clone());
    let content = factory.load_all()?;
    let player = factory.load_player()?;
    content.validate_player(&player)?;
    let scenario = factory
        .load_scenario(&config.scenario)
        .with_context(|| format!("unknown scenario {}", config.scenario))?;
    let grid = factory.load_map(&scenario.map)?;
    let world = populate(&scenario, &content.monsters)?;

    let mut runtime_config = RuntimeConfig::from_content(&content.config)
        .immediate()
        .with_autopilot(true);
    if let Some(seed) = config.seed {
        runtime_config = runtime_config.with_seed(seed);
    }
    let oracles = OracleManager::new(
        content,
        scenario.map.clone(),
        Arc::new(grid),
        runtime_config.combat.clone(),
    );

    tracing::info!(
        scenario = %config.scenario,
        map = %scenario.map,
        hostiles = scenario.hostiles.len(),
        "scenario loaded"
    );
    Ok(CombatSession::builder(world, InMemoryInventory::default(), RespawnQueue::default())
        .config(runtime_config)
        .oracles(oracles)
        .player(player)
        .hook(Arc::new(ResultLog))
        .build()?)
}

/// World hostiles get ids in scenario order, starting at 1.
fn populate(scenario: &Scenario, monsters: &MonsterCatalog) -> Result<InMemoryWorld> {
    let mut world = InMemoryWorld::new(scenario.player_tile);
    for (index, spec) in scenario.hostiles.iter().enumerate() {
        let Some(template) = monsters.get(spec.template) else {
            bail!("scenario hostile uses unknown template {}", spec.template);
        };
        world.insert_monster(WorldMonster {
            id: EntityId(index as u32 + 1),
            template: spec.template,
            name: template.name.clone(),
            tile: spec.tile,
            hp: template.stats.hp,
            hp_max: template.stats.hp_max,
            pack: spec.pack.clone(),
            is_combat_clone: false,
        });
    }
    Ok(world)
}

/// Fights every world hostile in turn until the player falls.
fn run(session: &mut SimSession, max_encounters: Option<usize>) -> Result<serde_json::Value> {
    let mut lifecycle = session
        .subscribe(Topic::Lifecycle)
        .context("lifecycle topic missing")?;
    let targets: Vec<EntityId> = session.world().monsters().map(|m| m.id).collect();
    let mut results = Vec::new();

    for hostile in targets.into_iter().take(max_encounters.unwrap_or(usize::MAX)) {
        if session.player().stats.hp == 0 {
            tracing::info!("player is down, stopping");
            break;
        }
        session.begin_preparation(hostile, &[])?;
        session.confirm_ready()?;
        let steps = session.run_until_idle();
        if session.phase() == Phase::Active {
            tracing::warn!(steps, "encounter did not settle, disconnecting");
            session.disconnect()?;
        }
        session.run_until_idle();

        while let Ok(event) = lifecycle.try_recv() {
            if let Event::Lifecycle(_) = &event {
                println!("{}", event.to_json()?);
            }
        }
        if let Some(result) = session.last_result() {
            results.push(result.clone());
        }
    }

    Ok(serde_json::json!({
        "encounters": results,
        "player_hp": session.player().stats.hp,
        "inventory": session.inventory(),
        "respawns": session.respawns().pending,
    }))
}

/// Writes every settled encounter to the log.
struct ResultLog;

impl CombatEndHook for ResultLog {
    fn name(&self) -> &'static str {
        "result_log"
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Optional
    }

    fn on_combat_end(&self, result: &CombatResult) -> Result<(), HookError> {
        let line = serde_json::to_string(result)
            .map_err(|error| HookError::new(self.name(), error.to_string()))?;
        tracing::info!(target: "combat_sim", "{line}");
        Ok(())
    }
}

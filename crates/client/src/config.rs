//! Simulation settings read from the process environment.
use std::env;
use std::path::PathBuf;

use combat_content::ContentFactory;

/// Settings of one headless run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub content_dir: PathBuf,
    pub scenario: String,
    /// Overrides the seed of `config.toml`.
    pub seed: Option<u64>,
    pub session_id: Option<String>,
    pub log_dir: Option<PathBuf>,
    /// Stop after this many encounters. All world hostiles when absent.
    pub max_encounters: Option<usize>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            content_dir: ContentFactory::bundled_data_dir(),
            scenario: "wolf_den".to_owned(),
            seed: None,
            session_id: None,
            log_dir: None,
            max_encounters: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `COMBAT_CONTENT_DIR` - Data directory (default: bundled content)
    /// - `COMBAT_SCENARIO` - Scenario name under `scenarios/` (default: wolf_den)
    /// - `COMBAT_SEED` - Base seed of the encounter dice
    /// - `COMBAT_SESSION_ID` - Session identifier for the log directory
    /// - `COMBAT_LOG_DIR` - Log directory (default: platform-specific)
    /// - `COMBAT_MAX_ENCOUNTERS` - Encounters to fight before stopping
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = env::var("COMBAT_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        if let Ok(scenario) = env::var("COMBAT_SCENARIO") {
            config.scenario = scenario;
        }
        config.seed = read_env("COMBAT_SEED");
        config.session_id = env::var("COMBAT_SESSION_ID").ok();
        config.log_dir = env::var("COMBAT_LOG_DIR").ok().map(PathBuf::from);
        config.max_encounters = read_env::<usize>("COMBAT_MAX_ENCOUNTERS").map(|n| n.max(1));

        config
    }

    /// Platform cache directory unless overridden.
    ///
    /// - macOS: `~/Library/Caches/combat-sim/logs`
    /// - Linux: `~/.cache/combat-sim/logs` (or `$XDG_CACHE_HOME/combat-sim/logs`)
    /// - Windows: `%LOCALAPPDATA%\combat-sim\logs`
    pub fn log_dir(&self) -> PathBuf {
        if let Some(dir) = &self.log_dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("", "", "combat-sim")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("/tmp/combat-sim"))
            .join("logs")
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_content() {
        let config = SimConfig::default();
        assert_eq!(config.scenario, "wolf_den");
        assert!(config.content_dir.ends_with("data"));
        assert!(config.seed.is_none());
    }

    #[test]
    fn explicit_log_dir_wins() {
        let config = SimConfig {
            log_dir: Some(PathBuf::from("/var/log/sim")),
            ..SimConfig::default()
        };
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/sim"));
        assert!(SimConfig::default().log_dir().ends_with("logs"));
    }
}

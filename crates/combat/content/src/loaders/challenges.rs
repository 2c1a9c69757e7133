//! Challenge pool loader.

use std::path::Path;

use combat_core::{ChallengeDefinition, ChallengeKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::loaders::{LoadResult, read_ron};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeFile {
    pub challenges: Vec<ChallengeDefinition>,
}

/// Loader for the challenge pool.
pub struct ChallengeLoader;

impl ChallengeLoader {
    /// Loads `(challenges: [...])`.
    ///
    /// Bonuses are clamped to `[0, 1]` and hp thresholds to `[0, 1]`; a
    /// clamped value is logged, not rejected.
    pub fn load(path: &Path) -> LoadResult<Vec<ChallengeDefinition>> {
        let file: ChallengeFile = read_ron(path)?;
        let challenges: Vec<ChallengeDefinition> = file
            .challenges
            .into_iter()
            .map(Self::sanitize)
            .collect();
        debug!(target: "content::loader", path = %path.display(), challenges = challenges.len(), "challenges loaded");
        Ok(challenges)
    }

    fn sanitize(mut def: ChallengeDefinition) -> ChallengeDefinition {
        let clamped = def.rewards.clamped();
        if clamped != def.rewards {
            warn!(target: "content::loader", challenge = %def.id, "challenge bonus clamped to [0, 1]");
            def.rewards = clamped;
        }
        if let ChallengeKind::HpThresholdEnd { min_hp_ratio } = &mut def.kind
            && !(0.0..=1.0).contains(&*min_hp_ratio)
        {
            warn!(target: "content::loader", challenge = %def.id, ratio = *min_hp_ratio, "hp ratio clamped to [0, 1]");
            *min_hp_ratio = min_hp_ratio.clamp(0.0, 1.0);
        }
        def
    }
}

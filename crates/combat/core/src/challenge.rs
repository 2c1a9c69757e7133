//! Optional side objectives.
//!
//! A challenge is drawn once, at preparation or combat start, and carried into
//! the encounter. It is evaluated at combat end unless it already failed, and
//! any non-victory ends it as failed. A successful challenge multiplies XP and
//! loot drop rates by `1 + bonus`.

use tracing::debug;

use crate::env::{GridOracle, SeededRng, context};
use crate::state::{Combatant, Outcome, Position};

/// Objective kinds and their parameters.
#[derive(Clone, Copy, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(ChallengeKindTag))]
#[strum_discriminants(derive(strum::Display, strum::EnumString, strum::EnumIter))]
#[strum_discriminants(strum(serialize_all = "snake_case"))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChallengeKind {
    /// Success iff `final_hp / hp_max_at_start >= min_hp_ratio`.
    HpThresholdEnd { min_hp_ratio: f32 },
    /// Success iff the player ends on the pre-selected tile.
    FinishOnTile,
    /// Fails the first time the player casts with a hostile adjacent.
    NoCastWhenEnemyMelee,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeRewards {
    pub xp_bonus_pct: f32,
    pub drop_bonus_pct: f32,
}

impl ChallengeRewards {
    /// Bonuses clamped to `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            xp_bonus_pct: self.xp_bonus_pct.clamp(0.0, 1.0),
            drop_bonus_pct: self.drop_bonus_pct.clamp(0.0, 1.0),
        }
    }
}

/// Immutable content record.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeDefinition {
    pub id: String,
    pub kind: ChallengeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rewards: ChallengeRewards,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ChallengeStatus {
    #[default]
    Active,
    Success,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FailReason {
    HpTooLow,
    WrongTile,
    CastInMelee,
    NotVictory,
}

/// Mutable run-time data of a drawn challenge.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChallengeData {
    pub fail_reason: Option<FailReason>,
    pub target_tile: Option<Position>,
    pub hp_max_at_start: u32,
}

/// A drawn challenge.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Challenge {
    pub id: String,
    pub kind: ChallengeKind,
    pub rewards: ChallengeRewards,
    pub status: ChallengeStatus,
    pub data: ChallengeData,
}

impl Challenge {
    pub fn from_definition(def: &ChallengeDefinition) -> Self {
        Self {
            id: def.id.clone(),
            kind: def.kind,
            rewards: def.rewards.clamped(),
            status: ChallengeStatus::Active,
            data: ChallengeData::default(),
        }
    }

    pub fn tag(&self) -> ChallengeKindTag {
        ChallengeKindTag::from(self.kind)
    }

    pub fn is_active(&self) -> bool {
        self.status == ChallengeStatus::Active
    }

    fn fail(&mut self, reason: FailReason) {
        self.status = ChallengeStatus::Failed;
        self.data.fail_reason = Some(reason);
        debug!(target: "combat::challenge", id = %self.id, %reason, "challenge failed");
    }

    /// Records a player cast. Returns true if the challenge flipped to failed.
    pub fn observe_cast(&mut self, enemy_adjacent: bool) -> bool {
        if self.is_active()
            && matches!(self.kind, ChallengeKind::NoCastWhenEnemyMelee)
            && enemy_adjacent
        {
            self.fail(FailReason::CastInMelee);
            return true;
        }
        false
    }

    /// Final evaluation at combat end. An already failed challenge stays failed.
    pub fn finalize(&mut self, outcome: Outcome, player: Option<&Combatant>) -> ChallengeStatus {
        if !self.is_active() {
            return self.status;
        }
        if outcome != Outcome::Victory {
            self.fail(FailReason::NotVictory);
            return self.status;
        }

        let passed = match self.kind {
            ChallengeKind::HpThresholdEnd { min_hp_ratio } => {
                let hp = player.map_or(0, |p| p.stats.hp);
                let ratio = if self.data.hp_max_at_start == 0 {
                    0.0
                } else {
                    hp as f32 / self.data.hp_max_at_start as f32
                };
                ratio >= min_hp_ratio || self.fail_with(FailReason::HpTooLow)
            }
            ChallengeKind::FinishOnTile => {
                let tile = player.and_then(|p| p.position);
                (tile.is_some() && tile == self.data.target_tile)
                    || self.fail_with(FailReason::WrongTile)
            }
            ChallengeKind::NoCastWhenEnemyMelee => true,
        };
        if passed {
            self.status = ChallengeStatus::Success;
            debug!(target: "combat::challenge", id = %self.id, "challenge succeeded");
        }
        self.status
    }

    fn fail_with(&mut self, reason: FailReason) -> bool {
        self.fail(reason);
        false
    }

    pub fn succeeded(&self) -> bool {
        self.status == ChallengeStatus::Success
    }

    pub fn xp_multiplier(&self) -> f32 {
        if self.succeeded() {
            1.0 + self.rewards.clamped().xp_bonus_pct
        } else {
            1.0
        }
    }

    pub fn drop_multiplier(&self) -> f32 {
        if self.succeeded() {
            1.0 + self.rewards.clamped().drop_bonus_pct
        } else {
            1.0
        }
    }

    /// Human readable objective and progress.
    pub fn progress_text(&self, player: &Combatant) -> String {
        let objective = match self.kind {
            ChallengeKind::HpThresholdEnd { min_hp_ratio } => {
                let current = if self.data.hp_max_at_start == 0 {
                    0
                } else {
                    player.stats.hp * 100 / self.data.hp_max_at_start
                };
                format!(
                    "Finish with at least {:.0}% HP (now {current}%)",
                    min_hp_ratio * 100.0
                )
            }
            ChallengeKind::FinishOnTile => match self.data.target_tile {
                Some(tile) => {
                    let here = if player.position == Some(tile) {
                        "on it"
                    } else {
                        "not on it"
                    };
                    format!("Finish the fight on tile {tile} ({here})")
                }
                None => "Finish the fight on the marked tile".to_owned(),
            },
            ChallengeKind::NoCastWhenEnemyMelee => {
                "Never cast while an enemy is adjacent".to_owned()
            }
        };
        match (self.status, self.data.fail_reason) {
            (ChallengeStatus::Failed, Some(reason)) => format!("{objective}: failed ({reason})"),
            (ChallengeStatus::Failed, None) => format!("{objective}: failed"),
            (ChallengeStatus::Success, _) => format!("{objective}: success"),
            (ChallengeStatus::Active, _) => objective,
        }
    }
}

/// Draws one challenge at random.
///
/// `finish_on_tile` picks its target from `candidate_tiles` (the allowed
/// placement tiles at preparation), falling back to the first walkable,
/// unoccupied neighbor of the player, then to the player's own tile.
pub fn draw(
    definitions: &[ChallengeDefinition],
    rng: &mut SeededRng,
    grid: &dyn GridOracle,
    candidate_tiles: &[Position],
    occupied: &[Position],
    player_tile: Option<Position>,
    hp_max_at_start: u32,
) -> Option<Challenge> {
    let index = rng.pick(context::CHALLENGE, definitions.len())?;
    let mut challenge = Challenge::from_definition(&definitions[index]);
    challenge.data.hp_max_at_start = hp_max_at_start;

    if matches!(challenge.kind, ChallengeKind::FinishOnTile) {
        let target = rng
            .pick(context::CHALLENGE, candidate_tiles.len())
            .map(|i| candidate_tiles[i])
            .or_else(|| player_tile.map(|p| fallback_target(grid, occupied, p)));
        challenge.data.target_tile = target;
    }

    debug!(
        target: "combat::challenge",
        id = %challenge.id,
        kind = %challenge.tag(),
        "challenge drawn"
    );
    Some(challenge)
}

fn fallback_target(grid: &dyn GridOracle, occupied: &[Position], player: Position) -> Position {
    player
        .neighbors4()
        .into_iter()
        .find(|tile| !grid.is_blocking(*tile) && !occupied.contains(tile))
        .unwrap_or(player)
}

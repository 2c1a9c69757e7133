/// Combat tunables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Damage multiplier gained per point of the relevant elemental stat.
    pub elemental_bonus_per_point: f32,
    /// Fixed part of the summon scaling factor.
    pub summon_scale_base: f32,
    /// Summon scaling gained per player level above the captured level.
    pub summon_scale_per_level: f32,
    /// Share of the owner's hp_max and elemental stats added to a summon.
    pub summon_owner_share: f32,
    /// Maximum stored charges per element.
    pub charge_cap: u32,
    /// Maximum number of hostiles fought together.
    pub max_pack_size: usize,
    /// Delay before a defeated world hostile respawns.
    pub respawn_delay_ms: u64,
    /// Hard cap on AI actions in a single turn.
    pub ai_step_cap: u32,
}

impl CombatConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ELEMENTAL_BONUS_PER_POINT: f32 = 0.02;
    pub const DEFAULT_SUMMON_SCALE_BASE: f32 = 1.05;
    pub const DEFAULT_SUMMON_SCALE_PER_LEVEL: f32 = 0.01;
    pub const DEFAULT_SUMMON_OWNER_SHARE: f32 = 0.5;
    pub const DEFAULT_CHARGE_CAP: u32 = 5;
    pub const DEFAULT_MAX_PACK_SIZE: usize = 8;
    pub const DEFAULT_RESPAWN_DELAY_MS: u64 = 30_000;
    pub const DEFAULT_AI_STEP_CAP: u32 = 16;

    pub fn new() -> Self {
        Self {
            elemental_bonus_per_point: Self::DEFAULT_ELEMENTAL_BONUS_PER_POINT,
            summon_scale_base: Self::DEFAULT_SUMMON_SCALE_BASE,
            summon_scale_per_level: Self::DEFAULT_SUMMON_SCALE_PER_LEVEL,
            summon_owner_share: Self::DEFAULT_SUMMON_OWNER_SHARE,
            charge_cap: Self::DEFAULT_CHARGE_CAP,
            max_pack_size: Self::DEFAULT_MAX_PACK_SIZE,
            respawn_delay_ms: Self::DEFAULT_RESPAWN_DELAY_MS,
            ai_step_cap: Self::DEFAULT_AI_STEP_CAP,
        }
    }

    pub fn with_respawn_delay(mut self, respawn_delay_ms: u64) -> Self {
        self.respawn_delay_ms = respawn_delay_ms;
        self
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

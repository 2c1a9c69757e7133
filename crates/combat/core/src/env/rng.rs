//! Deterministic dice.
//!
//! Every roll of an encounter derives from a base seed and a draw counter so a
//! combat can be replayed exactly by another process applying the same inputs.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Mixes the base seed with the draw counter and a caller context into a
/// per-draw seed.
pub fn compute_seed(base_seed: u64, nonce: u64, context: u32) -> u64 {
    let mut hash = base_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Draw contexts keep independent roll kinds from sharing a sequence shape.
pub mod context {
    pub const DAMAGE: u32 = 1;
    pub const POISON: u32 = 2;
    pub const COIN: u32 = 3;
    pub const PLACEMENT: u32 = 4;
    pub const CHALLENGE: u32 = 5;
    pub const LOOT: u32 = 6;
    pub const GOLD: u32 = 7;
}

/// Seeded dice carried by the combat and preparation states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeededRng {
    pub seed: u64,
    pub nonce: u64,
}

impl SeededRng {
    pub const fn new(seed: u64) -> Self {
        Self { seed, nonce: 0 }
    }

    fn next(&mut self, context: u32) -> u32 {
        let value = PcgRng.next_u32(compute_seed(self.seed, self.nonce, context));
        self.nonce += 1;
        value
    }

    /// Uniform integer in `[min, max]`. Returns `min` when the range is empty.
    pub fn range(&mut self, context: u32, min: u32, max: u32) -> u32 {
        if min >= max {
            self.nonce += 1;
            return min;
        }
        let span = max - min + 1;
        min + self.next(context) % span
    }

    pub fn coin_flip(&mut self, context: u32) -> bool {
        self.next(context) & 1 == 1
    }

    /// True with probability `rate` (clamped to `[0, 1]`).
    pub fn chance(&mut self, context: u32, rate: f32) -> bool {
        let rate = rate.clamp(0.0, 1.0);
        if rate >= 1.0 {
            self.nonce += 1;
            return true;
        }
        let roll = self.next(context) % 10_000;
        (roll as f32) < rate * 10_000.0
    }

    /// Uniform index into a collection of `len` elements.
    pub fn pick(&mut self, context: u32, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.next(context) as usize % len)
    }
}

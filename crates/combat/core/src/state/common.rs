use std::fmt;

/// Unique identifier for any combatant tracked in the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for the controllable player character.
    pub const PLAYER: Self = Self(0);

    /// First identifier handed out to combat-only entities (summons, adds).
    ///
    /// World entities are expected to stay below this range.
    pub const COMBAT_ONLY_BASE: u32 = 0x8000_0000;

    /// Returns true if this entity represents the player.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Returns true if this id was allocated by the combat engine.
    #[inline]
    pub const fn is_combat_only(self) -> bool {
        self.0 >= Self::COMBAT_ONLY_BASE
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::PLAYER
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of one combat encounter. Deferred steps and end-of-combat
/// notifications are keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterId(pub u64);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "encounter-{}", self.0)
    }
}

/// Discrete grid position expressed in tile coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two tiles.
    #[inline]
    pub fn manhattan(self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    #[inline]
    pub const fn offset(self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbors in N, E, S, W order.
    pub fn neighbors4(self) -> [Position; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// Returns true if both tiles share a row or a column.
    #[inline]
    pub fn is_aligned_with(self, other: Position) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// Unit step (each component in -1..=1) pointing from `self` toward `other`.
    pub fn direction_to(self, other: Position) -> (i32, i32) {
        ((other.x - self.x).signum(), (other.y - self.y).signum())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Per-turn resource (action points, move points) of the active actor.
///
/// `current` never exceeds `base` after a reset and never goes below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub current: u32,
    pub base: u32,
}

impl ResourcePool {
    pub const fn new(base: u32) -> Self {
        Self {
            current: base,
            base,
        }
    }

    pub fn reset(&mut self, base: u32) {
        self.base = base;
        self.current = base;
    }

    /// Spends `amount` if available. Leaves the pool untouched otherwise.
    pub fn try_spend(&mut self, amount: u32) -> bool {
        if amount > self.current {
            return false;
        }
        self.current -= amount;
        true
    }

    #[inline]
    pub fn spent(&self) -> u32 {
        self.base.saturating_sub(self.current)
    }
}

/// Which side of the fight a combatant fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Allies,
    Hostiles,
}

impl Side {
    pub const fn opposite(self) -> Side {
        match self {
            Side::Allies => Side::Hostiles,
            Side::Hostiles => Side::Allies,
        }
    }
}

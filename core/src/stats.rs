//! Character classes and the stat bundles handed to spawned enemies.

use serde::{Deserialize, Serialize};

/// Levels at which milestone bonuses stop being granted.
const MILESTONE_CAP: u32 = 40;
/// Milestone bonuses are granted on every multiple of this level.
const MILESTONE_INTERVAL: u32 = 10;

/// Combat archetype an enemy is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    /// Durable melee fighter.
    Knight,
    /// Fast ranged attacker.
    Hunter,
}

impl CharacterClass {
    /// Every class in declaration order.
    pub const ALL: [CharacterClass; 2] = [Self::Knight, Self::Hunter];

    /// Stats of a freshly created level one character.
    #[must_use]
    pub const fn base_stats(self) -> StatBlock {
        match self {
            Self::Knight => StatBlock::new(17, 50, 1, 7),
            Self::Hunter => StatBlock::new(18, 35, 9, 9),
        }
    }

    /// Inclusive bounds of the attack gained per level-up.
    #[must_use]
    pub const fn attack_growth(self) -> (u32, u32) {
        match self {
            Self::Knight => (1, 3),
            Self::Hunter => (2, 4),
        }
    }

    /// Inclusive bounds of the health gained per level-up.
    #[must_use]
    pub const fn health_growth(self) -> (u32, u32) {
        match self {
            Self::Knight => (3, 4),
            Self::Hunter => (1, 3),
        }
    }

    /// Range gained when reaching `level`.
    #[must_use]
    pub const fn range_growth(self, level: u32) -> u32 {
        match self {
            Self::Knight => 0,
            Self::Hunter => milestone_bonus(level),
        }
    }

    /// Speed gained when reaching `level`.
    #[must_use]
    pub const fn speed_growth(self, level: u32) -> u32 {
        milestone_bonus(level)
    }
}

const fn milestone_bonus(level: u32) -> u32 {
    if level % MILESTONE_INTERVAL == 0 && level < MILESTONE_CAP {
        1
    } else {
        0
    }
}

/// Raw combat numbers shared by every character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatBlock {
    /// Damage dealt per attack.
    pub attack: u32,
    /// Maximum hit points.
    pub health: u32,
    /// Attack reach in tiles.
    pub range: u32,
    /// Tiles moved per turn.
    pub speed: u32,
}

impl StatBlock {
    /// Creates a stat block from explicit values.
    #[must_use]
    pub const fn new(attack: u32, health: u32, range: u32, speed: u32) -> Self {
        Self {
            attack,
            health,
            range,
            speed,
        }
    }
}

/// Complete stat bundle used to instantiate an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Class the enemy was built from.
    pub class: CharacterClass,
    /// Experience level, starting at one.
    pub level: u32,
    /// Combat numbers after all level-ups were applied.
    pub stats: StatBlock,
}

impl EnemyStats {
    /// Level one enemy of the provided class.
    #[must_use]
    pub const fn base(class: CharacterClass) -> Self {
        Self {
            class,
            level: 1,
            stats: class.base_stats(),
        }
    }
}

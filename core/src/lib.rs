#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the dungeon spawn engine.
//!
//! This crate defines the vocabulary that connects the map collaborator, the
//! pure spawn systems and the adapters. Systems read the map exclusively
//! through [`RegionQuery`], produce [`SpawnZone`] and [`EnemyToSpawn`] values,
//! and request world mutations by emitting [`Command`] values. The world
//! answers every command with [`Event`] values describing what happened.

use serde::{Deserialize, Serialize};

mod stats;
mod zone;

pub use stats::{CharacterClass, EnemyStats, StatBlock};
pub use zone::SpawnZone;

/// Location of a single map tile expressed as signed column and row indices.
///
/// Coordinates are signed so that sampled candidates falling outside the map
/// can be represented and rejected by bounds checks rather than wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the tile.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the tile.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Computes the Manhattan distance between two grid positions.
    #[must_use]
    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Computes the straight-line distance between two grid positions.
    #[must_use]
    pub fn euclidean_distance(self, other: GridPos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Point in world space on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    /// Horizontal world coordinate.
    pub x: f32,
    /// Depth world coordinate.
    pub z: f32,
}

impl WorldPos {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }
}

/// Opaque identifier of a connected traversable region of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(u32);

impl RegionId {
    /// Creates a new region identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an instantiated actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Difficulty tier governing enemy group composition and minimum zone size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyTier {
    /// Many weak enemies; needs the largest zones.
    Trivial,
    /// Moderate group of mid-level enemies.
    Average,
    /// Moderate group of strong enemies.
    Difficult,
    /// A handful of very strong enemies; fits the smallest zones.
    Impossible,
}

impl EnemyTier {
    /// Number of tiers.
    pub const COUNT: usize = 4;

    /// Every tier in ascending difficulty order.
    pub const ALL: [EnemyTier; Self::COUNT] = [
        Self::Trivial,
        Self::Average,
        Self::Difficult,
        Self::Impossible,
    ];

    /// Zero-based position of the tier in [`EnemyTier::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Trivial => 0,
            Self::Average => 1,
            Self::Difficult => 2,
            Self::Impossible => 3,
        }
    }

    /// Resolves a tier from its index, clamping out-of-range values to the hardest tier.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Trivial,
            1 => Self::Average,
            2 => Self::Difficult,
            _ => Self::Impossible,
        }
    }
}

/// Enemy ready to be instantiated at a concrete tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyToSpawn {
    /// Tile the enemy should occupy.
    pub position: GridPos,
    /// Stats the enemy is created with.
    pub stats: EnemyStats,
    /// Tier of the group the enemy belongs to.
    pub tier: EnemyTier,
}

/// Read-only view of the map that spawn systems operate on.
///
/// Positions outside the map are neither traversable nor occupied and belong
/// to no region.
pub trait RegionQuery {
    /// Width and height of the map measured in tiles.
    fn dimensions(&self) -> (u32, u32);

    /// Reports whether the tile can be walked on.
    fn is_traversable(&self, pos: GridPos) -> bool;

    /// Reports whether an actor currently stands on the tile.
    fn is_occupied(&self, pos: GridPos) -> bool;

    /// Region containing the tile, if the tile is traversable.
    fn region_of(&self, pos: GridPos) -> Option<RegionId>;

    /// Number of tiles contained in the region.
    fn region_size(&self, region: RegionId) -> usize;

    /// Number of distinct regions on the map.
    fn region_count(&self) -> usize;

    /// Converts a tile to the world-space point at its centre.
    fn grid_to_world(&self, pos: GridPos) -> WorldPos;

    /// Reports whether the position lies inside the map bounds.
    fn contains(&self, pos: GridPos) -> bool {
        let (width, height) = self.dimensions();
        pos.x() >= 0 && pos.y() >= 0 && (pos.x() as u32) < width && (pos.y() as u32) < height
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that an enemy be instantiated on the provided tile.
    SpawnEnemy {
        /// Tile the enemy should occupy.
        position: GridPos,
        /// Stats assigned to the new enemy.
        stats: EnemyStats,
    },
    /// Removes every actor from the map, releasing the tiles they occupied.
    ClearActors,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an enemy was created.
    EnemySpawned {
        /// Identifier allocated to the enemy.
        actor: ActorId,
        /// Tile the enemy occupies.
        position: GridPos,
        /// Stats assigned to the enemy.
        stats: EnemyStats,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Tile named in the rejected request.
        position: GridPos,
        /// Specific reason the request failed.
        reason: SpawnRejection,
    },
    /// Confirms that all actors were removed.
    ActorsCleared {
        /// Number of actors that were removed.
        count: usize,
    },
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnRejection {
    /// The tile lies outside the map.
    OutOfBounds,
    /// The tile cannot be walked on.
    NotTraversable,
    /// Another actor already stands on the tile.
    Occupied,
}

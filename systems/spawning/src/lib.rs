#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawn cycle driver that turns a dungeon floor into enemy spawn commands.

use dungeon_spawn_core::{Command, EnemyToSpawn, RegionQuery, SpawnZone};
use dungeon_spawn_system_enemy_allocation::{
    EnemyGroupAllocator, GroupSizeBounds, GroupSizeError,
};
use dungeon_spawn_system_zone_generation::{
    trim_spawn_zones, ConfigError, SpawnZoneGenerator, ZoneGenerationConfig,
};
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration parameters required to construct the spawner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Zone sampling parameters.
    pub zones: ZoneGenerationConfig,
    /// Tile thresholds used to size enemy groups.
    pub groups: GroupSizeBounds,
    /// Dungeon floor the enemies are generated for, starting at one.
    pub depth: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            zones: ZoneGenerationConfig::default(),
            groups: GroupSizeBounds::default(),
            depth: 1,
        }
    }
}

impl SpawnConfig {
    /// Checks every nested section of the configuration.
    pub fn validate(&self) -> Result<(), SpawnConfigError> {
        self.zones.validate()?;
        self.groups.validate()?;
        if self.depth == 0 {
            return Err(SpawnConfigError::ZeroDepth);
        }
        Ok(())
    }
}

/// Reasons a [`SpawnConfig`] is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum SpawnConfigError {
    /// The zone sampling section is invalid.
    #[error("invalid zone configuration: {0}")]
    Zones(#[from] ConfigError),
    /// The group size section is invalid.
    #[error("invalid group configuration: {0}")]
    Groups(#[from] GroupSizeError),
    /// Floors are numbered from one.
    #[error("dungeon depth must be at least 1")]
    ZeroDepth,
}

/// Outcome of a single spawn cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnSummary {
    /// Zones kept after trimming.
    pub zones: usize,
    /// Zones that received at least one enemy.
    pub populated_zones: usize,
    /// Spawn commands emitted.
    pub enemies: usize,
}

/// Orchestrates zone generation, trimming and enemy allocation.
#[derive(Debug)]
pub struct EnemySpawner {
    generator: SpawnZoneGenerator,
    allocator: EnemyGroupAllocator,
    zones: Vec<SpawnZone>,
}

impl EnemySpawner {
    /// Creates a new spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: SpawnConfig) -> Self {
        Self {
            allocator: EnemyGroupAllocator::new(config.groups, config.depth),
            generator: SpawnZoneGenerator::new(config.zones),
            zones: Vec::new(),
        }
    }

    /// Zones produced by the most recent cycle, after allocation.
    #[must_use]
    pub fn spawn_zones(&self) -> &[SpawnZone] {
        &self.zones
    }

    /// Runs a full spawn cycle and emits one spawn command per enemy.
    ///
    /// Zones from any previous cycle are discarded.
    pub fn spawn<Q, R>(&mut self, grid: &Q, rng: &mut R, out: &mut Vec<Command>) -> SpawnSummary
    where
        Q: RegionQuery + ?Sized,
        R: Rng,
    {
        self.zones = self.generator.generate(grid, rng);
        let max_zone_count = self.generator.config().max_zone_count;
        let _ = trim_spawn_zones(&mut self.zones, max_zone_count, rng);

        let enemies = self.allocator.allocate(&mut self.zones, grid, rng);
        out.extend(enemies.iter().map(|enemy| Command::SpawnEnemy {
            position: enemy.position,
            stats: enemy.stats,
        }));

        let summary = SpawnSummary {
            zones: self.zones.len(),
            populated_zones: self.zones.iter().filter(|zone| zone.is_populated()).count(),
            enemies: enemies.len(),
        };
        info!(
            "spawn cycle placed {} enemies in {} of {} zones",
            summary.enemies, summary.populated_zones, summary.zones
        );
        summary
    }
}

/// Generates zones for `grid` and trims them to the configured maximum.
pub fn generate_spawn_zones<Q, R>(
    grid: &Q,
    config: &ZoneGenerationConfig,
    rng: &mut R,
) -> Vec<SpawnZone>
where
    Q: RegionQuery + ?Sized,
    R: Rng,
{
    let mut zones = SpawnZoneGenerator::new(config.clone()).generate(grid, rng);
    let _ = trim_spawn_zones(&mut zones, config.max_zone_count, rng);
    zones
}

/// Fills `zones` with enemy groups produced by `allocator`.
pub fn allocate_enemies<Q, R>(
    zones: &mut [SpawnZone],
    grid: &Q,
    allocator: &EnemyGroupAllocator,
    rng: &mut R,
) -> Vec<EnemyToSpawn>
where
    Q: RegionQuery + ?Sized,
    R: Rng,
{
    allocator.allocate(zones, grid, rng)
}

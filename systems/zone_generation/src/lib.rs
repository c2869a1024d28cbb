#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Poisson-disc style placement of circular enemy spawn zones.
//!
//! Zones grow outwards from the middle of the map: every accepted zone becomes
//! an anchor that later candidates are sampled around, until no anchor can
//! produce another zone that is traversable, clear of its neighbours and holds
//! an acceptable number of free tiles.

use std::f32::consts::TAU;

use dungeon_spawn_core::{GridPos, RegionQuery, SpawnZone};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sampled radii are quantised to this many steps per tile.
const RADIUS_PRECISION: f32 = 100.0;
/// Number of discrete angles a candidate direction is drawn from.
const ANGLE_STEPS: u32 = 100;

/// Tuning knobs controlling how spawn zones are sampled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneGenerationConfig {
    /// Growth of the sampling distance per attempt; increase slightly to spread zones apart.
    pub distance_between_zones_scale: f32,
    /// Smallest radius a zone can have, in world units.
    pub lower_radius: f32,
    /// Largest radius a zone can have, in world units.
    pub upper_radius: f32,
    /// Fewest free tiles an accepted zone may contain.
    pub min_tiles_per_zone: usize,
    /// Most free tiles an accepted zone may contain.
    pub max_tiles_per_zone: usize,
    /// Zones beyond this count are discarded at random after generation.
    pub max_zone_count: usize,
    /// Candidates tried around an anchor before the anchor is retired.
    pub num_samples_before_rejection: u32,
    /// World-space edge length of a tile; radii are divided by it.
    pub cell_size: f32,
}

impl Default for ZoneGenerationConfig {
    fn default() -> Self {
        Self {
            distance_between_zones_scale: 0.1,
            lower_radius: 2.0,
            upper_radius: 6.0,
            min_tiles_per_zone: 3,
            max_tiles_per_zone: 100,
            max_zone_count: 100,
            num_samples_before_rejection: 50,
            cell_size: 1.0,
        }
    }
}

impl ZoneGenerationConfig {
    /// Checks that the configuration describes a usable sampler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(self.cell_size));
        }
        if !self.lower_radius.is_finite()
            || !self.upper_radius.is_finite()
            || self.lower_radius < 0.0
            || self.lower_radius > self.upper_radius
        {
            return Err(ConfigError::InvalidRadiusBounds {
                lower: self.lower_radius,
                upper: self.upper_radius,
            });
        }
        if self.min_tiles_per_zone > self.max_tiles_per_zone {
            return Err(ConfigError::InvalidTileBounds {
                min: self.min_tiles_per_zone,
                max: self.max_tiles_per_zone,
            });
        }
        if !self.distance_between_zones_scale.is_finite() || self.distance_between_zones_scale < 0.0
        {
            return Err(ConfigError::InvalidDistanceScale(
                self.distance_between_zones_scale,
            ));
        }
        Ok(())
    }

    /// Smallest sampled radius measured in tiles.
    #[must_use]
    pub fn lower_radius_in_tiles(&self) -> f32 {
        self.lower_radius / self.cell_size
    }

    /// Largest sampled radius measured in tiles.
    #[must_use]
    pub fn upper_radius_in_tiles(&self) -> f32 {
        self.upper_radius / self.cell_size
    }
}

/// Reasons a [`ZoneGenerationConfig`] is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The tile size is zero, negative or not a number.
    #[error("cell size must be a positive finite number, got {0}")]
    InvalidCellSize(f32),
    /// The radius bounds are negative, inverted or not numbers.
    #[error("zone radius bounds {lower}..{upper} are invalid")]
    InvalidRadiusBounds {
        /// Configured lower radius.
        lower: f32,
        /// Configured upper radius.
        upper: f32,
    },
    /// The minimum tile count exceeds the maximum.
    #[error("zone tile bounds {min}..={max} are inverted")]
    InvalidTileBounds {
        /// Configured minimum tile count.
        min: usize,
        /// Configured maximum tile count.
        max: usize,
    },
    /// The distance growth factor is negative or not a number.
    #[error("distance between zones scale must be non-negative, got {0}")]
    InvalidDistanceScale(f32),
}

/// Pure system that samples non-overlapping spawn zones over a map.
#[derive(Debug, Default)]
pub struct SpawnZoneGenerator {
    config: ZoneGenerationConfig,
    occupancy: Vec<Option<usize>>,
    anchors: Vec<[f32; 2]>,
}

impl SpawnZoneGenerator {
    /// Creates a generator using the provided tuning.
    #[must_use]
    pub fn new(config: ZoneGenerationConfig) -> Self {
        Self {
            config,
            occupancy: Vec::new(),
            anchors: Vec::new(),
        }
    }

    /// Tuning the generator samples with.
    #[must_use]
    pub fn config(&self) -> &ZoneGenerationConfig {
        &self.config
    }

    /// Samples a fresh list of spawn zones over the map.
    ///
    /// Maps without traversable tiles yield no zones.
    pub fn generate<Q, R>(&mut self, grid: &Q, rng: &mut R) -> Vec<SpawnZone>
    where
        Q: RegionQuery + ?Sized,
        R: Rng,
    {
        let mut zones = Vec::new();
        let (width, height) = grid.dimensions();
        let cell_count = usize::try_from(width)
            .ok()
            .zip(usize::try_from(height).ok())
            .and_then(|(width, height)| width.checked_mul(height))
            .unwrap_or(0);
        if cell_count == 0 {
            return zones;
        }

        self.occupancy.clear();
        self.occupancy.resize(cell_count, None);
        self.anchors.clear();
        self.anchors.push([(width / 2) as f32, (height / 2) as f32]);

        let samples = self.config.num_samples_before_rejection;
        let distance_scale = self.config.distance_between_zones_scale;
        let tile_bounds = self.config.min_tiles_per_zone..=self.config.max_tiles_per_zone;

        while !self.anchors.is_empty() {
            let anchor_index = rng.gen_range(0..self.anchors.len());
            let anchor = self.anchors[anchor_index];
            let mut candidate_accepted = false;

            for sample in 0..samples {
                let angle = rng.gen_range(0..ANGLE_STEPS) as f32 / ANGLE_STEPS as f32 * TAU;
                let radius = self.sample_radius(rng);
                let direction = [angle.sin(), angle.cos()];
                let reach = sampling_reach(radius, sample, distance_scale);
                let candidate = GridPos::new(
                    (anchor[0] + direction[0] * reach).ceil() as i32,
                    (anchor[1] + direction[1] * reach).ceil() as i32,
                );

                if !self.is_valid(grid, candidate, radius, &zones) {
                    continue;
                }
                let Some(zone) = create_spawn_zone(grid, candidate, radius) else {
                    continue;
                };

                let tiles = zone.unpopulated_count();
                if !tile_bounds.contains(&tiles) {
                    continue;
                }

                debug!(
                    "accepted zone at {candidate:?} (radius {radius:.2}, {tiles} tiles, {:?})",
                    zone.region()
                );
                if let Some(offset) = cell_index(width, height, candidate) {
                    self.occupancy[offset] = Some(zones.len());
                }
                self.anchors.push(zone.center());
                zones.push(zone);
                candidate_accepted = true;
                break;
            }

            if !candidate_accepted {
                let _ = self.anchors.remove(anchor_index);
            }
        }

        zones
    }

    fn sample_radius<R: Rng>(&self, rng: &mut R) -> f32 {
        let lower = (self.config.lower_radius_in_tiles() * RADIUS_PRECISION) as i32;
        let upper = (self.config.upper_radius_in_tiles() * RADIUS_PRECISION) as i32;
        let steps = if upper > lower {
            rng.gen_range(lower..upper)
        } else {
            lower
        };
        steps as f32 / RADIUS_PRECISION
    }

    /// Checks that the candidate sits on a walkable tile inside the map and
    /// that no accepted zone within reach overlaps it.
    fn is_valid<Q>(&self, grid: &Q, candidate: GridPos, radius: f32, zones: &[SpawnZone]) -> bool
    where
        Q: RegionQuery + ?Sized,
    {
        if !grid.contains(candidate) || !grid.is_traversable(candidate) {
            return false;
        }

        let (width, height) = grid.dimensions();
        let reach = (radius + self.config.upper_radius_in_tiles()).ceil() as i32;
        let (columns, rows) = scan_window(candidate, reach, width, height);

        for x in columns {
            for y in rows.clone() {
                let Some(offset) = cell_index(width, height, GridPos::new(x, y)) else {
                    continue;
                };
                let Some(zone_index) = self.occupancy[offset] else {
                    continue;
                };
                let other = &zones[zone_index];
                let distance = candidate.euclidean_distance(other.position());
                if distance <= radius + other.radius() {
                    return false;
                }
            }
        }
        true
    }
}

/// Builds a zone centred on `candidate` holding every free walkable tile within `radius`.
fn create_spawn_zone<Q>(grid: &Q, candidate: GridPos, radius: f32) -> Option<SpawnZone>
where
    Q: RegionQuery + ?Sized,
{
    let region = grid.region_of(candidate)?;
    let (width, height) = grid.dimensions();
    let (columns, rows) = scan_window(candidate, radius.ceil() as i32, width, height);

    let mut tiles = Vec::new();
    for x in columns {
        for y in rows.clone() {
            let tile = GridPos::new(x, y);
            if !grid.is_traversable(tile) || grid.is_occupied(tile) {
                continue;
            }
            if candidate.euclidean_distance(tile) <= radius {
                tiles.push(tile);
            }
        }
    }

    Some(SpawnZone::new(candidate, radius, region).with_tiles(tiles))
}

/// Discards random zones until at most `max_zone_count` remain.
///
/// Returns the number of zones removed.
pub fn trim_spawn_zones<R: Rng>(
    zones: &mut Vec<SpawnZone>,
    max_zone_count: usize,
    rng: &mut R,
) -> usize {
    let mut removed = 0;
    while zones.len() > max_zone_count {
        let index = rng.gen_range(0..zones.len());
        let _ = zones.remove(index);
        removed += 1;
    }

    if removed > 0 {
        debug!("trimmed {removed} spawn zones down to {max_zone_count}");
    }
    removed
}

/// Distance from the anchor at which the `sample`-th candidate is placed.
///
/// The reach never drops below `radius` and grows linearly with the attempt
/// index once `sample * distance_scale` exceeds one.
fn sampling_reach(radius: f32, sample: u32, distance_scale: f32) -> f32 {
    radius * (sample as f32 * distance_scale).max(1.0)
}

fn scan_window(
    center: GridPos,
    reach: i32,
    width: u32,
    height: u32,
) -> (std::ops::RangeInclusive<i32>, std::ops::RangeInclusive<i32>) {
    let max_x = i32::try_from(width).unwrap_or(i32::MAX).saturating_sub(1);
    let max_y = i32::try_from(height).unwrap_or(i32::MAX).saturating_sub(1);
    let reach = reach.max(0);
    (
        center.x().saturating_sub(reach).max(0)..=center.x().saturating_add(reach).min(max_x),
        center.y().saturating_sub(reach).max(0)..=center.y().saturating_add(reach).min(max_y),
    )
}

fn cell_index(width: u32, height: u32, cell: GridPos) -> Option<usize> {
    let column = u32::try_from(cell.x()).ok()?;
    let row = u32::try_from(cell.y()).ok()?;
    if column >= width || row >= height {
        return None;
    }
    let width = usize::try_from(width).ok()?;
    usize::try_from(row)
        .ok()?
        .checked_mul(width)?
        .checked_add(usize::try_from(column).ok()?)
}

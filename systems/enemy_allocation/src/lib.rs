#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Region-aware distribution of difficulty-tiered enemy groups into spawn zones.
//!
//! Zones are ordered so that the largest regions come first, a difficulty
//! budget is spread across the tiers with a Gaussian bias towards the middle
//! region index, and each tier's groups are placed greedily into the first
//! zones of the current region that are large enough to host them.

use std::cmp::Reverse;

use dungeon_spawn_core::{EnemyTier, EnemyToSpawn, RegionQuery, SpawnZone};
use log::{debug, info};
use rand::Rng;

mod sampling;
mod templates;

use sampling::{next_gaussian, random_index_with_exclusion};
pub use templates::{
    enemy_at_level, EnemyGroup, EnemyGroupTemplate, GroupSizeBounds, GroupSizeError,
};

/// Pure system that turns spawn zones into concrete enemies to instantiate.
#[derive(Debug)]
pub struct EnemyGroupAllocator {
    templates: [EnemyGroupTemplate; EnemyTier::COUNT],
    sizes: GroupSizeBounds,
    depth: u32,
}

impl Default for EnemyGroupAllocator {
    fn default() -> Self {
        Self::new(GroupSizeBounds::default(), 1)
    }
}

impl EnemyGroupAllocator {
    /// Creates an allocator for a dungeon floor `depth` levels deep.
    #[must_use]
    pub fn new(sizes: GroupSizeBounds, depth: u32) -> Self {
        Self {
            templates: EnemyTier::ALL.map(|tier| EnemyGroupTemplate::for_tier(tier, &sizes)),
            sizes,
            depth,
        }
    }

    /// Template used to generate groups of the provided tier.
    #[must_use]
    pub fn template(&self, tier: EnemyTier) -> &EnemyGroupTemplate {
        &self.templates[tier.index()]
    }

    /// Orders the zones by region, distributes the tiers and fills the zones.
    ///
    /// Zones that receive a group are marked populated. Requests that find no
    /// qualifying zone in their region are dropped.
    pub fn allocate<Q, R>(
        &self,
        zones: &mut [SpawnZone],
        grid: &Q,
        rng: &mut R,
    ) -> Vec<EnemyToSpawn>
    where
        Q: RegionQuery + ?Sized,
        R: Rng,
    {
        let mut enemies = Vec::new();
        sort_zones_by_region_size(zones, grid);
        let groups_by_tier = distribute_groups_into_regions(grid.region_count(), rng);
        debug!("tier distribution across regions: {groups_by_tier:?}");

        let Some(first) = zones.first() else {
            return enemies;
        };
        let mut current_region = first.region();
        let mut zone_index = 0;

        'tiers: for tier in EnemyTier::ALL {
            let minimum_tiles = self.sizes.minimum_tiles(tier);

            for _ in 0..groups_by_tier[tier.index()] {
                if zone_index >= zones.len() {
                    break 'tiers;
                }

                while zone_index < zones.len() && zones[zone_index].region() == current_region {
                    let zone = &mut zones[zone_index];
                    zone_index += 1;

                    if zone.unpopulated_count() >= minimum_tiles {
                        let group = self.template(tier).generate(self.depth, rng);
                        populate_spawn_zone(group, zone, rng, &mut enemies);
                        break;
                    }
                }

                match zones.get(zone_index) {
                    None => break 'tiers,
                    Some(next) if next.region() != current_region => {
                        current_region = next.region();
                        break;
                    }
                    Some(_) => {}
                }
            }
        }

        info!(
            "allocated {} enemies across {} populated zones",
            enemies.len(),
            zones.iter().filter(|zone| zone.is_populated()).count()
        );
        enemies
    }
}

/// Sorts zones so that zones in larger regions come first.
///
/// Zones of equally sized regions are grouped by region id; their order
/// within a region is unspecified.
pub fn sort_zones_by_region_size<Q>(zones: &mut [SpawnZone], grid: &Q)
where
    Q: RegionQuery + ?Sized,
{
    zones.sort_unstable_by_key(|zone| (Reverse(grid.region_size(zone.region())), zone.region()));
}

/// Spreads one unit per region across the difficulty tiers.
///
/// The first units seed every tier in turn; the rest are drawn from a normal
/// distribution centred on half the region count and clamped to the hardest
/// tier.
pub fn distribute_groups_into_regions<R: Rng>(
    num_regions: usize,
    rng: &mut R,
) -> [usize; EnemyTier::COUNT] {
    let mut counts = [0; EnemyTier::COUNT];
    let mean = (num_regions / 2) as f64;
    let max = i64::try_from(num_regions).unwrap_or(i64::MAX);

    for region in 0..num_regions {
        let seeded_tier = region % EnemyTier::COUNT;
        if counts[seeded_tier] == 0 {
            counts[seeded_tier] += 1;
            continue;
        }

        let drawn = next_gaussian(mean, 1.0, 0, max, rng);
        let tier = usize::try_from(drawn).unwrap_or(0).min(EnemyTier::COUNT - 1);
        counts[tier] += 1;
    }

    counts
}

/// Scatters the group over distinct random free tiles of the zone.
fn populate_spawn_zone<R: Rng>(
    group: EnemyGroup,
    zone: &mut SpawnZone,
    rng: &mut R,
    out: &mut Vec<EnemyToSpawn>,
) {
    let tiles = zone.unpopulated_tiles().to_vec();
    let mut chosen = Vec::with_capacity(group.members.len());
    let mut populated = Vec::with_capacity(group.members.len());

    for stats in group.members {
        let Some(index) = random_index_with_exclusion(tiles.len(), &chosen, rng) else {
            break;
        };
        chosen.push(index);
        populated.push(tiles[index]);
        out.push(EnemyToSpawn {
            position: tiles[index],
            stats,
            tier: group.tier,
        });
    }

    zone.populate_tiles(&populated);
}

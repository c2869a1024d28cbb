//! Circular clusters of tiles that enemies may be spawned into.

use std::collections::HashSet;

use crate::{GridPos, RegionId};

/// Circular region of map tiles eligible to host spawned enemies.
///
/// Every tile belongs to at most one of the unpopulated and populated
/// partitions. Once tiles have been populated the zone stays populated for
/// the rest of the spawn cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnZone {
    position: GridPos,
    radius: f32,
    region: RegionId,
    unpopulated: Vec<GridPos>,
    populated: Vec<GridPos>,
    is_populated: bool,
}

impl SpawnZone {
    /// Creates an empty zone centred on `position`.
    #[must_use]
    pub fn new(position: GridPos, radius: f32, region: RegionId) -> Self {
        Self {
            position,
            radius,
            region,
            unpopulated: Vec::new(),
            populated: Vec::new(),
            is_populated: false,
        }
    }

    /// Replaces the zone's unpopulated tiles, consuming and returning the zone.
    #[must_use]
    pub fn with_tiles(mut self, tiles: Vec<GridPos>) -> Self {
        self.set_zone_tiles(tiles);
        self
    }

    /// Replaces the zone's unpopulated tiles.
    ///
    /// Duplicates keep their first occurrence; tiles already populated are dropped.
    pub fn set_zone_tiles(&mut self, tiles: Vec<GridPos>) {
        let mut seen = HashSet::with_capacity(tiles.len());
        let populated = &self.populated;
        self.unpopulated = tiles
            .into_iter()
            .filter(|tile| !populated.contains(tile) && seen.insert(*tile))
            .collect();
    }

    /// Centre tile of the zone.
    #[must_use]
    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Centre of the zone as a real-valued point.
    #[must_use]
    pub fn center(&self) -> [f32; 2] {
        [self.position.x() as f32, self.position.y() as f32]
    }

    /// Reach of the zone measured in tiles.
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Region containing the zone's centre.
    #[must_use]
    pub const fn region(&self) -> RegionId {
        self.region
    }

    /// Tiles that can still receive an enemy.
    #[must_use]
    pub fn unpopulated_tiles(&self) -> &[GridPos] {
        &self.unpopulated
    }

    /// Tiles already assigned an enemy.
    #[must_use]
    pub fn populated_tiles(&self) -> &[GridPos] {
        &self.populated
    }

    /// Number of tiles that can still receive an enemy.
    #[must_use]
    pub fn unpopulated_count(&self) -> usize {
        self.unpopulated.len()
    }

    /// Number of tiles already assigned an enemy.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.populated.len()
    }

    /// Reports whether any enemy group was placed in the zone.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.is_populated
    }

    /// Moves the provided tiles from the unpopulated to the populated partition.
    ///
    /// An empty slice is a no-op. Tiles that are not currently unpopulated are
    /// ignored.
    pub fn populate_tiles(&mut self, tiles: &[GridPos]) {
        if tiles.is_empty() {
            return;
        }

        for tile in tiles {
            if let Some(index) = self.unpopulated.iter().position(|candidate| candidate == tile) {
                let moved = self.unpopulated.remove(index);
                self.populated.push(moved);
            }
        }
        self.is_populated = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone_with_tiles(count: i32) -> SpawnZone {
        let tiles = (0..count).map(|x| GridPos::new(x, 0)).collect();
        SpawnZone::new(GridPos::new(0, 0), 2.5, RegionId::new(0)).with_tiles(tiles)
    }

    #[test]
    fn empty_population_is_a_no_op() {
        let mut zone = zone_with_tiles(4);
        zone.populate_tiles(&[]);

        assert!(!zone.is_populated());
        assert_eq!(zone.unpopulated_count(), 4);
        assert_eq!(zone.populated_count(), 0);
    }

    #[test]
    fn populating_moves_tiles_between_partitions() {
        let mut zone = zone_with_tiles(4);
        zone.populate_tiles(&[GridPos::new(1, 0), GridPos::new(3, 0)]);

        assert!(zone.is_populated());
        assert_eq!(
            zone.unpopulated_tiles(),
            &[GridPos::new(0, 0), GridPos::new(2, 0)]
        );
        assert_eq!(
            zone.populated_tiles(),
            &[GridPos::new(1, 0), GridPos::new(3, 0)]
        );
    }

    #[test]
    fn populated_flag_survives_later_empty_calls() {
        let mut zone = zone_with_tiles(2);
        zone.populate_tiles(&[GridPos::new(0, 0)]);
        zone.populate_tiles(&[]);

        assert!(zone.is_populated());
        assert_eq!(zone.populated_count(), 1);
    }

    #[test]
    fn unknown_tiles_never_enter_populated_partition() {
        let mut zone = zone_with_tiles(2);
        zone.populate_tiles(&[GridPos::new(9, 9), GridPos::new(0, 0), GridPos::new(0, 0)]);

        assert_eq!(zone.populated_tiles(), &[GridPos::new(0, 0)]);
        assert_eq!(zone.unpopulated_tiles(), &[GridPos::new(1, 0)]);
        for tile in zone.populated_tiles() {
            assert!(!zone.unpopulated_tiles().contains(tile));
        }
    }

    #[test]
    fn duplicate_tiles_are_stored_once() {
        let tile = GridPos::new(1, 1);
        let mut zone = SpawnZone::new(tile, 2.0, RegionId::new(0))
            .with_tiles(vec![tile, GridPos::new(2, 1), tile]);

        assert_eq!(zone.unpopulated_tiles(), &[tile, GridPos::new(2, 1)]);

        zone.populate_tiles(&[tile]);

        assert_eq!(zone.populated_tiles(), &[tile]);
        assert_eq!(zone.unpopulated_tiles(), &[GridPos::new(2, 1)]);
    }

    #[test]
    fn resetting_tiles_skips_populated_ones() {
        let mut zone = zone_with_tiles(3);
        zone.populate_tiles(&[GridPos::new(0, 0)]);
        zone.set_zone_tiles(vec![GridPos::new(0, 0), GridPos::new(5, 0), GridPos::new(5, 0)]);

        assert_eq!(zone.unpopulated_tiles(), &[GridPos::new(5, 0)]);
        assert_eq!(zone.populated_tiles(), &[GridPos::new(0, 0)]);
    }
}

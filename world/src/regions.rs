//! Connected-component labelling of the traversable tiles.

use std::collections::VecDeque;

use dungeon_spawn_core::{GridPos, RegionId};

/// Dense region labels for every tile of the map.
///
/// Regions are 4-connected components of traversable tiles, numbered in the
/// row-major order of the first tile discovered for each component. Walls
/// carry no label.
#[derive(Clone, Debug, Default)]
pub(crate) struct RegionMap {
    width: u32,
    height: u32,
    labels: Vec<Option<RegionId>>,
    sizes: Vec<usize>,
}

impl RegionMap {
    /// Rebuilds the labels using a breadth-first flood from every unlabelled tile.
    pub(crate) fn rebuild_with<F>(&mut self, width: u32, height: u32, mut is_traversable: F)
    where
        F: FnMut(GridPos) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;
        self.sizes.clear();
        self.labels.clear();
        self.labels.resize(cell_count, None);

        if cell_count == 0 {
            return;
        }

        let mut queue = VecDeque::new();

        for row in 0..height {
            for column in 0..width {
                let seed = GridPos::new(column as i32, row as i32);
                let Some(seed_index) = index(width, height, seed) else {
                    continue;
                };
                if self.labels[seed_index].is_some() || !is_traversable(seed) {
                    continue;
                }

                let region = RegionId::new(self.sizes.len() as u32);
                let mut size = 0;
                self.labels[seed_index] = Some(region);
                queue.push_back(seed);

                while let Some(tile) = queue.pop_front() {
                    size += 1;

                    for neighbor in neighbors(tile) {
                        let Some(neighbor_index) = index(width, height, neighbor) else {
                            continue;
                        };
                        if self.labels[neighbor_index].is_some() || !is_traversable(neighbor) {
                            continue;
                        }

                        self.labels[neighbor_index] = Some(region);
                        queue.push_back(neighbor);
                    }
                }

                self.sizes.push(size);
            }
        }
    }

    /// Region containing the tile, if any.
    #[must_use]
    pub(crate) fn region_of(&self, tile: GridPos) -> Option<RegionId> {
        index(self.width, self.height, tile).and_then(|offset| self.labels[offset])
    }

    /// Number of tiles belonging to the region; unknown regions are empty.
    #[must_use]
    pub(crate) fn size(&self, region: RegionId) -> usize {
        usize::try_from(region.get())
            .ok()
            .and_then(|offset| self.sizes.get(offset).copied())
            .unwrap_or(0)
    }

    /// Number of labelled regions.
    #[must_use]
    pub(crate) fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Tile counts of every region indexed by region id.
    #[must_use]
    pub(crate) fn sizes(&self) -> &[usize] {
        &self.sizes
    }
}

fn neighbors(tile: GridPos) -> [GridPos; 4] {
    [
        GridPos::new(tile.x(), tile.y() - 1),
        GridPos::new(tile.x() + 1, tile.y()),
        GridPos::new(tile.x(), tile.y() + 1),
        GridPos::new(tile.x() - 1, tile.y()),
    ]
}

pub(crate) fn index(width: u32, height: u32, tile: GridPos) -> Option<usize> {
    let column = u32::try_from(tile.x()).ok()?;
    let row = u32::try_from(tile.y()).ok()?;
    if column >= width || row >= height {
        return None;
    }

    let width = usize::try_from(width).ok()?;
    let column = usize::try_from(column).ok()?;
    let row = usize::try_from(row).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative tile map for the dungeon spawn engine.
//!
//! The [`TileMap`] answers every [`RegionQuery`] the spawn systems ask and
//! executes the [`Command`] values they emit through [`apply`].

use dungeon_spawn_core::{
    ActorId, Command, EnemyStats, Event, GridPos, RegionId, RegionQuery, SpawnRejection, WorldPos,
};
use log::warn;
use thiserror::Error;

mod regions;

use regions::{index, RegionMap};

const DEFAULT_CELL_SIZE: f32 = 1.0;
const WALL_GLYPH: char = '#';
const FLOOR_GLYPH: char = '.';

/// Errors raised while parsing a textual map layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The layout contained no rows.
    #[error("map layout is empty")]
    Empty,
    /// A row's length differs from the first row.
    #[error("row {row} has {found} tiles but the map is {expected} tiles wide")]
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A character other than a wall or floor glyph was found.
    #[error("unknown glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column of the character.
        column: usize,
        /// Zero-based row of the character.
        row: usize,
    },
}

/// Enemy instantiated on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    /// Identifier allocated when the actor was spawned.
    pub id: ActorId,
    /// Tile the actor occupies.
    pub position: GridPos,
    /// Stats the actor was created with.
    pub stats: EnemyStats,
}

/// Dungeon floor layout together with the actors standing on it.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: u32,
    height: u32,
    cell_size: f32,
    offset: WorldPos,
    traversable: Vec<bool>,
    occupants: Vec<Option<ActorId>>,
    regions: RegionMap,
    actors: Vec<Actor>,
    next_actor: u32,
}

impl TileMap {
    /// Creates a map of the provided size where every tile is walkable.
    #[must_use]
    pub fn open(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_| true)
    }

    /// Creates a map whose walkable tiles are selected by `is_traversable`.
    #[must_use]
    pub fn from_fn<F>(width: u32, height: u32, mut is_traversable: F) -> Self
    where
        F: FnMut(GridPos) -> bool,
    {
        let mut traversable = Vec::new();
        for row in 0..height {
            for column in 0..width {
                traversable.push(is_traversable(GridPos::new(column as i32, row as i32)));
            }
        }

        let mut map = Self {
            width,
            height,
            cell_size: DEFAULT_CELL_SIZE,
            offset: WorldPos::new(0.0, 0.0),
            occupants: vec![None; traversable.len()],
            traversable,
            regions: RegionMap::default(),
            actors: Vec::new(),
            next_actor: 0,
        };
        map.rebuild_regions();
        map
    }

    /// Parses a layout where `#` marks walls and `.` marks floor tiles.
    ///
    /// Rows are read top to bottom; blank lines are skipped.
    pub fn from_ascii(layout: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let Some(first) = rows.first() else {
            return Err(MapError::Empty);
        };
        let width = first.chars().count();

        let mut traversable = Vec::with_capacity(width * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MapError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }

            for (column, glyph) in line.chars().enumerate() {
                match glyph {
                    WALL_GLYPH => traversable.push(false),
                    FLOOR_GLYPH => traversable.push(true),
                    _ => return Err(MapError::UnknownGlyph { glyph, column, row }),
                }
            }
        }

        let width = width as u32;
        let height = rows.len() as u32;
        Ok(Self::from_fn(width, height, |tile| {
            index(width, height, tile).map_or(false, |offset| traversable[offset])
        }))
    }

    /// Sets the world-space edge length of a tile.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Sets the world-space offset subtracted from every converted tile centre.
    #[must_use]
    pub fn with_offset(mut self, offset: WorldPos) -> Self {
        self.offset = offset;
        self
    }

    /// World-space edge length of a tile.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    fn rebuild_regions(&mut self) {
        let (width, height) = (self.width, self.height);
        let traversable = &self.traversable;
        self.regions.rebuild_with(width, height, |tile| {
            index(width, height, tile).map_or(false, |offset| traversable[offset])
        });
    }

    fn tile_index(&self, pos: GridPos) -> Option<usize> {
        index(self.width, self.height, pos)
    }

    fn spawn_enemy(
        &mut self,
        position: GridPos,
        stats: EnemyStats,
    ) -> Result<ActorId, SpawnRejection> {
        let offset = self.tile_index(position).ok_or(SpawnRejection::OutOfBounds)?;
        if !self.traversable[offset] {
            return Err(SpawnRejection::NotTraversable);
        }
        if self.occupants[offset].is_some() {
            return Err(SpawnRejection::Occupied);
        }

        let id = ActorId::new(self.next_actor);
        self.next_actor = self.next_actor.wrapping_add(1);
        self.occupants[offset] = Some(id);
        self.actors.push(Actor {
            id,
            position,
            stats,
        });
        Ok(id)
    }

    fn clear_actors(&mut self) -> usize {
        self.occupants.fill(None);
        let count = self.actors.len();
        self.actors.clear();
        count
    }
}

impl RegionQuery for TileMap {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_traversable(&self, pos: GridPos) -> bool {
        self.tile_index(pos)
            .map_or(false, |offset| self.traversable[offset])
    }

    fn is_occupied(&self, pos: GridPos) -> bool {
        self.tile_index(pos)
            .map_or(false, |offset| self.occupants[offset].is_some())
    }

    fn region_of(&self, pos: GridPos) -> Option<RegionId> {
        self.regions.region_of(pos)
    }

    fn region_size(&self, region: RegionId) -> usize {
        self.regions.size(region)
    }

    fn region_count(&self) -> usize {
        self.regions.count()
    }

    fn grid_to_world(&self, pos: GridPos) -> WorldPos {
        let half = self.cell_size / 2.0;
        WorldPos::new(
            pos.x() as f32 * self.cell_size + half - self.offset.x,
            pos.y() as f32 * self.cell_size + half - self.offset.z,
        )
    }
}

/// Applies the provided command to the map, mutating state deterministically.
pub fn apply(map: &mut TileMap, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnEnemy { position, stats } => match map.spawn_enemy(position, stats) {
            Ok(actor) => out_events.push(Event::EnemySpawned {
                actor,
                position,
                stats,
            }),
            Err(reason) => {
                warn!("rejected enemy spawn at {position:?}: {reason:?}");
                out_events.push(Event::SpawnRejected { position, reason });
            }
        },
        Command::ClearActors => {
            let count = map.clear_actors();
            out_events.push(Event::ActorsCleared { count });
        }
    }
}

/// Query functions that provide read-only access to the map state.
pub mod query {
    use dungeon_spawn_core::{GridPos, RegionQuery};

    use super::{Actor, TileMap};

    /// Actors currently standing on the map in spawn order.
    #[must_use]
    pub fn actors(map: &TileMap) -> &[Actor] {
        &map.actors
    }

    /// Tiles currently occupied by an actor in row-major order.
    #[must_use]
    pub fn occupied_tiles(map: &TileMap) -> Vec<GridPos> {
        let (width, height) = map.dimensions();
        (0..height)
            .flat_map(|row| (0..width).map(move |column| GridPos::new(column as i32, row as i32)))
            .filter(|tile| map.is_occupied(*tile))
            .collect()
    }

    /// Tile counts of every region indexed by region id.
    #[must_use]
    pub fn region_sizes(map: &TileMap) -> &[usize] {
        map.regions.sizes()
    }
}

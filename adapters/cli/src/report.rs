//! Text and JSON renderings of a finished spawn cycle.

use std::fmt::Write as _;

use dungeon_spawn_core::{CharacterClass, EnemyStats, GridPos, RegionQuery, SpawnZone};
use dungeon_spawn_system_spawning::SpawnSummary;
use dungeon_spawn_world::{query, TileMap};
use serde::Serialize;

const WALL: char = '#';
const FLOOR: char = '.';
const ZONE_TILE: char = 'o';
const ZONE_CENTRE: char = '+';

/// Everything a spawn cycle produced, ready for serialisation.
#[derive(Debug, Serialize)]
pub(crate) struct SpawnReport {
    pub(crate) seed: u64,
    pub(crate) summary: SpawnSummary,
    pub(crate) zones: Vec<ZoneReport>,
    pub(crate) enemies: Vec<EnemyReport>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ZoneReport {
    pub(crate) position: GridPos,
    pub(crate) radius: f32,
    pub(crate) region: u32,
    pub(crate) free_tiles: usize,
    pub(crate) populated_tiles: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct EnemyReport {
    pub(crate) position: GridPos,
    pub(crate) stats: EnemyStats,
}

impl SpawnReport {
    /// Collects the zones retained by the spawner and the actors on the map.
    pub(crate) fn collect(
        seed: u64,
        summary: SpawnSummary,
        zones: &[SpawnZone],
        map: &TileMap,
    ) -> Self {
        Self {
            seed,
            summary,
            zones: zones
                .iter()
                .map(|zone| ZoneReport {
                    position: zone.position(),
                    radius: zone.radius(),
                    region: zone.region().get(),
                    free_tiles: zone.unpopulated_count(),
                    populated_tiles: zone.populated_count(),
                })
                .collect(),
            enemies: query::actors(map)
                .iter()
                .map(|actor| EnemyReport {
                    position: actor.position,
                    stats: actor.stats,
                })
                .collect(),
        }
    }

    /// Human readable listing printed below the map overlay.
    pub(crate) fn describe(&self) -> String {
        let mut text = String::new();
        let _ = writeln!(
            text,
            "seed {}: {} enemies in {} of {} zones",
            self.seed, self.summary.enemies, self.summary.populated_zones, self.summary.zones
        );
        for zone in &self.zones {
            let _ = writeln!(
                text,
                "  zone ({:>3},{:>3}) r={:.2} region {:>2}: {} free, {} populated",
                zone.position.x(),
                zone.position.y(),
                zone.radius,
                zone.region,
                zone.free_tiles,
                zone.populated_tiles
            );
        }
        for enemy in &self.enemies {
            let stats = enemy.stats.stats;
            let _ = writeln!(
                text,
                "  {:?} lv{} at ({},{}): atk {} hp {} rng {} spd {}",
                enemy.stats.class,
                enemy.stats.level,
                enemy.position.x(),
                enemy.position.y(),
                stats.attack,
                stats.health,
                stats.range,
                stats.speed
            );
        }
        text
    }
}

/// Draws the map with zone tiles, zone centres and spawned enemies marked.
pub(crate) fn render_overlay(map: &TileMap, zones: &[SpawnZone]) -> String {
    let (width, height) = map.dimensions();
    let mut rows: Vec<Vec<char>> = (0..height)
        .map(|y| {
            (0..width)
                .map(|x| {
                    if map.is_traversable(GridPos::new(x as i32, y as i32)) {
                        FLOOR
                    } else {
                        WALL
                    }
                })
                .collect()
        })
        .collect();

    let mut mark = |position: GridPos, glyph: char| {
        let cell = usize::try_from(position.y())
            .ok()
            .zip(usize::try_from(position.x()).ok())
            .and_then(|(y, x)| rows.get_mut(y).and_then(|row| row.get_mut(x)));
        if let Some(cell) = cell {
            *cell = glyph;
        }
    };

    for zone in zones {
        for tile in zone.unpopulated_tiles() {
            mark(*tile, ZONE_TILE);
        }
        mark(zone.position(), ZONE_CENTRE);
    }
    for actor in query::actors(map) {
        mark(actor.position, class_glyph(actor.stats.class));
    }

    let mut text = String::new();
    for row in rows {
        text.extend(row);
        text.push('\n');
    }
    text
}

fn class_glyph(class: CharacterClass) -> char {
    match class {
        CharacterClass::Knight => 'K',
        CharacterClass::Hunter => 'H',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dungeon_spawn_core::{Command, RegionId};
    use dungeon_spawn_world as world;

    #[test]
    fn overlay_marks_walls_zones_and_enemies() {
        let mut map = TileMap::from_ascii("#####\n#...#\n#...#\n#####\n").expect("layout parses");
        let mut events = Vec::new();
        world::apply(
            &mut map,
            Command::SpawnEnemy {
                position: GridPos::new(3, 2),
                stats: EnemyStats::base(CharacterClass::Hunter),
            },
            &mut events,
        );
        let zone = SpawnZone::new(GridPos::new(2, 1), 1.0, RegionId::new(0))
            .with_tiles(vec![GridPos::new(1, 1), GridPos::new(2, 1)]);

        let overlay = render_overlay(&map, &[zone]);

        assert_eq!(overlay, "#####\n#o+.#\n#..H#\n#####\n");
    }

    #[test]
    fn report_serialises_to_json() {
        let map = TileMap::open(3, 3);
        let zone = SpawnZone::new(GridPos::new(1, 1), 1.0, RegionId::new(0))
            .with_tiles(vec![GridPos::new(1, 1)]);
        let summary = SpawnSummary {
            zones: 1,
            populated_zones: 0,
            enemies: 0,
        };

        let report = SpawnReport::collect(9, summary, &[zone], &map);
        let json = serde_json::to_value(&report).expect("report serialises");

        assert_eq!(json["seed"].as_u64(), Some(9));
        assert_eq!(json["summary"]["zones"].as_u64(), Some(1));
        assert_eq!(json["zones"][0]["free_tiles"].as_u64(), Some(1));
        assert!(report.describe().starts_with("seed 9: 0 enemies in 0 of 1 zones"));
    }
}

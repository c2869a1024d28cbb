use dungeon_spawn_core::{CharacterClass, Command, EnemyStats, GridPos, RegionQuery, SpawnZone};
use dungeon_spawn_system_zone_generation::{
    trim_spawn_zones, SpawnZoneGenerator, ZoneGenerationConfig,
};
use dungeon_spawn_world::{self as world, TileMap};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEEDS: [u64; 6] = [1, 2, 3, 0xdead_beef, 0x1234_5678, 42];

fn pillared_hall() -> TileMap {
    TileMap::from_fn(40, 30, |tile| {
        let border = tile.x() == 0 || tile.y() == 0 || tile.x() == 39 || tile.y() == 29;
        let pillar = tile.x() % 7 == 3 && tile.y() % 5 == 2;
        !border && !pillar
    })
}

fn assert_no_overlap(zones: &[SpawnZone]) {
    for (index, zone) in zones.iter().enumerate() {
        for other in &zones[index + 1..] {
            let distance = zone.position().euclidean_distance(other.position());
            assert!(
                distance > zone.radius() + other.radius(),
                "zones at {:?} and {:?} overlap",
                zone.position(),
                other.position()
            );
        }
    }
}

#[test]
fn small_open_grid_yields_bounded_zone_count() {
    let map = TileMap::open(10, 10);
    assert_eq!(map.region_count(), 1);
    let config = ZoneGenerationConfig {
        min_tiles_per_zone: 3,
        max_tiles_per_zone: 100,
        max_zone_count: 5,
        num_samples_before_rejection: 50,
        ..ZoneGenerationConfig::default()
    };

    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut generator = SpawnZoneGenerator::new(config.clone());
        let mut zones = generator.generate(&map, &mut rng);
        let _ = trim_spawn_zones(&mut zones, config.max_zone_count, &mut rng);

        assert!(
            (1..=5).contains(&zones.len()),
            "seed {seed} produced {} zones",
            zones.len()
        );
        for zone in &zones {
            assert!((3..=100).contains(&zone.unpopulated_count()));
        }
    }
}

#[test]
fn zones_never_overlap() {
    let map = pillared_hall();
    let mut generator = SpawnZoneGenerator::new(ZoneGenerationConfig::default());

    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let zones = generator.generate(&map, &mut rng);
        assert!(!zones.is_empty(), "seed {seed} produced no zones");
        assert_no_overlap(&zones);
    }
}

#[test]
fn zone_tile_counts_respect_configured_bounds() {
    let map = pillared_hall();
    let config = ZoneGenerationConfig {
        min_tiles_per_zone: 12,
        max_tiles_per_zone: 40,
        ..ZoneGenerationConfig::default()
    };
    let mut generator = SpawnZoneGenerator::new(config);

    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for zone in generator.generate(&map, &mut rng) {
            assert!(
                (12..=40).contains(&zone.unpopulated_count()),
                "zone at {:?} holds {} tiles",
                zone.position(),
                zone.unpopulated_count()
            );
            assert_eq!(zone.populated_count(), 0);
            assert!(!zone.is_populated());
        }
    }
}

#[test]
fn zone_centres_and_tiles_are_walkable_and_free() {
    let map = pillared_hall();
    let mut generator = SpawnZoneGenerator::new(ZoneGenerationConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(99);

    for zone in generator.generate(&map, &mut rng) {
        assert!(map.is_traversable(zone.position()));
        assert_eq!(map.region_of(zone.position()), Some(zone.region()));
        for tile in zone.unpopulated_tiles() {
            assert!(map.is_traversable(*tile));
            assert!(!map.is_occupied(*tile));
            assert!(zone.position().euclidean_distance(*tile) <= zone.radius());
        }
    }
}

#[test]
fn map_without_walkable_tiles_yields_no_zones() {
    let map = TileMap::from_fn(12, 12, |_| false);
    let mut generator = SpawnZoneGenerator::new(ZoneGenerationConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    assert!(generator.generate(&map, &mut rng).is_empty());
}

#[test]
fn empty_map_yields_no_zones() {
    let map = TileMap::open(0, 0);
    let mut generator = SpawnZoneGenerator::new(ZoneGenerationConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    assert!(generator.generate(&map, &mut rng).is_empty());
}

#[test]
fn unreachable_tile_bounds_yield_no_zones() {
    let map = TileMap::open(10, 10);
    let config = ZoneGenerationConfig {
        min_tiles_per_zone: 500,
        max_tiles_per_zone: 600,
        ..ZoneGenerationConfig::default()
    };
    let mut generator = SpawnZoneGenerator::new(config);
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    assert!(generator.generate(&map, &mut rng).is_empty());
}

#[test]
fn generation_is_deterministic_for_same_seed() {
    let map = pillared_hall();
    let mut generator = SpawnZoneGenerator::new(ZoneGenerationConfig::default());

    let first = generator.generate(&map, &mut ChaCha8Rng::seed_from_u64(17));
    let second = generator.generate(&map, &mut ChaCha8Rng::seed_from_u64(17));

    assert_eq!(first, second);
}

#[test]
fn trimming_generated_zones_never_exceeds_maximum() {
    let map = pillared_hall();
    let mut generator = SpawnZoneGenerator::new(ZoneGenerationConfig::default());

    for seed in SEEDS {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut zones = generator.generate(&map, &mut rng);
        let before = zones.len();
        let removed = trim_spawn_zones(&mut zones, 3, &mut rng);

        assert_eq!(zones.len(), before.min(3));
        assert_eq!(removed, before.saturating_sub(3));
        assert_no_overlap(&zones);
    }
}

#[test]
fn occupied_tiles_are_excluded_from_zones() {
    let mut map = TileMap::open(10, 10);
    let mut events = Vec::new();
    let blocked = GridPos::new(5, 5);
    world::apply(
        &mut map,
        Command::SpawnEnemy {
            position: blocked,
            stats: EnemyStats::base(CharacterClass::Knight),
        },
        &mut events,
    );

    let mut generator = SpawnZoneGenerator::new(ZoneGenerationConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(21);
    for zone in generator.generate(&map, &mut rng) {
        assert!(!zone.unpopulated_tiles().contains(&blocked));
    }
}

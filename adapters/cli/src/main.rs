#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a spawn cycle over a dungeon floor.

mod report;
mod seed;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use dungeon_spawn_core::Event;
use dungeon_spawn_system_spawning::{EnemySpawner, SpawnConfig};
use dungeon_spawn_world::{self as world, TileMap};
use env_logger::Env;
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use report::{render_overlay, SpawnReport};
use seed::seed_from_phrase;

/// Places enemy spawn zones on a dungeon floor and fills them with enemies.
#[derive(Debug, Parser)]
#[command(name = "dungeon-spawn", version, about)]
struct Args {
    /// ASCII floor layout where `#` is a wall and `.` is floor.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Width of the open room used when no map is given.
    #[arg(long, default_value_t = 32)]
    width: u32,
    /// Height of the open room used when no map is given.
    #[arg(long, default_value_t = 20)]
    height: u32,
    /// TOML file overriding the default spawn configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed phrase; integers are used as the seed directly.
    #[arg(long, default_value = "dungeon")]
    seed: String,
    /// Dungeon floor to generate enemies for, overriding the configuration.
    #[arg(long)]
    depth: Option<u32>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Log sampling decisions at debug level.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Entry point for the dungeon spawn command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = load_config(&args)?;
    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    config
        .validate()
        .context("spawn configuration is invalid")?;

    let mut map = load_map(&args)?.with_cell_size(config.zones.cell_size);
    let seed = seed_from_phrase(&args.seed);
    info!("running spawn cycle with seed {seed}");

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut spawner = EnemySpawner::new(config);
    let mut commands = Vec::new();
    let summary = spawner.spawn(&map, &mut rng, &mut commands);

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut map, command, &mut events);
    }
    let rejected = events
        .iter()
        .filter(|event| matches!(event, Event::SpawnRejected { .. }))
        .count();
    if rejected > 0 {
        warn!("{rejected} spawn commands were rejected by the map");
    }

    let report = SpawnReport::collect(seed, summary, spawner.spawn_zones(), &map);
    match args.format {
        Format::Text => {
            print!("{}", render_overlay(&map, spawner.spawn_zones()));
            print!("{}", report.describe());
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .try_init();
}

fn load_config(args: &Args) -> Result<SpawnConfig> {
    let Some(path) = &args.config else {
        return Ok(SpawnConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn load_map(args: &Args) -> Result<TileMap> {
    if let Some(path) = &args.map {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read map {}", path.display()))?;
        return TileMap::from_ascii(&text)
            .with_context(|| format!("failed to parse map {}", path.display()));
    }

    if args.width == 0 || args.height == 0 {
        bail!("room dimensions must be non-zero, got {}x{}", args.width, args.height);
    }
    Ok(TileMap::open(args.width, args.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults_for_missing_fields() {
        let config: SpawnConfig = toml::from_str(
            "depth = 3\n\n[zones]\nmax_zone_count = 7\n\n[groups]\nlarge = 10\n",
        )
        .expect("config parses");

        assert_eq!(config.depth, 3);
        assert_eq!(config.zones.max_zone_count, 7);
        assert_eq!(config.zones.upper_radius, 6.0);
        assert_eq!(config.groups.large, 10);
        assert_eq!(config.groups.small, 2);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn arguments_parse_with_defaults() {
        let args = Args::try_parse_from(["dungeon-spawn", "--seed", "crypt", "--format", "json"])
            .expect("arguments parse");

        assert_eq!(args.seed, "crypt");
        assert_eq!(args.format, Format::Json);
        assert_eq!((args.width, args.height), (32, 20));
        assert!(args.map.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn zero_sized_room_is_rejected() {
        let args =
            Args::try_parse_from(["dungeon-spawn", "--width", "0"]).expect("arguments parse");
        assert!(load_map(&args).is_err());
    }
}

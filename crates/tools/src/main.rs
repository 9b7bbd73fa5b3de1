use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use dungeon::{ConnectivityMode, DungeonConfig, DungeonGenerator, SeedChoice};
use log::{LevelFilter, Log, Metadata, Record};

#[derive(Parser)]
#[command(author, version, about = "Generate a dungeon layout and print a summary", long_about = None)]
struct Args {
    /// Seed for the run; a runtime seed is generated when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML or JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<i32>,
    #[arg(long)]
    depth: Option<i32>,
    #[arg(long)]
    height: Option<i32>,
    #[arg(long)]
    max_room_size: Option<u32>,
    #[arg(long)]
    door_width: Option<u32>,
    #[arg(long)]
    branch_chance: Option<f64>,
    /// Drop rooms the first traversal misses instead of bridging them
    #[arg(long)]
    prune_unreached: bool,
    /// Fail when the layout cannot be fully connected
    #[arg(long)]
    reject_fragmented: bool,
    /// Write the generated dungeon as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
    /// Print the ASCII grid dump
    #[arg(long)]
    grid: bool,
    /// Repeat for more log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let _ = writeln!(
                io::stderr(),
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|err| anyhow::anyhow!("logger already installed: {err}"))?;
    log::set_max_level(match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    });
    Ok(())
}

fn build_config(args: &Args) -> Result<DungeonConfig> {
    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => DungeonConfig::default(),
    };

    if let Some(width) = args.width {
        config.bounds.width = width;
    }
    if let Some(depth) = args.depth {
        config.bounds.depth = depth;
    }
    if let Some(height) = args.height {
        config.bounds.height = height;
    }
    if let Some(max_room_size) = args.max_room_size {
        config.max_room_size = max_room_size;
    }
    if let Some(door_width) = args.door_width {
        config.door_width = door_width;
    }
    if let Some(branch_chance) = args.branch_chance {
        config.branch_chance = branch_chance;
    }
    if args.prune_unreached {
        config.connectivity = ConnectivityMode::PruneUnreached;
    }
    config.reject_fragmented |= args.reject_fragmented;

    config.validate().context("Invalid generation parameters")?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = build_config(&args)?;
    let seed = SeedChoice::resolve(args.seed);
    let dungeon = DungeonGenerator::new(config)
        .generate(seed.value())
        .with_context(|| format!("Generation failed for seed {}", seed.value()))?;

    if args.grid {
        print!("{}", dungeon.grid.render_ascii());
    }

    match seed {
        SeedChoice::Explicit(value) => println!("Seed: {value}"),
        SeedChoice::Generated(value) => println!("Seed: {value} (generated)"),
    }
    println!("Rooms: {}", dungeon.rooms.len());
    println!("Doors: {}", dungeon.doors.len());
    println!("Wall pieces: {}", dungeon.walls.len());
    println!(
        "Components: {} ({} forced bridges, {} rooms dropped)",
        dungeon.connectivity.components,
        dungeon.connectivity.forced_bridges,
        dungeon.connectivity.removed_rooms.len()
    );
    match &dungeon.reachability {
        Some(reach) => {
            println!("Reachable cells: {}/{}", reach.visited.len(), reach.walkable_total)
        }
        None => println!("Reachable cells: flood fill skipped"),
    }
    println!("Fingerprint: {:016x}", dungeon.fingerprint());

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&dungeon)
            .context("Failed to serialize dungeon JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write dungeon JSON: {}", path.display()))?;
    }

    Ok(())
}

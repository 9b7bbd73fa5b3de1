use anyhow::{Result, bail};
use clap::Parser;
use dungeon::mapgen::{Dungeon, corner_code, count_components, count_cover_at, door_probes};
use dungeon::{Bounds, ConnectivityMode, DungeonConfig, DungeonGenerator, TileKind};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    runs: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_config(rng: &mut ChaCha8Rng) -> DungeonConfig {
    DungeonConfig {
        bounds: Bounds {
            width: choose(rng, &[8, 16, 20, 33, 40, 64]),
            depth: choose(rng, &[8, 12, 20, 30, 47]),
            height: choose(rng, &[1, 3]),
        },
        max_room_size: choose(rng, &[4, 6, 8, 12, 16]),
        door_width: choose(rng, &[1, 2, 3]),
        branch_chance: choose(rng, &[0.0, 0.2, 0.35, 0.7, 1.0]),
        connectivity: choose(rng, &[ConnectivityMode::Bridge, ConnectivityMode::PruneUnreached]),
        ..DungeonConfig::default()
    }
}

fn check(dungeon: &Dungeon) -> Result<()> {
    for door in &dungeon.doors {
        for probe in door_probes(door) {
            let cover = count_cover_at(&dungeon.rooms, probe);
            if cover != 2 {
                bail!("door {:?} probe {:?} covered by {cover} rooms", door.id, probe);
            }
        }
    }

    let components = count_components(&dungeon.rooms, &dungeon.doors);
    if components > 1 && dungeon.connectivity.unreachable.is_empty() {
        bail!("{components} components but no unreachable rooms were reported");
    }

    for (cell, kind) in dungeon.grid.cells() {
        let interior = dungeon.rooms.iter().filter(|room| room.is_interior_cell(cell)).count();
        let perimeter = dungeon.rooms.iter().filter(|room| room.is_perimeter_cell(cell)).count();
        match kind {
            TileKind::Floor if interior != 1 => bail!("floor {cell:?} inside {interior} rooms"),
            TileKind::Door if perimeter != 2 => bail!("door {cell:?} on {perimeter} room walls"),
            _ => {}
        }
    }

    let table = dungeon.config.wall_table();
    let mut expected = 0;
    for x in 0..dungeon.grid.width() as i32 {
        for z in 0..dungeon.grid.height() as i32 {
            let code = corner_code(&dungeon.grid, x, z);
            if code != 0 && table.contains(code) {
                expected += 1;
            }
        }
    }
    if expected != dungeon.walls.len() {
        bail!("expected {expected} wall pieces, emitted {}", dungeon.walls.len());
    }

    if components <= 1
        && let Some(reach) = &dungeon.reachability
        && !reach.fully_connected()
    {
        bail!(
            "connected layout reached only {} of {} walkable cells",
            reach.visited.len(),
            reach.walkable_total
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting dungeon fuzz on seed {} for {} runs...", args.seed, args.runs);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut fragmented = 0;
    for run in 0..args.runs {
        let config = random_config(&mut rng);
        let seed = rng.next_u64();
        let dungeon = DungeonGenerator::new(config.clone()).generate(seed)?;
        let again = DungeonGenerator::new(config).generate(seed)?;
        if dungeon.fingerprint() != again.fingerprint() {
            bail!("run {run}: seed {seed} is not deterministic");
        }
        if let Err(err) = check(&dungeon) {
            bail!("run {run}: seed {seed} with {:?} violated an invariant: {err}", dungeon.config);
        }
        if !dungeon.is_connected() {
            fragmented += 1;
        }
    }

    println!("Fuzzing completed successfully ({fragmented} best-effort fragmented layouts).");
    Ok(())
}

//! Dungeon generation pipeline split into one submodule per stage.

pub mod connectivity;
pub mod doors;
pub mod flood_fill;
pub mod grid;
pub mod model;
pub mod walls;

mod generator;
mod partition;
mod prune;

pub use connectivity::{AdjacencyGraph, ConnectivityReport, count_components};
pub use doors::{count_cover_at, door_probes, is_valid_door};
pub use flood_fill::{FloodFillRejection, Reachability, flood_fill};
pub use generator::DungeonGenerator;
pub use grid::TileGrid;
pub use model::Dungeon;
pub use partition::MIN_SPLITTABLE_SIZE;
pub use walls::{WallEntry, WallPiece, WallPlacement, WallShape, WallTable, corner_code};

use crate::config::DungeonConfig;
use crate::error::GenerationError;

pub fn generate_dungeon(config: &DungeonConfig, seed: u64) -> Result<Dungeon, GenerationError> {
    DungeonGenerator::new(config.clone()).generate(seed)
}

#[cfg(test)]
mod tests {
    use super::{DungeonGenerator, generate_dungeon};
    use crate::config::DungeonConfig;

    #[test]
    fn generate_dungeon_matches_generator_output() {
        let config = DungeonConfig { branch_chance: 0.5, ..DungeonConfig::default() };
        let from_helper = generate_dungeon(&config, 123).expect("config is valid");
        let from_generator = DungeonGenerator::new(config).generate(123).expect("config is valid");
        assert_eq!(from_helper, from_generator);
    }
}

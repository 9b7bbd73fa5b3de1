//! Pipeline orchestration: partition, doors, prune, connectivity, raster, walls, flood fill.

use log::{Level, debug, info, log_enabled, warn};

use super::connectivity::{ConnectivityParams, resolve_connectivity};
use super::doors::place_doors;
use super::flood_fill::flood_fill;
use super::grid::rasterize;
use super::model::Dungeon;
use super::partition::partition_rooms;
use super::prune::prune_smallest_rooms;
use super::walls::{WallTable, mesh_walls};
use crate::config::DungeonConfig;
use crate::error::GenerationError;
use crate::progress::{GenerationEvent, ProgressObserver, Silent, Stage};
use crate::rng::DungeonRng;

pub struct DungeonGenerator {
    config: DungeonConfig,
    wall_table: WallTable,
}

impl DungeonGenerator {
    pub fn new(config: DungeonConfig) -> Self {
        let wall_table = config.wall_table();
        Self { config, wall_table }
    }

    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    pub fn generate(&self, seed: u64) -> Result<Dungeon, GenerationError> {
        self.generate_with(seed, &mut Silent)
    }

    /// Runs every stage in order on one random stream. Parameters are
    /// validated before any stage runs or any event is emitted.
    pub fn generate_with(
        &self,
        seed: u64,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Dungeon, GenerationError> {
        self.config.validate()?;
        let config = &self.config;
        let bounds = config.bounds;
        let mut rng = DungeonRng::from_seed(seed);

        let mut rooms = partition_rooms(bounds, config.max_room_size, &mut rng, observer);
        observer.on_event(&GenerationEvent::StageComplete(Stage::Partition));

        let mut doors = place_doors(&rooms, config.door_width, &mut rng, observer);
        observer.on_event(&GenerationEvent::StageComplete(Stage::Doors));

        prune_smallest_rooms(&mut rooms, &mut doors, config.prune_fraction, observer);
        observer.on_event(&GenerationEvent::StageComplete(Stage::Prune));

        let params =
            ConnectivityParams { mode: config.connectivity, branch_chance: config.branch_chance };
        let outcome = resolve_connectivity(&mut rooms, &mut doors, &params, &mut rng, observer);
        observer.on_event(&GenerationEvent::StageComplete(Stage::Connectivity));
        if !outcome.report.is_connected() && config.reject_fragmented {
            return Err(GenerationError::Fragmented {
                components: outcome.report.components,
                unreachable: outcome.report.unreachable,
            });
        }
        observer.on_event(&GenerationEvent::LayoutReady);

        let grid = rasterize(bounds, &rooms, &doors);
        if log_enabled!(Level::Debug) {
            debug!("rasterized grid:\n{}", grid.render_ascii());
        }
        observer.on_event(&GenerationEvent::StageComplete(Stage::Raster));

        let walls = mesh_walls(&grid, &self.wall_table);
        debug!("meshed {} wall pieces", walls.len());
        observer.on_event(&GenerationEvent::StageComplete(Stage::Walls));

        let reachability = match grid.first_floor_cell() {
            Some(start) => flood_fill(&grid, start).ok(),
            None => {
                warn!("flood fill skipped: grid has no floor or door cell");
                None
            }
        };
        observer.on_event(&GenerationEvent::StageComplete(Stage::FloodFill));
        observer.on_event(&GenerationEvent::NavigationReady);

        info!(
            "seed {seed}: {} rooms, {} doors, {} wall pieces, {} component(s)",
            rooms.len(),
            doors.len(),
            walls.len(),
            outcome.report.components
        );

        Ok(Dungeon {
            seed,
            config: config.clone(),
            rooms,
            doors,
            connections: outcome.connections,
            grid,
            walls,
            connectivity: outcome.report,
            reachability,
        })
    }
}

pub mod config;
pub mod error;
pub mod mapgen;
pub mod progress;
pub mod rng;
pub mod seed;
pub mod types;

pub use config::{Bounds, ConnectivityMode, DungeonConfig};
pub use error::{ConfigError, GenerationError};
pub use mapgen::{Dungeon, DungeonGenerator, generate_dungeon};
pub use progress::{GenerationEvent, ProgressObserver, Silent, Stage};
pub use rng::DungeonRng;
pub use seed::SeedChoice;
pub use types::*;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::RoomId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("bounds must be positive, got {width}x{depth}x{height}")]
    InvalidBounds { width: i32, depth: i32, height: i32 },
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("dungeon split into {components} components; unreachable rooms {unreachable:?}")]
    Fragmented { components: usize, unreachable: Vec<RoomId> },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] GenerationError),
}

//! Generation parameters, their defaults, and file loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, GenerationError};
use crate::mapgen::WallTable;

pub const DEFAULT_PRUNE_FRACTION: f64 = 0.10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: i32,
    pub depth: i32,
    pub height: i32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { width: 40, depth: 30, height: 3 }
    }
}

/// What to do with rooms the first traversal wave did not reach.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectivityMode {
    /// Force a door between the reached set and the rest, then traverse again.
    #[default]
    Bridge,
    /// Drop every unreached room and its doors.
    PruneUnreached,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub bounds: Bounds,
    pub max_room_size: u32,
    pub door_width: u32,
    pub branch_chance: f64,
    pub prune_fraction: f64,
    pub connectivity: ConnectivityMode,
    /// Turn a failed bridge into a hard error instead of a warning.
    pub reject_fragmented: bool,
    pub wall_table: Option<WallTable>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            bounds: Bounds::default(),
            max_room_size: 12,
            door_width: 2,
            branch_chance: 0.35,
            prune_fraction: DEFAULT_PRUNE_FRACTION,
            connectivity: ConnectivityMode::default(),
            reject_fragmented: false,
            wall_table: None,
        }
    }
}

impl DungeonConfig {
    pub fn validate(&self) -> Result<(), GenerationError> {
        let Bounds { width, depth, height } = self.bounds;
        if width <= 0 || depth <= 0 || height <= 0 {
            return Err(GenerationError::InvalidBounds { width, depth, height });
        }
        if self.max_room_size == 0 {
            return Err(invalid("max_room_size", "must be at least 1".to_string()));
        }
        if self.door_width == 0 {
            return Err(invalid("door_width", "must be at least 1".to_string()));
        }
        if i32::try_from(self.door_width).is_err() {
            return Err(invalid(
                "door_width",
                format!("{} does not fit a grid coordinate", self.door_width),
            ));
        }
        if !(0.0..=1.0).contains(&self.branch_chance) {
            return Err(invalid(
                "branch_chance",
                format!("{} is outside [0, 1]", self.branch_chance),
            ));
        }
        if !(0.0..1.0).contains(&self.prune_fraction) {
            return Err(invalid(
                "prune_fraction",
                format!("{} is outside [0, 1)", self.prune_fraction),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads JSON when the extension says so, TOML otherwise.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&raw),
            _ => Self::from_toml_str(&raw),
        }
    }

    pub fn wall_table(&self) -> WallTable {
        self.wall_table.clone().unwrap_or_default()
    }
}

fn invalid(name: &'static str, reason: String) -> GenerationError {
    GenerationError::InvalidParameter { name, reason }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(DungeonConfig::default().validate(), Ok(()));
    }

    #[test]
    fn non_positive_bounds_are_rejected() {
        let mut config = DungeonConfig::default();
        config.bounds.depth = 0;
        assert_eq!(
            config.validate(),
            Err(GenerationError::InvalidBounds { width: 40, depth: 0, height: 3 })
        );
    }

    #[test]
    fn branch_chance_outside_unit_interval_is_rejected() {
        let config = DungeonConfig { branch_chance: 1.5, ..DungeonConfig::default() };
        let err = config.validate().expect_err("branch chance 1.5 should be rejected");
        assert!(matches!(err, GenerationError::InvalidParameter { name: "branch_chance", .. }));

        let config = DungeonConfig { branch_chance: f64::NAN, ..DungeonConfig::default() };
        assert!(config.validate().is_err(), "NaN must not pass the range check");
    }

    #[test]
    fn door_width_beyond_grid_coordinates_is_rejected() {
        for door_width in [1_u32 << 31, u32::MAX] {
            let config = DungeonConfig { door_width, ..DungeonConfig::default() };
            let err = config.validate().expect_err("oversized door width should be rejected");
            assert!(matches!(err, GenerationError::InvalidParameter { name: "door_width", .. }));
        }

        let widest = DungeonConfig { door_width: i32::MAX as u32, ..DungeonConfig::default() };
        assert_eq!(widest.validate(), Ok(()));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = DungeonConfig::from_toml_str(
            r#"
            max_room_size = 8
            connectivity = "prune_unreached"

            [bounds]
            width = 20
            depth = 20
            height = 1
            "#,
        )
        .expect("partial config should parse");

        assert_eq!(config.bounds, Bounds { width: 20, depth: 20, height: 1 });
        assert_eq!(config.max_room_size, 8);
        assert_eq!(config.door_width, 2);
        assert_eq!(config.connectivity, ConnectivityMode::PruneUnreached);
        assert_eq!(config.prune_fraction, DEFAULT_PRUNE_FRACTION);
    }

    #[test]
    fn invalid_values_in_files_surface_as_config_errors() {
        let err = DungeonConfig::from_json_str(r#"{ "door_width": 0 }"#)
            .expect_err("zero door width should be rejected");
        assert!(matches!(err, ConfigError::Invalid(_)), "unexpected error: {err}");
    }

    #[test]
    fn load_picks_parser_from_extension() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().expect("temp file");
        write!(json, r#"{{ "max_room_size": 9 }}"#).expect("write json");
        assert_eq!(DungeonConfig::load(json.path()).expect("json config").max_room_size, 9);

        let mut toml_file = tempfile::Builder::new().suffix(".toml").tempfile().expect("temp file");
        writeln!(toml_file, "door_width = 3").expect("write toml");
        assert_eq!(DungeonConfig::load(toml_file.path()).expect("toml config").door_width, 3);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = DungeonConfig::load(Path::new("/definitely/not/here.toml"))
            .expect_err("missing file should error");
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}

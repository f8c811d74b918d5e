//! Generation tuning knobs with documented defaults and JSON persistence.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::reachability::HazardSlide;

/// Smallest grid side that still leaves room for meaningful partitioning.
pub const MIN_GRID_SIDE: usize = 15;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Grid width in tiles, border included.
    pub width: usize,
    /// Grid height in tiles, border included.
    pub height: usize,
    /// No split may leave a child narrower or shorter than this.
    pub min_leaf_size: usize,
    /// Leaves with a side above this are always split when possible.
    pub max_leaf_size: usize,
    /// Chance that a leaf within `max_leaf_size` is split anyway on a pass.
    pub split_chance: f64,
    /// A side at least this many times the other forces the split along it.
    pub split_aspect_ratio: f64,
    pub min_room_size: usize,
    /// Share of floor-adjacent interior walls turned into lava.
    pub hazard_fraction: f64,
    /// Minimum slide hops between start and exit.
    pub min_exit_distance: u32,
    pub collectible_chance: f64,
    /// Random floor probes before the collectible is silently dropped.
    pub collectible_tries: u32,
    pub max_attempts: u32,
    pub hazard_slide: HazardSlide,
    /// Turn floor that cannot be walked to from the start back into wall.
    pub cull_unreachable_floor: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            width: 35,
            height: 35,
            min_leaf_size: 6,
            max_leaf_size: 20,
            split_chance: 0.75,
            split_aspect_ratio: 1.25,
            min_room_size: 4,
            hazard_fraction: 0.05,
            min_exit_distance: 5,
            collectible_chance: 0.25,
            collectible_tries: 20,
            max_attempts: 100,
            hazard_slide: HazardSlide::Lethal,
            cull_unreachable_floor: true,
        }
    }
}

impl GenerationConfig {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_room_size == 0 {
            return Err(ConfigError::Zero { field: "min_room_size" });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Zero { field: "max_attempts" });
        }

        let minimum_side = MIN_GRID_SIDE.max(self.min_room_size + 2);
        if self.width < minimum_side || self.height < minimum_side {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                minimum: minimum_side,
            });
        }
        if self.min_leaf_size < self.min_room_size + 2 {
            return Err(ConfigError::LeafTooSmallForRoom {
                min_leaf_size: self.min_leaf_size,
                min_room_size: self.min_room_size,
            });
        }
        if self.max_leaf_size < self.min_leaf_size * 2 {
            return Err(ConfigError::LeafBoundsInverted {
                min_leaf_size: self.min_leaf_size,
                max_leaf_size: self.max_leaf_size,
            });
        }
        if self.split_aspect_ratio.is_nan() || self.split_aspect_ratio < 1.0 {
            return Err(ConfigError::AspectRatioTooLow(self.split_aspect_ratio));
        }

        for (field, value) in [
            ("split_chance", self.split_chance),
            ("hazard_fraction", self.hazard_fraction),
            ("collectible_chance", self.collectible_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }

        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn write(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

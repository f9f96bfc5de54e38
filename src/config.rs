//! Configuration for cave generation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CaveError, Result};

/// Smallest map edge the interactive front ends allow.
pub const MIN_MAP_SIZE: usize = 50;
/// Largest map edge the interactive front ends allow.
pub const MAX_MAP_SIZE: usize = 500;

/// Parameters for one cave generation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Map width in tiles.
    pub width: usize,

    /// Map height in tiles.
    pub height: usize,

    /// Percentage of interior cells seeded as Wall (clamped to 0..=100).
    pub wall_density: i32,

    /// Random seed for the initial fill.
    pub seed: u64,

    /// Cellular-automaton smoothing passes.
    pub smoothing_iterations: usize,

    /// Wall regions smaller than this become Open.
    pub wall_threshold: usize,

    /// Open/Decorated regions smaller than this become Wall.
    pub room_threshold: usize,

    /// Radius of the disk carved along each passage.
    pub passage_radius: i32,

    /// Width of the Wall ring added before meshing.
    pub border_size: usize,

    /// World size of one tile.
    pub tile_size: f32,

    /// Height of the extruded wall strips.
    pub wall_height: f32,

    /// How many times the wall-top texture repeats across the map.
    pub uv_tile_repeat: f32,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 100,
            wall_density: 45,
            seed: 42,
            smoothing_iterations: 5,
            wall_threshold: 75,
            room_threshold: 25,
            passage_radius: 5,
            border_size: 1,
            tile_size: 1.0,
            wall_height: 5.0,
            uv_tile_repeat: 10.0,
        }
    }
}

impl CaveConfig {
    /// Config with the given size, density and seed, defaults elsewhere.
    pub fn new(width: usize, height: usize, wall_density: i32, seed: u64) -> Self {
        Self {
            width,
            height,
            wall_density,
            seed,
            ..Default::default()
        }
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: CaveConfig = serde_json::from_str(&text).map_err(|e| CaveError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Wall density clamped into `0..=100`.
    pub fn clamped_density(&self) -> i32 {
        self.wall_density.clamp(0, 100)
    }

    /// Reject parameters that cannot produce a map. Density is clamped
    /// later rather than rejected here.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(CaveError::invalid_param("width", self.width, "must be positive"));
        }
        if self.height == 0 {
            return Err(CaveError::invalid_param("height", self.height, "must be positive"));
        }
        if self.passage_radius < 0 {
            return Err(CaveError::invalid_param(
                "passage_radius",
                self.passage_radius,
                "must not be negative",
            ));
        }
        if !(self.tile_size > 0.0) {
            return Err(CaveError::invalid_param("tile_size", self.tile_size, "must be positive"));
        }
        if !(self.wall_height > 0.0) {
            return Err(CaveError::invalid_param("wall_height", self.wall_height, "must be positive"));
        }
        Ok(())
    }
}

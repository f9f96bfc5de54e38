//! Procedural cave generation library
//!
//! A random cellular-automaton grid is smoothed into caverns, cleaned of
//! noise regions, stitched into one reachable cave by carved passages and
//! finally turned into wall meshes with marching squares.

pub mod ascii;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod export;
pub mod generator;
pub mod mesh;
pub mod passages;
pub mod pipeline;
pub mod regions;
pub mod rooms;
pub mod tile;
pub mod tilemap;

pub use config::CaveConfig;
pub use error::{CaveError, Result};
pub use pipeline::{analyze, generate_cave, Cave, CaveStats};
pub use tile::{Coord, Grid, TileCategory};

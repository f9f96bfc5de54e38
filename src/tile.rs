//! Tile categories and grid coordinates shared by every pipeline stage.

use crate::tilemap::Tilemap;

/// Classification of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TileCategory {
    #[default]
    Wall,
    Open,
    Decorated,
}

impl TileCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            TileCategory::Wall => "Wall",
            TileCategory::Open => "Open",
            TileCategory::Decorated => "Decorated",
        }
    }

    pub fn is_wall(&self) -> bool {
        *self == TileCategory::Wall
    }

    /// Open and Decorated tiles can both be walked on.
    pub fn is_passable(&self) -> bool {
        !self.is_wall()
    }
}

/// The cave layout: one category per cell.
pub type Grid = Tilemap<TileCategory>;

/// An integer grid coordinate. Signed so that line walks and disk offsets
/// can step outside the grid before being clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn from_usize(x: usize, y: usize) -> Self {
        Self { x: x as i32, y: y as i32 }
    }

    /// Squared Euclidean distance to another coordinate.
    pub fn distance_sq(&self, other: &Coord) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        dx * dx + dy * dy
    }
}

/// Category at a signed coordinate, with everything outside the grid
/// reading as Wall.
pub fn category_or_wall(grid: &Grid, x: i32, y: i32) -> TileCategory {
    grid.get_checked(x, y).copied().unwrap_or(TileCategory::Wall)
}

//! Connected-region detection and noise pruning
//!
//! A region is a maximal set of same-category cells joined through their
//! edges (never diagonally). Small Wall regions are opened up and small
//! Open/Decorated pockets are sealed, leaving structural walls and rooms
//! large enough to matter.

use std::collections::VecDeque;

use crate::tile::{Coord, Grid, TileCategory};
use crate::tilemap::Tilemap;

/// Wall regions below this size are reclassified Open.
pub const WALL_THRESHOLD: usize = 75;

/// Open/Decorated regions below this size are reclassified Wall.
pub const ROOM_THRESHOLD: usize = 25;

/// A 4-connected set of cells sharing one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Region {
    pub category: TileCategory,
    pub tiles: Vec<Coord>,
}

impl Region {
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether any tile lies on the outermost ring of `grid`.
    pub fn touches_border(&self, grid: &Grid) -> bool {
        self.tiles
            .iter()
            .any(|t| grid.is_border(t.x as usize, t.y as usize))
    }

    /// Overwrite every tile of the region with `category`.
    pub fn paint(&self, grid: &mut Grid, category: TileCategory) {
        for tile in &self.tiles {
            grid.set_checked(tile.x, tile.y, category);
        }
    }
}

/// Flood-fill the region containing `(start_x, start_y)`.
///
/// Marks every collected cell in `visited`. Neighbors outside the grid are
/// never enqueued.
pub fn flood_fill(grid: &Grid, start_x: usize, start_y: usize, visited: &mut Tilemap<bool>) -> Region {
    let category = *grid.get(start_x, start_y);
    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();

    queue.push_back((start_x, start_y));
    visited.set(start_x, start_y, true);

    while let Some((x, y)) = queue.pop_front() {
        tiles.push(Coord::from_usize(x, y));

        for (nx, ny) in grid.neighbors(x, y) {
            if !*visited.get(nx, ny) && *grid.get(nx, ny) == category {
                visited.set(nx, ny, true);
                queue.push_back((nx, ny));
            }
        }
    }

    Region { category, tiles }
}

/// All regions of one category, discovered in column-major scan order.
pub fn regions_of(grid: &Grid, category: TileCategory) -> Vec<Region> {
    let mut visited = Tilemap::new_with(grid.width, grid.height, false);
    let mut regions = Vec::new();

    for x in 0..grid.width {
        for y in 0..grid.height {
            if !*visited.get(x, y) && *grid.get(x, y) == category {
                regions.push(flood_fill(grid, x, y, &mut visited));
            }
        }
    }

    regions
}

/// Every region of every category. Each cell belongs to exactly one.
pub fn all_regions(grid: &Grid) -> Vec<Region> {
    let mut visited = Tilemap::new_with(grid.width, grid.height, false);
    let mut regions = Vec::new();

    for x in 0..grid.width {
        for y in 0..grid.height {
            if !*visited.get(x, y) {
                regions.push(flood_fill(grid, x, y, &mut visited));
            }
        }
    }

    regions
}

/// Open up Wall regions smaller than `threshold`.
///
/// Wall regions touching the grid border are the cave's outer shell and are
/// kept whatever their size. Returns the number of regions removed.
pub fn prune_wall_regions(grid: &mut Grid, threshold: usize) -> usize {
    let mut removed = 0;
    for region in regions_of(grid, TileCategory::Wall) {
        // The shell holds at least 2 * (width + height) - 4 tiles, so this
        // only matters for maps under about 20x20; at 50x50 it is already 196.
        if region.len() < threshold && !region.touches_border(grid) {
            region.paint(grid, TileCategory::Open);
            removed += 1;
        }
    }
    removed
}

/// Seal Open and Decorated regions smaller than `threshold` and return the
/// survivors, Open regions first, each group in scan order.
pub fn prune_room_regions(grid: &mut Grid, threshold: usize) -> Vec<Region> {
    let mut candidates = regions_of(grid, TileCategory::Open);
    candidates.extend(regions_of(grid, TileCategory::Decorated));

    let mut survivors = Vec::new();
    for region in candidates {
        if region.len() < threshold {
            region.paint(grid, TileCategory::Wall);
        } else {
            survivors.push(region);
        }
    }
    survivors
}

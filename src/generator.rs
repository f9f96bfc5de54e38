//! Random fill and cellular-automaton smoothing
//!
//! Seeds a grid with Wall, Open and Decorated cells, then repeatedly lets
//! each cell take on the category that dominates its 8 neighbors. Cells on
//! the map edge are always Wall, and anything beyond the edge counts as Wall
//! when neighbors are tallied, so caves close up against the border.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{CaveError, Result};
use crate::tile::{category_or_wall, Grid, TileCategory};

/// Smoothing passes applied by [`generate`].
pub const SMOOTHING_ITERATIONS: usize = 5;

/// Exclusive upper bound of the per-cell roll.
const ROLL_MAX: i32 = 100;

/// A category needs strictly more than this many of 8 neighbors to win.
const MAJORITY: usize = 4;

/// Generate a smoothed cave grid.
///
/// `wall_density` is clamped to `0..=100`. It also sets the Decorated
/// threshold: rolls at or above `density + (100 - density) / 3` become
/// Decorated.
pub fn generate(width: usize, height: usize, wall_density: i32, seed: u64) -> Result<Grid> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid = fill_grid(width, height, wall_density, &mut rng)?;
    smooth_grid(&mut grid, SMOOTHING_ITERATIONS);
    Ok(grid)
}

/// Randomly assign a category to every interior cell; border cells are Wall.
pub fn fill_grid<R: Rng>(width: usize, height: usize, wall_density: i32, rng: &mut R) -> Result<Grid> {
    if width == 0 {
        return Err(CaveError::invalid_param("width", width, "must be positive"));
    }
    if height == 0 {
        return Err(CaveError::invalid_param("height", height, "must be positive"));
    }

    let density = wall_density.clamp(0, ROLL_MAX);
    let decorated_threshold = decorated_threshold(density);
    let mut grid = Grid::new_with(width, height, TileCategory::Wall);

    // Column-major so a given seed always rolls cells in the same order
    for x in 0..width {
        for y in 0..height {
            if grid.is_border(x, y) {
                continue;
            }
            let roll = rng.gen_range(0..ROLL_MAX);
            let category = if roll < density {
                TileCategory::Wall
            } else if roll >= decorated_threshold {
                TileCategory::Decorated
            } else {
                TileCategory::Open
            };
            grid.set(x, y, category);
        }
    }

    Ok(grid)
}

/// Roll at or above which an interior cell becomes Decorated.
pub fn decorated_threshold(density: i32) -> i32 {
    density + (ROLL_MAX - density) / 3
}

/// Apply `iterations` smoothing passes.
pub fn smooth_grid(grid: &mut Grid, iterations: usize) {
    for _ in 0..iterations {
        smooth_pass(grid);
    }
}

/// One smoothing pass, updating cells in place in column-major order.
/// Returns the number of cells that changed.
pub fn smooth_pass(grid: &mut Grid) -> usize {
    let mut changed = 0;

    for x in 0..grid.width {
        for y in 0..grid.height {
            let current = *grid.get(x, y);
            let next = majority_category(neighbor_counts(grid, x, y), current);
            if next != current {
                grid.set(x, y, next);
                changed += 1;
            }
        }
    }

    changed
}

/// Category a cell takes given its neighbor tally.
///
/// Wall is checked first, then Decorated, then Open. When no category holds
/// more than 4 of the 8 neighbors the cell keeps `current`.
pub fn majority_category(counts: NeighborCounts, current: TileCategory) -> TileCategory {
    if counts.wall > MAJORITY {
        TileCategory::Wall
    } else if counts.decorated > MAJORITY {
        TileCategory::Decorated
    } else if counts.open > MAJORITY {
        TileCategory::Open
    } else {
        current
    }
}

/// Tally of neighbor categories around one cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborCounts {
    pub wall: usize,
    pub open: usize,
    pub decorated: usize,
}

impl NeighborCounts {
    pub fn get(&self, category: TileCategory) -> usize {
        match category {
            TileCategory::Wall => self.wall,
            TileCategory::Open => self.open,
            TileCategory::Decorated => self.decorated,
        }
    }
}

/// Count the categories of the 8 cells around `(x, y)`. Cells outside the
/// grid count as Wall.
pub fn neighbor_counts(grid: &Grid, x: usize, y: usize) -> NeighborCounts {
    let mut counts = NeighborCounts::default();

    for dx in -1i32..=1 {
        for dy in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            match category_or_wall(grid, x as i32 + dx, y as i32 + dy) {
                TileCategory::Wall => counts.wall += 1,
                TileCategory::Open => counts.open += 1,
                TileCategory::Decorated => counts.decorated += 1,
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn border_is_wall(grid: &Grid) -> bool {
        grid.iter()
            .filter(|&(x, y, _)| grid.is_border(x, y))
            .all(|(_, _, c)| c.is_wall())
    }

    #[test]
    fn test_border_always_wall() {
        for seed in 0..8 {
            for density in [0, 30, 45, 60, 100] {
                let grid = generate(37, 23, density, seed).unwrap();
                assert!(border_is_wall(&grid), "seed {} density {}", seed, density);
            }
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = generate(64, 48, 45, 1234).unwrap();
        let b = generate(64, 48, 45, 1234).unwrap();
        let c = generate(64, 48, 45, 1235).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_full_density_is_solid() {
        let grid = generate(20, 20, 100, 9).unwrap();
        assert_eq!(grid.count(&TileCategory::Wall), 400);

        // Out of range densities are clamped, not rejected
        let clamped = generate(20, 20, 250, 9).unwrap();
        assert_eq!(clamped, grid);
    }

    #[test]
    fn test_zero_density_has_no_interior_walls_before_smoothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let grid = fill_grid(30, 30, 0, &mut rng).unwrap();
        let interior_walls = grid
            .iter()
            .filter(|&(x, y, c)| !grid.is_border(x, y) && c.is_wall())
            .count();
        assert_eq!(interior_walls, 0);
        assert_eq!(decorated_threshold(0), 33);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(generate(0, 10, 45, 1), Err(CaveError::InvalidParameter { .. })));
        assert!(matches!(generate(10, 0, 45, 1), Err(CaveError::InvalidParameter { .. })));
    }

    #[test]
    fn test_out_of_bounds_counts_as_wall() {
        let grid = Grid::new_with(3, 3, TileCategory::Open);
        let corner = neighbor_counts(&grid, 0, 0);
        assert_eq!(corner.wall, 5);
        assert_eq!(corner.open, 3);

        let centre = neighbor_counts(&grid, 1, 1);
        assert_eq!(centre.get(TileCategory::Open), 8);
        assert_eq!(centre.wall, 0);
    }

    #[test]
    fn test_tie_leaves_cell_unchanged() {
        // Centre cell sees 4 Open and 4 Decorated: nobody exceeds 4
        let mut grid = Grid::new_with(3, 3, TileCategory::Open);
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1)] {
            grid.set(x, y, TileCategory::Decorated);
        }
        grid.set(1, 1, TileCategory::Wall);
        let counts = neighbor_counts(&grid, 1, 1);
        assert_eq!(counts.open, 4);
        assert_eq!(counts.decorated, 4);
        assert_eq!(majority_category(counts, TileCategory::Wall), TileCategory::Wall);

        let split = NeighborCounts { wall: 4, open: 2, decorated: 2 };
        assert_eq!(majority_category(split, TileCategory::Open), TileCategory::Open);
    }

    #[test]
    fn test_majority_priority() {
        let walls = NeighborCounts { wall: 5, open: 3, decorated: 0 };
        assert_eq!(majority_category(walls, TileCategory::Open), TileCategory::Wall);

        let decorated = NeighborCounts { wall: 0, open: 3, decorated: 5 };
        assert_eq!(majority_category(decorated, TileCategory::Wall), TileCategory::Decorated);

        let open = NeighborCounts { wall: 1, open: 6, decorated: 1 };
        assert_eq!(majority_category(open, TileCategory::Decorated), TileCategory::Open);
    }

    #[test]
    fn test_unanimous_cells_are_stable() {
        let mut grid = generate(60, 45, 45, 77).unwrap();

        let unanimous: Vec<(usize, usize, TileCategory)> = grid
            .iter()
            .filter(|&(x, y, c)| neighbor_counts(&grid, x, y).get(*c) == 8)
            .map(|(x, y, c)| (x, y, *c))
            .collect();
        assert!(!unanimous.is_empty());

        smooth_pass(&mut grid);
        for (x, y, category) in unanimous {
            assert_eq!(*grid.get(x, y), category, "cell ({}, {}) changed", x, y);
        }
    }
}

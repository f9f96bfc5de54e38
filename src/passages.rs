//! Passage carving between rooms
//!
//! A passage is a straight line between two edge tiles, widened by carving
//! an Open disk around every point on it.

use serde::Serialize;

use crate::rooms::RoomGraph;
use crate::tile::{Coord, Grid, TileCategory};

/// Radius of the disk carved around each line point.
pub const PASSAGE_RADIUS: i32 = 5;

/// A carved connection between two rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Passage {
    pub room_a: usize,
    pub room_b: usize,
    pub tile_a: Coord,
    pub tile_b: Coord,
}

/// Link rooms `a` and `b` in the graph and carve a passage between
/// `tile_a` and `tile_b`.
///
/// Carving is repeated even when the rooms were already linked (the grid
/// ends up the same), but the adjacency lists never get a duplicate entry.
pub fn connect_rooms(
    grid: &mut Grid,
    graph: &mut RoomGraph,
    a: usize,
    b: usize,
    tile_a: Coord,
    tile_b: Coord,
    radius: i32,
) -> Passage {
    graph.connect(a, b);

    for point in line(tile_a, tile_b) {
        carve_disk(grid, point, radius);
    }

    Passage {
        room_a: a,
        room_b: b,
        tile_a,
        tile_b,
    }
}

/// Cells on the line from `from` towards `to`.
///
/// Steps along the longer axis and accumulates error on the shorter one.
/// The first point is `from`; `to` itself is not emitted (for `from == to`
/// the line is empty).
pub fn line(from: Coord, to: Coord) -> Vec<Coord> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;

    let mut inverted = false;
    let mut step = dx.signum();
    let mut gradient_step = dy.signum();
    let mut longest = dx.abs();
    let mut shortest = dy.abs();

    if longest < shortest {
        inverted = true;
        longest = dy.abs();
        shortest = dx.abs();
        step = dy.signum();
        gradient_step = dx.signum();
    }

    let mut points = Vec::with_capacity(longest as usize);
    let mut x = from.x;
    let mut y = from.y;
    let mut accumulated = longest / 2;

    for _ in 0..longest {
        points.push(Coord::new(x, y));

        if inverted {
            y += step;
        } else {
            x += step;
        }

        accumulated += shortest;
        if accumulated >= longest {
            if inverted {
                x += gradient_step;
            } else {
                y += gradient_step;
            }
            accumulated -= longest;
        }
    }

    points
}

/// Set every cell within `radius` of `centre` (inclusive) to Open, clipped
/// to the grid. Returns how many cells were inside the grid.
pub fn carve_disk(grid: &mut Grid, centre: Coord, radius: i32) -> usize {
    let mut carved = 0;
    let r_sq = radius * radius;

    for dx in -radius..=radius {
        for dy in -radius..=radius {
            if dx * dx + dy * dy <= r_sq
                && grid.set_checked(centre.x + dx, centre.y + dy, TileCategory::Open)
            {
                carved += 1;
            }
        }
    }

    carved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::Region;
    use crate::rooms::Room;

    #[test]
    fn test_line_horizontal() {
        let points = line(Coord::new(2, 3), Coord::new(6, 3));
        let expected: Vec<Coord> = (2..6).map(|x| Coord::new(x, 3)).collect();
        assert_eq!(points, expected);
    }

    #[test]
    fn test_line_steep_uses_y_axis() {
        let points = line(Coord::new(0, 0), Coord::new(2, 6));
        assert_eq!(points.len(), 6);
        assert_eq!(points[0], Coord::new(0, 0));
        // One step per row
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.y, i as i32);
        }
        assert!(points.windows(2).all(|w| (w[1].x - w[0].x).abs() <= 1));
    }

    #[test]
    fn test_line_negative_direction() {
        let points = line(Coord::new(5, 5), Coord::new(1, 3));
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], Coord::new(5, 5));
        assert!(points.windows(2).all(|w| w[1].x == w[0].x - 1));
        assert!(points.iter().all(|p| p.y <= 5 && p.y >= 3));
    }

    #[test]
    fn test_line_same_point_is_empty() {
        assert!(line(Coord::new(4, 4), Coord::new(4, 4)).is_empty());
    }

    #[test]
    fn test_disk_radius_inclusive() {
        let mut grid = Grid::new_with(21, 21, TileCategory::Wall);
        let carved = carve_disk(&mut grid, Coord::new(10, 10), 5);

        assert_eq!(carved, grid.count(&TileCategory::Open));
        assert_eq!(*grid.get(15, 10), TileCategory::Open);
        assert_eq!(*grid.get(13, 14), TileCategory::Open);
        assert_eq!(*grid.get(14, 14), TileCategory::Wall);
        // Lattice points with x^2 + y^2 <= 25
        assert_eq!(carved, 81);
    }

    #[test]
    fn test_disk_clipped_to_grid() {
        let mut grid = Grid::new_with(8, 8, TileCategory::Wall);
        let carved = carve_disk(&mut grid, Coord::new(0, 0), 5);
        assert_eq!(carved, grid.count(&TileCategory::Open));
        assert!(carved < 81);
        assert_eq!(*grid.get(0, 0), TileCategory::Open);
    }

    fn room_at(grid: &mut Grid, x0: i32, size: i32) -> Room {
        let mut tiles = Vec::new();
        for x in x0..x0 + size {
            for y in 10..10 + size {
                grid.set(x as usize, y as usize, TileCategory::Open);
                tiles.push(Coord::new(x, y));
            }
        }
        Room::from_region(Region { category: TileCategory::Open, tiles }, grid)
    }

    #[test]
    fn test_connect_twice_keeps_single_edge() {
        let mut grid = Grid::new_with(60, 30, TileCategory::Wall);
        let rooms = vec![room_at(&mut grid, 2, 8), room_at(&mut grid, 40, 6)];
        let mut graph = RoomGraph::new(rooms).unwrap();

        let a = Coord::new(9, 12);
        let b = Coord::new(40, 12);
        connect_rooms(&mut grid, &mut graph, 0, 1, a, b, PASSAGE_RADIUS);
        let after_first = grid.clone();
        connect_rooms(&mut grid, &mut graph, 0, 1, a, b, PASSAGE_RADIUS);

        assert_eq!(graph.rooms[0].connections.len(), 1);
        assert_eq!(graph.rooms[1].connections.len(), 1);
        assert_eq!(grid, after_first);
        assert!(graph.rooms[1].is_reachable_from_main);

        // The corridor is open all the way across
        for x in 9..=40 {
            assert_eq!(*grid.get(x, 12), TileCategory::Open, "x = {}", x);
        }
    }
}

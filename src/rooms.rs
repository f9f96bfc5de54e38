//! Rooms and the room connection graph
//!
//! Rooms live in a flat arena (`RoomGraph::rooms`) and refer to each other
//! by index. The arena is ordered largest room first; index 0 is the main
//! room that every other room must end up reachable from.

use serde::Serialize;

use crate::error::{CaveError, Result};
use crate::regions::Region;
use crate::tile::{category_or_wall, Coord, Grid, TileCategory};

/// A surviving Open/Decorated region promoted to a graph node.
#[derive(Clone, Debug, Serialize)]
pub struct Room {
    pub category: TileCategory,
    pub tiles: Vec<Coord>,
    /// Tiles with a Wall directly left, right, above or below.
    pub edge_tiles: Vec<Coord>,
    /// Truncated average of the edge tiles.
    pub centroid: Coord,
    /// Indices of directly connected rooms.
    pub connections: Vec<usize>,
    pub is_main: bool,
    pub is_reachable_from_main: bool,
}

impl Room {
    pub fn from_region(region: Region, grid: &Grid) -> Self {
        let edge_tiles: Vec<Coord> = region
            .tiles
            .iter()
            .copied()
            .filter(|tile| is_edge_tile(grid, *tile))
            .collect();

        // A pocket fully enclosed by another room has no wall contact
        let centroid = if edge_tiles.is_empty() {
            average(&region.tiles)
        } else {
            average(&edge_tiles)
        };

        Self {
            category: region.category,
            tiles: region.tiles,
            edge_tiles,
            centroid,
            connections: Vec::new(),
            is_main: false,
            is_reachable_from_main: false,
        }
    }

    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_connected(&self, other: usize) -> bool {
        self.connections.contains(&other)
    }

    /// Tiles considered when looking for the closest point to another room.
    pub fn connection_tiles(&self) -> &[Coord] {
        if self.edge_tiles.is_empty() {
            &self.tiles
        } else {
            &self.edge_tiles
        }
    }
}

/// Whether `tile` has a Wall in its own row or column within the 3x3 block
/// around it. Diagonal cells are scanned but never count.
pub fn is_edge_tile(grid: &Grid, tile: Coord) -> bool {
    for x in tile.x - 1..=tile.x + 1 {
        for y in tile.y - 1..=tile.y + 1 {
            if (x == tile.x || y == tile.y) && category_or_wall(grid, x, y).is_wall() {
                return true;
            }
        }
    }
    false
}

/// Integer-truncated mean of a non-empty tile list.
fn average(tiles: &[Coord]) -> Coord {
    let n = tiles.len().max(1) as i64;
    let sum_x: i64 = tiles.iter().map(|t| t.x as i64).sum();
    let sum_y: i64 = tiles.iter().map(|t| t.y as i64).sum();
    Coord::new((sum_x / n) as i32, (sum_y / n) as i32)
}

/// Room arena plus the main room designation.
#[derive(Clone, Debug, Serialize)]
pub struct RoomGraph {
    pub rooms: Vec<Room>,
    pub main_room: usize,
}

impl RoomGraph {
    /// Order rooms by descending size (stable) and make the largest main.
    pub fn new(mut rooms: Vec<Room>) -> Result<Self> {
        if rooms.is_empty() {
            return Err(CaveError::GenerationFailed(
                "no room survived pruning, so there is no main room".to_string(),
            ));
        }

        rooms.sort_by(|a, b| b.size().cmp(&a.size()));
        rooms[0].is_main = true;
        rooms[0].is_reachable_from_main = true;

        Ok(Self { rooms, main_room: 0 })
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Link two rooms both ways. If either side was reachable from the main
    /// room, everything now linked to the other side becomes reachable too.
    ///
    /// Linking an already linked pair changes nothing; returns whether a
    /// new edge was added.
    pub fn connect(&mut self, a: usize, b: usize) -> bool {
        if a == b || self.rooms[a].is_connected(b) {
            return false;
        }

        if self.rooms[a].is_reachable_from_main {
            self.set_reachable(b);
        } else if self.rooms[b].is_reachable_from_main {
            self.set_reachable(a);
        }

        self.rooms[a].connections.push(b);
        self.rooms[b].connections.push(a);
        true
    }

    /// Mark `start` and every room transitively connected to it reachable.
    pub fn set_reachable(&mut self, start: usize) {
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            let room = &mut self.rooms[index];
            if room.is_reachable_from_main {
                continue;
            }
            room.is_reachable_from_main = true;
            stack.extend(room.connections.iter().copied());
        }
    }

    pub fn all_reachable(&self) -> bool {
        self.rooms.iter().all(|r| r.is_reachable_from_main)
    }

    /// Rooms split into (not reachable, reachable) index lists.
    pub fn partition_by_reachability(&self) -> (Vec<usize>, Vec<usize>) {
        (0..self.rooms.len()).partition(|&i| !self.rooms[i].is_reachable_from_main)
    }

    /// Whether the connection graph is a single component.
    pub fn is_fully_connected(&self) -> bool {
        let mut seen = vec![false; self.rooms.len()];
        let mut stack = vec![self.main_room];
        seen[self.main_room] = true;
        let mut count = 1;

        while let Some(index) = stack.pop() {
            for &next in &self.rooms[index].connections {
                if !seen[next] {
                    seen[next] = true;
                    count += 1;
                    stack.push(next);
                }
            }
        }

        count == self.rooms.len()
    }

    pub fn connection_count(&self) -> usize {
        self.rooms.iter().map(|r| r.connections.len()).sum::<usize>() / 2
    }
}

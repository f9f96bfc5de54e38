//! Connectivity completion
//!
//! Two phases:
//! 1. Every room without any connection is joined to its closest room.
//! 2. While some room is not reachable from the main room, the closest
//!    (unreachable, reachable) pair is joined, one passage at a time.
//!
//! Closeness is the squared distance between the nearest pair of edge tiles.
//! The pair search runs in parallel but resolves ties exactly as a serial
//! scan would: the first pair found (room order, then tile order) wins.

use rayon::prelude::*;

use crate::error::{CaveError, Result};
use crate::passages::{connect_rooms, Passage};
use crate::rooms::{Room, RoomGraph};
use crate::tile::{Coord, Grid};

/// Best connection found between two candidate room lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Candidate {
    pub room_a: usize,
    pub room_b: usize,
    pub tile_a: Coord,
    pub tile_b: Coord,
    pub distance_sq: i64,
    /// Position of the pair in serial scan order, for tie-breaking.
    order: (usize, usize),
}

impl Candidate {
    fn key(&self) -> (i64, (usize, usize)) {
        (self.distance_sq, self.order)
    }
}

/// Closest tile pair between two rooms, first found on ties.
pub fn closest_tiles(a: &Room, b: &Room) -> Option<(i64, Coord, Coord)> {
    let mut best: Option<(i64, Coord, Coord)> = None;

    for &tile_a in a.connection_tiles() {
        for &tile_b in b.connection_tiles() {
            let d = tile_a.distance_sq(&tile_b);
            if best.map_or(true, |(bd, _, _)| d < bd) {
                best = Some((d, tile_a, tile_b));
            }
        }
    }

    best
}

/// Closest pair of rooms with `a` drawn from `list_a` and `b` from
/// `list_b`, skipping identical and already connected pairs.
///
/// The search runs over the flattened `(a, b)` pairs, so a single-room
/// `list_a` is spread across threads as well.
pub fn closest_pair(graph: &RoomGraph, list_a: &[usize], list_b: &[usize]) -> Option<Candidate> {
    let n_b = list_b.len();

    (0..list_a.len() * n_b)
        .into_par_iter()
        .filter_map(|k| {
            let (ia, ib) = (k / n_b, k % n_b);
            let (a, b) = (list_a[ia], list_b[ib]);
            let room_a = &graph.rooms[a];
            if a == b || room_a.is_connected(b) {
                return None;
            }
            closest_tiles(room_a, &graph.rooms[b]).map(|(distance_sq, tile_a, tile_b)| Candidate {
                room_a: a,
                room_b: b,
                tile_a,
                tile_b,
                distance_sq,
                order: (ia, ib),
            })
        })
        .min_by_key(Candidate::key)
}

/// Join every room to the main room, carving passages into `grid`.
/// Returns the passages in the order they were carved.
pub fn connect_all_rooms(grid: &mut Grid, graph: &mut RoomGraph, radius: i32) -> Result<Vec<Passage>> {
    let mut passages = connect_isolated_rooms(grid, graph, radius);
    passages.extend(force_reachability(grid, graph, radius)?);
    Ok(passages)
}

/// Phase 1: give every room that has no connection yet a link to its
/// closest room. Rooms are visited in arena order, so a room linked earlier
/// in the pass is skipped when its turn comes.
pub fn connect_isolated_rooms(grid: &mut Grid, graph: &mut RoomGraph, radius: i32) -> Vec<Passage> {
    let all: Vec<usize> = (0..graph.len()).collect();
    let mut passages = Vec::new();

    for index in 0..graph.len() {
        if !graph.rooms[index].connections.is_empty() {
            continue;
        }
        if let Some(c) = closest_pair(graph, &[index], &all) {
            passages.push(connect_rooms(grid, graph, c.room_a, c.room_b, c.tile_a, c.tile_b, radius));
        }
    }

    passages
}

/// Phase 2: carve one passage at a time from the reachable set to the
/// closest unreachable room until nothing is left unreachable.
pub fn force_reachability(grid: &mut Grid, graph: &mut RoomGraph, radius: i32) -> Result<Vec<Passage>> {
    let mut passages = Vec::new();

    loop {
        let (unreachable, reachable) = graph.partition_by_reachability();
        if unreachable.is_empty() {
            return Ok(passages);
        }

        let c = closest_pair(graph, &unreachable, &reachable).ok_or_else(|| {
            CaveError::InvariantViolation(format!(
                "{} rooms unreachable but no candidate passage",
                unreachable.len()
            ))
        })?;
        passages.push(connect_rooms(grid, graph, c.room_a, c.room_b, c.tile_a, c.tile_b, radius));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passages::PASSAGE_RADIUS;
    use crate::regions::Region;
    use crate::tile::TileCategory;

    fn rect_room(grid: &mut Grid, x0: i32, y0: i32, w: i32, h: i32) -> Room {
        let mut tiles = Vec::new();
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                grid.set(x as usize, y as usize, TileCategory::Open);
                tiles.push(Coord::new(x, y));
            }
        }
        Room::from_region(Region { category: TileCategory::Open, tiles }, grid)
    }

    #[test]
    fn test_closest_tiles() {
        let mut grid = Grid::new_with(40, 20, TileCategory::Wall);
        let a = rect_room(&mut grid, 2, 2, 5, 5);
        let b = rect_room(&mut grid, 12, 4, 5, 5);

        let (d, ta, tb) = closest_tiles(&a, &b).unwrap();
        assert_eq!(d, 36);
        assert_eq!(ta.x, 6);
        assert_eq!(tb.x, 12);
        // First found among equally close rows
        assert_eq!(ta.y, 4);
        assert_eq!(tb.y, 4);
    }

    #[test]
    fn test_closest_pair_skips_connected() {
        let mut grid = Grid::new_with(60, 20, TileCategory::Wall);
        let rooms = vec![
            rect_room(&mut grid, 2, 2, 8, 8),
            rect_room(&mut grid, 14, 2, 6, 6),
            rect_room(&mut grid, 40, 2, 5, 5),
        ];
        let mut graph = RoomGraph::new(rooms).unwrap();

        let c = closest_pair(&graph, &[0], &[0, 1, 2]).unwrap();
        assert_eq!(c.room_b, 1);

        graph.connect(0, 1);
        let c = closest_pair(&graph, &[0], &[0, 1, 2]).unwrap();
        assert_eq!(c.room_b, 2);

        graph.connect(0, 2);
        assert!(closest_pair(&graph, &[0], &[0, 1, 2]).is_none());
    }

    #[test]
    fn test_all_rooms_become_reachable() {
        let mut grid = Grid::new_with(90, 60, TileCategory::Wall);
        // Two clusters far apart: phase 1 pairs them up locally,
        // phase 2 has to bridge the clusters
        let rooms = vec![
            rect_room(&mut grid, 2, 2, 10, 10),
            rect_room(&mut grid, 16, 2, 6, 6),
            rect_room(&mut grid, 60, 40, 8, 8),
            rect_room(&mut grid, 72, 40, 7, 7),
        ];
        let mut graph = RoomGraph::new(rooms).unwrap();

        let passages = connect_all_rooms(&mut grid, &mut graph, PASSAGE_RADIUS).unwrap();

        assert!(graph.all_reachable());
        assert!(graph.is_fully_connected());
        assert_eq!(passages.len(), 3);
        assert_eq!(graph.connection_count(), 3);
    }

    #[test]
    fn test_single_room_needs_no_passage() {
        let mut grid = Grid::new_with(20, 20, TileCategory::Wall);
        let rooms = vec![rect_room(&mut grid, 1, 1, 18, 18)];
        let mut graph = RoomGraph::new(rooms).unwrap();
        let before = grid.clone();

        let passages = connect_all_rooms(&mut grid, &mut graph, PASSAGE_RADIUS).unwrap();
        assert!(passages.is_empty());
        assert_eq!(grid, before);
        assert!(graph.all_reachable());
    }

    #[test]
    fn test_phase_one_links_each_isolated_room_once() {
        let mut grid = Grid::new_with(60, 20, TileCategory::Wall);
        let rooms = vec![
            rect_room(&mut grid, 2, 2, 8, 8),
            rect_room(&mut grid, 14, 2, 7, 7),
        ];
        let mut graph = RoomGraph::new(rooms).unwrap();

        let passages = connect_isolated_rooms(&mut grid, &mut graph, PASSAGE_RADIUS);
        // Room 1 got linked while handling room 0, so it is skipped
        assert_eq!(passages.len(), 1);
        assert_eq!((passages[0].room_a, passages[0].room_b), (0, 1));
        assert!(graph.all_reachable());
    }

    #[test]
    fn test_closest_pair_ties_match_serial_scan() {
        // Four rooms around a centre room, all at the same gap from it
        let mut grid = Grid::new_with(60, 60, TileCategory::Wall);
        let rooms = vec![
            rect_room(&mut grid, 25, 25, 10, 10),
            rect_room(&mut grid, 25, 40, 10, 6),
            rect_room(&mut grid, 25, 14, 10, 6),
            rect_room(&mut grid, 40, 25, 6, 10),
            rect_room(&mut grid, 14, 25, 6, 10),
        ];
        let graph = RoomGraph::new(rooms).unwrap();
        let all: Vec<usize> = (0..graph.len()).collect();

        for list_a in [vec![0], vec![1, 2, 3, 4], all.clone()] {
            let mut serial: Option<(i64, usize, usize, Coord, Coord)> = None;
            for &a in &list_a {
                for &b in &all {
                    if a == b || graph.rooms[a].is_connected(b) {
                        continue;
                    }
                    if let Some((d, ta, tb)) = closest_tiles(&graph.rooms[a], &graph.rooms[b]) {
                        if serial.map_or(true, |(bd, ..)| d < bd) {
                            serial = Some((d, a, b, ta, tb));
                        }
                    }
                }
            }

            let (d, a, b, ta, tb) = serial.unwrap();
            for _ in 0..20 {
                let c = closest_pair(&graph, &list_a, &all).unwrap();
                assert_eq!((c.distance_sq, c.room_a, c.room_b, c.tile_a, c.tile_b), (d, a, b, ta, tb));
            }
        }
    }

    #[test]
    fn test_closest_pair_empty_lists() {
        let mut grid = Grid::new_with(20, 20, TileCategory::Wall);
        let graph = RoomGraph::new(vec![rect_room(&mut grid, 2, 2, 6, 6)]).unwrap();
        assert!(closest_pair(&graph, &[0], &[]).is_none());
        assert!(closest_pair(&graph, &[], &[0]).is_none());
        assert!(closest_pair(&graph, &[0], &[0]).is_none());
    }
}

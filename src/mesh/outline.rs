//! Silhouette outline extraction
//!
//! An outline edge belongs to exactly one triangle. Starting from each
//! unclaimed vertex that has such an edge, the walk keeps stepping to an
//! unclaimed outline neighbour until it runs out, which closes the loop.

use serde::Serialize;

use crate::error::{CaveError, Result};

/// A closed loop of vertex indices. The last vertex connects back to the
/// first; the first vertex is not repeated at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutlineLoop {
    pub vertices: Vec<u32>,
}

impl OutlineLoop {
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Consecutive vertex pairs, including the closing pair.
    pub fn segments(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Vertex → triangle adjacency over an indexed triangle list.
struct TriangleIndex<'a> {
    triangles: &'a [[u32; 3]],
    by_vertex: Vec<Vec<usize>>,
}

impl<'a> TriangleIndex<'a> {
    fn new(vertex_count: usize, triangles: &'a [[u32; 3]]) -> Result<Self> {
        let mut by_vertex = vec![Vec::new(); vertex_count];
        for (t, tri) in triangles.iter().enumerate() {
            for &v in tri {
                let slot = by_vertex.get_mut(v as usize).ok_or_else(|| {
                    CaveError::InvariantViolation(format!(
                        "triangle {} references vertex {} of {}",
                        t, v, vertex_count
                    ))
                })?;
                slot.push(t);
            }
        }
        Ok(Self { triangles, by_vertex })
    }

    /// Whether exactly one triangle holds both `a` and `b`.
    fn is_outline_edge(&self, a: u32, b: u32) -> Result<bool> {
        let shared = self.by_vertex[a as usize]
            .iter()
            .filter(|&&t| self.triangles[t].contains(&b))
            .count();

        if shared > 2 {
            return Err(CaveError::InvariantViolation(format!(
                "edge ({}, {}) is shared by {} triangles",
                a, b, shared
            )));
        }
        Ok(shared == 1)
    }

    /// First unclaimed vertex joined to `v` by an outline edge.
    fn next_outline_vertex(&self, v: u32, claimed: &[bool]) -> Result<Option<u32>> {
        for &t in &self.by_vertex[v as usize] {
            for &other in &self.triangles[t] {
                if other != v && !claimed[other as usize] && self.is_outline_edge(v, other)? {
                    return Ok(Some(other));
                }
            }
        }
        Ok(None)
    }
}

/// Trace every outline loop of a triangle mesh.
///
/// Vertices flagged in `interior` never start or join a loop. Each vertex
/// joins at most one loop.
pub fn extract_outlines(vertex_count: usize, triangles: &[[u32; 3]], interior: &[bool]) -> Result<Vec<OutlineLoop>> {
    let index = TriangleIndex::new(vertex_count, triangles)?;

    let mut claimed = vec![false; vertex_count];
    for (flag, &inside) in claimed.iter_mut().zip(interior) {
        *flag = inside;
    }

    let mut outlines = Vec::new();

    for start in 0..vertex_count as u32 {
        if claimed[start as usize] {
            continue;
        }
        let Some(mut current) = index.next_outline_vertex(start, &claimed)? else {
            continue;
        };

        claimed[start as usize] = true;
        let mut outline = OutlineLoop { vertices: vec![start] };

        loop {
            outline.vertices.push(current);
            claimed[current as usize] = true;
            match index.next_outline_vertex(current, &claimed)? {
                Some(next) => current = next,
                None => break,
            }
        }

        outlines.push(outline);
    }

    Ok(outlines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::triangulate;
    use crate::tile::{Grid, TileCategory};
    use std::collections::HashSet;

    fn grid_with_blocks(width: usize, height: usize, blocks: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new_with(width, height, TileCategory::Open);
        for &(bx, by) in blocks {
            for x in bx..bx + 3 {
                for y in by..by + 3 {
                    grid.set(x, y, TileCategory::Wall);
                }
            }
        }
        grid
    }

    #[test]
    fn test_isolated_block_has_one_loop() {
        let grid = grid_with_blocks(5, 5, &[(1, 1)]);
        let tri = triangulate(&grid, 1.0).unwrap();
        let outlines = extract_outlines(tri.mesh.num_vertices(), &tri.mesh.triangles, &tri.interior).unwrap();

        assert_eq!(outlines.len(), 1);
        // Three edge midpoints per side of the block
        assert_eq!(outlines[0].len(), 12);
        let distinct: HashSet<u32> = outlines[0].vertices.iter().copied().collect();
        assert_eq!(distinct.len(), 12);

        // Every segment, closing one included, is a real outline edge
        for (a, b) in outlines[0].segments() {
            let shared = tri.mesh.triangles.iter().filter(|t| t.contains(&a) && t.contains(&b)).count();
            assert_eq!(shared, 1, "segment ({}, {})", a, b);
        }
    }

    #[test]
    fn test_two_blocks_two_loops() {
        let grid = grid_with_blocks(9, 5, &[(1, 1), (5, 1)]);
        let tri = triangulate(&grid, 1.0).unwrap();
        let outlines = extract_outlines(tri.mesh.num_vertices(), &tri.mesh.triangles, &tri.interior).unwrap();

        assert_eq!(outlines.len(), 2);
        assert!(outlines.iter().all(|o| o.len() == 12));

        let a: HashSet<u32> = outlines[0].vertices.iter().copied().collect();
        let b: HashSet<u32> = outlines[1].vertices.iter().copied().collect();
        assert!(a.is_disjoint(&b));
    }

    #[test]
    fn test_solid_grid_has_no_outline() {
        let grid = Grid::new_with(4, 4, TileCategory::Wall);
        let tri = triangulate(&grid, 1.0).unwrap();
        let outlines = extract_outlines(tri.mesh.num_vertices(), &tri.mesh.triangles, &tri.interior).unwrap();
        assert!(outlines.is_empty());
    }

    #[test]
    fn test_single_triangle() {
        let outlines = extract_outlines(3, &[[0, 1, 2]], &[]).unwrap();
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].vertices, vec![0, 1, 2]);
        let segments: Vec<(u32, u32)> = outlines[0].segments().collect();
        assert_eq!(segments, vec![(0, 1), (1, 2), (2, 0)]);
    }

    #[test]
    fn test_non_manifold_edge_rejected() {
        let triangles = [[0, 1, 2], [0, 1, 3], [1, 0, 4]];
        let result = extract_outlines(5, &triangles, &[]);
        assert!(matches!(result, Err(CaveError::InvariantViolation(_))));
    }

    #[test]
    fn test_bad_index_rejected() {
        let result = extract_outlines(2, &[[0, 1, 2]], &[]);
        assert!(matches!(result, Err(CaveError::InvariantViolation(_))));
    }
}

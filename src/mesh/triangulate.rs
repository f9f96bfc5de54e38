//! Marching-squares triangulation
//!
//! Wall cells are solid: each marching cell emits the polygon its
//! configuration code selects, as a fan of triangles. Nodes receive their
//! vertex-buffer slot the first time any cell uses them, so vertices shared
//! between cells appear once.

use crate::error::Result;
use crate::mesh::cases::polygon;
use crate::mesh::nodes::{MarchingCell, MarchingGrid, NodeId};
use crate::mesh::{planar_uvs, MeshBuffers};
use crate::tile::Grid;

/// Times the wall-top texture repeats across the map.
pub const UV_TILE_REPEAT: f32 = 10.0;

/// Output of [`triangulate`].
#[derive(Clone, Debug)]
pub struct Triangulation {
    pub mesh: MeshBuffers,
    /// Per vertex: a corner of a fully solid cell, never part of an outline.
    pub interior: Vec<bool>,
    pub lattice: MarchingGrid,
}

/// Triangulate the Wall area of `grid` with the default UV repeat.
pub fn triangulate(grid: &Grid, tile_size: f32) -> Result<Triangulation> {
    triangulate_with_repeat(grid, tile_size, UV_TILE_REPEAT)
}

/// Triangulate the Wall area of `grid`, tiling UVs `uv_repeat` times.
pub fn triangulate_with_repeat(grid: &Grid, tile_size: f32, uv_repeat: f32) -> Result<Triangulation> {
    let mut lattice = MarchingGrid::new(grid, tile_size);
    let mut mesh = MeshBuffers::default();
    let mut interior = Vec::new();

    for x in 0..lattice.cells_x() {
        for y in 0..lattice.height.saturating_sub(1) {
            let cell = *lattice.cell_at(x, y);
            triangulate_cell(&mut lattice, &cell, &mut mesh, &mut interior)?;
        }
    }

    mesh.uvs = planar_uvs(&mesh.vertices, grid.width, grid.height, tile_size, uv_repeat);

    Ok(Triangulation {
        mesh,
        interior,
        lattice,
    })
}

/// Emit the fan for one cell.
pub fn triangulate_cell(
    lattice: &mut MarchingGrid,
    cell: &MarchingCell,
    mesh: &mut MeshBuffers,
    interior: &mut Vec<bool>,
) -> Result<()> {
    let nodes: Vec<NodeId> = polygon(cell.code).iter().map(|&slot| cell.node(slot)).collect();
    let indices = assign_vertices(lattice, &nodes, mesh, interior)?;

    for i in 1..indices.len().saturating_sub(1) {
        mesh.triangles.push([indices[0], indices[i], indices[i + 1]]);
    }

    if cell.code == 15 {
        for &corner in &cell.corners {
            if let Some(index) = lattice.nodes[corner].vertex_index() {
                interior[index as usize] = true;
            }
        }
    }

    Ok(())
}

/// Vertex indices for `nodes`, appending any node seen for the first time.
fn assign_vertices(
    lattice: &mut MarchingGrid,
    nodes: &[NodeId],
    mesh: &mut MeshBuffers,
    interior: &mut Vec<bool>,
) -> Result<Vec<u32>> {
    let mut indices = Vec::with_capacity(nodes.len());

    for &id in nodes {
        let node = &mut lattice.nodes[id];
        let index = match node.vertex_index() {
            Some(index) => index,
            None => {
                let index = mesh.vertices.len() as u32;
                node.assign_index(index)?;
                mesh.vertices.push(node.position);
                interior.push(false);
                index
            }
        };
        indices.push(index);
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vec3;
    use crate::tile::TileCategory;

    #[test]
    fn test_single_corner_gives_one_triangle() {
        // Only the top-left grid cell is Wall
        let mut grid = Grid::new_with(2, 2, TileCategory::Open);
        grid.set(0, 1, TileCategory::Wall);

        let tri = triangulate(&grid, 1.0).unwrap();
        assert_eq!(tri.lattice.cells[0].code, 8);
        assert_eq!(tri.mesh.num_triangles(), 1);
        assert_eq!(tri.mesh.num_vertices(), 3);

        let [a, b, c] = tri.mesh.triangles[0];
        assert!(a != b && b != c && a != c);
        assert_eq!(tri.mesh.vertices[a as usize], Vec3::new(-0.5, 0.0, 0.5));
    }

    #[test]
    fn test_empty_and_solid_grids() {
        let open = Grid::new_with(4, 4, TileCategory::Open);
        let tri = triangulate(&open, 1.0).unwrap();
        assert!(tri.mesh.is_empty());
        assert_eq!(tri.mesh.num_vertices(), 0);

        let solid = Grid::new_with(4, 4, TileCategory::Wall);
        let tri = triangulate(&solid, 1.0).unwrap();
        // 3x3 cells, two triangles each, one vertex per control node
        assert_eq!(tri.mesh.num_triangles(), 18);
        assert_eq!(tri.mesh.num_vertices(), 16);
        assert!(tri.interior.iter().all(|&i| i));
    }

    #[test]
    fn test_shared_corner_is_one_vertex() {
        // Wall column at x = 1 is the shared edge of cells (0, 0) and (1, 0)
        let mut grid = Grid::new_with(3, 2, TileCategory::Open);
        grid.set(1, 0, TileCategory::Wall);
        grid.set(1, 1, TileCategory::Wall);

        let tri = triangulate(&grid, 1.0).unwrap();
        assert_eq!(tri.lattice.cell_at(0, 0).code, 6);
        assert_eq!(tri.lattice.cell_at(1, 0).code, 9);

        let corner = Vec3::new(0.0, 0.0, 0.5);
        let copies = tri.mesh.vertices.iter().filter(|&&v| v == corner).count();
        assert_eq!(copies, 1);

        let index = tri.mesh.vertices.iter().position(|&v| v == corner).unwrap() as u32;
        let users = tri.mesh.triangles.iter().filter(|t| t.contains(&index)).count();
        assert!(users >= 2);
        // 2 cells x 2 triangles, 4 corner + 2 midpoint vertices
        assert_eq!(tri.mesh.num_triangles(), 4);
        assert_eq!(tri.mesh.num_vertices(), 6);
    }

    #[test]
    fn test_uvs_match_vertices() {
        let mut grid = Grid::new_with(6, 6, TileCategory::Wall);
        grid.set(2, 2, TileCategory::Open);
        grid.set(3, 3, TileCategory::Open);

        let tri = triangulate(&grid, 2.0).unwrap();
        assert_eq!(tri.mesh.uvs.len(), tri.mesh.vertices.len());
        for uv in &tri.mesh.uvs {
            assert!(uv[0] >= 0.0 && uv[0] <= UV_TILE_REPEAT);
            assert!(uv[1] >= 0.0 && uv[1] <= UV_TILE_REPEAT);
        }
    }

    #[test]
    fn test_every_triangle_is_valid() {
        let grid = crate::generator::generate(40, 30, 45, 11).unwrap();
        let tri = triangulate(&grid, 1.0).unwrap();
        let n = tri.mesh.num_vertices() as u32;
        for t in &tri.mesh.triangles {
            assert!(t.iter().all(|&i| i < n));
            assert!(t[0] != t[1] && t[1] != t[2] && t[0] != t[2]);
        }
    }
}

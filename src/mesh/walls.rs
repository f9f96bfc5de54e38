//! Vertical wall strips and the decorated-floor overlay

use crate::mesh::nodes::MarchingGrid;
use crate::mesh::outline::OutlineLoop;
use crate::mesh::cases::Slot;
use crate::mesh::{MeshBuffers, Vec3};
use crate::tile::TileCategory;

/// Default height of extruded walls.
pub const WALL_HEIGHT: f32 = 5.0;

/// Extrude each outline segment into a vertical quad hanging `wall_height`
/// below the wall tops.
pub fn extrude_walls(vertices: &[Vec3], outlines: &[OutlineLoop], wall_height: f32) -> MeshBuffers {
    let mut mesh = MeshBuffers::default();

    for outline in outlines {
        for (a, b) in outline.segments() {
            let left = vertices[a as usize];
            let right = vertices[b as usize];
            mesh.push_quad(
                [
                    left,
                    right,
                    left.offset(0.0, -wall_height, 0.0),
                    right.offset(0.0, -wall_height, 0.0),
                ],
                [[0, 2, 3], [3, 1, 0]],
                [[0.0, 1.0], [1.0, 1.0], [0.0, 0.0], [1.0, 0.0]],
            );
        }
    }

    mesh
}

/// One floor quad per marching cell whose grid cell is Decorated, lowered
/// by `depth` to sit on the cave floor.
pub fn decorated_overlay(lattice: &MarchingGrid, depth: f32) -> MeshBuffers {
    let mut mesh = MeshBuffers::default();

    for cell in lattice.cells.iter().filter(|c| c.category == TileCategory::Decorated) {
        let corner = |slot| lattice.position(cell.node(slot)).offset(0.0, -depth, 0.0);
        mesh.push_quad(
            [
                corner(Slot::BottomLeft),
                corner(Slot::BottomRight),
                corner(Slot::TopLeft),
                corner(Slot::TopRight),
            ],
            [[0, 2, 1], [2, 3, 1]],
            [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
        );
    }

    mesh
}

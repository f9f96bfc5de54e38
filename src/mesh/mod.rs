//! Mesh generation from a finished cave grid
//!
//! - `nodes`: control/midpoint node lattice and marching cells
//! - `cases`: the 16-entry configuration table
//! - `triangulate`: fan triangulation with vertex deduplication
//! - `outline`: silhouette loop extraction
//! - `walls`: wall strip extrusion and the decorated-tile overlay

pub mod cases;
pub mod nodes;
pub mod outline;
pub mod triangulate;
pub mod walls;

use bytemuck::{Pod, Zeroable};
use serde::Serialize;

pub use nodes::{MarchingCell, MarchingGrid};
pub use outline::{extract_outlines, OutlineLoop};
pub use triangulate::{triangulate, Triangulation};
pub use walls::{decorated_overlay, extrude_walls};

/// A world-space position. `y` is up; the cave lies in the x/z plane.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: f32, dy: f32, dz: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// Vertex, triangle and UV buffers ready for a renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeshBuffers {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Vec<[f32; 2]>,
}

impl MeshBuffers {
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a quad as four vertices and two triangles given as local
    /// indices into the quad.
    pub fn push_quad(&mut self, corners: [Vec3; 4], tris: [[u32; 3]; 2], uvs: [[f32; 2]; 4]) {
        let start = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&corners);
        self.uvs.extend_from_slice(&uvs);
        for tri in tris {
            self.triangles.push([start + tri[0], start + tri[1], start + tri[2]]);
        }
    }

    /// Vertex positions as raw bytes (three little `f32`s per vertex).
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Triangle indices as raw bytes (three `u32`s per triangle).
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// UVs as raw bytes (two `f32`s per vertex).
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }
}

/// Inverse of linear interpolation, clamped to `0..=1`.
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// UVs spanning a grid of `width` x `height` tiles of size `tile_size`,
/// repeated `repeat` times across the map.
pub fn planar_uvs(vertices: &[Vec3], width: usize, height: usize, tile_size: f32, repeat: f32) -> Vec<[f32; 2]> {
    let half_w = width as f32 * tile_size / 2.0;
    let half_h = height as f32 * tile_size / 2.0;

    vertices
        .iter()
        .map(|v| {
            [
                inverse_lerp(-half_w, half_w, v.x) * repeat,
                inverse_lerp(-half_h, half_h, v.z) * repeat,
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(-2.0, 2.0, 0.0), 0.5);
        assert_eq!(inverse_lerp(-2.0, 2.0, -5.0), 0.0);
        assert_eq!(inverse_lerp(-2.0, 2.0, 2.0), 1.0);
        assert_eq!(inverse_lerp(1.0, 1.0, 3.0), 0.0);
    }

    #[test]
    fn test_planar_uvs() {
        let vertices = vec![Vec3::new(-5.0, 0.0, -2.5), Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 2.5)];
        let uvs = planar_uvs(&vertices, 10, 5, 1.0, 10.0);
        assert_eq!(uvs, vec![[0.0, 0.0], [5.0, 5.0], [10.0, 10.0]]);
    }

    #[test]
    fn test_byte_views() {
        let mut mesh = MeshBuffers::default();
        mesh.push_quad(
            [Vec3::default(); 4],
            [[0, 1, 2], [2, 3, 0]],
            [[0.0, 0.0]; 4],
        );
        assert_eq!(mesh.vertex_bytes().len(), 4 * 12);
        assert_eq!(mesh.index_bytes().len(), 2 * 12);
        assert_eq!(mesh.uv_bytes().len(), 4 * 8);
        assert_eq!(mesh.triangles[1], [2, 3, 0]);
    }
}

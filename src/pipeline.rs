//! End-to-end cave generation
//!
//! grid → regions → connected grid → mesh buffers. Each stage takes the grid
//! by value or by exclusive reference, so there is exactly one live grid at
//! any point in the run.

use serde::Serialize;

use crate::config::CaveConfig;
use crate::connectivity::connect_all_rooms;
use crate::error::Result;
use crate::generator::{fill_grid, smooth_grid};
use crate::mesh::triangulate::triangulate_with_repeat;
use crate::mesh::{decorated_overlay, extract_outlines, extrude_walls, MeshBuffers, OutlineLoop, Vec3};
use crate::passages::{Passage, PASSAGE_RADIUS};
use crate::regions::{prune_room_regions, prune_wall_regions, ROOM_THRESHOLD, WALL_THRESHOLD};
use crate::rooms::{Room, RoomGraph};
use crate::tile::{Coord, Grid, TileCategory};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Height at which pins are placed above the floor plane.
const PIN_HEIGHT: f32 = 2.0;

/// Result of region and connectivity analysis.
#[derive(Clone, Debug, Serialize)]
pub struct Analysis {
    pub grid: Grid,
    pub rooms: RoomGraph,
    /// One world point per room whose centroid is not Wall.
    pub pins: Vec<Vec3>,
    pub passages: Vec<Passage>,
}

impl Analysis {
    pub fn main_room(&self) -> &Room {
        &self.rooms.rooms[self.rooms.main_room]
    }
}

/// Analyze with the default thresholds and passage radius.
pub fn analyze(grid: Grid) -> Result<Analysis> {
    analyze_with(grid, WALL_THRESHOLD, ROOM_THRESHOLD, PASSAGE_RADIUS)
}

/// Prune noise regions, build rooms, pick the main room and carve passages
/// until every room is reachable from it.
pub fn analyze_with(mut grid: Grid, wall_threshold: usize, room_threshold: usize, radius: i32) -> Result<Analysis> {
    prune_wall_regions(&mut grid, wall_threshold);
    let survivors = prune_room_regions(&mut grid, room_threshold);

    let rooms: Vec<Room> = survivors
        .into_iter()
        .map(|region| Room::from_region(region, &grid))
        .collect();

    // Pins follow discovery order and are placed before any carving
    let pins = rooms
        .iter()
        .filter(|room| {
            grid.get_checked(room.centroid.x, room.centroid.y)
                .is_some_and(|c| c.is_passable())
        })
        .map(|room| pin_position(room.centroid, grid.width, grid.height))
        .collect();

    let mut rooms = RoomGraph::new(rooms)?;
    let passages = connect_all_rooms(&mut grid, &mut rooms, radius)?;

    Ok(Analysis {
        grid,
        rooms,
        pins,
        passages,
    })
}

/// World position of a grid cell for object placement.
pub fn pin_position(tile: Coord, width: usize, height: usize) -> Vec3 {
    Vec3::new(
        -((width / 2) as f32) + 0.5 + tile.x as f32,
        PIN_HEIGHT,
        -((height / 2) as f32) + 0.5 + tile.y as f32,
    )
}

/// Geometry built from a finished grid.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CaveMeshes {
    /// Wall tops, with planar UVs.
    pub wall_top: MeshBuffers,
    /// Floor quads under Decorated tiles.
    pub decorated: MeshBuffers,
    /// Silhouette loops, indexing `wall_top.vertices`.
    pub outlines: Vec<OutlineLoop>,
    /// Vertical strips extruded from the outlines.
    pub wall_sides: MeshBuffers,
}

/// Border the grid with Wall and turn it into mesh buffers.
pub fn build_meshes(grid: &Grid, config: &CaveConfig) -> Result<CaveMeshes> {
    let bordered = grid.with_border(config.border_size, TileCategory::Wall);
    let tri = triangulate_with_repeat(&bordered, config.tile_size, config.uv_tile_repeat)?;
    let outlines = extract_outlines(tri.mesh.num_vertices(), &tri.mesh.triangles, &tri.interior)?;
    let wall_sides = extrude_walls(&tri.mesh.vertices, &outlines, config.wall_height);
    let decorated = decorated_overlay(&tri.lattice, config.wall_height);

    Ok(CaveMeshes {
        wall_top: tri.mesh,
        decorated,
        outlines,
        wall_sides,
    })
}

/// Everything one generation run produces.
#[derive(Clone, Debug, Serialize)]
pub struct Cave {
    pub config: CaveConfig,
    pub grid: Grid,
    pub rooms: RoomGraph,
    pub pins: Vec<Vec3>,
    pub passages: Vec<Passage>,
    pub meshes: CaveMeshes,
}

/// Summary numbers for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CaveStats {
    pub wall_tiles: usize,
    pub open_tiles: usize,
    pub decorated_tiles: usize,
    pub rooms: usize,
    pub passages: usize,
    pub pins: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub outlines: usize,
    pub wall_segments: usize,
}

impl Cave {
    pub fn stats(&self) -> CaveStats {
        CaveStats {
            wall_tiles: self.grid.count(&TileCategory::Wall),
            open_tiles: self.grid.count(&TileCategory::Open),
            decorated_tiles: self.grid.count(&TileCategory::Decorated),
            rooms: self.rooms.len(),
            passages: self.passages.len(),
            pins: self.pins.len(),
            vertices: self.meshes.wall_top.num_vertices(),
            triangles: self.meshes.wall_top.num_triangles(),
            outlines: self.meshes.outlines.len(),
            wall_segments: self.meshes.outlines.iter().map(|o| o.len()).sum(),
        }
    }
}

/// Run the whole pipeline for one config.
pub fn generate_cave(config: &CaveConfig) -> Result<Cave> {
    config.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut grid = fill_grid(config.width, config.height, config.clamped_density(), &mut rng)?;
    smooth_grid(&mut grid, config.smoothing_iterations);

    let analysis = analyze_with(
        grid,
        config.wall_threshold,
        config.room_threshold,
        config.passage_radius,
    )?;
    let meshes = build_meshes(&analysis.grid, config)?;

    Ok(Cave {
        config: config.clone(),
        grid: analysis.grid,
        rooms: analysis.rooms,
        pins: analysis.pins,
        passages: analysis.passages,
        meshes,
    })
}

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;

use crate::error::Result;
use crate::mesh::{MeshBuffers, OutlineLoop, Vec3};
use crate::passages::Passage;
use crate::pipeline::Cave;
use crate::tile::{Grid, TileCategory};

const WALL_COLOR: [u8; 3] = [40, 36, 32];
const OPEN_COLOR: [u8; 3] = [196, 178, 150];
const DECORATED_COLOR: [u8; 3] = [92, 150, 70];
const PIN_COLOR: [u8; 3] = [220, 40, 40];
const PASSAGE_COLOR: [u8; 3] = [60, 120, 220];

fn category_color(category: TileCategory) -> [u8; 3] {
    match category {
        TileCategory::Wall => WALL_COLOR,
        TileCategory::Open => OPEN_COLOR,
        TileCategory::Decorated => DECORATED_COLOR,
    }
}

/// Render a grid with `scale` pixels per tile. Image rows run from the
/// highest `y` down.
pub fn render_grid_image(grid: &Grid, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let mut img: RgbImage = ImageBuffer::new(grid.width as u32 * scale, grid.height as u32 * scale);

    for (x, y, &category) in grid.iter() {
        fill_tile(&mut img, grid.height, x, y, scale, category_color(category));
    }

    img
}

fn fill_tile(img: &mut RgbImage, height: usize, x: usize, y: usize, scale: u32, color: [u8; 3]) {
    let px = x as u32 * scale;
    let py = (height - 1 - y) as u32 * scale;
    for dy in 0..scale {
        for dx in 0..scale {
            img.put_pixel(px + dx, py + dy, Rgb(color));
        }
    }
}

/// Export the final grid as a PNG, with passage endpoints and room centroids
/// highlighted.
pub fn export_cave_png<P: AsRef<Path>>(cave: &Cave, path: P, scale: u32) -> std::result::Result<(), image::ImageError> {
    let scale = scale.max(1);
    let mut img = render_grid_image(&cave.grid, scale);
    let height = cave.grid.height;

    for passage in &cave.passages {
        for tile in [passage.tile_a, passage.tile_b] {
            fill_tile(&mut img, height, tile.x as usize, tile.y as usize, scale, PASSAGE_COLOR);
        }
    }
    for room in &cave.rooms.rooms {
        let c = room.centroid;
        if cave.grid.in_bounds(c.x, c.y) {
            fill_tile(&mut img, height, c.x as usize, c.y as usize, scale, PIN_COLOR);
        }
    }

    img.save(path)
}

/// Serialized form of the generated geometry.
#[derive(Serialize)]
struct MeshExport<'a> {
    seed: u64,
    width: usize,
    height: usize,
    wall_top: &'a MeshBuffers,
    wall_sides: &'a MeshBuffers,
    decorated: &'a MeshBuffers,
    outlines: &'a [OutlineLoop],
    pins: &'a [Vec3],
    passages: &'a [Passage],
}

/// Write the cave's meshes, pins and passages as JSON.
pub fn export_mesh_json<P: AsRef<Path>>(cave: &Cave, path: P) -> Result<()> {
    let export = MeshExport {
        seed: cave.config.seed,
        width: cave.grid.width,
        height: cave.grid.height,
        wall_top: &cave.meshes.wall_top,
        wall_sides: &cave.meshes.wall_sides,
        decorated: &cave.meshes.decorated,
        outlines: &cave.meshes.outlines,
        pins: &cave.pins,
        passages: &cave.passages,
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &export).map_err(std::io::Error::from)?;
    writer.flush()?;
    Ok(())
}

/// Write the wall-top mesh as raw little-endian buffers: positions, then
/// indices, then UVs.
pub fn export_mesh_raw<P: AsRef<Path>>(mesh: &MeshBuffers, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&(mesh.num_vertices() as u32).to_le_bytes())?;
    writer.write_all(&(mesh.num_triangles() as u32).to_le_bytes())?;
    writer.write_all(mesh.vertex_bytes())?;
    writer.write_all(mesh.index_bytes())?;
    writer.write_all(mesh.uv_bytes())?;
    writer.flush()?;
    Ok(())
}

//! ASCII rendering and export for cave grids
//!
//! Rows are printed from the highest `y` down, so the text reads the same
//! way up as the meshes built from the grid.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;

use crate::pipeline::Cave;
use crate::tile::{Coord, Grid, TileCategory};

/// Character for a tile category.
pub fn category_char(category: TileCategory) -> char {
    match category {
        TileCategory::Wall => '#',
        TileCategory::Open => '.',
        TileCategory::Decorated => '"',
    }
}

/// Character marking a room centroid.
pub const CENTROID_CHAR: char = '*';

/// Render the grid, marking `centroids` on top of the tiles.
pub fn render_grid(grid: &Grid, centroids: &[Coord]) -> String {
    let marks: HashSet<Coord> = centroids.iter().copied().collect();
    let mut output = String::with_capacity((grid.width + 1) * grid.height);

    for y in (0..grid.height).rev() {
        for x in 0..grid.width {
            if marks.contains(&Coord::from_usize(x, y)) {
                output.push(CENTROID_CHAR);
            } else {
                output.push(category_char(*grid.get(x, y)));
            }
        }
        output.push('\n');
    }

    output
}

/// Legend for [`render_grid`] output.
pub fn legend() -> String {
    let mut output = String::from("Legend:\n");
    for category in [TileCategory::Wall, TileCategory::Open, TileCategory::Decorated] {
        output.push_str(&format!("  {} {}\n", category_char(category), category.display_name()));
    }
    output.push_str(&format!("  {} Room centroid\n", CENTROID_CHAR));
    output
}

/// Write the map, legend and statistics of a finished cave to a text file.
pub fn export_cave_file<P: AsRef<Path>>(cave: &Cave, path: P) -> io::Result<()> {
    let mut file = File::create(path)?;
    let stats = cave.stats();
    let total = cave.grid.width * cave.grid.height;
    let centroids: Vec<Coord> = cave.rooms.rooms.iter().map(|r| r.centroid).collect();

    writeln!(file, "=== CAVE GENERATOR MAP FILE ===")?;
    writeln!(file, "Seed: {}", cave.config.seed)?;
    writeln!(file, "Size: {}x{}", cave.grid.width, cave.grid.height)?;
    writeln!(file, "Wall density: {}%", cave.config.clamped_density())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    writeln!(file, "=== MAP ===")?;
    write!(file, "{}", render_grid(&cave.grid, &centroids))?;
    writeln!(file)?;
    write!(file, "{}", legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    writeln!(file, "Total tiles: {}", total)?;
    for (category, count) in [
        (TileCategory::Wall, stats.wall_tiles),
        (TileCategory::Open, stats.open_tiles),
        (TileCategory::Decorated, stats.decorated_tiles),
    ] {
        let pct = 100.0 * count as f64 / total as f64;
        writeln!(file, "  {:10} {} {:>7} ({:>5.1}%)", category.display_name(), category_char(category), count, pct)?;
    }
    writeln!(file)?;

    writeln!(file, "Rooms: {}", stats.rooms)?;
    for (i, room) in cave.rooms.rooms.iter().enumerate() {
        writeln!(
            file,
            "  #{:<3} {:10} {:>6} tiles  centroid ({}, {}){}",
            i,
            room.category.display_name(),
            room.size(),
            room.centroid.x,
            room.centroid.y,
            if room.is_main { "  [main]" } else { "" }
        )?;
    }
    writeln!(file, "Passages: {}", stats.passages)?;
    for passage in &cave.passages {
        writeln!(
            file,
            "  #{} ({}, {}) -> #{} ({}, {})",
            passage.room_a, passage.tile_a.x, passage.tile_a.y, passage.room_b, passage.tile_b.x, passage.tile_b.y
        )?;
    }
    writeln!(file)?;

    writeln!(file, "=== MESH ===")?;
    writeln!(file, "Wall top: {} vertices, {} triangles", stats.vertices, stats.triangles)?;
    writeln!(file, "Outlines: {} loops, {} segments", stats.outlines, stats.wall_segments)?;
    writeln!(file, "Wall sides: {} triangles", cave.meshes.wall_sides.num_triangles())?;
    writeln!(file, "Decorated floor: {} triangles", cave.meshes.decorated.num_triangles())?;

    Ok(())
}

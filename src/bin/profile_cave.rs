//! Profiling tool to see where generation time goes

use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cave_generator::config::CaveConfig;
use cave_generator::generator::{fill_grid, smooth_grid};
use cave_generator::mesh::triangulate::triangulate_with_repeat;
use cave_generator::mesh::{decorated_overlay, extract_outlines, extrude_walls};
use cave_generator::pipeline::analyze_with;
use cave_generator::tile::TileCategory;

fn main() {
    let config = CaveConfig::new(500, 500, 45, 1337);

    println!("=== Performance Profiling ===");
    println!("Map size: {}x{} ({} cells)", config.width, config.height, config.width * config.height);
    println!();

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let start = Instant::now();
    let mut grid = match fill_grid(config.width, config.height, config.clamped_density(), &mut rng) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Fill failed: {}", e);
            return;
        }
    };
    let fill_time = start.elapsed();
    println!("Random fill: {:?}", fill_time);

    let start = Instant::now();
    smooth_grid(&mut grid, config.smoothing_iterations);
    let smooth_time = start.elapsed();
    println!("Smoothing ({} passes): {:?}", config.smoothing_iterations, smooth_time);

    let start = Instant::now();
    let analysis = match analyze_with(grid, config.wall_threshold, config.room_threshold, config.passage_radius) {
        Ok(analysis) => analysis,
        Err(e) => {
            eprintln!("Analysis failed: {}", e);
            return;
        }
    };
    let analysis_time = start.elapsed();
    println!("Regions + connectivity: {:?}", analysis_time);
    println!("  Rooms: {}", analysis.rooms.len());
    println!("  Passages: {}", analysis.passages.len());

    let start = Instant::now();
    let bordered = analysis.grid.with_border(config.border_size, TileCategory::Wall);
    let tri = match triangulate_with_repeat(&bordered, config.tile_size, config.uv_tile_repeat) {
        Ok(tri) => tri,
        Err(e) => {
            eprintln!("Triangulation failed: {}", e);
            return;
        }
    };
    let tri_time = start.elapsed();
    println!("Triangulation: {:?}", tri_time);
    println!("  {} vertices, {} triangles", tri.mesh.num_vertices(), tri.mesh.num_triangles());

    let start = Instant::now();
    let outlines = match extract_outlines(tri.mesh.num_vertices(), &tri.mesh.triangles, &tri.interior) {
        Ok(outlines) => outlines,
        Err(e) => {
            eprintln!("Outline extraction failed: {}", e);
            return;
        }
    };
    let walls = extrude_walls(&tri.mesh.vertices, &outlines, config.wall_height);
    let overlay = decorated_overlay(&tri.lattice, config.wall_height);
    let outline_time = start.elapsed();
    println!("Outlines + walls: {:?}", outline_time);
    println!("  {} loops, {} wall triangles, {} floor triangles", outlines.len(), walls.num_triangles(), overlay.num_triangles());

    let total = fill_time + smooth_time + analysis_time + tri_time + outline_time;
    let pct = |d: std::time::Duration| 100.0 * d.as_secs_f64() / total.as_secs_f64();
    println!("\n=== Summary ===");
    println!("Random fill:  {:>8.2}% ({:?})", pct(fill_time), fill_time);
    println!("Smoothing:    {:>8.2}% ({:?})", pct(smooth_time), smooth_time);
    println!("Analysis:     {:>8.2}% ({:?})", pct(analysis_time), analysis_time);
    println!("Triangulate:  {:>8.2}% ({:?})", pct(tri_time), tri_time);
    println!("Outlines:     {:>8.2}% ({:?})", pct(outline_time), outline_time);
    println!("─────────────────────────────────");
    println!("Total:        {:?}", total);
}

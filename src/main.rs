use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cave_generator::ascii::{export_cave_file, legend, render_grid};
use cave_generator::config::{CaveConfig, MAX_MAP_SIZE, MIN_MAP_SIZE};
use cave_generator::export::{export_cave_png, export_mesh_json};
use cave_generator::generate_cave;

#[derive(Parser, Debug)]
#[command(name = "cave_generator")]
#[command(about = "Generate procedural 2D caves and their wall meshes")]
struct Args {
    /// Width of the map in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the map in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Initial wall density in percent
    #[arg(short, long)]
    density: Option<i32>,

    /// Load base parameters from a JSON file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final grid as ASCII
    #[arg(long)]
    ascii: bool,

    /// Export map and statistics to a text file
    #[arg(long)]
    export_map: Option<PathBuf>,

    /// Export the map as a PNG
    #[arg(long)]
    export_png: Option<PathBuf>,

    /// Pixels per tile for PNG export
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Export meshes, pins and passages as JSON
    #[arg(long)]
    export_mesh: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match CaveConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => CaveConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE);
    }
    if let Some(height) = args.height {
        config.height = height.clamp(MIN_MAP_SIZE, MAX_MAP_SIZE);
    }
    if let Some(density) = args.density {
        config.wall_density = density;
    }
    config.seed = args.seed.unwrap_or_else(rand::random);

    println!("Generating cave with seed: {}", config.seed);
    println!("Map size: {}x{}", config.width, config.height);
    println!("Wall density: {}%", config.clamped_density());

    let cave = match generate_cave(&config) {
        Ok(cave) => cave,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stats = cave.stats();
    let total = (config.width * config.height) as f64;
    println!("Tiles:");
    println!("  Wall: {} ({:.1}%)", stats.wall_tiles, 100.0 * stats.wall_tiles as f64 / total);
    println!("  Open: {} ({:.1}%)", stats.open_tiles, 100.0 * stats.open_tiles as f64 / total);
    println!("  Decorated: {} ({:.1}%)", stats.decorated_tiles, 100.0 * stats.decorated_tiles as f64 / total);
    println!("Rooms: {} (main room: {} tiles)", stats.rooms, cave.rooms.rooms[cave.rooms.main_room].size());
    println!("Passages carved: {}", stats.passages);
    println!("Pins: {}", stats.pins);
    println!("Wall mesh: {} vertices, {} triangles", stats.vertices, stats.triangles);
    println!("Outlines: {} loops, {} segments", stats.outlines, stats.wall_segments);

    if args.ascii {
        let centroids: Vec<_> = cave.rooms.rooms.iter().map(|r| r.centroid).collect();
        println!();
        print!("{}", render_grid(&cave.grid, &centroids));
        print!("{}", legend());
    }

    let mut failed = false;

    if let Some(path) = &args.export_map {
        println!("Exporting map to {}...", path.display());
        if let Err(e) = export_cave_file(&cave, path) {
            eprintln!("Failed to export map: {}", e);
            failed = true;
        }
    }

    if let Some(path) = &args.export_png {
        println!("Exporting PNG to {}...", path.display());
        if let Err(e) = export_cave_png(&cave, path, args.png_scale) {
            eprintln!("Failed to export PNG: {}", e);
            failed = true;
        }
    }

    if let Some(path) = &args.export_mesh {
        println!("Exporting mesh to {}...", path.display());
        if let Err(e) = export_mesh_json(&cave, path) {
            eprintln!("Failed to export mesh: {}", e);
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        println!("Done.");
        ExitCode::SUCCESS
    }
}

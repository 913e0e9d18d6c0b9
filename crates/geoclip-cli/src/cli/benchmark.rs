//! Benchmark command implementation.

use std::time::Instant;

use anyhow::{Context, Result, bail};

use geoclip::{Bounds, ClipOptions};

use super::clip::{ClipRequest, clip_geometry};
use super::common::{Precision, flag_value, parse_bounds, read_input};

/// Execute the benchmark command.
pub fn cmd_benchmark(args: &[String]) -> Result<()> {
    let mut input_path: Option<&str> = None;
    let mut bounds: Option<Bounds> = None;
    let mut options = ClipOptions::default();
    let mut precision = Precision::F64;
    let mut iterations = 100usize;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-b" | "--bounds" => {
                bounds = Some(parse_bounds(flag_value(args, &mut i, "--bounds")?)?);
            }
            "-r" | "--resolution" => {
                let value = flag_value(args, &mut i, "--resolution")?;
                options.resolution = value
                    .parse()
                    .with_context(|| format!("invalid resolution '{}'", value))?;
            }
            "--precision" => {
                precision = Precision::from_name(flag_value(args, &mut i, "--precision")?)?;
            }
            "-n" | "--iterations" => {
                let value = flag_value(args, &mut i, "--iterations")?;
                iterations = value
                    .parse()
                    .with_context(|| format!("invalid iteration count '{}'", value))?;
            }
            "-v" | "--verbose" => {}
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            path if !path.starts_with('-') => {
                if input_path.is_none() {
                    input_path = Some(path);
                }
            }
            unknown => bail!("unknown option: {}", unknown),
        }
        i += 1;
    }

    let Some(input_path) = input_path else {
        print_usage();
        bail!("input file required");
    };
    let Some(bounds) = bounds else {
        print_usage();
        bail!("--bounds XMIN,XMAX,YMIN,YMAX is required");
    };
    if iterations == 0 {
        bail!("--iterations must be at least 1");
    }

    println!("Loading: {}", input_path);
    let start_load = Instant::now();
    let input = read_input(input_path)?;
    println!(
        "Loaded {} polylines and {} polygons ({} vertices) in {:?}",
        input.polylines.len(),
        input.polygons.len(),
        input.vertex_count(),
        start_load.elapsed()
    );

    let request = ClipRequest { bounds, options, precision };

    // Warm-up run doubles as the output size report.
    let report = clip_geometry(&input, &request)?;

    let start = Instant::now();
    for _ in 0..iterations {
        clip_geometry(&input, &request)?;
    }
    let elapsed = start.elapsed();
    let per_run_ms = elapsed.as_secs_f64() * 1000.0 / iterations as f64;
    let vertices_per_sec = input.vertex_count() as f64 * iterations as f64 / elapsed.as_secs_f64().max(1e-9);

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  GEOCLIP BENCHMARK ({:?})", precision);
    println!("═══════════════════════════════════════════════");
    println!("  Window: [{}, {}] x [{}, {}]", bounds.x_min, bounds.x_max, bounds.y_min, bounds.y_max);
    println!("  Iterations: {}", iterations);
    println!(
        "  Polylines out: {} ({} vertices)",
        report.stats.output_polylines, report.stats.output_polyline_vertices
    );
    println!(
        "  Polygons out: {} ({} vertices)",
        report.stats.output_polygons, report.stats.output_polygon_vertices
    );
    println!("  Time: {:?}", elapsed);
    println!("  Avg per run: {:.3}ms", per_run_ms);
    println!("  Throughput: {:.0} vertices/s", vertices_per_sec);
    println!("═══════════════════════════════════════════════");
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: geoclip benchmark <input.json> --bounds XMIN,XMAX,YMIN,YMAX [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -n, --iterations <n>     Timed runs (default: 100)");
    eprintln!("  -r, --resolution <n>     Polyline thinning distance (default: 0)");
    eprintln!("  --precision <f32|f64>    Coordinate precision (default: f64)");
    eprintln!();
    eprintln!("Benchmarks clipping performance.");
}

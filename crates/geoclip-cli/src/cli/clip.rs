//! Clip command implementation.

use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use geoclip::{Bounds, ClipOptions, Coord, Point, PolylineBatch};

use super::common::{
    InputGeometry, OutputFormat, Precision, flag_value, geometry_to_svg, parse_bounds, read_input, write_output,
};

/// Everything needed to clip one input file.
#[derive(Debug, Clone)]
pub struct ClipRequest {
    pub bounds: Bounds,
    pub options: ClipOptions,
    pub precision: Precision,
}

/// Size summary for JSON output and the count-only mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClipStats {
    pub input_polylines: usize,
    pub input_polyline_vertices: usize,
    pub output_polylines: usize,
    pub output_polyline_vertices: usize,
    pub input_polygons: usize,
    pub output_polygons: usize,
    pub output_polygon_vertices: usize,
}

/// Clipped geometry, always reported in `f64`.
#[derive(Debug, Clone)]
pub struct ClipReport {
    pub polylines: PolylineBatch,
    /// Index-aligned with the input polygons; empty when excluded.
    pub polygons: Vec<Vec<Point>>,
    pub stats: ClipStats,
}

#[derive(Serialize)]
struct JsonPolylines {
    counts: Vec<usize>,
    coordinates: Vec<f64>,
}

#[derive(Serialize)]
struct JsonPolygon {
    index: usize,
    vertices: Vec<[f64; 2]>,
}

#[derive(Serialize)]
struct JsonOutput {
    bounds: Bounds,
    polylines: JsonPolylines,
    polygons: Vec<JsonPolygon>,
    stats: ClipStats,
}

/// Clip `input` in the requested precision.
pub fn clip_geometry(input: &InputGeometry, request: &ClipRequest) -> Result<ClipReport> {
    match request.precision {
        Precision::F64 => clip_in::<f64>(input, request),
        Precision::F32 => clip_in::<f32>(input, request),
    }
}

/// Like [`clip_geometry`] but only sizes the polyline output.
pub fn count_geometry(input: &InputGeometry, request: &ClipRequest) -> Result<ClipStats> {
    match request.precision {
        Precision::F64 => count_in::<f64>(input, request),
        Precision::F32 => count_in::<f32>(input, request),
    }
}

fn clip_in<T: Coord>(input: &InputGeometry, request: &ClipRequest) -> Result<ClipReport> {
    let bounds: Bounds<T> = request.bounds.cast();
    let batch: PolylineBatch<T> = input
        .polyline_batch()?
        .cast()
        .context("polylines do not fit the requested precision")?;
    let rings = cast_rings::<T>(input);

    let polylines = request
        .options
        .subset(&batch, &bounds)
        .context("polyline subsetting failed")?
        .cast::<f64>()?;
    let polygons: Vec<Vec<Point>> = request
        .options
        .clip_polygons(&bounds, &rings)
        .context("polygon clipping failed")?
        .into_iter()
        .map(|ring| ring.into_iter().map(Point::cast).collect())
        .collect();

    let stats = ClipStats {
        input_polylines: batch.polyline_count(),
        input_polyline_vertices: batch.vertex_count(),
        output_polylines: polylines.polyline_count(),
        output_polyline_vertices: polylines.vertex_count(),
        input_polygons: rings.len(),
        output_polygons: polygons.iter().filter(|ring| !ring.is_empty()).count(),
        output_polygon_vertices: polygons.iter().map(Vec::len).sum(),
    };

    Ok(ClipReport { polylines, polygons, stats })
}

fn count_in<T: Coord>(input: &InputGeometry, request: &ClipRequest) -> Result<ClipStats> {
    let bounds: Bounds<T> = request.bounds.cast();
    let batch: PolylineBatch<T> = input
        .polyline_batch()?
        .cast()
        .context("polylines do not fit the requested precision")?;
    let rings = cast_rings::<T>(input);

    let counts = request
        .options
        .subset_count(&batch, &bounds)
        .context("polyline subsetting failed")?;
    let polygons = request
        .options
        .clip_polygons(&bounds, &rings)
        .context("polygon clipping failed")?;

    Ok(ClipStats {
        input_polylines: batch.polyline_count(),
        input_polyline_vertices: batch.vertex_count(),
        output_polylines: counts.polylines,
        output_polyline_vertices: counts.vertices,
        input_polygons: rings.len(),
        output_polygons: polygons.iter().filter(|ring| !ring.is_empty()).count(),
        output_polygon_vertices: polygons.iter().map(Vec::len).sum(),
    })
}

fn cast_rings<T: Coord>(input: &InputGeometry) -> Vec<Vec<Point<T>>> {
    input
        .polygon_rings()
        .into_iter()
        .map(|ring| ring.into_iter().map(Point::cast).collect())
        .collect()
}

/// Serialize a report as JSON.
pub fn report_to_json(report: &ClipReport, bounds: &Bounds) -> Result<String> {
    let output = JsonOutput {
        bounds: *bounds,
        polylines: JsonPolylines {
            counts: report.polylines.counts().to_vec(),
            coordinates: report.polylines.to_interleaved(),
        },
        polygons: report
            .polygons
            .iter()
            .enumerate()
            .filter(|(_, ring)| !ring.is_empty())
            .map(|(index, ring)| JsonPolygon {
                index,
                vertices: ring.iter().map(|p| [p.x, p.y]).collect(),
            })
            .collect(),
        stats: report.stats,
    };
    serde_json::to_string(&output).context("failed to serialize JSON")
}

/// Run a clip end to end: clip, render, write.
pub fn execute(
    input: &InputGeometry,
    request: &ClipRequest,
    format: OutputFormat,
    count_only: bool,
    output_path: Option<&str>,
) -> Result<()> {
    let start = Instant::now();

    let rendered = if count_only {
        let stats = count_geometry(input, request)?;
        tracing::info!(?stats, elapsed = ?start.elapsed(), "counted clip output");
        serde_json::to_string(&stats).context("failed to serialize JSON")?
    } else {
        let report = clip_geometry(input, request)?;
        tracing::info!(stats = ?report.stats, elapsed = ?start.elapsed(), "clipped geometry");
        match format {
            OutputFormat::Json => report_to_json(&report, &request.bounds)?,
            OutputFormat::Svg => geometry_to_svg(&request.bounds, &report.polylines, &report.polygons),
        }
    };

    write_output(output_path, &rendered)
}

/// Execute the clip command.
pub fn cmd_clip(args: &[String]) -> Result<()> {
    let mut input_path: Option<&str> = None;
    let mut output_path: Option<&str> = None;
    let mut bounds: Option<Bounds> = None;
    let mut options = ClipOptions::default();
    let mut precision = Precision::F64;
    let mut format = OutputFormat::Json;
    let mut count_only = false;

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
            "--keep-degenerates" => {
                options.discard_degenerates = false;
            }
            "--precision" => {
                precision = Precision::from_name(flag_value(args, &mut i, "--precision")?)?;
            }
            "--lonlat" => {
                options = options.lon_lat();
            }
            "--count-only" => {
                count_only = true;
            }
            "-f" | "--format" => {
                format = OutputFormat::from_name(flag_value(args, &mut i, "--format")?)?;
            }
            "--json" => {
                format = OutputFormat::Json;
            }
            "--svg" => {
                format = OutputFormat::Svg;
            }
            "-o" | "--output" => {
                output_path = Some(flag_value(args, &mut i, "--output")?);
            }
            // Handled in main when installing the log subscriber.
            "-v" | "--verbose" => {}
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "-" => {
                if input_path.is_none() {
                    input_path = Some("-");
                }
            }
            path if !path.starts_with('-') => {
                if input_path.is_none() {
                    input_path = Some(path);
                }
            }
            unknown => {
                bail!("unknown option: {}", unknown);
            }
        }
        i += 1;
    }

    let Some(input_path) = input_path else {
        print_usage();
        bail!("input file required (use '-' for stdin)");
    };
    let Some(bounds) = bounds else {
        print_usage();
        bail!("--bounds XMIN,XMAX,YMIN,YMAX is required");
    };

    let input = read_input(input_path)?;
    tracing::debug!(
        polylines = input.polylines.len(),
        polygons = input.polygons.len(),
        vertices = input.vertex_count(),
        "loaded input"
    );

    let request = ClipRequest { bounds, options, precision };
    execute(&input, &request, format, count_only, output_path)
}

fn print_usage() {
    eprintln!("Usage: geoclip clip <input.json> --bounds XMIN,XMAX,YMIN,YMAX [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -b, --bounds <x0,x1,y0,y1>  Clip window (required)");
    eprintln!("  -r, --resolution <n>        Drop polyline edges shorter than n on both axes (default: 0)");
    eprintln!("  --keep-degenerates          Keep zero-area spikes in clipped polygons");
    eprintln!("  --precision <f32|f64>       Coordinate precision (default: f64)");
    eprintln!("  --lonlat                    Require the window to lie in [-180,180] x [-90,90]");
    eprintln!("  --count-only                Print output sizes instead of geometry");
    eprintln!("  -f, --format <json|svg>     Output format (default: json)");
    eprintln!("  -o, --output <file>         Output file (default: stdout)");
    eprintln!("  -v, --verbose               Debug logging");
    eprintln!();
    eprintln!("Input JSON: {{\"polylines\": [[[x,y], ...], ...], \"polygons\": [[[x,y], ...], ...]}}");
    eprintln!("Use '-' as input to read from stdin");
}

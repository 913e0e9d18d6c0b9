//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use geoclip::{Bounds, Point, PolylineBatch};

/// Output format for clipped geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Svg,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "svg" => Ok(OutputFormat::Svg),
            other => bail!("unknown format '{}', use 'json' or 'svg'", other),
        }
    }
}

/// Coordinate precision the clip runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    F32,
    #[default]
    F64,
}

impl Precision {
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "f32" | "single" => Ok(Precision::F32),
            "f64" | "double" => Ok(Precision::F64),
            other => bail!("unknown precision '{}', use 'f32' or 'f64'", other),
        }
    }
}

/// Geometry read from an input file. Both keys are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputGeometry {
    #[serde(default)]
    pub polylines: Vec<Vec<[f64; 2]>>,
    #[serde(default)]
    pub polygons: Vec<Vec<[f64; 2]>>,
}

impl InputGeometry {
    pub fn polyline_batch(&self) -> Result<PolylineBatch> {
        PolylineBatch::from_polylines(self.polylines.iter().map(|line| to_points(line)))
            .context("invalid polyline input")
    }

    pub fn polygon_rings(&self) -> Vec<Vec<Point>> {
        self.polygons.iter().map(|ring| to_points(ring)).collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.polylines.iter().chain(&self.polygons).map(Vec::len).sum()
    }
}

fn to_points(coords: &[[f64; 2]]) -> Vec<Point> {
    coords.iter().map(|&[x, y]| Point::new(x, y)).collect()
}

/// Read and parse input geometry. `-` reads stdin.
pub fn read_input(path: &str) -> Result<InputGeometry> {
    let content = if path == "-" {
        tracing::debug!("reading input from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read from stdin")?;
        buffer
    } else {
        tracing::debug!(path, "reading input");
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?
    };

    serde_json::from_str(&content).with_context(|| format!("failed to parse geometry JSON from {}", path))
}

/// Write output to a file, or stdout for `None` / `-`.
pub fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some("-") | None => {
            println!("{}", content);
        }
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path))?;
            eprintln!("Wrote: {}", path);
        }
    }
    Ok(())
}

/// Parse `XMIN,XMAX,YMIN,YMAX`.
pub fn parse_bounds(text: &str) -> Result<Bounds> {
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .with_context(|| format!("invalid bounds '{}'", text))?;

    let &[x_min, x_max, y_min, y_max] = values.as_slice() else {
        bail!("bounds need four values XMIN,XMAX,YMIN,YMAX, got '{}'", text);
    };
    Ok(Bounds::new(x_min, x_max, y_min, y_max)?)
}

/// Fetch the value following a flag.
pub fn flag_value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => bail!("{} needs a value", flag),
    }
}

/// Build a `<polyline>` points attribute: "x1,y1 x2,y2 ...".
pub fn svg_points(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.4},{:.4}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render clipped polylines and polygons inside the clip window.
///
/// SVG's y axis points down, so the group is flipped to keep north up.
pub fn geometry_to_svg(bounds: &Bounds, polylines: &PolylineBatch, polygons: &[Vec<Point>]) -> String {
    let width = bounds.width();
    let height = bounds.height();
    let stroke = width.max(height) / 500.0;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" viewBox="{} {} {} {}">
<g transform="translate(0 {}) scale(1 -1)">
"#,
        bounds.x_min,
        bounds.y_min,
        width,
        height,
        bounds.y_min + bounds.y_max,
    ));

    svg.push_str(&format!(
        "<g id=\"polygons\" stroke=\"#1f77b4\" stroke-width=\"{}\" fill=\"#1f77b4\" fill-opacity=\"0.25\">\n",
        stroke
    ));
    for ring in polygons.iter().filter(|ring| ring.len() >= 3) {
        svg.push_str(&format!("  <polygon points=\"{}\"/>\n", svg_points(ring)));
    }
    svg.push_str("</g>\n");

    svg.push_str(&format!(
        "<g id=\"polylines\" stroke=\"black\" stroke-width=\"{}\" fill=\"none\" stroke-linecap=\"round\">\n",
        stroke
    ));
    for line in polylines.polylines() {
        svg.push_str(&format!("  <polyline points=\"{}\"/>\n", svg_points(line)));
    }
    svg.push_str("</g>\n</g>\n</svg>\n");
    svg
}

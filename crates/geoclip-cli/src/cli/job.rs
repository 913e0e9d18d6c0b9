//! Job files: a clip run described in YAML.
//!
//! ```yaml
//! name: downtown
//! input: roads.json
//! output: downtown.svg
//! bounds: { x_min: -122.45, x_max: -122.38, y_min: 37.76, y_max: 37.81 }
//! resolution: 0.0001
//! format: svg
//! lonlat: true
//! ```
//!
//! Relative `input`/`output` paths are resolved against the job file's
//! directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use geoclip::{Bounds, ClipOptions};

use super::clip::{ClipRequest, execute};
use super::common::{OutputFormat, Precision, read_input};

/// A complete clip job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Job name (for log output)
    pub name: String,

    /// Input geometry JSON
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Clip window
    pub bounds: Bounds,

    /// Polyline thinning distance
    #[serde(default)]
    pub resolution: f64,

    /// Trim zero-area spikes from clipped polygons
    #[serde(default = "default_discard_degenerates")]
    pub discard_degenerates: bool,

    #[serde(default)]
    pub precision: Precision,

    #[serde(default)]
    pub format: OutputFormat,

    /// Require the window to lie on the globe
    #[serde(default)]
    pub lonlat: bool,

    /// Print output sizes instead of geometry
    #[serde(default)]
    pub count_only: bool,
}

fn default_discard_degenerates() -> bool {
    true
}

impl Job {
    /// Load a job from a YAML file, resolving relative paths.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let mut job = Self::parse(&content).with_context(|| format!("invalid job file {}", path.display()))?;

        if let Some(dir) = path.parent() {
            job.input = resolve(dir, &job.input);
            job.output = job.output.map(|out| resolve(dir, &out));
        }
        Ok(job)
    }

    /// Parse a job from YAML text without touching the filesystem.
    pub fn parse(content: &str) -> Result<Self> {
        let job: Job = serde_yaml::from_str(content).context("failed to parse YAML")?;
        if !job.resolution.is_finite() || job.resolution < 0.0 {
            bail!("resolution must be a non-negative number, got {}", job.resolution);
        }
        Ok(job)
    }

    pub fn options(&self) -> ClipOptions {
        let options = ClipOptions::default()
            .with_resolution(self.resolution)
            .with_discard_degenerates(self.discard_degenerates);
        if self.lonlat { options.lon_lat() } else { options }
    }

    pub fn request(&self) -> ClipRequest {
        ClipRequest {
            bounds: self.bounds,
            options: self.options(),
            precision: self.precision,
        }
    }

    /// Run the job end to end.
    pub fn run(&self) -> Result<()> {
        tracing::info!(job = %self.name, input = %self.input.display(), "running job");

        let input_path = self.input.to_string_lossy();
        let input = read_input(&input_path)?;
        let output_path = self.output.as_ref().map(|p| p.to_string_lossy().into_owned());

        execute(&input, &self.request(), self.format, self.count_only, output_path.as_deref())
            .with_context(|| format!("job '{}' failed", self.name))
    }
}

/// `-` stays stdin/stdout; absolute paths are kept as is.
fn resolve(dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || path.as_os_str() == "-" {
        path.to_path_buf()
    } else {
        dir.join(path)
    }
}

/// Execute the run command.
pub fn cmd_run(args: &[String]) -> Result<()> {
    let mut job_paths: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(());
            }
            "--example" => {
                print_example();
                return Ok(());
            }
            "-v" | "--verbose" => {}
            path if !path.starts_with('-') => job_paths.push(path),
            unknown => bail!("unknown option: {}", unknown),
        }
        i += 1;
    }

    if job_paths.is_empty() {
        print_usage();
        bail!("job file required");
    }

    for path in job_paths {
        Job::load(path)?.run()?;
    }
    Ok(())
}

fn print_usage() {
    eprintln!("Usage: geoclip run <job.yaml> [more.yaml ...]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --example    Print an example job file");
}

fn print_example() {
    println!(
        r#"name: example
input: input.json
output: clipped.json
bounds:
  x_min: 0
  x_max: 10
  y_min: 0
  y_max: 10
resolution: 0
discard_degenerates: true
precision: f64
format: json
lonlat: false
count_only: false"#
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_job_gets_defaults() {
        let job = Job::parse(
            "name: minimal\ninput: in.json\nbounds: { x_min: 0, x_max: 10, y_min: 0, y_max: 10 }\n",
        )
        .unwrap();
        assert_eq!(job.resolution, 0.0);
        assert!(job.discard_degenerates);
        assert_eq!(job.precision, Precision::F64);
        assert_eq!(job.format, OutputFormat::Json);
        assert!(!job.lonlat);
        assert!(job.output.is_none());
        assert_eq!(job.request().options, ClipOptions::default());
    }

    #[test]
    fn full_job_maps_to_options() {
        let job = Job::parse(
            r#"
name: full
input: in.json
output: out.svg
bounds: { x_min: -10, x_max: 10, y_min: -5, y_max: 5 }
resolution: 0.25
discard_degenerates: false
precision: f32
format: svg
lonlat: true
"#,
        )
        .unwrap();
        let options = job.options();
        assert_eq!(options.resolution, 0.25);
        assert!(!options.discard_degenerates);
        assert_eq!(options, ClipOptions::default().with_resolution(0.25).with_discard_degenerates(false).lon_lat());
        assert_eq!(job.precision, Precision::F32);
        assert_eq!(job.format, OutputFormat::Svg);
        assert_eq!(job.bounds, Bounds::new(-10.0, 10.0, -5.0, 5.0).unwrap());
    }

    #[test]
    fn bad_jobs_are_rejected() {
        assert!(Job::parse("name: no-bounds\ninput: in.json\n").is_err());
        assert!(
            Job::parse("name: neg\ninput: a.json\nbounds: { x_min: 0, x_max: 1, y_min: 0, y_max: 1 }\nresolution: -1\n")
                .is_err()
        );
        assert!(
            Job::parse("name: p\ninput: a.json\nbounds: { x_min: 0, x_max: 1, y_min: 0, y_max: 1 }\nprecision: f16\n")
                .is_err()
        );
    }

    #[test]
    fn relative_paths_resolve_against_job_dir() {
        let dir = Path::new("/data/jobs");
        assert_eq!(resolve(dir, Path::new("in.json")), PathBuf::from("/data/jobs/in.json"));
        assert_eq!(resolve(dir, Path::new("/abs/in.json")), PathBuf::from("/abs/in.json"));
        assert_eq!(resolve(dir, Path::new("-")), PathBuf::from("-"));
    }
}

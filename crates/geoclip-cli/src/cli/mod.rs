//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `clip` - Clip polylines and polygons from a JSON file to a window
//! - `run` - Run clip jobs described in YAML files
//! - `benchmark` - Time clipping of an input file

pub mod benchmark;
pub mod clip;
pub mod common;
pub mod job;

pub use benchmark::cmd_benchmark;
pub use clip::cmd_clip;
pub use job::cmd_run;

//! Integration tests for geoclip CLI commands.
//!
//! These tests run the actual binary and verify end-to-end behavior.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

const SAMPLE: &str = r#"{
    "polylines": [
        [[5, 5], [15, 5], [15, 8], [5, 8]],
        [[-5, -5], [5, 5], [6, 6]],
        [[20, 20], [30, 30]]
    ],
    "polygons": [
        [[-5, -5], [5, -5], [5, 5], [-5, 5]],
        [[20, 20], [30, 20], [30, 30]]
    ]
}"#;

/// Path to the geoclip binary Cargo built for this test run.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_geoclip"))
}

/// A scratch directory unique to one test.
fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("geoclip-it-{}-{}", std::process::id(), test));
    fs::create_dir_all(&dir).expect("Failed to create scratch dir");
    dir
}

fn write_sample(test: &str) -> PathBuf {
    let path = scratch_dir(test).join("input.json");
    fs::write(&path, SAMPLE).expect("Failed to write sample input");
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn clip_command_produces_json() {
    let input = write_sample("json");
    let output = run(&["clip", input.to_str().unwrap(), "--bounds", "0,10,0,10"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = stdout_json(&output);
    assert_eq!(json["polylines"]["counts"], serde_json::json!([2, 2, 3]));
    assert_eq!(json["stats"]["output_polyline_vertices"], 7);
    assert_eq!(json["stats"]["output_polygons"], 1);
    assert_eq!(json["polygons"][0]["vertices"], serde_json::json!([[0.0, 0.0], [5.0, 0.0], [5.0, 5.0], [0.0, 5.0]]));
}

#[test]
fn count_only_matches_full_output() {
    let input = write_sample("count");
    let path = input.to_str().unwrap();

    let full = stdout_json(&run(&["clip", path, "--bounds", "0,10,0,10"]));
    let counts = stdout_json(&run(&["clip", path, "--bounds", "0,10,0,10", "--count-only"]));

    assert_eq!(counts, full["stats"]);
}

#[test]
fn single_precision_gives_same_counts() {
    let input = write_sample("f32");
    let path = input.to_str().unwrap();

    let double = stdout_json(&run(&["clip", path, "--bounds", "0,10,0,10"]));
    let single = stdout_json(&run(&["clip", path, "--bounds", "0,10,0,10", "--precision", "f32"]));

    assert_eq!(single["stats"], double["stats"]);
}

#[test]
fn clip_reads_stdin_and_writes_svg_file() {
    let out = scratch_dir("svg").join("out.svg");
    let mut child = Command::new(binary_path())
        .args(["clip", "-", "--bounds", "0,10,0,10", "--format", "svg", "-o", out.to_str().unwrap()])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(SAMPLE.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let svg = fs::read_to_string(&out).expect("SVG output should exist");
    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains("viewBox=\"0 0 10 10\""));
    assert_eq!(svg.matches("<polyline ").count(), 3);
    assert_eq!(svg.matches("<polygon ").count(), 1);
}

#[test]
fn run_command_executes_yaml_job() {
    let input = write_sample("job");
    let dir = input.parent().unwrap().to_path_buf();
    let job = dir.join("job.yaml");
    fs::write(
        &job,
        "name: it\ninput: input.json\noutput: clipped.json\nbounds: { x_min: 0, x_max: 10, y_min: 0, y_max: 10 }\nresolution: 2\n",
    )
    .unwrap();

    let output = run(&["run", job.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("clipped.json")).unwrap()).unwrap();
    // (5,5) -> (6,6) is under the resolution and gets dropped.
    assert_eq!(written["polylines"]["counts"], serde_json::json!([2, 2, 2]));
}

#[test]
fn benchmark_command_runs() {
    let input = write_sample("bench");
    let output = run(&["benchmark", input.to_str().unwrap(), "--bounds", "0,10,0,10", "-n", "3"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("GEOCLIP BENCHMARK"));
    assert!(stdout.contains("Iterations: 3"));
}

#[test]
fn help_command_shows_usage() {
    let output = run(&["help"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("clip"));
    assert!(stderr.contains("--bounds"));
}

#[test]
fn invalid_input_fails_with_message() {
    let input = write_sample("errors");
    let path = input.to_str().unwrap();

    let missing_bounds = run(&["clip", path]);
    assert!(!missing_bounds.status.success());
    assert!(String::from_utf8_lossy(&missing_bounds.stderr).contains("--bounds"));

    let crossed = run(&["clip", path, "--bounds", "10,0,0,10"]);
    assert!(!crossed.status.success());
    assert!(String::from_utf8_lossy(&crossed.stderr).contains("Error:"));

    let off_globe = run(&["clip", path, "--bounds", "170,200,0,10", "--lonlat"]);
    assert!(!off_globe.status.success());

    let huge = scratch_dir("errors").join("huge.json");
    fs::write(&huge, r#"{"polylines": [[[5, 5], [1e39, 5]]]}"#).unwrap();
    let too_wide = run(&["clip", huge.to_str().unwrap(), "--bounds", "0,10,0,10", "--precision", "f32"]);
    assert!(!too_wide.status.success());
    assert!(String::from_utf8_lossy(&too_wide.stderr).contains("precision"));

    let unknown = run(&["frobnicate"]);
    assert!(!unknown.status.success());
}

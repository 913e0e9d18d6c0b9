//! geoclip - clip polylines and polygons to a rectangular window
//!
//! Usage:
//!   geoclip clip <input.json> --bounds XMIN,XMAX,YMIN,YMAX   Clip geometry
//!   geoclip run <job.yaml>                                   Run a YAML job
//!   geoclip benchmark <input.json> --bounds ...              Time clipping

use std::env;

use tracing_subscriber::EnvFilter;

mod cli;

use cli::{cmd_benchmark, cmd_clip, cmd_run};

fn main() {
    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("geoclip");

    let verbose = args.iter().skip(1).any(|a| a == "-v" || a == "--verbose");
    init_logging(verbose);

    let Some(command) = args.get(1) else {
        print_usage(prog);
        std::process::exit(1);
    };

    let result = match command.as_str() {
        "clip" => cmd_clip(&args[2..]),
        "run" => cmd_run(&args[2..]),
        "benchmark" => cmd_benchmark(&args[2..]),
        "help" | "--help" | "-h" => {
            print_usage(prog);
            return;
        }
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!();
            print_usage(prog);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `GEOCLIP_LOG` wins over `RUST_LOG`; otherwise warnings
/// only, or debug with `-v`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("GEOCLIP_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_usage(prog: &str) {
    eprintln!("geoclip - clip polylines and polygons to a rectangular window");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  {} clip <input.json> --bounds XMIN,XMAX,YMIN,YMAX [options]", prog);
    eprintln!("  {} run <job.yaml> [more.yaml ...]", prog);
    eprintln!("  {} benchmark <input.json> --bounds XMIN,XMAX,YMIN,YMAX [-n <iterations>]", prog);
    eprintln!("  {} help", prog);
    eprintln!();
    eprintln!("Clip options:");
    eprintln!("  -b, --bounds <x0,x1,y0,y1>  Clip window (required)");
    eprintln!("  -r, --resolution <n>        Polyline thinning distance (default: 0)");
    eprintln!("  --keep-degenerates          Keep zero-area spikes in clipped polygons");
    eprintln!("  --precision <f32|f64>       Coordinate precision (default: f64)");
    eprintln!("  --lonlat                    Require the window to lie in [-180,180] x [-90,90]");
    eprintln!("  --count-only                Print output sizes instead of geometry");
    eprintln!("  -f, --format <json|svg>     Output format (default: json)");
    eprintln!("  -o, --output <file>         Output file (- for stdout, default: stdout)");
    eprintln!("  -v, --verbose               Debug logging (GEOCLIP_LOG / RUST_LOG override)");
    eprintln!();
    eprintln!("Stdin support:");
    eprintln!("  Use '-' as input file to read JSON from stdin:");
    eprintln!("  echo '{{\"polylines\": [[[0,0],[20,20]]]}}' | {} clip - --bounds 0,10,0,10", prog);
}

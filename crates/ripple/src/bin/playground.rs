//! Scalar-wave playground: evolve a plane wave on `[-10, 10]^3` and
//! compare against the exact solution.
//!
//! Usage:
//!   cargo run --release --bin ripple-playground -- 64
//!   cargo run --release --bin ripple-playground -- 64 --output-dir out/
//!
//! Prints one centre-point line per iteration to stdout and writes a 2D
//! slice every 10 iterations. Set `RUST_LOG=info` for setup and timing.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use ripple::engine::{DiagnosticsConfig, Simulation, SimulationConfig, NGHOSTS};

#[derive(Parser, Debug)]
#[command(name = "ripple-playground")]
#[command(about = "Plane-wave test of the 3D scalar-wave solver")]
struct Args {
    /// Interior grid points per axis (Nx = Ny = Nz)
    n: usize,

    /// Directory for the 2D output files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of worker threads (default: all cores)
    #[arg(short = 't', long)]
    threads: Option<usize>,
}

fn usage() -> ! {
    eprintln!("Error: Expected one command-line argument: ripple-playground [Nx(=Ny=Nz)],");
    eprintln!("where Nx is the number of grid points in the x,y, and z directions.");
    eprintln!("Nx MUST BE larger than NGHOSTS (= {NGHOSTS})");
    process::exit(1);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    if args.n < NGHOSTS {
        usage();
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    let config = SimulationConfig {
        diagnostics: Some(DiagnosticsConfig {
            output_dir: args.output_dir,
            ..DiagnosticsConfig::default()
        }),
        ..SimulationConfig::with_resolution(args.n)
    };
    let mut sim = Simulation::new(config)?;
    let report = sim.run()?;
    log::info!(
        "final centre relative error {:e} after {} iterations",
        report.center_relative_error,
        report.iterations
    );
    Ok(())
}

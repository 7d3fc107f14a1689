//! Benchmark profiles for the Ripple wave engine.
//!
//! - [`reference_config`]: the playground run at a given resolution
//! - [`seeded_state`]: a plane-wave state ready for RHS or boundary timing

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use ripple_core::{WaveParams, NUM_EVOLVED_FIELDS};
use ripple_engine::SimulationConfig;
use ripple_grid::{GridFunctions, GridGeometry};
use ripple_propagators::PlaneWave;

/// Resolutions swept by the benchmarks.
pub const RESOLUTIONS: [usize; 3] = [16, 32, 64];

/// Playground configuration at `n` points per axis with diagnostics off.
pub fn reference_config(n: usize) -> SimulationConfig {
    SimulationConfig::with_resolution(n)
}

/// Geometry and a state seeded with the default plane wave at `t = 0`.
pub fn seeded_state(n: usize) -> (GridGeometry, GridFunctions) {
    let config = reference_config(n);
    let geometry = config.geometry().unwrap();
    let mut gfs = GridFunctions::try_new(*geometry.layout(), NUM_EVOLVED_FIELDS).unwrap();
    PlaneWave::new(WaveParams::default())
        .seed_all_points(&geometry, &mut gfs, 0.0)
        .unwrap();
    (geometry, gfs)
}

//! Reference operators for the Ripple scalar-wave engine.
//!
//! # Per-stage pipeline
//!
//! 1. [`ScalarWaveRhs`]: 4th-order centred Laplacian, `d(uu)/dt = vv`,
//!    `d(vv)/dt = c^2 Lap(uu)` at every interior point.
//! 2. [`QuadraticExtrapolation`]: fills all ghost zones from the interior.
//!
//! [`PlaneWave`] is the closed-form solution used for seeding and error
//! measurement; [`PlaneWaveInitialData`] is the interior-only initial-data
//! hook with its parameter check.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod extrapolation;
pub mod plane_wave;
pub mod scalar_wave;

pub use extrapolation::QuadraticExtrapolation;
pub use plane_wave::{PlaneWave, PlaneWaveInitialData, WaveState};
pub use scalar_wave::{ScalarWaveRhs, ScalarWaveRhsBuilder, LANES, STENCIL_RADIUS};

//! Ripple: a 3D scalar-wave solver using fourth-order finite differences
//! and RK4 Method-of-Lines time integration.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Ripple sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use ripple::prelude::*;
//!
//! let config = SimulationConfig {
//!     t_final: 1.0,
//!     ..SimulationConfig::with_resolution(12)
//! };
//! let mut sim = Simulation::with_sink(config, Box::new(std::io::sink())).unwrap();
//! let report = sim.run().unwrap();
//! assert_eq!(report.iterations, sim.steps());
//! assert!(report.center_relative_error < 0.1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `ripple-core` | Field IDs, wave parameters, core errors |
//! | [`grid`] | `ripple-grid` | Layout, geometry, grid functions, RK buffers |
//! | [`propagator`] | `ripple-propagator` | RHS and boundary traits, stencil check |
//! | [`propagators`] | `ripple-propagators` | Scalar-wave RHS, extrapolation, plane wave |
//! | [`engine`] | `ripple-engine` | RK4 integrator, simulation driver, diagnostics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and parameters (`ripple-core`).
pub use ripple_core as types;

/// Grid layout, geometry, and storage (`ripple-grid`).
///
/// [`grid::GridFunctions`] is the flat buffer every operator reads and
/// writes.
pub use ripple_grid as grid;

/// Operator traits (`ripple-propagator`).
///
/// [`propagator::RightHandSide`] and [`propagator::BoundaryCondition`]
/// are the extension points for other equations and boundaries.
pub use ripple_propagator as propagator;

/// Reference operators (`ripple-propagators`).
pub use ripple_propagators as propagators;

/// Integration and driver (`ripple-engine`).
pub use ripple_engine as engine;

/// Common imports for typical Ripple usage.
///
/// ```rust
/// use ripple::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use ripple_core::{FieldId, Iteration, WaveParams, NUM_EVOLVED_FIELDS, UU, VV};

    // Errors
    pub use ripple_core::{ParamError, RhsError};
    pub use ripple_grid::GridError;

    // Grid
    pub use ripple_grid::{Axis, DomainBounds, GridFunctions, GridGeometry, GridLayout};

    // Operators
    pub use ripple_propagator::{BoundaryCondition, RightHandSide};
    pub use ripple_propagators::{PlaneWave, QuadraticExtrapolation, ScalarWaveRhs};

    // Engine
    pub use ripple_engine::{
        ConfigError, DiagnosticsConfig, InitialData, MolIntegrator, RunReport, Simulation,
        SimulationConfig, SimulationError, StepError, StepMetrics,
    };
}

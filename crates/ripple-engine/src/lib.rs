//! RK4 Method-of-Lines integration for the Ripple scalar-wave engine.
//!
//! [`MolIntegrator`] owns the four RK buffers and composes a
//! [`RightHandSide`](ripple_propagator::RightHandSide) with a
//! [`BoundaryCondition`](ripple_propagator::BoundaryCondition) into one
//! timestep. [`Simulation`] wires the reference operators to a validated
//! [`SimulationConfig`], seeds the plane wave, runs the timestep loop,
//! and feeds the [`DiagnosticsWorker`] off the critical path.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod metrics;
pub mod mol;
pub mod simulation;

pub use config::{ConfigError, InitialData, SimulationConfig, NGHOSTS};
pub use diagnostics::{
    CenterSample, DiagnosticsConfig, DiagnosticsError, DiagnosticsSummary, DiagnosticsWorker,
    PlaneSample,
};
pub use metrics::{RunMetrics, StepMetrics};
pub use mol::{MolIntegrator, Stage, StepError};
pub use simulation::{RunReport, Simulation, SimulationError};

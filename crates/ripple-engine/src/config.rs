//! Simulation configuration, validation, and error types.
//!
//! [`SimulationConfig`] is the input for constructing a
//! [`Simulation`](crate::Simulation). [`validate()`](SimulationConfig::validate)
//! checks every invariant before any buffer is allocated or any grid point
//! is evaluated.

use std::error::Error;
use std::fmt;

use ripple_core::{ParamError, WaveParams};
use ripple_grid::{DomainBounds, GridError, GridGeometry};
use ripple_propagator::StencilError;

use crate::diagnostics::DiagnosticsConfig;

/// Ghost width required by the 4th-order stencil.
pub const NGHOSTS: usize = 2;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating or applying a configuration.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Wave parameters failed validation.
    Param(ParamError),
    /// Grid construction or allocation failed.
    Grid(GridError),
    /// The RHS stencil does not fit the grid.
    Stencil(StencilError),
    /// An axis has fewer interior points than the ghost width.
    ResolutionTooSmall {
        /// Axis index (0 = x).
        axis: usize,
        /// Configured interior count.
        interior: usize,
        /// Smallest accepted count.
        minimum: usize,
    },
    /// CFL factor is NaN, infinite, zero, or negative.
    InvalidCfl {
        /// The invalid value.
        value: f64,
    },
    /// Timestep is NaN, infinite, zero, or negative.
    InvalidTimestep {
        /// The invalid value.
        value: f64,
    },
    /// Final time is NaN, infinite, or negative.
    InvalidFinalTime {
        /// The invalid value.
        value: f64,
    },
    /// The RHS evaluator could not be built.
    InvalidRhs {
        /// Builder message.
        reason: String,
    },
    /// A diagnostics cadence or capacity is zero.
    InvalidCadence {
        /// Name of the offending setting.
        name: &'static str,
    },
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Param(e) => write!(f, "parameters: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Stencil(e) => write!(f, "stencil: {e}"),
            Self::ResolutionTooSmall {
                axis,
                interior,
                minimum,
            } => write!(
                f,
                "axis {axis} has {interior} interior points, need at least {minimum}"
            ),
            Self::InvalidCfl { value } => {
                write!(f, "cfl_factor must be finite and > 0, got {value}")
            }
            Self::InvalidTimestep { value } => {
                write!(f, "dt must be finite and > 0, got {value}")
            }
            Self::InvalidFinalTime { value } => {
                write!(f, "t_final must be finite and >= 0, got {value}")
            }
            Self::InvalidRhs { reason } => write!(f, "rhs: {reason}"),
            Self::InvalidCadence { name } => write!(f, "{name} must be at least 1"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Param(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Stencil(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParamError> for ConfigError {
    fn from(e: ParamError) -> Self {
        Self::Param(e)
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<StencilError> for ConfigError {
    fn from(e: StencilError) -> Self {
        Self::Stencil(e)
    }
}

// ── InitialData ────────────────────────────────────────────────────

/// How the state is seeded at `t = 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialData {
    /// Exact solution at every point, ghosts included.
    #[default]
    AllPoints,
    /// Exact solution at interior points, then one boundary pass fills
    /// the ghosts.
    InteriorThenBoundary,
}

// ── SimulationConfig ───────────────────────────────────────────────

/// Complete configuration for a plane-wave run.
///
/// `Default` reproduces the standalone playground: 64 points per axis on
/// `[-10, 10]^3`, wavespeed 1, `kk = (1, 1, 1)`, CFL factor 0.5 and
/// `t_final = 0.8 * xmax = 8`.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Interior points per axis.
    pub resolution: [usize; 3],
    /// Physical domain.
    pub bounds: DomainBounds,
    /// Wave propagation speed. Must be finite and > 0.
    pub wavespeed: f64,
    /// Propagation direction. Must be finite and not all zero.
    pub wavevector: [f64; 3],
    /// `dt = cfl_factor * min(dx, dy, dz) / wavespeed`. Default: 0.5.
    pub cfl_factor: f64,
    /// Final time. The run takes `floor(t_final / dt + 0.5)` steps.
    pub t_final: f64,
    /// Seeding strategy. Default: [`InitialData::AllPoints`].
    pub initial_data: InitialData,
    /// Whether the RHS uses batched rows. Default: true.
    pub vectorized: bool,
    /// Diagnostics output; `None` disables the worker.
    pub diagnostics: Option<DiagnosticsConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let bounds = DomainBounds::default();
        Self {
            resolution: [64; 3],
            bounds,
            wavespeed: 1.0,
            wavevector: [1.0, 1.0, 1.0],
            cfl_factor: 0.5,
            t_final: bounds.max[0] * 0.8,
            initial_data: InitialData::AllPoints,
            vectorized: true,
            diagnostics: None,
        }
    }
}

impl SimulationConfig {
    /// The default configuration with `n` interior points on every axis.
    pub fn with_resolution(n: usize) -> Self {
        Self {
            resolution: [n; 3],
            ..Self::default()
        }
    }

    /// Validated wave parameters.
    pub fn params(&self) -> Result<WaveParams, ConfigError> {
        Ok(WaveParams::new(self.wavespeed, self.wavevector)?)
    }

    /// Build the grid geometry.
    pub fn geometry(&self) -> Result<GridGeometry, ConfigError> {
        Ok(GridGeometry::new(self.bounds, self.resolution, NGHOSTS)?)
    }

    /// Timestep for `geometry`.
    pub fn dt(&self, geometry: &GridGeometry) -> f64 {
        self.cfl_factor * geometry.min_spacing() / self.wavespeed
    }

    /// Number of steps needed to reach `t_final` with timestep `dt`.
    pub fn steps_for(&self, dt: f64) -> u64 {
        (self.t_final / dt + 0.5) as u64
    }

    /// Validate all invariants.
    ///
    /// Pure: allocates nothing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Physical parameters.
        self.params()?;
        // 2. Domain and resolution.
        self.bounds.validate()?;
        for (axis, &n) in self.resolution.iter().enumerate() {
            if n < NGHOSTS {
                return Err(ConfigError::ResolutionTooSmall {
                    axis,
                    interior: n,
                    minimum: NGHOSTS,
                });
            }
        }
        // 3. Time stepping.
        if !(self.cfl_factor.is_finite() && self.cfl_factor > 0.0) {
            return Err(ConfigError::InvalidCfl {
                value: self.cfl_factor,
            });
        }
        if !(self.t_final.is_finite() && self.t_final >= 0.0) {
            return Err(ConfigError::InvalidFinalTime {
                value: self.t_final,
            });
        }
        // 4. Diagnostics.
        if let Some(diag) = &self.diagnostics {
            diag.validate()?;
        }
        Ok(())
    }
}

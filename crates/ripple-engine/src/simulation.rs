//! The plane-wave simulation driver.
//!
//! [`Simulation`] validates a [`SimulationConfig`], wires
//! [`ScalarWaveRhs`] and [`QuadraticExtrapolation`] into a
//! [`MolIntegrator`], seeds the exact solution at `t = 0`, and runs the
//! timestep loop:
//!
//! ```text
//! for n in 0..=Nt:
//!     sample diagnostics for iteration n
//!     step, unless n == Nt
//! ```

use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

use ripple_core::UU;
use ripple_grid::Axis;
use ripple_propagators::{PlaneWave, PlaneWaveInitialData, QuadraticExtrapolation, ScalarWaveRhs};

use crate::config::{ConfigError, InitialData, SimulationConfig};
use crate::diagnostics::{
    CenterSample, DiagnosticsError, DiagnosticsSummary, DiagnosticsWorker, PlaneSample,
};
use crate::metrics::RunMetrics;
use crate::mol::{MolIntegrator, StepError};

// ── SimulationError ───────────────────────────────────────────────

/// Errors from [`Simulation::run`].
#[derive(Debug)]
pub enum SimulationError {
    /// A timestep failed.
    Step(StepError),
    /// Diagnostics output failed.
    Diagnostics(DiagnosticsError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(e) => write!(f, "step: {e}"),
            Self::Diagnostics(e) => write!(f, "diagnostics: {e}"),
        }
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Step(e) => Some(e),
            Self::Diagnostics(e) => Some(e),
        }
    }
}

impl From<StepError> for SimulationError {
    fn from(e: StepError) -> Self {
        Self::Step(e)
    }
}

impl From<DiagnosticsError> for SimulationError {
    fn from(e: DiagnosticsError) -> Self {
        Self::Diagnostics(e)
    }
}

// ── RunReport ─────────────────────────────────────────────────────

/// Outcome of a completed [`Simulation::run`].
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Completed timesteps.
    pub iterations: u64,
    /// `iterations * dt`.
    pub final_time: f64,
    /// `|(exact - numerical) / exact|` for `uu` at the grid centre.
    pub center_relative_error: f64,
    /// Phase timings for the run, setup included.
    pub metrics: RunMetrics,
    /// What the diagnostics worker wrote, if one was configured.
    pub diagnostics: Option<DiagnosticsSummary>,
}

// ── Simulation ────────────────────────────────────────────────────

/// A configured plane-wave run.
pub struct Simulation {
    config: SimulationConfig,
    wave: PlaneWave,
    integrator: MolIntegrator,
    steps: u64,
    diagnostics: Option<DiagnosticsWorker>,
    metrics: RunMetrics,
}

impl Simulation {
    /// Build a simulation whose centre diagnostics go to stdout.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_sink(config, Box::new(io::stdout()))
    }

    /// Build a simulation whose centre diagnostics go to `sink`.
    ///
    /// Validates `config` before allocating anything, then seeds the
    /// state at `t = 0` according to [`SimulationConfig::initial_data`].
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from validation, allocation, stencil checks,
    /// or spawning the diagnostics worker.
    pub fn with_sink(
        config: SimulationConfig,
        sink: Box<dyn Write + Send>,
    ) -> Result<Self, ConfigError> {
        let setup_start = Instant::now();
        config.validate()?;

        let params = config.params()?;
        let geometry = config.geometry()?;
        let dt = config.dt(&geometry);
        let steps = config.steps_for(dt);
        let wave = PlaneWave::new(params);

        let rhs = ScalarWaveRhs::builder()
            .params(params)
            .vectorized(config.vectorized)
            .build()
            .map_err(|reason| ConfigError::InvalidRhs { reason })?;
        let mut integrator = MolIntegrator::new(
            geometry.clone(),
            Box::new(rhs),
            Box::new(QuadraticExtrapolation::new()),
            dt,
        )?;

        match config.initial_data {
            InitialData::AllPoints => {
                wave.seed_all_points(&geometry, integrator.state_mut(), 0.0)?;
            }
            InitialData::InteriorThenBoundary => {
                PlaneWaveInitialData::param_check(config.wavevector)?;
                PlaneWaveInitialData::new(params).populate(
                    &geometry,
                    integrator.state_mut(),
                    0.0,
                )?;
                integrator.apply_boundary();
            }
        }

        let diagnostics = match &config.diagnostics {
            Some(diag) => Some(DiagnosticsWorker::spawn_with_sink(
                diag.clone(),
                wave,
                sink,
            )?),
            None => None,
        };

        let [nx, ny, nz] = config.resolution;
        log::info!(
            "plane wave on {nx}x{ny}x{nz} grid: dx={:?}, dt={dt}, {steps} steps to t={}, rhs '{}'",
            geometry.dx(),
            config.t_final,
            integrator.rhs_name()
        );

        let mut metrics = RunMetrics::new();
        metrics.record("setup", setup_start.elapsed().as_micros() as u64);
        Ok(Self {
            config,
            wave,
            integrator,
            steps,
            diagnostics,
            metrics,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The exact solution being approximated.
    pub fn wave(&self) -> &PlaneWave {
        &self.wave
    }

    /// The underlying integrator.
    pub fn integrator(&self) -> &MolIntegrator {
        &self.integrator
    }

    /// Total timesteps `Nt` the run takes.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance one timestep and fold its timings into the run metrics.
    pub fn step_once(&mut self) -> Result<(), StepError> {
        let step = self.integrator.step()?;
        self.metrics.accumulate_step(step);
        Ok(())
    }

    /// Run the remaining timesteps up to `Nt`, sampling diagnostics
    /// before each step and after the last.
    ///
    /// Joins the diagnostics worker on success, so its output is
    /// complete when this returns.
    pub fn run(&mut self) -> Result<RunReport, SimulationError> {
        let start = self.integrator.iteration().0;
        for n in start..=self.steps {
            self.sample(n)?;
            if n < self.steps {
                self.step_once()?;
            }
        }

        let diagnostics = match self.diagnostics.take() {
            Some(worker) => Some(worker.finish()?),
            None => None,
        };
        let report = RunReport {
            iterations: self.integrator.iteration().0,
            final_time: self.integrator.time(),
            center_relative_error: self.center_relative_error(),
            metrics: self.metrics.clone(),
            diagnostics,
        };
        log::info!(
            "completed {} steps to t={} in {} us ({} us/step), centre relative error {:e}",
            report.iterations,
            report.final_time,
            report.metrics.phase_us(RunMetrics::STEP).unwrap_or(0),
            report.metrics.mean_step_us(),
            report.center_relative_error
        );
        for (phase, us) in report.metrics.iter() {
            log::debug!("  {phase}: {us} us");
        }
        Ok(report)
    }

    /// `|(exact - numerical) / exact|` for `uu` at the grid centre.
    pub fn center_relative_error(&self) -> f64 {
        let [ic, jc, kc] = self.integrator.geometry().layout().center();
        let x = self.integrator.geometry().point(ic, jc, kc);
        let numerical = self.integrator.state().get(UU, ic, jc, kc);
        let exact = self.wave.at(x, self.integrator.time()).uu;
        ((exact - numerical) / exact).abs()
    }

    /// Largest `|numerical - exact|` for `uu` over interior points with
    /// every coordinate inside `[-radius, radius]`.
    pub fn max_uu_error_within(&self, radius: f64) -> f64 {
        let geometry = self.integrator.geometry();
        let layout = geometry.layout();
        let state = self.integrator.state();
        let t = self.integrator.time();
        let mut worst = 0.0_f64;
        for k in layout.interior_range(Axis::Z) {
            for j in layout.interior_range(Axis::Y) {
                for i in layout.interior_range(Axis::X) {
                    let x = geometry.point(i, j, k);
                    if x.iter().any(|c| c.abs() > radius) {
                        continue;
                    }
                    let err = (state.get(UU, i, j, k) - self.wave.at(x, t).uu).abs();
                    worst = worst.max(err);
                }
            }
        }
        worst
    }

    fn sample(&mut self, n: u64) -> Result<(), SimulationError> {
        let Some(worker) = &self.diagnostics else {
            return Ok(());
        };
        let config = worker.config();
        let mut sent = Ok(());
        if config.wants_plane(n) {
            sent = worker.submit_plane(self.plane_sample(n));
        }
        if sent.is_ok() && config.wants_center(n) {
            sent = worker.submit_center(self.center_sample());
        }
        if sent.is_err() {
            // The worker has stopped; its own error explains why.
            if let Some(worker) = self.diagnostics.take() {
                worker.finish()?;
            }
            return Err(DiagnosticsError::Disconnected.into());
        }
        Ok(())
    }

    fn center_sample(&self) -> CenterSample {
        let geometry = self.integrator.geometry();
        let [ic, jc, kc] = geometry.layout().center();
        CenterSample {
            time: self.integrator.time(),
            position: geometry.point(ic, jc, kc),
            uu: self.integrator.state().get(UU, ic, jc, kc),
        }
    }

    /// Central half of the `k = Ez / 2` plane, x outer and y inner.
    fn plane_sample(&self, n: u64) -> PlaneSample {
        let geometry = self.integrator.geometry();
        let [ex, ey, ez] = geometry.layout().extent();
        let k = (ez as f64 * 0.5) as usize;
        let central = |i: usize, e: usize| {
            let (i, e) = (i as f64, e as f64);
            i > e * 0.25 && i < e * 0.75
        };
        let state = self.integrator.state();
        let mut points = Vec::new();
        for i in (0..ex).filter(|&i| central(i, ex)) {
            for j in (0..ey).filter(|&j| central(j, ey)) {
                let [x, y, _] = geometry.point(i, j, k);
                points.push([x, y, state.get(UU, i, j, k)]);
            }
        }
        PlaneSample {
            iteration: n,
            time: self.integrator.time(),
            resolution: self.config.resolution,
            z: geometry.point(0, 0, k)[2],
            points,
        }
    }
}

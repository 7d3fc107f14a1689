//! RK4 Method-of-Lines integrator.
//!
//! One timestep runs four stages over the [`MolBuffers`] set:
//!
//! ```text
//! Stage1: k1 = RHS(y_n);   total  = k1*dt/6;  y_tmp = y_n + k1*dt/2; BC(y_tmp)
//! Stage2: k2 = RHS(y_tmp); total += k2*dt/3;  y_tmp = y_n + k2*dt/2; BC(y_tmp)
//! Stage3: k3 = RHS(y_tmp); total += k3*dt/3;  y_tmp = y_n + k3*dt;   BC(y_tmp)
//! Stage4: k4 = RHS(y_tmp); y_n = y_n + total + k4*dt/6;              BC(y_n)
//! ```
//!
//! `k_odd` receives k1 and k3, `k_even` receives k2 and k4; each is
//! overwritten in place with that stage's `y_tmp`. Pointwise updates run
//! in parallel over the flat buffers once the RHS pass has returned.
//!
//! # Failure
//!
//! An RHS error poisons the integrator: the failing step returns
//! [`StepError::RhsFailed`] and every later step returns
//! [`StepError::RunInvalid`]. There is no rollback; the buffers are left
//! as the failed stage found them.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use ripple_core::{evolved_fields, Iteration, RhsError, NUM_EVOLVED_FIELDS};
use ripple_grid::{GridFunctions, GridGeometry, MolBuffers, MolBuffersMut};
use ripple_propagator::{validate_stencil, BoundaryCondition, RightHandSide};

use crate::config::ConfigError;
use crate::metrics::StepMetrics;

// ── Stage ────────────────────────────────────────────────────────

/// Position of the integrator within a timestep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Evaluating `k1` from `y_n`.
    Stage1,
    /// Evaluating `k2` from the first `y_tmp`.
    Stage2,
    /// Evaluating `k3` from the second `y_tmp`.
    Stage3,
    /// Evaluating `k4` and advancing `y_n`.
    Stage4,
    /// The last step completed and `y_n` holds the new state.
    Committed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Stage1 => "stage 1",
            Self::Stage2 => "stage 2",
            Self::Stage3 => "stage 3",
            Self::Stage4 => "stage 4",
            Self::Committed => "committed",
        };
        f.write_str(s)
    }
}

// ── StepError ────────────────────────────────────────────────────

/// Error returned from [`MolIntegrator::step()`].
#[derive(Debug, PartialEq, Eq)]
pub enum StepError {
    /// The RHS failed; the integrator is now poisoned.
    RhsFailed {
        /// Name of the RHS evaluator.
        name: String,
        /// Stage during which it failed.
        stage: Stage,
        /// The evaluator's error.
        reason: RhsError,
    },
    /// A previous step failed; the state is no longer a valid solution.
    RunInvalid,
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RhsFailed {
                name,
                stage,
                reason,
            } => write!(f, "rhs '{name}' failed in {stage}: {reason}"),
            Self::RunInvalid => write!(f, "run invalidated by an earlier rhs failure"),
        }
    }
}

impl Error for StepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::RhsFailed { reason, .. } => Some(reason),
            Self::RunInvalid => None,
        }
    }
}

// ── MolIntegrator ────────────────────────────────────────────────

/// Owns the RK4 buffers and advances them one timestep at a time.
pub struct MolIntegrator {
    geometry: GridGeometry,
    rhs: Box<dyn RightHandSide>,
    boundary: Box<dyn BoundaryCondition>,
    buffers: MolBuffers,
    dt: f64,
    iteration: Iteration,
    stage: Stage,
    poisoned: bool,
    last_metrics: StepMetrics,
}

impl MolIntegrator {
    /// Validate the stencil against `geometry` and allocate the buffers.
    ///
    /// The state starts zeroed; seed it through
    /// [`state_mut()`](Self::state_mut).
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidTimestep`] if `dt` is not finite and > 0.
    /// - [`ConfigError::Stencil`] if the ghost width is narrower than the
    ///   RHS stencil.
    /// - [`ConfigError::Grid`] if the buffers cannot be allocated.
    pub fn new(
        geometry: GridGeometry,
        rhs: Box<dyn RightHandSide>,
        boundary: Box<dyn BoundaryCondition>,
        dt: f64,
    ) -> Result<Self, ConfigError> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(ConfigError::InvalidTimestep { value: dt });
        }
        validate_stencil(rhs.as_ref(), geometry.layout())?;
        let buffers = MolBuffers::try_new(*geometry.layout(), NUM_EVOLVED_FIELDS)?;
        let fields: Vec<String> = evolved_fields().into_iter().map(|f| f.name).collect();
        log::debug!(
            "allocated {} bytes of RK4 buffers for {fields:?}, rhs '{}' with boundary '{}'",
            buffers.memory_bytes(),
            rhs.name(),
            boundary.name()
        );
        Ok(Self {
            geometry,
            rhs,
            boundary,
            buffers,
            dt,
            iteration: Iteration::default(),
            stage: Stage::Committed,
            poisoned: false,
            last_metrics: StepMetrics::default(),
        })
    }

    /// Grid the integrator runs on.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Fixed timestep.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Number of completed steps.
    pub fn iteration(&self) -> Iteration {
        self.iteration
    }

    /// Simulation time `n * dt` of the current state.
    pub fn time(&self) -> f64 {
        self.iteration.time(self.dt)
    }

    /// Where the last step stopped: [`Stage::Committed`] after success,
    /// the failing stage after an RHS error.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether an RHS failure has invalidated the run.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Metrics from the most recent successful step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// Name of the RHS evaluator.
    pub fn rhs_name(&self) -> &str {
        self.rhs.name()
    }

    /// The current state `y_n`.
    pub fn state(&self) -> &GridFunctions {
        self.buffers.y_n()
    }

    /// The current state, mutable, for seeding initial data.
    pub fn state_mut(&mut self) -> &mut GridFunctions {
        self.buffers.y_n_mut()
    }

    /// Fill the ghost zones of `y_n` with the boundary condition.
    pub fn apply_boundary(&mut self) {
        self.boundary.apply(self.buffers.y_n_mut());
    }

    /// Advance `y_n` by one timestep.
    ///
    /// # Errors
    ///
    /// [`StepError::RhsFailed`] if the RHS reports an error (the
    /// integrator is poisoned from then on), [`StepError::RunInvalid`] if
    /// it was already poisoned.
    pub fn step(&mut self) -> Result<&StepMetrics, StepError> {
        if self.poisoned {
            return Err(StepError::RunInvalid);
        }
        let step_start = Instant::now();
        let mut metrics = StepMetrics {
            memory_bytes: self.buffers.memory_bytes(),
            ..StepMetrics::default()
        };
        let outcome = run_stages(
            self.rhs.as_ref(),
            self.boundary.as_ref(),
            &self.geometry,
            self.buffers.parts_mut(),
            self.dt,
            &mut metrics,
            &mut self.stage,
        );
        if let Err(e) = outcome {
            self.poisoned = true;
            log::error!("step {} aborted: {e}", self.iteration.next());
            return Err(e);
        }
        self.stage = Stage::Committed;
        self.iteration = self.iteration.next();
        metrics.total_us = step_start.elapsed().as_micros() as u64;
        self.last_metrics = metrics;
        Ok(&self.last_metrics)
    }
}

// ── Stage driver ─────────────────────────────────────────────────

fn timed<R>(acc: &mut u64, f: impl FnOnce() -> R) -> R {
    let start = Instant::now();
    let out = f();
    *acc += start.elapsed().as_micros() as u64;
    out
}

fn evaluate(
    rhs: &dyn RightHandSide,
    geometry: &GridGeometry,
    stage: Stage,
    input: &GridFunctions,
    output: &mut GridFunctions,
    metrics: &mut StepMetrics,
) -> Result<(), StepError> {
    timed(&mut metrics.rhs_us, || rhs.evaluate(geometry, input, output)).map_err(|reason| {
        StepError::RhsFailed {
            name: rhs.name().to_string(),
            stage,
            reason,
        }
    })
}

fn run_stages(
    rhs: &dyn RightHandSide,
    boundary: &dyn BoundaryCondition,
    geometry: &GridGeometry,
    bufs: MolBuffersMut<'_>,
    dt: f64,
    metrics: &mut StepMetrics,
    stage: &mut Stage,
) -> Result<(), StepError> {
    let MolBuffersMut {
        y_n,
        k_odd,
        k_even,
        running_total,
    } = bufs;

    // Stage 1: y_n -> k_odd
    *stage = Stage::Stage1;
    let t = Instant::now();
    evaluate(rhs, geometry, *stage, y_n, k_odd, metrics)?;
    timed(&mut metrics.update_us, || {
        update::first(y_n.as_slice(), k_odd.as_mut_slice(), running_total.as_mut_slice(), dt)
    });
    timed(&mut metrics.boundary_us, || boundary.apply(k_odd));
    metrics.stage_us.push(t.elapsed().as_micros() as u64);

    // Stage 2: k_odd -> k_even
    *stage = Stage::Stage2;
    let t = Instant::now();
    evaluate(rhs, geometry, *stage, k_odd, k_even, metrics)?;
    timed(&mut metrics.update_us, || {
        update::middle(
            y_n.as_slice(),
            k_even.as_mut_slice(),
            running_total.as_mut_slice(),
            dt,
            1.0 / 2.0,
        )
    });
    timed(&mut metrics.boundary_us, || boundary.apply(k_even));
    metrics.stage_us.push(t.elapsed().as_micros() as u64);

    // Stage 3: k_even -> k_odd
    *stage = Stage::Stage3;
    let t = Instant::now();
    evaluate(rhs, geometry, *stage, k_even, k_odd, metrics)?;
    timed(&mut metrics.update_us, || {
        update::middle(
            y_n.as_slice(),
            k_odd.as_mut_slice(),
            running_total.as_mut_slice(),
            dt,
            1.0,
        )
    });
    timed(&mut metrics.boundary_us, || boundary.apply(k_odd));
    metrics.stage_us.push(t.elapsed().as_micros() as u64);

    // Stage 4: k_odd -> k_even, then advance y_n
    *stage = Stage::Stage4;
    let t = Instant::now();
    evaluate(rhs, geometry, *stage, k_odd, k_even, metrics)?;
    timed(&mut metrics.update_us, || {
        update::last(y_n.as_mut_slice(), k_even.as_slice(), running_total.as_slice(), dt)
    });
    timed(&mut metrics.boundary_us, || boundary.apply(y_n));
    metrics.stage_us.push(t.elapsed().as_micros() as u64);

    Ok(())
}

/// Pointwise RK4 updates. Every product is evaluated as `k * dt * c`.
mod update {
    use super::*;

    /// `total = k*dt/6; k = y_n + k*dt/2`.
    pub(super) fn first(y_n: &[f64], k: &mut [f64], total: &mut [f64], dt: f64) {
        k.par_iter_mut()
            .zip(total.par_iter_mut())
            .zip(y_n.par_iter())
            .for_each(|((k, total), &y)| {
                let kv = *k;
                *total = kv * dt * (1.0 / 6.0);
                *k = y + kv * dt * (1.0 / 2.0);
            });
    }

    /// `total += k*dt/3; k = y_n + k*dt*c`.
    pub(super) fn middle(y_n: &[f64], k: &mut [f64], total: &mut [f64], dt: f64, c: f64) {
        k.par_iter_mut()
            .zip(total.par_iter_mut())
            .zip(y_n.par_iter())
            .for_each(|((k, total), &y)| {
                let kv = *k;
                *total = *total + kv * dt * (1.0 / 3.0);
                *k = y + kv * dt * c;
            });
    }

    /// `y_n = y_n + total + k*dt/6`.
    pub(super) fn last(y_n: &mut [f64], k: &[f64], total: &[f64], dt: f64) {
        y_n.par_iter_mut()
            .zip(total.par_iter())
            .zip(k.par_iter())
            .for_each(|((y, &total), &kv)| {
                *y = *y + total + kv * dt * (1.0 / 6.0);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::Ordering;

    use ripple_grid::DomainBounds;
    use ripple_test_utils::{random_fill, CountingBoundary, FailingRhs, LinearDecay, NoBoundary};

    fn geometry() -> GridGeometry {
        GridGeometry::new(DomainBounds::cube(1.0), [4, 5, 3], 2).unwrap()
    }

    fn integrator(rhs: impl RightHandSide + 'static, dt: f64) -> MolIntegrator {
        MolIntegrator::new(geometry(), Box::new(rhs), Box::new(NoBoundary), dt).unwrap()
    }

    #[test]
    fn linear_rhs_matches_rk4_amplification() {
        let decay = LinearDecay::new(-0.7);
        let dt = 0.1;
        let factor = decay.rk4_factor(dt);
        let mut mol = integrator(decay, dt);
        random_fill(mol.state_mut(), 42);
        let y0 = mol.state().clone();

        mol.step().unwrap();
        for (y, y0) in mol.state().as_slice().iter().zip(y0.as_slice()) {
            assert!((y - y0 * factor).abs() <= 1e-14, "{y} vs {}", y0 * factor);
        }

        for _ in 0..4 {
            mol.step().unwrap();
        }
        let f5 = factor.powi(5);
        for (y, y0) in mol.state().as_slice().iter().zip(y0.as_slice()) {
            assert!((y - y0 * f5).abs() <= 1e-13);
        }
        assert_eq!(mol.iteration(), Iteration(5));
        assert!((mol.time() - 0.5).abs() < 1e-15);
    }

    proptest! {
        #[test]
        fn one_step_scales_by_rk4_factor(
            lambda in -3.0f64..1.0,
            dt in 1e-3f64..0.5,
            seed in any::<u64>(),
        ) {
            let decay = LinearDecay::new(lambda);
            let factor = decay.rk4_factor(dt);
            let mut mol = integrator(decay, dt);
            random_fill(mol.state_mut(), seed);
            let y0 = mol.state().clone();

            mol.step().unwrap();
            for (y, y0) in mol.state().as_slice().iter().zip(y0.as_slice()) {
                prop_assert!((y - y0 * factor).abs() <= 1e-13, "{} vs {}", y, y0 * factor);
            }
            prop_assert!((mol.time() - dt).abs() <= 1e-15);
        }
    }

    #[test]
    fn step_applies_boundary_once_per_stage() {
        let bc = CountingBoundary::new();
        let counter = bc.counter();
        let mut mol =
            MolIntegrator::new(geometry(), Box::new(LinearDecay::new(1.0)), Box::new(bc), 0.01)
                .unwrap();
        let metrics = mol.step().unwrap();
        assert_eq!(metrics.stage_us.len(), 4);
        assert!(metrics.memory_bytes > 0);
        assert_eq!(counter.load(Ordering::Relaxed), 4);
        mol.apply_boundary();
        assert_eq!(counter.load(Ordering::Relaxed), 5);
        assert_eq!(mol.stage(), Stage::Committed);
    }

    #[test]
    fn rhs_failure_poisons_integrator() {
        // One full step (4 calls) succeeds, the 6th call fails in stage 2.
        let rhs = FailingRhs::new(5);
        let mut mol = integrator(rhs.clone(), 0.1);
        mol.step().unwrap();
        assert_eq!(rhs.calls(), 4);

        let err = mol.step().unwrap_err();
        match &err {
            StepError::RhsFailed { name, stage, .. } => {
                assert_eq!(name, "failing");
                assert_eq!(*stage, Stage::Stage2);
            }
            other => panic!("expected RhsFailed, got {other:?}"),
        }
        assert!(err.source().is_some());
        assert!(mol.is_poisoned());
        assert_eq!(mol.stage(), Stage::Stage2);
        assert_eq!(mol.iteration(), Iteration(1));

        assert_eq!(rhs.calls(), 6);

        assert_eq!(mol.step().unwrap_err(), StepError::RunInvalid);
        assert_eq!(mol.step().unwrap_err(), StepError::RunInvalid);
        // A poisoned integrator never re-enters the rhs.
        assert_eq!(rhs.calls(), 6);
    }

    #[test]
    fn invalid_timestep_rejected() {
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let result =
                MolIntegrator::new(geometry(), Box::new(LinearDecay::new(1.0)), Box::new(NoBoundary), dt);
            assert!(matches!(result, Err(ConfigError::InvalidTimestep { .. })));
        }
    }

    #[test]
    fn stencil_wider_than_ghosts_rejected() {
        let result = MolIntegrator::new(
            geometry(),
            Box::new(LinearDecay::new(1.0).with_radius(3)),
            Box::new(NoBoundary),
            0.1,
        );
        assert!(matches!(result, Err(ConfigError::Stencil(_))));
    }

    fn assert_close(got: &[f64], want: &[f64]) {
        for (g, w) in got.iter().zip(want) {
            assert!((g - w).abs() < 1e-15, "{got:?} vs {want:?}");
        }
    }

    #[test]
    fn update_kernels_follow_weights() {
        let y = [1.0, 2.0];
        let mut k = [6.0, 12.0];
        let mut total = [0.0; 2];
        update::first(&y, &mut k, &mut total, 1.0);
        assert_close(&total, &[1.0, 2.0]);
        assert_close(&k, &[4.0, 8.0]);

        let mut k = [3.0, 3.0];
        update::middle(&y, &mut k, &mut total, 1.0, 1.0);
        assert_close(&total, &[2.0, 3.0]);
        assert_close(&k, &[4.0, 5.0]);

        let mut y = [1.0, 2.0];
        update::last(&mut y, &[6.0, 6.0], &total, 1.0);
        assert_close(&y, &[4.0, 6.0]);
    }
}

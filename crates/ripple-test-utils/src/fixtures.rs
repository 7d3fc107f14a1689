//! Reusable operator fixtures.
//!
//! - [`LinearDecay`]: manufactured `dy/dt = lambda * y` at every point.
//! - [`FailingRhs`]: succeeds a fixed number of times, then fails.
//! - [`NoBoundary`]: leaves ghost zones alone.
//! - [`CountingBoundary`]: no-op that counts how often it is applied.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ripple_core::RhsError;
use ripple_grid::{GridFunctions, GridGeometry};
use ripple_propagator::{BoundaryCondition, RightHandSide};

/// `dy/dt = lambda * y`, applied independently at every point of every
/// field. RK4 on this system has the closed-form amplification factor
/// `1 + z + z^2/2 + z^3/6 + z^4/24` with `z = lambda * dt`.
pub struct LinearDecay {
    pub lambda: f64,
    pub radius: usize,
}

impl LinearDecay {
    pub fn new(lambda: f64) -> Self {
        Self { lambda, radius: 0 }
    }

    /// Declare a stencil radius without reading any neighbours.
    pub fn with_radius(mut self, radius: usize) -> Self {
        self.radius = radius;
        self
    }

    /// The exact one-step RK4 amplification factor for timestep `dt`.
    pub fn rk4_factor(&self, dt: f64) -> f64 {
        let z = self.lambda * dt;
        1.0 + z + z * z / 2.0 + z * z * z / 6.0 + z * z * z * z / 24.0
    }
}

impl RightHandSide for LinearDecay {
    fn name(&self) -> &str {
        "linear_decay"
    }

    fn stencil_radius(&self) -> usize {
        self.radius
    }

    fn evaluate(
        &self,
        _geometry: &GridGeometry,
        input: &GridFunctions,
        output: &mut GridFunctions,
    ) -> Result<(), RhsError> {
        if input.len() != output.len() {
            return Err(RhsError::ShapeMismatch {
                input_len: input.len(),
                output_len: output.len(),
            });
        }
        for (o, &y) in output.as_mut_slice().iter_mut().zip(input.as_slice()) {
            *o = self.lambda * y;
        }
        Ok(())
    }
}

/// Behaves like [`LinearDecay`] with `lambda = 0` for `succeed_count`
/// calls, then returns [`RhsError::ExecutionFailed`] on every call.
///
/// Clones share the call counter, so a test can keep one while the
/// integrator owns the other.
#[derive(Clone)]
pub struct FailingRhs {
    pub succeed_count: usize,
    call_count: Arc<AtomicUsize>,
}

impl FailingRhs {
    pub fn new(succeed_count: usize) -> Self {
        Self {
            succeed_count,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of `evaluate()` calls so far.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl RightHandSide for FailingRhs {
    fn name(&self) -> &str {
        "failing"
    }

    fn stencil_radius(&self) -> usize {
        0
    }

    fn evaluate(
        &self,
        _geometry: &GridGeometry,
        _input: &GridFunctions,
        output: &mut GridFunctions,
    ) -> Result<(), RhsError> {
        let n = self.call_count.fetch_add(1, Ordering::Relaxed);
        if n >= self.succeed_count {
            return Err(RhsError::ExecutionFailed {
                reason: format!("deliberate failure on call {n}"),
            });
        }
        output.fill(0.0);
        Ok(())
    }
}

/// Boundary condition that does nothing.
pub struct NoBoundary;

impl BoundaryCondition for NoBoundary {
    fn name(&self) -> &str {
        "none"
    }

    fn apply(&self, _gfs: &mut GridFunctions) {}
}

/// No-op boundary condition that records how many times it ran.
///
/// The counter is shared, so it can still be read after the boundary
/// has been boxed into an integrator.
#[derive(Default)]
pub struct CountingBoundary {
    applied: Arc<AtomicUsize>,
}

impl CountingBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the application counter.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.applied)
    }

    pub fn count(&self) -> usize {
        self.applied.load(Ordering::Relaxed)
    }
}

impl BoundaryCondition for CountingBoundary {
    fn name(&self) -> &str {
        "counting"
    }

    fn apply(&self, _gfs: &mut GridFunctions) {
        self.applied.fetch_add(1, Ordering::Relaxed);
    }
}

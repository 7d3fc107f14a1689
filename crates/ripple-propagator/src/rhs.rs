//! The [`RightHandSide`] trait.

use ripple_core::RhsError;
use ripple_grid::{GridFunctions, GridGeometry};

/// Spatial operator producing `d(state)/dt`.
///
/// # Contract
///
/// - `evaluate()` MUST fully overwrite `output`: every interior point
///   gets the time derivative, every ghost point gets a defined value.
///   Nothing may accumulate across calls.
/// - `evaluate()` reads `input` only at interior points and at most
///   [`stencil_radius()`](Self::stencil_radius) points beyond them.
/// - `evaluate()` returns only after the whole pass has finished, so the
///   caller may read `output` immediately.
/// - `&self`: evaluators are immutable once built; all parameters are
///   fixed at construction and the geometry is passed in per call.
///
/// # Examples
///
/// ```
/// use ripple_core::RhsError;
/// use ripple_grid::{GridFunctions, GridGeometry};
/// use ripple_propagator::RightHandSide;
///
/// /// d(y)/dt = 0 everywhere.
/// struct Frozen;
///
/// impl RightHandSide for Frozen {
///     fn name(&self) -> &str { "frozen" }
///     fn stencil_radius(&self) -> usize { 0 }
///     fn evaluate(
///         &self,
///         _geometry: &GridGeometry,
///         _input: &GridFunctions,
///         output: &mut GridFunctions,
///     ) -> Result<(), RhsError> {
///         output.fill(0.0);
///         Ok(())
///     }
/// }
///
/// assert_eq!(Frozen.name(), "frozen");
/// ```
pub trait RightHandSide: Send + Sync {
    /// Human-readable name for error reporting and metrics.
    fn name(&self) -> &str;

    /// Number of neighbours the stencil reaches along each axis.
    fn stencil_radius(&self) -> usize;

    /// Compute the time derivative of `input` into `output`.
    fn evaluate(
        &self,
        geometry: &GridGeometry,
        input: &GridFunctions,
        output: &mut GridFunctions,
    ) -> Result<(), RhsError>;
}

//! The [`BoundaryCondition`] trait.

use ripple_grid::GridFunctions;

/// Operator that fills the ghost zones of a state buffer.
///
/// Applied after every RK stage. Implementations write ghost points only
/// and must be a deterministic function of the current buffer contents:
/// applying twice in a row leaves the buffer unchanged.
pub trait BoundaryCondition: Send + Sync {
    /// Human-readable name for metrics.
    fn name(&self) -> &str;

    /// Fill every ghost point of every field in `gfs`.
    fn apply(&self, gfs: &mut GridFunctions);
}

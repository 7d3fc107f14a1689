//! Setup-time check of RHS stencils against the grid.

use std::error::Error;
use std::fmt;

use ripple_grid::GridLayout;

use crate::rhs::RightHandSide;

/// Errors from stencil validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StencilError {
    /// The ghost width cannot supply the stencil's outermost neighbours.
    GhostTooNarrow {
        /// Name of the evaluator.
        rhs: String,
        /// Ghost width of the grid.
        ghost: usize,
        /// Stencil radius of the evaluator.
        radius: usize,
    },
}

impl fmt::Display for StencilError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GhostTooNarrow { rhs, ghost, radius } => write!(
                f,
                "rhs '{rhs}' has stencil radius {radius} but the grid has ghost width {ghost}"
            ),
        }
    }
}

impl Error for StencilError {}

/// Check that `rhs` never reads outside the allocated ghost zones of
/// `layout`.
pub fn validate_stencil(rhs: &dyn RightHandSide, layout: &GridLayout) -> Result<(), StencilError> {
    let radius = rhs.stencil_radius();
    if layout.ghost() < radius {
        return Err(StencilError::GhostTooNarrow {
            rhs: rhs.name().to_string(),
            ghost: layout.ghost(),
            radius,
        });
    }
    Ok(())
}

//! Error types for grid construction and grid-function access.

use ripple_core::FieldId;
use std::fmt;

/// Errors arising from grid construction or buffer operations.
#[derive(Clone, Debug, PartialEq)]
pub enum GridError {
    /// An axis was given zero interior points.
    EmptyAxis {
        /// Axis index (0 = x, 1 = y, 2 = z).
        axis: usize,
    },
    /// Domain bounds are non-finite or not strictly increasing.
    InvalidBounds {
        /// Axis index.
        axis: usize,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// The total point count overflows `usize`.
    TooLarge,
    /// Storage for a grid-function buffer could not be obtained.
    AllocationFailed {
        /// Number of `f64` values requested.
        requested: usize,
    },
    /// Two buffers that must share a shape do not.
    ShapeMismatch {
        /// Flat length of the left-hand buffer.
        left: usize,
        /// Flat length of the right-hand buffer.
        right: usize,
    },
    /// A field id beyond the buffer's field count.
    FieldOutOfRange {
        /// The requested field.
        field: FieldId,
        /// Number of fields stored.
        nfields: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAxis { axis } => {
                write!(f, "axis {axis} must have at least one interior point")
            }
            Self::InvalidBounds { axis, min, max } => {
                write!(f, "axis {axis} bounds [{min}, {max}] must be finite with min < max")
            }
            Self::TooLarge => write!(f, "grid point count overflows usize"),
            Self::AllocationFailed { requested } => {
                write!(f, "could not allocate {requested} grid-function values")
            }
            Self::ShapeMismatch { left, right } => {
                write!(f, "buffer shape mismatch: {left} vs {right} values")
            }
            Self::FieldOutOfRange { field, nfields } => {
                write!(f, "field {field} out of range ({nfields} fields stored)")
            }
        }
    }
}

impl std::error::Error for GridError {}

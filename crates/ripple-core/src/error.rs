//! Error types shared across the Ripple workspace.
//!
//! Grid, stencil, and engine errors live next to the code that raises
//! them; this module holds the parameter and right-hand-side errors
//! that every layer needs to name.

use std::error::Error;
use std::fmt;

/// Invalid physical parameters, detected before any grid point is touched.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamError {
    /// All wavevector components are zero, so `kk / |kk|` is undefined.
    ZeroWavevector,
    /// A wavevector component is NaN or infinite.
    NonFiniteWavevector {
        /// The offending wavevector.
        wavevector: [f64; 3],
    },
    /// The wavespeed is NaN, infinite, zero, or negative.
    InvalidWavespeed {
        /// The offending value.
        value: f64,
    },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWavevector => write!(
                f,
                "kk0 == kk1 == kk2 == 0: zero wavevector cannot be normalized"
            ),
            Self::NonFiniteWavevector { wavevector } => {
                write!(f, "wavevector must be finite, got {wavevector:?}")
            }
            Self::InvalidWavespeed { value } => {
                write!(f, "wavespeed must be finite and > 0, got {value}")
            }
        }
    }
}

impl Error for ParamError {}

/// Errors reported by a right-hand-side evaluator.
///
/// The scalar-wave evaluator only fails on buffers that do not match
/// its geometry; the type lets any evaluator refuse a buffer instead of
/// writing garbage into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RhsError {
    /// The evaluator could not run.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// Input and output buffers do not describe the same grid.
    ShapeMismatch {
        /// Flat length of the input buffer.
        input_len: usize,
        /// Flat length of the output buffer.
        output_len: usize,
    },
}

impl fmt::Display for RhsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "execution failed: {reason}"),
            Self::ShapeMismatch {
                input_len,
                output_len,
            } => write!(
                f,
                "shape mismatch: input has {input_len} values, output has {output_len}"
            ),
        }
    }
}

impl Error for RhsError {}

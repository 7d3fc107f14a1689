//! Right-hand-side and boundary-condition traits for Ripple.
//!
//! Method-of-Lines integration needs two operators on a grid-function
//! buffer: a [`RightHandSide`] that maps a state to its time derivative
//! at every interior point, and a [`BoundaryCondition`] that fills the
//! ghost zones afterwards. The integrator in `ripple-engine` composes
//! them; concrete operators live in `ripple-propagators`.
//!
//! [`validate_stencil`] runs once at setup to check that the grid's
//! ghost width covers the RHS stencil.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod boundary;
pub mod rhs;
pub mod validate;

pub use boundary::BoundaryCondition;
pub use rhs::RightHandSide;
pub use validate::{validate_stencil, StencilError};

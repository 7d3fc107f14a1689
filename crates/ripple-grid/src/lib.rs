//! Grid layout, geometry, and grid-function storage for Ripple.
//!
//! A Ripple grid is a uniform, cell-vertex Cartesian box with `N` interior
//! points per axis surrounded by `G` ghost points on each side. This crate
//! owns everything that depends only on that shape:
//!
//! - [`GridLayout`]: extents, ghost width, and the affine flat index.
//! - [`GridGeometry`]: per-axis coordinate arrays and spacings.
//! - [`GridFunctions`]: one flat buffer holding every evolved field.
//! - [`MolBuffers`]: the four buffers an RK4 Method-of-Lines step needs.
//!
//! # Memory layout
//!
//! ```text
//! flat = i + Ex * (j + Ey * (k + Ez * field))      E = N + 2G per axis
//! ```
//!
//! `i` (x) is the fastest-varying index, so an x-row is contiguous.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffers;
pub mod error;
pub mod geometry;
pub mod gridfunc;
pub mod layout;

pub use buffers::{MolBuffers, MolBuffersMut};
pub use error::GridError;
pub use geometry::{DomainBounds, GridGeometry};
pub use gridfunc::GridFunctions;
pub use layout::{Axis, GridLayout};

//! Test utilities and manufactured operators for Ripple development.
//!
//! Provides fixture implementations of the operator traits
//! ([`RightHandSide`](ripple_propagator::RightHandSide),
//! [`BoundaryCondition`](ripple_propagator::BoundaryCondition)) and
//! helpers for filling grid functions with known data.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fill;
pub mod fixtures;

pub use fill::{fill_field_with, max_abs_diff, random_fill};
pub use fixtures::{CountingBoundary, FailingRhs, LinearDecay, NoBoundary};

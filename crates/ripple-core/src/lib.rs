//! Core types for the Ripple scalar-wave engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Ripple workspace:
//! field identifiers, the evolved field set, the immutable wave
//! parameters, and the error types shared across crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod params;

pub use error::{ParamError, RhsError};
pub use field::{evolved_fields, FieldDef, FieldRole, NUM_EVOLVED_FIELDS, UU, VV};
pub use id::{FieldId, Iteration};
pub use params::{check_wavevector, WaveParams};

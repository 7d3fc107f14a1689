//! The evolved field set.

use crate::id::FieldId;

/// Displacement `uu`.
pub const UU: FieldId = FieldId(0);
/// Velocity `vv = d(uu)/dt`.
pub const VV: FieldId = FieldId(1);

/// Number of evolved grid functions stored in every timestep buffer.
pub const NUM_EVOLVED_FIELDS: usize = 2;

/// What an evolved field represents in the first-order system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRole {
    /// The wave amplitude.
    Displacement,
    /// The time derivative of the amplitude.
    Velocity,
}

/// Definition of an evolved grid function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    /// Human-readable name for diagnostics.
    pub name: String,
    /// Role in the first-order system.
    pub role: FieldRole,
}

/// Returns the evolved field definitions in slot order.
///
/// `evolved_fields()[n]` describes `FieldId(n)`.
pub fn evolved_fields() -> Vec<FieldDef> {
    vec![
        FieldDef {
            name: "uu".to_string(),
            role: FieldRole::Displacement,
        },
        FieldDef {
            name: "vv".to_string(),
            role: FieldRole::Velocity,
        },
    ]
}

//! Strongly-typed identifiers.

use std::fmt;

/// Identifies an evolved grid function.
///
/// `FieldId(n)` is the n-th field of the evolved set and doubles as the
/// field's slot in every flat grid-function buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u32);

impl FieldId {
    /// The field's slot as a buffer offset multiplier.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for FieldId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing timestep counter.
///
/// Iteration `n` corresponds to simulation time `n * dt`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iteration(pub u64);

impl Iteration {
    /// The iteration that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Simulation time at this iteration for a fixed timestep `dt`.
    pub fn time(self, dt: f64) -> f64 {
        (self.0 as f64) * dt
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Iteration {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_id_index_matches_slot() {
        assert_eq!(FieldId(0).index(), 0);
        assert_eq!(FieldId::from(3).index(), 3);
    }

    #[test]
    fn iteration_time_is_n_dt() {
        let it = Iteration(4);
        assert_eq!(it.time(0.25), 1.0);
        assert_eq!(it.next(), Iteration(5));
        assert_eq!(Iteration::default().time(0.1), 0.0);
    }
}

//! The buffer set for one RK4 Method-of-Lines integration.
//!
//! Four same-shaped [`GridFunctions`] buffers:
//!
//! ```text
//! y_n            current state, advanced in place at the end of each step
//! k_odd          stage 1 and 3 RHS output, then that stage's y_tmp
//! k_even         stage 2 and 4 RHS output, then that stage's y_tmp
//! running_total  accumulated (dt/6) k1 + (dt/3) k2 + (dt/3) k3
//! ```
//!
//! `k_odd` and `k_even` alternate roles stage to stage: the buffer the
//! previous stage wrote its `y_tmp` into is the next stage's RHS input,
//! and the other buffer receives the next RHS.

use crate::error::GridError;
use crate::gridfunc::GridFunctions;
use crate::layout::GridLayout;

/// Owned RK4 buffer set.
#[derive(Clone, Debug)]
pub struct MolBuffers {
    y_n: GridFunctions,
    k_odd: GridFunctions,
    k_even: GridFunctions,
    running_total: GridFunctions,
}

/// Simultaneous mutable access to every buffer in a [`MolBuffers`].
pub struct MolBuffersMut<'a> {
    /// Current state.
    pub y_n: &'a mut GridFunctions,
    /// Odd-stage scratch.
    pub k_odd: &'a mut GridFunctions,
    /// Even-stage scratch.
    pub k_even: &'a mut GridFunctions,
    /// Running-total accumulator.
    pub running_total: &'a mut GridFunctions,
}

impl MolBuffers {
    /// Allocate all four buffers up front.
    ///
    /// # Errors
    ///
    /// [`GridError::AllocationFailed`] if any buffer cannot be obtained; no
    /// partially allocated set is returned.
    pub fn try_new(layout: GridLayout, nfields: usize) -> Result<Self, GridError> {
        Ok(Self {
            y_n: GridFunctions::try_new(layout, nfields)?,
            k_odd: GridFunctions::try_new(layout, nfields)?,
            k_even: GridFunctions::try_new(layout, nfields)?,
            running_total: GridFunctions::try_new(layout, nfields)?,
        })
    }

    /// The current state.
    pub fn y_n(&self) -> &GridFunctions {
        &self.y_n
    }

    /// The current state, mutable (for seeding initial data).
    pub fn y_n_mut(&mut self) -> &mut GridFunctions {
        &mut self.y_n
    }

    /// Split into independent mutable borrows of each buffer.
    pub fn parts_mut(&mut self) -> MolBuffersMut<'_> {
        MolBuffersMut {
            y_n: &mut self.y_n,
            k_odd: &mut self.k_odd,
            k_even: &mut self.k_even,
            running_total: &mut self.running_total,
        }
    }

    /// Layout shared by all four buffers.
    pub fn layout(&self) -> &GridLayout {
        self.y_n.layout()
    }

    /// Bytes of field storage across all four buffers.
    pub fn memory_bytes(&self) -> usize {
        self.y_n.memory_bytes()
            + self.k_odd.memory_bytes()
            + self.k_even.memory_bytes()
            + self.running_total.memory_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_share_shape() {
        let layout = GridLayout::new([4, 4, 4], 2).unwrap();
        let mut bufs = MolBuffers::try_new(layout, 2).unwrap();
        assert_eq!(bufs.memory_bytes(), 4 * 2 * 512 * 8);
        let parts = bufs.parts_mut();
        parts.y_n.check_same_shape(parts.k_odd).unwrap();
        parts.k_even.check_same_shape(parts.running_total).unwrap();
    }

    #[test]
    fn seeding_y_n_leaves_scratch_untouched() {
        let layout = GridLayout::new([2, 2, 2], 1).unwrap();
        let mut bufs = MolBuffers::try_new(layout, 2).unwrap();
        bufs.y_n_mut().fill(1.0);
        let parts = bufs.parts_mut();
        assert!(parts.k_odd.as_slice().iter().all(|&v| v == 0.0));
        assert!(parts.y_n.as_slice().iter().all(|&v| v == 1.0));
    }
}

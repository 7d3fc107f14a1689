//! Owned flat storage for a set of grid functions.

use ripple_core::FieldId;
use smallvec::SmallVec;

use crate::error::GridError;
use crate::layout::GridLayout;

/// Every evolved field at every grid point, in one contiguous buffer.
///
/// Field `f` occupies `f * points .. (f + 1) * points`; within a field
/// the layout's affine index applies. Buffers are allocated once, up
/// front, and mutated in place afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct GridFunctions {
    layout: GridLayout,
    nfields: usize,
    data: Vec<f64>,
}

impl GridFunctions {
    /// Allocate a zero-filled buffer for `nfields` fields on `layout`.
    ///
    /// # Errors
    ///
    /// [`GridError::TooLarge`] if the value count overflows, or
    /// [`GridError::AllocationFailed`] if the allocator refuses the request.
    pub fn try_new(layout: GridLayout, nfields: usize) -> Result<Self, GridError> {
        let len = layout
            .points()
            .checked_mul(nfields)
            .ok_or(GridError::TooLarge)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| GridError::AllocationFailed { requested: len })?;
        data.resize(len, 0.0);
        Ok(Self {
            layout,
            nfields,
            data,
        })
    }

    /// The layout shared with every other buffer on the same grid.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Number of fields stored.
    pub fn nfields(&self) -> usize {
        self.nfields
    }

    /// Total number of values (`nfields * points`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer holds no values.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes of field storage held by this buffer.
    pub fn memory_bytes(&self) -> usize {
        self.data.len() * std::mem::size_of::<f64>()
    }

    /// All fields, flat.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// All fields, flat and mutable.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    fn field_range(&self, field: FieldId) -> Option<std::ops::Range<usize>> {
        let f = field.index();
        if f >= self.nfields {
            return None;
        }
        let n = self.layout.points();
        Some(f * n..(f + 1) * n)
    }

    /// One field's values, or `None` if `field` is out of range.
    pub fn field(&self, field: FieldId) -> Option<&[f64]> {
        let range = self.field_range(field)?;
        Some(&self.data[range])
    }

    /// One field's values, mutable.
    pub fn field_mut(&mut self, field: FieldId) -> Option<&mut [f64]> {
        let range = self.field_range(field)?;
        Some(&mut self.data[range])
    }

    /// Mutable views of every field at once, in slot order.
    pub fn fields_mut(&mut self) -> SmallVec<[&mut [f64]; 2]> {
        let n = self.layout.points();
        self.data.chunks_exact_mut(n).collect()
    }

    /// Read one value.
    ///
    /// Panics if `field` is out of range; indices are checked in debug builds.
    #[inline]
    pub fn get(&self, field: FieldId, i: usize, j: usize, k: usize) -> f64 {
        debug_assert!(field.index() < self.nfields, "field {field} out of range");
        self.data[field.index() * self.layout.points() + self.layout.index(i, j, k)]
    }

    /// Write one value.
    ///
    /// Panics if `field` is out of range; indices are checked in debug builds.
    #[inline]
    pub fn set(&mut self, field: FieldId, i: usize, j: usize, k: usize, value: f64) {
        debug_assert!(field.index() < self.nfields, "field {field} out of range");
        let idx = field.index() * self.layout.points() + self.layout.index(i, j, k);
        self.data[idx] = value;
    }

    /// Set every value to `value`.
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value);
    }

    /// Overwrite this buffer with `other`.
    ///
    /// # Errors
    ///
    /// [`GridError::ShapeMismatch`] if the buffers differ in layout or field count.
    pub fn copy_from(&mut self, other: &GridFunctions) -> Result<(), GridError> {
        self.check_same_shape(other)?;
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Check that `other` has the same layout and field count.
    pub fn check_same_shape(&self, other: &GridFunctions) -> Result<(), GridError> {
        if self.layout != other.layout || self.nfields != other.nfields {
            return Err(GridError::ShapeMismatch {
                left: self.data.len(),
                right: other.data.len(),
            });
        }
        Ok(())
    }
}

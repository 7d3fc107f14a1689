//! Grid extents, ghost width, and the affine flat index.

use std::ops::Range;

use crate::error::GridError;

/// A Cartesian axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Index `i`, contiguous in memory.
    X,
    /// Index `j`.
    Y,
    /// Index `k`.
    Z,
}

impl Axis {
    /// All three axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in `[x, y, z]` arrays.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Shape of a ghosted grid and the index arithmetic over it.
///
/// Fixed at construction: interior counts `N`, ghost width `G`, and the
/// derived extents `E = N + 2G` and strides. Every grid-function buffer
/// built from the same layout shares this indexing.
///
/// # Examples
///
/// ```
/// use ripple_grid::{Axis, GridLayout};
///
/// let layout = GridLayout::new([4, 5, 6], 2).unwrap();
/// assert_eq!(layout.extent(), [8, 9, 10]);
/// assert_eq!(layout.points(), 8 * 9 * 10);
/// assert_eq!(layout.index(1, 0, 0), 1);
/// assert_eq!(layout.index(0, 1, 0), 8);
/// assert_eq!(layout.stride(Axis::Z), 8 * 9);
/// assert_eq!(layout.interior_range(Axis::X), 2..6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    interior: [usize; 3],
    ghost: usize,
    extent: [usize; 3],
    strides: [usize; 3],
    points: usize,
}

impl GridLayout {
    /// Build a layout with `interior[a]` points per axis and `ghost`
    /// ghost points on each side.
    ///
    /// # Errors
    ///
    /// - [`GridError::EmptyAxis`] if any interior count is zero.
    /// - [`GridError::TooLarge`] if the point count overflows `usize`.
    pub fn new(interior: [usize; 3], ghost: usize) -> Result<Self, GridError> {
        let mut extent = [0usize; 3];
        for (axis, &n) in interior.iter().enumerate() {
            if n == 0 {
                return Err(GridError::EmptyAxis { axis });
            }
            extent[axis] = ghost
                .checked_mul(2)
                .and_then(|g2| n.checked_add(g2))
                .ok_or(GridError::TooLarge)?;
        }
        let plane = extent[0]
            .checked_mul(extent[1])
            .ok_or(GridError::TooLarge)?;
        let points = plane.checked_mul(extent[2]).ok_or(GridError::TooLarge)?;
        Ok(Self {
            interior,
            ghost,
            extent,
            strides: [1, extent[0], plane],
            points,
        })
    }

    /// Interior point counts `[Nx, Ny, Nz]`.
    pub fn interior(&self) -> [usize; 3] {
        self.interior
    }

    /// Ghost width `G` on every face.
    pub fn ghost(&self) -> usize {
        self.ghost
    }

    /// Total extents `[Nx+2G, Ny+2G, Nz+2G]`.
    pub fn extent(&self) -> [usize; 3] {
        self.extent
    }

    /// Number of points in one field (ghosts included).
    pub fn points(&self) -> usize {
        self.points
    }

    /// Number of points in one constant-`k` plane.
    pub fn plane_len(&self) -> usize {
        self.strides[2]
    }

    /// Flat distance between neighbours along `axis`.
    pub fn stride(&self, axis: Axis) -> usize {
        self.strides[axis.index()]
    }

    /// Index range `G..N+G` of interior points along `axis`.
    pub fn interior_range(&self, axis: Axis) -> Range<usize> {
        let a = axis.index();
        self.ghost..self.ghost + self.interior[a]
    }

    /// Whether `(i, j, k)` is an interior (non-ghost) point.
    pub fn is_interior(&self, i: usize, j: usize, k: usize) -> bool {
        self.interior_range(Axis::X).contains(&i)
            && self.interior_range(Axis::Y).contains(&j)
            && self.interior_range(Axis::Z).contains(&k)
    }

    /// Flat offset of `(i, j, k)` within one field.
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        debug_assert!(
            i < self.extent[0] && j < self.extent[1] && k < self.extent[2],
            "({i}, {j}, {k}) outside extent {:?}",
            self.extent
        );
        i + self.strides[1] * j + self.strides[2] * k
    }

    /// Inverse of [`index`](Self::index).
    pub fn coords_of(&self, flat: usize) -> (usize, usize, usize) {
        debug_assert!(flat < self.points);
        let i = flat % self.extent[0];
        let j = (flat / self.strides[1]) % self.extent[1];
        let k = flat / self.strides[2];
        (i, j, k)
    }

    /// Index of the grid centre, `E / 2` per axis.
    pub fn center(&self) -> [usize; 3] {
        [self.extent[0] / 2, self.extent[1] / 2, self.extent[2] / 2]
    }
}

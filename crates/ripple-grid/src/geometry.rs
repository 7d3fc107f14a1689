//! Per-axis coordinates and spacings.

use crate::error::GridError;
use crate::layout::{Axis, GridLayout};

/// Physical extent of the computational domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainBounds {
    /// Lower bound per axis.
    pub min: [f64; 3],
    /// Upper bound per axis.
    pub max: [f64; 3],
}

impl DomainBounds {
    /// The cube `[-half_width, half_width]^3`.
    pub fn cube(half_width: f64) -> Self {
        Self {
            min: [-half_width; 3],
            max: [half_width; 3],
        }
    }

    /// Check that every axis is finite and strictly increasing.
    pub fn validate(&self) -> Result<(), GridError> {
        for axis in 0..3 {
            let (min, max) = (self.min[axis], self.max[axis]);
            if !(min.is_finite() && max.is_finite() && min < max) {
                return Err(GridError::InvalidBounds { axis, min, max });
            }
        }
        Ok(())
    }
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self::cube(10.0)
    }
}

/// Coordinate arrays and spacings of a uniform grid.
///
/// Along each axis `x[i] = xmin + (i - G) * dx` with
/// `dx = (xmax - xmin) / N`, for `i` in `0..N+2G`. Ghost coordinates lie
/// outside `[xmin, xmax)`.
///
/// # Examples
///
/// ```
/// use ripple_grid::{Axis, DomainBounds, GridGeometry};
///
/// let geom = GridGeometry::new(DomainBounds::cube(10.0), [64, 64, 64], 2).unwrap();
/// assert_eq!(geom.dx()[0], 20.0 / 64.0);
/// assert_eq!(geom.coords(Axis::X)[2], -10.0);
/// assert_eq!(geom.coords(Axis::X).len(), 68);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GridGeometry {
    layout: GridLayout,
    bounds: DomainBounds,
    dx: [f64; 3],
    inv_dx: [f64; 3],
    coords: [Vec<f64>; 3],
}

impl GridGeometry {
    /// Build the geometry for `interior` points per axis and ghost width
    /// `ghost` over `bounds`.
    pub fn new(bounds: DomainBounds, interior: [usize; 3], ghost: usize) -> Result<Self, GridError> {
        bounds.validate()?;
        let layout = GridLayout::new(interior, ghost)?;
        Ok(Self::from_layout(bounds, layout))
    }

    fn from_layout(bounds: DomainBounds, layout: GridLayout) -> Self {
        let extent = layout.extent();
        let interior = layout.interior();
        let ghost = layout.ghost() as f64;
        let mut dx = [0.0; 3];
        let mut inv_dx = [0.0; 3];
        let mut coords: [Vec<f64>; 3] = Default::default();
        for a in 0..3 {
            dx[a] = (bounds.max[a] - bounds.min[a]) / (interior[a] as f64);
            inv_dx[a] = 1.0 / dx[a];
            coords[a] = (0..extent[a])
                .map(|i| bounds.min[a] + ((i as f64) - ghost) * dx[a])
                .collect();
        }
        Self {
            layout,
            bounds,
            dx,
            inv_dx,
            coords,
        }
    }

    /// The index layout shared by every buffer on this grid.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Domain bounds the grid was built from.
    pub fn bounds(&self) -> &DomainBounds {
        &self.bounds
    }

    /// Spacings `[dx, dy, dz]`.
    pub fn dx(&self) -> [f64; 3] {
        self.dx
    }

    /// Reciprocal spacings `[1/dx, 1/dy, 1/dz]`.
    pub fn inv_dx(&self) -> [f64; 3] {
        self.inv_dx
    }

    /// `min(dx, dy, dz)`, the length scale the CFL bound uses.
    pub fn min_spacing(&self) -> f64 {
        self.dx[0].min(self.dx[1]).min(self.dx[2])
    }

    /// Coordinate array along `axis`, ghosts included.
    pub fn coords(&self, axis: Axis) -> &[f64] {
        &self.coords[axis.index()]
    }

    /// Cartesian position of grid point `(i, j, k)`.
    pub fn point(&self, i: usize, j: usize, k: usize) -> [f64; 3] {
        [self.coords[0][i], self.coords[1][j], self.coords[2][k]]
    }
}

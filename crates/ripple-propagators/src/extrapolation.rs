//! Quadratic extrapolation boundary condition.
//!
//! Every ghost point is filled from the three nearest already-known
//! points along the face normal:
//!
//! ```text
//! f[g] = 3 f[g + s] - 3 f[g + 2s] + f[g + 3s]      (s = one step inward)
//! ```
//!
//! which is the degree-2 Lagrange polynomial through those points,
//! evaluated one step further out. Exact for data quadratic in the
//! normal index.

use ripple_grid::{Axis, GridFunctions, GridLayout};
use ripple_propagator::BoundaryCondition;

/// Fills all six faces of every field by quadratic extrapolation.
///
/// Shells are filled innermost first. Within a shell the x faces are
/// filled over the current y/z ranges and the x range is widened, then
/// the y faces over the widened x range, then the z faces over the
/// widened x and y ranges. Edges and corners are therefore filled once,
/// from interior values or ghost values filled earlier in the same call.
///
/// Reads only interior points and ghost points it has already written,
/// so re-applying to an unchanged interior is a no-op.
///
/// With fewer than 3 interior points on an axis, the innermost shell
/// reads ghost values from the opposite face; the result stays in
/// bounds but is no longer an extrapolation of the interior.
///
/// # Panics
///
/// If an axis has `interior + ghost < 3`, the three-point stencil reads
/// past the far edge of the grid.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuadraticExtrapolation;

impl QuadraticExtrapolation {
    /// Create the boundary condition.
    pub fn new() -> Self {
        Self
    }

    /// Whether `layout` is large enough for the three-point stencil.
    pub fn supports(layout: &GridLayout) -> bool {
        layout
            .interior()
            .iter()
            .all(|&n| n + layout.ghost() >= 3)
    }
}

#[inline]
fn extrapolate(f: &mut [f64], at: usize, inward: isize) {
    let step = |n: isize| at.wrapping_add_signed(n * inward);
    f[at] = 3.0 * f[step(1)] - 3.0 * f[step(2)] + f[step(3)];
}

fn fill_field(layout: &GridLayout, f: &mut [f64]) {
    let g = layout.ghost();
    let n = layout.interior();
    let mut lo = [g; 3];
    let mut hi = [n[0] + g, n[1] + g, n[2] + g];
    let sx = layout.stride(Axis::X) as isize;
    let sy = layout.stride(Axis::Y) as isize;
    let sz = layout.stride(Axis::Z) as isize;

    for _shell in 0..g {
        // x faces
        let (xm, xp) = (lo[0] - 1, hi[0]);
        for k in lo[2]..hi[2] {
            for j in lo[1]..hi[1] {
                extrapolate(f, layout.index(xm, j, k), sx);
                extrapolate(f, layout.index(xp, j, k), -sx);
            }
        }
        lo[0] -= 1;
        hi[0] += 1;

        // y faces
        let (ym, yp) = (lo[1] - 1, hi[1]);
        for k in lo[2]..hi[2] {
            for i in lo[0]..hi[0] {
                extrapolate(f, layout.index(i, ym, k), sy);
                extrapolate(f, layout.index(i, yp, k), -sy);
            }
        }
        lo[1] -= 1;
        hi[1] += 1;

        // z faces
        let (zm, zp) = (lo[2] - 1, hi[2]);
        for j in lo[1]..hi[1] {
            for i in lo[0]..hi[0] {
                extrapolate(f, layout.index(i, j, zm), sz);
                extrapolate(f, layout.index(i, j, zp), -sz);
            }
        }
        lo[2] -= 1;
        hi[2] += 1;
    }
}

impl BoundaryCondition for QuadraticExtrapolation {
    fn name(&self) -> &str {
        "QuadraticExtrapolation"
    }

    fn apply(&self, gfs: &mut GridFunctions) {
        let layout = *gfs.layout();
        debug_assert!(
            Self::supports(&layout),
            "grid {:?} too small for quadratic extrapolation",
            layout.interior()
        );
        for field in gfs.fields_mut() {
            fill_field(&layout, field);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ripple_core::{UU, VV};
    use ripple_test_utils::random_fill;

    fn gfs(interior: [usize; 3]) -> GridFunctions {
        GridFunctions::try_new(GridLayout::new(interior, 2).unwrap(), 2).unwrap()
    }

    fn interior_snapshot(g: &GridFunctions) -> Vec<f64> {
        let layout = g.layout();
        let mut out = Vec::new();
        for f in [UU, VV] {
            for k in layout.interior_range(Axis::Z) {
                for j in layout.interior_range(Axis::Y) {
                    for i in layout.interior_range(Axis::X) {
                        out.push(g.get(f, i, j, k));
                    }
                }
            }
        }
        out
    }

    #[test]
    fn interior_untouched() {
        let mut g = gfs([4, 5, 6]);
        random_fill(&mut g, 1);
        let before = interior_snapshot(&g);
        QuadraticExtrapolation.apply(&mut g);
        assert_eq!(before, interior_snapshot(&g));
    }

    #[test]
    fn reapplying_is_a_no_op() {
        let mut g = gfs([5, 4, 3]);
        random_fill(&mut g, 2);
        QuadraticExtrapolation.apply(&mut g);
        let once = g.clone();
        QuadraticExtrapolation.apply(&mut g);
        assert_eq!(once, g);
    }

    #[test]
    fn every_ghost_point_is_written() {
        let mut g = gfs([3, 3, 3]);
        g.fill(f64::NAN);
        let layout = *g.layout();
        for f in [UU, VV] {
            for k in layout.interior_range(Axis::Z) {
                for j in layout.interior_range(Axis::Y) {
                    for i in layout.interior_range(Axis::X) {
                        g.set(f, i, j, k, 1.0);
                    }
                }
            }
        }
        QuadraticExtrapolation.apply(&mut g);
        assert!(g.as_slice().iter().all(|v| *v == 1.0));
    }

    #[test]
    fn single_face_matches_formula() {
        let mut g = gfs([4, 4, 4]);
        random_fill(&mut g, 9);
        QuadraticExtrapolation.apply(&mut g);
        let (j, k) = (3, 4);
        let expected = 3.0 * g.get(UU, 2, j, k) - 3.0 * g.get(UU, 3, j, k) + g.get(UU, 4, j, k);
        assert_eq!(g.get(UU, 1, j, k), expected);
        let expected = 3.0 * g.get(VV, 5, j, k) - 3.0 * g.get(VV, 4, j, k) + g.get(VV, 3, j, k);
        assert_eq!(g.get(VV, 6, j, k), expected);
    }

    #[test]
    fn supports_minimal_grids() {
        assert!(QuadraticExtrapolation::supports(
            &GridLayout::new([1, 1, 1], 2).unwrap()
        ));
        assert!(!QuadraticExtrapolation::supports(
            &GridLayout::new([1, 4, 4], 1).unwrap()
        ));
    }

    proptest! {
        #[test]
        fn quadratic_profiles_reproduced_exactly(
            n in 3usize..7,
            c in prop::array::uniform7(-3i32..4),
        ) {
            // Integer coefficients on integer indices keep every value and
            // every extrapolation step exactly representable.
            let poly = move |i: usize, j: usize, k: usize| {
                let (x, y, z) = (i as f64, j as f64, k as f64);
                c[0] as f64
                    + c[1] as f64 * x + c[2] as f64 * x * x
                    + c[3] as f64 * y + c[4] as f64 * y * y
                    + c[5] as f64 * z + c[6] as f64 * z * z
                    + x * y * z
            };
            let mut g = gfs([n, n + 1, n + 2]);
            let layout = *g.layout();
            for f in [UU, VV] {
                for k in layout.interior_range(Axis::Z) {
                    for j in layout.interior_range(Axis::Y) {
                        for i in layout.interior_range(Axis::X) {
                            g.set(f, i, j, k, poly(i, j, k));
                        }
                    }
                }
            }
            QuadraticExtrapolation.apply(&mut g);
            let [ex, ey, ez] = layout.extent();
            for k in 0..ez {
                for j in 0..ey {
                    for i in 0..ex {
                        prop_assert_eq!(g.get(UU, i, j, k), poly(i, j, k));
                        prop_assert_eq!(g.get(VV, i, j, k), poly(i, j, k));
                    }
                }
            }
        }
    }
}

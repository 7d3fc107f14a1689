//! Finite-difference right-hand side of the 3D scalar wave equation.
//!
//! First-order-in-time form with displacement `uu` and velocity `vv`:
//! ```text
//! Lap_a(uu)  = invdx_a^2 * (-5/2 uu + 4/3 (uu[+1] + uu[-1]) - 1/12 (uu[+2] + uu[-2]))
//! d(uu)/dt   = vv
//! d(vv)/dt   = c^2 * (Lap_x(uu) + Lap_y(uu) + Lap_z(uu))
//! ```
//!
//! The operation order inside each point is fixed (see [`ScalarWaveRhs`])
//! so that the batched and scalar paths produce bit-identical output.
//!
//! Constructed via the builder pattern: [`ScalarWaveRhs::builder`].

use rayon::prelude::*;
use ripple_core::{FieldId, RhsError, WaveParams, UU, VV};
use ripple_grid::{Axis, GridFunctions, GridGeometry, GridLayout};
use ripple_propagator::RightHandSide;

/// Points per batch along the contiguous x axis.
pub const LANES: usize = 4;

/// Neighbours the stencil reaches along each axis.
pub const STENCIL_RADIUS: usize = 2;

const RATIONAL_M5_2: f64 = -5.0 / 2.0;
const RATIONAL_4_3: f64 = 4.0 / 3.0;
const RATIONAL_M1_12: f64 = -1.0 / 12.0;

/// 4th-order centred scalar-wave RHS.
///
/// Per interior point, with `p1, m1, p2, m2` the `+1, -1, +2, -2`
/// neighbours of `uu` along axis `a`:
///
/// ```text
/// t0     = uu * (-5/2)
/// dDDa   = fma(p1, 4/3, fma(m2, -1/12, fma(m1, 4/3, fma(p2, -1/12, t0)))) * invdx_a^2
/// c2     = wavespeed * wavespeed
/// rhs_vv = fma(c2, dDD11, fma(c2, dDD22, c2*dDD00))
/// rhs_uu = vv
/// ```
///
/// Ghost points of the output (and any field other than `uu` and `vv`)
/// are set to `0.0`, so each call fully overwrites `output`.
///
/// Constant-`k` planes are distributed across the rayon pool. Within a
/// row, interior points are processed in [`LANES`]-wide batches with a
/// scalar tail; [`ScalarWaveRhsBuilder::vectorized`] can route every
/// point through the scalar path instead.
#[derive(Debug)]
pub struct ScalarWaveRhs {
    params: WaveParams,
    displacement_field: FieldId,
    velocity_field: FieldId,
    vectorized: bool,
}

/// Builder for [`ScalarWaveRhs`].
///
/// Required: `params`. Fields default to [`UU`] and [`VV`].
pub struct ScalarWaveRhsBuilder {
    params: Option<WaveParams>,
    displacement_field: FieldId,
    velocity_field: FieldId,
    vectorized: bool,
}

impl ScalarWaveRhs {
    /// Create a new builder.
    pub fn builder() -> ScalarWaveRhsBuilder {
        ScalarWaveRhsBuilder {
            params: None,
            displacement_field: UU,
            velocity_field: VV,
            vectorized: true,
        }
    }

    /// The parameters this evaluator was built with.
    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    /// Whether interior rows are processed in batches.
    pub fn is_vectorized(&self) -> bool {
        self.vectorized
    }
}

impl ScalarWaveRhsBuilder {
    /// Set the wave parameters (required).
    pub fn params(mut self, params: WaveParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Set the displacement field (default: [`UU`]).
    pub fn displacement_field(mut self, field: FieldId) -> Self {
        self.displacement_field = field;
        self
    }

    /// Set the velocity field (default: [`VV`]).
    pub fn velocity_field(mut self, field: FieldId) -> Self {
        self.velocity_field = field;
        self
    }

    /// Enable or disable [`LANES`]-wide batching (default: enabled).
    pub fn vectorized(mut self, enabled: bool) -> Self {
        self.vectorized = enabled;
        self
    }

    /// Build the evaluator.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `params` is not set or if the displacement and
    /// velocity fields are the same.
    pub fn build(self) -> Result<ScalarWaveRhs, String> {
        let params = self
            .params
            .ok_or_else(|| "params is required".to_string())?;
        if self.displacement_field == self.velocity_field {
            return Err(format!(
                "displacement_field and velocity_field must differ, both are {}",
                self.displacement_field
            ));
        }
        Ok(ScalarWaveRhs {
            params,
            displacement_field: self.displacement_field,
            velocity_field: self.velocity_field,
            vectorized: self.vectorized,
        })
    }
}

// ── Stencil kernel ──────────────────────────────────────────────

/// Per-call constants shared by every point.
struct Stencil {
    strides: [usize; 3],
    inv_dx2: [f64; 3],
    c2: f64,
}

impl Stencil {
    fn new(layout: &GridLayout, inv_dx: [f64; 3], wavespeed: f64) -> Self {
        Self {
            strides: [
                layout.stride(Axis::X),
                layout.stride(Axis::Y),
                layout.stride(Axis::Z),
            ],
            inv_dx2: [
                inv_dx[0] * inv_dx[0],
                inv_dx[1] * inv_dx[1],
                inv_dx[2] * inv_dx[2],
            ],
            c2: wavespeed * wavespeed,
        }
    }

    #[inline(always)]
    fn rhs_vv(&self, uu: &[f64], idx: usize) -> f64 {
        let t0 = uu[idx] * RATIONAL_M5_2;
        let mut ddd = [0.0; 3];
        for (a, d) in ddd.iter_mut().enumerate() {
            let s = self.strides[a];
            let p1 = uu[idx + s];
            let m1 = uu[idx - s];
            let p2 = uu[idx + 2 * s];
            let m2 = uu[idx - 2 * s];
            *d = fd2(p1, m1, p2, m2, t0) * self.inv_dx2[a];
        }
        combine(self.c2, ddd[0], ddd[1], ddd[2])
    }

    #[inline(always)]
    fn rhs_vv_lanes(&self, uu: &[f64], idx: usize) -> [f64; LANES] {
        let centre = lanes(uu, idx);
        let mut t0 = [0.0; LANES];
        for l in 0..LANES {
            t0[l] = centre[l] * RATIONAL_M5_2;
        }
        let mut ddd = [[0.0; LANES]; 3];
        for (a, d) in ddd.iter_mut().enumerate() {
            let s = self.strides[a];
            let p1 = lanes(uu, idx + s);
            let m1 = lanes(uu, idx - s);
            let p2 = lanes(uu, idx + 2 * s);
            let m2 = lanes(uu, idx - 2 * s);
            for l in 0..LANES {
                d[l] = fd2(p1[l], m1[l], p2[l], m2[l], t0[l]) * self.inv_dx2[a];
            }
        }
        let mut out = [0.0; LANES];
        for l in 0..LANES {
            out[l] = combine(self.c2, ddd[0][l], ddd[1][l], ddd[2][l]);
        }
        out
    }
}

/// Second-difference numerator along one axis, as nested fused
/// multiply-adds innermost first.
#[inline(always)]
fn fd2(p1: f64, m1: f64, p2: f64, m2: f64, t0: f64) -> f64 {
    p1.mul_add(
        RATIONAL_4_3,
        m2.mul_add(
            RATIONAL_M1_12,
            m1.mul_add(RATIONAL_4_3, p2.mul_add(RATIONAL_M1_12, t0)),
        ),
    )
}

/// `c2*dDD11 + (c2*dDD22 + c2*dDD00)` with both additions fused.
#[inline(always)]
fn combine(c2: f64, d00: f64, d11: f64, d22: f64) -> f64 {
    c2.mul_add(d11, c2.mul_add(d22, c2 * d00))
}

#[inline(always)]
fn lanes(src: &[f64], at: usize) -> [f64; LANES] {
    let mut v = [0.0; LANES];
    v.copy_from_slice(&src[at..at + LANES]);
    v
}

impl ScalarWaveRhs {
    /// Fill one x-row of both output fields. `base` is the flat index of
    /// `(0, j, k)` within a field.
    #[allow(clippy::too_many_arguments)]
    fn fill_row(
        &self,
        stencil: &Stencil,
        layout: &GridLayout,
        uu: &[f64],
        vv: &[f64],
        base: usize,
        out_uu: &mut [f64],
        out_vv: &mut [f64],
    ) {
        let interior = layout.interior_range(Axis::X);
        let (start, end) = (interior.start, interior.end);
        out_uu[..start].fill(0.0);
        out_vv[..start].fill(0.0);
        out_uu[end..].fill(0.0);
        out_vv[end..].fill(0.0);

        let mut i = start;
        if self.vectorized {
            while i + LANES <= end {
                let idx = base + i;
                out_uu[i..i + LANES].copy_from_slice(&vv[idx..idx + LANES]);
                out_vv[i..i + LANES].copy_from_slice(&stencil.rhs_vv_lanes(uu, idx));
                i += LANES;
            }
        }
        while i < end {
            let idx = base + i;
            out_uu[i] = vv[idx];
            out_vv[i] = stencil.rhs_vv(uu, idx);
            i += 1;
        }
    }

    fn check_shapes(
        &self,
        geometry: &GridGeometry,
        input: &GridFunctions,
        output: &GridFunctions,
    ) -> Result<(), RhsError> {
        if input.check_same_shape(output).is_err() {
            return Err(RhsError::ShapeMismatch {
                input_len: input.len(),
                output_len: output.len(),
            });
        }
        if input.layout() != geometry.layout() {
            return Err(RhsError::ExecutionFailed {
                reason: "grid functions were not allocated on this geometry".to_string(),
            });
        }
        if geometry.layout().ghost() < STENCIL_RADIUS {
            return Err(RhsError::ExecutionFailed {
                reason: format!(
                    "ghost width {} is narrower than stencil radius {STENCIL_RADIUS}",
                    geometry.layout().ghost()
                ),
            });
        }
        for field in [self.displacement_field, self.velocity_field] {
            if field.index() >= input.nfields() {
                return Err(RhsError::ExecutionFailed {
                    reason: format!(
                        "field {field} out of range ({} fields stored)",
                        input.nfields()
                    ),
                });
            }
        }
        Ok(())
    }
}

impl RightHandSide for ScalarWaveRhs {
    fn name(&self) -> &str {
        "ScalarWaveRhs"
    }

    fn stencil_radius(&self) -> usize {
        STENCIL_RADIUS
    }

    fn evaluate(
        &self,
        geometry: &GridGeometry,
        input: &GridFunctions,
        output: &mut GridFunctions,
    ) -> Result<(), RhsError> {
        self.check_shapes(geometry, input, output)?;

        let layout = *geometry.layout();
        let stencil = Stencil::new(&layout, geometry.inv_dx(), self.params.wavespeed());
        let uu = input
            .field(self.displacement_field)
            .ok_or_else(|| RhsError::ExecutionFailed {
                reason: format!("displacement field {} not readable", self.displacement_field),
            })?;
        let vv = input
            .field(self.velocity_field)
            .ok_or_else(|| RhsError::ExecutionFailed {
                reason: format!("velocity field {} not readable", self.velocity_field),
            })?;

        let mut out_uu = None;
        let mut out_vv = None;
        for (f, slice) in output.fields_mut().into_iter().enumerate() {
            if f == self.displacement_field.index() {
                out_uu = Some(slice);
            } else if f == self.velocity_field.index() {
                out_vv = Some(slice);
            } else {
                slice.fill(0.0);
            }
        }
        let (Some(out_uu), Some(out_vv)) = (out_uu, out_vv) else {
            return Err(RhsError::ExecutionFailed {
                reason: "output fields not writable".to_string(),
            });
        };

        let plane = layout.plane_len();
        let ex = layout.extent()[0];
        let y_range = layout.interior_range(Axis::Y);
        let z_range = layout.interior_range(Axis::Z);

        out_uu
            .par_chunks_mut(plane)
            .zip(out_vv.par_chunks_mut(plane))
            .enumerate()
            .for_each(|(k, (plane_uu, plane_vv))| {
                if !z_range.contains(&k) {
                    plane_uu.fill(0.0);
                    plane_vv.fill(0.0);
                    return;
                }
                for (j, (row_uu, row_vv)) in plane_uu
                    .chunks_exact_mut(ex)
                    .zip(plane_vv.chunks_exact_mut(ex))
                    .enumerate()
                {
                    if !y_range.contains(&j) {
                        row_uu.fill(0.0);
                        row_vv.fill(0.0);
                        continue;
                    }
                    let base = layout.index(0, j, k);
                    self.fill_row(&stencil, &layout, uu, vv, base, row_uu, row_vv);
                }
            });
        Ok(())
    }
}

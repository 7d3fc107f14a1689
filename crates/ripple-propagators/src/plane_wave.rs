//! Closed-form plane-wave solution and the initial-data hook built on it.

use ripple_core::{check_wavevector, FieldId, ParamError, WaveParams, NUM_EVOLVED_FIELDS, UU, VV};
use ripple_grid::{Axis, GridError, GridFunctions, GridGeometry};

/// `(uu, vv)` at one point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveState {
    /// Displacement.
    pub uu: f64,
    /// Velocity.
    pub vv: f64,
}

/// Exact solution of the scalar wave equation for a plane wave
/// travelling along `kk`:
///
/// ```text
/// phase = t * c - (kk . x) / |kk|
/// uu    = 2 - sin(phase)
/// vv    = -c * cos(phase)
/// ```
///
/// Only constructible from validated [`WaveParams`], so `|kk| > 0`.
///
/// # Examples
///
/// ```
/// use ripple_core::WaveParams;
/// use ripple_propagators::PlaneWave;
///
/// let wave = PlaneWave::new(WaveParams::default());
/// let s = wave.at([0.0, 0.0, 0.0], 0.0);
/// assert_eq!(s.uu, 2.0);
/// assert_eq!(s.vv, -1.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PlaneWave {
    params: WaveParams,
    norm: f64,
}

impl PlaneWave {
    /// Build the oracle for `params`.
    pub fn new(params: WaveParams) -> Self {
        Self {
            params,
            norm: params.wavevector_norm(),
        }
    }

    /// The parameters this solution describes.
    pub fn params(&self) -> &WaveParams {
        &self.params
    }

    /// Solution at position `x` and time `t`.
    #[inline]
    pub fn at(&self, x: [f64; 3], t: f64) -> WaveState {
        let c = self.params.wavespeed();
        let [k0, k1, k2] = self.params.wavevector();
        let phase = t * c - (k0 * x[0] + k1 * x[1] + k2 * x[2]) / self.norm;
        WaveState {
            uu: 2.0 - phase.sin(),
            vv: -c * phase.cos(),
        }
    }

    /// Write the solution at time `t` into [`UU`] and [`VV`] at every
    /// point of `gfs`, ghosts included.
    ///
    /// # Errors
    ///
    /// [`GridError::ShapeMismatch`] if `gfs` was not allocated on
    /// `geometry`, [`GridError::FieldOutOfRange`] if it stores fewer than
    /// two fields.
    pub fn seed_all_points(
        &self,
        geometry: &GridGeometry,
        gfs: &mut GridFunctions,
        t: f64,
    ) -> Result<(), GridError> {
        check_target(geometry, gfs)?;
        let [ex, ey, ez] = geometry.layout().extent();
        for k in 0..ez {
            for j in 0..ey {
                for i in 0..ex {
                    self.write_point(geometry, gfs, (i, j, k), t);
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn write_point(
        &self,
        geometry: &GridGeometry,
        gfs: &mut GridFunctions,
        (i, j, k): (usize, usize, usize),
        t: f64,
    ) {
        let s = self.at(geometry.point(i, j, k), t);
        gfs.set(UU, i, j, k, s.uu);
        gfs.set(VV, i, j, k, s.vv);
    }
}

fn check_target(geometry: &GridGeometry, gfs: &GridFunctions) -> Result<(), GridError> {
    if gfs.layout() != geometry.layout() {
        return Err(GridError::ShapeMismatch {
            left: geometry.layout().points(),
            right: gfs.layout().points(),
        });
    }
    if gfs.nfields() < NUM_EVOLVED_FIELDS {
        return Err(GridError::FieldOutOfRange {
            field: FieldId(NUM_EVOLVED_FIELDS as u32 - 1),
            nfields: gfs.nfields(),
        });
    }
    Ok(())
}

/// Plane-wave initial data as a framework-hosted hook: a parameter check
/// that runs before any point is touched, and a populate pass over the
/// interior only. Ghost zones are left for the boundary condition.
#[derive(Clone, Copy, Debug)]
pub struct PlaneWaveInitialData {
    wave: PlaneWave,
}

impl PlaneWaveInitialData {
    /// Reject a wavevector that cannot be normalized.
    ///
    /// # Errors
    ///
    /// [`ParamError::ZeroWavevector`] if `kk0 == kk1 == kk2 == 0`,
    /// [`ParamError::NonFiniteWavevector`] for NaN or infinite components.
    pub fn param_check(wavevector: [f64; 3]) -> Result<(), ParamError> {
        check_wavevector(wavevector)
    }

    /// Build the hook for validated parameters.
    pub fn new(params: WaveParams) -> Self {
        Self {
            wave: PlaneWave::new(params),
        }
    }

    /// The underlying exact solution.
    pub fn wave(&self) -> &PlaneWave {
        &self.wave
    }

    /// Fill [`UU`] and [`VV`] at every interior point with the solution
    /// at time `t`. Ghost points are not written.
    ///
    /// # Errors
    ///
    /// Same as [`PlaneWave::seed_all_points`].
    pub fn populate(
        &self,
        geometry: &GridGeometry,
        gfs: &mut GridFunctions,
        t: f64,
    ) -> Result<(), GridError> {
        check_target(geometry, gfs)?;
        let layout = *geometry.layout();
        for k in layout.interior_range(Axis::Z) {
            for j in layout.interior_range(Axis::Y) {
                for i in layout.interior_range(Axis::X) {
                    self.wave.write_point(geometry, gfs, (i, j, k), t);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ripple_grid::{DomainBounds, GridLayout};

    fn geometry(n: usize) -> GridGeometry {
        GridGeometry::new(DomainBounds::cube(10.0), [n, n, n], 2).unwrap()
    }

    #[test]
    fn solution_at_origin() {
        let wave = PlaneWave::new(WaveParams::new(2.0, [0.0, 0.0, 3.0]).unwrap());
        let s = wave.at([0.0, 0.0, 0.0], 0.25);
        assert_eq!(s.uu, 2.0 - 0.5_f64.sin());
        assert_eq!(s.vv, -2.0 * 0.5_f64.cos());
    }

    #[test]
    fn solution_is_travelling() {
        // Moving the observer c*t along the unit direction keeps the phase.
        let params = WaveParams::new(1.5, [1.0, 2.0, 2.0]).unwrap();
        let wave = PlaneWave::new(params);
        let x0 = [0.3, -1.2, 4.0];
        let t = 0.7;
        let d = 1.5 * t / 3.0;
        let x1 = [x0[0] + d, x0[1] + 2.0 * d, x0[2] + 2.0 * d];
        let (a, b) = (wave.at(x0, 0.0), wave.at(x1, t));
        assert!((a.uu - b.uu).abs() < 1e-12);
        assert!((a.vv - b.vv).abs() < 1e-12);
    }

    #[test]
    fn seed_all_points_covers_ghosts() {
        let geom = geometry(6);
        let mut gfs = GridFunctions::try_new(*geom.layout(), 2).unwrap();
        let wave = PlaneWave::new(WaveParams::default());
        wave.seed_all_points(&geom, &mut gfs, 0.0).unwrap();
        let expected = wave.at(geom.point(0, 0, 0), 0.0);
        assert_eq!(gfs.get(UU, 0, 0, 0), expected.uu);
        assert_eq!(gfs.get(VV, 0, 0, 0), expected.vv);
        let expected = wave.at(geom.point(9, 9, 9), 0.0);
        assert_eq!(gfs.get(UU, 9, 9, 9), expected.uu);
    }

    #[test]
    fn populate_leaves_ghosts_untouched() {
        let geom = geometry(4);
        let mut gfs = GridFunctions::try_new(*geom.layout(), 2).unwrap();
        gfs.fill(-7.0);
        let id = PlaneWaveInitialData::new(WaveParams::default());
        id.populate(&geom, &mut gfs, 1.0).unwrap();

        let layout = geom.layout();
        let [ex, ey, ez] = layout.extent();
        for k in 0..ez {
            for j in 0..ey {
                for i in 0..ex {
                    let uu = gfs.get(UU, i, j, k);
                    if layout.is_interior(i, j, k) {
                        assert_eq!(uu, id.wave().at(geom.point(i, j, k), 1.0).uu);
                    } else {
                        assert_eq!(uu, -7.0);
                        assert_eq!(gfs.get(VV, i, j, k), -7.0);
                    }
                }
            }
        }
    }

    #[test]
    fn param_check_rejects_zero_wavevector() {
        assert_eq!(
            PlaneWaveInitialData::param_check([0.0, 0.0, 0.0]),
            Err(ParamError::ZeroWavevector)
        );
        assert!(PlaneWaveInitialData::param_check([0.0, 0.0, -1.0]).is_ok());
    }

    #[test]
    fn wrong_target_rejected() {
        let geom = geometry(4);
        let wave = PlaneWave::new(WaveParams::default());

        let mut one_field = GridFunctions::try_new(*geom.layout(), 1).unwrap();
        assert!(matches!(
            wave.seed_all_points(&geom, &mut one_field, 0.0),
            Err(GridError::FieldOutOfRange { nfields: 1, .. })
        ));

        let other = GridLayout::new([4, 4, 5], 2).unwrap();
        let mut foreign = GridFunctions::try_new(other, 2).unwrap();
        assert!(matches!(
            wave.seed_all_points(&geom, &mut foreign, 0.0),
            Err(GridError::ShapeMismatch { .. })
        ));
    }
}

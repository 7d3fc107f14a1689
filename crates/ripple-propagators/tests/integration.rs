//! Reference operators composed on a real grid.

use ripple_core::{WaveParams, UU, VV};
use ripple_grid::{DomainBounds, GridFunctions, GridGeometry};
use ripple_propagator::{validate_stencil, BoundaryCondition, RightHandSide, StencilError};
use ripple_propagators::{PlaneWave, PlaneWaveInitialData, QuadraticExtrapolation, ScalarWaveRhs};
use ripple_test_utils::max_abs_diff;

fn rhs() -> ScalarWaveRhs {
    ScalarWaveRhs::builder()
        .params(WaveParams::default())
        .build()
        .unwrap()
}

#[test]
fn scalar_wave_stencil_needs_two_ghosts() {
    let rhs = rhs();
    let ok = GridGeometry::new(DomainBounds::default(), [8, 8, 8], 2).unwrap();
    assert!(validate_stencil(&rhs, ok.layout()).is_ok());

    let narrow = GridGeometry::new(DomainBounds::default(), [8, 8, 8], 1).unwrap();
    let err = validate_stencil(&rhs, narrow.layout()).unwrap_err();
    assert_eq!(
        err,
        StencilError::GhostTooNarrow {
            rhs: "ScalarWaveRhs".to_string(),
            ghost: 1,
            radius: 2,
        }
    );
}

#[test]
fn extrapolated_ghosts_track_the_plane_wave() {
    // Extrapolation error is third order in dx; corner points compound
    // it, so coarse grids converge faster than 8x.
    let params = WaveParams::default();
    let mut errors = Vec::new();
    for n in [16, 32] {
        let geom = GridGeometry::new(DomainBounds::default(), [n, n, n], 2).unwrap();
        let mut gfs = GridFunctions::try_new(*geom.layout(), 2).unwrap();
        let id = PlaneWaveInitialData::new(params);
        id.populate(&geom, &mut gfs, 0.0).unwrap();
        QuadraticExtrapolation.apply(&mut gfs);

        let mut exact = GridFunctions::try_new(*geom.layout(), 2).unwrap();
        PlaneWave::new(params)
            .seed_all_points(&geom, &mut exact, 0.0)
            .unwrap();
        errors.push(max_abs_diff(gfs.as_slice(), exact.as_slice()));
    }
    let ratio = errors[0] / errors[1];
    assert!(ratio > 5.0, "ghost error ratio {ratio}, errors {errors:?}");
}

#[test]
fn rhs_of_plane_wave_matches_time_derivative() {
    // d(vv)/dt of the exact solution is c^2 sin(phase); the 4th-order
    // stencil should reproduce it at the centre to within O(dx^4).
    let params = WaveParams::new(1.0, [1.0, 1.0, 1.0]).unwrap();
    let geom = GridGeometry::new(DomainBounds::default(), [48, 48, 48], 2).unwrap();
    let wave = PlaneWave::new(params);
    let mut input = GridFunctions::try_new(*geom.layout(), 2).unwrap();
    let mut output = input.clone();
    wave.seed_all_points(&geom, &mut input, 0.3).unwrap();
    rhs().evaluate(&geom, &input, &mut output).unwrap();

    let [ci, cj, ck] = geom.layout().center();
    let s = wave.at(geom.point(ci, cj, ck), 0.3);
    let expected_vv_dot = 2.0 - s.uu;
    assert_eq!(output.get(UU, ci, cj, ck), input.get(VV, ci, cj, ck));
    assert!((output.get(VV, ci, cj, ck) - expected_vv_dot).abs() < 1e-4);
}

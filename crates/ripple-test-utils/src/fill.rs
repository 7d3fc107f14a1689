//! Helpers for populating and comparing grid functions.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ripple_core::FieldId;
use ripple_grid::GridFunctions;

/// Fill every value of every field with uniform noise in `[-1, 1)`.
///
/// Deterministic for a given `seed`.
pub fn random_fill(gfs: &mut GridFunctions, seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for v in gfs.as_mut_slice() {
        *v = rng.random_range(-1.0..1.0);
    }
}

/// Set `field` at every point (ghosts included) to `f(i, j, k)`.
pub fn fill_field_with<F>(gfs: &mut GridFunctions, field: FieldId, f: F)
where
    F: Fn(usize, usize, usize) -> f64,
{
    let [ex, ey, ez] = gfs.layout().extent();
    for k in 0..ez {
        for j in 0..ey {
            for i in 0..ex {
                gfs.set(field, i, j, k, f(i, j, k));
            }
        }
    }
}

/// Largest absolute element-wise difference between two same-length slices.
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    assert_eq!(a.len(), b.len(), "slices differ in length");
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

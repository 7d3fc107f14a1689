//! Immutable wave parameters.

use crate::error::ParamError;

/// Physical parameters of the plane-wave problem.
///
/// Constructed through [`WaveParams::new`], which rejects a zero or
/// non-finite wavevector and a non-positive wavespeed. Once built the
/// value is immutable and is passed explicitly to every component that
/// needs it; there is no ambient parameter state.
///
/// # Examples
///
/// ```
/// use ripple_core::WaveParams;
///
/// let params = WaveParams::new(1.0, [1.0, 1.0, 1.0]).unwrap();
/// assert!((params.wavevector_norm() - 3.0_f64.sqrt()).abs() < 1e-15);
///
/// assert!(WaveParams::new(1.0, [0.0, 0.0, 0.0]).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveParams {
    wavespeed: f64,
    wavevector: [f64; 3],
}

impl WaveParams {
    /// Validate and build a parameter set.
    ///
    /// # Errors
    ///
    /// - [`ParamError::InvalidWavespeed`] if `wavespeed` is not finite and > 0.
    /// - [`ParamError::NonFiniteWavevector`] if any component is NaN or infinite.
    /// - [`ParamError::ZeroWavevector`] if all components are zero.
    pub fn new(wavespeed: f64, wavevector: [f64; 3]) -> Result<Self, ParamError> {
        if !(wavespeed.is_finite() && wavespeed > 0.0) {
            return Err(ParamError::InvalidWavespeed { value: wavespeed });
        }
        check_wavevector(wavevector)?;
        Ok(Self {
            wavespeed,
            wavevector,
        })
    }

    /// Propagation speed.
    pub fn wavespeed(&self) -> f64 {
        self.wavespeed
    }

    /// Unnormalized propagation direction `(kk0, kk1, kk2)`.
    pub fn wavevector(&self) -> [f64; 3] {
        self.wavevector
    }

    /// `|kk|`, always strictly positive.
    pub fn wavevector_norm(&self) -> f64 {
        let [k0, k1, k2] = self.wavevector;
        (k0 * k0 + k1 * k1 + k2 * k2).sqrt()
    }
}

impl Default for WaveParams {
    /// `wavespeed = 1`, `kk = (1, 1, 1)`.
    fn default() -> Self {
        Self {
            wavespeed: 1.0,
            wavevector: [1.0, 1.0, 1.0],
        }
    }
}

/// Reject a wavevector that cannot be normalized.
///
/// This is the parameter-check hook run before any grid point is
/// touched; [`WaveParams::new`] calls it, and initial-data hosts that
/// receive raw components can call it directly.
pub fn check_wavevector(wavevector: [f64; 3]) -> Result<(), ParamError> {
    if wavevector.iter().any(|k| !k.is_finite()) {
        return Err(ParamError::NonFiniteWavevector { wavevector });
    }
    if wavevector.iter().all(|&k| k == 0.0) {
        return Err(ParamError::ZeroWavevector);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_matches_playground_values() {
        let p = WaveParams::default();
        assert_eq!(p.wavespeed(), 1.0);
        assert_eq!(p.wavevector(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn zero_wavevector_rejected() {
        assert_eq!(
            WaveParams::new(1.0, [0.0, 0.0, 0.0]),
            Err(ParamError::ZeroWavevector)
        );
        // Negative zero is still zero.
        assert_eq!(
            WaveParams::new(1.0, [-0.0, 0.0, -0.0]),
            Err(ParamError::ZeroWavevector)
        );
    }

    #[test]
    fn single_nonzero_component_accepted() {
        let p = WaveParams::new(2.0, [0.0, 0.0, -3.0]).unwrap();
        assert_eq!(p.wavevector_norm(), 3.0);
    }

    #[test]
    fn non_finite_wavevector_rejected() {
        let err = WaveParams::new(1.0, [f64::NAN, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, ParamError::NonFiniteWavevector { .. }));
        let err = WaveParams::new(1.0, [f64::INFINITY, 1.0, 0.0]).unwrap_err();
        assert!(matches!(err, ParamError::NonFiniteWavevector { .. }));
    }

    #[test]
    fn bad_wavespeed_rejected() {
        for c in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = WaveParams::new(c, [1.0, 0.0, 0.0]).unwrap_err();
            assert!(
                matches!(err, ParamError::InvalidWavespeed { .. }),
                "wavespeed {c} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn any_nonzero_wavevector_has_positive_norm(
            k0 in -1e3f64..1e3,
            k1 in -1e3f64..1e3,
            k2 in 0.001f64..1e3,
        ) {
            let p = WaveParams::new(1.0, [k0, k1, k2]).unwrap();
            prop_assert!(p.wavevector_norm() > 0.0);
        }
    }
}

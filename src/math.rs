use num_traits::Float;

use crate::{Error, Result};

/// Full scale of the legacy 10-bit ADC range the resistance formula expects.
pub const LEGACY_FULL_SCALE: f64 = 1023.0;

/// Linearly map `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Inputs outside the source interval extrapolate along the same line; the
/// caller bounds them if that matters. Coincident interval endpoints are a
/// misconfiguration rather than a sensor-domain edge case, so they fail
/// fast instead of producing a non-finite quotient.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if `in_min == in_max`.
pub fn map_range<E: Float>(x: E, in_min: E, in_max: E, out_min: E, out_max: E) -> Result<E> {
    if in_max == in_min {
        return Err(Error::InvalidInput("degenerate input range in map_range"));
    }
    Ok((x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min)
}

/// Lift an `f64` model constant into the working float type.
///
/// # Panics
/// Panics if the constant is not representable in `E`. The literals this is
/// used with (1023, 20, 33) fit in any IEEE float, so the panic branch is
/// unreachable in practice.
pub(crate) fn lit<E: Float>(x: f64) -> E {
    E::from(x).expect("model constant representable in the working float type")
}

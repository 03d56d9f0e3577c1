//! Temperature/humidity correction of the sensor resistance.

use num_traits::Float;

use crate::config::CorrectionConstants;
use crate::math::lit;

/// Ambient conditions at the moment a sample was taken.
///
/// Always supplied explicitly by the caller; nothing in the model caches an
/// ambient reading, so wiring in a live temperature/humidity sensor later
/// touches only the call sites.
#[derive(Clone, Copy, Debug)]
pub struct EnvironmentReading<E> {
    /// Ambient temperature, in °C.
    pub temperature: E,
    /// Relative humidity, in %RH.
    pub humidity: E,
}

impl<E> EnvironmentReading<E> {
    pub const fn new(temperature: E, humidity: E) -> Self {
        Self {
            temperature,
            humidity,
        }
    }
}

/// Dimensionless drift-correction factor for the sensor resistance.
///
/// Linearisation of the temperature dependency curve below and at/above
/// 20 °C, assuming a linear dependency on humidity throughout:
///
/// $$
///     f(t, h) = a t^2 - b t + c - (h - 33) d  \quad (t < 20)
/// $$
/// $$
///     f(t, h) = e t + f h + g                 \quad (t \geq 20)
/// $$
///
/// The boundary is inclusive on the high side: exactly 20 °C evaluates the
/// linear branch. Pure and division-free, so the result is finite for any
/// finite inputs.
pub fn correction_factor<E: Float>(t: E, h: E, corr: &CorrectionConstants<E>) -> E {
    if t < lit(20.0) {
        corr.cor_a * t * t - corr.cor_b * t + corr.cor_c - (h - lit(33.0)) * corr.cor_d
    } else {
        corr.cor_e * t + corr.cor_f * h + corr.cor_g
    }
}

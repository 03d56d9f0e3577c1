//! Raw-sample to concentration conversion.
//!
//! Every operation is a pure function of its explicit inputs. The chain is
//! raw sample → resistance → (optional correction) → ppm, with the
//! zero-calibration resistance available as a diagnostic side-product.

use num_traits::Float;

use crate::config::{CalibrationConstants, CorrectionConstants, ModelConfig};
use crate::correction::{correction_factor, EnvironmentReading};
use crate::math::{lit, LEGACY_FULL_SCALE};
use crate::{Error, Result};

/// One fully converted sample.
///
/// Produced fresh per poll; carries no identity beyond its values.
#[derive(Clone, Copy, Debug)]
pub struct Co2Estimate<E> {
    /// Sensor resistance, in ohms.
    pub resistance: E,
    /// Zero-calibration resistance implied by this sample.
    pub r_zero: E,
    /// Zero-calibration resistance after drift correction.
    pub corrected_r_zero: E,
    /// Uncorrected concentration, in ppm.
    pub ppm: E,
    /// Drift-corrected concentration, in ppm.
    pub corrected_ppm: E,
}

/// Sensor resistance from a raw sample in the legacy 0–1023 range.
///
/// `r = (1023 / raw - 1) * r_load`
///
/// # Errors
/// Returns [`Error::InvalidInput`] for `raw <= 0`, where the quotient is
/// undefined.
pub fn resistance<E: Float>(raw: E, r_load: E) -> Result<E> {
    if raw <= E::zero() {
        return Err(Error::InvalidInput("raw sample must be positive"));
    }
    Ok((lit::<E>(LEGACY_FULL_SCALE) / raw - E::one()) * r_load)
}

/// Sensor resistance with the temperature/humidity drift divided out.
///
/// # Errors
/// Returns [`Error::InvalidInput`] for a non-positive raw sample or a
/// correction factor of exactly zero.
pub fn corrected_resistance<E: Float>(
    env: &EnvironmentReading<E>,
    corr: &CorrectionConstants<E>,
    raw: E,
    r_load: E,
) -> Result<E> {
    let factor = correction_factor(env.temperature, env.humidity, corr);
    if factor == E::zero() {
        return Err(Error::InvalidInput("correction factor is zero"));
    }
    Ok(resistance(raw, r_load)? / factor)
}

/// Uncorrected CO2 concentration via the power-law curve fit.
///
/// `ppm = par_a * (r / r_zero)^(-par_b)`
///
/// # Errors
/// Returns [`Error::InvalidInput`] unless the resistance is strictly
/// positive; at `raw = 1023` the resistance is exactly zero and the power
/// has no real value.
pub fn ppm<E: Float>(cal: &CalibrationConstants<E>, raw: E) -> Result<E> {
    let r = resistance(raw, cal.r_load)?;
    power_law(cal, r)
}

/// Drift-corrected CO2 concentration.
///
/// # Errors
/// As [`ppm`], over the corrected resistance; a negative correction factor
/// flips the sign of the resistance and is rejected the same way.
pub fn corrected_ppm<E: Float>(
    env: &EnvironmentReading<E>,
    corr: &CorrectionConstants<E>,
    cal: &CalibrationConstants<E>,
    raw: E,
) -> Result<E> {
    let r = corrected_resistance(env, corr, raw, cal.r_load)?;
    power_law(cal, r)
}

fn power_law<E: Float>(cal: &CalibrationConstants<E>, r: E) -> Result<E> {
    if r <= E::zero() {
        return Err(Error::InvalidInput(
            "resistance must be positive for ppm conversion",
        ));
    }
    Ok(cal.par_a * (r / cal.r_zero).powf(-cal.par_b))
}

/// Zero-calibration resistance implied by a sample taken at the
/// atmospheric reference concentration.
///
/// `r_zero = r * (atmo_co2 / par_a)^(1 / par_b)`
///
/// Diagnostic only: the result never feeds back into the stored
/// [`CalibrationConstants::r_zero`]. Re-deriving the anchor is a manual
/// step done in known clean air, not a feedback loop.
///
/// # Errors
/// Returns [`Error::InvalidInput`] for a non-positive raw sample.
pub fn r_zero<E: Float>(cal: &CalibrationConstants<E>, raw: E) -> Result<E> {
    let r = resistance(raw, cal.r_load)?;
    Ok(anchor(cal, r))
}

/// As [`r_zero`], over the drift-corrected resistance.
///
/// # Errors
/// As [`corrected_resistance`].
pub fn corrected_r_zero<E: Float>(
    env: &EnvironmentReading<E>,
    corr: &CorrectionConstants<E>,
    cal: &CalibrationConstants<E>,
    raw: E,
) -> Result<E> {
    let r = corrected_resistance(env, corr, raw, cal.r_load)?;
    Ok(anchor(cal, r))
}

fn anchor<E: Float>(cal: &CalibrationConstants<E>, r: E) -> E {
    r * (cal.atmo_co2 / cal.par_a).powf(E::one() / cal.par_b)
}

/// Convert one native ADC sample into a full [`Co2Estimate`].
///
/// This is the single entry point the polling cycle calls: it rescales the
/// sample onto the legacy range and evaluates every model output. Any
/// domain violation along the way aborts the whole estimate; no partial or
/// non-finite results are produced.
///
/// # Errors
/// Propagates the first [`Error::InvalidInput`] from the individual
/// conversions.
pub fn estimate<E: Float>(
    config: &ModelConfig<E>,
    env: &EnvironmentReading<E>,
    raw_adc: E,
) -> Result<Co2Estimate<E>> {
    let raw = config.adc_range.to_legacy(raw_adc)?;
    let cal = &config.calibration;
    let corr = &config.correction;

    Ok(Co2Estimate {
        resistance: resistance(raw, cal.r_load)?,
        r_zero: r_zero(cal, raw)?,
        corrected_r_zero: corrected_r_zero(env, corr, cal, raw)?,
        ppm: ppm(cal, raw)?,
        corrected_ppm: corrected_ppm(env, corr, cal, raw)?,
    })
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{
        corrected_ppm, corrected_r_zero, corrected_resistance, estimate, ppm, r_zero, resistance,
    };
    use crate::config::{CalibrationConstants, CorrectionConstants, ModelConfig};
    use crate::correction::{correction_factor, EnvironmentReading};
    use crate::Error;

    const CAL: CalibrationConstants<f64> = CalibrationConstants::MQ135;
    const CORR: CorrectionConstants<f64> = CorrectionConstants::MQ135;

    fn reference_env() -> EnvironmentReading<f64> {
        EnvironmentReading::new(19.0, 63.0)
    }

    #[test]
    fn half_scale_sample_reads_the_load_resistance() {
        // 1023 / 511.5 = 2, so the divider sits at exactly r_load.
        let r = resistance(511.5, CAL.r_load).unwrap();
        approx::assert_relative_eq!(r, CAL.r_load);
    }

    #[test]
    fn zero_sample_is_rejected() {
        assert!(matches!(
            resistance(0.0, CAL.r_load),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn full_scale_sample_gives_zero_resistance_and_no_ppm() {
        let r = resistance(1023.0, CAL.r_load).unwrap();
        approx::assert_abs_diff_eq!(r, 0.0);
        // Zero resistance has no real-valued power, so the pipeline fails
        // fast instead of propagating infinity.
        assert!(matches!(ppm(&CAL, 1023.0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn ppm_at_the_calibration_anchor_is_par_a() {
        // Pick the raw value whose resistance equals r_zero.
        let raw = 1023.0 / (CAL.r_zero / CAL.r_load + 1.0);
        let value = ppm(&CAL, raw).unwrap();
        approx::assert_relative_eq!(value, CAL.par_a, max_relative = 1e-9);
    }

    #[test]
    fn corrected_resistance_divides_by_the_factor() {
        let env = reference_env();
        let plain = resistance(400.0, CAL.r_load).unwrap();
        let corrected = corrected_resistance(&env, &CORR, 400.0, CAL.r_load).unwrap();
        let factor = correction_factor(env.temperature, env.humidity, &CORR);
        approx::assert_relative_eq!(corrected, plain / factor);
    }

    #[test]
    fn r_zero_round_trips_through_the_power_law() {
        // A sample taken at atmo_co2 concentration implies an anchor which,
        // substituted back as r_zero, reproduces atmo_co2.
        let raw = 400.0;
        let anchor = r_zero(&CAL, raw).unwrap();
        let recalibrated = CalibrationConstants {
            r_zero: anchor,
            ..CAL
        };
        let value = ppm(&recalibrated, raw).unwrap();
        approx::assert_relative_eq!(value, CAL.atmo_co2, max_relative = 1e-9);
    }

    #[test]
    fn corrected_anchor_is_the_plain_anchor_over_the_factor() {
        // Both anchors share the same power-law multiplier, so the
        // correction enters exactly once, through the resistance.
        let env = reference_env();
        let plain = r_zero(&CAL, 400.0).unwrap();
        let corrected = corrected_r_zero(&env, &CORR, &CAL, 400.0).unwrap();
        let factor = correction_factor(env.temperature, env.humidity, &CORR);
        approx::assert_relative_eq!(corrected, plain / factor, max_relative = 1e-12);
    }

    #[test]
    fn estimate_agrees_with_the_individual_conversions() {
        let config = ModelConfig::MQ135;
        let env = reference_env();
        // 13910 sits exactly halfway through the ADS1115 window.
        let est = estimate(&config, &env, 13910.0).unwrap();
        approx::assert_relative_eq!(est.resistance, CAL.r_load);
        approx::assert_relative_eq!(est.ppm, ppm(&CAL, 511.5).unwrap());
        approx::assert_relative_eq!(
            est.corrected_ppm,
            corrected_ppm(&env, &CORR, &CAL, 511.5).unwrap()
        );
        approx::assert_relative_eq!(est.r_zero, r_zero(&CAL, 511.5).unwrap());
        approx::assert_relative_eq!(
            est.corrected_r_zero,
            corrected_r_zero(&env, &CORR, &CAL, 511.5).unwrap()
        );
    }

    #[test]
    fn estimate_rejects_a_full_scale_sample() {
        let config = ModelConfig::MQ135;
        let result = estimate(&config, &reference_env(), 27255.0);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    proptest! {
        #[test]
        fn resistance_is_strictly_decreasing_in_raw(
            a in 1.0..1022.0f64,
            b in 1.0..1022.0f64,
        ) {
            prop_assume!(a < b);
            let ra = resistance(a, CAL.r_load).unwrap();
            let rb = resistance(b, CAL.r_load).unwrap();
            prop_assert!(ra > rb);
        }

        // Power law with negative exponent: less resistance, more gas.
        #[test]
        fn ppm_is_strictly_decreasing_in_resistance(
            a in 1.0..1022.0f64,
            b in 1.0..1022.0f64,
        ) {
            prop_assume!(a < b);
            // resistance is decreasing, so ppm over raw must be increasing
            let pa = ppm(&CAL, a).unwrap();
            let pb = ppm(&CAL, b).unwrap();
            prop_assert!(pa < pb);
        }

        #[test]
        fn estimates_inside_the_window_are_finite_and_positive(
            raw_adc in 600.0..27000.0f64,
        ) {
            let config = ModelConfig::MQ135;
            let est = estimate(&config, &reference_env(), raw_adc).unwrap();
            prop_assert!(est.ppm.is_finite() && est.ppm > 0.0);
            prop_assert!(est.corrected_ppm.is_finite() && est.corrected_ppm > 0.0);
            prop_assert!(est.resistance.is_finite());
        }
    }
}

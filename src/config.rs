//! Constant sets for the estimation model.
//!
//! Every computation takes its constants by reference rather than reading
//! module-level state, so a per-sensor-unit calibration is just another
//! `ModelConfig` value. The reference MQ135 constant set ships as associated
//! consts on the `f64` instantiations; deployment-specific sets load from a
//! TOML file.

use std::fs;
use std::path::Path;

use num_traits::Float;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::math::{lit, map_range, LEGACY_FULL_SCALE};
use crate::{Error, Result};

/// Power-law calibration of one sensor unit.
///
/// Relates the resistance ratio to concentration via
/// `ppm = par_a * (r / r_zero)^(-par_b)`.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct CalibrationConstants<E> {
    /// Load resistance of the voltage divider, in ohms.
    pub r_load: E,
    /// Sensor resistance at the atmospheric reference concentration.
    pub r_zero: E,
    /// Power-law scale parameter.
    pub par_a: E,
    /// Power-law exponent parameter.
    pub par_b: E,
    /// Atmospheric CO2 reference concentration, in ppm.
    pub atmo_co2: E,
}

impl CalibrationConstants<f64> {
    /// Reference MQ135 calibration from the datasheet curve fit.
    pub const MQ135: Self = Self {
        r_load: 10.0,
        r_zero: 76.63,
        par_a: 116.6020682,
        par_b: 2.769034857,
        atmo_co2: 412.5,
    };
}

impl<E: Float> CalibrationConstants<E> {
    /// # Errors
    /// Returns [`Error::InvalidConfig`] unless every constant is a positive
    /// finite number. `par_b` appears as a division exponent, so positivity
    /// also covers the `par_b != 0` requirement.
    pub fn validate(&self) -> Result<()> {
        let positive = |x: E| x.is_finite() && x > E::zero();
        if !positive(self.r_load) {
            return Err(Error::InvalidConfig("r_load must be positive"));
        }
        if !positive(self.r_zero) {
            return Err(Error::InvalidConfig("r_zero must be positive"));
        }
        if !positive(self.par_a) {
            return Err(Error::InvalidConfig("par_a must be positive"));
        }
        if !positive(self.par_b) {
            return Err(Error::InvalidConfig("par_b must be positive"));
        }
        if !positive(self.atmo_co2) {
            return Err(Error::InvalidConfig("atmo_co2 must be positive"));
        }
        Ok(())
    }
}

/// Piecewise temperature/humidity correction curve.
///
/// `cor_a..cor_d` parameterise the branch below 20 °C, `cor_e..cor_g` the
/// branch at and above it. The curve is continuous at 20 °C in design
/// intent only; nothing enforces that numerically, so constant sets edited
/// by hand can introduce a small step at the boundary.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct CorrectionConstants<E> {
    pub cor_a: E,
    pub cor_b: E,
    pub cor_c: E,
    pub cor_d: E,
    pub cor_e: E,
    pub cor_f: E,
    pub cor_g: E,
}

impl CorrectionConstants<f64> {
    /// Reference MQ135 correction curve fit.
    pub const MQ135: Self = Self {
        cor_a: 0.00035,
        cor_b: 0.02718,
        cor_c: 1.39538,
        cor_d: 0.0018,
        cor_e: -0.003333333,
        cor_f: -0.001923077,
        cor_g: 1.130128205,
    };
}

impl<E: Float> CorrectionConstants<E> {
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if any coefficient is non-finite.
    pub fn validate(&self) -> Result<()> {
        let all_finite = [
            self.cor_a, self.cor_b, self.cor_c, self.cor_d, self.cor_e, self.cor_f, self.cor_g,
        ]
        .iter()
        .all(|x| x.is_finite());
        if all_finite {
            Ok(())
        } else {
            Err(Error::InvalidConfig(
                "correction coefficients must be finite",
            ))
        }
    }
}

/// Native output window of the ADC driver supplying raw samples.
///
/// Samples are rescaled from this window onto the legacy 0–1023 range the
/// resistance formula was fitted against.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct AdcRange<E> {
    pub min: E,
    pub max: E,
}

impl AdcRange<f64> {
    /// ADS1115 single-ended window observed on the reference board.
    pub const ADS1115: Self = Self {
        min: 565.0,
        max: 27255.0,
    };
}

impl<E: Float> AdcRange<E> {
    /// Rescale a native ADC sample onto the legacy 0–1023 range.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the range is degenerate.
    pub fn to_legacy(&self, raw: E) -> Result<E> {
        map_range(raw, self.min, self.max, E::zero(), lit(LEGACY_FULL_SCALE))
    }

    /// # Errors
    /// Returns [`Error::InvalidConfig`] unless `min < max` and both bounds
    /// are finite.
    pub fn validate(&self) -> Result<()> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(Error::InvalidConfig("adc_range requires min < max"))
        }
    }
}

/// The full constant set for one sensor unit.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ModelConfig<E> {
    pub calibration: CalibrationConstants<E>,
    pub correction: CorrectionConstants<E>,
    pub adc_range: AdcRange<E>,
}

impl ModelConfig<f64> {
    /// Reference MQ135 configuration behind an ADS1115.
    pub const MQ135: Self = Self {
        calibration: CalibrationConstants::MQ135,
        correction: CorrectionConstants::MQ135,
        adc_range: AdcRange::ADS1115,
    };
}

impl Default for ModelConfig<f64> {
    fn default() -> Self {
        Self::MQ135
    }
}

impl<E: Float> ModelConfig<E> {
    /// # Errors
    /// Returns the first invariant violation among the constituent sets.
    pub fn validate(&self) -> Result<()> {
        self.calibration.validate()?;
        self.correction.validate()?;
        self.adc_range.validate()
    }
}

impl<E: Float + DeserializeOwned> ModelConfig<E> {
    /// Load and validate a configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, does not parse, or
    /// fails [`ModelConfig::validate`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }
}

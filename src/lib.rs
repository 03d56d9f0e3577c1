#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

//! Calibrated CO2 estimation for MQ135-class resistive gas sensors.
//!
//! The crate converts raw ADC samples into ppm estimates through a short
//! chain of empirical-model equations: raw sample → sensor resistance →
//! (temperature/humidity corrected resistance) → ppm via a power-law curve
//! fit. Hardware access stays outside the crate: an ADC driver is anything
//! implementing [`monitor::SampleSource`], an ambient sensor anything
//! implementing [`monitor::EnvironmentSource`].

pub mod config;
pub mod correction;
pub mod error;
pub mod estimator;
pub mod logbook;
pub mod math;
pub mod monitor;

pub use config::{AdcRange, CalibrationConstants, CorrectionConstants, ModelConfig};
pub use correction::{correction_factor, EnvironmentReading};
pub use error::Error;
pub use estimator::{estimate, Co2Estimate};

pub type Result<T> = ::std::result::Result<T, Error>;

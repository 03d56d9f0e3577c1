//! The polling cycle: sample, convert, append.
//!
//! Hardware stays behind two one-method traits so the cycle is testable
//! with scripted values and wires up to any ADC driver or ambient sensor
//! without touching the model.

use std::fmt::Display;

use log::{info, warn};
use num_traits::Float;

use crate::config::ModelConfig;
use crate::correction::EnvironmentReading;
use crate::estimator::{estimate, Co2Estimate};
use crate::logbook::EstimateLog;
use crate::{Error, Result};

/// A stream of raw ADC samples on demand.
///
/// The implementation owns bus setup, channel selection and driver
/// configuration; the cycle only ever asks for the next scalar.
pub trait SampleSource<E> {
    /// # Errors
    /// Returns an error when the underlying driver cannot produce a sample.
    fn sample(&mut self) -> Result<E>;
}

/// Ambient temperature and humidity on demand.
pub trait EnvironmentSource<E> {
    /// # Errors
    /// Returns an error when the underlying sensor cannot be read.
    fn read(&mut self) -> Result<EnvironmentReading<E>>;
}

/// A constant ambient environment.
///
/// Stands in where no live temperature/humidity sensor is wired up, the
/// way the reference deployment ran with fixed t = 19 °C, h = 63 %RH.
#[derive(Clone, Copy, Debug)]
pub struct FixedEnvironment<E>(pub EnvironmentReading<E>);

impl<E: Copy> EnvironmentSource<E> for FixedEnvironment<E> {
    fn read(&mut self) -> Result<EnvironmentReading<E>> {
        Ok(self.0)
    }
}

/// Single-threaded sample-convert-append cycle.
///
/// Scheduling stays with the caller: [`Monitor::run_cycle`] runs exactly
/// one iteration, so the surrounding loop decides the poll interval and
/// when to stop. Iterations never overlap and samples are independent, so
/// there is nothing to retry; an errored sample just skips its log record.
pub struct Monitor<E, S, V> {
    config: ModelConfig<E>,
    source: S,
    environment: V,
    log: EstimateLog,
}

impl<E, S, V> Monitor<E, S, V>
where
    E: Float + Display,
    S: SampleSource<E>,
    V: EnvironmentSource<E>,
{
    pub const fn new(config: ModelConfig<E>, source: S, environment: V, log: EstimateLog) -> Self {
        Self {
            config,
            source,
            environment,
            log,
        }
    }

    /// Acquire one sample, convert it and append one log record.
    ///
    /// A sample the model rejects ([`Error::InvalidInput`]) is logged as a
    /// warning and skipped, returning `Ok(None)`; the next poll is a fresh
    /// start. Sampling and I/O failures propagate to the caller.
    ///
    /// # Errors
    /// Returns sampling, environment-read and log-write errors.
    pub fn run_cycle(&mut self) -> Result<Option<Co2Estimate<E>>> {
        let raw = self.source.sample()?;
        let env = self.environment.read()?;

        match estimate(&self.config, &env, raw) {
            Ok(est) => {
                self.log.append_now(&est)?;
                info!(
                    "raw {raw}: {:.1} ppm CO2 ({:.1} uncorrected)",
                    est.corrected_ppm, est.ppm
                );
                Ok(Some(est))
            }
            Err(Error::InvalidInput(reason)) => {
                warn!("skipping sample {raw}: {reason}");
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }
}

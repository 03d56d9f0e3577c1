//! Append-only estimate log.
//!
//! One line per sample, `;`-delimited, consumed by downstream tooling that
//! expects exactly `YYYY-MM-DD HH:MM:SS;<ppm>\n`. The writer only ever
//! appends; rotation and pruning belong to the deployment, not the crate.

use std::fs::{File, OpenOptions};
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use csv::{Writer, WriterBuilder};
use num_traits::Float;

use crate::estimator::Co2Estimate;
use crate::{Error, Result};

pub struct EstimateLog {
    writer: Writer<File>,
}

impl EstimateLog {
    /// Open (creating if needed) a log file for appending.
    ///
    /// # Errors
    /// Returns [`Error::Io`] if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = WriterBuilder::new().delimiter(b';').from_writer(file);
        Ok(Self { writer })
    }

    /// Append one record with an explicit timestamp and flush it.
    ///
    /// The corrected ppm is rounded to the nearest integer, matching the
    /// format existing log consumers parse.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if the corrected ppm does not fit an
    /// integer (non-finite values never reach here through [`crate::estimate`]),
    /// or an I/O error from the underlying writer.
    pub fn append<E: Float>(
        &mut self,
        timestamp: NaiveDateTime,
        estimate: &Co2Estimate<E>,
    ) -> Result<()> {
        let ppm = estimate
            .corrected_ppm
            .round()
            .to_i64()
            .ok_or(Error::InvalidInput("corrected ppm is not representable"))?;
        let stamp = timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
        self.writer.write_record([stamp, ppm.to_string()])?;
        self.writer.flush()?;
        Ok(())
    }

    /// Append one record stamped with the current local time.
    ///
    /// # Errors
    /// As [`EstimateLog::append`].
    pub fn append_now<E: Float>(&mut self, estimate: &Co2Estimate<E>) -> Result<()> {
        self.append(Local::now().naive_local(), estimate)
    }
}

use thiserror::Error;

/// Errors surfaced by the estimation pipeline.
///
/// The model applies a single fail-fast policy throughout: any input that
/// would put a formula outside its real-valued domain (a zero raw sample, a
/// non-positive power-law base, a vanishing correction factor, a degenerate
/// range mapping) is rejected with [`Error::InvalidInput`] before the
/// arithmetic runs. Non-finite values are never propagated downstream.
#[derive(Debug, Error)]
pub enum Error {
    /// A supplied parameter violates a domain precondition of one of the
    /// model formulas.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// A constant set violates its invariants (all calibration constants
    /// positive, ADC range non-degenerate).
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("failed to append log record: {0}")]
    Log(#[from] csv::Error),
}

//! Error type for filter design and resampling.

use thiserror::Error;

/// Errors raised while designing or applying filters.
#[derive(Error, Debug)]
pub enum DspError {
    /// Band edges are not ordered inside (0, Nyquist).
    #[error("invalid pass band {low}-{high} Hz at {rate} Hz")]
    InvalidBand {
        /// Lower band edge in Hz.
        low: f64,
        /// Upper band edge in Hz.
        high: f64,
        /// Sample rate the band was requested at.
        rate: u32,
    },

    /// A sample rate of zero was supplied.
    #[error("sample rate must be non-zero")]
    ZeroRate,

    /// A core primitive failed during design.
    #[error(transparent)]
    Core(#[from] cfs_core::CoreError),
}

/// Result alias for DSP operations.
pub type Result<T> = std::result::Result<T, DspError>;

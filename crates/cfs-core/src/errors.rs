//! Error type shared by the core primitives.

use thiserror::Error;

/// Errors raised by the core DSP primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The DFT size is not a power of two.
    #[error("DFT size must be a power of 2, got {0}")]
    InvalidDftSize(usize),

    /// A frame was passed whose length does not match the plan.
    #[error("frame length {frame} doesn't match DFT size {size}")]
    FrameSizeMismatch {
        /// Length of the offending frame.
        frame: usize,
        /// Size the plan was built for.
        size: usize,
    },

    /// A window of a degenerate size was requested.
    #[error("window size must be at least 2, got {0}")]
    InvalidWindowSize(usize),

    /// A buffer was passed whose length does not match the window.
    #[error("buffer length {0} doesn't match window size {1}")]
    WindowSizeMismatch(usize, usize),

    /// More output bins were requested than the DFT produces.
    #[error("requested {requested} bins from a {size}-point DFT")]
    TooManyBins {
        /// Number of magnitude bins requested.
        requested: usize,
        /// Size of the DFT.
        size: usize,
    },
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

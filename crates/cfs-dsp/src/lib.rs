#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Offline filters for CFS-RS
//!
//! Band-pass FIR filtering at the native EDF rate and rational-ratio
//! resampling down to the canonical 100 Hz rate. These run once per
//! channel per recording; nothing here is streaming or real-time.

pub mod error;
pub mod fir;
pub mod resample;

pub use error::{DspError, Result};
pub use fir::BandpassFir;
pub use resample::Resampler;

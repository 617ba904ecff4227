#![deny(unsafe_code)]
#![warn(missing_docs)]

//! EDF to CFS conversion pipeline
//!
//! Converts polysomnography recordings in the European Data Format into
//! the Compressed Feature Set: an anonymised artifact holding a fixed
//! shape per-epoch spectral feature tensor instead of raw waveforms.
//!
//! The per-file pipeline is: resolve the four requested channels, scale
//! to microvolts, band-pass filter at the native rate, resample to
//! 100 Hz, extract a `[epochs, 3, 32, 32]` magnitude-spectrum tensor,
//! hash and DEFLATE the float payload, and write the fixed-layout CFS
//! container. [`pool::run_jobs`] fans independent files out across
//! worker threads.

pub mod channels;
pub mod container;
pub mod edf;
pub mod error;
pub mod features;
pub mod pipeline;
pub mod pool;
pub mod report;

pub use channels::{ChannelSelection, PhysicalUnit, Role};
pub use error::{ConvertError, EdfOpenKind, Result};
pub use pipeline::{convert_file, Conversion, ConvertOptions};
pub use pool::{degree_of_parallelism, run_jobs, RunSummary};
pub use report::ConversionReport;

//! Per-job error taxonomy.
//!
//! Every failure mode of a conversion job is a value of [`ConvertError`];
//! jobs never terminate the process. The dispatcher reports the short
//! [`code`](ConvertError::code) of each outcome and carries on.

use crate::channels::Role;
use std::path::PathBuf;
use thiserror::Error;

/// Why an EDF file could not be opened.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdfOpenKind {
    /// The file does not exist.
    #[error("file not found")]
    NotFound,
    /// The header is not a parseable EDF header.
    #[error("malformed header")]
    MalformedHeader,
    /// The file exists but could not be read.
    #[error("read error")]
    Read,
}

/// A typed per-file conversion failure.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The output exists and overwriting is disabled; no work was done.
    #[error("output already exists: {}", .0.display())]
    AlreadyConverted(PathBuf),

    /// The input EDF could not be opened.
    #[error("cannot open EDF: {0}")]
    EdfOpenFailure(EdfOpenKind),

    /// A requested label matched no signal in the file.
    #[error("no signal labelled '{label}' for {role}")]
    LabelNotFound {
        /// The role whose label was not found.
        role: Role,
        /// The label that was requested.
        label: String,
    },

    /// A matched signal carries a unit outside {nV, uV, mV, V}.
    #[error("unsupported physical unit '{unit}' on {role}")]
    UnsupportedUnit {
        /// The role whose unit is unsupported.
        role: Role,
        /// The offending unit string.
        unit: String,
    },

    /// The two central EEG channels disagree on sample rate.
    #[error("C3 and C4 sample rates differ: {c3} Hz vs {c4} Hz")]
    ChannelRateMismatch {
        /// Nominal C3 rate in Hz.
        c3: u32,
        /// Nominal C4 rate in Hz.
        c4: u32,
    },

    /// Sample extraction failed mid-stream.
    #[error("failed reading samples for {0}")]
    ReadFailure(Role),

    /// The integrity hash could not be computed.
    #[error("integrity hash failed")]
    IntegrityFailure,

    /// The compressed stream exceeded the DEFLATE worst-case bound.
    #[error("compressed payload exceeds the deflate bound")]
    BufferTooSmall,

    /// The compression output buffer could not be allocated.
    #[error("out of memory in compression stage")]
    OutOfMemory,

    /// The epoch count does not fit the container's 16-bit field.
    #[error("epoch count {0} exceeds the container limit")]
    EpochOverflow(usize),

    /// The destination could not be written or replaced.
    #[error("cannot write {}", .0.display())]
    WriteFailure(PathBuf),

    /// A core DSP primitive failed.
    #[error(transparent)]
    Core(#[from] cfs_core::CoreError),

    /// Filter design or resampling failed.
    #[error(transparent)]
    Dsp(#[from] cfs_dsp::DspError),
}

impl ConvertError {
    /// Short stable code for reports and logs.
    pub fn code(&self) -> &'static str {
        match self {
            ConvertError::AlreadyConverted(_) => "ALREADY_CONVERTED",
            ConvertError::EdfOpenFailure(_) => "EDF_OPEN",
            ConvertError::LabelNotFound { .. } => "LABEL_NOT_FOUND",
            ConvertError::UnsupportedUnit { .. } => "UNSUPPORTED_UNIT",
            ConvertError::ChannelRateMismatch { .. } => "RATE_MISMATCH",
            ConvertError::ReadFailure(_) => "READ_FAILURE",
            ConvertError::IntegrityFailure => "INTEGRITY",
            ConvertError::BufferTooSmall => "BUFFER_TOO_SMALL",
            ConvertError::OutOfMemory => "OUT_OF_MEMORY",
            ConvertError::EpochOverflow(_) => "EPOCH_OVERFLOW",
            ConvertError::WriteFailure(_) => "WRITE_FAILURE",
            ConvertError::Core(_) => "DSP_CORE",
            ConvertError::Dsp(_) => "DSP",
        }
    }
}

/// Result alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

//! Thin wrapper over the external EDF reader.
//!
//! Header and record parsing live in the `edf-reader` crate; this module
//! narrows its surface to what the pipeline needs: per-signal metadata
//! and physical samples by signal index. The whole data window is read
//! once on first access and cached for the lifetime of the job.

use crate::error::{ConvertError, EdfOpenKind, Result};
use edf_reader::sync_reader::SyncEDFReader;
use local_edf_reader::{init_sync_reader, LocalFileReader};
use std::io;
use std::path::Path;

/// Metadata of one physical signal in an EDF file.
#[derive(Debug, Clone)]
pub struct SignalMeta {
    /// Signal label, trimmed of EDF field padding.
    pub label: String,
    /// Total sample count in the file.
    pub samples_in_file: u64,
    /// Samples per data record.
    pub samples_per_record: u64,
    /// Data record duration in milliseconds.
    pub record_duration_ms: u64,
    /// Physical unit string, trimmed.
    pub physical_unit: String,
    /// Index of the signal within the EDF.
    pub index: usize,
}

impl SignalMeta {
    /// Nominal sample rate in Hz: samples per record over record duration.
    pub fn sample_rate(&self) -> u32 {
        (self.samples_per_record * 1000 / self.record_duration_ms) as u32
    }
}

/// An opened EDF recording.
pub struct EdfFile {
    reader: SyncEDFReader<LocalFileReader>,
    signals: Vec<SignalMeta>,
    total_duration_ms: u64,
    window: Option<Vec<Vec<f32>>>,
}

impl std::fmt::Debug for EdfFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdfFile")
            .field("signals", &self.signals)
            .field("total_duration_ms", &self.total_duration_ms)
            .field("window_loaded", &self.window.is_some())
            .finish()
    }
}

impl EdfFile {
    /// Open an EDF file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let path_str = path
            .to_str()
            .ok_or(ConvertError::EdfOpenFailure(EdfOpenKind::NotFound))?;

        let reader = init_sync_reader(path_str)
            .map_err(|e| ConvertError::EdfOpenFailure(open_kind(&e)))?;

        let header = &reader.edf_header;
        if header.block_duration == 0 || header.channels.is_empty() {
            return Err(ConvertError::EdfOpenFailure(EdfOpenKind::MalformedHeader));
        }

        let signals = header
            .channels
            .iter()
            .enumerate()
            .map(|(index, channel)| SignalMeta {
                label: channel.label.trim().to_string(),
                samples_in_file: header.number_of_blocks
                    * channel.number_of_samples_in_data_record,
                samples_per_record: channel.number_of_samples_in_data_record,
                record_duration_ms: header.block_duration,
                physical_unit: channel.physical_dimension.trim().to_string(),
                index,
            })
            .collect();

        let total_duration_ms = header.number_of_blocks * header.block_duration;

        Ok(EdfFile {
            reader,
            signals,
            total_duration_ms,
            window: None,
        })
    }

    /// Per-signal metadata, in file order.
    pub fn signals(&self) -> &[SignalMeta] {
        &self.signals
    }

    /// Physical samples of one signal, as produced by the EDF reader's
    /// digital-to-physical mapping.
    pub fn signal_samples(&mut self, index: usize) -> io::Result<&[f32]> {
        if self.window.is_none() {
            let data = self
                .reader
                .read_data_window(0, self.total_duration_ms)?;
            self.window = Some(data);
        }

        self.window
            .as_ref()
            .and_then(|window| window.get(index))
            .map(|channel| channel.as_slice())
            .ok_or_else(|| io::Error::from(io::ErrorKind::InvalidInput))
    }
}

fn open_kind(error: &io::Error) -> EdfOpenKind {
    match error.kind() {
        io::ErrorKind::NotFound => EdfOpenKind::NotFound,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
            EdfOpenKind::MalformedHeader
        }
        _ => EdfOpenKind::Read,
    }
}

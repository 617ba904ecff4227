//! The per-file conversion job.
//!
//! A job runs straight-line from EDF open to CFS write: resolve the four
//! requested channels, scale to microvolts, band-pass at the native rate,
//! resample to 100 Hz, extract the feature tensor, then hash, compress
//! and emit the container. Each job is self-contained; failures are
//! returned as typed values and leave no partial output behind.

use crate::channels::{self, ChannelSelection, ResolvedChannel};
use crate::container;
use crate::edf::EdfFile;
use crate::error::{ConvertError, Result};
use crate::features::FeatureExtractor;
use cfs_core::constants::TARGET_RATE;
use cfs_dsp::{BandpassFir, Resampler};
use std::path::{Path, PathBuf};
use tracing::debug;

/// EEG band-pass edges in Hz.
const EEG_BAND: (f64, f64) = (0.3, 45.0);

/// EOG band-pass edges in Hz.
const EOG_BAND: (f64, f64) = (0.3, 12.0);

/// Parameters shared by every job of a run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Label bindings for the four channel roles.
    pub selection: ChannelSelection,
    /// Replace an existing `.cfs` output instead of failing.
    pub overwrite: bool,
}

/// Outcome of a successful conversion.
#[derive(Debug)]
pub struct Conversion {
    /// Path the container was written to.
    pub output: PathBuf,
    /// Number of 30 s epochs in the artifact.
    pub epochs: u16,
    /// Native EEG sample rate of the input.
    pub source_rate: u32,
    /// Per-file diagnostic notes, reported after the batch joins.
    pub notes: Vec<String>,
}

/// Destination path for an input EDF: same stem, `.cfs` extension.
pub fn output_path(input: &Path) -> PathBuf {
    input.with_extension("cfs")
}

/// Convert one EDF file into a CFS artifact.
pub fn convert_file(input: &Path, options: &ConvertOptions) -> Result<Conversion> {
    let output = output_path(input);
    if !options.overwrite && output.exists() {
        return Err(ConvertError::AlreadyConverted(output));
    }

    let mut edf = EdfFile::open(input)?;
    let resolved = channels::resolve(&options.selection, edf.signals())?;
    let mut notes = Vec::new();

    let c3 = extract_microvolts(&mut edf, &resolved.c3)?;
    let c4 = extract_microvolts(&mut edf, &resolved.c4)?;
    let el = extract_microvolts(&mut edf, &resolved.el)?;
    let er = extract_microvolts(&mut edf, &resolved.er)?;

    notes.push(format!(
        "channels C3=#{} C4=#{} EL=#{} ER=#{}",
        resolved.c3.index, resolved.c4.index, resolved.el.index, resolved.er.index
    ));

    // EEG: filter the two central channels independently, then average
    // sample-wise. The filter-then-average order is fixed; it decides
    // the rounding of the downstream tensor.
    let eeg_rate = resolved.c3.sample_rate;
    let eeg_filter = BandpassFir::design(EEG_BAND.0, EEG_BAND.1, eeg_rate)?;
    let c3_filtered = eeg_filter.filter_same(&c3);
    let c4_filtered = eeg_filter.filter_same(&c4);
    let eeg: Vec<f64> = c3_filtered
        .iter()
        .zip(&c4_filtered)
        .map(|(a, b)| (a + b) / 2.0)
        .collect();

    // EOG: one filter per channel; identical rates share coefficients.
    let el_filter = BandpassFir::design(EOG_BAND.0, EOG_BAND.1, resolved.el.sample_rate)?;
    let el_filtered = el_filter.filter_same(&el);
    let er_filtered = if resolved.er.sample_rate == resolved.el.sample_rate {
        el_filter.filter_same(&er)
    } else {
        BandpassFir::design(EOG_BAND.0, EOG_BAND.1, resolved.er.sample_rate)?.filter_same(&er)
    };

    let eeg_resampled = resample_channel(&eeg, eeg_rate, &mut notes, "EEG")?;
    let el_resampled =
        resample_channel(&el_filtered, resolved.el.sample_rate, &mut notes, "EL")?;
    let er_resampled =
        resample_channel(&er_filtered, resolved.er.sample_rate, &mut notes, "ER")?;

    let mut extractor = FeatureExtractor::new()?;
    let tensor = extractor.extract(&eeg_resampled, &el_resampled, &er_resampled)?;

    let epoch_count = FeatureExtractor::epoch_count(eeg_resampled.len());
    let epochs = u16::try_from(epoch_count)
        .map_err(|_| ConvertError::EpochOverflow(epoch_count))?;
    notes.push(format!("{epochs} epochs"));

    let payload = container::payload_bytes(&tensor);
    let bytes = container::encode(&payload, epochs)?;
    container::write_atomic(&output, &bytes)?;

    debug!(
        input = %input.display(),
        epochs,
        payload_len = payload.len(),
        "conversion complete"
    );

    Ok(Conversion {
        output,
        epochs,
        source_rate: eeg_rate,
        notes,
    })
}

/// Pull one resolved channel's samples and scale them to microvolts.
fn extract_microvolts(edf: &mut EdfFile, channel: &ResolvedChannel) -> Result<Vec<f64>> {
    let samples = edf
        .signal_samples(channel.index)
        .map_err(|_| ConvertError::ReadFailure(channel.role))?;

    Ok(samples
        .iter()
        .map(|&s| s as f64 * channel.scale)
        .collect())
}

fn resample_channel(
    samples: &[f64],
    source_rate: u32,
    notes: &mut Vec<String>,
    label: &str,
) -> Result<Vec<f64>> {
    let resampler = Resampler::new(source_rate, TARGET_RATE)?;
    if resampler.is_identity() {
        return Ok(samples.to_vec());
    }

    notes.push(format!("{label}: resampled {source_rate} Hz -> {TARGET_RATE} Hz"));
    Ok(resampler.resample(samples))
}

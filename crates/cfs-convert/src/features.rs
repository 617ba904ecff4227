//! Short-time spectral feature extraction.
//!
//! Each resampled channel is cut into 30 s epochs of 3000 samples; every
//! epoch yields 32 Hamming-windowed 128-point frames at a hop of 90
//! samples (the last start is 2850, so all 32 fit), and each frame keeps
//! the magnitudes of DFT bins 0..31. The result is a dense
//! `[epochs, 3, 32, 32]` tensor in channel order {EEG, EOG-left,
//! EOG-right}, narrowed to f32 at store time.

use crate::error::Result;
use cfs_core::constants::{
    EPOCH_SAMPLES, FREQ_BINS, STFT_HOP, STFT_WINDOW, TENSOR_CHANNELS, TIME_BINS,
};
use cfs_core::{DftProcessor, Window};
use ndarray::Array4;

/// Per-worker feature extractor owning its window and DFT plan.
pub struct FeatureExtractor {
    window: Window,
    dft: DftProcessor,
    frame: Vec<f64>,
    magnitudes: Vec<f64>,
}

impl FeatureExtractor {
    /// Build an extractor with a fresh 128-point plan.
    pub fn new() -> Result<Self> {
        Ok(FeatureExtractor {
            window: Window::hamming(STFT_WINDOW)?,
            dft: DftProcessor::new(STFT_WINDOW)?,
            frame: vec![0.0; STFT_WINDOW],
            magnitudes: vec![0.0; FREQ_BINS],
        })
    }

    /// Number of whole epochs in a resampled EEG channel.
    pub fn epoch_count(eeg_len: usize) -> usize {
        eeg_len / EPOCH_SAMPLES
    }

    /// Extract the feature tensor from the three resampled channels.
    ///
    /// The epoch grid is derived from the EEG channel alone; trailing
    /// samples beyond the last whole epoch are discarded, and frames
    /// reaching past the end of a shorter EOG channel are zero-padded.
    pub fn extract(
        &mut self,
        eeg: &[f64],
        eog_left: &[f64],
        eog_right: &[f64],
    ) -> Result<Array4<f32>> {
        let epochs = Self::epoch_count(eeg.len());
        let mut tensor =
            Array4::<f32>::zeros((epochs, TENSOR_CHANNELS, TIME_BINS, FREQ_BINS));

        for (channel, samples) in [eeg, eog_left, eog_right].into_iter().enumerate() {
            for epoch in 0..epochs {
                let base = epoch * EPOCH_SAMPLES;
                for time_bin in 0..TIME_BINS {
                    let start = base + time_bin * STFT_HOP;

                    for (i, slot) in self.frame.iter_mut().enumerate() {
                        *slot = samples.get(start + i).copied().unwrap_or(0.0);
                    }
                    self.window.apply(&mut self.frame)?;
                    self.dft.magnitudes(&self.frame, &mut self.magnitudes)?;

                    for (freq_bin, &magnitude) in self.magnitudes.iter().enumerate() {
                        tensor[[epoch, channel, time_bin, freq_bin]] = magnitude as f32;
                    }
                }
            }
        }

        Ok(tensor)
    }
}

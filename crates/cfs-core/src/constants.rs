//! Canonical rates and shapes shared across the pipeline.

/// Canonical sample rate every channel is resampled to, in Hz.
pub const TARGET_RATE: u32 = 100;

/// Samples per scoring epoch (30 s at [`TARGET_RATE`]).
pub const EPOCH_SAMPLES: usize = 3000;

/// Short-time DFT window length in samples.
pub const STFT_WINDOW: usize = 128;

/// Hop between successive frame starts within an epoch.
pub const STFT_HOP: usize = 90;

/// Time bins per epoch; the last frame start is `31 * 90 = 2850`,
/// so all 32 frames fit inside one epoch.
pub const TIME_BINS: usize = 32;

/// Frequency bins kept per frame (DC through bin 31).
pub const FREQ_BINS: usize = 32;

/// Channels in the feature tensor: EEG, left EOG, right EOG.
pub const TENSOR_CHANNELS: usize = 3;

/// Order of the band-pass FIR filters (tap count is order + 1).
pub const FIR_ORDER: usize = 50;

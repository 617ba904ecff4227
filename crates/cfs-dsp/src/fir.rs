//! Linear-phase band-pass FIR design and "same" convolution.
//!
//! The filter is a windowed-ideal design: the difference of two ideal
//! low-pass impulse responses, shaped by a symmetric Hamming window.
//! The taps are deliberately not renormalised after windowing; the
//! resulting gain is part of the artifact format.

use crate::{DspError, Result};
use cfs_core::constants::FIR_ORDER;
use cfs_core::Window;
use std::f64::consts::PI;

/// A fixed band-pass FIR filter at a given sample rate.
pub struct BandpassFir {
    taps: Vec<f64>,
    sample_rate: u32,
}

impl BandpassFir {
    /// Design a 51-tap band-pass for the pass band `low_hz..high_hz`.
    ///
    /// For tap index `i` in `0..=50`:
    /// `h[i] = w[i] * (fh*sinc(fh*(i - 25)) - fl*sinc(fl*(i - 25)))`
    /// where `fl = 2*low/fs`, `fh = 2*high/fs` and `w` is the Hamming
    /// window.
    pub fn design(low_hz: f64, high_hz: f64, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(DspError::ZeroRate);
        }
        let nyquist = sample_rate as f64 / 2.0;
        if !(low_hz > 0.0 && low_hz < high_hz && high_hz < nyquist) {
            return Err(DspError::InvalidBand {
                low: low_hz,
                high: high_hz,
                rate: sample_rate,
            });
        }

        let fl = 2.0 * low_hz / sample_rate as f64;
        let fh = 2.0 * high_hz / sample_rate as f64;
        let centre = FIR_ORDER as f64 / 2.0;

        let window = Window::hamming(FIR_ORDER + 1)?;

        let taps = window
            .coefficients()
            .iter()
            .enumerate()
            .map(|(i, &w)| {
                let x = i as f64 - centre;
                w * (fh * sinc(fh * x) - fl * sinc(fl * x))
            })
            .collect();

        Ok(BandpassFir { taps, sample_rate })
    }

    /// Apply the filter in "same" mode: output length equals input
    /// length, centre-aligned so that `y[k]` lines up with `x[k]` after
    /// the filter's group delay, zero-padded at the edges.
    pub fn filter_same(&self, input: &[f64]) -> Vec<f64> {
        convolve_same(&self.taps, input)
    }

    /// The designed taps.
    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    /// Sample rate the filter was designed for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// `sin(pi*x) / (pi*x)` with the removable singularity at zero.
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}

/// Centred "same" convolution: `y[k] = sum_i h[i] * x[k + H/2 - i]`,
/// treating out-of-range input as zero. `H/2` is the group delay of a
/// linear-phase kernel of odd length `H+1`.
pub(crate) fn convolve_same(taps: &[f64], input: &[f64]) -> Vec<f64> {
    let delay = taps.len() / 2;
    let mut output = vec![0.0; input.len()];

    for (k, slot) in output.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (i, &h) in taps.iter().enumerate() {
            let j = k + delay;
            if j >= i && j - i < input.len() {
                acc += h * input[j - i];
            }
        }
        *slot = acc;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Magnitude of the filter's frequency response at `freq_hz`.
    fn response_at(filter: &BandpassFir, freq_hz: f64) -> f64 {
        let omega = 2.0 * PI * freq_hz / filter.sample_rate() as f64;
        let (mut re, mut im) = (0.0, 0.0);
        for (i, &h) in filter.taps().iter().enumerate() {
            re += h * (omega * i as f64).cos();
            im -= h * (omega * i as f64).sin();
        }
        (re * re + im * im).sqrt()
    }

    #[test]
    fn test_design_has_51_taps() {
        let filter = BandpassFir::design(0.3, 45.0, 200).unwrap();
        assert_eq!(filter.taps().len(), 51);
    }

    #[test]
    fn test_taps_are_symmetric() {
        // Linear phase requires h[i] == h[50 - i].
        let filter = BandpassFir::design(0.3, 12.0, 256).unwrap();
        let taps = filter.taps();
        for i in 0..25 {
            assert_relative_eq!(taps[i], taps[50 - i], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_passband_vs_stopband() {
        let filter = BandpassFir::design(0.3, 45.0, 200).unwrap();

        let pass = response_at(&filter, 10.0);
        let stop = response_at(&filter, 90.0);

        assert!(pass > 0.8, "10 Hz should pass, |H| = {pass}");
        assert!(stop < 0.05, "90 Hz should be rejected, |H| = {stop}");
    }

    #[test]
    fn test_rejects_bad_bands() {
        assert!(BandpassFir::design(0.0, 45.0, 200).is_err());
        assert!(BandpassFir::design(45.0, 0.3, 200).is_err());
        assert!(BandpassFir::design(0.3, 120.0, 200).is_err());
        assert!(BandpassFir::design(0.3, 45.0, 0).is_err());
    }

    #[test]
    fn test_convolve_same_identity() {
        // A centred unit impulse kernel is the identity in "same" mode.
        let mut kernel = vec![0.0; 51];
        kernel[25] = 1.0;
        let input: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();

        let output = convolve_same(&kernel, &input);

        assert_eq!(output.len(), input.len());
        for (a, b) in input.iter().zip(&output) {
            assert_relative_eq!(a, b, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_convolve_same_shift() {
        // A kernel with its impulse one right of centre delays by one.
        let mut kernel = vec![0.0; 51];
        kernel[26] = 1.0;
        let input: Vec<f64> = (1..=10).map(|i| i as f64).collect();

        let output = convolve_same(&kernel, &input);

        assert_relative_eq!(output[0], 0.0, epsilon = 1e-14);
        for k in 1..10 {
            assert_relative_eq!(output[k], input[k - 1], epsilon = 1e-14);
        }
    }

    #[test]
    fn test_filter_preserves_length() {
        let filter = BandpassFir::design(0.3, 12.0, 200).unwrap();
        for len in [0usize, 1, 50, 51, 1000] {
            let input = vec![1.0; len];
            assert_eq!(filter.filter_same(&input).len(), len);
        }
    }
}

//! Rational-ratio polyphase resampling to the canonical rate.
//!
//! Resampling by `up/down` is upsampling by `up`, low-pass filtering at
//! the lower of the two Nyquist frequencies, then keeping every
//! `down`-th sample. The polyphase evaluation never materialises the
//! upsampled stream; only the requested output samples are computed.
//!
//! The kernel is fixed so the output is reproducible: a Blackman-windowed
//! sinc prototype of length `2*10*max(up, down) + 1`, cutoff at the lower
//! Nyquist, normalised to unity DC gain and centred so that output sample
//! 0 is aligned with input sample 0. All arithmetic is f64.

use crate::{DspError, Result};
use std::f64::consts::PI;

/// Sinc zero crossings kept on each side of the prototype centre,
/// per polyphase branch.
const HALF_WIDTH: usize = 10;

/// A fixed-ratio resampler between two integer sample rates.
pub struct Resampler {
    up: usize,
    down: usize,
    taps: Vec<f64>,
}

impl Resampler {
    /// Build a resampler from `source_rate` to `target_rate`.
    ///
    /// Equal rates produce an identity stage that passes input through
    /// unchanged.
    pub fn new(source_rate: u32, target_rate: u32) -> Result<Self> {
        if source_rate == 0 || target_rate == 0 {
            return Err(DspError::ZeroRate);
        }

        let g = gcd(source_rate as usize, target_rate as usize);
        let up = target_rate as usize / g;
        let down = source_rate as usize / g;

        let taps = if up == 1 && down == 1 {
            Vec::new()
        } else {
            design_lowpass(up.max(down))
        };

        Ok(Resampler { up, down, taps })
    }

    /// Whether this stage passes samples through unchanged.
    pub fn is_identity(&self) -> bool {
        self.up == 1 && self.down == 1
    }

    /// Output length for an input of `input_len` samples:
    /// `round(input_len * target / source)`.
    pub fn output_len(&self, input_len: usize) -> usize {
        (input_len * self.up + self.down / 2) / self.down
    }

    /// Resample a channel. The identity stage returns a copy.
    pub fn resample(&self, input: &[f64]) -> Vec<f64> {
        if self.is_identity() {
            return input.to_vec();
        }

        let out_len = self.output_len(input.len());
        let taps_len = self.taps.len();
        let centre = (taps_len - 1) / 2;
        let mut output = Vec::with_capacity(out_len);

        for m in 0..out_len {
            // Position of this output sample in the upsampled stream,
            // shifted by the prototype centre for zero group delay.
            let pos = m * self.down + centre;

            let lo = (pos + 1).saturating_sub(taps_len);
            let j_min = (lo + self.up - 1) / self.up;
            let j_max = (pos / self.up).min(input.len() - 1);

            let mut acc = 0.0;
            for (j, &sample) in input
                .iter()
                .enumerate()
                .take(j_max + 1)
                .skip(j_min)
            {
                acc += self.taps[pos - j * self.up] * sample;
            }

            output.push(acc * self.up as f64);
        }

        output
    }
}

/// Blackman-windowed sinc low-pass with cutoff `1/branches` of the
/// upsampled Nyquist, normalised to unity DC gain.
fn design_lowpass(branches: usize) -> Vec<f64> {
    let num_taps = 2 * HALF_WIDTH * branches + 1;
    let m = (num_taps - 1) as f64;
    let cutoff = 1.0 / branches as f64;

    let mut taps: Vec<f64> = (0..num_taps)
        .map(|n| {
            let x = n as f64 - m / 2.0;
            let sinc = if x == 0.0 {
                cutoff
            } else {
                (PI * cutoff * x).sin() / (PI * x)
            };
            let phase = 2.0 * PI * n as f64 / m;
            let window = 0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos();
            sinc * window
        })
        .collect();

    let sum: f64 = taps.iter().sum();
    for tap in taps.iter_mut() {
        *tap /= sum;
    }

    taps
}

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_identity_passthrough() {
        let resampler = Resampler::new(100, 100).unwrap();
        assert!(resampler.is_identity());

        let input: Vec<f64> = (0..500).map(|i| (i as f64 * 0.1).sin()).collect();
        let output = resampler.resample(&input);
        assert_eq!(output, input);
    }

    #[test]
    fn test_output_length_rounds() {
        // 200 -> 100 halves, 256 -> 100 is 25/64.
        let halving = Resampler::new(200, 100).unwrap();
        assert_eq!(halving.output_len(60_000), 30_000);

        let from_256 = Resampler::new(256, 100).unwrap();
        assert_eq!(from_256.output_len(2_560), 1_000);

        // round(1000 * 100 / 512) = round(195.3) = 195
        let from_512 = Resampler::new(512, 100).unwrap();
        assert_eq!(from_512.output_len(1_000), 195);
    }

    #[test]
    fn test_dc_gain_is_unity() {
        let resampler = Resampler::new(200, 100).unwrap();
        let input = vec![1.0; 2_000];
        let output = resampler.resample(&input);

        for &y in &output[100..output.len() - 100] {
            assert_relative_eq!(y, 1.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_sine_survives_halving() {
        // 5 Hz at 200 Hz resampled to 100 Hz should match the analytic
        // 5 Hz sine at 100 Hz away from the edges.
        let input: Vec<f64> = (0..4_000)
            .map(|i| (2.0 * PI * 5.0 * i as f64 / 200.0).sin())
            .collect();
        let resampler = Resampler::new(200, 100).unwrap();
        let output = resampler.resample(&input);

        for (m, &y) in output.iter().enumerate().skip(100).take(output.len() - 200) {
            let expected = (2.0 * PI * 5.0 * m as f64 / 100.0).sin();
            assert_relative_eq!(y, expected, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_empty_input() {
        let resampler = Resampler::new(256, 100).unwrap();
        assert!(resampler.resample(&[]).is_empty());
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(Resampler::new(0, 100).is_err());
        assert!(Resampler::new(200, 0).is_err());
    }

    proptest! {
        #[test]
        fn prop_output_length_matches_formula(
            rate in prop::sample::select(vec![100u32, 128, 200, 250, 256, 500, 512]),
            len in 0usize..10_000,
        ) {
            let resampler = Resampler::new(rate, 100).unwrap();
            let input = vec![0.5; len];
            let output = resampler.resample(&input);
            let expected =
                ((len as f64 * 100.0 / rate as f64) + 0.5).floor() as usize;
            prop_assert_eq!(output.len(), expected);
        }

        #[test]
        fn prop_resampling_is_deterministic(
            rate in prop::sample::select(vec![128u32, 200, 256]),
            seed in 0u64..1_000,
        ) {
            let input: Vec<f64> = (0..2_000)
                .map(|i| ((i as u64 + seed) as f64 * 0.37).sin())
                .collect();
            let resampler = Resampler::new(rate, 100).unwrap();
            let first = resampler.resample(&input);
            let second = resampler.resample(&input);
            prop_assert_eq!(first, second);
        }
    }
}

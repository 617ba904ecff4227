//! Forward DFT processor for real-valued frames.
//!
//! Wraps a single fixed-size rustfft plan. Each worker owns its own
//! processor; the plan setup cost is amortised over the thousands of
//! frames a recording produces.

use crate::{CoreError, Result};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Computes magnitudes of the leading bins of a real-to-complex DFT.
pub struct DftProcessor {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
    scratch: Vec<Complex64>,
}

impl DftProcessor {
    /// Plan a forward DFT of the given power-of-two size.
    pub fn new(size: usize) -> Result<Self> {
        if !size.is_power_of_two() {
            return Err(CoreError::InvalidDftSize(size));
        }

        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let scratch_len = forward.get_inplace_scratch_len();

        Ok(DftProcessor {
            size,
            forward,
            buffer: vec![Complex64::new(0.0, 0.0); size],
            scratch: vec![Complex64::new(0.0, 0.0); scratch_len],
        })
    }

    /// Transform a real frame and write `out.len()` bin magnitudes,
    /// starting at DC.
    pub fn magnitudes(&mut self, frame: &[f64], out: &mut [f64]) -> Result<()> {
        if frame.len() != self.size {
            return Err(CoreError::FrameSizeMismatch {
                frame: frame.len(),
                size: self.size,
            });
        }
        if out.len() > self.size {
            return Err(CoreError::TooManyBins {
                requested: out.len(),
                size: self.size,
            });
        }

        for (slot, &sample) in self.buffer.iter_mut().zip(frame) {
            *slot = Complex64::new(sample, 0.0);
        }

        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (slot, bin) in out.iter_mut().zip(&self.buffer) {
            *slot = bin.norm();
        }

        Ok(())
    }

    /// Size the plan was built for.
    pub fn size(&self) -> usize {
        self.size
    }
}

#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Core DSP primitives for CFS-RS
//!
//! Everything downstream of the EDF reader is built on these: the shared
//! pipeline constants, the Hamming window, and the fixed-size forward DFT
//! used by the feature extractor. All arithmetic is f64; narrowing to f32
//! happens only when the feature tensor is stored.

pub mod constants;
pub mod dft;
pub mod errors;
pub mod window;

pub use dft::DftProcessor;
pub use errors::{CoreError, Result};
pub use window::Window;

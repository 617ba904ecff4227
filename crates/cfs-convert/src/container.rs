//! CFS container assembly and atomic emission.
//!
//! The container is a fixed 31-byte header followed by a DEFLATE (zlib)
//! stream of the little-endian f32 payload. Every multi-byte field goes
//! through `to_le_bytes`, so the disk image is identical on any host.
//!
//! Layout:
//!
//! | offset | size | field |
//! |---|---|---|
//! | 0  | 3  | signature "CFS" |
//! | 3  | 1  | version (1) |
//! | 4  | 1  | n_freq (32) |
//! | 5  | 1  | n_times (32) |
//! | 6  | 1  | n_channels (3) |
//! | 7  | 2  | n_epochs, u16 LE |
//! | 9  | 1  | compression flag (1) |
//! | 10 | 1  | hash flag (1) |
//! | 11 | 20 | SHA-1 of the uncompressed payload |
//! | 31 | *  | DEFLATE stream |

use crate::error::{ConvertError, Result};
use cfs_core::constants::{FREQ_BINS, TENSOR_CHANNELS, TIME_BINS};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use ndarray::Array4;
use sha1::{Digest, Sha1};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Container signature bytes.
pub const CFS_SIGNATURE: &[u8; 3] = b"CFS";

/// Container format version emitted by this writer.
pub const CFS_VERSION: u8 = 1;

/// Size of the fixed header in bytes.
pub const CFS_HEADER_LEN: usize = 31;

/// Serialise the feature tensor to its little-endian f32 byte image in
/// epoch, channel, time, frequency order.
pub fn payload_bytes(tensor: &Array4<f32>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(tensor.len() * 4);
    for &value in tensor.iter() {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Assemble the complete CFS byte stream for a payload image.
pub fn encode(payload: &[u8], epochs: u16) -> Result<Vec<u8>> {
    let digest: [u8; 20] = Sha1::digest(payload).into();
    let compressed = deflate(payload)?;

    let mut out = Vec::with_capacity(CFS_HEADER_LEN + compressed.len());
    out.extend_from_slice(CFS_SIGNATURE);
    out.push(CFS_VERSION);
    out.push(FREQ_BINS as u8);
    out.push(TIME_BINS as u8);
    out.push(TENSOR_CHANNELS as u8);
    out.extend_from_slice(&epochs.to_le_bytes());
    out.push(1); // compression flag
    out.push(1); // hash flag
    out.extend_from_slice(&digest);
    out.extend_from_slice(&compressed);

    Ok(out)
}

/// Worst-case DEFLATE output size for an input of `len` bytes.
pub fn deflate_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

fn deflate(payload: &[u8]) -> Result<Vec<u8>> {
    let bound = deflate_bound(payload.len());

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(bound)
        .map_err(|_| ConvertError::OutOfMemory)?;

    let mut encoder = ZlibEncoder::new(buffer, Compression::default());
    encoder
        .write_all(payload)
        .map_err(|e| compression_error(&e))?;
    let compressed = encoder.finish().map_err(|e| compression_error(&e))?;

    if compressed.len() > bound {
        return Err(ConvertError::BufferTooSmall);
    }

    Ok(compressed)
}

fn compression_error(error: &std::io::Error) -> ConvertError {
    if error.kind() == std::io::ErrorKind::OutOfMemory {
        ConvertError::OutOfMemory
    } else {
        ConvertError::BufferTooSmall
    }
}

/// Write the container atomically: emit to a temporary sibling and
/// rename into place, so a crash mid-write never leaves a truncated
/// artifact. A failed write removes the temporary file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("cfs.tmp");

    let write_result = fs::write(&tmp, bytes);
    if write_result.is_err() {
        let _ = fs::remove_file(&tmp);
        return Err(ConvertError::WriteFailure(path.to_path_buf()));
    }

    if fs::rename(&tmp, path).is_err() {
        let _ = fs::remove_file(&tmp);
        return Err(ConvertError::WriteFailure(path.to_path_buf()));
    }

    Ok(())
}

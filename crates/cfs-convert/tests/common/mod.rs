//! Test support: a minimal EDF builder and a CFS parser.
//!
//! The builder writes standard EDF: a 256-byte fixed header, 256 bytes
//! of per-signal header fields, then 16-bit little-endian data records.
//! Digital and physical ranges are both -32768..32767, so the reader's
//! digital-to-physical mapping is the identity and integer-valued test
//! signals survive the trip exactly.

use std::fs;
use std::io;
use std::path::Path;

/// One signal to place in a synthetic EDF.
pub struct TestSignal {
    pub label: String,
    pub unit: String,
    pub samples_per_record: usize,
    pub physical: Vec<f64>,
}

impl TestSignal {
    /// A sine of `amplitude` at `freq_hz`, sampled at `rate` Hz for
    /// `seconds` whole one-second records, rounded to integer values.
    pub fn sine(label: &str, unit: &str, rate: usize, seconds: usize, freq_hz: f64, amplitude: f64) -> Self {
        let physical = (0..rate * seconds)
            .map(|i| {
                (amplitude * (2.0 * std::f64::consts::PI * freq_hz * i as f64 / rate as f64).sin())
                    .round()
            })
            .collect();
        TestSignal {
            label: label.to_string(),
            unit: unit.to_string(),
            samples_per_record: rate,
            physical,
        }
    }
}

fn push_field(out: &mut Vec<u8>, value: &str, width: usize) {
    let bytes = value.as_bytes();
    let take = bytes.len().min(width);
    out.extend_from_slice(&bytes[..take]);
    out.resize(out.len() + width - take, b' ');
}

/// Write a synthetic EDF with one-second data records.
pub fn write_edf(path: &Path, signals: &[TestSignal], records: usize) -> io::Result<()> {
    let n = signals.len();
    let mut out = Vec::new();

    push_field(&mut out, "0", 8);
    push_field(&mut out, "X X X X", 80);
    push_field(&mut out, "Startdate 01-JAN-2025 X X X", 80);
    push_field(&mut out, "01.01.25", 8);
    push_field(&mut out, "00.00.00", 8);
    push_field(&mut out, &(256 + n * 256).to_string(), 8);
    push_field(&mut out, "", 44);
    push_field(&mut out, &records.to_string(), 8);
    push_field(&mut out, "1", 8);
    push_field(&mut out, &n.to_string(), 4);

    for s in signals {
        push_field(&mut out, &s.label, 16);
    }
    for _ in signals {
        push_field(&mut out, "AgAgCl electrode", 80);
    }
    for s in signals {
        push_field(&mut out, &s.unit, 8);
    }
    for _ in signals {
        push_field(&mut out, "-32768", 8);
    }
    for _ in signals {
        push_field(&mut out, "32767", 8);
    }
    for _ in signals {
        push_field(&mut out, "-32768", 8);
    }
    for _ in signals {
        push_field(&mut out, "32767", 8);
    }
    for _ in signals {
        push_field(&mut out, "HP:0.1Hz LP:75Hz", 80);
    }
    for s in signals {
        push_field(&mut out, &s.samples_per_record.to_string(), 8);
    }
    for _ in signals {
        push_field(&mut out, "", 32);
    }

    for record in 0..records {
        for s in signals {
            for k in 0..s.samples_per_record {
                let i = record * s.samples_per_record + k;
                let value = s.physical.get(i).copied().unwrap_or(0.0);
                let digital = value.round().clamp(-32768.0, 32767.0) as i16;
                out.extend_from_slice(&digital.to_le_bytes());
            }
        }
    }

    fs::write(path, out)
}

/// Parsed CFS container.
pub struct ParsedCfs {
    pub version: u8,
    pub n_freq: u8,
    pub n_times: u8,
    pub n_channels: u8,
    pub n_epochs: u16,
    pub compression: u8,
    pub hash: u8,
    pub sha1: [u8; 20],
    pub payload: Vec<u8>,
}

/// Parse a CFS file and inflate its payload.
pub fn parse_cfs(path: &Path) -> ParsedCfs {
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    let bytes = fs::read(path).unwrap();
    assert!(bytes.len() >= 31, "CFS shorter than its header");
    assert_eq!(&bytes[0..3], b"CFS", "bad signature");

    let mut sha1 = [0u8; 20];
    sha1.copy_from_slice(&bytes[11..31]);

    let mut payload = Vec::new();
    ZlibDecoder::new(&bytes[31..])
        .read_to_end(&mut payload)
        .unwrap();

    ParsedCfs {
        version: bytes[3],
        n_freq: bytes[4],
        n_times: bytes[5],
        n_channels: bytes[6],
        n_epochs: u16::from_le_bytes([bytes[7], bytes[8]]),
        compression: bytes[9],
        hash: bytes[10],
        sha1,
        payload,
    }
}

/// Reinterpret an inflated payload as little-endian f32 values.
pub fn payload_floats(payload: &[u8]) -> Vec<f32> {
    payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

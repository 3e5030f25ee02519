//! Byte-oriented run-length coding.
//!
//! A compressed frame is a sequence of `(count, value)` pairs with
//! `count` in `1..=255`. Longer runs are split into `(255, value)` pairs
//! followed by the remainder. Incompressible data doubles in size.

use alloc::{vec, vec::Vec};

pub const MAX_RUN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RleError {
    /// Odd stream length, or a pair with a zero count at `offset`.
    MalformedRun { offset: usize },
    LengthMismatch { expected: usize, actual: usize },
}

impl core::fmt::Display for RleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RleError::MalformedRun { offset } => write!(f, "malformed run at offset {offset}"),
            RleError::LengthMismatch { expected, actual } => {
                write!(f, "decoded {actual} bytes, expected {expected}")
            }
        }
    }
}

impl core::error::Error for RleError {}

type Result<T> = core::result::Result<T, RleError>;

/// Iterator over the `(count, value)` pairs of a frame, greedy left to right.
pub struct Runs<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Iterator for Runs<'_> {
    type Item = (u8, u8);

    fn next(&mut self) -> Option<Self::Item> {
        let value = *self.data.get(self.pos)?;
        let count = self.data[self.pos..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == value)
            .count();
        self.pos += count;
        Some((count as u8, value))
    }
}

pub fn runs(frame: &[u8]) -> Runs<'_> {
    Runs {
        data: frame,
        pos: 0,
    }
}

/// Size of `compress(frame)` without building it.
pub fn compressed_len(frame: &[u8]) -> usize {
    runs(frame).count() * 2
}

pub fn compress(frame: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(compressed_len(frame));
    for (count, value) in runs(frame) {
        out.push(count);
        out.push(value);
    }
    out
}

/// Length `compressed` expands to, validating every pair.
pub fn decoded_len(compressed: &[u8]) -> Result<usize> {
    if compressed.len() % 2 != 0 {
        return Err(RleError::MalformedRun {
            offset: compressed.len() - 1,
        });
    }
    compressed
        .chunks_exact(2)
        .enumerate()
        .try_fold(0usize, |total, (i, pair)| match pair[0] {
            0 => Err(RleError::MalformedRun { offset: i * 2 }),
            count => Ok(total + count as usize),
        })
}

pub fn decompress(compressed: &[u8], expected_len: usize) -> Result<Vec<u8>> {
    let mut out = vec![0u8; expected_len];
    decompress_into(compressed, &mut out)?;
    Ok(out)
}

/// Decompresses into `out`, which must be exactly the frame length.
///
/// Every pair is totalled, but bytes beyond `out.len()` are dropped, so a
/// corrupt count can never write out of bounds.
pub fn decompress_into(compressed: &[u8], out: &mut [u8]) -> Result<()> {
    if compressed.len() % 2 != 0 {
        return Err(RleError::MalformedRun {
            offset: compressed.len() - 1,
        });
    }

    let mut total = 0usize;
    for (i, pair) in compressed.chunks_exact(2).enumerate() {
        let (count, value) = (pair[0] as usize, pair[1]);
        if count == 0 {
            return Err(RleError::MalformedRun { offset: i * 2 });
        }
        let start = total.min(out.len());
        let end = (total + count).min(out.len());
        out[start..end].fill(value);
        total += count;
    }

    if total != out.len() {
        trace!("rle: decoded {} bytes into a {} byte frame", total, out.len());
        return Err(RleError::LengthMismatch {
            expected: out.len(),
            actual: total,
        });
    }
    Ok(())
}

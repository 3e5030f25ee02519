//! Splits a long capture into clips at scene changes.

use alloc::vec::Vec;
use core::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    EmptyInput,
    /// Negative or NaN threshold.
    InvalidThreshold,
}

impl core::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SegmentError::EmptyInput => write!(f, "no frames to segment"),
            SegmentError::InvalidThreshold => write!(f, "threshold must be a non-negative number"),
        }
    }
}

impl core::error::Error for SegmentError {}

/// A contiguous run of frame indices, `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub start: usize,
    pub end: usize,
}

impl Clip {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn first(&self) -> usize {
        self.start
    }

    pub fn last(&self) -> usize {
        self.end - 1
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// The items of `all` covered by this clip.
    pub fn select<'a, T>(&self, all: &'a [T]) -> &'a [T] {
        &all[self.range()]
    }

    pub fn duration_ms(&self, fps: u16) -> u32 {
        (self.len() as u64 * 1000 / fps.max(1) as u64) as u32
    }
}

/// Mean absolute per-byte difference. Buffers of different length are
/// incomparable and infinitely far apart.
pub fn distance(a: &[u8], b: &[u8]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    if a.is_empty() {
        return 0.0;
    }
    let sum: u64 = a.iter().zip(b).map(|(&x, &y)| x.abs_diff(y) as u64).sum();
    sum as f64 / a.len() as f64
}

/// Starts a new clip wherever a frame is more than `threshold` away from
/// its predecessor.
pub fn segment<F: AsRef<[u8]>>(frames: &[F], threshold: f64) -> Result<Vec<Clip>, SegmentError> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(SegmentError::InvalidThreshold);
    }
    if frames.is_empty() {
        return Err(SegmentError::EmptyInput);
    }

    let mut clips = Vec::new();
    let mut start = 0;
    for (index, pair) in frames.windows(2).enumerate() {
        let diff = distance(pair[0].as_ref(), pair[1].as_ref());
        if diff > threshold {
            trace!("segment: cut before frame {} (distance {})", index + 1, diff);
            clips.push(Clip {
                start,
                end: index + 1,
            });
            start = index + 1;
        }
    }
    clips.push(Clip {
        start,
        end: frames.len(),
    });

    debug!("segment: {} frames into {} clips", frames.len(), clips.len());
    Ok(clips)
}

/*!
A no_std codec and container for monochrome OLED animations.

## Features
- no_std, needs `alloc`
- byte-oriented RLE tuned for sparse 1-bit frames
- fixed-stride `.anim` container with random access to any frame
- similarity based segmentation of long captures into clips

## Usage
```
# use oledanim_core::{container, FrameFormat};
# fn main() -> Result<(), oledanim_core::Error> {
let format = FrameFormat::default();
let frames = [vec![0u8; format.frame_len()], vec![0xFF; format.frame_len()]];
let blob = container::encode(&frames, 10)?;
let frame = container::decode_frame(&blob, 1, format.frame_len())?;
assert_eq!(frame, frames[1]);
# Ok(())
# }
```
*/

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::trace!($($arg)*);
    };
}

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "log")]
        log::debug!($($arg)*);
    };
}

pub mod bitmap;
pub mod container;
pub mod manifest;
pub mod rle;
pub mod segment;

#[cfg(test)]
mod tests;

pub use bitmap::{Addressing, BitmapError, FrameFormat, PixelGrid};
pub use container::{AnimReader, AnimationHeader, Container, ContainerError};
pub use manifest::{Manifest, ManifestEntry, ManifestError};
pub use rle::RleError;
pub use segment::{Clip, SegmentError};

pub const DEFAULT_WIDTH: usize = 128;
pub const DEFAULT_HEIGHT: usize = 64;
pub const DEFAULT_FPS: u16 = 10;
/// Mean per-byte difference above which two neighbouring frames belong to different clips.
pub const DEFAULT_THRESHOLD: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Bitmap(BitmapError),
    Rle(RleError),
    Container(ContainerError),
    Segment(SegmentError),
    Manifest(ManifestError),
}

pub type Result<T> = core::result::Result<T, Error>;

impl From<BitmapError> for Error {
    fn from(err: BitmapError) -> Self {
        Error::Bitmap(err)
    }
}

impl From<RleError> for Error {
    fn from(err: RleError) -> Self {
        Error::Rle(err)
    }
}

impl From<ContainerError> for Error {
    fn from(err: ContainerError) -> Self {
        Error::Container(err)
    }
}

impl From<SegmentError> for Error {
    fn from(err: SegmentError) -> Self {
        Error::Segment(err)
    }
}

impl From<ManifestError> for Error {
    fn from(err: ManifestError) -> Self {
        Error::Manifest(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bitmap(err) => write!(f, "bitmap: {err}"),
            Error::Rle(err) => write!(f, "rle: {err}"),
            Error::Container(err) => write!(f, "container: {err}"),
            Error::Segment(err) => write!(f, "segment: {err}"),
            Error::Manifest(err) => write!(f, "manifest: {err}"),
        }
    }
}

impl core::error::Error for Error {}

//! The `.anim` container.
//!
//! ```text
//! offset 0                    AnimationHeader (12 bytes)
//! offset 12                   frame_count x u16 compressed sizes
//! offset 12 + 2*frame_count   frame_count slots of max_compressed_size bytes
//! ```
//!
//! Each slot holds one RLE frame followed by zero padding, so slot `i`
//! starts at a fixed offset and can be read without touching the others.
//! All integers are little-endian.

use alloc::{vec, vec::Vec};
use embedded_io::{Read, Seek, SeekFrom, Write};
use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, byteorder::little_endian::U16,
};

use crate::rle::{self, RleError};

pub const HEADER_SIZE: usize = 12;
const SIZE_ENTRY: usize = core::mem::size_of::<U16>();

/// Fixed 12 byte header at offset 0.
///
/// `reserved` is written as zeros and never inspected when reading, so a
/// later writer may put data there without breaking existing readers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
pub struct AnimationHeader {
    pub frame_count: U16,
    pub fps: U16,
    pub max_compressed_size: U16,
    pub reserved: [u8; 6],
}

const _: () = assert!(core::mem::size_of::<AnimationHeader>() == HEADER_SIZE);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerError {
    EmptyAnimation,
    InconsistentFrameSize {
        index: usize,
        expected: usize,
        actual: usize,
    },
    IndexOutOfRange {
        index: usize,
        frame_count: usize,
    },
    InvalidFps,
    /// Frame count or compressed size does not fit the u16 fields.
    TooLarge,
    Truncated,
    CorruptSizeTable {
        index: usize,
    },
    Rle(RleError),
    IoError(embedded_io::ErrorKind),
}

impl ContainerError {
    pub(crate) fn from_io_error(error: impl embedded_io::Error) -> Self {
        ContainerError::IoError(error.kind())
    }

    pub(crate) fn from_read_exact_error<E: embedded_io::Error>(
        error: embedded_io::ReadExactError<E>,
    ) -> Self {
        match error {
            embedded_io::ReadExactError::UnexpectedEof => ContainerError::Truncated,
            embedded_io::ReadExactError::Other(e) => ContainerError::from_io_error(e),
        }
    }
}

impl From<RleError> for ContainerError {
    fn from(err: RleError) -> Self {
        ContainerError::Rle(err)
    }
}

impl core::fmt::Display for ContainerError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use ContainerError::*;
        match self {
            EmptyAnimation => write!(f, "animation has no frames"),
            InconsistentFrameSize {
                index,
                expected,
                actual,
            } => write!(f, "frame {index} is {actual} bytes, expected {expected}"),
            IndexOutOfRange { index, frame_count } => {
                write!(f, "frame {index} out of range ({frame_count} frames)")
            }
            InvalidFps => write!(f, "fps must be non-zero"),
            TooLarge => write!(f, "animation does not fit the u16 header fields"),
            Truncated => write!(f, "container is truncated"),
            CorruptSizeTable { index } => write!(f, "size of frame {index} exceeds the slot"),
            Rle(err) => write!(f, "{err}"),
            IoError(kind) => write!(f, "io error: {kind:?}"),
        }
    }
}

impl core::error::Error for ContainerError {}

impl embedded_io::Error for ContainerError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            ContainerError::IoError(kind) => *kind,
            ContainerError::IndexOutOfRange { .. } => embedded_io::ErrorKind::InvalidInput,
            ContainerError::EmptyAnimation
            | ContainerError::InconsistentFrameSize { .. }
            | ContainerError::InvalidFps
            | ContainerError::TooLarge => embedded_io::ErrorKind::InvalidInput,
            ContainerError::Truncated
            | ContainerError::CorruptSizeTable { .. }
            | ContainerError::Rle(_) => embedded_io::ErrorKind::InvalidData,
        }
    }
}

type Result<T> = core::result::Result<T, ContainerError>;

impl AnimationHeader {
    pub fn new(frame_count: u16, fps: u16, max_compressed_size: u16) -> Self {
        Self {
            frame_count: U16::new(frame_count),
            fps: U16::new(fps),
            max_compressed_size: U16::new(max_compressed_size),
            reserved: [0u8; 6],
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header_bytes = bytes.get(..HEADER_SIZE).ok_or(ContainerError::Truncated)?;
        let header =
            Self::read_from_bytes(header_bytes).map_err(|_| ContainerError::Truncated)?;
        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<()> {
        if self.frame_count.get() == 0 {
            return Err(ContainerError::EmptyAnimation);
        }
        if self.fps.get() == 0 {
            return Err(ContainerError::InvalidFps);
        }
        Ok(())
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count.get() as usize
    }

    pub fn fps(&self) -> u16 {
        self.fps.get()
    }

    pub fn max_compressed_size(&self) -> usize {
        self.max_compressed_size.get() as usize
    }

    pub fn frame_delay_ms(&self) -> u32 {
        1000 / self.fps().max(1) as u32
    }

    pub fn table_offset(&self) -> usize {
        HEADER_SIZE
    }

    pub fn data_offset(&self) -> usize {
        HEADER_SIZE + self.frame_count() * SIZE_ENTRY
    }

    pub fn slot_offset(&self, index: usize) -> usize {
        self.data_offset() + index * self.max_compressed_size()
    }

    /// Total size of a container with this header.
    pub fn container_size(&self) -> usize {
        self.slot_offset(self.frame_count())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.frame_count() {
            return Err(ContainerError::IndexOutOfRange {
                index,
                frame_count: self.frame_count(),
            });
        }
        Ok(())
    }
}

/// Compresses `frames` and lays them out as a container.
pub fn encode<F: AsRef<[u8]>>(frames: &[F], fps: u16) -> Result<Vec<u8>> {
    let Some(first) = frames.first() else {
        return Err(ContainerError::EmptyAnimation);
    };
    if fps == 0 {
        return Err(ContainerError::InvalidFps);
    }
    let frame_count = u16::try_from(frames.len()).map_err(|_| ContainerError::TooLarge)?;
    let frame_len = first.as_ref().len();

    let compressed = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let frame = frame.as_ref();
            if frame.len() != frame_len {
                return Err(ContainerError::InconsistentFrameSize {
                    index,
                    expected: frame_len,
                    actual: frame.len(),
                });
            }
            Ok(rle::compress(frame))
        })
        .collect::<Result<Vec<_>>>()?;

    let stride = compressed.iter().map(Vec::len).max().unwrap_or(0);
    let max_compressed_size = u16::try_from(stride).map_err(|_| ContainerError::TooLarge)?;
    let header = AnimationHeader::new(frame_count, fps, max_compressed_size);

    let mut out = Vec::with_capacity(header.container_size());
    out.extend_from_slice(header.as_bytes());
    for payload in &compressed {
        out.extend_from_slice(U16::new(payload.len() as u16).as_bytes());
    }
    for payload in &compressed {
        out.extend_from_slice(payload);
        out.resize(out.len() + stride - payload.len(), 0);
    }

    debug!(
        "container: {} frames of {} bytes, stride {}, {} bytes total",
        frame_count,
        frame_len,
        stride,
        out.len()
    );
    Ok(out)
}

/// Encodes `frames` and writes the container to `writer`.
pub fn write<W: Write, F: AsRef<[u8]>>(writer: &mut W, frames: &[F], fps: u16) -> Result<usize> {
    let bytes = encode(frames, fps)?;
    writer
        .write_all(&bytes)
        .map_err(ContainerError::from_io_error)?;
    Ok(bytes.len())
}

/// The RLE payload of frame `index`.
///
/// Only the header, table entry `index` and that frame's slot are looked
/// at, so damage elsewhere in the blob does not affect this frame.
pub fn frame_payload(bytes: &[u8], index: usize) -> Result<&[u8]> {
    let header = AnimationHeader::parse(bytes)?;
    header.check_index(index)?;

    let entry = header.table_offset() + index * SIZE_ENTRY;
    let size = bytes
        .get(entry..entry + SIZE_ENTRY)
        .and_then(|entry| U16::read_from_bytes(entry).ok())
        .ok_or(ContainerError::Truncated)?
        .get() as usize;
    if size > header.max_compressed_size() {
        return Err(ContainerError::CorruptSizeTable { index });
    }

    let start = header.slot_offset(index);
    bytes
        .get(start..start + size)
        .ok_or(ContainerError::Truncated)
}

pub fn decode_frame(bytes: &[u8], index: usize, frame_len: usize) -> Result<Vec<u8>> {
    let mut frame = vec![0u8; frame_len];
    decode_frame_into(bytes, index, &mut frame)?;
    Ok(frame)
}

pub fn decode_frame_into(bytes: &[u8], index: usize, out: &mut [u8]) -> Result<()> {
    rle::decompress_into(frame_payload(bytes, index)?, out)?;
    Ok(())
}

/// Decodes every frame; unlike [`decode_frame`] the whole blob must be intact.
pub fn decode_all(bytes: &[u8], frame_len: usize) -> Result<Vec<Vec<u8>>> {
    Container::parse(bytes)?.decode_all(frame_len)
}

/// A validated, borrowed view of a container blob.
#[derive(Debug, Clone, Copy)]
pub struct Container<'a> {
    header: AnimationHeader,
    sizes: &'a [U16],
    slots: &'a [u8],
}

impl<'a> Container<'a> {
    /// Trailing bytes past the last slot are ignored.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let header = AnimationHeader::parse(bytes)?;
        let data_offset = header.data_offset();
        let end = header.container_size();
        if bytes.len() < end {
            return Err(ContainerError::Truncated);
        }

        let sizes = <[U16]>::ref_from_bytes(&bytes[header.table_offset()..data_offset])
            .map_err(|_| ContainerError::Truncated)?;
        let stride = header.max_compressed_size();
        if let Some(index) = sizes.iter().position(|size| size.get() as usize > stride) {
            return Err(ContainerError::CorruptSizeTable { index });
        }

        Ok(Self {
            header,
            sizes,
            slots: &bytes[data_offset..end],
        })
    }

    pub fn header(&self) -> &AnimationHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count()
    }

    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.sizes.iter().map(|size| size.get() as usize)
    }

    pub fn frame_size(&self, index: usize) -> Result<usize> {
        self.header.check_index(index)?;
        Ok(self.sizes[index].get() as usize)
    }

    /// The RLE payload of frame `index`, without slot padding.
    pub fn compressed_frame(&self, index: usize) -> Result<&'a [u8]> {
        let size = self.frame_size(index)?;
        let start = index * self.header.max_compressed_size();
        Ok(&self.slots[start..start + size])
    }

    pub fn decode_frame_into(&self, index: usize, out: &mut [u8]) -> Result<()> {
        rle::decompress_into(self.compressed_frame(index)?, out)?;
        Ok(())
    }

    pub fn decode_frame(&self, index: usize, frame_len: usize) -> Result<Vec<u8>> {
        let mut frame = vec![0u8; frame_len];
        self.decode_frame_into(index, &mut frame)?;
        Ok(frame)
    }

    pub fn decode_all(&self, frame_len: usize) -> Result<Vec<Vec<u8>>> {
        (0..self.frame_count())
            .map(|index| self.decode_frame(index, frame_len))
            .collect()
    }
}

/// Random access to the frames of a container behind a seekable reader.
///
/// Only the header is kept in memory, plus one slot worth of scratch.
pub struct AnimReader<R> {
    reader: R,
    header: AnimationHeader,
    scratch: Vec<u8>,
}

impl<R: Read + Seek> AnimReader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        reader
            .seek(SeekFrom::Start(0))
            .map_err(ContainerError::from_io_error)?;
        let mut header_bytes = [0u8; HEADER_SIZE];
        reader
            .read_exact(&mut header_bytes)
            .map_err(ContainerError::from_read_exact_error)?;
        let header = AnimationHeader::parse(&header_bytes)?;
        debug!(
            "anim: {} frames at {} fps, stride {}",
            header.frame_count(),
            header.fps(),
            header.max_compressed_size()
        );

        Ok(Self {
            reader,
            scratch: vec![0u8; header.max_compressed_size()],
            header,
        })
    }

    pub fn header(&self) -> &AnimationHeader {
        &self.header
    }

    pub fn frame_count(&self) -> usize {
        self.header.frame_count()
    }

    pub fn frame_size(&mut self, index: usize) -> Result<usize> {
        self.header.check_index(index)?;
        let offset = self.header.table_offset() + index * SIZE_ENTRY;
        self.reader
            .seek(SeekFrom::Start(offset as u64))
            .map_err(ContainerError::from_io_error)?;
        let mut size = [0u8; SIZE_ENTRY];
        self.reader
            .read_exact(&mut size)
            .map_err(ContainerError::from_read_exact_error)?;

        let size = u16::from_le_bytes(size) as usize;
        if size > self.header.max_compressed_size() {
            return Err(ContainerError::CorruptSizeTable { index });
        }
        Ok(size)
    }

    /// Decodes frame `index` into `out`, which must be exactly one frame long.
    pub fn read_frame(&mut self, index: usize, out: &mut [u8]) -> Result<()> {
        let size = self.frame_size(index)?;
        let offset = self.header.slot_offset(index);
        self.reader
            .seek(SeekFrom::Start(offset as u64))
            .map_err(ContainerError::from_io_error)?;

        let payload = &mut self.scratch[..size];
        self.reader
            .read_exact(payload)
            .map_err(ContainerError::from_read_exact_error)?;
        trace!("anim: frame {} is {} bytes at {}", index, size, offset);

        rle::decompress_into(payload, out)?;
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

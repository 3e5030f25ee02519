//! `.anim` files on the host, read through the same `AnimReader` the
//! device uses.

use std::{
    fmt, fs,
    io::{self, BufReader, Seek},
    path::Path,
};

use embedded_io::{ErrorType, SeekFrom};
use log::{debug, warn};
use oledanim_core::{AnimReader, AnimationHeader, ContainerError};

/// Read-only host file behind `embedded_io::{Read, Seek}`.
pub struct StdFile {
    file: BufReader<fs::File>,
    size: usize,
}

impl StdFile {
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut file = fs::File::open(path)?;
        let size = file.seek(io::SeekFrom::End(0))? as usize;
        file.rewind()?;
        Ok(StdFile {
            file: BufReader::new(file),
            size,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl ErrorType for StdFile {
    type Error = io::Error;
}

impl embedded_io::Seek for StdFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.file.seek(pos.into())
    }
}

impl embedded_io::Read for StdFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        io::Read::read(&mut self.file, buf)
    }
}

#[derive(Debug)]
pub enum OpenError {
    Io(io::Error),
    Container(ContainerError),
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::Io(err) => write!(f, "{err}"),
            OpenError::Container(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for OpenError {}

impl From<io::Error> for OpenError {
    fn from(err: io::Error) -> Self {
        OpenError::Io(err)
    }
}

impl From<ContainerError> for OpenError {
    fn from(err: ContainerError) -> Self {
        OpenError::Container(err)
    }
}

/// How the length on disk compares with the layout the header declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheck {
    Exact,
    /// Slots at the end are missing; frames before them still decode.
    Short { missing: usize },
    Trailing { extra: usize },
}

impl SizeCheck {
    pub fn new(file_size: usize, header: &AnimationHeader) -> Self {
        let expected = header.container_size();
        if file_size < expected {
            SizeCheck::Short {
                missing: expected - file_size,
            }
        } else if file_size > expected {
            SizeCheck::Trailing {
                extra: file_size - expected,
            }
        } else {
            SizeCheck::Exact
        }
    }
}

impl fmt::Display for SizeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeCheck::Exact => write!(f, "ok"),
            SizeCheck::Short { missing } => write!(f, "{missing} bytes short"),
            SizeCheck::Trailing { extra } => write!(f, "{extra} trailing bytes"),
        }
    }
}

/// An opened `.anim` file together with its length on disk.
pub struct AnimFile {
    pub reader: AnimReader<StdFile>,
    pub size: usize,
}

impl AnimFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OpenError> {
        let path = path.as_ref();
        let file = StdFile::open(path)?;
        let size = file.size();
        let reader = AnimReader::new(file)?;

        let anim = AnimFile { reader, size };
        match anim.size_check() {
            SizeCheck::Exact => debug!("Opened {:?} ({} bytes)", path, size),
            check => warn!("{:?}: {}", path, check),
        }
        Ok(anim)
    }

    pub fn size_check(&self) -> SizeCheck {
        SizeCheck::new(self.size, self.reader.header())
    }
}

//! The text index that sits next to the `.anim` files.
//!
//! ```text
//! 2
//! happy.anim,24,10,412
//! sleepy.anim,40,8,380
//! ```

use alloc::vec::Vec;
use core::fmt;

use crate::container::AnimationHeader;

pub const MANIFEST_FILE: &str = "manifest.txt";
pub const ANIM_EXTENSION: &str = "anim";

pub const NAME_CAPACITY: usize = 32;

/// File names are kept inline so the loader doesn't allocate per entry.
pub type EntryName = heapless::String<NAME_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestError {
    MissingCount,
    CountMismatch { expected: usize, actual: usize },
    InvalidLine { line: usize },
    InvalidNumber { line: usize },
    InvalidName,
    NameTooLong,
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestError::MissingCount => write!(f, "missing entry count"),
            ManifestError::CountMismatch { expected, actual } => {
                write!(f, "manifest declares {expected} entries but lists {actual}")
            }
            ManifestError::InvalidLine { line } => write!(f, "line {line}: expected 4 fields"),
            ManifestError::InvalidNumber { line } => write!(f, "line {line}: invalid number"),
            ManifestError::InvalidName => write!(f, "name contains a separator"),
            ManifestError::NameTooLong => write!(f, "name does not fit {NAME_CAPACITY} bytes"),
        }
    }
}

impl core::error::Error for ManifestError {}

type Result<T> = core::result::Result<T, ManifestError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub file_name: EntryName,
    pub frame_count: u16,
    pub fps: u16,
    pub max_compressed_size: u16,
}

impl ManifestEntry {
    /// Entry for `<name>.anim` described by `header`.
    pub fn from_header(name: &str, header: &AnimationHeader) -> Result<Self> {
        if name.is_empty() || name.contains([',', '\n', '\r']) {
            return Err(ManifestError::InvalidName);
        }
        let file_name: EntryName = heapless::format!("{}.{}", name, ANIM_EXTENSION)
            .map_err(|_| ManifestError::NameTooLong)?;
        Ok(Self {
            file_name,
            frame_count: header.frame_count.get(),
            fps: header.fps.get(),
            max_compressed_size: header.max_compressed_size.get(),
        })
    }

    /// The animation name without the extension.
    pub fn name(&self) -> &str {
        let file_name = self.file_name.as_str();
        file_name
            .strip_suffix(ANIM_EXTENSION)
            .and_then(|stem| stem.strip_suffix('.'))
            .unwrap_or(file_name)
    }

    /// Whether `header` agrees with what the manifest promised.
    pub fn matches(&self, header: &AnimationHeader) -> bool {
        self.frame_count == header.frame_count.get()
            && self.fps == header.fps.get()
            && self.max_compressed_size == header.max_compressed_size.get()
    }

    fn parse(line: usize, text: &str) -> Result<Self> {
        let mut fields = text.split(',').map(str::trim);
        let (Some(file_name), Some(frame_count), Some(fps), Some(max), None) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            return Err(ManifestError::InvalidLine { line });
        };
        let number = |field: &str| {
            field
                .parse::<u16>()
                .map_err(|_| ManifestError::InvalidNumber { line })
        };

        Ok(Self {
            file_name: EntryName::try_from(file_name).map_err(|_| ManifestError::NameTooLong)?,
            frame_count: number(frame_count)?,
            fps: number(fps)?,
            max_compressed_size: number(max)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line, count) = lines.next().ok_or(ManifestError::MissingCount)?;
        let expected = count
            .parse::<usize>()
            .map_err(|_| ManifestError::InvalidNumber { line })?;
        let entries = lines
            .map(|(line, text)| ManifestEntry::parse(line, text))
            .collect::<Result<Vec<_>>>()?;

        if entries.len() != expected {
            return Err(ManifestError::CountMismatch {
                expected,
                actual: entries.len(),
            });
        }
        Ok(Self { entries })
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn find(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name || entry.file_name.as_str() == name)
    }

    pub fn write(&self, out: &mut impl fmt::Write) -> fmt::Result {
        writeln!(out, "{}", self.entries.len())?;
        for entry in &self.entries {
            writeln!(
                out,
                "{},{},{},{}",
                entry.file_name, entry.frame_count, entry.fps, entry.max_compressed_size
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}

//! Frame data as emitted into Arduino style C headers.
//!
//! Three shapes show up in practice: one `frame_NNNN.h` per captured frame
//! holding a flat list of `0xNN` bytes, one header per animation with
//! `<name>_FPS`, `<name>_FRAME_COUNT` and a `<name>_frames[][LEN]` array,
//! and the same with RLE rows plus `<name>_MAX_COMPRESSED_SIZE` and a
//! `<name>_frame_sizes[N]` table.

use std::{
    fmt::{self, Write},
    fs,
    path::{Path, PathBuf},
};

use log::{info, warn};
use oledanim_core::{RleError, rle};

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    MissingFrames,
    MissingLength,
    FrameLength {
        frame: usize,
        expected: usize,
        actual: usize,
    },
    InvalidSizeTable,
    SizeCount {
        expected: usize,
        actual: usize,
    },
    CompressedSize {
        frame: usize,
        size: usize,
        available: usize,
    },
    Rle {
        frame: usize,
        err: RleError,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingFrames => write!(f, "no `_frames[][N]` array found"),
            ParseError::MissingLength => write!(f, "frame array has no length"),
            ParseError::FrameLength {
                frame,
                expected,
                actual,
            } => write!(f, "frame {frame} has {actual} bytes, expected {expected}"),
            ParseError::InvalidSizeTable => write!(f, "unreadable `_frame_sizes` table"),
            ParseError::SizeCount { expected, actual } => {
                write!(f, "size table lists {expected} frames, found {actual}")
            }
            ParseError::CompressedSize {
                frame,
                size,
                available,
            } => write!(f, "frame {frame} is listed as {size} bytes, {available} available"),
            ParseError::Rle { frame, err } => write!(f, "frame {frame}: {err}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Every `0xNN` token in `text`, in order.
pub fn hex_bytes(text: &str) -> Vec<u8> {
    let nibble = |b: u8| (b as char).to_digit(16).map(|d| d as u8);
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i + 4 <= bytes.len() {
        if bytes[i] == b'0' && (bytes[i + 1] | 0x20) == b'x' {
            if let (Some(hi), Some(lo)) = (nibble(bytes[i + 2]), nibble(bytes[i + 3])) {
                out.push(hi << 4 | lo);
                i += 4;
                continue;
            }
        }
        i += 1;
    }
    out
}

/// The number in `frame_0042.h`, `frame-7.h` or `frame12.h`.
pub fn frame_number(file_name: &str) -> Option<usize> {
    let rest = &file_name[file_name.find("frame")? + "frame".len()..];
    let rest = rest.strip_prefix(['_', '-']).unwrap_or(rest);
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

pub struct FrameFile {
    pub number: usize,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Loads every `frame*.h` in `dir`, ordered by frame number.
pub fn load_frame_dir(dir: &Path) -> std::io::Result<Vec<FrameFile>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.starts_with("frame") || !name.ends_with(".h") {
            continue;
        }
        let Some(number) = frame_number(name) else {
            warn!("Skipping {name}: no frame number");
            continue;
        };
        let bytes = hex_bytes(&fs::read_to_string(&path)?);
        if bytes.is_empty() {
            warn!("Skipping {name}: no frame data");
            continue;
        }
        files.push(FrameFile {
            number,
            path,
            bytes,
        });
    }
    files.sort_by_key(|file| file.number);
    info!("Loaded {} frames from {:?}", files.len(), dir);
    Ok(files)
}

/// Frames of one animation header, always as raw frame bytes.
#[derive(Debug)]
pub struct AnimationSource {
    pub fps: Option<u16>,
    pub frame_len: usize,
    pub frames: Vec<Vec<u8>>,
    /// The rows were RLE payloads and have been expanded.
    pub compressed: bool,
}

/// Value of the first `<prefix>_<key> = N;` constant.
fn constant(text: &str, key: &str) -> Option<usize> {
    let pattern = format!("_{key}");
    text.match_indices(&pattern).find_map(|(at, _)| {
        let rest = text[at + pattern.len()..].trim_start();
        let rest = rest.strip_prefix('=')?.trim_start();
        let end = rest.find(|c: char| !c.is_ascii_digit())?;
        rest[..end].parse().ok()
    })
}

/// The integers of the `<name>_frame_sizes[N] = { ... };` table, if present.
fn frame_sizes(text: &str) -> Result<Option<Vec<usize>>, ParseError> {
    let Some(decl) = text.find("_frame_sizes[") else {
        return Ok(None);
    };
    let rest = &text[decl..];
    let open = rest.find('{').ok_or(ParseError::InvalidSizeTable)?;
    let close = rest[open..].find('}').ok_or(ParseError::InvalidSizeTable)?;
    rest[open + 1..open + close]
        .split(',')
        .map(str::trim)
        .filter(|size| !size.is_empty())
        .map(|size| size.parse().map_err(|_| ParseError::InvalidSizeTable))
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Expands RLE rows, each cut to its entry in `sizes`. Every frame must
/// expand to the length of the first one.
fn expand_rows(rows: &[Vec<u8>], sizes: &[usize], max: usize) -> Result<Vec<Vec<u8>>, ParseError> {
    if sizes.len() < rows.len() {
        return Err(ParseError::SizeCount {
            expected: sizes.len(),
            actual: rows.len(),
        });
    }

    let mut frame_len = None;
    let mut frames = Vec::with_capacity(rows.len());
    for (frame, (row, &size)) in rows.iter().zip(sizes).enumerate() {
        if size > max || size > row.len() {
            return Err(ParseError::CompressedSize {
                frame,
                size,
                available: row.len().min(max),
            });
        }
        let payload = &row[..size];
        let len = match frame_len {
            Some(len) => len,
            None => *frame_len.insert(
                rle::decoded_len(payload).map_err(|err| ParseError::Rle { frame, err })?,
            ),
        };
        frames.push(rle::decompress(payload, len).map_err(|err| ParseError::Rle { frame, err })?);
    }
    Ok(frames)
}

pub fn parse_animation(text: &str) -> Result<AnimationSource, ParseError> {
    let fps = constant(text, "FPS").and_then(|fps| u16::try_from(fps).ok());
    let frame_count = constant(text, "FRAME_COUNT");

    let decl = text.find("_frames[]").ok_or(ParseError::MissingFrames)?;
    let rest = &text[decl + "_frames[]".len()..];
    let row_len = rest
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .and_then(|(len, _)| len.trim().parse::<usize>().ok())
        .ok_or(ParseError::MissingLength)?;
    let body = &rest[rest.find('{').ok_or(ParseError::MissingFrames)? + 1..];

    let mut rows = Vec::new();
    let mut remaining = body;
    while let Some(open) = remaining.find(['{', ';']) {
        if remaining[open..].starts_with(';') {
            break;
        }
        let Some(close) = remaining[open..].find('}') else {
            break;
        };
        rows.push(hex_bytes(&remaining[open + 1..open + close]));
        remaining = &remaining[open + close + 1..];
        if frame_count.is_some_and(|count| rows.len() >= count) {
            break;
        }
    }
    if rows.is_empty() {
        return Err(ParseError::MissingFrames);
    }

    let sizes = frame_sizes(text)?;
    let compressed = sizes.is_some();
    let frames = match sizes {
        Some(sizes) => {
            let max = constant(text, "MAX_COMPRESSED_SIZE").unwrap_or(row_len);
            expand_rows(&rows, &sizes, max)?
        }
        None => {
            if let Some((frame, bytes)) = rows.iter().enumerate().find(|(_, b)| b.len() != row_len) {
                return Err(ParseError::FrameLength {
                    frame,
                    expected: row_len,
                    actual: bytes.len(),
                });
            }
            rows
        }
    };

    Ok(AnimationSource {
        fps,
        frame_len: frames[0].len(),
        frames,
        compressed,
    })
}

/// Writes `frames` as a PROGMEM array header, 16 bytes per line.
pub fn write_header<F: AsRef<[u8]>>(
    out: &mut impl Write,
    name: &str,
    frames: &[F],
    fps: u16,
) -> fmt::Result {
    let guard = format!("{}_H", name.to_uppercase());
    let frame_len = frames.first().map_or(0, |f| f.as_ref().len());

    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}\n")?;
    writeln!(out, "// Auto-generated video data for {name}")?;
    writeln!(out, "// Frame count: {}", frames.len())?;
    writeln!(out, "// Frame rate: {fps} FPS")?;
    writeln!(out, "// Bytes per frame: {frame_len}")?;
    writeln!(out, "// Total size: {} bytes\n", frames.len() * frame_len)?;
    writeln!(out, "#include <Arduino.h>\n")?;
    writeln!(out, "const int {name}_FRAME_COUNT = {};", frames.len())?;
    writeln!(out, "const int {name}_FPS = {fps};")?;
    writeln!(
        out,
        "const int {name}_FRAME_DELAY = {}; // milliseconds\n",
        1000 / fps.max(1)
    )?;
    writeln!(out, "const uint8_t PROGMEM {name}_frames[][{frame_len}] = {{")?;
    for (i, frame) in frames.iter().enumerate() {
        writeln!(out, "  {{")?;
        let lines: Vec<_> = frame.as_ref().chunks(16).collect();
        for (j, line) in lines.iter().enumerate() {
            let hex: Vec<_> = line.iter().map(|b| format!("0x{b:02X}")).collect();
            let sep = if j + 1 < lines.len() { "," } else { "" };
            writeln!(out, "    {}{sep}", hex.join(","))?;
        }
        let sep = if i + 1 < frames.len() { "," } else { "" };
        writeln!(out, "  }}{sep}")?;
    }
    writeln!(out, "}};\n")?;
    writeln!(out, "#endif // {guard}")
}

use alloc::{vec, vec::Vec};
use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Size},
};

use crate::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

/// How the bits of a frame buffer map onto the display.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    strum_macros::EnumIter,
    strum_macros::EnumString,
    strum_macros::IntoStaticStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Addressing {
    /// SSD1306 page layout: `height / 8` pages of `width` bytes,
    /// each byte a column of 8 pixels with bit 0 on top.
    Vertical,
    /// Row-major, `width / 8` bytes per row, bit 7 is the leftmost pixel.
    #[default]
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    InvalidDimensions { width: usize, height: usize },
    BufferSizeMismatch { expected: usize, actual: usize },
}

impl core::fmt::Display for BitmapError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BitmapError::InvalidDimensions { width, height } => {
                write!(f, "invalid dimensions {width}x{height}")
            }
            BitmapError::BufferSizeMismatch { expected, actual } => {
                write!(f, "buffer is {actual} bytes, expected {expected}")
            }
        }
    }
}

impl core::error::Error for BitmapError {}

type Result<T> = core::result::Result<T, BitmapError>;

/// Geometry of the frames in one animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameFormat {
    pub width: usize,
    pub height: usize,
    pub addressing: Addressing,
}

impl Default for FrameFormat {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, Addressing::default())
    }
}

impl FrameFormat {
    pub const fn new(width: usize, height: usize, addressing: Addressing) -> Self {
        Self {
            width,
            height,
            addressing,
        }
    }

    pub fn frame_len(&self) -> usize {
        self.width * self.height / 8
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.width, self.height, self.addressing)
    }
}

/// A decoded frame, one `bool` per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Out of range coordinates read as unlit.
    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, lit: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = lit;
        }
    }

    pub fn color(&self, x: usize, y: usize) -> BinaryColor {
        if self.get(x, y) {
            BinaryColor::On
        } else {
            BinaryColor::Off
        }
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|&&lit| lit).count()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(self.width.max(1))
    }
}

impl OriginDimensions for PixelGrid {
    fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }
}

impl DrawTarget for PixelGrid {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> core::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if coord.x < 0 || coord.y < 0 {
                continue;
            }
            self.set(coord.x as usize, coord.y as usize, color.is_on());
        }
        Ok(())
    }
}

fn check_dimensions(width: usize, height: usize, addressing: Addressing) -> Result<()> {
    let aligned = match addressing {
        Addressing::Vertical => height % 8 == 0,
        Addressing::Horizontal => width % 8 == 0,
    };
    if width == 0 || height == 0 || !aligned {
        return Err(BitmapError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn check_len(bytes: &[u8], width: usize, height: usize) -> Result<()> {
    let expected = width * height / 8;
    if bytes.len() != expected {
        return Err(BitmapError::BufferSizeMismatch {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

pub fn decode_vertical(bytes: &[u8], width: usize, height: usize) -> Result<PixelGrid> {
    check_dimensions(width, height, Addressing::Vertical)?;
    check_len(bytes, width, height)?;

    let mut grid = PixelGrid::new(width, height);
    for (page, columns) in bytes.chunks_exact(width).enumerate() {
        for (x, byte) in columns.iter().enumerate() {
            for bit in 0..8 {
                if byte & (1 << bit) != 0 {
                    grid.set(x, page * 8 + bit, true);
                }
            }
        }
    }
    Ok(grid)
}

pub fn encode_vertical(grid: &PixelGrid) -> Result<Vec<u8>> {
    let (width, height) = (grid.width, grid.height);
    check_dimensions(width, height, Addressing::Vertical)?;

    let mut bytes = vec![0u8; width * height / 8];
    for page in 0..height / 8 {
        for x in 0..width {
            let mut byte = 0u8;
            for bit in 0..8 {
                if grid.get(x, page * 8 + bit) {
                    byte |= 1 << bit;
                }
            }
            bytes[page * width + x] = byte;
        }
    }
    Ok(bytes)
}

pub fn decode_horizontal(bytes: &[u8], width: usize, height: usize) -> Result<PixelGrid> {
    check_dimensions(width, height, Addressing::Horizontal)?;
    check_len(bytes, width, height)?;

    let mut grid = PixelGrid::new(width, height);
    for (y, row) in bytes.chunks_exact(width / 8).enumerate() {
        for (x_byte, byte) in row.iter().enumerate() {
            for bit in 0..8 {
                if byte & (1 << (7 - bit)) != 0 {
                    grid.set(x_byte * 8 + bit, y, true);
                }
            }
        }
    }
    Ok(grid)
}

pub fn encode_horizontal(grid: &PixelGrid) -> Result<Vec<u8>> {
    let (width, height) = (grid.width, grid.height);
    check_dimensions(width, height, Addressing::Horizontal)?;

    let mut bytes = vec![0u8; width * height / 8];
    for (y, row) in grid.rows().enumerate() {
        for (x, &lit) in row.iter().enumerate() {
            if lit {
                let index = y * width + x;
                bytes[index / 8] |= 1 << (7 - (index % 8));
            }
        }
    }
    Ok(bytes)
}

pub fn decode(bytes: &[u8], format: &FrameFormat) -> Result<PixelGrid> {
    match format.addressing {
        Addressing::Vertical => decode_vertical(bytes, format.width, format.height),
        Addressing::Horizontal => decode_horizontal(bytes, format.width, format.height),
    }
}

pub fn encode(grid: &PixelGrid, addressing: Addressing) -> Result<Vec<u8>> {
    match addressing {
        Addressing::Vertical => encode_vertical(grid),
        Addressing::Horizontal => encode_horizontal(grid),
    }
}

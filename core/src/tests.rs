#![cfg_attr(rustfmt, rustfmt_skip)]

use std::vec;
use std::vec::Vec;
use std::string::String;

use embedded_graphics::{
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use proptest::prelude::*;
use strum::IntoEnumIterator;

use super::*;
use crate::{bitmap, container, rle, segment};

/// In-memory `Read + Seek` source standing in for flash storage.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }
}

impl embedded_io::ErrorType for Cursor<'_> {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Read for Cursor<'_> {
    fn read(&mut self, buf: &mut [u8]) -> core::result::Result<usize, Self::Error> {
        let remaining = &self.data[self.pos.min(self.data.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl embedded_io::Seek for Cursor<'_> {
    fn seek(&mut self, pos: embedded_io::SeekFrom) -> core::result::Result<u64, Self::Error> {
        let target = match pos {
            embedded_io::SeekFrom::Start(n) => n as i64,
            embedded_io::SeekFrom::End(n) => self.data.len() as i64 + n,
            embedded_io::SeekFrom::Current(n) => self.pos as i64 + n,
        };
        if target < 0 {
            return Err(embedded_io::ErrorKind::InvalidInput);
        }
        self.pos = target as usize;
        Ok(self.pos as u64)
    }
}

/// Writer collecting into a Vec.
struct Sink(Vec<u8>);

impl embedded_io::ErrorType for Sink {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> core::result::Result<usize, Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

fn sample_frames() -> Vec<Vec<u8>> {
    let format = FrameFormat::default();
    let mut frames = Vec::new();
    for step in 0..6usize {
        let mut grid = PixelGrid::new(format.width, format.height);
        Rectangle::new(Point::new(step as i32 * 10, 16), Size::new(24, 24))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut grid)
            .unwrap();
        frames.push(bitmap::encode(&grid, format.addressing).unwrap());
    }
    frames
}

// RLE

#[test]
fn rle_two_runs() {
    let frame = [0x00, 0x00, 0xFF, 0xFF];
    let compressed = rle::compress(&frame);
    assert_eq!(compressed, [2, 0x00, 2, 0xFF]);
    assert_eq!(rle::decompress(&compressed, 4).unwrap(), frame);
}

#[test]
fn rle_splits_long_runs() {
    let frame = [0xAA; 256];
    let compressed = rle::compress(&frame);
    assert_eq!(compressed, [255, 0xAA, 1, 0xAA]);
    assert_eq!(rle::decompress(&compressed, 256).unwrap(), frame);

    let compressed = rle::compress(&[0u8; 510]);
    assert_eq!(compressed, [255, 0, 255, 0]);
}

#[test]
fn rle_empty() {
    assert!(rle::compress(&[]).is_empty());
    assert_eq!(rle::compressed_len(&[]), 0);
    assert_eq!(rle::decompress(&[], 0).unwrap(), Vec::<u8>::new());
}

#[test]
fn rle_worst_case_doubles() {
    let frame: Vec<u8> = (0..=255u8).collect();
    let compressed = rle::compress(&frame);
    assert_eq!(compressed.len(), frame.len() * 2);
    assert_eq!(rle::decompress(&compressed, frame.len()).unwrap(), frame);
}

#[test]
fn rle_rejects_odd_length() {
    assert_eq!(
        rle::decompress(&[2, 0x00, 3], 2),
        Err(RleError::MalformedRun { offset: 2 })
    );
}

#[test]
fn rle_rejects_zero_count() {
    assert_eq!(
        rle::decompress(&[2, 0x00, 0, 0xFF], 2),
        Err(RleError::MalformedRun { offset: 2 })
    );
}

#[test]
fn rle_decoded_len() {
    assert_eq!(rle::decoded_len(&[]), Ok(0));
    assert_eq!(rle::decoded_len(&[255, 0xAA, 1, 0xAA]), Ok(256));
    assert_eq!(rle::decoded_len(&[2, 0, 2]), Err(RleError::MalformedRun { offset: 2 }));
    assert_eq!(rle::decoded_len(&[2, 0, 0, 1]), Err(RleError::MalformedRun { offset: 2 }));
}

#[test]
fn rle_length_mismatch() {
    // too short
    assert_eq!(
        rle::decompress(&[2, 0x11], 4),
        Err(RleError::LengthMismatch { expected: 4, actual: 2 })
    );
    // too long: totalled, but never written past the buffer
    let mut out = [0u8; 3];
    assert_eq!(
        rle::decompress_into(&[255, 0x11, 255, 0x22], &mut out),
        Err(RleError::LengthMismatch { expected: 3, actual: 510 })
    );
    assert_eq!(out, [0x11; 3]);
}

proptest! {
    #[test]
    fn rle_round_trip(frame in proptest::collection::vec(prop_oneof![Just(0u8), Just(0xFFu8), any::<u8>()], 0..2048)) {
        let compressed = rle::compress(&frame);
        prop_assert_eq!(compressed.len() % 2, 0);
        prop_assert_eq!(compressed.len(), rle::compressed_len(&frame));
        prop_assert!(compressed.len() <= frame.len() * 2);
        prop_assert!(compressed.chunks_exact(2).all(|pair| pair[0] != 0));
        prop_assert_eq!(rle::decoded_len(&compressed), Ok(frame.len()));
        prop_assert_eq!(rle::decompress(&compressed, frame.len()).unwrap(), frame);
    }
}

// Addressing

#[test]
fn vertical_bit_zero_is_top_of_page() {
    let mut bytes = vec![0u8; 16 * 16 / 8];
    bytes[3] = 0b0000_0001;
    bytes[16 + 5] = 0b1000_0000;
    let grid = bitmap::decode_vertical(&bytes, 16, 16).unwrap();
    assert!(grid.get(3, 0));
    assert!(grid.get(5, 15));
    assert_eq!(grid.lit_count(), 2);
}

#[test]
fn horizontal_bit_seven_is_leftmost() {
    let mut bytes = vec![0u8; 16 * 2 / 8];
    bytes[0] = 0b1000_0000;
    bytes[3] = 0b0000_0001;
    let grid = bitmap::decode_horizontal(&bytes, 16, 2).unwrap();
    assert!(grid.get(0, 0));
    assert!(grid.get(15, 1));
    assert_eq!(grid.lit_count(), 2);
}

#[test]
fn addressing_rejects_bad_dimensions() {
    assert_eq!(
        bitmap::decode_vertical(&[0u8; 12], 8, 12),
        Err(BitmapError::InvalidDimensions { width: 8, height: 12 })
    );
    assert_eq!(
        bitmap::decode_horizontal(&[0u8; 12], 12, 8),
        Err(BitmapError::InvalidDimensions { width: 12, height: 8 })
    );
    assert_eq!(
        bitmap::decode_horizontal(&[], 0, 8),
        Err(BitmapError::InvalidDimensions { width: 0, height: 8 })
    );
    assert!(bitmap::encode_vertical(&PixelGrid::new(8, 12)).is_err());
}

#[test]
fn addressing_rejects_wrong_length() {
    for addressing in Addressing::iter() {
        let format = FrameFormat::new(128, 64, addressing);
        assert_eq!(
            bitmap::decode(&[0u8; 1023], &format),
            Err(BitmapError::BufferSizeMismatch { expected: 1024, actual: 1023 })
        );
    }
}

#[test]
fn addressing_round_trips_both_ways() {
    let mut grid = PixelGrid::new(32, 16);
    Rectangle::new(Point::new(3, 2), Size::new(9, 11))
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut grid)
        .unwrap();
    grid.set(31, 15, true);

    for addressing in Addressing::iter() {
        let format = FrameFormat::new(32, 16, addressing);
        let bytes = bitmap::encode(&grid, addressing).unwrap();
        assert_eq!(bytes.len(), format.frame_len());
        assert_eq!(bitmap::decode(&bytes, &format).unwrap(), grid);
    }
}

#[test]
fn conventions_differ() {
    let mut grid = PixelGrid::new(16, 8);
    grid.set(0, 0, true);
    let vertical = bitmap::encode_vertical(&grid).unwrap();
    let horizontal = bitmap::encode_horizontal(&grid).unwrap();
    assert_eq!(vertical[0], 0b0000_0001);
    assert_eq!(horizontal[0], 0b1000_0000);
}

#[test]
fn addressing_names() {
    assert_eq!("vertical".parse::<Addressing>(), Ok(Addressing::Vertical));
    assert_eq!("horizontal".parse::<Addressing>(), Ok(Addressing::Horizontal));
    let name: &'static str = Addressing::Vertical.into();
    assert_eq!(name, "vertical");
    assert_eq!(FrameFormat::default().frame_len(), 1024);
}

#[test]
fn draw_target_clips_out_of_bounds() {
    let mut grid = PixelGrid::new(8, 8);
    Rectangle::new(Point::new(-4, -4), Size::new(8, 8))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut grid)
        .unwrap();
    assert_eq!(grid.lit_count(), 16);
    assert_eq!(grid.color(0, 0), BinaryColor::On);
    assert_eq!(grid.color(4, 4), BinaryColor::Off);
}

proptest! {
    #[test]
    fn byte_buffers_round_trip(bytes in proptest::collection::vec(any::<u8>(), 64)) {
        for addressing in Addressing::iter() {
            let format = FrameFormat::new(32, 16, addressing);
            let grid = bitmap::decode(&bytes, &format).unwrap();
            prop_assert_eq!(bitmap::encode(&grid, addressing).unwrap(), bytes.clone());
        }
    }
}

// Container

#[test]
fn container_layout() {
    let frames = [
        vec![0x00, 0x00, 0x01, 0x01], // 4
        vec![0x00, 0x01, 0x02, 0x02], // 6
        vec![0x05, 0x05, 0x05, 0x06], // 4
    ];
    let blob = container::encode(&frames, 12).unwrap();
    assert_eq!(blob.len(), 12 + 3 * 2 + 3 * 6);
    assert_eq!(&blob[..12], &[3, 0, 12, 0, 6, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&blob[12..18], &[4, 0, 6, 0, 4, 0]);
    assert_eq!(&blob[18..24], &[2, 0x00, 2, 0x01, 0, 0]);
    assert_eq!(&blob[24..30], &[1, 0x00, 1, 0x01, 2, 0x02]);
    assert_eq!(&blob[30..36], &[3, 0x05, 1, 0x06, 0, 0]);

    let view = Container::parse(&blob).unwrap();
    assert_eq!(view.header().fps(), 12);
    assert_eq!(view.header().max_compressed_size(), 6);
    assert_eq!(view.sizes().collect::<Vec<_>>(), [4, 6, 4]);
    assert_eq!(view.compressed_frame(2).unwrap(), &[3, 0x05, 1, 0x06]);
    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(&container::decode_frame(&blob, i, 4).unwrap(), frame);
    }
}

#[test]
fn container_round_trip() {
    let frames = sample_frames();
    let blob = container::encode(&frames, 10).unwrap();
    assert_eq!(container::decode_all(&blob, 1024).unwrap(), frames);

    let view = Container::parse(&blob).unwrap();
    let max = view.sizes().max().unwrap();
    assert_eq!(view.header().max_compressed_size(), max);
    assert_eq!(blob.len(), view.header().container_size());

    let mut out = [0u8; 1024];
    container::decode_frame_into(&blob, 3, &mut out).unwrap();
    assert_eq!(&out[..], &frames[3][..]);
}

#[test]
fn container_stores_expanding_frames() {
    let frames = [(0..64u8).collect::<Vec<_>>(), vec![0u8; 64]];
    let blob = container::encode(&frames, 1).unwrap();
    let view = Container::parse(&blob).unwrap();
    assert_eq!(view.header().max_compressed_size(), 128);
    assert_eq!(view.decode_all(64).unwrap(), frames);
}

#[test]
fn container_encode_errors() {
    let none: [Vec<u8>; 0] = [];
    assert_eq!(container::encode(&none, 10), Err(ContainerError::EmptyAnimation));
    assert_eq!(container::encode(&[[0u8; 4]], 0), Err(ContainerError::InvalidFps));
    assert_eq!(
        container::encode(&[vec![0u8; 4], vec![0u8; 4], vec![0u8; 5]], 10),
        Err(ContainerError::InconsistentFrameSize { index: 2, expected: 4, actual: 5 })
    );
    let huge: Vec<u8> = (0..40_000u32).map(|i| i as u8).collect();
    assert_eq!(container::encode(&[huge], 10), Err(ContainerError::TooLarge));
}

#[test]
fn container_decode_errors() {
    let frames = sample_frames();
    let blob = container::encode(&frames, 10).unwrap();

    assert_eq!(
        container::decode_frame(&blob, 6, 1024),
        Err(ContainerError::IndexOutOfRange { index: 6, frame_count: 6 })
    );
    assert!(matches!(
        container::decode_frame(&blob, 0, 1000),
        Err(ContainerError::Rle(RleError::LengthMismatch { expected: 1000, .. }))
    ));
    assert_eq!(
        Container::parse(&blob[..blob.len() - 1]).err(),
        Some(ContainerError::Truncated)
    );
    assert_eq!(Container::parse(&blob[..5]).err(), Some(ContainerError::Truncated));

    let mut reserved = blob.clone();
    reserved[6..12].copy_from_slice(&[1, 2, 3, 4, 5, 6]);
    assert_eq!(container::decode_all(&reserved, 1024).unwrap(), frames);

    let mut table = blob.clone();
    table[12 + 2 * 4..12 + 2 * 4 + 2].copy_from_slice(&u16::MAX.to_le_bytes());
    assert_eq!(
        Container::parse(&table).err(),
        Some(ContainerError::CorruptSizeTable { index: 4 })
    );

    let empty = AnimationHeader::new(0, 10, 0);
    assert_eq!(
        Container::parse(zerocopy::IntoBytes::as_bytes(&empty)).err(),
        Some(ContainerError::EmptyAnimation)
    );
}

#[test]
fn container_single_frame_ignores_damage_elsewhere() {
    let frames = [[0u8, 0, 1, 1], [2, 2, 2, 2], [3, 4, 3, 4], [5, 5, 6, 6]];
    let blob = container::encode(&frames, 10).unwrap();

    let mut table = blob.clone();
    table[12 + 2 * 3..12 + 2 * 4].copy_from_slice(&u16::MAX.to_le_bytes());
    assert_eq!(container::decode_frame(&table, 0, 4).unwrap(), frames[0]);
    assert_eq!(
        container::decode_frame(&table, 3, 4),
        Err(ContainerError::CorruptSizeTable { index: 3 })
    );
    assert_eq!(
        Container::parse(&table).err(),
        Some(ContainerError::CorruptSizeTable { index: 3 })
    );

    let cut = &blob[..blob.len() - 1];
    assert_eq!(container::decode_frame(cut, 0, 4).unwrap(), frames[0]);
    assert_eq!(container::frame_payload(cut, 1).unwrap(), &[4, 2]);
    assert_eq!(container::decode_all(cut, 4), Err(ContainerError::Truncated));
}

#[test]
fn container_corrupt_payload() {
    let blob = container::encode(&[[1u8, 1, 2, 2]], 10).unwrap();
    // shrink the recorded size so the last pair is cut off
    let mut short = blob.clone();
    short[12] = 2;
    assert_eq!(
        container::decode_frame(&short, 0, 4),
        Err(ContainerError::Rle(RleError::LengthMismatch { expected: 4, actual: 2 }))
    );
    short[12] = 3;
    assert_eq!(
        container::decode_frame(&short, 0, 4),
        Err(ContainerError::Rle(RleError::MalformedRun { offset: 2 }))
    );
}

#[test]
fn container_trailing_bytes_ignored() {
    let frames = sample_frames();
    let mut blob = container::encode(&frames, 10).unwrap();
    blob.extend_from_slice(&[0xFF; 32]);
    assert_eq!(container::decode_all(&blob, 1024).unwrap(), frames);
}

#[test]
fn container_write() {
    let frames = sample_frames();
    let mut sink = Sink(Vec::new());
    let written = container::write(&mut sink, &frames, 10).unwrap();
    assert_eq!(written, sink.0.len());
    assert_eq!(sink.0, container::encode(&frames, 10).unwrap());
}

#[test]
fn header_offsets() {
    let header = AnimationHeader::new(3, 20, 6);
    assert_eq!(header.data_offset(), 18);
    assert_eq!(header.slot_offset(2), 30);
    assert_eq!(header.container_size(), 36);
    assert_eq!(header.frame_delay_ms(), 50);
}

#[test]
fn anim_reader_random_access() {
    let frames = sample_frames();
    let blob = container::encode(&frames, 10).unwrap();
    let mut reader = AnimReader::new(Cursor::new(&blob)).unwrap();
    assert_eq!(reader.frame_count(), frames.len());
    assert_eq!(reader.header().fps(), 10);

    let mut out = [0u8; 1024];
    for i in [5, 0, 3, 3, 1] {
        reader.read_frame(i, &mut out).unwrap();
        assert_eq!(&out[..], &frames[i][..]);
    }
    assert_eq!(
        reader.read_frame(9, &mut out),
        Err(ContainerError::IndexOutOfRange { index: 9, frame_count: 6 })
    );
}

#[test]
fn anim_reader_truncated() {
    let frames = sample_frames();
    let blob = container::encode(&frames, 10).unwrap();
    let last_slot = AnimationHeader::parse(&blob).unwrap().slot_offset(5);
    let cut = &blob[..last_slot + 1];
    let mut reader = AnimReader::new(Cursor::new(cut)).unwrap();
    let mut out = [0u8; 1024];
    reader.read_frame(0, &mut out).unwrap();
    assert_eq!(reader.read_frame(5, &mut out), Err(ContainerError::Truncated));

    assert!(matches!(
        AnimReader::new(Cursor::new(&blob[..4])),
        Err(ContainerError::Truncated)
    ));
}

proptest! {
    #[test]
    fn container_round_trip_any(frames in (1usize..64).prop_flat_map(|len| {
        proptest::collection::vec(proptest::collection::vec(prop_oneof![Just(0u8), any::<u8>()], len), 1..12)
    })) {
        let blob = container::encode(&frames, 10).unwrap();
        let view = Container::parse(&blob).unwrap();
        let stride = view.header().max_compressed_size();
        prop_assert_eq!(Some(stride), view.sizes().max());
        prop_assert!(view.sizes().all(|size| size <= stride));
        for (i, frame) in frames.iter().enumerate() {
            prop_assert_eq!(&view.decode_frame(i, frame.len()).unwrap(), frame);
        }
    }
}

// Segmenter

#[test]
fn distance_metric() {
    assert_eq!(segment::distance(&[0, 10], &[4, 6]), 4.0);
    assert_eq!(segment::distance(&[], &[]), 0.0);
    assert_eq!(segment::distance(&[1, 2], &[1]), f64::INFINITY);
}

#[test]
fn segment_scenario() {
    let frames = [[0u8], [2], [52], [55]];
    let clips = segment::segment(&frames, 10.0).unwrap();
    assert_eq!(clips, [Clip { start: 0, end: 2 }, Clip { start: 2, end: 4 }]);
    assert_eq!(clips[1].select(&frames), &[[52], [55]]);
    assert_eq!(clips[1].first(), 2);
    assert_eq!(clips[1].last(), 3);
}

#[test]
fn segment_edge_cases() {
    let none: [[u8; 1]; 0] = [];
    assert_eq!(segment::segment(&none, 10.0), Err(SegmentError::EmptyInput));
    assert_eq!(segment::segment(&[[1u8]], -1.0), Err(SegmentError::InvalidThreshold));
    assert_eq!(segment::segment(&[[1u8]], f64::NAN), Err(SegmentError::InvalidThreshold));
    assert_eq!(segment::segment(&[[1u8]], 0.0).unwrap(), [Clip { start: 0, end: 1 }]);
}

#[test]
fn segment_unequal_lengths_split() {
    let frames = [vec![0u8; 4], vec![0u8; 4], vec![0u8; 8]];
    let clips = segment::segment(&frames, 1000.0).unwrap();
    assert_eq!(clips, [Clip { start: 0, end: 2 }, Clip { start: 2, end: 3 }]);
    assert_eq!(segment::segment(&frames, f64::INFINITY).unwrap().len(), 1);
}

#[test]
fn clip_duration() {
    let clip = Clip { start: 10, end: 40 };
    assert_eq!(clip.len(), 30);
    assert_eq!(clip.duration_ms(10), 3000);
    assert_eq!(clip.duration_ms(30), 1000);
}

proptest! {
    #[test]
    fn segment_partitions(frames in proptest::collection::vec(proptest::collection::vec(0u8..4, 4), 1..40), threshold in 0.0f64..3.0) {
        let clips = segment::segment(&frames, threshold).unwrap();
        let indices: Vec<usize> = clips.iter().flat_map(|clip| clip.range()).collect();
        prop_assert_eq!(indices, (0..frames.len()).collect::<Vec<_>>());
        prop_assert!(clips.iter().all(|clip| !clip.is_empty()));
        prop_assert_eq!(segment::segment(&frames, f64::INFINITY).unwrap().len(), 1);

        let zero = segment::segment(&frames, 0.0).unwrap();
        let changes = frames.windows(2).filter(|pair| pair[0] != pair[1]).count();
        prop_assert_eq!(zero.len(), changes + 1);
    }
}

// Manifest

#[test]
fn manifest_round_trip() {
    let frames = sample_frames();
    let blob = container::encode(&frames, 10).unwrap();
    let header = *Container::parse(&blob).unwrap().header();

    let mut manifest = Manifest::default();
    manifest.push(ManifestEntry::from_header("happy", &header).unwrap());
    manifest.push(ManifestEntry::from_header("sleepy_3", &AnimationHeader::new(40, 8, 380)).unwrap());

    let mut text = String::new();
    manifest.write(&mut text).unwrap();
    assert!(text.starts_with("2\nhappy.anim,6,10,"));
    assert!(text.ends_with("sleepy_3.anim,40,8,380\n"));

    let parsed = Manifest::parse(&text).unwrap();
    assert_eq!(parsed, manifest);
    let happy = parsed.find("happy").unwrap();
    assert_eq!(happy.name(), "happy");
    assert!(happy.matches(&header));
    assert!(parsed.find("sleepy_3.anim").is_some());
    assert!(parsed.find("angry").is_none());
}

#[test]
fn manifest_errors() {
    assert_eq!(Manifest::parse(""), Err(ManifestError::MissingCount));
    assert_eq!(Manifest::parse("x\n"), Err(ManifestError::InvalidNumber { line: 1 }));
    assert_eq!(
        Manifest::parse("2\na.anim,1,2,3\n"),
        Err(ManifestError::CountMismatch { expected: 2, actual: 1 })
    );
    assert_eq!(Manifest::parse("1\na.anim,1,2\n"), Err(ManifestError::InvalidLine { line: 2 }));
    assert_eq!(Manifest::parse("1\n\na.anim,1,-2,3\n"), Err(ManifestError::InvalidNumber { line: 3 }));

    let header = AnimationHeader::new(1, 1, 2);
    assert_eq!(ManifestEntry::from_header("a,b", &header), Err(ManifestError::InvalidName));
    assert_eq!(
        ManifestEntry::from_header("an_animation_name_that_is_far_too_long", &header),
        Err(ManifestError::NameTooLong)
    );
    assert_eq!(std::format!("{}", ManifestError::NameTooLong), "name does not fit 32 bytes");

    // 27 characters plus ".anim" fills the name exactly
    let name = "abcdefghijklmnopqrstuvwxyz_";
    let entry = ManifestEntry::from_header(name, &header).unwrap();
    assert_eq!(entry.file_name.len(), manifest::NAME_CAPACITY);
    assert_eq!(entry.name(), name);
}

#[test]
fn errors_convert() {
    let err: Error = ContainerError::EmptyAnimation.into();
    assert_eq!(err, Error::Container(ContainerError::EmptyAnimation));
    assert_eq!(std::format!("{err}"), "container: animation has no frames");
    let err: ContainerError = RleError::MalformedRun { offset: 1 }.into();
    assert_eq!(embedded_io::Error::kind(&err), embedded_io::ErrorKind::InvalidData);
}

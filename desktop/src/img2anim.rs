use std::fs;

use argh::FromArgs;
use image::{DynamicImage, imageops::FilterType};
use log::info;
use oledanim_core::{
    Addressing, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH, PixelGrid, bitmap, container,
};

#[derive(FromArgs)]
/// Conversion options
struct Args {
    /// output .anim file path
    #[argh(option, short = 'o')]
    output_path: String,

    /// frame width in pixels
    #[argh(option, default = "DEFAULT_WIDTH")]
    width: usize,

    /// frame height in pixels
    #[argh(option, default = "DEFAULT_HEIGHT")]
    height: usize,

    /// bit layout of the packed frames (vertical, horizontal)
    #[argh(option, short = 'a', default = "Addressing::default()")]
    addressing: Addressing,

    /// frames per second
    #[argh(option, default = "DEFAULT_FPS")]
    fps: u16,

    /// pixels brighter than this are lit
    #[argh(option, default = "128")]
    luma_threshold: u8,

    /// mirror every image horizontally
    #[argh(switch)]
    flip: bool,

    /// input images, one per frame, in playback order
    #[argh(positional)]
    inputs: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    if args.inputs.is_empty() {
        panic!("No input images given");
    }

    let frames: Vec<Vec<u8>> = args
        .inputs
        .iter()
        .map(|input| {
            let image = image::open(input).expect("Failed to open input image");
            let grid = to_grid(image, &args);
            info!("{input}: {} pixels lit", grid.lit_count());
            bitmap::encode(&grid, args.addressing).expect("Failed to pack frame")
        })
        .collect();

    let blob = container::encode(&frames, args.fps).expect("Failed to encode animation");
    fs::write(&args.output_path, &blob).expect("Failed to write output file");
    info!(
        "Created {} ({} frames, {} bytes)",
        args.output_path,
        frames.len(),
        blob.len()
    );
}

fn to_grid(image: DynamicImage, args: &Args) -> PixelGrid {
    let mut image = image.resize_exact(args.width as u32, args.height as u32, FilterType::Triangle);
    if args.flip {
        image = image.fliph();
    }
    let image = image.into_luma8();

    let mut grid = PixelGrid::new(args.width, args.height);
    for (x, y, pixel) in image.enumerate_pixels() {
        grid.set(x as usize, y as usize, pixel[0] > args.luma_threshold);
    }
    grid
}

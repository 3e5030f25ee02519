use argh::FromArgs;
use oledanim_core::{
    Addressing, DEFAULT_HEIGHT, DEFAULT_WIDTH, FrameFormat, PixelGrid, bitmap,
};
use strum::IntoEnumIterator;

use crate::std_file::AnimFile;

mod std_file;

#[derive(FromArgs)]
/// Inspect a .anim container
struct Args {
    /// frame to render, none prints only the header and size table
    #[argh(option, short = 'f')]
    frame: Option<usize>,

    /// frame width in pixels
    #[argh(option, default = "DEFAULT_WIDTH")]
    width: usize,

    /// frame height in pixels
    #[argh(option, default = "DEFAULT_HEIGHT")]
    height: usize,

    /// bit layout to render with (vertical, horizontal), all if omitted
    #[argh(option, short = 'a')]
    addressing: Option<Addressing>,

    /// path to the .anim file
    #[argh(positional)]
    input: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let file = AnimFile::open(&args.input).expect("Failed to open animation");
    let size_check = file.size_check();
    let file_size = file.size;
    let mut anim = file.reader;

    let header = *anim.header();
    println!("{}", args.input);
    println!("  frames:      {}", header.frame_count());
    println!("  fps:         {} ({} ms per frame)", header.fps(), header.frame_delay_ms());
    println!("  slot size:   {}", header.max_compressed_size());
    println!("  data offset: {}", header.data_offset());
    println!(
        "  file size:   {} (expected {}, {})",
        file_size,
        header.container_size(),
        size_check
    );

    println!("  sizes:");
    for index in 0..anim.frame_count() {
        match anim.frame_size(index) {
            Ok(size) => println!("    {index:>5}: {size}"),
            Err(err) => println!("    {index:>5}: {err}"),
        }
    }

    let Some(index) = args.frame else {
        return;
    };
    let format = FrameFormat::new(args.width, args.height, Addressing::default());
    let mut frame = vec![0u8; format.frame_len()];
    anim.read_frame(index, &mut frame)
        .expect("Failed to decode frame");

    let layouts: Vec<Addressing> = match args.addressing {
        Some(addressing) => vec![addressing],
        None => Addressing::iter().collect(),
    };
    for addressing in layouts {
        let name: &'static str = addressing.into();
        println!();
        println!("frame {index} as {name}:");
        match bitmap::decode(&frame, &FrameFormat { addressing, ..format }) {
            Ok(grid) => render(&grid),
            Err(err) => println!("  {err}"),
        }
    }
}

fn render(grid: &PixelGrid) {
    for row in grid.rows() {
        let line: String = row.iter().map(|&lit| if lit { '#' } else { '.' }).collect();
        println!("{line}");
    }
    println!("{} of {} pixels lit", grid.lit_count(), grid.width() * grid.height());
}

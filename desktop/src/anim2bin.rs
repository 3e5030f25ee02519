use std::{fs, path::Path};

use argh::FromArgs;
use log::{error, info};
use oledanim_core::{
    AnimationHeader, DEFAULT_FPS, Manifest, ManifestEntry, container,
    manifest::{ANIM_EXTENSION, MANIFEST_FILE},
    rle,
};

use crate::header_source::parse_animation;

mod header_source;

#[derive(FromArgs)]
/// Convert animation headers into .anim containers plus a manifest
struct Args {
    /// output directory
    #[argh(option, short = 'o', default = "String::from(\"data\")")]
    output_dir: String,

    /// frame rate for headers that don't declare one
    #[argh(option, default = "DEFAULT_FPS")]
    fps: u16,

    /// animation header files (.h), raw or RLE, the file stem names the animation
    #[argh(positional)]
    inputs: Vec<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let output_dir = Path::new(&args.output_dir);
    fs::create_dir_all(output_dir).expect("Failed to create output directory");

    let mut manifest = Manifest::default();
    let mut total_size = 0;

    for input in &args.inputs {
        let path = Path::new(input);
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            error!("Skipping {input}: no usable file name");
            continue;
        };
        match convert(path, name, output_dir, args.fps) {
            Ok((header, size)) => {
                total_size += size;
                match ManifestEntry::from_header(name, &header) {
                    Ok(entry) => manifest.push(entry),
                    Err(err) => error!("{name}: left out of the manifest: {err}"),
                }
            }
            Err(err) => error!("Error processing {name}: {err}"),
        }
    }

    if manifest.entries.is_empty() {
        error!("No animations converted");
        return;
    }

    let manifest_path = output_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest.to_string()).expect("Failed to write manifest");
    info!("Created manifest: {:?}", manifest_path);
    info!(
        "Converted {} animations, {} bytes ({:.1} KB)",
        manifest.entries.len(),
        total_size,
        total_size as f64 / 1024.0
    );
}

fn convert(
    path: &Path,
    name: &str,
    output_dir: &Path,
    default_fps: u16,
) -> Result<(AnimationHeader, usize), Box<dyn std::error::Error>> {
    info!("Processing {:?}", path);
    let source = parse_animation(&fs::read_to_string(path)?)?;
    if source.compressed {
        info!("  RLE rows expanded to {} byte frames", source.frame_len);
    }
    let fps = source.fps.unwrap_or(default_fps);

    let blob = container::encode(&source.frames, fps)?;
    let header = AnimationHeader::parse(&blob)?;
    let raw: usize = source.frames.iter().map(Vec::len).sum();
    let packed: usize = source.frames.iter().map(|f| rle::compressed_len(f)).sum();
    info!(
        "  {} frames of {} bytes at {} fps, max compressed size {}, ratio {:.1}%",
        header.frame_count(),
        source.frame_len,
        fps,
        header.max_compressed_size(),
        packed as f64 * 100.0 / raw.max(1) as f64
    );

    let out_path = output_dir.join(format!("{name}.{ANIM_EXTENSION}"));
    fs::write(&out_path, &blob)?;
    info!("  Created {:?} ({} bytes)", out_path, blob.len());
    Ok((header, blob.len()))
}

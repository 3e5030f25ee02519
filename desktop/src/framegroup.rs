use std::{fs, path::Path};

use argh::FromArgs;
use log::{error, info, warn};
use oledanim_core::{
    Clip, DEFAULT_FPS, DEFAULT_THRESHOLD, Manifest, ManifestEntry, container,
    manifest::{ANIM_EXTENSION, MANIFEST_FILE},
    segment,
};

use crate::header_source::{FrameFile, load_frame_dir, write_header};

mod header_source;

#[derive(FromArgs)]
/// Split a directory of captured frame headers into clips at scene changes
struct Args {
    /// mean per-byte difference that starts a new clip
    #[argh(option, short = 't', default = "DEFAULT_THRESHOLD")]
    threshold: f64,

    /// frame rate of the exported clips
    #[argh(option, default = "DEFAULT_FPS")]
    fps: u16,

    /// write each clip as a .anim container into this directory
    #[argh(option, short = 'o')]
    output_dir: Option<String>,

    /// also write each clip as a C header next to the containers
    #[argh(switch)]
    headers: bool,

    /// file name prefix of the exported clips
    #[argh(option, default = "String::from(\"clip\")")]
    prefix: String,

    /// directory holding frame_NNNN.h files
    #[argh(positional)]
    frames_dir: String,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();
    let files = load_frame_dir(Path::new(&args.frames_dir)).expect("Failed to read frame directory");
    if files.is_empty() {
        error!("No frame files found in {}", args.frames_dir);
        return;
    }

    let frames: Vec<&[u8]> = files.iter().map(|file| file.bytes.as_slice()).collect();
    let clips = match segment::segment(&frames, args.threshold) {
        Ok(clips) => clips,
        Err(err) => {
            error!("Segmentation failed: {err}");
            return;
        }
    };

    report(&files, &clips);

    let Some(output_dir) = args.output_dir.as_deref() else {
        return;
    };
    let output_dir = Path::new(output_dir);
    fs::create_dir_all(output_dir).expect("Failed to create output directory");

    let mut manifest = Manifest::default();
    for (n, clip) in clips.iter().enumerate() {
        let name = format!("{}_{}", args.prefix, n + 1);
        let clip_frames = clip.select(&frames);

        match export(output_dir, &name, clip_frames, args.fps, args.headers) {
            Ok(entry) => manifest.push(entry),
            Err(err) => error!("Error exporting {name}: {err}"),
        }
    }

    if manifest.entries.is_empty() {
        warn!("No clips exported");
        return;
    }
    let manifest_path = output_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest.to_string()).expect("Failed to write manifest");
    info!(
        "Exported {} clips, manifest at {:?}",
        manifest.entries.len(),
        manifest_path
    );
}

fn report(files: &[FrameFile], clips: &[Clip]) {
    println!("{} frames in {} clips", files.len(), clips.len());
    for (n, clip) in clips.iter().enumerate() {
        println!(
            "clip {:>3}: frames {:>5}..={:<5} {:>5} frames  {:>6.1}s @10fps  {:>6.1}s @30fps",
            n + 1,
            files[clip.first()].number,
            files[clip.last()].number,
            clip.len(),
            clip.duration_ms(10) as f64 / 1000.0,
            clip.duration_ms(30) as f64 / 1000.0,
        );
    }
}

fn export(
    output_dir: &Path,
    name: &str,
    frames: &[&[u8]],
    fps: u16,
    headers: bool,
) -> Result<ManifestEntry, Box<dyn std::error::Error>> {
    let blob = container::encode(frames, fps)?;
    let header = oledanim_core::AnimationHeader::parse(&blob)?;
    let anim_path = output_dir.join(format!("{name}.{ANIM_EXTENSION}"));
    fs::write(&anim_path, &blob)?;
    info!("Created {:?} ({} frames, {} bytes)", anim_path, frames.len(), blob.len());

    if headers {
        let mut text = String::new();
        write_header(&mut text, name, frames, fps)?;
        let header_path = output_dir.join(format!("{name}.h"));
        fs::write(&header_path, text)?;
        info!("Created {:?}", header_path);
    }

    Ok(ManifestEntry::from_header(name, &header)?)
}

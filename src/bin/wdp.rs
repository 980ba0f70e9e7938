use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "wdp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a directory or a comma-separated list of images into a WDP archive.
    Pack(PackArgs),
    /// Print the header and per-frame summary of a WDP archive.
    Inspect(InspectArgs),
    /// Render one viewer frame, overlay included, as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct PackArgs {
    /// Input directory, or image paths separated by commas.
    #[arg(long = "in")]
    input: String,

    /// Output archive path.
    #[arg(long)]
    out: PathBuf,

    /// JPEG quality in [0.01, 1.0]. 1.0 copies `.jpg` inputs unchanged.
    #[arg(long)]
    quality: f32,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input archive.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print a JSON summary instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input archive.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    index: u32,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Viewer options JSON; flags below override it.
    #[arg(long)]
    options: Option<PathBuf>,

    /// Rotation in degrees.
    #[arg(long, allow_negative_numbers = true)]
    rotate: Option<f64>,

    /// Mirror horizontally.
    #[arg(long)]
    flip: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Pack(args) => cmd_pack(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn cmd_pack(args: PackArgs) -> anyhow::Result<()> {
    let input = wdp::PackInput::parse(&args.input);
    let report = wdp::pack_images(&input, &args.out, args.quality)
        .with_context(|| format!("pack '{}'", args.input))?;

    if !report.written {
        eprintln!("no images found in '{}', nothing written", args.input);
        return Ok(());
    }
    for path in &report.skipped {
        eprintln!("skipped unreadable image '{}'", path.display());
    }
    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        report.frame_count
    );
    Ok(())
}

fn read_archive(path: &Path) -> anyhow::Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("read archive '{}'", path.display()))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = read_archive(&args.in_path)?;
    let (metadata, stream) = wdp::open(bytes)
        .with_context(|| format!("open archive '{}'", args.in_path.display()))?;

    let mut frames = Vec::new();
    let mut warnings = Vec::new();
    for slot in stream {
        match slot {
            Ok(frame) => frames.push((frame.index, frame.width(), frame.height())),
            Err(warning) => warnings.push(warning),
        }
    }

    if args.json {
        let summary = serde_json::json!({
            "metadata": metadata,
            "frames": frames
                .iter()
                .map(|(index, width, height)| {
                    serde_json::json!({ "index": index, "width": width, "height": height })
                })
                .collect::<Vec<_>>(),
            "warnings": warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("protocol version: {}", metadata.protocol_version);
    println!("frames: {}", metadata.frame_count);
    for (index, width, height) in &frames {
        println!("  frame {index}: {width}x{height}");
    }
    for warning in &warnings {
        println!("  warning: {warning}");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut options = match &args.options {
        Some(path) => wdp::ViewerOptions::from_json_file(path)?,
        None => wdp::ViewerOptions::default(),
    };
    if let Some(deg) = args.rotate {
        options.rotation_degrees = deg;
    }
    if args.flip {
        options.flip_horizontal = true;
    }
    options.validate()?;

    let surface = wdp::CpuSurface::new(wdp::Viewport::new(args.width, args.height))?;
    let mut viewer = wdp::Viewer::open(surface, options);
    let location = args.in_path.to_string_lossy();
    let (metadata, warnings) = viewer
        .load(&location)
        .into_result()
        .with_context(|| format!("load archive '{}'", args.in_path.display()))?;
    for warning in &warnings {
        eprintln!("warning: {warning}");
    }

    if args.index >= metadata.frame_count {
        anyhow::bail!(
            "frame index {} out of range (archive has {} frames)",
            args.index,
            metadata.frame_count
        );
    }
    viewer.controller_mut().seek(args.index)?;

    let frame = viewer.surface().snapshot().into_unpremultiplied();

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

use std::{
    fs::File,
    io::{BufWriter, Cursor, Seek, Write},
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::{info, warn};
use zip::write::SimpleFileOptions;

use crate::{
    container::reader::{COUNT_ENTRY, PROTOCOL_VERSION, VERSION_ENTRY, frame_entry_name},
    foundation::error::{WdpError, WdpResult},
};

/// Streams a WDP archive: header entries first, then `image{i}.jpg` entries.
pub struct WdpWriter<W: Write + Seek> {
    zip: zip::ZipWriter<W>,
    frame_count: u32,
    options: SimpleFileOptions,
}

impl<W: Write + Seek> WdpWriter<W> {
    /// Start an archive declaring `frame_count` frames at [`PROTOCOL_VERSION`].
    pub fn new(writer: W, frame_count: u32) -> WdpResult<Self> {
        Self::with_version(writer, PROTOCOL_VERSION, frame_count)
    }

    /// Start an archive with an explicit version string.
    ///
    /// Readers in this crate only accept [`PROTOCOL_VERSION`].
    pub fn with_version(writer: W, version: &str, frame_count: u32) -> WdpResult<Self> {
        let declared = i32::try_from(frame_count).map_err(|_| {
            WdpError::validation(format!("frame count {frame_count} exceeds i32::MAX"))
        })?;

        let mut out = Self {
            zip: zip::ZipWriter::new(writer),
            frame_count,
            options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
        };
        out.write_entry(VERSION_ENTRY, version.as_bytes())?;
        out.write_entry(COUNT_ENTRY, &declared.to_be_bytes())?;
        Ok(out)
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Write the encoded bytes of frame `index`.
    pub fn write_frame(&mut self, index: u32, jpeg: &[u8]) -> WdpResult<()> {
        if index >= self.frame_count {
            return Err(WdpError::validation(format!(
                "frame index {index} out of range for {} declared frames",
                self.frame_count
            )));
        }
        self.write_entry(&frame_entry_name(index), jpeg)
    }

    /// Write the central directory and hand back the underlying writer.
    pub fn finish(self) -> WdpResult<W> {
        self.zip
            .finish()
            .map_err(|e| WdpError::archive(format!("finish archive: {e}")))
    }

    fn write_entry(&mut self, name: &str, bytes: &[u8]) -> WdpResult<()> {
        self.zip
            .start_file(name, self.options)
            .map_err(|e| WdpError::archive(format!("start entry '{name}': {e}")))?;
        self.zip
            .write_all(bytes)
            .with_context(|| format!("write entry '{name}'"))?;
        Ok(())
    }
}

/// Build an in-memory archive holding `frames` as `image0.jpg ..`.
pub fn write_archive(frames: &[Vec<u8>]) -> WdpResult<Vec<u8>> {
    let count = u32::try_from(frames.len())
        .map_err(|_| WdpError::validation("too many frames for one archive"))?;
    let mut writer = WdpWriter::new(Cursor::new(Vec::new()), count)?;
    for (index, bytes) in (0u32..).zip(frames) {
        writer.write_frame(index, bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}

/// Images to pack: every image file in a directory, or an explicit list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PackInput {
    Directory(PathBuf),
    Files(Vec<PathBuf>),
}

impl PackInput {
    /// Interpret a CLI argument: an existing directory, else a comma-separated path list.
    pub fn parse(arg: &str) -> Self {
        let path = Path::new(arg);
        if path.is_dir() {
            return Self::Directory(path.to_path_buf());
        }
        Self::Files(
            arg.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect(),
        )
    }

    fn resolve(&self) -> WdpResult<Vec<PathBuf>> {
        match self {
            Self::Files(files) => Ok(files.clone()),
            Self::Directory(dir) => {
                if !dir.is_dir() {
                    return Err(WdpError::validation(format!(
                        "input path '{}' is not a directory",
                        dir.display()
                    )));
                }
                let mut files = Vec::new();
                let listing = std::fs::read_dir(dir)
                    .with_context(|| format!("list directory '{}'", dir.display()))?;
                for entry in listing {
                    let path = entry
                        .with_context(|| format!("list directory '{}'", dir.display()))?
                        .path();
                    if path.is_file() && has_image_extension(&path) {
                        files.push(path);
                    }
                }
                files.sort();
                Ok(files)
            }
        }
    }
}

/// Result of [`pack_images`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackReport {
    /// Declared frame count (one per input file, including skipped ones).
    pub frame_count: u32,
    /// Inputs that could not be read as images; their slots are left empty.
    pub skipped: Vec<PathBuf>,
    /// Whether an archive was written at all.
    pub written: bool,
}

/// Pack images into a WDP archive at `out_path`.
///
/// `quality` is the JPEG quality in `[0.01, 1.0]`. At `1.0`, `.jpg` inputs are copied
/// byte for byte; everything else is re-encoded. An empty directory writes nothing.
pub fn pack_images(input: &PackInput, out_path: &Path, quality: f32) -> WdpResult<PackReport> {
    if !(0.01..=1.0).contains(&quality) {
        return Err(WdpError::validation(
            "compression quality must be between 0.01 and 1.0",
        ));
    }

    let files = input.resolve()?;
    if files.is_empty() && matches!(input, PackInput::Directory(_)) {
        warn!("no image files found in the input directory");
        return Ok(PackReport::default());
    }

    let frame_count = u32::try_from(files.len())
        .map_err(|_| WdpError::validation("too many input images"))?;

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(out_path)
        .with_context(|| format!("create archive '{}'", out_path.display()))?;
    let mut writer = WdpWriter::new(BufWriter::new(file), frame_count)?;

    let mut skipped = Vec::new();
    for (index, path) in (0u32..).zip(&files) {
        match encode_frame(path, quality)? {
            Some(bytes) => writer.write_frame(index, &bytes)?,
            None => skipped.push(path.clone()),
        }
    }
    writer
        .finish()?
        .flush()
        .with_context(|| format!("flush archive '{}'", out_path.display()))?;

    info!(
        frame_count,
        skipped = skipped.len(),
        out = %out_path.display(),
        "packed images"
    );
    Ok(PackReport {
        frame_count,
        skipped,
        written: true,
    })
}

fn encode_frame(path: &Path, quality: f32) -> WdpResult<Option<Vec<u8>>> {
    let img = match image::open(path) {
        Ok(img) => img,
        Err(err) => {
            warn!(path = %path.display(), %err, "skipping file (not an image)");
            return Ok(None);
        }
    };

    if quality >= 1.0 && extension_is(path, "jpg") {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        return Ok(Some(bytes));
    }

    let jpeg_quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, jpeg_quality)
        .encode_image(&rgb)
        .with_context(|| format!("encode jpeg for '{}'", path.display()))?;
    Ok(Some(buf))
}

fn extension_is(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn has_image_extension(path: &Path) -> bool {
    ["jpg", "jpeg", "png"]
        .iter()
        .any(|ext| extension_is(path, ext))
}

#[cfg(test)]
#[path = "../../tests/unit/container/writer.rs"]
mod tests;

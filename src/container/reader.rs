use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::{
    container::archive::{ArchiveEntries, ZipEntries},
    container::decode::{Bitmap, FrameDecoder, ImageDecoder},
    foundation::error::{FrameWarning, WdpError, WdpResult},
};

/// The only protocol revision this reader accepts.
pub const PROTOCOL_VERSION: &str = "1.0.0";
/// Entry holding the protocol version as UTF-8 text.
pub const VERSION_ENTRY: &str = "protocolVersion";
/// Entry holding the frame count as a 4-byte big-endian `i32`.
pub const COUNT_ENTRY: &str = "totalImages";

/// Archive entry name for frame `index`.
pub fn frame_entry_name(index: u32) -> String {
    format!("image{index}.jpg")
}

/// Inverse of [`frame_entry_name`]; only canonical names match.
fn parse_frame_entry_name(name: &str) -> Option<u32> {
    let index: u32 = name.strip_prefix("image")?.strip_suffix(".jpg")?.parse().ok()?;
    (frame_entry_name(index) == name).then_some(index)
}

/// Frame indices below `frame_count` that have an entry, or `None` when the unpacker
/// cannot list its entries.
fn listed_frames(entries: &dyn ArchiveEntries, frame_count: u32) -> Option<BTreeSet<u32>> {
    let names = entries.entry_names()?;
    Some(
        names
            .iter()
            .filter_map(|name| parse_frame_entry_name(name))
            .filter(|index| *index < frame_count)
            .collect(),
    )
}

/// Header of a WDP archive.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct WdpMetadata {
    pub protocol_version: String,
    pub frame_count: u32,
}

/// One decoded frame of the sequence.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Zero-based position in the sequence.
    pub index: u32,
    pub bitmap: Bitmap,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.bitmap.width
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height
    }
}

/// Outcome of one load attempt for a single index.
pub type FrameSlot = Result<Frame, FrameWarning>;

/// Validate the header entries and return the archive metadata.
pub fn read_metadata(entries: &mut dyn ArchiveEntries) -> WdpResult<WdpMetadata> {
    let raw_version = entries
        .read_entry(VERSION_ENTRY)?
        .ok_or_else(|| WdpError::malformed_header(format!("missing '{VERSION_ENTRY}' entry")))?;
    let text = String::from_utf8_lossy(&raw_version);
    let found = text.trim();
    if found != PROTOCOL_VERSION {
        return Err(WdpError::version_mismatch(PROTOCOL_VERSION, found));
    }

    let raw_count = entries
        .read_entry(COUNT_ENTRY)?
        .ok_or_else(|| WdpError::malformed_header(format!("missing '{COUNT_ENTRY}' entry")))?;
    let count_bytes: [u8; 4] = raw_count.as_slice().try_into().map_err(|_| {
        WdpError::malformed_header(format!(
            "'{COUNT_ENTRY}' must be exactly 4 bytes, got {}",
            raw_count.len()
        ))
    })?;
    let declared = i32::from_be_bytes(count_bytes);
    let frame_count = u32::try_from(declared).map_err(|_| {
        WdpError::malformed_header(format!("negative frame count {declared}"))
    })?;

    Ok(WdpMetadata {
        protocol_version: found.to_string(),
        frame_count,
    })
}

/// Open an in-memory WDP archive with the default ZIP unpacker and image decoder.
///
/// Header problems abort with no frames produced. Frames are decoded lazily as the
/// returned stream is iterated.
pub fn open(bytes: Vec<u8>) -> WdpResult<(WdpMetadata, FrameStream<ZipEntries, ImageDecoder>)> {
    let entries = ZipEntries::from_bytes(bytes)?;
    open_entries(entries, ImageDecoder)
}

/// Like [`open`], for caller-provided unpackers and decoders.
pub fn open_entries<A, D>(mut entries: A, decoder: D) -> WdpResult<(WdpMetadata, FrameStream<A, D>)>
where
    A: ArchiveEntries,
    D: FrameDecoder,
{
    let metadata = read_metadata(&mut entries)?;
    let listed = listed_frames(&entries, metadata.frame_count);
    debug!(
        frame_count = metadata.frame_count,
        listed = listed.as_ref().map(BTreeSet::len),
        "validated WDP header"
    );
    let stream = FrameStream {
        entries,
        decoder,
        next: 0,
        listed,
        frame_count: metadata.frame_count,
        reported_complete: false,
    };
    Ok((metadata, stream))
}

/// Sequential, in-order frame decoder.
///
/// Each call to `next` reads and decodes at most one entry, so frame `i + 1` is never
/// touched before frame `i` has been produced. Yields one [`FrameSlot`] per present
/// frame and one warning per run of absent ones, then `None`. A run longer than one
/// index is a single [`FrameWarning::MissingFrames`], so work and memory follow the
/// entries the archive holds, not the count its header declares.
pub struct FrameStream<A, D> {
    entries: A,
    decoder: D,
    next: u32,
    /// Frame indices the archive lists, when known.
    listed: Option<BTreeSet<u32>>,
    frame_count: u32,
    reported_complete: bool,
}

impl<A: ArchiveEntries, D: FrameDecoder> FrameStream<A, D> {
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Number of indices already attempted.
    pub fn attempted(&self) -> u32 {
        self.next
    }

    pub fn is_complete(&self) -> bool {
        self.next >= self.frame_count
    }

    fn missing_run(&mut self, start: u32, end: u32) -> FrameSlot {
        self.next = end;
        if end - start == 1 {
            warn!(index = start, "frame entry not found, skipping");
            return Err(FrameWarning::MissingFrame { index: start });
        }
        warn!(start, end, "frame entries not found, skipping run");
        Err(FrameWarning::MissingFrames { start, end })
    }

    fn remaining_slots(&self) -> usize {
        if self.is_complete() {
            return 0;
        }
        let Some(listed) = &self.listed else {
            return (self.frame_count - self.next) as usize;
        };
        let mut slots = 0;
        let mut cursor = self.next;
        for &index in listed.range(self.next..) {
            if index > cursor {
                slots += 1;
            }
            slots += 1;
            cursor = index + 1;
        }
        if cursor < self.frame_count {
            slots += 1;
        }
        slots
    }

    fn load_slot(&mut self, index: u32) -> FrameSlot {
        let name = frame_entry_name(index);
        let bytes = match self.entries.read_entry(&name) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                warn!(index, entry = %name, "frame entry not found, skipping");
                return Err(FrameWarning::MissingFrame { index });
            }
            Err(err) => {
                warn!(index, entry = %name, %err, "frame entry unreadable, skipping");
                return Err(FrameWarning::DecodeFailure {
                    index,
                    reason: err.to_string(),
                });
            }
        };

        match self.decoder.decode(&bytes) {
            Ok(bitmap) => Ok(Frame { index, bitmap }),
            Err(err) => {
                warn!(index, entry = %name, %err, "frame failed to decode, skipping");
                Err(FrameWarning::DecodeFailure {
                    index,
                    reason: err.to_string(),
                })
            }
        }
    }
}

impl<A: ArchiveEntries, D: FrameDecoder> Iterator for FrameStream<A, D> {
    type Item = FrameSlot;

    fn next(&mut self) -> Option<FrameSlot> {
        if self.is_complete() {
            if !self.reported_complete {
                self.reported_complete = true;
                debug!(frame_count = self.frame_count, "frame stream complete");
            }
            return None;
        }
        let index = self.next;
        if let Some(listed) = &self.listed
            && !listed.contains(&index)
        {
            let end = listed
                .range(index..)
                .next()
                .copied()
                .unwrap_or(self.frame_count);
            return Some(self.missing_run(index, end));
        }
        self.next += 1;
        Some(self.load_slot(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_slots();
        (remaining, Some(remaining))
    }
}

impl<A, D> std::fmt::Debug for FrameStream<A, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameStream")
            .field("next", &self.next)
            .field("listed", &self.listed.as_ref().map(BTreeSet::len))
            .field("frame_count", &self.frame_count)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/reader.rs"]
mod tests;

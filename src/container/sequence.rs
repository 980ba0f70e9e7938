use std::collections::BTreeMap;

use crate::{
    container::reader::{Frame, FrameSlot},
    foundation::error::FrameWarning,
};

/// Fixed-size frame slots for one loaded archive.
///
/// The declared frame count never shrinks: a missing or undecodable frame leaves an
/// empty slot at its index. Slots are filled in index order while loading. Only
/// decoded frames are stored, so memory follows what the archive holds rather than
/// what its header declares.
#[derive(Clone, Debug, Default)]
pub struct FrameSequence {
    frame_count: u32,
    loaded: u32,
    frames: BTreeMap<u32, Frame>,
    warnings: Vec<FrameWarning>,
}

impl FrameSequence {
    pub fn new(frame_count: u32) -> Self {
        Self {
            frame_count,
            loaded: 0,
            frames: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    /// Declared number of frames.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Number of indices attempted so far (the contiguous loaded prefix).
    pub fn loaded(&self) -> u32 {
        self.loaded
    }

    /// Number of slots holding a decoded frame.
    pub fn available(&self) -> u32 {
        self.frames.len() as u32
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.frame_count
    }

    pub fn warnings(&self) -> &[FrameWarning] {
        &self.warnings
    }

    pub fn get(&self, index: u32) -> Option<&Frame> {
        self.frames.get(&index)
    }

    /// Record the next slot. Returns the index it landed in, or `None` when it was out
    /// of order or beyond the declared count.
    ///
    /// A ranged warning fills every slot it covers.
    pub fn push(&mut self, slot: FrameSlot) -> Option<u32> {
        let (index, end) = match &slot {
            Ok(frame) => (frame.index, frame.index.saturating_add(1)),
            Err(warning) => (warning.index(), warning.end()),
        };
        if index != self.loaded || index >= self.frame_count || end > self.frame_count {
            tracing::warn!(
                index,
                expected = self.loaded,
                frame_count = self.frame_count,
                "ignoring out-of-order frame slot"
            );
            return None;
        }

        match slot {
            Ok(frame) => {
                self.frames.insert(index, frame);
            }
            Err(warning) => self.warnings.push(warning),
        }
        self.loaded = end;
        Some(index)
    }

    /// Iterate over the decoded frames in index order, skipping holes.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.values()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/sequence.rs"]
mod tests;

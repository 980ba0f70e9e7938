//! Viewer engine for WDP packaged image sequences.
//!
//! A WDP archive is a ZIP file holding a protocol version, a frame count and a run of
//! JPEG frames. This crate reads and writes such archives and drives an interactive
//! viewer over them: pointer, progress-bar and tilt scrubbing map onto frame indices,
//! and each frame is fitted, rotated and mirrored into a resizable canvas.
//!
//! # Pipeline overview
//!
//! 1. **Fetch**: `location -> bytes` via a [`Fetcher`]
//! 2. **Open**: `bytes -> (WdpMetadata, FrameStream)`; the header is validated eagerly
//! 3. **Decode**: frames are pulled one at a time, in index order, into a [`FrameSequence`]
//! 4. **Control**: [`InputEvent`]s update the [`ViewerState`] through a [`ViewController`]
//! 5. **Render**: every redraw compiles a [`DrawPlan`] and presents it to a [`Surface`]
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Holes, not shifts**: a missing frame leaves an empty slot; the declared frame count
//!   never shrinks.
//! - **Clamped indices**: every mapper clamps, so no out-of-range index reaches a renderer.
//! - **Premultiplied RGBA8** bitmaps end-to-end.
#![forbid(unsafe_code)]

mod container;
mod foundation;
mod mapping;
mod render;
mod viewer;

pub use container::archive::{ArchiveEntries, MemoryEntries, ZipEntries};
pub use container::decode::{Bitmap, FrameDecoder, ImageDecoder, decode_bitmap};
pub use container::fetch::{Fetcher, FsFetcher, MemoryFetcher};
pub use container::reader::{
    COUNT_ENTRY, Frame, FrameSlot, FrameStream, PROTOCOL_VERSION, VERSION_ENTRY, WdpMetadata,
    frame_entry_name, open, open_entries, read_metadata,
};
pub use container::sequence::FrameSequence;
pub use container::writer::{PackInput, PackReport, WdpWriter, pack_images, write_archive};
pub use foundation::core::{Affine, Point, Rect, Rgba8, Size, Vec2, Viewport};
pub use foundation::error::{FrameWarning, WdpError, WdpResult};
pub use mapping::index::{
    DEFAULT_EDGE_THRESHOLD_PX, DEFAULT_TILT_THRESHOLD_DEG, IndexMapper, from_pointer_x,
    from_progress_bar_x, from_tilt,
};
pub use render::overlay::{indicator_text, progress_fraction};
pub use render::{
    BarPosition, CpuSurface, DrawOp, DrawPlan, FrameRGBA, Layout, OverlayOptions, PlanFrame,
    PlanInput, ProgressBarGeometry, RecordingSurface, Surface, TrackCorner, compile_plan,
    compute_layout,
};
pub use viewer::{
    DragSource, InputEvent, InputReceiver, InputSender, LoadOutcome, Phase, PointerState,
    ViewController, Viewer, ViewerOptions, ViewerState,
};

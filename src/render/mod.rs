//! Frame placement, overlay geometry and rasterization.
//!
//! A redraw is compiled into a [`DrawPlan`] of backend-agnostic ops and handed to a
//! [`Surface`]. [`CpuSurface`] rasterizes plans with `vello_cpu`;
//! [`RecordingSurface`] keeps them for inspection.

pub mod cpu;
pub mod glyphs;
pub mod layout;
pub mod overlay;
pub mod plan;
pub mod surface;

pub use cpu::{CpuSurface, FrameRGBA};
pub use layout::{Layout, compute_layout};
pub use overlay::{BarPosition, OverlayOptions, ProgressBarGeometry, TrackCorner};
pub use plan::{DrawOp, DrawPlan, PlanFrame, PlanInput, compile_plan};
pub use surface::{RecordingSurface, Surface};

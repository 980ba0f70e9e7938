use std::path::Path;

use anyhow::Context;

use crate::{
    foundation::error::{WdpError, WdpResult},
    mapping::index::{DEFAULT_EDGE_THRESHOLD_PX, DEFAULT_TILT_THRESHOLD_DEG, IndexMapper},
    render::overlay::{BarPosition, OverlayOptions, TrackCorner},
};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Presentation and input settings of one viewer.
///
/// Every field is optional in JSON; missing fields take the [`Default`] value.
pub struct ViewerOptions {
    /// Anchor of the `current/total` indicator. Unknown codes fall back to `br`.
    pub track_corner: TrackCorner,
    /// Draw the track indicator.
    pub show_index: bool,
    /// Draw the progress bar and accept scrubbing on it.
    pub show_progress_bar: bool,
    /// Progress bar edge.
    pub progress_bar_position: BarPosition,
    /// Clockwise frame rotation in degrees.
    pub rotation_degrees: f64,
    /// Mirror frames along the vertical axis.
    pub flip_horizontal: bool,
    /// Width of the canvas edge zones that jump to the first/last frame.
    pub edge_threshold_px: f64,
    /// Tilt dead zone; a gamma beyond it steps one frame.
    pub tilt_threshold_deg: f64,
    /// Step frames from device tilt while no pointer drag is active.
    pub tilt_control: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            track_corner: TrackCorner::BottomRight,
            show_index: true,
            show_progress_bar: true,
            progress_bar_position: BarPosition::Bottom,
            rotation_degrees: 0.0,
            flip_horizontal: false,
            edge_threshold_px: DEFAULT_EDGE_THRESHOLD_PX,
            tilt_threshold_deg: DEFAULT_TILT_THRESHOLD_DEG,
            tilt_control: true,
        }
    }
}

impl ViewerOptions {
    pub fn from_json_str(json: &str) -> WdpResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| WdpError::validation(format!("invalid viewer options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn from_json_file(path: &Path) -> WdpResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read viewer options '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> WdpResult<()> {
        if !self.rotation_degrees.is_finite() {
            return Err(WdpError::validation("rotation_degrees must be finite"));
        }
        for (name, v) in [
            ("edge_threshold_px", self.edge_threshold_px),
            ("tilt_threshold_deg", self.tilt_threshold_deg),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(WdpError::validation(format!(
                    "{name} must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    pub fn mapper(&self) -> IndexMapper {
        IndexMapper {
            edge_threshold_px: self.edge_threshold_px,
            tilt_threshold_deg: self.tilt_threshold_deg,
        }
    }

    pub fn overlay(&self) -> OverlayOptions {
        OverlayOptions {
            track_corner: self.track_corner,
            show_index: self.show_index,
            show_progress_bar: self.show_progress_bar,
            progress_bar_position: self.progress_bar_position,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewer/options.rs"]
mod tests;

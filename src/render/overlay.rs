//! Overlay geometry: progress bar, track indicator and loading badge.
//!
//! Everything here is pure layout in canvas pixels. The draw plan turns these
//! rectangles into fill ops; the controller uses [`ProgressBarGeometry`] for
//! hit-testing pointer input.

use std::fmt;

use crate::foundation::core::{Point, Rect, Rgba8, Size, Viewport};
use crate::render::glyphs;

/// Distance between overlay elements and the canvas edge.
pub const MARGIN_PX: f64 = 10.0;
/// Progress bar track width relative to the canvas width.
pub const BAR_WIDTH_FRACTION: f64 = 0.8;
pub const BAR_HEIGHT_PX: f64 = 10.0;
/// Extra vertical reach of the progress bar hit area.
pub const BAR_HIT_SLOP_PX: f64 = 4.0;
/// Side of one glyph cell for overlay text.
pub const GLYPH_CELL_PX: f64 = 2.0;

const INDICATOR_PADDING: Size = Size::new(5.0, 2.0);
const LOADING_PADDING: Size = Size::new(20.0, 10.0);

pub const TRACK_COLOR: Rgba8 = Rgba8::new(255, 255, 255, 51);
pub const FILL_COLOR: Rgba8 = Rgba8::new(0, 123, 255, 204);
pub const INDICATOR_BACKGROUND: Rgba8 = Rgba8::new(0, 0, 0, 128);
pub const LOADING_BACKGROUND: Rgba8 = Rgba8::new(0, 0, 0, 179);
pub const TEXT_COLOR: Rgba8 = Rgba8::WHITE;

pub const LOADING_LABEL: &str = "Loading...";

/// Anchor of the track indicator: vertical band (`t`/`m`/`b`) then horizontal
/// band (`l`/`c`/`r`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TrackCorner {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    #[default]
    BottomRight,
}

impl TrackCorner {
    pub const ALL: [TrackCorner; 9] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleLeft,
        Self::MiddleCenter,
        Self::MiddleRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Self::TopLeft => "tl",
            Self::TopCenter => "tc",
            Self::TopRight => "tr",
            Self::MiddleLeft => "ml",
            Self::MiddleCenter => "mc",
            Self::MiddleRight => "mr",
            Self::BottomLeft => "bl",
            Self::BottomCenter => "bc",
            Self::BottomRight => "br",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Like [`TrackCorner::parse`], falling back to bottom-right with a warning.
    pub fn parse_or_default(code: &str) -> Self {
        Self::parse(code).unwrap_or_else(|| {
            tracing::warn!(position = code, "invalid track indicator position, using br");
            Self::default()
        })
    }

    /// Place a box of `size` inside `viewport` at this anchor.
    pub fn place(self, size: Size, viewport: Viewport) -> Rect {
        let vw = viewport.width_f64();
        let vh = viewport.height_f64();
        let x = match self {
            Self::TopLeft | Self::MiddleLeft | Self::BottomLeft => MARGIN_PX,
            Self::TopCenter | Self::MiddleCenter | Self::BottomCenter => (vw - size.width) / 2.0,
            Self::TopRight | Self::MiddleRight | Self::BottomRight => vw - MARGIN_PX - size.width,
        };
        let y = match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => MARGIN_PX,
            Self::MiddleLeft | Self::MiddleCenter | Self::MiddleRight => {
                (vh - size.height) / 2.0
            }
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => {
                vh - MARGIN_PX - size.height
            }
        };
        Rect::from_origin_size(Point::new(x, y), size)
    }
}

impl fmt::Display for TrackCorner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for TrackCorner {
    fn from(code: String) -> Self {
        Self::parse_or_default(code.trim())
    }
}

impl From<TrackCorner> for String {
    fn from(corner: TrackCorner) -> Self {
        corner.code().to_owned()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    Top,
    #[default]
    Bottom,
}

/// Overlay switches shared by the draw plan and the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayOptions {
    pub track_corner: TrackCorner,
    pub show_index: bool,
    pub show_progress_bar: bool,
    pub progress_bar_position: BarPosition,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            track_corner: TrackCorner::BottomRight,
            show_index: true,
            show_progress_bar: true,
            progress_bar_position: BarPosition::Bottom,
        }
    }
}

/// Horizontally centered progress bar track.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressBarGeometry {
    pub track: Rect,
}

impl ProgressBarGeometry {
    /// `None` for an empty viewport.
    pub fn for_viewport(viewport: Viewport, position: BarPosition) -> Option<Self> {
        if viewport.is_empty() {
            return None;
        }
        let vw = viewport.width_f64();
        let width = vw * BAR_WIDTH_FRACTION;
        let x0 = (vw - width) / 2.0;
        let y0 = match position {
            BarPosition::Top => MARGIN_PX,
            BarPosition::Bottom => viewport.height_f64() - MARGIN_PX - BAR_HEIGHT_PX,
        };
        Some(Self {
            track: Rect::new(x0, y0, x0 + width, y0 + BAR_HEIGHT_PX),
        })
    }

    pub fn origin_x(&self) -> f64 {
        self.track.x0
    }

    pub fn width(&self) -> f64 {
        self.track.width()
    }

    pub fn hit_test(&self, point: Point) -> bool {
        self.track.inflate(0.0, BAR_HIT_SLOP_PX).contains(point)
    }

    /// Filled portion of the track for frame `index` of `total`.
    pub fn fill_rect(&self, index: u32, total: u32) -> Rect {
        let mut fill = self.track;
        fill.x1 = fill.x0 + self.width() * progress_fraction(index, total);
        fill
    }
}

/// `(index + 1) / total`, clamped to `[0, 1]`.
pub fn progress_fraction(index: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((f64::from(index) + 1.0) / f64::from(total)).min(1.0)
}

pub fn indicator_text(index: u32, total: u32) -> String {
    format!("{}/{}", u64::from(index) + 1, total)
}

/// Background box of the track indicator and the origin of its text.
pub fn indicator_box(text: &str, corner: TrackCorner, viewport: Viewport) -> (Rect, Point) {
    padded_box(text, INDICATOR_PADDING, |size| corner.place(size, viewport))
}

/// Centered loading badge and the origin of its label.
pub fn loading_box(viewport: Viewport) -> (Rect, Point) {
    padded_box(LOADING_LABEL, LOADING_PADDING, |size| {
        TrackCorner::MiddleCenter.place(size, viewport)
    })
}

fn padded_box(text: &str, padding: Size, place: impl FnOnce(Size) -> Rect) -> (Rect, Point) {
    let text_size = glyphs::text_size(text, GLYPH_CELL_PX);
    let outer = Size::new(
        text_size.width + 2.0 * padding.width,
        text_size.height + 2.0 * padding.height,
    );
    let rect = place(outer);
    let origin = Point::new(rect.x0 + padding.width, rect.y0 + padding.height);
    (rect, origin)
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;

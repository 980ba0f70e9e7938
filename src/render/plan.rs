use crate::foundation::core::{Affine, Point, Rect, Rgba8, Viewport};
use crate::render::layout::compute_layout;
use crate::render::overlay::{self, OverlayOptions, ProgressBarGeometry};

/// One backend-agnostic drawing step. Ops are applied in order, later ops on top.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Reset every canvas pixel to `color`.
    Clear { color: Rgba8 },
    /// Draw frame `index` with `transform` mapping its pixel space onto the canvas.
    Frame { index: u32, transform: Affine },
    FillRect { rect: Rect, color: Rgba8 },
    /// Glyph text with its top-left corner at `origin`, `cell` pixels per glyph cell.
    Text {
        origin: Point,
        text: String,
        cell: f64,
        color: Rgba8,
    },
}

/// Everything a [`Surface`](crate::Surface) needs to present one redraw.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawPlan {
    pub canvas: Viewport,
    pub ops: Vec<DrawOp>,
}

impl DrawPlan {
    /// Index of the frame drawn by this plan, if any.
    pub fn frame_index(&self) -> Option<u32> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Frame { index, .. } => Some(*index),
            _ => None,
        })
    }

    /// Texts drawn by this plan, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Pixel size of the frame to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanFrame {
    pub index: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct PlanInput {
    pub viewport: Viewport,
    /// `None` while nothing is decoded yet, or the current slot is a hole.
    pub frame: Option<PlanFrame>,
    pub current_index: u32,
    /// Denominator for the indicator and progress fill.
    pub total: u32,
    pub rotation_degrees: f64,
    pub flip_horizontal: bool,
    pub overlay: OverlayOptions,
    pub loading: bool,
}

/// Build the draw plan for one redraw: clear, frame, progress bar, indicator,
/// then the loading badge.
pub fn compile_plan(input: &PlanInput) -> DrawPlan {
    let mut ops = vec![DrawOp::Clear {
        color: Rgba8::TRANSPARENT,
    }];
    let viewport = input.viewport;
    if viewport.is_empty() {
        return DrawPlan {
            canvas: viewport,
            ops,
        };
    }

    if let Some(frame) = input.frame {
        let (fw, fh) = (f64::from(frame.width), f64::from(frame.height));
        let layout = compute_layout(
            fw,
            fh,
            viewport.width_f64(),
            viewport.height_f64(),
            input.rotation_degrees,
            input.flip_horizontal,
        );
        if !layout.is_empty() {
            ops.push(DrawOp::Frame {
                index: frame.index,
                transform: layout.frame_transform(fw, fh),
            });
        }
    }

    let overlay_opts = input.overlay;
    if input.total > 0 {
        if overlay_opts.show_progress_bar
            && let Some(bar) =
                ProgressBarGeometry::for_viewport(viewport, overlay_opts.progress_bar_position)
        {
            ops.push(DrawOp::FillRect {
                rect: bar.track,
                color: overlay::TRACK_COLOR,
            });
            let fill = bar.fill_rect(input.current_index, input.total);
            if fill.width() > 0.0 {
                ops.push(DrawOp::FillRect {
                    rect: fill,
                    color: overlay::FILL_COLOR,
                });
            }
        }

        if overlay_opts.show_index {
            let text = overlay::indicator_text(input.current_index, input.total);
            let (rect, origin) =
                overlay::indicator_box(&text, overlay_opts.track_corner, viewport);
            ops.push(DrawOp::FillRect {
                rect,
                color: overlay::INDICATOR_BACKGROUND,
            });
            ops.push(DrawOp::Text {
                origin,
                text,
                cell: overlay::GLYPH_CELL_PX,
                color: overlay::TEXT_COLOR,
            });
        }
    }

    if input.loading {
        let (rect, origin) = overlay::loading_box(viewport);
        ops.push(DrawOp::FillRect {
            rect,
            color: overlay::LOADING_BACKGROUND,
        });
        ops.push(DrawOp::Text {
            origin,
            text: overlay::LOADING_LABEL.to_owned(),
            cell: overlay::GLYPH_CELL_PX,
            color: overlay::TEXT_COLOR,
        });
    }

    DrawPlan {
        canvas: viewport,
        ops,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/plan.rs"]
mod tests;

use crate::foundation::core::{Affine, Rect, Size, Vec2};

/// Fit-to-viewport placement of one frame.
///
/// `draw_width`/`draw_height` is the aspect-preserving fit of the frame into the
/// canvas; `scale` rescales it so the rotated bounding box fits the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    pub draw_width: f64,
    pub draw_height: f64,
    pub scale: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub rotation_degrees: f64,
    pub flip_horizontal: bool,
}

/// Compute the fit, rotation and flip of a `frame_width x frame_height` frame drawn into
/// a `viewport_width x viewport_height` canvas.
///
/// Any zero or non-finite dimension yields an empty layout (`scale == 0`).
pub fn compute_layout(
    frame_width: f64,
    frame_height: f64,
    viewport_width: f64,
    viewport_height: f64,
    rotation_degrees: f64,
    flip_horizontal: bool,
) -> Layout {
    let empty = Layout {
        canvas_width: sanitize(viewport_width),
        canvas_height: sanitize(viewport_height),
        rotation_degrees,
        flip_horizontal,
        ..Layout::default()
    };

    let dims = [frame_width, frame_height, viewport_width, viewport_height];
    if dims.iter().any(|v| !v.is_finite() || *v <= 0.0) || !rotation_degrees.is_finite() {
        return empty;
    }

    let frame_aspect = frame_width / frame_height;
    let viewport_aspect = viewport_width / viewport_height;
    let (draw_width, draw_height) = if frame_aspect > viewport_aspect {
        (viewport_width, viewport_width / frame_aspect)
    } else {
        (viewport_height * frame_aspect, viewport_height)
    };

    let theta = rotation_degrees.to_radians();
    let sin = theta.sin().abs();
    let cos = theta.cos().abs();
    let bbox_width = draw_width * cos + draw_height * sin;
    let bbox_height = draw_width * sin + draw_height * cos;
    let scale = (viewport_width / bbox_width).min(viewport_height / bbox_height);

    Layout {
        draw_width,
        draw_height,
        scale,
        canvas_width: viewport_width,
        canvas_height: viewport_height,
        rotation_degrees,
        flip_horizontal,
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

impl Layout {
    pub fn is_empty(&self) -> bool {
        !(self.scale.is_finite() && self.scale > 0.0)
    }

    /// On-screen size of the frame before rotation.
    pub fn displayed_size(&self) -> Size {
        Size::new(self.draw_width * self.scale, self.draw_height * self.scale)
    }

    /// Map frame pixel space `[0, frame_width] x [0, frame_height]` onto the canvas.
    ///
    /// Canonical order: `T(center) * R(rotation) * S(flip) * T(-size/2) * S(fit)`.
    pub fn frame_transform(&self, frame_width: f64, frame_height: f64) -> Affine {
        let size = self.displayed_size();
        let t_center = Affine::translate(Vec2::new(
            self.canvas_width / 2.0,
            self.canvas_height / 2.0,
        ));
        let t_rotate = Affine::rotate(self.rotation_degrees.to_radians());
        let t_flip = if self.flip_horizontal {
            Affine::scale_non_uniform(-1.0, 1.0)
        } else {
            Affine::IDENTITY
        };
        let t_origin = Affine::translate(Vec2::new(-size.width / 2.0, -size.height / 2.0));
        let t_fit = Affine::scale_non_uniform(size.width / frame_width, size.height / frame_height);

        t_center * t_rotate * t_flip * t_origin * t_fit
    }

    /// Axis-aligned canvas area covered by the frame.
    pub fn frame_bounds(&self, frame_width: f64, frame_height: f64) -> Rect {
        self.frame_transform(frame_width, frame_height)
            .transform_rect_bbox(Rect::new(0.0, 0.0, frame_width, frame_height))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;

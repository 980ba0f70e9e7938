//! Input coordinate → frame index mapping.
//!
//! Every function here is pure. Results are always clamped to `[0, frame_count - 1]`;
//! with an empty sequence the absolute mappers return `None` and the tilt mapper
//! returns the current index.

/// Distance from either viewport edge that snaps to the first/last frame.
pub const DEFAULT_EDGE_THRESHOLD_PX: f64 = 50.0;
/// Tilt angle that must be exceeded before stepping one frame.
pub const DEFAULT_TILT_THRESHOLD_DEG: f64 = 10.0;

/// Map a pointer x coordinate across the viewport to a frame index.
///
/// Within `edge_threshold_px` of the right edge selects the last frame, within it of
/// the left edge the first; the right edge wins when the two zones overlap.
pub fn from_pointer_x(
    x: f64,
    viewport_width: f64,
    frame_count: u32,
    edge_threshold_px: f64,
) -> Option<u32> {
    let last = frame_count.checked_sub(1)?;
    if x >= viewport_width - edge_threshold_px {
        return Some(last);
    }
    if x <= edge_threshold_px {
        return Some(0);
    }
    Some(floor_clamped(x / viewport_width * f64::from(frame_count), last))
}

/// Map a pointer x coordinate over the progress bar to a frame index.
pub fn from_progress_bar_x(
    x: f64,
    bar_origin_x: f64,
    bar_width: f64,
    frame_count: u32,
) -> Option<u32> {
    let last = frame_count.checked_sub(1)?;
    Some(floor_clamped(
        (x - bar_origin_x) / bar_width * f64::from(frame_count),
        last,
    ))
}

/// Step one frame per tilt event once `|gamma|` exceeds the threshold.
pub fn from_tilt(gamma_deg: f64, current: u32, frame_count: u32, threshold_deg: f64) -> u32 {
    let Some(last) = frame_count.checked_sub(1) else {
        return current;
    };
    let current = current.min(last);
    if gamma_deg > threshold_deg {
        current.saturating_add(1).min(last)
    } else if gamma_deg < -threshold_deg {
        current.saturating_sub(1)
    } else {
        current
    }
}

fn floor_clamped(raw: f64, last: u32) -> u32 {
    if raw.is_nan() {
        return 0;
    }
    raw.floor().clamp(0.0, f64::from(last)) as u32
}

/// The three mappers bound to a viewer's thresholds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IndexMapper {
    pub edge_threshold_px: f64,
    pub tilt_threshold_deg: f64,
}

impl Default for IndexMapper {
    fn default() -> Self {
        Self {
            edge_threshold_px: DEFAULT_EDGE_THRESHOLD_PX,
            tilt_threshold_deg: DEFAULT_TILT_THRESHOLD_DEG,
        }
    }
}

impl IndexMapper {
    pub fn pointer(&self, x: f64, viewport_width: f64, frame_count: u32) -> Option<u32> {
        from_pointer_x(x, viewport_width, frame_count, self.edge_threshold_px)
    }

    pub fn progress_bar(
        &self,
        x: f64,
        bar_origin_x: f64,
        bar_width: f64,
        frame_count: u32,
    ) -> Option<u32> {
        from_progress_bar_x(x, bar_origin_x, bar_width, frame_count)
    }

    pub fn tilt(&self, gamma_deg: f64, current: u32, frame_count: u32) -> u32 {
        from_tilt(gamma_deg, current, frame_count, self.tilt_threshold_deg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/mapping/index.rs"]
mod tests;

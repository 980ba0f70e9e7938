use super::*;
use crate::render::overlay::{BarPosition, TrackCorner};

fn input() -> PlanInput {
    PlanInput {
        viewport: Viewport::new(800, 600),
        frame: Some(PlanFrame {
            index: 2,
            width: 1600,
            height: 900,
        }),
        current_index: 2,
        total: 8,
        rotation_degrees: 0.0,
        flip_horizontal: false,
        overlay: OverlayOptions::default(),
        loading: false,
    }
}

#[test]
fn full_plan_orders_layers() {
    let plan = compile_plan(&input());
    assert_eq!(plan.canvas, Viewport::new(800, 600));
    assert!(matches!(plan.ops[0], DrawOp::Clear { .. }));
    assert!(matches!(plan.ops[1], DrawOp::Frame { index: 2, .. }));
    assert_eq!(plan.frame_index(), Some(2));
    assert_eq!(plan.texts().collect::<Vec<_>>(), vec!["3/8"]);
    assert!(matches!(plan.ops.last(), Some(DrawOp::Text { .. })));
}

#[test]
fn frame_transform_letterboxes() {
    let plan = compile_plan(&input());
    let DrawOp::Frame { transform, .. } = &plan.ops[1] else {
        panic!("expected frame op");
    };
    let tl = *transform * Point::new(0.0, 0.0);
    assert!((tl.x - 0.0).abs() < 1e-9);
    assert!((tl.y - 75.0).abs() < 1e-9);
}

#[test]
fn progress_fill_matches_index() {
    let plan = compile_plan(&input());
    let fills: Vec<Rect> = plan
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillRect { rect, color } if *color == overlay::FILL_COLOR => Some(*rect),
            _ => None,
        })
        .collect();
    assert_eq!(fills.len(), 1);
    assert!((fills[0].width() - 640.0 * 3.0 / 8.0).abs() < 1e-9);
}

#[test]
fn hidden_overlay_draws_only_frame() {
    let mut i = input();
    i.overlay = OverlayOptions {
        track_corner: TrackCorner::TopLeft,
        show_index: false,
        show_progress_bar: false,
        progress_bar_position: BarPosition::Top,
    };
    let plan = compile_plan(&i);
    assert_eq!(plan.ops.len(), 2);
    assert_eq!(plan.texts().count(), 0);
}

#[test]
fn missing_frame_still_draws_overlay() {
    let mut i = input();
    i.frame = None;
    let plan = compile_plan(&i);
    assert_eq!(plan.frame_index(), None);
    assert_eq!(plan.texts().collect::<Vec<_>>(), vec!["3/8"]);
}

#[test]
fn loading_badge_is_last() {
    let mut i = input();
    i.loading = true;
    i.total = 1;
    i.current_index = 0;
    let plan = compile_plan(&i);
    assert_eq!(
        plan.texts().collect::<Vec<_>>(),
        vec!["1/1", overlay::LOADING_LABEL]
    );
}

#[test]
fn empty_viewport_only_clears() {
    let mut i = input();
    i.viewport = Viewport::new(0, 600);
    i.loading = true;
    let plan = compile_plan(&i);
    assert_eq!(plan.ops.len(), 1);
}

#[test]
fn nothing_loaded_skips_indicator() {
    let mut i = input();
    i.frame = None;
    i.total = 0;
    i.current_index = 0;
    let plan = compile_plan(&i);
    assert_eq!(plan.ops.len(), 1);
}

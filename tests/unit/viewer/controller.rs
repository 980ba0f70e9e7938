use std::{cell::Cell, rc::Rc, sync::Arc};

use super::*;
use crate::container::{decode::Bitmap, reader::Frame};
use crate::foundation::error::FrameWarning;
use crate::render::surface::RecordingSurface;

fn frame(index: u32) -> Frame {
    Frame {
        index,
        bitmap: Bitmap {
            width: 4,
            height: 2,
            rgba8_premul: Arc::new(vec![255; 4 * 2 * 4]),
        },
    }
}

fn metadata(frame_count: u32) -> WdpMetadata {
    WdpMetadata {
        protocol_version: "1.0.0".to_owned(),
        frame_count,
    }
}

fn controller(width: u32, height: u32, options: ViewerOptions) -> ViewController<RecordingSurface> {
    ViewController::new(RecordingSurface::new(Viewport::new(width, height)), options)
}

fn ready(count: u32, width: u32, height: u32) -> ViewController<RecordingSurface> {
    ready_with(count, width, height, ViewerOptions::default())
}

fn ready_with(
    count: u32,
    width: u32,
    height: u32,
    options: ViewerOptions,
) -> ViewController<RecordingSurface> {
    let mut c = controller(width, height, options);
    c.begin_load(metadata(count)).unwrap();
    for i in 0..count {
        c.push_frame(Ok(frame(i))).unwrap();
    }
    c.finish_load().unwrap();
    c
}

fn last_texts(c: &ViewController<RecordingSurface>) -> Vec<String> {
    c.surface()
        .last_plan()
        .map(|p| p.texts().map(str::to_owned).collect())
        .unwrap_or_default()
}

#[test]
fn loading_ignores_pointer_and_tilt() {
    let mut c = controller(1000, 500, ViewerOptions::default());
    c.begin_load(metadata(10)).unwrap();
    c.push_frame(Ok(frame(0))).unwrap();
    c.handle_event(InputEvent::PointerDown { x: 900.0, y: 100.0 })
        .unwrap();
    c.handle_event(InputEvent::Tilt { gamma_deg: 45.0 }).unwrap();
    assert_eq!(c.phase(), Phase::Loading);
    assert_eq!(c.current_index(), 0);
    assert_eq!(c.state().pointer, PointerState::Idle);
}

#[test]
fn resize_applies_while_loading() {
    let mut c = controller(1000, 500, ViewerOptions::default());
    c.begin_load(metadata(2)).unwrap();
    c.handle_event(InputEvent::Resize {
        width: 300,
        height: 200,
    })
    .unwrap();
    assert_eq!(c.state().viewport, Viewport::new(300, 200));
    assert_eq!(c.surface().size(), Viewport::new(300, 200));
    assert_eq!(
        c.surface().last_plan().map(|p| p.canvas),
        Some(Viewport::new(300, 200))
    );
}

#[test]
fn first_frame_previews_during_load() {
    let mut c = controller(400, 300, ViewerOptions::default());
    c.begin_load(metadata(3)).unwrap();
    c.push_frame(Ok(frame(0))).unwrap();
    let plan = c.surface().last_plan().unwrap();
    assert_eq!(plan.frame_index(), Some(0));
    assert_eq!(last_texts(&c), vec!["1/1", "Loading..."]);

    c.push_frame(Ok(frame(1))).unwrap();
    assert_eq!(last_texts(&c), vec!["1/2", "Loading..."]);
}

#[test]
fn preview_skips_leading_hole() {
    let mut c = controller(400, 300, ViewerOptions::default());
    c.begin_load(metadata(3)).unwrap();
    c.push_frame(Err(FrameWarning::MissingFrame { index: 0 }))
        .unwrap();
    assert_eq!(c.surface().last_plan().unwrap().frame_index(), None);
    c.push_frame(Ok(frame(1))).unwrap();
    assert_eq!(c.surface().last_plan().unwrap().frame_index(), Some(1));
}

#[test]
fn finish_load_runs_callback_once() {
    let calls = Rc::new(Cell::new(0u32));
    let seen = Rc::clone(&calls);
    let mut c = controller(400, 300, ViewerOptions::default());
    c.set_on_loaded(Box::new(move |meta: &WdpMetadata| {
        assert_eq!(meta.frame_count, 2);
        seen.set(seen.get() + 1);
    }));
    c.begin_load(metadata(2)).unwrap();
    c.push_frame(Ok(frame(0))).unwrap();
    c.push_frame(Ok(frame(1))).unwrap();
    c.finish_load().unwrap();
    c.finish_load().unwrap();
    assert_eq!(calls.get(), 1);
    assert_eq!(c.phase(), Phase::Ready);
    assert_eq!(last_texts(&c), vec!["1/2"]);
}

#[test]
fn ready_viewer_cannot_reload() {
    let mut c = ready(2, 400, 300);
    let err = c.begin_load(metadata(3)).unwrap_err();
    assert!(matches!(err, WdpError::Validation(_)));
}

#[test]
fn lifecycle_calls_need_begin_load() {
    let mut c = controller(400, 300, ViewerOptions::default());
    assert!(c.push_frame(Ok(frame(0))).is_err());
    assert!(c.finish_load().is_err());
    assert_eq!(c.phase(), Phase::Loading);
}

#[test]
fn canvas_press_near_left_edge_selects_first() {
    let mut c = ready(10, 1000, 500);
    c.seek(5).unwrap();
    c.handle_event(InputEvent::PointerDown { x: 40.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.current_index(), 0);
    assert_eq!(c.state().pointer, PointerState::Dragging(DragSource::Canvas));
    assert!(!c.state().tilt_armed);
}

#[test]
fn canvas_drag_follows_pointer() {
    let mut c = ready(10, 1000, 500);
    c.handle_event(InputEvent::PointerMove { x: 500.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.current_index(), 0, "moves without a press are ignored");

    c.handle_event(InputEvent::PointerDown { x: 300.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.current_index(), 3);
    c.handle_event(InputEvent::PointerMove { x: 720.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.current_index(), 7);
    c.handle_event(InputEvent::PointerMove { x: 990.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.current_index(), 9);
    assert_eq!(last_texts(&c), vec!["10/10"]);

    c.handle_event(InputEvent::PointerUp).unwrap();
    c.handle_event(InputEvent::PointerMove { x: 500.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.current_index(), 9);
}

#[test]
fn progress_bar_press_maps_through_track() {
    // 1000 wide: track spans x 100..900 at the bottom (y 480..490).
    let mut c = ready(8, 1000, 500);
    c.handle_event(InputEvent::PointerDown { x: 700.0, y: 485.0 })
        .unwrap();
    assert_eq!(c.current_index(), 6);
    assert_eq!(
        c.state().pointer,
        PointerState::Dragging(DragSource::ProgressBar)
    );

    // Dragging below the track keeps using the bar mapping.
    c.handle_event(InputEvent::PointerMove { x: 150.0, y: 10.0 })
        .unwrap();
    assert_eq!(c.current_index(), 0);
}

#[test]
fn hidden_progress_bar_is_plain_canvas() {
    let options = ViewerOptions {
        show_progress_bar: false,
        ..ViewerOptions::default()
    };
    let mut c = ready_with(8, 1000, 500, options);
    c.handle_event(InputEvent::PointerDown { x: 700.0, y: 485.0 })
        .unwrap();
    assert_eq!(c.state().pointer, PointerState::Dragging(DragSource::Canvas));
    assert_eq!(c.current_index(), 5);
}

#[test]
fn tilt_only_when_idle_and_armed() {
    let mut c = ready(5, 1000, 500);
    c.handle_event(InputEvent::Tilt { gamma_deg: 20.0 }).unwrap();
    assert_eq!(c.current_index(), 1);
    c.handle_event(InputEvent::Tilt { gamma_deg: 5.0 }).unwrap();
    assert_eq!(c.current_index(), 1);

    c.handle_event(InputEvent::PointerDown { x: 500.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.current_index(), 2);
    c.handle_event(InputEvent::Tilt { gamma_deg: 20.0 }).unwrap();
    assert_eq!(c.current_index(), 2);

    c.handle_event(InputEvent::PointerLeave).unwrap();
    assert!(c.state().tilt_armed);
    c.handle_event(InputEvent::Tilt { gamma_deg: -20.0 }).unwrap();
    assert_eq!(c.current_index(), 1);
}

#[test]
fn tilt_control_off_never_arms() {
    let options = ViewerOptions {
        tilt_control: false,
        ..ViewerOptions::default()
    };
    let mut c = ready_with(5, 1000, 500, options);
    c.handle_event(InputEvent::Tilt { gamma_deg: 20.0 }).unwrap();
    c.handle_event(InputEvent::PointerDown { x: 40.0, y: 100.0 })
        .unwrap();
    c.handle_event(InputEvent::PointerUp).unwrap();
    c.handle_event(InputEvent::Tilt { gamma_deg: 20.0 }).unwrap();
    assert_eq!(c.current_index(), 0);
    assert!(!c.state().tilt_armed);
}

#[test]
fn resize_keeps_index() {
    let mut c = ready(10, 1000, 500);
    c.seek(4).unwrap();
    c.handle_event(InputEvent::Resize {
        width: 640,
        height: 480,
    })
    .unwrap();
    assert_eq!(c.current_index(), 4);
    assert_eq!(c.state().viewport, Viewport::new(640, 480));
    let plan = c.surface().last_plan().unwrap();
    assert_eq!(plan.canvas, Viewport::new(640, 480));
    assert_eq!(plan.frame_index(), Some(4));
}

#[test]
fn unchanged_index_skips_redraw() {
    let mut c = ready(10, 1000, 500);
    let before = c.surface().plans().len();
    c.handle_event(InputEvent::PointerDown { x: 10.0, y: 100.0 })
        .unwrap();
    assert_eq!(c.surface().plans().len(), before);
    c.seek(3).unwrap();
    assert_eq!(c.surface().plans().len(), before + 1);
}

#[test]
fn seek_clamps_and_holes_keep_overlay() {
    let mut c = controller(400, 300, ViewerOptions::default());
    c.begin_load(metadata(3)).unwrap();
    c.push_frame(Ok(frame(0))).unwrap();
    c.push_frame(Ok(frame(1))).unwrap();
    c.push_frame(Err(FrameWarning::MissingFrame { index: 2 }))
        .unwrap();
    c.finish_load().unwrap();
    c.seek(99).unwrap();
    assert_eq!(c.current_index(), 2);
    let plan = c.surface().last_plan().unwrap();
    assert_eq!(plan.frame_index(), None);
    assert_eq!(last_texts(&c), vec!["3/3"]);
}

#[test]
fn empty_sequence_ignores_scrubbing() {
    let mut c = ready(0, 1000, 500);
    c.handle_event(InputEvent::PointerDown { x: 990.0, y: 100.0 })
        .unwrap();
    c.handle_event(InputEvent::Tilt { gamma_deg: 40.0 }).unwrap();
    assert_eq!(c.current_index(), 0);
    assert!(last_texts(&c).is_empty());
}

#[test]
fn rotation_and_flip_redraw() {
    let mut c = ready(2, 400, 300);
    let before = c.surface().plans().len();
    c.set_rotation(90.0).unwrap();
    c.set_flip_horizontal(true).unwrap();
    assert_eq!(c.surface().plans().len(), before + 2);
    assert!(c.state().flip_horizontal);
    assert!(c.set_rotation(f64::NAN).is_err());
}

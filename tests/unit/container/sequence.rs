use std::sync::Arc;

use super::*;
use crate::container::decode::Bitmap;

fn frame(index: u32) -> Frame {
    Frame {
        index,
        bitmap: Bitmap {
            width: 2,
            height: 1,
            rgba8_premul: Arc::new(vec![255; 8]),
        },
    }
}

#[test]
fn holes_keep_fixed_slots() {
    let mut seq = FrameSequence::new(3);
    assert_eq!(seq.push(Ok(frame(0))), Some(0));
    assert_eq!(
        seq.push(Err(FrameWarning::MissingFrame { index: 1 })),
        Some(1)
    );
    assert!(!seq.is_complete());
    assert_eq!(seq.push(Ok(frame(2))), Some(2));

    assert!(seq.is_complete());
    assert_eq!(seq.frame_count(), 3);
    assert_eq!(seq.loaded(), 3);
    assert_eq!(seq.available(), 2);
    assert!(seq.get(1).is_none());
    assert_eq!(seq.get(2).map(|f| f.index), Some(2));
    assert_eq!(seq.warnings(), &[FrameWarning::MissingFrame { index: 1 }]);
    assert_eq!(seq.frames().map(|f| f.index).collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn out_of_order_and_overflow_slots_are_ignored() {
    let mut seq = FrameSequence::new(1);
    assert_eq!(seq.push(Ok(frame(1))), None);
    assert_eq!(seq.loaded(), 0);

    assert_eq!(seq.push(Ok(frame(0))), Some(0));
    assert_eq!(seq.push(Ok(frame(1))), None);
    assert_eq!(seq.loaded(), 1);
}

#[test]
fn lookups_past_the_loaded_prefix_are_empty() {
    let seq = FrameSequence::new(5);
    assert!(seq.get(0).is_none());
    assert!(seq.get(u32::MAX).is_none());
    assert!(!seq.is_complete());
}

#[test]
fn ranged_warning_fills_the_tail() {
    let mut seq = FrameSequence::new(1_000_000);
    assert_eq!(seq.push(Ok(frame(0))), Some(0));
    assert_eq!(
        seq.push(Err(FrameWarning::MissingFrames {
            start: 1,
            end: 1_000_000
        })),
        Some(1)
    );
    assert!(seq.is_complete());
    assert_eq!(seq.loaded(), 1_000_000);
    assert_eq!(seq.available(), 1);
    assert_eq!(seq.warnings().len(), 1);
    assert!(seq.get(999_999).is_none());
}

#[test]
fn ranged_warning_past_declared_count_is_ignored() {
    let mut seq = FrameSequence::new(4);
    assert_eq!(
        seq.push(Err(FrameWarning::MissingFrames { start: 0, end: 5 })),
        None
    );
    assert_eq!(seq.loaded(), 0);
}

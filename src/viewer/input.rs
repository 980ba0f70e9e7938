use std::sync::mpsc::{self, Receiver, Sender};

use crate::foundation::error::{WdpError, WdpResult};

/// Platform-neutral input delivered to a viewer.
///
/// Coordinates are canvas pixels with the origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    /// Device left/right tilt in degrees.
    Tilt { gamma_deg: f64 },
    Resize { width: u32, height: u32 },
}

impl InputEvent {
    /// Pointer and tilt events only make sense once every frame is loaded.
    pub fn requires_ready(&self) -> bool {
        !matches!(self, Self::Resize { .. })
    }
}

/// Producer half of a viewer's input subscription. Cheap to clone.
#[derive(Clone, Debug)]
pub struct InputSender {
    tx: Sender<InputEvent>,
}

impl InputSender {
    /// Queue `event`. Fails with [`WdpError::Unsubscribed`] once the viewer is gone.
    pub fn send(&self, event: InputEvent) -> WdpResult<()> {
        self.tx.send(event).map_err(|_| WdpError::Unsubscribed)
    }
}

/// Consumer half, owned by exactly one viewer.
#[derive(Debug)]
pub struct InputReceiver {
    rx: Receiver<InputEvent>,
}

impl InputReceiver {
    /// Take every event queued so far without blocking.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }
}

pub fn channel() -> (InputSender, InputReceiver) {
    let (tx, rx) = mpsc::channel();
    (InputSender { tx }, InputReceiver { rx })
}

#[cfg(test)]
#[path = "../../tests/unit/viewer/input.rs"]
mod tests;

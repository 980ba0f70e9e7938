//! Interactive viewer: load lifecycle, input handling and redraws.

pub mod controller;
pub mod input;
pub mod options;

use tracing::{error, warn};

use crate::{
    container::{
        fetch::{Fetcher, FsFetcher},
        reader::{self, FrameSlot, WdpMetadata},
    },
    foundation::error::{FrameWarning, WdpError, WdpResult},
    render::surface::Surface,
};

pub use controller::{DragSource, Phase, PointerState, ViewController, ViewerState};
pub use input::{InputEvent, InputReceiver, InputSender};
pub use options::ViewerOptions;

/// Result of [`Viewer::load`].
#[derive(Debug)]
pub enum LoadOutcome {
    /// Every frame was attempted; `warnings` lists the slots left empty.
    Ready {
        metadata: WdpMetadata,
        warnings: Vec<FrameWarning>,
    },
    /// The archive could not be opened. The viewer stays in [`Phase::Loading`].
    Failed(WdpError),
}

impl LoadOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready { .. })
    }

    pub fn metadata(&self) -> Option<&WdpMetadata> {
        match self {
            Self::Ready { metadata, .. } => Some(metadata),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&WdpError> {
        match self {
            Self::Ready { .. } => None,
            Self::Failed(e) => Some(e),
        }
    }

    pub fn into_result(self) -> WdpResult<(WdpMetadata, Vec<FrameWarning>)> {
        match self {
            Self::Ready { metadata, warnings } => Ok((metadata, warnings)),
            Self::Failed(e) => Err(e),
        }
    }
}

/// A viewer bound to one surface, with its own input subscription.
#[derive(Debug)]
pub struct Viewer<S: Surface> {
    controller: ViewController<S>,
    input_tx: InputSender,
    input_rx: InputReceiver,
}

impl<S: Surface> Viewer<S> {
    pub fn open(surface: S, options: ViewerOptions) -> Self {
        let (input_tx, input_rx) = input::channel();
        Self {
            controller: ViewController::new(surface, options),
            input_tx,
            input_rx,
        }
    }

    /// Run `callback` once with the metadata when a load completes.
    pub fn on_loaded(&mut self, callback: impl FnOnce(&WdpMetadata) + 'static) {
        self.controller.set_on_loaded(Box::new(callback));
    }

    /// New handle for feeding input to this viewer.
    pub fn subscribe(&self) -> InputSender {
        self.input_tx.clone()
    }

    /// Apply every queued input event. Returns how many were processed.
    pub fn pump(&mut self) -> usize {
        let events = self.input_rx.drain();
        for event in &events {
            if let Err(e) = self.controller.handle_event(*event) {
                warn!(?event, error = %e, "input event failed");
            }
        }
        events.len()
    }

    /// Apply one event immediately, bypassing the queue.
    pub fn dispatch(&mut self, event: InputEvent) -> WdpResult<()> {
        self.controller.handle_event(event)
    }

    /// Load from a filesystem path or `file://` URL.
    pub fn load(&mut self, location: &str) -> LoadOutcome {
        self.load_with(&FsFetcher::new(), location)
    }

    #[tracing::instrument(skip(self, fetcher))]
    pub fn load_with(&mut self, fetcher: &dyn Fetcher, location: &str) -> LoadOutcome {
        match fetcher.fetch(location) {
            Ok(bytes) => self.load_bytes(bytes),
            Err(e) => {
                error!(error = %e, "failed to fetch archive");
                LoadOutcome::Failed(e)
            }
        }
    }

    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> LoadOutcome {
        match reader::open(bytes) {
            Ok((metadata, stream)) => self.load_frames(metadata, stream),
            Err(e) => {
                error!(error = %e, "failed to open archive");
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Drive a load from an already-validated header and its frame slots.
    ///
    /// Queued input is pumped between frames so resizes apply during the load.
    pub fn load_frames(
        &mut self,
        metadata: WdpMetadata,
        slots: impl IntoIterator<Item = FrameSlot>,
    ) -> LoadOutcome {
        match self.run_load(metadata.clone(), slots) {
            Ok(()) => LoadOutcome::Ready {
                metadata,
                warnings: self.controller.frames().warnings().to_vec(),
            },
            Err(e) => {
                error!(error = %e, "load aborted");
                LoadOutcome::Failed(e)
            }
        }
    }

    fn run_load(
        &mut self,
        metadata: WdpMetadata,
        slots: impl IntoIterator<Item = FrameSlot>,
    ) -> WdpResult<()> {
        self.controller.begin_load(metadata)?;
        for slot in slots {
            self.controller.push_frame(slot)?;
            self.pump();
        }
        self.controller.finish_load()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn current_index(&self) -> u32 {
        self.controller.current_index()
    }

    pub fn state(&self) -> &ViewerState {
        self.controller.state()
    }

    pub fn metadata(&self) -> Option<&WdpMetadata> {
        self.controller.metadata()
    }

    pub fn controller(&self) -> &ViewController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ViewController<S> {
        &mut self.controller
    }

    pub fn surface(&self) -> &S {
        self.controller.surface()
    }
}

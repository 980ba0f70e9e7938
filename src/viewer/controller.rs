use tracing::{debug, info, trace};

use crate::{
    container::{
        reader::{FrameSlot, WdpMetadata},
        sequence::FrameSequence,
    },
    foundation::{
        core::{Point, Viewport},
        error::{WdpError, WdpResult},
    },
    mapping::index::IndexMapper,
    render::{
        overlay::ProgressBarGeometry,
        plan::{DrawPlan, PlanFrame, PlanInput, compile_plan},
        surface::Surface,
    },
    viewer::{input::InputEvent, options::ViewerOptions},
};

/// Load lifecycle. `Ready` is entered exactly once and never left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// What a drag started on; decides which mapper pointer moves use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragSource {
    Canvas,
    ProgressBar,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging(DragSource),
}

/// Mutable view state, owned by the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerState {
    pub current_index: u32,
    pub viewport: Viewport,
    pub rotation_degrees: f64,
    pub flip_horizontal: bool,
    pub pointer: PointerState,
    /// Tilt is disarmed for the duration of a pointer drag.
    pub tilt_armed: bool,
}

pub type LoadedCallback = Box<dyn FnOnce(&WdpMetadata)>;

/// Applies input to the view state and redraws the bound surface.
pub struct ViewController<S: Surface> {
    surface: S,
    options: ViewerOptions,
    mapper: IndexMapper,
    state: ViewerState,
    phase: Phase,
    metadata: Option<WdpMetadata>,
    frames: FrameSequence,
    on_loaded: Option<LoadedCallback>,
}

impl<S: Surface> std::fmt::Debug for ViewController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewController")
            .field("phase", &self.phase)
            .field("state", &self.state)
            .field("metadata", &self.metadata)
            .field("loaded", &self.frames.loaded())
            .finish_non_exhaustive()
    }
}

impl<S: Surface> ViewController<S> {
    pub fn new(surface: S, options: ViewerOptions) -> Self {
        let state = ViewerState {
            current_index: 0,
            viewport: surface.size(),
            rotation_degrees: options.rotation_degrees,
            flip_horizontal: options.flip_horizontal,
            pointer: PointerState::Idle,
            tilt_armed: options.tilt_control,
        };
        Self {
            surface,
            mapper: options.mapper(),
            options,
            state,
            phase: Phase::Loading,
            metadata: None,
            frames: FrameSequence::default(),
            on_loaded: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn current_index(&self) -> u32 {
        self.state.current_index
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn metadata(&self) -> Option<&WdpMetadata> {
        self.metadata.as_ref()
    }

    pub fn frames(&self) -> &FrameSequence {
        &self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Register the callback run once when loading completes.
    pub fn set_on_loaded(&mut self, callback: LoadedCallback) {
        self.on_loaded = Some(callback);
    }

    /// Start receiving frames for `metadata`. Restarting a failed load is allowed;
    /// a viewer that reached `Ready` cannot load again.
    pub fn begin_load(&mut self, metadata: WdpMetadata) -> WdpResult<()> {
        if self.phase == Phase::Ready {
            return Err(WdpError::validation("viewer already holds a loaded sequence"));
        }
        debug!(frame_count = metadata.frame_count, "begin load");
        self.frames = FrameSequence::new(metadata.frame_count);
        self.metadata = Some(metadata);
        self.state.current_index = 0;
        self.redraw()
    }

    /// Record the next frame slot and refresh the preview.
    pub fn push_frame(&mut self, slot: FrameSlot) -> WdpResult<()> {
        if self.metadata.is_none() {
            return Err(WdpError::validation("push_frame called before begin_load"));
        }
        if self.frames.push(slot).is_some() {
            self.redraw()?;
        }
        Ok(())
    }

    /// Enter `Ready`, redraw and run the post-load callback.
    pub fn finish_load(&mut self) -> WdpResult<()> {
        if self.phase == Phase::Ready {
            return Ok(());
        }
        let Some(metadata) = self.metadata.clone() else {
            return Err(WdpError::validation("finish_load called before begin_load"));
        };
        self.phase = Phase::Ready;
        self.state.current_index = self.clamp_index(self.state.current_index);
        info!(
            frame_count = metadata.frame_count,
            available = self.frames.available(),
            warnings = self.frames.warnings().len(),
            "sequence ready"
        );
        self.redraw()?;
        if let Some(callback) = self.on_loaded.take() {
            callback(&metadata);
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: InputEvent) -> WdpResult<()> {
        if self.phase == Phase::Loading && event.requires_ready() {
            trace!(?event, "input ignored while loading");
            return Ok(());
        }

        match event {
            InputEvent::Resize { width, height } => {
                let viewport = Viewport::new(width, height);
                self.surface.resize(viewport)?;
                self.state.viewport = viewport;
                self.redraw()
            }
            InputEvent::PointerDown { x, y } => {
                let source = match self.progress_bar() {
                    Some(bar) if bar.hit_test(Point::new(x, y)) => DragSource::ProgressBar,
                    _ => DragSource::Canvas,
                };
                self.state.pointer = PointerState::Dragging(source);
                self.state.tilt_armed = false;
                self.apply_drag(source, x)
            }
            InputEvent::PointerMove { x, .. } => match self.state.pointer {
                PointerState::Dragging(source) => self.apply_drag(source, x),
                PointerState::Idle => Ok(()),
            },
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.state.pointer = PointerState::Idle;
                self.state.tilt_armed = self.options.tilt_control;
                Ok(())
            }
            InputEvent::Tilt { gamma_deg } => {
                if self.state.pointer != PointerState::Idle || !self.state.tilt_armed {
                    return Ok(());
                }
                let next = self.mapper.tilt(
                    gamma_deg,
                    self.state.current_index,
                    self.frames.frame_count(),
                );
                self.set_index(next)
            }
        }
    }

    /// Jump to `index`, clamped to the sequence.
    pub fn seek(&mut self, index: u32) -> WdpResult<()> {
        let index = self.clamp_index(index);
        self.set_index(index)
    }

    pub fn set_rotation(&mut self, degrees: f64) -> WdpResult<()> {
        if !degrees.is_finite() {
            return Err(WdpError::validation("rotation must be finite"));
        }
        self.state.rotation_degrees = degrees;
        self.redraw()
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) -> WdpResult<()> {
        self.state.flip_horizontal = flip;
        self.redraw()
    }

    /// Plan for the current state, without presenting it.
    pub fn plan(&self) -> DrawPlan {
        let loading = self.phase == Phase::Loading;
        let (frame, index, total) = if loading {
            // Preview: the first frame to arrive, counted against the loaded prefix.
            let preview = self.frames.frames().next();
            let index = preview.map(|f| f.index).unwrap_or(0);
            (preview, index, self.frames.loaded())
        } else {
            let index = self.state.current_index;
            (self.frames.get(index), index, self.frames.frame_count())
        };

        compile_plan(&PlanInput {
            viewport: self.state.viewport,
            frame: frame.map(|f| PlanFrame {
                index: f.index,
                width: f.width(),
                height: f.height(),
            }),
            current_index: index,
            total,
            rotation_degrees: self.state.rotation_degrees,
            flip_horizontal: self.state.flip_horizontal,
            overlay: self.options.overlay(),
            loading,
        })
    }

    pub fn redraw(&mut self) -> WdpResult<()> {
        let plan = self.plan();
        self.surface.present(&plan, &self.frames)
    }

    fn apply_drag(&mut self, source: DragSource, x: f64) -> WdpResult<()> {
        let count = self.frames.frame_count();
        let next = match source {
            DragSource::Canvas => self.mapper.pointer(x, self.state.viewport.width_f64(), count),
            DragSource::ProgressBar => self
                .progress_bar()
                .and_then(|bar| self.mapper.progress_bar(x, bar.origin_x(), bar.width(), count)),
        };
        match next {
            Some(index) => self.set_index(index),
            None => Ok(()),
        }
    }

    fn progress_bar(&self) -> Option<ProgressBarGeometry> {
        if !self.options.show_progress_bar {
            return None;
        }
        ProgressBarGeometry::for_viewport(self.state.viewport, self.options.progress_bar_position)
    }

    fn set_index(&mut self, index: u32) -> WdpResult<()> {
        if index == self.state.current_index {
            return Ok(());
        }
        debug!(from = self.state.current_index, to = index, "frame index changed");
        self.state.current_index = index;
        self.redraw()
    }

    fn clamp_index(&self, index: u32) -> u32 {
        index.min(self.frames.frame_count().saturating_sub(1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/viewer/controller.rs"]
mod tests;

use crate::{
    container::sequence::FrameSequence,
    foundation::{core::Viewport, error::WdpResult},
    render::plan::DrawPlan,
};

/// Drawable target a viewer presents its redraws to.
///
/// `present` receives the frame sequence so backends can look up the bitmap
/// referenced by a [`DrawOp::Frame`](crate::DrawOp::Frame).
pub trait Surface {
    fn size(&self) -> Viewport;

    fn resize(&mut self, viewport: Viewport) -> WdpResult<()>;

    fn present(&mut self, plan: &DrawPlan, frames: &FrameSequence) -> WdpResult<()>;
}

impl<S: Surface + ?Sized> Surface for Box<S> {
    fn size(&self) -> Viewport {
        (**self).size()
    }

    fn resize(&mut self, viewport: Viewport) -> WdpResult<()> {
        (**self).resize(viewport)
    }

    fn present(&mut self, plan: &DrawPlan, frames: &FrameSequence) -> WdpResult<()> {
        (**self).present(plan, frames)
    }
}

/// Surface that keeps every presented plan instead of rasterizing.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    plans: Vec<DrawPlan>,
}

impl RecordingSurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            plans: Vec::new(),
        }
    }

    pub fn plans(&self) -> &[DrawPlan] {
        &self.plans
    }

    pub fn last_plan(&self) -> Option<&DrawPlan> {
        self.plans.last()
    }

    pub fn clear(&mut self) {
        self.plans.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> WdpResult<()> {
        self.viewport = viewport;
        Ok(())
    }

    fn present(&mut self, plan: &DrawPlan, _frames: &FrameSequence) -> WdpResult<()> {
        self.plans.push(plan.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

use std::{collections::HashMap, sync::Arc};

use crate::{
    container::{decode::Bitmap, sequence::FrameSequence},
    foundation::{
        core::{Affine, Rect, Rgba8, Viewport},
        error::{WdpError, WdpResult},
    },
    render::{
        glyphs,
        plan::{DrawOp, DrawPlan},
        surface::Surface,
    },
};

/// Raster readback of a [`CpuSurface`].
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA8 of pixel `(x, y)`, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Convert to straight alpha in place, as image encoders expect.
    pub fn into_unpremultiplied(mut self) -> Self {
        if self.premultiplied {
            for px in self.data.chunks_exact_mut(4) {
                unpremultiply(px);
            }
            self.premultiplied = false;
        }
        self
    }
}

fn unpremultiply(px: &mut [u8]) {
    let a = u16::from(px[3]);
    if a == 0 || a == 255 {
        return;
    }
    for c in &mut px[..3] {
        *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
    }
}

/// Software surface rasterizing draw plans with `vello_cpu`.
pub struct CpuSurface {
    viewport: Viewport,
    target: Option<Target>,
    image_cache: HashMap<u32, CachedImage>,
}

struct Target {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

struct CachedImage {
    /// Bitmap buffer the paint was built from.
    source: Arc<Vec<u8>>,
    paint: vello_cpu::Image,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("viewport", &self.viewport)
            .field("cached_images", &self.image_cache.len())
            .finish()
    }
}

impl CpuSurface {
    pub fn new(viewport: Viewport) -> WdpResult<Self> {
        Ok(Self {
            viewport,
            target: Target::for_viewport(viewport)?,
            image_cache: HashMap::new(),
        })
    }

    /// Copy of the last presented raster, premultiplied.
    pub fn snapshot(&self) -> FrameRGBA {
        let data = self
            .target
            .as_ref()
            .map(|t| t.pixmap.data_as_u8_slice().to_vec())
            .unwrap_or_default();
        FrameRGBA {
            width: self.viewport.width,
            height: self.viewport.height,
            data,
            premultiplied: true,
        }
    }

    fn image_paint_for(&mut self, index: u32, bitmap: &Bitmap) -> WdpResult<vello_cpu::Image> {
        if let Some(cached) = self.image_cache.get(&index)
            && Arc::ptr_eq(&cached.source, &bitmap.rgba8_premul)
        {
            return Ok(cached.paint.clone());
        }

        let pixmap = premul_bytes_to_pixmap(&bitmap.rgba8_premul, bitmap.width, bitmap.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache.insert(
            index,
            CachedImage {
                source: Arc::clone(&bitmap.rgba8_premul),
                paint: paint.clone(),
            },
        );
        Ok(paint)
    }
}

impl Target {
    fn for_viewport(viewport: Viewport) -> WdpResult<Option<Self>> {
        if viewport.is_empty() {
            return Ok(None);
        }
        let width: u16 = viewport
            .width
            .try_into()
            .map_err(|_| WdpError::render("surface width exceeds u16"))?;
        let height: u16 = viewport
            .height
            .try_into()
            .map_err(|_| WdpError::render("surface height exceeds u16"))?;
        Ok(Some(Self {
            width,
            height,
            pixmap: vello_cpu::Pixmap::new(width, height),
        }))
    }
}

impl Surface for CpuSurface {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) -> WdpResult<()> {
        if viewport != self.viewport {
            self.target = Target::for_viewport(viewport)?;
            self.viewport = viewport;
        }
        Ok(())
    }

    fn present(&mut self, plan: &DrawPlan, frames: &FrameSequence) -> WdpResult<()> {
        self.resize(plan.canvas)?;
        let Some(mut target) = self.target.take() else {
            return Ok(());
        };

        clear_pixmap(&mut target.pixmap, [0, 0, 0, 0]);
        let mut ctx = vello_cpu::RenderContext::new(target.width, target.height);
        let canvas = plan.canvas.bounds();
        let result = plan
            .ops
            .iter()
            .try_for_each(|op| self.draw_op(&mut ctx, op, canvas, frames));
        if result.is_ok() {
            ctx.flush();
            ctx.render_to_pixmap(&mut target.pixmap);
        }
        self.target = Some(target);
        result
    }
}

impl CpuSurface {
    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        canvas: Rect,
        frames: &FrameSequence,
    ) -> WdpResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        match op {
            DrawOp::Clear { color } => {
                if color.a > 0 {
                    fill(ctx, canvas, *color);
                }
            }
            DrawOp::Frame { index, transform } => {
                let Some(frame) = frames.get(*index) else {
                    tracing::debug!(index, "frame not decoded, skipping draw");
                    return Ok(());
                };
                let paint = match self.image_paint_for(*index, &frame.bitmap) {
                    Ok(paint) => paint,
                    Err(err) => {
                        tracing::warn!(
                            index,
                            error = %err,
                            "frame cannot be rasterized, skipping draw"
                        );
                        return Ok(());
                    }
                };
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(paint);
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(frame.width()),
                    f64::from(frame.height()),
                ));
            }
            DrawOp::FillRect { rect, color } => fill(ctx, *rect, *color),
            DrawOp::Text {
                origin,
                text,
                cell,
                color,
            } => {
                for r in glyphs::text_cells(text, *origin, *cell) {
                    fill(ctx, r, *color);
                }
            }
        }
        Ok(())
    }
}

fn fill(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgba8) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> WdpResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WdpError::render("frame width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WdpError::render("frame height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(WdpError::render("frame byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

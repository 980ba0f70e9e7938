use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::WdpResult;

/// Decoded frame pixels in premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes shared between the frame sequence and renderers.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Turns encoded frame bytes into a [`Bitmap`].
pub trait FrameDecoder {
    fn decode(&mut self, bytes: &[u8]) -> WdpResult<Bitmap>;
}

/// Default decoder backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageDecoder;

impl FrameDecoder for ImageDecoder {
    fn decode(&mut self, bytes: &[u8]) -> WdpResult<Bitmap> {
        decode_bitmap(bytes)
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_bitmap(bytes: &[u8]) -> WdpResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode frame from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!("decoded frame has zero area ({width}x{height})").into());
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Bitmap {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/decode.rs"]
mod tests;

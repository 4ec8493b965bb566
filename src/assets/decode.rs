use std::sync::Arc;

use anyhow::Context;

use crate::foundation::error::{EzidError, EzidResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap an already premultiplied buffer, checking its shape.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> EzidResult<Self> {
        let img = Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        };
        img.check()?;
        Ok(img)
    }

    /// Convert a straight-alpha RGBA image.
    pub fn from_rgba8(rgba: image::RgbaImage) -> EzidResult<Self> {
        let (width, height) = rgba.dimensions();
        let mut data = rgba.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    /// Non-empty with exactly `width * height * 4` bytes.
    pub fn check(&self) -> EzidResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(EzidError::decode("image has zero width or height"));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.rgba8_premul.len() != expected {
            return Err(EzidError::decode(format!(
                "image buffer holds {} bytes, expected {expected}",
                self.rgba8_premul.len()
            )));
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba8_premul[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> EzidResult<PreparedImage> {
    if bytes.is_empty() {
        return Err(EzidError::decode("image bytes are empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .context("decode image from memory")
        .map_err(|e| EzidError::decode(format!("{e:#}")))?;
    PreparedImage::from_rgba8(dyn_img.to_rgba8())
}

/// Read and decode an image file.
pub fn load_image(path: &std::path::Path) -> EzidResult<PreparedImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("read image '{}'", path.display()))?;
    decode_image(&bytes)
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
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
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;

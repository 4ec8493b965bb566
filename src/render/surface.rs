use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Affine, Canvas, PixelRect, Point, Rect, Rgb8, Rgba8Premul},
    foundation::error::{EzidError, EzidResult},
    foundation::math::{bilerp, mul_div255_u8, over, unpremultiply},
};

/// Premultiplied RGBA8 raster that every cell, preview and sheet is drawn into.
///
/// A surface has no current-transform state: every draw call carries its own [`Affine`], so
/// nothing set up for one layer can leak into the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0; canvas.pixel_count() * 4],
        }
    }

    pub fn filled(canvas: Canvas, color: Rgba8Premul) -> Self {
        let mut s = Self::new(canvas);
        s.fill(color);
        s
    }

    /// Editable copy of a prepared image.
    pub fn from_prepared(image: &PreparedImage) -> EzidResult<Self> {
        image.check()?;
        Ok(Self {
            canvas: Canvas::new(image.width, image.height)?,
            data: image.rgba8_premul.as_ref().clone(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Row-major premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let idx = self.index(x, y);
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.canvas.width as usize + x as usize) * 4
    }

    #[inline]
    fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let idx = self.index(x, y);
        let d = &mut self.data[idx..idx + 4];
        let out = over([d[0], d[1], d[2], d[3]], src);
        d.copy_from_slice(&out);
    }

    fn blend_pixel_clipped(&mut self, x: u32, y: u32, src: [u8; 4]) {
        if x < self.canvas.width && y < self.canvas.height {
            self.blend_pixel(x, y, src);
        }
    }

    /// Replace every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for d in self.data.chunks_exact_mut(4) {
            d.copy_from_slice(&px);
        }
    }

    /// Replace the pixels of `rect` (clipped to the surface) with `color`.
    pub fn fill_rect(&mut self, rect: PixelRect, color: Rgba8Premul) {
        let px = color.to_array();
        let x1 = rect.right().min(self.canvas.width);
        let y1 = rect.bottom().min(self.canvas.height);
        for y in rect.y..y1 {
            for x in rect.x..x1 {
                let idx = self.index(x, y);
                self.data[idx..idx + 4].copy_from_slice(&px);
            }
        }
    }

    /// 1px outline on the outermost pixel ring of `rect`, composited source-over.
    pub fn stroke_rect(&mut self, rect: PixelRect, color: Rgba8Premul) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let src = color.to_array();
        let right = rect.right() - 1;
        let bottom = rect.bottom() - 1;
        for x in rect.x..=right {
            self.blend_pixel_clipped(x, rect.y, src);
            if bottom != rect.y {
                self.blend_pixel_clipped(x, bottom, src);
            }
        }
        for y in rect.y + 1..bottom {
            self.blend_pixel_clipped(rect.x, y, src);
            if right != rect.x {
                self.blend_pixel_clipped(right, y, src);
            }
        }
    }

    /// Dashed 1px ellipse outline; `dash` is (on, off) lengths in pixels along the curve.
    pub fn stroke_dashed_ellipse(
        &mut self,
        center: Point,
        radii: (f64, f64),
        color: Rgba8Premul,
        dash: (f64, f64),
    ) {
        let (rx, ry) = radii;
        if !(rx > 0.0 && ry > 0.0) {
            return;
        }
        let (on, off) = dash;
        let period = on + off;
        let src = color.to_array();

        // Ramanujan's approximation; only used to pick a sample density of ~0.5px.
        let h = ((rx - ry) / (rx + ry)).powi(2);
        let perimeter =
            std::f64::consts::PI * (rx + ry) * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()));
        let steps = (perimeter / 0.5).ceil().max(8.0) as usize;

        let mut arc = 0.0;
        let mut prev = Point::new(center.x + rx, center.y);
        let mut last_plotted: Option<(i64, i64)> = None;
        for i in 0..steps {
            let t = std::f64::consts::TAU * (i as f64) / (steps as f64);
            let p = Point::new(center.x + rx * t.cos(), center.y + ry * t.sin());
            arc += p.distance(prev);
            prev = p;

            let dash_on = period <= 0.0 || arc.rem_euclid(period) < on;
            if !dash_on {
                last_plotted = None;
                continue;
            }
            let cell = (p.x.floor() as i64, p.y.floor() as i64);
            if last_plotted == Some(cell) {
                continue;
            }
            last_plotted = Some(cell);
            if cell.0 >= 0
                && cell.1 >= 0
                && cell.0 < i64::from(self.canvas.width)
                && cell.1 < i64::from(self.canvas.height)
            {
                self.blend_pixel(cell.0 as u32, cell.1 as u32, src);
            }
        }
    }

    /// Draw `image` through `transform` (image space -> surface space), bilinear sampled and
    /// composited source-over, restricted to `clip` when given.
    pub fn draw_image(
        &mut self,
        image: &PreparedImage,
        transform: Affine,
        clip: Option<Rect>,
    ) -> EzidResult<()> {
        image.check()?;
        let det = transform.determinant();
        if !det.is_finite() || det.abs() < f64::EPSILON {
            return Err(EzidError::validation(
                "image transform must be invertible (non-zero scale)",
            ));
        }
        let inverse = transform.inverse();

        let src_rect = Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height));
        let mut bounds = transform
            .transform_rect_bbox(src_rect)
            .intersect(self.canvas.rect());
        if let Some(clip) = clip {
            bounds = bounds.intersect(clip);
        }
        if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Ok(());
        }

        let x0 = bounds.x0.floor().max(0.0) as u32;
        let y0 = bounds.y0.floor().max(0.0) as u32;
        let x1 = (bounds.x1.ceil() as u32).min(self.canvas.width);
        let y1 = (bounds.y1.ceil() as u32).min(self.canvas.height);

        for y in y0..y1 {
            for x in x0..x1 {
                let p = inverse * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let sx = p.x - 0.5;
                let sy = p.y - 0.5;
                let ix = sx.floor();
                let iy = sy.floor();
                let (ix_i, iy_i) = (ix as i64, iy as i64);
                let px = bilerp(
                    image.texel(ix_i, iy_i),
                    image.texel(ix_i + 1, iy_i),
                    image.texel(ix_i, iy_i + 1),
                    image.texel(ix_i + 1, iy_i + 1),
                    sx - ix,
                    sy - iy,
                );
                if px[3] != 0 {
                    self.blend_pixel(x, y, px);
                }
            }
        }
        Ok(())
    }

    /// Copy `src` into this surface with its top-left at (`x`,`y`), clipped to bounds.
    pub fn blit(&mut self, src: &Surface, x: u32, y: u32) {
        if x >= self.canvas.width || y >= self.canvas.height {
            return;
        }
        let w = src.width().min(self.canvas.width - x) as usize;
        let rows = src.height().min(self.canvas.height - y);
        for row in 0..rows {
            let s = src.index(0, row);
            let d = self.index(x, y + row);
            self.data[d..d + w * 4].copy_from_slice(&src.data[s..s + w * 4]);
        }
    }

    /// Freeze into an image that can itself be drawn as a layer.
    pub fn into_prepared(self) -> PreparedImage {
        PreparedImage {
            width: self.canvas.width,
            height: self.canvas.height,
            rgba8_premul: std::sync::Arc::new(self.data),
        }
    }

    /// Straight-alpha copy for PNG output.
    pub fn to_rgba_image(&self) -> EzidResult<image::RgbaImage> {
        let mut straight = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            straight.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        image::RgbaImage::from_raw(self.canvas.width, self.canvas.height, straight)
            .ok_or_else(|| EzidError::encode("surface buffer does not match its dimensions"))
    }

    /// Opaque copy with any remaining alpha flattened over `bg`, for JPEG output.
    pub fn to_rgb_image(&self, bg: Rgb8) -> EzidResult<image::RgbImage> {
        let mut rgb = Vec::with_capacity(self.canvas.pixel_count() * 3);
        let bg = [bg.r, bg.g, bg.b];
        for px in self.data.chunks_exact(4) {
            let inv = 255u16 - u16::from(px[3]);
            for i in 0..3 {
                rgb.push(px[i].saturating_add(mul_div255_u8(u16::from(bg[i]), inv)));
            }
        }
        image::RgbImage::from_raw(self.canvas.width, self.canvas.height, rgb)
            .ok_or_else(|| EzidError::encode("surface buffer does not match its dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;

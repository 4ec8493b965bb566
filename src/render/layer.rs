//! Anchored, uniformly scaled image layers.

use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Affine, Anchor, Point, Rect, Transform2D, Vec2},
    foundation::error::{EzidError, EzidResult},
    render::surface::Surface,
};

/// An image plus where and how large it sits inside a cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub image: PreparedImage,
    pub anchor: Anchor,
    pub transform: Transform2D,
}

impl Layer {
    pub fn new(image: PreparedImage, anchor: Anchor, transform: Transform2D) -> EzidResult<Self> {
        transform.validate()?;
        image.check()?;
        Ok(Self {
            image,
            anchor,
            transform,
        })
    }

    /// Draw into `surface`, resolving the percent anchor against the surface size.
    pub fn draw(&self, surface: &mut Surface) -> EzidResult<()> {
        self.transform.validate()?;
        let at = self.anchor.resolve(surface.canvas(), &self.transform);
        draw_layer(surface, &self.image, at.x, at.y, self.transform.scale)
    }
}

/// Frame that puts the image's centre on `anchor` at uniform `scale`.
pub fn layer_affine(image: &PreparedImage, anchor: Point, scale: f64) -> Affine {
    Affine::translate(anchor.to_vec2())
        * Affine::scale(scale)
        * Affine::translate(Vec2::new(
            -f64::from(image.width) * 0.5,
            -f64::from(image.height) * 0.5,
        ))
}

/// Draw `image` centred on (`anchor_x`, `anchor_y`) at uniform `scale`.
pub fn draw_layer(
    surface: &mut Surface,
    image: &PreparedImage,
    anchor_x: f64,
    anchor_y: f64,
    scale: f64,
) -> EzidResult<()> {
    draw_layer_clipped(surface, image, Point::new(anchor_x, anchor_y), scale, None)
}

/// [`draw_layer`] restricted to `clip`.
pub fn draw_layer_clipped(
    surface: &mut Surface,
    image: &PreparedImage,
    anchor: Point,
    scale: f64,
    clip: Option<Rect>,
) -> EzidResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(EzidError::validation(format!(
            "layer scale must be finite and > 0 (got {scale})"
        )));
    }
    if !anchor.x.is_finite() || !anchor.y.is_finite() {
        return Err(EzidError::validation("layer anchor must be finite"));
    }
    surface.draw_image(image, layer_affine(image, anchor, scale), clip)
}

#[cfg(test)]
#[path = "../../tests/unit/render/layer.rs"]
mod tests;

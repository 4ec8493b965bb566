//! One ID-photo cell: background, portrait, then clothing overlay.

use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Canvas, Point, Rgb8, Rgba8Premul},
    foundation::error::{EzidError, EzidResult},
    render::layer::Layer,
    render::surface::Surface,
};

/// Default uniform scale applied to a freshly loaded portrait.
pub const PORTRAIT_DEFAULT_SCALE: f64 = 0.5;

/// Face alignment guide drawn on previews only.
///
/// Geometry is expressed as fractions of the cell so it tracks the cell aspect ratio; on the
/// 350x450 two-inch working cell it is an ellipse centred at (175, 200) with radii (100, 140).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceGuide {
    pub center: (f64, f64),
    pub radii: (f64, f64),
    pub color: Rgba8Premul,
    /// Dash (on, off) in pixels.
    pub dash: (f64, f64),
}

impl FaceGuide {
    pub const DEFAULT: Self = Self {
        center: (0.5, 200.0 / 450.0),
        radii: (100.0 / 350.0, 140.0 / 450.0),
        // rgba(255, 0, 0, 0.2) premultiplied
        color: Rgba8Premul {
            r: 51,
            g: 0,
            b: 0,
            a: 51,
        },
        dash: (5.0, 5.0),
    };

    pub fn stroke(&self, surface: &mut Surface) {
        let w = f64::from(surface.width());
        let h = f64::from(surface.height());
        surface.stroke_dashed_ellipse(
            Point::new(self.center.0 * w, self.center.1 * h),
            (self.radii.0 * w, self.radii.1 * h),
            self.color,
            self.dash,
        );
    }
}

impl Default for FaceGuide {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The clothing overlay handed to the compositor.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum OverlaySource {
    #[default]
    None,
    Loaded(Layer),
    /// The overlay was requested but could not be loaded; the cell is composed without it.
    Failed { id: String, reason: String },
}

/// Snapshot of everything needed to compose one cell.
#[derive(Clone, Debug, PartialEq)]
pub struct CellRequest {
    pub background: Rgb8,
    pub portrait: Layer,
    pub overlay: OverlaySource,
}

impl CellRequest {
    pub fn new(background: Rgb8, portrait: Layer) -> Self {
        Self {
            background,
            portrait,
            overlay: OverlaySource::None,
        }
    }

    pub fn with_overlay(mut self, overlay: OverlaySource) -> Self {
        self.overlay = overlay;
        self
    }
}

/// A committed, flattened, opaque cell raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoCell {
    image: PreparedImage,
}

impl PhotoCell {
    pub(crate) fn from_surface(surface: Surface) -> Self {
        Self {
            image: surface.into_prepared(),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.image.width,
            height: self.image.height,
        }
    }

    pub fn image(&self) -> &PreparedImage {
        &self.image
    }

    /// Row-major premultiplied RGBA8 (every alpha is 255).
    pub fn pixels(&self) -> &[u8] {
        &self.image.rgba8_premul
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.image.width || y >= self.image.height {
            return None;
        }
        Some(self.image.texel(i64::from(x), i64::from(y)))
    }

    pub fn encode_png(&self) -> EzidResult<Vec<u8>> {
        crate::export::encode::encode_png(&Surface::from_prepared(&self.image)?)
    }
}

fn compose_surface(canvas: Canvas, req: &CellRequest) -> EzidResult<Surface> {
    let mut surface = Surface::filled(canvas, req.background.to_premul());
    req.portrait.draw(&mut surface)?;
    match &req.overlay {
        OverlaySource::None => {}
        OverlaySource::Loaded(layer) => match layer.draw(&mut surface) {
            Ok(()) => {}
            Err(EzidError::Decode(reason)) => {
                tracing::warn!(%reason, "overlay image unusable, composing without it");
            }
            Err(e) => return Err(e),
        },
        OverlaySource::Failed { id, reason } => {
            tracing::warn!(overlay = %id, %reason, "overlay unavailable, composing without it");
        }
    }
    Ok(surface)
}

/// Compose a committed cell: background fill, portrait, then overlay.
#[tracing::instrument(skip(req), fields(background = %req.background))]
pub fn compose_cell(canvas: Canvas, req: &CellRequest) -> EzidResult<PhotoCell> {
    compose_surface(canvas, req).map(PhotoCell::from_surface)
}

/// What the editor shows: the composed cell plus the face guide. Never committed.
pub fn render_preview(canvas: Canvas, req: &CellRequest, guide: &FaceGuide) -> EzidResult<Surface> {
    let mut surface = compose_surface(canvas, req)?;
    guide.stroke(&mut surface);
    Ok(surface)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/cell.rs"]
mod tests;

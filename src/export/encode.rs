use std::io::Cursor;
use std::path::Path;

use anyhow::Context as _;
use image::codecs::jpeg::{JpegEncoder, PixelDensity};

use crate::{
    foundation::core::Rgb8,
    foundation::error::{EzidError, EzidResult},
    layout::tiler::PrintSheet,
    layout::units::Dpi,
    render::surface::Surface,
};

/// JPEG quality used for exported sheets.
pub const JPEG_QUALITY: u8 = 95;

/// Default file name for an exported sheet.
pub const SHEET_FILE_NAME: &str = "EzID_Print_Fixed.jpg";

/// Encode `surface` as a baseline JPEG tagged with `dpi` in its JFIF header.
///
/// Any transparency is flattened over white.
pub fn encode_jpeg(surface: &Surface, quality: u8, dpi: Dpi) -> EzidResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(EzidError::validation(format!(
            "jpeg quality must be in 1..=100 (got {quality})"
        )));
    }
    let density = u16::try_from(dpi.0)
        .map_err(|_| EzidError::validation(format!("dpi {} does not fit a JFIF header", dpi.0)))?;

    let rgb = surface.to_rgb_image(Rgb8::WHITE)?;
    let mut out = Vec::new();
    {
        let mut encoder = JpegEncoder::new_with_quality(&mut out, quality);
        encoder.set_pixel_density(PixelDensity::dpi(density));
        encoder
            .encode_image(&rgb)
            .map_err(|e| EzidError::encode(format!("jpeg encode failed: {e}")))?;
    }
    Ok(out)
}

/// Print-ready JPEG of a tiled sheet.
pub fn encode_sheet_jpeg(sheet: &PrintSheet, dpi: Dpi) -> EzidResult<Vec<u8>> {
    encode_jpeg(&sheet.surface, JPEG_QUALITY, dpi)
}

/// Straight-alpha PNG of `surface`.
pub fn encode_png(surface: &Surface) -> EzidResult<Vec<u8>> {
    let rgba = surface.to_rgba_image()?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| EzidError::encode(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> EzidResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

pub fn write_output(path: &Path, bytes: &[u8]) -> EzidResult<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("failed to write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote output");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/encode.rs"]
mod tests;

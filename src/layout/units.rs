//! Physical-to-pixel unit conversion.

use crate::foundation::error::{EzidError, EzidResult};

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Print resolution used for every sheet and cell size.
pub const PRINT_DPI: Dpi = Dpi(300);

/// Dots per inch. Must be > 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dpi(pub u32);

impl Dpi {
    pub fn new(dots: u32) -> EzidResult<Self> {
        if dots == 0 {
            return Err(EzidError::validation("dpi must be > 0"));
        }
        Ok(Self(dots))
    }

    /// `round(mm * dpi / 25.4)`, rounding half away from zero.
    ///
    /// Negative or non-finite lengths saturate to 0; use [`Dpi::try_mm_to_px`] to reject them.
    pub fn mm_to_px(self, mm: f64) -> u32 {
        let px = (mm * f64::from(self.0) / MM_PER_INCH).round();
        if px.is_finite() && px > 0.0 {
            px.min(f64::from(u32::MAX)) as u32
        } else {
            0
        }
    }

    pub fn try_mm_to_px(self, mm: f64) -> EzidResult<u32> {
        if !mm.is_finite() || mm < 0.0 {
            return Err(EzidError::validation(format!(
                "length must be finite and >= 0 mm (got {mm})"
            )));
        }
        Ok(self.mm_to_px(mm))
    }
}

impl Default for Dpi {
    fn default() -> Self {
        PRINT_DPI
    }
}

/// [`Dpi::mm_to_px`] at [`PRINT_DPI`].
pub fn mm_to_px(mm: f64) -> u32 {
    PRINT_DPI.mm_to_px(mm)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/units.rs"]
mod tests;

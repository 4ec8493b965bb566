use crate::{
    foundation::core::Canvas,
    foundation::error::{EzidError, EzidResult},
    layout::units::Dpi,
};

/// Working-space width of every cell; the height follows the spec's aspect ratio.
pub const WORKING_CELL_WIDTH: u32 = 350;

/// 4x6 photo paper (portrait orientation as printed on the box).
pub const PAPER_4X6: PaperSpec = PaperSpec {
    width_mm: 101.6,
    height_mm: 152.4,
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Physical print sheet size.
pub struct PaperSpec {
    /// Short edge in millimeters.
    pub width_mm: f64,
    /// Long edge in millimeters.
    pub height_mm: f64,
}

impl PaperSpec {
    /// Pixel canvas for the sheet in landscape orientation: the long edge becomes the width.
    pub fn landscape_canvas(&self, dpi: Dpi) -> EzidResult<Canvas> {
        let width = dpi.try_mm_to_px(self.height_mm)?;
        let height = dpi.try_mm_to_px(self.width_mm)?;
        Canvas::new(width, height)
            .map_err(|_| EzidError::validation("paper size rounds to an empty canvas"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Physical size of one finished photo.
pub struct CellSize {
    /// Width in millimeters.
    pub width_mm: f64,
    /// Height in millimeters.
    pub height_mm: f64,
}

impl CellSize {
    pub const TWO_INCH: Self = Self {
        width_mm: 35.0,
        height_mm: 45.0,
    };
    pub const ONE_INCH: Self = Self {
        width_mm: 28.0,
        height_mm: 35.0,
    };

    pub fn validate(&self) -> EzidResult<()> {
        for (name, v) in [("width_mm", self.width_mm), ("height_mm", self.height_mm)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(EzidError::validation(format!(
                    "cell {name} must be finite and > 0 (got {v})"
                )));
            }
        }
        Ok(())
    }

    pub fn to_canvas(&self, dpi: Dpi) -> EzidResult<Canvas> {
        self.validate()?;
        Canvas::new(dpi.mm_to_px(self.width_mm), dpi.mm_to_px(self.height_mm))
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One sub-kind of a mixed spec: a size and the grid it occupies in its section of the sheet.
pub struct Section {
    /// Sub-kind name, e.g. `2inch`.
    pub name: String,
    /// Cell size for this sub-kind.
    pub size: CellSize,
    /// Grid columns inside the section.
    pub cols: u32,
    /// Grid rows inside the section.
    pub rows: u32,
    /// Number of cells of this sub-kind; must equal `cols * rows`.
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// How cells are arranged on the sheet.
pub enum SheetLayout {
    /// One cell size in a `cols x rows` grid across the whole sheet.
    Uniform {
        /// Cell size.
        size: CellSize,
        /// Grid columns.
        cols: u32,
        /// Grid rows.
        rows: u32,
        /// Cells per sheet; must equal `cols * rows`.
        max: u32,
    },
    /// Several sizes, each tiled into its own equal-width vertical section, in index order.
    Mixed {
        /// Sections from left to right.
        sections: Vec<Section>,
    },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// A selectable photo size/layout.
pub struct PhotoSpec {
    /// Stable identifier (`TWO_INCH`, `ONE_INCH`, `MIXED`).
    pub id: String,
    /// Human-readable label.
    pub label: String,
    /// Sheet arrangement.
    pub layout: SheetLayout,
}

impl PhotoSpec {
    /// Build and validate a uniform spec.
    pub fn uniform(
        id: impl Into<String>,
        label: impl Into<String>,
        size: CellSize,
        cols: u32,
        rows: u32,
        max: u32,
    ) -> EzidResult<Self> {
        let spec = Self {
            id: id.into(),
            label: label.into(),
            layout: SheetLayout::Uniform {
                size,
                cols,
                rows,
                max,
            },
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Build and validate a mixed spec.
    pub fn mixed(
        id: impl Into<String>,
        label: impl Into<String>,
        sections: Vec<Section>,
    ) -> EzidResult<Self> {
        let spec = Self {
            id: id.into(),
            label: label.into(),
            layout: SheetLayout::Mixed { sections },
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> EzidResult<()> {
        if self.id.trim().is_empty() {
            return Err(EzidError::validation("photo spec id must be non-empty"));
        }
        match &self.layout {
            SheetLayout::Uniform {
                size,
                cols,
                rows,
                max,
            } => {
                size.validate()?;
                check_grid(&self.id, *cols, *rows, *max)?;
            }
            SheetLayout::Mixed { sections } => {
                if sections.len() < 2 {
                    return Err(EzidError::validation(format!(
                        "mixed spec '{}' needs at least two sections",
                        self.id
                    )));
                }
                for section in sections {
                    section.size.validate()?;
                    check_grid(
                        &format!("{}/{}", self.id, section.name),
                        section.cols,
                        section.rows,
                        section.count,
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Cells required to fill one sheet.
    pub fn max(&self) -> usize {
        match &self.layout {
            SheetLayout::Uniform { max, .. } => *max as usize,
            SheetLayout::Mixed { sections } => sections.iter().map(|s| s.count as usize).sum(),
        }
    }

    /// The size the editor composes against: the uniform size, or the first section's size.
    pub fn primary_size(&self) -> CellSize {
        match &self.layout {
            SheetLayout::Uniform { size, .. } => *size,
            SheetLayout::Mixed { sections } => sections
                .first()
                .map(|s| s.size)
                .unwrap_or(CellSize::TWO_INCH),
        }
    }

    /// Pixel size of cells composed for this spec.
    pub fn working_canvas(&self) -> Canvas {
        let size = self.primary_size();
        let height = (f64::from(WORKING_CELL_WIDTH) * size.height_mm / size.width_mm).round();
        Canvas {
            width: WORKING_CELL_WIDTH,
            height: (height.max(1.0)) as u32,
        }
    }
}

fn check_grid(what: &str, cols: u32, rows: u32, count: u32) -> EzidResult<()> {
    if cols == 0 || rows == 0 {
        return Err(EzidError::validation(format!(
            "spec '{what}' must have cols > 0 and rows > 0"
        )));
    }
    if cols.checked_mul(rows) != Some(count) {
        return Err(EzidError::validation(format!(
            "spec '{what}' grid {cols}x{rows} does not hold exactly {count} cells"
        )));
    }
    Ok(())
}

/// Built-in print specs.
pub fn catalog() -> Vec<PhotoSpec> {
    vec![
        PhotoSpec {
            id: "TWO_INCH".to_string(),
            label: "2 吋 (8張)".to_string(),
            layout: SheetLayout::Uniform {
                size: CellSize::TWO_INCH,
                cols: 4,
                rows: 2,
                max: 8,
            },
        },
        PhotoSpec {
            id: "ONE_INCH".to_string(),
            label: "1 吋 (10張)".to_string(),
            layout: SheetLayout::Uniform {
                size: CellSize::ONE_INCH,
                cols: 5,
                rows: 2,
                max: 10,
            },
        },
        PhotoSpec {
            id: "MIXED".to_string(),
            label: "2吋+1吋 (4+4張)".to_string(),
            layout: SheetLayout::Mixed {
                sections: vec![
                    Section {
                        name: "2inch".to_string(),
                        size: CellSize::TWO_INCH,
                        cols: 2,
                        rows: 2,
                        count: 4,
                    },
                    Section {
                        name: "1inch".to_string(),
                        size: CellSize::ONE_INCH,
                        cols: 2,
                        rows: 2,
                        count: 4,
                    },
                ],
            },
        },
    ]
}

/// Look up a built-in spec by id (case-insensitive).
pub fn find_spec(id: &str) -> EzidResult<PhotoSpec> {
    catalog()
        .into_iter()
        .find(|s| s.id.eq_ignore_ascii_case(id))
        .ok_or_else(|| EzidError::validation(format!("unknown photo spec '{id}'")))
}

#[cfg(test)]
#[path = "../../tests/unit/spec/catalog.rs"]
mod tests;

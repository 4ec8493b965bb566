//! Placement planning and drawing of committed cells onto the print sheet.

use rayon::prelude::*;

use crate::{
    compose::cell::PhotoCell,
    compose::queue::PhotoQueue,
    foundation::core::{Affine, Canvas, PixelRect, Rgb8, Rgba8Premul},
    foundation::error::{EzidError, EzidResult},
    layout::units::{Dpi, PRINT_DPI},
    render::surface::Surface,
    spec::catalog::{PaperSpec, PhotoSpec, SheetLayout},
};

/// Cutting guide drawn around every placed cell.
pub const BORDER_COLOR: Rgb8 = Rgb8::new(0xE0, 0xE0, 0xE0);

/// One slot on the sheet and the queue entry that fills it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlacedCell {
    pub rect: PixelRect,
    /// Index into the photo queue.
    pub source: usize,
}

/// Pure result of planning: sheet size plus every placement in slot order.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SheetPlan {
    pub canvas: Canvas,
    pub placements: Vec<PlacedCell>,
}

/// Sheet drawing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileOptions {
    pub dpi: Dpi,
    /// Draw cells on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for TileOptions {
    fn default() -> Self {
        Self {
            dpi: PRINT_DPI,
            parallel: true,
            threads: None,
        }
    }
}

/// The exported sheet raster and the plan it was drawn from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintSheet {
    pub surface: Surface,
    pub plan: SheetPlan,
}

impl PrintSheet {
    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }
}

/// Queue index for each of `slots` sheet slots, cycling through `queue_len` entries.
pub fn placement_indices(slots: usize, queue_len: usize) -> Vec<usize> {
    if queue_len == 0 {
        return Vec::new();
    }
    (0..slots).map(|i| i % queue_len).collect()
}

/// Lay `count` cells of size `cell` in a `cols` x `rows` grid with equal gaps (margins included)
/// inside the box `[x0, x0 + box_w] x [0, box_h]`.
#[allow(clippy::too_many_arguments)]
fn grid_slots(
    what: &str,
    x0: f64,
    box_w: f64,
    box_h: f64,
    cell: Canvas,
    cols: u32,
    rows: u32,
    count: u32,
) -> EzidResult<Vec<PixelRect>> {
    let cw = f64::from(cell.width);
    let ch = f64::from(cell.height);
    let gap_x = (box_w - cw * f64::from(cols)) / f64::from(cols + 1);
    let gap_y = (box_h - ch * f64::from(rows)) / f64::from(rows + 1);
    if gap_x < 0.0 || gap_y < 0.0 {
        return Err(EzidError::validation(format!(
            "{what}: {cols}x{rows} cells of {}x{} px do not fit in {box_w}x{box_h} px",
            cell.width, cell.height
        )));
    }

    Ok((0..count)
        .map(|i| {
            let col = f64::from(i % cols);
            let row = f64::from(i / cols);
            PixelRect {
                x: (x0 + gap_x + col * (cw + gap_x)).round() as u32,
                y: (gap_y + row * (ch + gap_y)).round() as u32,
                width: cell.width,
                height: cell.height,
            }
        })
        .collect())
}

fn check_plan(plan: &SheetPlan) -> EzidResult<()> {
    for (i, a) in plan.placements.iter().enumerate() {
        if !a.rect.fits_within(plan.canvas) {
            return Err(EzidError::validation(format!(
                "slot {i} at {:?} exceeds the {}x{} sheet",
                a.rect, plan.canvas.width, plan.canvas.height
            )));
        }
        for (j, b) in plan.placements.iter().enumerate().skip(i + 1) {
            if a.rect.intersects(b.rect) {
                return Err(EzidError::validation(format!("slots {i} and {j} overlap")));
            }
        }
    }
    Ok(())
}

/// Where every cell goes for a queue of `queue_len` entries. Pure.
pub fn plan_sheet(
    paper: &PaperSpec,
    spec: &PhotoSpec,
    queue_len: usize,
    dpi: Dpi,
) -> EzidResult<SheetPlan> {
    if queue_len == 0 {
        return Err(EzidError::EmptyQueue);
    }
    spec.validate()?;
    let canvas = paper.landscape_canvas(dpi)?;
    let sheet_w = f64::from(canvas.width);
    let sheet_h = f64::from(canvas.height);

    let rects = match &spec.layout {
        SheetLayout::Uniform {
            size,
            cols,
            rows,
            max,
        } => grid_slots(
            &spec.id,
            0.0,
            sheet_w,
            sheet_h,
            size.to_canvas(dpi)?,
            *cols,
            *rows,
            *max,
        )?,
        SheetLayout::Mixed { sections } => {
            let section_w = sheet_w / sections.len() as f64;
            let mut rects = Vec::with_capacity(spec.max());
            for (k, section) in sections.iter().enumerate() {
                rects.extend(grid_slots(
                    &format!("{}/{}", spec.id, section.name),
                    k as f64 * section_w,
                    section_w,
                    sheet_h,
                    section.size.to_canvas(dpi)?,
                    section.cols,
                    section.rows,
                    section.count,
                )?);
            }
            rects
        }
    };

    let placements = rects
        .into_iter()
        .zip(placement_indices(spec.max(), queue_len))
        .map(|(rect, source)| PlacedCell { rect, source })
        .collect();
    let plan = SheetPlan { canvas, placements };
    check_plan(&plan)?;
    Ok(plan)
}

/// Stretch the whole of `cell` over a private tile the size of `rect`.
fn render_slot(cell: &PhotoCell, rect: PixelRect) -> EzidResult<Surface> {
    let canvas = Canvas::new(rect.width, rect.height)?;
    let mut tile = Surface::filled(canvas, Rgba8Premul::WHITE);
    let sx = f64::from(rect.width) / f64::from(cell.width());
    let sy = f64::from(rect.height) / f64::from(cell.height());
    tile.draw_image(cell.image(), Affine::scale_non_uniform(sx, sy), None)?;
    Ok(tile)
}

fn build_thread_pool(threads: Option<usize>) -> EzidResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(EzidError::validation(
            "tiling 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| EzidError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

/// Draw every queued cell onto a white sheet, cycling the queue to fill all slots.
#[tracing::instrument(skip_all, fields(spec = %spec.id, queued = queue.len()))]
pub fn tile_sheet(
    paper: &PaperSpec,
    spec: &PhotoSpec,
    queue: &PhotoQueue,
    opts: &TileOptions,
) -> EzidResult<PrintSheet> {
    let plan = plan_sheet(paper, spec, queue.len(), opts.dpi)?;
    let cells = queue.as_slice();
    let draw = |p: &PlacedCell| render_slot(&cells[p.source], p.rect);

    let tiles: Vec<Surface> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| {
            plan.placements
                .par_iter()
                .map(draw)
                .collect::<EzidResult<Vec<_>>>()
        })?
    } else {
        plan.placements
            .iter()
            .map(draw)
            .collect::<EzidResult<Vec<_>>>()?
    };

    let mut surface = Surface::filled(plan.canvas, Rgba8Premul::WHITE);
    let border = BORDER_COLOR.to_premul();
    for (placed, tile) in plan.placements.iter().zip(&tiles) {
        tracing::debug!(
            source = placed.source,
            x = placed.rect.x,
            y = placed.rect.y,
            w = placed.rect.width,
            h = placed.rect.height,
            "place cell"
        );
        surface.blit(tile, placed.rect.x, placed.rect.y);
        surface.stroke_rect(placed.rect, border);
    }

    Ok(PrintSheet { surface, plan })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/tiler.rs"]
mod tests;

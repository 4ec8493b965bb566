use crate::{
    compose::cell::{CellRequest, PhotoCell, compose_cell},
    foundation::core::Canvas,
    foundation::error::{EzidError, EzidResult},
    layout::tiler::{PrintSheet, TileOptions, tile_sheet},
    spec::catalog::{PAPER_4X6, PhotoSpec},
};

/// Ordered committed cells, all of the same working size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhotoQueue {
    canvas: Canvas,
    cells: Vec<PhotoCell>,
}

impl PhotoQueue {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            cells: Vec::new(),
        }
    }

    /// Working size every queued cell must have.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Append a cell, returning its index.
    pub fn push(&mut self, cell: PhotoCell) -> EzidResult<usize> {
        if cell.canvas() != self.canvas {
            return Err(EzidError::validation(format!(
                "cell is {}x{} but the queue holds {}x{} cells",
                cell.width(),
                cell.height(),
                self.canvas.width,
                self.canvas.height
            )));
        }
        self.cells.push(cell);
        Ok(self.cells.len() - 1)
    }

    pub fn remove(&mut self, index: usize) -> EzidResult<PhotoCell> {
        if index >= self.cells.len() {
            return Err(EzidError::validation(format!(
                "queue index {index} out of range (len {})",
                self.cells.len()
            )));
        }
        Ok(self.cells.remove(index))
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PhotoCell> {
        self.cells.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotoCell> {
        self.cells.iter()
    }

    pub fn as_slice(&self) -> &[PhotoCell] {
        &self.cells
    }
}

impl<'a> IntoIterator for &'a PhotoQueue {
    type Item = &'a PhotoCell;
    type IntoIter = std::slice::Iter<'a, PhotoCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// The editor state: the selected spec and the cells committed under it.
///
/// Cells are composed at the spec's working size, so changing the spec empties the queue.
#[derive(Clone, Debug)]
pub struct Session {
    spec: PhotoSpec,
    queue: PhotoQueue,
}

impl Session {
    pub fn new(spec: PhotoSpec) -> EzidResult<Self> {
        spec.validate()?;
        let queue = PhotoQueue::new(spec.working_canvas());
        Ok(Self { spec, queue })
    }

    pub fn spec(&self) -> &PhotoSpec {
        &self.spec
    }

    pub fn queue(&self) -> &PhotoQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut PhotoQueue {
        &mut self.queue
    }

    /// Cell size new commits are composed at.
    pub fn working_canvas(&self) -> Canvas {
        self.queue.canvas
    }

    /// Switch specs. The queue is always cleared, even when `spec` equals the current one.
    pub fn select_spec(&mut self, spec: PhotoSpec) -> EzidResult<()> {
        spec.validate()?;
        if !self.queue.is_empty() {
            tracing::debug!(
                from = %self.spec.id,
                to = %spec.id,
                dropped = self.queue.len(),
                "spec changed, clearing photo queue"
            );
        }
        self.queue = PhotoQueue::new(spec.working_canvas());
        self.spec = spec;
        Ok(())
    }

    /// Compose `req` at the working size and append it. A failed compose leaves the queue as is.
    pub fn commit(&mut self, req: &CellRequest) -> EzidResult<usize> {
        let cell = compose_cell(self.queue.canvas, req)?;
        self.queue.push(cell)
    }

    /// Tile the queue onto a 4x6 sheet.
    pub fn export(&self, opts: &TileOptions) -> EzidResult<PrintSheet> {
        tile_sheet(&PAPER_4X6, &self.spec, &self.queue, opts)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/queue.rs"]
mod tests;

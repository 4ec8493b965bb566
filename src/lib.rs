//! EzID turns a portrait into a print-ready ID-photo sheet for 4x6 photo paper.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: decode the portrait (optionally through a [`BackgroundRemover`]) and load the
//!    clothing overlay from the [`OverlayCatalog`].
//! 2. **Compose**: [`compose_cell`] fills the background, draws the portrait and then the overlay
//!    into one fixed-size cell at the spec's working size.
//! 3. **Queue**: committed cells go into the [`Session`]'s [`PhotoQueue`]; changing the
//!    [`PhotoSpec`] clears it.
//! 4. **Tile**: [`tile_sheet`] cycles the queue over every slot of the sheet, 1800x1200 px at
//!    300 DPI, and [`encode_sheet_jpeg`] writes the result.
//!
//! Pixels are premultiplied RGBA8 until encoding. No draw call carries transform state into the
//! next one.
#![forbid(unsafe_code)]

mod assets;
mod compose;
mod config;
mod export;
mod foundation;
mod layout;
mod render;
mod spec;

pub use assets::background::{
    BackgroundRemover, CommandRemover, DEFAULT_REMOVER_TIMEOUT, PreparedPortrait,
    prepare_portrait,
};
pub use assets::decode::{PreparedImage, decode_image, load_image};
pub use assets::overlay::{
    Gender, OVERLAY_BASE_SCALE, OVERLAY_DEFAULT_ANCHOR, OVERLAY_DEFAULT_SCALE, OverlayAsset,
    OverlayCatalog,
};
pub use compose::cell::{
    CellRequest, FaceGuide, OverlaySource, PORTRAIT_DEFAULT_SCALE, PhotoCell, compose_cell,
    render_preview,
};
pub use compose::queue::{PhotoQueue, Session};
pub use config::job::{
    Job, JobEnv, LoadedJob, OverlayChoice, PhotoEntry, PreparedEntry, THREADS_ENV,
    threads_from_env,
};
pub use export::encode::{
    JPEG_QUALITY, SHEET_FILE_NAME, encode_jpeg, encode_png, encode_sheet_jpeg, ensure_parent_dir,
    write_output,
};
pub use foundation::core::{
    Affine, Anchor, Canvas, PixelRect, Point, Rect, Rgb8, Rgba8Premul, Transform2D, Vec2,
};
pub use foundation::error::{EzidError, EzidResult};
pub use layout::tiler::{
    BORDER_COLOR, PlacedCell, PrintSheet, SheetPlan, TileOptions, placement_indices, plan_sheet,
    tile_sheet,
};
pub use layout::units::{Dpi, MM_PER_INCH, PRINT_DPI, mm_to_px};
pub use render::layer::{Layer, draw_layer, draw_layer_clipped, layer_affine};
pub use render::surface::Surface;
pub use spec::catalog::{
    CellSize, PAPER_4X6, PaperSpec, PhotoSpec, Section, SheetLayout, WORKING_CELL_WIDTH, catalog,
    find_spec,
};

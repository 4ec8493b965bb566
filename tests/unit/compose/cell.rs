use super::*;
use crate::foundation::core::{Anchor, Transform2D};

fn solid(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage::from_premul(w, h, px.repeat((w * h) as usize)).unwrap()
}

fn layer(img: PreparedImage, scale: f64) -> Layer {
    Layer::new(
        img,
        Anchor::CENTER,
        Transform2D {
            scale,
            ..Transform2D::default()
        },
    )
    .unwrap()
}

fn working() -> Canvas {
    Canvas::new(350, 450).unwrap()
}

#[test]
fn background_fills_uncovered_pixels() {
    let req = CellRequest::new(
        Rgb8::new(0, 128, 255),
        layer(solid(10, 10, [255, 0, 0, 255]), 1.0),
    );
    let cell = compose_cell(working(), &req).unwrap();
    assert_eq!((cell.width(), cell.height()), (350, 450));
    assert_eq!(cell.pixel(0, 0), Some([0, 128, 255, 255]));
    assert_eq!(cell.pixel(175, 225), Some([255, 0, 0, 255]));
}

#[test]
fn overlay_is_drawn_over_portrait() {
    let portrait = layer(solid(100, 100, [255, 0, 0, 255]), 1.0);
    let overlay = layer(solid(100, 100, [0, 0, 255, 255]), 1.0);
    let req = CellRequest::new(Rgb8::WHITE, portrait).with_overlay(OverlaySource::Loaded(overlay));
    let cell = compose_cell(working(), &req).unwrap();
    assert_eq!(cell.pixel(175, 225), Some([0, 0, 255, 255]));
}

#[test]
fn transparent_overlay_pixels_show_portrait() {
    let portrait = layer(solid(100, 100, [255, 0, 0, 255]), 1.0);
    let overlay = layer(solid(100, 100, [0, 0, 0, 0]), 1.0);
    let req = CellRequest::new(Rgb8::WHITE, portrait).with_overlay(OverlaySource::Loaded(overlay));
    let cell = compose_cell(working(), &req).unwrap();
    assert_eq!(cell.pixel(175, 225), Some([255, 0, 0, 255]));
}

#[test]
fn failed_overlay_still_commits_the_cell() {
    let portrait = layer(solid(20, 20, [255, 0, 0, 255]), 1.0);
    let with_failure = CellRequest::new(Rgb8::WHITE, portrait.clone()).with_overlay(
        OverlaySource::Failed {
            id: "m3".to_string(),
            reason: "missing file".to_string(),
        },
    );
    let without = CellRequest::new(Rgb8::WHITE, portrait);
    assert_eq!(
        compose_cell(working(), &with_failure).unwrap(),
        compose_cell(working(), &without).unwrap()
    );
}

#[test]
fn undecodable_overlay_is_skipped() {
    let portrait = layer(solid(20, 20, [255, 0, 0, 255]), 1.0);
    let broken = Layer {
        image: PreparedImage {
            width: 10,
            height: 10,
            rgba8_premul: std::sync::Arc::new(Vec::new()),
        },
        anchor: Anchor::CENTER,
        transform: Transform2D::default(),
    };
    let with_broken = CellRequest::new(Rgb8::WHITE, portrait.clone())
        .with_overlay(OverlaySource::Loaded(broken));
    let without = CellRequest::new(Rgb8::WHITE, portrait);
    assert_eq!(
        compose_cell(working(), &with_broken).unwrap(),
        compose_cell(working(), &without).unwrap()
    );
}

#[test]
fn overlay_with_invalid_scale_is_an_error() {
    let portrait = layer(solid(20, 20, [255, 0, 0, 255]), 1.0);
    let mut overlay = layer(solid(10, 10, [0, 0, 255, 255]), 1.0);
    overlay.transform.scale = 0.0;
    let req = CellRequest::new(Rgb8::WHITE, portrait).with_overlay(OverlaySource::Loaded(overlay));
    assert!(matches!(
        compose_cell(working(), &req),
        Err(EzidError::Validation(_))
    ));
}

#[test]
fn committed_cell_has_no_guide_but_preview_does() {
    let req = CellRequest::new(Rgb8::WHITE, layer(solid(4, 4, [255, 255, 255, 255]), 1.0));
    let cell = compose_cell(working(), &req).unwrap();
    assert!(cell.pixels().iter().all(|&b| b == 255));

    let preview = render_preview(working(), &req, &FaceGuide::DEFAULT).unwrap();
    let tinted = preview
        .data()
        .chunks_exact(4)
        .filter(|p| p != &[255, 255, 255, 255])
        .count();
    assert!(tinted > 0);
    // right-most point of the guide ellipse, where the first dash starts: (175 + 100, 200)
    assert_eq!(preview.pixel(275, 200), Some([255, 204, 204, 255]));
}

#[test]
fn compose_does_not_mutate_request() {
    let req = CellRequest::new(Rgb8::WHITE, layer(solid(8, 8, [1, 2, 3, 255]), 0.5));
    let before = req.clone();
    let _ = compose_cell(working(), &req).unwrap();
    let _ = render_preview(working(), &req, &FaceGuide::DEFAULT).unwrap();
    assert_eq!(req, before);
}

#[test]
fn portrait_scale_shrinks_around_cell_centre() {
    let req = CellRequest::new(
        Rgb8::WHITE,
        layer(solid(200, 200, [0, 0, 0, 255]), PORTRAIT_DEFAULT_SCALE),
    );
    let cell = compose_cell(working(), &req).unwrap();
    // 100x100 footprint centred on (175, 225)
    assert_eq!(cell.pixel(130, 180), Some([0, 0, 0, 255]));
    assert_eq!(cell.pixel(120, 225), Some([255, 255, 255, 255]));
    assert_eq!(cell.pixel(175, 170), Some([255, 255, 255, 255]));
}

#[test]
fn cell_png_round_trips_dimensions() {
    let req = CellRequest::new(Rgb8::WHITE, layer(solid(4, 4, [9, 9, 9, 255]), 1.0));
    let cell = compose_cell(Canvas::new(35, 45).unwrap(), &req).unwrap();
    let png = cell.encode_png().unwrap();
    let decoded = image::load_from_memory(&png).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (35, 45));
}

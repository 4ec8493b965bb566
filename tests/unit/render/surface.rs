use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn solid(w: u32, h: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage::from_premul(w, h, px.repeat((w * h) as usize)).unwrap()
}

#[test]
fn fill_and_fill_rect() {
    let mut s = Surface::filled(canvas(4, 4), Rgba8Premul::WHITE);
    assert_eq!(s.pixel(3, 3), Some([255, 255, 255, 255]));
    s.fill_rect(
        PixelRect {
            x: 1,
            y: 1,
            width: 10,
            height: 1,
        },
        Rgba8Premul::opaque(0, 0, 0),
    );
    assert_eq!(s.pixel(0, 1), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(3, 1), Some([0, 0, 0, 255]));
    assert_eq!(s.pixel(1, 2), Some([255, 255, 255, 255]));
    assert_eq!(s.pixel(4, 0), None);
}

#[test]
fn stroke_rect_touches_only_the_outer_ring() {
    let mut s = Surface::filled(canvas(6, 6), Rgba8Premul::WHITE);
    let grey = Rgba8Premul::opaque(224, 224, 224);
    s.stroke_rect(
        PixelRect {
            x: 1,
            y: 1,
            width: 4,
            height: 4,
        },
        grey,
    );
    for (x, y) in [(1, 1), (4, 1), (1, 4), (4, 4), (2, 1), (1, 3)] {
        assert_eq!(s.pixel(x, y), Some([224, 224, 224, 255]), "({x},{y})");
    }
    for (x, y) in [(0, 0), (2, 2), (3, 3), (5, 5)] {
        assert_eq!(s.pixel(x, y), Some([255, 255, 255, 255]), "({x},{y})");
    }
}

#[test]
fn draw_image_identity_copies_pixels() {
    let mut s = Surface::new(canvas(4, 4));
    let img = solid(2, 2, [10, 20, 30, 255]);
    s.draw_image(&img, Affine::translate((1.0, 1.0)), None).unwrap();
    assert_eq!(s.pixel(1, 1), Some([10, 20, 30, 255]));
    assert_eq!(s.pixel(2, 2), Some([10, 20, 30, 255]));
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(3, 3), Some([0, 0, 0, 0]));
}

#[test]
fn draw_image_respects_clip() {
    let mut s = Surface::new(canvas(4, 4));
    let img = solid(4, 4, [0, 0, 255, 255]);
    s.draw_image(
        &img,
        Affine::IDENTITY,
        Some(Rect::new(0.0, 0.0, 2.0, 4.0)),
    )
    .unwrap();
    assert_eq!(s.pixel(1, 3), Some([0, 0, 255, 255]));
    assert_eq!(s.pixel(2, 0), Some([0, 0, 0, 0]));
}

#[test]
fn draw_image_rejects_singular_transform() {
    let mut s = Surface::new(canvas(4, 4));
    let img = solid(2, 2, [1, 1, 1, 255]);
    assert!(s.draw_image(&img, Affine::scale(0.0), None).is_err());
}

#[test]
fn draw_image_off_surface_is_noop() {
    let mut s = Surface::new(canvas(4, 4));
    let img = solid(2, 2, [1, 1, 1, 255]);
    s.draw_image(&img, Affine::translate((100.0, 100.0)), None)
        .unwrap();
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn dashed_ellipse_leaves_gaps() {
    let red = Rgba8Premul::opaque(255, 0, 0);
    let painted = |dash: (f64, f64)| {
        let mut s = Surface::new(canvas(64, 64));
        s.stroke_dashed_ellipse(Point::new(32.0, 32.0), (20.0, 25.0), red, dash);
        assert_eq!(s.pixel(32, 32), Some([0, 0, 0, 0]));
        s.data().chunks_exact(4).filter(|p| p[3] != 0).count()
    };
    let solid = painted((1.0, 0.0));
    let dashed = painted((5.0, 5.0));
    assert!(solid > 100);
    assert!(dashed * 10 > solid * 3, "dashed={dashed} solid={solid}");
    assert!(dashed * 10 < solid * 7, "dashed={dashed} solid={solid}");
}

#[test]
fn blit_copies_and_clips() {
    let mut dst = Surface::filled(canvas(4, 4), Rgba8Premul::WHITE);
    let src = Surface::filled(canvas(3, 3), Rgba8Premul::opaque(1, 2, 3));
    dst.blit(&src, 2, 2);
    assert_eq!(dst.pixel(3, 3), Some([1, 2, 3, 255]));
    assert_eq!(dst.pixel(1, 1), Some([255, 255, 255, 255]));
}

#[test]
fn export_conversions_flatten_and_unpremultiply() {
    let mut s = Surface::new(canvas(1, 1));
    s.fill(Rgba8Premul::from_straight_rgba(255, 0, 0, 51));
    let rgba = s.to_rgba_image().unwrap();
    assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 51]);
    let rgb = s.to_rgb_image(Rgb8::WHITE).unwrap();
    assert_eq!(rgb.get_pixel(0, 0).0, [255, 204, 204]);
}

#[test]
fn into_prepared_keeps_pixels() {
    let s = Surface::filled(canvas(2, 3), Rgba8Premul::opaque(5, 6, 7));
    let img = s.into_prepared();
    assert_eq!((img.width, img.height), (2, 3));
    img.check().unwrap();
    assert_eq!(img.texel(1, 2), [5, 6, 7, 255]);
}

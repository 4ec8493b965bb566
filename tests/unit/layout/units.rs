use super::*;

#[test]
fn id_photo_sizes_at_300_dpi() {
    assert_eq!(mm_to_px(35.0), 413);
    assert_eq!(mm_to_px(45.0), 531);
    assert_eq!(mm_to_px(28.0), 331);
    assert_eq!(mm_to_px(152.4), 1800);
    assert_eq!(mm_to_px(101.6), 1200);
}

#[test]
fn conversion_is_idempotent() {
    for mm in [0.0, 0.1, 5.0, 35.0, 45.0, 101.6, 152.4, 1000.0] {
        assert_eq!(mm_to_px(mm), mm_to_px(mm));
    }
}

#[test]
fn rounds_to_nearest_pixel() {
    // 28mm = 330.71px rounds up, 45mm = 531.50-ε px rounds down.
    assert_eq!(mm_to_px(28.0), 331);
    assert_eq!(mm_to_px(45.0), 531);
    assert_eq!(mm_to_px(0.04), 0);
    assert_eq!(mm_to_px(0.05), 1);
}

#[test]
fn other_resolutions_scale_linearly() {
    let dpi = Dpi::new(600).unwrap();
    assert_eq!(dpi.mm_to_px(25.4), 600);
    assert!(Dpi::new(0).is_err());
}

#[test]
fn invalid_lengths() {
    assert_eq!(mm_to_px(-3.0), 0);
    assert_eq!(mm_to_px(f64::NAN), 0);
    assert!(PRINT_DPI.try_mm_to_px(-0.5).is_err());
    assert!(PRINT_DPI.try_mm_to_px(f64::INFINITY).is_err());
    assert_eq!(PRINT_DPI.try_mm_to_px(0.0).unwrap(), 0);
}

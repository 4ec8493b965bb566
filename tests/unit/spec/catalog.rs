use super::*;
use crate::layout::units::PRINT_DPI;

#[test]
fn builtin_catalog_is_valid() {
    let specs = catalog();
    assert_eq!(specs.len(), 3);
    for spec in &specs {
        spec.validate().unwrap();
    }
    assert_eq!(find_spec("TWO_INCH").unwrap().max(), 8);
    assert_eq!(find_spec("one_inch").unwrap().max(), 10);
    assert_eq!(find_spec("MIXED").unwrap().max(), 8);
    assert!(find_spec("PASSPORT").is_err());
}

#[test]
fn uniform_grid_must_hold_max() {
    assert!(PhotoSpec::uniform("X", "x", CellSize::TWO_INCH, 4, 2, 9).is_err());
    assert!(PhotoSpec::uniform("X", "x", CellSize::TWO_INCH, 0, 2, 0).is_err());
    assert!(PhotoSpec::uniform("X", "x", CellSize::TWO_INCH, 3, 3, 9).is_ok());
}

#[test]
fn mixed_sections_are_checked() {
    let ok = Section {
        name: "a".to_string(),
        size: CellSize::TWO_INCH,
        cols: 2,
        rows: 2,
        count: 4,
    };
    let bad = Section {
        count: 5,
        ..ok.clone()
    };
    assert!(PhotoSpec::mixed("M", "m", vec![ok.clone()]).is_err());
    assert!(PhotoSpec::mixed("M", "m", vec![ok.clone(), bad]).is_err());
    assert_eq!(
        PhotoSpec::mixed("M", "m", vec![ok.clone(), ok]).unwrap().max(),
        8
    );
}

#[test]
fn non_positive_cell_size_rejected() {
    let size = CellSize {
        width_mm: 0.0,
        height_mm: 45.0,
    };
    assert!(PhotoSpec::uniform("X", "x", size, 1, 1, 1).is_err());
}

#[test]
fn working_canvas_follows_primary_aspect() {
    let two = find_spec("TWO_INCH").unwrap().working_canvas();
    assert_eq!((two.width, two.height), (350, 450));
    let one = find_spec("ONE_INCH").unwrap().working_canvas();
    assert_eq!((one.width, one.height), (350, 438));
    let mixed = find_spec("MIXED").unwrap().working_canvas();
    assert_eq!((mixed.width, mixed.height), (350, 450));
}

#[test]
fn paper_is_used_landscape() {
    let canvas = PAPER_4X6.landscape_canvas(PRINT_DPI).unwrap();
    assert_eq!((canvas.width, canvas.height), (1800, 1200));
}

#[test]
fn cell_pixels_at_print_dpi() {
    let c = CellSize::TWO_INCH.to_canvas(PRINT_DPI).unwrap();
    assert_eq!((c.width, c.height), (413, 531));
    let c = CellSize::ONE_INCH.to_canvas(PRINT_DPI).unwrap();
    assert_eq!((c.width, c.height), (331, 413));
}

#[test]
fn spec_serde_round_trips_layout_tag() {
    let spec = find_spec("MIXED").unwrap();
    let json = serde_json::to_string(&spec).unwrap();
    assert!(json.contains("\"kind\":\"mixed\""));
    let back: PhotoSpec = serde_json::from_str(&json).unwrap();
    assert_eq!(back, spec);
}

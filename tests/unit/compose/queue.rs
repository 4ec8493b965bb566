use super::*;
use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Anchor, Rgb8, Transform2D},
    render::layer::Layer,
    spec::catalog::find_spec,
};

fn request(px: [u8; 4]) -> CellRequest {
    let img = PreparedImage::from_premul(8, 8, px.repeat(64)).unwrap();
    let portrait = Layer::new(img, Anchor::CENTER, Transform2D::default()).unwrap();
    CellRequest::new(Rgb8::WHITE, portrait)
}

#[test]
fn commit_appends_in_order() {
    let mut session = Session::new(find_spec("TWO_INCH").unwrap()).unwrap();
    assert_eq!(session.commit(&request([255, 0, 0, 255])).unwrap(), 0);
    assert_eq!(session.commit(&request([0, 0, 255, 255])).unwrap(), 1);
    assert_eq!(session.queue().len(), 2);
    let first = session.queue().get(0).unwrap();
    assert_eq!((first.width(), first.height()), (350, 450));
    assert_eq!(first.pixel(175, 225), Some([255, 0, 0, 255]));
    assert_eq!(
        session.queue().get(1).unwrap().pixel(175, 225),
        Some([0, 0, 255, 255])
    );
}

#[test]
fn spec_change_clears_queue() {
    let mut session = Session::new(find_spec("TWO_INCH").unwrap()).unwrap();
    session.commit(&request([1, 2, 3, 255])).unwrap();
    session.commit(&request([1, 2, 3, 255])).unwrap();

    session.select_spec(find_spec("ONE_INCH").unwrap()).unwrap();
    assert!(session.queue().is_empty());
    assert_eq!(session.spec().id, "ONE_INCH");
    assert_eq!(
        (session.working_canvas().width, session.working_canvas().height),
        (350, 438)
    );

    session.commit(&request([1, 2, 3, 255])).unwrap();
    session.select_spec(find_spec("ONE_INCH").unwrap()).unwrap();
    assert!(session.queue().is_empty());
}

#[test]
fn push_rejects_mismatched_cell_size() {
    let mut two = Session::new(find_spec("TWO_INCH").unwrap()).unwrap();
    two.commit(&request([5, 5, 5, 255])).unwrap();
    let cell = two.queue().get(0).unwrap().clone();

    let mut q = PhotoQueue::new(find_spec("ONE_INCH").unwrap().working_canvas());
    assert!(matches!(q.push(cell), Err(EzidError::Validation(_))));
    assert!(q.is_empty());
}

#[test]
fn remove_and_clear() {
    let mut session = Session::new(find_spec("TWO_INCH").unwrap()).unwrap();
    for px in [[1, 0, 0, 255], [2, 0, 0, 255], [3, 0, 0, 255]] {
        session.commit(&request(px)).unwrap();
    }
    let removed = session.queue_mut().remove(1).unwrap();
    assert_eq!(removed.pixel(175, 225), Some([2, 0, 0, 255]));
    let reds: Vec<u8> = session
        .queue()
        .iter()
        .map(|c| c.pixel(175, 225).unwrap()[0])
        .collect();
    assert_eq!(reds, vec![1, 3]);
    assert!(session.queue_mut().remove(5).is_err());

    session.queue_mut().clear();
    assert!(session.queue().is_empty());
}

#[test]
fn failed_compose_leaves_queue_untouched() {
    let mut session = Session::new(find_spec("TWO_INCH").unwrap()).unwrap();
    session.commit(&request([9, 9, 9, 255])).unwrap();

    let mut bad = request([9, 9, 9, 255]);
    bad.portrait.transform.scale = -1.0;
    assert!(session.commit(&bad).is_err());
    assert_eq!(session.queue().len(), 1);
}

#[test]
fn export_empty_session_fails() {
    let session = Session::new(find_spec("MIXED").unwrap()).unwrap();
    assert!(matches!(
        session.export(&TileOptions::default()),
        Err(EzidError::EmptyQueue)
    ));
}

#[test]
fn export_tiles_the_queue() {
    let mut session = Session::new(find_spec("ONE_INCH").unwrap()).unwrap();
    session.commit(&request([0, 128, 0, 255])).unwrap();
    let sheet = session.export(&TileOptions::default()).unwrap();
    assert_eq!(sheet.plan.placements.len(), 10);
    assert!(sheet.plan.placements.iter().all(|p| p.source == 0));
}

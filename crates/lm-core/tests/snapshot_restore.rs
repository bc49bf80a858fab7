//! Integration tests: snapshot blobs carry a whole label between documents.

use lm_core::{
    ArrowKind, Bounds, Color, Document, DocumentChange, DocumentModel, Drawable, DrawableKind,
    Point, star_points,
};
use pretty_assertions::assert_eq;

fn sample_label() -> Document {
    let mut doc = Document::with_size(600.0, 300.0).unwrap();

    let mut frame = Drawable::new(DrawableKind::RoundedRect {
        bounds: Bounds::new(10.0, 10.0, 580.0, 280.0),
        rx: 16.0,
        ry: 16.0,
    });
    frame.fill = Color::WHITE;
    frame.stroke_width = 2.0;
    frame.name = Some("Frame".into());
    doc.add_object(frame);

    let mut arrow = Drawable::new(DrawableKind::Line {
        from: Point::new(40.0, 150.0),
        to: Point::new(200.0, 150.0),
        arrow: ArrowKind::End,
    });
    arrow.stroke_width = 3.0;
    doc.add_object(arrow);

    doc.add_object(Drawable::new(DrawableKind::Star {
        points: star_points(Bounds::new(400.0, 100.0, 80.0, 80.0)),
    }));
    doc.take_changes();
    doc
}

#[test]
fn blob_restores_into_a_fresh_document() {
    let source = sample_label();
    let blob = source.serialize().unwrap();

    let mut target = Document::new();
    target.deserialize(&blob).unwrap();

    assert_eq!(target.objects(), source.objects());
    assert_eq!(target.size(), (600.0, 300.0));
    assert_eq!(target.take_changes(), vec![DocumentChange::Replaced]);
    assert_eq!(target.objects()[0].display_name(), "Frame");
}

#[test]
fn blob_leaves_background_and_preview_out() {
    let mut source = sample_label();
    source.set_background(Color::BLACK);
    source.set_preview(Some(Drawable::new(DrawableKind::Rect {
        bounds: Bounds::new(0.0, 0.0, 5.0, 5.0),
    })));
    let blob = source.serialize().unwrap();

    let mut target = Document::new();
    target.deserialize(&blob).unwrap();
    assert_eq!(target.background(), Color::WHITE);
    assert!(target.preview().is_none());
    assert_eq!(target.len(), 3);
}

#[test]
fn truncated_blob_is_rejected_and_document_untouched() {
    let blob = sample_label().serialize().unwrap();
    let mut target = Document::new();
    let before = target.serialize().unwrap();

    assert!(target.deserialize(&blob[..blob.len() / 2]).is_err());
    assert_eq!(target.serialize().unwrap(), before);
    assert!(target.take_changes().is_empty());
}

//! The label document: canvas size, background, and a z-ordered object list.
//!
//! `DocumentModel` is the boundary the editor talks to. The drawing library
//! that actually paints objects sits behind it; `Document` is the in-memory
//! implementation used by the editor session and by tests.
//!
//! Every mutation queues a `DocumentChange`. The session drains the queue
//! after each operation and turns a non-empty drain into one history
//! snapshot. The preview slot never queues changes and is never serialized.

use crate::color::Color;
use crate::error::DocumentError;
use crate::id::ObjectId;
use crate::model::Drawable;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f64 = 400.0;
pub const DEFAULT_HEIGHT: f64 = 200.0;
pub const MIN_CANVAS: f64 = 100.0;
pub const MAX_CANVAS: f64 = 2000.0;

/// A "document changed" notification.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentChange {
    Added(ObjectId),
    Removed(ObjectId),
    Modified(ObjectId),
    Reordered(ObjectId),
    Resized { width: f64, height: f64 },
    Background(Color),
    /// Whole content replaced by `deserialize` or `clear`.
    Replaced,
}

/// Z-order moves. Index 0 of the object list is the back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZOrder {
    Front,
    Back,
    Forward,
    Backward,
}

/// Operations the editor core needs from the canvas document.
pub trait DocumentModel {
    fn add_object(&mut self, drawable: Drawable);

    fn remove_object(&mut self, id: ObjectId) -> Option<Drawable>;

    /// Objects back-to-front.
    fn objects(&self) -> &[Drawable];

    fn object(&self, id: ObjectId) -> Option<&Drawable> {
        self.objects().iter().find(|o| o.id == id)
    }

    /// Edit an object in place. Returns false if `id` is unknown.
    fn update_object(&mut self, id: ObjectId, edit: impl FnOnce(&mut Drawable)) -> bool;

    /// Move an object in z-order. Returns true if the order changed.
    fn reorder(&mut self, id: ObjectId, order: ZOrder) -> bool;

    fn bring_to_front(&mut self, id: ObjectId) -> bool {
        self.reorder(id, ZOrder::Front)
    }

    fn send_to_back(&mut self, id: ObjectId) -> bool {
        self.reorder(id, ZOrder::Back)
    }

    fn bring_forward(&mut self, id: ObjectId) -> bool {
        self.reorder(id, ZOrder::Forward)
    }

    fn send_backward(&mut self, id: ObjectId) -> bool {
        self.reorder(id, ZOrder::Backward)
    }

    /// Remove every object.
    fn clear(&mut self);

    /// Full snapshot of size and objects. Background travels separately.
    fn serialize(&self) -> Result<Vec<u8>, DocumentError>;

    /// Replace size and objects from a blob produced by `serialize`.
    fn deserialize(&mut self, blob: &[u8]) -> Result<(), DocumentError>;

    fn background(&self) -> Color;

    fn set_background(&mut self, color: Color);

    fn size(&self) -> (f64, f64);

    fn resize(&mut self, width: f64, height: f64) -> Result<(), DocumentError>;

    /// Show (or hide with `None`) the non-interactive gesture preview.
    fn set_preview(&mut self, preview: Option<Drawable>);

    fn preview(&self) -> Option<&Drawable>;

    /// Request a repaint.
    fn render(&mut self);

    /// Drain pending change notifications.
    fn take_changes(&mut self) -> Vec<DocumentChange>;
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    width: f64,
    height: f64,
    objects: &'a [Drawable],
}

#[derive(Deserialize)]
struct Snapshot {
    width: f64,
    height: f64,
    objects: Vec<Drawable>,
}

/// In-memory document.
#[derive(Debug, Clone)]
pub struct Document {
    width: f64,
    height: f64,
    background: Color,
    objects: Vec<Drawable>,
    preview: Option<Drawable>,
    changes: Vec<DocumentChange>,
    render_requests: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty 400×200 white label.
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: Color::WHITE,
            objects: Vec::new(),
            preview: None,
            changes: Vec::new(),
            render_requests: 0,
        }
    }

    /// Empty label of the given size.
    pub fn with_size(width: f64, height: f64) -> Result<Self, DocumentError> {
        check_canvas_size(width, height)?;
        Ok(Self {
            width,
            height,
            ..Self::new()
        })
    }

    /// Number of repaints requested so far.
    pub fn render_requests(&self) -> u64 {
        self.render_requests
    }

    pub fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

fn check_canvas_size(width: f64, height: f64) -> Result<(), DocumentError> {
    let valid = |v: f64| v.is_finite() && (MIN_CANVAS..=MAX_CANVAS).contains(&v);
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(DocumentError::CanvasSize {
            width,
            height,
            min: MIN_CANVAS,
            max: MAX_CANVAS,
        })
    }
}

impl DocumentModel for Document {
    fn add_object(&mut self, drawable: Drawable) {
        log::debug!("add {} ({})", drawable.id, drawable.kind.name());
        self.changes.push(DocumentChange::Added(drawable.id));
        self.objects.push(drawable);
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<Drawable> {
        let idx = self.index_of(id)?;
        self.changes.push(DocumentChange::Removed(id));
        Some(self.objects.remove(idx))
    }

    fn objects(&self) -> &[Drawable] {
        &self.objects
    }

    fn update_object(&mut self, id: ObjectId, edit: impl FnOnce(&mut Drawable)) -> bool {
        let Some(idx) = self.index_of(id) else {
            return false;
        };
        edit(&mut self.objects[idx]);
        self.changes.push(DocumentChange::Modified(id));
        true
    }

    fn reorder(&mut self, id: ObjectId, order: ZOrder) -> bool {
        let Some(pos) = self.index_of(id) else {
            return false;
        };
        let last = self.objects.len() - 1;
        let target = match order {
            ZOrder::Front => last,
            ZOrder::Back => 0,
            ZOrder::Forward => (pos + 1).min(last),
            ZOrder::Backward => pos.saturating_sub(1),
        };
        if target == pos {
            return false;
        }
        let obj = self.objects.remove(pos);
        self.objects.insert(target, obj);
        self.changes.push(DocumentChange::Reordered(id));
        true
    }

    fn clear(&mut self) {
        if self.objects.is_empty() {
            return;
        }
        self.objects.clear();
        self.changes.push(DocumentChange::Replaced);
    }

    fn serialize(&self) -> Result<Vec<u8>, DocumentError> {
        let snapshot = SnapshotRef {
            width: self.width,
            height: self.height,
            objects: &self.objects,
        };
        Ok(rmp_serde::to_vec_named(&snapshot)?)
    }

    fn deserialize(&mut self, blob: &[u8]) -> Result<(), DocumentError> {
        let snapshot: Snapshot = rmp_serde::from_slice(blob)?;
        self.width = snapshot.width;
        self.height = snapshot.height;
        self.objects = snapshot.objects;
        self.changes.push(DocumentChange::Replaced);
        Ok(())
    }

    fn background(&self) -> Color {
        self.background
    }

    fn set_background(&mut self, color: Color) {
        if self.background == color {
            return;
        }
        self.background = color;
        self.changes.push(DocumentChange::Background(color));
    }

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn resize(&mut self, width: f64, height: f64) -> Result<(), DocumentError> {
        check_canvas_size(width, height)?;
        if (self.width, self.height) == (width, height) {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        self.changes.push(DocumentChange::Resized { width, height });
        Ok(())
    }

    fn set_preview(&mut self, preview: Option<Drawable>) {
        self.preview = preview;
    }

    fn preview(&self) -> Option<&Drawable> {
        self.preview.as_ref()
    }

    fn render(&mut self) {
        self.render_requests += 1;
        log::trace!("render request #{}", self.render_requests);
    }

    fn take_changes(&mut self) -> Vec<DocumentChange> {
        std::mem::take(&mut self.changes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::model::DrawableKind;
    use pretty_assertions::assert_eq;

    fn rect(left: f64) -> Drawable {
        Drawable::new(DrawableKind::Rect {
            bounds: Bounds::new(left, 0.0, 10.0, 10.0),
        })
    }

    #[test]
    fn mutations_queue_changes() {
        let mut doc = Document::new();
        let r = rect(0.0);
        let id = r.id;
        doc.add_object(r);
        assert!(doc.update_object(id, |o| o.stroke_width = 3.0));
        doc.remove_object(id);
        assert_eq!(
            doc.take_changes(),
            vec![
                DocumentChange::Added(id),
                DocumentChange::Modified(id),
                DocumentChange::Removed(id),
            ]
        );
        assert!(doc.take_changes().is_empty());
    }

    #[test]
    fn preview_is_silent_and_not_serialized() {
        let mut doc = Document::new();
        doc.set_preview(Some(rect(5.0)));
        assert!(doc.take_changes().is_empty());

        let blob = doc.serialize().unwrap();
        let mut other = Document::new();
        other.deserialize(&blob).unwrap();
        assert!(other.objects().is_empty());
        assert!(other.preview().is_none());
    }

    #[test]
    fn serialize_roundtrip_keeps_order_and_size() {
        let mut doc = Document::with_size(300.0, 150.0).unwrap();
        let a = rect(0.0);
        let mut b = rect(20.0);
        b.name = Some("badge".into());
        doc.add_object(a.clone());
        doc.add_object(b.clone());

        let blob = doc.serialize().unwrap();
        let mut restored = Document::new();
        restored.deserialize(&blob).unwrap();
        assert_eq!(restored.size(), (300.0, 150.0));
        assert_eq!(restored.objects(), &[a, b][..]);
        assert_eq!(restored.take_changes(), vec![DocumentChange::Replaced]);
    }

    #[test]
    fn deserialize_rejects_garbage() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.deserialize(&[0xc1, 0x00]),
            Err(DocumentError::Decode(_))
        ));
    }

    #[test]
    fn reorder_moves_within_bounds() {
        let mut doc = Document::new();
        let (a, b, c) = (rect(0.0), rect(1.0), rect(2.0));
        let (ia, ib, ic) = (a.id, b.id, c.id);
        doc.add_object(a);
        doc.add_object(b);
        doc.add_object(c);

        assert!(doc.reorder(ia, ZOrder::Front));
        assert_eq!(doc.index_of(ia), Some(2));
        assert!(!doc.reorder(ia, ZOrder::Forward), "already at front");
        assert!(doc.reorder(ic, ZOrder::Back));
        assert_eq!(
            doc.objects().iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![ic, ib, ia]
        );
        assert!(doc.reorder(ia, ZOrder::Backward));
        assert_eq!(doc.index_of(ia), Some(1));
    }

    #[test]
    fn resize_validates_range() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.resize(50.0, 200.0),
            Err(DocumentError::CanvasSize { .. })
        ));
        assert_eq!(doc.size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        doc.resize(600.0, 300.0).unwrap();
        assert_eq!(
            doc.take_changes(),
            vec![DocumentChange::Resized {
                width: 600.0,
                height: 300.0
            }]
        );
    }

    #[test]
    fn background_change_only_when_different() {
        let mut doc = Document::new();
        doc.set_background(Color::WHITE);
        assert!(doc.take_changes().is_empty());
        doc.set_background(Color::BLACK);
        assert_eq!(doc.take_changes(), vec![DocumentChange::Background(Color::BLACK)]);
    }
}

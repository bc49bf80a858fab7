//! Drawables placed on the label canvas.
//!
//! Every committed object is a `Drawable`: a geometric primitive plus paint
//! (fill, stroke, stroke width, opacity) and an optional user-assigned name
//! shown in the layers list. Positions are document pixels, y grows down.

use crate::color::Color;
use crate::geometry::Bounds;
use crate::id::ObjectId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::borrow::Cow;

// ─── Lines ───────────────────────────────────────────────────────────────

/// Arrow head placement on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArrowKind {
    #[default]
    None,
    Start,
    End,
    Both,
}

impl ArrowKind {
    /// Parse the host's `lineArrow` select value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(Self::None),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    pub fn has_start(self) -> bool {
        matches!(self, Self::Start | Self::Both)
    }

    pub fn has_end(self) -> bool {
        matches!(self, Self::End | Self::Both)
    }
}

/// A filled triangular head drawn at a line endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    /// Endpoint the head is centered on.
    pub center: Point,
    /// Side length of the head's bounding square.
    pub size: f64,
    /// Rotation in degrees, clockwise from +x.
    pub angle_deg: f64,
}

// ─── Star ────────────────────────────────────────────────────────────────

/// Five-pointed star outline in a 100-unit design space.
pub const STAR_OUTLINE: [(f64, f64); 10] = [
    (50.0, 0.0),
    (61.0, 35.0),
    (98.0, 35.0),
    (68.0, 57.0),
    (79.0, 92.0),
    (50.0, 70.0),
    (21.0, 92.0),
    (32.0, 57.0),
    (2.0, 35.0),
    (39.0, 35.0),
];

/// Scale `STAR_OUTLINE` so its bounding box fills `bounds` exactly.
pub fn star_points(bounds: Bounds) -> SmallVec<[Point; 10]> {
    let (min_x, max_x, min_y, max_y) = STAR_OUTLINE.iter().fold(
        (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
        |(x0, x1, y0, y1), &(x, y)| (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
    );
    let sx = bounds.width / (max_x - min_x);
    let sy = bounds.height / (max_y - min_y);
    STAR_OUTLINE
        .iter()
        .map(|&(x, y)| {
            Point::new(
                bounds.left + (x - min_x) * sx,
                bounds.top + (y - min_y) * sy,
            )
        })
        .collect()
}

// ─── Drawables ───────────────────────────────────────────────────────────

/// The primitive kinds a label can hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawableKind {
    Rect { bounds: Bounds },
    RoundedRect { bounds: Bounds, rx: f64, ry: f64 },
    Circle { center: Point, radius: f64 },
    Ellipse { center: Point, rx: f64, ry: f64 },
    /// Isosceles triangle, apex at top-center of `bounds`.
    Triangle { bounds: Bounds },
    /// Closed polygon, absolute points.
    Star { points: SmallVec<[Point; 10]> },
    Line {
        from: Point,
        to: Point,
        arrow: ArrowKind,
    },
}

impl DrawableKind {
    /// Stable short name, matching the host's tool ids.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "rect",
            Self::RoundedRect { .. } => "roundedRect",
            Self::Circle { .. } => "circle",
            Self::Ellipse { .. } => "ellipse",
            Self::Triangle { .. } => "triangle",
            Self::Star { .. } => "star",
            Self::Line { .. } => "line",
        }
    }

    /// Label shown in the layers list when the user hasn't named the object.
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Rect { .. } => "Rectangle",
            Self::RoundedRect { .. } => "Rounded rectangle",
            Self::Circle { .. } => "Circle",
            Self::Ellipse { .. } => "Ellipse",
            Self::Triangle { .. } => "Triangle",
            Self::Star { .. } => "Star",
            Self::Line { .. } => "Line",
        }
    }
}

/// A committed (or preview) object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub id: ObjectId,
    pub kind: DrawableKind,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    /// 0.0 .. 1.0
    pub opacity: f64,
    /// Dash pattern (on, off, ...). `None` = solid.
    pub dash: Option<SmallVec<[f64; 2]>>,
    /// Preview objects are not selectable and receive no pointer events.
    pub interactive: bool,
    /// User-assigned layer name.
    pub name: Option<String>,
}

impl Drawable {
    /// New drawable with a freshly minted id and default paint (black, 1px
    /// stroke).
    pub fn new(kind: DrawableKind) -> Self {
        Self::with_id(ObjectId::mint(kind.name()), kind)
    }

    /// Gesture preview geometry. Shares the reserved preview id and is not
    /// interactive.
    pub fn preview(kind: DrawableKind) -> Self {
        Self {
            interactive: false,
            ..Self::with_id(ObjectId::preview(), kind)
        }
    }

    fn with_id(id: ObjectId, kind: DrawableKind) -> Self {
        Self {
            id,
            kind,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_width: 1.0,
            opacity: 1.0,
            dash: None,
            interactive: true,
            name: None,
        }
    }

    /// Deep copy under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: ObjectId::mint(self.kind.name()),
            ..self.clone()
        }
    }

    /// Axis-aligned extent of the geometry (stroke excluded).
    pub fn bounds(&self) -> Bounds {
        match &self.kind {
            DrawableKind::Rect { bounds }
            | DrawableKind::RoundedRect { bounds, .. }
            | DrawableKind::Triangle { bounds } => *bounds,
            DrawableKind::Circle { center, radius } => {
                Bounds::centered(*center, radius * 2.0, radius * 2.0)
            }
            DrawableKind::Ellipse { center, rx, ry } => {
                Bounds::centered(*center, rx * 2.0, ry * 2.0)
            }
            DrawableKind::Star { points } => {
                let mut it = points.iter();
                let Some(first) = it.next() else {
                    return Bounds::default();
                };
                let (mut min, mut max) = (*first, *first);
                for p in it {
                    min = Point::new(min.x.min(p.x), min.y.min(p.y));
                    max = Point::new(max.x.max(p.x), max.y.max(p.y));
                }
                Bounds::from_corners(min, max)
            }
            DrawableKind::Line { from, to, .. } => Bounds::from_corners(*from, *to),
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        let d = Vec2::new(dx, dy);
        match &mut self.kind {
            DrawableKind::Rect { bounds }
            | DrawableKind::RoundedRect { bounds, .. }
            | DrawableKind::Triangle { bounds } => *bounds = bounds.translate(dx, dy),
            DrawableKind::Circle { center, .. } | DrawableKind::Ellipse { center, .. } => {
                *center += d;
            }
            DrawableKind::Star { points } => {
                for p in points.iter_mut() {
                    *p += d;
                }
            }
            DrawableKind::Line { from, to, .. } => {
                *from += d;
                *to += d;
            }
        }
    }

    /// Move so the bounding box's top-left corner lands on `(left, top)`.
    pub fn move_to(&mut self, left: f64, top: f64) {
        let b = self.bounds();
        self.translate(left - b.left, top - b.top);
    }

    pub fn display_name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name.as_str()),
            None => Cow::Borrowed(self.kind.default_label()),
        }
    }

    /// Arrow heads for a line: side `2·min(15, 5·stroke_width)`, rotated to
    /// the line direction (start heads point backwards).
    pub fn arrow_heads(&self) -> SmallVec<[ArrowHead; 2]> {
        let mut heads = SmallVec::new();
        let DrawableKind::Line { from, to, arrow } = &self.kind else {
            return heads;
        };
        let angle = (to.y - from.y).atan2(to.x - from.x);
        let size = (self.stroke_width * 5.0).min(15.0) * 2.0;
        if arrow.has_end() {
            heads.push(ArrowHead {
                center: *to,
                size,
                angle_deg: angle.to_degrees(),
            });
        }
        if arrow.has_start() {
            heads.push(ArrowHead {
                center: *from,
                size,
                angle_deg: (angle + std::f64::consts::PI).to_degrees(),
            });
        }
        heads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn star_fills_its_bounds() {
        let b = Bounds::new(10.0, 20.0, 96.0, 46.0);
        let star = Drawable::new(DrawableKind::Star {
            points: star_points(b),
        });
        let got = star.bounds();
        assert!((got.left - b.left).abs() < 1e-9);
        assert!((got.top - b.top).abs() < 1e-9);
        assert!((got.width - b.width).abs() < 1e-9);
        assert!((got.height - b.height).abs() < 1e-9);
    }

    #[test]
    fn circle_bounds_are_square() {
        let c = Drawable::new(DrawableKind::Circle {
            center: Point::new(50.0, 50.0),
            radius: 10.0,
        });
        assert_eq!(c.bounds(), Bounds::new(40.0, 40.0, 20.0, 20.0));
    }

    #[test]
    fn move_to_repositions_line_by_its_box() {
        let mut line = Drawable::new(DrawableKind::Line {
            from: Point::new(30.0, 40.0),
            to: Point::new(10.0, 60.0),
            arrow: ArrowKind::None,
        });
        line.move_to(0.0, 0.0);
        match line.kind {
            DrawableKind::Line { from, to, .. } => {
                assert_eq!(from, Point::new(20.0, 0.0));
                assert_eq!(to, Point::new(0.0, 20.0));
            }
            _ => panic!("expected Line"),
        }
    }

    #[test]
    fn arrow_heads_follow_line_direction() {
        let mut line = Drawable::new(DrawableKind::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, 100.0),
            arrow: ArrowKind::Both,
        });
        line.stroke_width = 2.0;
        let heads = line.arrow_heads();
        assert_eq!(heads.len(), 2);
        assert_eq!(heads[0].center, Point::new(0.0, 100.0));
        assert!((heads[0].angle_deg - 90.0).abs() < 1e-9);
        assert!((heads[1].angle_deg - 270.0).abs() < 1e-9);
        assert_eq!(heads[0].size, 20.0);

        line.stroke_width = 10.0;
        assert_eq!(line.arrow_heads()[0].size, 30.0, "head size caps at 15 per side");
    }

    #[test]
    fn display_name_prefers_user_name() {
        let mut r = Drawable::new(DrawableKind::Rect {
            bounds: Bounds::new(0.0, 0.0, 5.0, 5.0),
        });
        assert_eq!(r.display_name(), "Rectangle");
        r.name = Some("Price tag".into());
        assert_eq!(r.display_name(), "Price tag");
    }

    #[test]
    fn duplicate_gets_fresh_id() {
        let r = Drawable::new(DrawableKind::Triangle {
            bounds: Bounds::new(0.0, 0.0, 5.0, 5.0),
        });
        let d = r.duplicate();
        assert_ne!(r.id, d.id);
        assert_eq!(r.kind, d.kind);
    }
}

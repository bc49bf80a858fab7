//! Shape tool catalogue and the shape factory.
//!
//! Every tool builds its drawable from a normalized drag rectangle (area
//! shapes) or two endpoints (line), using a `DrawStyle` captured when the
//! gesture starts.
//!
//! ## Preview styling
//!
//! | Kind  | Opacity | Dash   |
//! |-------|---------|--------|
//! | Shape | 0.6     | [4, 4] |
//! | Line  | 0.7     | [6, 4] |
//!
//! Previews are never interactive.

use lm_core::model::star_points;
use lm_core::{ArrowKind, Bounds, Color, Drawable, DrawableKind, Point};
use serde::{Deserialize, Serialize};
use smallvec::smallvec;

/// Smallest width/height the factory will build.
pub const MIN_SHAPE_EXTENT: f64 = 2.0;

const SHAPE_PREVIEW_OPACITY: f64 = 0.6;
const LINE_PREVIEW_OPACITY: f64 = 0.7;

/// The click-drag creation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeTool {
    Rect,
    RoundedRect,
    Circle,
    Ellipse,
    Triangle,
    Star,
    Line,
}

impl ShapeTool {
    pub const ALL: [ShapeTool; 7] = [
        Self::Rect,
        Self::RoundedRect,
        Self::Circle,
        Self::Ellipse,
        Self::Triangle,
        Self::Star,
        Self::Line,
    ];

    /// Parse a host tool id. Unknown ids yield `None`.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id)
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::RoundedRect => "roundedRect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Star => "star",
            Self::Line => "line",
        }
    }

    pub fn is_line(self) -> bool {
        self == Self::Line
    }
}

// ─── Styles ──────────────────────────────────────────────────────────────

/// Paint for area shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeStyle {
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
    /// Draw the outline only; the fill becomes transparent.
    pub outline_only: bool,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            stroke: Color::BLACK,
            stroke_width: 2.0,
            outline_only: false,
        }
    }
}

impl ShapeStyle {
    pub fn effective_fill(&self) -> Color {
        if self.outline_only {
            Color::TRANSPARENT
        } else {
            self.fill
        }
    }

    pub fn effective_stroke_width(&self) -> f64 {
        self.stroke_width.max(0.0)
    }
}

/// Paint for lines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub arrow: ArrowKind,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 2.0,
            arrow: ArrowKind::None,
        }
    }
}

impl LineStyle {
    pub fn effective_width(&self) -> f64 {
        self.width.max(1.0)
    }
}

/// Style parameters captured at gesture start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DrawStyle {
    pub shape: ShapeStyle,
    pub line: LineStyle,
}

// ─── Factory ─────────────────────────────────────────────────────────────

/// Geometry for an area tool over `bounds`, each side at least
/// `MIN_SHAPE_EXTENT`. `None` for the line tool.
fn area_kind(tool: ShapeTool, bounds: Bounds) -> Option<DrawableKind> {
    let b = Bounds::new(
        bounds.left,
        bounds.top,
        bounds.width.max(MIN_SHAPE_EXTENT),
        bounds.height.max(MIN_SHAPE_EXTENT),
    );
    let kind = match tool {
        ShapeTool::Rect => DrawableKind::Rect { bounds: b },
        ShapeTool::RoundedRect => DrawableKind::RoundedRect {
            bounds: b,
            rx: (b.width / 4.0).min(16.0),
            ry: (b.height / 4.0).min(16.0),
        },
        ShapeTool::Circle => DrawableKind::Circle {
            center: b.center(),
            radius: b.width.min(b.height) / 2.0,
        },
        ShapeTool::Ellipse => DrawableKind::Ellipse {
            center: b.center(),
            rx: b.width / 2.0,
            ry: b.height / 2.0,
        },
        ShapeTool::Triangle => DrawableKind::Triangle { bounds: b },
        ShapeTool::Star => DrawableKind::Star {
            points: star_points(b),
        },
        ShapeTool::Line => return None,
    };
    Some(kind)
}

fn paint_shape(mut drawable: Drawable, style: &ShapeStyle) -> Drawable {
    drawable.fill = style.effective_fill();
    drawable.stroke = style.stroke;
    drawable.stroke_width = style.effective_stroke_width();
    drawable
}

fn paint_line(mut line: Drawable, style: &LineStyle) -> Drawable {
    line.stroke = style.color;
    line.fill = style.color;
    line.stroke_width = style.effective_width();
    line
}

/// Build an area shape filling `bounds`. Returns `None` for the line tool.
pub fn build_shape(tool: ShapeTool, bounds: Bounds, style: &ShapeStyle) -> Option<Drawable> {
    let kind = area_kind(tool, bounds)?;
    Some(paint_shape(Drawable::new(kind), style))
}

/// Build a line, with arrow heads per `style.arrow`.
pub fn build_line(from: Point, to: Point, style: &LineStyle) -> Drawable {
    let kind = DrawableKind::Line {
        from,
        to,
        arrow: style.arrow,
    };
    paint_line(Drawable::new(kind), style)
}

/// Build `tool`'s click-to-add shape at its standard spot near the top-left
/// of the label.
///
/// | Tool          | Placement                    |
/// |---------------|------------------------------|
/// | rect, rounded | 120×80 at (80, 50)           |
/// | circle        | radius 50 at (80, 50)        |
/// | ellipse       | 120×70 at (80, 50)           |
/// | triangle      | 100×90 at (80, 50)           |
/// | star          | 96×92 at (80, 50)            |
/// | line          | (50, 100) to (200, 100)      |
pub fn build_default(tool: ShapeTool, style: &DrawStyle) -> Drawable {
    let size = match tool {
        ShapeTool::Rect | ShapeTool::RoundedRect => Some((120.0, 80.0)),
        ShapeTool::Circle => Some((100.0, 100.0)),
        ShapeTool::Ellipse => Some((120.0, 70.0)),
        ShapeTool::Triangle => Some((100.0, 90.0)),
        ShapeTool::Star => Some((96.0, 92.0)),
        ShapeTool::Line => None,
    };
    let shape = size.and_then(|(w, h)| build_shape(tool, Bounds::new(80.0, 50.0, w, h), &style.shape));
    match shape {
        Some(shape) => shape,
        None => build_line(Point::new(50.0, 100.0), Point::new(200.0, 100.0), &style.line),
    }
}

pub fn build_preview_shape(tool: ShapeTool, bounds: Bounds, style: &ShapeStyle) -> Option<Drawable> {
    let kind = area_kind(tool, bounds)?;
    let mut shape = paint_shape(Drawable::preview(kind), style);
    shape.opacity = SHAPE_PREVIEW_OPACITY;
    shape.dash = Some(smallvec![4.0, 4.0]);
    Some(shape)
}

/// Preview lines never carry arrow heads.
pub fn build_preview_line(from: Point, to: Point, style: &LineStyle) -> Drawable {
    let kind = DrawableKind::Line {
        from,
        to,
        arrow: ArrowKind::None,
    };
    let mut line = paint_line(Drawable::preview(kind), style);
    line.opacity = LINE_PREVIEW_OPACITY;
    line.dash = Some(smallvec![6.0, 4.0]);
    line
}

//! Click-drag shape creation as a tagged-union state machine.
//!
//! `transition(state, event, ctx)` is pure: it returns the next state plus a
//! list of `DrawEffect`s for the caller to apply to the document. Nothing
//! here touches a document, so every transition is testable on its own.
//!
//! ```text
//!  Idle ──Arm(Some)──▶ Armed(tool) ──PointerDown──▶ Dragging(gesture)
//!   ▲                    ▲   ▲                          │  │
//!   └────Arm(None)───────┘   └──PointerUp / Cancel──────┘  └─PointerMove (preview)
//! ```
//!
//! ## Modifier behaviors
//!
//! | Modifier | Area shapes                       | Line                 |
//! |----------|-----------------------------------|----------------------|
//! | **Shift**| Square, grows from anchor corner  | Snap angle to 45°    |
//! | **Alt**  | Symmetric around anchor/pointer midpoint | —             |
//! | **Both** | Square centred on that midpoint   | Snap angle to 45°    |

use crate::input::{InputEvent, Modifiers};
use crate::tools::{self, DrawStyle, ShapeTool};
use kurbo::Vec2;
use lm_core::{Bounds, Drawable, Point};
use std::f64::consts::FRAC_PI_4;

/// Gestures smaller than this (px) commit nothing.
pub const DEFAULT_MIN_SIZE: f64 = 2.0;

/// An in-progress drag. At most one exists at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub tool: ShapeTool,
    pub anchor: Point,
    pub current: Point,
    pub modifiers: Modifiers,
    /// Style captured at pointer-down.
    pub style: DrawStyle,
}

impl Gesture {
    /// Bounds for area shapes under the current modifiers.
    pub fn live_bounds(&self) -> Bounds {
        bounds_from_two_points(self.anchor, self.current, self.modifiers)
    }

    /// Line endpoint under the current modifiers.
    pub fn line_end(&self) -> Point {
        snap_line(self.anchor, self.current, self.modifiers.shift)
    }

    fn preview(&self) -> Option<Drawable> {
        if self.tool.is_line() {
            Some(tools::build_preview_line(
                self.anchor,
                self.line_end(),
                &self.style.line,
            ))
        } else {
            tools::build_preview_shape(self.tool, self.live_bounds(), &self.style.shape)
        }
    }

    /// The drawable to commit, or `None` when below `min_size`.
    fn finish(&self, min_size: f64) -> Option<Drawable> {
        if self.tool.is_line() {
            let end = self.line_end();
            if self.anchor.distance(end) < min_size {
                return None;
            }
            return Some(tools::build_line(self.anchor, end, &self.style.line));
        }
        let bounds = self.live_bounds();
        if bounds.width < min_size || bounds.height < min_size {
            return None;
        }
        tools::build_shape(self.tool, bounds, &self.style.shape)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawState {
    #[default]
    Idle,
    Armed(ShapeTool),
    Dragging(Gesture),
}

impl DrawState {
    pub fn tool(&self) -> Option<ShapeTool> {
        match self {
            Self::Idle => None,
            Self::Armed(tool) => Some(*tool),
            Self::Dragging(g) => Some(g.tool),
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    /// Tool selection. `None` returns to the select tool.
    Arm(Option<ShapeTool>),
    PointerDown { at: Point, modifiers: Modifiers },
    PointerMove { at: Point, modifiers: Modifiers },
    PointerUp { at: Point, modifiers: Modifiers },
    /// Escape.
    Cancel,
}

impl DrawEvent {
    /// Pointer events map one-to-one; keys are handled by the session.
    pub fn from_input(event: &InputEvent) -> Option<Self> {
        let at = event.position()?;
        let modifiers = event.modifiers();
        match event {
            InputEvent::PointerDown { .. } => Some(Self::PointerDown { at, modifiers }),
            InputEvent::PointerMove { .. } => Some(Self::PointerMove { at, modifiers }),
            InputEvent::PointerUp { .. } => Some(Self::PointerUp { at, modifiers }),
            InputEvent::Key { .. } => None,
        }
    }
}

/// Work for the caller to apply to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEffect {
    /// Replace the preview slot with this drawable.
    ShowPreview(Drawable),
    ClearPreview,
    /// Add this drawable to the document and select it.
    Commit(Drawable),
    /// Freehand drawing mode must be switched off.
    ExitDrawingMode,
}

/// Inputs to `transition` that live outside the state.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub style: &'a DrawStyle,
    /// Freehand drawing mode is on.
    pub drawing_mode: bool,
    pub min_size: f64,
}

impl<'a> DrawContext<'a> {
    pub fn new(style: &'a DrawStyle) -> Self {
        Self {
            style,
            drawing_mode: false,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

/// Advance the state machine by one event.
pub fn transition(
    state: DrawState,
    event: DrawEvent,
    ctx: &DrawContext<'_>,
) -> (DrawState, Vec<DrawEffect>) {
    match (state, event) {
        (state, DrawEvent::Arm(tool)) => {
            let mut effects = Vec::new();
            if state.is_dragging() {
                effects.push(DrawEffect::ClearPreview);
            }
            if tool.is_some() && ctx.drawing_mode {
                effects.push(DrawEffect::ExitDrawingMode);
            }
            log::debug!("arm tool {:?}", tool.map(ShapeTool::id));
            let next = tool.map_or(DrawState::Idle, DrawState::Armed);
            (next, effects)
        }

        (DrawState::Armed(tool), DrawEvent::PointerDown { at, modifiers }) => {
            if ctx.drawing_mode {
                log::warn!("pointer down ignored: drawing mode is active");
                return (DrawState::Armed(tool), Vec::new());
            }
            let gesture = Gesture {
                tool,
                anchor: at,
                current: at,
                modifiers,
                style: *ctx.style,
            };
            log::debug!("start {} gesture at ({}, {})", tool.id(), at.x, at.y);
            // Lines show a zero-length preview right away; area shapes wait for a move.
            let effects = if tool.is_line() {
                gesture.preview().map(DrawEffect::ShowPreview).into_iter().collect()
            } else {
                Vec::new()
            };
            (DrawState::Dragging(gesture), effects)
        }

        (DrawState::Dragging(mut gesture), DrawEvent::PointerMove { at, modifiers }) => {
            gesture.current = at;
            gesture.modifiers = modifiers;
            log::trace!("drag {} to ({}, {})", gesture.tool.id(), at.x, at.y);
            let effects = gesture
                .preview()
                .map(DrawEffect::ShowPreview)
                .into_iter()
                .collect();
            (DrawState::Dragging(gesture), effects)
        }

        (DrawState::Dragging(mut gesture), DrawEvent::PointerUp { at, modifiers }) => {
            gesture.current = at;
            gesture.modifiers = modifiers;
            let mut effects = vec![DrawEffect::ClearPreview];
            match gesture.finish(ctx.min_size) {
                Some(drawable) => {
                    log::debug!("commit {} {}", gesture.tool.id(), drawable.id);
                    effects.push(DrawEffect::Commit(drawable));
                }
                None => log::debug!("{} gesture below minimum size", gesture.tool.id()),
            }
            (DrawState::Armed(gesture.tool), effects)
        }

        (DrawState::Dragging(gesture), DrawEvent::Cancel) => {
            log::debug!("cancel {} gesture", gesture.tool.id());
            (DrawState::Armed(gesture.tool), vec![DrawEffect::ClearPreview])
        }

        // Everything else is a no-op: pointer-up with no gesture, a second
        // pointer-down mid-drag, pointer events while idle.
        (state, _) => (state, Vec::new()),
    }
}

// ─── Geometry ────────────────────────────────────────────────────────────

/// Rectangle spanned by `anchor` and `current` under Alt/Shift.
///
/// Alt is applied first (symmetric around the midpoint), then Shift squares
/// the result with side `max(w, h)`: around the midpoint when Alt is also
/// held, otherwise growing away from the anchor's corner.
pub fn bounds_from_two_points(anchor: Point, current: Point, modifiers: Modifiers) -> Bounds {
    let mid = anchor.midpoint(current);
    let (mut x1, mut y1, mut x2, mut y2) = (anchor.x, anchor.y, current.x, current.y);
    if modifiers.alt {
        let (w, h) = ((x2 - x1).abs(), (y2 - y1).abs());
        x1 = mid.x - w / 2.0;
        y1 = mid.y - h / 2.0;
        x2 = mid.x + w / 2.0;
        y2 = mid.y + h / 2.0;
    }
    let mut bounds = Bounds::from_corners(Point::new(x1, y1), Point::new(x2, y2));
    if modifiers.shift {
        let side = bounds.width.max(bounds.height);
        bounds = if modifiers.alt {
            Bounds::centered(mid, side, side)
        } else {
            let left = if x1 <= x2 { x1 } else { x1 - side };
            let top = if y1 <= y2 { y1 } else { y1 - side };
            Bounds::new(left, top, side, side)
        };
    }
    bounds
}

/// Line endpoint, snapped to the nearest 45° around `anchor` when `shift`.
/// Length is preserved.
pub fn snap_line(anchor: Point, current: Point, shift: bool) -> Point {
    if !shift {
        return current;
    }
    let delta = current - anchor;
    let snapped = (delta.atan2() / FRAC_PI_4).round() * FRAC_PI_4;
    anchor + Vec2::from_angle(snapped) * delta.hypot()
}

// ─── Drawer ──────────────────────────────────────────────────────────────

/// Owns a `DrawState` for callers that prefer `&mut self`.
#[derive(Debug, Default)]
pub struct ShapeDrawer {
    state: DrawState,
}

impl ShapeDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: DrawEvent, ctx: &DrawContext<'_>) -> Vec<DrawEffect> {
        let state = std::mem::take(&mut self.state);
        let (next, effects) = transition(state, event, ctx);
        self.state = next;
        effects
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn tool(&self) -> Option<ShapeTool> {
        self.state.tool()
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            DrawState::Dragging(g) => Some(g),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lm_core::{DrawableKind, ObjectId};
    use pretty_assertions::assert_eq;

    fn down(x: f64, y: f64) -> DrawEvent {
        DrawEvent::PointerDown {
            at: Point::new(x, y),
            modifiers: Modifiers::NONE,
        }
    }

    fn moved(x: f64, y: f64, modifiers: Modifiers) -> DrawEvent {
        DrawEvent::PointerMove {
            at: Point::new(x, y),
            modifiers,
        }
    }

    fn up(x: f64, y: f64, modifiers: Modifiers) -> DrawEvent {
        DrawEvent::PointerUp {
            at: Point::new(x, y),
            modifiers,
        }
    }

    fn committed(effects: &[DrawEffect]) -> Option<&Drawable> {
        effects.iter().find_map(|e| match e {
            DrawEffect::Commit(d) => Some(d),
            _ => None,
        })
    }

    #[test]
    fn shift_squares_from_anchor_corner() {
        let b = bounds_from_two_points(
            Point::new(100.0, 100.0),
            Point::new(150.0, 130.0),
            Modifiers::SHIFT,
        );
        assert_eq!(b, Bounds::new(100.0, 100.0, 50.0, 50.0));
    }

    #[test]
    fn shift_square_dragging_up_left_keeps_anchor_corner() {
        let b = bounds_from_two_points(
            Point::new(100.0, 100.0),
            Point::new(70.0, 90.0),
            Modifiers::SHIFT,
        );
        assert_eq!(b, Bounds::new(70.0, 70.0, 30.0, 30.0));
        assert_eq!((b.right(), b.bottom()), (100.0, 100.0));
    }

    #[test]
    fn alt_centers_on_midpoint() {
        let anchor = Point::new(10.0, 20.0);
        let current = Point::new(70.0, 40.0);
        let b = bounds_from_two_points(anchor, current, Modifiers::ALT);
        assert_eq!(b.center(), anchor.midpoint(current));
        assert_eq!((b.width, b.height), (60.0, 20.0));
    }

    #[test]
    fn alt_shift_squares_around_midpoint() {
        let both = Modifiers {
            shift: true,
            alt: true,
            ..Modifiers::NONE
        };
        let b = bounds_from_two_points(Point::new(0.0, 0.0), Point::new(40.0, 10.0), both);
        assert_eq!(b, Bounds::new(0.0, -15.0, 40.0, 40.0));
    }

    #[test]
    fn snap_line_preserves_length() {
        let anchor = Point::new(0.0, 0.0);
        let end = snap_line(anchor, Point::new(100.0, 10.0), true);
        assert!((end.x - 100.0f64.hypot(10.0)).abs() < 1e-9);
        assert!(end.y.abs() < 1e-9);

        let end = snap_line(anchor, Point::new(50.0, 40.0), true);
        assert!((end.x - end.y).abs() < 1e-9, "snapped to 45°");
        assert!((anchor.distance(end) - 50.0f64.hypot(40.0)).abs() < 1e-9);

        assert_eq!(snap_line(anchor, Point::new(3.0, 4.0), false), Point::new(3.0, 4.0));
    }

    #[test]
    fn arm_from_idle_and_back() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let (s, fx) = transition(DrawState::Idle, DrawEvent::Arm(Some(ShapeTool::Star)), &ctx);
        assert_eq!(s, DrawState::Armed(ShapeTool::Star));
        assert!(fx.is_empty());
        let (s, _) = transition(s, DrawEvent::Arm(None), &ctx);
        assert_eq!(s, DrawState::Idle);
    }

    #[test]
    fn arming_in_drawing_mode_exits_it() {
        let style = DrawStyle::default();
        let ctx = DrawContext {
            drawing_mode: true,
            ..DrawContext::new(&style)
        };
        let (_, fx) = transition(DrawState::Idle, DrawEvent::Arm(Some(ShapeTool::Rect)), &ctx);
        assert_eq!(fx, vec![DrawEffect::ExitDrawingMode]);
    }

    #[test]
    fn pointer_down_refused_in_drawing_mode() {
        let style = DrawStyle::default();
        let ctx = DrawContext {
            drawing_mode: true,
            ..DrawContext::new(&style)
        };
        let (s, fx) = transition(DrawState::Armed(ShapeTool::Rect), down(0.0, 0.0), &ctx);
        assert_eq!(s, DrawState::Armed(ShapeTool::Rect));
        assert!(fx.is_empty());
    }

    #[test]
    fn rect_gesture_with_shift_commits_square() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let mut drawer = ShapeDrawer::new();
        drawer.handle(DrawEvent::Arm(Some(ShapeTool::Rect)), &ctx);

        assert!(drawer.handle(down(100.0, 100.0), &ctx).is_empty());
        let fx = drawer.handle(moved(150.0, 130.0, Modifiers::SHIFT), &ctx);
        match fx.as_slice() {
            [DrawEffect::ShowPreview(p)] => {
                assert_eq!(p.bounds(), Bounds::new(100.0, 100.0, 50.0, 50.0));
                assert!(!p.interactive);
            }
            other => panic!("expected one preview, got {other:?}"),
        }

        let fx = drawer.handle(up(150.0, 130.0, Modifiers::SHIFT), &ctx);
        assert_eq!(fx[0], DrawEffect::ClearPreview);
        let rect = committed(&fx).expect("rect committed");
        assert_eq!(rect.bounds(), Bounds::new(100.0, 100.0, 50.0, 50.0));
        assert!(rect.interactive);
        assert_eq!(drawer.state(), &DrawState::Armed(ShapeTool::Rect));
    }

    #[test]
    fn tiny_circle_commits_nothing() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let (s, _) = transition(DrawState::Armed(ShapeTool::Circle), down(100.0, 100.0), &ctx);
        let (s, fx) = transition(s, up(100.0, 101.0, Modifiers::NONE), &ctx);
        assert_eq!(s, DrawState::Armed(ShapeTool::Circle));
        assert_eq!(fx, vec![DrawEffect::ClearPreview]);
    }

    #[test]
    fn line_preview_starts_at_zero_length() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let (_, fx) = transition(DrawState::Armed(ShapeTool::Line), down(5.0, 5.0), &ctx);
        match fx.as_slice() {
            [DrawEffect::ShowPreview(p)] => match p.kind {
                DrawableKind::Line { from, to, .. } => assert_eq!(from, to),
                ref other => panic!("expected line preview, got {other:?}"),
            },
            other => panic!("expected one preview, got {other:?}"),
        }
    }

    #[test]
    fn short_line_commits_nothing() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let (s, _) = transition(DrawState::Armed(ShapeTool::Line), down(0.0, 0.0), &ctx);
        let (_, fx) = transition(s, up(1.0, 1.0, Modifiers::NONE), &ctx);
        assert!(committed(&fx).is_none());
    }

    #[test]
    fn preview_keeps_one_id_until_commit() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let mut drawer = ShapeDrawer::new();
        drawer.handle(DrawEvent::Arm(Some(ShapeTool::Ellipse)), &ctx);
        drawer.handle(down(0.0, 0.0), &ctx);
        let a = drawer.handle(moved(20.0, 20.0, Modifiers::NONE), &ctx);
        let b = drawer.handle(moved(30.0, 30.0, Modifiers::NONE), &ctx);
        let c = drawer.handle(up(30.0, 30.0, Modifiers::NONE), &ctx);
        let id = |fx: &[DrawEffect]| match &fx[0] {
            DrawEffect::ShowPreview(d) => d.id,
            other => panic!("expected preview, got {other:?}"),
        };
        let (ia, ib) = (id(&a[..]), id(&b[..]));
        assert_eq!(ia, ib);
        assert_eq!(ia, ObjectId::preview());
        let final_id = committed(&c).map(|d| d.id);
        assert!(final_id.is_some());
        assert_ne!(final_id, Some(ib));
    }

    #[test]
    fn cancel_discards_gesture() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let (s, _) = transition(DrawState::Armed(ShapeTool::Rect), down(0.0, 0.0), &ctx);
        let (s, _) = transition(s, moved(50.0, 50.0, Modifiers::NONE), &ctx);
        let (s, fx) = transition(s, DrawEvent::Cancel, &ctx);
        assert_eq!(s, DrawState::Armed(ShapeTool::Rect));
        assert_eq!(fx, vec![DrawEffect::ClearPreview]);
        let (s, fx) = transition(s, up(50.0, 50.0, Modifiers::NONE), &ctx);
        assert_eq!(s, DrawState::Armed(ShapeTool::Rect));
        assert!(fx.is_empty(), "pointer-up with no gesture is a no-op");
    }

    #[test]
    fn rearming_mid_drag_clears_preview() {
        let style = DrawStyle::default();
        let ctx = DrawContext::new(&style);
        let (s, _) = transition(DrawState::Armed(ShapeTool::Rect), down(0.0, 0.0), &ctx);
        let (s, fx) = transition(s, DrawEvent::Arm(Some(ShapeTool::Line)), &ctx);
        assert_eq!(s, DrawState::Armed(ShapeTool::Line));
        assert_eq!(fx, vec![DrawEffect::ClearPreview]);
    }

    #[test]
    fn style_is_captured_at_pointer_down() {
        let mut style = DrawStyle::default();
        let (s, _) = transition(
            DrawState::Armed(ShapeTool::Rect),
            down(0.0, 0.0),
            &DrawContext::new(&style),
        );
        style.shape.stroke_width = 9.0;
        let (_, fx) = transition(s, up(10.0, 10.0, Modifiers::NONE), &DrawContext::new(&style));
        assert_eq!(committed(&fx).map(|d| d.stroke_width), Some(2.0));
    }
}

//! WASM bridge for Label Maker: exposes the editor session to the host page.
//!
//! Compiled via `wasm-pack build --target web`. The page owns the DOM and
//! the canvas painting; it forwards pointer/key events here and reads back
//! objects, the preview, and session events as JSON.

use lm_core::{ArrowKind, Bounds, Color, DocumentModel, Drawable, ObjectId};
use lm_editor::{
    DrawStyle, EditorConfig, EditorSession, InputEvent, Modifiers, SessionEvent, ShapeTool,
    ShortcutMap,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The main WASM-facing editor controller.
#[wasm_bindgen]
pub struct LabelCanvas {
    session: EditorSession,
}

#[wasm_bindgen]
impl LabelCanvas {
    /// Create an editor over an empty 400×200 label. `config_json` is an
    /// optional `EditorConfig` object (camelCase keys).
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<LabelCanvas, JsError> {
        console_error_panic_hook_setup();
        let config = match config_json.as_deref() {
            Some(json) => EditorConfig::from_json(json)?,
            None => EditorConfig::default(),
        };
        Ok(Self {
            session: EditorSession::new(config)?,
        })
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Arm a shape tool by id (`rect`, `roundedRect`, `circle`, `ellipse`,
    /// `triangle`, `star`, `line`), or the select tool with `undefined`.
    /// Returns `false` for an unknown id.
    pub fn arm_tool(&mut self, tool: Option<String>) -> Result<bool, JsError> {
        Ok(self.session.arm_tool_id(tool.as_deref())?)
    }

    /// Currently armed tool id, or `undefined` for select.
    pub fn armed_tool(&self) -> Option<String> {
        self.session.armed_tool().map(|t| t.id().to_string())
    }

    pub fn set_drawing_mode(&mut self, on: bool) -> Result<(), JsError> {
        Ok(self.session.set_drawing_mode(on)?)
    }

    pub fn drawing_mode(&self) -> bool {
        self.session.drawing_mode()
    }

    /// Replace the draw style from JSON (`{"shape": {...}, "line": {...}}`).
    pub fn set_style_json(&mut self, json: &str) -> Result<(), JsError> {
        let style: DrawStyle = serde_json::from_str(json)?;
        self.session.set_style(style);
        Ok(())
    }

    /// Set the line arrow from the `lineArrow` select (`none`, `start`,
    /// `end`, `both`). Returns `false` for anything else.
    pub fn set_line_arrow(&mut self, name: &str) -> bool {
        let Some(arrow) = ArrowKind::from_name(name) else {
            return false;
        };
        let mut style = *self.session.style();
        style.line.arrow = arrow;
        self.session.set_style(style);
        true
    }

    /// Effective editor configuration as JSON.
    pub fn config_json(&self) -> Result<String, JsError> {
        Ok(self.session.config().to_json()?)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Returns `true` when the event was consumed by a shape tool.
    pub fn pointer_down(&mut self, x: f64, y: f64, shift: bool, alt: bool) -> Result<bool, JsError> {
        self.pointer(InputEvent::pointer_down(x, y, pointer_modifiers(shift, alt)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, shift: bool, alt: bool) -> Result<bool, JsError> {
        self.pointer(InputEvent::pointer_move(x, y, pointer_modifiers(shift, alt)))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, shift: bool, alt: bool) -> Result<bool, JsError> {
        self.pointer(InputEvent::pointer_up(x, y, pointer_modifiers(shift, alt)))
    }

    /// Handle a key event. Returns `true` if a shortcut fired, so the page
    /// can `preventDefault()`.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Result<bool, JsError> {
        if ShortcutMap::resolve(key, ctrl, shift, alt, meta).is_none() {
            return Ok(false);
        }
        let event = InputEvent::key(
            key,
            Modifiers {
                shift,
                alt,
                ctrl,
                meta,
            },
        );
        Ok(self.session.handle_input(&event)?)
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<bool, JsError> {
        Ok(self.session.undo()?)
    }

    pub fn redo(&mut self) -> Result<bool, JsError> {
        Ok(self.session.redo()?)
    }

    pub fn can_undo(&self) -> bool {
        self.session.history_status().can_undo
    }

    pub fn can_redo(&self) -> bool {
        self.session.history_status().can_redo
    }

    // ─── Selection & edits ───────────────────────────────────────────────

    pub fn selected_id(&self) -> Option<String> {
        self.session.selection().map(|id| id.as_str().to_string())
    }

    /// Select by id (from the layers list), or clear with `undefined`.
    /// Unknown ids are refused.
    pub fn select(&mut self, id: Option<String>) -> bool {
        match id.as_deref() {
            None => self.session.select(None),
            Some(name) => match ObjectId::lookup(name) {
                Some(id) => self.session.select(Some(id)),
                None => false,
            },
        }
    }

    /// Click-to-add: place `tool`'s standard shape and select it. Returns
    /// the new id, or `undefined` for an unknown tool id.
    pub fn add_shape(&mut self, tool: &str) -> Result<Option<String>, JsError> {
        let Some(tool) = ShapeTool::from_id(tool) else {
            return Ok(None);
        };
        let id = self.session.add_default_shape(tool)?;
        Ok(Some(id.as_str().to_string()))
    }

    /// Opacity slider value, 0 to 100.
    pub fn set_selected_opacity(&mut self, percent: f64) -> Result<bool, JsError> {
        let percent = percent.clamp(0.0, 100.0).round() as u8;
        Ok(self.session.set_selected_opacity(percent)?)
    }

    pub fn delete_selected(&mut self) -> Result<bool, JsError> {
        Ok(self.session.delete_selected()?)
    }

    pub fn duplicate_selected(&mut self) -> Result<Option<String>, JsError> {
        let id = self.session.duplicate_selected()?;
        Ok(id.map(|id| id.as_str().to_string()))
    }

    pub fn rename_selected(&mut self, name: &str) -> Result<bool, JsError> {
        Ok(self.session.rename_selected(name)?)
    }

    pub fn move_selected_to(&mut self, left: f64, top: f64) -> Result<bool, JsError> {
        Ok(self.session.move_selected_to(left, top)?)
    }

    /// Set the label background from any CSS color the inputs produce.
    pub fn set_background(&mut self, css: &str) -> Result<bool, JsError> {
        let color = Color::parse(css)?;
        Ok(self.session.set_background(color)?)
    }

    pub fn background(&self) -> String {
        self.session.document().background().to_hex()
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<bool, JsError> {
        Ok(self.session.resize_canvas(width, height)?)
    }

    pub fn clear(&mut self) -> Result<bool, JsError> {
        Ok(self.session.clear()?)
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// All objects back-to-front as a JSON array.
    pub fn objects_json(&self) -> String {
        let views: Vec<ObjectView<'_>> = self.session.objects().iter().map(ObjectView::new).collect();
        serde_json::to_string(&views).unwrap_or_else(|_| "[]".to_string())
    }

    /// The gesture preview as JSON, or `null`.
    pub fn preview_json(&self) -> String {
        let view = self.session.document().preview().map(ObjectView::new);
        serde_json::to_string(&view).unwrap_or_else(|_| "null".to_string())
    }

    /// Drain pending session events as a JSON array of `{"type": ...}`.
    pub fn take_events_json(&mut self) -> String {
        let events: Vec<EventView> = self.session.drain_events().into_iter().map(EventView::from).collect();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }
}

impl LabelCanvas {
    fn pointer(&mut self, event: InputEvent) -> Result<bool, JsError> {
        Ok(self.session.handle_input(&event)?)
    }
}

fn pointer_modifiers(shift: bool, alt: bool) -> Modifiers {
    Modifiers {
        shift,
        alt,
        ..Modifiers::NONE
    }
}

// ─── JSON views ──────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ObjectView<'a> {
    label: String,
    bounds: Bounds,
    fill_hex: String,
    stroke_hex: String,
    #[serde(flatten)]
    drawable: &'a Drawable,
}

impl<'a> ObjectView<'a> {
    fn new(drawable: &'a Drawable) -> Self {
        Self {
            label: drawable.display_name().into_owned(),
            bounds: drawable.bounds(),
            fill_hex: drawable.fill.to_hex(),
            stroke_hex: drawable.stroke.to_hex(),
            drawable,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum EventView {
    DocumentChanged,
    #[serde(rename_all = "camelCase")]
    HistoryChanged { can_undo: bool, can_redo: bool },
    SelectionChanged { id: Option<String> },
    Restored,
    ToolChanged { tool: Option<&'static str> },
    DrawingModeChanged { on: bool },
}

impl From<SessionEvent> for EventView {
    fn from(event: SessionEvent) -> Self {
        match event {
            SessionEvent::DocumentChanged => Self::DocumentChanged,
            SessionEvent::HistoryChanged(status) => Self::HistoryChanged {
                can_undo: status.can_undo,
                can_redo: status.can_redo,
            },
            SessionEvent::SelectionChanged(id) => Self::SelectionChanged {
                id: id.map(|id| id.as_str().to_string()),
            },
            SessionEvent::Restored => Self::Restored,
            SessionEvent::ToolChanged(tool) => Self::ToolChanged {
                tool: tool.map(|t| t.id()),
            },
            SessionEvent::DrawingModeChanged(on) => Self::DrawingModeChanged { on },
        }
    }
}

/// Route Rust panics to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Label Maker WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

//! The editor session: one document, its history, the shape drawer, and the
//! selection/clipboard state the host UI drives.
//!
//! Every mutating operation ends in `flush()`, which drains the document's
//! change queue and, when anything changed, records exactly one history
//! snapshot. The host learns what happened by draining `SessionEvent`s.

use crate::config::EditorConfig;
use crate::draw::{DrawContext, DrawEffect, DrawEvent, DrawState, ShapeDrawer};
use crate::history::{HistoryManager, HistoryStatus};
use crate::input::InputEvent;
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{self, DrawStyle, ShapeTool};
use lm_core::{Color, Document, DocumentError, DocumentModel, Drawable, ObjectId, ZOrder};

/// Notifications for the host UI (layers list, property panel, toolbar).
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    DocumentChanged,
    HistoryChanged(HistoryStatus),
    SelectionChanged(Option<ObjectId>),
    /// Undo or redo replaced the document; dependent panels must refresh.
    Restored,
    ToolChanged(Option<ShapeTool>),
    DrawingModeChanged(bool),
}

pub struct EditorSession<D: DocumentModel = Document> {
    document: D,
    history: HistoryManager,
    drawer: ShapeDrawer,
    style: DrawStyle,
    config: EditorConfig,
    selection: Option<ObjectId>,
    clipboard: Option<Drawable>,
    drawing_mode: bool,
    events: Vec<SessionEvent>,
}

impl EditorSession<Document> {
    /// Session over an empty default label.
    pub fn new(config: EditorConfig) -> Result<Self, DocumentError> {
        Self::with_document(Document::new(), config)
    }
}

impl<D: DocumentModel> EditorSession<D> {
    /// Wrap an existing document. Its current state becomes the baseline
    /// snapshot, so the first edit is undoable.
    pub fn with_document(mut document: D, config: EditorConfig) -> Result<Self, DocumentError> {
        document.take_changes();
        let mut history = HistoryManager::new(config.max_history);
        history.record_snapshot(&document)?;
        Ok(Self {
            document,
            history,
            drawer: ShapeDrawer::new(),
            style: DrawStyle::default(),
            config,
            selection: None,
            clipboard: None,
            drawing_mode: false,
            events: Vec::new(),
        })
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn objects(&self) -> &[Drawable] {
        self.document.objects()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn history_status(&self) -> HistoryStatus {
        self.history.status()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    /// Applies to the next gesture; a gesture in progress keeps its style.
    pub fn set_style(&mut self, style: DrawStyle) {
        self.style = style;
    }

    pub fn draw_state(&self) -> &DrawState {
        self.drawer.state()
    }

    pub fn armed_tool(&self) -> Option<ShapeTool> {
        self.drawer.tool()
    }

    pub fn drawing_mode(&self) -> bool {
        self.drawing_mode
    }

    pub fn selection(&self) -> Option<ObjectId> {
        self.selection
    }

    pub fn selected_object(&self) -> Option<&Drawable> {
        self.document.object(self.selection?)
    }

    pub fn clipboard(&self) -> Option<&Drawable> {
        self.clipboard.as_ref()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ─── Tools ───────────────────────────────────────────────────────────

    /// Arm a shape tool, or return to select with `None`. Any gesture in
    /// progress is discarded.
    pub fn arm_tool(&mut self, tool: Option<ShapeTool>) -> Result<(), DocumentError> {
        self.dispatch(DrawEvent::Arm(tool))?;
        self.events.push(SessionEvent::ToolChanged(tool));
        Ok(())
    }

    /// Arm by host tool id (`"rect"`, `"line"`, ...). Returns false for an
    /// unknown id, leaving the current tool armed.
    pub fn arm_tool_id(&mut self, id: Option<&str>) -> Result<bool, DocumentError> {
        let tool = match id {
            None => None,
            Some(id) => match ShapeTool::from_id(id) {
                Some(tool) => Some(tool),
                None => {
                    log::warn!("unknown tool id {id:?}");
                    return Ok(false);
                }
            },
        };
        self.arm_tool(tool)?;
        Ok(true)
    }

    /// Toggle freehand drawing mode. Turning it on disarms any shape tool.
    pub fn set_drawing_mode(&mut self, on: bool) -> Result<(), DocumentError> {
        if on && self.drawer.tool().is_some() {
            self.arm_tool(None)?;
        }
        if self.drawing_mode != on {
            self.drawing_mode = on;
            self.events.push(SessionEvent::DrawingModeChanged(on));
        }
        Ok(())
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one host input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> Result<bool, DocumentError> {
        if let InputEvent::Key { key, modifiers } = event {
            let Some(action) =
                ShortcutMap::resolve(key, modifiers.ctrl, modifiers.shift, modifiers.alt, modifiers.meta)
            else {
                return Ok(false);
            };
            return self.perform(action);
        }
        let Some(draw_event) = DrawEvent::from_input(event) else {
            return Ok(false);
        };
        // With no shape tool armed, pointer events belong to the host's
        // selection handling.
        if self.drawer.tool().is_none() {
            return Ok(false);
        }
        self.dispatch(draw_event)?;
        Ok(true)
    }

    /// Run a shortcut action. Returns false when it had nothing to act on.
    pub fn perform(&mut self, action: ShortcutAction) -> Result<bool, DocumentError> {
        match action {
            ShortcutAction::ToolSelect => {
                self.set_drawing_mode(false)?;
                self.arm_tool(None)?;
                Ok(true)
            }
            ShortcutAction::ToolRect => self.arm_tool(Some(ShapeTool::Rect)).map(|()| true),
            ShortcutAction::ToolLine => self.arm_tool(Some(ShapeTool::Line)).map(|()| true),
            ShortcutAction::ToolPencil => self.set_drawing_mode(true).map(|()| true),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Duplicate => Ok(self.duplicate_selected()?.is_some()),
            ShortcutAction::Copy => Ok(self.copy_selected()),
            ShortcutAction::Cut => self.cut_selected(),
            ShortcutAction::Paste => Ok(self.paste()?.is_some()),
            ShortcutAction::SendBackward => self.reorder_selected(ZOrder::Backward),
            ShortcutAction::BringForward => self.reorder_selected(ZOrder::Forward),
            ShortcutAction::SendToBack => self.reorder_selected(ZOrder::Back),
            ShortcutAction::BringToFront => self.reorder_selected(ZOrder::Front),
            ShortcutAction::Escape => self.escape(),
        }
    }

    /// Cancel the gesture in progress; with none, clear the selection.
    pub fn escape(&mut self) -> Result<bool, DocumentError> {
        if self.drawer.is_dragging() {
            self.dispatch(DrawEvent::Cancel)?;
            return Ok(true);
        }
        Ok(self.select(None))
    }

    fn dispatch(&mut self, event: DrawEvent) -> Result<(), DocumentError> {
        let ctx = DrawContext {
            style: &self.style,
            drawing_mode: self.drawing_mode,
            min_size: self.config.min_shape_size,
        };
        let effects = self.drawer.handle(event, &ctx);
        for effect in effects {
            self.apply_effect(effect)?;
        }
        Ok(())
    }

    fn apply_effect(&mut self, effect: DrawEffect) -> Result<(), DocumentError> {
        match effect {
            DrawEffect::ShowPreview(preview) => {
                self.document.set_preview(Some(preview));
                self.document.render();
            }
            DrawEffect::ClearPreview => {
                self.document.set_preview(None);
                self.document.render();
            }
            DrawEffect::Commit(mut drawable) => {
                if self.config.snap_to_grid {
                    let b = drawable.bounds();
                    drawable.move_to(self.config.snap(b.left), self.config.snap(b.top));
                }
                let id = drawable.id;
                self.document.add_object(drawable);
                self.set_selection(Some(id));
                self.flush()?;
            }
            DrawEffect::ExitDrawingMode => {
                self.drawing_mode = false;
                self.events.push(SessionEvent::DrawingModeChanged(false));
            }
        }
        Ok(())
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Result<bool, DocumentError> {
        self.cancel_gesture()?;
        let undone = self.history.undo(&mut self.document)?;
        if undone {
            self.after_restore();
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, DocumentError> {
        self.cancel_gesture()?;
        let redone = self.history.redo(&mut self.document)?;
        if redone {
            self.after_restore();
        }
        Ok(redone)
    }

    fn after_restore(&mut self) {
        if self.selection.is_some() && self.selected_object().is_none() {
            self.set_selection(None);
        }
        self.events.push(SessionEvent::Restored);
        self.events.push(SessionEvent::HistoryChanged(self.history.status()));
    }

    fn cancel_gesture(&mut self) -> Result<(), DocumentError> {
        if self.drawer.is_dragging() {
            self.dispatch(DrawEvent::Cancel)?;
        }
        Ok(())
    }

    /// Drain document changes; record one snapshot if there were any.
    fn flush(&mut self) -> Result<bool, DocumentError> {
        let changes = self.document.take_changes();
        if changes.is_empty() {
            return Ok(false);
        }
        log::debug!("{} document change(s): {:?}", changes.len(), changes);
        self.document.render();
        self.events.push(SessionEvent::DocumentChanged);
        self.history.record_snapshot(&self.document)?;
        self.events.push(SessionEvent::HistoryChanged(self.history.status()));
        Ok(true)
    }

    // ─── Selection & clipboard ───────────────────────────────────────────

    /// Select an object (or nothing). Returns false if the id is unknown or
    /// the selection did not change.
    pub fn select(&mut self, id: Option<ObjectId>) -> bool {
        if let Some(id) = id
            && self.document.object(id).is_none()
        {
            log::warn!("select: no object {id}");
            return false;
        }
        self.set_selection(id)
    }

    fn set_selection(&mut self, id: Option<ObjectId>) -> bool {
        if self.selection == id {
            return false;
        }
        self.selection = id;
        self.events.push(SessionEvent::SelectionChanged(id));
        true
    }

    pub fn delete_selected(&mut self) -> Result<bool, DocumentError> {
        let Some(id) = self.selection else {
            return Ok(false);
        };
        self.document.remove_object(id);
        self.set_selection(None);
        self.flush()
    }

    /// Copy of the selection, offset by `duplicate_offset`, selected.
    pub fn duplicate_selected(&mut self) -> Result<Option<ObjectId>, DocumentError> {
        let Some(source) = self.selected_object() else {
            return Ok(None);
        };
        let mut copy = source.duplicate();
        let (dx, dy) = self.config.duplicate_offset;
        copy.translate(dx, dy);
        self.insert_and_select(copy).map(Some)
    }

    pub fn copy_selected(&mut self) -> bool {
        let Some(obj) = self.selected_object().cloned() else {
            return false;
        };
        self.clipboard = Some(obj);
        true
    }

    pub fn cut_selected(&mut self) -> Result<bool, DocumentError> {
        if !self.copy_selected() {
            return Ok(false);
        }
        self.delete_selected()
    }

    /// Paste the clipboard object offset by `paste_offset` from where it was
    /// copied. Repeated pastes land on the same spot.
    pub fn paste(&mut self) -> Result<Option<ObjectId>, DocumentError> {
        let Some(source) = &self.clipboard else {
            return Ok(None);
        };
        let mut copy = source.duplicate();
        let (dx, dy) = self.config.paste_offset;
        copy.translate(dx, dy);
        self.insert_and_select(copy).map(Some)
    }

    /// Add `tool`'s standard shape in the current style and select it.
    pub fn add_default_shape(&mut self, tool: ShapeTool) -> Result<ObjectId, DocumentError> {
        self.cancel_gesture()?;
        let drawable = tools::build_default(tool, &self.style);
        log::debug!("add default {} {}", tool.id(), drawable.id);
        self.insert_and_select(drawable)
    }

    fn insert_and_select(&mut self, drawable: Drawable) -> Result<ObjectId, DocumentError> {
        let id = drawable.id;
        self.document.add_object(drawable);
        self.set_selection(Some(id));
        self.flush()?;
        Ok(id)
    }

    // ─── Document edits ──────────────────────────────────────────────────

    pub fn reorder_selected(&mut self, order: ZOrder) -> Result<bool, DocumentError> {
        let Some(id) = self.selection else {
            return Ok(false);
        };
        if !self.document.reorder(id, order) {
            return Ok(false);
        }
        self.flush()
    }

    /// Set the selection's layer name. Empty or blank clears it.
    pub fn rename_selected(&mut self, name: &str) -> Result<bool, DocumentError> {
        let Some(obj) = self.selected_object() else {
            return Ok(false);
        };
        let name = name.trim();
        let name = (!name.is_empty()).then(|| name.to_string());
        if obj.name == name {
            return Ok(false);
        }
        let id = obj.id;
        self.document.update_object(id, |obj| obj.name = name);
        self.flush()
    }

    /// Move the selection so its bounding box starts at `(left, top)`.
    pub fn move_selected_to(&mut self, left: f64, top: f64) -> Result<bool, DocumentError> {
        let Some(obj) = self.selected_object() else {
            return Ok(false);
        };
        let b = obj.bounds();
        if b.left == left && b.top == top {
            return Ok(false);
        }
        let id = obj.id;
        self.document.update_object(id, |obj| obj.move_to(left, top));
        self.flush()
    }

    /// Set the selection's opacity from a percentage; values above 100
    /// clamp to fully opaque.
    pub fn set_selected_opacity(&mut self, percent: u8) -> Result<bool, DocumentError> {
        let Some(obj) = self.selected_object() else {
            return Ok(false);
        };
        let opacity = f64::from(percent.min(100)) / 100.0;
        if obj.opacity == opacity {
            return Ok(false);
        }
        let id = obj.id;
        self.document.update_object(id, |obj| obj.opacity = opacity);
        self.flush()
    }

    pub fn set_background(&mut self, color: Color) -> Result<bool, DocumentError> {
        self.document.set_background(color);
        self.flush()
    }

    /// Resize the canvas. Out-of-range sizes are rejected unchanged.
    pub fn resize_canvas(&mut self, width: f64, height: f64) -> Result<bool, DocumentError> {
        self.document.resize(width, height)?;
        self.flush()
    }

    /// Remove every object.
    pub fn clear(&mut self) -> Result<bool, DocumentError> {
        self.cancel_gesture()?;
        self.document.clear();
        self.set_selection(None);
        self.flush()
    }
}

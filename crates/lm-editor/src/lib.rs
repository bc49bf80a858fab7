pub mod config;
pub mod draw;
pub mod history;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use config::EditorConfig;
pub use draw::{DrawEffect, DrawEvent, DrawState, ShapeDrawer, bounds_from_two_points, snap_line};
pub use history::{HistoryEntry, HistoryLog, HistoryManager, HistoryStatus, MAX_HISTORY};
pub use input::{InputEvent, Modifiers};
pub use session::{EditorSession, SessionEvent};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{DrawStyle, LineStyle, ShapeStyle, ShapeTool};

//! Editor settings.
//!
//! Loaded from the host as JSON (camelCase keys); every field is optional and
//! falls back to its default.

use crate::draw::DEFAULT_MIN_SIZE;
use crate::history::MAX_HISTORY;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GRID_SIZE: f64 = 10.0;
/// Grid sizes below this fall back to `DEFAULT_GRID_SIZE`.
pub const MIN_GRID_SIZE: f64 = 2.0;
pub const DEFAULT_OFFSET: (f64, f64) = (20.0, 20.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub max_history: usize,
    pub min_shape_size: f64,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub duplicate_offset: (f64, f64),
    pub paste_offset: (f64, f64),
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY,
            min_shape_size: DEFAULT_MIN_SIZE,
            snap_to_grid: false,
            grid_size: DEFAULT_GRID_SIZE,
            duplicate_offset: DEFAULT_OFFSET,
            paste_offset: DEFAULT_OFFSET,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn effective_grid_size(&self) -> f64 {
        if self.grid_size.is_finite() && self.grid_size >= MIN_GRID_SIZE {
            self.grid_size
        } else {
            DEFAULT_GRID_SIZE
        }
    }

    /// Round `v` to the nearest grid line.
    pub fn snap(&self, v: f64) -> f64 {
        let g = self.effective_grid_size();
        (v / g).round() * g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_json_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn partial_json_overrides_fields() {
        let cfg = EditorConfig::from_json(r#"{"snapToGrid": true, "gridSize": 25, "pasteOffset": [5, 5]}"#)
            .unwrap();
        assert!(cfg.snap_to_grid);
        assert_eq!(cfg.grid_size, 25.0);
        assert_eq!(cfg.paste_offset, (5.0, 5.0));
        assert_eq!(cfg.max_history, MAX_HISTORY);
    }

    #[test]
    fn tiny_grid_falls_back() {
        let cfg = EditorConfig {
            grid_size: 1.0,
            ..EditorConfig::default()
        };
        assert_eq!(cfg.effective_grid_size(), 10.0);
        assert_eq!(cfg.snap(14.0), 10.0);
        assert_eq!(cfg.snap(15.0), 20.0);
    }

    #[test]
    fn unknown_type_is_an_error() {
        assert!(EditorConfig::from_json(r#"{"maxHistory": "lots"}"#).is_err());
    }
}

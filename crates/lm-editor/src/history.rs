//! Snapshot-based undo/redo.
//!
//! Every committed document mutation records a full snapshot (serialized
//! document plus background). Undo and redo move a cursor through a bounded,
//! linear log and restore the entry under it; recording after an undo drops
//! the redo branch.
//!
//! While a snapshot is being applied the manager is *restoring*: the
//! document's own change notifications are drained and fed back through
//! `record_snapshot`, which ignores them, so a restore never records itself.

use lm_core::{Color, DocumentError, DocumentModel};
use std::collections::VecDeque;

/// Default log capacity.
pub const MAX_HISTORY: usize = 50;

/// One immutable snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub document: Vec<u8>,
    pub background: Color,
}

/// Undo/redo availability, for enabling toolbar buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryStatus {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Bounded linear log with a cursor.
///
/// `current_index()` is `None` exactly when the log is empty; otherwise it
/// is a valid index.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    current: Option<usize>,
    capacity: usize,
}

impl HistoryLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            current: None,
            capacity,
        }
    }

    /// Truncate anything after the cursor, append, evict oldest past capacity.
    pub fn push(&mut self, entry: HistoryEntry) {
        match self.current {
            Some(i) => self.entries.truncate(i + 1),
            None => self.entries.clear(),
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.current = Some(self.entries.len() - 1);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_entry(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.current?)
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.entries.len())
    }

    /// Move the cursor back one step. Returns false at the boundary.
    pub fn step_back(&mut self) -> bool {
        match self.current {
            Some(i) if i > 0 => {
                self.current = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Move the cursor forward one step. Returns false at the boundary.
    pub fn step_forward(&mut self) -> bool {
        match self.current {
            Some(i) if i + 1 < self.entries.len() => {
                self.current = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    pub fn status(&self) -> HistoryStatus {
        HistoryStatus {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(MAX_HISTORY)
    }
}

/// Records and restores snapshots of a `DocumentModel`.
#[derive(Debug, Default)]
pub struct HistoryManager {
    log: HistoryLog,
    restoring: bool,
}

impl HistoryManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            log: HistoryLog::new(capacity),
            restoring: false,
        }
    }

    pub fn log(&self) -> &HistoryLog {
        &self.log
    }

    pub fn is_restoring(&self) -> bool {
        self.restoring
    }

    pub fn status(&self) -> HistoryStatus {
        self.log.status()
    }

    /// Capture the document's current state. Returns false (and records
    /// nothing) while restoring.
    pub fn record_snapshot<D: DocumentModel>(&mut self, doc: &D) -> Result<bool, DocumentError> {
        if self.restoring {
            log::trace!("snapshot suppressed during restore");
            return Ok(false);
        }
        let entry = HistoryEntry {
            document: doc.serialize()?,
            background: doc.background(),
        };
        self.log.push(entry);
        log::debug!(
            "snapshot {} of {} recorded",
            self.log.current_index().unwrap_or_default(),
            self.log.len()
        );
        Ok(true)
    }

    /// Step back and restore. `Ok(false)` when there is nothing to undo.
    pub fn undo<D: DocumentModel>(&mut self, doc: &mut D) -> Result<bool, DocumentError> {
        if !self.log.step_back() {
            return Ok(false);
        }
        if let Err(err) = self.restore_current(doc) {
            self.log.step_forward();
            return Err(err);
        }
        Ok(true)
    }

    /// Step forward and restore. `Ok(false)` when there is nothing to redo.
    pub fn redo<D: DocumentModel>(&mut self, doc: &mut D) -> Result<bool, DocumentError> {
        if !self.log.step_forward() {
            return Ok(false);
        }
        if let Err(err) = self.restore_current(doc) {
            self.log.step_back();
            return Err(err);
        }
        Ok(true)
    }

    fn restore_current<D: DocumentModel>(&mut self, doc: &mut D) -> Result<(), DocumentError> {
        let Some(entry) = self.log.current_entry().cloned() else {
            return Ok(());
        };
        self.restore(doc, &entry)
    }

    /// Replace the document's content and background with `entry`.
    /// Snapshot recording is suppressed for the duration.
    pub fn restore<D: DocumentModel>(
        &mut self,
        doc: &mut D,
        entry: &HistoryEntry,
    ) -> Result<(), DocumentError> {
        self.restoring = true;
        let result = self.apply(doc, entry);
        self.restoring = false;
        if let Err(err) = &result {
            log::error!("history restore failed: {err}");
        }
        result
    }

    fn apply<D: DocumentModel>(&mut self, doc: &mut D, entry: &HistoryEntry) -> Result<(), DocumentError> {
        doc.deserialize(&entry.document)?;
        doc.set_background(entry.background);
        doc.set_preview(None);
        doc.render();
        if !doc.take_changes().is_empty() {
            self.record_snapshot(doc)?;
        }
        Ok(())
    }
}

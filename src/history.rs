//! Undo/redo history: change entries with inversion, time-bounded
//! coalescing of adjacent same-kind edits, and bounded undo/redo
//! stacks with redo clearing on new edits.

use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryChange {
    Insert { position: usize, text: String, byte_length: usize },
    Delete { position: usize, text: String, byte_length: usize },
    Replace { position: usize, text: String, byte_length: usize, old_text: String },
}

impl HistoryChange {
    /// `insert <-> delete` swap kinds; `replace` swaps `text` and
    /// `old_text` with `byte_length` recomputed from the new text.
    pub fn invert(&self) -> HistoryChange {
        match self {
            HistoryChange::Insert { position, text, byte_length } => HistoryChange::Delete {
                position: *position,
                text: text.clone(),
                byte_length: *byte_length,
            },
            HistoryChange::Delete { position, text, byte_length } => HistoryChange::Insert {
                position: *position,
                text: text.clone(),
                byte_length: *byte_length,
            },
            HistoryChange::Replace { position, text, old_text, .. } => HistoryChange::Replace {
                position: *position,
                text: old_text.clone(),
                byte_length: old_text.len(),
                old_text: text.clone(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub changes: Vec<HistoryChange>,
    pub selection_before: Selection,
    pub selection_after: Selection,
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
pub struct HistoryState {
    pub undo_stack: Vec<HistoryEntry>,
    pub redo_stack: Vec<HistoryEntry>,
    pub limit: usize,
    pub coalesce_timeout_ms: u64,
}

impl HistoryState {
    pub fn new(limit: usize, coalesce_timeout_ms: u64) -> Self {
        HistoryState {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
            coalesce_timeout_ms,
        }
    }

    /// Push a new entry, first attempting to coalesce it into the top
    /// of the undo stack, and always clearing redo.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.redo_stack.clear();
        if let Some(top) = self.undo_stack.last_mut() {
            if entry.timestamp.saturating_sub(top.timestamp) <= self.coalesce_timeout_ms {
                if let Some(merged) = try_coalesce(top, &entry) {
                    *top = merged;
                    return;
                }
            }
        }
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    pub fn undo(&mut self) -> Option<HistoryEntry> {
        let entry = self.undo_stack.pop()?;
        self.redo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn redo(&mut self) -> Option<HistoryEntry> {
        let entry = self.redo_stack.pop()?;
        self.undo_stack.push(entry.clone());
        Some(entry)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn try_coalesce(top: &HistoryEntry, incoming: &HistoryEntry) -> Option<HistoryEntry> {
    if top.changes.len() != 1 || incoming.changes.len() != 1 {
        return None;
    }
    let merged_change = match (&top.changes[0], &incoming.changes[0]) {
        (
            HistoryChange::Insert { position: p1, text: t1, byte_length: b1 },
            HistoryChange::Insert { position: p2, text: t2, byte_length: b2 },
        ) if *p2 == p1 + b1 => Some(HistoryChange::Insert {
            position: *p1,
            text: format!("{}{}", t1, t2),
            byte_length: b1 + b2,
        }),
        (
            HistoryChange::Delete { position: p1, text: t1, byte_length: b1 },
            HistoryChange::Delete { position: p2, text: t2, byte_length: b2 },
        ) if p2 + b2 == *p1 => Some(HistoryChange::Delete {
            position: *p2,
            text: format!("{}{}", t2, t1),
            byte_length: b1 + b2,
        }),
        (
            HistoryChange::Delete { position: p1, text: t1, byte_length: b1 },
            HistoryChange::Delete { position: p2, text: t2, byte_length: b2 },
        ) if p2 == p1 => Some(HistoryChange::Delete {
            position: *p1,
            text: format!("{}{}", t1, t2),
            byte_length: b1 + b2,
        }),
        _ => None,
    }?;
    Some(HistoryEntry {
        changes: vec![merged_change],
        selection_before: top.selection_before.clone(),
        selection_after: incoming.selection_after.clone(),
        timestamp: incoming.timestamp,
    })
}

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

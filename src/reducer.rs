//! The reducer: turns a dispatched action into a new, immutable
//! document snapshot, threading structural sharing through the piece
//! table and line index. This is the only place that mutates both
//! trees together.

use crate::action::{Action, RemoteChangeKind};
use crate::history::{HistoryChange, HistoryEntry};
use crate::line_index::LineIndex;
use crate::piece::PieceTable;
use crate::selection::Selection;
use crate::snapshot::DocumentSnapshot;

/// Offset-maintenance strategy for the line index half of an edit.
/// EAGER keeps every cached offset immediately correct (undo/redo,
/// remote application); LAZY defers the shift into a dirty range
/// (interactive typing).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Eager,
    Lazy,
}

fn line_text_at(piece_table: &PieceTable, line_index: &LineIndex, line_number: usize) -> String {
    match line_index.get_line_range(line_number) {
        Some(range) => piece_table.get_text(range.start, range.start + range.length),
        None => String::new(),
    }
}

/// Mutates piece table and line index for at most one delete followed
/// by at most one insert. Returns the new halves plus the bytes
/// actually removed and inserted, for history bookkeeping.
fn apply_raw(
    piece_table: &PieceTable,
    line_index: &LineIndex,
    delete: Option<(usize, usize)>,
    insert: Option<(usize, &str)>,
    strategy: Strategy,
    version: u64,
) -> (PieceTable, LineIndex, Vec<u8>, usize) {
    let mut pt = piece_table.clone();
    let mut li = line_index.clone();
    let mut removed = Vec::new();

    if let Some((start, end)) = delete {
        if start < end {
            let start_lookup = li.find_line_at_position(start);
            let end_lookup = li.find_line_at_position(end);
            if let (Some(sl), Some(el)) = (start_lookup, end_lookup) {
                let start_line_text = line_text_at(&pt, &li, sl.line_number);
                let end_line_text = line_text_at(&pt, &li, el.line_number);
                let (new_pt, bytes) = pt.delete(start, end);
                li = match strategy {
                    Strategy::Eager => li.delete_eager(start, end, sl.line_number, &start_line_text, el.line_number, &end_line_text),
                    Strategy::Lazy => li.delete_lazy(start, end, sl.line_number, &start_line_text, el.line_number, &end_line_text, version),
                };
                pt = new_pt;
                removed = bytes;
            }
        }
    }

    let mut inserted_len = 0;
    if let Some((p, text)) = insert {
        if !text.is_empty() {
            let lookup = li.find_line_at_position(p.min(pt.length()));
            if let Some(target) = lookup {
                let target_line_text = line_text_at(&pt, &li, target.line_number);
                let (new_pt, len) = pt.insert(p, text);
                li = match strategy {
                    Strategy::Eager => li.insert_eager(p, target.line_number, &target_line_text, text),
                    Strategy::Lazy => li.insert_lazy(p, target.line_number, &target_line_text, text, version),
                };
                pt = new_pt;
                inserted_len = len;
            }
        }
    }

    (pt, li, removed, inserted_len)
}

/// `apply_edit(snapshot, op)`: the single unified edit pipeline (§4.5).
/// Builds the corresponding history change and pushes it, marks
/// metadata dirty, and bumps the version.
pub fn apply_edit(
    snapshot: &DocumentSnapshot,
    delete: Option<(usize, usize)>,
    insert: Option<(usize, &str)>,
    selection_after: Selection,
    timestamp: u64,
    strategy: Strategy,
) -> DocumentSnapshot {
    let next_version = snapshot.version.next();
    let (piece_table, line_index, removed, inserted_len) =
        apply_raw(&snapshot.piece_table, &snapshot.line_index, delete, insert, strategy, next_version.0);

    let change = match (delete, insert) {
        (Some((start, _)), Some((_pos, text))) if !removed.is_empty() || inserted_len > 0 => Some(HistoryChange::Replace {
            position: start,
            text: text[..inserted_len.min(text.len())].to_string(),
            byte_length: inserted_len,
            old_text: String::from_utf8_lossy(&removed).into_owned(),
        }),
        (Some((start, _)), None) if !removed.is_empty() => Some(HistoryChange::Delete {
            position: start,
            text: String::from_utf8_lossy(&removed).into_owned(),
            byte_length: removed.len(),
        }),
        (None, Some((pos, text))) if inserted_len > 0 => Some(HistoryChange::Insert {
            position: pos,
            text: text[..inserted_len.min(text.len())].to_string(),
            byte_length: inserted_len,
        }),
        _ => None,
    };

    let mut history = snapshot.history.clone();
    if let Some(change) = change {
        history.push(HistoryEntry {
            changes: vec![change],
            selection_before: snapshot.selection.clone(),
            selection_after: selection_after.clone(),
            timestamp,
        });
    }

    let mut metadata = snapshot.metadata.clone();
    metadata.is_dirty = true;

    DocumentSnapshot {
        version: next_version,
        piece_table,
        line_index,
        selection: selection_after,
        history,
        metadata,
    }
}

fn change_to_ops(change: &HistoryChange) -> (Option<(usize, usize)>, Option<(usize, String)>) {
    match change {
        HistoryChange::Insert { position, text, .. } => (None, Some((*position, text.clone()))),
        HistoryChange::Delete { position, byte_length, .. } => (Some((*position, position + byte_length)), None),
        HistoryChange::Replace { position, text, old_text, .. } => {
            (Some((*position, position + old_text.len())), Some((*position, text.clone())))
        }
    }
}

/// Applies a single recorded change EAGERLY without touching history
/// (undo/redo already popped/pushed the entry themselves).
fn apply_history_change(snapshot: &DocumentSnapshot, change: &HistoryChange, selection: Selection, version_target: crate::snapshot::Version) -> DocumentSnapshot {
    let (delete, insert) = change_to_ops(change);
    let insert_ref = insert.as_ref().map(|(p, t)| (*p, t.as_str()));
    let (piece_table, line_index, _removed, _inserted_len) =
        apply_raw(&snapshot.piece_table, &snapshot.line_index, delete, insert_ref, Strategy::Eager, version_target.0);
    let mut metadata = snapshot.metadata.clone();
    metadata.is_dirty = true;
    DocumentSnapshot {
        version: version_target,
        piece_table,
        line_index,
        selection,
        history: snapshot.history.clone(),
        metadata,
    }
}

/// Dispatches a single action against `snapshot`, returning the new
/// snapshot. `TRANSACTION_*` actions are left to the store (§4.7) and
/// return the snapshot unchanged. `now` is the fallback timestamp used
/// when an action carries none.
pub fn dispatch(snapshot: &DocumentSnapshot, action: &Action, now: u64) -> DocumentSnapshot {
    if !action.is_valid() {
        return snapshot.clone();
    }
    match action {
        Action::Insert { start, text, timestamp } => {
            if text.is_empty() {
                return snapshot.clone();
            }
            let start = (*start).min(snapshot.piece_table.length());
            let selection_after = Selection::collapsed(start + text.len());
            apply_edit(snapshot, None, Some((start, text)), selection_after, timestamp.unwrap_or(now), Strategy::Lazy)
        }
        Action::Delete { start, end, timestamp } => {
            if start > end || start == end {
                return snapshot.clone();
            }
            let total = snapshot.piece_table.length();
            let start = (*start).min(total);
            let end = (*end).min(total);
            if start >= end {
                return snapshot.clone();
            }
            let selection_after = Selection::collapsed(start);
            apply_edit(snapshot, Some((start, end)), None, selection_after, timestamp.unwrap_or(now), Strategy::Lazy)
        }
        Action::Replace { start, end, text, timestamp } => {
            if start > end {
                return snapshot.clone();
            }
            let total = snapshot.piece_table.length();
            let start = (*start).min(total);
            let end = (*end).min(total);
            let selection_after = Selection::collapsed(start + text.len());
            let delete = if start < end { Some((start, end)) } else { None };
            let insert = if text.is_empty() { None } else { Some((start, text.as_str())) };
            apply_edit(snapshot, delete, insert, selection_after, timestamp.unwrap_or(now), Strategy::Lazy)
        }
        Action::SetSelection { ranges } => {
            let selection = Selection {
                ranges: ranges.clone(),
                primary_index: 0,
            };
            DocumentSnapshot {
                version: snapshot.version.next(),
                selection,
                ..snapshot.clone()
            }
        }
        Action::Undo => {
            let mut history = snapshot.history.clone();
            match history.undo() {
                None => snapshot.clone(),
                Some(entry) => {
                    let version = snapshot.version.next();
                    let mut current = DocumentSnapshot { history: history.clone(), ..snapshot.clone() };
                    for change in &entry.changes {
                        current = apply_history_change(&current, &change.invert(), entry.selection_before.clone(), version);
                    }
                    current.history = history;
                    current
                }
            }
        }
        Action::Redo => {
            let mut history = snapshot.history.clone();
            match history.redo() {
                None => snapshot.clone(),
                Some(entry) => {
                    let version = snapshot.version.next();
                    let mut current = DocumentSnapshot { history: history.clone(), ..snapshot.clone() };
                    for change in &entry.changes {
                        current = apply_history_change(&current, change, entry.selection_after.clone(), version);
                    }
                    current.history = history;
                    current
                }
            }
        }
        Action::HistoryClear => {
            let mut history = snapshot.history.clone();
            history.clear();
            DocumentSnapshot { history, ..snapshot.clone() }
        }
        Action::TransactionStart | Action::TransactionCommit | Action::TransactionRollback => snapshot.clone(),
        Action::ApplyRemote { changes } => {
            let mut current = snapshot.clone();
            for change in changes {
                let selection = current.selection.clone();
                current = match change.kind {
                    RemoteChangeKind::Insert => {
                        let text = change.text.clone().unwrap_or_default();
                        if text.is_empty() {
                            current
                        } else {
                            apply_edit_no_history(&current, None, Some((change.start, &text)), selection, Strategy::Lazy)
                        }
                    }
                    RemoteChangeKind::Delete => {
                        let length = change.length.unwrap_or(0);
                        if length == 0 {
                            current
                        } else {
                            apply_edit_no_history(&current, Some((change.start, change.start + length)), None, selection, Strategy::Lazy)
                        }
                    }
                };
            }
            current
        }
        Action::LoadChunk { .. } | Action::EvictChunk { .. } => snapshot.clone(),
    }
}

/// Remote application does not push to history (§4.5: `APPLY_REMOTE`
/// applies each insert/delete lazily without recording a history
/// change).
fn apply_edit_no_history(
    snapshot: &DocumentSnapshot,
    delete: Option<(usize, usize)>,
    insert: Option<(usize, &str)>,
    selection: Selection,
    strategy: Strategy,
) -> DocumentSnapshot {
    let next_version = snapshot.version.next();
    let (piece_table, line_index, _removed, _inserted_len) =
        apply_raw(&snapshot.piece_table, &snapshot.line_index, delete, insert, strategy, next_version.0);
    let mut metadata = snapshot.metadata.clone();
    metadata.is_dirty = true;
    DocumentSnapshot {
        version: next_version,
        piece_table,
        line_index,
        selection,
        history: snapshot.history.clone(),
        metadata,
    }
}

#[cfg(test)]
#[path = "reducer_test.rs"]
mod reducer_test;

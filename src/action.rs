//! Serializable actions dispatched to the store.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionRange;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RemoteChangeKind {
    Insert,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteChange {
    pub kind: RemoteChangeKind,
    pub start: usize,
    pub text: Option<String>,
    pub length: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Action {
    Insert { start: usize, text: String, timestamp: Option<u64> },
    Delete { start: usize, end: usize, timestamp: Option<u64> },
    Replace { start: usize, end: usize, text: String, timestamp: Option<u64> },
    SetSelection { ranges: Vec<SelectionRange> },
    Undo,
    Redo,
    HistoryClear,
    TransactionStart,
    TransactionCommit,
    TransactionRollback,
    ApplyRemote { changes: Vec<RemoteChange> },
    LoadChunk { chunk_index: usize, data: Vec<u8> },
    EvictChunk { chunk_index: usize },
}

impl Action {
    /// Strict validation per the error handling design: malformed
    /// actions are no-ops, never errors.
    pub fn is_valid(&self) -> bool {
        match self {
            Action::Insert { .. } => true,
            Action::Delete { start, end, .. } => start <= end,
            Action::Replace { start, end, .. } => start <= end,
            Action::SetSelection { .. } => true,
            _ => true,
        }
    }

    pub fn is_transaction_control(&self) -> bool {
        matches!(self, Action::TransactionStart | Action::TransactionCommit | Action::TransactionRollback)
    }

    pub fn is_text_edit(&self) -> bool {
        matches!(self, Action::Insert { .. } | Action::Delete { .. } | Action::Replace { .. })
    }
}

#[cfg(test)]
#[path = "action_test.rs"]
mod action_test;

//! Versioned, immutable document snapshot — the value type handed out
//! by the store and read by the query surface.

use crate::history::HistoryState;
use crate::line_index::LineIndex;
use crate::metadata::{DocumentConfig, DocumentMetadata};
use crate::piece::PieceTable;
use crate::selection::Selection;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(pub u64);

impl Version {
    pub fn next(self) -> Version {
        Version(self.0 + 1)
    }
}

#[derive(Clone)]
pub struct DocumentSnapshot {
    pub version: Version,
    pub piece_table: PieceTable,
    pub line_index: LineIndex,
    pub selection: Selection,
    pub history: HistoryState,
    pub metadata: DocumentMetadata,
}

impl DocumentSnapshot {
    pub fn new(config: &DocumentConfig) -> Self {
        DocumentSnapshot {
            version: Version(0),
            piece_table: PieceTable::new(&config.content),
            line_index: LineIndex::new(&config.content),
            selection: Selection::default(),
            history: HistoryState::new(config.history_limit, config.undo_group_timeout_ms),
            metadata: DocumentMetadata {
                encoding: config.encoding.clone(),
                line_ending: config.line_ending,
                ..DocumentMetadata::default()
            },
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        self.piece_table.validate()?;
        self.line_index.validate()?;
        if self.piece_table.length() != self.line_index.total_byte_length() {
            return Err(crate::error::Error::AggregateMismatch(
                "piece table length and line index byte length disagree".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

//! A persistent piece-table and line-index document engine: a
//! red-black-tree-backed text buffer with undo/redo history and
//! nested transactions, designed for single-threaded, cooperative
//! editing of one document instance.
//!
//! The document model is built bottom-up: [`rbtree`] is the shared
//! order-statistics core used by both [`piece`] (byte-offset-keyed
//! pieces over an immutable original buffer and an append-only add
//! buffer) and [`line_index`] (line-number-keyed byte/char lengths
//! with a lazily-applied dirty-range log). [`history`] and
//! [`transaction`] sit above those two trees; [`reducer`] is the only
//! place that advances both trees together in response to an
//! [`action::Action`]; [`store`] owns the current snapshot and fans
//! out change notifications; [`query`] is the read-only surface
//! consumed by an external viewport.

mod action;
mod add_buffer;
mod error;
mod history;
mod line_index;
mod metadata;
mod piece;
mod query;
mod rbtree;
mod reducer;
mod scheduler;
mod selection;
mod snapshot;
mod store;
mod transaction;

pub use crate::action::{Action, RemoteChange, RemoteChangeKind};
pub use crate::error::{Error, Result};
pub use crate::history::{HistoryChange, HistoryEntry, HistoryState};
pub use crate::line_index::{DirtyRange, LineExtra, LineIndex, LineLookup, LineRange, LineValue, ReconciliationConfig};
pub use crate::metadata::{DocumentConfig, DocumentMetadata, LineEnding};
pub use crate::piece::{BufferKind, BufferStats, Piece, PiecePosition, PieceTable, ValueChunk};
pub use crate::query::{
    char_offsets_to_selection, get_line_content, get_visible_line, get_visible_lines, line_column_to_position,
    position_to_line_column, selection_to_char_offsets, LineColumn, VisibleLine, VisibleLines,
};
pub use crate::reducer::{dispatch, Strategy};
pub use crate::scheduler::{Immediate, Scheduler};
pub use crate::selection::{Selection, SelectionRange};
pub use crate::snapshot::{DocumentSnapshot, Version};
pub use crate::store::Store;
pub use crate::transaction::{CommitResult, RollbackResult, TransactionManager};

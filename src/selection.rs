//! Cursor/selection tracking. Selections are byte-offset ranges; the
//! query surface (`query.rs`) converts them to char offsets on demand.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub anchor: usize,
    pub head: usize,
}

impl SelectionRange {
    pub fn collapsed(pos: usize) -> Self {
        SelectionRange { anchor: pos, head: pos }
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub ranges: Vec<SelectionRange>,
    pub primary_index: usize,
}

impl Selection {
    pub fn collapsed(pos: usize) -> Self {
        Selection {
            ranges: vec![SelectionRange::collapsed(pos)],
            primary_index: 0,
        }
    }

    pub fn primary(&self) -> Option<&SelectionRange> {
        self.ranges.get(self.primary_index)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection::collapsed(0)
    }
}

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

//! Query/read surface consumed by an external viewport. Pure
//! functions over a frozen snapshot — never mutate, never allocate a
//! new document tree.

use crate::piece::PieceTable;
use crate::selection::{Selection, SelectionRange};
use crate::snapshot::DocumentSnapshot;

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLine {
    pub line_number: usize,
    pub content: String,
    pub start_offset: usize,
    pub end_offset: usize,
    pub has_newline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibleLines {
    pub lines: Vec<VisibleLine>,
    pub first_line: usize,
    pub last_line: usize,
    pub total_lines: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColumn {
    pub line: usize,
    pub column: usize,
}

fn strip_newline(s: &str) -> (&str, bool) {
    if let Some(rest) = s.strip_suffix("\r\n") {
        (rest, true)
    } else if let Some(rest) = s.strip_suffix('\n') {
        (rest, true)
    } else if let Some(rest) = s.strip_suffix('\r') {
        (rest, true)
    } else {
        (s, false)
    }
}

/// Line text without its trailing newline, or empty when `n` is out of
/// range.
pub fn get_line_content(state: &DocumentSnapshot, n: usize) -> String {
    match state.line_index.get_line_range(n) {
        Some(range) => {
            let raw = state.piece_table.get_text(range.start, range.start + range.length);
            strip_newline(&raw).0.to_string()
        }
        None => String::new(),
    }
}

pub fn get_visible_line(state: &DocumentSnapshot, n: usize) -> Option<VisibleLine> {
    let range = state.line_index.get_line_range(n)?;
    let raw = state.piece_table.get_text(range.start, range.start + range.length);
    let (content, has_newline) = strip_newline(&raw);
    Some(VisibleLine {
        line_number: n,
        content: content.to_string(),
        start_offset: range.start,
        end_offset: range.start + range.length,
        has_newline,
    })
}

/// `{start_line, visible_count, overscan}` → a frozen window of lines,
/// clamped so overscan never runs past the document.
pub fn get_visible_lines(state: &DocumentSnapshot, start_line: usize, visible_count: usize, overscan: usize) -> VisibleLines {
    let total_lines = state.line_index.line_count();
    if total_lines == 0 {
        return VisibleLines { lines: Vec::new(), first_line: 0, last_line: 0, total_lines: 0 };
    }
    let last_index = total_lines - 1;
    let overscan = overscan.min(last_index);
    let first_line = start_line.saturating_sub(overscan).min(last_index);
    let requested_last = start_line.saturating_add(visible_count).saturating_add(overscan);
    let last_line = requested_last.min(last_index);
    let lines = (first_line..=last_line).filter_map(|n| get_visible_line(state, n)).collect();
    VisibleLines { lines, first_line, last_line, total_lines }
}

/// Byte position → `{line, column}`; column is in UTF-16 code units.
pub fn position_to_line_column(state: &DocumentSnapshot, byte_pos: usize) -> LineColumn {
    match state.line_index.find_line_at_position(byte_pos) {
        Some(lookup) => {
            let line_text = get_line_content_with_newline(state, lookup.line_number);
            let column = PieceTable::byte_to_char_offset(&line_text, lookup.offset_in_line);
            LineColumn { line: lookup.line_number, column }
        }
        None => LineColumn { line: 0, column: 0 },
    }
}

fn get_line_content_with_newline(state: &DocumentSnapshot, n: usize) -> String {
    match state.line_index.get_line_range(n) {
        Some(range) => state.piece_table.get_text(range.start, range.start + range.length),
        None => String::new(),
    }
}

/// `{line, column}` → byte position; `column` clamps to the line's
/// char length.
pub fn line_column_to_position(state: &DocumentSnapshot, line: usize, column: usize) -> usize {
    match state.line_index.get_line_range(line) {
        Some(range) => {
            let line_text = state.piece_table.get_text(range.start, range.start + range.length);
            let byte_offset = PieceTable::char_to_byte_offset(&line_text, column);
            range.start + byte_offset
        }
        None => state.piece_table.length(),
    }
}

fn byte_to_char_in_document(state: &DocumentSnapshot, byte_pos: usize) -> usize {
    let lookup = match state.line_index.find_line_at_position(byte_pos) {
        Some(l) => l,
        None => return 0,
    };
    let line_char_start = state.line_index.get_char_start_offset(lookup.line_number);
    let line_text = get_line_content_with_newline(state, lookup.line_number);
    line_char_start + PieceTable::byte_to_char_offset(&line_text, lookup.offset_in_line)
}

fn char_to_byte_in_document(state: &DocumentSnapshot, char_pos: usize) -> usize {
    let lookup = match state.line_index.find_line_at_char_position(char_pos) {
        Some(l) => l,
        None => return 0,
    };
    let line_text = get_line_content_with_newline(state, lookup.line_number);
    let line_byte_start = state.line_index.get_line_start_offset_exact(lookup.line_number);
    line_byte_start + PieceTable::char_to_byte_offset(&line_text, lookup.offset_in_line)
}

/// Byte-indexed selection → char-indexed, line-local per endpoint.
pub fn selection_to_char_offsets(state: &DocumentSnapshot, selection: &Selection) -> Vec<(usize, usize)> {
    selection
        .ranges
        .iter()
        .map(|r| (byte_to_char_in_document(state, r.anchor), byte_to_char_in_document(state, r.head)))
        .collect()
}

/// Char-indexed selection endpoints → a byte-indexed `Selection`.
pub fn char_offsets_to_selection(state: &DocumentSnapshot, ranges: &[(usize, usize)]) -> Selection {
    Selection {
        ranges: ranges
            .iter()
            .map(|(anchor, head)| SelectionRange {
                anchor: char_to_byte_in_document(state, *anchor),
                head: char_to_byte_in_document(state, *head),
            })
            .collect(),
        primary_index: 0,
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod query_test;

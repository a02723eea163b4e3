//! Line index: a red-black tree keyed by line number, tracking
//! per-line byte and UTF-16 char lengths with subtree aggregates, and
//! a lazily-applied dirty-range log for offset maintenance.
//!
//! This module never stores document text itself — callers (the
//! reducer) supply the exact surrounding line text needed to split or
//! merge lines, so byte/char lengths are always computed from real
//! UTF-8 content rather than approximated.

use crate::rbtree::{self, Agg, Link, RbValue};

#[derive(Debug, Clone, PartialEq)]
pub struct LineValue {
    /// Cached start offset; `None` means UNKNOWN — always recomputed
    /// exactly via aggregates rather than trusted directly.
    pub document_offset: Option<usize>,
    pub byte_length: usize,
    pub char_length: usize,
}

#[derive(Debug, Clone)]
pub struct LineExtra {
    pub byte_length: usize,
    pub char_length: usize,
}

impl RbValue for LineValue {
    type Extra = LineExtra;

    fn own_weight(&self) -> usize {
        1
    }

    fn own_extra(&self) -> LineExtra {
        LineExtra {
            byte_length: self.byte_length,
            char_length: self.char_length,
        }
    }

    fn combine_extra(own: &LineExtra, left: Option<&Agg<LineExtra>>, right: Option<&Agg<LineExtra>>) -> LineExtra {
        LineExtra {
            byte_length: own.byte_length + left.map(|a| a.extra.byte_length).unwrap_or(0) + right.map(|a| a.extra.byte_length).unwrap_or(0),
            char_length: own.char_length + left.map(|a| a.extra.char_length).unwrap_or(0) + right.map(|a| a.extra.char_length).unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirtyRange {
    pub start_line: usize,
    /// `None` represents +infinity.
    pub end_line: Option<usize>,
    pub offset_delta: i64,
    pub created_at_version: u64,
}

const DIRTY_RANGE_CAP: usize = 32;

#[derive(Clone)]
pub struct LineIndex {
    root: Link<LineValue>,
    pub dirty_ranges: Vec<DirtyRange>,
    pub last_reconciled_version: u64,
    pub rebuild_pending: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineRange {
    pub start: usize,
    pub length: usize,
}

#[derive(Debug, Clone)]
pub struct LineLookup {
    pub line_number: usize,
    pub offset_in_line: usize,
}

pub struct ReconciliationConfig {
    pub threshold: fn(usize) -> usize,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        ReconciliationConfig { threshold: default_threshold }
    }
}

pub fn default_threshold(line_count: usize) -> usize {
    let log2 = (line_count as f64 + 1.0).log2();
    (64usize).max((line_count as f64 / log2.max(1.0)) as usize)
}

/// Split `text` into `(byte_length, char_length)` per line; LF, CRLF
/// and lone CR all terminate a line (terminator included in the
/// byte/char length of the line it ends). An empty document is one
/// line.
fn split_lines(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(line_stats(&text[start..=i]));
                i += 1;
                start = i;
            }
            b'\r' => {
                let end = if i + 1 < bytes.len() && bytes[i + 1] == b'\n' { i + 2 } else { i + 1 };
                lines.push(line_stats(&text[start..end]));
                i = end;
                start = i;
            }
            _ => i += 1,
        }
    }
    lines.push(line_stats(&text[start..]));
    lines
}

fn line_stats(s: &str) -> (usize, usize) {
    (s.len(), s.encode_utf16().count())
}

fn rebuild_from(lines: Vec<(usize, usize)>) -> Link<LineValue> {
    let mut root: Link<LineValue> = None;
    let mut offset = 0usize;
    for (i, (byte_len, char_len)) in lines.into_iter().enumerate() {
        root = Some(rbtree::insert_at(
            &root,
            i,
            LineValue {
                document_offset: Some(offset),
                byte_length: byte_len,
                char_length: char_len,
            },
        ));
        offset += byte_len;
    }
    root
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        LineIndex {
            root: rebuild_from(split_lines(content)),
            dirty_ranges: Vec::new(),
            last_reconciled_version: 0,
            rebuild_pending: false,
        }
    }

    pub fn line_count(&self) -> usize {
        rbtree::total_count(&self.root)
    }

    pub fn total_byte_length(&self) -> usize {
        rbtree::root_extra(&self.root).map(|e| e.byte_length).unwrap_or(0)
    }

    pub fn total_char_length(&self) -> usize {
        rbtree::root_extra(&self.root).map(|e| e.char_length).unwrap_or(0)
    }

    pub fn collect_lines(&self) -> Vec<LineValue> {
        rbtree::collect(&self.root).into_iter().map(|(v, _)| v).collect()
    }

    fn lengths(&self) -> Vec<(usize, usize)> {
        self.collect_lines().into_iter().map(|v| (v.byte_length, v.char_length)).collect()
    }

    /// Exact, always-correct start offset of line `n` (invariant 5):
    /// sums byte lengths of every preceding line via the aggregate,
    /// ignoring the cached `document_offset` field and dirty ranges
    /// entirely.
    pub fn get_line_start_offset_exact(&self, n: usize) -> usize {
        rbtree::prefix_extra(&self.root, n, |e| e.byte_length)
    }

    pub fn get_char_start_offset(&self, n: usize) -> usize {
        rbtree::prefix_extra(&self.root, n, |e| e.char_length)
    }

    fn cumulative_delta(&self, line: usize) -> i64 {
        self.dirty_ranges
            .iter()
            .filter(|r| r.start_line <= line && r.end_line.map_or(true, |e| line <= e))
            .map(|r| r.offset_delta)
            .sum()
    }

    /// `{start, length}` of line `n`. A cached, non-UNKNOWN offset is
    /// trusted only after applying any pending dirty delta on top of
    /// it (O(#dirty_ranges)); an UNKNOWN offset is instead always
    /// recomputed exactly (O(log n)), since no delta formula ever
    /// applies to it.
    pub fn get_line_range(&self, n: usize) -> Option<LineRange> {
        if n >= self.line_count() {
            return None;
        }
        let (value, _) = rbtree::find_at(&self.root, n)?;
        let start = match value.document_offset {
            Some(base) if self.dirty_ranges.is_empty() => base,
            Some(base) => (base as i64 + self.cumulative_delta(n)).max(0) as usize,
            None => self.get_line_start_offset_exact(n),
        };
        Some(LineRange { start, length: value.byte_length })
    }

    pub fn find_line_at_position(&self, byte_pos: usize) -> Option<LineLookup> {
        fn go(node: &Link<LineValue>, byte_pos: usize, line_base: usize) -> Option<LineLookup> {
            let n = node.as_ref()?;
            let left_byte = n.left.as_ref().map(|l| l.agg.extra.byte_length).unwrap_or(0);
            let left_count = n.left.as_ref().map(|l| l.agg.count).unwrap_or(0);
            if byte_pos < left_byte {
                go(&n.left, byte_pos, line_base)
            } else if byte_pos < left_byte + n.value.byte_length {
                Some(LineLookup {
                    line_number: line_base + left_count,
                    offset_in_line: byte_pos - left_byte,
                })
            } else if n.right.is_none() {
                Some(LineLookup {
                    line_number: line_base + left_count,
                    offset_in_line: n.value.byte_length,
                })
            } else {
                go(&n.right, byte_pos - left_byte - n.value.byte_length, line_base + left_count + 1)
            }
        }
        go(&self.root, byte_pos.min(self.total_byte_length()), 0)
    }

    pub fn find_line_at_char_position(&self, char_pos: usize) -> Option<LineLookup> {
        fn go(node: &Link<LineValue>, char_pos: usize, line_base: usize) -> Option<LineLookup> {
            let n = node.as_ref()?;
            let left_char = n.left.as_ref().map(|l| l.agg.extra.char_length).unwrap_or(0);
            let left_count = n.left.as_ref().map(|l| l.agg.count).unwrap_or(0);
            if char_pos < left_char {
                go(&n.left, char_pos, line_base)
            } else if char_pos < left_char + n.value.char_length {
                Some(LineLookup {
                    line_number: line_base + left_count,
                    offset_in_line: char_pos - left_char,
                })
            } else if n.right.is_none() {
                Some(LineLookup {
                    line_number: line_base + left_count,
                    offset_in_line: n.value.char_length,
                })
            } else {
                go(&n.right, char_pos - left_char - n.value.char_length, line_base + left_count + 1)
            }
        }
        go(&self.root, char_pos.min(self.total_char_length()), 0)
    }

    /// EAGER insert. `target_line` is the line number containing
    /// position `p`; `target_line_text` is that line's full content
    /// *before* this edit (terminator included), supplied by the
    /// caller since this index does not retain document text.
    /// Rewrites every subsequent line's `document_offset` immediately.
    pub fn insert_eager(&self, p: usize, target_line: usize, target_line_text: &str, text: &str) -> LineIndex {
        let lines = self.spliced_insert(p, target_line, target_line_text, text);
        LineIndex {
            root: rebuild_from(lines),
            dirty_ranges: Vec::new(),
            last_reconciled_version: self.last_reconciled_version,
            rebuild_pending: false,
        }
    }

    /// LAZY insert: same structural splice, but lines after the
    /// edited region keep their stale cached offset and a dirty range
    /// records the pending `+byte_length` shift.
    pub fn insert_lazy(&self, p: usize, target_line: usize, target_line_text: &str, text: &str, version: u64) -> LineIndex {
        if text.is_empty() {
            return self.clone();
        }
        let new_fragments = self.fragments_for_insert(p, target_line, target_line_text, text);
        let num_new = new_fragments.len();
        let old_lines = self.collect_lines();

        let mut lines: Vec<(usize, usize)> = Vec::with_capacity(old_lines.len() + num_new);
        for v in &old_lines[..target_line] {
            lines.push((v.byte_length, v.char_length));
        }
        lines.extend(new_fragments);
        for v in &old_lines[target_line + 1..] {
            lines.push((v.byte_length, v.char_length));
        }

        let mut root: Link<LineValue> = None;
        for (i, (byte_length, char_length)) in lines.into_iter().enumerate() {
            let offset = if i < target_line {
                old_lines[i].document_offset
            } else if i >= target_line + num_new {
                old_lines[i - num_new + 1].document_offset
            } else {
                None
            };
            root = Some(rbtree::insert_at(&root, i, LineValue { document_offset: offset, byte_length, char_length }));
        }

        let mut dirty_ranges = self.dirty_ranges.clone();
        dirty_ranges.push(DirtyRange {
            start_line: target_line + num_new,
            end_line: None,
            offset_delta: text.len() as i64,
            created_at_version: version,
        });
        let (dirty_ranges, rebuild_pending) = merge_dirty_ranges(dirty_ranges, version);

        LineIndex {
            root,
            dirty_ranges,
            last_reconciled_version: self.last_reconciled_version,
            rebuild_pending,
        }
    }

    fn fragments_for_insert(&self, p: usize, target_line: usize, target_line_text: &str, text: &str) -> Vec<(usize, usize)> {
        let line_start = self.get_line_start_offset_exact(target_line);
        let offset_in_line = p.saturating_sub(line_start).min(target_line_text.len());
        let mut combined = String::with_capacity(target_line_text.len() + text.len());
        combined.push_str(&target_line_text[..offset_in_line]);
        combined.push_str(text);
        combined.push_str(&target_line_text[offset_in_line..]);
        split_lines(&combined)
    }

    fn spliced_insert(&self, p: usize, target_line: usize, target_line_text: &str, text: &str) -> Vec<(usize, usize)> {
        if text.is_empty() {
            return self.lengths();
        }
        let fragments = self.fragments_for_insert(p, target_line, target_line_text, text);
        let mut lines = self.lengths();
        lines.splice(target_line..=target_line, fragments);
        lines
    }

    /// EAGER delete. `start_line`/`end_line` are the line numbers
    /// containing `start`/`end` respectively (may be equal);
    /// `start_line_text`/`end_line_text` are their full content
    /// before this edit.
    pub fn delete_eager(
        &self,
        start: usize,
        end: usize,
        start_line: usize,
        start_line_text: &str,
        end_line: usize,
        end_line_text: &str,
    ) -> LineIndex {
        let lines = self.spliced_delete(start, end, start_line, start_line_text, end_line, end_line_text);
        LineIndex {
            root: rebuild_from(lines),
            dirty_ranges: Vec::new(),
            last_reconciled_version: self.last_reconciled_version,
            rebuild_pending: false,
        }
    }

    pub fn delete_lazy(
        &self,
        start: usize,
        end: usize,
        start_line: usize,
        start_line_text: &str,
        end_line: usize,
        end_line_text: &str,
        version: u64,
    ) -> LineIndex {
        if start >= end {
            return self.clone();
        }
        let merged = self.merged_fragment_for_delete(start, end, start_line, start_line_text, end_line, end_line_text);
        let old_lines = self.collect_lines();

        let mut lines: Vec<(usize, usize)> = Vec::with_capacity(old_lines.len());
        for v in &old_lines[..start_line] {
            lines.push((v.byte_length, v.char_length));
        }
        lines.push(merged);
        for v in &old_lines[end_line + 1..] {
            lines.push((v.byte_length, v.char_length));
        }

        let mut root: Link<LineValue> = None;
        for (i, (byte_length, char_length)) in lines.into_iter().enumerate() {
            let offset = if i < start_line {
                old_lines[i].document_offset
            } else if i > start_line {
                old_lines[i + (end_line - start_line)].document_offset
            } else {
                None
            };
            root = Some(rbtree::insert_at(&root, i, LineValue { document_offset: offset, byte_length, char_length }));
        }

        let mut dirty_ranges = self.dirty_ranges.clone();
        dirty_ranges.push(DirtyRange {
            start_line: start_line + 1,
            end_line: None,
            offset_delta: -((end - start) as i64),
            created_at_version: version,
        });
        let (dirty_ranges, rebuild_pending) = merge_dirty_ranges(dirty_ranges, version);

        LineIndex {
            root,
            dirty_ranges,
            last_reconciled_version: self.last_reconciled_version,
            rebuild_pending,
        }
    }

    fn merged_fragment_for_delete(
        &self,
        start: usize,
        end: usize,
        start_line: usize,
        start_line_text: &str,
        end_line: usize,
        end_line_text: &str,
    ) -> (usize, usize) {
        let start_line_start = self.get_line_start_offset_exact(start_line);
        let end_line_start = self.get_line_start_offset_exact(end_line);
        let prefix_len = start.saturating_sub(start_line_start).min(start_line_text.len());
        let suffix_start = end.saturating_sub(end_line_start).min(end_line_text.len());
        let mut combined = String::with_capacity(prefix_len + end_line_text.len());
        combined.push_str(&start_line_text[..prefix_len]);
        combined.push_str(&end_line_text[suffix_start..]);
        line_stats(&combined)
    }

    fn spliced_delete(
        &self,
        start: usize,
        end: usize,
        start_line: usize,
        start_line_text: &str,
        end_line: usize,
        end_line_text: &str,
    ) -> Vec<(usize, usize)> {
        if start >= end {
            return self.lengths();
        }
        let merged = self.merged_fragment_for_delete(start, end, start_line, start_line_text, end_line, end_line_text);
        let mut lines = self.lengths();
        lines.splice(start_line..=end_line, vec![merged]);
        lines
    }

    /// Reconcile lines `[s, e]`: fold in the cumulative dirty delta
    /// for each cached offset (or recompute exactly for an UNKNOWN
    /// one), then drop the dirty ranges fully contained in `[s, e]`.
    pub fn reconcile_range(&self, s: usize, e: usize, version: u64) -> LineIndex {
        let mut lines = self.collect_lines();
        let last = lines.len().saturating_sub(1);
        let e = e.min(last);
        for n in s..=e.max(s) {
            if n >= lines.len() {
                break;
            }
            let delta = self.cumulative_delta(n);
            let new_offset = match lines[n].document_offset {
                Some(base) => (base as i64 + delta).max(0) as usize,
                None => self.get_line_start_offset_exact(n),
            };
            lines[n].document_offset = Some(new_offset);
        }
        let mut root: Link<LineValue> = None;
        for (i, v) in lines.into_iter().enumerate() {
            root = Some(rbtree::insert_at(&root, i, v));
        }
        let remaining: Vec<DirtyRange> = self
            .dirty_ranges
            .iter()
            .filter(|r| !(r.start_line >= s && r.end_line.map_or(false, |end| end <= e)))
            .cloned()
            .collect();
        LineIndex {
            root,
            rebuild_pending: remaining.len() > DIRTY_RANGE_CAP,
            dirty_ranges: remaining,
            last_reconciled_version: version,
        }
    }

    pub fn reconcile_viewport(&self, s: usize, e: usize, version: u64) -> LineIndex {
        let intersects = self
            .dirty_ranges
            .iter()
            .any(|r| r.start_line <= e && r.end_line.map_or(true, |end| end >= s));
        if intersects {
            self.reconcile_range(s, e, version)
        } else {
            self.clone()
        }
    }

    pub fn reconcile_full(&self, version: u64, config: &ReconciliationConfig) -> LineIndex {
        if self.dirty_ranges.is_empty() {
            return LineIndex { last_reconciled_version: version, ..self.clone() };
        }
        let dirty_line_count: usize = self
            .dirty_ranges
            .iter()
            .map(|r| r.end_line.map(|e| e.saturating_sub(r.start_line) + 1).unwrap_or(self.line_count()))
            .sum();
        let threshold = (config.threshold)(self.line_count());
        if dirty_line_count <= threshold {
            let last = self.line_count().saturating_sub(1);
            self.reconcile_range(0, last, version)
        } else {
            let lines = self.collect_lines();
            LineIndex {
                root: rebuild_from(lines.into_iter().map(|v| (v.byte_length, v.char_length)).collect()),
                dirty_ranges: Vec::new(),
                last_reconciled_version: version,
                rebuild_pending: false,
            }
        }
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        rbtree::validate(&self.root)?;
        Ok(())
    }
}

/// Merge overlapping/adjacent dirty ranges, summing deltas for
/// ranges sharing a `start_line` globally — see the dirty-range
/// merge resolution in DESIGN.md. Returns the merged list and whether
/// the 32-range safety cap was tripped.
fn merge_dirty_ranges(ranges: Vec<DirtyRange>, version: u64) -> (Vec<DirtyRange>, bool) {
    if ranges.is_empty() {
        return (ranges, false);
    }
    let mut by_start: Vec<DirtyRange> = Vec::new();
    for r in ranges {
        if let Some(existing) = by_start.iter_mut().find(|e| e.start_line == r.start_line) {
            existing.offset_delta += r.offset_delta;
            existing.end_line = match (existing.end_line, r.end_line) {
                (None, _) | (_, None) => None,
                (Some(a), Some(b)) => Some(a.max(b)),
            };
            existing.created_at_version = existing.created_at_version.max(r.created_at_version);
        } else {
            by_start.push(r);
        }
    }
    by_start.sort_by_key(|r| r.start_line);

    let mut merged: Vec<DirtyRange> = Vec::new();
    for r in by_start {
        if let Some(last) = merged.last_mut() {
            let adjacent = last.end_line.map_or(true, |e| r.start_line <= e + 1);
            if adjacent && last.offset_delta == r.offset_delta {
                last.end_line = match (last.end_line, r.end_line) {
                    (None, _) | (_, None) => None,
                    (Some(a), Some(b)) => Some(a.max(b)),
                };
                continue;
            }
        }
        merged.push(r);
    }

    if merged.len() > DIRTY_RANGE_CAP {
        (vec![DirtyRange { start_line: 0, end_line: None, offset_delta: 0, created_at_version: version }], true)
    } else {
        (merged, false)
    }
}

#[cfg(test)]
#[path = "line_index_test.rs"]
mod line_index_test;

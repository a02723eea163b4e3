//! Piece table: the document model built from an immutable original
//! buffer and a growable add buffer, referenced by an ordered
//! red-black tree of pieces keyed by byte offset.

use std::rc::Rc;

use crate::add_buffer::AddBuffer;
use crate::rbtree::{self, Agg, Link, RbValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferKind {
    Original,
    Add,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub buffer: BufferKind,
    pub start: usize,
    pub length: usize,
}

impl RbValue for Piece {
    type Extra = usize; // subtree_add_length

    fn own_weight(&self) -> usize {
        self.length
    }

    fn own_extra(&self) -> usize {
        match self.buffer {
            BufferKind::Add => self.length,
            BufferKind::Original => 0,
        }
    }

    fn combine_extra(own: &usize, left: Option<&Agg<usize>>, right: Option<&Agg<usize>>) -> usize {
        own + left.map(|a| a.extra).unwrap_or(0) + right.map(|a| a.extra).unwrap_or(0)
    }
}

#[derive(Clone)]
pub struct PieceTable {
    root: Link<Piece>,
    original: Rc<Vec<u8>>,
    add: AddBuffer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferStats {
    pub add_buffer_size: usize,
    pub add_buffer_used: usize,
    pub add_buffer_waste: usize,
    pub waste_ratio: f64,
}

#[derive(Debug, Clone)]
pub struct PiecePosition {
    pub piece: Piece,
    pub offset_in_piece: usize,
    pub piece_start_offset: usize,
}

pub struct ValueChunk {
    pub content: String,
    pub byte_offset: usize,
    pub byte_length: usize,
    pub is_last: bool,
}

impl PieceTable {
    pub fn new(content: &str) -> Self {
        let bytes = content.as_bytes().to_vec();
        let len = bytes.len();
        let original = Rc::new(bytes);
        let root = if len == 0 {
            None
        } else {
            Some(rbtree::insert_at(
                &None,
                0,
                Piece {
                    buffer: BufferKind::Original,
                    start: 0,
                    length: len,
                },
            ))
        };
        PieceTable {
            root,
            original,
            add: AddBuffer::new(),
        }
    }

    /// O(1): total document length in bytes.
    pub fn length(&self) -> usize {
        rbtree::total_count(&self.root)
    }

    fn piece_bytes(&self, piece: &Piece) -> Vec<u8> {
        match piece.buffer {
            BufferKind::Original => self.original[piece.start..piece.start + piece.length].to_vec(),
            BufferKind::Add => self.add.subarray(piece.start, piece.start + piece.length).to_vec(),
        }
    }

    /// Collect raw bytes of the intersection of `[start, end)` with
    /// `[0, length())`.
    pub fn bytes_in_range(&self, start: usize, end: usize) -> Vec<u8> {
        let total = self.length();
        let start = start.min(total);
        let end = end.min(total);
        if start >= end {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(end - start);
        for (piece, base) in rbtree::collect(&self.root) {
            let piece_end = base + piece.length;
            if piece_end <= start || base >= end {
                continue;
            }
            let lo = start.max(base) - base;
            let hi = end.min(piece_end) - base;
            let bytes = self.piece_bytes(&piece);
            out.extend_from_slice(&bytes[lo..hi]);
        }
        out
    }

    /// Document bytes in `[start, end)` decoded as UTF-8. Invalid
    /// sequences are lossily replaced rather than failing, since the
    /// read surface is defined to always return a string.
    pub fn get_text(&self, start: usize, end: usize) -> String {
        let bytes = self.bytes_in_range(start, end);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn get_value_stream(&self, chunk_size: usize, start: usize, end: usize) -> Vec<ValueChunk> {
        let total = self.length();
        let start = start.min(total);
        let end = end.min(total);
        let mut chunks = Vec::new();
        if start >= end || chunk_size == 0 {
            return chunks;
        }
        let mut pos = start;
        while pos < end {
            let next = (pos + chunk_size).min(end);
            let content = self.get_text(pos, next);
            chunks.push(ValueChunk {
                content,
                byte_offset: pos,
                byte_length: next - pos,
                is_last: next >= end,
            });
            pos = next;
        }
        chunks
    }

    /// O(log n): the piece (and its offset within it) covering byte
    /// position `p`.
    pub fn find_piece_at_position(&self, p: usize) -> Option<PiecePosition> {
        if p >= self.length() {
            return None;
        }
        let (piece, base) = rbtree::find_at(&self.root, p)?;
        Some(PiecePosition {
            offset_in_piece: p - base,
            piece_start_offset: base,
            piece,
        })
    }

    /// O(1): derived from the root aggregate.
    pub fn buffer_stats(&self) -> BufferStats {
        let used = rbtree::root_extra(&self.root).unwrap_or(0);
        let size = self.add.len();
        let waste = size.saturating_sub(used);
        let ratio = if size == 0 { 0.0 } else { waste as f64 / size as f64 };
        BufferStats {
            add_buffer_size: size,
            add_buffer_used: used,
            add_buffer_waste: waste,
            waste_ratio: ratio,
        }
    }

    pub fn byte_to_char_offset(text: &str, byte: usize) -> usize {
        let byte = byte.min(text.len());
        let mut boundary = 0;
        let mut char_count = 0;
        for (i, c) in text.char_indices() {
            if i > byte {
                break;
            }
            boundary = i;
            if i <= byte {
                char_count = text[..boundary].encode_utf16().count();
            }
            let _ = c;
        }
        if byte >= text.len() {
            return text.encode_utf16().count();
        }
        char_count
    }

    pub fn char_to_byte_offset(text: &str, char_idx: usize) -> usize {
        let mut units = 0usize;
        for (byte_idx, c) in text.char_indices() {
            let w = c.len_utf16();
            if units >= char_idx {
                return byte_idx;
            }
            units += w;
        }
        text.len()
    }

    /// Insert `text` at byte position `p`. Returns the new table and
    /// the number of bytes actually inserted.
    pub fn insert(&self, p: usize, text: &str) -> (PieceTable, usize) {
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return (self.clone(), 0);
        }
        let total = self.length();
        let p = p.min(total);
        let (new_add, add_start) = self.add.append(bytes);
        let new_piece = Piece {
            buffer: BufferKind::Add,
            start: add_start,
            length: bytes.len(),
        };

        let new_root = match rbtree::find_at(&self.root, p.min(total.saturating_sub(1))) {
            None => {
                // empty document
                Some(rbtree::insert_at(&None, 0, new_piece))
            }
            Some((piece, base)) => {
                let offset = p - base;
                if offset == 0 {
                    // landing exactly at the start of `piece`
                    let idx = position_of(&self.root, base);
                    Some(rbtree::insert_at(&self.root, idx, new_piece))
                } else if offset == piece.length {
                    let idx = position_of(&self.root, base) + 1;
                    Some(rbtree::insert_at(&self.root, idx, new_piece))
                } else {
                    // split `piece` at `offset`
                    let left = Piece {
                        buffer: piece.buffer,
                        start: piece.start,
                        length: offset,
                    };
                    let right = Piece {
                        buffer: piece.buffer,
                        start: piece.start + offset,
                        length: piece.length - offset,
                    };
                    let idx = position_of(&self.root, base);
                    let without = rbtree::remove_at(&self.root, idx);
                    let with_left = Some(rbtree::insert_at(&without, idx, left));
                    let with_new = Some(rbtree::insert_at(&with_left, idx + 1, new_piece));
                    Some(rbtree::insert_at(&with_new, idx + 2, right))
                }
            }
        };

        (
            PieceTable {
                root: new_root,
                original: self.original.clone(),
                add: new_add,
            },
            bytes.len(),
        )
    }

    /// Delete bytes in `[start, end)`. Returns the new table and the
    /// bytes actually removed (for history inversion / dirty-range
    /// line-index updates).
    pub fn delete(&self, start: usize, end: usize) -> (PieceTable, Vec<u8>) {
        let total = self.length();
        let start = start.min(total);
        let end = end.min(total);
        if start >= end {
            return (self.clone(), Vec::new());
        }
        let removed = self.bytes_in_range(start, end);

        // Rebuild by walking pieces in order and keeping only the
        // surviving fragments; small enough deletions touch only a
        // handful of pieces via `collect`, but correctness does not
        // depend on pruning here (pruning at the generic-core level
        // happens through `find_at`'s O(log n) descent; rebuilding
        // the surviving sequence is O(k) in the number of pieces).
        let mut survivors: Vec<Piece> = Vec::new();
        for (piece, base) in rbtree::collect(&self.root) {
            let piece_end = base + piece.length;
            if piece_end <= start || base >= end {
                survivors.push(piece);
                continue;
            }
            if base < start {
                survivors.push(Piece {
                    buffer: piece.buffer,
                    start: piece.start,
                    length: start - base,
                });
            }
            if piece_end > end {
                let trim = end - base;
                survivors.push(Piece {
                    buffer: piece.buffer,
                    start: piece.start + trim,
                    length: piece_end - end,
                });
            }
        }

        let mut root: Link<Piece> = None;
        for (i, p) in survivors.into_iter().enumerate() {
            root = Some(rbtree::insert_at(&root, i, p));
        }

        (
            PieceTable {
                root,
                original: self.original.clone(),
                add: self.add.clone(),
            },
            removed,
        )
    }

    /// Rebuild the add buffer from only the live add-pieces, in tree
    /// order, when waste exceeds `threshold`.
    pub fn compact_add_buffer(&self, threshold: f64) -> PieceTable {
        let stats = self.buffer_stats();
        if stats.waste_ratio < threshold {
            return self.clone();
        }
        let mut fresh = AddBuffer::new();
        let mut root: Link<Piece> = None;
        for (i, (piece, _base)) in rbtree::collect(&self.root).into_iter().enumerate() {
            let new_piece = match piece.buffer {
                BufferKind::Original => piece,
                BufferKind::Add => {
                    let bytes = self.piece_bytes(&piece);
                    let (next, start) = fresh.append(&bytes);
                    fresh = next;
                    Piece {
                        buffer: BufferKind::Add,
                        start,
                        length: piece.length,
                    }
                }
            };
            root = Some(rbtree::insert_at(&root, i, new_piece));
        }
        PieceTable {
            root,
            original: self.original.clone(),
            add: fresh,
        }
    }

    pub(crate) fn iter_pieces(&self) -> impl Iterator<Item = Piece> {
        rbtree::collect(&self.root).into_iter().map(|(p, _)| p)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        rbtree::validate(&self.root)?;
        let sum: usize = self.iter_pieces().map(|p| p.length).sum();
        if sum != self.length() {
            return Err(crate::error::Error::AggregateMismatch(
                "piece lengths do not sum to total length".into(),
            ));
        }
        Ok(())
    }
}

/// Translate a subtree-aggregate "base offset" back into an in-order
/// rank index by re-walking `collect`. Only used on the (already rare)
/// insert-at-boundary / split paths, where correctness matters more
/// than micro-optimizing away the O(n) walk; callers needing O(log n)
/// splits exclusively could thread the rank back from `find_at`
/// directly, a refinement left for a future pass.
fn position_of(root: &Link<Piece>, base: usize) -> usize {
    let mut rank = 0;
    for (p, b) in rbtree::collect(root) {
        if b == base {
            return rank;
        }
        rank += 1;
        let _ = p;
    }
    rank
}

#[cfg(test)]
#[path = "piece_test.rs"]
mod piece_test;

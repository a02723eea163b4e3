//! Growable, append-only byte buffer shared across document snapshots.
//!
//! The backing array lives behind `Rc<RefCell<Vec<u8>>>` so multiple
//! handles — one per snapshot that has appended to it — can alias the
//! same storage safely in a single-threaded, shared-owner setting.
//! Each handle remembers its own valid `length`; growth never moves
//! bytes an older handle can still see because `Vec::push`/`extend`
//! only ever grows the buffer and never reallocates in a way visible
//! through a shared immutable borrow shorter than the valid prefix.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

#[derive(Clone)]
pub struct AddBuffer {
    storage: Rc<RefCell<Vec<u8>>>,
    length: usize,
}

impl AddBuffer {
    pub fn new() -> Self {
        AddBuffer {
            storage: Rc::new(RefCell::new(Vec::new())),
            length: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Append `bytes`, returning a new handle whose `length` covers
    /// them. Existing handles (other snapshots) keep their own
    /// `length` and are unaffected.
    ///
    /// When this handle's `length` is still the shared array's valid
    /// prefix (the common, monotonic-editing case), the array is
    /// extended in place. If another handle has already appended past
    /// this one — e.g. an edit dispatched after an `UNDO` branches off
    /// an older buffer length — the shared array has diverged, and
    /// extending in place would silently corrupt the bytes older live
    /// handles still read. In that case a fresh array is allocated
    /// instead, copying only this handle's valid prefix.
    pub fn append(&self, bytes: &[u8]) -> (AddBuffer, usize) {
        let start = self.length;
        let storage = {
            let mut shared = self.storage.borrow_mut();
            if shared.len() == self.length {
                shared.extend_from_slice(bytes);
                None
            } else {
                let mut fresh = Vec::with_capacity(self.length + bytes.len());
                fresh.extend_from_slice(&shared[..self.length]);
                fresh.extend_from_slice(bytes);
                Some(Rc::new(RefCell::new(fresh)))
            }
        };
        let storage = storage.unwrap_or_else(|| self.storage.clone());
        (
            AddBuffer {
                storage,
                length: start + bytes.len(),
            },
            start,
        )
    }

    /// Zero-copy view into `[start, end)` of this handle's valid
    /// prefix.
    pub fn subarray(&self, start: usize, end: usize) -> Ref<[u8]> {
        let end = end.min(self.length);
        let start = start.min(end);
        Ref::map(self.storage.borrow(), |v| &v[start..end])
    }
}

impl Default for AddBuffer {
    fn default() -> Self {
        AddBuffer::new()
    }
}

#[cfg(test)]
#[path = "add_buffer_test.rs"]
mod add_buffer_test;

//! Transaction manager: nested begin/commit/rollback over a snapshot
//! stack, with a pending-action log and emergency reset.
//!
//! Modeled as a plain stack of snapshots rather than a lock-free
//! generation chain, since transactions here are synchronous and
//! single-threaded.

use crate::action::Action;
use crate::snapshot::DocumentSnapshot;

pub struct CommitResult {
    pub is_outermost: bool,
    pub pending_actions: Vec<Action>,
}

pub struct RollbackResult {
    pub is_outermost: bool,
    pub snapshot: Option<DocumentSnapshot>,
    pub pending_actions: Vec<Action>,
}

#[derive(Default)]
pub struct TransactionManager {
    stack: Vec<DocumentSnapshot>,
    pending: Vec<Action>,
    depth: usize,
}

impl TransactionManager {
    pub fn new() -> Self {
        TransactionManager::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    pub fn begin(&mut self, snapshot: DocumentSnapshot) {
        if self.depth == 0 {
            self.pending.clear();
        }
        self.stack.push(snapshot);
        self.depth += 1;
    }

    pub fn track_action(&mut self, action: Action) {
        if self.is_active() {
            self.pending.push(action);
        }
    }

    pub fn commit(&mut self) -> CommitResult {
        if self.depth == 0 {
            return CommitResult { is_outermost: false, pending_actions: Vec::new() };
        }
        self.depth -= 1;
        self.stack.pop();
        if self.depth == 0 {
            CommitResult { is_outermost: true, pending_actions: std::mem::take(&mut self.pending) }
        } else {
            CommitResult { is_outermost: false, pending_actions: Vec::new() }
        }
    }

    pub fn rollback(&mut self) -> RollbackResult {
        if self.depth == 0 {
            return RollbackResult { is_outermost: false, snapshot: None, pending_actions: Vec::new() };
        }
        let popped = self.stack.pop();
        self.depth -= 1;
        if self.depth == 0 {
            RollbackResult {
                is_outermost: true,
                snapshot: popped,
                pending_actions: std::mem::take(&mut self.pending),
            }
        } else {
            RollbackResult { is_outermost: false, snapshot: popped, pending_actions: Vec::new() }
        }
    }

    /// Returns the earliest (outermost) snapshot, clearing all state —
    /// the only recovery path after a fatal invariant violation.
    pub fn emergency_reset(&mut self) -> Option<DocumentSnapshot> {
        let earliest = self.stack.drain(..).next();
        self.pending.clear();
        self.depth = 0;
        earliest
    }
}

#[cfg(test)]
#[path = "transaction_test.rs"]
mod transaction_test;

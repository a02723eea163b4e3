//! Store façade: holds the current snapshot, dispatches actions
//! through the reducer and transaction manager, and fans out change
//! notifications to subscribers.

use log::{error, warn};

use crate::action::Action;
use crate::metadata::DocumentConfig;
use crate::reducer;
use crate::scheduler::Scheduler;
use crate::snapshot::DocumentSnapshot;
use crate::transaction::TransactionManager;

type Subscriber = Box<dyn Fn(&DocumentSnapshot)>;

pub struct Store<S: Scheduler> {
    snapshot: DocumentSnapshot,
    transactions: TransactionManager,
    subscribers: Vec<Subscriber>,
    scheduler: S,
    safe_mode: bool,
    reconciliation_scheduled: bool,
}

impl<S: Scheduler> Store<S> {
    pub fn new(config: &DocumentConfig, scheduler: S) -> Self {
        Store {
            snapshot: DocumentSnapshot::new(config),
            transactions: TransactionManager::new(),
            subscribers: Vec::new(),
            scheduler,
            safe_mode: false,
            reconciliation_scheduled: false,
        }
    }

    pub fn get_snapshot(&self) -> &DocumentSnapshot {
        &self.snapshot
    }

    pub fn is_safe_mode(&self) -> bool {
        self.safe_mode
    }

    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Dispatch a single action. If a transaction is active and the
    /// action is a text edit, it is also recorded in the pending log.
    /// Notification fires exactly once: immediately for a
    /// non-transactional dispatch, or deferred to the outermost commit.
    pub fn dispatch(&mut self, action: Action, now: u64) {
        if self.safe_mode {
            return;
        }
        if self.transactions.is_active() && action.is_text_edit() {
            self.transactions.track_action(action.clone());
        }
        let next = reducer::dispatch(&self.snapshot, &action, now);
        self.snapshot = next;
        if let Err(e) = self.snapshot.validate() {
            self.enter_safe_mode(e);
            return;
        }
        if action.is_transaction_control() {
            self.handle_transaction_control(&action);
        } else if !self.transactions.is_active() {
            self.notify();
        }
    }

    fn handle_transaction_control(&mut self, action: &Action) {
        match action {
            Action::TransactionStart => self.transactions.begin(self.snapshot.clone()),
            Action::TransactionCommit => {
                let result = self.transactions.commit();
                if result.is_outermost {
                    self.notify();
                }
            }
            Action::TransactionRollback => {
                let result = self.transactions.rollback();
                if let Some(snapshot) = result.snapshot {
                    if result.is_outermost {
                        self.snapshot = snapshot;
                        self.notify();
                    }
                }
            }
            _ => {}
        }
    }

    /// Dispatches every action inside a synthetic transaction so
    /// subscribers fire exactly once for the whole batch.
    pub fn batch(&mut self, actions: Vec<Action>, now: u64) {
        self.dispatch(Action::TransactionStart, now);
        for action in actions {
            self.dispatch(action, now);
        }
        self.dispatch(Action::TransactionCommit, now);
    }

    /// Flags a deferred `reconcile_full` when the line index has
    /// `rebuild_pending` set, coalescing repeated calls to at most one
    /// outstanding task (§5). The scheduler tick itself carries no
    /// state back into the store — an embedder owning the store
    /// through shared interior mutability wires the actual
    /// `reconcile_now` call from its own event loop; this only ticks
    /// the platform idle callback and tracks the coalescing flag.
    pub fn schedule_reconciliation(&mut self) {
        if !self.snapshot.line_index.rebuild_pending || self.reconciliation_scheduled {
            return;
        }
        self.reconciliation_scheduled = true;
        self.scheduler.schedule(Box::new(|| {}));
    }

    pub fn is_reconciliation_scheduled(&self) -> bool {
        self.reconciliation_scheduled
    }

    pub fn reconcile_now(&mut self, version: u64, config: &crate::line_index::ReconciliationConfig) {
        let line_index = self.snapshot.line_index.reconcile_full(version, config);
        self.snapshot = DocumentSnapshot { line_index, ..self.snapshot.clone() };
        self.reconciliation_scheduled = false;
    }

    pub fn set_viewport(&mut self, start_line: usize, end_line: usize, version: u64) {
        let line_index = self.snapshot.line_index.reconcile_viewport(start_line, end_line, version);
        self.snapshot = DocumentSnapshot { line_index, ..self.snapshot.clone() };
        self.schedule_reconciliation();
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.snapshot);
        }
    }

    fn enter_safe_mode(&mut self, error: crate::error::Error) {
        error!("document entered safe mode: {}", error);
        self.safe_mode = true;
    }

    /// Recovers from safe mode by restoring the earliest transaction
    /// snapshot, or a fresh empty document if no transaction was ever
    /// open.
    pub fn emergency_reset(&mut self, config: &DocumentConfig) {
        match self.transactions.emergency_reset() {
            Some(snapshot) => self.snapshot = snapshot,
            None => {
                warn!("emergency reset with no transaction history; reinitializing document");
                self.snapshot = DocumentSnapshot::new(config);
            }
        }
        self.safe_mode = false;
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::scheduler::Immediate;
use crate::selection::SelectionRange;

fn new_store(content: &str) -> Store<Immediate> {
    let config = DocumentConfig { content: content.into(), ..DocumentConfig::default() };
    Store::new(&config, Immediate)
}

#[test]
fn test_dispatch_notifies_subscriber_once() {
    let mut store = new_store("hello");
    let count = Rc::new(Cell::new(0));
    let counted = count.clone();
    store.subscribe(Box::new(move |_snap| counted.set(counted.get() + 1)));
    store.dispatch(Action::Insert { start: 5, text: "!".into(), timestamp: Some(1) }, 0);
    assert_eq!(count.get(), 1);
    assert_eq!(store.get_snapshot().piece_table.get_text(0, 6), "hello!");
}

#[test]
fn test_transaction_defers_notification_until_outermost_commit() {
    let mut store = new_store("hello");
    let count = Rc::new(Cell::new(0));
    let counted = count.clone();
    store.subscribe(Box::new(move |_snap| counted.set(counted.get() + 1)));

    store.dispatch(Action::TransactionStart, 0);
    store.dispatch(Action::Insert { start: 5, text: " a".into(), timestamp: Some(1) }, 0);
    store.dispatch(Action::TransactionStart, 0);
    store.dispatch(Action::Insert { start: 7, text: " b".into(), timestamp: Some(2) }, 0);
    assert_eq!(count.get(), 0);
    store.dispatch(Action::TransactionCommit, 0);
    assert_eq!(count.get(), 0, "inner commit must not notify");
    store.dispatch(Action::TransactionCommit, 0);
    assert_eq!(count.get(), 1, "outer commit notifies exactly once");
    assert_eq!(store.get_snapshot().piece_table.get_text(0, 9), "hello a b");
}

#[test]
fn test_batch_notifies_once() {
    let mut store = new_store("hello");
    let count = Rc::new(Cell::new(0));
    let counted = count.clone();
    store.subscribe(Box::new(move |_snap| counted.set(counted.get() + 1)));
    store.batch(
        vec![
            Action::Insert { start: 5, text: " world".into(), timestamp: Some(1) },
            Action::SetSelection { ranges: vec![SelectionRange { anchor: 0, head: 0 }] },
        ],
        0,
    );
    assert_eq!(count.get(), 1);
    assert_eq!(store.get_snapshot().piece_table.get_text(0, 11), "hello world");
}

#[test]
fn test_rollback_restores_pre_transaction_snapshot() {
    let mut store = new_store("hello");
    store.dispatch(Action::TransactionStart, 0);
    store.dispatch(Action::Insert { start: 5, text: " world".into(), timestamp: Some(1) }, 0);
    store.dispatch(Action::TransactionRollback, 0);
    assert_eq!(store.get_snapshot().piece_table.get_text(0, 5), "hello");
}

#[test]
fn test_reconciliation_flag_clears_after_reconcile_now() {
    let mut store = new_store("a\nb\nc\n");
    assert!(!store.is_reconciliation_scheduled());
    store.reconcile_now(0, &crate::line_index::ReconciliationConfig::default());
    assert!(!store.is_reconciliation_scheduled());
}

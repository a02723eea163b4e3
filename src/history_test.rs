use super::*;

fn entry(change: HistoryChange, ts: u64) -> HistoryEntry {
    HistoryEntry {
        changes: vec![change],
        selection_before: Selection::collapsed(0),
        selection_after: Selection::collapsed(0),
        timestamp: ts,
    }
}

#[test]
fn test_invert_insert_delete() {
    let c = HistoryChange::Insert { position: 0, text: "ab".into(), byte_length: 2 };
    assert_eq!(
        c.invert(),
        HistoryChange::Delete { position: 0, text: "ab".into(), byte_length: 2 }
    );
}

#[test]
fn test_invert_replace_swaps_text() {
    let c = HistoryChange::Replace {
        position: 0,
        text: "new".into(),
        byte_length: 3,
        old_text: "old".into(),
    };
    let inv = c.invert();
    assert_eq!(
        inv,
        HistoryChange::Replace {
            position: 0,
            text: "old".into(),
            byte_length: 3,
            old_text: "new".into(),
        }
    );
}

#[test]
fn test_invariant_10_insert_coalesce() {
    let mut h = HistoryState::new(1000, 1000);
    h.push(entry(HistoryChange::Insert { position: 0, text: "x".into(), byte_length: 1 }, 0));
    h.push(entry(HistoryChange::Insert { position: 1, text: "y".into(), byte_length: 1 }, 10));
    assert_eq!(h.undo_stack.len(), 1);
    match &h.undo_stack[0].changes[0] {
        HistoryChange::Insert { text, byte_length, .. } => {
            assert_eq!(text, "xy");
            assert_eq!(*byte_length, 2);
        }
        _ => panic!("expected insert"),
    }
}

#[test]
fn test_s5_backspace_coalesce() {
    let mut h = HistoryState::new(1000, 1000);
    h.push(entry(HistoryChange::Delete { position: 2, text: "c".into(), byte_length: 1 }, 0));
    h.push(entry(HistoryChange::Delete { position: 1, text: "b".into(), byte_length: 1 }, 10));
    h.push(entry(HistoryChange::Delete { position: 0, text: "a".into(), byte_length: 1 }, 20));
    assert_eq!(h.undo_stack.len(), 1);
    assert_eq!(
        h.undo_stack[0].changes[0],
        HistoryChange::Delete { position: 0, text: "abc".into(), byte_length: 3 }
    );
}

#[test]
fn test_push_clears_redo() {
    let mut h = HistoryState::new(1000, 0);
    h.push(entry(HistoryChange::Insert { position: 0, text: "a".into(), byte_length: 1 }, 0));
    h.undo();
    assert_eq!(h.redo_stack.len(), 1);
    h.push(entry(HistoryChange::Insert { position: 0, text: "b".into(), byte_length: 1 }, 100));
    assert!(h.redo_stack.is_empty());
}

#[test]
fn test_stack_capped_at_limit() {
    let mut h = HistoryState::new(2, 0);
    for i in 0..5u64 {
        h.push(entry(HistoryChange::Insert { position: i as usize, text: "a".into(), byte_length: 1 }, i * 1000));
    }
    assert_eq!(h.undo_stack.len(), 2);
}

#[test]
fn test_coalesce_respects_timeout() {
    let mut h = HistoryState::new(1000, 5);
    h.push(entry(HistoryChange::Insert { position: 0, text: "x".into(), byte_length: 1 }, 0));
    h.push(entry(HistoryChange::Insert { position: 1, text: "y".into(), byte_length: 1 }, 100));
    assert_eq!(h.undo_stack.len(), 2);
}

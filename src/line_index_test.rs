use super::*;

#[test]
fn test_new_counts_lines() {
    let idx = LineIndex::new("a\nb\nc");
    assert_eq!(idx.line_count(), 3);
}

#[test]
fn test_empty_document_is_one_line() {
    let idx = LineIndex::new("");
    assert_eq!(idx.line_count(), 1);
}

#[test]
fn test_s2_cjk_and_emoji() {
    let idx = LineIndex::new("你好\n世界");
    assert_eq!(idx.line_count(), 2);
    let l0 = idx.get_line_range(0).unwrap();
    let l1 = idx.get_line_range(1).unwrap();
    assert_eq!(l0.length, 7); // "你好\n" = 3+3+1 bytes
    assert_eq!(l1.length, 6); // "世界" = 3+3 bytes
    assert_eq!(idx.total_char_length(), 5);
}

#[test]
fn test_insert_eager_splits_line() {
    let idx = LineIndex::new("abcdef");
    let idx2 = idx.insert_eager(3, 0, "abcdef", "X\nY");
    assert_eq!(idx2.line_count(), 2);
    assert_eq!(idx2.get_line_range(0).unwrap().length, "abcX\n".len());
    assert_eq!(idx2.get_line_range(1).unwrap().length, "Ydef".len());
}

#[test]
fn test_delete_eager_merges_lines() {
    let idx = LineIndex::new("abc\ndef\nghi");
    // delete across the newline between line 0 and line 1: remove "c\nd"
    let start: usize = 2;
    let end: usize = 5;
    let start_line = idx.find_line_at_position(start).unwrap().line_number;
    let end_line = idx.find_line_at_position(end.saturating_sub(1)).unwrap().line_number;
    let start_text = "abc\n";
    let end_text = "def\n";
    let idx2 = idx.delete_eager(start, end, start_line, start_text, end_line, end_text);
    assert_eq!(idx2.line_count(), 2);
}

#[test]
fn test_s6_lazy_offsets_and_reconcile() {
    let mut content = String::new();
    for i in 0..1000 {
        content.push_str(&format!("line {}\n", i));
    }
    let idx = LineIndex::new(&content);
    assert_eq!(idx.line_count(), 1001); // trailing empty line after last \n

    let line0_text = idx_line_text(&content, &idx, 0);
    let idx2 = idx.insert_lazy(0, 0, &line0_text, "X", 1);
    let range = idx2.get_line_range(500).unwrap();
    assert_eq!(range.start, 1 + 500 * 7);
    assert_eq!(range.length, 7);

    let reconciled = idx2.reconcile_full(1, &ReconciliationConfig::default());
    assert!(reconciled.dirty_ranges.is_empty());
    for n in 0..reconciled.line_count() {
        let exact = reconciled.get_line_start_offset_exact(n);
        let range = reconciled.get_line_range(n).unwrap();
        assert_eq!(range.start, exact);
    }
}

fn idx_line_text(content: &str, idx: &LineIndex, n: usize) -> String {
    let r = idx.get_line_range(n).unwrap();
    content[r.start..r.start + r.length].to_string()
}

#[test]
fn test_dirty_range_cap_collapses() {
    let idx = LineIndex::new("a\n".repeat(200).as_str());
    let mut idx = idx;
    for i in 0..40 {
        let text = "a\n".repeat(200);
        let line_text = idx_line_text(&text, &idx, 0);
        idx = idx.insert_lazy(0, 0, &line_text, "Z", i as u64);
    }
    assert!(idx.dirty_ranges.len() <= 1);
}

#[test]
fn test_reconcile_viewport_only_touches_intersecting() {
    let mut content = String::new();
    for i in 0..100 {
        content.push_str(&format!("L{}\n", i));
    }
    let idx = LineIndex::new(&content);
    let line_text = idx_line_text(&content, &idx, 0);
    let idx2 = idx.insert_lazy(0, 0, &line_text, "X", 1);
    let viewport = idx2.reconcile_viewport(0, 5, 1);
    assert!(!viewport.dirty_ranges.is_empty());
}

#[test]
fn test_validate_rb_properties() {
    let idx = LineIndex::new("a\nb\nc\nd\ne\nf\ng\nh");
    assert!(idx.validate().is_ok());
}

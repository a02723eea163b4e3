use super::*;
use crate::metadata::DocumentConfig;

fn doc(content: &str) -> DocumentSnapshot {
    DocumentSnapshot::new(&DocumentConfig { content: content.into(), ..DocumentConfig::default() })
}

#[test]
fn test_get_line_content_strips_newline() {
    let s = doc("abc\ndef\n");
    assert_eq!(get_line_content(&s, 0), "abc");
    assert_eq!(get_line_content(&s, 1), "def");
}

#[test]
fn test_get_line_content_out_of_range_is_empty() {
    let s = doc("abc");
    assert_eq!(get_line_content(&s, 5), "");
}

#[test]
fn test_get_visible_line_reports_offsets_and_newline_flag() {
    let s = doc("abc\ndef");
    let line = get_visible_line(&s, 0).unwrap();
    assert_eq!(line.content, "abc");
    assert_eq!(line.start_offset, 0);
    assert_eq!(line.end_offset, 4);
    assert!(line.has_newline);

    let last = get_visible_line(&s, 1).unwrap();
    assert!(!last.has_newline);
}

#[test]
fn test_get_visible_lines_window_with_overscan() {
    let s = doc("a\nb\nc\nd\ne\n");
    let window = get_visible_lines(&s, 2, 1, 1);
    assert_eq!(window.first_line, 1);
    assert_eq!(window.last_line, 4);
    assert_eq!(window.total_lines, 6);
}

#[test]
fn test_get_visible_lines_empty_document() {
    let s = doc("");
    let window = get_visible_lines(&s, 0, 10, 2);
    assert_eq!(window.total_lines, 1);
    assert_eq!(window.lines.len(), 1);
}

#[test]
fn test_position_to_line_column_and_back() {
    let s = doc("hello\nworld");
    let lc = position_to_line_column(&s, 7);
    assert_eq!(lc.line, 1);
    assert_eq!(lc.column, 1);
    let pos = line_column_to_position(&s, lc.line, lc.column);
    assert_eq!(pos, 7);
}

#[test]
fn test_line_column_to_position_clamps_column() {
    let s = doc("hi\nbye");
    let pos = line_column_to_position(&s, 0, 100);
    assert_eq!(pos, 2);
}

#[test]
fn test_selection_round_trip_char_offsets() {
    let s = doc("h\u{00e9}llo\nworld");
    let selection = Selection { ranges: vec![SelectionRange { anchor: 0, head: 3 }], primary_index: 0 };
    let chars = selection_to_char_offsets(&s, &selection);
    let back = char_offsets_to_selection(&s, &chars);
    assert_eq!(back.ranges[0].anchor, 0);
    assert_eq!(back.ranges[0].head, 3);
}

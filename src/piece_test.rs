use super::*;

#[test]
fn test_new_table_length() {
    let t = PieceTable::new("hello");
    assert_eq!(t.length(), 5);
    assert_eq!(t.get_text(0, 5), "hello");
}

#[test]
fn test_insert_into_empty() {
    let t = PieceTable::new("");
    let (t, n) = t.insert(0, "abc");
    assert_eq!(n, 3);
    assert_eq!(t.get_text(0, 3), "abc");
}

#[test]
fn test_insert_splits_piece() {
    let t = PieceTable::new("abcdef");
    let (t, _) = t.insert(3, "XYZ");
    assert_eq!(t.get_text(0, t.length()), "abcXYZdef");
    assert!(t.validate().is_ok());
}

#[test]
fn test_insert_at_piece_boundary_does_not_split() {
    let t = PieceTable::new("abc");
    let (t, _) = t.insert(3, "def");
    let (t, _) = t.insert(0, "Z");
    assert_eq!(t.get_text(0, t.length()), "Zabcdef");
    assert!(t.validate().is_ok());
}

#[test]
fn test_s1_inserts_and_splits() {
    let t = PieceTable::new("");
    let (t, _) = t.insert(0, "Hello");
    let (t, _) = t.insert(5, " World");
    let (t, _) = t.insert(0, "Say ");
    let (t, _) = t.insert(9, ",");
    assert_eq!(t.get_text(0, t.length()), "Say Hello, World");
    assert_eq!(t.length(), 16);
    assert!(t.validate().is_ok());
}

#[test]
fn test_s3_multi_piece_delete() {
    let mut t = PieceTable::new("");
    for (i, ch) in "ABCDEFGH".chars().enumerate() {
        let (nt, _) = t.insert(i, &ch.to_string());
        t = nt;
    }
    assert_eq!(t.get_text(0, t.length()), "ABCDEFGH");
    let (t, removed) = t.delete(3, 5);
    assert_eq!(t.get_text(0, t.length()), "ABCFGH");
    assert_eq!(removed, b"DE");
    assert!(t.validate().is_ok());
}

#[test]
fn test_delete_clamped_noop_on_empty_range() {
    let t = PieceTable::new("abc");
    let (t2, removed) = t.delete(5, 2);
    assert_eq!(t2.get_text(0, t2.length()), "abc");
    assert!(removed.is_empty());
}

#[test]
fn test_buffer_stats_o1() {
    let t = PieceTable::new("");
    let (t, _) = t.insert(0, "hello");
    let stats = t.buffer_stats();
    assert_eq!(stats.add_buffer_used, 5);
    assert_eq!(stats.add_buffer_size, 5);
    assert_eq!(stats.add_buffer_waste, 0);
}

#[test]
fn test_compact_add_buffer_drops_waste() {
    let t = PieceTable::new("");
    let (t, _) = t.insert(0, "abcdef");
    let (t, _) = t.delete(0, 3);
    let stats_before = t.buffer_stats();
    assert!(stats_before.waste_ratio > 0.0);
    let compacted = t.compact_add_buffer(0.0);
    assert_eq!(compacted.get_text(0, compacted.length()), "def");
    let stats_after = compacted.buffer_stats();
    assert_eq!(stats_after.add_buffer_waste, 0);
}

#[test]
fn test_char_byte_offset_roundtrip() {
    let s = "a\u{00e9}b"; // 'a', 'é' (2 bytes), 'b'
    for k in 0..=s.chars().count() {
        let byte = PieceTable::char_to_byte_offset(s, k);
        let back = PieceTable::byte_to_char_offset(s, byte);
        assert_eq!(back, k.min(s.encode_utf16().count()));
    }
}

#[test]
fn test_get_value_stream_concatenates_to_get_text() {
    let t = PieceTable::new("");
    let (t, _) = t.insert(0, "the quick brown fox jumps");
    for chunk_size in [1usize, 3, 7, 100] {
        let chunks = t.get_value_stream(chunk_size, 0, t.length());
        let joined: String = chunks.iter().map(|c| c.content.clone()).collect();
        assert_eq!(joined, t.get_text(0, t.length()));
        if let Some(last) = chunks.last() {
            assert!(last.is_last);
        }
    }
}

#[test]
fn test_find_piece_at_position_out_of_bounds() {
    let t = PieceTable::new("abc");
    assert!(t.find_piece_at_position(3).is_none());
    assert!(t.find_piece_at_position(0).is_some());
}

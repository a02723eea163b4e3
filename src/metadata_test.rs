use super::*;

#[test]
fn test_default_metadata() {
    let m = DocumentMetadata::default();
    assert_eq!(m.encoding, "utf-8");
    assert_eq!(m.line_ending, LineEnding::Lf);
    assert!(!m.is_dirty);
}

#[test]
fn test_default_config() {
    let c = DocumentConfig::default();
    assert_eq!(c.history_limit, 1000);
    assert_eq!(c.chunk_size, 65536);
    assert_eq!(c.undo_group_timeout_ms, 0);
}

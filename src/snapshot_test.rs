use super::*;

#[test]
fn test_new_snapshot_from_config() {
    let config = DocumentConfig { content: "hello\nworld".into(), ..DocumentConfig::default() };
    let snap = DocumentSnapshot::new(&config);
    assert_eq!(snap.version, Version(0));
    assert_eq!(snap.piece_table.length(), 11);
    assert_eq!(snap.line_index.line_count(), 2);
    assert!(snap.validate().is_ok());
}

#[test]
fn test_version_increments() {
    assert_eq!(Version(0).next(), Version(1));
}

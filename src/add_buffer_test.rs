use super::*;

#[test]
fn test_append_grows() {
    let buf = AddBuffer::new();
    let (buf, start) = buf.append(b"hello");
    assert_eq!(start, 0);
    assert_eq!(buf.len(), 5);
    assert_eq!(&*buf.subarray(0, 5), b"hello");
}

#[test]
fn test_sequential_append_shares_storage() {
    let buf = AddBuffer::new();
    let (buf, _) = buf.append(b"hello");
    let (buf, start) = buf.append(b" world");
    assert_eq!(start, 5);
    assert_eq!(&*buf.subarray(0, 11), b"hello world");
}

#[test]
fn test_old_handle_unaffected_by_later_append() {
    let buf = AddBuffer::new();
    let (old, _) = buf.append(b"abc");
    let (_new, _) = old.append(b"def");
    // old handle still only sees its own valid prefix.
    assert_eq!(old.len(), 3);
    assert_eq!(&*old.subarray(0, 3), b"abc");
}

#[test]
fn test_branching_append_does_not_corrupt_sibling() {
    let buf = AddBuffer::new();
    let (base, _) = buf.append(b"abc");
    let (branch_a, _) = base.append(b"AAA");
    let (branch_b, _) = base.append(b"BBB");
    assert_eq!(&*branch_a.subarray(0, 6), b"abcAAA");
    assert_eq!(&*branch_b.subarray(0, 6), b"abcBBB");
    assert_eq!(&*base.subarray(0, 3), b"abc");
}

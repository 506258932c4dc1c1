use super::*;

#[test]
fn empty_source() {
    let buf = SourceBuffer::new("");
    assert_eq!(buf.len(), 0);
    assert!(buf.is_empty());
    assert!(buf.as_bytes().is_empty());
    assert_eq!(buf.as_sentinel_bytes()[0], 0);
}

#[test]
fn ascii_source() {
    let buf = SourceBuffer::new("kernel");
    assert_eq!(buf.len(), 6);
    assert_eq!(buf.as_bytes(), b"kernel");
    assert_eq!(buf.as_sentinel_bytes()[6], 0);
}

#[test]
fn exactly_one_sentinel() {
    for source in ["", "x", "kernel void k() { }\n"] {
        let buf = SourceBuffer::new(source);
        let bytes = buf.as_sentinel_bytes();
        assert_eq!(bytes.len(), source.len() + 1, "{source:?}");
        assert_eq!(bytes.last(), Some(&0));
        assert_eq!(buf.as_bytes(), source.as_bytes());
    }
}

#[test]
fn interior_null_is_kept() {
    let buf = SourceBuffer::new("a\0b");
    assert_eq!(buf.len(), 3);
    assert_eq!(buf.as_bytes(), b"a\0b");
}

#[test]
fn cursor_starts_at_zero() {
    let buf = SourceBuffer::new("int");
    let cursor = buf.cursor();
    assert_eq!(cursor.pos(), 0);
    assert_eq!(cursor.current(), b'i');
}

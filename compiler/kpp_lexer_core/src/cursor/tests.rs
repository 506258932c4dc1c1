use crate::SourceBuffer;

// === Basic Navigation ===

#[test]
fn current_and_peek() {
    let buf = SourceBuffer::new("ab");
    let cursor = buf.cursor();
    assert_eq!(cursor.current(), b'a');
    assert_eq!(cursor.peek(), b'b');
}

#[test]
fn peek_past_end_reads_sentinel() {
    let buf = SourceBuffer::new("a");
    let cursor = buf.cursor();
    assert_eq!(cursor.peek(), 0);
}

#[test]
fn advance_reaches_eof() {
    let buf = SourceBuffer::new("ab");
    let mut cursor = buf.cursor();
    assert!(!cursor.is_eof());
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_eof());
    assert_eq!(cursor.current(), 0);
}

#[test]
fn eat_while_stops_at_predicate() {
    let buf = SourceBuffer::new("abc123");
    let mut cursor = buf.cursor();
    cursor.eat_while(|b| b.is_ascii_alphabetic());
    assert_eq!(cursor.pos(), 3);
    assert_eq!(cursor.slice(0, 3), b"abc");
}

// === Scanning Helpers ===

#[test]
fn eat_until_newline_stops_before_newline() {
    let buf = SourceBuffer::new("// hi\nx");
    let mut cursor = buf.cursor();
    cursor.eat_until_newline_or_eof();
    assert_eq!(cursor.pos(), 5);
    assert_eq!(cursor.current(), b'\n');
}

#[test]
fn eat_until_newline_without_newline_goes_to_eof() {
    let buf = SourceBuffer::new("// hi");
    let mut cursor = buf.cursor();
    cursor.eat_until_newline_or_eof();
    assert!(cursor.is_eof());
}

#[test]
fn skip_to_quote_delim_finds_escape_first() {
    let buf = SourceBuffer::new(r#"ab\"c""#);
    let mut cursor = buf.cursor();
    assert_eq!(cursor.skip_to_quote_delim(b'"'), b'\\');
    assert_eq!(cursor.pos(), 2);
}

#[test]
fn skip_to_quote_delim_reports_eof() {
    let buf = SourceBuffer::new("abc");
    let mut cursor = buf.cursor();
    assert_eq!(cursor.skip_to_quote_delim(b'"'), 0);
    assert!(cursor.is_eof());
}

#[test]
fn block_comment_end_uses_first_terminator() {
    let buf = SourceBuffer::new("/* a /* b */ c */");
    let mut cursor = buf.cursor();
    cursor.advance_n(2);
    assert!(cursor.eat_past_block_comment_end());
    assert_eq!(cursor.pos(), 12);
}

#[test]
fn block_comment_without_end_fails() {
    let buf = SourceBuffer::new("/* never closed");
    let mut cursor = buf.cursor();
    cursor.advance_n(2);
    assert!(!cursor.eat_past_block_comment_end());
    assert!(cursor.is_eof());
}

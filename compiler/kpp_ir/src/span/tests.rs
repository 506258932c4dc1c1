use super::*;

#[test]
fn at_builds_from_length() {
    let span = Span::at(4, 3);
    assert_eq!(span, Span::new(4, 7));
    assert_eq!(span.len(), 3);
    assert_eq!(span.to_range(), 4..7);
}

#[test]
fn empty_span() {
    assert!(Span::new(2, 2).is_empty());
    assert!(!Span::new(2, 3).is_empty());
}

#[test]
fn debug_format() {
    assert_eq!(format!("{:?}", Span::new(1, 5)), "1..5");
}

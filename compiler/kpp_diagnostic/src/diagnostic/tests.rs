use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_builder_chain() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("expected `<` after `Texture2Dn`")
        .with_file("kernel.kpp")
        .with_line(7)
        .with_note("texture types are written `Texture2Dn<float>`");

    assert!(diag.is_error());
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.location().as_deref(), Some("kernel.kpp:7"));
    assert_eq!(diag.notes.len(), 1);
}

#[test]
fn test_zero_line_is_unknown() {
    let diag = Diagnostic::error(ErrorCode::E9001).with_line(0);
    assert_eq!(diag.line, None);
    assert_eq!(diag.location(), None);
}

#[test]
fn test_location_variants() {
    let file_only = Diagnostic::error(ErrorCode::E3001).with_file("out.bin");
    assert_eq!(file_only.location().as_deref(), Some("out.bin"));

    let line_only = Diagnostic::error(ErrorCode::E1001).with_line(3);
    assert_eq!(line_only.location().as_deref(), Some("line 3"));
}

#[test]
fn test_warning_severity() {
    let diag = Diagnostic::warning(ErrorCode::E1001);
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "warning");
}

#[test]
fn test_display() {
    let diag = Diagnostic::error(ErrorCode::E0002).with_message("illegal character `@`");
    assert_eq!(diag.to_string(), "error[E0002]: illegal character `@`");
}

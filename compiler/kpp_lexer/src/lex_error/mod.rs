//! Lexer error types.

use kpp_diagnostic::{Diagnostic, ErrorCode};

/// A fatal lexer error. Lexing of the file stops at the first one.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct LexError {
    /// 1-based line where the offending token starts.
    pub line: u32,
    pub kind: LexErrorKind,
}

/// What kind of lexer error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    #[error("illegal character `{0}`")]
    IllegalCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("NUL byte in source")]
    InteriorNull,
}

impl LexErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::IllegalCharacter(_) => ErrorCode::E0002,
            LexErrorKind::UnterminatedComment => ErrorCode::E0003,
            LexErrorKind::InteriorNull => ErrorCode::E0004,
        }
    }
}

impl LexError {
    pub fn new(line: u32, kind: LexErrorKind) -> Self {
        LexError { line, kind }
    }

    /// Convert to a diagnostic tagged with `file` and the error's line.
    pub fn into_diagnostic(self, file: &str) -> Diagnostic {
        let diag = Diagnostic::error(self.kind.code())
            .with_message(self.kind.to_string())
            .with_file(file)
            .with_line(self.line);
        match self.kind {
            LexErrorKind::UnterminatedComment => diag.with_note("block comments do not nest"),
            LexErrorKind::UnterminatedString => {
                diag.with_note("string literals cannot span lines")
            }
            LexErrorKind::IllegalCharacter(_) | LexErrorKind::InteriorNull => diag,
        }
    }
}

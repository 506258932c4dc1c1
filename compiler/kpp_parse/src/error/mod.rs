//! Parse error types.

use kpp_diagnostic::{Diagnostic, ErrorCode};
use kpp_ir::TokenKind;

/// A fatal parse error. Parsing of the file stops at the first one.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: u32,
    pub kind: ParseErrorKind,
}

/// What kind of parse error occurred.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    /// A closing delimiter of the wrong kind.
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        found: TokenKind,
        expected: TokenKind,
    },
    /// A closing delimiter with nothing open.
    #[error("unbalanced {found}")]
    Unbalanced { found: TokenKind },
    /// Input ended inside a construct.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: TokenKind },
}

impl ParseErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseErrorKind::UnexpectedToken { .. } => ErrorCode::E1001,
            ParseErrorKind::Unbalanced { .. } => ErrorCode::E1002,
            ParseErrorKind::UnexpectedEof { .. } => ErrorCode::E1003,
        }
    }
}

impl ParseError {
    pub fn new(line: u32, kind: ParseErrorKind) -> Self {
        ParseError { line, kind }
    }

    /// Convert to a diagnostic tagged with `file` and the error's line.
    pub fn into_diagnostic(self, file: &str) -> Diagnostic {
        Diagnostic::error(self.kind.code())
            .with_message(self.kind.to_string())
            .with_file(file)
            .with_line(self.line)
    }
}

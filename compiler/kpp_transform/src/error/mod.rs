//! Transform and pipeline error types.

use std::io;
use std::path::PathBuf;

use kpp_diagnostic::{Diagnostic, ErrorCode};
use kpp_ir::SpliceError;
use kpp_lexer::LexError;
use kpp_parse::ParseError;

/// A fatal transform error. The pipeline stops at the first one; splices
/// already made stay in place.
#[derive(Debug, thiserror::Error)]
#[error("line {line}: {kind}")]
pub struct TransformError {
    /// 1-based line, or 0 when no source position applies.
    pub line: u32,
    pub kind: TransformErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum TransformErrorKind {
    #[error("expected `<` after `{keyword}`")]
    MissingOpenAngle { keyword: String },
    #[error("`{keyword}<>` has no texel type")]
    MissingTexelType { keyword: String },
    #[error("expected `>` to close `{keyword}<`")]
    MissingCloseAngle { keyword: String },
    /// `signed`/`unsigned` not followed by exactly one basic type.
    #[error("`{word}` must be followed by a single basic type")]
    BadSignedness { word: String },
    #[error("`{keyword}` parameter has no name")]
    MissingParamName { keyword: String },
    #[error("`{keyword}` is not inside a function or declaration")]
    NoContainer { keyword: String },
    #[error("cannot find the name of the kernel function")]
    NoFunctionName,
    #[error("cannot write texture side-table `{}`", path.display())]
    SideTable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A broken structural assumption, such as a node spanning no tokens.
    #[error("internal error: {0}")]
    Internal(&'static str),
    #[error(transparent)]
    Splice(#[from] SpliceError),
}

impl TransformErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            TransformErrorKind::MissingOpenAngle { .. } => ErrorCode::E2001,
            TransformErrorKind::MissingTexelType { .. } => ErrorCode::E2002,
            TransformErrorKind::MissingCloseAngle { .. } => ErrorCode::E2003,
            TransformErrorKind::BadSignedness { .. } => ErrorCode::E2004,
            TransformErrorKind::MissingParamName { .. } => ErrorCode::E2005,
            TransformErrorKind::NoContainer { .. } => ErrorCode::E2006,
            TransformErrorKind::NoFunctionName => ErrorCode::E2007,
            TransformErrorKind::SideTable { .. } => ErrorCode::E3001,
            TransformErrorKind::Internal(_) | TransformErrorKind::Splice(_) => ErrorCode::E9001,
        }
    }
}

impl TransformError {
    pub fn new(line: u32, kind: TransformErrorKind) -> Self {
        TransformError { line, kind }
    }

    /// Convert to a diagnostic tagged with `file` and the error's line.
    pub fn into_diagnostic(self, file: &str) -> Diagnostic {
        let code = self.kind.code();
        let diag = Diagnostic::error(code)
            .with_message(self.kind.to_string())
            .with_file(file)
            .with_line(self.line);
        match self.kind {
            TransformErrorKind::SideTable { source, .. } => diag.with_note(source.to_string()),
            TransformErrorKind::BadSignedness { .. } => {
                diag.with_note("write e.g. `unsigned int` or `signed char`")
            }
            _ if code.is_internal_error() => diag.with_note("this is a bug in kpp"),
            _ => diag,
        }
    }
}

impl From<SpliceError> for TransformError {
    fn from(error: SpliceError) -> Self {
        TransformError::new(0, TransformErrorKind::Splice(error))
    }
}

/// Any failure while processing one file.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("{transform}: {error}")]
    Transform {
        transform: &'static str,
        #[source]
        error: TransformError,
    },
}

impl ProcessError {
    pub fn into_diagnostic(self, file: &str) -> Diagnostic {
        match self {
            ProcessError::Lex(e) => e.into_diagnostic(file),
            ProcessError::Parse(e) => e.into_diagnostic(file),
            ProcessError::Transform { transform, error } => error
                .into_diagnostic(file)
                .with_note(format!("in the `{transform}` transform")),
        }
    }
}

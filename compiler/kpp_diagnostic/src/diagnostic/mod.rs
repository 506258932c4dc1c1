//! Core diagnostic types.
//!
//! Defines [`Diagnostic`] and [`Severity`], the building blocks every phase
//! uses to report failures.

use std::fmt;

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A rich diagnostic with file/line location and notes.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    /// Source file name, when known.
    pub file: Option<String>,
    /// 1-based line, when known.
    pub line: Option<u32>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Create an error diagnostic with an empty message.
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            severity: Severity::Error,
            message: String::new(),
            file: None,
            line: None,
            notes: Vec::new(),
        }
    }

    /// Create a warning diagnostic with an empty message.
    pub fn warning(code: ErrorCode) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            ..Self::error(code)
        }
    }

    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach a line. `0` means "unknown" and is ignored.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = (line > 0).then_some(line);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `file:line`, `file`, `line N`, or `None`.
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{file}:{line}")),
            (Some(file), None) => Some(file.clone()),
            (None, Some(line)) => Some(format!("line {line}")),
            (None, None) => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests;

//! Diagnostic system for kpp error reporting.
//!
//! Every phase error (lex, parse, transform, side-table I/O) converts into a
//! [`Diagnostic`] carrying:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - the file and line where it went wrong
//! - optional notes
//!
//! Rendering is done by a [`emitter::DiagnosticEmitter`].

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;

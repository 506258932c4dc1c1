//! Plain-text rendering for `kppc`'s stderr.
//!
//! ```text
//! error[E2002]: texture `Texture2Dn` has no texel type
//!   --> blur.kpp:12
//!   = note: write the element type between `<` and `>`
//! ```

use std::io::{self, Write};

use crate::{Diagnostic, Severity};

use super::DiagnosticEmitter;

/// Whether ANSI escapes are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    /// Color only when the stream is a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// `is_tty` only matters for [`ColorMode::Auto`].
    pub fn should_use_colors(self, is_tty: bool) -> bool {
        match self {
            ColorMode::Auto => is_tty,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

#[derive(Clone, Copy)]
enum Style {
    Severity(Severity),
    Code,
    Location,
    Label,
}

impl Style {
    fn escape(self) -> &'static str {
        match self {
            Style::Severity(Severity::Error) => "\x1b[1;31m",
            Style::Severity(Severity::Warning) => "\x1b[1;33m",
            Style::Severity(Severity::Note) => "\x1b[1;36m",
            Style::Code | Style::Label => "\x1b[1m",
            Style::Location => "\x1b[1;34m",
        }
    }
}

const RESET: &str = "\x1b[0m";

/// Writes diagnostics as text, one blank line after each.
///
/// Write errors are ignored: there is nowhere left to report them.
pub struct TerminalEmitter<W: Write> {
    writer: W,
    colors: bool,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn with_color_mode(writer: W, mode: ColorMode, is_tty: bool) -> Self {
        TerminalEmitter {
            writer,
            colors: mode.should_use_colors(is_tty),
        }
    }

    fn paint(&mut self, style: Style, text: &str) {
        let _ = if self.colors {
            write!(self.writer, "{}{text}{RESET}", style.escape())
        } else {
            write!(self.writer, "{text}")
        };
    }
}

impl TerminalEmitter<io::Stderr> {
    pub fn stderr(mode: ColorMode, is_tty: bool) -> Self {
        Self::with_color_mode(io::stderr(), mode, is_tty)
    }
}

fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

impl<W: Write> DiagnosticEmitter for TerminalEmitter<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        let severity = diagnostic.severity;
        self.paint(Style::Severity(severity), &severity.to_string());
        self.paint(Style::Code, &format!("[{}]", diagnostic.code.as_str()));
        let _ = writeln!(self.writer, ": {}", diagnostic.message);

        if let Some(location) = diagnostic.location() {
            let _ = write!(self.writer, "  --> ");
            self.paint(Style::Location, &location);
            let _ = writeln!(self.writer);
        }
        for note in &diagnostic.notes {
            let _ = write!(self.writer, "  = ");
            self.paint(Style::Label, "note");
            let _ = writeln!(self.writer, ": {note}");
        }
        let _ = writeln!(self.writer);
    }

    fn flush(&mut self) {
        let _ = self.writer.flush();
    }

    fn emit_summary(&mut self, error_count: usize, warning_count: usize) {
        let warnings = counted(warning_count, "warning");
        let line = match (error_count, warning_count) {
            (0, 0) => return,
            (0, _) => {
                self.paint(Style::Severity(Severity::Warning), "warning");
                format!("{warnings} emitted")
            }
            (errors, _) => {
                self.paint(Style::Severity(Severity::Error), "error");
                let cause = if errors == 1 {
                    "previous error".to_owned()
                } else {
                    format!("{errors} previous errors")
                };
                if warning_count == 0 {
                    format!("aborting due to {cause}")
                } else {
                    format!("aborting due to {cause}; {warnings} emitted")
                }
            }
        };
        let _ = writeln!(self.writer, ": {line}");
    }
}

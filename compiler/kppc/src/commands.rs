//! Read a kernel file, process it and write the result.

use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

use kpp_diagnostic::emitter::{DiagnosticEmitter, TerminalEmitter};
use kpp_diagnostic::Diagnostic;
use kpp_transform::{Processor, ProcessorConfig};
use tracing::debug;

use crate::Cli;

/// Run one invocation. Diagnostics go to stderr; nothing is written to the
/// output unless the whole pipeline succeeds.
pub fn run(cli: &Cli) -> ExitCode {
    let file = cli.file_name();
    let source = match read_source(&cli.input) {
        Ok(source) => source,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = if cli.dump_tokens {
        dump_tokens(&source).map_err(|e| e.into_diagnostic(&file))
    } else if cli.dump_tree {
        dump_tree(cli.config(), &source)
    } else {
        kpp_transform::process(cli.config(), &source).map_err(|e| e.into_diagnostic(&file))
    };

    match outcome {
        Ok(text) => match write_output(cli.output.as_deref(), &text) {
            Ok(()) => {
                debug!(file = %file, bytes = text.len(), "done");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: cannot write output: {e}");
                ExitCode::FAILURE
            }
        },
        Err(diagnostic) => {
            report(cli, &diagnostic);
            ExitCode::FAILURE
        }
    }
}

fn report(cli: &Cli, diagnostic: &Diagnostic) {
    let mut emitter = TerminalEmitter::stderr(cli.color.into(), io::stderr().is_terminal());
    emitter.emit(diagnostic);
    emitter.emit_summary(usize::from(diagnostic.is_error()), 0);
    emitter.flush();
}

fn read_source(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| {
        let path = path.display();
        match e.kind() {
            io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
            io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
            io::ErrorKind::InvalidData => format!("'{path}' contains invalid UTF-8 data"),
            _ => format!("error reading '{path}': {e}"),
        }
    })
}

fn write_output(path: Option<&Path>, text: &str) -> io::Result<()> {
    match path {
        Some(path) => std::fs::write(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()
        }
    }
}

/// One line per token: line, kind and escaped text.
pub fn dump_tokens(source: &str) -> Result<String, kpp_lexer::LexError> {
    let list = kpp_lexer::lex(source)?;
    let mut out = String::new();
    let _ = writeln!(out, "Tokens ({}):", list.len());
    for id in list.iter() {
        let Some(kind) = list.kind(id) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{:>5}  {:<12} {:?}",
            list.line(id),
            format!("{kind:?}"),
            list.text(id)
        );
    }
    Ok(out)
}

/// Indented node tree of the parsed file.
pub fn dump_tree(config: ProcessorConfig, source: &str) -> Result<String, Diagnostic> {
    let file = config.file_name.clone();
    let processor = Processor::load(config, source).map_err(|e| e.into_diagnostic(&file))?;
    Ok(kpp_parse::dump_tree(processor.tokens(), processor.tree()))
}

//! Lexer cursor over a source buffer.
//!
//! [`Lexer::next_token`] appends one token per call to the caller's
//! [`TokenList`] and returns its id. It returns `None` once the input is
//! exhausted or an error was hit; [`Lexer::error`] tells the two apart. The
//! error state is sticky: after a failure every later call returns `None`.

use kpp_ir::{Span, TokenId, TokenList};
use kpp_lexer_core::{RawScanner, RawTag, SourceBuffer};
use tracing::{debug, trace};

use crate::cooker::cook;
use crate::LexError;

/// Lexer cursor: byte offset, line number and error state.
pub struct Lexer<'src> {
    scanner: RawScanner<'src>,
    line: u32,
    error: Option<LexError>,
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Lex `buffer`. Tokens go to a [`TokenList`] created over the same text.
    pub fn new(buffer: &'src SourceBuffer) -> Self {
        Lexer {
            scanner: RawScanner::new(buffer.cursor()),
            line: 1,
            error: None,
            finished: false,
        }
    }

    /// Consume the next token and link it at the tail of `list`.
    pub fn next_token(&mut self, list: &mut TokenList) -> Option<TokenId> {
        if self.finished {
            return None;
        }

        let start = self.scanner.pos();
        let raw = self.scanner.next_token();
        let span = Span::at(start, raw.len);
        let text = match raw.tag {
            RawTag::InvalidByte(_) => list.source().get(start as usize..),
            _ => list.source().get(span.to_range()),
        }
        .unwrap_or("");

        match cook(raw.tag, text) {
            Ok(Some(kind)) => {
                let line = self.line;
                self.line = self.line.saturating_add(count_newlines(text));
                let id = list.append(kind, span, line);
                trace!(?id, %kind, line, "token");
                Some(id)
            }
            Ok(None) => {
                self.finished = true;
                debug!(tokens = list.len(), lines = self.line, "lexed");
                None
            }
            Err(kind) => {
                self.finished = true;
                debug!(line = self.line, %kind, "lex error");
                self.error = Some(LexError::new(self.line, kind));
                None
            }
        }
    }

    /// The error that stopped lexing, if any.
    pub fn error(&self) -> Option<&LexError> {
        self.error.as_ref()
    }

    /// Line of the next token.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// `true` once `next_token` has returned `None`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain the remaining tokens into `list`.
    pub fn run(mut self, list: &mut TokenList) -> Result<(), LexError> {
        while self.next_token(list).is_some() {}
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn count_newlines(text: &str) -> u32 {
    u32::try_from(memchr::memchr_iter(b'\n', text.as_bytes()).count()).unwrap_or(u32::MAX)
}

/// Lex a whole source into a fresh [`TokenList`].
///
/// On error the partially built list is destroyed.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    let buffer = SourceBuffer::new(source);
    let mut list = TokenList::new(source);
    match Lexer::new(&buffer).run(&mut list) {
        Ok(()) => Ok(list),
        Err(err) => {
            list.delete_all();
            Err(err)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions use unwrap for clarity")]
mod tests;

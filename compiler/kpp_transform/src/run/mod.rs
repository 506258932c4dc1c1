//! Builder for synthesized token runs.
//!
//! Transforms spell new source as a sequence of typed pieces instead of
//! re-lexing text. The finished run is detached: it must be linked into the
//! list with a splice, or discarded.

use kpp_ir::{SpliceError, TokenId, TokenKind, TokenList, TokenRange};
use smallvec::SmallVec;

/// Accumulates detached tokens for one insertion.
#[must_use]
pub struct RunBuilder<'a> {
    list: &'a mut TokenList,
    ids: SmallVec<[TokenId; 16]>,
    line: u32,
    eol: &'a str,
}

impl<'a> RunBuilder<'a> {
    /// Tokens are tagged with `line` so diagnostics about them point near
    /// the insertion site.
    pub fn new(list: &'a mut TokenList, line: u32) -> Self {
        RunBuilder {
            list,
            ids: SmallVec::new(),
            line,
            eol: "\n",
        }
    }

    /// Spelling of [`eol`](Self::eol) pieces, to match the file's line
    /// endings.
    pub fn with_eol(mut self, eol: &'a str) -> Self {
        self.eol = eol;
        self
    }

    fn push(mut self, kind: TokenKind, text: impl Into<Box<str>>) -> Self {
        let id = self.list.synthesize(kind, text, self.line);
        self.ids.push(id);
        self
    }

    pub fn symbol(self, text: impl Into<Box<str>>) -> Self {
        self.push(TokenKind::Symbol, text)
    }

    /// An operator or keyword with a fixed spelling.
    pub fn punct(self, kind: TokenKind) -> Self {
        debug_assert!(kind.spelling().is_some(), "{kind:?} has no fixed spelling");
        let text = kind.spelling().unwrap_or_default();
        self.push(kind, text)
    }

    pub fn space(self) -> Self {
        self.push(TokenKind::Whitespace, " ")
    }

    pub fn indent(self, width: usize) -> Self {
        self.push(TokenKind::Whitespace, " ".repeat(width))
    }

    pub fn eol(self) -> Self {
        let eol = self.eol;
        self.push(TokenKind::Eol, eol)
    }

    /// A string literal; `text` is quoted here.
    pub fn string(self, text: &str) -> Self {
        self.push(TokenKind::String, format!("\"{text}\""))
    }

    pub fn number(self, value: impl ToString) -> Self {
        self.push(TokenKind::Number, value.to_string())
    }

    /// `name(arg, arg, ...)` with `, ` separators. Words of an argument
    /// become separate tokens: numbers for digit strings, symbols otherwise.
    pub fn call<S: AsRef<str>>(self, name: &str, args: &[S]) -> Self {
        let mut run = self.symbol(name).punct(TokenKind::LParen);
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                run = run.punct(TokenKind::Comma).space();
            }
            for (j, word) in arg.as_ref().split_whitespace().enumerate() {
                if j > 0 {
                    run = run.space();
                }
                run = if word.bytes().all(|b| b.is_ascii_digit()) {
                    run.number(word)
                } else {
                    run.symbol(word)
                };
            }
        }
        run.punct(TokenKind::RParen)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Chain the pieces into one detached run. `None` if nothing was added.
    pub fn finish(self) -> Result<Option<TokenRange>, SpliceError> {
        self.list.chain(&self.ids)
    }
}

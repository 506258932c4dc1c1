//! Token cursor for navigating the token list.
//!
//! The cursor sits on a raw position in the list. The significant-token
//! methods (`peek`, `bump`) skip whitespace, newlines and comments; the raw
//! methods see every token, which directive scanning needs to find the
//! terminating newline.

use kpp_ir::{TokenId, TokenKind, TokenList};
use tracing::trace;

pub(crate) struct Cursor<'a> {
    list: &'a TokenList,
    /// Next unvisited token, trivia included.
    pos: Option<TokenId>,
    /// Last significant token consumed.
    last: Option<TokenId>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(list: &'a TokenList) -> Self {
        Cursor {
            list,
            pos: list.head(),
            last: None,
        }
    }

    #[inline]
    pub(crate) fn list(&self) -> &'a TokenList {
        self.list
    }

    /// Next significant token, without consuming it.
    #[inline]
    pub(crate) fn peek(&self) -> Option<TokenId> {
        self.pos.and_then(|pos| self.list.significant_from(pos))
    }

    #[inline]
    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().and_then(|id| self.list.kind(id))
    }

    /// Consume the next significant token.
    pub(crate) fn bump(&mut self) -> Option<TokenId> {
        let id = self.peek()?;
        self.pos = self.list.next(id);
        self.last = Some(id);
        trace!(?id, text = self.list.text(id), "bump");
        Some(id)
    }

    /// Consume significant tokens before `target`, leaving it next.
    pub(crate) fn advance_to(&mut self, target: TokenId) {
        while let Some(id) = self.peek() {
            if id == target {
                break;
            }
            self.bump();
        }
    }

    /// Next token, trivia included.
    #[inline]
    pub(crate) fn peek_raw(&self) -> Option<TokenId> {
        self.pos
    }

    /// Consume the next token, trivia included.
    pub(crate) fn bump_raw(&mut self) -> Option<TokenId> {
        let id = self.pos?;
        self.pos = self.list.next(id);
        if self.list.kind(id).is_some_and(|k| !k.is_trivia()) {
            self.last = Some(id);
        }
        Some(id)
    }

    /// Last significant token consumed.
    #[inline]
    pub(crate) fn last(&self) -> Option<TokenId> {
        self.last
    }

    /// Line of the next significant token, else of the last consumed one.
    pub(crate) fn line(&self) -> u32 {
        self.peek()
            .or(self.last)
            .map_or(0, |id| self.list.line(id))
    }

    /// Line of the last consumed token.
    pub(crate) fn last_line(&self) -> u32 {
        self.last.map_or(0, |id| self.list.line(id))
    }
}

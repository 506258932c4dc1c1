//! Tokens and the shared token list.

mod kind;
mod list;

pub use kind::TokenKind;
pub use list::{Iter as TokenIter, Splice, SpliceError, TokenList, TokenRange};

use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;

use super::Span;

/// Stable handle to a token slot in a [`TokenList`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TokenId(u32);

impl TokenId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TokenId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Where a token's text lives.
///
/// Lexed tokens borrow a span of the source buffer. Synthesized tokens own a
/// small string.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenText {
    Source(Span),
    Owned(Box<str>),
}

/// One token: kind, text, line, optional content hash and list links.
#[derive(Clone, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: TokenText,
    /// 1-based source line of the token's first byte.
    pub line: u32,
    /// Content hash for symbol and keyword tokens.
    pub hash: Option<u64>,
    prev: Option<TokenId>,
    next: Option<TokenId>,
    linked: bool,
}

impl Token {
    pub fn prev(&self) -> Option<TokenId> {
        self.prev
    }

    pub fn next(&self) -> Option<TokenId> {
        self.next
    }

    /// `true` while the token is part of the file's chain.
    pub fn is_linked(&self) -> bool {
        self.linked
    }
}

/// Hash of a token's text, used for fast symbol comparison.
pub fn content_hash(text: &str) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(text.as_bytes());
    hasher.finish()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions use unwrap for clarity")]
mod tests;

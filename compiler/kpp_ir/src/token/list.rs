//! Arena-backed doubly linked token list.
//!
//! Every token for one file lives in a single `TokenList`. Linked tokens form
//! one unbroken chain from `head` to `tail`; detached tokens are synthesized
//! runs waiting to be spliced in. A token is destroyed exactly once: when it
//! is cut out by a splice, discarded as an unused run, or by `delete_all`.

use std::fmt;

use super::{content_hash, Token, TokenId, TokenKind, TokenText};
use crate::Span;

/// Inclusive range of tokens, `first..=last`, following `next` links.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TokenRange {
    pub first: TokenId,
    pub last: TokenId,
}

impl TokenRange {
    #[inline]
    pub const fn new(first: TokenId, last: TokenId) -> Self {
        TokenRange { first, last }
    }

    #[inline]
    pub const fn single(id: TokenId) -> Self {
        TokenRange {
            first: id,
            last: id,
        }
    }
}

/// Misuse of the splicing primitives.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SpliceError {
    #[error("token {0:?} does not exist")]
    Missing(TokenId),
    #[error("token {0:?} is not linked into the list")]
    NotLinked(TokenId),
    #[error("token {0:?} is already linked into the list")]
    AlreadyLinked(TokenId),
    #[error("range {first:?}..={last:?} is not a contiguous run")]
    Broken { first: TokenId, last: TokenId },
}

/// Record of one completed splice.
///
/// Consumers holding token references (the node tree) use it to move
/// endpoints off removed tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Splice {
    /// Tokens cut out of the list, in list order. They no longer exist.
    pub removed: Vec<TokenId>,
    /// The run linked in place of `removed`, if any.
    pub inserted: Option<TokenRange>,
    /// Surviving neighbour before the spliced region.
    pub before: Option<TokenId>,
    /// Surviving neighbour after the spliced region.
    pub after: Option<TokenId>,
}

/// The shared token list for one file.
pub struct TokenList {
    source: Box<str>,
    slots: Vec<Option<Token>>,
    head: Option<TokenId>,
    tail: Option<TokenId>,
    len: usize,
}

impl TokenList {
    /// Create an empty list over `source`. Lexed tokens borrow its text.
    pub fn new(source: impl Into<Box<str>>) -> Self {
        TokenList {
            source: source.into(),
            slots: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "token counts are bounded by source length, which fits in u32"
    )]
    fn alloc(&mut self, token: Token) -> TokenId {
        let id = TokenId::from_raw(self.slots.len() as u32);
        self.slots.push(Some(token));
        id
    }

    /// Create a token over `span` of the source and link it at the tail.
    pub fn append(&mut self, kind: TokenKind, span: Span, line: u32) -> TokenId {
        let hash = kind
            .is_hashed()
            .then(|| content_hash(self.source.get(span.to_range()).unwrap_or("")));
        let prev = self.tail;
        let id = self.alloc(Token {
            kind,
            text: TokenText::Source(span),
            line,
            hash,
            prev,
            next: None,
            linked: true,
        });
        self.link(prev, Some(id));
        self.tail = Some(id);
        self.len += 1;
        id
    }

    /// Create a detached token owning `text`.
    pub fn synthesize(&mut self, kind: TokenKind, text: impl Into<Box<str>>, line: u32) -> TokenId {
        let text = text.into();
        let hash = kind.is_hashed().then(|| content_hash(&text));
        self.alloc(Token {
            kind,
            text: TokenText::Owned(text),
            line,
            hash,
            prev: None,
            next: None,
            linked: false,
        })
    }

    /// Chain detached tokens, in order, into one run.
    ///
    /// Returns `None` for an empty slice.
    pub fn chain(&mut self, ids: &[TokenId]) -> Result<Option<TokenRange>, SpliceError> {
        for &id in ids {
            if self.token(id)?.linked {
                return Err(SpliceError::AlreadyLinked(id));
            }
        }
        for (i, &id) in ids.iter().enumerate() {
            let prev = i.checked_sub(1).and_then(|p| ids.get(p)).copied();
            let next = ids.get(i + 1).copied();
            if let Some(token) = self.get_mut(id) {
                token.prev = prev;
                token.next = next;
            }
        }
        Ok(ids
            .first()
            .zip(ids.last())
            .map(|(&first, &last)| TokenRange::new(first, last)))
    }

    // === Access ===

    #[inline]
    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn token(&self, id: TokenId) -> Result<&Token, SpliceError> {
        self.get(id).ok_or(SpliceError::Missing(id))
    }

    #[inline]
    pub fn kind(&self, id: TokenId) -> Option<TokenKind> {
        self.get(id).map(|t| t.kind)
    }

    /// Text of `id`, or `""` for a destroyed token.
    pub fn text(&self, id: TokenId) -> &str {
        self.get(id).map_or("", |t| self.token_text(t))
    }

    pub fn token_text<'a>(&'a self, token: &'a Token) -> &'a str {
        match &token.text {
            TokenText::Source(span) => self.source.get(span.to_range()).unwrap_or(""),
            TokenText::Owned(text) => text,
        }
    }

    /// Line of `id`, or `0` for a destroyed token.
    pub fn line(&self, id: TokenId) -> u32 {
        self.get(id).map_or(0, |t| t.line)
    }

    pub fn hash(&self, id: TokenId) -> Option<u64> {
        self.get(id).and_then(|t| t.hash)
    }

    pub fn is_linked(&self, id: TokenId) -> bool {
        self.get(id).is_some_and(|t| t.linked)
    }

    pub fn head(&self) -> Option<TokenId> {
        self.head
    }

    pub fn tail(&self) -> Option<TokenId> {
        self.tail
    }

    /// Number of linked tokens.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.get(id).and_then(|t| t.next)
    }

    #[inline]
    pub fn prev(&self, id: TokenId) -> Option<TokenId> {
        self.get(id).and_then(|t| t.prev)
    }

    /// First non-trivia token at or after `id`.
    pub fn significant_from(&self, id: TokenId) -> Option<TokenId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !self.kind(current)?.is_trivia() {
                return Some(current);
            }
            cursor = self.next(current);
        }
        None
    }

    /// First non-trivia token after `id`.
    pub fn next_significant(&self, id: TokenId) -> Option<TokenId> {
        self.next(id).and_then(|next| self.significant_from(next))
    }

    /// Last non-trivia token before `id`.
    pub fn prev_significant(&self, id: TokenId) -> Option<TokenId> {
        let mut cursor = self.prev(id);
        while let Some(current) = cursor {
            if !self.kind(current)?.is_trivia() {
                return Some(current);
            }
            cursor = self.prev(current);
        }
        None
    }

    /// All linked tokens, head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            cursor: self.head,
            last: self.tail,
        }
    }

    /// Tokens of an inclusive range.
    pub fn range(&self, range: TokenRange) -> Iter<'_> {
        Iter {
            list: self,
            cursor: Some(range.first),
            last: Some(range.last),
        }
    }

    /// Concatenated text of all linked tokens.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for id in self.iter() {
            out.push_str(self.text(id));
        }
        out
    }

    /// Line ending the file uses: the text of its first `Eol` token, or
    /// `"\n"` when it has none.
    pub fn newline(&self) -> &str {
        self.iter()
            .find(|&id| self.kind(id) == Some(TokenKind::Eol))
            .map_or("\n", |id| self.text(id))
    }

    // === Splicing ===

    fn link(&mut self, a: Option<TokenId>, b: Option<TokenId>) {
        match a {
            Some(a) => {
                if let Some(token) = self.get_mut(a) {
                    token.next = b;
                }
            }
            None => self.head = b,
        }
        match b {
            Some(b) => {
                if let Some(token) = self.get_mut(b) {
                    token.prev = a;
                }
            }
            None => self.tail = a,
        }
    }

    /// Walk `range` and check every token has the expected residency.
    fn walk(&self, range: TokenRange, linked: bool) -> Result<Vec<TokenId>, SpliceError> {
        let mut ids = Vec::new();
        let mut cursor = Some(range.first);
        while let Some(id) = cursor {
            let token = self.token(id)?;
            if token.linked != linked {
                return Err(if linked {
                    SpliceError::NotLinked(id)
                } else {
                    SpliceError::AlreadyLinked(id)
                });
            }
            ids.push(id);
            if id == range.last {
                return Ok(ids);
            }
            cursor = token.next;
        }
        Err(SpliceError::Broken {
            first: range.first,
            last: range.last,
        })
    }

    fn mark_linked(&mut self, ids: &[TokenId]) {
        for &id in ids {
            if let Some(token) = self.get_mut(id) {
                token.linked = true;
            }
        }
        self.len += ids.len();
    }

    fn destroy(&mut self, ids: &[TokenId]) {
        for &id in ids {
            if let Some(slot) = self.slots.get_mut(id.index()) {
                *slot = None;
            }
        }
    }

    /// Replace the linked run `old` with the detached run `new`.
    ///
    /// With `new == None` this is a pure deletion. The removed tokens are
    /// destroyed. Validation happens before any link is touched, so an error
    /// leaves the list unchanged.
    pub fn replace(
        &mut self,
        old: TokenRange,
        new: Option<TokenRange>,
    ) -> Result<Splice, SpliceError> {
        let removed = self.walk(old, true)?;
        let inserted = match new {
            Some(run) => self.walk(run, false)?,
            None => Vec::new(),
        };

        let before = self.prev(old.first);
        let after = self.next(old.last);

        match new {
            Some(run) => {
                self.link(before, Some(run.first));
                self.link(Some(run.last), after);
                self.mark_linked(&inserted);
            }
            None => self.link(before, after),
        }

        self.destroy(&removed);
        self.len -= removed.len();

        Ok(Splice {
            removed,
            inserted: new,
            before,
            after,
        })
    }

    /// Link the detached run immediately before `anchor`.
    pub fn insert_before(
        &mut self,
        anchor: TokenId,
        run: TokenRange,
    ) -> Result<Splice, SpliceError> {
        if !self.token(anchor)?.linked {
            return Err(SpliceError::NotLinked(anchor));
        }
        let inserted = self.walk(run, false)?;
        let before = self.prev(anchor);
        self.link(before, Some(run.first));
        self.link(Some(run.last), Some(anchor));
        self.mark_linked(&inserted);
        Ok(Splice {
            removed: Vec::new(),
            inserted: Some(run),
            before,
            after: Some(anchor),
        })
    }

    /// Link the detached run immediately after `anchor`.
    pub fn insert_after(
        &mut self,
        anchor: TokenId,
        run: TokenRange,
    ) -> Result<Splice, SpliceError> {
        if !self.token(anchor)?.linked {
            return Err(SpliceError::NotLinked(anchor));
        }
        let inserted = self.walk(run, false)?;
        let after = self.next(anchor);
        self.link(Some(anchor), Some(run.first));
        self.link(Some(run.last), after);
        self.mark_linked(&inserted);
        Ok(Splice {
            removed: Vec::new(),
            inserted: Some(run),
            before: Some(anchor),
            after,
        })
    }

    /// Destroy a detached run that will never be linked.
    pub fn discard(&mut self, run: TokenRange) -> Result<(), SpliceError> {
        let ids = self.walk(run, false)?;
        self.destroy(&ids);
        Ok(())
    }

    /// Destroy every token, head to tail, then any detached leftovers.
    pub fn delete_all(&mut self) {
        let mut cursor = self.head;
        while let Some(id) = cursor {
            cursor = self.next(id);
            if let Some(slot) = self.slots.get_mut(id.index()) {
                *slot = None;
            }
        }
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }
}

impl fmt::Debug for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenList")
            .field("len", &self.len)
            .field("slots", &self.slots.len())
            .field("head", &self.head)
            .field("tail", &self.tail)
            .finish_non_exhaustive()
    }
}

/// Iterator over token ids following `next` links.
pub struct Iter<'a> {
    list: &'a TokenList,
    cursor: Option<TokenId>,
    last: Option<TokenId>,
}

impl Iterator for Iter<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let id = self.cursor?;
        self.cursor = if Some(id) == self.last {
            None
        } else {
            self.list.next(id)
        };
        Some(id)
    }
}

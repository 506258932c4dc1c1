//! Parser cursor and top-level dispatch.
//!
//! [`Parser::next_node`] parses one top-level construct per call and links
//! it under the root. It returns `None` at the end of input or after a
//! syntax error; [`Parser::error`] tells the two apart.

mod block;
mod item;

use kpp_ir::{NodeId, NodeKind, NodeTree, TokenId, TokenKind, TokenList, TokenRange};
use tracing::debug;

use crate::cursor::Cursor;
use crate::{ParseError, ParseErrorKind};

pub(crate) type PResult<T> = Result<T, ParseError>;

/// Skeleton parser over one token list.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    tree: NodeTree,
    error: Option<ParseError>,
    finished: bool,
}

impl<'a> Parser<'a> {
    pub fn new(list: &'a TokenList) -> Self {
        let mut tree = NodeTree::new();
        let whole = list
            .head()
            .zip(list.tail())
            .map(|(head, tail)| TokenRange::new(head, tail));
        tree.set_tokens(tree.root(), whole);
        Parser {
            cursor: Cursor::new(list),
            tree,
            error: None,
            finished: false,
        }
    }

    /// Parse the next top-level node and append it to the root.
    pub fn next_node(&mut self) -> Option<NodeId> {
        if self.finished {
            return None;
        }
        match self.top_level() {
            Ok(Some(node)) => {
                let root = self.tree.root();
                self.tree.append_child(root, node);
                Some(node)
            }
            Ok(None) => {
                self.finished = true;
                debug!(nodes = self.tree.len(), "parsed");
                None
            }
            Err(err) => {
                self.finished = true;
                debug!(%err, "parse error");
                self.error = Some(err);
                None
            }
        }
    }

    /// The error that stopped parsing, if any.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// The tree built so far.
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Parse the remaining input and hand over the tree.
    pub fn finish(mut self) -> Result<NodeTree, ParseError> {
        while self.next_node().is_some() {}
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.tree),
        }
    }

    fn top_level(&mut self) -> PResult<Option<NodeId>> {
        let Some(kind) = self.cursor.peek_kind() else {
            return Ok(None);
        };
        let node = match kind {
            _ if self.at_linkage_block() => self.linkage_block()?,
            TokenKind::Hash => self.directive()?,
            TokenKind::Typedef => self.typedef()?,
            TokenKind::Struct => self.struct_item()?,
            TokenKind::Semicolon => self.lone_token()?,
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                return Err(self.error_here(ParseErrorKind::Unbalanced { found: kind }));
            }
            _ => self.declaration()?,
        };
        Ok(Some(node))
    }

    // === Helpers ===

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(self.cursor.line(), kind)
    }

    fn eof(&self, expected: TokenKind) -> ParseError {
        ParseError::new(
            self.cursor.last_line(),
            ParseErrorKind::UnexpectedEof { expected },
        )
    }

    /// Consume the next significant token, which must be `expected`.
    fn bump_expected(&mut self, expected: TokenKind) -> PResult<TokenId> {
        match self.cursor.peek_kind() {
            Some(found) if found == expected => {
                self.cursor.bump().ok_or_else(|| self.eof(expected))
            }
            Some(found) => {
                Err(self.error_here(ParseErrorKind::UnexpectedToken { found, expected }))
            }
            None => Err(self.eof(expected)),
        }
    }

    /// Kind of the `n`th significant token ahead (`0` is the next one).
    fn nth_kind(&self, n: usize) -> Option<TokenKind> {
        let list = self.cursor.list();
        let mut id = self.cursor.peek()?;
        for _ in 0..n {
            id = list.next_significant(id)?;
        }
        list.kind(id)
    }

    /// Close `node`'s range at the last consumed token.
    fn close(&mut self, node: NodeId, first: TokenId) {
        let last = self.cursor.last().unwrap_or(first);
        self.tree.set_tokens(node, Some(TokenRange::new(first, last)));
    }

    fn first_token(&self, expected: TokenKind) -> PResult<TokenId> {
        self.cursor.peek().ok_or_else(|| self.eof(expected))
    }

    /// A lone token, e.g. a stray `;`.
    fn lone_token(&mut self) -> PResult<NodeId> {
        let id = self.cursor.bump().ok_or_else(|| self.eof(TokenKind::Semicolon))?;
        Ok(self
            .tree
            .alloc(NodeKind::Token, Some(TokenRange::single(id))))
    }
}

/// Parse a whole token list.
pub fn parse(list: &TokenList) -> Result<NodeTree, ParseError> {
    Parser::new(list).finish()
}

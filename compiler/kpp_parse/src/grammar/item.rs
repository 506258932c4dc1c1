//! Top-level items: directives, typedefs, structs and functions.

use kpp_ir::{NodeId, NodeKind, TokenId, TokenKind, TokenList, TokenRange};
use tracing::trace;

use super::{PResult, Parser};
use crate::ParseErrorKind;

/// Symbols whose parenthesized argument is never a parameter list.
const NON_DECLARATOR_CALLS: &[&str] = &[
    "__attribute__",
    "__declspec",
    "__launch_bounds__",
    "__align__",
    "_Alignas",
    "alignas",
    "__asm__",
    "asm",
];

/// Outcome of looking ahead over a top-level declaration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Shape {
    Function {
        /// The parameter list's `(`.
        open: TokenId,
        /// `{` of the body, or the `;` ending a prototype.
        terminator: TokenId,
        body: bool,
    },
    Statement,
}

impl Parser<'_> {
    /// `#` up to the first newline not preceded by `\`.
    pub(super) fn directive(&mut self) -> PResult<NodeId> {
        let first = self.bump_expected(TokenKind::Hash)?;
        let list = self.cursor.list();
        let mut continued = false;
        while let Some(id) = self.cursor.peek_raw() {
            match list.kind(id) {
                Some(TokenKind::Eol) if !continued => break,
                Some(TokenKind::Backslash) => continued = true,
                Some(TokenKind::Whitespace) => {}
                _ => continued = false,
            }
            self.cursor.bump_raw();
        }
        let node = self.tree.alloc(NodeKind::PpDirective, None);
        self.close(node, first);
        Ok(node)
    }

    /// `extern "C" {` is next.
    pub(super) fn at_linkage_block(&self) -> bool {
        let list = self.cursor.list();
        self.cursor.peek().is_some_and(|id| list.text(id) == "extern")
            && self.nth_kind(1) == Some(TokenKind::String)
            && self.nth_kind(2) == Some(TokenKind::LBrace)
    }

    /// `extern "C" { ... }`, its items parsed as at file scope.
    pub(super) fn linkage_block(&mut self) -> PResult<NodeId> {
        let first = self.first_token(TokenKind::LBrace)?;
        let node = self.tree.alloc(NodeKind::LinkageBlock, None);
        self.cursor.bump();
        self.bump_expected(TokenKind::String)?;
        self.bump_expected(TokenKind::LBrace)?;
        loop {
            match self.cursor.peek_kind() {
                None => return Err(self.eof(TokenKind::RBrace)),
                Some(TokenKind::RBrace) => break,
                Some(_) => {
                    if let Some(child) = self.top_level()? {
                        self.tree.append_child(node, child);
                    }
                }
            }
        }
        self.bump_expected(TokenKind::RBrace)?;
        self.close(node, first);
        Ok(node)
    }

    /// `typedef ... ;`, with a struct definition child when present.
    pub(super) fn typedef(&mut self) -> PResult<NodeId> {
        let first = self.bump_expected(TokenKind::Typedef)?;
        let node = self.tree.alloc(NodeKind::Typedef, None);
        if self.at_struct_body() {
            let defn = self.struct_head()?;
            self.tree.append_child(node, defn);
            self.declarators(node)?;
        } else {
            self.statement_tail(node, true)?;
        }
        self.close(node, first);
        Ok(node)
    }

    /// `struct Tag;`, `struct [Tag] { ... } names;`, or a declaration that
    /// merely starts with `struct`.
    pub(super) fn struct_item(&mut self) -> PResult<NodeId> {
        if self.nth_kind(1) == Some(TokenKind::Symbol)
            && self.nth_kind(2) == Some(TokenKind::Semicolon)
        {
            let first = self.bump_expected(TokenKind::Struct)?;
            let node = self.tree.alloc(NodeKind::StructDecl, None);
            let tag = self.bump_expected(TokenKind::Symbol)?;
            let tag = self
                .tree
                .alloc(NodeKind::StructTag, Some(TokenRange::single(tag)));
            self.tree.append_child(node, tag);
            self.bump_expected(TokenKind::Semicolon)?;
            self.close(node, first);
            return Ok(node);
        }

        if self.at_struct_body() {
            let first = self.first_token(TokenKind::Struct)?;
            let node = self.struct_head()?;
            self.declarators(node)?;
            self.close(node, first);
            return Ok(node);
        }

        self.declaration()
    }

    /// `struct [Tag] {` is next.
    fn at_struct_body(&self) -> bool {
        self.nth_kind(0) == Some(TokenKind::Struct)
            && (self.nth_kind(1) == Some(TokenKind::LBrace)
                || (self.nth_kind(1) == Some(TokenKind::Symbol)
                    && self.nth_kind(2) == Some(TokenKind::LBrace)))
    }

    /// `struct [Tag] { ... }` as a StructDefn ending at the `}`.
    fn struct_head(&mut self) -> PResult<NodeId> {
        let first = self.bump_expected(TokenKind::Struct)?;
        let node = self.tree.alloc(NodeKind::StructDefn, None);
        if self.cursor.peek_kind() == Some(TokenKind::Symbol) {
            let tag = self.bump_expected(TokenKind::Symbol)?;
            let tag = self
                .tree
                .alloc(NodeKind::StructTag, Some(TokenRange::single(tag)));
            self.tree.append_child(node, tag);
        }
        let body = self.block()?;
        self.tree.append_child(node, body);
        self.close(node, first);
        Ok(node)
    }

    /// Declarators after a struct body, through the `;`.
    ///
    /// Each declared name becomes a StructName child of `parent`.
    fn declarators(&mut self, parent: NodeId) -> PResult<()> {
        let mut in_initializer = false;
        loop {
            let Some(kind) = self.cursor.peek_kind() else {
                return Err(self.eof(TokenKind::Semicolon));
            };
            match kind {
                TokenKind::Semicolon => {
                    self.cursor.bump();
                    return Ok(());
                }
                TokenKind::Symbol if !in_initializer => {
                    let id = self.bump_expected(TokenKind::Symbol)?;
                    let name = self
                        .tree
                        .alloc(NodeKind::StructName, Some(TokenRange::single(id)));
                    self.tree.append_child(parent, name);
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => self.skip_group()?,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                    return Err(self.error_here(ParseErrorKind::UnexpectedToken {
                        found: kind,
                        expected: TokenKind::Semicolon,
                    }));
                }
                TokenKind::Assign => {
                    in_initializer = true;
                    self.cursor.bump();
                }
                TokenKind::Comma => {
                    in_initializer = false;
                    self.cursor.bump();
                }
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// A function declaration/definition, or else a plain statement.
    pub(super) fn declaration(&mut self) -> PResult<NodeId> {
        match self.classify() {
            Shape::Function {
                open,
                terminator,
                body,
            } => self.function(open, terminator, body),
            Shape::Statement => self.statement(),
        }
    }

    fn function(&mut self, open: TokenId, terminator: TokenId, body: bool) -> PResult<NodeId> {
        let first = self.first_token(TokenKind::LParen)?;
        let kind = if body {
            NodeKind::FunctionDefn
        } else {
            NodeKind::FunctionDecl
        };
        let node = self.tree.alloc(kind, None);
        trace!(?kind, line = self.cursor.line(), "function");

        self.cursor.advance_to(open);
        self.skip_group()?;
        let close = self.cursor.last().unwrap_or(open);
        let params = self
            .tree
            .alloc(NodeKind::FunctionParams, Some(TokenRange::new(open, close)));
        self.tree.append_child(node, params);

        while let Some(id) = self.cursor.peek() {
            if id == terminator {
                break;
            }
            match self.cursor.peek_kind() {
                Some(TokenKind::LParen | TokenKind::LBracket) => self.skip_group()?,
                _ => {
                    self.cursor.bump();
                }
            }
        }

        if body {
            let block = self.block()?;
            self.tree.append_child(node, block);
        } else {
            self.bump_expected(TokenKind::Semicolon)?;
        }
        self.close(node, first);
        Ok(node)
    }

    /// Look ahead over the declaration starting at the cursor.
    ///
    /// A function has a parameter list: the first depth-0 `(` directly after
    /// a declarator name, followed only by qualifiers or attribute groups
    /// before `{` or `;`. An `=` at depth 0 makes it a statement.
    fn classify(&self) -> Shape {
        let list = self.cursor.list();
        let mut prev: Option<TokenId> = None;
        let mut params: Option<TokenId> = None;
        let mut cursor = self.cursor.peek();

        while let Some(id) = cursor {
            let Some(kind) = list.kind(id) else {
                break;
            };
            match kind {
                TokenKind::LParen | TokenKind::LBracket => {
                    let Some(close) = matching_close(list, id) else {
                        return Shape::Statement;
                    };
                    if kind == TokenKind::LParen
                        && params.is_none()
                        && is_param_list(list, prev, id)
                    {
                        params = Some(id);
                    }
                    prev = Some(close);
                    cursor = list.next_significant(close);
                    continue;
                }
                TokenKind::Semicolon | TokenKind::LBrace => {
                    return match params {
                        Some(open) => Shape::Function {
                            open,
                            terminator: id,
                            body: kind == TokenKind::LBrace,
                        },
                        None => Shape::Statement,
                    };
                }
                TokenKind::Assign
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace => return Shape::Statement,
                _ if params.is_some() && kind != TokenKind::Symbol => return Shape::Statement,
                _ => {}
            }
            prev = Some(id);
            cursor = list.next_significant(id);
        }
        Shape::Statement
    }
}

/// The token closing the group opened at `open`, ignoring mismatches.
fn matching_close(list: &TokenList, open: TokenId) -> Option<TokenId> {
    let mut depth = 0usize;
    let mut cursor = Some(open);
    while let Some(id) = cursor {
        match list.kind(id)? {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(id);
                }
            }
            _ => {}
        }
        cursor = list.next_significant(id);
    }
    None
}

/// `(` opens a parameter list when it follows a declarator name.
fn is_param_list(list: &TokenList, prev: Option<TokenId>, open: TokenId) -> bool {
    let Some(prev) = prev else {
        return false;
    };
    if list.kind(prev) != Some(TokenKind::Symbol) || NON_DECLARATOR_CALLS.contains(&list.text(prev))
    {
        return false;
    }
    // `(*fp)` and `(^blk)` declare pointers, not functions.
    !matches!(
        list.next_significant(open).and_then(|id| list.kind(id)),
        Some(TokenKind::Star | TokenKind::Caret)
    )
}

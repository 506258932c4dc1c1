//! Statement blocks and statements.

use kpp_ir::{NodeId, NodeKind, TokenKind};
use smallvec::SmallVec;

use super::{PResult, Parser};
use crate::ParseErrorKind;

/// Leading words of statements that keep going after a nested block,
/// e.g. `enum E { A, B } e;`.
const AGGREGATE_KEYWORDS: &[&str] = &["enum", "union", "struct", "class"];

impl Parser<'_> {
    /// `{ ... }` with statement, directive and nested block children.
    pub(super) fn block(&mut self) -> PResult<NodeId> {
        let first = self.bump_expected(TokenKind::LBrace)?;
        let node = self.tree.alloc(NodeKind::StatementBlock, None);
        loop {
            let Some(kind) = self.cursor.peek_kind() else {
                return Err(self.eof(TokenKind::RBrace));
            };
            let child = match kind {
                TokenKind::RBrace => break,
                TokenKind::Hash => self.directive()?,
                TokenKind::LBrace => self.block()?,
                TokenKind::Semicolon => self.lone_token()?,
                TokenKind::RParen | TokenKind::RBracket => {
                    return Err(self.error_here(ParseErrorKind::UnexpectedToken {
                        found: kind,
                        expected: TokenKind::RBrace,
                    }));
                }
                _ => self.statement()?,
            };
            self.tree.append_child(node, child);
        }
        self.bump_expected(TokenKind::RBrace)?;
        self.close(node, first);
        Ok(node)
    }

    /// Tokens up to a depth-0 `;`, the `}` of the enclosing block, or EOF.
    pub(super) fn statement(&mut self) -> PResult<NodeId> {
        let first = self.first_token(TokenKind::Semicolon)?;
        let node = self.tree.alloc(NodeKind::Statement, None);
        let list = self.cursor.list();
        let aggregate = list.kind(first) == Some(TokenKind::Struct)
            || AGGREGATE_KEYWORDS.contains(&list.text(first));
        self.statement_tail(node, aggregate)?;
        self.close(node, first);
        Ok(node)
    }

    /// Consume the rest of a statement into `node`.
    ///
    /// A depth-0 `{` becomes a nested block child. The statement ends at that
    /// block's `}` unless `continue_after_block` is set or an `=` was seen.
    pub(super) fn statement_tail(
        &mut self,
        node: NodeId,
        mut continue_after_block: bool,
    ) -> PResult<()> {
        loop {
            let Some(kind) = self.cursor.peek_kind() else {
                return Ok(());
            };
            match kind {
                TokenKind::Semicolon => {
                    self.cursor.bump();
                    return Ok(());
                }
                TokenKind::RBrace => return Ok(()),
                TokenKind::LBrace => {
                    let block = self.block()?;
                    self.tree.append_child(node, block);
                    if !continue_after_block {
                        return Ok(());
                    }
                }
                TokenKind::LParen | TokenKind::LBracket => self.skip_group()?,
                TokenKind::RParen | TokenKind::RBracket => {
                    return Err(self.error_here(ParseErrorKind::Unbalanced { found: kind }));
                }
                TokenKind::Assign => {
                    continue_after_block = true;
                    self.cursor.bump();
                }
                _ => {
                    self.cursor.bump();
                }
            }
        }
    }

    /// Consume one balanced `( ... )`, `[ ... ]` or `{ ... }` group.
    pub(super) fn skip_group(&mut self) -> PResult<()> {
        let mut open: SmallVec<[TokenKind; 8]> = SmallVec::new();
        loop {
            let Some(kind) = self.cursor.peek_kind() else {
                let expected = open.last().copied().unwrap_or(TokenKind::RParen);
                return Err(self.eof(expected));
            };
            match kind {
                TokenKind::LParen => open.push(TokenKind::RParen),
                TokenKind::LBracket => open.push(TokenKind::RBracket),
                TokenKind::LBrace => open.push(TokenKind::RBrace),
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => match open.pop() {
                    Some(expected) if expected == kind => {}
                    Some(expected) => {
                        return Err(self.error_here(ParseErrorKind::UnexpectedToken {
                            found: kind,
                            expected,
                        }));
                    }
                    None => {
                        return Err(self.error_here(ParseErrorKind::Unbalanced { found: kind }));
                    }
                },
                _ => {}
            }
            self.cursor.bump();
            if open.is_empty() {
                return Ok(());
            }
        }
    }
}

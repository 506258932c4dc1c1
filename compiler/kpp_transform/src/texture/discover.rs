//! Finds texture and surface occurrences and groups them by signature.

use std::hash::Hasher;

use kpp_ir::{NodeId, NodeKind, TokenId, TokenKind, TokenList};
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use tracing::trace;

use super::{ParamName, RefContext, Signature, TextureKind, TextureRef};
use crate::{Processor, TransformError, TransformErrorKind};

/// Occurrence groups, one per distinct signature, in order of first
/// discovery. No tokens are touched.
pub(super) fn discover(processor: &Processor) -> Result<Vec<Vec<TextureRef>>, TransformError> {
    let tree = processor.tree();
    let mut candidates = Vec::new();
    processor.visit(|id, node| {
        if matches!(
            node.kind,
            NodeKind::Statement | NodeKind::FunctionParams | NodeKind::Typedef
        ) {
            candidates.push(id);
        }
        true
    });

    let mut groups: Vec<Vec<TextureRef>> = Vec::new();
    let mut by_key: FxHashMap<u64, usize> = FxHashMap::default();
    for node in candidates {
        let tokens = processor.own_tokens(node);
        let mut scanner = NodeScanner {
            list: processor.tokens(),
            tokens: &tokens,
            node,
            context: None,
        };
        let is_params = tree.kind(node) == Some(NodeKind::FunctionParams);
        for found in scanner.scan(processor, is_params)? {
            let key = signature_key(processor.tokens(), &found);
            trace!(line = found.line, key, "texture occurrence");
            match by_key.get(&key) {
                Some(&index) => groups[index].push(found),
                None => {
                    by_key.insert(key, groups.len());
                    groups.push(vec![found]);
                }
            }
        }
    }
    Ok(groups)
}

/// Deduplication key: the keyword's hash combined with the texel hashes.
fn signature_key(list: &TokenList, found: &TextureRef) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u64(list.hash(found.keyword).unwrap_or_default());
    for &texel in &found.texel {
        hasher.write_u64(list.hash(texel).unwrap_or_default());
    }
    hasher.finish()
}

fn is_sign_word(text: &str) -> bool {
    matches!(text, "signed" | "unsigned")
}

struct NodeScanner<'a> {
    list: &'a TokenList,
    /// Significant own tokens of `node`.
    tokens: &'a [TokenId],
    node: NodeId,
    /// Resolved on the first occurrence in a parameter list.
    context: Option<RefContext>,
}

impl NodeScanner<'_> {
    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).and_then(|&id| self.list.kind(id))
    }

    fn scan(
        &mut self,
        processor: &Processor,
        is_params: bool,
    ) -> Result<Vec<TextureRef>, TransformError> {
        let mut found = Vec::new();
        let mut index = 0;
        while let Some(&keyword) = self.tokens.get(index) {
            let signature = (self.list.kind(keyword) == Some(TokenKind::Symbol))
                .then(|| Signature::from_keyword(self.list.text(keyword)))
                .flatten();
            let Some(signature) = signature else {
                index += 1;
                continue;
            };
            let line = self.list.line(keyword);
            let (texel, end_index) = match signature.kind {
                TextureKind::Texture => self.texel(index, line)?,
                TextureKind::Surface => (SmallVec::new(), index),
            };
            let end = self.tokens.get(end_index).copied().unwrap_or(keyword);
            let (context, param) = if is_params {
                let param = self.param_name(end_index + 1, keyword, line)?;
                (self.param_context(processor)?, Some(param))
            } else {
                (RefContext::Declaration, None)
            };
            found.push(TextureRef {
                kind: signature.kind,
                node: self.node,
                line,
                keyword,
                texel,
                end,
                context,
                param,
            });
            index = end_index + 1;
        }
        Ok(found)
    }

    fn error(
        &self,
        line: u32,
        keyword: TokenId,
        make: fn(String) -> TransformErrorKind,
    ) -> TransformError {
        TransformError::new(line, make(self.list.text(keyword).to_string()))
    }

    /// Validate `<texel>` after the keyword at `index`. Returns the texel
    /// tokens and the index of `>`.
    fn texel(
        &self,
        index: usize,
        line: u32,
    ) -> Result<(SmallVec<[TokenId; 2]>, usize), TransformError> {
        let keyword = self.tokens[index];
        if self.kind_at(index + 1) != Some(TokenKind::Less) {
            return Err(self.error(line, keyword, |keyword| {
                TransformErrorKind::MissingOpenAngle { keyword }
            }));
        }
        let mut at = index + 2;
        let first = match self.tokens.get(at) {
            Some(&id) if self.list.kind(id) == Some(TokenKind::Symbol) => id,
            _ => {
                return Err(self.error(line, keyword, |keyword| {
                    TransformErrorKind::MissingTexelType { keyword }
                }))
            }
        };
        let mut texel = SmallVec::new();
        texel.push(first);
        at += 1;

        let first_text = self.list.text(first);
        if is_sign_word(first_text) {
            let bad = |word: &str| {
                TransformError::new(
                    line,
                    TransformErrorKind::BadSignedness {
                        word: word.to_string(),
                    },
                )
            };
            match self.tokens.get(at) {
                Some(&id) if self.list.kind(id) == Some(TokenKind::Symbol) => {
                    let text = self.list.text(id);
                    if is_sign_word(text) {
                        return Err(bad(text));
                    }
                    texel.push(id);
                    at += 1;
                }
                _ => return Err(bad(first_text)),
            }
        }

        if self.kind_at(at) != Some(TokenKind::Greater) {
            return Err(self.error(line, keyword, |keyword| {
                TransformErrorKind::MissingCloseAngle { keyword }
            }));
        }
        Ok((texel, at))
    }

    /// The parameter declarator starting at `start`: its name is the last
    /// symbol before the `,` or `)` that ends it.
    fn param_name(
        &self,
        start: usize,
        keyword: TokenId,
        line: u32,
    ) -> Result<ParamName, TransformError> {
        let missing = || {
            self.error(line, keyword, |keyword| {
                TransformErrorKind::MissingParamName { keyword }
            })
        };
        let Some(&first) = self.tokens.get(start) else {
            return Err(missing());
        };
        if self.list.kind(first) != Some(TokenKind::Symbol) {
            return Err(missing());
        }
        let (mut name, mut last) = (first, first);
        let mut depth = 0usize;
        for &id in &self.tokens[start..] {
            match self.list.kind(id) {
                Some(TokenKind::LParen | TokenKind::LBracket) => depth += 1,
                Some(TokenKind::RParen | TokenKind::RBracket) => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => break,
                },
                Some(TokenKind::Comma) if depth == 0 => break,
                Some(TokenKind::Symbol) if depth == 0 => name = id,
                _ => {}
            }
            last = id;
        }
        Ok(ParamName {
            token: name,
            text: self.list.text(name).to_string(),
            last,
        })
    }

    /// Context of the function owning this parameter list.
    fn param_context(&mut self, processor: &Processor) -> Result<RefContext, TransformError> {
        if let Some(context) = &self.context {
            return Ok(context.clone());
        }
        let tree = processor.tree();
        let context = match tree.parent(self.node) {
            Some(function) if kpp_parse::is_kernel(self.list, tree, function) => {
                let name = kpp_parse::function_name(self.list, tree, function).ok_or_else(|| {
                    let line = tree
                        .tokens(function)
                        .map_or(0, |range| self.list.line(range.first));
                    TransformError::new(line, TransformErrorKind::NoFunctionName)
                })?;
                RefContext::KernelParam {
                    function,
                    function_name: self.list.text(name).to_string(),
                    definition: tree.kind(function) == Some(NodeKind::FunctionDefn),
                }
            }
            _ => RefContext::Param,
        };
        self.context = Some(context.clone());
        Ok(context)
    }
}

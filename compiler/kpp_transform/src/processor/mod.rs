//! Per-file owner of the token list and node tree.
//!
//! A [`Processor`] lexes and parses one file, then lends itself mutably to
//! each transform in turn. Every structural edit goes through the methods
//! here so the tree's token ranges stay in step with the list:
//!
//! - [`Processor::replace_tokens`] splices the list and remaps node
//!   endpoints off removed tokens.
//! - The `insert_user_node_*` methods link a synthesized run and wrap it in
//!   a `UserTokens` node at the matching tree position.

use std::io;

use kpp_ir::{Node, NodeId, NodeKind, NodeTree, TokenId, TokenList, TokenRange};
use tracing::{debug, trace};

use crate::run::RunBuilder;
use crate::{
    ProcessError, ProcessorConfig, Transform, TransformError, TransformErrorKind,
    TransformRegistry,
};

pub struct Processor {
    config: ProcessorConfig,
    tokens: TokenList,
    tree: NodeTree,
    /// Line ending of synthesized lines, taken from the source.
    newline: Box<str>,
    /// Instantiated from the registry on the first `apply_transforms`.
    transforms: Option<Vec<Box<dyn Transform>>>,
}

impl Processor {
    /// Lex and parse `source`.
    pub fn load(config: ProcessorConfig, source: &str) -> Result<Self, ProcessError> {
        let tokens = kpp_lexer::lex(source)?;
        let tree = kpp_parse::parse(&tokens)?;
        let newline = tokens.newline().into();
        debug!(
            file = %config.file_name,
            tokens = tokens.len(),
            nodes = tree.len(),
            "loaded"
        );
        Ok(Processor {
            config,
            tokens,
            tree,
            newline,
            transforms: None,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Pre-order walk of the tree; `visit` returns `false` to stop.
    pub fn visit(&self, visit: impl FnMut(NodeId, &Node) -> bool) -> bool {
        self.tree.visit(visit)
    }

    /// Significant tokens of `node` that no child node covers, in order.
    pub fn own_tokens(&self, node: NodeId) -> Vec<TokenId> {
        let Some(range) = self.tree.tokens(node) else {
            return Vec::new();
        };
        let mut children = self
            .tree
            .children(node)
            .filter_map(|c| self.tree.tokens(c))
            .peekable();
        let mut skip_to = None;
        let mut own = Vec::new();
        for id in self.tokens.range(range) {
            if let Some(end) = skip_to {
                if id == end {
                    skip_to = None;
                }
                continue;
            }
            if let Some(child) = children.next_if(|c| c.first == id) {
                if child.last != id {
                    skip_to = Some(child.last);
                }
                continue;
            }
            if self.tokens.kind(id).is_some_and(|k| !k.is_trivia()) {
                own.push(id);
            }
        }
        own
    }

    /// Start a detached run whose tokens report `line`. Its line breaks
    /// follow the file's.
    pub fn run(&mut self, line: u32) -> RunBuilder<'_> {
        RunBuilder::new(&mut self.tokens, line).with_eol(&self.newline)
    }

    /// Replace the linked run `old` with the detached run `new` (or delete
    /// it), keeping node ranges valid.
    pub fn replace_tokens(
        &mut self,
        old: TokenRange,
        new: Option<TokenRange>,
    ) -> Result<(), TransformError> {
        let splice = self.tokens.replace(old, new)?;
        trace!(
            removed = splice.removed.len(),
            inserted = new.is_some(),
            "replaced tokens"
        );
        self.tree.remap(&splice);
        Ok(())
    }

    fn node_range(&self, node: NodeId) -> Result<TokenRange, TransformError> {
        self.tree.tokens(node).ok_or_else(|| {
            TransformError::new(0, TransformErrorKind::Internal("node spans no tokens"))
        })
    }

    /// Link `run` before `sibling`'s first token and add a `UserTokens`
    /// node for it as `sibling`'s previous sibling.
    pub fn insert_user_node_before(
        &mut self,
        sibling: NodeId,
        run: TokenRange,
    ) -> Result<NodeId, TransformError> {
        let anchor = self.node_range(sibling)?.first;
        self.tokens.insert_before(anchor, run)?;
        let node = self.tree.alloc(NodeKind::UserTokens, Some(run));
        self.tree.insert_before(sibling, node);
        self.extend_ancestors(node, |range| {
            (range.first == anchor).then_some(TokenRange::new(run.first, range.last))
        });
        Ok(node)
    }

    /// Link `run` after `sibling`'s last token and add a `UserTokens` node
    /// for it as `sibling`'s next sibling.
    pub fn insert_user_node_after(
        &mut self,
        sibling: NodeId,
        run: TokenRange,
    ) -> Result<NodeId, TransformError> {
        let anchor = self.node_range(sibling)?.last;
        self.tokens.insert_after(anchor, run)?;
        let node = self.tree.alloc(NodeKind::UserTokens, Some(run));
        self.tree.insert_after(sibling, node);
        self.extend_ancestors(node, |range| {
            (range.last == anchor).then_some(TokenRange::new(range.first, run.last))
        });
        Ok(node)
    }

    /// Link `run` right after `parent`'s first token (a block's `{`) and add
    /// a `UserTokens` node for it as `parent`'s first child.
    pub fn insert_user_node_first_child(
        &mut self,
        parent: NodeId,
        run: TokenRange,
    ) -> Result<NodeId, TransformError> {
        let anchor = self.node_range(parent)?.first;
        self.tokens.insert_after(anchor, run)?;
        let node = self.tree.alloc(NodeKind::UserTokens, Some(run));
        self.tree.prepend_child(parent, node);
        self.extend_ancestors(node, |range| {
            (range.last == anchor).then_some(TokenRange::new(range.first, run.last))
        });
        Ok(node)
    }

    /// Apply `widen` to `node`'s ancestors, innermost first, until it
    /// declines.
    fn extend_ancestors(&mut self, node: NodeId, widen: impl Fn(TokenRange) -> Option<TokenRange>) {
        let ancestors: Vec<_> = self.tree.ancestors(node).collect();
        for ancestor in ancestors {
            match self.tree.tokens(ancestor).and_then(&widen) {
                Some(range) => self.tree.set_tokens(ancestor, Some(range)),
                None => break,
            }
        }
    }

    /// Run every registered transform once, in order, stopping at the first
    /// error.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %self.config.file_name))]
    pub fn apply_transforms(&mut self, registry: &TransformRegistry) -> Result<(), ProcessError> {
        let mut transforms = match self.transforms.take() {
            Some(transforms) => transforms,
            None => registry.instantiate(&self.config),
        };
        let mut result = Ok(());
        for transform in &mut transforms {
            let name = transform.name();
            debug!(transform = name, "applying");
            if let Err(error) = transform.apply(self) {
                debug!(transform = name, %error, "transform failed");
                result = Err(ProcessError::Transform {
                    transform: name,
                    error,
                });
                break;
            }
        }
        self.transforms = Some(transforms);
        result
    }

    /// Names of the instantiated transforms; empty before the first
    /// `apply_transforms`.
    pub fn transform_names(&self) -> Vec<&'static str> {
        self.transforms
            .iter()
            .flatten()
            .map(|t| t.name())
            .collect()
    }

    /// Write every linked token's text, head to tail.
    pub fn emit<W: io::Write>(&self, out: &mut W) -> io::Result<()> {
        for id in self.tokens.iter() {
            out.write_all(self.tokens.text(id).as_bytes())?;
        }
        out.flush()
    }

    pub fn emit_to_string(&self) -> String {
        self.tokens.to_text()
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        trace!(tokens = self.tokens.len(), "releasing token list");
        self.tokens.delete_all();
    }
}

impl std::fmt::Debug for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Processor")
            .field("config", &self.config)
            .field("tokens", &self.tokens.len())
            .field("nodes", &self.tree.len())
            .field("transforms", &self.transform_names())
            .finish()
    }
}

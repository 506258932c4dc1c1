//! Syntax skeleton nodes.
//!
//! Nodes form a first-child/next-sibling tree. Each node references an
//! inclusive range of the token list and owns no text. A node's range is
//! contiguous in the list, child ranges nest inside the parent's range and
//! sibling ranges never overlap.
//!
//! # Design
//!
//! Nodes live in an arena addressed by [`NodeId`]. Parent links are kept so
//! transforms can walk from an occurrence up to its enclosing container.
//! When the token list is spliced, [`NodeTree::remap`] moves endpoints that
//! pointed at removed tokens onto the replacement run or the surviving
//! neighbour.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::{Splice, TokenId, TokenRange};

/// Stable handle to a node slot in a [`NodeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Node kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeKind {
    /// Children container for the whole file. Carries no syntax of its own.
    Root,
    /// `#...` line, continuation lines included.
    PpDirective,
    /// Tokens up to a terminating `;` or a closing block.
    Statement,
    /// `{ ... }` with statement children.
    StatementBlock,
    /// Function with a body.
    FunctionDefn,
    /// Function prototype ending in `;`.
    FunctionDecl,
    /// `( ... )` parameter list of a function.
    FunctionParams,
    /// `struct Tag { ... } name;`
    StructDefn,
    /// `struct Tag;`
    StructDecl,
    /// The tag symbol after `struct`.
    StructTag,
    /// A declarator after a struct body.
    StructName,
    /// `typedef ... ;`
    Typedef,
    /// `extern "C" { ... }`; its children are file-scope items.
    LinkageBlock,
    /// A single token the grammar does not otherwise classify.
    Token,
    /// Tokens synthesized by a transform.
    UserTokens,
}

impl NodeKind {
    pub fn is_function(self) -> bool {
        matches!(self, NodeKind::FunctionDefn | NodeKind::FunctionDecl)
    }
}

/// One node of the skeleton.
#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    /// Inclusive token range, `None` only for an empty root.
    pub tokens: Option<TokenRange>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn last_child(&self) -> Option<NodeId> {
        self.last_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    pub fn first_token(&self) -> Option<TokenId> {
        self.tokens.map(|r| r.first)
    }

    pub fn last_token(&self) -> Option<TokenId> {
        self.tokens.map(|r| r.last)
    }
}

/// Arena-backed node tree with a fixed root.
pub struct NodeTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    /// A tree holding only the root.
    pub fn new() -> Self {
        let mut tree = NodeTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.alloc(NodeKind::Root, None);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a node that is not yet part of the tree.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "node counts are bounded by token counts"
    )]
    pub fn alloc(&mut self, kind: NodeKind, tokens: Option<TokenRange>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            kind,
            tokens,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }));
        id
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| n.kind)
    }

    pub fn tokens(&self, id: NodeId) -> Option<TokenRange> {
        self.get(id).and_then(|n| n.tokens)
    }

    pub fn set_tokens(&mut self, id: NodeId, tokens: Option<TokenRange>) {
        if let Some(node) = self.get_mut(id) {
            node.tokens = tokens;
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.first_child(self.root).is_none()
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            cursor: self.first_child(id),
        }
    }

    /// Parent, grandparent, ... up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// The ancestor-or-self that is a direct child of the root.
    pub fn top_level(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root {
                return Some(current);
            }
            current = parent;
        }
    }

    /// The ancestor-or-self that sits at file scope: a child of the root or
    /// of a linkage block.
    pub fn container(&self, id: NodeId) -> Option<NodeId> {
        let mut current = id;
        loop {
            let parent = self.parent(current)?;
            if parent == self.root || self.kind(parent) == Some(NodeKind::LinkageBlock) {
                return Some(current);
            }
            current = parent;
        }
    }

    fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        self.children(parent)
            .take_while(|&c| c != id)
            .last()
    }

    // === Linking ===

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let last = self.get(parent).and_then(|n| n.last_child);
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
            node.next_sibling = None;
        }
        match last {
            Some(last) => {
                if let Some(node) = self.get_mut(last) {
                    node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = Some(child);
                }
            }
        }
        if let Some(node) = self.get_mut(parent) {
            node.last_child = Some(child);
        }
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        match self.first_child(parent) {
            Some(first) => self.insert_before(first, child),
            None => self.append_child(parent, child),
        }
    }

    /// Link `node` as the sibling immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        let prev = self.prev_sibling(sibling);
        if let Some(n) = self.get_mut(node) {
            n.parent = Some(parent);
            n.next_sibling = Some(sibling);
        }
        match prev {
            Some(prev) => {
                if let Some(n) = self.get_mut(prev) {
                    n.next_sibling = Some(node);
                }
            }
            None => {
                if let Some(n) = self.get_mut(parent) {
                    n.first_child = Some(node);
                }
            }
        }
    }

    /// Link `node` as the sibling immediately after `sibling`.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        let next = self.next_sibling(sibling);
        if let Some(n) = self.get_mut(node) {
            n.parent = Some(parent);
            n.next_sibling = next;
        }
        if let Some(n) = self.get_mut(sibling) {
            n.next_sibling = Some(node);
        }
        if next.is_none() {
            if let Some(n) = self.get_mut(parent) {
                n.last_child = Some(node);
            }
        }
    }

    /// Unlink `id` from its parent and destroy it with its subtree.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root {
            return;
        }
        if let Some(parent) = self.parent(id) {
            let prev = self.prev_sibling(id);
            let next = self.next_sibling(id);
            match prev {
                Some(prev) => {
                    if let Some(n) = self.get_mut(prev) {
                        n.next_sibling = next;
                    }
                }
                None => {
                    if let Some(n) = self.get_mut(parent) {
                        n.first_child = next;
                    }
                }
            }
            if next.is_none() {
                if let Some(n) = self.get_mut(parent) {
                    n.last_child = prev;
                }
            }
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(current));
            if let Some(slot) = self.nodes.get_mut(current.index()) {
                *slot = None;
            }
        }
    }

    // === Traversal ===

    /// Pre-order depth-first walk from the root.
    ///
    /// `visit` returns `false` to abort; the walk then returns `false`.
    pub fn visit(&self, mut visit: impl FnMut(NodeId, &Node) -> bool) -> bool {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if !visit(id, node) {
                return false;
            }
            let first = stack.len();
            stack.extend(self.children(id));
            stack[first..].reverse();
        }
        true
    }

    /// Node ids in pre-order.
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.visit(|id, _| {
            out.push(id);
            true
        });
        out
    }

    // === Splice bookkeeping ===

    /// Move endpoints off tokens removed by `splice`.
    ///
    /// A node whose whole range was deleted without replacement is removed
    /// from the tree.
    pub fn remap(&mut self, splice: &Splice) {
        if splice.removed.is_empty() {
            return;
        }
        let removed: FxHashSet<TokenId> = splice.removed.iter().copied().collect();
        let mut emptied = Vec::new();

        for (index, slot) in self.nodes.iter_mut().enumerate() {
            let Some(node) = slot else {
                continue;
            };
            let Some(range) = node.tokens else {
                continue;
            };
            let first_gone = removed.contains(&range.first);
            let last_gone = removed.contains(&range.last);
            if !first_gone && !last_gone {
                continue;
            }
            let swallowed = first_gone && last_gone && splice.inserted.is_none();
            let first = if first_gone {
                splice.inserted.map(|r| r.first).or(splice.after)
            } else {
                Some(range.first)
            };
            let last = if last_gone {
                splice.inserted.map(|r| r.last).or(splice.before)
            } else {
                Some(range.last)
            };
            match (first, last) {
                (Some(first), Some(last)) if !swallowed => {
                    node.tokens = Some(TokenRange::new(first, last));
                }
                _ => {
                    node.tokens = None;
                    #[allow(clippy::cast_possible_truncation, reason = "index came from alloc")]
                    let id = NodeId(index as u32);
                    emptied.push(id);
                }
            }
        }

        for id in emptied {
            self.remove(id);
        }
    }
}

impl fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTree")
            .field("len", &self.len())
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// Iterator over the direct children of a node.
pub struct Children<'a> {
    tree: &'a NodeTree,
    cursor: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor?;
        self.cursor = self.tree.next_sibling(id);
        Some(id)
    }
}

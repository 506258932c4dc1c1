//! Lexical shape queries over parsed functions.
//!
//! Kernel detection is a pattern match on a function's leading tokens, not a
//! semantic decision, so the parser stays backend-agnostic.

use kpp_ir::{NodeId, NodeKind, NodeTree, TokenId, TokenKind, TokenList};

/// The FunctionParams child of a function node.
pub fn function_params(tree: &NodeTree, function: NodeId) -> Option<NodeId> {
    tree.children(function)
        .find(|&c| tree.kind(c) == Some(NodeKind::FunctionParams))
}

/// The body StatementBlock of a function definition.
pub fn function_body(tree: &NodeTree, function: NodeId) -> Option<NodeId> {
    tree.children(function)
        .find(|&c| tree.kind(c) == Some(NodeKind::StatementBlock))
}

/// Name token of a function: the nearest symbol before its parameter list.
pub fn function_name(list: &TokenList, tree: &NodeTree, function: NodeId) -> Option<TokenId> {
    let params = function_params(tree, function)?;
    let open = tree.tokens(params)?.first;
    let start = tree.tokens(function)?.first;
    let mut cursor = list.prev_significant(open);
    while let Some(id) = cursor {
        if list.kind(id) == Some(TokenKind::Symbol) {
            return Some(id);
        }
        if id == start {
            break;
        }
        cursor = list.prev_significant(id);
    }
    None
}

/// `true` when the function's leading tokens are `kernel`, `__kernel`,
/// `__global__` or `extern "C" __global__`.
pub fn is_kernel(list: &TokenList, tree: &NodeTree, function: NodeId) -> bool {
    let Some(range) = tree.tokens(function) else {
        return false;
    };
    if !tree.kind(function).is_some_and(NodeKind::is_function) {
        return false;
    }
    let first = range.first;
    match list.text(first) {
        "kernel" | "__kernel" | "__global__" => true,
        "extern" => {
            let Some(linkage) = list.next_significant(first) else {
                return false;
            };
            list.kind(linkage) == Some(TokenKind::String)
                && list.text(linkage) == "\"C\""
                && list
                    .next_significant(linkage)
                    .is_some_and(|id| list.text(id) == "__global__")
        }
        _ => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions use unwrap for clarity")]
mod tests;

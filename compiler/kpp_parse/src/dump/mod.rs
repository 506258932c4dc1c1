//! Human-readable rendering of the node skeleton, for `--dump-tree`.

use std::fmt::Write;

use kpp_ir::{NodeId, NodeTree, TokenList, TokenRange};

const SNIPPET_WIDTH: usize = 48;

/// One line per node, indented by depth: `Kind @line `text``.
pub fn dump_tree(list: &TokenList, tree: &NodeTree) -> String {
    let mut out = String::new();
    dump_node(list, tree, tree.root(), 0, &mut out);
    out
}

fn dump_node(list: &TokenList, tree: &NodeTree, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let _ = write!(out, "{:indent$}{:?}", "", node.kind, indent = depth * 2);
    if id != tree.root() {
        if let Some(range) = node.tokens {
            let _ = write!(out, " @{} `{}`", list.line(range.first), snippet(list, range));
        }
    }
    out.push('\n');
    for child in tree.children(id) {
        dump_node(list, tree, child, depth + 1, out);
    }
}

/// Text of `range` with trivia collapsed to single spaces, cut to a fixed
/// width.
pub fn snippet(list: &TokenList, range: TokenRange) -> String {
    let mut text = String::new();
    for id in list.range(range) {
        if list.kind(id).is_some_and(|k| k.is_trivia()) {
            if !text.is_empty() && !text.ends_with(' ') {
                text.push(' ');
            }
        } else {
            text.push_str(list.text(id));
        }
    }
    if text.chars().count() > SNIPPET_WIDTH {
        let mut cut: String = text.chars().take(SNIPPET_WIDTH - 3).collect();
        cut.push_str("...");
        return cut;
    }
    text
}

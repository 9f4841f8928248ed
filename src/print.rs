//! A diagnostic, tab-indented drawing of a tree.
//!
//! Nodes are visited breadth-first. Every depth gets its own line and each key
//! is pushed right by a number of tabs that halves (roughly) on every level, so
//! children sit under and to either side of their parent:
//!
//! ```text
//!             4
//!     2               6
//! 1       3       5       7
//! ```
//!
//! Only meant for eyeballing a tree while debugging; nothing depends on the
//! exact layout beyond the tests in this file.

use std::collections::VecDeque;
use std::fmt;

use crate::node::{self, BinaryNode};

/// A node waiting in the queue with the line and column it prints at.
struct Pending<'a, N> {
    node: &'a N,
    depth: isize,
    tabs: isize,
}

/// Draws the tree under `root`. An empty tree draws as an empty string.
pub(crate) fn pretty<N>(root: Option<&N>) -> String
where
    N: BinaryNode,
    N::Key: fmt::Display,
{
    let mut out = String::new();
    let Some(root) = root else {
        return out;
    };

    let height = node::levels(Some(root)) as isize;
    let mut queue = VecDeque::new();
    queue.push_back(Pending {
        node: root,
        depth: 0,
        tabs: (1..height).sum(),
    });

    let mut line_depth = 0;
    let mut line_tabs = 0;
    while let Some(Pending { node, depth, tabs }) = queue.pop_front() {
        if depth != line_depth {
            out.push('\n');
            line_depth = depth;
            line_tabs = 0;
        }
        for _ in 0..(tabs - line_tabs).max(0) {
            out.push('\t');
        }
        out.push_str(&node.key().to_string());

        let spread = height - depth - 1;
        if let Some(left) = node.left() {
            queue.push_back(Pending {
                node: left,
                depth: depth + 1,
                tabs: tabs - spread,
            });
        }
        if let Some(right) = node.right() {
            queue.push_back(Pending {
                node: right,
                depth: depth + 1,
                tabs: tabs + spread,
            });
        }
        line_tabs = tabs;
    }

    out
}

//! Pieces shared by both trees: which side of a node a child hangs off, and a
//! read-only view of nodes so traversal, rendering and validation are written
//! once for both node layouts.

use std::fmt;

use crate::InvariantError;

/// Which child of a node we're talking about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    pub(crate) fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// The order in which `render` lists a tree's keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Order {
    /// Left subtree, node, right subtree. Keys come out ascending.
    #[default]
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

/// Read access to a node and its children.
pub(crate) trait BinaryNode: Sized {
    type Key;

    fn key(&self) -> &Self::Key;
    fn left(&self) -> Option<&Self>;
    fn right(&self) -> Option<&Self>;

    fn child(&self, side: Side) -> Option<&Self> {
        match side {
            Side::Left => self.left(),
            Side::Right => self.right(),
        }
    }
}

/// Ascending iterator over the keys below a node. Uses an explicit stack so
/// tall (splay) trees don't blow the call stack.
pub(crate) struct Iter<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: BinaryNode> Iter<'a, N> {
    pub(crate) fn new(root: Option<&'a N>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a N>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left();
        }
    }
}

impl<'a, N> Iterator for Iter<'a, N>
where
    N: BinaryNode,
    N::Key: 'a,
{
    type Item = &'a N::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right());
        Some(node.key())
    }
}

fn pre_order<N: BinaryNode>(root: Option<&N>) -> Vec<&N::Key> {
    let mut keys = Vec::new();
    let mut pending: Vec<&N> = root.into_iter().collect();
    while let Some(node) = pending.pop() {
        keys.push(node.key());
        pending.extend(node.right());
        pending.extend(node.left());
    }
    keys
}

fn post_order<N: BinaryNode>(root: Option<&N>) -> Vec<&N::Key> {
    // Node, right, left, reversed.
    let mut keys = Vec::new();
    let mut pending: Vec<&N> = root.into_iter().collect();
    while let Some(node) = pending.pop() {
        keys.push(node.key());
        pending.extend(node.left());
        pending.extend(node.right());
    }
    keys.reverse();
    keys
}

/// `Display`s the keys below a node as `[k1,k2,...]`.
pub(crate) struct Keys<'a, N> {
    root: Option<&'a N>,
    order: Order,
}

impl<'a, N> Keys<'a, N> {
    pub(crate) fn new(root: Option<&'a N>, order: Order) -> Self {
        Self { root, order }
    }
}

impl<N> fmt::Display for Keys<'_, N>
where
    N: BinaryNode,
    N::Key: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = match self.order {
            Order::InOrder => Iter::new(self.root).collect(),
            Order::PreOrder => pre_order(self.root),
            Order::PostOrder => post_order(self.root),
        };

        f.write_str("[")?;
        for (i, key) in keys.into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", key)?;
        }
        f.write_str("]")
    }
}

/// The furthest node on `side`, e.g. the minimum for `Side::Left`.
pub(crate) fn extreme<N: BinaryNode>(root: Option<&N>, side: Side) -> Option<&N> {
    let mut node = root?;
    while let Some(next) = node.child(side) {
        node = next;
    }
    Some(node)
}

/// Number of nodes below (and including) `root`.
pub(crate) fn count<N: BinaryNode>(root: Option<&N>) -> usize {
    let mut count = 0;
    let mut pending: Vec<&N> = root.into_iter().collect();
    while let Some(node) = pending.pop() {
        count += 1;
        pending.extend(node.left());
        pending.extend(node.right());
    }
    count
}

/// Number of levels below (and including) `root`; 0 for no node.
pub(crate) fn levels<N: BinaryNode>(root: Option<&N>) -> usize {
    let mut deepest = 0;
    let mut pending: Vec<(&N, usize)> = root.map(|n| (n, 1)).into_iter().collect();
    while let Some((node, depth)) = pending.pop() {
        deepest = deepest.max(depth);
        pending.extend(node.left().map(|n| (n, depth + 1)));
        pending.extend(node.right().map(|n| (n, depth + 1)));
    }
    deepest
}

/// Checks that an in-order walk yields strictly ascending keys.
pub(crate) fn check_order<N>(root: Option<&N>) -> Result<(), InvariantError>
where
    N: BinaryNode,
    N::Key: Ord + fmt::Debug,
{
    let mut keys = Iter::new(root);
    let Some(mut previous) = keys.next() else {
        return Ok(());
    };
    for next in keys {
        if previous >= next {
            return Err(InvariantError::OutOfOrder {
                previous: format!("{:?}", previous),
                next: format!("{:?}", next),
            });
        }
        previous = next;
    }
    Ok(())
}

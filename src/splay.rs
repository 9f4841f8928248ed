//! A splay tree. There's no balance bookkeeping at all: every access (insert, remove, lookup,
//! min/max) rotates the touched node up to the root instead. Keys that are used often stay near
//! the top, and any sequence of `m` operations costs `O(m lg N)` overall even though a single
//! operation can be linear.
//!
//! Because even lookups reshape the tree they take `&mut self`.
//!
//! # Examples
//!
//! ```
//! use balanced_trees::splay::Tree;
//!
//! let mut tree = Tree::new();
//! tree.insert("C");
//! tree.insert("A");
//!
//! // The most recent insertion is at the root.
//! assert_eq!(tree.root_key(), Some(&"A"));
//!
//! // Looking a key up brings it to the root too.
//! assert!(tree.contains(&"C"));
//! assert_eq!(tree.root_key(), Some(&"C"));
//!
//! assert!(tree.remove(&"C"));
//! assert_eq!(tree.size(), 1);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::node::{self, BinaryNode, Order, Side};
use crate::{print, InvariantError};

type SubTree<K> = Option<Box<Node<K>>>;

/// A self-adjusting Binary Search Tree of unique keys.
pub struct Tree<K> {
    /// The most recently accessed node.
    root: SubTree<K>,
}

struct Node<K> {
    key: K,
    left: SubTree<K>,
    right: SubTree<K>,
}

/// The route from the root to a key, one turn per edge.
struct Access {
    path: Vec<Side>,
    /// Whether the path ends at the key itself. When it doesn't, it ends at the last node the
    /// search visited, which is where the key would hang.
    found: bool,
}

/// One splaying step, picked from the last turns of the access path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    /// The target is a child of the root.
    Zig(Side),
    /// The target and its parent are both `Side` children.
    ZigZig(Side),
    /// The parent is a `Side` child and the target is on the opposite side of it.
    ZigZag(Side),
}

impl Step {
    /// The step that lifts the node at the end of `path` two levels (or one, right below the
    /// root). `None` once the node is the root.
    fn for_path(path: &[Side]) -> Option<Self> {
        match *path {
            [] => None,
            [side] => Some(Step::Zig(side)),
            [.., outer, inner] if outer == inner => Some(Step::ZigZig(outer)),
            [.., outer, _] => Some(Step::ZigZag(outer)),
        }
    }
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        // A splay tree can degenerate into a long chain. Dropping the boxes recursively could
        // overflow the stack.
        let mut pending: Vec<Box<Node<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = pending.pop() {
            pending.extend(node.left.take());
            pending.extend(node.right.take());
        }
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root_key())
            .field("keys", &DebugKeys(self))
            .finish()
    }
}

struct DebugKeys<'a, K>(&'a Tree<K>);

impl<K> fmt::Debug for DebugKeys<'_, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.iter()).finish()
    }
}

/// Lists the keys in ascending order, e.g. `[A,B,C]`.
impl<K> fmt::Display for Tree<K>
where
    K: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&node::Keys::new(self.root(), Order::InOrder), f)
    }
}

impl<K> Tree<K> {
    /// Generate a new, empty `Tree`.
    pub const fn new() -> Self {
        Self { root: None }
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of keys in the tree. The tree doesn't keep a count, so this walks every node.
    pub fn size(&self) -> usize {
        node::count(self.root())
    }

    /// The number of levels in the tree: 0 when empty, 1 for a lone root. Walks every node.
    pub fn height(&self) -> usize {
        node::levels(self.root())
    }

    /// The key at the root, which is the one touched most recently. Doesn't splay.
    pub fn root_key(&self) -> Option<&K> {
        self.root().map(|root| &root.key)
    }

    /// The smallest key, found without splaying.
    pub fn leftmost_key(&self) -> Option<&K> {
        node::extreme(self.root(), Side::Left).map(|node| &node.key)
    }

    /// The largest key, found without splaying.
    pub fn rightmost_key(&self) -> Option<&K> {
        node::extreme(self.root(), Side::Right).map(|node| &node.key)
    }

    /// Iterates over the keys in ascending order without splaying.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        node::Iter::new(self.root())
    }

    /// Lists the keys in the given order as `[k1,k2,...]`.
    pub fn render(&self, order: Order) -> String
    where
        K: fmt::Display,
    {
        node::Keys::new(self.root(), order).to_string()
    }

    /// Draws the tree with one line per level. Meant for debugging.
    pub fn pretty(&self) -> String
    where
        K: fmt::Display,
    {
        print::pretty(self.root())
    }

    /// Inserts `key` and splays it to the root. If the key is already present it's splayed to
    /// the root and nothing else changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::splay::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in 1..=3 {
    ///     tree.insert(key);
    /// }
    /// assert_eq!(tree.root_key(), Some(&3));
    ///
    /// tree.insert(1);
    /// assert_eq!(tree.root_key(), Some(&1));
    /// assert_eq!(tree.size(), 3);
    /// ```
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let Access { mut path, found } = self.access(&key);
        if !found {
            match self.root.as_deref_mut() {
                None => self.root = Some(Box::new(Node::new(key))),
                Some(root) => {
                    let parent = root.descend(&path);
                    let side = if key < parent.key {
                        Side::Left
                    } else {
                        Side::Right
                    };
                    *parent.link_mut(side) = Some(Box::new(Node::new(key)));
                    path.push(side);
                }
            }
        }
        self.splay_along(&path);
    }

    /// Removes `key`, returning whether it was present. The tree is splayed either way.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::splay::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    /// tree.insert(2);
    ///
    /// assert!(tree.remove(&2));
    /// assert!(!tree.remove(&2));
    /// assert_eq!(tree.root_key(), Some(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        self.splay(key);
        let Some(mut removed) = self.root.take() else {
            return false;
        };
        if removed.key != *key {
            self.root = Some(removed);
            return false;
        }

        let right = removed.right.take();
        match removed.left.take() {
            Some(left) => {
                // Everything on the left is smaller than `key`, so splaying for it lifts the
                // left side's maximum. That root has no right child and can adopt `right`.
                self.root = Some(left);
                self.splay(key);
                if let Some(root) = self.root.as_deref_mut() {
                    if cfg!(debug_assertions) {
                        assert!(root.right.is_none(), "Left maximum has no right child");
                    }
                    root.right = right;
                }
            }
            None => self.root = right,
        }
        true
    }

    /// Splays the smallest key to the root and returns it.
    pub fn find_min(&mut self) -> Option<&K> {
        self.splay_extreme(Side::Left)
    }

    /// Splays the largest key to the root and returns it.
    pub fn find_max(&mut self) -> Option<&K> {
        self.splay_extreme(Side::Right)
    }

    /// Whether the tree contains `key`. The key, or the node where the search for it ended, is
    /// splayed to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::splay::Tree;
    ///
    /// let mut tree = Tree::new();
    /// for key in [10, 20, 30] {
    ///     tree.insert(key);
    /// }
    ///
    /// assert!(!tree.contains(&25));
    /// assert!(tree.contains(&10));
    /// assert_eq!(tree.root_key(), Some(&10));
    /// ```
    pub fn contains(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        self.splay(key);
        self.root_key() == Some(key)
    }

    /// Checks that the keys are in ascending order. A splay tree has no other structural rule.
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord + fmt::Debug,
    {
        node::check_order(self.root())
    }

    fn root(&self) -> Option<&Node<K>> {
        self.root.as_deref()
    }

    /// Follows `key` down from the root, recording each turn.
    fn access(&self, key: &K) -> Access
    where
        K: Ord,
    {
        let mut path = Vec::new();
        let mut current = self.root();
        while let Some(node) = current {
            let side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Equal => return Access { path, found: true },
                Ordering::Greater => Side::Right,
            };
            current = node.child(side);
            if current.is_some() {
                path.push(side);
            }
        }
        Access { path, found: false }
    }

    /// Brings `key` to the root, or the last node on its search path when it's missing.
    fn splay(&mut self, key: &K)
    where
        K: Ord,
    {
        let Access { path, .. } = self.access(key);
        self.splay_along(&path);
    }

    fn splay_extreme(&mut self, side: Side) -> Option<&K> {
        let mut path = Vec::new();
        let mut current = self.root()?;
        while let Some(next) = current.child(side) {
            path.push(side);
            current = next;
        }
        self.splay_along(&path);
        self.root_key()
    }

    /// Lifts the node at the end of `path` to the root, two levels per step. The walk down cuts
    /// every link on the path, then the target climbs back up, picking up its cut-off ancestors
    /// two at a time from the bottom.
    fn splay_along(&mut self, path: &[Side]) {
        let Some(mut current) = self.root.take() else {
            return;
        };
        let mut ancestors = Vec::with_capacity(path.len());
        for &side in path {
            let child = current
                .link_mut(side)
                .take()
                .expect("Access paths only pass through nodes");
            ancestors.push((current, side));
            current = child;
        }

        while let Some(step) = Step::for_path(&path[..ancestors.len()]) {
            current = match step {
                Step::Zig(side) => {
                    let mut parent = reattach(&mut ancestors, current);
                    parent.zig(side);
                    parent
                }
                Step::ZigZig(side) => {
                    let parent = reattach(&mut ancestors, current);
                    let mut grandparent = reattach(&mut ancestors, parent);
                    grandparent.zig(side);
                    grandparent.zig(side);
                    grandparent
                }
                Step::ZigZag(side) => {
                    let parent = reattach(&mut ancestors, current);
                    let mut grandparent = reattach(&mut ancestors, parent);
                    if let Some(parent) = grandparent.link_mut(side).as_deref_mut() {
                        parent.zig(side.opposite());
                    }
                    grandparent.zig(side);
                    grandparent
                }
            };
        }
        self.root = Some(current);
    }
}

/// Hangs `child` back into the slot it was cut from and returns the ancestor owning that slot.
fn reattach<K>(ancestors: &mut Vec<(Box<Node<K>>, Side)>, child: Box<Node<K>>) -> Box<Node<K>> {
    let (mut parent, side) = ancestors
        .pop()
        .expect("Every splay step has an ancestor to rotate");
    *parent.link_mut(side) = Some(child);
    parent
}

impl<K> BinaryNode for Node<K> {
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

impl<K> Node<K> {
    const fn new(key: K) -> Self {
        Self {
            key,
            left: None,
            right: None,
        }
    }

    fn link_mut(&mut self, side: Side) -> &mut SubTree<K> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// The node reached by following `path` down from here.
    fn descend(&mut self, path: &[Side]) -> &mut Self {
        let mut current = self;
        for &side in path {
            current = current
                .link_mut(side)
                .as_deref_mut()
                .expect("Access paths only pass through nodes");
        }
        current
    }

    /// Rotates the child on `side` up into this node's place. The contents of the two boxes are
    /// swapped, so `self` holds the lifted child afterwards. Does nothing without such a child.
    fn zig(&mut self, side: Side) {
        if let Some(mut child) = self.link_mut(side).take() {
            *self.link_mut(side) = child.link_mut(side.opposite()).take();
            std::mem::swap(&mut *child, self);
            *self.link_mut(side.opposite()) = Some(child);
        }
    }
}

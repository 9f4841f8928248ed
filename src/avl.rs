//! An AVL tree whose nodes point back at their parents. After every insertion or deletion the
//! tree walks from the changed spot back up to the root, rotating wherever one subtree has grown
//! two levels taller than its sibling. That keeps every lookup within `O(lg N)` steps.
//!
//! # Examples
//!
//! ```
//! use balanced_trees::avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.search(&1));
//!
//! tree.insert(1);
//! tree.insert(2);
//! tree.insert(3);
//! assert!(tree.search(&1));
//!
//! // Keys form a set: inserting one again changes nothing.
//! tree.insert(1);
//! assert_eq!(tree.len(), 3);
//!
//! // Deleting reports whether the key was there.
//! assert!(tree.delete(&1));
//! assert!(!tree.delete(&1));
//! assert_eq!(tree.to_string(), "[2,3]");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use crate::node::{self, BinaryNode, Order, Side};
use crate::{print, InvariantError};

/// A self-balancing Binary Search Tree of unique keys.
pub struct Tree<K> {
    // Nodes hold raw pointers to each other, so the tree owns them through a `Link` rather than a
    // `Box`. Moving the `Tree` around never moves a node.
    root: Link<K>,
    len: usize,
    _owns: PhantomData<Box<Node<K>>>,
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        let mut pending: Vec<NonNull<Node<K>>> = self.root.take().0.into_iter().collect();
        while let Some(node) = pending.pop() {
            // SAFETY: Every node is reachable from exactly one link and we took the root link, so
            // each node is visited (and freed) exactly once. Nodes are allocated with `Box::new`
            // in `Node::new_leaked`.
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            pending.extend(node.left.0);
            pending.extend(node.right.0);
        }
    }
}

impl<K> Clone for Tree<K>
where
    K: Clone,
{
    fn clone(&self) -> Self {
        Self {
            root: Link(self.root().map(|root| root.clone_subtree(Link::EMPTY))),
            len: self.len,
            _owns: PhantomData,
        }
    }
}

impl<K> fmt::Debug for Tree<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root())
            .finish()
    }
}

/// Lists the keys in ascending order, e.g. `[1,2,3]`.
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
    pub fn new() -> Self {
        Self {
            root: Link::EMPTY,
            len: 0,
            _owns: PhantomData,
        }
    }

    /// The number of keys in the tree. This is tracked as keys come and go rather than counted.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.0.is_none()
    }

    /// The number of levels in the tree: 0 when empty, 1 for a lone root.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Iterates over the keys in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &K> + '_ {
        node::Iter::new(self.root())
    }

    /// Lists the keys in the given order as `[k1,k2,...]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::{avl::Tree, Order};
    ///
    /// let mut tree = Tree::new();
    /// for key in [1, 2, 3] {
    ///     tree.insert(key);
    /// }
    ///
    /// assert_eq!(tree.render(Order::InOrder), "[1,2,3]");
    /// assert_eq!(tree.render(Order::PreOrder), "[2,1,3]");
    /// assert_eq!(tree.render(Order::PostOrder), "[1,3,2]");
    /// ```
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

    /// Whether the tree contains `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.search(&1));
    /// assert!(!tree.search(&42));
    /// ```
    pub fn search(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.find_node(key).is_some()
    }

    /// Inserts `key` into the tree. Inserting a key that's already present does nothing.
    pub fn insert(&mut self, key: K)
    where
        K: Ord,
    {
        let Some(mut current) = self.root.0 else {
            self.root = Link::to(Node::new_leaked(key, Link::EMPTY));
            self.len = 1;
            return;
        };

        loop {
            // SAFETY: `current` is a live node of this tree and `&mut self` rules out any other
            // reference to it. The shared reference ends before the tree is modified below.
            let node = unsafe { current.as_ref() };
            let side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Equal => return,
                Ordering::Greater => Side::Right,
            };

            match node.link(side).0 {
                Some(next) => current = next,
                None => {
                    let leaf = Node::new_leaked(key, Link::to(current));
                    // SAFETY: `current` is live and its `side` slot is empty, and `leaf` was just
                    // allocated so nothing else links to it.
                    unsafe {
                        Node::attach(current, side, Link::to(leaf));
                        self.rebalance(Link::to(current));
                    }
                    self.len += 1;
                    return;
                }
            }
        }
    }

    /// Deletes `key` from the tree, returning whether it was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert!(tree.delete(&1));
    /// assert!(!tree.search(&1));
    ///
    /// // Deleting from an empty tree is fine too.
    /// assert!(!tree.delete(&1));
    /// ```
    pub fn delete(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let Some(target) = self.find_node(key) else {
            return false;
        };

        // SAFETY: `target` and everything reached from it are live nodes of this tree and
        // `&mut self` rules out outside references. Each node is unlinked before it is freed.
        unsafe {
            let retrace_from = match ((*target.as_ptr()).left.0, (*target.as_ptr()).right.0) {
                (Some(left), Some(_)) => {
                    // Two children. `target` stays where it is and takes over the key of its
                    // in-order predecessor, which is the node that actually leaves the tree. The
                    // deleted key goes with it.
                    let mut predecessor = left;
                    while let Some(right) = (*predecessor.as_ptr()).right.0 {
                        predecessor = right;
                    }
                    mem::swap(
                        &mut (*target.as_ptr()).key,
                        &mut (*predecessor.as_ptr()).key,
                    );

                    // The predecessor has no right child, so its left child (if any) takes its
                    // place.
                    let parent = (*predecessor.as_ptr()).parent;
                    let orphan = (*predecessor.as_ptr()).left;
                    self.replace_child(parent, predecessor, orphan);
                    Node::free(predecessor);
                    parent
                }
                (left, right) => {
                    let parent = (*target.as_ptr()).parent;
                    self.replace_child(parent, target, Link(left.or(right)));
                    Node::free(target);
                    parent
                }
            };

            self.len -= 1;
            self.rebalance(retrace_from);
        }

        true
    }

    /// Checks every invariant of the tree: keys ascend, each node is balanced, cached heights are
    /// current, parent pointers mirror child pointers, and the count matches the nodes present.
    pub fn validate(&self) -> Result<(), InvariantError>
    where
        K: Ord + fmt::Debug,
    {
        node::check_order(self.root())?;

        if let Some(root) = self.root() {
            if root.parent.0.is_some() {
                return Err(InvariantError::BrokenParentLink {
                    key: format!("{:?}", root.key),
                });
            }
        }

        let mut counted = 0;
        let mut pending: Vec<&Node<K>> = self.root().into_iter().collect();
        while let Some(node) = pending.pop() {
            counted += 1;

            let actual = (node.left.height(), node.right.height());
            if (node.left_height, node.right_height) != actual {
                return Err(InvariantError::StaleHeight {
                    key: format!("{:?}", node.key),
                    cached: (node.left_height, node.right_height),
                    actual,
                });
            }

            let factor = node.balance_factor();
            if factor.abs() > 1 {
                return Err(InvariantError::Unbalanced {
                    key: format!("{:?}", node.key),
                    factor,
                });
            }

            for child in [node.left(), node.right()].into_iter().flatten() {
                if !child.parent.points_to(NonNull::from(node)) {
                    return Err(InvariantError::BrokenParentLink {
                        key: format!("{:?}", child.key),
                    });
                }
                pending.push(child);
            }
        }

        if counted != self.len {
            return Err(InvariantError::LengthMismatch {
                recorded: self.len,
                counted,
            });
        }
        Ok(())
    }

    fn root(&self) -> Option<&Node<K>> {
        self.root.node()
    }

    fn find_node(&self, key: &K) -> Option<NonNull<Node<K>>>
    where
        K: Ord,
    {
        let mut cursor = self.root;
        while let Some(ptr) = cursor.0 {
            // SAFETY: `ptr` is a live node of this tree and `&self` rules out mutation.
            let node = unsafe { ptr.as_ref() };
            cursor = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(ptr),
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Puts `new` in the slot currently holding `old`: the root when `parent` is empty, otherwise
    /// whichever side of `parent` points at `old`.
    ///
    /// # Safety
    ///
    /// `parent` must be `old`'s parent and every node involved must be live and owned by `self`.
    unsafe fn replace_child(&mut self, parent: Link<K>, old: NonNull<Node<K>>, new: Link<K>) {
        match parent.0 {
            Some(parent) => {
                let side = (*parent.as_ptr()).side_of(old);
                Node::attach(parent, side, new);
            }
            None => {
                if let Some(new) = new.0 {
                    (*new.as_ptr()).parent = Link::EMPTY;
                }
                self.root = new;
            }
        }
    }

    /// Lifts `node`'s child on `side` into `node`'s place and returns it. `node` drops down to
    /// the other side of the lifted child and adopts its inner subtree.
    ///
    /// # Safety
    ///
    /// `node` must be a live node of this tree with a child on `side`, and `node`'s own cached
    /// heights must be current.
    unsafe fn rotate(&mut self, node: NonNull<Node<K>>, side: Side) -> NonNull<Node<K>> {
        let pivot = (*node.as_ptr())
            .link(side)
            .0
            .expect("Rotating needs a child to lift");
        let parent = (*node.as_ptr()).parent;
        let inner = (*pivot.as_ptr()).link(side.opposite());

        Node::attach(node, side, inner);
        Node::attach(pivot, side.opposite(), Link::to(node));
        self.replace_child(parent, node, Link::to(pivot));
        pivot
    }

    /// Rotate `node` to the right. This moves the left child up and `node` down. Used when the
    /// left child is too tall, so there must _be_ a left child.
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///    node                      pivot
    ///    /   \                     /   \
    ///  pivot  z     rotate ->     x    node
    ///  / \                             /  \
    /// x   y                           y    z
    /// ```
    ///
    /// # Safety
    ///
    /// See [`Tree::rotate`].
    unsafe fn rotate_right(&mut self, node: NonNull<Node<K>>) -> NonNull<Node<K>> {
        self.rotate(node, Side::Left)
    }

    /// The mirror image of [`Tree::rotate_right`]: the right child moves up.
    ///
    /// # Safety
    ///
    /// See [`Tree::rotate`].
    unsafe fn rotate_left(&mut self, node: NonNull<Node<K>>) -> NonNull<Node<K>> {
        self.rotate(node, Side::Right)
    }

    /// Walks from `from` up to the root, refreshing cached heights and rotating any node whose
    /// subtrees differ in height by two. The walk always goes all the way to the root.
    ///
    /// See <https://en.wikipedia.org/wiki/AVL_tree#Rebalancing> for the case names.
    ///
    /// # Safety
    ///
    /// `from` must be empty or a live node of this tree, and every node below the path from
    /// `from` to the root must have current cached heights.
    unsafe fn rebalance(&mut self, from: Link<K>) {
        let mut cursor = from;
        while let Some(node) = cursor.0 {
            (*node.as_ptr()).refresh_heights();

            let subtree = match (*node.as_ptr()).balance_factor() {
                -2 => {
                    let right = (*node.as_ptr()).right.0.expect("Right heavy => right child");
                    if (*right.as_ptr()).balance_factor() == 1 {
                        // Right-Left
                        self.rotate_right(right);
                    }
                    self.rotate_left(node)
                }
                2 => {
                    let left = (*node.as_ptr()).left.0.expect("Left heavy => left child");
                    if (*left.as_ptr()).balance_factor() == -1 {
                        // Left-Right
                        self.rotate_left(left);
                    }
                    self.rotate_right(node)
                }
                _ => node,
            };

            if cfg!(debug_assertions) {
                let factor = (*subtree.as_ptr()).balance_factor();
                assert!(factor.abs() <= 1, "Rebalanced node has balance factor {}", factor);
            }

            cursor = (*subtree.as_ptr()).parent;
        }
    }
}

struct Link<K>(Option<NonNull<Node<K>>>);

impl<K> Clone for Link<K> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<K> Copy for Link<K> {}

impl<K> Link<K> {
    const EMPTY: Self = Link(None);

    fn to(node: NonNull<Node<K>>) -> Self {
        Link(Some(node))
    }

    fn node(&self) -> Option<&Node<K>> {
        // SAFETY: A non-empty link always points at a live node owned by the same tree. Nodes are
        // only written through raw pointers while the tree is borrowed mutably, so no `&Node`
        // handed out here can be alive at the same time.
        unsafe { self.0.as_ref().map(|ptr| ptr.as_ref()) }
    }

    fn take(&mut self) -> Self {
        Link(self.0.take())
    }

    /// Levels in the subtree this link points at.
    fn height(&self) -> usize {
        self.node().map_or(0, Node::height)
    }

    fn points_to(&self, node: NonNull<Node<K>>) -> bool {
        self.0 == Some(node)
    }
}

struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
    parent: Link<K>,
    /// Levels in the left subtree, kept current by `attach` and `refresh_heights`.
    left_height: usize,
    /// Levels in the right subtree.
    right_height: usize,
}

impl<K> fmt::Debug for Node<K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("left_height", &self.left_height)
            .field("right_height", &self.right_height)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<K> BinaryNode for Node<K> {
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }

    fn left(&self) -> Option<&Self> {
        self.left.node()
    }

    fn right(&self) -> Option<&Self> {
        self.right.node()
    }
}

impl<K> Node<K> {
    fn new_leaked(key: K, parent: Link<K>) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Node {
            key,
            left: Link::EMPTY,
            right: Link::EMPTY,
            parent,
            left_height: 0,
            right_height: 0,
        })))
    }

    /// # Safety
    ///
    /// `node` must already be unlinked from its tree. Its children are not freed.
    unsafe fn free(node: NonNull<Self>) {
        drop(Box::from_raw(node.as_ptr()));
    }

    fn link(&self, side: Side) -> Link<K> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    fn side_of(&self, child: NonNull<Self>) -> Side {
        if self.left.points_to(child) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Levels in the subtree rooted here, according to the cached child heights.
    fn height(&self) -> usize {
        self.left_height.max(self.right_height) + 1
    }

    /// Left height minus right height, read from the children's own caches rather than this
    /// node's. See [the Wikipedia page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self) -> isize {
        self.left.height() as isize - self.right.height() as isize
    }

    fn refresh_heights(&mut self) {
        self.left_height = self.left.height();
        self.right_height = self.right.height();
    }

    /// Hangs `child` off `parent` on `side`, pointing the child back at `parent` and refreshing
    /// `parent`'s cached height for that side. Every child link change goes through here.
    ///
    /// # Safety
    ///
    /// `parent` and `child` (if any) must be live nodes owned by the same tree, and nothing else
    /// may keep linking to `child` afterwards.
    unsafe fn attach(parent: NonNull<Self>, side: Side, child: Link<K>) {
        let height = child.height();
        if let Some(child) = child.0 {
            (*child.as_ptr()).parent = Link::to(parent);
        }

        let parent = &mut *parent.as_ptr();
        match side {
            Side::Left => {
                parent.left = child;
                parent.left_height = height;
            }
            Side::Right => {
                parent.right = child;
                parent.right_height = height;
            }
        }
    }

    /// Deep copy of the subtree rooted here, hung under `parent`.
    fn clone_subtree(&self, parent: Link<K>) -> NonNull<Self>
    where
        K: Clone,
    {
        let copy = Node::new_leaked(self.key.clone(), parent);
        let left = Link(self.left().map(|left| left.clone_subtree(Link::to(copy))));
        let right = Link(self.right().map(|right| right.clone_subtree(Link::to(copy))));

        // SAFETY: `copy` was just allocated and its children point back at it; nothing else
        // references it yet.
        unsafe {
            let node = &mut *copy.as_ptr();
            node.left = left;
            node.right = right;
            node.left_height = self.left_height;
            node.right_height = self.right_height;
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert the heights of the root, left child, and right child of a tree.
    macro_rules! assert_heights {
        ($tree:ident, $height:expr, $left_height:expr, $right_height:expr) => {{
            match $tree.root() {
                Some(n) => {
                    assert_eq!(n.height(), $height);

                    assert_eq!(n.left.height(), $left_height);
                    assert_eq!(n.right.height(), $right_height);
                    assert_eq!(n.left_height, $left_height);
                    assert_eq!(n.right_height, $right_height);
                }
                None => assert_eq!(0, $height),
            }
        }};
    }

    fn tree_of(keys: &[i32]) -> Tree<i32> {
        let mut tree = Tree::new();
        for &key in keys {
            tree.insert(key);
        }
        tree
    }

    #[test]
    fn always_adding_left() {
        let keys = [10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
        let mut inserted = Vec::new();

        let mut tree = Tree::new();
        assert!(!tree.search(&10));

        for key in keys {
            tree.insert(key);
            inserted.push(key);
            for inserted in &inserted {
                assert!(tree.search(inserted));
            }
            assert_eq!(tree.validate(), Ok(()));
        }
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn always_adding_right() {
        let keys = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let mut inserted = Vec::new();

        let mut tree = Tree::new();
        assert!(!tree.search(&1));

        for key in keys {
            tree.insert(key);
            inserted.push(key);
            for inserted in &inserted {
                assert!(tree.search(inserted));
            }
            assert_eq!(tree.validate(), Ok(()));
        }
        assert_eq!(tree.height(), 4);
    }

    #[test]
    fn test_height() {
        let mut tree = Tree::new();
        assert_heights!(tree, 0, 0, 0);

        tree.insert(1);
        assert_heights!(tree, 1, 0, 0);

        // Insert a value to the right making it taller.
        tree.insert(2);
        assert_heights!(tree, 2, 0, 1);

        // Insert a value to the left not changing the overall height.
        tree.insert(0);
        assert_heights!(tree, 2, 1, 1);

        // Delete that left value to get to the previous heights.
        tree.delete(&0);
        assert_heights!(tree, 2, 0, 1);

        // Put it back and delete the root. It's replaced by its predecessor so we have just the
        // root and a right child.
        tree.insert(0);
        tree.delete(&1);
        assert_heights!(tree, 2, 0, 1);
    }

    #[test]
    fn test_left_left_rebalance() {
        let tree = tree_of(&[0, -1, -2]);

        assert_heights!(tree, 2, 1, 1);
        assert_eq!(tree.render(Order::PreOrder), "[-1,-2,0]");
    }

    #[test]
    fn test_left_right_rebalance() {
        let tree = tree_of(&[0, -2, -1]);

        assert_heights!(tree, 2, 1, 1);
        assert_eq!(tree.render(Order::PreOrder), "[-1,-2,0]");
    }

    #[test]
    fn test_right_left_rebalance() {
        let tree = tree_of(&[0, 2, 1]);

        assert_heights!(tree, 2, 1, 1);
        assert_eq!(tree.render(Order::PreOrder), "[1,0,2]");
    }

    #[test]
    fn test_right_right_rebalance() {
        let tree = tree_of(&[0, 1, 2]);

        assert_heights!(tree, 2, 1, 1);
        assert_eq!(tree.render(Order::PreOrder), "[1,0,2]");
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut tree = tree_of(&[2, 1, 3]);
        tree.insert(2);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.render(Order::PreOrder), "[2,1,3]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn empty_tree_search_and_delete() {
        let mut tree: Tree<i32> = Tree::new();

        assert!(!tree.search(&1));
        assert!(!tree.delete(&1));
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.to_string(), "[]");
        assert_eq!(tree.pretty(), "");
    }

    #[test]
    fn delete_with_no_children() {
        let mut tree = tree_of(&[5, 3, 7]);

        assert!(tree.delete(&7));
        assert!(!tree.search(&7));

        assert!(tree.search(&3));
        assert!(tree.search(&5));
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_with_null_left() {
        let mut tree = tree_of(&[5, 3, 7, 9]);

        assert!(tree.delete(&7));
        assert!(!tree.search(&7));

        assert_eq!(tree.to_string(), "[3,5,9]");
        assert_eq!(tree.render(Order::PreOrder), "[5,3,9]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_with_null_right() {
        let mut tree = tree_of(&[5, 3, 7, 6]);

        assert!(tree.delete(&7));
        assert!(!tree.search(&7));

        assert_eq!(tree.render(Order::PreOrder), "[5,3,6]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_with_left_predecessor() {
        let mut tree = tree_of(&[5, 3, 7, 6, 8]);
        let seven = tree.find_node(&7).unwrap();

        assert!(tree.delete(&7));
        assert!(!tree.search(&7));

        // The node that held 7 stays put and now holds its predecessor.
        assert_eq!(tree.find_node(&6), Some(seven));
        assert_eq!(tree.render(Order::PreOrder), "[5,3,6,8]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_with_deeper_predecessor() {
        let mut tree = tree_of(&[5, 3, 8, 2, 6, 9, 7]);

        assert!(tree.delete(&8));
        assert!(!tree.search(&8));

        for key in [2, 3, 5, 6, 7, 9] {
            assert!(tree.search(&key));
        }
        assert_eq!(tree.render(Order::PreOrder), "[5,3,2,7,6,9]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_predecessor_with_left_child() {
        // 4's predecessor is 3, whose left child 2 has to move up into 3's slot.
        let mut tree = tree_of(&[4, 1, 6, 0, 3, 5, 7, 2]);

        assert!(tree.delete(&4));

        assert_eq!(tree.render(Order::PreOrder), "[3,1,0,2,6,5,7]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_root() {
        let mut tree = tree_of(&[5]);

        assert!(tree.delete(&5));
        assert!(!tree.search(&5));
        assert!(tree.is_empty());
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_rebalances_towards_the_root() {
        // Removing 1 leaves 2 with an empty left side and a right side two levels deep.
        let mut tree = tree_of(&[2, 1, 4, 3, 5]);

        assert!(tree.delete(&1));

        assert_eq!(tree.render(Order::PreOrder), "[4,2,3,5]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn rotate_right_fixes_parent_pointers() {
        let tree = tree_of(&[5, 3, 9, 4, 2, 1]);

        let three_node = tree.root.0.unwrap();
        let five_node = unsafe { three_node.as_ref().right.0.unwrap() };
        let nine_node = unsafe { five_node.as_ref().right.0.unwrap() };

        let nine_node_parent = unsafe { nine_node.as_ref().parent.0.unwrap() };

        assert_eq!(five_node, nine_node_parent);
        assert!(unsafe { three_node.as_ref().parent.0.is_none() });
    }

    #[test]
    fn rotate_left_fixes_parent_pointers() {
        let tree = tree_of(&[-5, -3, -9, -4, -2, -1]);

        let three_node = tree.root.0.unwrap();
        let five_node = unsafe { three_node.as_ref().left.0.unwrap() };
        let nine_node = unsafe { five_node.as_ref().left.0.unwrap() };

        let nine_node_parent = unsafe { nine_node.as_ref().parent.0.unwrap() };

        assert_eq!(five_node, nine_node_parent);
    }

    #[test]
    fn clone_works() {
        let mut tree = {
            let tree = tree_of(&[5, 3, 7, 1, 4, 6, 8]);
            tree.clone()
        };

        let five_node = tree.root.0.unwrap();

        // Ensure root children are fixed
        let three_node = unsafe { five_node.as_ref().left.0.unwrap() };
        let three_node_parent = unsafe { three_node.as_ref().parent.0.unwrap() };
        assert_eq!(five_node, three_node_parent);

        let seven_node = unsafe { five_node.as_ref().right.0.unwrap() };
        let seven_node_parent = unsafe { seven_node.as_ref().parent.0.unwrap() };
        assert_eq!(five_node, seven_node_parent);

        // Ensure deeper children are fixed
        let one_node = unsafe { three_node.as_ref().left.0.unwrap() };
        let one_node_parent = unsafe { one_node.as_ref().parent.0.unwrap() };
        assert_eq!(three_node, one_node_parent);

        let eight_node = unsafe { seven_node.as_ref().right.0.unwrap() };
        let eight_node_parent = unsafe { eight_node.as_ref().parent.0.unwrap() };
        assert_eq!(seven_node, eight_node_parent);

        assert_eq!(tree.validate(), Ok(()));

        assert!(tree.delete(&1));
        assert!(tree.delete(&3));
        assert!(tree.delete(&4));

        assert!(tree.delete(&7));
        assert!(tree.delete(&6));
        assert!(tree.delete(&8));
        assert!(tree.delete(&5));
        assert!(tree.is_empty());
    }

    #[test]
    fn clone_is_independent() {
        let original = tree_of(&[1, 2, 3]);
        let mut copy = original.clone();
        copy.delete(&2);
        copy.insert(4);

        assert_eq!(original.to_string(), "[1,2,3]");
        assert_eq!(copy.to_string(), "[1,3,4]");
        assert_eq!(original.validate(), Ok(()));
        assert_eq!(copy.validate(), Ok(()));
    }

    #[test]
    fn validate_catches_stale_heights() {
        let mut tree = tree_of(&[2, 1, 3]);
        unsafe { (*tree.root.0.unwrap().as_ptr()).left_height = 5 };

        assert_eq!(
            tree.validate(),
            Err(InvariantError::StaleHeight {
                key: "2".to_string(),
                cached: (5, 1),
                actual: (1, 1),
            })
        );

        unsafe { (*tree.root.0.unwrap().as_ptr()).left_height = 1 };
        tree.len = 7;
        assert_eq!(
            tree.validate(),
            Err(InvariantError::LengthMismatch {
                recorded: 7,
                counted: 3,
            })
        );
        tree.len = 3;
    }

    #[test]
    fn insert_then_delete_scenario() {
        let mut tree = tree_of(&[10, 13, 14, 11, 17, 9, 20, 19, 21, 15, 8]);
        for key in [17, 14, 13] {
            assert!(tree.delete(&key));
            assert_eq!(tree.validate(), Ok(()));
        }
        for key in [24, 23, 1, 2, 3, 10] {
            tree.insert(key);
            assert_eq!(tree.validate(), Ok(()));
        }

        assert_eq!(tree.to_string(), "[1,2,3,8,9,10,11,15,19,20,21,23,24]");
        assert_eq!(tree.render(Order::PreOrder), "[11,8,2,1,3,9,10,20,15,19,23,21,24]");
        assert_eq!(tree.len(), 13);
    }

    #[test]
    fn insert_only_scenario() {
        let tree = tree_of(&[10, 13, 14, 11, 17, 9, 20, 19, 21, 15, 8, 24, 23, 1, 2, 3, 10]);

        assert_eq!(tree.to_string(), "[1,2,3,8,9,10,11,13,14,15,17,19,20,21,23,24]");
        assert_eq!(
            tree.render(Order::PreOrder),
            "[13,8,2,1,3,10,9,11,17,14,15,20,19,23,21,24]"
        );
        assert_eq!(tree.len(), 16);
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn pretty_prints_by_level() {
        let tree = tree_of(&[2, 1, 3]);
        assert_eq!(tree.pretty(), "\t2\n1\t\t3");

        let tree = tree_of(&[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(tree.pretty(), "\t\t\t4\n\t2\t\t\t\t6\n1\t\t3\t\t5\t\t7");
        assert_eq!(tree.render(Order::PostOrder), "[1,3,2,5,7,6,4]");
    }

    #[test]
    fn string_keys() {
        let mut tree = Tree::new();
        for key in ["lol", "hey", "test", "cool", "avl"] {
            tree.insert(key.to_string());
        }

        assert_eq!(tree.to_string(), "[avl,cool,hey,lol,test]");
        assert_eq!(tree.render(Order::PreOrder), "[lol,cool,avl,hey,test]");
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_root_then_missing_key_keeps_heights() {
        let mut tree = tree_of(&[77, -22, 0, -127, 5, 109, -58, -105, -65, -86, 45, -11, -39]);
        tree.delete(&0);
        tree.delete(&-122);

        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn delete_root_then_new_predecessor_keeps_heights() {
        let mut tree = tree_of(&[-49, -107, 127, -22, -77, -128, -119, -69, -122, 109, 115, -118]);
        tree.delete(&-49);
        tree.delete(&-77);

        assert_eq!(tree.validate(), Ok(()));
    }
}

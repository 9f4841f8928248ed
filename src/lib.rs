//! This crate exposes two self-balancing Binary Search Trees (BSTs) that
//! keep lookups fast no matter which order keys arrive in.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and
//! will sometimes have child `Node`s. The most important invariants of a
//! BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! Searching takes `O(height)`. Inserting sorted keys into a naive BST
//! produces a chain with height `N`, so both trees here reshape themselves
//! with rotations:
//!
//! - [`avl::Tree`] keeps every node's subtrees within one level of each
//!   other, so the height never exceeds about `1.44 lg N`.
//! - [`splay::Tree`] moves each key it touches to the root. It has no height
//!   guarantee, but any sequence of operations costs `O(lg N)` amortized per
//!   operation and recently used keys are cheap to reach again.
//!
//! Both trees hold a set of unique keys and can render themselves in order,
//! pre-order, or post-order (see [`Order`]) and check their own invariants
//! (see [`InvariantError`]).

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
mod error;
mod node;
mod print;
pub mod splay;

pub use error::InvariantError;
pub use node::Order;

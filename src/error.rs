//! Errors reported by the `validate` methods of both trees.
//!
//! Nothing in the public API fails at runtime: lookups on an empty tree simply
//! come back negative. `InvariantError` exists so tests (and curious callers)
//! can ask a tree to prove its shape is sound and get a readable answer when it
//! isn't. Keys are captured as their `Debug` text so the error isn't generic.

use thiserror::Error;

/// A broken structural invariant found by `validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantError {
    /// An in-order walk produced two keys that are not strictly ascending.
    #[error("keys out of order: {previous} is not less than {next}")]
    OutOfOrder {
        /// The key visited first.
        previous: String,
        /// The key visited right after it.
        next: String,
    },

    /// An AVL node whose subtree heights differ by more than one.
    #[error("node {key} has balance factor {factor}")]
    Unbalanced {
        /// The offending node's key.
        key: String,
        /// Left height minus right height.
        factor: isize,
    },

    /// An AVL node whose cached heights disagree with its children.
    #[error("node {key} caches heights {cached:?} but its children have heights {actual:?}")]
    StaleHeight {
        /// The offending node's key.
        key: String,
        /// The cached `(left, right)` heights.
        cached: (usize, usize),
        /// The heights the children actually report.
        actual: (usize, usize),
    },

    /// An AVL child whose parent pointer does not lead back to the node owning it.
    #[error("node {key} does not point back at its parent")]
    BrokenParentLink {
        /// The child's key.
        key: String,
    },

    /// The AVL tree's running count disagrees with the number of reachable nodes.
    #[error("tree records {recorded} keys but {counted} nodes are reachable")]
    LengthMismatch {
        /// The count kept by the tree.
        recorded: usize,
        /// The number of nodes found by walking the tree.
        counted: usize,
    },
}

//! Errors reported when checking the structural invariants of a tree.

use std::result;
use thiserror::Error;

/// A violated invariant found by `SplaySet::validate`.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The in-order walk produced a value that is not strictly greater than its predecessor.
    #[error("values out of order at in-order position {position}")]
    OrderViolation { position: usize },
    /// Some node is reachable along more than one path.
    #[error("a node is reachable more than once")]
    Cycle,
    /// A child handle names a slot that holds no node.
    #[error("a child handle points at a freed node")]
    DanglingNode,
    /// Allocated nodes that are not reachable from the root.
    #[error("{actual} nodes are reachable from the root but {expected} are allocated")]
    LengthMismatch { expected: usize, actual: usize },
}

pub type Result<T> = result::Result<T, Error>;

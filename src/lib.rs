//! An ordered set backed by a splay tree whose nodes live in an index-addressed arena.
//!
//! Every `insert`, `remove` and `contains` splays the last node it touched to the root. The set
//! also supports deep cloning, structural (shape and value) equality, and a best-effort `undo`
//! that works on a copy of the tree.

mod arena;
mod error;
pub mod splay_tree;

pub use crate::error::{Error, Result};
pub use crate::splay_tree::{NodeRef, SplaySet, SplaySetIntoIter, SplaySetIter};

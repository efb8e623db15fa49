//! Logical database nodes
//!
//! A [`Node`] is a handle on one key path: a variable name and the
//! subscripts leading to it. Nodes own their subscript strings and memoize
//! the key buffer built for them, so repeated database calls on the same
//! node reuse one buffer.
//!
//! Two shapes exist, checked once when the node is created:
//! - child nodes point at their parent node
//! - path nodes carry the flat list of subscripts above them
//!
//! Nodes are reference counted and single threaded. Wrap a whole tree in a
//! lock to share it across threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod fields;
pub mod iter;
pub mod node;

pub use fields::{NodeFields, ParentField};
pub use iter::SubscriptIter;
pub use node::{Node, NodeRef};

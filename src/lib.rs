//! keypath: shared key-path buffers for hierarchical key-value stores
//!
//! Hierarchical stores address a value by a variable name and a path of
//! subscripts (`^Population("USA",17900802)`). Their low-level calls want
//! the whole path as one flat array. This crate builds those arrays from a
//! tree of logical nodes, sharing one physical buffer between a node and
//! its descendants wherever no sibling has claimed the slot.
//!
//! ```
//! use keypath::{CacheConfig, MemoryStore, Node};
//!
//! let config = CacheConfig::default();
//! let store = MemoryStore::new();
//! let usa = Node::root("^Population").child("USA");
//! usa.child("17900802").set(&config, &store, "3929326").unwrap();
//!
//! let dates: Vec<_> = usa.subscripts(&config, &store).collect::<Result<_, _>>().unwrap();
//! assert_eq!(dates, vec!["17900802"]);
//! assert_eq!(usa.to_string(), "^Population(\"USA\")");
//! ```
//!
//! The lower layers are available as modules for callers with their own
//! node types or key stores.

#![warn(missing_docs)]

pub mod types;

pub use types::*;

/// Buffer construction and rendering
pub use keypath_cache as cache;
/// Logical node tree
pub use keypath_node as node;
/// Key-value call interface and in-memory store
pub use keypath_storage as storage;

/// Build a buffer from a flat subscript list.
pub use keypath_cache::{from_subscripts, from_values};
/// Render a buffer's subscripts.
pub use keypath_cache::{display, stringify};
/// Slot-level operations.
pub use keypath_cache::{append, replace};

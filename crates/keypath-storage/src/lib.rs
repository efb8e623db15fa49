//! Key-value call interface
//!
//! [`KeyStore`] is the fixed, low-level surface key buffers are built for:
//! every call takes a [`KeyRef`] (varname plus subscript views) and nothing
//! else about the key. [`MemoryStore`] is an in-process implementation with
//! M collation order, used by tests and benches and by callers that need a
//! scratch tree.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collation;
pub mod memory;
mod number;

use bytes::Bytes;
use keypath_cache::KeyRef;
use keypath_core::Result;

pub use collation::{is_canonical_number, CanonicalNumber, Collated};
pub use memory::MemoryStore;

/// `data` result: no value and no descendants
pub const DATA_NONE: u8 = 0;
/// `data` result: the node has a value
pub const DATA_VALUE: u8 = 1;
/// `data` result: the node has descendants
pub const DATA_SUBTREE: u8 = 10;

/// Primitive calls over hierarchical keys
pub trait KeyStore {
    /// Value stored at `key`, if any
    fn get(&self, key: KeyRef<'_>) -> Result<Option<Bytes>>;

    /// Store `value` at `key`
    fn set(&self, key: KeyRef<'_>, value: Bytes) -> Result<()>;

    /// [`DATA_VALUE`] and/or [`DATA_SUBTREE`] summed, or [`DATA_NONE`]
    fn data(&self, key: KeyRef<'_>) -> Result<u8>;

    /// Remove the value at `key`, keeping descendants
    fn delete_node(&self, key: KeyRef<'_>) -> Result<()>;

    /// Remove `key` and everything below it
    fn delete_tree(&self, key: KeyRef<'_>) -> Result<()>;

    /// Next sibling subscript after the last subscript of `key`, in
    /// collation order. An empty last subscript starts from the beginning.
    fn subscript_next(&self, key: KeyRef<'_>) -> Result<Option<Bytes>>;

    /// Previous sibling subscript. An empty last subscript starts from the end.
    fn subscript_previous(&self, key: KeyRef<'_>) -> Result<Option<Bytes>>;

    /// Subscripts of the next node holding a value after `key`, in
    /// depth-first collation order, staying within the same variable.
    /// Descendants of `key` come first.
    fn node_next(&self, key: KeyRef<'_>) -> Result<Option<Vec<Bytes>>>;

    /// Subscripts of the previous node holding a value before `key`.
    fn node_previous(&self, key: KeyRef<'_>) -> Result<Option<Vec<Bytes>>>;

    /// Add `increment` to the numeric value at `key` and return the new
    /// value. A missing node counts as 0 and an empty increment as 1.
    /// `increment` must otherwise be a canonical number.
    fn incr(&self, key: KeyRef<'_>, increment: &[u8]) -> Result<Bytes>;
}

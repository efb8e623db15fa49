//! The key buffer itself
//!
//! # Layout
//!
//! ```text
//! varname | slot[0] slot[1] ... slot[length-1] | spare ... slot[capacity-1]
//! ```
//!
//! Only the first `length` slots are meaningful. A caller that reached this
//! buffer through a node of depth `d` must only read the first `d` of them:
//! descendants sharing the buffer may already have claimed later slots.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;
use keypath_core::{CacheConfig, Error, Result};

/// A variable name plus subscript views, ready for a key-value call
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPathBuffer {
    varname: Option<Bytes>,
    /// Always exactly `capacity` entries; spare ones are empty views.
    slots: Vec<Bytes>,
    length: usize,
}

impl KeyPathBuffer {
    /// Create an empty buffer with exactly `capacity` subscript slots.
    pub fn with_capacity(varname: Option<Bytes>, capacity: usize) -> Self {
        Self {
            varname,
            slots: vec![Bytes::new(); capacity],
            length: 0,
        }
    }

    /// Create an empty buffer sized for `depth` subscripts plus the
    /// configured headroom.
    pub fn allocate(config: &CacheConfig, varname: Option<Bytes>, depth: usize) -> Self {
        let capacity = config.capacity_for(depth);
        tracing::trace!(target: "keypath::cache", depth, capacity, "allocating key buffer");
        Self::with_capacity(varname, capacity)
    }

    /// Variable name, if one was set
    pub fn varname(&self) -> Option<&Bytes> {
        self.varname.as_ref()
    }

    /// Number of subscripts in use
    pub fn len(&self) -> usize {
        self.length
    }

    /// Check if no subscripts are in use
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of subscript slots allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Subscripts in use, in order
    pub fn subscripts(&self) -> &[Bytes] {
        &self.slots[..self.length]
    }

    /// Subscript at 1-based `index`, if in use
    pub fn subscript(&self, index: usize) -> Option<&Bytes> {
        index.checked_sub(1).and_then(|i| self.subscripts().get(i))
    }

    /// View of the key formed by the varname and the first `depth` subscripts.
    pub fn key(&self, depth: usize) -> Result<KeyRef<'_>> {
        if depth > self.length {
            return Err(Error::index_range(depth as i64, 0, self.length));
        }
        Ok(KeyRef {
            varname: self.varname.as_ref().map(|v| &v[..]).unwrap_or(&[]),
            subscripts: &self.slots[..depth],
        })
    }

    /// View of the full key (all subscripts in use).
    pub fn full_key(&self) -> KeyRef<'_> {
        KeyRef {
            varname: self.varname.as_ref().map(|v| &v[..]).unwrap_or(&[]),
            subscripts: self.subscripts(),
        }
    }

    /// Append a subscript after the last one in use.
    ///
    /// Callers size the buffer first; pushing past capacity is a bug.
    pub(crate) fn push(&mut self, subscript: Bytes) {
        debug_assert!(self.length < self.slots.len(), "key buffer overflow");
        self.slots[self.length] = subscript;
        self.length += 1;
    }

    /// Claim slot `depth - 1` for `subscript` and make `depth` the length.
    pub(crate) fn claim(&mut self, depth: usize, subscript: Bytes) {
        debug_assert!(depth >= 1 && depth <= self.slots.len());
        self.slots[depth - 1] = subscript;
        self.length = depth;
    }

    /// Overwrite slot `index` (0-based, already bounds-checked).
    pub(crate) fn set_slot(&mut self, index: usize, subscript: Bytes) {
        self.slots[index] = subscript;
    }

    /// New buffer holding this buffer's varname and first `prefix`
    /// subscripts, sized for `depth` subscripts plus headroom.
    pub(crate) fn copy_prefix(&self, config: &CacheConfig, prefix: usize, depth: usize) -> Self {
        let mut copy = Self::allocate(config, self.varname.clone(), depth);
        for subscript in &self.slots[..prefix] {
            copy.push(subscript.clone());
        }
        copy
    }
}

impl fmt::Debug for KeyPathBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPathBuffer")
            .field("varname", &self.varname)
            .field("subscripts", &self.subscripts())
            .field("length", &self.length)
            .field("capacity", &self.slots.len())
            .finish()
    }
}

/// Borrowed view of one key, as passed to the storage call interface
///
/// Views carry pointer and length only; nothing is null-terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRef<'a> {
    /// Variable name bytes (empty if the buffer had none)
    pub varname: &'a [u8],
    /// Subscripts of the key, in order
    pub subscripts: &'a [Bytes],
}

impl KeyRef<'_> {
    /// Number of subscripts in the key
    pub fn depth(&self) -> usize {
        self.subscripts.len()
    }
}

/// Returns true if a node at `depth` may write its subscript straight into a
/// buffer with the given `capacity` and `length`.
///
/// The slot must exist and must not already be claimed by a sibling built
/// from the same buffer. Otherwise the caller copies the prefix.
#[inline]
pub fn can_share(depth: usize, capacity: usize, length: usize) -> bool {
    depth < capacity && length < depth
}

/// Shared handle on a buffer held by one or more nodes
///
/// Nodes that share structure hold clones of the same handle; writes made
/// through one (see [`replace`](crate::replace)) are seen by all of them.
/// Use [`snapshot`](Self::snapshot) for a copy that will not change.
///
/// Borrows taken with [`borrow`](Self::borrow) must be released before the
/// buffer is built on or replaced into.
#[derive(Clone)]
pub struct BufferHandle(Rc<RefCell<KeyPathBuffer>>);

impl BufferHandle {
    /// Wrap a freshly built buffer
    pub fn new(buffer: KeyPathBuffer) -> Self {
        Self(Rc::new(RefCell::new(buffer)))
    }

    /// Borrow the buffer for reading
    pub fn borrow(&self) -> Ref<'_, KeyPathBuffer> {
        self.0.borrow()
    }

    pub(crate) fn borrow_mut(&self) -> RefMut<'_, KeyPathBuffer> {
        self.0.borrow_mut()
    }

    /// Run `f` with the buffer borrowed
    pub fn with<R>(&self, f: impl FnOnce(&KeyPathBuffer) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Independent copy that later in-place writes will not affect
    pub fn snapshot(&self) -> KeyPathBuffer {
        self.0.borrow().clone()
    }

    /// Check if both handles refer to the same physical buffer
    pub fn ptr_eq(&self, other: &BufferHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of subscripts in use
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Check if no subscripts are in use
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Number of subscript slots allocated
    pub fn capacity(&self) -> usize {
        self.0.borrow().capacity()
    }
}

impl fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(buffer) => f.debug_tuple("BufferHandle").field(&*buffer).finish(),
            Err(_) => f.write_str("BufferHandle(<borrowed>)"),
        }
    }
}

impl From<KeyPathBuffer> for BufferHandle {
    fn from(buffer: KeyPathBuffer) -> Self {
        Self::new(buffer)
    }
}

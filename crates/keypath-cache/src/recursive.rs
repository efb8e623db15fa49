//! Build a buffer from a chain of logical nodes
//!
//! A node knows its own subscript, its depth, and its parent: either another
//! node, or (for nodes created from a flat path) the list of subscripts above
//! it. Building walks up until it finds an ancestor that already has a buffer
//! (or reaches the top), then comes back down writing one subscript per level.
//!
//! # Structural sharing
//!
//! On the way down each node looks at the buffer produced for its parent. If
//! the slot it needs is inside the allocation and no sibling has claimed it
//! yet ([`can_share`]), it writes its subscript there and adopts the buffer.
//! Otherwise it copies the prefix into a fresh buffer with headroom. A buffer
//! is only ever written past its current length, so holders of the same
//! buffer never see their own prefix change.
//!
//! # Memoization
//!
//! With `apply`, the handle is stored on the requested node and on every
//! ancestor built during the walk, so later requests anywhere on the path hit
//! the fast path.

use bytes::Bytes;
use keypath_core::{CacheConfig, Error, Result};
use smallvec::SmallVec;

use crate::buffer::{can_share, BufferHandle, KeyPathBuffer};

/// What sits above a node
#[derive(Debug)]
pub enum Parent<'a, N: ?Sized> {
    /// Top of the tree: a depth-0 node has no parent
    Root,
    /// Another node one level up
    Node(&'a N),
    /// The subscripts above this node, for nodes created from a flat path
    List(&'a [Bytes]),
}

/// A logical node the builder can walk
///
/// Implemented by the node layer that owns the subscript strings. The
/// builder only reads these fields, plus [`set_cached`](Self::set_cached)
/// when asked to memoize.
pub trait KeyNode {
    /// Number of subscripts from the root to this node, inclusive
    fn depth(&self) -> usize;

    /// Variable name of the key
    fn varname(&self) -> &Bytes;

    /// This node's own subscript; `None` only at depth 0
    fn name(&self) -> Option<&Bytes>;

    /// The level above
    fn parent(&self) -> Parent<'_, Self>;

    /// Memoized buffer, if any
    fn cached(&self) -> Option<BufferHandle>;

    /// Memoize a buffer on this node
    fn set_cached(&self, buffer: BufferHandle);
}

/// Return the buffer for `node`, building it if the node has none.
///
/// The node layout is validated during the walk up, before any buffer is
/// written or memoized, so an error leaves every node as it was.
pub fn build<N: KeyNode + ?Sized>(
    config: &CacheConfig,
    node: &N,
    apply: bool,
) -> Result<BufferHandle> {
    if let Some(cached) = node.cached() {
        return Ok(cached);
    }
    config.check_depth(node.depth())?;

    // Nodes still to be written, deepest first.
    let mut pending: SmallVec<[(&N, &Bytes); 8]> = SmallVec::new();
    let mut root: Option<&N> = None;
    let mut current = node;

    let base = loop {
        let depth = current.depth();
        if depth == 0 {
            root = Some(current);
            break BufferHandle::new(KeyPathBuffer::allocate(
                config,
                Some(current.varname().clone()),
                0,
            ));
        }
        let name = current.name().ok_or_else(|| {
            Error::missing_field("name", depth as i64, "expected a subscript string")
        })?;
        pending.push((current, name));

        match current.parent() {
            Parent::Node(parent) => {
                if parent.depth() + 1 != depth {
                    return Err(Error::missing_field(
                        "depth",
                        depth as i64,
                        format!("parent node is at depth {}", parent.depth()),
                    ));
                }
                if let Some(cached) = parent.cached() {
                    break cached;
                }
                current = parent;
            }
            Parent::List(list) => {
                if list.len() + 1 != depth {
                    return Err(Error::missing_field(
                        "parent",
                        depth as i64,
                        format!("expected {} parent subscripts, found {}", depth - 1, list.len()),
                    ));
                }
                let mut buffer =
                    KeyPathBuffer::allocate(config, Some(current.varname().clone()), depth);
                for subscript in list {
                    buffer.push(subscript.clone());
                }
                break BufferHandle::new(buffer);
            }
            Parent::Root => {
                return Err(Error::missing_field(
                    "parent",
                    depth as i64,
                    "expected a parent node or a list of subscripts",
                ));
            }
        }
    };

    if apply {
        if let Some(root) = root {
            root.set_cached(base.clone());
        }
    }

    let mut buffer = base;
    for &(level, name) in pending.iter().rev() {
        let depth = level.depth();
        buffer = adopt_or_copy(config, buffer, depth);
        buffer.borrow_mut().claim(depth, name.clone());
        if apply {
            level.set_cached(buffer.clone());
        }
    }
    Ok(buffer)
}

/// Share `candidate` for a node at `depth` if its slot is free, otherwise
/// copy the `depth - 1` prefix into a new buffer.
fn adopt_or_copy(config: &CacheConfig, candidate: BufferHandle, depth: usize) -> BufferHandle {
    let (capacity, length) = {
        let buf = candidate.borrow();
        (buf.capacity(), buf.len())
    };
    if can_share(depth, capacity, length) {
        tracing::trace!(target: "keypath::cache", depth, capacity, length, "sharing parent buffer");
        return candidate;
    }
    tracing::trace!(
        target: "keypath::cache",
        depth,
        capacity,
        length,
        "copying shared prefix into new buffer"
    );
    let copy = candidate.borrow().copy_prefix(config, depth - 1, depth);
    BufferHandle::new(copy)
}

//! Extend a key by several subscripts at once
//!
//! Same share-or-copy rule as the recursive builder: the extension is
//! written in place when every slot it needs is allocated and unclaimed,
//! otherwise the prefix moves to a new buffer sized for the longer key.

use bytes::Bytes;
use keypath_core::{CacheConfig, Error, Result};

use crate::buffer::{can_share, BufferHandle};

/// Return a buffer holding the first `depth` subscripts of `handle`
/// followed by `extras`.
///
/// `depth` is the depth of the key being extended, which may be less than
/// the buffer's length when the buffer is shared with deeper nodes.
pub fn append(
    config: &CacheConfig,
    handle: &BufferHandle,
    depth: usize,
    extras: &[Bytes],
) -> Result<BufferHandle> {
    let (capacity, length) = {
        let buf = handle.borrow();
        (buf.capacity(), buf.len())
    };
    if depth > length {
        return Err(Error::index_range(depth as i64, 0, length));
    }
    if extras.is_empty() {
        return Ok(handle.clone());
    }
    let new_depth = depth + extras.len();
    config.check_depth(new_depth)?;

    let target = if length <= depth && can_share(new_depth, capacity, length) {
        tracing::trace!(target: "keypath::cache", depth, new_depth, capacity, "appending in place");
        handle.clone()
    } else {
        tracing::trace!(
            target: "keypath::cache",
            depth,
            new_depth,
            capacity,
            length,
            "appending into new buffer"
        );
        BufferHandle::new(handle.borrow().copy_prefix(config, depth, new_depth))
    };

    {
        let mut buf = target.borrow_mut();
        for (i, subscript) in extras.iter().enumerate() {
            buf.claim(depth + i + 1, subscript.clone());
        }
    }
    Ok(target)
}

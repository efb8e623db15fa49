//! In-place subscript replacement
//!
//! Iterating the children of a node only changes the last subscript of the
//! key. Overwriting that one slot avoids building a buffer per step.
//!
//! The write lands in the physical buffer, so every node sharing it sees the
//! new subscript. Nodes whose buffer is changed this way must be flagged
//! mutable; anyone needing a stable key takes a
//! [`snapshot`](crate::BufferHandle::snapshot).

use bytes::Bytes;
use keypath_core::{Error, Result, Value};

use crate::buffer::{BufferHandle, KeyPathBuffer};

/// Overwrite the subscript at 1-based `index` with a host value.
///
/// Fails with `IndexRange` if `index` is not within `1..=len`, then with
/// `InputType` if `value` is not a string. The buffer is unchanged on error.
pub fn replace(buffer: &mut KeyPathBuffer, index: i64, value: &Value) -> Result<()> {
    let slot = slot_index(buffer, index)?;
    let subscript = value
        .as_bytes()
        .ok_or_else(|| Error::input_type("parameter #3", "a string", value))?;
    buffer.set_slot(slot, subscript.clone());
    Ok(())
}

/// Overwrite the subscript at 1-based `index`.
pub fn replace_subscript(buffer: &mut KeyPathBuffer, index: i64, subscript: Bytes) -> Result<()> {
    let slot = slot_index(buffer, index)?;
    buffer.set_slot(slot, subscript);
    Ok(())
}

fn slot_index(buffer: &KeyPathBuffer, index: i64) -> Result<usize> {
    if index < 1 || index as u64 > buffer.len() as u64 {
        return Err(Error::index_range(index, 1, buffer.len()));
    }
    Ok(index as usize - 1)
}

impl BufferHandle {
    /// Overwrite the subscript at 1-based `index` in the shared buffer.
    pub fn replace(&self, index: i64, subscript: Bytes) -> Result<()> {
        replace_subscript(&mut self.borrow_mut(), index, subscript)
    }

    /// Overwrite the subscript at 1-based `index` with a host value.
    pub fn replace_value(&self, index: i64, value: &Value) -> Result<()> {
        replace(&mut self.borrow_mut(), index, value)
    }
}

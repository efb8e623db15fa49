//! Child subscript iteration
//!
//! The iterator keeps a single cursor node one level below the parent.
//! Each step asks the store for the next sibling and writes it over the
//! cursor's last subscript in place, so walking any number of children
//! costs one buffer.

use std::rc::Rc;

use bytes::Bytes;
use keypath_core::{CacheConfig, Result};
use keypath_storage::KeyStore;

use crate::node::{Node, NodeRef};

/// Iterator over the subscripts directly below a node
///
/// Yields `Err` at most once, then ends.
pub struct SubscriptIter<'s, S: KeyStore + ?Sized> {
    parent: NodeRef,
    cursor: Option<NodeRef>,
    config: CacheConfig,
    store: &'s S,
    reverse: bool,
    done: bool,
}

impl<'s, S: KeyStore + ?Sized> SubscriptIter<'s, S> {
    pub(crate) fn new(parent: NodeRef, config: CacheConfig, store: &'s S, reverse: bool) -> Self {
        tracing::trace!(target: "keypath::node", depth = parent.depth(), reverse, "iterating subscripts");
        Self {
            parent,
            cursor: None,
            config,
            store,
            reverse,
            done: false,
        }
    }

    /// The cursor node, once iteration has started.
    ///
    /// It is flagged mutable: its buffer holds whichever subscript was
    /// yielded last.
    pub fn cursor(&self) -> Option<&NodeRef> {
        self.cursor.as_ref()
    }

    fn step(&mut self) -> Result<Option<Bytes>> {
        let cursor = match &self.cursor {
            Some(cursor) => Rc::clone(cursor),
            None => {
                let cursor = self.parent.child(Bytes::new());
                cursor.mark_mutable();
                self.cursor = Some(Rc::clone(&cursor));
                cursor
            }
        };
        let handle = cursor.key_buffer(&self.config, true)?;
        let depth = cursor.depth();
        let next = {
            let buf = handle.borrow();
            let key = buf.key(depth)?;
            if self.reverse {
                self.store.subscript_previous(key)?
            } else {
                self.store.subscript_next(key)?
            }
        };
        if let Some(subscript) = &next {
            handle.replace(depth as i64, subscript.clone())?;
        }
        Ok(next)
    }
}

impl<S: KeyStore + ?Sized> Iterator for SubscriptIter<'_, S> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.step() {
            Ok(Some(subscript)) => Some(Ok(subscript)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: KeyStore + ?Sized> std::fmt::Debug for SubscriptIter<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptIter")
            .field("parent", &self.parent)
            .field("reverse", &self.reverse)
            .field("done", &self.done)
            .finish()
    }
}

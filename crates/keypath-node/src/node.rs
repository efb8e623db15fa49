//! Logical database nodes
//!
//! A [`Node`] names one position in a hierarchical key space: a variable
//! plus a path of subscripts. Nodes are cheap to create and form a tree
//! through `Rc` parent links. The physical key buffer is built lazily on
//! first use and memoized, shared with ancestors and descendants wherever
//! the cache allows.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use bytes::Bytes;
use keypath_cache::{build, display, from_subscripts, BufferHandle, KeyNode, KeyPathBuffer, Parent};
use keypath_core::{CacheConfig, Result};
use keypath_storage::KeyStore;

use crate::iter::SubscriptIter;

/// Shared reference to a node
pub type NodeRef = Rc<Node>;

#[derive(Debug)]
pub(crate) enum ParentLink {
    Root,
    Node(NodeRef),
    List(Vec<Bytes>),
}

/// One position in a key space
#[derive(Debug)]
pub struct Node {
    varname: Bytes,
    name: Option<Bytes>,
    depth: usize,
    parent: ParentLink,
    cached: RefCell<Option<BufferHandle>>,
    mutable: Cell<bool>,
}

impl Node {
    pub(crate) fn from_parts(
        varname: Bytes,
        name: Option<Bytes>,
        depth: usize,
        parent: ParentLink,
    ) -> NodeRef {
        Rc::new(Self {
            varname,
            name,
            depth,
            parent,
            cached: RefCell::new(None),
            mutable: Cell::new(false),
        })
    }

    /// The unsubscripted variable itself.
    pub fn root(varname: impl Into<Bytes>) -> NodeRef {
        Self::from_parts(varname.into(), None, 0, ParentLink::Root)
    }

    /// A node addressed by a full subscript path, without intermediate
    /// nodes. An empty path gives the root.
    pub fn with_subscripts<I, S>(varname: impl Into<Bytes>, subscripts: I) -> NodeRef
    where
        I: IntoIterator<Item = S>,
        S: Into<Bytes>,
    {
        let mut path: Vec<Bytes> = subscripts.into_iter().map(Into::into).collect();
        match path.pop() {
            None => Self::root(varname),
            Some(name) => {
                let depth = path.len() + 1;
                Self::from_parts(varname.into(), Some(name), depth, ParentLink::List(path))
            }
        }
    }

    /// Child of this node one level down.
    pub fn child(self: &Rc<Self>, name: impl Into<Bytes>) -> NodeRef {
        Self::from_parts(
            self.varname.clone(),
            Some(name.into()),
            self.depth + 1,
            ParentLink::Node(Rc::clone(self)),
        )
    }

    /// Variable name
    pub fn varname(&self) -> &Bytes {
        &self.varname
    }

    /// This node's own subscript, `None` for the root
    pub fn name(&self) -> Option<&Bytes> {
        self.name.as_ref()
    }

    /// Number of subscripts in this node's key
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Parent node, if this node was created as a child
    pub fn parent_node(&self) -> Option<&NodeRef> {
        match &self.parent {
            ParentLink::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Subscripts from the root down to this node.
    ///
    /// Read from the node chain, not from the buffer, so in-place
    /// replacement on a shared buffer does not affect it.
    pub fn path(&self) -> Vec<Bytes> {
        let mut reversed = Vec::with_capacity(self.depth);
        let mut current = self;
        loop {
            if let Some(name) = &current.name {
                reversed.push(name.clone());
            }
            match &current.parent {
                ParentLink::Root => break,
                ParentLink::Node(parent) => current = parent,
                ParentLink::List(list) => {
                    reversed.extend(list.iter().rev().cloned());
                    break;
                }
            }
        }
        reversed.reverse();
        reversed
    }

    /// Key buffer for this node, built on first use.
    ///
    /// With `apply` the buffer is memoized here and on every ancestor built
    /// along the way. Only the first [`depth`](Self::depth) subscripts of
    /// the result belong to this node.
    pub fn key_buffer(&self, config: &CacheConfig, apply: bool) -> Result<BufferHandle> {
        build(config, self, apply)
    }

    /// Copy of this node's key that later in-place writes will not change.
    pub fn stable_key(&self, config: &CacheConfig) -> Result<KeyPathBuffer> {
        let handle = self.key_buffer(config, true)?;
        let mut copy = handle.snapshot();
        if copy.len() > self.depth {
            copy = from_subscripts(config, self.varname.clone(), &copy.subscripts()[..self.depth], &[])?;
        }
        Ok(copy)
    }

    /// Memoized buffer, if one has been built with `apply`
    pub fn cached_buffer(&self) -> Option<BufferHandle> {
        self.cached.borrow().clone()
    }

    /// True once this node's buffer may be overwritten in place
    pub fn is_mutable(&self) -> bool {
        self.mutable.get()
    }

    /// Flag this node's buffer as subject to in-place replacement.
    pub fn mark_mutable(&self) {
        self.mutable.set(true);
    }

    /// Iterate the subscripts of this node's children in collation order.
    pub fn subscripts<'s, S>(self: &Rc<Self>, config: &CacheConfig, store: &'s S) -> SubscriptIter<'s, S>
    where
        S: KeyStore + ?Sized,
    {
        SubscriptIter::new(Rc::clone(self), *config, store, false)
    }

    /// Iterate children in reverse collation order.
    pub fn subscripts_rev<'s, S>(
        self: &Rc<Self>,
        config: &CacheConfig,
        store: &'s S,
    ) -> SubscriptIter<'s, S>
    where
        S: KeyStore + ?Sized,
    {
        SubscriptIter::new(Rc::clone(self), *config, store, true)
    }

    /// Value stored at this node
    pub fn get<S: KeyStore + ?Sized>(&self, config: &CacheConfig, store: &S) -> Result<Option<Bytes>> {
        let handle = self.key_buffer(config, true)?;
        let buf = handle.borrow();
        store.get(buf.key(self.depth)?)
    }

    /// Store a value at this node
    pub fn set<S: KeyStore + ?Sized>(&self, config: &CacheConfig, store: &S, value: impl Into<Bytes>) -> Result<()> {
        let handle = self.key_buffer(config, true)?;
        let buf = handle.borrow();
        store.set(buf.key(self.depth)?, value.into())
    }

    /// 0, 1, 10 or 11: whether this node has a value and/or children
    pub fn data<S: KeyStore + ?Sized>(&self, config: &CacheConfig, store: &S) -> Result<u8> {
        let handle = self.key_buffer(config, true)?;
        let buf = handle.borrow();
        store.data(buf.key(self.depth)?)
    }

    /// Remove this node and all its descendants
    pub fn delete_tree<S: KeyStore + ?Sized>(&self, config: &CacheConfig, store: &S) -> Result<()> {
        let handle = self.key_buffer(config, true)?;
        let buf = handle.borrow();
        store.delete_tree(buf.key(self.depth)?)
    }

    /// Add `increment` (1 if empty) to the value here and return the sum
    pub fn incr<S: KeyStore + ?Sized>(&self, config: &CacheConfig, store: &S, increment: &[u8]) -> Result<Bytes> {
        let handle = self.key_buffer(config, true)?;
        let buf = handle.borrow();
        store.incr(buf.key(self.depth)?, increment)
    }

    /// Subscripts of the next node with data, in depth-first order
    pub fn next_node<S: KeyStore + ?Sized>(&self, config: &CacheConfig, store: &S) -> Result<Option<Vec<Bytes>>> {
        let handle = self.key_buffer(config, true)?;
        let buf = handle.borrow();
        store.node_next(buf.key(self.depth)?)
    }

    /// Subscripts of the previous node with data, in depth-first order
    pub fn previous_node<S: KeyStore + ?Sized>(&self, config: &CacheConfig, store: &S) -> Result<Option<Vec<Bytes>>> {
        let handle = self.key_buffer(config, true)?;
        let buf = handle.borrow();
        store.node_previous(buf.key(self.depth)?)
    }
}

impl KeyNode for Node {
    fn depth(&self) -> usize {
        self.depth
    }

    fn varname(&self) -> &Bytes {
        &self.varname
    }

    fn name(&self) -> Option<&Bytes> {
        self.name.as_ref()
    }

    fn parent(&self) -> Parent<'_, Self> {
        match &self.parent {
            ParentLink::Root => Parent::Root,
            ParentLink::Node(node) => Parent::Node(&**node),
            ParentLink::List(list) => Parent::List(list.as_slice()),
        }
    }

    fn cached(&self) -> Option<BufferHandle> {
        self.cached.borrow().clone()
    }

    fn set_cached(&self, buffer: BufferHandle) {
        *self.cached.borrow_mut() = Some(buffer);
    }
}

/// Renders as `^X("a",1)`. A mutable node shows the subscript currently in
/// its buffer rather than the name it was created with.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let depth = Some(self.depth as i64);
        let rendered = match self.cached_buffer() {
            Some(handle) => display(&handle.borrow(), depth),
            None => {
                let path = self.path();
                let config = CacheConfig {
                    max_depth: path.len(),
                    ..CacheConfig::default()
                };
                from_subscripts(&config, self.varname.clone(), &path, &[])
                    .and_then(|buf| display(&buf, depth))
            }
        };
        f.write_str(&rendered.map_err(|_| fmt::Error)?)
    }
}

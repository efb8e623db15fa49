//! Public types for the keypath facade.
//!
//! This module re-exports types from the internal crates with one flat
//! namespace.

// ============================================================================
// Host-facing values and errors
// ============================================================================

pub use keypath_core::{Error, Result, Value};

// Configuration
pub use keypath_core::config::ConfigError;
pub use keypath_core::CacheConfig;

// ============================================================================
// Buffers
// ============================================================================

pub use keypath_cache::{BufferHandle, KeyPathBuffer, KeyRef};

// Subscript views
pub use bytes::Bytes;

// Builder seam for callers with their own node types
pub use keypath_cache::{KeyNode, Parent};

// ============================================================================
// Nodes and stores
// ============================================================================

pub use keypath_node::{Node, NodeFields, NodeRef, ParentField, SubscriptIter};
pub use keypath_storage::{Collated, KeyStore, MemoryStore};

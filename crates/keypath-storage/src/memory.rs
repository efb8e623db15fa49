//! In-process key store
//!
//! Keys live in one ordered map under a read-write lock. Subscripts are
//! stored in their [`Collated`] form, so map order is depth-first
//! collation order: a node sorts before its descendants, which sort before
//! its next sibling. Every traversal is a single range lookup; the `End`
//! marker bounds a subtree without knowing what follows it.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use bytes::Bytes;
use keypath_cache::KeyRef;
use keypath_core::{Error, Result, MAX_SUBSCRIPTS};
use parking_lot::RwLock;

use crate::collation::{is_canonical_number, Collated};
use crate::number::Decimal;
use crate::{KeyStore, DATA_NONE, DATA_SUBTREE, DATA_VALUE};

/// One position in a stored path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Slot {
    Sub(Collated),
    /// Sorts after every subscript; only ever used in range bounds
    End,
}

type StoredKey = (Bytes, Vec<Slot>);

/// Ordered in-memory [`KeyStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<BTreeMap<StoredKey, Bytes>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Remove everything.
    pub fn clear(&self) {
        self.data.write().clear();
    }
}

fn stored_key(key: KeyRef<'_>) -> Result<StoredKey> {
    if key.varname.is_empty() {
        return Err(Error::InputType {
            position: "varname".to_string(),
            expected: "a non-empty string",
            actual: "empty string",
        });
    }
    Ok((
        Bytes::copy_from_slice(key.varname),
        key.subscripts
            .iter()
            .map(|s| Slot::Sub(Collated::new(s)))
            .collect(),
    ))
}

/// `key` followed by `End`: greater than `key` and all its descendants,
/// less than its next sibling.
fn past_subtree(key: &StoredKey) -> StoredKey {
    let mut slots = key.1.clone();
    slots.push(Slot::End);
    (key.0.clone(), slots)
}

fn subscripts_of(slots: &[Slot]) -> Vec<Bytes> {
    slots
        .iter()
        .filter_map(|slot| match slot {
            Slot::Sub(c) => Some(c.to_bytes()),
            Slot::End => None,
        })
        .collect()
}

/// Split a key for sibling traversal into (parent key, key).
fn sibling_key(key: KeyRef<'_>) -> Result<(StoredKey, StoredKey)> {
    let key = stored_key(key)?;
    if key.1.is_empty() {
        return Err(Error::index_range(0, 1, MAX_SUBSCRIPTS));
    }
    let parent = (key.0.clone(), key.1[..key.1.len() - 1].to_vec());
    Ok((parent, key))
}

/// The subscript at `level` of a stored key, if the key lies strictly
/// below `parent`.
fn child_slot<'a>(parent: &StoredKey, stored: &'a StoredKey) -> Option<&'a Collated> {
    if stored.0 != parent.0 || !stored.1.starts_with(&parent.1) {
        return None;
    }
    match stored.1.get(parent.1.len()) {
        Some(Slot::Sub(c)) => Some(c),
        _ => None,
    }
}

impl KeyStore for MemoryStore {
    fn get(&self, key: KeyRef<'_>) -> Result<Option<Bytes>> {
        let key = stored_key(key)?;
        Ok(self.data.read().get(&key).cloned())
    }

    fn set(&self, key: KeyRef<'_>, value: Bytes) -> Result<()> {
        let key = stored_key(key)?;
        tracing::trace!(target: "keypath::storage", depth = key.1.len(), "set");
        self.data.write().insert(key, value);
        Ok(())
    }

    fn data(&self, key: KeyRef<'_>) -> Result<u8> {
        let key = stored_key(key)?;
        let map = self.data.read();
        let mut result = DATA_NONE;
        // at most the node itself, then its first descendant
        for (stored, _) in map.range(key.clone()..past_subtree(&key)).take(2) {
            if stored.1.len() == key.1.len() {
                result += DATA_VALUE;
            } else {
                result += DATA_SUBTREE;
                break;
            }
        }
        Ok(result)
    }

    fn delete_node(&self, key: KeyRef<'_>) -> Result<()> {
        let key = stored_key(key)?;
        self.data.write().remove(&key);
        Ok(())
    }

    fn delete_tree(&self, key: KeyRef<'_>) -> Result<()> {
        let key = stored_key(key)?;
        let mut map = self.data.write();
        let doomed: Vec<StoredKey> = map
            .range(key.clone()..past_subtree(&key))
            .map(|(k, _)| k.clone())
            .collect();
        tracing::debug!(target: "keypath::storage", removed = doomed.len(), "delete tree");
        for k in doomed {
            map.remove(&k);
        }
        Ok(())
    }

    fn subscript_next(&self, key: KeyRef<'_>) -> Result<Option<Bytes>> {
        let (parent, key) = sibling_key(key)?;
        let map = self.data.read();
        // skips `key` and its descendants; an empty last subscript skips
        // only a stored "" child and the parent itself
        let next = map
            .range(past_subtree(&key)..)
            .next()
            .and_then(|(stored, _)| child_slot(&parent, stored))
            .map(Collated::to_bytes);
        Ok(next)
    }

    fn subscript_previous(&self, key: KeyRef<'_>) -> Result<Option<Bytes>> {
        let (parent, key) = sibling_key(key)?;
        let starts_at_end = matches!(key.1.last(), Some(Slot::Sub(Collated::Empty)));
        let bound = if starts_at_end { past_subtree(&parent) } else { key };
        let map = self.data.read();
        let previous = map
            .range(..bound)
            .next_back()
            .and_then(|(stored, _)| child_slot(&parent, stored))
            .filter(|c| !c.is_empty())
            .map(Collated::to_bytes);
        Ok(previous)
    }

    fn node_next(&self, key: KeyRef<'_>) -> Result<Option<Vec<Bytes>>> {
        let key = stored_key(key)?;
        let map = self.data.read();
        let next = map
            .range((Excluded(&key), Unbounded))
            .next()
            .filter(|(stored, _)| stored.0 == key.0)
            .map(|(stored, _)| subscripts_of(&stored.1));
        Ok(next)
    }

    fn node_previous(&self, key: KeyRef<'_>) -> Result<Option<Vec<Bytes>>> {
        let key = stored_key(key)?;
        let map = self.data.read();
        let previous = map
            .range(..&key)
            .next_back()
            .filter(|(stored, _)| stored.0 == key.0)
            .map(|(stored, _)| subscripts_of(&stored.1));
        Ok(previous)
    }

    fn incr(&self, key: KeyRef<'_>, increment: &[u8]) -> Result<Bytes> {
        let key = stored_key(key)?;
        let step = if increment.is_empty() {
            Decimal::ONE
        } else if is_canonical_number(increment) {
            Decimal::from_numeric_prefix(increment)?
        } else {
            return Err(Error::InputType {
                position: "increment".to_string(),
                expected: "a canonical number",
                actual: "string",
            });
        };

        let mut map = self.data.write();
        let current = match map.get(&key) {
            Some(value) => Decimal::from_numeric_prefix(value)?,
            None => Decimal::ZERO,
        };
        let sum = current
            .checked_add(step)
            .ok_or_else(|| Error::numeric_overflow(format!("{} + {}", current, step)))?;
        let value = Bytes::from(sum.to_string());
        tracing::trace!(target: "keypath::storage", depth = key.1.len(), "incr");
        map.insert(key, value.clone());
        Ok(value)
    }
}

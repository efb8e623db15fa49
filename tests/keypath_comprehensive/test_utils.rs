//! Shared helpers for the comprehensive suite

use bytes::Bytes;
use keypath::{BufferHandle, CacheConfig, MemoryStore, Node, NodeRef};

pub fn config() -> CacheConfig {
    CacheConfig::default()
}

pub fn b(s: &str) -> Bytes {
    Bytes::copy_from_slice(s.as_bytes())
}

pub fn bytes_vec(items: &[&str]) -> Vec<Bytes> {
    items.iter().map(|s| b(s)).collect()
}

/// First `depth` subscripts of a handle as strings
pub fn prefix(handle: &BufferHandle, depth: usize) -> Vec<String> {
    handle.with(|buf| {
        buf.subscripts()[..depth]
            .iter()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .collect()
    })
}

/// `^Population` with three countries and USA census dates below USA
pub fn population() -> (MemoryStore, NodeRef) {
    let store = MemoryStore::new();
    let root = Node::root("^Population");
    for (country, count) in [("Belgium", "1231"), ("Thailand", "8414"), ("USA", "325737")] {
        root.child(country).set(&config(), &store, count).unwrap();
    }
    let usa = root.child("USA");
    for (date, count) in [
        ("17900802", "3929326"),
        ("18000804", "5308483"),
        ("20100401", "308745538"),
    ] {
        usa.child(date).set(&config(), &store, count).unwrap();
    }
    (store, root)
}

/// Install a test subscriber once so `keypath::*` trace events are exercised.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("keypath=trace")
        .with_test_writer()
        .try_init();
}

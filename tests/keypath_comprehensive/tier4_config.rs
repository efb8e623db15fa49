//! Tier 4: Configuration files and logging

use crate::test_utils::*;
use keypath::{CacheConfig, ConfigError, Node};
use std::io::Write;

#[test]
fn test_load_from_file_drives_capacity() {
    init_tracing();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[cache]\noveralloc = 2\nmax_depth = 4").unwrap();
    let config = CacheConfig::load(file.path()).unwrap();
    assert_eq!(config.overalloc, 2);

    let handle = Node::root("^X").child("a").key_buffer(&config, true).unwrap();
    assert_eq!(handle.capacity(), 2);

    let deep = Node::with_subscripts("^X", ["a", "b", "c", "d", "e"]);
    assert!(deep.key_buffer(&config, true).unwrap_err().is_stack_growth());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = CacheConfig::load(dir.path().join("keypath.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_clamped_values() {
    init_tracing();
    let config = CacheConfig::from_toml_str("[cache]\noveralloc = 0\nmax_depth = 500").unwrap();
    assert_eq!(config.overalloc, 1);
    assert_eq!(config.max_depth, 31);
}

#[test]
fn test_empty_file_defaults() {
    assert_eq!(CacheConfig::from_toml_str("").unwrap(), config());
}

//! Tier 2: Structural sharing and memoization
//!
//! A node's subscripts 1..depth are exactly its path no matter how buffers
//! are shared, and building one branch never changes another's prefix.

use crate::test_utils::*;
use keypath::{append, Node};

#[test]
fn test_chain_shares_single_buffer() {
    let root = Node::root("^X");
    let a = root.child("a");
    let c = a.child("b").child("c");
    let handle = c.key_buffer(&config(), true).unwrap();
    assert!(a.cached_buffer().unwrap().ptr_eq(&handle));
    assert!(root.cached_buffer().unwrap().ptr_eq(&handle));
    assert_eq!(prefix(&handle, 3), ["a", "b", "c"]);
}

#[test]
fn test_siblings_never_corrupt_each_other() {
    let parent = Node::root("^X").child("p");
    let children: Vec<_> = ["A", "B", "C", "D"].iter().map(|n| parent.child(*n)).collect();
    let handles: Vec<_> = children
        .iter()
        .map(|c| c.key_buffer(&config(), true).unwrap())
        .collect();
    for (child, handle) in children.iter().zip(&handles) {
        let name = String::from_utf8_lossy(child.name().unwrap()).into_owned();
        assert_eq!(prefix(handle, 2), vec!["p".to_string(), name]);
    }
    assert_eq!(prefix(&parent.cached_buffer().unwrap(), 1), ["p"]);
}

#[test]
fn test_deep_tree_matches_paths() {
    let root = Node::root("^T");
    let mut frontier = vec![root];
    let mut all = Vec::new();
    for level in 0..4 {
        let mut next = Vec::new();
        for node in &frontier {
            for i in 0..3 {
                next.push(node.child(format!("{}-{}", level, i)));
            }
        }
        all.extend(next.iter().cloned());
        frontier = next;
    }
    // build in an order that mixes depths
    for node in all.iter().rev() {
        node.key_buffer(&config(), true).unwrap();
    }
    for node in &all {
        let handle = node.cached_buffer().unwrap();
        let path: Vec<String> = node
            .path()
            .iter()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .collect();
        assert_eq!(prefix(&handle, node.depth()), path);
        assert!(handle.len() <= handle.capacity());
    }
}

#[test]
fn test_list_parent_shares_with_descendants() {
    let node = Node::with_subscripts("^Pop", ["USA"]);
    let child = node.child("1790");
    let handle = child.key_buffer(&config(), true).unwrap();
    assert!(node.cached_buffer().unwrap().ptr_eq(&handle));
    assert_eq!(child.to_string(), "^Pop(\"USA\",1790)");
}

#[test]
fn test_append_after_node_build() {
    let a = Node::root("^X").child("a");
    let handle = a.key_buffer(&config(), true).unwrap();
    let longer = append(&config(), &handle, 1, &bytes_vec(&["b", "c"])).unwrap();
    assert!(longer.ptr_eq(&handle));
    assert_eq!(prefix(&longer, 3), ["a", "b", "c"]);
    // a sibling built afterwards copies instead of overwriting slot 2
    let sibling = a.child("z").key_buffer(&config(), true).unwrap();
    assert!(!sibling.ptr_eq(&handle));
    assert_eq!(prefix(&handle, 3), ["a", "b", "c"]);
}

#[test]
fn test_without_apply_rebuilds_each_time() {
    let a = Node::root("^X").child("a");
    let first = a.key_buffer(&config(), false).unwrap();
    let second = a.key_buffer(&config(), false).unwrap();
    assert!(!first.ptr_eq(&second));
    assert!(a.cached_buffer().is_none());
}

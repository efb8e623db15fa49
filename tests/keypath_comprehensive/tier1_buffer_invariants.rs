//! Tier 1: Buffer invariants
//!
//! length <= capacity, fresh capacity = depth + overalloc, subscript views
//! alias the caller's bytes, and errors leave buffers untouched.

use crate::test_utils::*;
use keypath::{from_subscripts, from_values, stringify, BufferHandle, Error, Node, Value};
use proptest::prelude::*;

#[test]
fn test_explicit_build_capacity() {
    let buf = from_subscripts(&config(), b("^X"), &bytes_vec(&["a", "b"]), &[]).unwrap();
    assert_eq!(buf.len(), 2);
    assert_eq!(buf.capacity(), 7);
}

#[test]
fn test_subscripts_alias_caller_bytes() {
    let owned = b("shared-subscript");
    let buf = from_subscripts(&config(), b("^X"), &[owned.clone()], &[]).unwrap();
    assert_eq!(buf.subscript(1).unwrap().as_ptr(), owned.as_ptr());
}

#[test]
fn test_host_values_match_typed_build() {
    let typed = from_subscripts(&config(), b("^P"), &bytes_vec(&["USA"]), &bytes_vec(&["1790"])).unwrap();
    let host = from_values(
        &config(),
        &[Value::from("^P"), Value::from(vec!["USA"]), Value::from("1790")],
    )
    .unwrap();
    assert_eq!(typed, host);
}

#[test]
fn test_population_rendering() {
    let buf = from_values(
        &config(),
        &[Value::from("^Population"), Value::from(vec!["USA", "17900802"])],
    )
    .unwrap();
    let (subs, varname) = stringify(&buf, None).unwrap();
    assert_eq!(subs, "\"USA\",17900802");
    assert_eq!(varname.unwrap(), "^Population");
    assert_eq!(keypath::display(&buf, Some(1)).unwrap(), "^Population(\"USA\")");
}

#[test]
fn test_root_node_renders_at_depth_zero() {
    let handle = Node::root("^X").key_buffer(&config(), true).unwrap();
    let buf = handle.borrow();
    assert_eq!(buf.len(), 0);
    let (subs, varname) = stringify(&buf, Some(0)).unwrap();
    assert_eq!(subs, "");
    assert_eq!(varname.unwrap(), "^X");
    assert_eq!(keypath::display(&buf, None).unwrap(), "^X");
}

#[test]
fn test_replace_out_of_range_leaves_buffer() {
    let handle = BufferHandle::new(
        from_subscripts(&config(), b("^X"), &bytes_vec(&["a", "b"]), &[]).unwrap(),
    );
    let before = handle.snapshot();
    assert_eq!(handle.replace(3, b("z")).unwrap_err(), Error::index_range(3, 1, 2));
    assert_eq!(handle.snapshot(), before);
}

#[test]
fn test_too_deep_rejected_before_allocation() {
    let subs = vec![b("s"); 40];
    assert_eq!(
        from_subscripts(&config(), b("^X"), &subs, &[]).unwrap_err(),
        Error::stack_growth(40, 31)
    );
}

proptest! {
    #[test]
    fn prop_length_within_capacity(
        subs in proptest::collection::vec("[a-z0-9]{0,4}", 0..31),
        overalloc in 1usize..8,
    ) {
        let config = keypath::CacheConfig { overalloc, ..config() };
        let subs: Vec<_> = subs.into_iter().map(bytes::Bytes::from).collect();
        let buf = from_subscripts(&config, b("^P"), &subs, &[]).unwrap();
        prop_assert!(buf.len() <= buf.capacity());
        prop_assert_eq!(buf.capacity(), subs.len() + overalloc);
    }

    #[test]
    fn prop_stringify_depth_prefix(
        subs in proptest::collection::vec("[a-z0-9]{1,4}", 1..10),
        cut in 0usize..10,
    ) {
        let subs: Vec<_> = subs.into_iter().map(bytes::Bytes::from).collect();
        let depth = cut.min(subs.len());
        let buf = from_subscripts(&config(), b("^P"), &subs, &[]).unwrap();
        let full = stringify(&buf, None).unwrap().0;
        let part = stringify(&buf, Some(depth as i64)).unwrap().0;
        prop_assert!(full.starts_with(&part));
    }
}

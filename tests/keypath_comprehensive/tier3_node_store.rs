//! Tier 3: Nodes against a key store

use crate::test_utils::*;
use keypath::{Error, KeyStore, Node, NodeFields, ParentField, Value};

#[test]
fn test_population_walk() {
    let (store, root) = population();
    let countries: Vec<_> = root.subscripts(&config(), &store).collect::<Result<_, _>>().unwrap();
    assert_eq!(countries, bytes_vec(&["Belgium", "Thailand", "USA"]));

    let usa = root.child("USA");
    assert_eq!(usa.data(&config(), &store).unwrap(), 11);
    let dates: Vec<_> = usa.subscripts_rev(&config(), &store).collect::<Result<_, _>>().unwrap();
    assert_eq!(dates, bytes_vec(&["20100401", "18000804", "17900802"]));
}

#[test]
fn test_nested_iteration() {
    let (store, root) = population();
    let mut seen = Vec::new();
    for country in root.subscripts(&config(), &store) {
        let country = country.unwrap();
        let node = root.child(country.clone());
        for date in node.subscripts(&config(), &store) {
            seen.push(format!("{}/{}", String::from_utf8_lossy(&country), String::from_utf8_lossy(&date.unwrap())));
        }
    }
    assert_eq!(seen, ["USA/17900802", "USA/18000804", "USA/20100401"]);
}

#[test]
fn test_host_fields_node_reads_store() {
    let (store, _) = population();
    let node = Node::from_fields(NodeFields {
        varname: Value::from("^Population"),
        depth: Value::Int(2),
        name: Value::from("18000804"),
        parent: ParentField::Value(Value::from(vec!["USA"])),
    })
    .unwrap();
    assert_eq!(node.get(&config(), &store).unwrap(), Some(b("5308483")));
}

#[test]
fn test_direct_store_call_with_buffer_key() {
    let (store, _) = population();
    let buf = keypath::from_values(
        &config(),
        &[Value::from("^Population"), Value::from(vec!["Thailand"])],
    )
    .unwrap();
    assert_eq!(store.get(buf.full_key()).unwrap(), Some(b("8414")));
}

#[test]
fn test_delete_subtree_through_node() {
    let (store, root) = population();
    root.child("USA").delete_tree(&config(), &store).unwrap();
    assert_eq!(root.child("USA").data(&config(), &store).unwrap(), 0);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_decimal_subscripts_iterate_numerically() {
    let (store, _) = population();
    let readings = Node::root("^Reading");
    for sub in ["2", "1.5", "10", "-.5", "x"] {
        readings.child(sub).set(&config(), &store, "1").unwrap();
    }
    let order: Vec<_> = readings.subscripts(&config(), &store).collect::<Result<_, _>>().unwrap();
    assert_eq!(order, bytes_vec(&["-.5", "1.5", "2", "10", "x"]));
}

#[test]
fn test_counter_and_depth_first_walk() {
    let (store, root) = population();
    let usa = root.child("USA");
    assert_eq!(usa.incr(&config(), &store, b"").unwrap(), b("325738"));

    let mut walked = Vec::new();
    let mut cursor = root.child("USA");
    while let Some(subs) = cursor.next_node(&config(), &store).unwrap() {
        walked.push(subs.clone());
        cursor = Node::with_subscripts("^Population", subs);
    }
    assert_eq!(
        walked,
        vec![
            bytes_vec(&["USA", "17900802"]),
            bytes_vec(&["USA", "18000804"]),
            bytes_vec(&["USA", "20100401"]),
        ]
    );
    assert_eq!(usa.previous_node(&config(), &store).unwrap(), Some(bytes_vec(&["Thailand"])));
}

#[test]
fn test_invalid_fields_report_depth() {
    let err = Node::from_fields(NodeFields {
        varname: Value::from("^X"),
        depth: Value::Int(2),
        name: Value::from("b"),
        parent: ParentField::Value(Value::Int(1)),
    })
    .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "parent", depth: 2, .. }));
}

//! Nodes from host-supplied fields
//!
//! A host hands over the four relationship fields of a node as loosely
//! typed values. They are checked once here, so the builder only ever sees
//! well-formed chains.

use bytes::Bytes;
use keypath_core::{Error, Result, Value};

use crate::node::{Node, NodeRef, ParentLink};

/// The `parent` field as supplied by the host
#[derive(Debug, Clone, Default)]
pub enum ParentField {
    /// Not supplied
    #[default]
    Absent,
    /// An existing node one level up
    Node(NodeRef),
    /// Anything else; valid only as a table of subscript strings
    Value(Value),
}

/// Raw node fields
#[derive(Debug, Clone, Default)]
pub struct NodeFields {
    /// Variable name. `Null` inherits it from a parent node.
    pub varname: Value,
    /// Number of subscripts, a non-negative integer
    pub depth: Value,
    /// This node's subscript; ignored at depth 0
    pub name: Value,
    /// What sits above the node
    pub parent: ParentField,
}

impl Node {
    /// Validate host fields and create the node they describe.
    ///
    /// Fails with `MissingField` naming the first offending field.
    pub fn from_fields(fields: NodeFields) -> Result<NodeRef> {
        let depth = match &fields.depth {
            Value::Int(n) if *n >= 0 => *n as usize,
            Value::Int(n) => {
                return Err(Error::missing_field(
                    "depth",
                    *n,
                    "expected a non-negative integer",
                ))
            }
            other => {
                return Err(Error::missing_field(
                    "depth",
                    0,
                    format!("expected a non-negative integer (got {})", other.type_name()),
                ))
            }
        };
        let at = depth as i64;

        let varname = match (&fields.varname, &fields.parent) {
            (Value::String(s), _) if !s.is_empty() => s.clone(),
            (Value::Null, ParentField::Node(parent)) => parent.varname().clone(),
            (other, _) => {
                return Err(Error::missing_field(
                    "varname",
                    at,
                    format!("expected a non-empty string (got {})", describe(other)),
                ))
            }
        };

        if depth == 0 {
            return match fields.parent {
                ParentField::Absent | ParentField::Value(Value::Null) => Ok(Node::root(varname)),
                _ => Err(Error::missing_field(
                    "parent",
                    0,
                    "a depth 0 node has no parent",
                )),
            };
        }

        let name = match fields.name {
            Value::String(s) => s,
            other => {
                return Err(Error::missing_field(
                    "name",
                    at,
                    format!("expected a subscript string (got {})", other.type_name()),
                ))
            }
        };

        let link = match fields.parent {
            ParentField::Node(parent) => {
                if parent.depth() + 1 != depth {
                    return Err(Error::missing_field(
                        "depth",
                        at,
                        format!("parent node is at depth {}", parent.depth()),
                    ));
                }
                if *parent.varname() != varname {
                    return Err(Error::missing_field(
                        "varname",
                        at,
                        "does not match the parent node's varname",
                    ));
                }
                ParentLink::Node(parent)
            }
            ParentField::Value(Value::Table(items)) => {
                ParentLink::List(parent_subscripts(&items, depth)?)
            }
            ParentField::Value(other) => {
                return Err(Error::missing_field(
                    "parent",
                    at,
                    format!(
                        "should be a node reference or a list of subscript strings (got {})",
                        other.type_name()
                    ),
                ))
            }
            ParentField::Absent => {
                return Err(Error::missing_field(
                    "parent",
                    at,
                    "should be a node reference or a list of subscript strings (got nil)",
                ))
            }
        };

        Ok(Node::from_parts(varname, Some(name), depth, link))
    }
}

fn parent_subscripts(items: &[Value], depth: usize) -> Result<Vec<Bytes>> {
    if items.len() + 1 != depth {
        return Err(Error::missing_field(
            "parent",
            depth as i64,
            format!(
                "expected {} parent subscripts, found {}",
                depth - 1,
                items.len()
            ),
        ));
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(Error::missing_field(
                "parent",
                depth as i64,
                format!(
                    "should be a node reference or a list of subscript strings (got {} at parent[{}])",
                    other.type_name(),
                    i + 1
                ),
            )),
        })
        .collect()
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "empty string",
        other => other.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(depth: Value, name: Value, parent: ParentField) -> NodeFields {
        NodeFields {
            varname: Value::from("^X"),
            depth,
            name,
            parent,
        }
    }

    #[test]
    fn test_root_from_fields() {
        let n = Node::from_fields(fields(Value::Int(0), Value::Null, ParentField::Absent)).unwrap();
        assert_eq!(n.depth(), 0);
        assert_eq!(n.to_string(), "^X");
    }

    #[test]
    fn test_child_of_node() {
        let root = Node::root("^X");
        let n = Node::from_fields(NodeFields {
            varname: Value::Null,
            depth: Value::Int(1),
            name: Value::from("a"),
            parent: ParentField::Node(root),
        })
        .unwrap();
        assert_eq!(n.to_string(), "^X(\"a\")");
    }

    #[test]
    fn test_child_of_list() {
        let n = Node::from_fields(fields(
            Value::Int(3),
            Value::from("c"),
            ParentField::Value(Value::from(vec!["a", "b"])),
        ))
        .unwrap();
        assert_eq!(n.path(), vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")]);
    }

    #[test]
    fn test_bad_depth() {
        let err = Node::from_fields(fields(Value::from("1"), Value::from("a"), ParentField::Absent))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "node has invalid 'depth' at depth 0: expected a non-negative integer (got string)"
        );
        let err = Node::from_fields(fields(Value::Int(-2), Value::from("a"), ParentField::Absent))
            .unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn test_missing_name() {
        let err = Node::from_fields(fields(
            Value::Int(1),
            Value::Int(5),
            ParentField::Value(Value::Table(vec![])),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("'name' at depth 1"));
    }

    #[test]
    fn test_parent_list_wrong_length() {
        let err = Node::from_fields(fields(
            Value::Int(3),
            Value::from("c"),
            ParentField::Value(Value::from(vec!["a"])),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("expected 2 parent subscripts, found 1"));
    }

    #[test]
    fn test_parent_list_bad_element() {
        let err = Node::from_fields(fields(
            Value::Int(3),
            Value::from("c"),
            ParentField::Value(Value::Table(vec![Value::from("a"), Value::Int(2)])),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("got integer at parent[2]"));
    }

    #[test]
    fn test_parent_wrong_depth() {
        let a = Node::root("^X").child("a");
        let err = Node::from_fields(fields(Value::Int(3), Value::from("c"), ParentField::Node(a)))
            .unwrap_err();
        assert!(err.to_string().contains("parent node is at depth 1"));
    }

    #[test]
    fn test_parent_not_a_table() {
        let err = Node::from_fields(fields(
            Value::Int(1),
            Value::from("a"),
            ParentField::Value(Value::Bool(true)),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("(got boolean)"));
    }

    #[test]
    fn test_varname_required_without_parent_node() {
        let err = Node::from_fields(NodeFields {
            varname: Value::Null,
            depth: Value::Int(0),
            ..NodeFields::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("'varname'"));
    }

    #[test]
    fn test_root_with_parent_rejected() {
        let err = Node::from_fields(fields(
            Value::Int(0),
            Value::Null,
            ParentField::Node(Node::root("^X")),
        ))
        .unwrap_err();
        assert!(err.to_string().contains("'parent' at depth 0"));
    }
}

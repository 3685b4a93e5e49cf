//! The flat record shape every store reads and writes.
//!
//! On the wire a node is `{ name, properties?, children?, parents? }`. The
//! presence of `properties` versus `children` selects the kind, and the
//! presence of `parents` clears the root marker. [`Node`] converts to and from
//! this shape through serde's `try_from` / `into` hooks.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::node::{Node, NodeKind, Parents};

/// Serialized form of a [`Node`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub properties: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parents: Option<Vec<String>>,
}

/// Maps a present key to `Some`, even when its value is `null`.
fn present_value<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

impl TryFrom<NodeRecord> for Node {
    type Error = CoreError;

    fn try_from(record: NodeRecord) -> Result<Self, Self::Error> {
        let kind = match (record.properties, record.children) {
            (Some(properties), None) => NodeKind::Atom { properties },
            (None, Some(children)) => NodeKind::Molecule { children },
            (Some(_), Some(_)) => {
                return Err(CoreError::MalformedNode {
                    name: record.name,
                    reason: "carries both properties and children".into(),
                })
            }
            (None, None) => {
                return Err(CoreError::MalformedNode {
                    name: record.name,
                    reason: "carries neither properties nor children".into(),
                })
            }
        };
        let parents = match record.parents {
            Some(names) => Parents::Linked(names),
            None => Parents::Root,
        };
        Ok(Node {
            name: record.name,
            kind,
            parents,
        })
    }
}

impl From<Node> for NodeRecord {
    fn from(node: Node) -> Self {
        let (properties, children) = match node.kind {
            NodeKind::Atom { properties } => (Some(properties), None),
            NodeKind::Molecule { children } => (None, Some(children)),
        };
        let parents = match node.parents {
            Parents::Root => None,
            Parents::Linked(names) => Some(names),
        };
        NodeRecord {
            name: node.name,
            properties,
            children,
            parents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parents_key_presence_drives_root_marker() {
        let root: Node = serde_json::from_value(json!({"name": "M", "children": []})).unwrap();
        assert!(root.is_root());

        let linked: Node =
            serde_json::from_value(json!({"name": "M", "children": [], "parents": []})).unwrap();
        assert!(!linked.is_root());
    }

    #[test]
    fn properties_key_selects_atom() {
        let atom: Node =
            serde_json::from_value(json!({"name": "A1", "properties": {"charge": -1}})).unwrap();
        assert!(atom.is_atom());

        // Any JSON value is an opaque payload, null included.
        let null_atom: Node =
            serde_json::from_value(json!({"name": "A2", "properties": null})).unwrap();
        assert!(null_atom.is_atom());
    }

    #[test]
    fn rejects_ambiguous_records() {
        let both = serde_json::from_value::<Node>(
            json!({"name": "X", "properties": {}, "children": []}),
        );
        assert!(both.is_err());

        let neither = serde_json::from_value::<Node>(json!({"name": "X"}));
        assert!(neither.is_err());
    }

    #[test]
    fn molecule_serializes_without_absent_fields() {
        let node = Node::molecule("M", ["A1", "A1"]).with_parents(Vec::<String>::new());
        insta::assert_json_snapshot!(node, @r###"
        {
          "name": "M",
          "children": [
            "A1",
            "A1"
          ],
          "parents": []
        }
        "###);
    }

    #[test]
    fn root_atom_serializes_without_parents() {
        let node = Node::atom("A1", json!({"mass": 2}));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value, json!({"name": "A1", "properties": {"mass": 2}}));
    }
}

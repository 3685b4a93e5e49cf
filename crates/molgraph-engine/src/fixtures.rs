//! Shared test graph.

use molgraph_core::Node;
use molgraph_storage::{InMemoryCacheStore, InMemoryGraphStore};
use serde_json::json;

/// Atoms A1..A4, M1=[A4], M2=[A2,A3], M4=[A1,A3,M1], SuperM=[M2,M4].
pub(crate) fn reference_nodes() -> Vec<Node> {
    vec![
        Node::atom("A1", json!({"symbol": "H"})).with_parents(["M4"]),
        Node::atom("A2", json!({"symbol": "C"})).with_parents(["M2"]),
        Node::atom("A3", json!({"symbol": "O"})).with_parents(["M2", "M4"]),
        Node::atom("A4", json!({"symbol": "N"})).with_parents(["M1"]),
        Node::molecule("M1", ["A4"]).with_parents(["M4"]),
        Node::molecule("M2", ["A2", "A3"]).with_parents(["SuperM"]),
        Node::molecule("M4", ["A1", "A3", "M1"]).with_parents(["SuperM"]),
        Node::molecule("SuperM", ["M2", "M4"]),
    ]
}

pub(crate) fn reference_stores() -> (InMemoryGraphStore, InMemoryCacheStore) {
    (
        InMemoryGraphStore::from_nodes(reference_nodes()).unwrap(),
        InMemoryCacheStore::new(),
    )
}

pub(crate) fn names(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(|n| n.name.clone()).collect()
}

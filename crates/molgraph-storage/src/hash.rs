//! Deterministic composition fingerprints using blake3.
//!
//! A fingerprint covers exactly what a node contributes to cached atom
//! lists: its name, whether it is an atom, and, for a molecule, its child
//! list in order. Atom properties and parent lists are excluded; changing
//! them never makes a cache entry stale. Fingerprints are derived state and
//! never stored.

use std::collections::HashMap;

use molgraph_core::Node;

/// Computes the composition fingerprint of one node.
///
/// Every string is length-prefixed so that `["ab"]` and `["a", "b"]` hash
/// differently.
pub fn hash_composition(node: &Node) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    update_str(&mut hasher, &node.name);
    if node.is_atom() {
        hasher.update(&[0u8]);
    } else {
        hasher.update(&[1u8]);
        let children = node.children();
        hasher.update(&(children.len() as u64).to_le_bytes());
        for child in children {
            update_str(&mut hasher, child);
        }
    }
    hasher.finalize()
}

/// Fingerprints every node, keyed by name.
pub fn hash_all_compositions(nodes: &[Node]) -> HashMap<String, blake3::Hash> {
    nodes
        .iter()
        .map(|n| (n.name.clone(), hash_composition(n)))
        .collect()
}

fn update_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deterministic() {
        let m = Node::molecule("M", ["A1", "A2"]);
        assert_eq!(hash_composition(&m), hash_composition(&m.clone()));
    }

    #[test]
    fn test_child_order_and_multiplicity_matter() {
        let base = hash_composition(&Node::molecule("M", ["A1", "A2"]));
        assert_ne!(base, hash_composition(&Node::molecule("M", ["A2", "A1"])));
        assert_ne!(
            base,
            hash_composition(&Node::molecule("M", ["A1", "A2", "A2"]))
        );
    }

    #[test]
    fn test_parents_and_properties_ignored() {
        let atom = Node::atom("A1", json!({"mass": 1}));
        let changed = Node::atom("A1", json!({"mass": 2})).with_parents(["M"]);
        assert_eq!(hash_composition(&atom), hash_composition(&changed));

        let m = Node::molecule("M", ["A1"]);
        let linked = m.clone().with_parents(["Super"]);
        assert_eq!(hash_composition(&m), hash_composition(&linked));
    }

    #[test]
    fn test_length_prefix_separates_names() {
        let joined = hash_composition(&Node::molecule("M", ["ab"]));
        let split = hash_composition(&Node::molecule("M", ["a", "b"]));
        assert_ne!(joined, split);
    }
}

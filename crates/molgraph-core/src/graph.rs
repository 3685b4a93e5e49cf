//! [`CompositionGraph`]: an in-memory snapshot of a node collection.
//!
//! The stores hand out flat node lists. This snapshot indexes them by name
//! and mirrors the child relation into a petgraph `DiGraph` so that integrity
//! checks (cycles, dangling names, one-sided edges) can run over the whole
//! collection at once. It also provides an uncached atom expansion, the
//! reference the cached resolver is audited against.

use indexmap::IndexMap;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::CoreError;
use crate::node::Node;

/// A structural problem found by [`CompositionGraph::check_integrity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityIssue {
    /// A molecule lists a child that is not in the collection.
    DanglingChild { parent: String, child: String },
    /// A node lists a parent that is not in the collection.
    DanglingParent { child: String, parent: String },
    /// `parent` lists `child`, but `child` does not list `parent`.
    MissingParentLink { parent: String, child: String },
    /// `child` lists `parent`, but `parent` does not list `child`.
    MissingChildLink { parent: String, child: String },
    /// The child relation has a cycle through this node.
    Cycle { name: String },
}

/// Name-indexed snapshot of a node collection with a mirrored child graph.
#[derive(Debug, Clone)]
pub struct CompositionGraph {
    nodes: IndexMap<String, Node>,
    /// Edges point from molecule to child, one per listed occurrence.
    edges: DiGraph<String, ()>,
    indices: IndexMap<String, NodeIndex>,
}

impl CompositionGraph {
    /// Builds a snapshot, preserving the input order.
    ///
    /// Fails with [`CoreError::DuplicateName`] if two nodes share a name.
    /// Dangling child names are tolerated here and reported by
    /// [`check_integrity`](Self::check_integrity).
    pub fn from_nodes<I>(nodes: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut by_name = IndexMap::new();
        let mut edges = DiGraph::new();
        let mut indices = IndexMap::new();

        for node in nodes {
            if by_name.contains_key(&node.name) {
                return Err(CoreError::DuplicateName { name: node.name });
            }
            let idx = edges.add_node(node.name.clone());
            indices.insert(node.name.clone(), idx);
            by_name.insert(node.name.clone(), node);
        }

        for node in by_name.values() {
            let from = indices[&node.name];
            for child in node.children() {
                if let Some(&to) = indices.get(child) {
                    edges.add_edge(from, to, ());
                }
            }
        }

        Ok(CompositionGraph {
            nodes: by_name,
            edges,
            indices,
        })
    }

    /// Looks up a node by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Number of nodes in the snapshot.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of child edges, counting duplicates.
    pub fn edge_count(&self) -> usize {
        self.edges.edge_count()
    }

    /// Iterates over all nodes in input order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Iterates over nodes carrying the root marker.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|n| n.is_root())
    }

    /// All `(parent, child)` edges, one per listed occurrence, sorted.
    pub fn edge_list(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = self
            .nodes
            .values()
            .flat_map(|n| {
                n.children()
                    .iter()
                    .map(move |c| (n.name.clone(), c.clone()))
            })
            .collect();
        out.sort();
        out
    }

    /// Expands `name` to its transitive atom multiset without any caching.
    ///
    /// An atom expands to itself. A molecule expands to the concatenation of
    /// its children's expansions, in child order, duplicates kept.
    pub fn expand(&self, name: &str) -> Result<Vec<String>, CoreError> {
        let mut path = Vec::new();
        let mut out = Vec::new();
        self.expand_into(name, &mut path, &mut out)?;
        Ok(out)
    }

    fn expand_into(
        &self,
        name: &str,
        path: &mut Vec<String>,
        out: &mut Vec<String>,
    ) -> Result<(), CoreError> {
        let node = self.nodes.get(name).ok_or_else(|| CoreError::NodeNotFound {
            name: name.to_string(),
        })?;
        if node.is_atom() {
            out.push(node.name.clone());
            return Ok(());
        }
        if path.iter().any(|p| p == name) {
            return Err(CoreError::Cycle {
                name: name.to_string(),
            });
        }
        path.push(name.to_string());
        for child in node.children() {
            self.expand_into(child, path, out)?;
        }
        path.pop();
        Ok(())
    }

    /// Returns `true` if `to` is reachable from `from` through child edges.
    /// A node reaches itself.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        match (self.indices.get(from), self.indices.get(to)) {
            (Some(&a), Some(&b)) => petgraph::algo::has_path_connecting(&self.edges, a, b, None),
            _ => false,
        }
    }

    /// Names in an order where every molecule precedes its children.
    pub fn topological_order(&self) -> Result<Vec<String>, CoreError> {
        toposort(&self.edges, None)
            .map(|order| order.into_iter().map(|i| self.edges[i].clone()).collect())
            .map_err(|cycle| CoreError::Cycle {
                name: self.edges[cycle.node_id()].clone(),
            })
    }

    /// Reports every dangling reference, one-sided edge, and cycle.
    pub fn check_integrity(&self) -> Vec<IntegrityIssue> {
        let mut issues = Vec::new();

        for node in self.nodes.values() {
            for child in node.children() {
                match self.nodes.get(child) {
                    None => issues.push(IntegrityIssue::DanglingChild {
                        parent: node.name.clone(),
                        child: child.clone(),
                    }),
                    Some(c) if !c.parents.names().contains(&node.name) => {
                        issues.push(IntegrityIssue::MissingParentLink {
                            parent: node.name.clone(),
                            child: child.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
            for parent in node.parents.names() {
                match self.nodes.get(parent) {
                    None => issues.push(IntegrityIssue::DanglingParent {
                        child: node.name.clone(),
                        parent: parent.clone(),
                    }),
                    Some(p) if !p.children().contains(&node.name) => {
                        issues.push(IntegrityIssue::MissingChildLink {
                            parent: parent.clone(),
                            child: node.name.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        if let Err(CoreError::Cycle { name }) = self.topological_order() {
            issues.push(IntegrityIssue::Cycle { name });
        }

        // Duplicate child or parent entries report the same issue repeatedly.
        issues.dedup();
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    /// Atoms A1..A4, M1=[A4], M2=[A2,A3], M4=[A1,A3,M1], SuperM=[M2,M4].
    fn fixture() -> Vec<Node> {
        vec![
            Node::atom("A1", json!({})).with_parents(["M4"]),
            Node::atom("A2", json!({})).with_parents(["M2"]),
            Node::atom("A3", json!({})).with_parents(["M2", "M4"]),
            Node::atom("A4", json!({})).with_parents(["M1"]),
            Node::molecule("M1", ["A4"]).with_parents(["M4"]),
            Node::molecule("M2", ["A2", "A3"]).with_parents(["SuperM"]),
            Node::molecule("M4", ["A1", "A3", "M1"]).with_parents(["SuperM"]),
            Node::molecule("SuperM", ["M2", "M4"]),
        ]
    }

    #[test]
    fn expands_in_child_order() {
        let graph = CompositionGraph::from_nodes(fixture()).unwrap();
        assert_eq!(
            graph.expand("SuperM").unwrap(),
            ["A2", "A3", "A1", "A3", "A4"]
        );
        assert_eq!(graph.expand("A1").unwrap(), ["A1"]);
    }

    #[test]
    fn fixture_is_consistent() {
        let graph = CompositionGraph::from_nodes(fixture()).unwrap();
        assert!(graph.check_integrity().is_empty());
        assert_eq!(graph.roots().count(), 1);
        assert_eq!(graph.edge_count(), 7);
    }

    #[test]
    fn rejects_duplicate_names() {
        let nodes = vec![Node::atom("A", json!(1)), Node::atom("A", json!(2))];
        assert!(matches!(
            CompositionGraph::from_nodes(nodes),
            Err(CoreError::DuplicateName { .. })
        ));
    }

    #[test]
    fn reports_one_sided_and_dangling_edges() {
        let nodes = vec![
            Node::molecule("M", ["A", "Ghost"]),
            Node::atom("A", json!({})),
            Node::atom("B", json!({})).with_parents(["M"]),
        ];
        let graph = CompositionGraph::from_nodes(nodes).unwrap();
        let issues = graph.check_integrity();
        assert!(issues.contains(&IntegrityIssue::DanglingChild {
            parent: "M".into(),
            child: "Ghost".into()
        }));
        assert!(issues.contains(&IntegrityIssue::MissingParentLink {
            parent: "M".into(),
            child: "A".into()
        }));
        assert!(issues.contains(&IntegrityIssue::MissingChildLink {
            parent: "M".into(),
            child: "B".into()
        }));
    }

    #[test]
    fn detects_cycles() {
        let nodes = vec![
            Node::molecule("X", ["Y"]).with_parents(["Y"]),
            Node::molecule("Y", ["X"]).with_parents(["X"]),
        ];
        let graph = CompositionGraph::from_nodes(nodes).unwrap();
        assert!(matches!(graph.expand("X"), Err(CoreError::Cycle { .. })));
        assert!(graph
            .check_integrity()
            .iter()
            .any(|i| matches!(i, IntegrityIssue::Cycle { .. })));
    }

    #[test]
    fn reachability_follows_children() {
        let graph = CompositionGraph::from_nodes(fixture()).unwrap();
        assert!(graph.reaches("SuperM", "A4"));
        assert!(graph.reaches("M1", "M1"));
        assert!(!graph.reaches("M1", "SuperM"));
    }

    /// Molecule `i` may list atoms and any molecule `j < i`.
    fn dag_nodes() -> impl Strategy<Value = Vec<Node>> {
        (1usize..4, 1usize..6).prop_flat_map(|(atoms, molecules)| {
            let children: Vec<_> = (0..molecules)
                .map(|i| prop::collection::vec(0..atoms + i, 0..4))
                .collect();
            children.prop_map(move |children| {
                let name = |k: usize| {
                    if k < atoms {
                        format!("A{k}")
                    } else {
                        format!("M{}", k - atoms)
                    }
                };
                let mut nodes: Vec<Node> = (0..atoms)
                    .map(|k| Node::atom(name(k), json!({})))
                    .collect();
                for (i, list) in children.iter().enumerate() {
                    let list: Vec<String> = list.iter().map(|&k| name(k)).collect();
                    nodes.push(Node::molecule(format!("M{i}"), list));
                }
                nodes
            })
        })
    }

    proptest! {
        #[test]
        fn topological_order_puts_molecules_first(nodes in dag_nodes()) {
            let graph = CompositionGraph::from_nodes(nodes).unwrap();
            let order = graph.topological_order().unwrap();
            let position = |n: &str| order.iter().position(|o| o == n).unwrap();
            for (parent, child) in graph.edge_list() {
                prop_assert!(position(&parent) < position(&child));
            }
        }

        #[test]
        fn expansion_length_sums_over_children(nodes in dag_nodes()) {
            let graph = CompositionGraph::from_nodes(nodes).unwrap();
            for node in graph.nodes().filter(|n| n.is_molecule()) {
                let total: usize = node
                    .children()
                    .iter()
                    .map(|c| graph.expand(c).unwrap().len())
                    .sum();
                prop_assert_eq!(graph.expand(&node.name).unwrap().len(), total);
            }
        }
    }
}

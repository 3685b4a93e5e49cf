//! Invalidation frontier finder.
//!
//! After a structural change at some node, every molecule above it may hold
//! a stale cache entry. [`find_affected`] walks the parent lists up to the
//! roots and returns those molecules, ancestors before descendants, so that
//! the list can go straight into
//! [`populate_targeted`](crate::populate::populate_targeted).

use indexmap::IndexSet;

use molgraph_storage::GraphStore;

use crate::error::EngineError;

/// Returns `name` and every ancestor of it.
///
/// A root yields `[name]`. Otherwise the frontiers of each parent are
/// concatenated in parent order and `name` comes last. A molecule reachable
/// along several paths appears once per path.
pub fn find_affected<G>(graph: &G, name: &str) -> Result<Vec<String>, EngineError>
where
    G: GraphStore + ?Sized,
{
    let mut path = Vec::new();
    let mut out = Vec::new();
    collect_affected(graph, name, &mut path, &mut out)?;
    Ok(out)
}

/// Drops repeated names, keeping the first occurrence of each.
pub fn distinct_affected<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    names
        .into_iter()
        .map(Into::into)
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// `path` holds the nodes whose parents are being walked, innermost first.
fn collect_affected<G>(
    graph: &G,
    name: &str,
    path: &mut Vec<String>,
    out: &mut Vec<String>,
) -> Result<(), EngineError>
where
    G: GraphStore + ?Sized,
{
    let node = graph.get_node(name)?;
    if node.is_root() {
        out.push(node.name);
        return Ok(());
    }

    if path.iter().any(|p| p == name) {
        let mut cycle = path.clone();
        cycle.push(name.to_string());
        return Err(EngineError::Cycle { path: cycle });
    }

    path.push(node.name.clone());
    for parent in node.parents.names() {
        collect_affected(graph, parent, path, out)?;
    }
    path.pop();

    out.push(node.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::reference_stores;
    use molgraph_core::Node;

    #[test]
    fn root_is_its_own_frontier() {
        let (graph, _) = reference_stores();
        assert_eq!(find_affected(&graph, "SuperM").unwrap(), ["SuperM"]);
    }

    #[test]
    fn walks_up_to_the_root() {
        let (graph, _) = reference_stores();
        assert_eq!(find_affected(&graph, "M1").unwrap(), ["SuperM", "M4", "M1"]);
    }

    #[test]
    fn diamonds_repeat_shared_ancestors() {
        let (graph, _) = reference_stores();
        assert_eq!(
            find_affected(&graph, "A3").unwrap(),
            ["SuperM", "M2", "SuperM", "M4", "A3"]
        );
        assert_eq!(
            distinct_affected(find_affected(&graph, "A3").unwrap()),
            ["SuperM", "M2", "M4", "A3"]
        );
    }

    #[test]
    fn parentless_linked_node_is_alone() {
        let (mut graph, _) = reference_stores();
        graph
            .put_node(&Node::molecule("Orphan", ["A1"]).with_parents(Vec::<String>::new()))
            .unwrap();
        assert_eq!(find_affected(&graph, "Orphan").unwrap(), ["Orphan"]);
    }

    #[test]
    fn missing_parent_is_not_found() {
        let (mut graph, _) = reference_stores();
        graph
            .put_node(&Node::molecule("M9", ["A1"]).with_parents(["Ghost"]))
            .unwrap();
        assert!(find_affected(&graph, "M9").unwrap_err().is_not_found());
    }

    #[test]
    fn parent_cycles_fail() {
        let (mut graph, _) = reference_stores();
        graph
            .put_node(&Node::molecule("X", Vec::<String>::new()).with_parents(["Y"]))
            .unwrap();
        graph
            .put_node(&Node::molecule("Y", Vec::<String>::new()).with_parents(["X"]))
            .unwrap();
        assert!(matches!(
            find_affected(&graph, "X"),
            Err(EngineError::Cycle { .. })
        ));
    }
}

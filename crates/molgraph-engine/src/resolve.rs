//! Transitive atom resolution with memoization.
//!
//! Resolving a molecule concatenates the resolutions of its children in
//! child order, keeping duplicates from repeated children and from shared
//! sub-molecules. Every molecule resolved cold, including intermediate ones
//! met during recursion, gets its atom-name list written to the cache.
//!
//! A cache entry is trusted as-is. Its names are materialized against the
//! graph store, so an entry naming a deleted atom fails with `NodeNotFound`
//! instead of being repaired.

use tracing::debug;

use molgraph_core::Node;
use molgraph_storage::{CacheStore, GraphStore};

use crate::error::EngineError;

/// Resolves `node` to the atoms reachable from it, in order.
pub fn resolve<G, C>(graph: &G, cache: &mut C, node: &Node) -> Result<Vec<Node>, EngineError>
where
    G: GraphStore + ?Sized,
    C: CacheStore + ?Sized,
{
    let mut path = Vec::new();
    resolve_on_path(graph, cache, node, &mut path)
}

/// Fetches `name` from the graph store and resolves it.
pub fn resolve_by_name<G, C>(graph: &G, cache: &mut C, name: &str) -> Result<Vec<Node>, EngineError>
where
    G: GraphStore + ?Sized,
    C: CacheStore + ?Sized,
{
    let node = graph.get_node(name)?;
    resolve(graph, cache, &node)
}

/// Like [`resolve_by_name`], returning atom names only.
pub fn resolve_names<G, C>(graph: &G, cache: &mut C, name: &str) -> Result<Vec<String>, EngineError>
where
    G: GraphStore + ?Sized,
    C: CacheStore + ?Sized,
{
    let atoms = resolve_by_name(graph, cache, name)?;
    Ok(atoms.into_iter().map(|a| a.name).collect())
}

/// `path` holds the molecules currently being expanded, outermost first.
fn resolve_on_path<G, C>(
    graph: &G,
    cache: &mut C,
    node: &Node,
    path: &mut Vec<String>,
) -> Result<Vec<Node>, EngineError>
where
    G: GraphStore + ?Sized,
    C: CacheStore + ?Sized,
{
    if let Some(cached) = cache.get_entry(&node.name)? {
        debug!(node = %node.name, atoms = cached.len(), "cache hit");
        return cached
            .iter()
            .map(|atom| graph.get_node(atom).map_err(EngineError::from))
            .collect();
    }

    if node.is_atom() {
        return Ok(vec![node.clone()]);
    }

    if path.contains(&node.name) {
        let mut cycle = path.clone();
        cycle.push(node.name.clone());
        return Err(EngineError::Cycle { path: cycle });
    }

    path.push(node.name.clone());
    let mut atoms = Vec::new();
    for child_name in node.children() {
        let child = graph.get_node(child_name)?;
        atoms.extend(resolve_on_path(graph, cache, &child, path)?);
    }
    path.pop();

    let atom_names: Vec<String> = atoms.iter().map(|a| a.name.clone()).collect();
    cache.put_entry(&node.name, &atom_names)?;
    debug!(node = %node.name, atoms = atom_names.len(), "resolved and cached");

    Ok(atoms)
}

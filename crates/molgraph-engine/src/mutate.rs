//! Graph mutation operations.
//!
//! Each operation keeps the child and parent lists of both endpoints in
//! step, so that for every edge the parent lists the child and the child
//! lists the parent. None of them touch the cache: callers refresh it
//! through [`find_affected`](crate::frontier::find_affected) and
//! [`populate_targeted`](crate::populate::populate_targeted), or use the
//! fused operations on [`Workspace`](crate::workspace::Workspace).
//!
//! Every node update is its own `put_node`. A failure partway leaves the
//! earlier updates in place.

use std::collections::HashSet;

use tracing::info;

use molgraph_core::Node;
use molgraph_storage::{GraphStore, StorageError};

use crate::error::EngineError;

/// Stores a new node and links it into its children's parent lists.
///
/// An atom is stored as given. For a molecule, each child gains `node.name`
/// in its parent list (a root child becomes linked) before the molecule
/// itself is stored. A child listed twice records the parent twice.
pub fn create_molecule<G>(graph: &mut G, node: &Node) -> Result<(), EngineError>
where
    G: GraphStore + ?Sized,
{
    if graph.contains_node(&node.name)? {
        return Err(EngineError::DuplicateName {
            name: node.name.clone(),
        });
    }

    if node.is_atom() {
        graph.put_node(node)?;
        info!(node = %node.name, "created atom");
        return Ok(());
    }

    for child_name in node.children() {
        let mut child = graph.get_node(child_name)?;
        child.parents.push(&node.name);
        graph.put_node(&child)?;
    }
    graph.put_node(node)?;
    info!(node = %node.name, children = node.children().len(), "created molecule");
    Ok(())
}

/// Removes a node and every edge that mentions it.
///
/// Children drop `name` from their parent lists and parents drop `name`
/// from their child lists; all occurrences go.
pub fn delete_molecule<G>(graph: &mut G, name: &str) -> Result<(), EngineError>
where
    G: GraphStore + ?Sized,
{
    let node = graph.get_node(name)?;

    for child_name in node.children() {
        let mut child = graph.get_node(child_name)?;
        child.parents.remove_all(name);
        graph.put_node(&child)?;
    }

    for parent_name in node.parents.names() {
        let mut parent = graph.get_node(parent_name)?;
        if let Some(children) = parent.children_mut() {
            children.retain(|c| c != name);
        }
        graph.put_node(&parent)?;
    }

    graph.delete_node(name)?;
    info!(node = name, "deleted node");
    Ok(())
}

/// Appends `source` to `target`'s children and `target` to `source`'s
/// parents.
///
/// Repeating the call adds the edge again; edges are a multiset. Fails with
/// [`EngineError::NotAMolecule`] if `target` is an atom and with
/// [`EngineError::WouldCreateCycle`] if `target` is `source` or one of its
/// descendants.
pub fn assign_molecule<G>(graph: &mut G, source: &str, target: &str) -> Result<(), EngineError>
where
    G: GraphStore + ?Sized,
{
    let mut source_node = graph.get_node(source)?;
    let mut target_node = graph.get_node(target)?;

    if target_node.is_atom() {
        return Err(EngineError::NotAMolecule {
            name: target.to_string(),
        });
    }
    if descends_from(graph, target, source)? {
        return Err(EngineError::WouldCreateCycle {
            child: source.to_string(),
            parent: target.to_string(),
        });
    }

    if let Some(children) = target_node.children_mut() {
        children.push(source.to_string());
    }
    graph.put_node(&target_node)?;

    source_node.parents.push(target);
    graph.put_node(&source_node)?;

    info!(child = source, parent = target, "assigned");
    Ok(())
}

/// Removes every `source` entry from `target`'s children and every `target`
/// entry from `source`'s parents.
///
/// A source that was never assigned leaves both lists as they were, and a
/// source left with no parents stays linked with an empty list, not a root.
pub fn unassign_molecule<G>(graph: &mut G, source: &str, target: &str) -> Result<(), EngineError>
where
    G: GraphStore + ?Sized,
{
    let mut source_node = graph.get_node(source)?;
    let mut target_node = graph.get_node(target)?;

    match target_node.children_mut() {
        Some(children) => children.retain(|c| c != source),
        None => {
            return Err(EngineError::NotAMolecule {
                name: target.to_string(),
            })
        }
    }
    graph.put_node(&target_node)?;

    source_node.parents.remove_all(target);
    graph.put_node(&source_node)?;

    info!(child = source, parent = target, "unassigned");
    Ok(())
}

/// Returns `true` if `node` is `ancestor` or lies below it. Dangling child
/// names are skipped.
fn descends_from<G>(graph: &G, node: &str, ancestor: &str) -> Result<bool, EngineError>
where
    G: GraphStore + ?Sized,
{
    let mut stack = vec![ancestor.to_string()];
    let mut seen = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == node {
            return Ok(true);
        }
        if !seen.insert(current.clone()) {
            continue;
        }
        match graph.get_node(&current) {
            Ok(n) => stack.extend(n.children().iter().cloned()),
            Err(StorageError::NodeNotFound { .. }) => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(false)
}

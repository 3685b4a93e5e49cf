//! [`Workspace`]: one graph store, one cache store, one configuration.
//!
//! The plain operations delegate to the free functions of this crate and
//! leave cache coherence to the caller. The `*_and_refresh` operations fuse
//! a mutation with the frontier finder and targeted population, returning
//! the molecules they recomputed. Each name is refreshed once even when the
//! frontier reaches it along several paths.
//!
//! A workspace takes ownership of its stores. Use
//! [`into_parts`](Workspace::into_parts) to get them back, e.g. to flush
//! and close a file-backed store.

use std::collections::HashMap;

use tracing::info;

use molgraph_core::Node;
use molgraph_storage::{compute_dirty_set, hash_all_compositions, CacheStore, GraphStore};

use crate::audit::{audit_cache, CacheAudit};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::frontier::{distinct_affected, find_affected};
use crate::{mutate, populate, resolve};

/// Owns the stores every operation runs against.
#[derive(Debug)]
pub struct Workspace<G, C> {
    graph: G,
    cache: C,
    config: EngineConfig,
}

impl<G, C> Workspace<G, C>
where
    G: GraphStore,
    C: CacheStore,
{
    /// Creates a workspace with the default configuration.
    pub fn new(graph: G, cache: C) -> Self {
        Self::with_config(graph, cache, EngineConfig::default())
    }

    /// Creates a workspace with an explicit configuration.
    pub fn with_config(graph: G, cache: C, config: EngineConfig) -> Self {
        Workspace {
            graph,
            cache,
            config,
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Releases the stores.
    pub fn into_parts(self) -> (G, C) {
        (self.graph, self.cache)
    }

    // -------------------------------------------------------------------
    // Resolution and population
    // -------------------------------------------------------------------

    /// Resolves the named node to its atoms.
    pub fn resolve(&mut self, name: &str) -> Result<Vec<Node>, EngineError> {
        resolve::resolve_by_name(&self.graph, &mut self.cache, name)
    }

    /// Resolves the named node to its atom names.
    pub fn resolve_names(&mut self, name: &str) -> Result<Vec<String>, EngineError> {
        resolve::resolve_names(&self.graph, &mut self.cache, name)
    }

    /// Resolves every root.
    pub fn populate_all(&mut self) -> Result<Vec<String>, EngineError> {
        populate::populate_all(&self.graph, &mut self.cache)
    }

    /// Clears and recomputes exactly the named entries.
    pub fn populate_targeted<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), EngineError> {
        populate::populate_targeted(&self.graph, &mut self.cache, names, self.config.clear_policy)
    }

    /// Returns `name` and its ancestors, with repeats for diamonds.
    pub fn find_affected(&self, name: &str) -> Result<Vec<String>, EngineError> {
        find_affected(&self.graph, name)
    }

    // -------------------------------------------------------------------
    // Mutations without cache maintenance
    // -------------------------------------------------------------------

    pub fn create_molecule(&mut self, node: &Node) -> Result<(), EngineError> {
        mutate::create_molecule(&mut self.graph, node)
    }

    pub fn delete_molecule(&mut self, name: &str) -> Result<(), EngineError> {
        mutate::delete_molecule(&mut self.graph, name)
    }

    pub fn assign_molecule(&mut self, source: &str, target: &str) -> Result<(), EngineError> {
        mutate::assign_molecule(&mut self.graph, source, target)
    }

    pub fn unassign_molecule(&mut self, source: &str, target: &str) -> Result<(), EngineError> {
        mutate::unassign_molecule(&mut self.graph, source, target)
    }

    // -------------------------------------------------------------------
    // Fused mutate-and-refresh
    // -------------------------------------------------------------------

    /// Creates `node` and caches its atoms if it is a molecule.
    pub fn create_and_refresh(&mut self, node: &Node) -> Result<Vec<String>, EngineError> {
        self.create_molecule(node)?;
        if node.is_atom() {
            return Ok(Vec::new());
        }
        self.refresh_from(&[node.name.as_str()])
    }

    /// Deletes `name`, drops its own cache entry, and refreshes everything
    /// that contained it.
    pub fn delete_and_refresh(&mut self, name: &str) -> Result<Vec<String>, EngineError> {
        let node = self.graph.get_node(name)?;
        self.delete_molecule(name)?;
        self.cache.clear_entry(name)?;

        let parents = distinct_affected(node.parents.names().iter().cloned());
        self.refresh_from(&parents)
    }

    /// Assigns `source` under `target` and refreshes `target`'s frontier.
    pub fn assign_and_refresh(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, EngineError> {
        self.assign_molecule(source, target)?;
        self.refresh_from(&[target])
    }

    /// Unassigns `source` from `target` and refreshes `target`'s frontier.
    pub fn unassign_and_refresh(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<Vec<String>, EngineError> {
        self.unassign_molecule(source, target)?;
        self.refresh_from(&[target])
    }

    // -------------------------------------------------------------------
    // Snapshot-driven refresh and audit
    // -------------------------------------------------------------------

    /// Fingerprints the current graph for a later [`refresh_dirty`](Self::refresh_dirty).
    pub fn snapshot_hashes(&self) -> Result<HashMap<String, blake3::Hash>, EngineError> {
        Ok(hash_all_compositions(&self.graph.list_nodes()?))
    }

    /// Refreshes everything above nodes that changed since `previous`, and
    /// drops cache entries of nodes that disappeared. Covers mutations made
    /// directly against the graph store.
    pub fn refresh_dirty(
        &mut self,
        previous: &HashMap<String, blake3::Hash>,
    ) -> Result<Vec<String>, EngineError> {
        let current = self.graph.list_nodes()?;
        let dirty = compute_dirty_set(&current, previous);
        for name in &dirty.removed {
            self.cache.clear_entry(name)?;
        }
        let changed: Vec<String> = dirty.needs_refresh().into_iter().collect();
        self.refresh_from(&changed)
    }

    /// Compares every cache entry with a fresh expansion.
    pub fn audit(&self) -> Result<CacheAudit, EngineError> {
        audit_cache(&self.graph, &self.cache)
    }

    /// Recomputes the molecules above `changed`, each once. Atoms on the
    /// frontier are skipped; they are never cached. Entries are cleared
    /// without consulting the clear policy, since a freshly created
    /// molecule has none.
    fn refresh_from<S: AsRef<str>>(&mut self, changed: &[S]) -> Result<Vec<String>, EngineError> {
        let mut affected = Vec::new();
        for name in changed {
            affected.extend(find_affected(&self.graph, name.as_ref())?);
        }
        let mut targets = Vec::new();
        for name in distinct_affected(affected) {
            if self.graph.get_node(&name)?.is_molecule() {
                targets.push(name);
            }
        }

        for name in &targets {
            self.cache.clear_entry(name)?;
        }
        for name in &targets {
            resolve::resolve_by_name(&self.graph, &mut self.cache, name)?;
        }
        info!(refreshed = targets.len(), "refreshed cache frontier");
        Ok(targets)
    }
}

//! In-memory implementations of [`GraphStore`] and [`CacheStore`].
//!
//! First-class backends for tests and ephemeral sessions, and the working
//! set behind the JSON file backends. Both keep insertion order through
//! `IndexMap`, so listings are deterministic.

use indexmap::IndexMap;

use molgraph_core::Node;

use crate::error::StorageError;
use crate::traits::{CacheStore, GraphStore};

/// In-memory node collection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGraphStore {
    nodes: IndexMap<String, Node>,
}

impl InMemoryGraphStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a node list.
    ///
    /// Fails with [`StorageError::IntegrityError`] on a repeated name.
    pub fn from_nodes<I>(nodes: I) -> Result<Self, StorageError>
    where
        I: IntoIterator<Item = Node>,
    {
        let mut store = Self::new();
        for node in nodes {
            if store.nodes.contains_key(&node.name) {
                return Err(StorageError::IntegrityError {
                    reason: format!("duplicate node name '{}'", node.name),
                });
            }
            store.nodes.insert(node.name.clone(), node);
        }
        Ok(store)
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the stored nodes without cloning.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }
}

impl GraphStore for InMemoryGraphStore {
    fn get_node(&self, name: &str) -> Result<Node, StorageError> {
        self.nodes
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::node_not_found(name))
    }

    fn put_node(&mut self, node: &Node) -> Result<(), StorageError> {
        self.nodes.insert(node.name.clone(), node.clone());
        Ok(())
    }

    fn delete_node(&mut self, name: &str) -> Result<(), StorageError> {
        self.nodes
            .shift_remove(name)
            .map(|_| ())
            .ok_or_else(|| StorageError::node_not_found(name))
    }

    fn list_nodes(&self) -> Result<Vec<Node>, StorageError> {
        Ok(self.nodes.values().cloned().collect())
    }

    fn contains_node(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.nodes.contains_key(name))
    }
}

/// In-memory atom cache.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCacheStore {
    entries: IndexMap<String, Vec<String>>,
}

impl InMemoryCacheStore {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cache from existing entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        InMemoryCacheStore {
            entries: entries.into_iter().collect(),
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrowed view of every entry, in insertion order.
    pub fn entries(&self) -> &IndexMap<String, Vec<String>> {
        &self.entries
    }
}

impl CacheStore for InMemoryCacheStore {
    fn get_entry(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_entry(&mut self, key: &str, atoms: &[String]) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), atoms.to_vec());
        Ok(())
    }

    fn clear_entry(&mut self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.shift_remove(key).is_some())
    }

    fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

//! The [`GraphStore`] and [`CacheStore`] traits.
//!
//! Both are synchronous and single-writer. Backends are fully swappable:
//! the engine only ever talks to these traits.

use molgraph_core::Node;

use crate::error::StorageError;

/// Durable mapping from node name to node.
pub trait GraphStore {
    /// Retrieves a node by name.
    ///
    /// Fails with [`StorageError::NodeNotFound`] if absent.
    fn get_node(&self, name: &str) -> Result<Node, StorageError>;

    /// Inserts `node`, or replaces the node with the same name in place.
    fn put_node(&mut self, node: &Node) -> Result<(), StorageError>;

    /// Removes a node by name.
    ///
    /// Fails with [`StorageError::NodeNotFound`] if absent.
    fn delete_node(&mut self, name: &str) -> Result<(), StorageError>;

    /// Lists every node, in insertion order.
    fn list_nodes(&self) -> Result<Vec<Node>, StorageError>;

    /// Returns `true` if a node with this name exists.
    fn contains_node(&self, name: &str) -> Result<bool, StorageError> {
        match self.get_node(name) {
            Ok(_) => Ok(true),
            Err(StorageError::NodeNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Durable mapping from molecule name to a previously resolved atom list.
pub trait CacheStore {
    /// Returns the cached atom names for `key`, or `None` if not cached.
    fn get_entry(&self, key: &str) -> Result<Option<Vec<String>>, StorageError>;

    /// Inserts or replaces the entry for `key`.
    fn put_entry(&mut self, key: &str, atoms: &[String]) -> Result<(), StorageError>;

    /// Removes the entry for `key`. Returns `false` if there was none; the
    /// caller decides whether that is an error.
    fn clear_entry(&mut self, key: &str) -> Result<bool, StorageError>;

    /// Lists every cached key, in insertion order.
    fn list_keys(&self) -> Result<Vec<String>, StorageError>;
}

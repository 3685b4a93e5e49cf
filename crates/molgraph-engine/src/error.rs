//! Engine error types.

use molgraph_core::CoreError;
use molgraph_storage::StorageError;
use thiserror::Error;

/// Errors produced by resolution, population, and mutation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A store call failed, including lookups of missing nodes.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Building or walking a graph snapshot failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A traversal revisited a node already on its path.
    #[error("cycle detected: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// A node with this name already exists.
    #[error("node already exists: '{name}'")]
    DuplicateName { name: String },

    /// Making `child` a child of `parent` would close a cycle.
    #[error("assigning '{child}' to '{parent}' would create a cycle")]
    WouldCreateCycle { child: String, parent: String },

    /// The operation needs a molecule but the node is an atom.
    #[error("'{name}' is an atom and has no children")]
    NotAMolecule { name: String },
}

impl EngineError {
    /// Returns `true` if this error reports a missing node.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::Storage(StorageError::NodeNotFound { .. })
                | EngineError::Core(CoreError::NodeNotFound { .. })
        )
    }
}

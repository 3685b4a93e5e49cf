//! Core error types for molgraph-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the node model and graph snapshots.

use thiserror::Error;

/// Core errors produced by the molgraph-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record carries both or neither of the `properties` / `children` fields.
    #[error("malformed node '{name}': {reason}")]
    MalformedNode { name: String, reason: String },

    /// A name was referenced but no node with that name is in the snapshot.
    #[error("node not found: '{name}'")]
    NodeNotFound { name: String },

    /// Two nodes in one snapshot share a name.
    #[error("duplicate node name: '{name}'")]
    DuplicateName { name: String },

    /// The child relation contains a cycle through the named node.
    #[error("cycle detected at node '{name}'")]
    Cycle { name: String },
}

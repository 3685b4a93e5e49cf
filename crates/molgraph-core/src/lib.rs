//! Data model for molecule composition graphs.
//!
//! A composition graph is a DAG whose leaves are atoms (opaque property
//! payloads) and whose inner nodes are molecules (ordered child lists).
//!
//! # Modules
//!
//! - [`node`]: the tagged [`Node`] model and the atom/root classifier
//! - [`record`]: the flat serialized record shape used by every store
//! - [`graph`]: petgraph-backed snapshot for integrity checks and uncached expansion
//! - [`error`]: CoreError enum

pub mod error;
pub mod graph;
pub mod node;
pub mod record;

pub use error::CoreError;
pub use graph::{CompositionGraph, IntegrityIssue};
pub use node::{Node, NodeKind, Parents};
pub use record::NodeRecord;

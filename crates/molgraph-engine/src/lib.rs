//! Cached transitive-atom resolution over a molecule composition graph.
//!
//! The engine keeps a derived cache (molecule name to atom multiset)
//! recomputable as the graph is mutated. Cache coherence is a two-phase
//! protocol driven by the caller: after a structural mutation touching node
//! `N`, call [`find_affected`] on `N` and hand the result to
//! [`populate_targeted`]. [`Workspace`] fuses the two phases for callers
//! that prefer not to manage them.
//!
//! # Modules
//!
//! - [`resolve`]: transitive atom resolver with memoization at every level
//! - [`populate`]: full and targeted cache population
//! - [`mutate`]: create, delete, assign, unassign
//! - [`frontier`]: invalidation frontier finder
//! - [`audit`]: cache and graph consistency reports
//! - [`workspace`]: store-owning handle with fused mutate-and-refresh
//! - [`config`]: EngineConfig and ClearPolicy
//! - [`error`]: EngineError

pub mod audit;
pub mod config;
pub mod error;
pub mod frontier;
pub mod mutate;
pub mod populate;
pub mod resolve;
pub mod workspace;

pub use audit::{audit_cache, CacheAudit, StaleEntry};
pub use config::{ClearPolicy, EngineConfig};
pub use error::EngineError;
pub use frontier::{distinct_affected, find_affected};
pub use mutate::{assign_molecule, create_molecule, delete_molecule, unassign_molecule};
pub use populate::{populate_all, populate_targeted};
pub use resolve::{resolve, resolve_by_name, resolve_names};
pub use workspace::Workspace;

#[cfg(test)]
pub(crate) mod fixtures;

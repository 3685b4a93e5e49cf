//! Storage abstraction for molecule composition graphs and their atom cache.
//!
//! Provides the [`GraphStore`] and [`CacheStore`] traits defining the
//! persistence contract, plus three interchangeable backends for each:
//! in-memory, JSON file, and SQLite.
//!
//! # Architecture
//!
//! Graph and cache are separate collaborators. Every write is an independent
//! upsert or removal; there is no transaction spanning several calls, so a
//! multi-step mutation interrupted halfway leaves its earlier writes in place.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`traits`]: GraphStore and CacheStore trait definitions
//! - [`memory`]: in-memory backends
//! - [`file`]: JSON file backends and their environment configuration
//! - [`schema`]: SQL schema migrations
//! - [`sqlite`]: SQLite backends
//! - [`hash`]: blake3 composition fingerprints
//! - [`dirty`]: snapshot comparison for change detection

pub mod dirty;
pub mod error;
pub mod file;
pub mod hash;
pub mod memory;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use dirty::{compute_dirty_set, DirtySet};
pub use error::StorageError;
pub use file::{FileStoreConfig, JsonCacheFile, JsonGraphFile};
pub use hash::{hash_all_compositions, hash_composition};
pub use memory::{InMemoryCacheStore, InMemoryGraphStore};
pub use sqlite::{SqliteCacheStore, SqliteGraphStore};
pub use traits::{CacheStore, GraphStore};

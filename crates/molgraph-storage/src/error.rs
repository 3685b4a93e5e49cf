//! Storage error types for molgraph-storage.
//!
//! [`StorageError`] covers the failure modes of every backend: I/O,
//! serialization, SQLite, migrations, and missing nodes or cache entries.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading or writing a backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A SQLite call failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No node with the given name exists.
    #[error("node not found: '{name}'")]
    NodeNotFound { name: String },

    /// No cache entry exists for the given key.
    #[error("cache entry not found: '{key}'")]
    CacheEntryNotFound { key: String },

    /// A data integrity violation was detected while loading.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },
}

impl StorageError {
    /// Shorthand for a [`StorageError::NodeNotFound`].
    pub fn node_not_found(name: &str) -> Self {
        StorageError::NodeNotFound {
            name: name.to_string(),
        }
    }
}

//! SQLite implementations of [`GraphStore`] and [`CacheStore`].
//!
//! Nodes and cache entries are stored as JSON TEXT columns via serde_json.
//! Each backend owns its own connection; both may open the same database
//! file. Every call is its own statement, so there is no transaction
//! spanning a multi-node mutation.

use rusqlite::{params, Connection, OptionalExtension};

use molgraph_core::Node;

use crate::error::StorageError;
use crate::traits::{CacheStore, GraphStore};

/// SQLite-backed node collection.
pub struct SqliteGraphStore {
    conn: Connection,
}

impl SqliteGraphStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteGraphStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteGraphStore { conn })
    }
}

impl GraphStore for SqliteGraphStore {
    fn get_node(&self, name: &str) -> Result<Node, StorageError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT node_json FROM nodes WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Err(StorageError::node_not_found(name)),
        }
    }

    fn put_node(&mut self, node: &Node) -> Result<(), StorageError> {
        let json = serde_json::to_string(node)?;
        self.conn.execute(
            "INSERT INTO nodes (name, node_json) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET node_json = excluded.node_json",
            params![node.name, json],
        )?;
        Ok(())
    }

    fn delete_node(&mut self, name: &str) -> Result<(), StorageError> {
        let rows = self
            .conn
            .execute("DELETE FROM nodes WHERE name = ?1", params![name])?;
        if rows == 0 {
            return Err(StorageError::node_not_found(name));
        }
        Ok(())
    }

    fn list_nodes(&self) -> Result<Vec<Node>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT node_json FROM nodes ORDER BY position")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(serde_json::from_str(&row?)?);
        }
        Ok(result)
    }

    fn contains_node(&self, name: &str) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM nodes WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

/// SQLite-backed atom cache.
pub struct SqliteCacheStore {
    conn: Connection,
}

impl SqliteCacheStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteCacheStore { conn })
    }

    /// Opens an in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteCacheStore { conn })
    }
}

impl CacheStore for SqliteCacheStore {
    fn get_entry(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT atoms_json FROM cache_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        json.map(|j| serde_json::from_str(&j))
            .transpose()
            .map_err(StorageError::from)
    }

    fn put_entry(&mut self, key: &str, atoms: &[String]) -> Result<(), StorageError> {
        let json = serde_json::to_string(atoms)?;
        self.conn.execute(
            "INSERT INTO cache_entries (key, atoms_json) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET atoms_json = excluded.atoms_json",
            params![key, json],
        )?;
        Ok(())
    }

    fn clear_entry(&mut self, key: &str) -> Result<bool, StorageError> {
        let rows = self
            .conn
            .execute("DELETE FROM cache_entries WHERE key = ?1", params![key])?;
        Ok(rows > 0)
    }

    fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT key FROM cache_entries ORDER BY position")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }
}

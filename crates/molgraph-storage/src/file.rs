//! JSON file implementations of [`GraphStore`] and [`CacheStore`].
//!
//! Each backend loads its whole file on [`open`](JsonGraphFile::open) and
//! rewrites the whole file on [`flush`](JsonGraphFile::flush). The node file
//! is an array of node records; the cache file is an object mapping molecule
//! names to atom-name arrays.
//!
//! With `write_through` enabled every upsert or removal is followed by a
//! full rewrite, so the file never lags the working set. Otherwise writes
//! accumulate in memory until `flush` or [`close`](JsonGraphFile::close).
//!
//! Configuration comes from environment variables:
//! - `MOLGRAPH_DATA_PATH`: node file path (default: "data.json")
//! - `MOLGRAPH_CACHE_PATH`: cache file path (default: "cache.json")
//! - `MOLGRAPH_WRITE_THROUGH`: "false" or "0" to defer writes (default: on)

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use molgraph_core::Node;

use crate::error::StorageError;
use crate::memory::{InMemoryCacheStore, InMemoryGraphStore};
use crate::traits::{CacheStore, GraphStore};

/// Paths and write policy for the JSON file backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStoreConfig {
    pub data_path: PathBuf,
    pub cache_path: PathBuf,
    #[serde(default = "default_write_through")]
    pub write_through: bool,
}

fn default_write_through() -> bool {
    true
}

impl Default for FileStoreConfig {
    fn default() -> Self {
        FileStoreConfig {
            data_path: PathBuf::from("data.json"),
            cache_path: PathBuf::from("cache.json"),
            write_through: true,
        }
    }
}

impl FileStoreConfig {
    /// Reads the configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let data_path = std::env::var("MOLGRAPH_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let cache_path = std::env::var("MOLGRAPH_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_path);
        let write_through = std::env::var("MOLGRAPH_WRITE_THROUGH")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false"))
            .unwrap_or(defaults.write_through);
        FileStoreConfig {
            data_path,
            cache_path,
            write_through,
        }
    }

    /// Opens both backends.
    pub fn open(&self) -> Result<(JsonGraphFile, JsonCacheFile), StorageError> {
        let graph = JsonGraphFile::open(&self.data_path, self.write_through)?;
        let cache = JsonCacheFile::open(&self.cache_path, self.write_through)?;
        Ok((graph, cache))
    }
}

/// Writes `value` as pretty JSON, replacing the file.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Node collection backed by a JSON array file.
#[derive(Debug)]
pub struct JsonGraphFile {
    path: PathBuf,
    inner: InMemoryGraphStore,
    write_through: bool,
    dirty: bool,
}

impl JsonGraphFile {
    /// Loads the file at `path`. A missing file opens as an empty store and
    /// is created on the first flush.
    pub fn open(path: impl AsRef<Path>, write_through: bool) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let nodes: Vec<Node> = serde_json::from_reader(BufReader::new(File::open(&path)?))?;
            InMemoryGraphStore::from_nodes(nodes)?
        } else {
            InMemoryGraphStore::new()
        };
        debug!(path = %path.display(), nodes = inner.len(), "loaded node file");
        Ok(JsonGraphFile {
            path,
            inner,
            write_through,
            dirty: false,
        })
    }

    /// Rewrites the whole file if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        let nodes: Vec<&Node> = self.inner.iter().collect();
        write_json(&self.path, &nodes)?;
        self.dirty = false;
        debug!(path = %self.path.display(), nodes = nodes.len(), "flushed node file");
        Ok(())
    }

    /// Flushes and releases the store.
    pub fn close(mut self) -> Result<(), StorageError> {
        self.flush()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn touched(&mut self) -> Result<(), StorageError> {
        self.dirty = true;
        if self.write_through {
            self.flush()?;
        }
        Ok(())
    }
}

impl GraphStore for JsonGraphFile {
    fn get_node(&self, name: &str) -> Result<Node, StorageError> {
        self.inner.get_node(name)
    }

    fn put_node(&mut self, node: &Node) -> Result<(), StorageError> {
        self.inner.put_node(node)?;
        self.touched()
    }

    fn delete_node(&mut self, name: &str) -> Result<(), StorageError> {
        self.inner.delete_node(name)?;
        self.touched()
    }

    fn list_nodes(&self) -> Result<Vec<Node>, StorageError> {
        self.inner.list_nodes()
    }

    fn contains_node(&self, name: &str) -> Result<bool, StorageError> {
        self.inner.contains_node(name)
    }
}

/// Atom cache backed by a JSON object file.
#[derive(Debug)]
pub struct JsonCacheFile {
    path: PathBuf,
    inner: InMemoryCacheStore,
    write_through: bool,
    dirty: bool,
}

impl JsonCacheFile {
    /// Loads the file at `path`. A missing file opens as an empty cache.
    pub fn open(path: impl AsRef<Path>, write_through: bool) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let inner = if path.exists() {
            let entries: IndexMap<String, Vec<String>> =
                serde_json::from_reader(BufReader::new(File::open(&path)?))?;
            InMemoryCacheStore::from_entries(entries)
        } else {
            InMemoryCacheStore::new()
        };
        debug!(path = %path.display(), entries = inner.len(), "loaded cache file");
        Ok(JsonCacheFile {
            path,
            inner,
            write_through,
            dirty: false,
        })
    }

    /// Rewrites the whole file if anything changed since the last flush.
    pub fn flush(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        write_json(&self.path, self.inner.entries())?;
        self.dirty = false;
        debug!(path = %self.path.display(), entries = self.inner.len(), "flushed cache file");
        Ok(())
    }

    /// Flushes and releases the cache.
    pub fn close(mut self) -> Result<(), StorageError> {
        self.flush()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn touched(&mut self) -> Result<(), StorageError> {
        self.dirty = true;
        if self.write_through {
            self.flush()?;
        }
        Ok(())
    }
}

impl CacheStore for JsonCacheFile {
    fn get_entry(&self, key: &str) -> Result<Option<Vec<String>>, StorageError> {
        self.inner.get_entry(key)
    }

    fn put_entry(&mut self, key: &str, atoms: &[String]) -> Result<(), StorageError> {
        self.inner.put_entry(key, atoms)?;
        self.touched()
    }

    fn clear_entry(&mut self, key: &str) -> Result<bool, StorageError> {
        let removed = self.inner.clear_entry(key)?;
        if removed {
            self.touched()?;
        }
        Ok(removed)
    }

    fn list_keys(&self) -> Result<Vec<String>, StorageError> {
        self.inner.list_keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_in(dir: &Path, write_through: bool) -> FileStoreConfig {
        FileStoreConfig {
            data_path: dir.join("data.json"),
            cache_path: dir.join("cache.json"),
            write_through,
        }
    }

    #[test]
    fn test_missing_files_open_empty() {
        let dir = tempfile::tempdir().unwrap();
        let (graph, cache) = config_in(dir.path(), true).open().unwrap();
        assert!(graph.list_nodes().unwrap().is_empty());
        assert!(cache.list_keys().unwrap().is_empty());
        assert!(!graph.path().exists());
    }

    #[test]
    fn test_write_through_persists_each_write() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), true);
        let (mut graph, mut cache) = config.open().unwrap();

        graph.put_node(&Node::atom("A1", json!({"n": 1}))).unwrap();
        graph.put_node(&Node::molecule("M", ["A1"])).unwrap();
        cache.put_entry("M", &["A1".to_string()]).unwrap();

        let (graph2, cache2) = config.open().unwrap();
        assert_eq!(graph2.list_nodes().unwrap().len(), 2);
        assert_eq!(
            cache2.get_entry("M").unwrap(),
            Some(vec!["A1".to_string()])
        );
    }

    #[test]
    fn test_deferred_writes_land_on_close() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), false);
        let (mut graph, cache) = config.open().unwrap();

        graph.put_node(&Node::atom("A1", json!(null))).unwrap();
        assert!(!graph.path().exists());

        graph.close().unwrap();
        cache.close().unwrap();

        let (reopened, _) = config.open().unwrap();
        assert!(reopened.get_node("A1").unwrap().is_atom());
    }

    #[test]
    fn test_reads_reference_record_shape() {
        let dir = tempfile::tempdir().unwrap();
        let data = json!([
            {"name": "A1", "properties": {}, "parents": ["M"]},
            {"name": "M", "children": ["A1", "A1"]}
        ]);
        std::fs::write(dir.path().join("data.json"), data.to_string()).unwrap();
        std::fs::write(dir.path().join("cache.json"), r#"{"M": ["A1", "A1"]}"#).unwrap();

        let (graph, cache) = config_in(dir.path(), true).open().unwrap();
        let m = graph.get_node("M").unwrap();
        assert!(m.is_root());
        assert_eq!(m.children().len(), 2);
        assert_eq!(cache.get_entry("M").unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_clearing_absent_entry_does_not_rewrite() {
        let dir = tempfile::tempdir().unwrap();
        let (_, mut cache) = config_in(dir.path(), true).open().unwrap();
        assert!(!cache.clear_entry("M").unwrap());
        assert!(!cache.path().exists());
    }
}

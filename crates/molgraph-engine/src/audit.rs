//! Cache audit against an uncached expansion.
//!
//! Stale entries are never detected during normal operation. This audit is
//! the offline check: it snapshots the graph, expands every cached key
//! without the cache, and compares atom multisets.

use tracing::warn;

use molgraph_core::{CompositionGraph, IntegrityIssue};
use molgraph_storage::{CacheStore, GraphStore};

use crate::error::EngineError;

/// A cache entry whose atoms differ from a fresh expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleEntry {
    pub key: String,
    pub cached: Vec<String>,
    pub actual: Vec<String>,
}

/// Outcome of [`audit_cache`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheAudit {
    /// Number of cache entries examined.
    pub checked: usize,
    /// Entries whose atom multiset no longer matches the graph.
    pub stale: Vec<StaleEntry>,
    /// Entries naming an atom that is no longer in the graph.
    pub dangling: Vec<String>,
    /// Entries whose key is no longer a node.
    pub orphaned: Vec<String>,
    /// Structural problems in the graph itself.
    pub integrity: Vec<IntegrityIssue>,
}

impl CacheAudit {
    /// Returns true if every entry matched and the graph is consistent.
    pub fn is_clean(&self) -> bool {
        self.stale.is_empty()
            && self.dangling.is_empty()
            && self.orphaned.is_empty()
            && self.integrity.is_empty()
    }
}

/// Checks every cache entry against the current graph.
///
/// Order inside an entry is not compared, only multiplicity. An entry whose
/// key cannot be expanded because of a dangling child or a cycle is counted
/// through `integrity` and skipped.
pub fn audit_cache<G, C>(graph: &G, cache: &C) -> Result<CacheAudit, EngineError>
where
    G: GraphStore + ?Sized,
    C: CacheStore + ?Sized,
{
    let snapshot = CompositionGraph::from_nodes(graph.list_nodes()?)?;
    let mut audit = CacheAudit {
        integrity: snapshot.check_integrity(),
        ..CacheAudit::default()
    };

    for key in cache.list_keys()? {
        audit.checked += 1;
        let Some(cached) = cache.get_entry(&key)? else {
            continue;
        };

        if snapshot.get(&key).is_none() {
            warn!(key = %key, "cache entry for missing node");
            audit.orphaned.push(key);
            continue;
        }
        if cached.iter().any(|atom| snapshot.get(atom).is_none()) {
            warn!(key = %key, "cache entry names a missing atom");
            audit.dangling.push(key);
            continue;
        }
        let Ok(actual) = snapshot.expand(&key) else {
            continue;
        };

        let mut cached_sorted = cached.clone();
        cached_sorted.sort();
        let mut actual_sorted = actual.clone();
        actual_sorted.sort();
        if cached_sorted != actual_sorted {
            warn!(key = %key, "stale cache entry");
            audit.stale.push(StaleEntry {
                key,
                cached,
                actual,
            });
        }
    }

    Ok(audit)
}

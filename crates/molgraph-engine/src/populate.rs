//! Full and targeted cache population.
//!
//! [`populate_all`] resolves every root, which through memoization fills
//! in an entry for every molecule reachable from one. [`populate_targeted`]
//! drops the entries of the named molecules first and then resolves each
//! of them, so exactly those names are recomputed. Descendants that are not
//! named are still served from whatever the cache holds.

use tracing::{info, warn};

use molgraph_storage::{CacheStore, GraphStore, StorageError};

use crate::config::ClearPolicy;
use crate::error::EngineError;
use crate::resolve::{resolve, resolve_by_name};

/// Resolves every root node. Returns the roots resolved, in store order.
pub fn populate_all<G, C>(graph: &G, cache: &mut C) -> Result<Vec<String>, EngineError>
where
    G: GraphStore + ?Sized,
    C: CacheStore + ?Sized,
{
    let mut roots = Vec::new();
    for node in graph.list_nodes()? {
        if node.is_root() {
            resolve(graph, cache, &node)?;
            roots.push(node.name);
        }
    }
    info!(roots = roots.len(), "populated cache from roots");
    Ok(roots)
}

/// Clears the entries for `names`, then resolves each name afresh.
///
/// All clears happen before any resolution, so a named molecule reached
/// through another named molecule is recomputed too. Under
/// [`ClearPolicy::Strict`] an absent entry fails with
/// [`StorageError::CacheEntryNotFound`], which also catches a name listed
/// twice; entries cleared before the failure stay cleared.
pub fn populate_targeted<G, C, S>(
    graph: &G,
    cache: &mut C,
    names: &[S],
    policy: ClearPolicy,
) -> Result<(), EngineError>
where
    G: GraphStore + ?Sized,
    C: CacheStore + ?Sized,
    S: AsRef<str>,
{
    for name in names {
        let name = name.as_ref();
        if !cache.clear_entry(name)? {
            match policy {
                ClearPolicy::Strict => {
                    return Err(StorageError::CacheEntryNotFound {
                        key: name.to_string(),
                    }
                    .into())
                }
                ClearPolicy::Lenient => warn!(key = name, "no cache entry to clear"),
            }
        }
    }
    for name in names {
        resolve_by_name(graph, cache, name.as_ref())?;
    }
    info!(targets = names.len(), "repopulated targeted cache entries");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::reference_stores;
    use molgraph_core::Node;

    #[test]
    fn populate_all_fills_every_reachable_molecule() {
        let (graph, mut cache) = reference_stores();
        let roots = populate_all(&graph, &mut cache).unwrap();

        assert_eq!(roots, ["SuperM"]);
        assert_eq!(cache.list_keys().unwrap(), ["M2", "M1", "M4", "SuperM"]);
        assert_eq!(
            cache.get_entry("SuperM").unwrap().unwrap(),
            ["A2", "A3", "A1", "A3", "A4"]
        );
    }

    #[test]
    fn populate_all_skips_non_roots() {
        let (mut graph, mut cache) = reference_stores();
        // Linked but parentless: no longer a root, so never reached.
        graph
            .put_node(&Node::molecule("Orphan", ["A1"]).with_parents(Vec::<String>::new()))
            .unwrap();
        populate_all(&graph, &mut cache).unwrap();
        assert_eq!(cache.get_entry("Orphan").unwrap(), None);
    }

    #[test]
    fn targeted_recomputes_named_entries_only() {
        let (graph, mut cache) = reference_stores();
        populate_all(&graph, &mut cache).unwrap();
        cache.put_entry("M2", &["A1".to_string()]).unwrap();
        cache.put_entry("SuperM", &["A4".to_string()]).unwrap();

        // M2 stays stale and leaks into the recomputed SuperM.
        populate_targeted(&graph, &mut cache, &["SuperM"], ClearPolicy::Lenient).unwrap();
        assert_eq!(
            cache.get_entry("SuperM").unwrap().unwrap(),
            ["A1", "A1", "A3", "A4"]
        );

        populate_targeted(&graph, &mut cache, &["M2", "SuperM"], ClearPolicy::Lenient).unwrap();
        assert_eq!(
            cache.get_entry("SuperM").unwrap().unwrap(),
            ["A2", "A3", "A1", "A3", "A4"]
        );
    }

    #[test]
    fn lenient_clear_tolerates_missing_entries() {
        let (graph, mut cache) = reference_stores();
        populate_targeted(&graph, &mut cache, &["M1", "M1"], ClearPolicy::Lenient).unwrap();
        assert_eq!(cache.get_entry("M1").unwrap().unwrap(), ["A4"]);
    }

    #[test]
    fn strict_clear_fails_on_missing_entry() {
        let (graph, mut cache) = reference_stores();
        let err = populate_targeted(&graph, &mut cache, &["M1"], ClearPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Storage(StorageError::CacheEntryNotFound { ref key }) if key == "M1"
        ));
    }

    #[test]
    fn strict_clear_rejects_repeated_names() {
        let (graph, mut cache) = reference_stores();
        populate_all(&graph, &mut cache).unwrap();
        assert!(
            populate_targeted(&graph, &mut cache, &["M1", "M1"], ClearPolicy::Strict).is_err()
        );
        // The first clear went through before the failure.
        assert_eq!(cache.get_entry("M1").unwrap(), None);
    }

    #[test]
    fn targeted_on_atom_is_harmless_when_lenient() {
        let (graph, mut cache) = reference_stores();
        populate_targeted(&graph, &mut cache, &["A1"], ClearPolicy::Lenient).unwrap();
        assert!(cache.is_empty());
    }
}

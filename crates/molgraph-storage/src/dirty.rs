//! Change detection between two graph snapshots.
//!
//! Compares previous composition fingerprints with the current node list to
//! determine which nodes changed in a way that can stale cached atom lists.
//! Parent-list and property edits are invisible here by construction; see
//! [`hash_composition`](crate::hash::hash_composition).

use std::collections::{BTreeSet, HashMap};

use molgraph_core::Node;

use crate::hash::hash_all_compositions;

/// The set of nodes whose composition changed.
///
/// Sets are ordered so that refreshes driven from them are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtySet {
    /// Nodes that did not exist in the previous snapshot.
    pub new: BTreeSet<String>,
    /// Nodes whose kind or child list changed.
    pub modified: BTreeSet<String>,
    /// Nodes present previously but gone now.
    pub removed: BTreeSet<String>,
}

impl DirtySet {
    /// Returns all nodes still present whose ancestors need refreshing
    /// (new + modified).
    pub fn needs_refresh(&self) -> BTreeSet<String> {
        self.new.union(&self.modified).cloned().collect()
    }

    /// Returns true if nothing changed.
    pub fn is_clean(&self) -> bool {
        self.new.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Total count of dirty nodes (new + modified + removed).
    pub fn total(&self) -> usize {
        self.new.len() + self.modified.len() + self.removed.len()
    }
}

/// Compute the dirty set by comparing previous fingerprints against the
/// current node list.
pub fn compute_dirty_set(
    current: &[Node],
    previous_hashes: &HashMap<String, blake3::Hash>,
) -> DirtySet {
    let current_hashes = hash_all_compositions(current);
    let mut dirty = DirtySet::default();

    for (name, current_hash) in &current_hashes {
        match previous_hashes.get(name) {
            Some(prev_hash) if prev_hash != current_hash => {
                dirty.modified.insert(name.clone());
            }
            Some(_) => {}
            None => {
                dirty.new.insert(name.clone());
            }
        }
    }

    for name in previous_hashes.keys() {
        if !current_hashes.contains_key(name) {
            dirty.removed.insert(name.clone());
        }
    }

    dirty
}

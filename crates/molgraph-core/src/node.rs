//! The node model and its classifier.
//!
//! A [`Node`] is either an atom (a leaf carrying an opaque property payload)
//! or a molecule (an ordered, duplicate-tolerant list of child names). The
//! root marker is explicit: [`Parents::Root`] marks the top of the hierarchy,
//! while [`Parents::Linked`] holds the parent names, and may be empty. An
//! emptied parent list does NOT turn a node back into a root.

use serde::{Deserialize, Serialize};

use crate::record::NodeRecord;

/// What a node is made of.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A leaf carrying an opaque payload.
    Atom { properties: serde_json::Value },
    /// A composite built from other nodes. Duplicates are meaningful: a child
    /// listed twice contributes its atoms twice.
    Molecule { children: Vec<String> },
}

/// The parent side of a node's edges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Parents {
    /// No parent list has ever been recorded.
    #[default]
    Root,
    /// Names of molecules that list this node as a child.
    Linked(Vec<String>),
}

impl Parents {
    /// Returns the recorded parent names; empty for a root.
    pub fn names(&self) -> &[String] {
        match self {
            Parents::Root => &[],
            Parents::Linked(names) => names,
        }
    }

    /// Appends `parent`, turning a root into a linked node first.
    pub fn push(&mut self, parent: &str) {
        match self {
            Parents::Root => *self = Parents::Linked(vec![parent.to_string()]),
            Parents::Linked(names) => names.push(parent.to_string()),
        }
    }

    /// Removes every occurrence of `parent`. A root stays a root.
    pub fn remove_all(&mut self, parent: &str) {
        if let Parents::Linked(names) = self {
            names.retain(|n| n != parent);
        }
    }
}

/// A node of the composition graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRecord", into = "NodeRecord")]
pub struct Node {
    /// Unique, immutable name.
    pub name: String,
    /// Atom payload or molecule children.
    pub kind: NodeKind,
    /// Parent edges, or the root marker.
    pub parents: Parents,
}

impl Node {
    /// Creates a root atom.
    pub fn atom(name: impl Into<String>, properties: serde_json::Value) -> Self {
        Node {
            name: name.into(),
            kind: NodeKind::Atom { properties },
            parents: Parents::Root,
        }
    }

    /// Creates a root molecule with the given children, in order.
    pub fn molecule<I, S>(name: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Node {
            name: name.into(),
            kind: NodeKind::Molecule {
                children: children.into_iter().map(Into::into).collect(),
            },
            parents: Parents::Root,
        }
    }

    /// Returns this node with the given parent list recorded.
    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = Parents::Linked(parents.into_iter().map(Into::into).collect());
        self
    }

    /// Returns `true` if the node carries a property payload.
    pub fn is_atom(&self) -> bool {
        matches!(self.kind, NodeKind::Atom { .. })
    }

    /// Returns `true` if the node is a molecule.
    pub fn is_molecule(&self) -> bool {
        !self.is_atom()
    }

    /// Returns `true` if no parent list has been recorded. An explicitly
    /// empty parent list is not a root.
    pub fn is_root(&self) -> bool {
        matches!(self.parents, Parents::Root)
    }

    /// Child names for a molecule; empty for an atom.
    pub fn children(&self) -> &[String] {
        match &self.kind {
            NodeKind::Molecule { children } => children,
            NodeKind::Atom { .. } => &[],
        }
    }

    /// Mutable child list, or `None` for an atom.
    pub fn children_mut(&mut self) -> Option<&mut Vec<String>> {
        match &mut self.kind {
            NodeKind::Molecule { children } => Some(children),
            NodeKind::Atom { .. } => None,
        }
    }

    /// The property payload of an atom.
    pub fn properties(&self) -> Option<&serde_json::Value> {
        match &self.kind {
            NodeKind::Atom { properties } => Some(properties),
            NodeKind::Molecule { .. } => None,
        }
    }
}

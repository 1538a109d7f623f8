//! Edge type and edge identity.
//!
//! Edges are directed relations from an upstream (parent) node to a
//! downstream (child) node. Edge identity is the `"{source}->{target}"`
//! string, unique per ordered pair; re-encountering the same pair during
//! the build does not insert a duplicate.

use serde::Serialize;
use std::fmt;

/// Derive the canonical edge id for an ordered (source, target) pair.
pub fn edge_id(source: &str, target: &str) -> String {
    format!("{source}->{target}")
}

/// A directed edge in the lineage graph.
///
/// Never destroyed during a session; hiding is a visibility-state concern,
/// projected per frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Canonical id, `"{source}->{target}"`.
    pub id: String,
    /// Source node id (upstream).
    pub source: String,
    /// Target node id (downstream).
    pub target: String,
}

impl Edge {
    /// Create a new edge; the id is derived from the endpoints.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: edge_id(&source, &target),
            source,
            target,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
